// src/analyzer.rs
//! Per-language analyzer contract and the extension registry the scanner uses.
//!
//! An analyzer turns one file into a [`FileAnalysis`], or nothing. "Nothing"
//! covers unreadable files, unparseable files and files without top-level
//! declarations alike; the reason only reaches the debug log.
//!
//! The built-in analyzers all run a full grammar and report
//! [`Fidelity::Exact`]. An analyzer registered with [`Fidelity::Heuristic`]
//! is best-effort: ranges may be single-line and method detection may be
//! imprecise, and consumers must tolerate both.

use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    error::AnalyzeError,
    js_analyzer::JsAnalyzer,
    model::{FileAnalysis, Fidelity, Language},
    python_analyzer::PythonAnalyzer,
    rs_analyzer::RustAnalyzer,
    slice,
};

pub trait Analyzer {
    fn language(&self) -> Language;

    fn fidelity(&self) -> Fidelity;

    /// Inventory for already-decoded `source` that lives at `path`.
    fn analyze_source(&self, path: &Path, source: &str) -> Result<FileAnalysis, AnalyzeError>;

    /// Read `path` (invalid UTF-8 is dropped) and inventory it.
    fn analyze(&self, path: &Path) -> Option<FileAnalysis> {
        let result = fs::read(path)
            .map_err(AnalyzeError::from)
            .and_then(|bytes| self.analyze_source(path, &slice::decode_lossy(&bytes)));
        match result {
            Ok(fa) => Some(fa),
            Err(e) => {
                log::debug!("[{}] skip {}: {}", self.language(), path.display(), e);
                None
            }
        }
    }
}

/// Guard shared by all analyzers: an empty inventory is not an inventory.
pub(crate) fn non_empty(fa: FileAnalysis) -> Result<FileAnalysis, AnalyzeError> {
    if fa.is_empty() { Err(AnalyzeError::Empty) } else { Ok(fa) }
}

/// Extension → analyzer mapping owned by the scanner.
pub struct Registry {
    by_language: BTreeMap<Language, Box<dyn Analyzer>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self { by_language: BTreeMap::new() }
    }

    /// Python, JavaScript and Rust, all grammar-backed.
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();
        r.register(Box::new(PythonAnalyzer));
        r.register(Box::new(JsAnalyzer));
        r.register(Box::new(RustAnalyzer));
        r
    }

    /// Adds or replaces the analyzer for its language.
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.by_language.insert(analyzer.language(), analyzer);
    }

    pub fn for_path(&self, path: &Path) -> Option<&dyn Analyzer> {
        let lang = Language::from_path(path)?;
        self.by_language.get(&lang).map(Box::as_ref)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.by_language.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
