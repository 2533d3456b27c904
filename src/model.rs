// src/model.rs
//! Declaration records produced by the analyzers.
//!
//! Language-agnostic: a file is a source buffer plus ordered top-level
//! functions and classes; a class owns its directly nested methods.
//! Line numbers are 1-based and inclusive everywhere.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::slice;

/// Source languages with a registered analyzer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "py")]
    Python,
    #[serde(alias = "js")]
    JavaScript,
    #[serde(alias = "rs")]
    Rust,
}

impl Language {
    /// Extension → language; unknown extensions have no analyzer.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" => Some(Language::JavaScript),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Case-insensitive name or extension, as used by CLI flags and settings.
    pub fn from_str_ic(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Some(Language::Python),
            "javascript" => Some(Language::JavaScript),
            "rust" => Some(Language::Rust),
            other => Self::from_extension(other),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Rust => "rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far an analysis' line ranges can be trusted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Full grammar parser; ranges are exact.
    #[default]
    Exact,
    /// Pattern/brace matching; ranges may be degenerate (start == end) and
    /// method detection may miss or over-report.
    Heuristic,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Function,
    AsyncFunction,
    Method,
    AsyncMethod,
    Class,
}

impl DeclKind {
    pub fn function(is_async: bool) -> Self {
        if is_async { DeclKind::AsyncFunction } else { DeclKind::Function }
    }

    pub fn method(is_async: bool) -> Self {
        if is_async { DeclKind::AsyncMethod } else { DeclKind::Method }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::AsyncFunction => "async_function",
            DeclKind::Method => "method",
            DeclKind::AsyncMethod => "async_method",
            DeclKind::Class => "class",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, line-range-addressable unit of source.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub line_start: usize,
    pub line_end: usize,
}

impl Declaration {
    /// Builds a record, forcing `line_end >= line_start`.
    pub fn new(name: impl Into<String>, kind: DeclKind, line_start: usize, line_end: usize) -> Self {
        let line_start = line_start.max(1);
        Self {
            name: name.into(),
            kind,
            line_start,
            line_end: line_end.max(line_start),
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.line_start == self.line_end
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClassDeclaration {
    #[serde(flatten)]
    pub decl: Declaration,
    /// Directly nested methods, ordered by `line_start`.
    pub methods: Vec<Declaration>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>, line_start: usize, line_end: usize, mut methods: Vec<Declaration>) -> Self {
        methods.sort_by_key(|m| m.line_start);
        Self {
            decl: Declaration::new(name, DeclKind::Class, line_start, line_end),
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }
}

/// A file's path, language and its content addressed by line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceBuffer {
    path: PathBuf,
    language: Language,
    lines: Vec<String>,
}

impl SourceBuffer {
    pub fn new(path: impl Into<PathBuf>, language: Language, source: &str) -> Self {
        Self {
            path: path.into(),
            language,
            lines: slice::split_lines(source),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Inclusive 1-based slice; see [`slice::extract`].
    pub fn extract(&self, start: usize, end: usize) -> String {
        slice::extract(&self.lines, start, end)
    }

    pub fn extract_decl(&self, d: &Declaration) -> String {
        self.extract(d.line_start, d.line_end)
    }

    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Inventory of one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileAnalysis {
    pub source: SourceBuffer,
    pub functions: Vec<Declaration>,
    pub classes: Vec<ClassDeclaration>,
    pub fidelity: Fidelity,
}

impl FileAnalysis {
    pub fn new(source: SourceBuffer, fidelity: Fidelity) -> Self {
        Self {
            source,
            functions: Vec::new(),
            classes: Vec::new(),
            fidelity,
        }
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    pub fn language(&self) -> Language {
        self.source.language()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_detection() {
        assert_eq!(Language::from_path(Path::new("a/b.py")), Some(Language::Python));
        assert_eq!(Language::from_path(Path::new("app.JS")), Some(Language::JavaScript));
        assert_eq!(Language::from_path(Path::new("lib.rs")), Some(Language::Rust));
        assert_eq!(Language::from_path(Path::new("index.ts")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
        assert_eq!(Language::from_str_ic(" JS "), Some(Language::JavaScript));
        assert_eq!(Language::from_str_ic("python"), Some(Language::Python));
    }

    #[test]
    fn declaration_end_never_precedes_start() {
        let d = Declaration::new("f", DeclKind::Function, 7, 3);
        assert_eq!((d.line_start, d.line_end), (7, 7));
        assert!(d.is_single_line());
    }

    #[test]
    fn class_methods_sorted_by_start() {
        let c = ClassDeclaration::new(
            "C",
            1,
            10,
            vec![
                Declaration::new("b", DeclKind::Method, 6, 8),
                Declaration::new("a", DeclKind::AsyncMethod, 2, 4),
            ],
        );
        let names: Vec<_> = c.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(c.decl.kind, DeclKind::Class);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&DeclKind::AsyncMethod).unwrap();
        assert_eq!(json, "\"async_method\"");
    }
}
