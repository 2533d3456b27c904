// src/config.rs
//! Run settings: built-in defaults, optionally overridden by
//! `<root>/.declpack.json`, then by CLI flags (see `commands`).
//!
//! ```json
//! { "ignore_dirs": ["node_modules", "target"], "output_name": "bundle.txt",
//!   "always_whole": ["javascript"], "append_tree": true }
//! ```
//! Fields are optional; a present `ignore_dirs` replaces the default set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{bundle::BundlePolicy, model::Language};

pub const DEFAULT_OUTPUT_NAME: &str = "gpt_bundle.txt";
pub const SETTINGS_FILE: &str = ".declpack.json";

/// Version control, virtualenv, cache and build directories.
pub fn default_ignore_dirs() -> BTreeSet<String> {
    [
        ".git", ".venv", "venv", "__pycache__", ".mypy_cache", ".pytest_cache",
        "node_modules", "dist", "build", "target", ".idea", ".vscode",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub ignore_dirs: BTreeSet<String>,
    /// Bundle file name, written under the scanned root.
    pub output_name: String,
    /// Languages whose selected files are always bundled whole.
    pub always_whole: BTreeSet<Language>,
    /// Append a project tree section after the bundle.
    pub append_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_dirs: default_ignore_dirs(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            always_whole: BTreeSet::new(),
            append_tree: false,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `<root>/.declpack.json` when present.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        log::debug!("settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn bundle_policy(&self) -> BundlePolicy {
        BundlePolicy { always_whole: self.always_whole.clone() }
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(dir.path()).unwrap();
        assert_eq!(s, Settings::default());
        assert!(s.ignore_dirs.contains("node_modules"));
        assert_eq!(s.output_path(dir.path()), dir.path().join("gpt_bundle.txt"));
    }

    #[test]
    fn file_overrides_given_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "always_whole": ["js"], "output_name": "out.txt" }"#,
        )
        .unwrap();
        let s = Settings::load(dir.path()).unwrap();
        assert_eq!(s.output_name, "out.txt");
        assert!(s.always_whole.contains(&Language::JavaScript));
        assert_eq!(s.ignore_dirs, default_ignore_dirs());
        assert!(!s.append_tree);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{ nope").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }
}
