// src/scan.rs

use ignore::{
    gitignore::{Gitignore, GitignoreBuilder},
    DirEntry, WalkBuilder,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::{analyzer::Registry, model::FileAnalysis, util};

/// Optional gitignore-style pattern file at the scanned root.
pub const IGNORE_FILE: &str = ".gptignore";

/// Absolute file path → inventory. Rebuilt from scratch on every scan.
pub type ProjectAnalysis = BTreeMap<PathBuf, FileAnalysis>;

/// Walks a tree and dispatches each file to the analyzer for its extension.
pub struct Scanner {
    registry: Registry,
    ignore_dirs: BTreeSet<String>,
}

impl Scanner {
    pub fn new(ignore_dirs: BTreeSet<String>) -> Self {
        Self::with_registry(Registry::with_defaults(), ignore_dirs)
    }

    pub fn with_registry(registry: Registry, ignore_dirs: BTreeSet<String>) -> Self {
        Self { registry, ignore_dirs }
    }

    /// Files without an analyzer, unreadable or unparseable files and files
    /// with no top-level declarations are all left out, silently.
    pub fn scan(&self, root: &Path) -> ProjectAnalysis {
        let root = util::absolute_root(root);
        let mut result = ProjectAnalysis::new();

        for dent in walker(&root, &self.ignore_dirs).build().filter_map(Result::ok) {
            if !dent.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = dent.path();
            let Some(analyzer) = self.registry.for_path(path) else {
                continue;
            };
            if let Some(fa) = analyzer.analyze(path) {
                result.insert(path.to_path_buf(), fa);
            }
        }

        log::debug!("scanned {}: {} file(s) with declarations", root.display(), result.len());
        result
    }
}

/// `scan(root, ignored_dir_names)` with the default analyzers.
pub fn scan_project(root: &Path, ignore_dirs: &BTreeSet<String>) -> ProjectAnalysis {
    Scanner::new(ignore_dirs.clone()).scan(root)
}

/// Walker over `root` with the prune rules applied; no VCS ignore files,
/// hidden files are visited.
pub(crate) fn walker(root: &Path, ignore_dirs: &BTreeSet<String>) -> WalkBuilder {
    let matcher = ignore_file_matcher(root);
    let ignore_dirs = ignore_dirs.clone();

    let mut wb = WalkBuilder::new(root);
    wb.standard_filters(false)
        .follow_links(false)
        .filter_entry(move |e| !is_pruned(e, &ignore_dirs, &matcher));
    wb
}

fn ignore_file_matcher(root: &Path) -> Gitignore {
    let path = root.join(IGNORE_FILE);
    if !path.is_file() {
        return Gitignore::empty();
    }
    let mut builder = GitignoreBuilder::new(root);
    if let Some(e) = builder.add(&path) {
        log::warn!("{}: {e}", path.display());
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("{}: {e}", path.display());
        Gitignore::empty()
    })
}

/// Directories named in `ignore_dirs` or starting with `.` are cut before
/// descent, as is anything matched by the root ignore file. The walk root
/// itself is never pruned.
fn is_pruned(entry: &DirEntry, ignore_dirs: &BTreeSet<String>, matcher: &Gitignore) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    if matcher.matched(entry.path(), is_dir).is_ignore() {
        return true;
    }
    if !is_dir {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || ignore_dirs.contains(name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    fn ignore(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn only_files_with_declarations_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "def f():\n    return 1\n");
        write(dir.path(), "b.py", "X = 1\n");
        write(dir.path(), "notes.txt", "def g():\n    pass\n");

        let result = scan_project(dir.path(), &ignore(&[]));
        assert_eq!(result.len(), 1);
        let (path, fa) = result.iter().next().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("a.py"));
        assert_eq!(fa.functions[0].name, "f");
    }

    #[test]
    fn ignored_and_hidden_dirs_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/keep.py", "def keep():\n    pass\n");
        write(dir.path(), "node_modules/pkg/index.js", "function dep() {}\n");
        write(dir.path(), ".cache/x.py", "def hidden():\n    pass\n");
        write(dir.path(), "venv/lib/site.py", "def site():\n    pass\n");

        let result = scan_project(dir.path(), &ignore(&["node_modules", "venv"]));
        let names: Vec<_> = result
            .keys()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["keep.py"]);
    }

    #[test]
    fn unparseable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.py", "def oops(:\n");
        write(dir.path(), "ok.js", "function ok() {\n}\n");
        let result = scan_project(dir.path(), &ignore(&[]));
        assert_eq!(result.len(), 1);
        assert!(result.keys().all(|p| p.ends_with("ok.js")));
    }

    #[test]
    fn root_ignore_file_excludes_matches() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IGNORE_FILE, "generated/\n*_pb2.py\n");
        write(dir.path(), "keep.py", "def keep():\n    pass\n");
        write(dir.path(), "api_pb2.py", "def stub():\n    pass\n");
        write(dir.path(), "generated/out.py", "def gen():\n    pass\n");

        let result = scan_project(dir.path(), &ignore(&[]));
        assert_eq!(result.len(), 1);
        assert!(result.keys().all(|p| p.ends_with("keep.py")));
    }

    #[test]
    fn missing_root_scans_empty() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_project(&dir.path().join("nope"), &ignore(&[]));
        assert!(result.is_empty());
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "def f():\n    pass\n");
        let scanner = Scanner::with_registry(Registry::empty(), ignore(&[]));
        assert!(scanner.scan(dir.path()).is_empty());
    }
}
