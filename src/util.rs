// src/util.rs

use std::path::{Path, PathBuf};

/// Absolute form of `root`: canonical when possible, else joined onto the
/// current directory. Never fails; a missing root simply scans as empty.
pub fn absolute_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

/// `path` relative to `root`, `/`-separated. Falls back to the full path.
pub fn normalize_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// RFC3339 timestamp (seconds precision, local offset).
pub fn now_timestamp() -> String {
    use chrono::{Local, SecondsFormat};
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Split a `a,b , c` flag value into trimmed, non-empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_paths_are_slash_separated() {
        let root = Path::new("/proj");
        assert_eq!(normalize_rel(root, Path::new("/proj/a/b.py")), "a/b.py");
        assert_eq!(normalize_rel(root, Path::new("/other/c.py")), "/other/c.py");
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" node_modules, dist,,build "), ["node_modules", "dist", "build"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn absolute_root_is_absolute() {
        assert!(absolute_root(Path::new(".")).is_absolute());
        assert!(absolute_root(Path::new("does/not/exist")).is_absolute());
    }
}
