// src/tree_view.rs

use std::{cmp::Ordering, collections::BTreeSet, path::Path};

use crate::scan;

/// Indented listing of `root`, pruned the same way the scanner prunes.
///
/// Output format (example):
/// ```text
///   README.md
///   main.py
///   src/
///     app.py
///     util/
///       io.py
/// ```
/// Two spaces per depth level; within a directory, files come before
/// subdirectories and both are sorted by name. The root itself is not listed.
pub fn render_tree(root: &Path, ignore_dirs: &BTreeSet<String>) -> String {
    let mut wb = scan::walker(root, ignore_dirs);
    wb.sort_by_file_path(files_first);

    let mut lines: Vec<String> = Vec::new();
    for dent in wb.build().filter_map(Result::ok) {
        if dent.depth() == 0 {
            continue;
        }
        let name = dent.file_name().to_string_lossy();
        let slash = if dent.file_type().is_some_and(|t| t.is_dir()) { "/" } else { "" };
        lines.push(format!("{}{}{}", "  ".repeat(dent.depth()), name, slash));
    }
    lines.join("\n")
}

fn files_first(a: &Path, b: &Path) -> Ordering {
    a.is_dir().cmp(&b.is_dir()).then_with(|| a.file_name().cmp(&b.file_name()))
}
