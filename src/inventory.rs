// src/inventory.rs
//! Display view of a scan: one entry per analyzed file, declarations in
//! source order. Serializes to the JSON the `inventory` command prints.

use serde::Serialize;
use std::{fmt::Write as _, path::Path};

use crate::{
    model::{DeclKind, Declaration, FileAnalysis, Fidelity, Language},
    scan::ProjectAnalysis,
    util,
};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    pub name: String,
    pub kind: DeclKind,
    pub line_start: usize,
    pub line_end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<Declaration>>,
}

impl InventoryItem {
    fn leaf(d: &Declaration) -> Self {
        Self {
            name: d.name.clone(),
            kind: d.kind,
            line_start: d.line_start,
            line_end: d.line_end,
            methods: None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FileInventory {
    pub abs: String,
    pub rel: String,
    pub language: Language,
    pub fidelity: Fidelity,
    pub items: Vec<InventoryItem>,
}

impl FileInventory {
    pub fn from_file(root: &Path, fa: &FileAnalysis) -> Self {
        let mut items: Vec<InventoryItem> = fa.functions.iter().map(InventoryItem::leaf).collect();
        items.extend(fa.classes.iter().map(|c| InventoryItem {
            methods: Some(c.methods.clone()),
            ..InventoryItem::leaf(&c.decl)
        }));
        // stable: a function and class on the same line keep functions first
        items.sort_by_key(|i| i.line_start);

        Self {
            abs: fa.path().to_string_lossy().into_owned(),
            rel: util::normalize_rel(root, fa.path()),
            language: fa.language(),
            fidelity: fa.fidelity,
            items,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    pub root: String,
    pub files: Vec<FileInventory>,
}

impl Inventory {
    /// Files ordered by lowercased relative path.
    pub fn from_analysis(root: &Path, analysis: &ProjectAnalysis) -> Self {
        let mut files: Vec<FileInventory> = analysis
            .values()
            .map(|fa| FileInventory::from_file(root, fa))
            .collect();
        files.sort_by_cached_key(|f| f.rel.to_lowercase());

        Self {
            root: root.to_string_lossy().into_owned(),
            files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Plain listing for the terminal.
    ///
    /// ```text
    /// src/app.py [python]
    ///   function load 4-9
    ///   class Store 12-40
    ///     async_method put 20-25
    /// ```
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for f in &self.files {
            let heur = if f.fidelity == Fidelity::Heuristic { ", heuristic" } else { "" };
            let _ = writeln!(out, "{} [{}{}]", f.rel, f.language, heur);
            for item in &f.items {
                let _ = writeln!(out, "  {} {} {}-{}", item.kind, item.name, item.line_start, item.line_end);
                for m in item.methods.iter().flatten() {
                    let _ = writeln!(out, "    {} {} {}-{}", m.kind, m.name, m.line_start, m.line_end);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDeclaration, SourceBuffer};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn file(path: &str, fidelity: Fidelity) -> FileAnalysis {
        let mut fa = FileAnalysis::new(SourceBuffer::new(path, Language::Python, ""), fidelity);
        fa.functions.push(Declaration::new("late", DeclKind::Function, 30, 32));
        fa.functions.push(Declaration::new("early", DeclKind::AsyncFunction, 1, 3));
        fa.classes.push(ClassDeclaration::new(
            "Mid",
            10,
            20,
            vec![Declaration::new("go", DeclKind::Method, 11, 12)],
        ));
        fa
    }

    fn project(paths: &[&str]) -> ProjectAnalysis {
        paths
            .iter()
            .map(|p| (PathBuf::from(p), file(p, Fidelity::Exact)))
            .collect()
    }

    #[test]
    fn items_interleave_by_line() {
        let inv = FileInventory::from_file(Path::new("/p"), &file("/p/a.py", Fidelity::Exact));
        let names: Vec<_> = inv.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["early", "Mid", "late"]);
        assert_eq!(inv.rel, "a.py");
        assert!(inv.items[0].methods.is_none());
        assert_eq!(inv.items[1].methods.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn files_sorted_case_insensitively() {
        let inv = Inventory::from_analysis(Path::new("/p"), &project(&["/p/b.py", "/p/A.py", "/p/sub/c.py"]));
        let rels: Vec<_> = inv.files.iter().map(|f| f.rel.as_str()).collect();
        assert_eq!(rels, ["A.py", "b.py", "sub/c.py"]);
    }

    #[test]
    fn json_shape() {
        let inv = FileInventory::from_file(Path::new("/p"), &file("/p/a.py", Fidelity::Heuristic));
        let v = serde_json::to_value(&inv).unwrap();
        assert_eq!(v["language"], "python");
        assert_eq!(v["fidelity"], "heuristic");
        assert_eq!(v["items"][0]["kind"], "async_function");
        assert!(v["items"][0].get("methods").is_none());
        assert_eq!(v["items"][1]["methods"][0]["name"], "go");
    }

    #[test]
    fn text_listing() {
        let inv = Inventory::from_analysis(Path::new("/p"), &project(&["/p/a.py"]));
        assert_eq!(
            inv.render_text(),
            "a.py [python]\n  async_function early 1-3\n  class Mid 10-20\n    method go 11-12\n  function late 30-32\n"
        );
    }
}
