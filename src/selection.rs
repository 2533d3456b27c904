// src/selection.rs
//! Cross-file selection: which declarations of which files go into a bundle.
//!
//! JSON shape accepted at the boundary:
//! ```json
//! {
//!   "/abs/path/a.py": true,
//!   "/abs/path/b.py": {
//!     "functions": ["load", "save"],
//!     "classes": { "Store": "*", "Cache": ["get", "put"], "Old": null }
//!   }
//! }
//! ```
//! File value: `true` / `"whole"` / `"*"` / `"whole file"` → whole file;
//! `false` / `null` / `{}` → skip. Class value: `"*"` / `"whole"` / `true` →
//! whole class; `null` / `false` → skip; array → those methods only.

use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::error::SelectionError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassPick {
    Skip,
    Whole,
    Methods(BTreeSet<String>),
}

/// Declarations wanted from one file, by exact name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickSet {
    pub functions: BTreeSet<String>,
    pub classes: BTreeMap<String, ClassPick>,
}

impl PickSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(mut self, name: &str) -> Self {
        self.functions.insert(name.to_string());
        self
    }

    pub fn whole_class(mut self, name: &str) -> Self {
        self.classes.insert(name.to_string(), ClassPick::Whole);
        self
    }

    pub fn skip_class(mut self, name: &str) -> Self {
        self.classes.insert(name.to_string(), ClassPick::Skip);
        self
    }

    pub fn methods<'a>(mut self, class: &str, methods: impl IntoIterator<Item = &'a str>) -> Self {
        let set = methods.into_iter().map(str::to_string).collect();
        self.classes.insert(class.to_string(), ClassPick::Methods(set));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileDirective {
    Whole,
    Skip,
    Pick(PickSet),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Selection {
    files: BTreeMap<PathBuf, FileDirective>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn whole(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), FileDirective::Whole);
        self
    }

    pub fn pick(mut self, path: impl Into<PathBuf>, picks: PickSet) -> Self {
        self.files.insert(path.into(), FileDirective::Pick(picks));
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, directive: FileDirective) {
        self.files.insert(path.into(), directive);
    }

    pub fn get(&self, path: &Path) -> Option<&FileDirective> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Relative keys are taken as relative to `root`; absolute keys are kept.
    pub fn rooted_at(self, root: &Path) -> Self {
        let files = self
            .files
            .into_iter()
            .map(|(p, d)| if p.is_absolute() { (p, d) } else { (root.join(p), d) })
            .collect();
        Self { files }
    }
}

impl TryFrom<Value> for Selection {
    type Error = SelectionError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = v else {
            return Err(SelectionError::new("$", "expected an object keyed by file path"));
        };
        let mut files = BTreeMap::new();
        for (path, value) in map {
            let directive = file_directive(&path, value)?;
            files.insert(PathBuf::from(path), directive);
        }
        Ok(Self { files })
    }
}

fn is_whole_word(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "*" | "whole" | "whole file" | "all")
}

fn file_directive(path: &str, v: Value) -> Result<FileDirective, SelectionError> {
    match v {
        Value::Bool(true) => Ok(FileDirective::Whole),
        Value::Bool(false) | Value::Null => Ok(FileDirective::Skip),
        Value::String(s) if is_whole_word(&s) => Ok(FileDirective::Whole),
        Value::Object(obj) if obj.is_empty() => Ok(FileDirective::Skip),
        Value::Object(mut obj) => {
            let mut picks = PickSet::new();
            match obj.remove("functions") {
                None | Some(Value::Null) => {}
                Some(v) => picks.functions = name_set(&format!("{path}.functions"), v)?,
            }
            match obj.remove("classes") {
                None | Some(Value::Null) => {}
                Some(Value::Object(classes)) => {
                    for (name, v) in classes {
                        let pick = class_pick(&format!("{path}.classes.{name}"), v)?;
                        picks.classes.insert(name, pick);
                    }
                }
                Some(_) => return Err(SelectionError::new(format!("{path}.classes"), "expected an object")),
            }
            Ok(FileDirective::Pick(picks))
        }
        other => Err(SelectionError::new(path, format!("unsupported directive {other}"))),
    }
}

fn class_pick(at: &str, v: Value) -> Result<ClassPick, SelectionError> {
    match v {
        Value::Null | Value::Bool(false) => Ok(ClassPick::Skip),
        Value::Bool(true) => Ok(ClassPick::Whole),
        Value::String(s) if is_whole_word(&s) => Ok(ClassPick::Whole),
        v @ Value::Array(_) => Ok(ClassPick::Methods(name_set(at, v)?)),
        other => Err(SelectionError::new(at, format!("unsupported class value {other}"))),
    }
}

fn name_set(at: &str, v: Value) -> Result<BTreeSet<String>, SelectionError> {
    let Value::Array(items) = v else {
        return Err(SelectionError::new(at, "expected an array of names"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(SelectionError::new(at, format!("expected a name, got {other}"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_directive_shapes() {
        let sel = Selection::from_json_str(
            r#"{
                "/p/a.py": true,
                "/p/b.py": "whole file",
                "/p/c.py": false,
                "/p/d.py": null,
                "/p/e.py": {},
                "/p/f.py": {
                    "functions": ["load"],
                    "classes": { "Store": "*", "Cache": ["get", "put"], "Old": null, "New": true }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(sel.get(Path::new("/p/a.py")), Some(&FileDirective::Whole));
        assert_eq!(sel.get(Path::new("/p/b.py")), Some(&FileDirective::Whole));
        assert_eq!(sel.get(Path::new("/p/c.py")), Some(&FileDirective::Skip));
        assert_eq!(sel.get(Path::new("/p/d.py")), Some(&FileDirective::Skip));
        assert_eq!(sel.get(Path::new("/p/e.py")), Some(&FileDirective::Skip));

        let want = PickSet::new()
            .function("load")
            .whole_class("Store")
            .methods("Cache", ["get", "put"])
            .skip_class("Old")
            .whole_class("New");
        assert_eq!(sel.get(Path::new("/p/f.py")), Some(&FileDirective::Pick(want)));
        assert_eq!(sel.len(), 6);
    }

    #[test]
    fn missing_fields_mean_nothing_wanted() {
        let sel = Selection::from_json_str(r#"{ "/p/a.py": { "functions": null, "extra": 1 } }"#).unwrap();
        assert_eq!(sel.get(Path::new("/p/a.py")), Some(&FileDirective::Pick(PickSet::new())));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(Selection::from_json_str("[]").is_err());
        assert!(Selection::from_json_str(r#"{ "/a.py": 3 }"#).is_err());
        assert!(Selection::from_json_str(r#"{ "/a.py": { "functions": "f" } }"#).is_err());
        assert!(Selection::from_json_str(r#"{ "/a.py": { "classes": { "C": 1 } } }"#).is_err());
        assert!(Selection::from_json_str(r#"{ "/a.py": { "functions": [1] } }"#).is_err());
    }

    #[test]
    fn relative_keys_are_rooted() {
        let sel = Selection::new().whole("src/a.py").whole("/abs/b.py").rooted_at(Path::new("/proj"));
        assert_eq!(sel.get(Path::new("/proj/src/a.py")), Some(&FileDirective::Whole));
        assert_eq!(sel.get(Path::new("/abs/b.py")), Some(&FileDirective::Whole));
    }
}
