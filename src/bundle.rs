// src/bundle.rs
//! Bundle builder: selected declarations of many files → one text artifact.
//!
//! Layout (before normalization), blocks joined by a blank line:
//! ```text
//! # FILE /abs/path/a.py
//! <whole file, or each selected function / whole class>
//! # METHOD Store.get
//! <method body>
//! ```
//! The joined text is normalized (see [`slice::normalize`]) and written in a
//! single write, replacing whatever was at the output path.

use anyhow::{Context, Result};
use std::{collections::BTreeSet, fs, path::Path};

use crate::{
    model::{ClassDeclaration, FileAnalysis, Language},
    selection::{ClassPick, FileDirective, PickSet, Selection},
    slice,
};

pub const FILE_HEADER: &str = "# FILE";

/// Rules that override per-declaration selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BundlePolicy {
    /// Non-function-addressable languages: a selected file of one of these
    /// languages is always bundled whole, whatever was picked from it.
    pub always_whole: BTreeSet<Language>,
}

impl BundlePolicy {
    pub fn always_whole(langs: impl IntoIterator<Item = Language>) -> Self {
        Self { always_whole: langs.into_iter().collect() }
    }

    pub fn bundles_whole(&self, lang: Language) -> bool {
        self.always_whole.contains(&lang)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bundle {
    text: String,
    files: usize,
}

impl Bundle {
    /// Walks `analyses` in the given order; files without a directive, or
    /// with a skip directive, contribute nothing (not even a header).
    /// Names that match nothing are ignored.
    pub fn build<'a>(
        analyses: impl IntoIterator<Item = &'a FileAnalysis>,
        selection: &Selection,
        policy: &BundlePolicy,
    ) -> Self {
        let mut blocks: Vec<String> = Vec::new();
        let mut files = 0usize;

        for fa in analyses {
            let picks = match selection.get(fa.path()) {
                None | Some(FileDirective::Skip) => continue,
                Some(FileDirective::Whole) => None,
                Some(FileDirective::Pick(p)) => Some(p),
            };
            files += 1;
            blocks.push(format!("{FILE_HEADER} {}", fa.path().display()));

            match picks {
                Some(p) if !policy.bundles_whole(fa.language()) => picked_blocks(fa, p, &mut blocks),
                _ => blocks.push(fa.source.full_text()),
            }
        }

        Self {
            text: slice::normalize(&blocks.join("\n\n")),
            files,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of files that contributed a header.
    pub fn files(&self) -> usize {
        self.files
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends a titled section after the bundle body (e.g. the project tree).
    pub fn with_section(mut self, title: &str, body: &str) -> Self {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str("# ");
        self.text.push_str(title);
        self.text.push('\n');
        self.text.push_str(body);
        self
    }

    /// Single write; an existing file is overwritten.
    pub fn write_to(&self, out_path: &Path) -> Result<()> {
        fs::write(out_path, &self.text)
            .with_context(|| format!("writing bundle {}", out_path.display()))
    }
}

/// `build(analyses, selection, out_path)`: build and write in one go.
pub fn write_bundle<'a>(
    analyses: impl IntoIterator<Item = &'a FileAnalysis>,
    selection: &Selection,
    policy: &BundlePolicy,
    out_path: &Path,
) -> Result<Bundle> {
    let bundle = Bundle::build(analyses, selection, policy);
    bundle.write_to(out_path)?;
    Ok(bundle)
}

fn picked_blocks(fa: &FileAnalysis, picks: &PickSet, blocks: &mut Vec<String>) {
    for f in fa.functions.iter().filter(|f| picks.functions.contains(&f.name)) {
        blocks.push(fa.source.extract_decl(f));
    }
    for class in &fa.classes {
        match picks.classes.get(class.name()) {
            None | Some(ClassPick::Skip) => {}
            Some(ClassPick::Whole) => blocks.push(fa.source.extract_decl(&class.decl)),
            Some(ClassPick::Methods(wanted)) => method_blocks(fa, class, wanted, blocks),
        }
    }
}

fn method_blocks(fa: &FileAnalysis, class: &ClassDeclaration, wanted: &BTreeSet<String>, blocks: &mut Vec<String>) {
    for m in class.methods.iter().filter(|m| wanted.contains(&m.name)) {
        blocks.push(format!(
            "# {} {}.{}\n{}",
            m.kind.as_str().to_ascii_uppercase(),
            class.name(),
            m.name,
            fa.source.extract_decl(m)
        ));
    }
}
