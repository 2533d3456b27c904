// src/export.rs
//! Scan → select → bundle → write, as one call.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::{
    bundle::Bundle,
    config::Settings,
    scan::Scanner,
    selection::Selection,
    tree_view, util,
};

pub const TREE_SECTION: &str = "PROJECT TREE";

/// Outcome of an export, printed as JSON by the CLI.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub ok: bool,
    pub out_path: String,
    pub files: usize,
    pub bytes: usize,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExportReport {
    pub fn failed(out_path: &Path, err: &anyhow::Error) -> Self {
        Self {
            ok: false,
            out_path: out_path.to_string_lossy().into_owned(),
            files: 0,
            bytes: 0,
            generated_at: util::now_timestamp(),
            message: Some(format!("{err:#}")),
        }
    }
}

/// Fresh scan of `root`, then a bundle of `selection` written to
/// `<root>/<settings.output_name>`. Only the write can fail.
pub fn export(root: &Path, selection: &Selection, settings: &Settings) -> Result<ExportReport> {
    let root = util::absolute_root(root);
    let analysis = Scanner::new(settings.ignore_dirs.clone()).scan(&root);
    let selection = selection.clone().rooted_at(&root);

    let mut bundle = Bundle::build(analysis.values(), &selection, &settings.bundle_policy());
    if settings.append_tree {
        bundle = bundle.with_section(TREE_SECTION, &tree_view::render_tree(&root, &settings.ignore_dirs));
    }

    let out_path = settings.output_path(&root);
    bundle.write_to(&out_path)?;
    log::info!(
        "bundle written to {} ({} file(s), {} bytes)",
        out_path.display(),
        bundle.files(),
        bundle.text().len()
    );

    Ok(ExportReport {
        ok: true,
        out_path: out_path.to_string_lossy().into_owned(),
        files: bundle.files(),
        bytes: bundle.text().len(),
        generated_at: util::now_timestamp(),
        message: None,
    })
}
