// src/error.rs

use thiserror::Error;

/// Why an analyzer produced no inventory for a file.
///
/// Callers of [`crate::analyzer::Analyzer::analyze`] never see this: every
/// variant collapses to `None` there. It exists so the reason can be logged.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse failed: {0}")]
    Parse(String),

    #[error("no top-level declarations")]
    Empty,

    #[error("analyzer setup failed: {0}")]
    Setup(String),
}

impl AnalyzeError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<syn::Error> for AnalyzeError {
    fn from(e: syn::Error) -> Self {
        let at = e.span().start();
        Self::Parse(format!("{e} at {}:{}", at.line, at.column))
    }
}

/// A selection document that doesn't have the expected shape.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid selection at {at}: {msg}")]
pub struct SelectionError {
    pub at: String,
    pub msg: String,
}

impl SelectionError {
    pub fn new(at: impl Into<String>, msg: impl Into<String>) -> Self {
        Self { at: at.into(), msg: msg.into() }
    }
}
