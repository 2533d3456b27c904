// src/python_analyzer.rs
//! Python inventory via tree-sitter. Exact ranges.
//!
//! Two levels only: module-level `def`/`async def`/`class`, and the
//! `def`s directly inside a top-level class body. Decorators are not part of
//! a range; it starts at the `def`/`class` keyword line and ends on the last
//! line of the final body statement. Comments after that statement are
//! excluded even when the grammar folds them into the block.

use std::path::Path;

use tree_sitter::Node;

use crate::{
    analyzer::{non_empty, Analyzer},
    error::AnalyzeError,
    model::{ClassDeclaration, DeclKind, Declaration, FileAnalysis, Fidelity, Language, SourceBuffer},
    syntax,
};

/// Statements whose last line is the last line of their final child block.
const COMPOUND: &[&str] = &[
    "block",
    "function_definition",
    "class_definition",
    "decorated_definition",
    "if_statement",
    "elif_clause",
    "else_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "match_statement",
    "case_clause",
];

pub struct PythonAnalyzer;

impl Analyzer for PythonAnalyzer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Exact
    }

    fn analyze_source(&self, path: &Path, source: &str) -> Result<FileAnalysis, AnalyzeError> {
        let grammar: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let tree = syntax::parse(&grammar, "python", source)?;
        let root = tree.root_node();

        let mut fa = FileAnalysis::new(SourceBuffer::new(path, self.language(), source), self.fidelity());

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let def = unwrap_decorated(child);
            let Some(name) = syntax::field_text(def, "name", source) else {
                continue;
            };
            let (start, end) = line_span(def);
            match def.kind() {
                "function_definition" => {
                    fa.functions.push(Declaration::new(name, DeclKind::function(syntax::has_async_keyword(def)), start, end));
                }
                "class_definition" => {
                    fa.classes.push(ClassDeclaration::new(name, start, end, class_methods(def, source)));
                }
                _ => {}
            }
        }

        non_empty(fa)
    }
}

/// `def`s directly in the class body; nested functions are not inventoried.
fn class_methods(class_node: Node, source: &str) -> Vec<Declaration> {
    let Some(body) = class_node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for item in body.named_children(&mut cursor) {
        let def = unwrap_decorated(item);
        if def.kind() != "function_definition" {
            continue;
        }
        if let Some(name) = syntax::field_text(def, "name", source) {
            let (start, end) = line_span(def);
            methods.push(Declaration::new(name, DeclKind::method(syntax::has_async_keyword(def)), start, end));
        }
    }
    methods
}

fn unwrap_decorated(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// 1-based inclusive (start, end) for a definition node.
fn line_span(def: Node) -> (usize, usize) {
    let start = syntax::start_line(def);
    (start, code_end_line(def).max(start))
}

/// Last line of the final non-comment statement under `node`, descending
/// through trailing compound statements. Never looks at line text, so a
/// `#` inside a string literal is just string content.
fn code_end_line(node: Node) -> usize {
    let mut cursor = node.walk();
    let last = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .last();
    match last {
        Some(child) if COMPOUND.contains(&child.kind()) => code_end_line(child),
        Some(child) => syntax::end_line(child),
        None => syntax::end_line(node),
    }
}
