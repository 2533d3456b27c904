// src/js_analyzer.rs
//! JavaScript inventory via tree-sitter. Exact ranges.
//!
//! Top level:
//! - `function` / `function*` declarations, sync or async
//! - `const|let|var name = function ...` and `name = (...) => ...` bindings
//! - `class` declarations, with their `method_definition`s as methods
//! - any of the above behind `export` / `export default`; an anonymous
//!   default export is named `default`
//!
//! A range covers the whole top-level statement, `export` keyword and
//! trailing `;` included. Methods cover their definition, modifiers included.

use std::path::Path;

use tree_sitter::Node;

use crate::{
    analyzer::{non_empty, Analyzer},
    error::AnalyzeError,
    model::{ClassDeclaration, DeclKind, Declaration, FileAnalysis, Fidelity, Language, SourceBuffer},
    syntax,
};

/// Node kinds that make a binding or default export a function.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "generator_function",
    "arrow_function",
];

const CLASS_KINDS: &[&str] = &["class_declaration", "class"];

pub struct JsAnalyzer;

impl Analyzer for JsAnalyzer {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Exact
    }

    fn analyze_source(&self, path: &Path, source: &str) -> Result<FileAnalysis, AnalyzeError> {
        let grammar: tree_sitter::Language = tree_sitter_javascript::LANGUAGE.into();
        let tree = syntax::parse(&grammar, "javascript", source)?;
        let root = tree.root_node();

        let mut fa = FileAnalysis::new(SourceBuffer::new(path, self.language(), source), self.fidelity());

        let mut cursor = root.walk();
        for stmt in root.named_children(&mut cursor) {
            collect_statement(stmt, source, &mut fa);
        }

        non_empty(fa)
    }
}

/// Adds whatever `stmt` declares. The range always comes from `stmt`, so an
/// `export` prefix stays inside the extracted text.
fn collect_statement(stmt: Node, source: &str, fa: &mut FileAnalysis) {
    let (node, fallback_name) = match stmt.kind() {
        "export_statement" => {
            if let Some(decl) = stmt.child_by_field_name("declaration") {
                (decl, None)
            } else if let Some(value) = stmt.child_by_field_name("value") {
                (value, Some("default"))
            } else {
                return;
            }
        }
        _ => (stmt, None),
    };
    let (start, end) = (syntax::start_line(stmt), syntax::end_line(stmt));

    let kind = node.kind();
    if FUNCTION_KINDS.contains(&kind) {
        if let Some(name) = syntax::field_text(node, "name", source).or(fallback_name) {
            let kind = DeclKind::function(syntax::has_async_keyword(node));
            fa.functions.push(Declaration::new(name, kind, start, end));
        }
    } else if CLASS_KINDS.contains(&kind) {
        if let Some(name) = syntax::field_text(node, "name", source).or(fallback_name) {
            fa.classes.push(ClassDeclaration::new(name, start, end, class_methods(node, source)));
        }
    } else if kind == "lexical_declaration" || kind == "variable_declaration" {
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            if !FUNCTION_KINDS.contains(&value.kind()) {
                continue;
            }
            if let Some(name) = syntax::field_text(declarator, "name", source) {
                let kind = DeclKind::function(syntax::has_async_keyword(value));
                fa.functions.push(Declaration::new(name, kind, start, end));
            }
        }
    }
}

/// `method_definition`s directly in the class body; getters, setters and
/// static methods included, field initializers not.
fn class_methods(class_node: Node, source: &str) -> Vec<Declaration> {
    let Some(body) = class_node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    let methods = body
        .named_children(&mut cursor)
        .filter(|m| m.kind() == "method_definition")
        .filter_map(|m| {
            let name = syntax::field_text(m, "name", source)?;
            let kind = DeclKind::method(syntax::has_async_keyword(m));
            Some(Declaration::new(name, kind, syntax::start_line(m), syntax::end_line(m)))
        })
        .collect();
    methods
}
