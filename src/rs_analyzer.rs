// src/rs_analyzer.rs
//! Rust inventory via `syn` spans. Exact ranges.
//!
//! Free `fn` items are functions. `struct`, `enum`, `trait` and `impl`
//! blocks are classes named after their type (the self type for impls, so
//! `struct Foo` and every `impl .. Foo` share the name `Foo`); functions
//! inside traits and impls are methods. Ranges include attributes and doc
//! comments.

use std::path::Path;

use proc_macro2::Span;
use syn::{spanned::Spanned, ImplItem, Item, TraitItem};

use crate::{
    analyzer::{non_empty, Analyzer},
    error::AnalyzeError,
    model::{ClassDeclaration, DeclKind, Declaration, FileAnalysis, Fidelity, Language, SourceBuffer},
};

pub struct RustAnalyzer;

impl Analyzer for RustAnalyzer {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Exact
    }

    fn analyze_source(&self, path: &Path, source: &str) -> Result<FileAnalysis, AnalyzeError> {
        let file = syn::parse_file(source)?;
        let mut fa = FileAnalysis::new(SourceBuffer::new(path, self.language(), source), self.fidelity());

        for item in &file.items {
            let (start, end) = line_span(item.span());
            match item {
                Item::Fn(f) => {
                    let kind = DeclKind::function(f.sig.asyncness.is_some());
                    fa.functions.push(Declaration::new(f.sig.ident.to_string(), kind, start, end));
                }
                Item::Struct(s) => fa.classes.push(ClassDeclaration::new(s.ident.to_string(), start, end, Vec::new())),
                Item::Enum(e) => fa.classes.push(ClassDeclaration::new(e.ident.to_string(), start, end, Vec::new())),
                Item::Trait(t) => {
                    let methods = t
                        .items
                        .iter()
                        .filter_map(|ti| match ti {
                            TraitItem::Fn(m) => Some(method(&m.sig, m.span())),
                            _ => None,
                        })
                        .collect();
                    fa.classes.push(ClassDeclaration::new(t.ident.to_string(), start, end, methods));
                }
                Item::Impl(imp) => {
                    let Some(name) = self_type_name(&imp.self_ty) else { continue };
                    let methods = imp
                        .items
                        .iter()
                        .filter_map(|ii| match ii {
                            ImplItem::Fn(m) => Some(method(&m.sig, m.span())),
                            _ => None,
                        })
                        .collect();
                    fa.classes.push(ClassDeclaration::new(name, start, end, methods));
                }
                _ => {}
            }
        }

        non_empty(fa)
    }
}

fn method(sig: &syn::Signature, span: Span) -> Declaration {
    let (start, end) = line_span(span);
    Declaration::new(sig.ident.to_string(), DeclKind::method(sig.asyncness.is_some()), start, end)
}

fn line_span(span: Span) -> (usize, usize) {
    (span.start().line, span.end().line)
}

fn self_type_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        syn::Type::Reference(r) => self_type_name(&r.elem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"use std::fmt;

/// Adds.
pub fn add(a: i32, b: i32) -> i32 {
    a + b
}

pub struct Counter {
    n: u32,
}

impl Counter {
    pub fn new() -> Self {
        Self { n: 0 }
    }

    pub async fn tick(&mut self) {
        self.n += 1;
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.n)
    }
}

async fn run() {}
"#;

    fn analyze(src: &str) -> Result<FileAnalysis, AnalyzeError> {
        RustAnalyzer.analyze_source(Path::new("/proj/src/lib.rs"), src)
    }

    #[test]
    fn functions_include_doc_attrs() {
        let fa = analyze(SAMPLE).unwrap();
        assert_eq!(
            fa.functions,
            vec![
                Declaration::new("add", DeclKind::Function, 3, 6),
                Declaration::new("run", DeclKind::AsyncFunction, 28, 28),
            ]
        );
    }

    #[test]
    fn types_and_impls_are_classes() {
        let fa = analyze(SAMPLE).unwrap();
        let got: Vec<_> = fa
            .classes
            .iter()
            .map(|c| (c.name(), c.decl.line_start, c.decl.line_end, c.methods.len()))
            .collect();
        assert_eq!(got, vec![("Counter", 8, 10, 0), ("Counter", 12, 20, 2), ("Counter", 22, 26, 1)]);
        assert_eq!(
            fa.classes[1].methods,
            vec![
                Declaration::new("new", DeclKind::Method, 13, 15),
                Declaration::new("tick", DeclKind::AsyncMethod, 17, 19),
            ]
        );
    }

    #[test]
    fn invalid_rust_is_a_parse_failure() {
        assert!(matches!(analyze("fn broken( {"), Err(AnalyzeError::Parse(_))));
    }

    #[test]
    fn only_uses_is_empty() {
        assert!(matches!(analyze("use std::fmt;\n"), Err(AnalyzeError::Empty)));
    }
}
