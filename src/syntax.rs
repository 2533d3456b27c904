// src/syntax.rs
//! Tree-sitter plumbing shared by the grammar-backed analyzers.

use tree_sitter::{Language as Grammar, Node, Parser, Tree};

use crate::error::AnalyzeError;

/// Parses `source` with `grammar`. A tree containing any error or missing
/// node is rejected; recovered trees would give untrustworthy ranges.
pub(crate) fn parse(grammar: &Grammar, name: &str, source: &str) -> Result<Tree, AnalyzeError> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|e| AnalyzeError::Setup(format!("{name} grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AnalyzeError::parse("parser returned no tree"))?;
    if tree.root_node().has_error() {
        let line = first_error_line(tree.root_node()).unwrap_or(1);
        return Err(AnalyzeError::parse(format!("syntax error near line {line}")));
    }
    Ok(tree)
}

/// 1-based first line of `node`.
pub(crate) fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// 1-based last line of `node`. A node ending at column 0 stops before that
/// row's first byte.
pub(crate) fn end_line(node: Node) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

pub(crate) fn text<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Source text of the child in `field`.
pub(crate) fn field_text<'s>(node: Node, field: &str, source: &'s str) -> Option<&'s str> {
    text(node.child_by_field_name(field)?, source)
}

/// True when `node` has a direct anonymous `async` keyword child.
pub(crate) fn has_async_keyword(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "async");
    found
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(start_line(node));
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error_line)
}
