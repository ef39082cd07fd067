//! Common test utilities shared by the integration suites.
//!
//! # Diagnostic Helpers
//! - [`format_diagnostics`] - Format diagnostics for display in assertions
//! - [`assert_no_parse_errors`] - Assert that parsing produced no diagnostics
//! - [`assert_has_error_containing`] - Assert that an error message contains specific text
//!
//! # Parsing Helpers
//! - [`parse_cleanly`] - Parse source and return the document, panicking on errors
//! - [`first_query`] - Parse a single query statement and return its expression
//! - [`render`] - Fully parenthesized rendering of operator expressions
//! - [`on_large_stack`] - Run a closure on a thread with a generous stack

#![allow(dead_code)]

use partiql_parser::ast::{Document, Expression, NodeRef, StatementKind};
use partiql_parser::{Diag, ParseResult, parse};

// ============================================================================
// Diagnostic Formatting and Assertion Helpers
// ============================================================================

/// Format diagnostics for display in assertion messages.
pub fn format_diagnostics(diags: &[Diag]) -> String {
    diags
        .iter()
        .map(|diag| format!("{} {:?} {}", diag.message, diag.span(), diag.expected_summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that a parse result contains no diagnostics.
pub fn assert_no_parse_errors(result: &ParseResult, source: &str) {
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`:\n{}",
        format_diagnostics(&result.diagnostics)
    );
}

/// Assert that some diagnostic message contains `needle`.
pub fn assert_has_error_containing(result: &ParseResult, needle: &str) {
    assert!(
        result.diagnostics.iter().any(|d| d.message.contains(needle)),
        "no diagnostic containing `{needle}`:\n{}",
        format_diagnostics(&result.diagnostics)
    );
}

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Parse source and return the document, panicking on any diagnostic.
pub fn parse_cleanly(source: &str) -> Document {
    let result = parse(source);
    assert_no_parse_errors(&result, source);
    assert!(!result.aborted);
    result.root
}

/// Parse a single query statement and return its expression.
pub fn first_query(source: &str) -> Expression {
    let mut document = parse_cleanly(source);
    assert_eq!(document.statements.len(), 1, "expected one statement in `{source}`");
    match document.statements.remove(0).kind {
        StatementKind::Query(expr) => expr,
        other => panic!("expected a query in `{source}`, got {other:?}"),
    }
}

/// Renders operator structure with explicit parentheses: `(a + (b * c))`.
/// Leaves that are not operators render as their source text.
pub fn render(expr: &Expression, source: &str) -> String {
    match expr {
        Expression::Binary(op, lhs, rhs, _) => format!(
            "({} {} {})",
            render(lhs, source),
            op.as_str(),
            render(rhs, source)
        ),
        Expression::Unary(op, operand, _) => format!("({op:?} {})", render(operand, source)),
        Expression::Between(between) => format!(
            "({} BETWEEN {} AND {})",
            render(&between.operand, source),
            render(&between.low, source),
            render(&between.high, source)
        ),
        Expression::Like(like) => format!(
            "({} LIKE {})",
            render(&like.operand, source),
            render(&like.pattern, source)
        ),
        other => source[other.span()].to_string(),
    }
}

/// Every node of the tree, parents before children.
pub fn all_nodes(document: &Document) -> Vec<NodeRef<'_>> {
    let mut nodes = Vec::new();
    let mut stack = vec![NodeRef::Document(document)];
    while let Some(node) = stack.pop() {
        let mut children = node.children();
        children.reverse();
        stack.extend(children);
        nodes.push(node);
    }
    nodes
}

/// Runs `f` on a thread with a 64 MiB stack.
pub fn on_large_stack<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("failed to spawn test thread")
        .join()
        .expect("test thread panicked");
}
