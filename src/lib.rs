//! PartiQL parser with graph pattern matching and rich diagnostics.
//!
//! The parser turns a PartiQL document (queries, DML, DDL and `EXEC`
//! statements, optionally prefixed by `EXPLAIN`) into a span-tagged syntax
//! tree. Malformed input never panics: every independent syntax error is
//! reported once, with the token kinds that would have been accepted, and the
//! rest of the document is still parsed. Diagnostics render through miette.
//!
//! # Example
//!
//! ```
//! use partiql_parser::{parse, ast::StatementKind};
//!
//! let source = "SELECT p.name FROM people AS p WHERE p.age > 18";
//! let result = parse(source);
//!
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.root.statements.len(), 1);
//! assert!(matches!(result.root.statements[0].kind, StatementKind::Query(_)));
//!
//! let broken = parse("SELECT FROM t");
//! assert!(broken.has_errors());
//! assert_eq!(broken.reports("SELECT FROM t").len(), broken.diagnostics.len());
//! ```

pub mod ast;
pub mod diag;
pub mod lexer;
pub mod options;
mod parser;

pub use ast::Span;
pub use diag::{Diag, DiagLabel, DiagSeverity, LabelRole};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use parser::{GraphPatternResult, ParseResult, parse, parse_graph_pattern, parse_with_options};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _span: Span = 0..5;
        let lexed = tokenize("SELECT 1");
        assert_eq!(lexed.tokens[0].kind, TokenKind::Select);

        let result = parse_with_options("1", &ParseOptions::default());
        assert!(!result.has_errors());
        assert_eq!(ParseOptions::default().max_depth, DEFAULT_MAX_DEPTH);

        let patterns = parse_graph_pattern("(a)-[e]->(b)");
        assert!(patterns.diagnostics.is_empty());
        assert_eq!(patterns.patterns.len(), 1);
    }
}
