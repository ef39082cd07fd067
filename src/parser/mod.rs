//! Recursive-descent parser for PartiQL.
//!
//! The parser consumes the significant tokens produced by the lexer and builds
//! a [`Document`]. Decisions are made with bounded lookahead where first sets
//! differ and with speculative parsing (see [`base`]) where alternatives share
//! arbitrarily long prefixes. Local failures become diagnostics and the parser
//! resynchronizes, so one pass reports every independent error. Nesting deeper
//! than [`ParseOptions::max_depth`] aborts the parse.

mod base;
mod catalog;
mod expression;
mod mutation;
mod patterns;
mod primary;
mod primitives;
mod program;
mod query;
mod recovery;
mod types;

use std::collections::BTreeSet;

use miette::Report;
use tracing::debug;

use crate::ast::{Document, GraphPattern, MatchSelector, Span};
use crate::diag::{Diag, SourceFile, convert_diagnostics_to_reports};
use crate::lexer::Lexer;
use crate::lexer::token::{Token, TokenKind};
use crate::options::ParseOptions;

pub(crate) use base::{PResult, ParseError};

/// Output of [`parse`]: the tree plus every diagnostic, in source order of
/// discovery (lexical diagnostics first).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Best-effort tree; statements that could not be parsed are left out.
    pub root: Document,
    pub diagnostics: Vec<Diag>,
    /// True when parsing stopped early at the nesting limit. The last
    /// diagnostic then describes the limit.
    pub aborted: bool,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diag::is_error)
    }

    /// Renders the diagnostics against `source` for display.
    pub fn reports(&self, source: &str) -> Vec<Report> {
        convert_diagnostics_to_reports(&self.diagnostics, &SourceFile::new(source))
    }
}

/// Output of [`parse_graph_pattern`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPatternResult {
    pub selector: Option<MatchSelector>,
    pub patterns: Vec<GraphPattern>,
    pub diagnostics: Vec<Diag>,
    pub aborted: bool,
}

/// PartiQL parser state for a single document.
pub(crate) struct Parser<'source> {
    /// Significant tokens only, always terminated by `Eof`.
    tokens: Vec<Token>,
    current: usize,
    source: &'source str,
    options: ParseOptions,
    diagnostics: Vec<Diag>,
    /// Token kinds tried at `expected_at`; feeds the expected set of errors.
    expected: BTreeSet<TokenKind>,
    expected_at: usize,
    depth: usize,
    /// Errors seen so far, including suppressed ones.
    errors: usize,
    /// Set after a reported error until a non-clause token is matched.
    recovering: bool,
    fatal: Option<ParseError>,
    /// Input covered by tokens other than whitespace, comments included.
    extent: Span,
}

impl<'source> Parser<'source> {
    /// Creates a new parser over a token stream; trivia is dropped.
    pub(crate) fn new(tokens: Vec<Token>, source: &'source str, options: ParseOptions) -> Self {
        let mut covered = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Eof));
        let first = covered.next().map(|t| t.span.clone());
        let last = covered.last().map(|t| t.span.clone()).or_else(|| first.clone());

        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.trivia).collect();
        if !matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)) {
            let eof_pos = tokens.last().map(|t| t.span.end).unwrap_or(source.len());
            tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos, ""));
        }
        let extent = match (first, last) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => {
                let eof = tokens.last().map_or(source.len(), |t| t.span.start);
                eof..eof
            }
        };

        Self {
            tokens,
            current: 0,
            source,
            options,
            diagnostics: Vec::new(),
            expected: BTreeSet::new(),
            expected_at: 0,
            depth: 0,
            errors: 0,
            recovering: false,
            fatal: None,
            extent,
        }
    }

    /// Diagnostics collected so far followed by the fatal one, if any.
    fn finish_diagnostics(&mut self, mut leading: Vec<Diag>) -> (Vec<Diag>, bool) {
        leading.append(&mut self.diagnostics);
        let aborted = match self.fatal.take() {
            Some(fatal) => {
                leading.push(*fatal);
                true
            }
            None => false,
        };
        (leading, aborted)
    }
}

/// Parses a document with default options.
///
/// ```
/// let result = partiql_parser::parse("SELECT a FROM t WHERE a > 1");
/// assert!(result.diagnostics.is_empty());
/// assert_eq!(result.root.statements.len(), 1);
/// ```
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, &ParseOptions::default())
}

/// Parses a document. Never panics on malformed input: problems are reported
/// as diagnostics next to a best-effort tree.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> ParseResult {
    let lexed = Lexer::new(source).tokenize();
    debug!(
        bytes = source.len(),
        tokens = lexed.tokens.len(),
        lex_errors = lexed.diagnostics.len(),
        "parsing document"
    );

    let mut parser = Parser::new(lexed.tokens, source, *options);
    let root = parser.parse_document();
    let (diagnostics, aborted) = parser.finish_diagnostics(lexed.diagnostics);

    debug!(
        statements = root.statements.len(),
        diagnostics = diagnostics.len(),
        aborted,
        "parsed document"
    );
    ParseResult {
        root,
        diagnostics,
        aborted,
    }
}

/// Parses a free-standing graph pattern list such as `(a)-[e]->(b)` or
/// `ANY SHORTEST (a)-(b), (c)`, without a `MATCH` source.
pub fn parse_graph_pattern(source: &str) -> GraphPatternResult {
    let lexed = Lexer::new(source).tokenize();
    let mut parser = Parser::new(lexed.tokens, source, ParseOptions::default());
    let (selector, patterns) = parser.parse_standalone_patterns();
    let (diagnostics, aborted) = parser.finish_diagnostics(lexed.diagnostics);
    debug!(
        patterns = patterns.len(),
        diagnostics = diagnostics.len(),
        "parsed graph pattern"
    );

    GraphPatternResult {
        selector,
        patterns,
        diagnostics,
        aborted,
    }
}
