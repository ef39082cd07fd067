//! Lexical analysis for PartiQL.
//!
//! The lexer never fails: input it cannot classify becomes an `Unrecognized`
//! token plus a diagnostic, and scanning continues. Whitespace and comments are
//! kept as trivia tokens so that concatenating every token's text reproduces the
//! source exactly.

pub mod keywords;
pub mod token;

use crate::ast::Span;
use crate::diag::Diag;
use logos::Logos;
use token::{Token, TokenKind};

/// Why a stretch of input became an `Unrecognized` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("invalid input")]
    InvalidInput,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,
    #[error("unterminated ion literal")]
    UnterminatedIonLiteral,
    #[error("unterminated comment")]
    UnterminatedComment,
}

impl LexErrorKind {
    /// Diagnostic code for this error class.
    pub fn code(self) -> &'static str {
        match self {
            LexErrorKind::InvalidInput => "L001",
            LexErrorKind::UnterminatedString => "L002",
            LexErrorKind::UnterminatedQuotedIdentifier => "L003",
            LexErrorKind::UnterminatedIonLiteral => "L004",
            LexErrorKind::UnterminatedComment => "L005",
        }
    }

    /// Classifies a failed scan by the byte it started on.
    fn classify(source: &str, start: usize) -> Self {
        let bytes = source.as_bytes();
        match bytes.get(start) {
            Some(b'\'') => LexErrorKind::UnterminatedString,
            Some(b'"') => LexErrorKind::UnterminatedQuotedIdentifier,
            Some(b'`') => LexErrorKind::UnterminatedIonLiteral,
            Some(b'/') if bytes.get(start + 1) == Some(&b'*') => LexErrorKind::UnterminatedComment,
            _ => LexErrorKind::InvalidInput,
        }
    }

    fn message(self, text: &str) -> String {
        match self {
            LexErrorKind::InvalidInput => format!("Lexing error: invalid input: {text}."),
            other => format!("Lexing error: {other}."),
        }
    }
}

/// Result of lexical analysis.
///
/// Contains both the tokens produced and any diagnostics encountered during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// Every token in source order, trivia included, ending with `Eof`.
    pub tokens: Vec<Token>,
    /// One diagnostic per `Unrecognized` token.
    pub diagnostics: Vec<Diag>,
}

impl LexerResult {
    /// Iterates over the tokens the parser consumes (trivia removed).
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| !token.trivia)
    }
}

/// A lexical analyzer for PartiQL source text.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
    /// Start of a run of invalid input not yet flushed.
    invalid_start: Option<usize>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            invalid_start: None,
        }
    }

    /// Tokenizes the source text and returns the result.
    pub fn tokenize(mut self) -> LexerResult {
        let mut lexer = TokenKind::lexer(self.source);

        while let Some(next) = lexer.next() {
            let span = lexer.span();
            match next {
                Ok(kind) => {
                    self.flush_invalid(span.start);
                    let text = lexer.slice();
                    let kind = if kind == TokenKind::Identifier {
                        keywords::lookup_keyword(text).unwrap_or(kind)
                    } else {
                        kind
                    };
                    self.tokens.push(Token::new(kind, span, text));
                }
                Err(()) => {
                    let error = LexErrorKind::classify(self.source, span.start);
                    if error == LexErrorKind::InvalidInput {
                        // Consecutive bad characters become one token.
                        self.invalid_start.get_or_insert(span.start);
                    } else {
                        self.flush_invalid(span.start);
                        self.push_unrecognized(span, error);
                    }
                }
            }
        }
        self.flush_invalid(self.source.len());

        let eof_pos = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, eof_pos..eof_pos, ""));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn flush_invalid(&mut self, end: usize) {
        if let Some(start) = self.invalid_start.take() {
            self.push_unrecognized(start..end, LexErrorKind::InvalidInput);
        }
    }

    fn push_unrecognized(&mut self, span: Span, error: LexErrorKind) {
        let text = self.source.get(span.clone()).unwrap_or("");
        self.diagnostics.push(
            Diag::error(error.message(text))
                .with_primary_label(span.clone(), error.to_string())
                .with_code(error.code()),
        );
        self.tokens.push(Token::unrecognized(span, text, error));
    }
}

/// Tokenizes PartiQL source text.
///
/// This is a convenience function equivalent to `Lexer::new(source).tokenize()`.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}
