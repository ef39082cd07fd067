//! Error reporting, cascade suppression and resynchronization.

use tracing::debug;

use crate::lexer::token::TokenKind;
use crate::parser::{PResult, ParseError, Parser};

/// Token kinds that begin a top-level statement.
pub(crate) const STATEMENT_START_TOKENS: &[TokenKind] = &[
    TokenKind::Select,
    TokenKind::Pivot,
    TokenKind::Insert,
    TokenKind::Update,
    TokenKind::Delete,
    TokenKind::Upsert,
    TokenKind::Replace,
    TokenKind::Remove,
    TokenKind::Create,
    TokenKind::Drop,
    TokenKind::Exec,
    TokenKind::Explain,
];

/// Keywords that start an SFW clause; clause-level recovery stops at them.
pub(crate) const CLAUSE_START_TOKENS: &[TokenKind] = &[
    TokenKind::Exclude,
    TokenKind::From,
    TokenKind::Let,
    TokenKind::Where,
    TokenKind::Group,
    TokenKind::Having,
    TokenKind::Order,
    TokenKind::Limit,
    TokenKind::Offset,
    TokenKind::Union,
    TokenKind::Intersect,
    TokenKind::Except,
    TokenKind::Outer,
];

fn is_opener(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::LAngleAngle
    )
}

fn is_closer(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::RAngleAngle
    )
}

impl<'source> Parser<'source> {
    /// Records a syntax error.
    ///
    /// While the parser is still recovering from a previous error the
    /// diagnostic is dropped, as is any error located on an unrecognized token
    /// (the lexer already reported it). Either way the error counts, which is
    /// what speculative parsing looks at.
    pub(crate) fn report(&mut self, err: ParseError) {
        self.errors += 1;
        if self.fatal.is_some() || self.recovering {
            return;
        }
        self.recovering = true;
        if self.is_on_unrecognized(&err) {
            return;
        }
        self.diagnostics.push(*err);
    }

    fn is_on_unrecognized(&self, err: &ParseError) -> bool {
        let Some(span) = err.span() else {
            return false;
        };
        self.tokens
            .binary_search_by_key(&span.start, |token| token.span.start)
            .is_ok_and(|index| self.tokens[index].kind == TokenKind::Unrecognized)
    }

    /// Turns a local failure into a diagnostic. Fatal errors keep propagating.
    pub(crate) fn recover<T>(&mut self, result: PResult<T>) -> PResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.is_aborted() => Err(err),
            Err(err) => {
                self.report(err);
                Ok(None)
            }
        }
    }

    /// Skips tokens, keeping brackets balanced, until one of `stops` appears
    /// outside any bracket. Also stops before `;`, before a closing bracket
    /// that was opened earlier, and at end of input.
    pub(crate) fn skip_until(&mut self, stops: &[TokenKind]) {
        let start = self.current;
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof || kind == TokenKind::Semicolon {
                break;
            }
            if depth == 0 && (stops.contains(&kind) || is_closer(kind)) {
                break;
            }
            if is_opener(kind) {
                depth += 1;
            } else if is_closer(kind) {
                depth -= 1;
            }
            self.skip();
        }
        if self.current > start {
            trace_skipped(self, start);
        }
    }

    /// Skips to the end of a failed statement: a `;`, end of input, or a
    /// statement keyword outside brackets.
    pub(crate) fn synchronize_at_statement(&mut self) {
        let start = self.current;
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof || kind == TokenKind::Semicolon {
                break;
            }
            if depth == 0 && self.current > start && STATEMENT_START_TOKENS.contains(&kind) {
                break;
            }
            if is_opener(kind) {
                depth += 1;
            } else if is_closer(kind) {
                depth = depth.saturating_sub(1);
            }
            self.skip();
        }
        trace_skipped(self, start);
    }

    pub(crate) fn at_statement_start(&self) -> bool {
        STATEMENT_START_TOKENS.contains(&self.peek_kind())
    }
}

fn trace_skipped(parser: &Parser<'_>, start: usize) {
    let from = parser.tokens.get(start).map_or(0, |token| token.span.start);
    debug!(
        skipped = parser.current - start,
        from,
        to = parser.peek().span.start,
        "resynchronized after syntax error"
    );
}
