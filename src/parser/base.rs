//! Expected-token bookkeeping, error construction and the backtracking oracle.
//!
//! Most grammar decisions compare the next one or two token kinds against the
//! first set of each alternative. Where alternatives share prefixes of
//! unbounded length, [`Parser::speculate`] parses one alternative from a
//! checkpoint and rewinds on failure, so a failed attempt leaves no trace in the
//! token position, the tree or the diagnostics.

use std::collections::BTreeSet;

use tracing::{trace, warn};

use crate::ast::Span;
use crate::diag::Diag;
use crate::lexer::token::TokenKind;
use crate::parser::Parser;

/// Error raised by grammar functions.
pub type ParseError = Box<Diag>;

/// Result type of grammar functions.
pub type PResult<T> = Result<T, ParseError>;

/// One alternative at a decision point: the token kinds it can start with and
/// the function that parses it.
pub(crate) struct Alternative<'source, T> {
    pub(crate) first: &'static [TokenKind],
    pub(crate) parse: fn(&mut Parser<'source>) -> PResult<T>,
}

/// Saved parser state for rewinding a speculative attempt.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    position: usize,
    diagnostics: usize,
    errors: usize,
    recovering: bool,
}

impl<'source> Parser<'source> {
    // ========================================================================
    // Expected kinds
    // ========================================================================

    /// Records `kind` as acceptable at the current position.
    pub(crate) fn note_expected(&mut self, kind: TokenKind) {
        if self.expected_at != self.current {
            self.expected.clear();
            self.expected_at = self.current;
        }
        self.expected.insert(kind);
    }

    pub(crate) fn note_expected_all(&mut self, kinds: &[TokenKind]) {
        for &kind in kinds {
            self.note_expected(kind);
        }
    }

    /// Kinds recorded at the current position.
    fn expected_here(&self) -> BTreeSet<TokenKind> {
        if self.expected_at == self.current {
            self.expected.clone()
        } else {
            BTreeSet::new()
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// "Unexpected token" at the current position, carrying every kind that
    /// was tried here.
    pub(crate) fn unexpected(&self) -> ParseError {
        let token = self.peek();
        let diag = if token.kind == TokenKind::Eof {
            Diag::error("Unexpected end of input.")
                .with_primary_label(token.span.clone(), "input ends here")
                .with_code("P002")
        } else {
            Diag::error(format!("Unexpected token '{}'.", token.text))
                .with_primary_label(token.span.clone(), format!("unexpected {}", token.kind))
                .with_code("P001")
        };
        Box::new(diag.with_expected(self.expected_here()))
    }

    /// Like [`Parser::unexpected`], with `kinds` added to the expected set.
    pub(crate) fn unexpected_expecting(&mut self, kinds: &[TokenKind]) -> ParseError {
        self.note_expected_all(kinds);
        self.unexpected()
    }

    /// A token of the right kind whose value is out of range or ill-formed.
    pub(crate) fn invalid(&self, what: &str, span: Span) -> ParseError {
        let text = self.source.get(span.clone()).unwrap_or_default();
        Box::new(
            Diag::error(format!("Syntax Error: invalid {what} '{text}'."))
                .with_primary_label(span, format!("invalid {what}"))
                .with_code("P005"),
        )
    }

    /// No alternative of `construct` can start with the token at `lookahead`.
    pub(crate) fn no_viable_alternative(
        &self,
        construct: &str,
        lookahead: usize,
        first: impl IntoIterator<Item = TokenKind>,
    ) -> ParseError {
        let token = self.peek_nth(lookahead);
        Box::new(
            Diag::error(format!(
                "Syntax Error: no viable alternative for {construct}."
            ))
            .with_primary_label(token.span.clone(), format!("unexpected {}", token.kind))
            .with_code("P003")
            .with_expected(first),
        )
    }

    /// Records the fatal nesting error and returns it.
    fn recursion_limit(&mut self) -> ParseError {
        let limit = self.options.max_depth;
        let span = self.peek().span.clone();
        warn!(limit, offset = span.start, "recursion limit exceeded, aborting parse");
        let fatal = Box::new(
            Diag::error(format!(
                "Recursion limit exceeded: nesting deeper than {limit} levels."
            ))
            .with_primary_label(span, "nesting limit reached here")
            .with_code("P004"),
        );
        self.fatal = Some(fatal.clone());
        fatal
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.fatal.is_some()
    }

    /// Runs `parse` one nesting level deeper, failing fatally past the
    /// configured maximum depth.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if let Some(fatal) = &self.fatal {
            return Err(fatal.clone());
        }
        if self.depth >= self.options.max_depth {
            return Err(self.recursion_limit());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.current,
            diagnostics: self.diagnostics.len(),
            errors: self.errors,
            recovering: self.recovering,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        trace!(
            from = self.current,
            to = checkpoint.position,
            "rewinding speculative parse"
        );
        self.current = checkpoint.position;
        self.diagnostics.truncate(checkpoint.diagnostics);
        self.errors = checkpoint.errors;
        self.recovering = checkpoint.recovering;
    }

    /// Parses with `parse` from a checkpoint. An attempt fails when it returns
    /// an error or recovers from one internally; the parser is then rewound.
    pub(crate) fn speculate<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let checkpoint = self.checkpoint();
        let result = parse(self);
        if let Some(fatal) = &self.fatal {
            return Err(fatal.clone());
        }
        match result {
            Ok(value) if self.errors == checkpoint.errors => Ok(value),
            Ok(_) => {
                let err = match self.diagnostics.get(checkpoint.diagnostics) {
                    Some(diag) => Box::new(diag.clone()),
                    None => self.unexpected(),
                };
                self.rewind(checkpoint);
                Err(err)
            }
            Err(err) => {
                self.rewind(checkpoint);
                Err(err)
            }
        }
    }

    /// Tries, in order, each alternative whose first set admits the token at
    /// `lookahead`, committing to the first that parses cleanly.
    ///
    /// When every viable alternative fails, the error that got furthest into
    /// the input wins; errors at the same offset merge their expected sets.
    pub(crate) fn alternatives<T>(
        &mut self,
        construct: &str,
        lookahead: usize,
        alternatives: &[Alternative<'source, T>],
    ) -> PResult<T> {
        let kind = self.peek_nth_kind(lookahead);
        let mut furthest: Option<ParseError> = None;

        for alternative in alternatives.iter().filter(|alt| alt.first.contains(&kind)) {
            let err = match self.speculate(alternative.parse) {
                Ok(value) => return Ok(value),
                Err(err) if self.is_aborted() => return Err(err),
                Err(err) => err,
            };
            furthest = Some(match furthest {
                None => err,
                Some(best) => pick_furthest(best, err),
            });
        }

        match furthest {
            Some(err) => Err(err),
            None => {
                let first: BTreeSet<TokenKind> = alternatives
                    .iter()
                    .flat_map(|alt| alt.first.iter().copied())
                    .collect();
                Err(self.no_viable_alternative(construct, lookahead, first))
            }
        }
    }
}

fn pick_furthest(best: ParseError, candidate: ParseError) -> ParseError {
    let offset = |err: &ParseError| err.span().map_or(0, |span| span.start);
    match offset(&candidate).cmp(&offset(&best)) {
        std::cmp::Ordering::Greater => candidate,
        std::cmp::Ordering::Less => best,
        std::cmp::Ordering::Equal => {
            let expected = candidate.expected.clone();
            Box::new((*best).with_expected(expected))
        }
    }
}
