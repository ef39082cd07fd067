//! Graph pattern matching: `source MATCH [selector] pattern`.
//!
//! - `element`: nodes, edges, sub-patterns and quantifiers
//! - `label`: the label algebra used after `:`

mod element;
mod label;

use tracing::debug;

use crate::ast::{
    Expression, GraphMatch, GraphPattern, Identifier, MatchSelector, Restrictor, RestrictorKind,
    SelectorKind,
};
use crate::lexer::token::TokenKind;
use crate::parser::primitives::is_symbol_kind;
use crate::parser::{PResult, Parser};

impl<'source> Parser<'source> {
    /// `MATCH [selector] pattern` applied to an already parsed source.
    ///
    /// Further patterns separated by commas are only accepted when the whole
    /// match is parenthesized; see the parenthesized primary.
    pub(crate) fn parse_graph_match(&mut self, source: Expression) -> PResult<Expression> {
        self.expect(TokenKind::Match)?;
        let selector = self.parse_match_selector()?;
        let pattern = self.parse_graph_pattern_item()?;
        let span = source.span().start..pattern.span.end;
        Ok(Expression::GraphMatch(Box::new(GraphMatch {
            source,
            selector,
            patterns: vec![pattern],
            span,
        })))
    }

    /// `ANY SHORTEST`, `ALL SHORTEST`, `ANY [k]` or `SHORTEST k [GROUP]`.
    fn parse_match_selector(&mut self) -> PResult<Option<MatchSelector>> {
        let start = self.peek().span.start;
        let kind = match (self.peek_kind(), self.peek_nth_kind(1)) {
            (TokenKind::Any, TokenKind::Shortest) => {
                self.advance();
                self.advance();
                SelectorKind::AnyShortest
            }
            (TokenKind::All, TokenKind::Shortest) => {
                self.advance();
                self.advance();
                SelectorKind::AllShortest
            }
            (TokenKind::Any, next) => {
                self.advance();
                if next == TokenKind::IntegerLiteral {
                    SelectorKind::Any(Some(self.parse_u32("path count")?))
                } else {
                    SelectorKind::Any(None)
                }
            }
            (TokenKind::Shortest, TokenKind::IntegerLiteral) => {
                self.advance();
                let k = self.parse_u32("path count")?;
                let group = self.consume(TokenKind::Group);
                SelectorKind::Shortest { k, group }
            }
            _ => {
                self.note_expected_all(&[TokenKind::Any, TokenKind::All, TokenKind::Shortest]);
                return Ok(None);
            }
        };
        Ok(Some(MatchSelector {
            kind,
            span: start..self.previous_end(),
        }))
    }

    /// `[restrictor] [p =] part part ...`
    pub(crate) fn parse_graph_pattern_item(&mut self) -> PResult<GraphPattern> {
        let start = self.peek().span.start;
        let restrictor = self.parse_restrictor();
        let variable = self.parse_path_variable()?;
        let parts = self.parse_graph_parts()?;
        Ok(GraphPattern {
            restrictor,
            variable,
            parts,
            span: start..self.previous_end(),
        })
    }

    /// `TRAIL`, `ACYCLIC` or `SIMPLE`, unless used as a path variable.
    fn parse_restrictor(&mut self) -> Option<Restrictor> {
        let kind = match self.peek_kind() {
            TokenKind::Trail => RestrictorKind::Trail,
            TokenKind::Acyclic => RestrictorKind::Acyclic,
            TokenKind::Simple => RestrictorKind::Simple,
            _ => return None,
        };
        if self.peek_nth_kind(1) == TokenKind::Eq {
            return None;
        }
        let span = self.advance();
        Some(Restrictor { kind, span })
    }

    /// `name =`
    fn parse_path_variable(&mut self) -> PResult<Option<Identifier>> {
        if !(is_symbol_kind(self.peek_kind()) && self.peek_nth_kind(1) == TokenKind::Eq) {
            return Ok(None);
        }
        let name = self.parse_symbol()?;
        self.expect(TokenKind::Eq)?;
        Ok(Some(name))
    }

    /// A comma-separated pattern list with an optional leading selector and
    /// no `MATCH` source. Each pattern recovers on its own.
    pub(crate) fn parse_standalone_patterns(
        &mut self,
    ) -> (Option<MatchSelector>, Vec<GraphPattern>) {
        let selector = match self.parse_match_selector() {
            Ok(selector) => selector,
            Err(err) => {
                self.report(err);
                None
            }
        };

        let mut patterns = Vec::new();
        loop {
            let result = self.parse_graph_pattern_item();
            match self.recover(result) {
                Ok(Some(pattern)) => patterns.push(pattern),
                Ok(None) => self.skip_to_next_pattern(),
                Err(_) => break,
            }
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }

        if !self.is_aborted() && !self.is_eof() {
            let err = self.unexpected_expecting(&[TokenKind::Comma]);
            self.report(err);
        }
        debug!(
            patterns = patterns.len(),
            selector = selector.is_some(),
            "parsed standalone graph patterns"
        );
        (selector, patterns)
    }

    /// Skips past a failed pattern, including stray closing brackets, up to
    /// the next top-level comma.
    fn skip_to_next_pattern(&mut self) {
        loop {
            self.skip_until(&[TokenKind::Comma]);
            if self.is_eof() || self.peek_kind() == TokenKind::Comma {
                break;
            }
            self.skip();
        }
    }
}
