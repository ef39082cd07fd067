//! Token navigation and consumption primitives.

use smol_str::SmolStr;

use crate::ast::{Identifier, Span};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::{PResult, Parser};

/// Keywords that do not end error recovery when matched: after an error,
/// reaching the next clause is not evidence that parsing is back on track.
const CLAUSE_KEYWORDS: &[TokenKind] = &[
    TokenKind::From,
    TokenKind::Let,
    TokenKind::Where,
    TokenKind::Group,
    TokenKind::Having,
    TokenKind::Order,
    TokenKind::By,
    TokenKind::Limit,
    TokenKind::Offset,
    TokenKind::Exclude,
];

impl<'source> Parser<'source> {
    /// Returns the current token. At the end of input this is the `Eof` token.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    pub(crate) fn peek_nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.current.saturating_add(n))
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.saturating_add(n).min(last)]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Checks the current token and records `kind` as acceptable here.
    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.note_expected(kind);
        self.peek_kind() == kind
    }

    pub(crate) fn at_any(&mut self, kinds: &[TokenKind]) -> bool {
        self.note_expected_all(kinds);
        kinds.contains(&self.peek_kind())
    }

    /// Consumes the current token as grammar input and returns its span.
    ///
    /// Matching anything but a clause keyword ends error recovery.
    pub(crate) fn advance(&mut self) -> Span {
        let token = self.peek();
        let span = token.span.clone();
        let kind = token.kind;
        if kind != TokenKind::Eof {
            self.current += 1;
            if !CLAUSE_KEYWORDS.contains(&kind) {
                self.recovering = false;
            }
        }
        span
    }

    /// Consumes the current token without treating it as matched input.
    pub(crate) fn skip(&mut self) {
        if !self.is_eof() {
            self.current += 1;
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume_span(&mut self, kind: TokenKind) -> Option<Span> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes `kind` or fails with an "unexpected token" error.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    /// End offset of the last consumed token.
    pub(crate) fn previous_end(&self) -> usize {
        match self.current.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end,
            None => self.peek().span.start,
        }
    }

    /// True when the current token can name something: an identifier, a
    /// quoted identifier or a non-reserved keyword.
    pub(crate) fn at_symbol(&mut self) -> bool {
        self.note_expected_all(&[TokenKind::Identifier, TokenKind::QuotedIdentifier]);
        is_symbol_kind(self.peek_kind())
    }

    pub(crate) fn parse_symbol(&mut self) -> PResult<Identifier> {
        if !self.at_symbol() {
            return Err(self.unexpected());
        }
        let token = self.peek().clone();
        self.advance();
        Ok(identifier_from_token(&token))
    }

    /// `AS name`, or a bare name when `bare` allows it.
    pub(crate) fn parse_alias(&mut self, bare: bool) -> PResult<Option<Identifier>> {
        if self.consume(TokenKind::As) {
            return self.parse_symbol().map(Some);
        }
        if bare && self.at_symbol() {
            return self.parse_symbol().map(Some);
        }
        Ok(None)
    }
}

pub(crate) fn is_symbol_kind(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Identifier | TokenKind::QuotedIdentifier)
        || kind.is_non_reserved_keyword()
}

/// Builds an identifier from a symbol token, unquoting `"..."` names.
pub(crate) fn identifier_from_token(token: &Token) -> Identifier {
    let quoted = token.kind == TokenKind::QuotedIdentifier;
    let name = if quoted {
        unquote(&token.text, '"')
    } else {
        token.text.clone()
    };
    Identifier {
        name,
        quoted,
        span: token.span.clone(),
    }
}

/// Strips the delimiters and collapses doubled delimiters.
pub(crate) fn unquote(text: &str, quote: char) -> SmolStr {
    let inner = text
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(text);
    let doubled: String = [quote, quote].iter().collect();
    SmolStr::new(inner.replace(&doubled, &quote.to_string()))
}
