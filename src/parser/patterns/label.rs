//! Label expressions: `|` binds loosest, then `&`, then prefix `!`.

use crate::ast::LabelExpression;
use crate::lexer::token::TokenKind;
use crate::parser::{PResult, Parser};

const OR_BP: (u8, u8) = (1, 2);
const AND_BP: (u8, u8) = (3, 4);

impl<'source> Parser<'source> {
    pub(super) fn parse_label_expression(&mut self) -> PResult<LabelExpression> {
        self.parse_label_bp(0)
    }

    fn parse_label_bp(&mut self, min_bp: u8) -> PResult<LabelExpression> {
        let mut lhs = self.parse_label_unary()?;

        loop {
            let (l_bp, r_bp) = if self.at(TokenKind::Pipe) {
                OR_BP
            } else if self.at(TokenKind::Ampersand) {
                AND_BP
            } else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            let is_or = self.advance_kind() == TokenKind::Pipe;
            let rhs = self.parse_label_bp(r_bp)?;
            let span = lhs.span().start..rhs.span().end;
            lhs = if is_or {
                LabelExpression::Or(Box::new(lhs), Box::new(rhs), span)
            } else {
                LabelExpression::And(Box::new(lhs), Box::new(rhs), span)
            };
        }

        Ok(lhs)
    }

    fn parse_label_unary(&mut self) -> PResult<LabelExpression> {
        if self.at(TokenKind::Bang) {
            let start = self.advance();
            let operand = self.nested(Self::parse_label_unary)?;
            let span = start.start..operand.span().end;
            return Ok(LabelExpression::Not(Box::new(operand), span));
        }

        self.parse_label_primary()
    }

    fn parse_label_primary(&mut self) -> PResult<LabelExpression> {
        if let Some(span) = self.consume_span(TokenKind::Percent) {
            return Ok(LabelExpression::Wildcard(span));
        }

        if self.at(TokenKind::LParen) {
            let open = self.advance();
            let inner = self.nested(Self::parse_label_expression)?;
            let close = self.expect(TokenKind::RParen)?;
            return Ok(LabelExpression::Parenthesized(
                Box::new(inner),
                open.start..close.end,
            ));
        }

        self.note_expected(TokenKind::Bang);
        self.parse_symbol().map(LabelExpression::Name)
    }

    /// Consumes the current token and returns its kind.
    fn advance_kind(&mut self) -> TokenKind {
        let kind = self.peek_kind();
        self.advance();
        kind
    }
}
