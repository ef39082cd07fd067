//! Expression parsing.
//!
//! Operators are parsed by precedence climbing: every layer is a binding
//! power, and [`Parser::parse_bp`] loops over operators whose left binding
//! power reaches the caller's minimum, so long operator chains do not grow the
//! stack. From loosest to tightest:
//!
//! | layer                                  | binding power |
//! |----------------------------------------|---------------|
//! | `UNION` / `INTERSECT` / `EXCEPT`       | bag layer     |
//! | `OR`                                   | 1, 2          |
//! | `AND`                                  | 3, 4          |
//! | prefix `NOT`                           | 5             |
//! | comparisons, `IS`, `IN`, `LIKE`, `BETWEEN` | 5 (right side 7) |
//! | `\|\|`, `&`                            | 7, 8          |
//! | `+`, `-`                               | 9, 10         |
//! | `*`, `/`, `%`                          | 11, 12        |
//! | prefix `+`, `-`                        | 13            |
//! | path steps and `MATCH`                 | postfix       |
//!
//! The right side of a predicate binds one layer tighter than the predicate
//! itself, so `a < b < c` is `(a < b) < c` rather than a comparison chain.

use crate::ast::{
    BagOperation, BagOperator, BetweenPredicate, BinaryOperator, Collection, CollectionKind,
    Expression, InPredicate, InTarget, IsPredicate, LikePredicate, PathExpression, PathStep,
    UnaryOperator,
};
use crate::lexer::token::TokenKind;
use crate::parser::primary::PRIMARY_START;
use crate::parser::{PResult, Parser};

const OR_BP: (u8, u8) = (1, 2);
const AND_BP: (u8, u8) = (3, 4);
/// Operand of prefix `NOT`, and the left binding power of predicates.
const PREDICATE_BP: u8 = 5;
/// Right operand of comparisons, `IN` and `LIKE`: the concatenation layer.
const PREDICATE_RHS_BP: u8 = 7;
const CONCAT_BP: (u8, u8) = (7, 8);
/// Bounds of `BETWEEN`: the additive layer, so `AND` is not swallowed.
const ADDITIVE_BP: (u8, u8) = (9, 10);
const MULTIPLICATIVE_BP: (u8, u8) = (11, 12);
const UNARY_BP: u8 = 13;

/// Expression starts other than primaries; see [`PRIMARY_START`].
const PREFIX_START: &[TokenKind] = &[
    TokenKind::Not,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Select,
    TokenKind::Pivot,
];

/// Tokens that can follow a complete operand.
const INFIX_START: &[TokenKind] = &[
    TokenKind::Or,
    TokenKind::And,
    TokenKind::Eq,
    TokenKind::NotEq,
    TokenKind::BangEq,
    TokenKind::Lt,
    TokenKind::Gt,
    TokenKind::LtEq,
    TokenKind::GtEq,
    TokenKind::Is,
    TokenKind::In,
    TokenKind::Like,
    TokenKind::Between,
    TokenKind::Not,
    TokenKind::Concat,
    TokenKind::Ampersand,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Percent,
];

pub(crate) fn is_expression_start(kind: TokenKind) -> bool {
    PREFIX_START.contains(&kind)
        || PRIMARY_START.contains(&kind)
        || kind.is_non_reserved_keyword()
}

fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, (u8, u8))> {
    let op = match kind {
        TokenKind::Or => (BinaryOperator::Or, OR_BP),
        TokenKind::And => (BinaryOperator::And, AND_BP),
        TokenKind::Concat => (BinaryOperator::Concat, CONCAT_BP),
        TokenKind::Ampersand => (BinaryOperator::BitAnd, CONCAT_BP),
        TokenKind::Plus => (BinaryOperator::Add, ADDITIVE_BP),
        TokenKind::Minus => (BinaryOperator::Sub, ADDITIVE_BP),
        TokenKind::Star => (BinaryOperator::Mul, MULTIPLICATIVE_BP),
        TokenKind::Slash => (BinaryOperator::Div, MULTIPLICATIVE_BP),
        TokenKind::Percent => (BinaryOperator::Mod, MULTIPLICATIVE_BP),
        _ => return None,
    };
    Some(op)
}

fn comparison_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Eq => Some(BinaryOperator::Eq),
        TokenKind::NotEq | TokenKind::BangEq => Some(BinaryOperator::NotEq),
        TokenKind::Lt => Some(BinaryOperator::Lt),
        TokenKind::Gt => Some(BinaryOperator::Gt),
        TokenKind::LtEq => Some(BinaryOperator::LtEq),
        TokenKind::GtEq => Some(BinaryOperator::GtEq),
        _ => None,
    }
}

fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
    let span = lhs.span().start..rhs.span().end;
    Expression::Binary(op, Box::new(lhs), Box::new(rhs), span)
}

impl<'source> Parser<'source> {
    /// Parses a full expression, bag operators included.
    pub(crate) fn parse_expr(&mut self) -> PResult<Expression> {
        self.nested(Self::parse_bag_expr)
    }

    /// `lhs [OUTER] UNION|INTERSECT|EXCEPT [ALL|DISTINCT] rhs`, left-associative.
    fn parse_bag_expr(&mut self) -> PResult<Expression> {
        let mut lhs = self.parse_select_expr()?;

        loop {
            let outer = self.at(TokenKind::Outer);
            let operator_at = usize::from(outer);
            let operator = match self.peek_nth_kind(operator_at) {
                TokenKind::Union => BagOperator::Union,
                TokenKind::Intersect => BagOperator::Intersect,
                TokenKind::Except => BagOperator::Except,
                _ => {
                    if !outer {
                        self.note_expected_all(&[
                            TokenKind::Union,
                            TokenKind::Intersect,
                            TokenKind::Except,
                        ]);
                    }
                    break;
                }
            };
            if outer {
                self.advance();
            }
            self.advance();
            let quantifier = self.parse_set_quantifier();
            let rhs = self.parse_select_expr()?;
            let span = lhs.span().start..rhs.span().end;
            lhs = Expression::BagOperation(Box::new(BagOperation {
                operator,
                outer,
                quantifier,
                lhs,
                rhs,
                span,
            }));
        }

        Ok(lhs)
    }

    /// An SFW query or an operator expression, without bag operators. Clause
    /// bodies use this so that a trailing `UNION` belongs to the enclosing
    /// query.
    pub(crate) fn parse_select_expr(&mut self) -> PResult<Expression> {
        if self.at_any(&[TokenKind::Select, TokenKind::Pivot]) {
            let query = self.nested(Self::parse_select_query)?;
            return Ok(Expression::Query(Box::new(query)));
        }
        self.parse_bp(0)
    }

    /// Precedence climbing over the operator layers from `OR` down.
    pub(crate) fn parse_bp(&mut self, min_bp: u8) -> PResult<Expression> {
        let mut lhs = self.parse_prefix(min_bp)?;

        loop {
            let kind = self.peek_kind();
            if min_bp <= PREDICATE_BP && self.at_predicate() {
                lhs = self.parse_predicate(lhs)?;
                continue;
            }

            let Some((op, (l_bp, r_bp))) = binary_operator(kind) else {
                self.note_expected_all(INFIX_START);
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_bp(r_bp)?;
            lhs = binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self, min_bp: u8) -> PResult<Expression> {
        if min_bp <= PREDICATE_BP && self.at(TokenKind::Not) {
            let start = self.advance();
            let operand = self.nested(|p| p.parse_bp(PREDICATE_BP))?;
            let span = start.start..operand.span().end;
            return Ok(Expression::Unary(UnaryOperator::Not, Box::new(operand), span));
        }

        let sign = if self.at(TokenKind::Plus) {
            Some(UnaryOperator::Plus)
        } else if self.at(TokenKind::Minus) {
            Some(UnaryOperator::Minus)
        } else {
            None
        };
        if let Some(op) = sign {
            let start = self.advance();
            let operand = self.nested(|p| p.parse_bp(UNARY_BP))?;
            let span = start.start..operand.span().end;
            return Ok(Expression::Unary(op, Box::new(operand), span));
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    fn at_predicate(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Is | TokenKind::In | TokenKind::Like | TokenKind::Between => true,
            TokenKind::Not => matches!(
                self.peek_nth_kind(1),
                TokenKind::In | TokenKind::Like | TokenKind::Between
            ),
            kind => comparison_operator(kind).is_some(),
        }
    }

    fn parse_predicate(&mut self, lhs: Expression) -> PResult<Expression> {
        let start = lhs.span().start;

        if let Some(op) = comparison_operator(self.peek_kind()) {
            self.advance();
            let rhs = self.parse_bp(PREDICATE_RHS_BP)?;
            return Ok(binary(op, lhs, rhs));
        }

        if self.consume(TokenKind::Is) {
            let negated = self.consume(TokenKind::Not);
            let ty = self.parse_type()?;
            let span = start..ty.span.end;
            return Ok(Expression::Is(IsPredicate {
                operand: Box::new(lhs),
                negated,
                ty,
                span,
            }));
        }

        let negated = self.consume(TokenKind::Not);
        let operand = Box::new(lhs);
        if self.consume(TokenKind::In) {
            let target = self.parse_in_target()?;
            let span = start..target.span().end;
            Ok(Expression::In(InPredicate {
                operand,
                negated,
                target,
                span,
            }))
        } else if self.consume(TokenKind::Like) {
            let pattern = self.parse_bp(PREDICATE_RHS_BP)?;
            let escape = if self.consume(TokenKind::Escape) {
                Some(Box::new(self.parse_bp(PREDICATE_RHS_BP)?))
            } else {
                None
            };
            let end = escape.as_ref().map_or(pattern.span().end, |e| e.span().end);
            Ok(Expression::Like(LikePredicate {
                operand,
                negated,
                pattern: Box::new(pattern),
                escape,
                span: start..end,
            }))
        } else if self.consume(TokenKind::Between) {
            let low = self.parse_bp(ADDITIVE_BP.0)?;
            self.expect(TokenKind::And)?;
            let high = self.parse_bp(ADDITIVE_BP.0)?;
            let span = start..high.span().end;
            Ok(Expression::Between(BetweenPredicate {
                operand,
                negated,
                low: Box::new(low),
                high: Box::new(high),
                span,
            }))
        } else {
            Err(self.unexpected_expecting(&[TokenKind::In, TokenKind::Like, TokenKind::Between]))
        }
    }

    /// `IN ( expr )`, `IN (a, b, ...)` or any set-valued expression such as
    /// `[1, 2]`. The parenthesized operand is parsed once and the token after
    /// it decides the form.
    fn parse_in_target(&mut self) -> PResult<InTarget> {
        if !self.at(TokenKind::LParen) {
            let rhs = self.parse_bp(PREDICATE_RHS_BP)?;
            return Ok(InTarget::Expression(Box::new(rhs)));
        }
        let open = self.advance();
        let first = self.parse_expr()?;
        if !self.at(TokenKind::Comma) {
            let close = self.expect(TokenKind::RParen)?;
            return Ok(InTarget::Parenthesized(Box::new(first), open.start..close.end));
        }
        let mut elements = vec![first];
        while self.consume(TokenKind::Comma) {
            elements.push(self.parse_expr()?);
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(InTarget::Expression(Box::new(Expression::Collection(Collection {
            kind: CollectionKind::ValueList,
            elements,
            span: open.start..close.end,
        }))))
    }

    // ========================================================================
    // Postfix
    // ========================================================================

    /// Path steps `.name`, `.*`, `[expr]`, `[*]`, then an optional `MATCH`.
    fn parse_postfix(&mut self, root: Expression) -> PResult<Expression> {
        let mut steps = Vec::new();
        loop {
            if self.at(TokenKind::Dot) {
                let dot = self.advance();
                if let Some(star) = self.consume_span(TokenKind::Star) {
                    steps.push(PathStep::AllFields(dot.start..star.end));
                } else {
                    let name = self.parse_symbol()?;
                    let span = dot.start..name.span.end;
                    steps.push(PathStep::Field(name, span));
                }
            } else if self.at(TokenKind::LBracket) {
                let open = self.advance();
                if self.peek_kind() == TokenKind::Star
                    && self.peek_nth_kind(1) == TokenKind::RBracket
                {
                    self.advance();
                    let close = self.advance();
                    steps.push(PathStep::AllElements(open.start..close.end));
                } else {
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    steps.push(PathStep::Index(Box::new(index), open.start..close.end));
                }
            } else {
                break;
            }
        }

        let expr = if steps.is_empty() {
            root
        } else {
            let start = root.span().start;
            let end = steps.last().map_or(root.span().end, |step| step.span().end);
            Expression::Path(PathExpression {
                root: Box::new(root),
                steps,
                span: start..end,
            })
        };

        if self.at(TokenKind::Match) {
            return self.parse_graph_match(expr);
        }
        Ok(expr)
    }

    /// Comma-separated `item`s; at least one.
    pub(crate) fn parse_comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.consume(TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }
}
