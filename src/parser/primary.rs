//! Primary expressions: literals, names, calls, special forms and
//! constructors.

use smol_str::SmolStr;

use crate::ast::{
    AggregateCall, AggregateFunction, CaseExpression, CastExpression, CastKind, Collection,
    CollectionKind, Expression, FunctionCall, Identifier, InTarget, Literal, LiteralKind,
    SpecialForm, SpecialFormKind, StructConstructor, StructField, ValueRow, ValuesConstructor,
    VariableReference, WhenBranch, WindowCall, WindowFunction, WindowSpecification,
};
use crate::lexer::keywords::keyword_text;
use crate::lexer::token::TokenKind;
use crate::parser::primitives::{identifier_from_token, is_symbol_kind};
use crate::parser::{PResult, Parser};

/// Tokens that can begin a primary expression.
pub(crate) const PRIMARY_START: &[TokenKind] = &[
    TokenKind::StringLiteral,
    TokenKind::IntegerLiteral,
    TokenKind::DecimalLiteral,
    TokenKind::IonLiteral,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
    TokenKind::Missing,
    TokenKind::Identifier,
    TokenKind::QuotedIdentifier,
    TokenKind::Question,
    TokenKind::AtSign,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::LAngleAngle,
    TokenKind::LBrace,
    TokenKind::Values,
    TokenKind::Case,
    TokenKind::Cast,
    TokenKind::CanCast,
    TokenKind::CanLosslessCast,
    TokenKind::Date,
    TokenKind::Time,
    TokenKind::Nullif,
    TokenKind::Coalesce,
    TokenKind::Substring,
    TokenKind::Position,
    TokenKind::Overlay,
    TokenKind::Extract,
    TokenKind::Trim,
    TokenKind::DateAdd,
    TokenKind::DateDiff,
    TokenKind::List,
    TokenKind::Sexp,
    TokenKind::Count,
    TokenKind::Max,
    TokenKind::Min,
    TokenKind::Sum,
    TokenKind::Avg,
    TokenKind::Every,
    TokenKind::Any,
    TokenKind::Some,
    TokenKind::Lag,
    TokenKind::Lead,
    TokenKind::Upper,
    TokenKind::Lower,
    TokenKind::Size,
    TokenKind::Exists,
    TokenKind::CharLength,
    TokenKind::CharacterLength,
    TokenKind::OctetLength,
    TokenKind::BitLength,
];

/// Reserved words that are called like ordinary functions.
fn is_reserved_function(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Upper
            | TokenKind::Lower
            | TokenKind::Size
            | TokenKind::Exists
            | TokenKind::CharLength
            | TokenKind::CharacterLength
            | TokenKind::OctetLength
            | TokenKind::BitLength
    )
}

fn aggregate_function(kind: TokenKind) -> Option<AggregateFunction> {
    let function = match kind {
        TokenKind::Count => AggregateFunction::Count,
        TokenKind::Max => AggregateFunction::Max,
        TokenKind::Min => AggregateFunction::Min,
        TokenKind::Sum => AggregateFunction::Sum,
        TokenKind::Avg => AggregateFunction::Avg,
        TokenKind::Every => AggregateFunction::Every,
        TokenKind::Any => AggregateFunction::Any,
        TokenKind::Some => AggregateFunction::Some,
        _ => return None,
    };
    Some(function)
}

pub(crate) fn literal_kind(kind: TokenKind) -> Option<LiteralKind> {
    let literal = match kind {
        TokenKind::StringLiteral => LiteralKind::String,
        TokenKind::IntegerLiteral => LiteralKind::Integer,
        TokenKind::DecimalLiteral => LiteralKind::Decimal,
        TokenKind::IonLiteral => LiteralKind::Ion,
        TokenKind::True => LiteralKind::Boolean(true),
        TokenKind::False => LiteralKind::Boolean(false),
        TokenKind::Null => LiteralKind::Null,
        TokenKind::Missing => LiteralKind::Missing,
        _ => return None,
    };
    Some(literal)
}

impl<'source> Parser<'source> {
    pub(crate) fn parse_primary(&mut self) -> PResult<Expression> {
        let kind = self.peek_kind();

        if let Some(literal) = literal_kind(kind) {
            return self.parse_literal(literal);
        }
        if let Some(function) = aggregate_function(kind) {
            return self.parse_aggregate(function);
        }
        if is_reserved_function(kind) {
            return self.parse_function_call();
        }
        if is_symbol_kind(kind) {
            return self.parse_name();
        }

        match kind {
            TokenKind::Question => Ok(Expression::Parameter(self.advance())),
            TokenKind::AtSign => self.parse_local_reference(),
            TokenKind::LParen => self.parse_parenthesized(),
            TokenKind::LBracket => {
                self.parse_collection(CollectionKind::Array, TokenKind::RBracket)
            }
            TokenKind::LAngleAngle => {
                self.parse_collection(CollectionKind::Bag, TokenKind::RAngleAngle)
            }
            TokenKind::List => self.parse_collection(CollectionKind::List, TokenKind::RParen),
            TokenKind::Sexp => self.parse_collection(CollectionKind::Sexp, TokenKind::RParen),
            TokenKind::LBrace => self.parse_struct(),
            TokenKind::Values => self.parse_values(),
            TokenKind::Case => self.parse_case(),
            TokenKind::Cast => self.parse_cast(CastKind::Cast),
            TokenKind::CanCast => self.parse_cast(CastKind::CanCast),
            TokenKind::CanLosslessCast => self.parse_cast(CastKind::CanLosslessCast),
            TokenKind::Date => self.parse_date_literal(),
            TokenKind::Time => self.parse_time_literal(),
            TokenKind::Lag => self.parse_window(WindowFunction::Lag),
            TokenKind::Lead => self.parse_window(WindowFunction::Lead),
            TokenKind::Nullif => self.parse_nullif(),
            TokenKind::Coalesce => self.parse_coalesce(),
            TokenKind::Substring => self.parse_substring(),
            TokenKind::Position => self.parse_position(),
            TokenKind::Overlay => self.parse_overlay(),
            TokenKind::Extract => self.parse_extract(),
            TokenKind::Trim => self.parse_trim(),
            TokenKind::DateAdd | TokenKind::DateDiff => self.parse_date_arithmetic(kind),
            _ => Err(self.unexpected_expecting(PRIMARY_START)),
        }
    }

    // ========================================================================
    // Literals and names
    // ========================================================================

    fn parse_literal(&mut self, kind: LiteralKind) -> PResult<Expression> {
        let text = self.peek().text.clone();
        let span = self.advance();
        Ok(Expression::Literal(Literal { kind, text, span }))
    }

    /// `DATE 'yyyy-mm-dd'`
    fn parse_date_literal(&mut self) -> PResult<Expression> {
        let start = self.advance();
        let text = self.peek().text.clone();
        let end = self.expect(TokenKind::StringLiteral)?;
        Ok(Expression::Literal(Literal {
            kind: LiteralKind::Date,
            text,
            span: start.start..end.end,
        }))
    }

    /// `TIME [(p)] [WITH TIME ZONE] 'hh:mm:ss'`
    fn parse_time_literal(&mut self) -> PResult<Expression> {
        let start = self.advance();
        let (precision, with_time_zone) = self.parse_time_suffix()?;
        let text = self.peek().text.clone();
        let end = self.expect(TokenKind::StringLiteral)?;
        Ok(Expression::Literal(Literal {
            kind: LiteralKind::Time {
                precision,
                with_time_zone,
            },
            text,
            span: start.start..end.end,
        }))
    }

    /// A variable reference, or a call when an unquoted name is followed by
    /// `(`.
    fn parse_name(&mut self) -> PResult<Expression> {
        if self.peek_kind() != TokenKind::QuotedIdentifier
            && self.peek_nth_kind(1) == TokenKind::LParen
        {
            return self.parse_function_call();
        }
        let name = self.parse_symbol()?;
        let span = name.span.clone();
        Ok(Expression::VariableReference(VariableReference {
            name,
            local: false,
            span,
        }))
    }

    /// `@name`
    fn parse_local_reference(&mut self) -> PResult<Expression> {
        let at = self.advance();
        let name = self.parse_symbol()?;
        let span = at.start..name.span.end;
        Ok(Expression::VariableReference(VariableReference {
            name,
            local: true,
            span,
        }))
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `name ( [arg, ...] )`; reserved function words keep their canonical
    /// spelling as the name.
    fn parse_function_call(&mut self) -> PResult<Expression> {
        let token = self.peek().clone();
        self.advance();
        let name = match keyword_text(token.kind).filter(|_| token.kind.is_reserved_keyword()) {
            Some(text) => Identifier {
                name: SmolStr::new(text),
                quoted: false,
                span: token.span.clone(),
            },
            None => identifier_from_token(&token),
        };
        self.expect(TokenKind::LParen)?;
        let arguments = self.parse_arguments_until(TokenKind::RParen)?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(Expression::FunctionCall(FunctionCall {
            name,
            arguments,
            span: token.span.start..close.end,
        }))
    }

    /// Possibly empty comma-separated expressions ending before `close`.
    fn parse_arguments_until(&mut self, close: TokenKind) -> PResult<Vec<Expression>> {
        if self.at(close) {
            return Ok(Vec::new());
        }
        self.parse_comma_list(Self::parse_expr)
    }

    /// `COUNT(*)` or `fn([ALL|DISTINCT] expr)`
    fn parse_aggregate(&mut self, function: AggregateFunction) -> PResult<Expression> {
        let start = self.advance();
        self.expect(TokenKind::LParen)?;
        let (quantifier, argument) =
            if function == AggregateFunction::Count && self.consume(TokenKind::Star) {
                (None, None)
            } else {
                let quantifier = self.parse_set_quantifier();
                (quantifier, Some(Box::new(self.parse_expr()?)))
            };
        let close = self.expect(TokenKind::RParen)?;
        Ok(Expression::Aggregate(AggregateCall {
            function,
            quantifier,
            argument,
            span: start.start..close.end,
        }))
    }

    /// `LAG(args) OVER ([PARTITION BY expr, ...] [ORDER BY spec, ...])`
    fn parse_window(&mut self, function: WindowFunction) -> PResult<Expression> {
        let start = self.advance();
        self.expect(TokenKind::LParen)?;
        let arguments = self.parse_comma_list(Self::parse_expr)?;
        self.expect(TokenKind::RParen)?;

        let over = self.expect(TokenKind::Over)?;
        self.expect(TokenKind::LParen)?;
        let partition_by = if self.consume(TokenKind::Partition) {
            self.expect(TokenKind::By)?;
            self.parse_comma_list(Self::parse_expr)?
        } else {
            Vec::new()
        };
        let order_by = if self.consume(TokenKind::Order) {
            self.expect(TokenKind::By)?;
            self.parse_comma_list(Self::parse_order_spec)?
        } else {
            Vec::new()
        };
        let close = self.expect(TokenKind::RParen)?;

        Ok(Expression::Window(WindowCall {
            function,
            arguments,
            over: WindowSpecification {
                partition_by,
                order_by,
                span: over.start..close.end,
            },
            span: start.start..close.end,
        }))
    }

    /// `CAST(expr AS type)` and its `CAN_CAST` variants.
    fn parse_cast(&mut self, kind: CastKind) -> PResult<Expression> {
        let start = self.advance();
        self.expect(TokenKind::LParen)?;
        let operand = self.parse_expr()?;
        self.expect(TokenKind::As)?;
        let target = self.parse_type()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(Expression::Cast(CastExpression {
            kind,
            operand: Box::new(operand),
            target,
            span: start.start..close.end,
        }))
    }

    fn parse_case(&mut self) -> PResult<Expression> {
        let start = self.advance();
        let operand = if self.at(TokenKind::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut branches = Vec::new();
        while let Some(when) = self.consume_span(TokenKind::When) {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let result = self.parse_expr()?;
            let span = when.start..result.span().end;
            branches.push(WhenBranch {
                condition,
                result,
                span,
            });
        }
        if branches.is_empty() {
            return Err(self.unexpected());
        }

        let else_result = if self.consume(TokenKind::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = self.expect(TokenKind::End)?;

        Ok(Expression::Case(CaseExpression {
            operand,
            branches,
            else_result,
            span: start.start..end.end,
        }))
    }

    // ========================================================================
    // Special forms
    // ========================================================================

    /// Parses `KEYWORD ( body )` and wraps the body in a special form.
    fn parse_special(
        &mut self,
        body: impl FnOnce(&mut Self) -> PResult<SpecialFormKind>,
    ) -> PResult<Expression> {
        let start = self.advance();
        self.expect(TokenKind::LParen)?;
        let kind = body(self)?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(Expression::Special(SpecialForm {
            kind,
            span: start.start..close.end,
        }))
    }

    fn parse_nullif(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let lhs = p.parse_expr()?;
            p.expect(TokenKind::Comma)?;
            let rhs = p.parse_expr()?;
            Ok(SpecialFormKind::NullIf(Box::new(lhs), Box::new(rhs)))
        })
    }

    fn parse_coalesce(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            p.parse_comma_list(Self::parse_expr)
                .map(SpecialFormKind::Coalesce)
        })
    }

    /// `SUBSTRING(s [, start [, len]])` or `SUBSTRING(s [FROM start [FOR len]])`
    fn parse_substring(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let value = Box::new(p.parse_expr()?);
            let (separator, length_separator) = if p.at(TokenKind::Comma) {
                (TokenKind::Comma, TokenKind::Comma)
            } else {
                (TokenKind::From, TokenKind::For)
            };
            let mut start = None;
            let mut length = None;
            if p.consume(separator) {
                start = Some(Box::new(p.parse_expr()?));
                if p.consume(length_separator) {
                    length = Some(Box::new(p.parse_expr()?));
                }
            }
            Ok(SpecialFormKind::Substring {
                value,
                start,
                length,
            })
        })
    }

    /// `POSITION(needle, haystack)` or `POSITION(needle IN haystack)`.
    ///
    /// The operand is parsed once. Without a comma it must be an `IN`
    /// predicate, which is split into needle and haystack.
    fn parse_position(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let mut needle = p.parse_expr()?;
            if p.consume(TokenKind::Comma) {
                let haystack = p.parse_expr()?;
                return Ok(SpecialFormKind::Position {
                    needle: Box::new(needle),
                    haystack: Box::new(haystack),
                });
            }
            match split_in_predicate(&mut needle) {
                Some((needle, haystack)) => Ok(SpecialFormKind::Position {
                    needle: Box::new(needle),
                    haystack: Box::new(haystack),
                }),
                None => Err(p.unexpected_expecting(&[TokenKind::Comma, TokenKind::In])),
            }
        })
    }

    /// `OVERLAY(s PLACING r FROM start [FOR len])` or
    /// `OVERLAY(s, r, start [, len])`
    fn parse_overlay(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let value = Box::new(p.parse_expr()?);
            let keyword_form = p.consume(TokenKind::Placing);
            if !keyword_form {
                p.expect(TokenKind::Comma)?;
            }
            let placing = Box::new(p.parse_expr()?);
            p.expect(if keyword_form {
                TokenKind::From
            } else {
                TokenKind::Comma
            })?;
            let start = Box::new(p.parse_expr()?);
            let length_separator = if keyword_form {
                TokenKind::For
            } else {
                TokenKind::Comma
            };
            let length = if p.consume(length_separator) {
                Some(Box::new(p.parse_expr()?))
            } else {
                None
            };
            Ok(SpecialFormKind::Overlay {
                value,
                placing,
                start,
                length,
            })
        })
    }

    /// `EXTRACT(field FROM source)`
    fn parse_extract(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let field = p.parse_symbol()?;
            p.expect(TokenKind::From)?;
            let source = p.parse_expr()?;
            Ok(SpecialFormKind::Extract {
                field,
                source: Box::new(source),
            })
        })
    }

    /// `TRIM([BOTH|LEADING|TRAILING] [chars] FROM target)` or `TRIM(target)`
    fn parse_trim(&mut self) -> PResult<Expression> {
        self.parse_special(|p| {
            let specification = if p.at_trim_specification() {
                Some(p.parse_symbol()?)
            } else {
                None
            };
            let characters = if p.at(TokenKind::From) {
                None
            } else {
                Some(Box::new(p.parse_expr()?))
            };

            if p.consume(TokenKind::From) {
                let target = Box::new(p.parse_expr()?);
                return Ok(SpecialFormKind::Trim {
                    specification,
                    characters,
                    target,
                });
            }
            match (specification, characters) {
                (None, Some(target)) => Ok(SpecialFormKind::Trim {
                    specification: None,
                    characters: None,
                    target,
                }),
                _ => Err(p.unexpected()),
            }
        })
    }

    fn at_trim_specification(&self) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier
            && ["BOTH", "LEADING", "TRAILING"]
                .iter()
                .any(|spec| token.text.eq_ignore_ascii_case(spec))
            && self.peek_nth_kind(1) != TokenKind::RParen
    }

    /// `DATE_ADD(field, amount, target)` and `DATE_DIFF(field, from, to)`
    fn parse_date_arithmetic(&mut self, kind: TokenKind) -> PResult<Expression> {
        self.parse_special(|p| {
            let field = p.parse_symbol()?;
            p.expect(TokenKind::Comma)?;
            let first = Box::new(p.parse_expr()?);
            p.expect(TokenKind::Comma)?;
            let second = Box::new(p.parse_expr()?);
            Ok(if kind == TokenKind::DateAdd {
                SpecialFormKind::DateAdd {
                    field,
                    amount: first,
                    target: second,
                }
            } else {
                SpecialFormKind::DateDiff {
                    field,
                    from: first,
                    to: second,
                }
            })
        })
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// `[a, b]`, `<<a, b>>`, `LIST(a, b)` or `SEXP(a, b)`; all may be empty.
    fn parse_collection(&mut self, kind: CollectionKind, close: TokenKind) -> PResult<Expression> {
        let start = self.advance();
        if matches!(kind, CollectionKind::List | CollectionKind::Sexp) {
            self.expect(TokenKind::LParen)?;
        }
        let elements = self.parse_arguments_until(close)?;
        let end = self.expect(close)?;
        Ok(Expression::Collection(Collection {
            kind,
            elements,
            span: start.start..end.end,
        }))
    }

    /// `{ key: value, ... }`
    fn parse_struct(&mut self) -> PResult<Expression> {
        let open = self.advance();
        let fields = if self.at(TokenKind::RBrace) {
            Vec::new()
        } else {
            self.parse_comma_list(|p| {
                let key = p.parse_expr()?;
                p.expect(TokenKind::Colon)?;
                let value = p.parse_expr()?;
                let span = key.span().start..value.span().end;
                Ok(StructField { key, value, span })
            })?
        };
        let close = self.expect(TokenKind::RBrace)?;
        Ok(Expression::Struct(StructConstructor {
            fields,
            span: open.start..close.end,
        }))
    }

    /// `VALUES (a, b), (c, d)`
    fn parse_values(&mut self) -> PResult<Expression> {
        let start = self.advance();
        let rows = self.parse_comma_list(|p| {
            let open = p.expect(TokenKind::LParen)?;
            let values = p.parse_comma_list(Self::parse_expr)?;
            let close = p.expect(TokenKind::RParen)?;
            Ok(ValueRow {
                values,
                span: open.start..close.end,
            })
        })?;
        Ok(Expression::Values(ValuesConstructor {
            rows,
            span: start.start..self.previous_end(),
        }))
    }

    /// `( expr )`, a value list `(a, b)`, or `( g MATCH p1, p2 )` where the
    /// commas continue the pattern list.
    fn parse_parenthesized(&mut self) -> PResult<Expression> {
        let open = self.advance();
        let mut inner = self.parse_expr()?;

        if let Expression::GraphMatch(graph_match) = &mut inner {
            while self.consume(TokenKind::Comma) {
                let pattern = self.parse_graph_pattern_item()?;
                graph_match.span.end = pattern.span.end;
                graph_match.patterns.push(pattern);
            }
        } else if self.at(TokenKind::Comma) {
            let mut elements = vec![inner];
            while self.consume(TokenKind::Comma) {
                elements.push(self.parse_expr()?);
            }
            let close = self.expect(TokenKind::RParen)?;
            return Ok(Expression::Collection(Collection {
                kind: CollectionKind::ValueList,
                elements,
                span: open.start..close.end,
            }));
        }

        let close = self.expect(TokenKind::RParen)?;
        Ok(Expression::Parenthesized(
            Box::new(inner),
            open.start..close.end,
        ))
    }
}

/// Takes `a IN b` apart into `(a, b)`. Negated predicates do not split.
fn split_in_predicate(expr: &mut Expression) -> Option<(Expression, Expression)> {
    let Expression::In(predicate) = expr else {
        return None;
    };
    if predicate.negated {
        return None;
    }
    let needle = Expression::take(&mut predicate.operand);
    let placeholder = InTarget::Expression(Box::new(Expression::Parameter(0..0)));
    let haystack = match std::mem::replace(&mut predicate.target, placeholder) {
        InTarget::Parenthesized(inner, span) => Expression::Parenthesized(inner, span),
        InTarget::Expression(rhs) => *rhs,
    };
    Some((needle, haystack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SetQuantifier;
    use crate::lexer::tokenize;
    use crate::options::ParseOptions;

    fn parse(source: &str) -> Expression {
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let expr = parser.parse_expr();
        assert!(parser.diagnostics.is_empty(), "{:?}", parser.diagnostics);
        assert!(parser.is_eof(), "trailing input in {source}");
        match expr {
            Ok(expr) => expr,
            Err(err) => panic!("{source}: {}", err.message),
        }
    }

    fn special(source: &str) -> SpecialFormKind {
        match &parse(source) {
            Expression::Special(form) => form.kind.clone(),
            other => panic!("{source} parsed as {other:?}"),
        }
    }

    fn literal(source: &str) -> Literal {
        match &parse(source) {
            Expression::Literal(literal) => literal.clone(),
            other => panic!("{source} parsed as {other:?}"),
        }
    }

    #[test]
    fn literals_keep_their_lexeme() {
        assert_eq!(literal("'it''s'").text, "'it''s'");
        assert_eq!(literal("1.5e3").kind, LiteralKind::Decimal);
        assert_eq!(literal("`{a: 1}`").kind, LiteralKind::Ion);
        assert_eq!(literal("TRUE").kind, LiteralKind::Boolean(true));
        assert_eq!(literal("missing").kind, LiteralKind::Missing);
    }

    #[test]
    fn date_and_time_literals() {
        let date = literal("DATE '2024-01-31'");
        assert_eq!(date.kind, LiteralKind::Date);
        assert_eq!(date.text, "'2024-01-31'");
        assert_eq!(date.span, 0..17);

        let time = literal("TIME (3) WITH TIME ZONE '12:00:00.000+01:00'");
        assert_eq!(
            time.kind,
            LiteralKind::Time {
                precision: Some(3),
                with_time_zone: true
            }
        );
    }

    #[test]
    fn parameters_and_local_references() {
        assert!(matches!(parse("?"), Expression::Parameter(ref span) if *span == (0..1)));
        let expr = parse("@x");
        let Expression::VariableReference(var) = &expr else {
            panic!("expected variable reference");
        };
        assert!(var.local);
        assert_eq!(var.span, 0..2);
    }

    #[test]
    fn quoted_identifiers_are_names() {
        let expr = parse("\"select\"");
        let Expression::VariableReference(var) = &expr else {
            panic!("expected variable reference");
        };
        assert!(var.name.quoted);
        assert_eq!(var.name.name, "select");
    }

    #[test]
    fn function_calls() {
        let expr = parse("utcnow()");
        let Expression::FunctionCall(call) = &expr else {
            panic!("expected call");
        };
        assert_eq!(call.name.name, "utcnow");
        assert!(call.arguments.is_empty());

        let expr = parse("upper(a || b)");
        let Expression::FunctionCall(call) = &expr else {
            panic!("expected call");
        };
        assert_eq!(call.name.name, "UPPER");
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn aggregates() {
        let expr = parse("COUNT(*)");
        let Expression::Aggregate(count) = &expr else {
            panic!("expected aggregate");
        };
        assert!(count.argument.is_none());

        let expr = parse("sum(DISTINCT x.y)");
        let Expression::Aggregate(sum) = &expr else {
            panic!("expected aggregate");
        };
        assert_eq!(sum.function, AggregateFunction::Sum);
        assert_eq!(sum.quantifier, Some(SetQuantifier::Distinct));
    }

    #[test]
    fn window_functions() {
        let expr = parse("LAG(price, 1) OVER (PARTITION BY sym ORDER BY ts DESC)");
        let Expression::Window(call) = &expr else {
            panic!("expected window call");
        };
        assert_eq!(call.function, WindowFunction::Lag);
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(call.over.partition_by.len(), 1);
        assert_eq!(call.over.order_by.len(), 1);
        assert_eq!(call.over.span, 14..54);
    }

    #[test]
    fn casts() {
        let expr = parse("CAN_LOSSLESS_CAST(x AS DECIMAL(5, 2))");
        let Expression::Cast(cast) = &expr else {
            panic!("expected cast");
        };
        assert_eq!(cast.kind, CastKind::CanLosslessCast);
    }

    #[test]
    fn simple_and_searched_case() {
        let expr = parse("CASE x WHEN 1 THEN 'a' WHEN 2 THEN 'b' ELSE 'c' END");
        let Expression::Case(simple) = &expr else {
            panic!("expected CASE");
        };
        assert!(simple.operand.is_some());
        assert_eq!(simple.branches.len(), 2);
        assert!(simple.else_result.is_some());

        let expr = parse("CASE WHEN a > 1 THEN b END");
        let Expression::Case(searched) = &expr else {
            panic!("expected CASE");
        };
        assert!(searched.operand.is_none());
        assert!(searched.else_result.is_none());
    }

    #[test]
    fn substring_forms() {
        assert!(matches!(
            special("SUBSTRING(s, 2, 3)"),
            SpecialFormKind::Substring { start: Some(_), length: Some(_), .. }
        ));
        assert!(matches!(
            special("SUBSTRING(s FROM 2)"),
            SpecialFormKind::Substring { start: Some(_), length: None, .. }
        ));
        assert!(matches!(
            special("SUBSTRING(s FROM 2 FOR 3)"),
            SpecialFormKind::Substring { length: Some(_), .. }
        ));
    }

    #[test]
    fn position_forms() {
        let SpecialFormKind::Position { needle, .. } = special("POSITION('a' IN s)") else {
            panic!("expected POSITION");
        };
        assert!(matches!(*needle, Expression::Literal(_)));

        let SpecialFormKind::Position { needle, .. } = special("POSITION(x IN y, s)") else {
            panic!("expected POSITION");
        };
        assert!(matches!(*needle, Expression::In(_)));

        let SpecialFormKind::Position { haystack, .. } = special("POSITION('a' IN (s || 'b'))") else {
            panic!("expected POSITION");
        };
        assert!(matches!(*haystack, Expression::Parenthesized(..)));
        assert_eq!(haystack.span(), 16..26);
    }

    #[test]
    fn position_needs_a_separator() {
        let source = "POSITION(a)";
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let Err(err) = parser.parse_expr() else {
            panic!("POSITION without IN or comma parsed");
        };
        assert_eq!(err.message, "Unexpected token ')'.");
        assert!(err.expected.contains(&TokenKind::In));
        assert!(err.expected.contains(&TokenKind::Comma));
    }

    #[test]
    fn overlay_forms() {
        assert!(matches!(
            special("OVERLAY(s PLACING 'x' FROM 2 FOR 1)"),
            SpecialFormKind::Overlay { length: Some(_), .. }
        ));
        assert!(matches!(
            special("OVERLAY(s, 'x', 2)"),
            SpecialFormKind::Overlay { length: None, .. }
        ));
    }

    #[test]
    fn extract_trim_and_date_arithmetic() {
        assert!(matches!(
            special("EXTRACT(YEAR FROM d)"),
            SpecialFormKind::Extract { ref field, .. } if field.name == "YEAR"
        ));
        assert!(matches!(
            special("TRIM(LEADING 'x' FROM s)"),
            SpecialFormKind::Trim { specification: Some(_), characters: Some(_), .. }
        ));
        assert!(matches!(
            special("TRIM(both FROM s)"),
            SpecialFormKind::Trim { specification: Some(_), characters: None, .. }
        ));
        assert!(matches!(
            special("TRIM(s)"),
            SpecialFormKind::Trim { specification: None, characters: None, .. }
        ));
        assert!(matches!(
            special("DATE_ADD(day, 1, d)"),
            SpecialFormKind::DateAdd { .. }
        ));
        assert!(matches!(
            special("DATE_DIFF(month, a, b)"),
            SpecialFormKind::DateDiff { .. }
        ));
        assert!(matches!(
            special("NULLIF(a, b)"),
            SpecialFormKind::NullIf(..)
        ));
        assert!(matches!(
            special("COALESCE(a, b, c)"),
            SpecialFormKind::Coalesce(ref args) if args.len() == 3
        ));
    }

    #[test]
    fn constructors() {
        let collection = |source: &str| match &parse(source) {
            Expression::Collection(c) => (c.kind, c.elements.len()),
            other => panic!("{source} parsed as {other:?}"),
        };
        assert_eq!(collection("[]"), (CollectionKind::Array, 0));
        assert_eq!(collection("<<1, 2>>"), (CollectionKind::Bag, 2));
        assert_eq!(collection("(1, 2, 3)"), (CollectionKind::ValueList, 3));
        assert_eq!(collection("LIST()"), (CollectionKind::List, 0));
        assert_eq!(collection("sexp(1, a)"), (CollectionKind::Sexp, 2));

        let expr = parse("{'a': 1, 'b': {}}");
        let Expression::Struct(tuple) = &expr else {
            panic!("expected struct");
        };
        assert_eq!(tuple.fields.len(), 2);

        let expr = parse("VALUES (1, 2), (3, 4)");
        let Expression::Values(values) = &expr else {
            panic!("expected VALUES");
        };
        assert_eq!(values.rows.len(), 2);
        assert_eq!(values.span, 0..21);
    }

    #[test]
    fn parenthesized_match_takes_a_pattern_list() {
        let expr = parse("(g MATCH (a)-(b), (c))");
        let Expression::Parenthesized(inner, span) = &expr else {
            panic!("expected parenthesized expression");
        };
        assert_eq!(*span, 0..22);
        let Expression::GraphMatch(graph_match) = &**inner else {
            panic!("expected graph match");
        };
        assert_eq!(graph_match.patterns.len(), 2);
        assert_eq!(graph_match.span, 1..21);
    }

    #[test]
    fn case_without_branches_is_an_error() {
        let source = "CASE x END";
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let err = parser.parse_expr().err();
        assert!(err.is_some_and(|e| e.message == "Unexpected token 'END'."
            && e.expected.contains(&TokenKind::When)));
    }
}
