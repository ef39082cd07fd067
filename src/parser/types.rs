//! Type names for CAST, IS and column definitions.

use crate::ast::{Span, TypeKind, TypeName};
use crate::lexer::token::TokenKind;
use crate::parser::primitives::is_symbol_kind;
use crate::parser::{PResult, Parser};

/// Keywords that begin a built-in type name.
pub(crate) const TYPE_START: &[TokenKind] = &[
    TokenKind::Null,
    TokenKind::Missing,
    TokenKind::Bool,
    TokenKind::Boolean,
    TokenKind::Smallint,
    TokenKind::Int2,
    TokenKind::Integer2,
    TokenKind::Int4,
    TokenKind::Integer4,
    TokenKind::Int8,
    TokenKind::Integer8,
    TokenKind::Int,
    TokenKind::Integer,
    TokenKind::Bigint,
    TokenKind::Real,
    TokenKind::Double,
    TokenKind::Float,
    TokenKind::Decimal,
    TokenKind::Dec,
    TokenKind::Numeric,
    TokenKind::Char,
    TokenKind::Character,
    TokenKind::Varchar,
    TokenKind::String,
    TokenKind::Symbol,
    TokenKind::Blob,
    TokenKind::Clob,
    TokenKind::Date,
    TokenKind::Time,
    TokenKind::Timestamp,
    TokenKind::Struct,
    TokenKind::Tuple,
    TokenKind::List,
    TokenKind::Sexp,
    TokenKind::Bag,
    TokenKind::Any,
];

impl<'source> Parser<'source> {
    pub(crate) fn parse_type(&mut self) -> PResult<TypeName> {
        let kind = self.peek_kind();
        if !TYPE_START.contains(&kind) {
            if is_symbol_kind(kind) {
                let name = self.parse_symbol()?;
                let span = name.span.clone();
                return Ok(TypeName {
                    kind: TypeKind::Custom(name),
                    span,
                });
            }
            self.note_expected_all(&[TokenKind::Identifier]);
            return Err(self.unexpected_expecting(TYPE_START));
        }

        let start = self.advance();
        let kind = match kind {
            TokenKind::Null => TypeKind::Null,
            TokenKind::Missing => TypeKind::Missing,
            TokenKind::Bool | TokenKind::Boolean => TypeKind::Bool,
            TokenKind::Smallint => TypeKind::Smallint,
            TokenKind::Int2 | TokenKind::Integer2 => TypeKind::Int2,
            TokenKind::Int4 | TokenKind::Integer4 => TypeKind::Int4,
            TokenKind::Int8 | TokenKind::Integer8 => TypeKind::Int8,
            TokenKind::Int | TokenKind::Integer => TypeKind::Int,
            TokenKind::Bigint => TypeKind::Bigint,
            TokenKind::Real => TypeKind::Real,
            TokenKind::Double => {
                self.expect(TokenKind::Precision)?;
                TypeKind::DoublePrecision
            }
            TokenKind::Float => TypeKind::Float(self.parse_type_length()?),
            TokenKind::Decimal | TokenKind::Dec | TokenKind::Numeric => {
                let (precision, scale) = self.parse_precision_and_scale()?;
                TypeKind::Decimal { precision, scale }
            }
            TokenKind::Char | TokenKind::Character => {
                if kind == TokenKind::Character && self.consume(TokenKind::Varying) {
                    TypeKind::Varchar(self.parse_type_length()?)
                } else {
                    TypeKind::Char(self.parse_type_length()?)
                }
            }
            TokenKind::Varchar => TypeKind::Varchar(self.parse_type_length()?),
            TokenKind::String => TypeKind::String,
            TokenKind::Symbol => TypeKind::Symbol,
            TokenKind::Blob => TypeKind::Blob,
            TokenKind::Clob => TypeKind::Clob,
            TokenKind::Date => TypeKind::Date,
            TokenKind::Time => {
                let (precision, with_time_zone) = self.parse_time_suffix()?;
                TypeKind::Time {
                    precision,
                    with_time_zone,
                }
            }
            TokenKind::Timestamp => TypeKind::Timestamp,
            TokenKind::Struct => TypeKind::Struct,
            TokenKind::Tuple => TypeKind::Tuple,
            TokenKind::List => TypeKind::List,
            TokenKind::Sexp => TypeKind::Sexp,
            TokenKind::Bag => TypeKind::Bag,
            _ => TypeKind::Any,
        };

        Ok(TypeName {
            kind,
            span: start.start..self.previous_end(),
        })
    }

    /// `[( n )]`
    fn parse_type_length(&mut self) -> PResult<Option<u32>> {
        if !self.consume(TokenKind::LParen) {
            return Ok(None);
        }
        let length = self.parse_u32("type length")?;
        self.expect(TokenKind::RParen)?;
        Ok(Some(length))
    }

    /// `[( p [, s] )]`
    fn parse_precision_and_scale(&mut self) -> PResult<(Option<u32>, Option<u32>)> {
        if !self.consume(TokenKind::LParen) {
            return Ok((None, None));
        }
        let precision = self.parse_u32("precision")?;
        let scale = if self.consume(TokenKind::Comma) {
            Some(self.parse_u32("scale")?)
        } else {
            None
        };
        self.expect(TokenKind::RParen)?;
        Ok((Some(precision), scale))
    }

    /// `[( p )] [WITH TIME ZONE]` after `TIME`, shared by the type and the
    /// time literal.
    pub(crate) fn parse_time_suffix(&mut self) -> PResult<(Option<u32>, bool)> {
        let precision = self.parse_type_length()?;
        let with_time_zone = if self.consume(TokenKind::With) {
            self.expect(TokenKind::Time)?;
            self.expect(TokenKind::Zone)?;
            true
        } else {
            false
        };
        Ok((precision, with_time_zone))
    }

    /// An unsigned integer literal that fits in `u32`.
    pub(crate) fn parse_u32(&mut self, what: &str) -> PResult<u32> {
        let span: Span = self.expect(TokenKind::IntegerLiteral)?;
        self.source
            .get(span.clone())
            .and_then(|text| text.parse::<u32>().ok())
            .ok_or_else(|| self.invalid(what, span))
    }
}
