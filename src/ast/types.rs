//! Type names used by CAST, IS and column definitions.

use crate::ast::expression::Identifier;
use crate::ast::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Null,
    Missing,
    Bool,
    Smallint,
    /// `INT2` / `INTEGER2`
    Int2,
    /// `INT4` / `INTEGER4`
    Int4,
    /// `INT8` / `INTEGER8`
    Int8,
    /// `INT` / `INTEGER`
    Int,
    Bigint,
    Real,
    DoublePrecision,
    Float(Option<u32>),
    /// `DECIMAL`, `DEC` and `NUMERIC` with optional precision and scale
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Char(Option<u32>),
    /// `VARCHAR` / `CHARACTER VARYING`
    Varchar(Option<u32>),
    String,
    Symbol,
    Blob,
    Clob,
    Date,
    Time {
        precision: Option<u32>,
        with_time_zone: bool,
    },
    Timestamp,
    Struct,
    Tuple,
    List,
    Sexp,
    Bag,
    Any,
    /// A user-defined type name.
    Custom(Identifier),
}
