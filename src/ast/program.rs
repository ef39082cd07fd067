//! AST node types for document structure.

use crate::ast::Span;
use crate::ast::catalog::DdlStatement;
use crate::ast::expression::{Expression, Identifier, Literal};
use crate::ast::mutation::DmlStatement;

/// Root node: every statement in the source, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub statements: Vec<Statement>,
    /// Covers the input with surrounding trivia trimmed.
    pub span: Span,
}

/// One top-level statement with its optional `EXPLAIN` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub explain: Option<ExplainPrefix>,
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Query expression (SELECT, bag operators, or any other expression)
    Query(Expression),
    /// INSERT, UPDATE, DELETE and friends
    Dml(Box<DmlStatement>),
    /// CREATE / DROP
    Ddl(DdlStatement),
    /// EXEC procedure
    Exec(ExecStatement),
}

/// `EXPLAIN [( name [=] value, ... )]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainPrefix {
    pub options: Vec<ExplainOption>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainOption {
    pub name: Identifier,
    pub value: ExplainValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExplainValue {
    Identifier(Identifier),
    Literal(Literal),
}

impl ExplainValue {
    pub fn span(&self) -> Span {
        match self {
            ExplainValue::Identifier(ident) => ident.span.clone(),
            ExplainValue::Literal(literal) => literal.span.clone(),
        }
    }
}

/// `EXEC procedure [arg, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExecStatement {
    pub procedure: Expression,
    pub arguments: Vec<Expression>,
    pub span: Span,
}
