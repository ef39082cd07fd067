//! DDL statement AST nodes: CREATE/DROP TABLE and INDEX.

use crate::ast::Span;
use crate::ast::expression::Identifier;
use crate::ast::mutation::SimplePath;
use crate::ast::types::TypeName;

#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    /// `CREATE TABLE name [( column, ... )]`
    CreateTable(CreateTable),
    /// `CREATE INDEX ON table (path, ...)`
    CreateIndex(CreateIndex),
    /// `DROP TABLE name`
    DropTable(DropTable),
    /// `DROP INDEX index ON table`
    DropIndex(DropIndex),
}

impl DdlStatement {
    pub fn span(&self) -> Span {
        match self {
            DdlStatement::CreateTable(stmt) => stmt.span.clone(),
            DdlStatement::CreateIndex(stmt) => stmt.span.clone(),
            DdlStatement::DropTable(stmt) => stmt.span.clone(),
            DdlStatement::DropIndex(stmt) => stmt.span.clone(),
        }
    }
}

/// `a.b.c`: qualifiers followed by the final name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub qualifiers: Vec<Identifier>,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: QualifiedName,
    /// `None` when no column list was written.
    pub columns: Option<Vec<ColumnDefinition>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: Identifier,
    pub ty: TypeName,
    pub constraints: Vec<ColumnConstraint>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConstraint {
    /// `CONSTRAINT name`
    pub name: Option<Identifier>,
    pub kind: ColumnConstraintKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnConstraintKind {
    NotNull,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub table: Identifier,
    pub paths: Vec<SimplePath>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    pub name: QualifiedName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndex {
    pub index: Identifier,
    pub table: Identifier,
    pub span: Span,
}
