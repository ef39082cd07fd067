//! DML statement AST nodes.
//!
//! A DML statement takes one of five shapes:
//! - `UPDATE source action+ [WHERE] [RETURNING]`
//! - `FROM source [WHERE] action+ [RETURNING]`
//! - `DELETE FROM path [WHERE] [RETURNING]`
//! - a legacy `INSERT INTO path VALUE ...` with `RETURNING`
//! - a single base action

use crate::ast::Span;
use crate::ast::expression::{Expression, Identifier, Literal};
use crate::ast::query::{ExpressionClause, FromClause, SourceAliases, TableBase};

#[derive(Debug, Clone, PartialEq)]
pub enum DmlStatement {
    Update(UpdateStatement),
    FromActions(FromActionsStatement),
    Delete(DeleteStatement),
    InsertReturning(InsertReturningStatement),
    Action(DmlAction),
}

impl DmlStatement {
    pub fn span(&self) -> Span {
        match self {
            DmlStatement::Update(stmt) => stmt.span.clone(),
            DmlStatement::FromActions(stmt) => stmt.span.clone(),
            DmlStatement::Delete(stmt) => stmt.span.clone(),
            DmlStatement::InsertReturning(stmt) => stmt.span.clone(),
            DmlStatement::Action(action) => action.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub target: TableBase,
    pub actions: Vec<DmlAction>,
    pub where_clause: Option<ExpressionClause>,
    pub returning: Option<ReturningClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromActionsStatement {
    pub from: FromClause,
    pub where_clause: Option<ExpressionClause>,
    pub actions: Vec<DmlAction>,
    pub returning: Option<ReturningClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub source: SimpleSource,
    pub where_clause: Option<ExpressionClause>,
    pub returning: Option<ReturningClause>,
    pub span: Span,
}

/// `FROM path [AS x] [AT y] [BY z]` or `FROM path x`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleSource {
    pub path: SimplePath,
    pub aliases: SourceAliases,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertReturningStatement {
    pub insert: LegacyInsert,
    pub returning: ReturningClause,
    pub span: Span,
}

// ============================================================================
// Base actions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DmlAction {
    Insert(Insert),
    LegacyInsert(LegacyInsert),
    Set(SetAction),
    Replace(ReplaceOrUpsert),
    Upsert(ReplaceOrUpsert),
    Remove(RemoveAction),
}

impl DmlAction {
    pub fn span(&self) -> Span {
        match self {
            DmlAction::Insert(action) => action.span.clone(),
            DmlAction::LegacyInsert(action) => action.span.clone(),
            DmlAction::Set(action) => action.span.clone(),
            DmlAction::Replace(action) | DmlAction::Upsert(action) => action.span.clone(),
            DmlAction::Remove(action) => action.span.clone(),
        }
    }
}

/// `INSERT INTO name [AS alias] value [ON CONFLICT ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub target: Identifier,
    pub alias: Option<Identifier>,
    pub value: Expression,
    pub on_conflict: Option<OnConflict>,
    pub span: Span,
}

/// `INSERT INTO path VALUE value [AT position] [ON CONFLICT WHERE cond DO NOTHING]`
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyInsert {
    pub target: SimplePath,
    pub value: Expression,
    pub position: Option<Expression>,
    pub on_conflict: Option<LegacyOnConflict>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyOnConflict {
    pub condition: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub target: Option<ConflictTarget>,
    pub action: ConflictAction,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    /// `( column, ... )`
    Columns(Vec<Identifier>, Span),
    /// `ON CONSTRAINT name`
    Constraint(Identifier, Span),
}

impl ConflictTarget {
    pub fn span(&self) -> Span {
        match self {
            ConflictTarget::Columns(_, span) | ConflictTarget::Constraint(_, span) => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing(Span),
    /// `DO REPLACE EXCLUDED [WHERE cond]`
    DoReplace {
        condition: Option<Expression>,
        span: Span,
    },
    /// `DO UPDATE EXCLUDED [WHERE cond]`
    DoUpdate {
        condition: Option<Expression>,
        span: Span,
    },
}

impl ConflictAction {
    pub fn span(&self) -> Span {
        match self {
            ConflictAction::DoNothing(span)
            | ConflictAction::DoReplace { span, .. }
            | ConflictAction::DoUpdate { span, .. } => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetAction {
    pub assignments: Vec<Assignment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: SimplePath,
    pub value: Expression,
    pub span: Span,
}

/// Shared shape of `REPLACE INTO` and `UPSERT INTO`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceOrUpsert {
    pub target: Identifier,
    pub alias: Option<Identifier>,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveAction {
    pub path: SimplePath,
    pub span: Span,
}

// ============================================================================
// RETURNING and simple paths
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ReturningClause {
    pub columns: Vec<ReturningColumn>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturningStatus {
    Modified,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturningAge {
    Old,
    New,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturningColumn {
    pub status: ReturningStatus,
    pub age: ReturningAge,
    /// `None` for `*`.
    pub expression: Option<Expression>,
    pub span: Span,
}

/// `name ( [literal] | [name] | .name )*`
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePath {
    pub root: Identifier,
    pub steps: Vec<SimplePathStep>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimplePathStep {
    /// `[literal]`
    Literal(Literal, Span),
    /// `[name]`
    Symbol(Identifier, Span),
    /// `.name`
    Field(Identifier, Span),
}

impl SimplePathStep {
    pub fn span(&self) -> Span {
        match self {
            SimplePathStep::Literal(_, span)
            | SimplePathStep::Symbol(_, span)
            | SimplePathStep::Field(_, span) => span.clone(),
        }
    }
}
