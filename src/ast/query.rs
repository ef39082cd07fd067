//! Query AST nodes: SFW queries, table references and bag operators.

use crate::ast::expression::{Expression, Identifier};
use crate::ast::Span;

// ============================================================================
// Bag operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BagOperator {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetQuantifier {
    All,
    Distinct,
}

/// `lhs [OUTER] UNION|INTERSECT|EXCEPT [ALL|DISTINCT] rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct BagOperation {
    pub operator: BagOperator,
    pub outer: bool,
    pub quantifier: Option<SetQuantifier>,
    pub lhs: Expression,
    pub rhs: Expression,
    pub span: Span,
}

// ============================================================================
// SFW query
// ============================================================================

/// A SELECT or PIVOT query with its optional clauses.
///
/// Absent clauses are `None`; no clause is ever represented by a zero-width node.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub select: SelectClause,
    pub exclude: Option<ExcludeClause>,
    pub from: Option<FromClause>,
    pub let_clause: Option<LetClause>,
    pub where_clause: Option<ExpressionClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<ExpressionClause>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<ExpressionClause>,
    pub offset: Option<ExpressionClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectClause {
    /// `SELECT [ALL|DISTINCT] *`
    All {
        quantifier: Option<SetQuantifier>,
        span: Span,
    },
    /// `SELECT [ALL|DISTINCT] item, ...`
    ///
    /// After error recovery `items` may be empty; the span then covers the
    /// `SELECT` keyword alone.
    Items {
        quantifier: Option<SetQuantifier>,
        items: Vec<ProjectionItem>,
        span: Span,
    },
    /// `SELECT [ALL|DISTINCT] VALUE expr`
    Value {
        quantifier: Option<SetQuantifier>,
        value: Expression,
        span: Span,
    },
    /// `PIVOT value AT key`
    Pivot {
        value: Expression,
        key: Expression,
        span: Span,
    },
}

impl SelectClause {
    pub fn span(&self) -> Span {
        match self {
            SelectClause::All { span, .. }
            | SelectClause::Items { span, .. }
            | SelectClause::Value { span, .. }
            | SelectClause::Pivot { span, .. } => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expression: Expression,
    pub alias: Option<Identifier>,
    pub span: Span,
}

/// Clauses carrying a single expression: WHERE, HAVING, LIMIT, OFFSET.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionClause {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcludeClause {
    pub paths: Vec<ExcludePath>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcludePath {
    pub root: Identifier,
    pub steps: Vec<ExcludeStep>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExcludeStep {
    Field(Identifier, Span),
    AllFields(Span),
    /// `[literal]`
    Index(Expression, Span),
    AllElements(Span),
}

impl ExcludeStep {
    pub fn span(&self) -> Span {
        match self {
            ExcludeStep::Field(_, span)
            | ExcludeStep::AllFields(span)
            | ExcludeStep::Index(_, span)
            | ExcludeStep::AllElements(span) => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetClause {
    pub bindings: Vec<LetBinding>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub expression: Expression,
    pub alias: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub partial: bool,
    pub keys: Vec<GroupKey>,
    /// `GROUP AS name`
    pub group_as: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey {
    pub expression: Expression,
    pub alias: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub specs: Vec<OrderSpec>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub expression: Expression,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
    pub span: Span,
}

// ============================================================================
// FROM and table references
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// `None` only when the source failed to parse and the clause was kept
    /// after recovery; the span then covers the `FROM` keyword alone.
    pub source: Option<TableReference>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableReference {
    Base(TableBase),
    Unpivot(TableUnpivot),
    Join(Box<Join>),
    /// `( table_reference )`
    Wrapped(Box<TableReference>, Span),
}

impl TableReference {
    pub fn span(&self) -> Span {
        match self {
            TableReference::Base(base) => base.span.clone(),
            TableReference::Unpivot(unpivot) => unpivot.span.clone(),
            TableReference::Join(join) => join.span.clone(),
            TableReference::Wrapped(_, span) => span.clone(),
        }
    }
}

/// `AS x`, `AT y`, `BY z` bindings on a table source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAliases {
    pub as_alias: Option<Identifier>,
    pub at_alias: Option<Identifier>,
    pub by_alias: Option<Identifier>,
}

impl SourceAliases {
    pub fn is_empty(&self) -> bool {
        self.as_alias.is_none() && self.at_alias.is_none() && self.by_alias.is_none()
    }

    /// Aliases in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        [&self.as_alias, &self.at_alias, &self.by_alias]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBase {
    pub source: Expression,
    pub aliases: SourceAliases,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableUnpivot {
    pub source: Expression,
    pub aliases: SourceAliases,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `CROSS JOIN` or a comma
    Cross,
    Inner,
    Left,
    Right,
    Full,
    Outer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub lhs: TableReference,
    pub rhs: TableReference,
    pub on: Option<Expression>,
    pub span: Span,
}
