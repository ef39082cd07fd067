//! Expression AST nodes.
//!
//! This module defines the expression system:
//! - Literals and variable references
//! - Operators from the precedence ladder (logical, predicate, arithmetic)
//! - Path navigation (`.field`, `.*`, `[index]`, `[*]`)
//! - Function calls, aggregates, window functions, CAST and CASE
//! - Collection constructors (arrays, bags, structs, value lists)
//!
//! SFW queries, bag operators and graph matches are expressions too, so that
//! sub-queries compose with scalar expressions; their payloads live in the
//! `query` and `graph` modules.

use crate::ast::graph::GraphMatch;
use crate::ast::query::{BagOperation, OrderSpec, SelectQuery, SetQuantifier};
use crate::ast::types::TypeName;
use crate::ast::Span;
use smol_str::SmolStr;

// ============================================================================
// Names
// ============================================================================

/// A name as written in source: a bare identifier, a non-reserved keyword used
/// as a name, or a double-quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Name with quotes removed and doubled quotes collapsed.
    pub name: SmolStr,
    /// True for `"..."` identifiers, which are case-sensitive.
    pub quoted: bool,
    pub span: Span,
}

// ============================================================================
// Expression - Top-level expression type
// ============================================================================

/// Any expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),

    /// `x` or `@x`
    VariableReference(VariableReference),

    /// Positional parameter `?`
    Parameter(Span),

    /// Prefix `+`, `-` or `NOT`
    Unary(UnaryOperator, Box<Expression>, Span),

    /// Logical, comparison, concatenation and arithmetic operators
    Binary(BinaryOperator, Box<Expression>, Box<Expression>, Span),

    /// `x IS [NOT] type`
    Is(IsPredicate),

    /// `x [NOT] IN ...`
    In(InPredicate),

    /// `x [NOT] LIKE pattern [ESCAPE e]`
    Like(LikePredicate),

    /// `x [NOT] BETWEEN low AND high`
    Between(BetweenPredicate),

    /// `( expr )`
    Parenthesized(Box<Expression>, Span),

    /// A primary followed by one or more navigation steps
    Path(PathExpression),

    FunctionCall(FunctionCall),

    Aggregate(AggregateCall),

    /// `LAG`/`LEAD` with an `OVER` clause
    Window(WindowCall),

    Cast(CastExpression),

    Case(CaseExpression),

    /// Functions with keyword-delimited argument syntax (SUBSTRING, TRIM, ...)
    Special(SpecialForm),

    /// Arrays, bags, value lists and `LIST(...)`/`SEXP(...)`
    Collection(Collection),

    /// `{ key: value, ... }`
    Struct(StructConstructor),

    /// `VALUES (...), (...)`
    Values(ValuesConstructor),

    /// `SELECT ...` / `PIVOT ...`
    Query(Box<SelectQuery>),

    /// `UNION` / `INTERSECT` / `EXCEPT`
    BagOperation(Box<BagOperation>),

    /// `source MATCH pattern`
    GraphMatch(Box<GraphMatch>),
}

impl Expression {
    /// Returns the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(literal) => literal.span.clone(),
            Expression::VariableReference(var) => var.span.clone(),
            Expression::Parameter(span) => span.clone(),
            Expression::Unary(_, _, span) => span.clone(),
            Expression::Binary(_, _, _, span) => span.clone(),
            Expression::Is(predicate) => predicate.span.clone(),
            Expression::In(predicate) => predicate.span.clone(),
            Expression::Like(predicate) => predicate.span.clone(),
            Expression::Between(predicate) => predicate.span.clone(),
            Expression::Parenthesized(_, span) => span.clone(),
            Expression::Path(path) => path.span.clone(),
            Expression::FunctionCall(call) => call.span.clone(),
            Expression::Aggregate(call) => call.span.clone(),
            Expression::Window(call) => call.span.clone(),
            Expression::Cast(cast) => cast.span.clone(),
            Expression::Case(case) => case.span.clone(),
            Expression::Special(form) => form.span.clone(),
            Expression::Collection(collection) => collection.span.clone(),
            Expression::Struct(constructor) => constructor.span.clone(),
            Expression::Values(values) => values.span.clone(),
            Expression::Query(query) => query.span.clone(),
            Expression::BagOperation(op) => op.span.clone(),
            Expression::GraphMatch(graph_match) => graph_match.span.clone(),
        }
    }

    /// Returns the binary operator if this is a binary expression.
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match self {
            Expression::Binary(op, _, _, _) => Some(*op),
            _ => None,
        }
    }

    /// Moves the expression out, leaving an empty parameter behind.
    pub(crate) fn take(&mut self) -> Expression {
        std::mem::replace(self, Expression::Parameter(0..0))
    }

    /// Moves out the operands that can form unbounded chains.
    fn detach_operands(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Binary(_, lhs, rhs, _) => {
                out.push(lhs.take());
                out.push(rhs.take());
            }
            Expression::Unary(_, operand, _) | Expression::Parenthesized(operand, _) => {
                out.push(operand.take());
            }
            Expression::Is(predicate) => out.push(predicate.operand.take()),
            Expression::In(predicate) => out.push(predicate.operand.take()),
            Expression::Like(predicate) => out.push(predicate.operand.take()),
            Expression::Between(predicate) => out.push(predicate.operand.take()),
            Expression::BagOperation(op) => {
                out.push(op.lhs.take());
                out.push(op.rhs.take());
            }
            _ => {}
        }
    }
}

/// Operator chains are left-nested, so the derived drop would recurse once per
/// operator. Operands are unlinked onto a heap stack instead.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_operands(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_operands(&mut pending);
        }
    }
}

// ============================================================================
// Literals and references
// ============================================================================

/// A literal with its raw source text; value decoding is left to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Raw lexeme of the value token (quotes and backticks included).
    pub text: SmolStr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Null,
    Missing,
    Boolean(bool),
    String,
    Integer,
    Decimal,
    /// Backtick-delimited Ion value
    Ion,
    /// `DATE '...'`
    Date,
    /// `TIME [(p)] [WITH TIME ZONE] '...'`
    Time {
        precision: Option<u32>,
        with_time_zone: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    pub name: Identifier,
    /// `@name` resolves against local bindings only.
    pub local: bool,
    pub span: Span,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// `||`
    Concat,
    /// `&`
    BitAnd,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Concat => "||",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::Gt
                | BinaryOperator::LtEq
                | BinaryOperator::GtEq
        )
    }
}

// ============================================================================
// Predicates
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IsPredicate {
    pub operand: Box<Expression>,
    pub negated: bool,
    pub ty: TypeName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InPredicate {
    pub operand: Box<Expression>,
    pub negated: bool,
    pub target: InTarget,
    pub span: Span,
}

/// The two right-hand forms of `IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum InTarget {
    /// `IN ( expr )` where `expr` is usually a sub-query.
    Parenthesized(Box<Expression>, Span),
    /// `IN rhs` with a set-valued expression such as `(1, 2, 3)` or `[1, 2]`.
    Expression(Box<Expression>),
}

impl InTarget {
    pub fn span(&self) -> Span {
        match self {
            InTarget::Parenthesized(_, span) => span.clone(),
            InTarget::Expression(expr) => expr.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LikePredicate {
    pub operand: Box<Expression>,
    pub negated: bool,
    pub pattern: Box<Expression>,
    pub escape: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BetweenPredicate {
    pub operand: Box<Expression>,
    pub negated: bool,
    pub low: Box<Expression>,
    pub high: Box<Expression>,
    pub span: Span,
}

// ============================================================================
// Paths
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub root: Box<Expression>,
    pub steps: Vec<PathStep>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// `.name`
    Field(Identifier, Span),
    /// `.*`
    AllFields(Span),
    /// `[expr]`
    Index(Box<Expression>, Span),
    /// `[*]`
    AllElements(Span),
}

impl PathStep {
    pub fn span(&self) -> Span {
        match self {
            PathStep::Field(_, span)
            | PathStep::AllFields(span)
            | PathStep::Index(_, span)
            | PathStep::AllElements(span) => span.clone(),
        }
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Generic function call; reserved function names such as `UPPER` keep their
/// upper-case spelling in `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    Max,
    Min,
    Sum,
    Avg,
    Every,
    Any,
    Some,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    pub quantifier: Option<SetQuantifier>,
    /// `None` for `COUNT(*)`.
    pub argument: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFunction {
    Lag,
    Lead,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub function: WindowFunction,
    pub arguments: Vec<Expression>,
    pub over: WindowSpecification,
    pub span: Span,
}

/// `OVER ( [PARTITION BY ...] [ORDER BY ...] )`
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpecification {
    pub partition_by: Vec<Expression>,
    pub order_by: Vec<OrderSpec>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Cast,
    CanCast,
    CanLosslessCast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpression {
    pub kind: CastKind,
    pub operand: Box<Expression>,
    pub target: TypeName,
    pub span: Span,
}

/// Simple (`CASE x WHEN ...`) or searched (`CASE WHEN ...`) CASE.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub operand: Option<Box<Expression>>,
    pub branches: Vec<WhenBranch>,
    pub else_result: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenBranch {
    pub condition: Expression,
    pub result: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialForm {
    pub kind: SpecialFormKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpecialFormKind {
    NullIf(Box<Expression>, Box<Expression>),
    Coalesce(Vec<Expression>),
    /// `SUBSTRING(s, start [, len])` or `SUBSTRING(s FROM start [FOR len])`
    Substring {
        value: Box<Expression>,
        start: Option<Box<Expression>>,
        length: Option<Box<Expression>>,
    },
    /// `POSITION(needle, haystack)` or `POSITION(needle IN haystack)`
    Position {
        needle: Box<Expression>,
        haystack: Box<Expression>,
    },
    /// `OVERLAY(s PLACING r FROM start [FOR len])` or the comma form
    Overlay {
        value: Box<Expression>,
        placing: Box<Expression>,
        start: Box<Expression>,
        length: Option<Box<Expression>>,
    },
    /// `EXTRACT(field FROM source)`
    Extract {
        field: Identifier,
        source: Box<Expression>,
    },
    /// `TRIM([BOTH|LEADING|TRAILING] [chars] FROM target)`
    Trim {
        specification: Option<Identifier>,
        characters: Option<Box<Expression>>,
        target: Box<Expression>,
    },
    DateAdd {
        field: Identifier,
        amount: Box<Expression>,
        target: Box<Expression>,
    },
    DateDiff {
        field: Identifier,
        from: Box<Expression>,
        to: Box<Expression>,
    },
}

// ============================================================================
// Constructors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `[a, b]`
    Array,
    /// `<<a, b>>`
    Bag,
    /// `(a, b)` with at least two elements
    ValueList,
    /// `LIST(a, b)`
    List,
    /// `SEXP(a, b)`
    Sexp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub kind: CollectionKind,
    pub elements: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructConstructor {
    pub fields: Vec<StructField>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub key: Expression,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuesConstructor {
    pub rows: Vec<ValueRow>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub values: Vec<Expression>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_prefix_nesting_drops_without_recursion() {
        let mut expr = Expression::Parameter(0..1);
        for _ in 0..200_000 {
            expr = Expression::Unary(UnaryOperator::Not, Box::new(expr), 0..1);
        }
        drop(expr);
    }

    #[test]
    fn take_leaves_a_placeholder() {
        let mut expr = Expression::Parameter(3..4);
        assert_eq!(expr.take(), Expression::Parameter(3..4));
        assert_eq!(expr, Expression::Parameter(0..0));
    }
}
