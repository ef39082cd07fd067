//! Graph pattern matching (GPML) AST nodes.

use crate::ast::expression::{Expression, Identifier};
use crate::ast::Span;

/// `source MATCH [selector] pattern [, pattern ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct GraphMatch {
    pub source: Expression,
    pub selector: Option<MatchSelector>,
    pub patterns: Vec<GraphPattern>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSelector {
    pub kind: SelectorKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    AnyShortest,
    AllShortest,
    /// `ANY [k]`
    Any(Option<u32>),
    /// `SHORTEST k [GROUP]`
    Shortest { k: u32, group: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictorKind {
    Trail,
    Acyclic,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restrictor {
    pub kind: RestrictorKind,
    pub span: Span,
}

/// One top-level pattern: `[restrictor] [p =] part part ...`
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPattern {
    pub restrictor: Option<Restrictor>,
    pub variable: Option<Identifier>,
    pub parts: Vec<GraphPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphPart {
    Node(NodePattern),
    Edge(EdgePattern),
    Pattern(SubPattern),
}

impl GraphPart {
    pub fn span(&self) -> Span {
        match self {
            GraphPart::Node(node) => node.span.clone(),
            GraphPart::Edge(edge) => edge.span.clone(),
            GraphPart::Pattern(pattern) => pattern.span.clone(),
        }
    }
}

/// `( [x] [:label] [WHERE cond] )`
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<Identifier>,
    pub label: Option<LabelExpression>,
    pub where_clause: Option<Expression>,
    pub span: Span,
}

/// The seven edge orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// `<-[]-` / `<-`
    Left,
    /// `~[]~` / `~`
    Undirected,
    /// `-[]->` / `->`
    Right,
    /// `<~[]~` / `<~`
    LeftOrUndirected,
    /// `~[]~>` / `~>`
    UndirectedOrRight,
    /// `<-[]->` / `<->`
    LeftOrRight,
    /// `-[]-` / `-`
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgePattern {
    pub direction: EdgeDirection,
    /// Contents of the bracketed spec; `None` for the arrow-only form.
    pub spec: Option<EdgeSpec>,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

impl EdgePattern {
    pub fn is_abbreviated(&self) -> bool {
        self.spec.is_none()
    }

    pub fn variable(&self) -> Option<&Identifier> {
        self.spec.as_ref().and_then(|spec| spec.variable.as_ref())
    }
}

/// `[ [x] [:label] [WHERE cond] ]`
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub variable: Option<Identifier>,
    pub label: Option<LabelExpression>,
    pub where_clause: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternDelimiter {
    Paren,
    Bracket,
}

/// A nested `( ... )` or `[ ... ]` pattern, optionally filtered and quantified.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPattern {
    pub delimiter: PatternDelimiter,
    pub restrictor: Option<Restrictor>,
    pub variable: Option<Identifier>,
    pub parts: Vec<GraphPart>,
    pub where_clause: Option<Expression>,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
    /// `{lower, [upper]}`
    Range { lower: u32, upper: Option<u32> },
}

/// Boolean label algebra: `|` binds loosest, then `&`, then prefix `!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelExpression {
    Name(Identifier),
    /// `%`
    Wildcard(Span),
    Not(Box<LabelExpression>, Span),
    And(Box<LabelExpression>, Box<LabelExpression>, Span),
    Or(Box<LabelExpression>, Box<LabelExpression>, Span),
    Parenthesized(Box<LabelExpression>, Span),
}

impl LabelExpression {
    pub fn span(&self) -> Span {
        match self {
            LabelExpression::Name(name) => name.span.clone(),
            LabelExpression::Wildcard(span)
            | LabelExpression::Not(_, span)
            | LabelExpression::And(_, _, span)
            | LabelExpression::Or(_, _, span)
            | LabelExpression::Parenthesized(_, span) => span.clone(),
        }
    }
}
