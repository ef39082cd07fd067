//! Source spans shared by tokens, AST nodes and diagnostics.

use std::ops::Range;

/// A byte range in source text.
/// This is the canonical span type used throughout the parser.
pub type Span = Range<usize>;

/// Smallest span covering both `start` and `end`.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start.min(end.start)..start.end.max(end.end)
}

/// True when `inner` lies entirely within `outer`.
pub fn span_contains(outer: &Span, inner: &Span) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

/// True when `offset` falls inside `span`; the end offset counts as inside so
/// that a cursor placed right after a token still finds it.
pub fn span_covers_offset(span: &Span, offset: usize) -> bool {
    span.start <= offset && offset <= span.end
}
