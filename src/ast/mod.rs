//! Span-tagged syntax tree.
//!
//! Every node owns its children and records the source span it covers. A
//! parent's span contains the spans of all its children, and siblings appear
//! in source order without overlapping. Optional clauses that were not written
//! are `None` rather than zero-width nodes.

pub mod catalog;
pub mod expression;
pub mod graph;
pub mod mutation;
pub mod program;
pub mod query;
mod span;
pub mod tree;
pub mod types;

pub use span::{Span, merge_spans, span_contains, span_covers_offset};

pub use catalog::*;
pub use expression::*;
pub use graph::*;
pub use mutation::*;
pub use program::*;
pub use query::*;
pub use tree::{NodeRef, ancestors_at_offset, node_at_offset};
pub use types::*;
