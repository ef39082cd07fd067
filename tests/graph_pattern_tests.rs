mod common;

use common::*;
use partiql_parser::ast::{
    EdgeDirection, Expression, GraphPart, LabelExpression, PatternDelimiter, QuantifierKind,
    RestrictorKind, SelectorKind,
};
use partiql_parser::{GraphPatternResult, parse_graph_pattern};

fn clean_patterns(source: &str) -> GraphPatternResult {
    let result = parse_graph_pattern(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`:\n{}",
        format_diagnostics(&result.diagnostics)
    );
    result
}

fn edge_direction(source: &str) -> EdgeDirection {
    let result = clean_patterns(source);
    match &result.patterns[0].parts[1] {
        GraphPart::Edge(edge) => edge.direction,
        other => panic!("expected edge in `{source}`, got {other:?}"),
    }
}

#[test]
fn edge_directions() {
    let cases = [
        ("(a)<-[e]-(b)", EdgeDirection::Left),
        ("(a)~[e]~(b)", EdgeDirection::Undirected),
        ("(a)-[e]->(b)", EdgeDirection::Right),
        ("(a)<~[e]~(b)", EdgeDirection::LeftOrUndirected),
        ("(a)~[e]~>(b)", EdgeDirection::UndirectedOrRight),
        ("(a)<-[e]->(b)", EdgeDirection::LeftOrRight),
        ("(a)-[e]-(b)", EdgeDirection::Any),
        ("(a)->(b)", EdgeDirection::Right),
        ("(a)<~(b)", EdgeDirection::LeftOrUndirected),
        ("(a)-(b)", EdgeDirection::Any),
    ];
    for (source, expected) in cases {
        assert_eq!(edge_direction(source), expected, "{source}");
    }
}

#[test]
fn quantified_edge_covers_quantifier() {
    let result = clean_patterns("(a)-[e]->{1,3}(b)");
    let pattern = &result.patterns[0];
    assert_eq!(pattern.parts.len(), 3);
    let GraphPart::Edge(edge) = &pattern.parts[1] else {
        panic!("expected edge");
    };
    assert_eq!(
        edge.quantifier.as_ref().map(|q| q.kind),
        Some(QuantifierKind::Range {
            lower: 1,
            upper: Some(3)
        })
    );
    assert_eq!(edge.span, 3..14);
}

#[test]
fn selector_restrictor_and_variable() {
    let result = clean_patterns("ALL SHORTEST TRAIL p = (a)-[:Road]->+(b)");
    assert_eq!(result.selector.map(|s| s.kind), Some(SelectorKind::AllShortest));
    let pattern = &result.patterns[0];
    assert_eq!(pattern.restrictor.as_ref().map(|r| r.kind), Some(RestrictorKind::Trail));
    assert_eq!(pattern.variable.as_ref().map(|v| v.name.as_str()), Some("p"));
}

#[test]
fn label_algebra_in_node() {
    let result = clean_patterns("(x:(Person|Robot)&!Retired WHERE x.age > 3)");
    let GraphPart::Node(node) = &result.patterns[0].parts[0] else {
        panic!("expected node");
    };
    assert!(matches!(node.label, Some(LabelExpression::And(..))));
    assert!(node.where_clause.is_some());
}

#[test]
fn nested_sub_patterns() {
    let result = clean_patterns("[(a)-[e]->(b) WHERE e.w > 1]{2,}");
    let GraphPart::Pattern(sub) = &result.patterns[0].parts[0] else {
        panic!("expected sub-pattern");
    };
    assert_eq!(sub.delimiter, PatternDelimiter::Bracket);
    assert!(sub.where_clause.is_some());
    assert_eq!(
        sub.quantifier.as_ref().map(|q| q.kind),
        Some(QuantifierKind::Range {
            lower: 2,
            upper: None
        })
    );
}

#[test]
fn several_patterns_in_one_match() {
    let expr = first_query("(g MATCH (a)-[:Knows]->(b), (b)-[:Likes]->(c))");
    let Expression::Parenthesized(inner, _) = &expr else {
        panic!("expected parenthesized match");
    };
    let Expression::GraphMatch(graph_match) = &**inner else {
        panic!("expected graph match");
    };
    assert_eq!(graph_match.patterns.len(), 2);
}

#[test]
fn invalid_patterns_report_errors() {
    let result = parse_graph_pattern("(a)-[e]->{3,1}(b)");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].message,
        "Syntax Error: invalid quantifier bound '1'."
    );

    let result = parse_graph_pattern("(a)<~[e]~>(b)");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code.as_deref(), Some("P005"));

    let result = parse_graph_pattern("");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.patterns.is_empty());
}
