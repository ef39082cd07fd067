mod common;

use common::*;
use partiql_parser::ast::{
    BagOperator, CollectionKind, Expression, JoinKind, PathStep, SelectClause, SetQuantifier,
    StatementKind, TableReference,
};

fn select_query(source: &str) -> partiql_parser::ast::SelectQuery {
    match &first_query(source) {
        Expression::Query(query) => (**query).clone(),
        other => panic!("expected SELECT in `{source}`, got {other:?}"),
    }
}

#[test]
fn full_sfw_query_parses_cleanly() {
    let query = select_query(
        "SELECT DISTINCT c.region, COUNT(*) AS n \
         FROM customers AS c AT i \
         LET c.age * 2 AS doubled \
         WHERE c.active AND doubled > 40 \
         GROUP BY c.region GROUP AS g \
         HAVING COUNT(*) > 1 \
         ORDER BY n DESC NULLS FIRST \
         LIMIT 10 OFFSET 20",
    );
    assert!(matches!(
        query.select,
        SelectClause::Items { quantifier: Some(SetQuantifier::Distinct), ref items, .. } if items.len() == 2
    ));
    assert!(query.from.is_some());
    assert!(query.let_clause.is_some());
    assert!(query.where_clause.is_some());
    assert!(query.group_by.as_ref().is_some_and(|g| g.group_as.is_some()));
    assert!(query.having.is_some());
    assert!(query.order_by.is_some());
    assert!(query.limit.is_some());
    assert!(query.offset.is_some());
}

#[test]
fn keywords_are_case_insensitive() {
    let query = select_query("select a from t where a > 1 order by a asc");
    assert!(query.where_clause.is_some());
    assert!(query.order_by.is_some());
}

#[test]
fn comments_are_skipped() {
    let query = select_query("SELECT a -- the column\nFROM t /* the table */ WHERE a = 1");
    assert!(query.from.is_some());
    assert!(query.where_clause.is_some());
}

#[test]
fn query_without_from() {
    let query = select_query("SELECT 1 + 1 AS two");
    assert!(query.from.is_none());
}

#[test]
fn non_reserved_keywords_as_names() {
    let query = select_query("SELECT acyclic, modified, shortest FROM trail");
    let SelectClause::Items { items, .. } = &query.select else {
        panic!("expected projection items");
    };
    assert_eq!(items.len(), 3);
}

#[test]
fn bag_operators_are_left_associative() {
    let expr = first_query(
        "SELECT a FROM t UNION ALL SELECT b FROM u OUTER EXCEPT SELECT c FROM v",
    );
    let Expression::BagOperation(outer) = &expr else {
        panic!("expected bag operation");
    };
    assert_eq!(outer.operator, BagOperator::Except);
    assert!(outer.outer);
    let Expression::BagOperation(inner) = &outer.lhs else {
        panic!("expected nested bag operation");
    };
    assert_eq!(inner.operator, BagOperator::Union);
    assert_eq!(inner.quantifier, Some(SetQuantifier::All));
    assert!(!inner.outer);
}

#[test]
fn bag_operator_in_where_belongs_to_outer_query() {
    let expr = first_query("SELECT a FROM t WHERE a > 1 UNION SELECT b FROM u");
    assert!(matches!(expr, Expression::BagOperation(_)));
}

#[test]
fn operator_precedence() {
    let cases = [
        ("a OR b AND c", "(a OR (b AND c))"),
        ("a AND b OR c", "((a AND b) OR c)"),
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("1 - 2 - 3", "((1 - 2) - 3)"),
        ("NOT a = b", "(Not (a = b))"),
        ("NOT a AND b", "((Not a) AND b)"),
        ("a || b = c", "((a || b) = c)"),
        ("-a * b", "((Minus a) * b)"),
        ("a < b < c", "((a < b) < c)"),
        ("x BETWEEN 1 + 1 AND 5 AND y", "((x BETWEEN (1 + 1) AND 5) AND y)"),
        ("s LIKE 'a%' OR t", "((s LIKE 'a%') OR t)"),
    ];
    for (source, expected) in cases {
        assert_eq!(render(&first_query(source), source), expected, "{source}");
    }
}

#[test]
fn path_navigation_steps() {
    let expr = first_query("t.a[0].*[*]");
    let Expression::Path(path) = &expr else {
        panic!("expected path");
    };
    assert!(matches!(
        path.steps[..],
        [
            PathStep::Field(..),
            PathStep::Index(..),
            PathStep::AllFields(_),
            PathStep::AllElements(_)
        ]
    ));
    assert_eq!(path.span, 0..11);
}

#[test]
fn collection_constructors() {
    let expr = first_query("<<1, [2, 3], {'k': (4, 5)}>>");
    let Expression::Collection(bag) = &expr else {
        panic!("expected bag");
    };
    assert_eq!(bag.kind, CollectionKind::Bag);
    assert_eq!(bag.elements.len(), 3);
    assert!(matches!(bag.elements[1], Expression::Collection(ref list) if list.kind == CollectionKind::Array));
}

#[test]
fn subqueries_compose_with_predicates() {
    let query = select_query(
        "SELECT a FROM t WHERE a IN (SELECT VALUE b FROM u) AND EXISTS(SELECT * FROM v)",
    );
    assert!(query.where_clause.is_some());
}

#[test]
fn joins_in_from_clause() {
    let query = select_query(
        "SELECT * FROM a INNER JOIN b ON a.id = b.id CROSS JOIN c FULL JOIN d ON TRUE",
    );
    let from = query.from.as_ref().and_then(|f| f.source.as_ref());
    let Some(TableReference::Join(join)) = from else {
        panic!("expected join");
    };
    assert_eq!(join.kind, JoinKind::Full);
    assert!(join.on.is_some());
}

#[test]
fn subquery_with_join_is_a_table_source() {
    let query = select_query("SELECT * FROM (SELECT a FROM b JOIN c ON true) AS x");
    let Some(TableReference::Base(base)) = query.from.as_ref().and_then(|f| f.source.as_ref())
    else {
        panic!("expected a base table reference");
    };
    assert!(matches!(base.source, Expression::Parenthesized(..)));
    assert_eq!(base.aliases.as_alias.as_ref().map(|a| a.name.as_str()), Some("x"));

    let query = select_query("SELECT * FROM (SELECT a FROM b JOIN c ON true) x WHERE x.a = 1");
    assert!(query.where_clause.is_some());
    let Some(TableReference::Base(base)) = query.from.as_ref().and_then(|f| f.source.as_ref())
    else {
        panic!("expected a base table reference");
    };
    assert_eq!(base.aliases.as_alias.as_ref().map(|a| a.name.as_str()), Some("x"));
}

#[test]
fn parenthesized_join_is_wrapped() {
    let query = select_query("SELECT * FROM (a JOIN (SELECT v FROM w) AS s ON true)");
    let Some(TableReference::Wrapped(inner, _)) =
        query.from.as_ref().and_then(|f| f.source.as_ref())
    else {
        panic!("expected a wrapped join");
    };
    assert!(matches!(**inner, TableReference::Join(_)));
}

#[test]
fn graph_match_in_from_clause() {
    let query = select_query(
        "SELECT x.name FROM (g MATCH (x:Person)-[:Knows]->(y:Person)) WHERE x.age > 30",
    );
    assert!(query.from.is_some());
}

#[test]
fn explain_wraps_any_statement() {
    let document = parse_cleanly("EXPLAIN SELECT * FROM t; EXPLAIN (format 'json') DELETE FROM t");
    assert_eq!(document.statements.len(), 2);
    assert!(document.statements.iter().all(|s| s.explain.is_some()));
    assert!(matches!(document.statements[1].kind, StatementKind::Dml(_)));
}
