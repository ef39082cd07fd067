//! Structural properties that hold for every parse: determinism, lossless
//! tokenization and well-nested spans.

mod common;

use common::*;
use partiql_parser::ast::{ancestors_at_offset, node_at_offset};
use partiql_parser::{parse, tokenize};

const CORPUS: &[&str] = &[
    "SELECT DISTINCT c.region, COUNT(*) AS n FROM customers AS c AT i \
     WHERE c.active AND c.age BETWEEN 18 AND 65 GROUP BY c.region GROUP AS g \
     HAVING COUNT(*) > 1 ORDER BY n DESC NULLS LAST LIMIT 10 OFFSET 5",
    "SELECT VALUE {'id': t.id, 'tags': [1, 2, <<3>>]} FROM t WHERE t.name LIKE 'a%' ESCAPE '!'",
    "SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.id, c CROSS JOIN d",
    "SELECT a FROM t UNION ALL SELECT b FROM u",
    "PIVOT v.val AT v.key FROM data AS v",
    "SELECT x.name FROM (g MATCH ANY SHORTEST TRAIL p = (x:Person|Bot)-[e:Knows WHERE e.w > 1]->{1,3}(y)) AS m",
    "SELECT CASE WHEN a IS NULL THEN 0 ELSE CAST(a AS INT) END FROM t WHERE a NOT IN (1, 2, 3)",
    "UPDATE t AS x SET x.a = 1, x.b = x.b || 'z' REMOVE x.c WHERE x.d > 2 RETURNING MODIFIED NEW *",
    "INSERT INTO t AS x {'id': 1} ON CONFLICT (id) DO UPDATE EXCLUDED WHERE x.v < 3",
    "INSERT INTO t.items[0] VALUE 1 AT 2 RETURNING ALL OLD *",
    "DELETE FROM t.items AS i AT n WHERE i.flag",
    "CREATE TABLE s.t (id INT NOT NULL, name VARCHAR(20) CONSTRAINT nn NULL)",
    "CREATE INDEX ON t (a, b.c); DROP INDEX i ON t; DROP TABLE s.t",
    "EXPLAIN (format 'json', verbose true) EXEC refresh 'orders', 7",
];

#[test]
fn corpus_parses_cleanly() {
    for source in CORPUS {
        parse_cleanly(source);
    }
}

#[test]
fn parsing_is_deterministic() {
    let broken = ["SELECT FROM WHERE", "UPDATE t SET", "(a)-[", "SELECT (((1"];
    for source in CORPUS.iter().chain(broken.iter()) {
        assert_eq!(parse(source), parse(source), "{source}");
    }
}

#[test]
fn tokens_reproduce_the_source() {
    let extra = [
        "SELECT a -- trailing comment",
        "SELECT /* block */ 'it''s' FROM \"Quoted\"\"Name\"",
        "SELECT 🥝 § FROM t",
        "`{a: 1}` || 1.5e10",
    ];
    for source in CORPUS.iter().chain(extra.iter()) {
        let text: String = tokenize(source).tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(&text, source);
    }
}

#[test]
fn child_spans_nest_inside_parents_in_source_order() {
    for source in CORPUS {
        let document = parse_cleanly(source);
        for node in all_nodes(&document) {
            let parent = node.span();
            let children = node.children();
            for child in &children {
                let span = child.span();
                assert!(
                    parent.start <= span.start && span.end <= parent.end,
                    "{} {:?} escapes {} {:?} in `{source}`",
                    child.kind_name(),
                    span,
                    node.kind_name(),
                    parent
                );
            }
            for pair in children.windows(2) {
                assert!(
                    pair[0].span().end <= pair[1].span().start,
                    "{} and {} overlap in `{source}`",
                    pair[0].kind_name(),
                    pair[1].kind_name()
                );
            }
        }
    }
}

#[test]
fn node_lookup_by_offset() {
    let source = "SELECT a FROM t WHERE b > 1";
    let document = parse_cleanly(source);
    let kinds: Vec<&str> = ancestors_at_offset(&document, 22)
        .iter()
        .map(|node| node.kind_name())
        .collect();
    assert_eq!(
        kinds,
        [
            "Document",
            "Statement",
            "SelectQuery",
            "Clause",
            "Binary",
            "VariableReference",
            "Identifier"
        ]
    );
    assert_eq!(node_at_offset(&document, 22).map(|n| n.span()), Some(22..23));
    assert!(node_at_offset(&document, 500).is_none());
}

#[test]
fn parser_never_panics_on_random_text() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::WARN)
        .try_init();

    const FRAGMENTS: &[&str] = &[
        "SELECT", "FROM", "WHERE", "MATCH", "INSERT", "INTO", "VALUE", "ON", "CONFLICT", "(",
        ")", "[", "]", "{", "}", "<<", ">>", "-", "~", "<", ">", ",", ";", ":", ".", "*", "'s",
        "`ion", "\"q", "/*", "--", "1", "2.5", "x", "AND", "NOT", "BETWEEN", "LIKE", "§", " ",
    ];

    let mut seed = 0x5EED_u64;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    for round in 0..2_000 {
        let len = next() % 30;
        let source: String = if round % 2 == 0 {
            (0..len).map(|_| FRAGMENTS[next() % FRAGMENTS.len()]).collect::<Vec<_>>().join(" ")
        } else {
            let bytes: Vec<u8> = (0..len).map(|_| (next() % 128) as u8).collect();
            String::from_utf8_lossy(&bytes).into_owned()
        };
        let outcome = std::panic::catch_unwind(|| {
            let result = parse(&source);
            let patterns = partiql_parser::parse_graph_pattern(&source);
            (result.diagnostics.len(), patterns.diagnostics.len())
        });
        assert!(outcome.is_ok(), "parser panicked on `{source}`");
    }
}
