//! End-to-End Parser Benchmarks
//!
//! Benchmarks are organized into the following groups:
//!
//! - **Queries**: SELECT-FROM-WHERE shapes, joins, bag operators, PIVOT
//! - **Mutations**: UPDATE, DELETE, INSERT and the single-action forms
//! - **Graph Patterns**: MATCH expressions and standalone pattern parsing
//! - **Stress Tests**: wide projections, long chains and deep nesting
//! - **Recovery**: inputs with syntax errors
//! - **Lexer-only**: tokenization without parsing
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench queries
//! cargo bench stress_tests
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use partiql_parser::{parse, parse_graph_pattern, tokenize};

// ============================================================================
// Query Benchmarks
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let queries = vec![
        ("minimal", "SELECT a FROM t"),
        ("select_value", "SELECT VALUE {'id': t.id, 'name': t.name} FROM t"),
        (
            "full_sfw",
            "SELECT DISTINCT c.region, COUNT(*) AS n FROM customers AS c AT i \
             WHERE c.active AND c.age BETWEEN 18 AND 65 GROUP BY c.region \
             HAVING COUNT(*) > 1 ORDER BY n DESC NULLS LAST LIMIT 10 OFFSET 5",
        ),
        (
            "joins",
            "SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.id INNER JOIN c ON b.k = c.k, d",
        ),
        (
            "bag_operators",
            "SELECT a FROM t UNION ALL SELECT b FROM u OUTER EXCEPT SELECT c FROM v",
        ),
        ("pivot", "PIVOT v.val AT v.key FROM data AS v"),
        (
            "nested_subquery",
            "SELECT x FROM t WHERE x IN (SELECT VALUE y FROM u WHERE u.z = t.z)",
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Mutation Benchmarks
// ============================================================================

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    let statements = vec![
        (
            "update",
            "UPDATE t AS x SET x.a = 1, x.b = x.b || 'z' REMOVE x.c WHERE x.d > 2",
        ),
        (
            "delete_returning",
            "DELETE FROM logs AS l WHERE l.level = 'debug' RETURNING ALL OLD *",
        ),
        (
            "insert_on_conflict",
            "INSERT INTO t AS x {'id': 1} ON CONFLICT (id) DO UPDATE EXCLUDED WHERE x.v < 3",
        ),
        ("legacy_insert", "INSERT INTO t.items[0] VALUE 1 AT 2"),
        (
            "create_table",
            "CREATE TABLE s.t (id INT NOT NULL, name VARCHAR(20), total DECIMAL(10, 2))",
        ),
    ];

    for (name, statement) in statements {
        group.bench_with_input(BenchmarkId::from_parameter(name), &statement, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Graph Pattern Benchmarks
// ============================================================================

fn bench_graph_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_patterns");

    let queries = vec![
        ("single_edge", "SELECT a FROM (g MATCH (a)-[e]->(b))"),
        (
            "selector_restrictor",
            "SELECT p FROM (g MATCH ANY SHORTEST TRAIL p = (a:Person)-[:Knows]->{1,5}(b))",
        ),
        (
            "label_algebra",
            "SELECT x FROM (g MATCH (x:(Person|Robot)&!Retired WHERE x.age > 3)~[e]~(y))",
        ),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    let standalone = "[(a)-[e:Road WHERE e.km < 10]->(b) WHERE a.open]{2,} <-[:Ferry]- (c)";
    group.bench_function("standalone_pattern", |b| {
        b.iter(|| parse_graph_pattern(black_box(standalone)));
    });

    group.finish();
}

// ============================================================================
// Stress Test Benchmarks
// ============================================================================

fn bench_large_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress_tests");
    group.sample_size(20);

    let items: Vec<String> = (0..500).map(|i| format!("t.c{i} AS a{i}")).collect();
    let wide = format!("SELECT {} FROM t", items.join(", "));
    group.bench_function("500_projection_items", |b| {
        b.iter(|| parse(black_box(&wide)));
    });

    let terms: Vec<String> = (0..500).map(|i| i.to_string()).collect();
    let chain = format!("SELECT x FROM t WHERE x IN [{}]", terms.join(", "));
    group.bench_function("500_element_in_list", |b| {
        b.iter(|| parse(black_box(&chain)));
    });

    let statements = "SELECT a FROM t WHERE a > 1;\n".repeat(200);
    group.bench_function("200_statements", |b| {
        b.iter(|| parse(black_box(&statements)));
    });

    let mut path = String::from("(n0)");
    for i in 1..=100 {
        path.push_str(&format!("-[e{i}]->(n{i})"));
    }
    group.bench_function("100_hop_pattern", |b| {
        b.iter(|| parse_graph_pattern(black_box(&path)));
    });

    group.finish();
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_nesting");
    group.sample_size(50);

    for depth in [5, 10, 20, 30].iter() {
        let mut expr = String::from("t.value");
        for i in 0..*depth {
            expr = format!("({} + {})", expr, i);
        }
        let query = format!("SELECT x FROM t WHERE {expr}");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_levels", depth)),
            &query,
            |b, q| {
                b.iter(|| parse(black_box(q)));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Recovery Benchmarks
// ============================================================================

fn bench_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery");

    let inputs = vec![
        ("missing_projection", "SELECT FROM t; SELECT b FROM u"),
        ("unclosed_paren", "SELECT (a + b FROM t WHERE c"),
        ("bad_dml", "UPDATE t WHERE a = 1; DELETE t; SELECT 1"),
        ("lexical_error", "SELECT a § FROM t"),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Lexer-only Benchmarks
// ============================================================================

fn bench_lexer_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_only");

    let inputs = vec![
        ("simple", "SELECT a FROM t WHERE a > 18"),
        (
            "literals",
            "SELECT 'it''s', 1.5e10, `{a: 1}`, \"Quoted\", <<1, 2>> FROM t -- note",
        ),
        (
            "keywords_heavy",
            "SELECT DISTINCT VALUE FROM WHERE GROUP BY HAVING ORDER LIMIT OFFSET UNION EXCEPT",
        ),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, q| {
            b.iter(|| tokenize(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Comparison Benchmarks (Lexer vs Parser)
// ============================================================================

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_stages");

    let query = "SELECT p.name FROM people AS p WHERE p.age > 25 ORDER BY p.name";

    group.bench_function("01_lexer_only", |b| {
        b.iter(|| tokenize(black_box(query)));
    });

    group.bench_function("02_parse", |b| {
        b.iter(|| parse(black_box(query)));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_queries,
    bench_mutations,
    bench_graph_patterns,
    bench_large_queries,
    bench_deep_nesting,
    bench_recovery,
    bench_lexer_only,
    bench_pipeline_stages,
);

criterion_main!(benches);
