//! SFW queries and table references.
//!
//! Each clause recovers on its own: when a clause body fails to parse, the
//! error is reported and tokens are skipped up to the next clause keyword, so
//! `SELECT FROM t WHERE x` still yields FROM and WHERE clauses.

use crate::ast::{
    ExcludeClause, ExcludePath, ExcludeStep, ExpressionClause, FromClause, GroupByClause,
    GroupKey, Join, JoinKind, LetBinding, LetClause, NullsOrder, OrderByClause, OrderSpec,
    ProjectionItem, SelectClause, SelectQuery, SetQuantifier, SortDirection, SourceAliases,
    TableBase, TableReference, TableUnpivot,
};
use crate::lexer::token::TokenKind;
use crate::parser::base::Alternative;
use crate::parser::recovery::CLAUSE_START_TOKENS;
use crate::parser::{PResult, Parser};

/// Clause keywords plus the projection separator.
const PROJECTION_STOP_TOKENS: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::Exclude,
    TokenKind::From,
    TokenKind::Let,
    TokenKind::Where,
    TokenKind::Group,
    TokenKind::Having,
    TokenKind::Order,
    TokenKind::Limit,
    TokenKind::Offset,
    TokenKind::Union,
    TokenKind::Intersect,
    TokenKind::Except,
    TokenKind::Outer,
];

impl<'source> Parser<'source> {
    /// `[ALL | DISTINCT]`
    pub(crate) fn parse_set_quantifier(&mut self) -> Option<SetQuantifier> {
        if self.consume(TokenKind::All) {
            Some(SetQuantifier::All)
        } else if self.consume(TokenKind::Distinct) {
            Some(SetQuantifier::Distinct)
        } else {
            None
        }
    }

    pub(crate) fn parse_select_query(&mut self) -> PResult<SelectQuery> {
        let start = self.peek().span.start;
        let select = if self.at(TokenKind::Pivot) {
            self.parse_pivot_clause()?
        } else {
            self.parse_select_clause()?
        };

        let exclude = self.parse_optional_clause(TokenKind::Exclude, Self::parse_exclude_clause)?;
        let from = if self.at(TokenKind::From) {
            Some(self.parse_query_from_clause()?)
        } else {
            None
        };
        let let_clause = self.parse_optional_clause(TokenKind::Let, Self::parse_let_clause)?;
        let where_clause =
            self.parse_optional_clause(TokenKind::Where, Self::parse_expression_clause)?;
        let group_by = self.parse_optional_clause(TokenKind::Group, Self::parse_group_by_clause)?;
        let having =
            self.parse_optional_clause(TokenKind::Having, Self::parse_expression_clause)?;
        let order_by = self.parse_optional_clause(TokenKind::Order, Self::parse_order_by_clause)?;
        let limit = self.parse_optional_clause(TokenKind::Limit, Self::parse_expression_clause)?;
        let offset =
            self.parse_optional_clause(TokenKind::Offset, Self::parse_expression_clause)?;

        Ok(SelectQuery {
            select,
            exclude,
            from,
            let_clause,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
            span: start..self.previous_end(),
        })
    }

    /// Parses the clause introduced by `keyword` if present. A clause that
    /// fails is reported and dropped, and parsing resumes at the next clause.
    fn parse_optional_clause<T>(
        &mut self,
        keyword: TokenKind,
        parse: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<Option<T>> {
        if !self.at(keyword) {
            return Ok(None);
        }
        let result = parse(self);
        let clause = self.recover(result)?;
        if clause.is_none() {
            self.skip_until(CLAUSE_START_TOKENS);
        }
        Ok(clause)
    }

    // ========================================================================
    // SELECT / PIVOT
    // ========================================================================

    fn parse_select_clause(&mut self) -> PResult<SelectClause> {
        let select = self.expect(TokenKind::Select)?;
        let quantifier = self.parse_set_quantifier();

        if let Some(star) = self.consume_span(TokenKind::Star) {
            return Ok(SelectClause::All {
                quantifier,
                span: select.start..star.end,
            });
        }
        if self.consume(TokenKind::Value) {
            let value = self.parse_select_expr()?;
            let span = select.start..value.span().end;
            return Ok(SelectClause::Value {
                quantifier,
                value,
                span,
            });
        }

        let mut items = Vec::new();
        loop {
            let result = self.parse_projection_item();
            match self.recover(result)? {
                Some(item) => items.push(item),
                None => self.skip_until(PROJECTION_STOP_TOKENS),
            }
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        let end = items.last().map_or(select.end, |item| item.span.end);
        Ok(SelectClause::Items {
            quantifier,
            items,
            span: select.start..end,
        })
    }

    /// `expr [[AS] alias]`
    fn parse_projection_item(&mut self) -> PResult<ProjectionItem> {
        let expression = self.parse_select_expr()?;
        let alias = self.parse_alias(true)?;
        let start = expression.span().start;
        Ok(ProjectionItem {
            expression,
            alias,
            span: start..self.previous_end(),
        })
    }

    /// `PIVOT value AT key`
    fn parse_pivot_clause(&mut self) -> PResult<SelectClause> {
        let pivot = self.advance();
        let value = self.parse_select_expr()?;
        self.expect(TokenKind::At)?;
        let key = self.parse_select_expr()?;
        let span = pivot.start..key.span().end;
        Ok(SelectClause::Pivot { value, key, span })
    }

    // ========================================================================
    // Clauses
    // ========================================================================

    /// `EXCLUDE path, ...`
    fn parse_exclude_clause(&mut self) -> PResult<ExcludeClause> {
        let start = self.advance();
        let paths = self.parse_comma_list(Self::parse_exclude_path)?;
        Ok(ExcludeClause {
            paths,
            span: start.start..self.previous_end(),
        })
    }

    /// `name step+` where a step is `.name`, `.*`, `[literal]` or `[*]`.
    fn parse_exclude_path(&mut self) -> PResult<ExcludePath> {
        let root = self.parse_symbol()?;
        let mut steps = Vec::new();
        loop {
            if let Some(dot) = self.consume_span(TokenKind::Dot) {
                if let Some(star) = self.consume_span(TokenKind::Star) {
                    steps.push(ExcludeStep::AllFields(dot.start..star.end));
                } else {
                    let name = self.parse_symbol()?;
                    let span = dot.start..name.span.end;
                    steps.push(ExcludeStep::Field(name, span));
                }
            } else if let Some(open) = self.consume_span(TokenKind::LBracket) {
                if self.consume(TokenKind::Star) {
                    let close = self.expect(TokenKind::RBracket)?;
                    steps.push(ExcludeStep::AllElements(open.start..close.end));
                } else if self.at_any(&[TokenKind::IntegerLiteral, TokenKind::StringLiteral]) {
                    let index = self.parse_primary()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    steps.push(ExcludeStep::Index(index, open.start..close.end));
                } else {
                    return Err(self.unexpected());
                }
            } else {
                break;
            }
        }
        if steps.is_empty() {
            return Err(self.unexpected());
        }
        let span = root.span.start..self.previous_end();
        Ok(ExcludePath { root, steps, span })
    }

    /// FROM inside a query: a failed source is reported and the clause is
    /// kept without one.
    fn parse_query_from_clause(&mut self) -> PResult<FromClause> {
        let from = self.advance();
        let result = self.parse_table_reference();
        let source = self.recover(result)?;
        if source.is_none() {
            self.skip_until(CLAUSE_START_TOKENS);
        }
        let end = source.as_ref().map_or(from.end, |source| source.span().end);
        Ok(FromClause {
            source,
            span: from.start..end,
        })
    }

    /// `FROM table_reference`
    pub(crate) fn parse_from_clause(&mut self) -> PResult<FromClause> {
        let from = self.expect(TokenKind::From)?;
        let source = self.parse_table_reference()?;
        let span = from.start..source.span().end;
        Ok(FromClause {
            source: Some(source),
            span,
        })
    }

    /// `LET expr AS name, ...`
    fn parse_let_clause(&mut self) -> PResult<LetClause> {
        let start = self.advance();
        let bindings = self.parse_comma_list(|p| {
            let expression = p.parse_select_expr()?;
            p.expect(TokenKind::As)?;
            let alias = p.parse_symbol()?;
            let span = expression.span().start..alias.span.end;
            Ok(LetBinding {
                expression,
                alias,
                span,
            })
        })?;
        Ok(LetClause {
            bindings,
            span: start.start..self.previous_end(),
        })
    }

    /// `WHERE`, `HAVING`, `LIMIT` or `OFFSET` followed by an expression.
    pub(crate) fn parse_expression_clause(&mut self) -> PResult<ExpressionClause> {
        let keyword = self.advance();
        let expression = self.parse_select_expr()?;
        let span = keyword.start..expression.span().end;
        Ok(ExpressionClause { expression, span })
    }

    /// `GROUP [PARTIAL] BY key [AS name], ... [GROUP AS name]`
    fn parse_group_by_clause(&mut self) -> PResult<GroupByClause> {
        let start = self.advance();
        let partial = self.consume(TokenKind::Partial);
        self.expect(TokenKind::By)?;
        let keys = self.parse_comma_list(|p| {
            let expression = p.parse_select_expr()?;
            let alias = p.parse_alias(false)?;
            let span = expression.span().start..p.previous_end();
            Ok(GroupKey {
                expression,
                alias,
                span,
            })
        })?;
        let group_as = if self.peek_kind() == TokenKind::Group
            && self.peek_nth_kind(1) == TokenKind::As
        {
            self.advance();
            self.advance();
            Some(self.parse_symbol()?)
        } else {
            None
        };
        Ok(GroupByClause {
            partial,
            keys,
            group_as,
            span: start.start..self.previous_end(),
        })
    }

    /// `ORDER BY spec, ...`
    fn parse_order_by_clause(&mut self) -> PResult<OrderByClause> {
        let start = self.advance();
        self.expect(TokenKind::By)?;
        let specs = self.parse_comma_list(Self::parse_order_spec)?;
        Ok(OrderByClause {
            specs,
            span: start.start..self.previous_end(),
        })
    }

    /// `expr [ASC | DESC] [NULLS FIRST | NULLS LAST]`
    pub(crate) fn parse_order_spec(&mut self) -> PResult<OrderSpec> {
        let expression = self.parse_select_expr()?;
        let direction = if self.consume(TokenKind::Asc) {
            Some(SortDirection::Asc)
        } else if self.consume(TokenKind::Desc) {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let nulls = if self.consume(TokenKind::Nulls) {
            if self.consume(TokenKind::First) {
                Some(NullsOrder::First)
            } else {
                self.expect(TokenKind::Last)?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        let span = expression.span().start..self.previous_end();
        Ok(OrderSpec {
            expression,
            direction,
            nulls,
            span,
        })
    }

    // ========================================================================
    // Table references
    // ========================================================================

    /// A table primary followed by any number of joins, left-associative.
    pub(crate) fn parse_table_reference(&mut self) -> PResult<TableReference> {
        let mut lhs = self.parse_table_primary()?;

        while let Some(kind) = self.parse_join_keyword()? {
            let rhs = self.parse_table_primary()?;
            let on = if kind != JoinKind::Cross && self.consume(TokenKind::On) {
                Some(self.parse_select_expr()?)
            } else {
                None
            };
            let span = lhs.span().start..self.previous_end();
            lhs = TableReference::Join(Box::new(Join {
                kind,
                lhs,
                rhs,
                on,
                span,
            }));
        }

        Ok(lhs)
    }

    /// Consumes a join operator: `,`, `CROSS JOIN`, `[INNER] JOIN`,
    /// `LEFT|RIGHT|FULL [OUTER] JOIN` or `OUTER JOIN`.
    fn parse_join_keyword(&mut self) -> PResult<Option<JoinKind>> {
        if self.consume(TokenKind::Comma) {
            return Ok(Some(JoinKind::Cross));
        }
        let kind = if self.at(TokenKind::Cross) {
            JoinKind::Cross
        } else if self.at(TokenKind::Inner) {
            JoinKind::Inner
        } else if self.at(TokenKind::Left) {
            JoinKind::Left
        } else if self.at(TokenKind::Right) {
            JoinKind::Right
        } else if self.at(TokenKind::Full) {
            JoinKind::Full
        } else if self.at(TokenKind::Join) {
            self.advance();
            return Ok(Some(JoinKind::Inner));
        } else if self.peek_kind() == TokenKind::Outer && self.peek_nth_kind(1) == TokenKind::Join
        {
            self.advance();
            self.advance();
            return Ok(Some(JoinKind::Outer));
        } else {
            return Ok(None);
        };

        self.advance();
        if matches!(kind, JoinKind::Left | JoinKind::Right | JoinKind::Full) {
            self.consume(TokenKind::Outer);
        }
        self.expect(TokenKind::Join)?;
        Ok(Some(kind))
    }

    fn parse_table_primary(&mut self) -> PResult<TableReference> {
        if self.at(TokenKind::Unpivot) {
            let start = self.advance();
            let source = self.parse_select_expr()?;
            let aliases = self.parse_source_aliases()?;
            return Ok(TableReference::Unpivot(TableUnpivot {
                source,
                aliases,
                span: start.start..self.previous_end(),
            }));
        }

        if self.peek_kind() == TokenKind::LParen && self.paren_contains_join() {
            return self.alternatives(
                "table reference",
                0,
                &[
                    Alternative {
                        first: &[TokenKind::LParen],
                        parse: Self::parse_wrapped_table_reference,
                    },
                    Alternative {
                        first: &[TokenKind::LParen],
                        parse: |p| p.parse_table_base().map(TableReference::Base),
                    },
                ],
            );
        }

        self.parse_table_base().map(TableReference::Base)
    }

    /// `( table_reference )`
    fn parse_wrapped_table_reference(&mut self) -> PResult<TableReference> {
        let open = self.expect(TokenKind::LParen)?;
        let inner = self.nested(Self::parse_table_reference)?;
        if !matches!(inner, TableReference::Join(_) | TableReference::Wrapped(..)) {
            return Err(self.unexpected_expecting(&[TokenKind::Join]));
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(TableReference::Wrapped(Box::new(inner), open.start..close.end))
    }

    /// True when a join keyword appears before the `)` matching the current
    /// `(`, outside any nested sub-query. Only then can the parenthesis hold a
    /// table reference rather than an expression.
    fn paren_contains_join(&self) -> bool {
        let tokens = &self.tokens[self.current..];
        let mut depth = 0usize;
        let mut subquery_depth = None;
        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LParen => {
                    depth += 1;
                    let opens_query = matches!(
                        tokens.get(index + 1).map(|next| next.kind),
                        Some(TokenKind::Select | TokenKind::Pivot)
                    );
                    if subquery_depth.is_none() && opens_query {
                        subquery_depth = Some(depth);
                    }
                }
                TokenKind::RParen => {
                    if subquery_depth == Some(depth) {
                        subquery_depth = None;
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Join | TokenKind::Cross if subquery_depth.is_none() => return true,
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    /// `expr [[AS] alias] [AT alias] [BY alias]`
    pub(crate) fn parse_table_base(&mut self) -> PResult<TableBase> {
        let source = self.parse_select_expr()?;
        let aliases = self.parse_source_aliases()?;
        let span = source.span().start..self.previous_end();
        Ok(TableBase {
            source,
            aliases,
            span,
        })
    }

    pub(crate) fn parse_source_aliases(&mut self) -> PResult<SourceAliases> {
        let returning_follows = self.peek_kind() == TokenKind::Returning
            && matches!(
                self.peek_nth_kind(1),
                TokenKind::Modified | TokenKind::All
            );
        let as_alias = self.parse_alias(!returning_follows)?;
        let at_alias = if self.consume(TokenKind::At) {
            Some(self.parse_symbol()?)
        } else {
            None
        };
        let by_alias = if self.consume(TokenKind::By) {
            Some(self.parse_symbol()?)
        } else {
            None
        };
        Ok(SourceAliases {
            as_alias,
            at_alias,
            by_alias,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, GraphPart};
    use crate::lexer::tokenize;
    use crate::options::ParseOptions;

    fn parse_query(source: &str) -> SelectQuery {
        let (query, diagnostics) = parse_query_with_errors(source);
        assert_eq!(diagnostics, 0, "unexpected diagnostics for {source}");
        query
    }

    fn parse_query_with_errors(source: &str) -> (SelectQuery, usize) {
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        match parser.parse_select_query() {
            Ok(query) => (query, parser.diagnostics.len()),
            Err(err) => panic!("{source}: {}", err.message),
        }
    }

    fn source_of(query: &SelectQuery) -> &TableReference {
        match query.from.as_ref().and_then(|from| from.source.as_ref()) {
            Some(source) => source,
            None => panic!("query has no FROM source"),
        }
    }

    #[test]
    fn every_clause_in_order() {
        let query = parse_query(
            "SELECT DISTINCT a AS x, b y EXCLUDE t.c, t.d[0] FROM t LET a + 1 AS z \
             WHERE a > 1 GROUP PARTIAL BY a AS k GROUP AS g HAVING COUNT(*) > 2 \
             ORDER BY k DESC NULLS LAST, b LIMIT 10 OFFSET 5",
        );
        let SelectClause::Items {
            quantifier, items, ..
        } = &query.select
        else {
            panic!("expected projection items");
        };
        assert_eq!(*quantifier, Some(SetQuantifier::Distinct));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].alias.as_ref().map(|a| a.name.as_str()), Some("y"));
        assert_eq!(query.exclude.as_ref().map(|e| e.paths.len()), Some(2));
        assert!(query.let_clause.is_some());
        assert!(query.where_clause.is_some());
        let group_by = query.group_by.as_ref();
        assert!(group_by.is_some_and(|g| g.partial && g.group_as.is_some()));
        assert!(query.having.is_some());
        let order_by = query.order_by.as_ref();
        assert_eq!(
            order_by.map(|o| (o.specs[0].direction, o.specs[0].nulls)),
            Some((Some(SortDirection::Desc), Some(NullsOrder::Last)))
        );
        assert!(query.limit.is_some());
        assert!(query.offset.is_some());
    }

    #[test]
    fn select_star_and_value() {
        let query = parse_query("SELECT * FROM t");
        assert!(matches!(query.select, SelectClause::All { span, .. } if span == (0..8)));

        let query = parse_query("SELECT VALUE {'a': v} FROM t AS v");
        assert!(matches!(query.select, SelectClause::Value { .. }));
    }

    #[test]
    fn pivot() {
        let query = parse_query("PIVOT v AT k FROM t AS v AT k");
        assert!(matches!(query.select, SelectClause::Pivot { .. }));
        let TableReference::Base(base) = source_of(&query) else {
            panic!("expected base table");
        };
        assert!(base.aliases.as_alias.is_some() && base.aliases.at_alias.is_some());
    }

    #[test]
    fn join_kinds() {
        let query = parse_query(
            "SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.id CROSS JOIN c, d OUTER JOIN e",
        );
        let TableReference::Join(outer) = source_of(&query) else {
            panic!("expected join");
        };
        assert_eq!(outer.kind, JoinKind::Outer);
        assert!(outer.on.is_none());
        let TableReference::Join(comma) = &outer.lhs else {
            panic!("expected join");
        };
        assert_eq!(comma.kind, JoinKind::Cross);
        let TableReference::Join(cross) = &comma.lhs else {
            panic!("expected join");
        };
        assert_eq!(cross.kind, JoinKind::Cross);
        let TableReference::Join(left) = &cross.lhs else {
            panic!("expected join");
        };
        assert_eq!(left.kind, JoinKind::Left);
        assert!(left.on.is_some());
    }

    #[test]
    fn parenthesized_join_and_subquery_sources() {
        let query = parse_query("SELECT * FROM (a JOIN b ON TRUE) INNER JOIN c ON TRUE");
        let TableReference::Join(join) = source_of(&query) else {
            panic!("expected join");
        };
        assert!(matches!(join.lhs, TableReference::Wrapped(..)));

        let query = parse_query("SELECT * FROM (SELECT a FROM t) AS s");
        assert!(matches!(source_of(&query), TableReference::Base(_)));
    }

    #[test]
    fn unpivot_and_aliases() {
        let query = parse_query("SELECT * FROM UNPIVOT t.attrs AS v AT k");
        let TableReference::Unpivot(unpivot) = source_of(&query) else {
            panic!("expected UNPIVOT");
        };
        let names: Vec<_> = unpivot.aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["v", "k"]);
    }

    #[test]
    fn graph_match_as_source() {
        let query = parse_query("SELECT a FROM g MATCH (a)-[e]->(b) WHERE a.x = 1");
        let TableReference::Base(base) = source_of(&query) else {
            panic!("expected base table");
        };
        let Expression::GraphMatch(graph_match) = &base.source else {
            panic!("expected graph match");
        };
        let parts = &graph_match.patterns[0].parts;
        assert!(matches!(parts[..], [GraphPart::Node(_), GraphPart::Edge(_), GraphPart::Node(_)]));
        assert!(query.where_clause.is_some());
    }

    #[test]
    fn missing_projection_keeps_from_and_where() {
        let (query, diagnostics) = parse_query_with_errors("SELECT FROM WHERE true");
        assert_eq!(diagnostics, 1);
        assert!(matches!(
            &query.select,
            SelectClause::Items { items, span, .. } if items.is_empty() && *span == (0..6)
        ));
        let from = query.from.as_ref();
        assert!(from.is_some_and(|f| f.source.is_none() && f.span == (7..11)));
        assert!(query.where_clause.is_some());
    }

    #[test]
    fn broken_projection_item_keeps_its_neighbours() {
        let (query, diagnostics) = parse_query_with_errors("SELECT a, +, b FROM t");
        assert_eq!(diagnostics, 1);
        let SelectClause::Items { items, .. } = &query.select else {
            panic!("expected projection items");
        };
        assert_eq!(items.len(), 2);
        assert!(query.from.is_some());
    }

    #[test]
    fn exclude_path_needs_a_step() {
        let (query, diagnostics) = parse_query_with_errors("SELECT * EXCLUDE t FROM t");
        assert_eq!(diagnostics, 1);
        assert!(query.exclude.is_none());
        assert!(query.from.is_some());
    }
}
