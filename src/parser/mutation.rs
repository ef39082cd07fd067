//! DML statements: the five statement shapes, base actions, ON CONFLICT and
//! RETURNING.

use crate::ast::{
    Assignment, ConflictAction, ConflictTarget, DeleteStatement, DmlAction, DmlStatement,
    Expression, ExpressionClause, FromActionsStatement, Insert, InsertReturningStatement,
    LegacyInsert, LegacyOnConflict, Literal, LiteralKind, OnConflict, RemoveAction,
    ReplaceOrUpsert, ReturningAge, ReturningClause, ReturningColumn, ReturningStatus, SetAction,
    SimplePath, SimplePathStep, SimpleSource, UpdateStatement,
};
use crate::lexer::token::TokenKind;
use crate::parser::base::Alternative;
use crate::parser::{PResult, Parser};

/// Tokens that begin a base DML action.
const ACTION_START: &[TokenKind] = &[
    TokenKind::Insert,
    TokenKind::Set,
    TokenKind::Replace,
    TokenKind::Upsert,
    TokenKind::Remove,
];

/// Tokens that begin any DML statement.
pub(crate) const DML_START: &[TokenKind] = &[
    TokenKind::Update,
    TokenKind::From,
    TokenKind::Delete,
    TokenKind::Insert,
    TokenKind::Set,
    TokenKind::Replace,
    TokenKind::Upsert,
    TokenKind::Remove,
];

impl<'source> Parser<'source> {
    /// Tries the DML shapes in order: UPDATE, FROM, DELETE, INSERT with
    /// RETURNING, then a single base action.
    pub(crate) fn parse_dml_statement(&mut self) -> PResult<DmlStatement> {
        self.alternatives(
            "DML statement",
            0,
            &[
                Alternative {
                    first: &[TokenKind::Update],
                    parse: Self::parse_update_statement,
                },
                Alternative {
                    first: &[TokenKind::From],
                    parse: Self::parse_from_actions_statement,
                },
                Alternative {
                    first: &[TokenKind::Delete],
                    parse: Self::parse_delete_statement,
                },
                Alternative {
                    first: &[TokenKind::Insert],
                    parse: Self::parse_insert_returning_statement,
                },
                Alternative {
                    first: ACTION_START,
                    parse: |p| p.parse_dml_action().map(DmlStatement::Action),
                },
            ],
        )
    }

    /// `UPDATE source action+ [WHERE expr] [RETURNING ...]`
    fn parse_update_statement(&mut self) -> PResult<DmlStatement> {
        let start = self.expect(TokenKind::Update)?;
        let target = self.parse_table_base()?;
        let actions = self.parse_dml_actions()?;
        let where_clause = self.parse_dml_where()?;
        let returning = self.parse_optional_returning()?;
        Ok(DmlStatement::Update(UpdateStatement {
            target,
            actions,
            where_clause,
            returning,
            span: start.start..self.previous_end(),
        }))
    }

    /// `FROM source [WHERE expr] action+ [RETURNING ...]`
    fn parse_from_actions_statement(&mut self) -> PResult<DmlStatement> {
        let from = self.parse_from_clause()?;
        let where_clause = self.parse_dml_where()?;
        let actions = self.parse_dml_actions()?;
        let returning = self.parse_optional_returning()?;
        let span = from.span.start..self.previous_end();
        Ok(DmlStatement::FromActions(FromActionsStatement {
            from,
            where_clause,
            actions,
            returning,
            span,
        }))
    }

    /// `DELETE FROM path [aliases] [WHERE expr] [RETURNING ...]`
    fn parse_delete_statement(&mut self) -> PResult<DmlStatement> {
        let start = self.expect(TokenKind::Delete)?;
        self.expect(TokenKind::From)?;
        let source = self.parse_simple_source()?;
        let where_clause = self.parse_dml_where()?;
        let returning = self.parse_optional_returning()?;
        Ok(DmlStatement::Delete(DeleteStatement {
            source,
            where_clause,
            returning,
            span: start.start..self.previous_end(),
        }))
    }

    /// A legacy INSERT followed by a mandatory RETURNING clause.
    fn parse_insert_returning_statement(&mut self) -> PResult<DmlStatement> {
        let insert = self.parse_legacy_insert()?;
        if !self.at(TokenKind::Returning) {
            return Err(self.unexpected());
        }
        let returning = self.parse_returning()?;
        let span = insert.span.start..returning.span.end;
        Ok(DmlStatement::InsertReturning(InsertReturningStatement {
            insert,
            returning,
            span,
        }))
    }

    fn parse_simple_source(&mut self) -> PResult<SimpleSource> {
        let path = self.parse_simple_path()?;
        let aliases = self.parse_source_aliases()?;
        let span = path.span.start..self.previous_end();
        Ok(SimpleSource {
            path,
            aliases,
            span,
        })
    }

    fn parse_dml_where(&mut self) -> PResult<Option<ExpressionClause>> {
        if self.at(TokenKind::Where) {
            self.parse_expression_clause().map(Some)
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Base actions
    // ========================================================================

    fn parse_dml_actions(&mut self) -> PResult<Vec<DmlAction>> {
        let mut actions = vec![self.parse_dml_action()?];
        while self.at_any(ACTION_START) {
            actions.push(self.parse_dml_action()?);
        }
        Ok(actions)
    }

    fn parse_dml_action(&mut self) -> PResult<DmlAction> {
        match self.peek_kind() {
            TokenKind::Insert => self.parse_insert(),
            TokenKind::Set => self.parse_set_action(),
            TokenKind::Replace => self
                .parse_replace_or_upsert()
                .map(DmlAction::Replace),
            TokenKind::Upsert => self.parse_replace_or_upsert().map(DmlAction::Upsert),
            TokenKind::Remove => {
                let start = self.advance();
                let path = self.parse_simple_path()?;
                let span = start.start..path.span.end;
                Ok(DmlAction::Remove(RemoveAction { path, span }))
            }
            _ => Err(self.unexpected_expecting(ACTION_START)),
        }
    }

    /// Picks between the legacy and the modern INSERT on the token after the
    /// target name. A bracket there is ambiguous (`t[0] VALUE ...` versus the
    /// array value in `t [1, 2]`), so the legacy form is tried first.
    fn parse_insert(&mut self) -> PResult<DmlAction> {
        match self.peek_nth_kind(3) {
            TokenKind::Dot | TokenKind::Value => {
                self.parse_legacy_insert().map(DmlAction::LegacyInsert)
            }
            TokenKind::LBracket => {
                match self.speculate(Self::parse_legacy_insert) {
                    Ok(insert) => return Ok(DmlAction::LegacyInsert(insert)),
                    Err(err) if self.is_aborted() => return Err(err),
                    Err(_) => {}
                }
                self.parse_modern_insert().map(DmlAction::Insert)
            }
            _ => self.parse_modern_insert().map(DmlAction::Insert),
        }
    }

    /// `INSERT INTO name [AS alias] value [ON CONFLICT ...]`
    fn parse_modern_insert(&mut self) -> PResult<Insert> {
        let start = self.expect(TokenKind::Insert)?;
        self.expect(TokenKind::Into)?;
        let target = self.parse_symbol()?;
        let alias = self.parse_alias(false)?;
        let value = self.parse_expr()?;
        let on_conflict = if self.at_on_conflict() {
            Some(self.parse_on_conflict()?)
        } else {
            None
        };
        Ok(Insert {
            target,
            alias,
            value,
            on_conflict,
            span: start.start..self.previous_end(),
        })
    }

    /// `INSERT INTO path VALUE value [AT position] [ON CONFLICT WHERE cond DO NOTHING]`
    fn parse_legacy_insert(&mut self) -> PResult<LegacyInsert> {
        let start = self.expect(TokenKind::Insert)?;
        self.expect(TokenKind::Into)?;
        let target = self.parse_simple_path()?;
        self.expect(TokenKind::Value)?;
        let value = self.parse_expr()?;
        let position = if self.consume(TokenKind::At) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let on_conflict = if self.at_on_conflict() {
            let on = self.advance();
            self.advance();
            self.expect(TokenKind::Where)?;
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Do)?;
            let end = self.expect(TokenKind::Nothing)?;
            Some(LegacyOnConflict {
                condition,
                span: on.start..end.end,
            })
        } else {
            None
        };
        Ok(LegacyInsert {
            target,
            value,
            position,
            on_conflict,
            span: start.start..self.previous_end(),
        })
    }

    fn at_on_conflict(&mut self) -> bool {
        self.at(TokenKind::On) && self.peek_nth_kind(1) == TokenKind::Conflict
    }

    /// `ON CONFLICT [target] DO (NOTHING | REPLACE EXCLUDED | UPDATE EXCLUDED) [WHERE cond]`
    fn parse_on_conflict(&mut self) -> PResult<OnConflict> {
        let on = self.advance();
        self.expect(TokenKind::Conflict)?;

        let target = if let Some(open) = self.consume_span(TokenKind::LParen) {
            let columns = self.parse_comma_list(Self::parse_symbol)?;
            let close = self.expect(TokenKind::RParen)?;
            Some(ConflictTarget::Columns(columns, open.start..close.end))
        } else if self.at(TokenKind::On) && self.peek_nth_kind(1) == TokenKind::Constraint {
            let start = self.advance();
            self.advance();
            let name = self.parse_symbol()?;
            let span = start.start..name.span.end;
            Some(ConflictTarget::Constraint(name, span))
        } else {
            None
        };

        let action_start = self.expect(TokenKind::Do)?.start;
        let action = if let Some(nothing) = self.consume_span(TokenKind::Nothing) {
            ConflictAction::DoNothing(action_start..nothing.end)
        } else if self.consume(TokenKind::Replace) {
            self.expect(TokenKind::Excluded)?;
            let condition = self.parse_conflict_condition()?;
            ConflictAction::DoReplace {
                condition,
                span: action_start..self.previous_end(),
            }
        } else if self.consume(TokenKind::Update) {
            self.expect(TokenKind::Excluded)?;
            let condition = self.parse_conflict_condition()?;
            ConflictAction::DoUpdate {
                condition,
                span: action_start..self.previous_end(),
            }
        } else {
            return Err(self.unexpected());
        };

        Ok(OnConflict {
            target,
            action,
            span: on.start..self.previous_end(),
        })
    }

    fn parse_conflict_condition(&mut self) -> PResult<Option<Expression>> {
        if self.consume(TokenKind::Where) {
            self.parse_expr().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `SET path = expr, ...`
    fn parse_set_action(&mut self) -> PResult<DmlAction> {
        let start = self.advance();
        let assignments = self.parse_comma_list(|p| {
            let target = p.parse_simple_path()?;
            p.expect(TokenKind::Eq)?;
            let value = p.parse_expr()?;
            let span = target.span.start..value.span().end;
            Ok(Assignment {
                target,
                value,
                span,
            })
        })?;
        Ok(DmlAction::Set(SetAction {
            assignments,
            span: start.start..self.previous_end(),
        }))
    }

    /// `REPLACE|UPSERT INTO name [AS alias] value`
    fn parse_replace_or_upsert(&mut self) -> PResult<ReplaceOrUpsert> {
        let start = self.advance();
        self.expect(TokenKind::Into)?;
        let target = self.parse_symbol()?;
        let alias = self.parse_alias(false)?;
        let value = self.parse_expr()?;
        let span = start.start..value.span().end;
        Ok(ReplaceOrUpsert {
            target,
            alias,
            value,
            span,
        })
    }

    // ========================================================================
    // RETURNING and simple paths
    // ========================================================================

    fn parse_optional_returning(&mut self) -> PResult<Option<ReturningClause>> {
        if self.at(TokenKind::Returning) {
            self.parse_returning().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `RETURNING (MODIFIED|ALL) (OLD|NEW) (* | expr), ...`
    fn parse_returning(&mut self) -> PResult<ReturningClause> {
        let start = self.advance();
        let columns = self.parse_comma_list(Self::parse_returning_column)?;
        Ok(ReturningClause {
            columns,
            span: start.start..self.previous_end(),
        })
    }

    fn parse_returning_column(&mut self) -> PResult<ReturningColumn> {
        let start = self.peek().span.start;
        let status = if self.consume(TokenKind::Modified) {
            ReturningStatus::Modified
        } else if self.consume(TokenKind::All) {
            ReturningStatus::All
        } else {
            return Err(self.unexpected());
        };
        let age = if self.consume(TokenKind::Old) {
            ReturningAge::Old
        } else if self.consume(TokenKind::New) {
            ReturningAge::New
        } else {
            return Err(self.unexpected());
        };
        let expression = if self.consume(TokenKind::Star) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        Ok(ReturningColumn {
            status,
            age,
            expression,
            span: start..self.previous_end(),
        })
    }

    /// `name ( [literal] | [name] | .name )*`
    pub(crate) fn parse_simple_path(&mut self) -> PResult<SimplePath> {
        let root = self.parse_symbol()?;
        let mut steps = Vec::new();
        loop {
            if let Some(dot) = self.consume_span(TokenKind::Dot) {
                let name = self.parse_symbol()?;
                let span = dot.start..name.span.end;
                steps.push(SimplePathStep::Field(name, span));
            } else if let Some(open) = self.consume_span(TokenKind::LBracket) {
                self.note_expected_all(&[TokenKind::StringLiteral, TokenKind::IntegerLiteral]);
                let literal_kind = match self.peek_kind() {
                    TokenKind::StringLiteral => Some(LiteralKind::String),
                    TokenKind::IntegerLiteral => Some(LiteralKind::Integer),
                    _ => None,
                };
                let step = match literal_kind {
                    Some(kind) => {
                        let text = self.peek().text.clone();
                        let span = self.advance();
                        let literal = Literal { kind, text, span };
                        let close = self.expect(TokenKind::RBracket)?;
                        SimplePathStep::Literal(literal, open.start..close.end)
                    }
                    None => {
                        let name = self.parse_symbol()?;
                        let close = self.expect(TokenKind::RBracket)?;
                        SimplePathStep::Symbol(name, open.start..close.end)
                    }
                };
                steps.push(step);
            } else {
                break;
            }
        }
        let span = root.span.start..self.previous_end();
        Ok(SimplePath { root, steps, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::options::ParseOptions;

    fn parse_dml(source: &str) -> DmlStatement {
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let stmt = parser.parse_dml_statement();
        assert!(parser.diagnostics.is_empty(), "{:?}", parser.diagnostics);
        assert!(parser.is_eof(), "trailing input in {source}");
        match stmt {
            Ok(stmt) => stmt,
            Err(err) => panic!("{source}: {}", err.message),
        }
    }

    fn parse_action(source: &str) -> DmlAction {
        match parse_dml(source) {
            DmlStatement::Action(action) => action,
            other => panic!("{source} parsed as {other:?}"),
        }
    }

    #[test]
    fn update_with_actions_where_and_returning() {
        let DmlStatement::Update(update) =
            parse_dml("UPDATE t AS x SET x.a = 1, x.b = 2 REMOVE x.c WHERE x.id = 3 RETURNING MODIFIED NEW *")
        else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.actions.len(), 2);
        assert!(update.where_clause.is_some());
        let returning = update.returning.as_ref();
        assert!(returning.is_some_and(|r| r.columns[0].expression.is_none()
            && r.columns[0].status == ReturningStatus::Modified
            && r.columns[0].age == ReturningAge::New));
    }

    #[test]
    fn from_shape() {
        let DmlStatement::FromActions(stmt) =
            parse_dml("FROM t WHERE t.a > 1 SET t.b = 0 RETURNING ALL OLD t.b")
        else {
            panic!("expected FROM statement");
        };
        assert!(stmt.where_clause.is_some());
        assert_eq!(stmt.actions.len(), 1);
        assert!(stmt.returning.is_some());
    }

    #[test]
    fn delete_with_aliases() {
        let DmlStatement::Delete(delete) = parse_dml("DELETE FROM t.items[0] x AT i WHERE x.a = 1")
        else {
            panic!("expected DELETE");
        };
        assert_eq!(delete.source.path.steps.len(), 2);
        assert_eq!(
            delete.source.aliases.as_alias.as_ref().map(|a| a.name.as_str()),
            Some("x")
        );
        assert!(delete.source.aliases.at_alias.is_some());
        assert!(delete.where_clause.is_some());
    }

    #[test]
    fn delete_alias_stops_before_returning() {
        let DmlStatement::Delete(delete) = parse_dml("DELETE FROM t RETURNING MODIFIED OLD *")
        else {
            panic!("expected DELETE");
        };
        assert!(delete.source.aliases.is_empty());
        assert!(delete.returning.is_some());
    }

    #[test]
    fn legacy_insert_with_returning() {
        let DmlStatement::InsertReturning(stmt) =
            parse_dml("INSERT INTO t VALUE {'a': 1} AT 0 RETURNING ALL NEW *")
        else {
            panic!("expected INSERT ... RETURNING");
        };
        assert!(stmt.insert.position.is_some());
    }

    #[test]
    fn legacy_insert_forms() {
        let DmlAction::LegacyInsert(insert) =
            parse_action("INSERT INTO t.a[0] VALUE 1 ON CONFLICT WHERE a = 1 DO NOTHING")
        else {
            panic!("expected legacy INSERT");
        };
        assert_eq!(insert.target.steps.len(), 2);
        assert!(insert.on_conflict.is_some());

        let DmlAction::LegacyInsert(insert) = parse_action("INSERT INTO t['k'] VALUE 2") else {
            panic!("expected legacy INSERT");
        };
        assert!(matches!(
            insert.target.steps[0],
            SimplePathStep::Literal(ref literal, _) if literal.kind == LiteralKind::String
        ));
    }

    #[test]
    fn modern_insert_forms() {
        let DmlAction::Insert(insert) = parse_action("INSERT INTO t [1, 2]") else {
            panic!("expected INSERT");
        };
        assert!(insert.on_conflict.is_none());

        let DmlAction::Insert(insert) =
            parse_action("INSERT INTO t AS x <<{'a': 1}>> ON CONFLICT (a, b) DO NOTHING")
        else {
            panic!("expected INSERT");
        };
        assert!(insert.alias.is_some());
        let on_conflict = insert.on_conflict.as_ref();
        assert!(on_conflict.is_some_and(|c| matches!(c.target, Some(ConflictTarget::Columns(ref cols, _)) if cols.len() == 2)
            && matches!(c.action, ConflictAction::DoNothing(_))));

        let DmlAction::Insert(insert) = parse_action(
            "INSERT INTO t {'a': 1} ON CONFLICT ON CONSTRAINT pk DO UPDATE EXCLUDED WHERE t.v < 2",
        ) else {
            panic!("expected INSERT");
        };
        let on_conflict = insert.on_conflict.as_ref();
        assert!(on_conflict.is_some_and(|c| matches!(c.target, Some(ConflictTarget::Constraint(..)))
            && matches!(c.action, ConflictAction::DoUpdate { condition: Some(_), .. })));

        let DmlAction::Insert(insert) =
            parse_action("INSERT INTO t SELECT * FROM u ON CONFLICT DO REPLACE EXCLUDED")
        else {
            panic!("expected INSERT");
        };
        assert!(insert.on_conflict.is_some_and(|c| matches!(
            c.action,
            ConflictAction::DoReplace { condition: None, .. }
        )));
    }

    #[test]
    fn replace_upsert_and_remove() {
        assert!(matches!(
            parse_action("REPLACE INTO t AS x {'a': 1}"),
            DmlAction::Replace(ReplaceOrUpsert { alias: Some(_), .. })
        ));
        assert!(matches!(
            parse_action("UPSERT INTO t {'a': 1}"),
            DmlAction::Upsert(ReplaceOrUpsert { alias: None, .. })
        ));
        let DmlAction::Remove(remove) = parse_action("REMOVE t[x].y") else {
            panic!("expected REMOVE");
        };
        assert!(matches!(remove.path.steps[0], SimplePathStep::Symbol(..)));
        assert_eq!(remove.span, 0..13);
    }

    #[test]
    fn update_needs_an_action() {
        let source = "UPDATE t WHERE a = 1";
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let err = parser.parse_dml_statement().err();
        assert!(err.is_some_and(|e| e.message == "Unexpected token 'WHERE'."
            && e.expected.contains(&TokenKind::Set)));
    }
}
