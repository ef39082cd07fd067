//! DDL: CREATE and DROP for tables and indexes.

use crate::ast::{
    ColumnConstraint, ColumnConstraintKind, ColumnDefinition, CreateIndex, CreateTable,
    DdlStatement, DropIndex, DropTable, QualifiedName,
};
use crate::lexer::token::TokenKind;
use crate::parser::base::Alternative;
use crate::parser::{PResult, Parser};

impl<'source> Parser<'source> {
    /// `CREATE TABLE ...`, `CREATE INDEX ...`, `DROP TABLE ...` or
    /// `DROP INDEX ...`, decided on the token after CREATE/DROP.
    pub(crate) fn parse_ddl_statement(&mut self) -> PResult<DdlStatement> {
        if self.peek_kind() == TokenKind::Drop {
            self.alternatives(
                "DROP statement",
                1,
                &[
                    Alternative {
                        first: &[TokenKind::Table],
                        parse: Self::parse_drop_table,
                    },
                    Alternative {
                        first: &[TokenKind::Index],
                        parse: Self::parse_drop_index,
                    },
                ],
            )
        } else {
            self.alternatives(
                "CREATE statement",
                1,
                &[
                    Alternative {
                        first: &[TokenKind::Table],
                        parse: Self::parse_create_table,
                    },
                    Alternative {
                        first: &[TokenKind::Index],
                        parse: Self::parse_create_index,
                    },
                ],
            )
        }
    }

    fn parse_create_table(&mut self) -> PResult<DdlStatement> {
        let start = self.expect(TokenKind::Create)?;
        self.expect(TokenKind::Table)?;
        let name = self.parse_qualified_name()?;
        let columns = if self.consume(TokenKind::LParen) {
            let columns = self.parse_comma_list(Self::parse_column_definition)?;
            self.expect(TokenKind::RParen)?;
            Some(columns)
        } else {
            None
        };
        Ok(DdlStatement::CreateTable(CreateTable {
            name,
            columns,
            span: start.start..self.previous_end(),
        }))
    }

    /// `CREATE INDEX ON table (path, ...)`
    fn parse_create_index(&mut self) -> PResult<DdlStatement> {
        let start = self.expect(TokenKind::Create)?;
        self.expect(TokenKind::Index)?;
        self.expect(TokenKind::On)?;
        let table = self.parse_symbol()?;
        self.expect(TokenKind::LParen)?;
        let paths = self.parse_comma_list(Self::parse_simple_path)?;
        let end = self.expect(TokenKind::RParen)?;
        Ok(DdlStatement::CreateIndex(CreateIndex {
            table,
            paths,
            span: start.start..end.end,
        }))
    }

    fn parse_drop_table(&mut self) -> PResult<DdlStatement> {
        let start = self.expect(TokenKind::Drop)?;
        self.expect(TokenKind::Table)?;
        let name = self.parse_qualified_name()?;
        let span = start.start..name.span.end;
        Ok(DdlStatement::DropTable(DropTable { name, span }))
    }

    /// `DROP INDEX index ON table`
    fn parse_drop_index(&mut self) -> PResult<DdlStatement> {
        let start = self.expect(TokenKind::Drop)?;
        self.expect(TokenKind::Index)?;
        let index = self.parse_symbol()?;
        self.expect(TokenKind::On)?;
        let table = self.parse_symbol()?;
        let span = start.start..table.span.end;
        Ok(DdlStatement::DropIndex(DropIndex { index, table, span }))
    }

    fn parse_qualified_name(&mut self) -> PResult<QualifiedName> {
        let mut name = self.parse_symbol()?;
        let start = name.span.start;
        let mut qualifiers = Vec::new();
        while self.consume(TokenKind::Dot) {
            let next = self.parse_symbol()?;
            qualifiers.push(std::mem::replace(&mut name, next));
        }
        let span = start..name.span.end;
        Ok(QualifiedName {
            qualifiers,
            name,
            span,
        })
    }

    /// `name type [CONSTRAINT name] (NOT NULL | NULL) ...`
    fn parse_column_definition(&mut self) -> PResult<ColumnDefinition> {
        let name = self.parse_symbol()?;
        let ty = self.parse_type()?;
        let mut constraints = Vec::new();
        loop {
            let start = self.peek().span.start;
            let constraint_name = if self.consume(TokenKind::Constraint) {
                Some(self.parse_symbol()?)
            } else {
                None
            };
            let kind = if self.at(TokenKind::Not) {
                self.advance();
                self.expect(TokenKind::Null)?;
                ColumnConstraintKind::NotNull
            } else if self.consume(TokenKind::Null) {
                ColumnConstraintKind::Null
            } else if constraint_name.is_some() {
                return Err(self.unexpected());
            } else {
                break;
            };
            constraints.push(ColumnConstraint {
                name: constraint_name,
                kind,
                span: start..self.previous_end(),
            });
        }
        let span = name.span.start..self.previous_end();
        Ok(ColumnDefinition {
            name,
            ty,
            constraints,
            span,
        })
    }
}
