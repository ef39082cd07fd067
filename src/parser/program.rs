//! Document and statement parsing.

use tracing::debug;

use crate::ast::{
    Document, ExecStatement, ExplainOption, ExplainPrefix, ExplainValue, Literal, Statement,
    StatementKind,
};
use crate::diag::Diag;
use crate::lexer::token::TokenKind;
use crate::parser::expression::is_expression_start;
use crate::parser::mutation::DML_START;
use crate::parser::primary::literal_kind;
use crate::parser::primitives::is_symbol_kind;
use crate::parser::recovery::STATEMENT_START_TOKENS;
use crate::parser::{PResult, Parser};

impl<'source> Parser<'source> {
    /// Parses every statement in the input.
    ///
    /// A statement that fails is dropped from the tree after its error is
    /// reported, and parsing resumes at the next `;` or statement keyword.
    pub(crate) fn parse_document(&mut self) -> Document {
        let mut statements = Vec::new();

        loop {
            while self.consume(TokenKind::Semicolon) {}
            if self.is_eof() || self.is_aborted() {
                break;
            }

            let start = self.current;
            let result = self.parse_statement();
            match self.recover(result) {
                Ok(Some(statement)) => {
                    if !statements.is_empty() && !self.options.allow_multiple_statements {
                        self.reject_extra_statement(&statement);
                    }
                    statements.push(statement);
                    self.finish_statement();
                }
                Ok(None) => {
                    self.synchronize_at_statement();
                    if self.current == start {
                        self.skip();
                    }
                }
                Err(_) => break,
            }
        }

        Document {
            statements,
            span: self.extent.clone(),
        }
    }

    /// A statement ends at `;`, at end of input, or where the next
    /// statement keyword begins.
    fn finish_statement(&mut self) {
        if self.at(TokenKind::Semicolon) || self.is_eof() || self.at_statement_start() {
            return;
        }
        let err = self.unexpected_expecting(&[TokenKind::Semicolon]);
        self.report(err);
        self.synchronize_at_statement();
    }

    fn reject_extra_statement(&mut self, statement: &Statement) {
        debug!(offset = statement.span.start, "rejecting additional statement");
        self.diagnostics.push(
            Diag::error("Syntax Error: multiple statements are not allowed.")
                .with_primary_label(statement.span.clone(), "additional statement")
                .with_code("P006"),
        );
    }

    /// `[EXPLAIN [(options)]] (query | dml | ddl | exec)`
    fn parse_statement(&mut self) -> PResult<Statement> {
        let start = self.peek().span.start;
        let explain = if self.at(TokenKind::Explain) {
            Some(self.parse_explain_prefix()?)
        } else {
            None
        };

        let kind = match self.peek_kind() {
            TokenKind::Create | TokenKind::Drop => StatementKind::Ddl(self.parse_ddl_statement()?),
            TokenKind::Exec => StatementKind::Exec(self.parse_exec_statement()?),
            kind if DML_START.contains(&kind) => {
                StatementKind::Dml(Box::new(self.parse_dml_statement()?))
            }
            _ => {
                self.note_expected_all(STATEMENT_START_TOKENS);
                StatementKind::Query(self.parse_expr()?)
            }
        };

        let statement = Statement {
            explain,
            kind,
            span: start..self.previous_end(),
        };
        debug!(
            kind = statement_kind_name(&statement.kind),
            start = statement.span.start,
            end = statement.span.end,
            "parsed statement"
        );
        Ok(statement)
    }

    /// `EXPLAIN [( name [=] value, ... )]`
    ///
    /// A parenthesis only opens an option list when it holds a name followed
    /// by `=`, another name or a literal; otherwise it belongs to the query.
    fn parse_explain_prefix(&mut self) -> PResult<ExplainPrefix> {
        let start = self.advance();
        let has_options = self.peek_kind() == TokenKind::LParen
            && is_symbol_kind(self.peek_nth_kind(1))
            && {
                let after = self.peek_nth_kind(2);
                after == TokenKind::Eq || is_symbol_kind(after) || literal_kind(after).is_some()
            };

        let mut options = Vec::new();
        if has_options {
            self.advance();
            options = self.parse_comma_list(Self::parse_explain_option)?;
            self.expect(TokenKind::RParen)?;
        }
        Ok(ExplainPrefix {
            options,
            span: start.start..self.previous_end(),
        })
    }

    fn parse_explain_option(&mut self) -> PResult<ExplainOption> {
        let name = self.parse_symbol()?;
        self.consume(TokenKind::Eq);
        let value = match literal_kind(self.peek_kind()) {
            Some(kind) => {
                let text = self.peek().text.clone();
                let span = self.advance();
                ExplainValue::Literal(Literal { kind, text, span })
            }
            None => ExplainValue::Identifier(self.parse_symbol()?),
        };
        let span = name.span.start..value.span().end;
        Ok(ExplainOption { name, value, span })
    }

    /// `EXEC procedure [arg, ...]`
    fn parse_exec_statement(&mut self) -> PResult<ExecStatement> {
        let start = self.expect(TokenKind::Exec)?;
        let procedure = self.parse_expr()?;
        let arguments = if is_expression_start(self.peek_kind()) {
            self.parse_comma_list(Self::parse_expr)?
        } else {
            Vec::new()
        };
        Ok(ExecStatement {
            procedure,
            arguments,
            span: start.start..self.previous_end(),
        })
    }
}

fn statement_kind_name(kind: &StatementKind) -> &'static str {
    match kind {
        StatementKind::Query(_) => "query",
        StatementKind::Dml(_) => "dml",
        StatementKind::Ddl(_) => "ddl",
        StatementKind::Exec(_) => "exec",
    }
}
