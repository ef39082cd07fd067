//! Read-only navigation over a parsed [`Document`].
//!
//! Hover, completion and formatting tools need three questions answered about
//! the tree: which node sits at a byte offset, what its children are, and what
//! span it covers. [`NodeRef`] is a borrowed, uniform view of every node type
//! that answers the latter two; [`node_at_offset`] and [`ancestors_at_offset`]
//! answer the first.

use crate::ast::catalog::{ColumnConstraint, ColumnDefinition, DdlStatement, QualifiedName};
use crate::ast::expression::{
    Expression, Identifier, InTarget, Literal, PathStep, SpecialFormKind, StructField, ValueRow,
    WhenBranch, WindowSpecification,
};
use crate::ast::graph::{
    EdgeSpec, GraphPart, GraphPattern, LabelExpression, MatchSelector, Quantifier, Restrictor,
};
use crate::ast::mutation::{
    Assignment, ConflictAction, ConflictTarget, DmlAction, DmlStatement, LegacyInsert,
    LegacyOnConflict, OnConflict, ReturningClause, ReturningColumn, SimplePath, SimplePathStep,
    SimpleSource,
};
use crate::ast::program::{
    Document, ExecStatement, ExplainOption, ExplainPrefix, ExplainValue, Statement, StatementKind,
};
use crate::ast::query::{
    ExcludeClause, ExcludePath, ExcludeStep, ExpressionClause, FromClause, GroupByClause,
    GroupKey, LetBinding, LetClause, OrderByClause, OrderSpec, ProjectionItem, SelectClause,
    SelectQuery, SourceAliases, TableBase, TableReference,
};
use crate::ast::types::TypeName;
use crate::ast::{Span, span_covers_offset};

/// A borrowed reference to any span-carrying node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Statement(&'a Statement),
    Explain(&'a ExplainPrefix),
    ExplainOption(&'a ExplainOption),
    Exec(&'a ExecStatement),
    Ddl(&'a DdlStatement),
    QualifiedName(&'a QualifiedName),
    ColumnDefinition(&'a ColumnDefinition),
    ColumnConstraint(&'a ColumnConstraint),
    Dml(&'a DmlStatement),
    DmlAction(&'a DmlAction),
    SimpleSource(&'a SimpleSource),
    OnConflict(&'a OnConflict),
    ConflictTarget(&'a ConflictTarget),
    ConflictAction(&'a ConflictAction),
    LegacyOnConflict(&'a LegacyOnConflict),
    Assignment(&'a Assignment),
    Returning(&'a ReturningClause),
    ReturningColumn(&'a ReturningColumn),
    SimplePath(&'a SimplePath),
    SimplePathStep(&'a SimplePathStep),
    Expression(&'a Expression),
    Identifier(&'a Identifier),
    Literal(&'a Literal),
    Type(&'a TypeName),
    PathStep(&'a PathStep),
    InTarget(&'a InTarget),
    WhenBranch(&'a WhenBranch),
    StructField(&'a StructField),
    ValueRow(&'a ValueRow),
    WindowSpecification(&'a WindowSpecification),
    SelectClause(&'a SelectClause),
    ProjectionItem(&'a ProjectionItem),
    Clause(&'a ExpressionClause),
    Exclude(&'a ExcludeClause),
    ExcludePath(&'a ExcludePath),
    ExcludeStep(&'a ExcludeStep),
    Let(&'a LetClause),
    LetBinding(&'a LetBinding),
    GroupBy(&'a GroupByClause),
    GroupKey(&'a GroupKey),
    OrderBy(&'a OrderByClause),
    OrderSpec(&'a OrderSpec),
    From(&'a FromClause),
    TableReference(&'a TableReference),
    TableBase(&'a TableBase),
    MatchSelector(&'a MatchSelector),
    GraphPattern(&'a GraphPattern),
    Restrictor(&'a Restrictor),
    GraphPart(&'a GraphPart),
    EdgeSpec(&'a EdgeSpec),
    Quantifier(&'a Quantifier),
    Label(&'a LabelExpression),
}

impl<'a> NodeRef<'a> {
    /// Source span covered by this node.
    pub fn span(&self) -> Span {
        match self {
            NodeRef::Document(node) => node.span.clone(),
            NodeRef::Statement(node) => node.span.clone(),
            NodeRef::Explain(node) => node.span.clone(),
            NodeRef::ExplainOption(node) => node.span.clone(),
            NodeRef::Exec(node) => node.span.clone(),
            NodeRef::Ddl(node) => node.span(),
            NodeRef::QualifiedName(node) => node.span.clone(),
            NodeRef::ColumnDefinition(node) => node.span.clone(),
            NodeRef::ColumnConstraint(node) => node.span.clone(),
            NodeRef::Dml(node) => node.span(),
            NodeRef::DmlAction(node) => node.span(),
            NodeRef::SimpleSource(node) => node.span.clone(),
            NodeRef::OnConflict(node) => node.span.clone(),
            NodeRef::ConflictTarget(node) => node.span(),
            NodeRef::ConflictAction(node) => node.span(),
            NodeRef::LegacyOnConflict(node) => node.span.clone(),
            NodeRef::Assignment(node) => node.span.clone(),
            NodeRef::Returning(node) => node.span.clone(),
            NodeRef::ReturningColumn(node) => node.span.clone(),
            NodeRef::SimplePath(node) => node.span.clone(),
            NodeRef::SimplePathStep(node) => node.span(),
            NodeRef::Expression(node) => node.span(),
            NodeRef::Identifier(node) => node.span.clone(),
            NodeRef::Literal(node) => node.span.clone(),
            NodeRef::Type(node) => node.span.clone(),
            NodeRef::PathStep(node) => node.span(),
            NodeRef::InTarget(node) => node.span(),
            NodeRef::WhenBranch(node) => node.span.clone(),
            NodeRef::StructField(node) => node.span.clone(),
            NodeRef::ValueRow(node) => node.span.clone(),
            NodeRef::WindowSpecification(node) => node.span.clone(),
            NodeRef::SelectClause(node) => node.span(),
            NodeRef::ProjectionItem(node) => node.span.clone(),
            NodeRef::Clause(node) => node.span.clone(),
            NodeRef::Exclude(node) => node.span.clone(),
            NodeRef::ExcludePath(node) => node.span.clone(),
            NodeRef::ExcludeStep(node) => node.span(),
            NodeRef::Let(node) => node.span.clone(),
            NodeRef::LetBinding(node) => node.span.clone(),
            NodeRef::GroupBy(node) => node.span.clone(),
            NodeRef::GroupKey(node) => node.span.clone(),
            NodeRef::OrderBy(node) => node.span.clone(),
            NodeRef::OrderSpec(node) => node.span.clone(),
            NodeRef::From(node) => node.span.clone(),
            NodeRef::TableReference(node) => node.span(),
            NodeRef::TableBase(node) => node.span.clone(),
            NodeRef::MatchSelector(node) => node.span.clone(),
            NodeRef::GraphPattern(node) => node.span.clone(),
            NodeRef::Restrictor(node) => node.span.clone(),
            NodeRef::GraphPart(node) => node.span(),
            NodeRef::EdgeSpec(node) => node.span.clone(),
            NodeRef::Quantifier(node) => node.span.clone(),
            NodeRef::Label(node) => node.span(),
        }
    }

    /// Stable, human-readable name of the node's syntactic category.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Document(_) => "Document",
            NodeRef::Statement(_) => "Statement",
            NodeRef::Explain(_) => "Explain",
            NodeRef::ExplainOption(_) => "ExplainOption",
            NodeRef::Exec(_) => "Exec",
            NodeRef::Ddl(node) => match node {
                DdlStatement::CreateTable(_) => "CreateTable",
                DdlStatement::CreateIndex(_) => "CreateIndex",
                DdlStatement::DropTable(_) => "DropTable",
                DdlStatement::DropIndex(_) => "DropIndex",
            },
            NodeRef::QualifiedName(_) => "QualifiedName",
            NodeRef::ColumnDefinition(_) => "ColumnDefinition",
            NodeRef::ColumnConstraint(_) => "ColumnConstraint",
            NodeRef::Dml(node) => match node {
                DmlStatement::Update(_) => "Update",
                DmlStatement::FromActions(_) => "FromActions",
                DmlStatement::Delete(_) => "Delete",
                DmlStatement::InsertReturning(_) => "InsertReturning",
                DmlStatement::Action(_) => "DmlActionStatement",
            },
            NodeRef::DmlAction(node) => match node {
                DmlAction::Insert(_) => "Insert",
                DmlAction::LegacyInsert(_) => "LegacyInsert",
                DmlAction::Set(_) => "Set",
                DmlAction::Replace(_) => "Replace",
                DmlAction::Upsert(_) => "Upsert",
                DmlAction::Remove(_) => "Remove",
            },
            NodeRef::SimpleSource(_) => "SimpleSource",
            NodeRef::OnConflict(_) => "OnConflict",
            NodeRef::ConflictTarget(_) => "ConflictTarget",
            NodeRef::ConflictAction(_) => "ConflictAction",
            NodeRef::LegacyOnConflict(_) => "LegacyOnConflict",
            NodeRef::Assignment(_) => "Assignment",
            NodeRef::Returning(_) => "Returning",
            NodeRef::ReturningColumn(_) => "ReturningColumn",
            NodeRef::SimplePath(_) => "SimplePath",
            NodeRef::SimplePathStep(_) => "SimplePathStep",
            NodeRef::Expression(expr) => expression_kind_name(expr),
            NodeRef::Identifier(_) => "Identifier",
            NodeRef::Literal(_) => "Literal",
            NodeRef::Type(_) => "Type",
            NodeRef::PathStep(_) => "PathStep",
            NodeRef::InTarget(_) => "InTarget",
            NodeRef::WhenBranch(_) => "WhenBranch",
            NodeRef::StructField(_) => "StructField",
            NodeRef::ValueRow(_) => "ValueRow",
            NodeRef::WindowSpecification(_) => "WindowSpecification",
            NodeRef::SelectClause(node) => match node {
                SelectClause::All { .. } => "SelectAll",
                SelectClause::Items { .. } => "SelectItems",
                SelectClause::Value { .. } => "SelectValue",
                SelectClause::Pivot { .. } => "SelectPivot",
            },
            NodeRef::ProjectionItem(_) => "ProjectionItem",
            NodeRef::Clause(_) => "Clause",
            NodeRef::Exclude(_) => "Exclude",
            NodeRef::ExcludePath(_) => "ExcludePath",
            NodeRef::ExcludeStep(_) => "ExcludeStep",
            NodeRef::Let(_) => "Let",
            NodeRef::LetBinding(_) => "LetBinding",
            NodeRef::GroupBy(_) => "GroupBy",
            NodeRef::GroupKey(_) => "GroupKey",
            NodeRef::OrderBy(_) => "OrderBy",
            NodeRef::OrderSpec(_) => "OrderSpec",
            NodeRef::From(_) => "From",
            NodeRef::TableReference(node) => match node {
                TableReference::Base(_) => "TableBase",
                TableReference::Unpivot(_) => "TableUnpivot",
                TableReference::Join(_) => "Join",
                TableReference::Wrapped(..) => "TableWrapped",
            },
            NodeRef::TableBase(_) => "TableBase",
            NodeRef::MatchSelector(_) => "MatchSelector",
            NodeRef::GraphPattern(_) => "GraphPattern",
            NodeRef::Restrictor(_) => "Restrictor",
            NodeRef::GraphPart(node) => match node {
                GraphPart::Node(_) => "NodePattern",
                GraphPart::Edge(_) => "EdgePattern",
                GraphPart::Pattern(_) => "SubPattern",
            },
            NodeRef::EdgeSpec(_) => "EdgeSpec",
            NodeRef::Quantifier(_) => "Quantifier",
            NodeRef::Label(_) => "LabelExpression",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Children::default();
        match *self {
            NodeRef::Document(doc) => out.extend(doc.statements.iter().map(NodeRef::Statement)),
            NodeRef::Statement(stmt) => {
                out.opt(stmt.explain.as_ref().map(NodeRef::Explain));
                match &stmt.kind {
                    StatementKind::Query(expr) => out.push(NodeRef::Expression(expr)),
                    StatementKind::Dml(dml) => out.push(NodeRef::Dml(dml)),
                    StatementKind::Ddl(ddl) => out.push(NodeRef::Ddl(ddl)),
                    StatementKind::Exec(exec) => out.push(NodeRef::Exec(exec)),
                }
            }
            NodeRef::Explain(explain) => {
                out.extend(explain.options.iter().map(NodeRef::ExplainOption))
            }
            NodeRef::ExplainOption(option) => {
                out.push(NodeRef::Identifier(&option.name));
                out.push(match &option.value {
                    ExplainValue::Identifier(ident) => NodeRef::Identifier(ident),
                    ExplainValue::Literal(literal) => NodeRef::Literal(literal),
                });
            }
            NodeRef::Exec(exec) => {
                out.push(NodeRef::Expression(&exec.procedure));
                out.extend(exec.arguments.iter().map(NodeRef::Expression));
            }
            NodeRef::Ddl(ddl) => match ddl {
                DdlStatement::CreateTable(stmt) => {
                    out.push(NodeRef::QualifiedName(&stmt.name));
                    if let Some(columns) = &stmt.columns {
                        out.extend(columns.iter().map(NodeRef::ColumnDefinition));
                    }
                }
                DdlStatement::CreateIndex(stmt) => {
                    out.push(NodeRef::Identifier(&stmt.table));
                    out.extend(stmt.paths.iter().map(NodeRef::SimplePath));
                }
                DdlStatement::DropTable(stmt) => out.push(NodeRef::QualifiedName(&stmt.name)),
                DdlStatement::DropIndex(stmt) => {
                    out.push(NodeRef::Identifier(&stmt.index));
                    out.push(NodeRef::Identifier(&stmt.table));
                }
            },
            NodeRef::QualifiedName(name) => {
                out.extend(name.qualifiers.iter().map(NodeRef::Identifier));
                out.push(NodeRef::Identifier(&name.name));
            }
            NodeRef::ColumnDefinition(column) => {
                out.push(NodeRef::Identifier(&column.name));
                out.push(NodeRef::Type(&column.ty));
                out.extend(column.constraints.iter().map(NodeRef::ColumnConstraint));
            }
            NodeRef::ColumnConstraint(constraint) => {
                out.opt(constraint.name.as_ref().map(NodeRef::Identifier))
            }
            NodeRef::Dml(dml) => dml_children(dml, &mut out),
            NodeRef::DmlAction(action) => action_children(action, &mut out),
            NodeRef::SimpleSource(source) => {
                out.push(NodeRef::SimplePath(&source.path));
                out.aliases(&source.aliases);
            }
            NodeRef::OnConflict(conflict) => {
                out.opt(conflict.target.as_ref().map(NodeRef::ConflictTarget));
                out.push(NodeRef::ConflictAction(&conflict.action));
            }
            NodeRef::ConflictTarget(target) => match target {
                ConflictTarget::Columns(columns, _) => {
                    out.extend(columns.iter().map(NodeRef::Identifier))
                }
                ConflictTarget::Constraint(name, _) => out.push(NodeRef::Identifier(name)),
            },
            NodeRef::ConflictAction(action) => match action {
                ConflictAction::DoNothing(_) => {}
                ConflictAction::DoReplace { condition, .. }
                | ConflictAction::DoUpdate { condition, .. } => {
                    out.opt(condition.as_ref().map(NodeRef::Expression))
                }
            },
            NodeRef::LegacyOnConflict(conflict) => {
                out.push(NodeRef::Expression(&conflict.condition))
            }
            NodeRef::Assignment(assignment) => {
                out.push(NodeRef::SimplePath(&assignment.target));
                out.push(NodeRef::Expression(&assignment.value));
            }
            NodeRef::Returning(returning) => {
                out.extend(returning.columns.iter().map(NodeRef::ReturningColumn))
            }
            NodeRef::ReturningColumn(column) => {
                out.opt(column.expression.as_ref().map(NodeRef::Expression))
            }
            NodeRef::SimplePath(path) => {
                out.push(NodeRef::Identifier(&path.root));
                out.extend(path.steps.iter().map(NodeRef::SimplePathStep));
            }
            NodeRef::SimplePathStep(step) => match step {
                SimplePathStep::Literal(literal, _) => out.push(NodeRef::Literal(literal)),
                SimplePathStep::Symbol(name, _) | SimplePathStep::Field(name, _) => {
                    out.push(NodeRef::Identifier(name))
                }
            },
            NodeRef::Expression(expr) => expression_children(expr, &mut out),
            NodeRef::Identifier(_) | NodeRef::Literal(_) | NodeRef::Type(_) => {}
            NodeRef::PathStep(step) => match step {
                PathStep::Field(name, _) => out.push(NodeRef::Identifier(name)),
                PathStep::Index(index, _) => out.push(NodeRef::Expression(index)),
                PathStep::AllFields(_) | PathStep::AllElements(_) => {}
            },
            NodeRef::InTarget(target) => match target {
                InTarget::Parenthesized(expr, _) | InTarget::Expression(expr) => {
                    out.push(NodeRef::Expression(expr))
                }
            },
            NodeRef::WhenBranch(branch) => {
                out.push(NodeRef::Expression(&branch.condition));
                out.push(NodeRef::Expression(&branch.result));
            }
            NodeRef::StructField(field) => {
                out.push(NodeRef::Expression(&field.key));
                out.push(NodeRef::Expression(&field.value));
            }
            NodeRef::ValueRow(row) => out.extend(row.values.iter().map(NodeRef::Expression)),
            NodeRef::WindowSpecification(window) => {
                out.extend(window.partition_by.iter().map(NodeRef::Expression));
                out.extend(window.order_by.iter().map(NodeRef::OrderSpec));
            }
            NodeRef::SelectClause(select) => match select {
                SelectClause::All { .. } => {}
                SelectClause::Items { items, .. } => {
                    out.extend(items.iter().map(NodeRef::ProjectionItem))
                }
                SelectClause::Value { value, .. } => out.push(NodeRef::Expression(value)),
                SelectClause::Pivot { value, key, .. } => {
                    out.push(NodeRef::Expression(value));
                    out.push(NodeRef::Expression(key));
                }
            },
            NodeRef::ProjectionItem(item) => {
                out.push(NodeRef::Expression(&item.expression));
                out.opt(item.alias.as_ref().map(NodeRef::Identifier));
            }
            NodeRef::Clause(clause) => out.push(NodeRef::Expression(&clause.expression)),
            NodeRef::Exclude(exclude) => out.extend(exclude.paths.iter().map(NodeRef::ExcludePath)),
            NodeRef::ExcludePath(path) => {
                out.push(NodeRef::Identifier(&path.root));
                out.extend(path.steps.iter().map(NodeRef::ExcludeStep));
            }
            NodeRef::ExcludeStep(step) => match step {
                ExcludeStep::Field(name, _) => out.push(NodeRef::Identifier(name)),
                ExcludeStep::Index(index, _) => out.push(NodeRef::Expression(index)),
                ExcludeStep::AllFields(_) | ExcludeStep::AllElements(_) => {}
            },
            NodeRef::Let(clause) => out.extend(clause.bindings.iter().map(NodeRef::LetBinding)),
            NodeRef::LetBinding(binding) => {
                out.push(NodeRef::Expression(&binding.expression));
                out.push(NodeRef::Identifier(&binding.alias));
            }
            NodeRef::GroupBy(group) => {
                out.extend(group.keys.iter().map(NodeRef::GroupKey));
                out.opt(group.group_as.as_ref().map(NodeRef::Identifier));
            }
            NodeRef::GroupKey(key) => {
                out.push(NodeRef::Expression(&key.expression));
                out.opt(key.alias.as_ref().map(NodeRef::Identifier));
            }
            NodeRef::OrderBy(order) => out.extend(order.specs.iter().map(NodeRef::OrderSpec)),
            NodeRef::OrderSpec(spec) => out.push(NodeRef::Expression(&spec.expression)),
            NodeRef::From(from) => out.opt(from.source.as_ref().map(NodeRef::TableReference)),
            NodeRef::TableReference(table) => match table {
                TableReference::Base(base) => {
                    out.push(NodeRef::Expression(&base.source));
                    out.aliases(&base.aliases);
                }
                TableReference::Unpivot(unpivot) => {
                    out.push(NodeRef::Expression(&unpivot.source));
                    out.aliases(&unpivot.aliases);
                }
                TableReference::Join(join) => {
                    out.push(NodeRef::TableReference(&join.lhs));
                    out.push(NodeRef::TableReference(&join.rhs));
                    out.opt(join.on.as_ref().map(NodeRef::Expression));
                }
                TableReference::Wrapped(inner, _) => out.push(NodeRef::TableReference(inner)),
            },
            NodeRef::TableBase(base) => {
                out.push(NodeRef::Expression(&base.source));
                out.aliases(&base.aliases);
            }
            NodeRef::MatchSelector(_) | NodeRef::Restrictor(_) | NodeRef::Quantifier(_) => {}
            NodeRef::GraphPattern(pattern) => {
                out.opt(pattern.restrictor.as_ref().map(NodeRef::Restrictor));
                out.opt(pattern.variable.as_ref().map(NodeRef::Identifier));
                out.extend(pattern.parts.iter().map(NodeRef::GraphPart));
            }
            NodeRef::GraphPart(part) => match part {
                GraphPart::Node(node) => {
                    out.opt(node.variable.as_ref().map(NodeRef::Identifier));
                    out.opt(node.label.as_ref().map(NodeRef::Label));
                    out.opt(node.where_clause.as_ref().map(NodeRef::Expression));
                }
                GraphPart::Edge(edge) => {
                    out.opt(edge.spec.as_ref().map(NodeRef::EdgeSpec));
                    out.opt(edge.quantifier.as_ref().map(NodeRef::Quantifier));
                }
                GraphPart::Pattern(sub) => {
                    out.opt(sub.restrictor.as_ref().map(NodeRef::Restrictor));
                    out.opt(sub.variable.as_ref().map(NodeRef::Identifier));
                    out.extend(sub.parts.iter().map(NodeRef::GraphPart));
                    out.opt(sub.where_clause.as_ref().map(NodeRef::Expression));
                    out.opt(sub.quantifier.as_ref().map(NodeRef::Quantifier));
                }
            },
            NodeRef::EdgeSpec(spec) => {
                out.opt(spec.variable.as_ref().map(NodeRef::Identifier));
                out.opt(spec.label.as_ref().map(NodeRef::Label));
                out.opt(spec.where_clause.as_ref().map(NodeRef::Expression));
            }
            NodeRef::Label(label) => match label {
                LabelExpression::Name(name) => out.push(NodeRef::Identifier(name)),
                LabelExpression::Wildcard(_) => {}
                LabelExpression::Not(inner, _) | LabelExpression::Parenthesized(inner, _) => {
                    out.push(NodeRef::Label(inner))
                }
                LabelExpression::And(lhs, rhs, _) | LabelExpression::Or(lhs, rhs, _) => {
                    out.push(NodeRef::Label(lhs));
                    out.push(NodeRef::Label(rhs));
                }
            },
        }
        out.0
    }
}

#[derive(Default)]
struct Children<'a>(Vec<NodeRef<'a>>);

impl<'a> Children<'a> {
    fn push(&mut self, node: NodeRef<'a>) {
        self.0.push(node);
    }

    fn opt(&mut self, node: Option<NodeRef<'a>>) {
        self.0.extend(node);
    }

    fn extend(&mut self, nodes: impl Iterator<Item = NodeRef<'a>>) {
        self.0.extend(nodes);
    }

    fn aliases(&mut self, aliases: &'a SourceAliases) {
        self.0.extend(aliases.iter().map(NodeRef::Identifier));
    }

    fn query(&mut self, query: &'a SelectQuery) {
        self.push(NodeRef::SelectClause(&query.select));
        self.opt(query.exclude.as_ref().map(NodeRef::Exclude));
        self.opt(query.from.as_ref().map(NodeRef::From));
        self.opt(query.let_clause.as_ref().map(NodeRef::Let));
        self.opt(query.where_clause.as_ref().map(NodeRef::Clause));
        self.opt(query.group_by.as_ref().map(NodeRef::GroupBy));
        self.opt(query.having.as_ref().map(NodeRef::Clause));
        self.opt(query.order_by.as_ref().map(NodeRef::OrderBy));
        self.opt(query.limit.as_ref().map(NodeRef::Clause));
        self.opt(query.offset.as_ref().map(NodeRef::Clause));
    }
}

fn expression_kind_name(expr: &Expression) -> &'static str {
    match expr {
        Expression::Literal(_) => "Literal",
        Expression::VariableReference(_) => "VariableReference",
        Expression::Parameter(_) => "Parameter",
        Expression::Unary(..) => "Unary",
        Expression::Binary(..) => "Binary",
        Expression::Is(_) => "Is",
        Expression::In(_) => "In",
        Expression::Like(_) => "Like",
        Expression::Between(_) => "Between",
        Expression::Parenthesized(..) => "Parenthesized",
        Expression::Path(_) => "Path",
        Expression::FunctionCall(_) => "FunctionCall",
        Expression::Aggregate(_) => "Aggregate",
        Expression::Window(_) => "Window",
        Expression::Cast(_) => "Cast",
        Expression::Case(_) => "Case",
        Expression::Special(_) => "SpecialForm",
        Expression::Collection(_) => "Collection",
        Expression::Struct(_) => "Struct",
        Expression::Values(_) => "Values",
        Expression::Query(_) => "SelectQuery",
        Expression::BagOperation(_) => "BagOperation",
        Expression::GraphMatch(_) => "GraphMatch",
    }
}

fn expression_children<'a>(expr: &'a Expression, out: &mut Children<'a>) {
    match expr {
        Expression::Literal(_) | Expression::Parameter(_) => {}
        Expression::VariableReference(var) => out.push(NodeRef::Identifier(&var.name)),
        Expression::Unary(_, operand, _) => out.push(NodeRef::Expression(operand)),
        Expression::Binary(_, lhs, rhs, _) => {
            out.push(NodeRef::Expression(lhs));
            out.push(NodeRef::Expression(rhs));
        }
        Expression::Is(predicate) => {
            out.push(NodeRef::Expression(&predicate.operand));
            out.push(NodeRef::Type(&predicate.ty));
        }
        Expression::In(predicate) => {
            out.push(NodeRef::Expression(&predicate.operand));
            out.push(NodeRef::InTarget(&predicate.target));
        }
        Expression::Like(predicate) => {
            out.push(NodeRef::Expression(&predicate.operand));
            out.push(NodeRef::Expression(&predicate.pattern));
            out.opt(predicate.escape.as_deref().map(NodeRef::Expression));
        }
        Expression::Between(predicate) => {
            out.push(NodeRef::Expression(&predicate.operand));
            out.push(NodeRef::Expression(&predicate.low));
            out.push(NodeRef::Expression(&predicate.high));
        }
        Expression::Parenthesized(inner, _) => out.push(NodeRef::Expression(inner)),
        Expression::Path(path) => {
            out.push(NodeRef::Expression(&path.root));
            out.extend(path.steps.iter().map(NodeRef::PathStep));
        }
        Expression::FunctionCall(call) => {
            out.push(NodeRef::Identifier(&call.name));
            out.extend(call.arguments.iter().map(NodeRef::Expression));
        }
        Expression::Aggregate(call) => out.opt(call.argument.as_deref().map(NodeRef::Expression)),
        Expression::Window(call) => {
            out.extend(call.arguments.iter().map(NodeRef::Expression));
            out.push(NodeRef::WindowSpecification(&call.over));
        }
        Expression::Cast(cast) => {
            out.push(NodeRef::Expression(&cast.operand));
            out.push(NodeRef::Type(&cast.target));
        }
        Expression::Case(case) => {
            out.opt(case.operand.as_deref().map(NodeRef::Expression));
            out.extend(case.branches.iter().map(NodeRef::WhenBranch));
            out.opt(case.else_result.as_deref().map(NodeRef::Expression));
        }
        Expression::Special(form) => special_children(&form.kind, out),
        Expression::Collection(collection) => {
            out.extend(collection.elements.iter().map(NodeRef::Expression))
        }
        Expression::Struct(constructor) => {
            out.extend(constructor.fields.iter().map(NodeRef::StructField))
        }
        Expression::Values(values) => out.extend(values.rows.iter().map(NodeRef::ValueRow)),
        Expression::Query(query) => out.query(query),
        Expression::BagOperation(op) => {
            out.push(NodeRef::Expression(&op.lhs));
            out.push(NodeRef::Expression(&op.rhs));
        }
        Expression::GraphMatch(graph_match) => {
            out.push(NodeRef::Expression(&graph_match.source));
            out.opt(graph_match.selector.as_ref().map(NodeRef::MatchSelector));
            out.extend(graph_match.patterns.iter().map(NodeRef::GraphPattern));
        }
    }
}

fn special_children<'a>(kind: &'a SpecialFormKind, out: &mut Children<'a>) {
    match kind {
        SpecialFormKind::NullIf(lhs, rhs) => {
            out.push(NodeRef::Expression(lhs));
            out.push(NodeRef::Expression(rhs));
        }
        SpecialFormKind::Coalesce(args) => out.extend(args.iter().map(NodeRef::Expression)),
        SpecialFormKind::Substring {
            value,
            start,
            length,
        } => {
            out.push(NodeRef::Expression(value));
            out.opt(start.as_deref().map(NodeRef::Expression));
            out.opt(length.as_deref().map(NodeRef::Expression));
        }
        SpecialFormKind::Position { needle, haystack } => {
            out.push(NodeRef::Expression(needle));
            out.push(NodeRef::Expression(haystack));
        }
        SpecialFormKind::Overlay {
            value,
            placing,
            start,
            length,
        } => {
            out.push(NodeRef::Expression(value));
            out.push(NodeRef::Expression(placing));
            out.push(NodeRef::Expression(start));
            out.opt(length.as_deref().map(NodeRef::Expression));
        }
        SpecialFormKind::Extract { field, source } => {
            out.push(NodeRef::Identifier(field));
            out.push(NodeRef::Expression(source));
        }
        SpecialFormKind::Trim {
            specification,
            characters,
            target,
        } => {
            out.opt(specification.as_ref().map(NodeRef::Identifier));
            out.opt(characters.as_deref().map(NodeRef::Expression));
            out.push(NodeRef::Expression(target));
        }
        SpecialFormKind::DateAdd {
            field,
            amount,
            target,
        } => {
            out.push(NodeRef::Identifier(field));
            out.push(NodeRef::Expression(amount));
            out.push(NodeRef::Expression(target));
        }
        SpecialFormKind::DateDiff { field, from, to } => {
            out.push(NodeRef::Identifier(field));
            out.push(NodeRef::Expression(from));
            out.push(NodeRef::Expression(to));
        }
    }
}

fn dml_children<'a>(dml: &'a DmlStatement, out: &mut Children<'a>) {
    match dml {
        DmlStatement::Update(stmt) => {
            out.push(NodeRef::TableBase(&stmt.target));
            out.extend(stmt.actions.iter().map(NodeRef::DmlAction));
            out.opt(stmt.where_clause.as_ref().map(NodeRef::Clause));
            out.opt(stmt.returning.as_ref().map(NodeRef::Returning));
        }
        DmlStatement::FromActions(stmt) => {
            out.push(NodeRef::From(&stmt.from));
            out.opt(stmt.where_clause.as_ref().map(NodeRef::Clause));
            out.extend(stmt.actions.iter().map(NodeRef::DmlAction));
            out.opt(stmt.returning.as_ref().map(NodeRef::Returning));
        }
        DmlStatement::Delete(stmt) => {
            out.push(NodeRef::SimpleSource(&stmt.source));
            out.opt(stmt.where_clause.as_ref().map(NodeRef::Clause));
            out.opt(stmt.returning.as_ref().map(NodeRef::Returning));
        }
        DmlStatement::InsertReturning(stmt) => {
            legacy_insert_children(&stmt.insert, out);
            out.push(NodeRef::Returning(&stmt.returning));
        }
        DmlStatement::Action(action) => out.push(NodeRef::DmlAction(action)),
    }
}

fn action_children<'a>(action: &'a DmlAction, out: &mut Children<'a>) {
    match action {
        DmlAction::Insert(insert) => {
            out.push(NodeRef::Identifier(&insert.target));
            out.opt(insert.alias.as_ref().map(NodeRef::Identifier));
            out.push(NodeRef::Expression(&insert.value));
            out.opt(insert.on_conflict.as_ref().map(NodeRef::OnConflict));
        }
        DmlAction::LegacyInsert(insert) => legacy_insert_children(insert, out),
        DmlAction::Set(set) => out.extend(set.assignments.iter().map(NodeRef::Assignment)),
        DmlAction::Replace(action) | DmlAction::Upsert(action) => {
            out.push(NodeRef::Identifier(&action.target));
            out.opt(action.alias.as_ref().map(NodeRef::Identifier));
            out.push(NodeRef::Expression(&action.value));
        }
        DmlAction::Remove(remove) => out.push(NodeRef::SimplePath(&remove.path)),
    }
}

fn legacy_insert_children<'a>(insert: &'a LegacyInsert, out: &mut Children<'a>) {
    out.push(NodeRef::SimplePath(&insert.target));
    out.push(NodeRef::Expression(&insert.value));
    out.opt(insert.position.as_ref().map(NodeRef::Expression));
    out.opt(insert.on_conflict.as_ref().map(NodeRef::LegacyOnConflict));
}

/// Innermost node whose span contains `offset`, or `None` when the offset lies
/// outside the document.
pub fn node_at_offset(document: &Document, offset: usize) -> Option<NodeRef<'_>> {
    ancestors_at_offset(document, offset).pop()
}

/// Every node containing `offset`, from the document root down to the
/// innermost one.
pub fn ancestors_at_offset(document: &Document, offset: usize) -> Vec<NodeRef<'_>> {
    let mut path = Vec::new();
    let mut current = NodeRef::Document(document);
    if !span_covers_offset(&current.span(), offset) {
        return path;
    }
    loop {
        path.push(current);
        let next = current
            .children()
            .into_iter()
            .find(|child| !child.span().is_empty() && span_covers_offset(&child.span(), offset));
        match next {
            Some(child) => current = child,
            None => return path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn children_follow_source_order() {
        let source = "SELECT a, b FROM t WHERE c";
        let result = parse(source);
        let document = &result.root;
        let statement = NodeRef::Document(document).children()[0];
        let query = statement.children()[0];
        let kinds: Vec<&str> = query.children().iter().map(NodeRef::kind_name).collect();
        assert_eq!(kinds, ["SelectItems", "From", "Clause"]);
    }

    #[test]
    fn offset_between_statements_stops_at_document() {
        let source = "SELECT a FROM t;   SELECT b FROM u";
        let result = parse(source);
        let path = ancestors_at_offset(&result.root, 17);
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].kind_name(), "Document");
    }

    #[test]
    fn graph_nodes_are_reachable() {
        let source = "SELECT x FROM (g MATCH (x:Person)-[e]->(y))";
        let result = parse(source);
        let innermost = node_at_offset(&result.root, 26).map(|node| node.kind_name());
        assert_eq!(innermost, Some("Identifier"));
        let kinds: Vec<&str> = ancestors_at_offset(&result.root, 26)
            .iter()
            .map(NodeRef::kind_name)
            .collect();
        assert!(kinds.contains(&"GraphMatch"));
        assert!(kinds.contains(&"LabelExpression"));
    }
}
