//! Graph pattern parts: nodes, edges, sub-patterns and quantifiers.

use crate::ast::{
    EdgeDirection, EdgePattern, EdgeSpec, Expression, GraphPart, Identifier, LabelExpression,
    NodePattern, PatternDelimiter, Quantifier, QuantifierKind, SubPattern,
};
use crate::lexer::token::TokenKind;
use crate::parser::base::Alternative;
use crate::parser::{PResult, Parser};

/// Tokens that can begin a graph part.
pub(super) const PART_START: &[TokenKind] = &[
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::Minus,
    TokenKind::Tilde,
    TokenKind::Lt,
];

/// Variable, label and filter shared by nodes and edge specs.
struct ElementFiller {
    variable: Option<Identifier>,
    label: Option<LabelExpression>,
    where_clause: Option<Expression>,
}

impl<'source> Parser<'source> {
    /// One or more graph parts.
    pub(super) fn parse_graph_parts(&mut self) -> PResult<Vec<GraphPart>> {
        let mut parts = Vec::new();
        while self.at_graph_part() {
            parts.push(self.parse_graph_part()?);
        }
        if parts.is_empty() {
            return Err(self.unexpected_expecting(PART_START));
        }
        Ok(parts)
    }

    fn at_graph_part(&mut self) -> bool {
        match self.peek_kind() {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::Minus | TokenKind::Tilde => true,
            TokenKind::Lt => matches!(
                self.peek_nth_kind(1),
                TokenKind::Minus | TokenKind::Tilde
            ),
            _ => {
                self.note_expected_all(PART_START);
                false
            }
        }
    }

    fn parse_graph_part(&mut self) -> PResult<GraphPart> {
        match self.peek_kind() {
            TokenKind::LParen => self.alternatives(
                "graph pattern element",
                0,
                &[
                    Alternative {
                        first: &[TokenKind::LParen],
                        parse: Self::parse_node_part,
                    },
                    Alternative {
                        first: &[TokenKind::LParen],
                        parse: Self::parse_sub_pattern_part,
                    },
                ],
            ),
            TokenKind::LBracket => self.parse_sub_pattern_part(),
            _ => self.parse_edge().map(GraphPart::Edge),
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    fn parse_node_part(&mut self) -> PResult<GraphPart> {
        self.parse_node().map(GraphPart::Node)
    }

    /// `( [x] [:label] [WHERE cond] )`
    fn parse_node(&mut self) -> PResult<NodePattern> {
        let open = self.expect(TokenKind::LParen)?;
        let filler = self.parse_element_filler()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(NodePattern {
            variable: filler.variable,
            label: filler.label,
            where_clause: filler.where_clause,
            span: open.start..close.end,
        })
    }

    fn parse_element_filler(&mut self) -> PResult<ElementFiller> {
        let variable = if self.at_symbol() {
            Some(self.parse_symbol()?)
        } else {
            None
        };
        let label = if self.consume(TokenKind::Colon) {
            Some(self.parse_label_expression()?)
        } else {
            None
        };
        let where_clause = if self.consume(TokenKind::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(ElementFiller {
            variable,
            label,
            where_clause,
        })
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Full edges `-[spec]->` and abbreviated arrows such as `<~`, in the
    /// seven orientations.
    fn parse_edge(&mut self) -> PResult<EdgePattern> {
        let start = self.peek().span.start;
        let left = self.consume(TokenKind::Lt);

        let tilde = if self.consume(TokenKind::Tilde) {
            true
        } else if self.consume(TokenKind::Minus) {
            false
        } else {
            return Err(self.unexpected_expecting(&[TokenKind::Minus, TokenKind::Tilde]));
        };

        let spec = if self.at(TokenKind::LBracket) {
            let spec = self.parse_edge_spec()?;
            self.expect(if tilde { TokenKind::Tilde } else { TokenKind::Minus })?;
            Some(spec)
        } else {
            None
        };
        let right = self.consume(TokenKind::Gt);
        let arrow_end = self.previous_end();

        let direction = match (left, tilde, right) {
            (true, false, false) => EdgeDirection::Left,
            (false, true, false) => EdgeDirection::Undirected,
            (false, false, true) => EdgeDirection::Right,
            (true, true, false) => EdgeDirection::LeftOrUndirected,
            (false, true, true) => EdgeDirection::UndirectedOrRight,
            (true, false, true) => EdgeDirection::LeftOrRight,
            (false, false, false) => EdgeDirection::Any,
            (true, true, true) => return Err(self.invalid("edge direction", start..arrow_end)),
        };

        let quantifier = self.parse_quantifier()?;
        Ok(EdgePattern {
            direction,
            spec,
            quantifier,
            span: start..self.previous_end(),
        })
    }

    /// `[ [x] [:label] [WHERE cond] ]`
    fn parse_edge_spec(&mut self) -> PResult<EdgeSpec> {
        let open = self.expect(TokenKind::LBracket)?;
        let filler = self.parse_element_filler()?;
        let close = self.expect(TokenKind::RBracket)?;
        Ok(EdgeSpec {
            variable: filler.variable,
            label: filler.label,
            where_clause: filler.where_clause,
            span: open.start..close.end,
        })
    }

    // ========================================================================
    // Sub-patterns and quantifiers
    // ========================================================================

    fn parse_sub_pattern_part(&mut self) -> PResult<GraphPart> {
        self.nested(Self::parse_sub_pattern).map(GraphPart::Pattern)
    }

    /// `( [restrictor] [p =] parts [WHERE cond] ) [quantifier]`, or the same
    /// in brackets.
    fn parse_sub_pattern(&mut self) -> PResult<SubPattern> {
        let (delimiter, close_kind) = if self.at(TokenKind::LBracket) {
            (PatternDelimiter::Bracket, TokenKind::RBracket)
        } else {
            (PatternDelimiter::Paren, TokenKind::RParen)
        };
        let open = self.advance();
        let restrictor = self.parse_restrictor();
        let variable = self.parse_path_variable()?;
        let parts = self.parse_graph_parts()?;
        let where_clause = if self.consume(TokenKind::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(close_kind)?;
        let quantifier = self.parse_quantifier()?;

        Ok(SubPattern {
            delimiter,
            restrictor,
            variable,
            parts,
            where_clause,
            quantifier,
            span: open.start..self.previous_end(),
        })
    }

    /// `+`, `*`, `{n}`, `{lower,}` or `{lower, upper}`.
    fn parse_quantifier(&mut self) -> PResult<Option<Quantifier>> {
        if let Some(span) = self.consume_span(TokenKind::Plus) {
            return Ok(Some(Quantifier {
                kind: QuantifierKind::OneOrMore,
                span,
            }));
        }
        if let Some(span) = self.consume_span(TokenKind::Star) {
            return Ok(Some(Quantifier {
                kind: QuantifierKind::ZeroOrMore,
                span,
            }));
        }
        let Some(open) = self.consume_span(TokenKind::LBrace) else {
            return Ok(None);
        };

        let lower = self.parse_u32("quantifier bound")?;
        let upper = if self.consume(TokenKind::Comma) {
            if self.at(TokenKind::IntegerLiteral) {
                let upper_span = self.peek().span.clone();
                let upper = self.parse_u32("quantifier bound")?;
                if upper < lower {
                    return Err(self.invalid("quantifier bound", upper_span));
                }
                Some(upper)
            } else {
                None
            }
        } else {
            Some(lower)
        };
        let close = self.expect(TokenKind::RBrace)?;

        Ok(Some(Quantifier {
            kind: QuantifierKind::Range { lower, upper },
            span: open.start..close.end,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::options::ParseOptions;

    fn parse_parts(source: &str) -> PResult<Vec<GraphPart>> {
        let mut parser = Parser::new(tokenize(source).tokens, source, ParseOptions::default());
        let parts = parser.parse_graph_parts();
        assert!(parts.is_err() || parser.is_eof(), "trailing input in {source}");
        parts
    }

    fn direction(source: &str) -> Option<EdgeDirection> {
        match parse_parts(source).ok()?.get(1)? {
            GraphPart::Edge(edge) => Some(edge.direction),
            _ => None,
        }
    }

    #[test]
    fn all_seven_full_edge_orientations() {
        assert_eq!(direction("(a)<-[e]-(b)"), Some(EdgeDirection::Left));
        assert_eq!(direction("(a)~[e]~(b)"), Some(EdgeDirection::Undirected));
        assert_eq!(direction("(a)-[e]->(b)"), Some(EdgeDirection::Right));
        assert_eq!(direction("(a)<~[e]~(b)"), Some(EdgeDirection::LeftOrUndirected));
        assert_eq!(direction("(a)~[e]~>(b)"), Some(EdgeDirection::UndirectedOrRight));
        assert_eq!(direction("(a)<-[e]->(b)"), Some(EdgeDirection::LeftOrRight));
        assert_eq!(direction("(a)-[e]-(b)"), Some(EdgeDirection::Any));
    }

    #[test]
    fn abbreviated_edges() {
        assert_eq!(direction("(a)<-(b)"), Some(EdgeDirection::Left));
        assert_eq!(direction("(a)~(b)"), Some(EdgeDirection::Undirected));
        assert_eq!(direction("(a)->(b)"), Some(EdgeDirection::Right));
        assert_eq!(direction("(a)<~(b)"), Some(EdgeDirection::LeftOrUndirected));
        assert_eq!(direction("(a)~>(b)"), Some(EdgeDirection::UndirectedOrRight));
        assert_eq!(direction("(a)<->(b)"), Some(EdgeDirection::LeftOrRight));
        assert_eq!(direction("(a)-(b)"), Some(EdgeDirection::Any));
    }

    #[test]
    fn undirected_both_ways_is_invalid() {
        let err = parse_parts("(a)<~[e]~>(b)").err();
        assert_eq!(
            err.map(|e| e.message.clone()),
            Some("Syntax Error: invalid edge direction '<~[e]~>'.".to_string())
        );
    }

    #[test]
    fn quantifier_attaches_to_the_edge() {
        let parts = parse_parts("(a)-[e]->{1,3}(b)").unwrap_or_default();
        assert_eq!(parts.len(), 3);
        let GraphPart::Edge(edge) = &parts[1] else {
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
        assert!(matches!(&parts[2], GraphPart::Node(node) if node.span == (14..17)));
    }

    #[test]
    fn quantifier_forms() {
        let parts = parse_parts("(a)-[e]->+(b)~*(c)-{2,}(d)-{4}(e)").unwrap_or_default();
        let kinds: Vec<_> = parts
            .iter()
            .filter_map(|part| match part {
                GraphPart::Edge(edge) => edge.quantifier.as_ref().map(|q| q.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                QuantifierKind::OneOrMore,
                QuantifierKind::ZeroOrMore,
                QuantifierKind::Range {
                    lower: 2,
                    upper: None
                },
                QuantifierKind::Range {
                    lower: 4,
                    upper: Some(4)
                },
            ]
        );
    }

    #[test]
    fn reversed_quantifier_bounds_are_invalid() {
        let err = parse_parts("(a)-{3,1}(b)").err();
        assert_eq!(
            err.map(|e| e.message.clone()),
            Some("Syntax Error: invalid quantifier bound '1'.".to_string())
        );
    }

    #[test]
    fn node_filler() {
        let parts = parse_parts("(p:Person|Robot WHERE p.age > 21)").unwrap_or_default();
        let GraphPart::Node(node) = &parts[0] else {
            panic!("expected node");
        };
        assert_eq!(node.variable.as_ref().map(|v| v.name.as_str()), Some("p"));
        assert!(matches!(node.label, Some(LabelExpression::Or(..))));
        assert!(node.where_clause.is_some());
    }

    #[test]
    fn parenthesized_sub_pattern_with_path_variable() {
        let parts = parse_parts("(TRAIL p = (a)-[e]->(b) WHERE e.w < 3)*").unwrap_or_default();
        let GraphPart::Pattern(sub) = &parts[0] else {
            panic!("expected sub-pattern");
        };
        assert_eq!(sub.delimiter, PatternDelimiter::Paren);
        assert!(sub.restrictor.is_some());
        assert_eq!(sub.variable.as_ref().map(|v| v.name.as_str()), Some("p"));
        assert_eq!(sub.parts.len(), 3);
        assert!(sub.where_clause.is_some());
        assert!(sub.quantifier.is_some());
    }

    #[test]
    fn bracketed_sub_pattern() {
        let parts = parse_parts("[(a)-(b)]{1,2}").unwrap_or_default();
        assert!(matches!(
            &parts[0],
            GraphPart::Pattern(sub) if sub.delimiter == PatternDelimiter::Bracket
        ));
    }

    #[test]
    fn empty_pattern_lists_part_starts() {
        let err = parse_parts("WHERE").err();
        assert!(err.is_some_and(|e| e.expected.contains(&TokenKind::LParen)
            && e.expected.contains(&TokenKind::Tilde)));
    }
}
