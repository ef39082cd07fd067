//! Diagnostic model for lexical and syntax errors, plus miette rendering.

use crate::ast::Span;
use crate::lexer::token::TokenKind;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::collections::BTreeSet;
use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSeverity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Warning => write!(f, "warning"),
            DiagSeverity::Note => write!(f, "note"),
        }
    }
}

/// Role of a diagnostic label in the overall diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Primary,
    Secondary,
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
    pub role: LabelRole,
}

impl DiagLabel {
    /// Creates a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Primary,
        }
    }

    /// Creates a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Secondary,
        }
    }
}

/// A structured diagnostic.
///
/// Syntax diagnostics carry the set of token kinds that would have been
/// accepted at the failing position, so consumers can render "expected X,
/// found Y" without re-deriving grammar knowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub severity: DiagSeverity,
    pub message: String,
    pub labels: Vec<DiagLabel>,
    pub help: Option<String>,
    pub notes: Vec<String>,
    /// Stable code such as `P001` or `L004`.
    pub code: Option<String>,
    /// Token kinds acceptable at the failure point; empty for lexical errors.
    pub expected: BTreeSet<TokenKind>,
}

impl Diag {
    /// Creates a new diagnostic with the given severity and message.
    pub fn new(severity: DiagSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            notes: Vec::new(),
            code: None,
            expected: BTreeSet::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Error, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Warning, message)
    }

    /// Adds a primary label to this diagnostic.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::primary(span, message));
        self
    }

    /// Adds a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::secondary(span, message));
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Records the accepted token kinds and refreshes the help line.
    pub fn with_expected(mut self, expected: impl IntoIterator<Item = TokenKind>) -> Self {
        self.expected.extend(expected);
        if !self.expected.is_empty() {
            self.help = Some(self.expected_summary());
        }
        self
    }

    /// Span of the first primary label, if any.
    pub fn span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.role == LabelRole::Primary)
            .map(|label| label.span.clone())
    }

    /// Renders the expected set, e.g. `expected one of: identifier, (, SELECT`.
    pub fn expected_summary(&self) -> String {
        let names: Vec<_> = self.expected.iter().map(|kind| kind.describe()).collect();
        match names.as_slice() {
            [] => String::new(),
            [single] => format!("expected {single}"),
            many => format!("expected one of: {}", many.join(", ")),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagSeverity::Error
    }
}

/// Source text wrapper used when rendering diagnostics.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
    name: Option<String>,
}

impl SourceFile {
    /// Creates a new source file from the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Creates a new source file with a name.
    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Clamps a span to valid bounds within this source.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

/// Converts diagnostics to miette reports with source context.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag], source: &SourceFile) -> Vec<Report> {
    diagnostics
        .iter()
        .map(|diag| convert_diag_to_report(diag, source))
        .collect()
}

/// Converts a single diagnostic to a miette report.
pub fn convert_diag_to_report(diag: &Diag, source: &SourceFile) -> Report {
    let report = Report::new(build_diagnostic(diag, source));
    match source.name() {
        Some(name) => {
            report.with_source_code(miette::NamedSource::new(name, source.content().to_string()))
        }
        None => report.with_source_code(source.content().to_string()),
    }
}

fn build_diagnostic(diag: &Diag, source: &SourceFile) -> BuiltDiagnostic {
    let labels = diag
        .labels
        .iter()
        .map(|label| {
            let clamped = source.clamp_span(&label.span);
            let span = (clamped.start, clamped.end - clamped.start);
            match label.role {
                LabelRole::Primary => {
                    LabeledSpan::new_primary_with_span(Some(label.message.clone()), span)
                }
                LabelRole::Secondary => LabeledSpan::new_with_span(Some(label.message.clone()), span),
            }
        })
        .collect();

    BuiltDiagnostic {
        message: diag.message.clone(),
        severity: match diag.severity {
            DiagSeverity::Error => Severity::Error,
            DiagSeverity::Warning => Severity::Warning,
            DiagSeverity::Note => Severity::Advice,
        },
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels,
        related: diag.notes.iter().cloned().map(NoteDiagnostic).collect(),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct BuiltDiagnostic {
    message: String,
    severity: Severity,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    related: Vec<NoteDiagnostic>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct NoteDiagnostic(String);

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            None
        } else {
            Some(Box::new(
                self.related.iter().map(|diag| diag as &dyn Diagnostic),
            ))
        }
    }
}

impl Diagnostic for NoteDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_labels_and_code() {
        let diag = Diag::error("Unexpected token 'FROM'.")
            .with_primary_label(7..11, "unexpected FROM")
            .with_secondary_label(0..6, "in this SELECT")
            .with_code("P001");

        assert_eq!(diag.severity, DiagSeverity::Error);
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.labels[0].role, LabelRole::Primary);
        assert_eq!(diag.span(), Some(7..11));
        assert_eq!(diag.code.as_deref(), Some("P001"));
    }

    #[test]
    fn expected_set_is_sorted_and_deduplicated() {
        let diag = Diag::error("Unexpected end of input.").with_expected([
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::RParen,
        ]);
        assert_eq!(diag.expected.len(), 2);
        assert_eq!(diag.help.as_deref(), Some("expected one of: ), ,"));
    }

    #[test]
    fn single_expected_kind_reads_naturally() {
        let diag = Diag::error("Unexpected token ';'.").with_expected([TokenKind::Identifier]);
        assert_eq!(diag.expected_summary(), "expected identifier");
    }

    #[test]
    fn clamp_span_handles_out_of_range() {
        let src = SourceFile::new("hello");
        assert_eq!(src.clamp_span(&(0..10)), 0..5);
        assert_eq!(src.clamp_span(&(10..20)), 5..5);
    }

    #[test]
    fn report_keeps_message_help_and_roles() {
        let source = SourceFile::with_name("SELECT FROM t", "query.sql");
        let diag = Diag::error("Unexpected token 'FROM'.")
            .with_primary_label(7..11, "here")
            .with_secondary_label(0..6, "projection expected after this")
            .with_expected([TokenKind::Star, TokenKind::Identifier])
            .with_note("a SELECT needs at least one projection item");

        let report = convert_diag_to_report(&diag, &source);
        assert_eq!(report.to_string(), "Unexpected token 'FROM'.");

        let built = build_diagnostic(&diag, &source);
        assert_eq!(built.labels.len(), 2);
        assert!(built.labels[0].primary());
        assert_eq!(built.help.as_deref(), Some("expected one of: identifier, *"));
        let related = built.related().map(|r| r.count()).unwrap_or(0);
        assert_eq!(related, 1);
    }

    #[test]
    fn report_clamps_invalid_spans() {
        let source = SourceFile::new("short");
        let diag = Diag::error("Unexpected end of input.").with_primary_label(0..100, "here");
        let reports = convert_diagnostics_to_reports(&[diag], &source);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "Unexpected end of input.");
    }
}
