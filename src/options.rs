//! Parser configuration.

/// Nesting depth at which parsing aborts with a fatal diagnostic.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options accepted by [`crate::parse_with_options`].
///
/// ```
/// use partiql_parser::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_max_depth(32)
///     .with_multiple_statements(false);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parenthesized expressions, sub-queries, prefix
    /// operators and graph sub-patterns.
    pub max_depth: usize,
    /// When false, every statement after the first is still parsed but is
    /// reported as an error.
    pub allow_multiple_statements: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_multiple_statements: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_multiple_statements(mut self, allow: bool) -> Self {
        self.allow_multiple_statements = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.allow_multiple_statements);
        assert_eq!(options, ParseOptions::new());
    }

    #[test]
    fn builders_override_fields() {
        let options = ParseOptions::new()
            .with_max_depth(8)
            .with_multiple_statements(false);
        assert_eq!(options.max_depth, 8);
        assert!(!options.allow_multiple_statements);
    }
}
