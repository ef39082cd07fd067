//! Token types and representations for PartiQL lexical analysis.

use crate::ast::Span;
use logos::Logos;
use smol_str::SmolStr;
use std::fmt;

use super::keywords;

/// The kind of a lexical token.
///
/// Logos derives recognition for punctuation, literals, identifiers and trivia.
/// Keyword variants carry no lexer attributes: identifier lexemes are mapped to
/// them through the keyword table after scanning.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // ========================================================================
    // Trivia
    // ========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    #[token("/*", scan_block_comment)]
    BlockComment,

    // ========================================================================
    // Identifiers and literals
    // ========================================================================
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,

    /// `"..."`, never a keyword.
    #[token("\"", scan_quoted_identifier)]
    QuotedIdentifier,

    #[token("'", scan_string)]
    StringLiteral,

    #[regex(r"[0-9]+")]
    IntegerLiteral,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    DecimalLiteral,

    /// Backtick-delimited embedded Ion value.
    #[token("`", scan_ion)]
    IonLiteral,

    // ========================================================================
    // Punctuation and operators
    // ========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("<<")]
    LAngleAngle,
    #[token(">>")]
    RAngleAngle,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("@")]
    AtSign,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("||")]
    Concat,
    #[token("|")]
    Pipe,
    #[token("&")]
    Ampersand,
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,

    // ========================================================================
    // Keywords (reserved)
    // ========================================================================
    All,
    And,
    Any,
    As,
    Asc,
    At,
    Avg,
    Bag,
    Between,
    Bigint,
    BitLength,
    Blob,
    Bool,
    Boolean,
    By,
    CanCast,
    CanLosslessCast,
    Case,
    Cast,
    Char,
    Character,
    CharacterLength,
    CharLength,
    Clob,
    Coalesce,
    Constraint,
    Count,
    Create,
    Cross,
    Date,
    DateAdd,
    DateDiff,
    Dec,
    Decimal,
    Delete,
    Desc,
    Distinct,
    Double,
    Drop,
    Else,
    End,
    Escape,
    Every,
    Except,
    Exclude,
    Exec,
    Exists,
    Explain,
    Extract,
    False,
    First,
    Float,
    For,
    From,
    Full,
    Group,
    Having,
    In,
    Index,
    Inner,
    Insert,
    Int,
    Int2,
    Int4,
    Int8,
    Integer,
    Integer2,
    Integer4,
    Integer8,
    Intersect,
    Into,
    Is,
    Join,
    Lag,
    Last,
    Lead,
    Left,
    Let,
    Like,
    Limit,
    List,
    Lower,
    Match,
    Max,
    Min,
    Missing,
    Not,
    Null,
    Nullif,
    Nulls,
    Numeric,
    OctetLength,
    Offset,
    On,
    Or,
    Order,
    Outer,
    Over,
    Overlay,
    Partial,
    Partition,
    Pivot,
    Placing,
    Position,
    Precision,
    Real,
    Remove,
    Replace,
    Right,
    Select,
    Set,
    Sexp,
    Size,
    Smallint,
    Some,
    String,
    Struct,
    Substring,
    Sum,
    Symbol,
    Table,
    Then,
    Time,
    Timestamp,
    Trim,
    True,
    Tuple,
    Union,
    Unpivot,
    Update,
    Upper,
    Upsert,
    Value,
    Values,
    Varchar,
    Varying,
    When,
    Where,
    With,
    Zone,

    // ========================================================================
    // Keywords (non-reserved)
    // ========================================================================
    Acyclic,
    Conflict,
    Do,
    Excluded,
    Modified,
    New,
    Nothing,
    Old,
    Returning,
    Shortest,
    Simple,
    Trail,

    // ========================================================================
    // Special
    // ========================================================================
    /// Input the lexer could not classify; see [`Token::error`].
    Unrecognized,
    Eof,
}

fn scan_block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(rest.len());
            false
        }
    }
}

/// Scans to the closing `quote`, treating a doubled quote as an escape.
fn scan_doubled_quote(lex: &mut logos::Lexer<TokenKind>, quote: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return true;
        }
        i += 1;
    }
    lex.bump(bytes.len());
    false
}

fn scan_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    scan_doubled_quote(lex, b'\'')
}

fn scan_quoted_identifier(lex: &mut logos::Lexer<TokenKind>) -> bool {
    scan_doubled_quote(lex, b'"')
}

/// Ion text may itself contain quoted strings holding backticks, so quoted
/// runs are skipped while looking for the closing backtick.
fn scan_ion(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'`' => {
                    lex.bump(i + 1);
                    return true;
                }
                b'\'' | b'"' => quote = Some(b),
                _ => {}
            },
        }
        i += 1;
    }
    lex.bump(bytes.len());
    false
}

impl TokenKind {
    /// Returns true for whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Returns true if this token kind is a keyword, reserved or not.
    pub fn is_keyword(self) -> bool {
        keywords::keyword_text(self).is_some()
    }

    /// Returns true for keywords that may not be used as bare identifiers.
    pub fn is_reserved_keyword(self) -> bool {
        keywords::KEYWORDS
            .iter()
            .any(|keyword| keyword.kind == self && keyword.reserved)
    }

    /// Returns true for keywords that can double as identifiers.
    pub fn is_non_reserved_keyword(self) -> bool {
        keywords::KEYWORDS
            .iter()
            .any(|keyword| keyword.kind == self && !keyword.reserved)
    }

    /// Returns true if this token kind is a literal.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::IntegerLiteral
                | TokenKind::DecimalLiteral
                | TokenKind::IonLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Missing
        )
    }

    /// Returns true if this token kind is an operator.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Concat
                | TokenKind::Ampersand
                | TokenKind::Pipe
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::BangEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Tilde
                | TokenKind::Bang
        )
    }

    /// Human-readable name used in "expected" lists.
    pub fn describe(self) -> &'static str {
        if let Some(text) = keywords::keyword_text(self) {
            return text;
        }
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::Identifier => "identifier",
            TokenKind::QuotedIdentifier => "quoted identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::DecimalLiteral => "decimal literal",
            TokenKind::IonLiteral => "ion literal",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LAngleAngle => "<<",
            TokenKind::RAngleAngle => ">>",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::AtSign => "@",
            TokenKind::Star => "*",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Concat => "||",
            TokenKind::Pipe => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "<>",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Tilde => "~",
            TokenKind::Bang => "!",
            TokenKind::Unrecognized => "unrecognized input",
            TokenKind::Eof => "<EOF>",
            // Keywords are answered by the table above.
            _ => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexical token: kind, raw lexeme and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: SmolStr,
    /// The span in source text.
    pub span: Span,
    /// Whitespace and comments travel on the trivia channel.
    pub trivia: bool,
    /// Set on `Unrecognized` tokens.
    pub error: Option<super::LexErrorKind>,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            trivia: kind.is_trivia(),
            error: None,
        }
    }

    /// Creates an `Unrecognized` token carrying the reason it was rejected.
    pub fn unrecognized(span: Span, text: impl Into<SmolStr>, error: super::LexErrorKind) -> Self {
        Self {
            error: Some(error),
            ..Self::new(TokenKind::Unrecognized, span, text)
        }
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.clone()).unwrap_or("")
    }
}
