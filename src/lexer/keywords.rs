//! The keyword table.
//!
//! Keywords are matched case-insensitively against unquoted identifiers. Each
//! entry records whether the keyword is reserved; non-reserved keywords may
//! double as identifiers wherever the grammar accepts a name. Moving an entry
//! into the reserved class is a breaking change, so the table is versioned.

use super::token::TokenKind;

/// Bumped whenever an entry is added, removed, or reclassified.
pub const KEYWORD_TABLE_VERSION: u32 = 1;

/// One row of the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    /// Canonical upper-case spelling.
    pub text: &'static str,
    pub kind: TokenKind,
    pub reserved: bool,
}

const fn reserved(text: &'static str, kind: TokenKind) -> Keyword {
    Keyword {
        text,
        kind,
        reserved: true,
    }
}

const fn non_reserved(text: &'static str, kind: TokenKind) -> Keyword {
    Keyword {
        text,
        kind,
        reserved: false,
    }
}

/// All keywords, sorted by text.
pub static KEYWORDS: &[Keyword] = &[
    non_reserved("ACYCLIC", TokenKind::Acyclic),
    reserved("ALL", TokenKind::All),
    reserved("AND", TokenKind::And),
    reserved("ANY", TokenKind::Any),
    reserved("AS", TokenKind::As),
    reserved("ASC", TokenKind::Asc),
    reserved("AT", TokenKind::At),
    reserved("AVG", TokenKind::Avg),
    reserved("BAG", TokenKind::Bag),
    reserved("BETWEEN", TokenKind::Between),
    reserved("BIGINT", TokenKind::Bigint),
    reserved("BIT_LENGTH", TokenKind::BitLength),
    reserved("BLOB", TokenKind::Blob),
    reserved("BOOL", TokenKind::Bool),
    reserved("BOOLEAN", TokenKind::Boolean),
    reserved("BY", TokenKind::By),
    reserved("CAN_CAST", TokenKind::CanCast),
    reserved("CAN_LOSSLESS_CAST", TokenKind::CanLosslessCast),
    reserved("CASE", TokenKind::Case),
    reserved("CAST", TokenKind::Cast),
    reserved("CHAR", TokenKind::Char),
    reserved("CHARACTER", TokenKind::Character),
    reserved("CHARACTER_LENGTH", TokenKind::CharacterLength),
    reserved("CHAR_LENGTH", TokenKind::CharLength),
    reserved("CLOB", TokenKind::Clob),
    reserved("COALESCE", TokenKind::Coalesce),
    non_reserved("CONFLICT", TokenKind::Conflict),
    reserved("CONSTRAINT", TokenKind::Constraint),
    reserved("COUNT", TokenKind::Count),
    reserved("CREATE", TokenKind::Create),
    reserved("CROSS", TokenKind::Cross),
    reserved("DATE", TokenKind::Date),
    reserved("DATE_ADD", TokenKind::DateAdd),
    reserved("DATE_DIFF", TokenKind::DateDiff),
    reserved("DEC", TokenKind::Dec),
    reserved("DECIMAL", TokenKind::Decimal),
    reserved("DELETE", TokenKind::Delete),
    reserved("DESC", TokenKind::Desc),
    reserved("DISTINCT", TokenKind::Distinct),
    non_reserved("DO", TokenKind::Do),
    reserved("DOUBLE", TokenKind::Double),
    reserved("DROP", TokenKind::Drop),
    reserved("ELSE", TokenKind::Else),
    reserved("END", TokenKind::End),
    reserved("ESCAPE", TokenKind::Escape),
    reserved("EVERY", TokenKind::Every),
    reserved("EXCEPT", TokenKind::Except),
    reserved("EXCLUDE", TokenKind::Exclude),
    non_reserved("EXCLUDED", TokenKind::Excluded),
    reserved("EXEC", TokenKind::Exec),
    reserved("EXISTS", TokenKind::Exists),
    reserved("EXPLAIN", TokenKind::Explain),
    reserved("EXTRACT", TokenKind::Extract),
    reserved("FALSE", TokenKind::False),
    reserved("FIRST", TokenKind::First),
    reserved("FLOAT", TokenKind::Float),
    reserved("FOR", TokenKind::For),
    reserved("FROM", TokenKind::From),
    reserved("FULL", TokenKind::Full),
    reserved("GROUP", TokenKind::Group),
    reserved("HAVING", TokenKind::Having),
    reserved("IN", TokenKind::In),
    reserved("INDEX", TokenKind::Index),
    reserved("INNER", TokenKind::Inner),
    reserved("INSERT", TokenKind::Insert),
    reserved("INT", TokenKind::Int),
    reserved("INT2", TokenKind::Int2),
    reserved("INT4", TokenKind::Int4),
    reserved("INT8", TokenKind::Int8),
    reserved("INTEGER", TokenKind::Integer),
    reserved("INTEGER2", TokenKind::Integer2),
    reserved("INTEGER4", TokenKind::Integer4),
    reserved("INTEGER8", TokenKind::Integer8),
    reserved("INTERSECT", TokenKind::Intersect),
    reserved("INTO", TokenKind::Into),
    reserved("IS", TokenKind::Is),
    reserved("JOIN", TokenKind::Join),
    reserved("LAG", TokenKind::Lag),
    reserved("LAST", TokenKind::Last),
    reserved("LEAD", TokenKind::Lead),
    reserved("LEFT", TokenKind::Left),
    reserved("LET", TokenKind::Let),
    reserved("LIKE", TokenKind::Like),
    reserved("LIMIT", TokenKind::Limit),
    reserved("LIST", TokenKind::List),
    reserved("LOWER", TokenKind::Lower),
    reserved("MATCH", TokenKind::Match),
    reserved("MAX", TokenKind::Max),
    reserved("MIN", TokenKind::Min),
    reserved("MISSING", TokenKind::Missing),
    non_reserved("MODIFIED", TokenKind::Modified),
    non_reserved("NEW", TokenKind::New),
    reserved("NOT", TokenKind::Not),
    non_reserved("NOTHING", TokenKind::Nothing),
    reserved("NULL", TokenKind::Null),
    reserved("NULLIF", TokenKind::Nullif),
    reserved("NULLS", TokenKind::Nulls),
    reserved("NUMERIC", TokenKind::Numeric),
    reserved("OCTET_LENGTH", TokenKind::OctetLength),
    reserved("OFFSET", TokenKind::Offset),
    non_reserved("OLD", TokenKind::Old),
    reserved("ON", TokenKind::On),
    reserved("OR", TokenKind::Or),
    reserved("ORDER", TokenKind::Order),
    reserved("OUTER", TokenKind::Outer),
    reserved("OVER", TokenKind::Over),
    reserved("OVERLAY", TokenKind::Overlay),
    reserved("PARTIAL", TokenKind::Partial),
    reserved("PARTITION", TokenKind::Partition),
    reserved("PIVOT", TokenKind::Pivot),
    reserved("PLACING", TokenKind::Placing),
    reserved("POSITION", TokenKind::Position),
    reserved("PRECISION", TokenKind::Precision),
    reserved("REAL", TokenKind::Real),
    reserved("REMOVE", TokenKind::Remove),
    reserved("REPLACE", TokenKind::Replace),
    non_reserved("RETURNING", TokenKind::Returning),
    reserved("RIGHT", TokenKind::Right),
    reserved("SELECT", TokenKind::Select),
    reserved("SET", TokenKind::Set),
    reserved("SEXP", TokenKind::Sexp),
    non_reserved("SHORTEST", TokenKind::Shortest),
    non_reserved("SIMPLE", TokenKind::Simple),
    reserved("SIZE", TokenKind::Size),
    reserved("SMALLINT", TokenKind::Smallint),
    reserved("SOME", TokenKind::Some),
    reserved("STRING", TokenKind::String),
    reserved("STRUCT", TokenKind::Struct),
    reserved("SUBSTRING", TokenKind::Substring),
    reserved("SUM", TokenKind::Sum),
    reserved("SYMBOL", TokenKind::Symbol),
    reserved("TABLE", TokenKind::Table),
    reserved("THEN", TokenKind::Then),
    reserved("TIME", TokenKind::Time),
    reserved("TIMESTAMP", TokenKind::Timestamp),
    non_reserved("TRAIL", TokenKind::Trail),
    reserved("TRIM", TokenKind::Trim),
    reserved("TRUE", TokenKind::True),
    reserved("TUPLE", TokenKind::Tuple),
    reserved("UNION", TokenKind::Union),
    reserved("UNPIVOT", TokenKind::Unpivot),
    reserved("UPDATE", TokenKind::Update),
    reserved("UPPER", TokenKind::Upper),
    reserved("UPSERT", TokenKind::Upsert),
    reserved("VALUE", TokenKind::Value),
    reserved("VALUES", TokenKind::Values),
    reserved("VARCHAR", TokenKind::Varchar),
    reserved("VARYING", TokenKind::Varying),
    reserved("WHEN", TokenKind::When),
    reserved("WHERE", TokenKind::Where),
    reserved("WITH", TokenKind::With),
    reserved("ZONE", TokenKind::Zone),
];

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    find(name).map(|keyword| keyword.kind)
}

/// Looks up the full table entry for `name` (case-insensitive).
pub fn find(name: &str) -> Option<&'static Keyword> {
    // Longest keyword is CAN_LOSSLESS_CAST.
    if name.len() > 17 || !name.is_ascii() {
        return None;
    }
    let upper = name.to_ascii_uppercase();
    KEYWORDS
        .binary_search_by(|keyword| keyword.text.cmp(upper.as_str()))
        .ok()
        .map(|index| &KEYWORDS[index])
}

/// Returns true if `name` is a reserved keyword and so cannot be a bare identifier.
pub fn is_reserved(name: &str) -> bool {
    find(name).is_some_and(|keyword| keyword.reserved)
}

/// Canonical spelling of a keyword kind, or `None` for non-keyword kinds.
pub fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|keyword| keyword.kind == kind)
        .map(|keyword| keyword.text)
}
