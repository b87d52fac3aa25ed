//! C-family grammar: operator and keyword tables.

use super::Grammar;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Semantic identifier of a C-family operator lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Assignment,
    Asterisk,
    Ampersand,
    AndEqual,
    Arrow,
    BinaryNot,
    BinaryNotEq,
    BinaryOr,
    OrEqual,
    Tilde,
    CloseCurlyBracket,
    CloseParen,
    CloseSqBracket,
    Colon,
    Comma,
    Decrement,
    Divide,
    DivideEqual,
    Equal,
    Hash,
    HashHash,
    Increment,
    LogicalAnd,
    LogicalOr,
    Minus,
    MinusEqual,
    Modulo,
    ModuloEqual,
    MultiplyEqual,
    OpGt,
    OpGte,
    OpLt,
    OpLte,
    OpenCurlyBracket,
    OpenParen,
    OpenSqBracket,
    Period,
    Plus,
    PlusEqual,
    Power,
    PowerEqual,
    Question,
    ScopeResolution,
    Semicolon,
    ShiftLeft,
    ShiftLeftEqual,
    ShiftRight,
    ShiftRightEqual,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Asterisk => "asterisk",
            Self::Ampersand => "ampersand",
            Self::AndEqual => "and_equal",
            Self::Arrow => "arrow",
            Self::BinaryNot => "binary_not",
            Self::BinaryNotEq => "binary_not_eq",
            Self::BinaryOr => "binary_or",
            Self::OrEqual => "or_equal",
            Self::Tilde => "tilde",
            Self::CloseCurlyBracket => "close_curly_bracket",
            Self::CloseParen => "close_paren",
            Self::CloseSqBracket => "close_sq_bracket",
            Self::Colon => "colon",
            Self::Comma => "comma",
            Self::Decrement => "decrement",
            Self::Divide => "divide",
            Self::DivideEqual => "divide_equal",
            Self::Equal => "equal",
            Self::Hash => "hash",
            Self::HashHash => "hash_hash",
            Self::Increment => "increment",
            Self::LogicalAnd => "logical_and",
            Self::LogicalOr => "logical_or",
            Self::Minus => "minus",
            Self::MinusEqual => "minus_equal",
            Self::Modulo => "modulo",
            Self::ModuloEqual => "modulo_equal",
            Self::MultiplyEqual => "multiply_equal",
            Self::OpGt => "op_gt",
            Self::OpGte => "op_gte",
            Self::OpLt => "op_lt",
            Self::OpLte => "op_lte",
            Self::OpenCurlyBracket => "open_curly_bracket",
            Self::OpenParen => "open_paren",
            Self::OpenSqBracket => "open_sq_bracket",
            Self::Period => "period",
            Self::Plus => "plus",
            Self::PlusEqual => "plus_equal",
            Self::Power => "power",
            Self::PowerEqual => "power_equal",
            Self::Question => "question",
            Self::ScopeResolution => "scope_resolution",
            Self::Semicolon => "semicolon",
            Self::ShiftLeft => "shift_left",
            Self::ShiftLeftEqual => "shift_left_equal",
            Self::ShiftRight => "shift_right",
            Self::ShiftRightEqual => "shift_right_equal",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic identifier of a reserved lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// The `#` that opens a directive line.
    DirectiveMarker,
    Define,
    Elif,
    Else,
    Endif,
    Error,
    If,
    Ifdef,
    Ifndef,
    Import,
    Include,
    Line,
    Pragma,
    Undef,
    Using,
    // C reserved words
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    Int,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
}

impl Keyword {
    /// Whether the keyword can follow the directive marker.
    pub fn is_directive(self) -> bool {
        matches!(
            self,
            Self::Define
                | Self::Elif
                | Self::Else
                | Self::Endif
                | Self::Error
                | Self::If
                | Self::Ifdef
                | Self::Ifndef
                | Self::Import
                | Self::Include
                | Self::Line
                | Self::Pragma
                | Self::Undef
                | Self::Using
        )
    }
}

static OPERATORS: Lazy<HashMap<&'static str, Operator>> = Lazy::new(|| {
    use Operator::*;
    HashMap::from([
        ("*", Asterisk),
        ("&", Ampersand),
        ("|", BinaryOr),
        ("!", BinaryNot),
        ("!=", BinaryNotEq),
        ("~", Tilde),
        ("<", OpLt),
        ("<=", OpLte),
        (">", OpGt),
        (">=", OpGte),
        ("=", Assignment),
        ("==", Equal),
        ("+", Plus),
        ("+=", PlusEqual),
        ("-", Minus),
        ("-=", MinusEqual),
        ("/", Divide),
        ("/=", DivideEqual),
        ("*=", MultiplyEqual),
        ("%", Modulo),
        (",", Comma),
        (".", Period),
        ("^", Power),
        ("?", Question),
        ("(", OpenParen),
        (")", CloseParen),
        ("[", OpenSqBracket),
        ("]", CloseSqBracket),
        ("{", OpenCurlyBracket),
        ("}", CloseCurlyBracket),
        (":", Colon),
        (";", Semicolon),
        ("#", Hash),
        ("##", HashHash),
        ("&&", LogicalAnd),
        ("||", LogicalOr),
        ("<<", ShiftLeft),
        (">>", ShiftRight),
        ("++", Increment),
        ("--", Decrement),
        ("::", ScopeResolution),
        ("<<=", ShiftLeftEqual),
        (">>=", ShiftRightEqual),
        ("->", Arrow),
        ("%=", ModuloEqual),
        ("&=", AndEqual),
        ("|=", OrEqual),
        ("^=", PowerEqual),
    ])
});

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;
    HashMap::from([
        ("#", DirectiveMarker),
        ("define", Define),
        ("elif", Elif),
        ("else", Else),
        ("endif", Endif),
        ("error", Error),
        ("if", If),
        ("ifdef", Ifdef),
        ("ifndef", Ifndef),
        ("import", Import),
        ("include", Include),
        ("line", Line),
        ("pragma", Pragma),
        ("undef", Undef),
        ("using", Using),
        ("auto", Auto),
        ("break", Break),
        ("case", Case),
        ("char", Char),
        ("const", Const),
        ("continue", Continue),
        ("default", Default),
        ("do", Do),
        ("double", Double),
        ("enum", Enum),
        ("extern", Extern),
        ("float", Float),
        ("for", For),
        ("goto", Goto),
        ("int", Int),
        ("long", Long),
        ("register", Register),
        ("return", Return),
        ("short", Short),
        ("signed", Signed),
        ("sizeof", Sizeof),
        ("static", Static),
        ("struct", Struct),
        ("switch", Switch),
        ("typedef", Typedef),
        ("union", Union),
        ("unsigned", Unsigned),
        ("void", Void),
        ("volatile", Volatile),
        ("while", While),
    ])
});

/// Grammar for C-like languages.
///
/// Extends the generic operator characters with `#`, `%`, `~` and `?`, and
/// grows operators by longest match against the operator table.
///
/// # Example
///
/// ```rust
/// use fsm_relay::lexical::{CFamily, Grammar, Keyword, Operator};
///
/// let c = CFamily;
/// assert!(c.greedy_operator_check("<<"));
/// assert!(!c.greedy_operator_check("<<<"));
/// assert_eq!(c.operator("::"), Some(Operator::ScopeResolution));
/// assert_eq!(c.lookup_keyword("include"), Some(Keyword::Include));
/// assert_eq!(c.lookup_keyword("main"), None);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CFamily;

impl CFamily {
    pub fn operator(&self, lexeme: &str) -> Option<Operator> {
        OPERATORS.get(lexeme).copied()
    }

    pub fn lookup_keyword(&self, lexeme: &str) -> Option<Keyword> {
        KEYWORDS.get(lexeme).copied()
    }
}

impl Grammar for CFamily {
    fn is_operator_char(&self, ch: char) -> bool {
        "*|&!<>=+-/,.^()[]{}:;#%~?".contains(ch)
    }

    fn greedy_operator_check(&self, lexeme: &str) -> bool {
        OPERATORS.contains_key(lexeme)
    }

    fn operator_name(&self, lexeme: &str) -> Option<&'static str> {
        self.operator(lexeme).map(Operator::name)
    }
}
