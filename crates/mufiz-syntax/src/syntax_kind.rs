/// Every token and node kind of the Mufiz syntax tree.
///
/// Token kinds come first, node kinds after `EOF`. The discriminants are used
/// as bit indices by [`crate::SyntaxSet`].
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u8)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    SEMICOLON,
    COLON,
    DOT,
    EQ,
    EQ2,
    BANG,
    BANG_EQ,
    LT,
    LT_EQ,
    GT,
    GT_EQ,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,

    VAR_KW,
    PRINT_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    FOR_KW,
    FOREACH_KW,
    IN_KW,
    FUN_KW,
    CLASS_KW,
    RETURN_KW,
    TABLE_KW,
    LIST_KW,
    TRUE_KW,
    FALSE_KW,
    NIL_KW,
    SELF_KW,
    SUPER_KW,
    AND_KW,
    OR_KW,

    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    QUOTED_STRING,

    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    EXPRESSION_STATEMENT,
    VARIABLE_DECLARATION,
    PRINT_STATEMENT,
    IF_STATEMENT,
    WHILE_STATEMENT,
    FOR_STATEMENT,
    FOREACH_STATEMENT,
    FUNCTION_DECLARATION,
    CLASS_DECLARATION,
    CLASS_BODY,
    METHOD_DECLARATION,
    PARAMETER_LIST,
    RETURN_STATEMENT,
    BLOCK_STATEMENT,

    ASSIGNMENT_EXPRESSION,
    LOGICAL_OR_EXPRESSION,
    LOGICAL_AND_EXPRESSION,
    EQUALITY_EXPRESSION,
    COMPARISON_EXPRESSION,
    ADDITION_EXPRESSION,
    MULTIPLICATION_EXPRESSION,
    UNARY_EXPRESSION,
    CALL_EXPRESSION,
    ARGUMENT_LIST,
    MEMBER_EXPRESSION,
    INDEX_EXPRESSION,
    VECTOR_LITERAL,
    HASH_TABLE_LITERAL,
    HASH_PAIR,
    LINKED_LIST_LITERAL,
    PARENTHESIZED_EXPRESSION,
    COMPLEX_NUMBER,
    IDENTIFIER,
    NUMBER,
    STRING,
    BOOLEAN,
    NIL,
    SELF,
    SUPER,

    ERROR,
    TOMBSTONE,
}

impl SyntaxKind {
    /// Returns `true` for whitespace and comments.
    #[inline]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Returns `true` for reserved words.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        self as u8 >= Self::VAR_KW as u8 && self as u8 <= Self::OR_KW as u8
    }

    /// Returns `true` for kinds produced by the tokenizer.
    #[inline]
    pub const fn is_token(self) -> bool {
        self as u8 <= Self::EOF as u8
    }

    /// Looks up the keyword spelled by `text`.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "var" => Self::VAR_KW,
            "print" => Self::PRINT_KW,
            "if" => Self::IF_KW,
            "else" => Self::ELSE_KW,
            "while" => Self::WHILE_KW,
            "for" => Self::FOR_KW,
            "foreach" => Self::FOREACH_KW,
            "in" => Self::IN_KW,
            "fun" => Self::FUN_KW,
            "class" => Self::CLASS_KW,
            "return" => Self::RETURN_KW,
            "table" => Self::TABLE_KW,
            "list" => Self::LIST_KW,
            "true" => Self::TRUE_KW,
            "false" => Self::FALSE_KW,
            "nil" => Self::NIL_KW,
            "self" => Self::SELF_KW,
            "super" => Self::SUPER_KW,
            "and" => Self::AND_KW,
            "or" => Self::OR_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed spelling of punctuation and keyword tokens, used in messages.
    pub const fn text(self) -> Option<&'static str> {
        let text = match self {
            Self::LEFT_PAREN => "(",
            Self::RIGHT_PAREN => ")",
            Self::LEFT_BRACKET => "[",
            Self::RIGHT_BRACKET => "]",
            Self::LEFT_BRACE => "{",
            Self::RIGHT_BRACE => "}",
            Self::COMMA => ",",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::DOT => ".",
            Self::EQ => "=",
            Self::EQ2 => "==",
            Self::BANG => "!",
            Self::BANG_EQ => "!=",
            Self::LT => "<",
            Self::LT_EQ => "<=",
            Self::GT => ">",
            Self::GT_EQ => ">=",
            Self::PLUS => "+",
            Self::MINUS => "-",
            Self::STAR => "*",
            Self::SLASH => "/",
            Self::PERCENT => "%",
            Self::VAR_KW => "var",
            Self::PRINT_KW => "print",
            Self::IF_KW => "if",
            Self::ELSE_KW => "else",
            Self::WHILE_KW => "while",
            Self::FOR_KW => "for",
            Self::FOREACH_KW => "foreach",
            Self::IN_KW => "in",
            Self::FUN_KW => "fun",
            Self::CLASS_KW => "class",
            Self::RETURN_KW => "return",
            Self::TABLE_KW => "table",
            Self::LIST_KW => "list",
            Self::TRUE_KW => "true",
            Self::FALSE_KW => "false",
            Self::NIL_KW => "nil",
            Self::SELF_KW => "self",
            Self::SUPER_KW => "super",
            Self::AND_KW => "and",
            Self::OR_KW => "or",
            _ => return None,
        };
        Some(text)
    }
}
