use text_size::TextSize;

/// Raw token produced by the lexer.
/// It doesn't contain information about data that has been lexed,
/// only the type of the token and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub len: TextSize,
}

/// Enum representing common lexeme types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// "// comment"
    LineComment,
    /// `/* block comment */`, possibly spanning lines
    BlockComment { terminated: bool },
    /// Any run of spaces/tabs not containing a newline
    Whitespace,
    /// A single `\n` (carriage returns count as plain whitespace)
    Newline,

    /// a normal identifier, possibly a keyword of the active standard
    SimpleIdent,

    Literal { kind: LiteralKind },

    /// a compiler directive: backtick followed by a word
    CompilerDirective,

    /// maximal run of characters from the operator character set
    Operator,
    /// a single punctuation character
    Delimiter,

    /// Unknown token, not expected by the lexer; skipped downstream
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LiteralKind {
    /// plain decimal integer
    Int,
    /// `<width>'[s]<b|d|h><digits>`
    SizedInt,
    /// double quoted, no escape processing
    Str { terminated: bool },
}

pub const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '%', '<', '>', '=', '!', '&', '|', '^', '~'];

pub const DELIMITER_CHARS: &[char] = &['(', ')', '{', '}', '[', ']', ';', ',', '.', '#', ':'];

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

pub fn is_delimiter_char(c: char) -> bool {
    DELIMITER_CHARS.contains(&c)
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
