use crate::kw::{self, LanguageStandard};
use crate::lexer::{LiteralKind, TokenKind};

/// Surface classification of a token as seen by the structural parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    Keyword,
    Ident,
    Number,
    String,
    Operator,
    Delimiter,
    Directive,
    Comment,
    Whitespace,
    Newline,
    Eof,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Comment | SyntaxKind::Whitespace | SyntaxKind::Newline)
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyntaxKind::Keyword => "keyword",
            SyntaxKind::Ident => "identifier",
            SyntaxKind::Number => "number",
            SyntaxKind::String => "string",
            SyntaxKind::Operator => "operator",
            SyntaxKind::Delimiter => "delimiter",
            SyntaxKind::Directive => "directive",
            SyntaxKind::Comment => "comment",
            SyntaxKind::Whitespace => "whitespace",
            SyntaxKind::Newline => "newline",
            SyntaxKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

impl TokenKind {
    /// Classify a raw token against the active language standard.
    /// `Unknown` tokens yield `None` and are skipped by the caller.
    pub fn to_syntax(self, text: &str, standard: LanguageStandard) -> Option<SyntaxKind> {
        let kind = match self {
            TokenKind::LineComment | TokenKind::BlockComment { .. } => SyntaxKind::Comment,
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Newline => SyntaxKind::Newline,
            TokenKind::SimpleIdent => {
                if kw::is_keyword(text, standard) {
                    SyntaxKind::Keyword
                } else {
                    SyntaxKind::Ident
                }
            }
            TokenKind::Literal { kind: LiteralKind::Str { .. } } => SyntaxKind::String,
            TokenKind::Literal { .. } => SyntaxKind::Number,
            TokenKind::CompilerDirective => SyntaxKind::Directive,
            TokenKind::Operator => SyntaxKind::Operator,
            TokenKind::Delimiter => SyntaxKind::Delimiter,
            TokenKind::Unknown => return None,
        };
        Some(kind)
    }
}
