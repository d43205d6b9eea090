use std::str::Chars;

use text_size::TextSize;
use tokens::lexer::{
    is_delimiter_char, is_ident_continue, is_ident_start, is_operator_char, LiteralKind, Token,
    TokenKind,
};

/// Peekable iterator over a char sequence.
///
/// Next characters can be peeked via the `first`/`second`/`third` methods,
/// and position can be shifted forward via the `bump` method.
pub(crate) struct Cursor<'a> {
    initial_len: TextSize,
    chars: Chars<'a>,
    dst: Vec<Token>,
}

pub(crate) const EOF_CHAR: char = '\0';

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            initial_len: TextSize::of(input),
            chars: input.chars(),
            // Tokens are on average a length of about 4
            dst: Vec::with_capacity(input.len() / 4),
        }
    }

    fn nth_char(&self, n: usize) -> char {
        self.chars.clone().nth(n).unwrap_or(EOF_CHAR)
    }

    /// Peeks the next symbol from the input stream without consuming it.
    pub(crate) fn first(&self) -> char {
        self.nth_char(0)
    }

    /// Peeks the second symbol from the input stream without consuming it.
    pub(crate) fn second(&self) -> char {
        self.nth_char(1)
    }

    /// Peeks the third symbol from the input stream without consuming it.
    pub(crate) fn third(&self) -> char {
        self.nth_char(2)
    }

    /// Checks if there is nothing more to consume.
    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    fn len_consumed(&self) -> TextSize {
        self.initial_len - TextSize::of(self.chars.as_str())
    }

    /// Moves to the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Eats symbols while predicate returns true or until the end of input.
    pub(crate) fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.bump();
        }
    }

    pub(crate) fn finish_token(&mut self, kind: TokenKind) {
        let len = self.len_consumed();
        self.initial_len -= len;
        self.dst.push(Token { kind, len })
    }

    pub(crate) fn finish(self) -> Vec<Token> {
        self.dst
    }
}

impl Cursor<'_> {
    /// Lexes a single token from the input stream.
    pub(crate) fn advance_token(&mut self) {
        let first = self.bump().unwrap();
        let kind = match first {
            '/' => match self.first() {
                '/' => self.line_comment(),
                '*' => self.block_comment(),
                _ => self.operator(),
            },

            '"' => self.string_literal(),

            c if c.is_ascii_digit() => self.number(),

            '`' if is_ident_start(self.first()) => {
                self.eat_while(is_ident_continue);
                TokenKind::CompilerDirective
            }

            c if is_ident_start(c) => {
                self.eat_while(is_ident_continue);
                TokenKind::SimpleIdent
            }

            c if is_operator_char(c) => self.operator(),
            c if is_delimiter_char(c) => TokenKind::Delimiter,

            '\n' => TokenKind::Newline,
            c if c.is_whitespace() => {
                self.eat_while(|c| c.is_whitespace() && c != '\n');
                TokenKind::Whitespace
            }

            _ => TokenKind::Unknown,
        };
        self.finish_token(kind);
    }

    fn line_comment(&mut self) -> TokenKind {
        self.eat_while(|c| c != '\n');
        TokenKind::LineComment
    }

    fn block_comment(&mut self) -> TokenKind {
        self.bump();
        let mut terminated = false;
        while let Some(c) = self.bump() {
            if c == '*' && self.first() == '/' {
                self.bump();
                terminated = true;
                break;
            }
        }
        TokenKind::BlockComment { terminated }
    }

    fn string_literal(&mut self) -> TokenKind {
        let mut terminated = false;
        while let Some(c) = self.bump() {
            if c == '"' {
                terminated = true;
                break;
            }
        }
        TokenKind::Literal { kind: LiteralKind::Str { terminated } }
    }

    fn number(&mut self) -> TokenKind {
        self.eat_while(|c| c.is_ascii_digit() || c == '_');

        // sized literal: <width>'[s]<b|d|h><digits>
        if self.first() == '\'' {
            let (base, first_digit) =
                if self.second() == 's' { (self.third(), 3) } else { (self.second(), 2) };
            if matches!(base, 'b' | 'd' | 'h') && is_base_digit(self.nth_char(first_digit)) {
                for _ in 0..first_digit {
                    self.bump();
                }
                self.eat_while(is_base_digit);
                return TokenKind::Literal { kind: LiteralKind::SizedInt };
            }
        }

        TokenKind::Literal { kind: LiteralKind::Int }
    }

    fn operator(&mut self) -> TokenKind {
        self.eat_while(is_operator_char);
        TokenKind::Operator
    }
}

fn is_base_digit(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, 'x' | 'X' | 'z' | 'Z' | '_')
}
