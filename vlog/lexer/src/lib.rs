//! Maximal-munch lexer for (System)Verilog source text.
//!
//! [`tokenize`] produces raw `(kind, len)` tokens covering every byte of the
//! input. [`lex`] layers line/column tracking and keyword classification on
//! top, dropping trivia and skipped characters, and terminates the stream
//! with exactly one [`SyntaxKind::Eof`] token.

mod cursor;
#[cfg(test)]
mod tests;

use text_size::{TextRange, TextSize};
use tokens::lexer::{Token, TokenKind};
use tokens::{LanguageStandard, SyntaxKind};

use crate::cursor::Cursor;

/// Breaks the whole source text into raw tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(input);
    while !cursor.is_eof() {
        cursor.advance_token();
    }
    cursor.finish()
}

/// A classified token with its text and 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullToken {
    pub kind: SyntaxKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

/// Tokenize and classify, keeping comments, whitespace and newlines.
pub fn lex_with_trivia(src: &str, standard: LanguageStandard) -> Vec<FullToken> {
    lex_impl(src, standard, true)
}

/// Tokenize and classify, dropping trivia.
pub fn lex(src: &str, standard: LanguageStandard) -> Vec<FullToken> {
    lex_impl(src, standard, false)
}

fn lex_impl(src: &str, standard: LanguageStandard, keep_trivia: bool) -> Vec<FullToken> {
    let mut dst = Vec::new();
    let mut offset = TextSize::from(0);
    let mut line = 1u32;
    let mut column = 1u32;

    for token in tokenize(src) {
        let lexeme = &src[TextRange::at(offset, token.len)];
        offset += token.len;

        let syntax = token.kind.to_syntax(lexeme, standard);
        if let Some(kind) = syntax {
            if keep_trivia || !kind.is_trivia() {
                dst.push(FullToken { kind, lexeme: lexeme.to_owned(), line, column });
            }
        }

        advance_position(lexeme, token.kind, &mut line, &mut column);
    }

    dst.push(FullToken { kind: SyntaxKind::Eof, lexeme: String::new(), line, column });
    dst
}

/// Newlines bump the line counter and reset the column; everything else
/// advances the column by lexeme length. Multi-line lexemes (block
/// comments, strings) account for their embedded newlines.
fn advance_position(lexeme: &str, kind: TokenKind, line: &mut u32, column: &mut u32) {
    if kind == TokenKind::Newline {
        *line += 1;
        *column = 1;
        return;
    }
    match lexeme.rfind('\n') {
        Some(pos) => {
            *line += lexeme.matches('\n').count() as u32;
            *column = lexeme[pos + 1..].chars().count() as u32 + 1;
        }
        None => *column += lexeme.chars().count() as u32,
    }
}
