use std::cell::Cell;

use lexer::FullToken;
use tokens::SyntaxKind;
use typed_index_collections::TiVec;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub(crate) struct TokenIdx(u32);

impl From<usize> for TokenIdx {
    fn from(idx: usize) -> TokenIdx {
        TokenIdx(idx as u32)
    }
}

impl From<TokenIdx> for usize {
    fn from(idx: TokenIdx) -> usize {
        idx.0 as usize
    }
}

/// Cursor into the trivia-free token stream. The stream always ends with an
/// `Eof` token, which the cursor refuses to advance past.
pub(crate) struct Parser {
    tokens: TiVec<TokenIdx, FullToken>,
    pos: TokenIdx,
    steps: Cell<u32>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<FullToken>) -> Parser {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == SyntaxKind::Eof));
        Parser { tokens: TiVec::from(tokens), pos: TokenIdx(0), steps: Cell::new(0) }
    }

    pub(crate) fn current(&self) -> &FullToken {
        self.nth(0)
    }

    /// Lookahead: the nth token from the current position, clamped to `Eof`.
    pub(crate) fn nth(&self, n: usize) -> &FullToken {
        let steps = self.steps.get();
        assert!(steps <= 10_000_000, "the parser seems stuck");
        self.steps.set(steps + 1);

        let idx = TokenIdx::from(usize::from(self.pos) + n);
        self.tokens.get(idx).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn at_delimiter(&self, text: &str) -> bool {
        self.nth_at_delimiter(0, text)
    }

    pub(crate) fn nth_at_delimiter(&self, n: usize, text: &str) -> bool {
        let token = self.nth(n);
        token.kind == SyntaxKind::Delimiter && token.lexeme == text
    }

    pub(crate) fn at_operator(&self, text: &str) -> bool {
        let token = self.current();
        token.kind == SyntaxKind::Operator && token.lexeme == text
    }

    /// Advances the parser by one token; a no-op at `Eof`.
    pub(crate) fn bump(&mut self) {
        if !self.at(SyntaxKind::Eof) {
            self.pos = TokenIdx::from(usize::from(self.pos) + 1);
        }
    }

    /// Consume the current token if it is the given delimiter.
    pub(crate) fn eat_delimiter(&mut self, text: &str) -> bool {
        if !self.at_delimiter(text) {
            return false;
        }
        self.bump();
        true
    }
}
