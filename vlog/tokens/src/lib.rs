//! Static token and language data shared by the lexer, preprocessor and
//! parser: raw token kinds, per-standard keyword tables and the number
//! literal utilities. Pure lookup/data, no pipeline logic.

pub mod kw;
pub mod lexer;
pub mod number;
pub mod parser;

pub use kw::LanguageStandard;
pub use lexer::{LiteralKind, Token, TokenKind};
pub use parser::SyntaxKind;
