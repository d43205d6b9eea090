//! Structural (System)Verilog parser.
//!
//! One linear left-to-right scan over the token stream, dispatching on
//! keywords to small construct handlers which raise events on a
//! [`ParseObserver`]. This is deliberately not a grammar parser: each
//! declaration handler advances to the next identifier and takes it as the
//! declared name, so multi-name declarations on one statement are only
//! partially captured.
//!
//! [`DeclCollector`] subscribes to the events and accumulates per-module
//! declaration lists; it composes with (rather than replaces) any other
//! observer.

mod collect;
mod grammar;
mod parser;

use tokens::LanguageStandard;

pub use crate::collect::{
    CellDecl, DeclCollector, ModuleDecls, NetDecl, ParamDecl, PinDecl, PortDecl,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
    Inout,
}

impl PortDirection {
    pub fn from_keyword(keyword: &str) -> Option<PortDirection> {
        let direction = match keyword {
            "input" => PortDirection::Input,
            "output" => PortDirection::Output,
            "inout" => PortDirection::Inout,
            _ => return None,
        };
        Some(direction)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::Inout => "inout",
        }
    }
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural events raised during the scan. All methods default to no-ops
/// so observers implement only what they care about.
pub trait ParseObserver {
    fn module_begin(&mut self, _name: &str, _line: u32) {}
    fn module_end(&mut self) {}
    fn port_declaration(&mut self, _direction: PortDirection, _name: &str, _line: u32) {}
    fn net_declaration(&mut self, _kind: &str, _name: &str, _line: u32) {}
    fn parameter_declaration(&mut self, _name: &str, _line: u32) {}
    /// Value token of a `parameter NAME = value` declaration, raised right
    /// after the corresponding `parameter_declaration`.
    fn parameter_value(&mut self, _value: &str) {}
    /// A `[msb:lsb]` range seen between a declaration keyword and the
    /// declared name.
    fn width_hint(&mut self, _width: u32) {}
    fn always_begin(&mut self, _line: u32) {}
    fn assign(&mut self, _line: u32) {}
    fn directive(&mut self, _text: &str, _line: u32, _column: u32) {}
    fn identifier(&mut self, _text: &str, _line: u32, _column: u32) {}
    fn instance(&mut self, _module: &str, _name: &str, _line: u32) {}
    /// Pin of the most recently begun instance. Positional connections get
    /// synthesized `pinN` names.
    fn pin_connection(&mut self, _pin: &str, _net: Option<&str>) {}
}

/// The null observer.
impl ParseObserver for () {}

/// Tokenize `src` and scan it once, raising events on `observer`.
pub fn parse(src: &str, standard: LanguageStandard, observer: &mut dyn ParseObserver) {
    let tokens = lexer::lex(src, standard);
    let mut p = parser::Parser::new(tokens);
    grammar::source_file(&mut p, observer);
}

/// Parse and return the declaration snapshot of every module in `src`.
pub fn parse_modules(src: &str, standard: LanguageStandard) -> Vec<ModuleDecls> {
    let mut collector = DeclCollector::new();
    parse(src, standard, &mut collector);
    collector.finish()
}
