//! Declaration collection as a composed observer: the collector accumulates
//! per-module declaration lists while forwarding every event to an optional
//! inner observer.

use crate::{ParseObserver, PortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDecl {
    pub name: String,
    pub direction: PortDirection,
    pub width: u32,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDecl {
    pub name: String,
    pub kind: String,
    pub width: u32,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub value: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinDecl {
    pub name: String,
    pub net: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDecl {
    pub name: String,
    pub module: String,
    pub pins: Vec<PinDecl>,
    pub line: u32,
}

/// Everything harvested from one `module .. endmodule` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleDecls {
    pub name: String,
    pub line: u32,
    pub ports: Vec<PortDecl>,
    pub nets: Vec<NetDecl>,
    pub parameters: Vec<ParamDecl>,
    pub cells: Vec<CellDecl>,
}

/// Accumulators reset on every `module_begin`; a snapshot is sealed on each
/// `module_end` (or at end of scan for an unterminated module), so a single
/// scan harvests every module in a multi-module file.
pub struct DeclCollector<O = ()> {
    inner: O,
    current: Option<ModuleDecls>,
    pending_width: Option<u32>,
    finished: Vec<ModuleDecls>,
}

impl DeclCollector<()> {
    pub fn new() -> DeclCollector<()> {
        DeclCollector::with_inner(())
    }
}

impl Default for DeclCollector<()> {
    fn default() -> DeclCollector<()> {
        DeclCollector::new()
    }
}

impl<O: ParseObserver> DeclCollector<O> {
    /// Collect while forwarding all events to `inner`.
    pub fn with_inner(inner: O) -> DeclCollector<O> {
        DeclCollector { inner, current: None, pending_width: None, finished: Vec::new() }
    }

    /// Snapshot of the module currently being scanned.
    pub fn current_module(&self) -> Option<&ModuleDecls> {
        self.current.as_ref()
    }

    pub fn into_inner(self) -> O {
        self.inner
    }

    /// All sealed module snapshots, in source order.
    pub fn finish(mut self) -> Vec<ModuleDecls> {
        self.seal();
        self.finished
    }

    fn seal(&mut self) {
        if let Some(module) = self.current.take() {
            self.finished.push(module);
        }
        self.pending_width = None;
    }
}

impl<O: ParseObserver> ParseObserver for DeclCollector<O> {
    fn module_begin(&mut self, name: &str, line: u32) {
        self.inner.module_begin(name, line);
        self.seal();
        self.current = Some(ModuleDecls { name: name.to_owned(), line, ..ModuleDecls::default() });
    }

    fn module_end(&mut self) {
        self.inner.module_end();
        self.seal();
    }

    fn width_hint(&mut self, width: u32) {
        self.inner.width_hint(width);
        self.pending_width = Some(width);
    }

    fn port_declaration(&mut self, direction: PortDirection, name: &str, line: u32) {
        self.inner.port_declaration(direction, name, line);
        let width = self.pending_width.take().unwrap_or(1);
        if let Some(module) = &mut self.current {
            module.ports.push(PortDecl { name: name.to_owned(), direction, width, line });
        }
    }

    fn net_declaration(&mut self, kind: &str, name: &str, line: u32) {
        self.inner.net_declaration(kind, name, line);
        let width = self.pending_width.take().unwrap_or(1);
        if let Some(module) = &mut self.current {
            module.nets.push(NetDecl {
                name: name.to_owned(),
                kind: kind.to_owned(),
                width,
                line,
            });
        }
    }

    fn parameter_declaration(&mut self, name: &str, line: u32) {
        self.inner.parameter_declaration(name, line);
        if let Some(module) = &mut self.current {
            module.parameters.push(ParamDecl {
                name: name.to_owned(),
                value: "1".to_owned(),
                line,
            });
        }
    }

    fn parameter_value(&mut self, value: &str) {
        self.inner.parameter_value(value);
        if let Some(param) = self.current.as_mut().and_then(|m| m.parameters.last_mut()) {
            param.value = value.to_owned();
        }
    }

    fn instance(&mut self, module: &str, name: &str, line: u32) {
        self.inner.instance(module, name, line);
        if let Some(current) = &mut self.current {
            current.cells.push(CellDecl {
                name: name.to_owned(),
                module: module.to_owned(),
                pins: Vec::new(),
                line,
            });
        }
    }

    fn pin_connection(&mut self, pin: &str, net: Option<&str>) {
        self.inner.pin_connection(pin, net);
        if let Some(cell) = self.current.as_mut().and_then(|m| m.cells.last_mut()) {
            cell.pins.push(PinDecl { name: pin.to_owned(), net: net.map(str::to_owned) });
        }
    }

    fn always_begin(&mut self, line: u32) {
        self.inner.always_begin(line);
    }

    fn assign(&mut self, line: u32) {
        self.inner.assign(line);
    }

    fn directive(&mut self, text: &str, line: u32, column: u32) {
        self.inner.directive(text, line, column);
    }

    fn identifier(&mut self, text: &str, line: u32, column: u32) {
        self.inner.identifier(text, line, column);
    }
}
