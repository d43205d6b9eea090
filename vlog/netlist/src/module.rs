//! The owned entity graph: a [`Module`] exclusively owns its ports, nets
//! and cells; cells own their pins. Cross-references (pin→net, cell→module
//! definition) are by name or by [`ModuleId`], never by pointer.

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use parser::PortDirection;

/// Insertion-ordered name→entity map, so dumps and regenerated source are
/// deterministic and follow declaration order.
pub type NameMap<V> = IndexMap<String, V, ahash::RandomState>;

/// Index of a module in the netlist's module table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(u32);

impl From<usize> for ModuleId {
    fn from(idx: usize) -> ModuleId {
        ModuleId(idx as u32)
    }
}

impl From<ModuleId> for usize {
    fn from(idx: ModuleId) -> usize {
        idx.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    pub width: u32,
}

/// A `(cell, pin)` pair naming one connection point inside a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRef {
    pub cell: String,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub name: String,
    pub net_type: String,
    pub width: u32,
    /// The single driving pin, if linking found one.
    pub driver: Option<PinRef>,
    /// Pins reading this net.
    pub loads: Vec<PinRef>,
    /// Every pin attached to this net, drivers and loads included.
    pub connections: Vec<PinRef>,
}

impl Net {
    fn new(name: &str, net_type: &str, width: u32) -> Net {
        Net {
            name: name.to_owned(),
            net_type: net_type.to_owned(),
            width,
            driver: None,
            loads: Vec::new(),
            connections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    /// Name of the connected net in the enclosing module, if any.
    pub net: Option<String>,
}

/// A module instantiation. `resolved` is set only by [`crate::Netlist::link`];
/// an unresolved reference is a recoverable state, not a structural error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub name: String,
    pub module_name: String,
    pub pins: NameMap<Pin>,
    pub resolved: Option<ModuleId>,
}

impl Cell {
    pub fn add_pin(&mut self, name: &str, net: Option<&str>) -> &mut Pin {
        let pin = Pin { name: name.to_owned(), net: net.map(str::to_owned) };
        self.pins.entry(name.to_owned()).or_insert(pin)
    }

    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub ports: NameMap<Port>,
    pub nets: NameMap<Net>,
    pub cells: NameMap<Cell>,
    pub parameters: NameMap<String>,
    pub source_file: Utf8PathBuf,
    pub is_top: bool,
}

impl Module {
    pub fn new(name: &str, source_file: impl Into<Utf8PathBuf>) -> Module {
        Module {
            name: name.to_owned(),
            ports: NameMap::default(),
            nets: NameMap::default(),
            cells: NameMap::default(),
            parameters: NameMap::default(),
            source_file: source_file.into(),
            is_top: false,
        }
    }

    /// Declare a port. A port implicitly carries a same-named net; the net
    /// is created if no explicit declaration provided one yet.
    pub fn add_port(&mut self, name: &str, direction: PortDirection, width: u32) -> &mut Port {
        self.nets
            .entry(name.to_owned())
            .or_insert_with(|| Net::new(name, "wire", width));
        let port = Port { name: name.to_owned(), direction, width };
        self.ports.entry(name.to_owned()).or_insert(port)
    }

    /// Declare a net. An explicit declaration refines the type and width of
    /// a net already implied by a port.
    pub fn add_net(&mut self, name: &str, net_type: &str, width: u32) -> &mut Net {
        let net = self
            .nets
            .entry(name.to_owned())
            .or_insert_with(|| Net::new(name, net_type, width));
        net.net_type = net_type.to_owned();
        net.width = width;
        net
    }

    pub fn add_cell(&mut self, name: &str, module_name: &str) -> &mut Cell {
        let cell = Cell {
            name: name.to_owned(),
            module_name: module_name.to_owned(),
            pins: NameMap::default(),
            resolved: None,
        };
        self.cells.entry(name.to_owned()).or_insert(cell)
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets.get(name)
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.get(name)
    }
}
