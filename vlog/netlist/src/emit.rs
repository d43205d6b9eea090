//! Serialization views: the diagnostic structure dump and the regenerated
//! Verilog skeleton. Both follow registration order, independent of the
//! original source formatting.

use std::fmt::Write;

use crate::{Module, Netlist};

pub(crate) fn dump(netlist: &Netlist) -> String {
    let mut out = String::new();
    out.push_str("Netlist Dump:\n=============\n");
    for module in netlist.modules() {
        writeln!(out).unwrap();
        write!(out, "Module: {}", module.name).unwrap();
        if module.is_top {
            write!(out, " (top)").unwrap();
        }
        writeln!(out, " [{}]", module.source_file).unwrap();

        writeln!(out, "  Ports: {}", module.ports.len()).unwrap();
        for port in module.ports.values() {
            writeln!(out, "    {} {}{}", port.direction, bus(port.width), port.name).unwrap();
        }

        writeln!(out, "  Nets: {}", module.nets.len()).unwrap();
        for net in module.nets.values() {
            writeln!(out, "    {} {}{}", net.net_type, bus(net.width), net.name).unwrap();
        }

        writeln!(out, "  Cells: {}", module.cells.len()).unwrap();
        for cell in module.cells.values() {
            writeln!(out, "    {} ({})", cell.name, cell.module_name).unwrap();
        }
    }
    out
}

pub(crate) fn verilog_text(netlist: &Netlist) -> String {
    let texts: Vec<String> = netlist.modules().map(module_text).collect();
    let mut out = texts.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn module_text(module: &Module) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("module {} (", module.name));
    if !module.ports.is_empty() {
        let names: Vec<&str> = module.ports.keys().map(String::as_str).collect();
        lines.push(format!("  {}", names.join(", ")));
    }
    lines.push(");".to_owned());

    for port in module.ports.values() {
        lines.push(format!("  {} {}{};", port.direction, bus(port.width), port.name));
    }
    for net in module.nets.values() {
        if module.ports.contains_key(&net.name) {
            continue;
        }
        lines.push(format!("  {} {}{};", net.net_type, bus(net.width), net.name));
    }

    for cell in module.cells.values() {
        let connections: Vec<String> = cell
            .pins
            .values()
            .filter_map(|pin| pin.net.as_ref().map(|net| format!("    .{}({})", pin.name, net)))
            .collect();
        if connections.is_empty() {
            lines.push(format!("  {} {} ();", cell.module_name, cell.name));
        } else {
            lines.push(format!("  {} {} (", cell.module_name, cell.name));
            lines.push(connections.join(",\n"));
            lines.push("  );".to_owned());
        }
    }

    lines.push("endmodule".to_owned());
    lines.join("\n")
}

fn bus(width: u32) -> String {
    if width > 1 {
        format!("[{}:0] ", width - 1)
    } else {
        String::new()
    }
}
