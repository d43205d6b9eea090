use camino::Utf8Path;
use expect_test::expect;

use crate::{Netlist, NetlistConfig, NetlistDiagnostic};

fn read(netlist: &mut Netlist, src: &str, origin: &str) {
    netlist.read_source(src, Utf8Path::new(origin)).unwrap();
}

#[test]
fn cross_file_link_and_top_inference() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module A;\n  B inst ();\nendmodule\n", "a.v");
    read(&mut netlist, "module B;\nendmodule\n", "b.v");
    netlist.link();

    let a = netlist.find_module("A").unwrap();
    let resolved = a.cell("inst").unwrap().resolved.unwrap();
    assert_eq!(netlist.module(resolved).name, "B");

    let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(tops, ["A"]);
    assert!(netlist.diagnostics().is_empty());
}

#[test]
fn unresolved_reference_is_recoverable() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module A;\n  missing u0 ();\nendmodule\n", "a.v");
    netlist.link();

    let a = netlist.find_module("A").unwrap();
    assert!(a.cell("u0").unwrap().resolved.is_none());
    assert!(matches!(
        netlist.diagnostics()[0],
        NetlistDiagnostic::UnresolvedModule { .. }
    ));
    assert_eq!(netlist.modules().count(), 1);
}

#[test]
fn relink_after_late_definition() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module A;\n  B inst ();\nendmodule\n", "a.v");
    netlist.link();
    assert!(netlist.find_module("A").unwrap().cell("inst").unwrap().resolved.is_none());

    read(&mut netlist, "module B;\nendmodule\n", "b.v");
    netlist.link();
    let resolved = netlist.find_module("A").unwrap().cell("inst").unwrap().resolved;
    assert!(resolved.is_some());

    // linking again changes nothing
    netlist.link();
    assert_eq!(
        netlist.find_module("A").unwrap().cell("inst").unwrap().resolved,
        resolved
    );
    let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(tops, ["A"]);
}

#[test]
fn multiple_modules_per_file() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module A;\n  B inst ();\nendmodule\nmodule B;\nendmodule\n", "ab.v");
    netlist.link();
    assert_eq!(netlist.modules().count(), 2);
    assert!(netlist.find_module("A").unwrap().cell("inst").unwrap().resolved.is_some());
    let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(tops, ["A"]);
}

#[test]
fn connectivity_classifies_drivers_and_loads() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module leaf (o, i);\n  output o;\n  input i;\nendmodule\n", "leaf.v");
    read(
        &mut netlist,
        "module top;\n  wire w;\n  wire v;\n  leaf u0 (.o(w), .i(v));\n  leaf u1 (.o(v), .i(w));\nendmodule\n",
        "top.v",
    );
    netlist.link();

    let top = netlist.find_module("top").unwrap();
    let w = top.net("w").unwrap();
    assert_eq!(w.connections.len(), 2);
    let driver = w.driver.as_ref().unwrap();
    assert_eq!((driver.cell.as_str(), driver.pin.as_str()), ("u0", "o"));
    assert_eq!(w.loads.len(), 1);
    assert_eq!(w.loads[0].cell, "u1");

    let v = top.net("v").unwrap();
    assert_eq!((v.driver.as_ref().unwrap().cell.as_str()), "u1");
}

#[test]
fn multiple_drivers_keep_first_and_warn() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "module leaf (o);\n  output o;\nendmodule\n", "leaf.v");
    read(
        &mut netlist,
        "module top;\n  wire w;\n  leaf u0 (.o(w));\n  leaf u1 (.o(w));\nendmodule\n",
        "top.v",
    );
    netlist.link();

    let w = netlist.find_module("top").unwrap().net("w").unwrap();
    assert_eq!(w.driver.as_ref().unwrap().cell, "u0");
    assert!(netlist
        .diagnostics()
        .iter()
        .any(|d| matches!(d, NetlistDiagnostic::MultipleDrivers { .. })));
}

#[test]
fn per_file_preprocessor_state_is_isolated() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(&mut netlist, "`define NAME alpha\nmodule NAME;\nendmodule\n", "a.v");
    read(&mut netlist, "module NAME;\nendmodule\n", "b.v");
    netlist.link();

    // the macro from a.v does not leak into b.v
    assert!(netlist.find_module("alpha").is_some());
    assert!(netlist.find_module("NAME").is_some());
}

#[test]
fn config_defines_seed_every_file() {
    let config = NetlistConfig {
        defines: vec![("MSB".to_owned(), "7".to_owned())],
        ..NetlistConfig::default()
    };
    let mut netlist = Netlist::new(config);
    read(&mut netlist, "module m;\n  wire [MSB:0] bus;\nendmodule\n", "m.v");
    netlist.link();
    assert_eq!(netlist.find_module("m").unwrap().net("bus").unwrap().width, 8);
}

#[test]
fn fatal_preprocess_error_stops_only_that_file() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    let err = netlist.read_source("`ifdef X\nmodule bad;\nendmodule\n", Utf8Path::new("bad.v"));
    assert!(err.is_err());

    read(&mut netlist, "module good;\nendmodule\n", "good.v");
    netlist.link();
    assert!(netlist.find_module("bad").is_none());
    assert!(netlist.find_module("good").is_some());
}

#[test]
fn ports_imply_nets() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(
        &mut netlist,
        "module m (clk, q);\n  input clk;\n  output [3:0] q;\n  reg [3:0] q;\nendmodule\n",
        "m.v",
    );
    netlist.link();

    let m = netlist.find_module("m").unwrap();
    assert_eq!(m.net("clk").unwrap().net_type, "wire");
    // the explicit reg declaration refines the port-implied net
    assert_eq!(m.net("q").unwrap().net_type, "reg");
    assert_eq!(m.net("q").unwrap().width, 4);
}

#[test]
fn dump_and_verilog_text() {
    let mut netlist = Netlist::new(NetlistConfig::default());
    read(
        &mut netlist,
        "module top (clk, q);\n  input clk;\n  output [3:0] q;\n  wire [3:0] w;\n  sub u0 (.a(clk), .y(q));\nendmodule\n",
        "a.v",
    );
    read(
        &mut netlist,
        "module sub (a, y);\n  input a;\n  output [3:0] y;\nendmodule\n",
        "b.v",
    );
    netlist.link();

    expect![[r#"
        Netlist Dump:
        =============

        Module: top (top) [a.v]
          Ports: 2
            input clk
            output [3:0] q
          Nets: 3
            wire clk
            wire [3:0] q
            wire [3:0] w
          Cells: 1
            u0 (sub)

        Module: sub [b.v]
          Ports: 2
            input a
            output [3:0] y
          Nets: 2
            wire a
            wire [3:0] y
          Cells: 0
    "#]]
    .assert_eq(&netlist.dump());

    expect![[r#"
        module top (
          clk, q
        );
          input clk;
          output [3:0] q;
          wire [3:0] w;
          sub u0 (
            .a(clk),
            .y(q)
          );
        endmodule

        module sub (
          a, y
        );
          input a;
          output [3:0] y;
        endmodule
    "#]]
    .assert_eq(&netlist.verilog_text());
}
