use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::process::exit;

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mimalloc::MiMalloc;
use netlist::{Module, Netlist, NetlistConfig};
use tokens::LanguageStandard;
use vlog_driver::options::{expand_file_list, parse_define, split_plusargs};
use vlog_driver::{report, DATA_ERROR};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CELLS: &str = "cells";
const MODULES: &str = "modules";
const MODULE_FILES: &str = "module-files";
const INSTANCE: &str = "instance";
const MISSING: &str = "missing";
const DUMP: &str = "dump";
const VERILOG: &str = "verilog";
const TOP_MODULE: &str = "top-module";
const LANGUAGE: &str = "language";
const SV: &str = "sv";
const DEFINE: &str = "define";
const INCDIR: &str = "incdir";
const FILE_LIST: &str = "file-list";
const OUTPUT: &str = "output";
const INPUT: &str = "input";

fn main_command() -> Command {
    Command::new("vhier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read Verilog files and display the module hierarchy referenced by them")
        .args([
            flag(CELLS).help("Show the design hierarchy as an indented cell forest"),
            flag(MODULES).help("List all module names"),
            flag(MODULE_FILES).help("List modules with the file each was defined in"),
            flag(INSTANCE).help("Show instance names in the cell forest"),
            Arg::new(MISSING)
                .long(MISSING)
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_value("true")
                .default_missing_value("true")
                .value_parser(clap::value_parser!(bool))
                .value_name("BOOL")
                .help("Report instances whose module definition was not found"),
            flag(DUMP).help("Print the netlist structure dump"),
            flag(VERILOG).help("Print a regenerated Verilog skeleton of the design"),
            Arg::new(TOP_MODULE)
                .long(TOP_MODULE)
                .value_name("MODULE")
                .help("Start the cell forest at MODULE instead of the inferred top modules"),
            Arg::new(LANGUAGE)
                .long(LANGUAGE)
                .value_name("STANDARD")
                .help("Language standard, by IEEE designation (e.g. 1364-2001, 1800-2017)"),
            flag(SV).help("SystemVerilog mode, shorthand for --language 1800-2023"),
            Arg::new(DEFINE)
                .short('D')
                .long(DEFINE)
                .action(ArgAction::Append)
                .value_name("NAME[=VALUE]")
                .help("Define a macro before any file is read"),
            Arg::new(INCDIR)
                .short('I')
                .long(INCDIR)
                .action(ArgAction::Append)
                .value_name("DIR")
                .value_hint(ValueHint::DirPath)
                .help("Add a directory to the `include search path"),
            Arg::new(FILE_LIST)
                .short('f')
                .long(FILE_LIST)
                .action(ArgAction::Append)
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .help("Read additional input paths from a list file"),
            Arg::new(OUTPUT)
                .short('o')
                .long(OUTPUT)
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .help("Write output to FILE instead of stdout"),
            Arg::new(INPUT)
                .action(ArgAction::Append)
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .help("Input files; +define+NAME[=VALUE] and +incdir+DIR are also accepted"),
        ])
        .arg_required_else_help(true)
}

fn flag(name: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue)
}

fn main() {
    report::init_logger();
    let matches = main_command().get_matches();
    match run(matches) {
        Ok(code) => exit(code),
        Err(err) => {
            report::print_error(&err);
            exit(1);
        }
    }
}

fn run(matches: ArgMatches) -> Result<i32> {
    let standard = language_standard(&matches)?;

    let mut defines: Vec<(String, String)> = matches
        .get_many::<String>(DEFINE)
        .into_iter()
        .flatten()
        .map(|spec| parse_define(spec))
        .collect();
    let mut include_dirs: Vec<_> = matches
        .get_many::<String>(INCDIR)
        .into_iter()
        .flatten()
        .map(camino::Utf8PathBuf::from)
        .collect();

    let positional: Vec<String> =
        matches.get_many::<String>(INPUT).into_iter().flatten().cloned().collect();
    let mut plus = split_plusargs(positional);
    defines.append(&mut plus.defines);
    include_dirs.append(&mut plus.include_dirs);

    let mut files = plus.files;
    for list in matches.get_many::<String>(FILE_LIST).into_iter().flatten() {
        files.extend(expand_file_list(Utf8Path::new(list))?);
    }
    if files.is_empty() {
        bail!("no input files");
    }

    let mut netlist = Netlist::new(NetlistConfig { defines, include_dirs, standard });
    let mut failed = false;
    for file in &files {
        if let Err(err) = netlist.read_file(file) {
            report::print_error(&anyhow::Error::new(err));
            failed = true;
        }
    }
    netlist.link();

    for diagnostic in netlist.preprocessor_diagnostics() {
        report::print_warning(&diagnostic.to_string());
    }
    if matches.get_one::<bool>(MISSING).copied().unwrap_or(true) {
        for diagnostic in netlist.diagnostics() {
            report::print_warning(&diagnostic.to_string());
        }
    }

    let out = render(&matches, &netlist)?;
    match matches.get_one::<String>(OUTPUT) {
        Some(path) => fs::write(path, out).with_context(|| format!("cannot write {path}"))?,
        None => std::io::stdout().write_all(out.as_bytes())?,
    }

    Ok(if failed { DATA_ERROR } else { 0 })
}

fn language_standard(matches: &ArgMatches) -> Result<LanguageStandard> {
    if matches.get_flag(SV) {
        return Ok(LanguageStandard::SystemVerilog2023);
    }
    match matches.get_one::<String>(LANGUAGE) {
        Some(designation) => LanguageStandard::from_ieee(designation)
            .ok_or_else(|| anyhow::anyhow!("unknown language standard {designation}")),
        None => Ok(LanguageStandard::default()),
    }
}

fn render(matches: &ArgMatches, netlist: &Netlist) -> Result<String> {
    let show_cells = matches.get_flag(CELLS);
    let show_modules = matches.get_flag(MODULES);
    let show_module_files = matches.get_flag(MODULE_FILES);
    let show_dump = matches.get_flag(DUMP);
    let show_verilog = matches.get_flag(VERILOG);
    // with no view selected, the cell forest is what the user came for
    let default_view = !(show_cells || show_modules || show_module_files || show_dump || show_verilog);

    let mut out = String::new();
    if show_cells || default_view {
        out.push_str("Cell Hierarchy:\n===============\n");
        let roots = roots(matches, netlist)?;
        let show_instance = matches.get_flag(INSTANCE);
        for root in roots {
            let mut path = Vec::new();
            forest(&mut out, netlist, root, 1, show_instance, None, &mut path);
        }
    }
    if show_modules {
        out.push_str("Module Names:\n=============\n");
        for module in netlist.modules() {
            writeln!(out, "  {}", module.name).unwrap();
        }
    }
    if show_module_files {
        out.push_str("Module Files:\n=============\n");
        for module in netlist.modules() {
            writeln!(out, "  {} {}", module.name, module.source_file).unwrap();
        }
    }
    if show_dump {
        out.push_str(&netlist.dump());
    }
    if show_verilog {
        out.push_str(&netlist.verilog_text());
    }
    Ok(out)
}

fn roots<'n>(matches: &ArgMatches, netlist: &'n Netlist) -> Result<Vec<&'n Module>> {
    if let Some(name) = matches.get_one::<String>(TOP_MODULE) {
        let module =
            netlist.find_module(name).ok_or_else(|| anyhow::anyhow!("no such module {name}"))?;
        return Ok(vec![module]);
    }
    Ok(netlist.top_modules())
}

/// Indented instance forest. `path` guards against recursive hierarchies.
fn forest(
    out: &mut String,
    netlist: &Netlist,
    module: &Module,
    depth: usize,
    show_instance: bool,
    instance: Option<&str>,
    path: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    match instance {
        Some(name) if show_instance => {
            writeln!(out, "{indent}{} ({})", name, module.name).unwrap()
        }
        _ => writeln!(out, "{indent}{}", module.name).unwrap(),
    }

    if path.contains(&module.name) {
        writeln!(out, "{indent}  ...").unwrap();
        return;
    }
    path.push(module.name.clone());
    for cell in module.cells.values() {
        if let Some(target) = cell.resolved {
            forest(
                out,
                netlist,
                netlist.module(target),
                depth + 1,
                show_instance,
                Some(&cell.name),
                path,
            );
        }
    }
    path.pop();
}
