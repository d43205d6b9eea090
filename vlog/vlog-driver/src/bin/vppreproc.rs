use std::fs;
use std::io::Write;
use std::process::exit;

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mimalloc::MiMalloc;
use preprocessor::Preprocessor;
use vlog_driver::options::{expand_file_list, parse_define, split_plusargs};
use vlog_driver::{report, DATA_ERROR};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFINE: &str = "define";
const INCDIR: &str = "incdir";
const FILE_LIST: &str = "file-list";
const OUTPUT: &str = "output";
const INPUT: &str = "input";

fn main_command() -> Command {
    Command::new("vppreproc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preprocess Verilog files, expanding `define macros and resolving `include and conditional directives")
        .args([
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
    // One preprocessor for the whole batch: macros defined in an earlier
    // file stay visible in later ones, matching simulator behavior.
    let mut preprocessor = Preprocessor::new();
    for spec in matches.get_many::<String>(DEFINE).into_iter().flatten() {
        let (name, value) = parse_define(spec);
        preprocessor.define(name, value);
    }
    for dir in matches.get_many::<String>(INCDIR).into_iter().flatten() {
        preprocessor.add_include_dir(dir.as_str());
    }

    let positional: Vec<String> =
        matches.get_many::<String>(INPUT).into_iter().flatten().cloned().collect();
    let mut plus = split_plusargs(positional);
    for (name, value) in plus.defines.drain(..) {
        preprocessor.define(name, value);
    }
    for dir in plus.include_dirs.drain(..) {
        preprocessor.add_include_dir(dir);
    }

    let mut files = plus.files;
    for list in matches.get_many::<String>(FILE_LIST).into_iter().flatten() {
        files.extend(expand_file_list(Utf8Path::new(list))?);
    }
    if files.is_empty() {
        bail!("no input files");
    }

    let mut out = String::new();
    let mut failed = false;
    for file in &files {
        let src = match fs::read_to_string(file) {
            Ok(src) => src,
            Err(err) => {
                report::print_error(&anyhow::anyhow!("cannot read {file}: {err}"));
                failed = true;
                continue;
            }
        };
        match preprocessor.process(&src, file) {
            Ok(text) => out.push_str(&text),
            Err(err) => {
                report::print_error(&anyhow::Error::new(err));
                failed = true;
            }
        }
        for diagnostic in preprocessor.take_diagnostics() {
            report::print_warning(&diagnostic.to_string());
        }
    }

    match matches.get_one::<String>(OUTPUT) {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("cannot write {path}"))?;
        }
        None => std::io::stdout().write_all(out.as_bytes())?,
    }

    Ok(if failed { DATA_ERROR } else { 0 })
}
