use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub fn init_logger() {
    let env = env_logger::Env::default().filter("VLOG_LOG").write_style("VLOG_LOG_STYLE");
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Off)
        .parse_env(env)
        .init();
}

pub fn print_error(err: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for cause in err.chain() {
        prefixed(&mut stderr, "error", Color::Red);
        writeln!(&mut stderr, " {cause}").unwrap();
    }
}

pub fn print_warning(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    prefixed(&mut stderr, "warning", Color::Yellow);
    writeln!(&mut stderr, " {message}").unwrap();
}

fn prefixed(stderr: &mut StandardStream, label: &str, color: Color) {
    stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true)).unwrap();
    write!(stderr, "{label}").unwrap();
    stderr.set_color(ColorSpec::new().set_bold(true)).unwrap();
    write!(stderr, ":").unwrap();
    stderr.set_color(&ColorSpec::new()).unwrap();
}
