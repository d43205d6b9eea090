use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// `NAME[=VALUE]` as accepted by `-D` and `+define+`; a bare name defines
/// the value `1`.
pub fn parse_define(spec: &str) -> (String, String) {
    match spec.split_once('=') {
        Some((name, value)) => (name.to_owned(), value.to_owned()),
        None => (spec.to_owned(), "1".to_owned()),
    }
}

/// Expand a `-f` list file: one bare path per line, blank lines and
/// `#`/`//` comment lines skipped.
pub fn expand_file_list(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file list {path}"))?;
    let mut files = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        files.push(Utf8PathBuf::from(line));
    }
    Ok(files)
}

/// `+define+`/`+incdir+` plusargs mixed into the positional file list.
#[derive(Debug, Default)]
pub struct PlusArgs {
    pub files: Vec<Utf8PathBuf>,
    pub defines: Vec<(String, String)>,
    pub include_dirs: Vec<Utf8PathBuf>,
}

pub fn split_plusargs(args: impl IntoIterator<Item = String>) -> PlusArgs {
    let mut out = PlusArgs::default();
    for arg in args {
        if let Some(rest) = arg.strip_prefix("+define+") {
            out.defines.extend(rest.split('+').filter(|s| !s.is_empty()).map(parse_define));
        } else if let Some(rest) = arg.strip_prefix("+incdir+") {
            out.include_dirs
                .extend(rest.split('+').filter(|s| !s.is_empty()).map(Utf8PathBuf::from));
        } else if arg.starts_with('+') {
            log::debug!("ignoring unsupported plusarg {arg}");
        } else {
            out.files.push(Utf8PathBuf::from(arg));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_specs() {
        assert_eq!(parse_define("DEBUG"), ("DEBUG".to_owned(), "1".to_owned()));
        assert_eq!(parse_define("W=8"), ("W".to_owned(), "8".to_owned()));
        assert_eq!(parse_define("S=a=b"), ("S".to_owned(), "a=b".to_owned()));
    }

    #[test]
    fn plusargs() {
        let args = ["a.v", "+define+FOO+BAR=2", "+incdir+inc", "+notimingchecks", "b.v"];
        let plus = split_plusargs(args.iter().map(|s| s.to_string()));
        assert_eq!(plus.files, ["a.v", "b.v"].map(Utf8PathBuf::from));
        assert_eq!(plus.defines.len(), 2);
        assert_eq!(plus.defines[1], ("BAR".to_owned(), "2".to_owned()));
        assert_eq!(plus.include_dirs, [Utf8PathBuf::from("inc")]);
    }
}
