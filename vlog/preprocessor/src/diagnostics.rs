use std::fmt;

use camino::Utf8PathBuf;

pub type Diagnostics = Vec<PreprocessorDiagnostic>;

/// Recoverable conditions raised while preprocessing. Each one drops or
/// skips the offending line and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessorDiagnostic {
    MalformedDirective { directive: &'static str, file: Utf8PathBuf, line: u32 },
    UnresolvedInclude { target: String, file: Utf8PathBuf, line: u32 },
    CyclicInclude { target: Utf8PathBuf, file: Utf8PathBuf, line: u32 },
    MisplacedElsif { file: Utf8PathBuf, line: u32 },
    ElsifAfterElse { file: Utf8PathBuf, line: u32 },
    MisplacedElse { file: Utf8PathBuf, line: u32 },
    DuplicateElse { file: Utf8PathBuf, line: u32 },
    MisplacedEndif { file: Utf8PathBuf, line: u32 },
}

impl fmt::Display for PreprocessorDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessorDiagnostic::MalformedDirective { directive, file, line } => {
                write!(f, "{file}:{line}: malformed `{directive} directive")
            }
            PreprocessorDiagnostic::UnresolvedInclude { target, file, line } => {
                write!(f, "{file}:{line}: include file not found: {target}")
            }
            PreprocessorDiagnostic::CyclicInclude { target, file, line } => {
                write!(f, "{file}:{line}: cyclic include of {target}")
            }
            PreprocessorDiagnostic::MisplacedElsif { file, line } => {
                write!(f, "{file}:{line}: `elsif without matching `ifdef/`ifndef")
            }
            PreprocessorDiagnostic::ElsifAfterElse { file, line } => {
                write!(f, "{file}:{line}: `elsif after `else")
            }
            PreprocessorDiagnostic::MisplacedElse { file, line } => {
                write!(f, "{file}:{line}: `else without matching `ifdef/`ifndef")
            }
            PreprocessorDiagnostic::DuplicateElse { file, line } => {
                write!(f, "{file}:{line}: duplicate `else in conditional block")
            }
            PreprocessorDiagnostic::MisplacedEndif { file, line } => {
                write!(f, "{file}:{line}: `endif without matching `ifdef/`ifndef")
            }
        }
    }
}

/// Fatal preprocessing failure for one top-level file.
#[derive(Debug)]
pub enum PreprocessError {
    /// The conditional stack was not empty at end-of-file.
    UnbalancedConditional { file: Utf8PathBuf, open: usize },
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessError::UnbalancedConditional { file, open } => {
                write!(f, "{file}: {open} unterminated `ifdef/`ifndef block(s) at end of file")
            }
        }
    }
}

impl std::error::Error for PreprocessError {}
