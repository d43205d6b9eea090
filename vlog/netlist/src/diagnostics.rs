use std::fmt;
use std::io;

use camino::Utf8PathBuf;
use preprocessor::PreprocessError;

/// Fatal failure while reading one input file. The batch over the remaining
/// files continues.
#[derive(Debug)]
pub enum NetlistError {
    FileRead { path: Utf8PathBuf, source: io::Error },
    Preprocess(PreprocessError),
}

impl fmt::Display for NetlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetlistError::FileRead { path, source } => {
                write!(f, "cannot read {path}: {source}")
            }
            NetlistError::Preprocess(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for NetlistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetlistError::FileRead { source, .. } => Some(source),
            NetlistError::Preprocess(err) => Some(err),
        }
    }
}

impl From<PreprocessError> for NetlistError {
    fn from(err: PreprocessError) -> NetlistError {
        NetlistError::Preprocess(err)
    }
}

/// Recoverable conditions found while linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetlistDiagnostic {
    UnresolvedModule { module: String, cell: String, referenced: String },
    MultipleDrivers { module: String, net: String, pin: PinLocation },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinLocation {
    pub cell: String,
    pub pin: String,
}

impl fmt::Display for NetlistDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetlistDiagnostic::UnresolvedModule { module, cell, referenced } => {
                write!(f, "module {referenced} not found for cell {cell} in {module}")
            }
            NetlistDiagnostic::MultipleDrivers { module, net, pin } => {
                write!(
                    f,
                    "net {net} in {module} has multiple drivers; ignoring {}.{}",
                    pin.cell, pin.pin
                )
            }
        }
    }
}
