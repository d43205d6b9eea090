//! Shared plumbing for the `vppreproc` and `vhier` command line tools:
//! option/file-list processing and diagnostic reporting. The core crates
//! accept plain configuration values; everything argument-shaped lives here.

pub mod options;
pub mod report;

/// Exit code for inputs that failed to process (sysexits EX_DATAERR).
pub const DATA_ERROR: i32 = 65;
