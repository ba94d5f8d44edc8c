//! CLI Exit Code Registry
//!
//! Single source of truth for `bcompare` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | Report has records (only with `compare --strict-exit`)    |
//! | 2    | Usage error (bad arguments, bad flag values)              |
//! | 3    | Structural failure (missing column, no primary file, ...) |
//! | 4    | Validation failure (bad currency/date cell, no identity)  |
//! | 5    | File I/O failure (cannot read input or write output)      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use benefits_io::IoError;
use benefits_recon::{ErrorClass, ReconError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// The comparison ran and found differences.
/// Like `diff(1)`, exit 1 means "files differ". Opt-in via `--strict-exit`.
pub const EXIT_CHANGES: u8 = 1;

/// Usage error - bad arguments, conflicting options.
/// clap exits with the same code for parse failures.
pub const EXIT_USAGE: u8 = 2;

/// The inputs cannot be compared at all.
pub const EXIT_STRUCTURAL: u8 = 3;

/// A cell or row failed validation.
pub const EXIT_VALIDATION: u8 = 4;

/// Reading an input file or writing an output file failed.
pub const EXIT_IO: u8 = 5;

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err.class() {
        ErrorClass::Structural => EXIT_STRUCTURAL,
        ErrorClass::Validation => EXIT_VALIDATION,
    }
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } => EXIT_IO,
        _ => EXIT_STRUCTURAL,
    }
}
