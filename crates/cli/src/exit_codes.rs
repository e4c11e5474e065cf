//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (unspecified)                     |
//! | 2    | CLI usage error (bad args, unreadable config)   |
//! | 3    | Pipeline config failed to parse or validate     |
//! | 4    | A source file could not be read                 |
//! | 5    | Malformed record under `on_malformed = "abort"` |
//! | 6    | An output projection could not be written       |

use ossror_io::SourceError;
use ossror_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing config file.
pub const EXIT_USAGE: u8 = 2;

/// Config parse error or validation error.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Source file missing, unreadable, or missing a required column.
pub const EXIT_SOURCE_LOAD: u8 = 4;

/// A record broke the field contract and the policy is `abort`.
pub const EXIT_MALFORMED_RECORD: u8 = 5;

/// CSV or JSON output could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 6;

/// Map a source error to its exit code.
pub fn source_exit_code(err: &SourceError) -> u8 {
    match err {
        SourceError::Record { .. } => EXIT_MALFORMED_RECORD,
        SourceError::Io { .. }
        | SourceError::Csv { .. }
        | SourceError::Json { .. }
        | SourceError::MissingColumn { .. } => EXIT_SOURCE_LOAD,
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MalformedRecord { .. } => EXIT_MALFORMED_RECORD,
    }
}
