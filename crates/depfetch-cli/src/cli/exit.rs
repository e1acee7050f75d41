//! Process exit codes. Usage errors exit with 2 from clap itself.

use depfetch_core::ConfigError;

pub const SUCCESS: i32 = 0;
pub const RUNTIME_ERROR: i32 = 1;
pub const INPUT_MISSING: i32 = 3;
pub const NO_MATCHES: i32 = 4;

/// How a command that did not error finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// The scanned document had no line containing a keyword.
    NoMatches,
}

impl RunStatus {
    pub fn code(self) -> i32 {
        match self {
            RunStatus::Success => SUCCESS,
            RunStatus::NoMatches => NO_MATCHES,
        }
    }
}

pub fn error_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::MissingInput | ConfigError::InputNotFound(_)) => INPUT_MISSING,
        _ => RUNTIME_ERROR,
    }
}
