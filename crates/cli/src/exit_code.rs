//! Process exit codes
//!
//! Scripts wrapping cold2warm can tell a cancelled run from a failed one.

/// Exit status of the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// Invalid arguments or configuration
    UsageError = 2,
    NetworkError = 3,
    AuthError = 4,
    NotFound = 5,
    /// Run cancelled by SIGINT or SIGTERM
    Interrupted = 130,
}

impl ExitCode {
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ExitCode::Success),
            1 => Some(ExitCode::GeneralError),
            2 => Some(ExitCode::UsageError),
            3 => Some(ExitCode::NetworkError),
            4 => Some(ExitCode::AuthError),
            5 => Some(ExitCode::NotFound),
            130 => Some(ExitCode::Interrupted),
            _ => None,
        }
    }

    pub fn from_error(error: &cw_core::Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(ExitCode::GeneralError)
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}
