use std::process::ExitCode;

/// Exit status for CLI commands, following common conventions for checker
/// tools.
///
/// - `Success` (0): Command completed, no error-level diagnostics
/// - `Failure` (1): Command completed but found errors
/// - `Error` (2): Command failed outright (bad config, I/O failure, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
