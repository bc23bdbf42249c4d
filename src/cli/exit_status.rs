use std::process::ExitCode;

use super::commands::CommandResult;

/// Process exit status of `autoi18n`.
///
/// Files that fail to parse or whose keys conflict do not abort the run; they turn
/// an otherwise successful run into `Failure`. `Error` is reserved for runs that
/// could not start or finish (bad config, I/O).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
    Error = 2,
}

impl ExitStatus {
    pub fn of(result: &CommandResult) -> Self {
        if result.failures.is_empty() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}
