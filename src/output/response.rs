//! Response formatting for CLI output.

use crate::exec::ExecError;
use crate::shell::ParsedCommand;

/// Exit status when the command line could not be parsed.
pub const PARSE_FAILURE: u8 = 2;
/// Exit status when the program could not be started.
pub const SPAWN_FAILURE: u8 = 127;

/// Format a parsed command line as JSON.
pub fn format_split(parsed: &ParsedCommand) -> String {
    // Strings and a vector of strings always serialize
    serde_json::to_string(parsed).unwrap_or_default()
}

/// Format an error for stderr.
pub fn format_error(error: &ExecError) -> String {
    match error {
        ExecError::NonZeroExit { code, .. } => {
            format!("FAILED: {} (exit code {})", error, code)
        }
        _ => format!("ERROR: {}", error),
    }
}

/// Map a child's exit code onto a process exit status.
///
/// Codes outside `0..=255` (including `-1` for signals) become 1.
pub fn process_exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Exit status to report for an error.
pub fn exit_status(error: &ExecError) -> u8 {
    match error {
        ExecError::Parse(_) => PARSE_FAILURE,
        ExecError::Spawn { .. } => SPAWN_FAILURE,
        ExecError::NonZeroExit { code, .. } => process_exit_status(*code),
    }
}
