//! Audit logging for executed commands.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::exec::{ExecError, ExecOutput};

const MAX_COMMAND_LINE: usize = 200;

/// An audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// The command line that was run.
    pub command_line: String,
    /// Whether the command ran and exited with code 0.
    pub success: bool,
    /// Exit code, if the process ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Kind of failure (`parse`, `spawn`, `non_zero_exit`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from a command line and its outcome.
    pub fn new(command_line: &str, result: &Result<ExecOutput, ExecError>) -> Self {
        let (success, exit_code, error_kind, error) = match result {
            Ok(out) => (out.success(), Some(out.code), None, None),
            Err(e) => {
                let exit_code = match e {
                    ExecError::NonZeroExit { code, .. } => Some(*code),
                    _ => None,
                };
                (false, exit_code, Some(e.kind()), Some(e.to_string()))
            }
        };

        Self {
            timestamp: Utc::now(),
            command_line: truncate_string(command_line, MAX_COMMAND_LINE),
            success,
            exit_code,
            error_kind,
            error,
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_len - 3).collect();
        out.push_str("...");
        out
    }
}

/// Audit logger for writing entries to a file.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create an audit log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an audit entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log the outcome of running a command line.
    pub fn log_execution(
        &mut self,
        command_line: &str,
        result: &Result<ExecOutput, ExecError>,
    ) -> std::io::Result<()> {
        let entry = AuditEntry::new(command_line, result);
        self.log(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ParseError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_audit_entry_success() {
        let entry = AuditEntry::new("ls -la", &Ok(ExecOutput::new("", 0)));
        assert!(entry.success);
        assert_eq!(entry.exit_code, Some(0));
        assert!(entry.error_kind.is_none());
        assert_eq!(entry.command_line, "ls -la");
    }

    #[test]
    fn test_audit_entry_exit_code() {
        let entry = AuditEntry::new("false", &Ok(ExecOutput::new("", 1)));
        assert!(!entry.success);
        assert_eq!(entry.exit_code, Some(1));
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_audit_entry_parse_error() {
        let result = Err(ExecError::Parse(ParseError::UnexpectedEndOfLine));
        let entry = AuditEntry::new("ls 'open", &result);
        assert!(!entry.success);
        assert!(entry.exit_code.is_none());
        assert_eq!(entry.error_kind, Some("parse"));
        assert_eq!(
            entry.error.as_deref(),
            Some("unable to parse command line: unexpected end of line")
        );
    }

    #[test]
    fn test_audit_entry_non_zero_exit() {
        let result = Err(ExecError::NonZeroExit {
            code: 7,
            output: String::new(),
        });
        let entry = AuditEntry::new("make", &result);
        assert_eq!(entry.exit_code, Some(7));
        assert_eq!(entry.error_kind, Some("non_zero_exit"));
    }

    #[test]
    fn test_audit_logger() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut logger = AuditLogger::open(temp_file.path()).unwrap();

        logger
            .log_execution("pwd", &Ok(ExecOutput::new("/\n", 0)))
            .unwrap();
        logger
            .log_execution("missing", &Ok(ExecOutput::new("", 2)))
            .unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"command_line\":\"pwd\""));
        assert!(lines[0].contains("\"success\":true"));
        assert!(!lines[0].contains("error"));
        assert!(lines[1].contains("\"exit_code\":2"));
    }

    #[test]
    fn test_truncate_command_line() {
        let long_line = "é".repeat(300);
        let entry = AuditEntry::new(&long_line, &Ok(ExecOutput::new("", 0)));

        assert_eq!(entry.command_line.chars().count(), MAX_COMMAND_LINE);
        assert!(entry.command_line.ends_with("..."));
    }
}
