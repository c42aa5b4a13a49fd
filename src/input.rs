//! Invocation requests read by the `run --json` command.

use serde::Deserialize;
use thiserror::Error;

use crate::exec::{ExecError, ExecOutput, Executor};
use crate::shell::command_line;

/// Errors that can occur when parsing an invocation.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A command to execute, either as one line or already split.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Invocation {
    /// `{"line": "ls -la"}`
    Line { line: String },
    /// `{"command": "ls", "args": ["-la"]}`
    Args {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Invocation {
    /// Parse from JSON string.
    pub fn parse(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The invocation as a single command line.
    pub fn command_line(&self) -> String {
        match self {
            Invocation::Line { line } => line.clone(),
            Invocation::Args { command, args } => command_line(command, args),
        }
    }

    /// Run the invocation with `executor`.
    pub fn execute(&self, executor: &dyn Executor) -> Result<ExecOutput, ExecError> {
        match self {
            Invocation::Line { line } => executor.run_line(line),
            Invocation::Args { command, args } => executor.run(command, args),
        }
    }

    /// Run the invocation, failing on a non-zero exit code.
    pub fn execute_checked(&self, executor: &dyn Executor) -> Result<String, ExecError> {
        self.execute(executor)?.into_checked()
    }
}
