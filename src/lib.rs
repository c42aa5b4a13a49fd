//! Shell-like command line splitting, quoting and execution.
//!
//! [`shell::tokenize`] splits one line into a command and its arguments,
//! honoring single quotes, double quotes and backslash escapes.
//! [`shell::command_line`] is its inverse: it builds the shortest line that
//! tokenizes back to exactly the given values. The [`exec`] module runs the
//! result, either as a real process or through a test double.

pub mod audit;
pub mod config;
pub mod exec;
pub mod input;
pub mod output;
pub mod shell;

pub use config::Config;
pub use exec::{ExecError, ExecOutput, Executor, LocalExecutor, MockExecutor};
pub use input::Invocation;
pub use shell::{ParseError, ParsedCommand, command_line, quote, tokenize};
