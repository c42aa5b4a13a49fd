//! Callback-backed executor for tests.

use std::fmt;

use super::{ExecError, ExecOutput, Executor};

/// Executor that hands every command to a callback instead of spawning it.
///
/// Command lines still go through the real tokenizer, so parse failures
/// surface exactly as they would with [`super::LocalExecutor`].
pub struct MockExecutor<F> {
    callback: F,
}

impl<F> MockExecutor<F>
where
    F: Fn(&str, &[String]) -> Result<ExecOutput, ExecError> + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for MockExecutor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockExecutor").finish_non_exhaustive()
    }
}

impl<F> Executor for MockExecutor<F>
where
    F: Fn(&str, &[String]) -> Result<ExecOutput, ExecError> + Send + Sync,
{
    fn run(&self, command: &str, args: &[String]) -> Result<ExecOutput, ExecError> {
        (self.callback)(command, args)
    }
}
