//! Synchronous invocation of external simulation programs.
//!
//! The program is run to completion on the calling thread. There is no
//! timeout, cancellation or retry: a failed run is reported to the caller
//! immediately and is unrecoverable for that call.

use crate::error::ToolError;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// A configured external program (e.g. `madx`, `elegant`).
#[derive(Clone, Debug)]
pub struct ExternalTool {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ExternalTool {
    /// Create a runner for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append a command-line argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run in `dir` instead of the current directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program and wait for it.
    ///
    /// Standard output is discarded; standard error is inherited.
    ///
    /// # Errors
    ///
    /// [`ToolError::Spawn`] if the process cannot be started,
    /// [`ToolError::Failed`] on a non-zero exit status.
    pub fn run(&self) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdout(Stdio::null());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        debug!(program = %self.program, args = ?self.args, "running external tool");
        let status = cmd.status().map_err(|e| ToolError::Spawn {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;
        if status.success() {
            Ok(())
        } else {
            warn!(program = %self.program, code = ?status.code(), "external tool failed");
            Err(ToolError::Failed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn success_is_ok() {
        assert!(ExternalTool::new("true").run().is_ok());
    }

    #[test]
    fn non_zero_exit_propagates() {
        assert_eq!(
            ExternalTool::new("false").run(),
            Err(ToolError::Failed {
                program: "false".into(),
                code: Some(1)
            })
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        assert!(matches!(
            ExternalTool::new("accring-no-such-program").run(),
            Err(ToolError::Spawn { .. })
        ));
    }
}
