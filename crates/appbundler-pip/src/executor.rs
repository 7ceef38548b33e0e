use crate::pip::PipError;

/// Abstraction over pip execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
/// `args` are the arguments that follow `-m pip`.
#[allow(async_fn_in_trait)]
pub trait PipExecutor: Send + Sync {
    /// Execute a pip command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, PipError>;

    /// Execute a pip command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), PipError>;
}

/// Runs `<python> -m pip` as a child process.
///
/// Waits for the child without a timeout.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    python: String,
}

impl RealExecutor {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.python);
        cmd.args(["-m", "pip"]).args(args);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> PipError {
        PipError::NotFound {
            python: self.python.clone(),
            source,
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl PipExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, PipError> {
        use std::process::Stdio;

        tracing::debug!(python = %self.python, ?args, "running pip");
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| PipError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(PipError::CommandFailed {
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), PipError> {
        use std::process::Stdio;

        tracing::debug!(python = %self.python, ?args, "running pip (streaming)");
        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(PipError::CommandFailed {
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }
}
