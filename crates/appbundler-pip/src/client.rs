use crate::executor::{PipExecutor, RealExecutor};
use crate::pip::PipError;
use std::path::Path;

/// pip operations client, parameterized over the executor for testability.
pub struct PipClient<E: PipExecutor = RealExecutor> {
    executor: E,
    extra_args: Vec<String>,
}

impl PipClient<RealExecutor> {
    pub fn new(python: impl Into<String>) -> Self {
        Self::with_executor(RealExecutor::new(python))
    }
}

impl Default for PipClient<RealExecutor> {
    fn default() -> Self {
        Self::with_executor(RealExecutor::default())
    }
}

impl<E: PipExecutor> PipClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor,
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended to every `pip install` (e.g. `--no-cache-dir`).
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// `pip --version`, trimmed.
    pub async fn version(&self) -> Result<String, InstallError> {
        self.executor
            .exec(&args(["--version"]))
            .await
            .map(|out| out.trim().to_owned())
            .map_err(|e| InstallError::Unavailable { source: e })
    }

    /// `pip install -r <requirements> -t <target>`
    pub async fn install_requirements(
        &self,
        requirements: &Path,
        target: &Path,
    ) -> Result<(), InstallError> {
        let requirements = path_arg(requirements)?;
        let target = path_arg(target)?;
        self.install(args(["install", "-r", requirements, "-t", target]))
            .await
    }

    /// `pip install <project_dir> -t <target>`
    pub async fn install_project(
        &self,
        project_dir: &Path,
        target: &Path,
    ) -> Result<(), InstallError> {
        let project_dir = path_arg(project_dir)?;
        let target = path_arg(target)?;
        self.install(args(["install", project_dir, "-t", target]))
            .await
    }

    async fn install(&self, mut install_args: Vec<String>) -> Result<(), InstallError> {
        install_args.extend(self.extra_args.iter().cloned());
        tracing::info!(args = ?install_args, "installing dependencies");
        self.executor
            .exec_streaming(&install_args)
            .await
            .map_err(|e| InstallError::Install { source: e })
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

fn path_arg(path: &Path) -> Result<&str, InstallError> {
    path.to_str()
        .ok_or_else(|| InstallError::InvalidPath(path.to_path_buf()))
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("pip is not available")]
    Unavailable { source: PipError },

    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("dependency installation failed")]
    Install { source: PipError },
}
