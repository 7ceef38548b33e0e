#[derive(Debug, thiserror::Error)]
pub enum PipError {
    #[error("python interpreter '{python}' could not be started")]
    NotFound {
        python: String,
        source: std::io::Error,
    },

    #[error("pip command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("pip output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
