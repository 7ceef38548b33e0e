use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for `{field}` in {path}: {reason}")]
    InvalidField {
        path: PathBuf,
        field: String,
        reason: &'static str,
    },

    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to resolve path {path}")]
    PathResolve {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Working directory ──
    #[error("failed to read current working directory")]
    CurrentDir { source: std::io::Error },

    #[error("failed to change working directory to {path}")]
    ChangeDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
