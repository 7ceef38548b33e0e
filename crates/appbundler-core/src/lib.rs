//! Core types and configuration for appbundler.
//!
//! This crate defines the `appbundler.toml` schema ([`AppConfig`]), the
//! supplemental data description ([`DataSpec`]), the scoped working
//! directory guard ([`ScopedDir`]), and shared error types.

pub mod config;
pub mod data;
pub mod error;
pub mod workdir;

pub use config::{AppConfig, BundleConfig, CONFIG_FILE_NAME, InstallConfig, check_path};
pub use data::DataSpec;
pub use error::{Error, Result};
pub use workdir::ScopedDir;
