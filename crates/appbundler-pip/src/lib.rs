//! Runs `python -m pip` on behalf of the bundler.
//!
//! [`PipClient`] builds the argument lists; [`PipExecutor`] is the seam
//! where the subprocess is spawned, so tests can substitute a mock.

pub mod client;
pub mod executor;
pub mod pip;

pub use client::{InstallError, PipClient};
pub use executor::{PipExecutor, RealExecutor};
pub use pip::PipError;
