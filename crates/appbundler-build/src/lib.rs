//! Supplemental data resolution, bytecode cleanup, archiving, and the
//! bundle pipeline for appbundler.
//!
//! # Bundle pipeline
//!
//! ```text
//! appbundler bundle
//!   1. Build dir    ── <app>/build (prompt before deleting an existing one)
//!   2. Install      ── pip install -r requirements.txt -t build/  + copy <package>/
//!                      or pip install <app> -t build/             (setup.py)
//!   3. Data         ── SupplementalData::copy → build/<target>/
//!   4. Cleanup      ── __pycache__/, *.pyc, *.pyo removed
//!   5. Archive      ── build/<package>.zip (optional)
//! ```
//!
//! # Supplemental data
//!
//! A [`SupplementalData`] is resolved eagerly from a
//! [`DataSpec`](appbundler_core::DataSpec): the set of files and directories
//! it will copy is fixed at construction. See [`supplemental`] for the
//! selection and placement rules.

pub mod archive;
pub mod bundler;
pub mod cleanup;
pub mod fs;
pub mod prompt;
pub mod supplemental;

pub use archive::{ArchiveError, create_archive};
pub use bundler::{BundleError, BundleOutcome, Bundler, Manifest, detect_manifest};
pub use cleanup::{CleanupError, CleanupReport, remove_bytecode};
pub use prompt::{FixedAnswer, OverwritePrompt};
pub use supplemental::{SupplementalData, SupplementalError};
