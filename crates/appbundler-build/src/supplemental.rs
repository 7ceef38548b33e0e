//! Resolution and copying of supplemental data sets.
//!
//! # Resolution
//!
//! ```text
//! candidate roots = sub_directories (joined to base) | [base]
//! pattern = None  → locations = roots
//! pattern = Some  → locations = matches below each root
//!                    non-recursive: relative path matches the pattern,
//!                                   depth ≤ number of pattern components
//!                    recursive:     relative path matches `**/<pattern>`
//! ```
//!
//! Matches are visited in file-name order and deduplicated, so the result is
//! deterministic: root order first, then walk order. A location inside an
//! already selected directory is dropped, since the directory is copied
//! whole.
//!
//! # Placement
//!
//! Without `flatten`, a file keeps its path relative to the base directory.
//! With `flatten`, every file lands directly in the destination and later
//! files overwrite earlier ones with the same name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use appbundler_core::DataSpec;
use globset::{GlobBuilder, GlobMatcher};

use crate::fs::{CopyError, copy_file};

/// A [`DataSpec`] checked against the filesystem, with its locations
/// resolved at construction.
#[derive(Debug, Clone)]
pub struct SupplementalData {
    spec: DataSpec,
    locations: Vec<PathBuf>,
}

impl SupplementalData {
    /// Validates `spec` and resolves its locations.
    ///
    /// # Errors
    ///
    /// - [`SupplementalError::DirectoryNotFound`] if the base directory or a sub-directory is missing
    /// - [`SupplementalError::NotADirectory`] if the base is a file
    /// - [`SupplementalError::InvalidPattern`] if the glob does not compile
    /// - [`SupplementalError::Walk`] if a candidate root cannot be traversed
    pub fn resolve(spec: DataSpec) -> Result<Self, SupplementalError> {
        let base = &spec.base_directory;
        if !base.exists() {
            return Err(SupplementalError::DirectoryNotFound(base.clone()));
        }
        if !base.is_dir() {
            return Err(SupplementalError::NotADirectory(base.clone()));
        }

        let roots = candidate_roots(base, spec.sub_directories.as_deref())?;
        let found = match spec.pattern.as_deref() {
            None => roots,
            Some(pattern) => {
                let matcher = PatternMatcher::new(pattern, spec.recursive)?;
                let mut found = Vec::new();
                for root in &roots {
                    found.extend(matcher.search(root)?);
                }
                found
            }
        };

        let mut seen = HashSet::new();
        let unique: Vec<PathBuf> = found
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        // A selected directory is copied whole; drop anything inside it.
        let dirs: Vec<PathBuf> = unique.iter().filter(|p| p.is_dir()).cloned().collect();
        let locations: Vec<PathBuf> = unique
            .into_iter()
            .filter(|p| !dirs.iter().any(|d| p != d && p.starts_with(d)))
            .collect();

        tracing::debug!(
            base = %base.display(),
            pattern = spec.pattern.as_deref().unwrap_or(""),
            recursive = spec.recursive,
            locations = locations.len(),
            "supplemental data resolved"
        );

        Ok(Self { spec, locations })
    }

    pub fn directory(&self) -> &Path {
        &self.spec.base_directory
    }

    pub fn sub_directories(&self) -> Option<&[String]> {
        self.spec.sub_directories.as_deref()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.spec.pattern.as_deref()
    }

    pub fn is_recursive(&self) -> bool {
        self.spec.recursive
    }

    pub fn is_flatten(&self) -> bool {
        self.spec.flatten
    }

    /// Directory under the build directory that receives this data set.
    pub fn target_name(&self) -> String {
        self.spec.target_name()
    }

    /// Resolved files and directories, in copy order.
    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Copies every resolved location into `destination`.
    ///
    /// Returns the written file paths in copy order. A path appears more
    /// than once if a flattened copy overwrote it. When `destination` lies
    /// inside the base directory it is not copied into itself.
    pub fn copy(&self, destination: &Path) -> Result<Vec<PathBuf>, SupplementalError> {
        self.copy_excluding(destination, destination)
    }

    /// Like [`copy`](Self::copy), but nothing at or below `exclude` is read.
    pub fn copy_excluding(
        &self,
        destination: &Path,
        exclude: &Path,
    ) -> Result<Vec<PathBuf>, SupplementalError> {
        let mut written = Vec::new();
        let mut seen = HashSet::new();

        for location in &self.locations {
            if location.starts_with(exclude) {
                tracing::debug!(path = %location.display(), "skipping excluded location");
                continue;
            }
            if location.is_dir() {
                for entry in walkdir::WalkDir::new(location)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| !e.path().starts_with(exclude))
                {
                    let entry = entry.map_err(|e| SupplementalError::Walk {
                        path: location.clone(),
                        source: e,
                    })?;
                    if entry.file_type().is_dir() {
                        if !self.spec.flatten {
                            let dir = self.mirrored(entry.path(), destination)?;
                            std::fs::create_dir_all(&dir).map_err(|e| {
                                CopyError::CreateDir {
                                    path: dir.clone(),
                                    source: e,
                                }
                            })?;
                        }
                        continue;
                    }
                    self.copy_one(entry.path(), destination, &mut seen, &mut written)?;
                }
            } else {
                self.copy_one(location, destination, &mut seen, &mut written)?;
            }
        }

        tracing::info!(
            base = %self.spec.base_directory.display(),
            destination = %destination.display(),
            files = written.len(),
            "supplemental data copied"
        );
        Ok(written)
    }

    fn copy_one(
        &self,
        src: &Path,
        destination: &Path,
        seen: &mut HashSet<PathBuf>,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), SupplementalError> {
        let dst = if self.spec.flatten {
            let name = src
                .file_name()
                .ok_or_else(|| SupplementalError::NoFileName(src.to_path_buf()))?;
            destination.join(name)
        } else {
            self.mirrored(src, destination)?
        };

        if !seen.insert(dst.clone()) {
            tracing::warn!(
                path = %dst.display(),
                source = %src.display(),
                "file overwrites one copied earlier"
            );
        }

        copy_file(src, &dst)?;
        written.push(dst);
        Ok(())
    }

    fn mirrored(&self, src: &Path, destination: &Path) -> Result<PathBuf, SupplementalError> {
        let rel = src
            .strip_prefix(&self.spec.base_directory)
            .map_err(|_| CopyError::OutsideRoot {
                path: src.to_path_buf(),
                root: self.spec.base_directory.clone(),
            })?;
        Ok(destination.join(rel))
    }
}

/// Strips leading separators; `""` and `"."` denote the base itself.
pub(crate) fn normalize_sub_directory(sub: &str) -> &str {
    let trimmed = sub.trim_start_matches(['/', '\\']);
    if trimmed == "." { "" } else { trimmed }
}

fn candidate_roots(
    base: &Path,
    sub_directories: Option<&[String]>,
) -> Result<Vec<PathBuf>, SupplementalError> {
    let Some(subs) = sub_directories else {
        return Ok(vec![base.to_path_buf()]);
    };

    subs.iter()
        .map(|sub| {
            let rel = normalize_sub_directory(sub);
            let root = if rel.is_empty() {
                base.to_path_buf()
            } else {
                base.join(rel)
            };
            if root.exists() {
                Ok(root)
            } else {
                Err(SupplementalError::DirectoryNotFound(root))
            }
        })
        .collect()
}

struct PatternMatcher {
    matcher: GlobMatcher,
    max_depth: Option<usize>,
}

impl PatternMatcher {
    fn new(pattern: &str, recursive: bool) -> Result<Self, SupplementalError> {
        let trimmed = pattern.trim_start_matches('/');
        let unbounded = recursive || trimmed.contains("**");
        let effective = if recursive && !trimmed.starts_with("**") {
            format!("**/{trimmed}")
        } else {
            trimmed.to_owned()
        };

        let matcher = GlobBuilder::new(&effective)
            .literal_separator(true)
            .build()
            .map_err(|e| SupplementalError::InvalidPattern {
                pattern: pattern.to_owned(),
                source: e,
            })?
            .compile_matcher();

        let max_depth = if unbounded {
            None
        } else {
            Some(trimmed.split('/').filter(|c| !c.is_empty()).count().max(1))
        };

        Ok(Self { matcher, max_depth })
    }

    fn search(&self, root: &Path) -> Result<Vec<PathBuf>, SupplementalError> {
        let mut walker = walkdir::WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut matches = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| SupplementalError::Walk {
                path: root.to_path_buf(),
                source: e,
            })?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| CopyError::OutsideRoot {
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                })?;
            if self.matcher.is_match(rel) {
                matches.push(entry.into_path());
            }
        }
        Ok(matches)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SupplementalError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("data base is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("cannot flatten {0}: path has no file name")]
    NoFileName(PathBuf),

    #[error(transparent)]
    Copy(#[from] CopyError),
}
