use std::path::{Path, PathBuf};

use appbundler_core::check_path;
use appbundler_pip::{InstallError, PipClient, PipExecutor, RealExecutor};

use crate::archive::{ArchiveError, create_archive};
use crate::cleanup::{CleanupError, remove_bytecode};
use crate::fs::{CopyError, copy_tree};
use crate::prompt::OverwritePrompt;
use crate::supplemental::{SupplementalData, SupplementalError};

/// Name of the directory the bundle is assembled in.
pub const BUILD_DIR_NAME: &str = "build";
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const SETUP_FILE: &str = "setup.py";

/// Dependency manifest found in the app directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Manifest {
    /// `requirements.txt`: installs dependencies only, the package source
    /// is copied separately.
    Requirements(PathBuf),
    /// `setup.py`: pip installs the package itself.
    SetupScript(PathBuf),
}

/// Picks the manifest in `app_dir`; `requirements.txt` wins over `setup.py`.
pub fn detect_manifest(app_dir: &Path) -> Result<Manifest, BundleError> {
    let requirements = app_dir.join(REQUIREMENTS_FILE);
    let setup = app_dir.join(SETUP_FILE);
    if requirements.is_file() {
        Ok(Manifest::Requirements(requirements))
    } else if setup.is_file() {
        Ok(Manifest::SetupScript(setup))
    } else {
        Err(BundleError::MissingManifest(app_dir.to_path_buf()))
    }
}

/// Result of [`Bundler::bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    Built {
        build_dir: PathBuf,
        archive: Option<PathBuf>,
        copied_files: usize,
        removed_artifacts: usize,
    },
    /// The build directory existed and overwriting was declined.
    Skipped { build_dir: PathBuf },
}

/// Assembles an app, its dependencies, and supplemental data into a build
/// directory.
pub struct Bundler<E: PipExecutor = RealExecutor> {
    app_dir: PathBuf,
    package: Option<String>,
    build_dir: PathBuf,
    supplemental: Vec<SupplementalData>,
    make_zip: bool,
    pip: PipClient<E>,
}

impl<E: PipExecutor> Bundler<E> {
    /// Bundles `app_dir` into `<app_dir>/build`.
    pub fn new(app_dir: impl Into<PathBuf>, pip: PipClient<E>) -> Self {
        let app_dir = app_dir.into();
        let build_dir = app_dir.join(BUILD_DIR_NAME);
        Self {
            app_dir,
            package: None,
            build_dir,
            supplemental: Vec::new(),
            make_zip: false,
            pip,
        }
    }

    /// Package directory (relative to the app directory) and archive name.
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.package = Some(name.into());
        self
    }

    /// Places the build directory at `<dir>/build` instead.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into().join(BUILD_DIR_NAME);
        self
    }

    pub fn supplemental(mut self, data: Vec<SupplementalData>) -> Self {
        self.supplemental = data;
        self
    }

    pub fn make_zip(mut self, make_zip: bool) -> Self {
        self.make_zip = make_zip;
        self
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// ```text
    /// 1. build dir   ── create, or ask before deleting an existing one
    /// 2. install     ── pip install -t build/ (+ package copy for requirements.txt)
    /// 3. data        ── SupplementalData::copy into build/<target>/
    /// 4. cleanup     ── drop __pycache__ / *.pyc
    /// 5. archive     ── build/<package>.zip (optional)
    /// ```
    #[tracing::instrument(name = "bundle", skip_all, fields(app = %self.app_dir.display()))]
    pub async fn bundle<P: OverwritePrompt>(
        &self,
        prompt: &mut P,
    ) -> Result<BundleOutcome, BundleError> {
        check_path(&self.app_dir)?;
        if self.make_zip && self.package.is_none() {
            return Err(BundleError::MissingPackageName("create an archive"));
        }

        if !self.prepare_build_dir(prompt)? {
            tracing::info!(path = %self.build_dir.display(), "keeping existing build directory");
            return Ok(BundleOutcome::Skipped {
                build_dir: self.build_dir.clone(),
            });
        }

        self.install_dependencies().await?;
        let copied_files = self.copy_supplemental()?;
        let removed_artifacts = self.cleanup()?;
        let archive = if self.make_zip {
            Some(self.archive()?)
        } else {
            None
        };

        Ok(BundleOutcome::Built {
            build_dir: self.build_dir.clone(),
            archive,
            copied_files,
            removed_artifacts,
        })
    }

    /// Returns `false` when an existing build directory must be kept.
    #[tracing::instrument(skip_all)]
    fn prepare_build_dir<P: OverwritePrompt>(&self, prompt: &mut P) -> Result<bool, BundleError> {
        if self.build_dir.exists() {
            tracing::warn!(path = %self.build_dir.display(), "directory already exists");
            let overwrite = prompt
                .confirm_overwrite(&self.build_dir)
                .map_err(|e| BundleError::Prompt { source: e })?;
            if !overwrite {
                return Ok(false);
            }
            tracing::info!(path = %self.build_dir.display(), "deleting old build directory");
            std::fs::remove_dir_all(&self.build_dir).map_err(|e| {
                BundleError::RemoveBuildDir {
                    path: self.build_dir.clone(),
                    source: e,
                }
            })?;
        }

        std::fs::create_dir_all(&self.build_dir).map_err(|e| BundleError::CreateBuildDir {
            path: self.build_dir.clone(),
            source: e,
        })?;
        Ok(true)
    }

    #[tracing::instrument(skip_all)]
    async fn install_dependencies(&self) -> Result<(), BundleError> {
        match detect_manifest(&self.app_dir)? {
            Manifest::Requirements(requirements) => {
                let package = self
                    .package
                    .as_deref()
                    .ok_or(BundleError::MissingPackageName("copy the package source"))?;
                // Fail before the (slow) install if the source tree is missing.
                let source = self.app_dir.join(package);
                check_path(&source)?;

                self.check_pip().await?;
                self.pip
                    .install_requirements(&requirements, &self.build_dir)
                    .await?;

                let files = copy_tree(&source, &self.build_dir.join(package)).map_err(|e| {
                    BundleError::PackageCopy {
                        package: package.to_owned(),
                        source: e,
                    }
                })?;
                tracing::info!(package, files = files.len(), "package source copied");
            }
            Manifest::SetupScript(_) => {
                self.check_pip().await?;
                self.pip
                    .install_project(&self.app_dir, &self.build_dir)
                    .await?;
            }
        }
        Ok(())
    }

    /// Fails before any install if pip cannot be run at all.
    async fn check_pip(&self) -> Result<(), BundleError> {
        let version = self.pip.version().await?;
        tracing::info!(version = %version, "using pip");
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    fn copy_supplemental(&self) -> Result<usize, BundleError> {
        // Data sets rooted above the build directory must not read it back.
        let build_dir = self
            .build_dir
            .canonicalize()
            .map_err(|e| BundleError::ResolveBuildDir {
                path: self.build_dir.clone(),
                source: e,
            })?;

        let mut copied = 0;
        for data in &self.supplemental {
            let destination = build_dir.join(data.target_name());
            let written = data
                .copy_excluding(&destination, &build_dir)
                .map_err(|e| BundleError::Supplemental {
                    destination: destination.clone(),
                    source: e,
                })?;
            copied += written.len();
        }
        Ok(copied)
    }

    #[tracing::instrument(skip_all)]
    fn cleanup(&self) -> Result<usize, BundleError> {
        let report = remove_bytecode(&self.build_dir)?;
        Ok(report.total())
    }

    #[tracing::instrument(skip_all)]
    fn archive(&self) -> Result<PathBuf, BundleError> {
        let package = self
            .package
            .as_deref()
            .ok_or(BundleError::MissingPackageName("create an archive"))?;
        Ok(create_archive(&self.build_dir, package)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error(transparent)]
    Config(#[from] appbundler_core::Error),

    #[error("could not locate requirements.txt or setup.py in {0}")]
    MissingManifest(PathBuf),

    #[error("a package name is required to {0}")]
    MissingPackageName(&'static str),

    #[error("failed to read overwrite confirmation")]
    Prompt { source: std::io::Error },

    #[error("failed to remove existing build directory {path}")]
    RemoveBuildDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create build directory {path}")]
    CreateBuildDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to resolve build directory {path}")]
    ResolveBuildDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("failed to copy package '{package}' into the build directory")]
    PackageCopy { package: String, source: CopyError },

    #[error("failed to copy supplemental data into {destination}")]
    Supplemental {
        destination: PathBuf,
        source: SupplementalError,
    },

    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
