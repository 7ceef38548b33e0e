use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DataSpec;

/// Conventional config file name, looked up in the app directory.
pub const CONFIG_FILE_NAME: &str = "appbundler.toml";

/// Loaded and verified `appbundler.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    file: PathBuf,
    package: String,
    data: BTreeMap<String, DataSpec>,
    install: InstallConfig,
    bundle: BundleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Interpreter used to run `-m pip`
    #[serde(default = "default_python")]
    pub python: String,
    /// Extra arguments appended to every `pip install`
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Directory that receives `build/`. Defaults to the app directory.
    pub output_dir: Option<PathBuf>,
    /// Produce `<package>.zip` inside the build directory
    #[serde(default)]
    pub zip: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    package: String,
    #[serde(default)]
    data: BTreeMap<String, DataEntry>,
    #[serde(default)]
    install: InstallConfig,
    #[serde(default)]
    bundle: BundleConfig,
}

/// A `[data]` entry: either a bare path or a table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataEntry {
    Path(PathBuf),
    Detailed(DetailedEntry),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedEntry {
    path: PathBuf,
    sub_directories: Option<Vec<String>>,
    pattern: Option<String>,
    #[serde(default)]
    recursive: bool,
    #[serde(default)]
    flatten: bool,
}

impl AppConfig {
    /// Load and verify a config file.
    ///
    /// Relative data paths are resolved against the directory containing
    /// the config file, and every one of them must exist.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigLoad`](crate::Error::ConfigLoad) if the file cannot be read
    /// - [`Error::ConfigParse`](crate::Error::ConfigParse) if it is not valid TOML or misses `package`
    /// - [`Error::InvalidField`](crate::Error::InvalidField) if `package` is blank
    /// - [`Error::PathNotFound`](crate::Error::PathNotFound) if a data path does not exist
    /// - [`Error::NotADirectory`](crate::Error::NotADirectory) if a data path is a file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = path
            .canonicalize()
            .map_err(|e| crate::Error::PathResolve {
                path: path.to_path_buf(),
                source: e,
            })?;

        let package = raw.package.trim().to_owned();
        if package.is_empty() {
            return Err(crate::Error::InvalidField {
                path: file,
                field: "package".to_owned(),
                reason: "must not be empty",
            });
        }

        let app_dir = file.parent().unwrap_or(Path::new("/")).to_path_buf();
        let mut data = BTreeMap::new();
        for (name, entry) in raw.data {
            let spec = entry.into_spec(&app_dir, &name)?;
            tracing::debug!(
                name = %name,
                path = %spec.base_directory.display(),
                "data set configured"
            );
            data.insert(name, spec);
        }

        Ok(Self {
            file,
            package,
            data,
            install: raw.install,
            bundle: raw.bundle,
        })
    }

    /// Canonical path of the loaded config file.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Directory containing the config file.
    pub fn app_dir(&self) -> &Path {
        self.file.parent().unwrap_or(Path::new("/"))
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Supplemental data sets keyed by name, sorted.
    pub fn data(&self) -> &BTreeMap<String, DataSpec> {
        &self.data
    }

    pub fn install(&self) -> &InstallConfig {
        &self.install
    }

    pub fn bundle(&self) -> &BundleConfig {
        &self.bundle
    }
}

impl DataEntry {
    fn into_spec(self, app_dir: &Path, name: &str) -> crate::Result<DataSpec> {
        let (path, detail) = match self {
            Self::Path(path) => (path, None),
            Self::Detailed(d) => (d.path.clone(), Some(d)),
        };

        let base = resolve_existing(app_dir, &path)?;
        if !base.is_dir() {
            tracing::error!(data_set = name, path = %base.display(), "data path is not a directory");
            return Err(crate::Error::NotADirectory(base));
        }
        let mut spec = DataSpec::new(base).target(name);
        if let Some(d) = detail {
            spec.sub_directories = d.sub_directories;
            spec.pattern = d.pattern;
            spec.recursive = d.recursive;
            spec.flatten = d.flatten;
        }
        Ok(spec)
    }
}

fn resolve_existing(app_dir: &Path, path: &Path) -> crate::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        app_dir.join(path)
    };
    check_path(&joined)?;
    joined
        .canonicalize()
        .map_err(|e| crate::Error::PathResolve {
            path: joined.clone(),
            source: e,
        })
}

/// Verifies that `path` exists.
pub fn check_path(path: &Path) -> crate::Result<()> {
    if path.exists() {
        Ok(())
    } else {
        tracing::error!(path = %path.display(), "path does not exist");
        Err(crate::Error::PathNotFound(path.to_path_buf()))
    }
}

fn default_python() -> String {
    "python3".to_owned()
}
