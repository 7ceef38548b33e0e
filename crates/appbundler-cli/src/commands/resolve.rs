use std::path::{Path, PathBuf};

use appbundler_build::SupplementalData;
use appbundler_core::AppConfig;
use serde::Serialize;

#[derive(Serialize)]
struct ResolvedSet {
    name: String,
    target: String,
    directory: PathBuf,
    pattern: Option<String>,
    recursive: bool,
    flatten: bool,
    locations: Vec<PathBuf>,
}

/// Print the files and directories each configured data set selects.
pub fn resolve(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;
    let app_dir = config.app_dir();

    let mut sets = Vec::with_capacity(config.data().len());
    for (name, spec) in config.data() {
        let data = SupplementalData::resolve(spec.clone())?;
        sets.push(ResolvedSet {
            name: name.clone(),
            target: data.target_name(),
            directory: relative_to(data.directory(), app_dir),
            pattern: data.pattern().map(str::to_owned),
            recursive: data.is_recursive(),
            flatten: data.is_flatten(),
            locations: data
                .locations()
                .iter()
                .map(|l| relative_to(l, app_dir))
                .collect(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }

    if sets.is_empty() {
        println!("No data sets configured.");
        return Ok(());
    }
    for set in &sets {
        let mut mode = Vec::new();
        if let Some(pattern) = &set.pattern {
            mode.push(format!("pattern {pattern}"));
        }
        if set.recursive {
            mode.push("recursive".to_owned());
        }
        if set.flatten {
            mode.push("flatten".to_owned());
        }
        let mode = if mode.is_empty() {
            String::new()
        } else {
            format!(" ({})", mode.join(", "))
        };

        println!("{} -> build/{}/{mode}", set.name, set.target);
        for location in &set.locations {
            println!("  {}", location.display());
        }
    }

    Ok(())
}

/// Paths outside `root` are returned unchanged.
fn relative_to(path: &Path, root: &Path) -> PathBuf {
    if path.starts_with(root) {
        path.components().skip(root.components().count()).collect()
    } else {
        path.to_path_buf()
    }
}
