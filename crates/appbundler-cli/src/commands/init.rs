use std::path::Path;

use appbundler_core::CONFIG_FILE_NAME;

fn template(package: &str) -> String {
    format!(
        r#"# Package directory inside the app directory; also names <package>.zip
package = "{package}"

[data]
# Short form: copy a whole directory into build/<name>/
# assets = "assets"

# Long form
# [data.schemas]
# path = "data"
# sub_directories = ["sub"]
# pattern = "*.json"
# recursive = true
# flatten = false

[install]
# python = "python3"
# extra_args = ["--no-cache-dir"]

[bundle]
# output_dir = "dist"
# zip = true
"#
    )
}

/// Write an `appbundler.toml` template into the current directory.
pub fn init_project(package: Option<&str>) -> anyhow::Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists");
    }

    let package = match package {
        Some(name) => name.to_owned(),
        None => {
            let cwd = std::env::current_dir()?;
            cwd.file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .ok_or_else(|| {
                    anyhow::anyhow!("cannot derive a package name from {}; pass --package", cwd.display())
                })?
        }
    };

    std::fs::write(path, template(&package))?;
    println!("Created {CONFIG_FILE_NAME}");
    println!();
    println!("Next steps:");
    println!("  1. Add data sets under [data]");
    println!("  2. appbundler resolve     # check what will be copied");
    println!("  3. appbundler bundle");

    Ok(())
}
