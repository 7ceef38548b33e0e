use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use appbundler_build::{BundleOutcome, Bundler, FixedAnswer, OverwritePrompt, SupplementalData};
use appbundler_core::{AppConfig, ScopedDir};
use appbundler_pip::PipClient;

/// Command-line overrides for a bundle run.
pub struct BundleOptions {
    pub config: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub zip: bool,
    pub yes: bool,
    pub python: Option<String>,
}

/// Asks on the terminal before an existing build directory is deleted.
struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn confirm_overwrite(&mut self, build_dir: &Path) -> std::io::Result<bool> {
        print!("{} already exists. Overwrite? [y/N] ", build_dir.display());
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(matches!(input.trim(), "y" | "Y" | "yes" | "YES"))
    }
}

/// Build the bundle described by an `appbundler.toml`.
pub async fn bundle(options: BundleOptions) -> anyhow::Result<()> {
    let config = AppConfig::load(&options.config)?;
    let app_dir = config.app_dir().to_path_buf();

    let mut data = Vec::with_capacity(config.data().len());
    for (name, spec) in config.data() {
        let resolved = SupplementalData::resolve(spec.clone())
            .with_context(|| format!("failed to resolve data set '{name}'"))?;
        tracing::info!(
            name = %name,
            locations = resolved.locations().len(),
            "data set resolved"
        );
        data.push(resolved);
    }

    // --output-dir is relative to where the command was run, [bundle].output_dir
    // to the app directory.
    let output_dir = match options.output_dir {
        Some(dir) => Some(std::env::current_dir()?.join(dir)),
        None => config.bundle().output_dir.as_ref().map(|d| app_dir.join(d)),
    };

    let python = options
        .python
        .unwrap_or_else(|| config.install().python.clone());
    let pip = PipClient::new(python).with_extra_args(config.install().extra_args.clone());

    let mut bundler = Bundler::new(&app_dir, pip)
        .package(config.package())
        .supplemental(data)
        .make_zip(options.zip || config.bundle().zip);
    if let Some(dir) = output_dir {
        bundler = bundler.output_dir(dir);
    }

    let _workdir = ScopedDir::enter(&app_dir)?;
    let outcome = if options.yes {
        bundler.bundle(&mut FixedAnswer(true)).await?
    } else {
        bundler.bundle(&mut StdinPrompt).await?
    };

    match outcome {
        BundleOutcome::Built {
            build_dir,
            archive,
            copied_files,
            removed_artifacts,
        } => {
            println!("Bundle created at {}", build_dir.display());
            println!("  {copied_files} data file(s) copied, {removed_artifacts} bytecode artifact(s) removed");
            if let Some(archive) = archive {
                println!("  Archive: {}", archive.display());
            }
        }
        BundleOutcome::Skipped { .. } => println!("Aborted."),
    }

    Ok(())
}
