mod commands;

use std::path::PathBuf;

use appbundler_core::CONFIG_FILE_NAME;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(
    name = "appbundler",
    about = "Bundle Python apps with their dependencies and supplemental data"
)]
#[command(version)]
struct Cli {
    /// Log debug details (overrides RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install dependencies and assemble the build directory
    Bundle {
        /// Path to the config file; its directory is the app directory
        #[arg(long, short = 'c', default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
        /// Place build/ under this directory instead of the app directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Also write <package>.zip into the build directory
        #[arg(long)]
        zip: bool,
        /// Overwrite an existing build directory without asking
        #[arg(long, short = 'y')]
        yes: bool,
        /// Python interpreter used to run pip
        #[arg(long, env = "APPBUNDLER_PYTHON")]
        python: Option<String>,
    },
    /// Show which files each data set would copy
    Resolve {
        /// Path to the config file
        #[arg(long, short = 'c', default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write an appbundler.toml template into the current directory
    Init {
        /// Package name (default: current directory name)
        #[arg(long)]
        package: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Bundle {
            config,
            output_dir,
            zip,
            yes,
            python,
        } => {
            commands::bundle(commands::BundleOptions {
                config,
                output_dir,
                zip,
                yes,
                python,
            })
            .await?
        }
        Commands::Resolve { config, json } => commands::resolve(&config, json)?,
        Commands::Init { package } => commands::init_project(package.as_deref())?,
    }

    Ok(())
}
