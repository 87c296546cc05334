mod cmd;
mod kits;
mod output;
mod prompt;
mod target;

use clap::{Parser, Subcommand};
use cmd::{add::AddArgs, remove::RemoveArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lite-kits",
    about = "Add lightweight enhancement kits to spec-kit projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Kit bundle directory (default: the kits shipped with this binary)
    #[arg(long, global = true, env = "LITE_KITS_DIR")]
    kits_dir: Option<PathBuf>,

    /// Output as JSON (never prompts)
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Show debug logging
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add kits to a spec-kit project
    Add(AddArgs),

    /// Remove kits from a project
    Remove(RemoveArgs),

    /// Check installed kits for missing or truncated files
    Validate {
        /// Target directory (default: current directory)
        target: Option<PathBuf>,
    },

    /// Show spec-kit detection and which kits are installed
    Status {
        /// Target directory (default: current directory)
        target: Option<PathBuf>,
    },

    /// Show version, repository and available kits
    Info,

    /// How to uninstall lite-kits
    Uninstall,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let kits_dir = cli.kits_dir.as_deref();

    let result = match cli.command {
        Commands::Add(args) => cmd::add::run(kits_dir, args, cli.json),
        Commands::Remove(args) => cmd::remove::run(kits_dir, args, cli.json),
        Commands::Validate { target } => cmd::validate::run(kits_dir, target.as_deref(), cli.json),
        Commands::Status { target } => cmd::status::run(kits_dir, target.as_deref(), cli.json),
        Commands::Info => cmd::info::run(kits_dir, cli.json),
        Commands::Uninstall => cmd::uninstall::run(cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
