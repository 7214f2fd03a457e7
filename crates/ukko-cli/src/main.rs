mod cmd;
mod launcher;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::UkkoExit;
use output::{paint, Color};
use std::path::PathBuf;
use ukko_core::UkkoError;

#[derive(Parser)]
#[command(
    name = "ukko",
    about = "Run the claude CLI generation after generation until the task list in .ukko/PRD.md is done",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .ukko/)
    #[arg(long, global = true, env = "UKKO_ROOT")]
    root: Option<PathBuf>,

    /// Log supervisor activity to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Without a command, run according to the configured mode (auto/testing)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive planning phase
    Plan,

    /// Run a single generation (testing mode)
    Run,

    /// Show current progress
    Status {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Template CLAUDE.md from .ukko/config.yaml
    Setup,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
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

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Some(Commands::Plan) => cmd::plan::run(&root, cmd::interrupt_token()),
        Some(Commands::Run) => cmd::run::run(&root, cmd::interrupt_token()),
        Some(Commands::Status { json }) => cmd::status::run(&root, json),
        Some(Commands::Setup) => cmd::setup::run(&root),
        None => cmd::auto::run(&root, cmd::interrupt_token()),
    };

    if let Err(e) = result {
        std::process::exit(report(&e));
    }
}

/// Print a one-line diagnosis with a hint and return the exit code.
fn report(e: &anyhow::Error) -> i32 {
    if let Some(exit) = e.downcast_ref::<UkkoExit>() {
        // Already explained by the command
        tracing::debug!(%exit, "exiting");
        return exit.exit_code();
    }

    match e.downcast_ref::<UkkoError>() {
        Some(UkkoError::SetupMissing(dir)) => {
            let msg = format!("Error: No {} directory found.", dir.display());
            eprintln!("{}", paint(Color::Red, &msg));
            eprintln!("Are you in the right directory?");
        }
        Some(UkkoError::ExecutableNotFound) => {
            eprintln!("{}", paint(Color::Red, "Error: 'claude' command not found."));
            eprintln!("Make sure Claude Code CLI is installed and in your PATH.");
        }
        Some(UkkoError::Interrupted) => return UkkoExit::Interrupted.exit_code(),
        _ => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
        }
    }
    1
}
