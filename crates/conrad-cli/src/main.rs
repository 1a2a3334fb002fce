use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "conrad", version, about = "Record audit events")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record events from a YAML/JSON document (a mapping or a list of mappings).
    Record {
        /// Input file. Reads stdin when omitted or "-".
        file: Option<PathBuf>,

        #[command(flatten)]
        overrides: commands::RecorderArgs,
    },

    /// Validate a recorder configuration and list the available components.
    Check {
        #[command(flatten)]
        overrides: commands::RecorderArgs,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the stdout emitter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Record { file, overrides } => commands::record::run(file.as_deref(), &overrides)?,
        Command::Check { overrides } => commands::check::run(&overrides)?,
    }

    Ok(())
}
