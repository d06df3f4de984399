use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod dashboard;
mod error;
mod figure;
mod layout;
mod loader;
mod models;
mod render;
mod selection;
mod server;
mod signal;
mod summary;

#[derive(Parser)]
#[command(name = "skill-dashboard")]
#[command(about = "Group skill survey dashboard for Group Scholar course teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the survey and serve the interactive dashboard
    Serve {
        #[arg(long, default_value = loader::DEFAULT_CSV)]
        csv: PathBuf,
        #[arg(long, default_value = "127.0.0.1:8050")]
        bind: String,
        /// Verbose logging while iterating on the page
        #[arg(long)]
        debug: bool,
    },
    /// Load the survey and print what the dashboard would show
    Inspect {
        #[arg(long, default_value = loader::DEFAULT_CSV)]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { debug: true, .. } => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Serve { csv, bind, .. } => {
            let dataset = loader::load_dataset(&csv)?;
            let dashboard =
                dashboard::Dashboard::new(dataset).context("survey has no histogram columns")?;
            server::serve(dashboard, &bind).await?;
        }
        Commands::Inspect { csv } => {
            let dataset = loader::load_dataset(&csv)?;
            print!("{}", summary::build_summary(&dataset));
        }
    }

    Ok(())
}
