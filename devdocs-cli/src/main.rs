//! # devdocs CLI
//!
//! Command-line interface for the devdocs documentation-site generator.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devdocs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "devdocs.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new devdocs project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build the static site
    Build,

    /// Serve the site, resolving pages on demand
    Serve {
        /// Server port (overrides the configured port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List every resolvable route
    Routes {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build => commands::build_site(&cli.config),
        Commands::Serve { port } => commands::serve_site(&cli.config, port).await,
        Commands::Routes { json } => commands::list_routes(&cli.config, json),
    }
}
