//! synth-router command-line application

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate candidate routes for every token pair into an artifact
    Precompute {
        /// Market list files, one per network
        #[arg(long = "markets", required = true, num_args = 1..)]
        markets: Vec<PathBuf>,
        /// Artifact output path
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = router_core::constants::DEFAULT_MAX_HOPS)]
        max_hops: usize,
        #[arg(long, default_value_t = router_core::constants::DEFAULT_MAX_CANDIDATES_PER_DEPTH)]
        max_candidates: usize,
    },
    /// Find the best route for one swap against a market snapshot
    Route(commands::route::RouteArgs),
    /// Serve the route API
    Serve {
        /// JSON config file
        #[arg(long)]
        config: PathBuf,
        /// Override the configured network
        #[arg(long)]
        network: Option<router_core::Network>,
    },
}

/// Parse arguments and run the selected command
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("synth_router=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    match cli.command {
        Commands::Precompute {
            markets,
            out,
            max_hops,
            max_candidates,
        } => commands::precompute::run(&markets, &out, max_hops, max_candidates),
        Commands::Route(args) => commands::route::run(&args),
        Commands::Serve { config, network } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::serve::run(&config, network))
        }
    }
}
