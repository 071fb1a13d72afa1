//! One-shot route query

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use router_api::dto::{parse_amount, DiagnosticsResponse, RouteResponse};
use router_core::RouterConfig;
use swap_router::{MarketSnapshot, NetworkMarkets, RouteArtifact, RouteQuery, SwapRouteService};

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Market list of the network to route on
    #[arg(long)]
    pub markets: PathBuf,
    /// Reserve, price and impact snapshot
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Serve candidates from a precomputed artifact
    #[arg(long)]
    pub artifact: Option<PathBuf>,
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    /// Input in the source token's smallest unit
    #[arg(long)]
    pub amount: String,
    /// Only accept routes whose final pool trades this index token
    #[arg(long)]
    pub index_token: Option<String>,
    /// Print every evaluated candidate instead of the best route
    #[arg(long)]
    pub diagnostics: bool,
    /// Rank insufficient candidates instead of excluding them
    #[arg(long)]
    pub include_insufficient: bool,
}

/// Evaluate the query and render the JSON output
pub fn execute(args: &RouteArgs) -> Result<serde_json::Value> {
    let markets = NetworkMarkets::load(&args.markets)
        .with_context(|| format!("loading markets from {}", args.markets.display()))?;
    let snapshot = MarketSnapshot::load(&args.snapshot)
        .with_context(|| format!("loading snapshot from {}", args.snapshot.display()))?;

    let config = RouterConfig {
        include_insufficient: args.include_insufficient,
        ..RouterConfig::default()
    };
    let mut service = SwapRouteService::from_markets(&markets, &config);
    if let Some(path) = &args.artifact {
        let artifact = RouteArtifact::load(path)
            .with_context(|| format!("loading artifact from {}", path.display()))?;
        service = service.with_artifact(&artifact);
    }

    let amount_in = parse_amount(&args.amount).map_err(|e| anyhow!(e.message))?;
    let mut query = RouteQuery::new(args.from.as_str(), args.to.as_str(), amount_in);
    query.required_index_token = args.index_token.as_deref().map(Into::into);

    let diagnostics = service.get_route_diagnostics(&query, &snapshot)?;
    tracing::info!(
        status = ?diagnostics.status,
        source = ?diagnostics.source,
        candidates = diagnostics.candidates.len(),
        "Route evaluated"
    );

    let output = if args.diagnostics {
        serde_json::to_value(DiagnosticsResponse::from(&diagnostics))?
    } else {
        serde_json::to_value(RouteResponse::from(&diagnostics))?
    };
    Ok(output)
}

pub fn run(args: &RouteArgs) -> Result<()> {
    let output = execute(args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
