use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::Config;
use market_data::YahooClient;
use strategy::{StrategyFileConfig, StrategyRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("invalid environment configuration")?;
    info!(port = cfg.port, concurrency = cfg.scan_concurrency, "Signal scanner starting");

    // ── Strategy registry ─────────────────────────────────────────────────────
    let registry = match &cfg.strategy_config_path {
        Some(path) => {
            let file = StrategyFileConfig::load(path)
                .with_context(|| format!("failed to load strategy file {path}"))?;
            StrategyRegistry::from_config(&file)
                .with_context(|| format!("invalid strategy file {path}"))?
        }
        None => {
            warn!("STRATEGY_CONFIG_PATH not set, using built-in strategies");
            StrategyRegistry::with_defaults()?
        }
    };
    info!(strategies = ?registry.names().collect::<Vec<_>>(), "Strategies registered");

    // ── Market data ───────────────────────────────────────────────────────────
    let provider = YahooClient::new(&cfg.market_data_base_url, cfg.market_data_timeout)
        .context("failed to build market data client")?;

    // ── API ───────────────────────────────────────────────────────────────────
    let state = api::AppState {
        registry: Arc::new(registry),
        provider: Arc::new(provider),
        scan_concurrency: cfg.scan_concurrency,
    };

    tokio::select! {
        res = api::serve(state, cfg.port) => res.context("API server stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received. Exiting."),
    }
    Ok(())
}
