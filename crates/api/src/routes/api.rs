use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use common::{Market, ScanRecord};
use scanner::Scanner;

use crate::AppState;

const MISSING_PARAMS: &str = "Missing required parameters: symbols, market, strategyName";

type ApiError = (StatusCode, Json<Value>);

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/scan", post(post_scan))
        .route("/api/strategies", get(get_strategies))
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest {
    #[serde(default)]
    symbols: Vec<String>,
    market: Option<String>,
    strategy_name: Option<String>,
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// Validate the request, then scan every symbol. Per-symbol failures are
/// reported inline; only request-level problems produce a non-200.
async fn post_scan(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<Vec<ScanRecord>>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected scan request body");
        bad_request(&format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let (market, strategy_name) = match (req.market.as_deref(), req.strategy_name.as_deref()) {
        (Some(m), Some(s)) if !m.is_empty() && !s.is_empty() && !req.symbols.is_empty() => (m, s),
        _ => return Err(bad_request(MISSING_PARAMS)),
    };
    let strategy = state
        .registry
        .get(strategy_name)
        .ok_or_else(|| bad_request("Invalid strategy name"))?;
    let market: Market = market
        .parse()
        .map_err(|_| bad_request("Invalid market"))?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "scan_request",
        %request_id,
        strategy = strategy_name,
        %market,
        symbols = req.symbols.len()
    );

    let scanner = Scanner::new(state.provider.clone(), strategy);
    let records = async {
        let records = scanner
            .scan_batch(&req.symbols, market, state.scan_concurrency)
            .await;
        let failed = records.iter().filter(|r| r.is_failure()).count();
        info!(failed, "Scan request complete");
        records
    }
    .instrument(span)
    .await;

    Ok(Json(records))
}

// ─── Strategies ───────────────────────────────────────────────────────────────

async fn get_strategies(State(state): State<AppState>) -> Json<Value> {
    let strategies: Vec<Value> = state
        .registry
        .iter()
        .map(|s| {
            let fields: Vec<String> = s
                .parameters()
                .into_iter()
                .filter(|&(_, include)| include)
                .map(|(name, _)| name)
                .collect();
            json!({
                "name": s.name(),
                "bars_back": s.bars_back(),
                "fields": fields,
            })
        })
        .collect();

    Json(json!({ "strategies": strategies }))
}
