use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use hashvault_core::brokerage::{BrokerPosition, PortfolioHistory};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize, Default)]
struct HistoryQuery {
    #[serde(default)]
    period: String,
    #[serde(default)]
    timeframe: String,
}

async fn get_positions(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<BrokerPosition>>> {
    let positions = state.portfolio_service.positions().await?;
    Ok(Json(positions))
}

async fn get_portfolio_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<PortfolioHistory>> {
    let history = state
        .portfolio_service
        .portfolio_history(&query.period, &query.timeframe)
        .await?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/brokerage/positions", get(get_positions))
        .route("/brokerage/portfolio-history", get(get_portfolio_history))
}
