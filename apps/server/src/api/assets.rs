use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use hashvault_core::tokenization::EligibleAsset;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoResponse {
    symbol: String,
    logo_ref: String,
}

async fn get_logo(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<LogoResponse>> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("symbol is required".to_string()));
    }
    let logo_ref = state.tokenization_service.logo_for(&symbol);
    Ok(Json(LogoResponse { symbol, logo_ref }))
}

async fn get_eligible_assets(State(state): State<Arc<AppState>>) -> Json<Vec<EligibleAsset>> {
    Json(state.tokenization_service.eligible_assets())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets/eligible", get(get_eligible_assets))
        .route("/assets/{symbol}/logo", get(get_logo))
}
