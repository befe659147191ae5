use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use hashvault_core::{
    accounts::{Profile, TokenizedHolding},
    portfolio::PortfolioSummary,
    tokenization::{TokenizationReceipt, TokenizationSummary},
};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let snapshot = state.state_store.get_state(&account_id).await?;
    Ok(Json(snapshot.profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(profile): Json<Profile>,
) -> ApiResult<Json<Profile>> {
    let snapshot = state
        .state_store
        .update_profile(&account_id, profile)
        .await?;
    Ok(Json(snapshot.profile))
}

async fn get_tokenized_assets(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<Vec<TokenizedHolding>>> {
    let snapshot = state.state_store.get_state(&account_id).await?;
    Ok(Json(snapshot.tokenized_holdings))
}

async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.portfolio_service.portfolio_summary(&account_id).await?;
    Ok(Json(summary))
}

async fn tokenize_portfolio(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<TokenizationSummary>> {
    let summary = state
        .tokenization_service
        .tokenize_portfolio(&account_id)
        .await?;
    tracing::info!(
        "Tokenized {} holding(s) for {}",
        summary.receipts.len(),
        account_id
    );
    Ok(Json(summary))
}

async fn tokenize_symbol(
    State(state): State<Arc<AppState>>,
    Path((account_id, symbol)): Path<(String, String)>,
) -> ApiResult<Json<TokenizationReceipt>> {
    let receipt = state
        .tokenization_service
        .tokenize_symbol(&account_id, &symbol)
        .await?;
    Ok(Json(receipt))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{account_id}/profile",
            get(get_profile).put(update_profile),
        )
        .route(
            "/users/{account_id}/tokenized-assets",
            get(get_tokenized_assets),
        )
        .route("/users/{account_id}/portfolio", get(get_portfolio))
        .route("/users/{account_id}/tokenize", post(tokenize_portfolio))
        .route(
            "/users/{account_id}/tokenize/{symbol}",
            post(tokenize_symbol),
        )
}
