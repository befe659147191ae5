use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use hashvault_core::accounts::{Profile, RegisteredAccount};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationStatus {
    account_id: String,
    registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_id: Option<String>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Path((account_id, log_id)): Path<(String, String)>,
    body: Option<Json<Profile>>,
) -> ApiResult<(StatusCode, Json<RegisteredAccount>)> {
    let profile = body.map(|Json(p)| p).unwrap_or_default();
    let registered = state
        .state_store
        .register(&account_id, &log_id, profile)
        .await?;
    tracing::info!("Registered {} on log {}", account_id, log_id);
    Ok((StatusCode::CREATED, Json(registered)))
}

async fn registration_status(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<RegistrationStatus>> {
    let registered = state.state_store.is_registered(&account_id)?;
    let log_id = if registered {
        Some(state.state_store.log_id(&account_id)?)
    } else {
        None
    };
    Ok(Json(RegistrationStatus {
        account_id,
        registered,
        log_id,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register/{account_id}/{log_id}", post(register))
        .route("/auth/registered/{account_id}", get(registration_status))
}
