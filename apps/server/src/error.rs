use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hashvault_core::{
    tokenization::TokenizationReceipt,
    Error as CoreError, ErrorKind,
};
use rust_decimal::Decimal;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// How far a partially failed operation got.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub symbol: Option<String>,
    pub amount: Option<Decimal>,
    /// Last step that completed, e.g. `RECORDED` or `INDEXED`.
    pub reached: String,
    pub failed_at: String,
    pub orphaned_mint: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub completed: Vec<TokenizationReceipt>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: u16,
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    saga: Option<StepReport>,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::SubmissionFailed | ErrorKind::RejectedByNetwork => StatusCode::BAD_GATEWAY,
        ErrorKind::IneligibleAsset => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::SigningFailed
        | ErrorKind::AuthError
        | ErrorKind::MalformedPayload
        | ErrorKind::PartialFailure
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn step_report(err: &CoreError) -> Option<StepReport> {
    match err {
        CoreError::Tokenization(failure) => Some(StepReport {
            symbol: Some(failure.symbol.clone()),
            amount: Some(failure.amount),
            reached: failure.reached.to_string(),
            failed_at: failure.failed_at.to_string(),
            orphaned_mint: failure.orphaned_mint,
            completed: failure.completed.clone(),
        }),
        CoreError::RegistrationIncomplete { .. } => Some(StepReport {
            symbol: None,
            amount: None,
            reached: "INDEXED".to_string(),
            failed_at: "APPEND_INITIAL_SNAPSHOT".to_string(),
            orphaned_mint: false,
            completed: Vec::new(),
        }),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, saga) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorKind::Validation, None),
            ApiError::Core(err) => (status_for(err.kind()), err.kind(), step_report(err)),
        };

        if status.is_server_error() {
            tracing::error!(kind = kind.as_str(), "{}", self);
        } else {
            tracing::debug!(kind = kind.as_str(), "{}", self);
        }

        let body = ErrorBody {
            code: status.as_u16(),
            kind: kind.as_str(),
            message: self.to_string(),
            saga,
        };
        (status, Json(body)).into_response()
    }
}
