//! Response handling shared by the gateway and mirror clients.

use log::warn;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use hashvault_core::ledger::LedgerError;

/// What a request was for; decides how a refused request is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    Read,
    Append,
    Token,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub(crate) fn transport_error(context: &str, e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Unavailable(format!("{} timed out", context))
    } else {
        LedgerError::Unavailable(format!("{} failed: {}", context, e))
    }
}

/// Maps a non-success status to a ledger error.
pub(crate) fn status_error(kind: CallKind, status: StatusCode, body: &str) -> LedgerError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let network_status = parsed.as_ref().and_then(|e| e.status.clone());
    let message = parsed
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| body.chars().take(200).collect());
    let detail = format!("HTTP {}: {}", status.as_u16(), message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LedgerError::SigningFailed(detail),
        StatusCode::NOT_FOUND if kind == CallKind::Read => LedgerError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => LedgerError::Unavailable(detail),
        s if s.is_server_error() => LedgerError::Unavailable(detail),
        _ => match kind {
            CallKind::Read => LedgerError::InvalidResponse(detail),
            CallKind::Append => LedgerError::SubmissionFailed(network_status.unwrap_or(detail)),
            CallKind::Token => LedgerError::RejectedByNetwork {
                status: network_status.unwrap_or(detail),
            },
        },
    }
}

/// Reads the body and parses it as `T`, or maps the failure.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    kind: CallKind,
    context: &str,
    response: reqwest::Response,
) -> Result<T, LedgerError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(context, e))?;

    if !status.is_success() {
        let err = status_error(kind, status, &body);
        warn!("[LedgerClient] {} returned {}: {}", context, status, err);
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| {
        LedgerError::InvalidResponse(format!(
            "{}: {} - {}",
            context,
            e,
            body.chars().take(200).collect::<String>()
        ))
    })
}
