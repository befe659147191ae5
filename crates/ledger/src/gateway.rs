//! Consensus gateway client.
//!
//! Submissions are JSON bodies signed by the operator key. The signature
//! and the operator identity travel in headers.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use hashvault_core::ledger::{LedgerError, LedgerReceipt};

use crate::http::{parse_response, transport_error, CallKind};
use crate::signer::OperatorSigner;

const HEADER_OPERATOR_ACCOUNT: &str = "X-Operator-Account";
const HEADER_OPERATOR_PUBLIC_KEY: &str = "X-Operator-Public-Key";
const HEADER_OPERATOR_SIGNATURE: &str = "X-Operator-Signature";

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTopicInfo {
    sequence_number: u64,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiReceipt {
    pub transaction_id: String,
    pub status: String,
    #[serde(default)]
    pub topic_sequence_number: Option<u64>,
}

impl From<ApiReceipt> for LedgerReceipt {
    fn from(r: ApiReceipt) -> Self {
        LedgerReceipt {
            transaction_id: r.transaction_id,
            status: r.status,
            sequence_number: r.topic_sequence_number,
        }
    }
}

#[derive(Serialize)]
struct SubmitMessageRequest<'a> {
    memo: &'a str,
    message: String,
}

#[derive(Serialize)]
struct MintRequest {
    amount: u64,
}

#[derive(Serialize)]
struct TransferRequest<'a> {
    from: &'a str,
    to: &'a str,
    amount: u64,
}

pub(crate) struct GatewayApi {
    client: reqwest::Client,
    base_url: String,
    signer: OperatorSigner,
    submit_timeout: Duration,
    read_timeout: Duration,
}

impl GatewayApi {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        signer: OperatorSigner,
        submit_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
            submit_timeout,
            read_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn operator_account(&self) -> &str {
        self.signer.account_id()
    }

    fn signed_headers(&self, body: &[u8]) -> Result<HeaderMap, LedgerError> {
        let header = |v: String| {
            HeaderValue::from_str(&v)
                .map_err(|e| LedgerError::SigningFailed(format!("invalid header value: {}", e)))
        };
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HEADER_OPERATOR_ACCOUNT,
            header(self.signer.account_id().to_string())?,
        );
        headers.insert(
            HEADER_OPERATOR_PUBLIC_KEY,
            header(self.signer.public_key_hex())?,
        );
        headers.insert(HEADER_OPERATOR_SIGNATURE, header(self.signer.sign(body))?);
        Ok(headers)
    }

    async fn submit<B: Serialize>(
        &self,
        kind: CallKind,
        path: &str,
        body: &B,
    ) -> Result<ApiReceipt, LedgerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[LedgerClient] POST {}", url);

        let body = serde_json::to_vec(body)
            .map_err(|e| LedgerError::SigningFailed(format!("cannot encode request: {}", e)))?;
        let response = self
            .client
            .post(&url)
            .timeout(self.submit_timeout)
            .headers(self.signed_headers(&body)?)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        parse_response(kind, &url, response).await
    }

    /// Current highest sequence number of a log; 0 when it is empty.
    pub async fn topic_sequence_number(&self, log_id: &str) -> Result<u64, LedgerError> {
        let url = format!("{}/api/v1/topics/{}", self.base_url, log_id);
        debug!("[LedgerClient] GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.read_timeout)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let info: ApiTopicInfo = parse_response(CallKind::Read, &url, response).await?;
        Ok(info.sequence_number)
    }

    pub async fn submit_message(
        &self,
        log_id: &str,
        memo: &str,
        payload: &[u8],
    ) -> Result<ApiReceipt, LedgerError> {
        let request = SubmitMessageRequest {
            memo,
            message: BASE64.encode(payload),
        };
        self.submit(
            CallKind::Append,
            &format!("/api/v1/topics/{}/messages", log_id),
            &request,
        )
        .await
    }

    pub async fn mint(&self, token_id: &str, units: u64) -> Result<ApiReceipt, LedgerError> {
        self.submit(
            CallKind::Token,
            &format!("/api/v1/tokens/{}/mint", token_id),
            &MintRequest { amount: units },
        )
        .await
    }

    pub async fn transfer(
        &self,
        token_id: &str,
        to: &str,
        units: u64,
    ) -> Result<ApiReceipt, LedgerError> {
        let request = TransferRequest {
            from: self.signer.account_id(),
            to,
            amount: units,
        };
        self.submit(
            CallKind::Token,
            &format!("/api/v1/tokens/{}/transfers", token_id),
            &request,
        )
        .await
    }
}
