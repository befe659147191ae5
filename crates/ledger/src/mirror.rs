//! Mirror node (read replica) client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;

use hashvault_core::ledger::LedgerError;

use crate::http::{parse_response, transport_error, CallKind};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
struct ApiTopicMessage {
    message: String,
    sequence_number: u64,
}

pub(crate) struct MirrorApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl MirrorApi {
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decoded payload of message `sequence_number` of `log_id`.
    pub async fn message(&self, log_id: &str, sequence_number: u64) -> Result<Vec<u8>, LedgerError> {
        let url = format!(
            "{}/api/v1/topics/{}/messages/{}",
            self.base_url, log_id, sequence_number
        );
        debug!("[LedgerClient] GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let message: ApiTopicMessage = parse_response(CallKind::Read, &url, response).await?;
        if message.sequence_number != sequence_number {
            return Err(LedgerError::InvalidResponse(format!(
                "asked for message #{} of {}, mirror returned #{}",
                sequence_number, log_id, message.sequence_number
            )));
        }
        BASE64.decode(message.message.as_bytes()).map_err(|e| {
            LedgerError::InvalidResponse(format!(
                "message #{} of {} is not base64: {}",
                sequence_number, log_id, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_message_ignores_extra_mirror_fields() {
        let body = r#"{
            "chunk_info": null,
            "consensus_timestamp": "1700000000.000000001",
            "message": "eyJ1c2VyQWNjb3VudElkIjoiMC4wLjEwMCJ9",
            "payer_account_id": "0.0.2",
            "running_hash": "q2Vn",
            "running_hash_version": 3,
            "sequence_number": 4,
            "topic_id": "0.0.200"
        }"#;

        let message: ApiTopicMessage = serde_json::from_str(body).unwrap();
        assert_eq!(message.sequence_number, 4);
        assert_eq!(
            BASE64.decode(message.message.as_bytes()).unwrap(),
            br#"{"userAccountId":"0.0.100"}"#.to_vec()
        );
    }
}
