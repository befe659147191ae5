//! Operator key handling.

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use hashvault_core::ledger::LedgerError;

/// DER prefix of a PKCS#8-wrapped ed25519 private key, as exported by most
/// ledger wallets.
const DER_ED25519_PREFIX: &str = "302e020100300506032b657004220420";

/// Signs gateway submissions on behalf of the operator account.
pub struct OperatorSigner {
    account_id: String,
    key: SigningKey,
}

impl std::fmt::Debug for OperatorSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorSigner")
            .field("account_id", &self.account_id)
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

impl OperatorSigner {
    /// Builds a signer from a hex private key. Accepts a raw 32-byte seed or
    /// a DER-encoded key, with or without a `0x` prefix.
    pub fn from_hex(account_id: &str, private_key_hex: &str) -> Result<Self, LedgerError> {
        let trimmed = private_key_hex.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed).to_lowercase();
        let seed_hex = trimmed
            .strip_prefix(DER_ED25519_PREFIX)
            .unwrap_or(&trimmed);

        let bytes = hex::decode(seed_hex)
            .map_err(|e| LedgerError::SigningFailed(format!("operator key is not hex: {}", e)))?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            LedgerError::SigningFailed(format!(
                "operator key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ))
        })?;

        Ok(Self {
            account_id: account_id.to_string(),
            key: SigningKey::from_bytes(&seed),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    /// Hex signature over `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        hex::encode(self.key.sign(body).to_bytes())
    }
}
