use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{hmac_sha256, SignatureResult, Signer};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;

/// Signs OKX v5 requests with API key, secret and passphrase.
pub struct OkxSigner {
    api_key: String,
    secret_key: String,
    passphrase: String,
    simulated: bool,
}

impl OkxSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key,
            secret_key,
            passphrase,
            simulated: false,
        }
    }

    /// Mark every signed request for the demo-trading environment
    #[must_use]
    pub fn simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }

    /// ISO-8601 UTC with milliseconds, e.g. `2024-01-02T03:04:05.678Z`
    pub fn format_timestamp(timestamp_ms: u64) -> Result<String, ExchangeError> {
        let datetime = chrono::DateTime::from_timestamp_millis(timestamp_ms as i64)
            .ok_or_else(|| ExchangeError::AuthError("Invalid timestamp".to_string()))?;

        Ok(datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }
}

/// base64(HMAC-SHA256(secret, timestamp + METHOD + request_path [+ body]))
///
/// `request_path` carries the `?query` part when there is one. The body is
/// only part of the prehash for POST and PUT.
pub fn okx_signature(
    secret_key: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String, ExchangeError> {
    let method = method.to_ascii_uppercase();
    let mut prehash = format!("{}{}{}", timestamp, method, request_path);
    if method == "POST" || method == "PUT" {
        prehash.push_str(body);
    }

    let mac = hmac_sha256(secret_key, prehash.as_bytes())?;
    Ok(general_purpose::STANDARD.encode(mac))
}

impl Signer for OkxSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let timestamp = Self::format_timestamp(timestamp)?;

        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };

        let body_str = std::str::from_utf8(body)
            .map_err(|e| ExchangeError::AuthError(format!("Invalid body encoding: {}", e)))?;

        let signature =
            okx_signature(&self.secret_key, &timestamp, method, &request_path, body_str)?;

        let mut headers = HashMap::new();
        headers.insert("OK-ACCESS-KEY".to_string(), self.api_key.clone());
        headers.insert("OK-ACCESS-SIGN".to_string(), signature);
        headers.insert("OK-ACCESS-TIMESTAMP".to_string(), timestamp);
        headers.insert("OK-ACCESS-PASSPHRASE".to_string(), self.passphrase.clone());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if self.simulated {
            headers.insert("x-simulated-trading".to_string(), "1".to_string());
        }

        // OKX carries auth in headers only
        Ok((headers, Vec::new()))
    }
}
