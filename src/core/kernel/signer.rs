use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::collections::HashMap;

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// One implementation per exchange credential scheme. Signing is pure: the
/// same inputs always yield the same headers.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Query string (without leading '?'), exactly as sent
    /// * `body` - Raw request body bytes
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// Raw HMAC-SHA256 of `payload` keyed by `secret`
pub fn hmac_sha256(secret: &str, payload: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Raw HMAC-SHA512 of `payload` keyed by `secret`
pub fn hmac_sha512(secret: &str, payload: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Lowercase hex SHA512 digest
pub fn sha512_hex(payload: &[u8]) -> String {
    hex::encode(Sha512::digest(payload))
}
