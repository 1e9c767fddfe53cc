/// Transport kernel shared by every exchange gateway
///
/// The kernel holds only transport logic and the signing contract. Exchange
/// specifics (endpoints, envelopes, signature recipes) live under
/// `crate::exchanges`.
///
/// - `RestClient`: HTTP interface returning the raw status and body
/// - `ReqwestRest`: reqwest implementation built by `RestClientBuilder`
/// - `Signer`: pluggable per-exchange authentication
///
/// # Example
/// ```rust,no_run
/// use fundgate::core::kernel::*;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new("https://www.okx.com".to_string(), "okx".to_string())
///     .with_timeout(10);
/// let rest = RestClientBuilder::new(rest_config).build()?;
///
/// let response = rest
///     .get("/api/v5/market/ticker", &[("instId", "BTC-USDT")], false)
///     .await?;
/// let body: serde_json::Value = response.json()?;
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

#[cfg(test)]
pub(crate) mod testing;

pub use rest::{create_query_string, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, RestResponse};
pub use signer::{SignatureResult, Signer};
