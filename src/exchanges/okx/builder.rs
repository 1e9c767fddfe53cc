use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::core::types::Exchange;
use crate::exchanges::okx::{
    connector::{OkxConnector, RetryPolicy},
    signer::OkxSigner,
};
use std::sync::Arc;

pub const OKX_BASE_URL: &str = "https://www.okx.com";
const OKX_TIMEOUT_SECONDS: u64 = 10;

/// Builder for creating OKX exchange connectors
///
/// OKX serves demo trading from the production host; testnet mode only
/// adds the simulated-trading header to signed requests.
pub struct OkxBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
    retry: RetryPolicy,
}

impl Default for OkxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OkxBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: OKX_TIMEOUT_SECONDS,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.config.testnet = testnet;
        self
    }

    pub fn with_credentials(
        mut self,
        api_key: String,
        secret_key: String,
        passphrase: String,
    ) -> Self {
        let mut config = ExchangeConfig::new(api_key, secret_key)
            .passphrase(passphrase)
            .testnet(self.config.testnet);
        config.base_url = self.config.base_url.take();
        self.config = config;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    /// Set the candle poller's retry schedule
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn rest_config(&self) -> RestClientConfig {
        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| OKX_BASE_URL.to_string());
        RestClientConfig::new(base_url, Exchange::Okx.to_string()).with_timeout(self.rest_timeout)
    }

    pub fn build(self) -> Result<OkxConnector<ReqwestRest>, ExchangeError> {
        let mut rest_builder = RestClientBuilder::new(self.rest_config());

        if self.config.has_credentials() {
            if self.config.passphrase_value().is_empty() {
                return Err(ExchangeError::ConfigurationError(
                    "OKX passphrase is required when using credentials".to_string(),
                ));
            }

            let signer = OkxSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
                self.config.passphrase_value().to_string(),
            )
            .simulated(self.config.testnet);
            rest_builder = rest_builder.with_signer(Arc::new(signer));
        }

        let rest = rest_builder.build()?;
        Ok(OkxConnector::new(rest).with_retry_policy(self.retry))
    }
}

/// Create an OKX connector from a configuration
pub fn build_connector(config: ExchangeConfig) -> Result<OkxConnector<ReqwestRest>, ExchangeError> {
    OkxBuilder::new().with_config(config).build()
}
