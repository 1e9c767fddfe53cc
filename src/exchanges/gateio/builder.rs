use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::core::types::Exchange;
use crate::exchanges::gateio::{connector::GateioConnector, signer::GateioSigner};
use std::sync::Arc;

pub const GATEIO_BASE_URL: &str = "https://api.gateio.ws";
pub const GATEIO_TESTNET_URL: &str = "https://api-testnet.gateapi.io";
const GATEIO_TIMEOUT_SECONDS: u64 = 30;

/// Builder for creating Gate.io connectors
pub struct GateioBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
}

impl Default for GateioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GateioBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: GATEIO_TIMEOUT_SECONDS,
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.config.testnet = testnet;
        self
    }

    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    fn base_url(&self) -> String {
        match (&self.config.base_url, self.config.testnet) {
            (Some(url), _) => url.clone(),
            (None, true) => GATEIO_TESTNET_URL.to_string(),
            (None, false) => GATEIO_BASE_URL.to_string(),
        }
    }

    fn rest_config(&self) -> RestClientConfig {
        RestClientConfig::new(self.base_url(), Exchange::Gateio.to_string())
            .with_timeout(self.rest_timeout)
    }

    pub fn build(self) -> Result<GateioConnector<ReqwestRest>, ExchangeError> {
        let mut rest_builder = RestClientBuilder::new(self.rest_config());

        if self.config.has_credentials() {
            let signer = GateioSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            );
            rest_builder = rest_builder.with_signer(Arc::new(signer));
        }

        Ok(GateioConnector::new(rest_builder.build()?))
    }
}

/// Create a Gate.io connector from a configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<GateioConnector<ReqwestRest>, ExchangeError> {
    GateioBuilder::new().with_config(config).build()
}
