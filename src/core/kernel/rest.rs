use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::Signer;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument, trace};

/// Raw HTTP outcome of a successful (2xx) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub status: u16,
    pub body: String,
}

impl RestResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ExchangeError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
        })
    }
}

/// REST client trait for making HTTP requests
///
/// Implementations attach credentials through a [`Signer`] when
/// `authenticated` is set and never retry. A non-2xx status is returned as
/// [`ExchangeError::HttpStatus`] with the raw body so the caller can still
/// decode an exchange error from it.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Send one request
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `endpoint` - The API endpoint path, appended to the base URL
    /// * `query_params` - Query parameters as key-value pairs, in order
    /// * `body` - Optional JSON body
    /// * `authenticated` - Whether to sign the request
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError>;

    /// Make a GET request
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        self.request(Method::GET, endpoint, query_params, None, authenticated)
            .await
    }

    /// Make a POST request with a JSON body
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        self.request(Method::POST, endpoint, &[], Some(body), authenticated)
            .await
    }

    /// Make a DELETE request
    async fn delete(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        self.request(Method::DELETE, endpoint, query_params, None, authenticated)
            .await
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("fundgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    fn get_timestamp() -> Result<u64, ExchangeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| ExchangeError::AuthError(format!("Failed to get timestamp: {}", e)))
    }

    fn build_url(&self, endpoint: &str, query_string: &str) -> String {
        if query_string.is_empty() {
            format!("{}{}", self.config.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.config.base_url, endpoint, query_string)
        }
    }
}

/// Join parameters in the given order. The same string is signed and sent.
pub fn create_query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, query_params, body),
        fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint)
    )]
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        let query_string = create_query_string(query_params);
        let body_bytes = match body {
            Some(value) => serde_json::to_vec(value).map_err(|e| {
                ExchangeError::SerializationError(format!(
                    "Failed to serialize request body: {}",
                    e
                ))
            })?,
            None => Vec::new(),
        };

        let url = self.build_url(endpoint, &query_string);
        let mut request = self.client.request(method.clone(), &url);

        if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "Authentication required but no signer provided".to_string(),
                )
            })?;
            let timestamp = Self::get_timestamp()?;
            let (headers, signed_params) = signer.sign_request(
                method.as_str(),
                endpoint,
                &query_string,
                &body_bytes,
                timestamp,
            )?;

            for (key, value) in headers {
                request = request.header(&key, &value);
            }
            if !signed_params.is_empty() {
                request = request.query(&signed_params);
            }
        }

        if !body_bytes.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body_bytes);
        }

        debug!(authenticated, "sending request");

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!(status = status.as_u16(), "Response body: {}", text);

        if status.is_success() {
            Ok(RestResponse::new(status.as_u16(), text))
        } else {
            Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}
