use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::core::traits::Notifier;
use crate::core::types::NotifyStatus;
use async_trait::async_trait;
use reqwest::Url;

pub const BARK_BASE_URL: &str = "https://api.day.app";
const BARK_TIMEOUT_SECONDS: u64 = 10;

/// Bark iOS push: `GET {base}/{device_key}/{title}/{content}?sound=...`
pub struct BarkNotifier<R: RestClient> {
    rest: R,
    device_key: String,
}

impl BarkNotifier<ReqwestRest> {
    pub fn new(device_key: String) -> Result<Self, ExchangeError> {
        let rest = RestClientBuilder::new(
            RestClientConfig::new(BARK_BASE_URL.to_string(), "bark".to_string())
                .with_timeout(BARK_TIMEOUT_SECONDS),
        )
        .build()?;
        Ok(Self::with_rest(rest, device_key))
    }
}

impl<R: RestClient> BarkNotifier<R> {
    pub fn with_rest(rest: R, device_key: String) -> Self {
        Self { rest, device_key }
    }

    const fn sound(status: NotifyStatus) -> &'static str {
        match status {
            NotifyStatus::Success => "alarm",
            NotifyStatus::Failure => "anticipate",
        }
    }

    fn path(&self, title: &str, content: &str) -> Result<String, ExchangeError> {
        let mut url = Url::parse("http://localhost/")
            .map_err(|e| ExchangeError::ConfigurationError(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ExchangeError::ConfigurationError("invalid bark path".to_string()))?
            .clear()
            .push(&self.device_key)
            .push(title)
            .push(content);
        Ok(url.path().to_string())
    }
}

impl<R: RestClient> std::fmt::Debug for BarkNotifier<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarkNotifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: RestClient> Notifier for BarkNotifier<R> {
    async fn send(
        &self,
        title: &str,
        content: &str,
        status: NotifyStatus,
    ) -> Result<(), ExchangeError> {
        let path = self.path(title, content)?;
        self.rest
            .get(&path, &[("sound", Self::sound(status))], false)
            .await?;
        Ok(())
    }
}
