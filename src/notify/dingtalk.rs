use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::core::traits::Notifier;
use crate::core::types::NotifyStatus;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

pub const DINGTALK_BASE_URL: &str = "https://oapi.dingtalk.com";
const DINGTALK_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize)]
struct DingTalkReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// DingTalk group robot addressed by its webhook access token
pub struct DingTalkNotifier<R: RestClient> {
    rest: R,
    access_token: String,
    name: String,
}

impl DingTalkNotifier<ReqwestRest> {
    /// `name` prefixes every message; robots with a keyword filter need it
    pub fn new(access_token: String, name: String) -> Result<Self, ExchangeError> {
        let rest = RestClientBuilder::new(
            RestClientConfig::new(DINGTALK_BASE_URL.to_string(), "dingtalk".to_string())
                .with_timeout(DINGTALK_TIMEOUT_SECONDS),
        )
        .build()?;
        Ok(Self::with_rest(rest, access_token, name))
    }
}

impl<R: RestClient> DingTalkNotifier<R> {
    pub fn with_rest(rest: R, access_token: String, name: String) -> Self {
        Self {
            rest,
            access_token,
            name,
        }
    }

    fn message(&self, title: &str, content: &str) -> String {
        format!("【{}通知】{}：{}", self.name, title, content)
    }
}

impl<R: RestClient> std::fmt::Debug for DingTalkNotifier<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DingTalkNotifier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: RestClient> Notifier for DingTalkNotifier<R> {
    async fn send(
        &self,
        title: &str,
        content: &str,
        _status: NotifyStatus,
    ) -> Result<(), ExchangeError> {
        let body = json!({
            "msgtype": "text",
            "text": { "content": self.message(title, content) },
        });

        let response = self
            .rest
            .request(
                Method::POST,
                "/robot/send",
                &[("access_token", self.access_token.as_str())],
                Some(&body),
                false,
            )
            .await?;

        let reply: DingTalkReply = response.json()?;
        if reply.errcode != 0 {
            return Err(ExchangeError::api(reply.errcode.to_string(), reply.errmsg));
        }
        Ok(())
    }
}
