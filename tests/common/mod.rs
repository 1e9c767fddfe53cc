//! Scripted transport shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use fundgate::core::errors::ExchangeError;
use fundgate::core::kernel::{RestClient, RestResponse};
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Status(u16, String),
}

#[derive(Debug, Clone)]
pub struct Sent {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authenticated: bool,
}

impl Sent {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued replies per endpoint and records every request
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn ok(self, endpoint: &str, body: Value) -> Self {
        self.reply(endpoint, Reply::Ok(body))
    }

    pub fn sent_to(&self, endpoint: &str) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.endpoint == endpoint)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RestClient for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        self.sent.lock().unwrap().push(Sent {
            method,
            endpoint: endpoint.to_string(),
            query: query_params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: body.cloned(),
            authenticated,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted reply for {}", endpoint));

        match reply {
            Reply::Ok(body) => Ok(RestResponse::new(200, body.to_string())),
            Reply::Status(status, body) => Err(ExchangeError::HttpStatus { status, body }),
        }
    }
}

/// OKX success envelope around `data`
pub fn okx_ok(data: Value) -> Value {
    serde_json::json!({ "code": "0", "msg": "", "data": data })
}
