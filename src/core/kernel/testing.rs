//! Scripted `RestClient` for unit tests.

use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::{RestClient, RestResponse};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(String),
    Status(u16, String),
    Network,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authenticated: bool,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedRest {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl ScriptedRest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `endpoint`; replies are consumed in order.
    pub fn on(self, endpoint: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn ok(self, endpoint: &str, body: Value) -> Self {
        self.on(endpoint, Reply::Ok(body.to_string()))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }
}

#[async_trait]
impl RestClient for ScriptedRest {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<RestResponse, ExchangeError> {
        self.log.lock().unwrap().push(Recorded {
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
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ok(body)) => Ok(RestResponse::new(200, body)),
            Some(Reply::Status(status, body)) => Err(ExchangeError::HttpStatus { status, body }),
            Some(Reply::Network) => Err(ExchangeError::NetworkError("connection reset".to_string())),
            None => panic!("no scripted reply for {}", endpoint),
        }
    }
}
