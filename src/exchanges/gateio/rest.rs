use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, RestResponse};
use crate::exchanges::gateio::types::{
    GateioContract, GateioErrorBody, GateioFuturesOrder, GateioFuturesOrderRequest,
    GateioPosition, GateioSpotAccount, GateioSpotOrder, GateioSpotOrderRequest, GateioTicker,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

pub const GATEIO_API_PREFIX: &str = "/api/v4";
const SETTLE: &str = "usdt";

/// Gate.io v4 REST endpoints.
///
/// Gate.io has no success envelope; rejections carry `{label, message}`
/// and are mapped to [`ExchangeError::ApiError`] with `label` as the code.
#[derive(Debug, Clone)]
pub struct GateioRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> GateioRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    fn api_error(body: &str) -> Option<ExchangeError> {
        serde_json::from_str::<GateioErrorBody>(body)
            .ok()
            .map(|error| ExchangeError::api(error.label, error.message))
    }

    fn decode<T: DeserializeOwned>(response: &RestResponse) -> Result<T, ExchangeError> {
        let value: Value = response.json()?;
        if value.get("label").is_some() {
            if let Some(error) = Self::api_error(&response.body) {
                return Err(error);
            }
        }
        serde_json::from_value(value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Unexpected Gate.io payload: {}", e))
        })
    }

    fn handle_response<T: DeserializeOwned>(
        &self,
        result: Result<RestResponse, ExchangeError>,
    ) -> Result<T, ExchangeError> {
        match result {
            Ok(response) => Self::decode(&response),
            Err(ExchangeError::HttpStatus { status, body }) => {
                Err(Self::api_error(&body).unwrap_or(ExchangeError::HttpStatus { status, body }))
            }
            Err(e) => Err(e),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let endpoint = format!("{}{}", GATEIO_API_PREFIX, path);
        let result = self
            .rest_client
            .request(method, &endpoint, query_params, body, authenticated)
            .await;
        self.handle_response(result)
    }

    fn to_body<T: Serialize>(request: &T) -> Result<Value, ExchangeError> {
        serde_json::to_value(request).map_err(|e| ExchangeError::SerializationError(e.to_string()))
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn get_ticker(&self, currency_pair: &str) -> Result<GateioTicker, ExchangeError> {
        let tickers: Vec<GateioTicker> = self
            .call(
                Method::GET,
                "/spot/tickers",
                &[("currency_pair", currency_pair)],
                None,
                false,
            )
            .await?;
        tickers
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::NotFound(format!("ticker for {}", currency_pair)))
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn spot_accounts(
        &self,
        currency: Option<&str>,
    ) -> Result<Vec<GateioSpotAccount>, ExchangeError> {
        let query_params = currency.map_or_else(Vec::new, |c| vec![("currency", c)]);
        self.call(Method::GET, "/spot/accounts", &query_params, None, true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn place_spot_order(
        &self,
        order: &GateioSpotOrderRequest,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        let body = Self::to_body(order)?;
        self.call(Method::POST, "/spot/orders", &[], Some(&body), true)
            .await
    }

    pub async fn get_spot_order(
        &self,
        order_id: &str,
        currency_pair: &str,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        self.call(
            Method::GET,
            &format!("/spot/orders/{}", order_id),
            &[("currency_pair", currency_pair)],
            None,
            true,
        )
        .await
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn cancel_spot_order(
        &self,
        order_id: &str,
        currency_pair: &str,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        self.call(
            Method::DELETE,
            &format!("/spot/orders/{}", order_id),
            &[("currency_pair", currency_pair)],
            None,
            true,
        )
        .await
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn place_futures_order(
        &self,
        order: &GateioFuturesOrderRequest,
    ) -> Result<GateioFuturesOrder, ExchangeError> {
        let body = Self::to_body(order)?;
        self.call(
            Method::POST,
            &format!("/futures/{}/orders", SETTLE),
            &[],
            Some(&body),
            true,
        )
        .await
    }

    pub async fn get_position(&self, contract: &str) -> Result<GateioPosition, ExchangeError> {
        self.call(
            Method::GET,
            &format!("/futures/{}/positions/{}", SETTLE, contract),
            &[],
            None,
            true,
        )
        .await
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    pub async fn update_position_leverage(
        &self,
        contract: &str,
        leverage: &str,
    ) -> Result<GateioPosition, ExchangeError> {
        self.call(
            Method::POST,
            &format!("/futures/{}/positions/{}/leverage", SETTLE, contract),
            &[("leverage", leverage)],
            None,
            true,
        )
        .await
    }

    pub async fn get_contract(&self, contract: &str) -> Result<GateioContract, ExchangeError> {
        self.call(
            Method::GET,
            &format!("/futures/{}/contracts/{}", SETTLE, contract),
            &[],
            None,
            false,
        )
        .await
    }
}
