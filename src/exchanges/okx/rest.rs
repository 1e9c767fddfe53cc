use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, RestResponse};
use crate::exchanges::okx::types::{
    OkxAccountInfo, OkxAlgoOrder, OkxAlgoOrderRequest, OkxAlgoOrderResponse, OkxAssetBalance,
    OkxCancelAlgoOrderRequest, OkxInstrument, OkxLeverageInfo, OkxOrder, OkxOrderRequest,
    OkxOrderResponse, OkxOrdersHistoryQuery, OkxPosition, OkxResponse, OkxSavingsBalance,
    OkxSavingsRequest, OkxSavingsResponse, OkxSetLeverageRequest, OkxTicker, OkxTransferRequest,
    OkxTransferResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// OKX v5 REST endpoints with envelope decoding.
///
/// Every call decodes `{code, msg, data}`. A `code` other than `"0"` is an
/// [`ExchangeError::ApiError`] carrying `msg` unchanged, whatever the HTTP
/// status was.
#[derive(Debug, Clone)]
pub struct OkxRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> OkxRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    pub(crate) fn rest_client(&self) -> &R {
        &self.rest_client
    }

    /// Decode the envelope of a 2xx response into `T`
    pub fn decode_envelope<T>(response: &RestResponse) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let envelope: OkxResponse<Value> = serde_json::from_str(&response.body).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse OKX response: {}", e))
        })?;

        if envelope.code != "0" {
            return Err(ExchangeError::api(envelope.code, envelope.msg));
        }

        serde_json::from_value(envelope.data).map_err(|e| {
            ExchangeError::DeserializationError(format!("Unexpected OKX data shape: {}", e))
        })
    }

    /// Decode a transport result. Error statuses whose body is an OKX
    /// envelope become application errors so the exchange text surfaces.
    fn handle_response<T>(
        &self,
        result: Result<RestResponse, ExchangeError>,
    ) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        match result {
            Ok(response) => Self::decode_envelope(&response),
            Err(ExchangeError::HttpStatus { status, body }) => {
                match serde_json::from_str::<OkxResponse<Value>>(&body) {
                    Ok(envelope) if !envelope.code.is_empty() && envelope.code != "0" => {
                        Err(ExchangeError::api(envelope.code, envelope.msg))
                    }
                    _ => Err(ExchangeError::HttpStatus { status, body }),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn first<T>(items: Vec<T>, what: &str) -> Result<T, ExchangeError> {
        items
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::NotFound(what.to_string()))
    }

    fn to_body<T: Serialize>(request: &T) -> Result<Value, ExchangeError> {
        serde_json::to_value(request).map_err(|e| ExchangeError::SerializationError(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let result = self
            .rest_client
            .get(endpoint, query_params, authenticated)
            .await;
        self.handle_response(result)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, ExchangeError> {
        let result = self.rest_client.post(endpoint, body, true).await;
        self.handle_response(result)
    }

    // Public endpoints

    /// Instruments of one type, optionally narrowed to a single id
    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_instruments(
        &self,
        inst_type: &str,
        inst_id: Option<&str>,
    ) -> Result<Vec<OkxInstrument>, ExchangeError> {
        if inst_type.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "instType is required".to_string(),
            ));
        }
        let mut query_params = vec![("instType", inst_type)];
        if let Some(id) = inst_id {
            query_params.push(("instId", id));
        }

        self.get("/api/v5/public/instruments", &query_params, false)
            .await
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_ticker(&self, inst_id: &str) -> Result<OkxTicker, ExchangeError> {
        let tickers: Vec<OkxTicker> = self
            .get("/api/v5/market/ticker", &[("instId", inst_id)], false)
            .await?;
        Self::first(tickers, &format!("ticker for {}", inst_id))
    }

    // Account endpoints

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_balance(&self, ccy: Option<&str>) -> Result<OkxAccountInfo, ExchangeError> {
        let query_params = ccy.map_or_else(Vec::new, |currency| vec![("ccy", currency)]);
        let accounts: Vec<OkxAccountInfo> = self
            .get("/api/v5/account/balance", &query_params, true)
            .await?;
        Self::first(accounts, "account balance")
    }

    pub async fn get_positions(
        &self,
        inst_type: Option<&str>,
        inst_id: Option<&str>,
    ) -> Result<Vec<OkxPosition>, ExchangeError> {
        let mut query_params = Vec::new();
        if let Some(inst_type) = inst_type {
            query_params.push(("instType", inst_type));
        }
        if let Some(inst_id) = inst_id {
            query_params.push(("instId", inst_id));
        }
        self.get("/api/v5/account/positions", &query_params, true)
            .await
    }

    pub async fn get_leverage_info(
        &self,
        inst_id: &str,
        mgn_mode: &str,
    ) -> Result<Vec<OkxLeverageInfo>, ExchangeError> {
        self.get(
            "/api/v5/account/leverage-info",
            &[("instId", inst_id), ("mgnMode", mgn_mode)],
            true,
        )
        .await
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn set_leverage(
        &self,
        request: &OkxSetLeverageRequest,
    ) -> Result<OkxLeverageInfo, ExchangeError> {
        let body = Self::to_body(request)?;
        let items: Vec<OkxLeverageInfo> = self.post("/api/v5/account/set-leverage", &body).await?;
        Self::first(items, "leverage acknowledgement")
    }

    // Trade endpoints

    /// Place an order. A rejected item is reported through its `sCode`.
    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn place_order(
        &self,
        order: &OkxOrderRequest,
    ) -> Result<OkxOrderResponse, ExchangeError> {
        let body = Self::to_body(order)?;
        let items: Vec<OkxOrderResponse> = self.post("/api/v5/trade/order", &body).await?;
        let ack = Self::first(items, "order acknowledgement")?;
        check_item(&ack.s_code, &ack.s_msg)?;
        Ok(ack)
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn cancel_order(
        &self,
        inst_id: &str,
        ord_id: Option<&str>,
        cl_ord_id: Option<&str>,
    ) -> Result<OkxOrderResponse, ExchangeError> {
        let mut body = serde_json::json!({ "instId": inst_id });
        match (ord_id, cl_ord_id) {
            (Some(id), _) => body["ordId"] = Value::String(id.to_string()),
            (None, Some(cl_id)) => body["clOrdId"] = Value::String(cl_id.to_string()),
            (None, None) => {
                return Err(ExchangeError::InvalidParameters(
                    "Either ordId or clOrdId is required".to_string(),
                ))
            }
        }

        let items: Vec<OkxOrderResponse> = self.post("/api/v5/trade/cancel-order", &body).await?;
        let ack = Self::first(items, "cancel acknowledgement")?;
        check_item(&ack.s_code, &ack.s_msg)?;
        Ok(ack)
    }

    pub async fn get_order(
        &self,
        inst_id: &str,
        ord_id: Option<&str>,
        cl_ord_id: Option<&str>,
    ) -> Result<OkxOrder, ExchangeError> {
        let mut query_params = vec![("instId", inst_id)];
        match (ord_id, cl_ord_id) {
            (Some(id), _) => query_params.push(("ordId", id)),
            (None, Some(cl_id)) => query_params.push(("clOrdId", cl_id)),
            (None, None) => {
                return Err(ExchangeError::InvalidParameters(
                    "Either ordId or clOrdId is required".to_string(),
                ))
            }
        }

        let orders: Vec<OkxOrder> = self
            .get("/api/v5/trade/order", &query_params, true)
            .await?;
        Self::first(orders, &format!("order on {}", inst_id))
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn place_algo_order(
        &self,
        request: &OkxAlgoOrderRequest,
    ) -> Result<OkxAlgoOrderResponse, ExchangeError> {
        let body = Self::to_body(request)?;
        let items: Vec<OkxAlgoOrderResponse> =
            self.post("/api/v5/trade/order-algo", &body).await?;
        let ack = Self::first(items, "algo order acknowledgement")?;
        check_item(&ack.s_code, &ack.s_msg)?;
        Ok(ack)
    }

    pub async fn get_algo_orders_pending(
        &self,
        ord_type: &str,
        inst_type: Option<&str>,
        inst_id: Option<&str>,
    ) -> Result<Vec<OkxAlgoOrder>, ExchangeError> {
        let mut query_params = vec![("ordType", ord_type)];
        if let Some(inst_type) = inst_type {
            query_params.push(("instType", inst_type));
        }
        if let Some(inst_id) = inst_id {
            query_params.push(("instId", inst_id));
        }
        self.get("/api/v5/trade/orders-algo-pending", &query_params, true)
            .await
    }

    #[instrument(skip(self, requests), fields(exchange = "okx", count = requests.len()))]
    pub async fn cancel_algo_orders(
        &self,
        requests: &[OkxCancelAlgoOrderRequest],
    ) -> Result<Vec<OkxAlgoOrderResponse>, ExchangeError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let body = Self::to_body(&requests)?;
        let items: Vec<OkxAlgoOrderResponse> =
            self.post("/api/v5/trade/cancel-algos", &body).await?;
        for ack in &items {
            check_item(&ack.s_code, &ack.s_msg)?;
        }
        Ok(items)
    }

    pub async fn get_orders_history_archive(
        &self,
        query: &OkxOrdersHistoryQuery,
    ) -> Result<Vec<OkxOrder>, ExchangeError> {
        let params = query.to_params();
        let query_params: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.get("/api/v5/trade/orders-history-archive", &query_params, true)
            .await
    }

    // Asset and finance endpoints

    /// Funding account balances. An empty list means the currency is absent.
    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_asset_balances(
        &self,
        ccy: Option<&str>,
    ) -> Result<Vec<OkxAssetBalance>, ExchangeError> {
        let query_params = ccy.map_or_else(Vec::new, |currency| vec![("ccy", currency)]);
        self.get("/api/v5/asset/balances", &query_params, true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn transfer(
        &self,
        request: &OkxTransferRequest,
    ) -> Result<OkxTransferResponse, ExchangeError> {
        let body = Self::to_body(request)?;
        let items: Vec<OkxTransferResponse> = self.post("/api/v5/asset/transfer", &body).await?;
        Self::first(items, "transfer acknowledgement")
    }

    /// Savings holdings. An empty list means nothing is held.
    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_savings_balance(
        &self,
        ccy: Option<&str>,
    ) -> Result<Vec<OkxSavingsBalance>, ExchangeError> {
        let query_params = ccy.map_or_else(Vec::new, |currency| vec![("ccy", currency)]);
        self.get("/api/v5/finance/savings/balance", &query_params, true)
            .await
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn savings_purchase_redempt(
        &self,
        request: &OkxSavingsRequest,
    ) -> Result<OkxSavingsResponse, ExchangeError> {
        let body = Self::to_body(request)?;
        let items: Vec<OkxSavingsResponse> = self
            .post("/api/v5/finance/savings/purchase-redempt", &body)
            .await?;
        Self::first(items, "savings acknowledgement")
    }
}

/// Batch endpoints report success per item; an empty `sCode` counts as accepted.
fn check_item(s_code: &str, s_msg: &str) -> Result<(), ExchangeError> {
    if s_code.is_empty() || s_code == "0" {
        Ok(())
    } else {
        Err(ExchangeError::api(s_code, s_msg))
    }
}
