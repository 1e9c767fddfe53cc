use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::InstrumentId;
use crate::exchanges::okx::{
    rest::OkxRest,
    types::{
        OkxAlgoOrder, OkxAlgoOrderRequest, OkxAlgoOrderResponse, OkxAttachedAlgo,
        OkxCancelAlgoOrderRequest, OkxOrder, OkxOrderRequest, OkxOrderResponse,
        OkxOrdersHistoryQuery,
    },
};
use rust_decimal::Decimal;
use tracing::info;

/// OKX order placement and order queries
#[derive(Debug, Clone)]
pub struct Trading<R: RestClient> {
    rest: OkxRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
        }
    }
}

impl<R: RestClient> Trading<R> {
    pub async fn place_order(
        &self,
        order: &OkxOrderRequest,
    ) -> Result<OkxOrderResponse, ExchangeError> {
        let ack = self.rest.place_order(order).await?;
        info!(inst_id = %order.inst_id, ord_id = %ack.ord_id, side = %order.side, "order placed");
        Ok(ack)
    }

    pub async fn cancel_order(
        &self,
        inst_id: &InstrumentId,
        ord_id: Option<&str>,
        cl_ord_id: Option<&str>,
    ) -> Result<OkxOrderResponse, ExchangeError> {
        self.rest
            .cancel_order(inst_id.as_str(), ord_id, cl_ord_id)
            .await
    }

    pub async fn get_order(
        &self,
        inst_id: &InstrumentId,
        ord_id: Option<&str>,
        cl_ord_id: Option<&str>,
    ) -> Result<OkxOrder, ExchangeError> {
        self.rest.get_order(inst_id.as_str(), ord_id, cl_ord_id).await
    }

    pub async fn place_algo_order(
        &self,
        request: &OkxAlgoOrderRequest,
    ) -> Result<OkxAlgoOrderResponse, ExchangeError> {
        let ack = self.rest.place_algo_order(request).await?;
        info!(inst_id = %request.inst_id, algo_id = %ack.algo_id, "algo order placed");
        Ok(ack)
    }

    pub async fn get_algo_orders_pending(
        &self,
        ord_type: &str,
        inst_type: Option<&str>,
        inst_id: Option<&InstrumentId>,
    ) -> Result<Vec<OkxAlgoOrder>, ExchangeError> {
        self.rest
            .get_algo_orders_pending(ord_type, inst_type, inst_id.map(InstrumentId::as_str))
            .await
    }

    pub async fn cancel_algo_orders(
        &self,
        requests: &[OkxCancelAlgoOrderRequest],
    ) -> Result<Vec<OkxAlgoOrderResponse>, ExchangeError> {
        self.rest.cancel_algo_orders(requests).await
    }

    pub async fn get_orders_history_archive(
        &self,
        query: &OkxOrdersHistoryQuery,
    ) -> Result<Vec<OkxOrder>, ExchangeError> {
        self.rest.get_orders_history_archive(query).await
    }
}

impl OkxOrderRequest {
    /// Market order; `td_mode` is `cash` for spot, `cross`/`isolated` for margin
    pub fn market(inst_id: &InstrumentId, td_mode: &str, side: &str, size: Decimal) -> Self {
        Self {
            inst_id: inst_id.clone(),
            td_mode: td_mode.to_string(),
            side: side.to_string(),
            pos_side: None,
            ord_type: "market".to_string(),
            sz: size.normalize().to_string(),
            px: None,
            tgt_ccy: None,
            reduce_only: None,
            cl_ord_id: None,
            attach_algo_ords: Vec::new(),
        }
    }

    pub fn limit(
        inst_id: &InstrumentId,
        td_mode: &str,
        side: &str,
        size: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            ord_type: "limit".to_string(),
            px: Some(price.normalize().to_string()),
            ..Self::market(inst_id, td_mode, side, size)
        }
    }

    /// Attach a take-profit leg filled at `order_price` once `trigger_price` trades
    #[must_use]
    pub fn with_take_profit(mut self, trigger_price: Decimal, order_price: Decimal) -> Self {
        self.attach_algo_ords.push(OkxAttachedAlgo {
            tp_trigger_px: trigger_price.normalize().to_string(),
            tp_ord_px: order_price.normalize().to_string(),
        });
        self
    }
}

impl OkxAlgoOrderRequest {
    /// Bare algo order; add legs with `with_take_profit`/`with_stop_loss`.
    /// Without `sz` the order closes the whole position.
    pub fn new(inst_id: &InstrumentId, td_mode: &str, side: &str, ord_type: &str) -> Self {
        Self {
            inst_id: inst_id.clone(),
            td_mode: td_mode.to_string(),
            side: side.to_string(),
            pos_side: None,
            ord_type: ord_type.to_string(),
            sz: None,
            reduce_only: None,
            close_fraction: None,
            tp_trigger_px: None,
            tp_trigger_px_type: None,
            tp_ord_px: None,
            sl_trigger_px: None,
            sl_trigger_px_type: None,
            sl_ord_px: None,
            algo_cl_ord_id: None,
        }
    }

    #[must_use]
    pub fn with_take_profit(mut self, trigger_price: Decimal, order_price: Decimal) -> Self {
        self.tp_trigger_px = Some(trigger_price.normalize().to_string());
        self.tp_ord_px = Some(order_price.normalize().to_string());
        self
    }

    #[must_use]
    pub fn with_stop_loss(mut self, trigger_price: Decimal, order_price: Decimal) -> Self {
        self.sl_trigger_px = Some(trigger_price.normalize().to_string());
        self.sl_ord_px = Some(order_price.normalize().to_string());
        self
    }
}
