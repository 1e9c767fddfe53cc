use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::{InstrumentId, SymbolNormalizer};
use crate::core::types::parse_decimal;
use crate::exchanges::gateio::{
    rest::GateioRest,
    types::{
        GateioFuturesOrder, GateioFuturesOrderRequest, GateioSpotAccount, GateioSpotOrder,
        GateioSpotOrderRequest, GateioTicker,
    },
};
use rust_decimal::Decimal;
use tracing::info;

/// Gate.io spot and USDT-settled futures connector
#[derive(Debug, Clone)]
pub struct GateioConnector<R: RestClient> {
    rest: GateioRest<R>,
    normalizer: SymbolNormalizer,
}

impl<R: RestClient> GateioConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            rest: GateioRest::new(rest),
            normalizer: SymbolNormalizer::gateio(),
        }
    }

    pub fn normalizer(&self) -> &SymbolNormalizer {
        &self.normalizer
    }

    pub async fn get_ticker(&self, pair: &InstrumentId) -> Result<GateioTicker, ExchangeError> {
        self.rest.get_ticker(pair.as_str()).await
    }

    /// Last traded price for a display ticker such as `GATEIO:BTCUSDT`
    pub async fn ticker_last(&self, ticker: &str) -> Result<Decimal, ExchangeError> {
        let pair = self.normalizer.to_instrument_id(ticker)?;
        let gate_ticker = self.get_ticker(&pair).await?;
        parse_decimal("last", &gate_ticker.last)
    }

    pub async fn spot_accounts(&self) -> Result<Vec<GateioSpotAccount>, ExchangeError> {
        self.rest.spot_accounts(None).await
    }

    pub async fn place_spot_order(
        &self,
        order: &GateioSpotOrderRequest,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        let placed = self.rest.place_spot_order(order).await?;
        info!(pair = %order.currency_pair, id = %placed.id, side = %order.side, "spot order placed");
        Ok(placed)
    }

    pub async fn place_futures_order(
        &self,
        order: &GateioFuturesOrderRequest,
    ) -> Result<GateioFuturesOrder, ExchangeError> {
        let placed = self.rest.place_futures_order(order).await?;
        info!(contract = %order.contract, id = placed.id, size = order.size, "futures order placed");
        Ok(placed)
    }

    pub async fn get_order(
        &self,
        order_id: &str,
        pair: &InstrumentId,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        require_order_id(order_id)?;
        self.rest.get_spot_order(order_id, pair.as_str()).await
    }

    pub async fn cancel_order(
        &self,
        order_id: &str,
        pair: &InstrumentId,
    ) -> Result<GateioSpotOrder, ExchangeError> {
        require_order_id(order_id)?;
        self.rest.cancel_spot_order(order_id, pair.as_str()).await
    }

    /// Current leverage of the position in `contract`; `"0"` means cross margin
    pub async fn position_leverage(&self, contract: &InstrumentId) -> Result<String, ExchangeError> {
        Ok(self.rest.get_position(contract.as_str()).await?.leverage)
    }

    pub async fn set_position_leverage(
        &self,
        contract: &InstrumentId,
        leverage: Decimal,
    ) -> Result<(), ExchangeError> {
        let leverage = leverage.normalize().to_string();
        self.rest
            .update_position_leverage(contract.as_str(), &leverage)
            .await?;
        info!(contract = %contract, leverage = %leverage, "position leverage updated");
        Ok(())
    }

    /// Base-currency quantity represented by one contract
    pub async fn contract_multiplier(
        &self,
        contract: &InstrumentId,
    ) -> Result<Decimal, ExchangeError> {
        let details = self.rest.get_contract(contract.as_str()).await?;
        parse_decimal("quanto_multiplier", &details.quanto_multiplier)
    }
}

fn require_order_id(order_id: &str) -> Result<(), ExchangeError> {
    if order_id.trim().is_empty() {
        return Err(ExchangeError::InvalidParameters(
            "order id is required".to_string(),
        ));
    }
    Ok(())
}

impl GateioSpotOrderRequest {
    /// Good-till-cancelled limit order
    pub fn limit(pair: &InstrumentId, side: &str, amount: Decimal, price: Decimal) -> Self {
        Self {
            order_type: "limit".to_string(),
            price: Some(price.normalize().to_string()),
            time_in_force: Some("gtc".to_string()),
            ..Self::market(pair, side, amount)
        }
    }

    /// Market order; `amount` is quote currency for buys and base for sells
    pub fn market(pair: &InstrumentId, side: &str, amount: Decimal) -> Self {
        Self {
            currency_pair: pair.clone(),
            side: side.to_string(),
            order_type: "market".to_string(),
            amount: amount.normalize().to_string(),
            price: None,
            time_in_force: Some("ioc".to_string()),
            account: None,
            text: None,
        }
    }
}

impl GateioFuturesOrderRequest {
    /// Immediate-or-cancel market order for `size` contracts (negative sells)
    pub fn market(contract: &InstrumentId, size: i64) -> Self {
        Self {
            contract: contract.clone(),
            size,
            price: "0".to_string(),
            tif: Some("ioc".to_string()),
            reduce_only: None,
            close: None,
            text: None,
        }
    }

    pub fn limit(contract: &InstrumentId, size: i64, price: Decimal) -> Self {
        Self {
            price: price.normalize().to_string(),
            tif: Some("gtc".to_string()),
            ..Self::market(contract, size)
        }
    }

    #[must_use]
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = Some(true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::testing::ScriptedRest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_ticker_last_uses_underscore_pair() {
        let scripted = ScriptedRest::new().ok(
            "/api/v4/spot/tickers",
            json!([{"currency_pair": "SOL_USDT", "last": "101.25"}]),
        );
        let gate = GateioConnector::new(scripted.clone());

        assert_eq!(gate.ticker_last("GATEIO:SOLUSDT").await.unwrap(), dec!(101.25));
        assert_eq!(
            scripted.requests()[0].param("currency_pair"),
            Some("SOL_USDT")
        );
    }

    #[tokio::test]
    async fn test_futures_market_order_body() {
        let scripted = ScriptedRest::new().ok(
            "/api/v4/futures/usdt/orders",
            json!({"id": 15675394, "contract": "BTC_USDT", "size": -3, "price": "0", "status": "finished"}),
        );
        let gate = GateioConnector::new(scripted.clone());
        let contract = InstrumentId::from_canonical("BTC_USDT").unwrap();

        let placed = gate
            .place_futures_order(&GateioFuturesOrderRequest::market(&contract, -3).reduce_only())
            .await
            .unwrap();
        assert_eq!(placed.id, 15_675_394);

        assert_eq!(
            scripted.requests()[0].body.clone().unwrap(),
            json!({"contract": "BTC_USDT", "size": -3, "price": "0", "tif": "ioc", "reduce_only": true})
        );
    }

    #[tokio::test]
    async fn test_cancel_order_requires_id() {
        let scripted = ScriptedRest::new();
        let gate = GateioConnector::new(scripted.clone());
        let pair = InstrumentId::from_canonical("BTC_USDT").unwrap();

        let err = gate.cancel_order(" ", &pair).await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(_)));
        assert!(scripted.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contract_multiplier() {
        let scripted = ScriptedRest::new().ok(
            "/api/v4/futures/usdt/contracts/ETH_USDT",
            json!({"name": "ETH_USDT", "type": "direct", "quanto_multiplier": "0.01"}),
        );
        let gate = GateioConnector::new(scripted.clone());
        let contract = InstrumentId::from_canonical("ETH_USDT").unwrap();

        assert_eq!(gate.contract_multiplier(&contract).await.unwrap(), dec!(0.01));
        assert!(!scripted.requests()[0].authenticated);
    }
}
