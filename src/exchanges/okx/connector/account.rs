use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::{Currency, InstrumentId};
use crate::core::types::parse_decimal;
use crate::exchanges::okx::{
    rest::OkxRest,
    types::{OkxAccountInfo, OkxLeverageInfo, OkxPosition, OkxSetLeverageRequest},
};
use rust_decimal::Decimal;

/// OKX trading-account queries and leverage settings
#[derive(Debug, Clone)]
pub struct Account<R: RestClient> {
    rest: OkxRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
        }
    }
}

impl<R: RestClient> Account<R> {
    pub async fn get_balance(
        &self,
        currency: Option<&Currency>,
    ) -> Result<OkxAccountInfo, ExchangeError> {
        self.rest.get_balance(currency.map(Currency::as_str)).await
    }

    /// Available balance of `currency` in the trading account
    pub async fn available_balance(&self, currency: &Currency) -> Result<Decimal, ExchangeError> {
        let account = self.get_balance(Some(currency)).await?;
        let detail = account
            .details
            .iter()
            .find(|detail| detail.ccy.eq_ignore_ascii_case(currency.as_str()))
            .ok_or_else(|| ExchangeError::NotFound(format!("balance for {}", currency)))?;

        parse_decimal("availBal", &detail.avail_bal)
    }

    pub async fn get_positions(
        &self,
        inst_type: Option<&str>,
        inst_id: Option<&InstrumentId>,
    ) -> Result<Vec<OkxPosition>, ExchangeError> {
        self.rest
            .get_positions(inst_type, inst_id.map(InstrumentId::as_str))
            .await
    }

    pub async fn get_leverage_info(
        &self,
        inst_id: &InstrumentId,
        mgn_mode: &str,
    ) -> Result<Vec<OkxLeverageInfo>, ExchangeError> {
        self.rest.get_leverage_info(inst_id.as_str(), mgn_mode).await
    }

    /// Set leverage for an instrument. `pos_side` is only meaningful for
    /// isolated margin in long/short mode.
    pub async fn set_leverage(
        &self,
        inst_id: &InstrumentId,
        lever: Decimal,
        mgn_mode: &str,
        pos_side: Option<&str>,
    ) -> Result<OkxLeverageInfo, ExchangeError> {
        let request = OkxSetLeverageRequest {
            inst_id: Some(inst_id.clone()),
            ccy: None,
            lever: lever.normalize().to_string(),
            mgn_mode: mgn_mode.to_string(),
            pos_side: pos_side.map(str::to_string),
        };
        self.rest.set_leverage(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::testing::ScriptedRest;
    use reqwest::Method;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_available_balance_picks_currency_detail() {
        let scripted = ScriptedRest::new().ok(
            "/api/v5/account/balance",
            json!({"code": "0", "msg": "", "data": [{
                "totalEq": "1000",
                "details": [
                    {"ccy": "USDT", "availBal": "812.5", "eq": "812.5"},
                    {"ccy": "BTC", "availBal": "0.01", "eq": "0.01"}
                ]
            }]}),
        );
        let account = Account::new(&scripted);
        let usdt = Currency::new("USDT").unwrap();

        assert_eq!(account.available_balance(&usdt).await.unwrap(), dec!(812.5));
        assert_eq!(scripted.requests()[0].param("ccy"), Some("USDT"));
    }

    #[tokio::test]
    async fn test_available_balance_missing_detail_is_not_found() {
        let scripted = ScriptedRest::new().ok(
            "/api/v5/account/balance",
            json!({"code": "0", "msg": "", "data": [{"totalEq": "0", "details": []}]}),
        );
        let account = Account::new(&scripted);

        let err = account
            .available_balance(&Currency::new("ETH").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_leverage_body() {
        let scripted = ScriptedRest::new().ok(
            "/api/v5/account/set-leverage",
            json!({"code": "0", "msg": "", "data": [{"instId": "BTC-USDT-SWAP", "lever": "5", "mgnMode": "cross", "posSide": ""}]}),
        );
        let account = Account::new(&scripted);
        let inst_id = InstrumentId::from_canonical("BTC-USDT-SWAP").unwrap();

        let info = account
            .set_leverage(&inst_id, dec!(5.0), "cross", None)
            .await
            .unwrap();
        assert_eq!(info.lever, "5");

        let request = &scripted.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert!(request.authenticated);
        assert_eq!(
            request.body.clone().unwrap(),
            json!({"instId": "BTC-USDT-SWAP", "lever": "5", "mgnMode": "cross"})
        );
    }
}
