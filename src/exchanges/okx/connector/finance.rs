use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::Currency;
use crate::exchanges::okx::{
    rest::OkxRest,
    types::{
        OkxAssetBalance, OkxSavingsBalance, OkxSavingsRequest, OkxSavingsResponse, OkxSavingsSide,
        OkxTransferRequest, OkxTransferResponse,
    },
};
use rust_decimal::Decimal;
use tracing::info;

/// OKX funding account, internal transfers and simple-earn savings
#[derive(Debug, Clone)]
pub struct Finance<R: RestClient> {
    rest: OkxRest<R>,
}

impl<R: RestClient + Clone> Finance<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
        }
    }
}

impl<R: RestClient> Finance<R> {
    pub async fn get_asset_balances(
        &self,
        currency: Option<&Currency>,
    ) -> Result<Vec<OkxAssetBalance>, ExchangeError> {
        self.rest
            .get_asset_balances(currency.map(Currency::as_str))
            .await
    }

    pub async fn transfer(
        &self,
        request: &OkxTransferRequest,
    ) -> Result<OkxTransferResponse, ExchangeError> {
        let receipt = self.rest.transfer(request).await?;
        info!(
            ccy = %request.ccy,
            amt = %request.amt,
            from = %request.from,
            to = %request.to,
            trans_id = %receipt.trans_id,
            "transfer submitted"
        );
        Ok(receipt)
    }

    pub async fn get_savings_balance(
        &self,
        currency: Option<&Currency>,
    ) -> Result<Vec<OkxSavingsBalance>, ExchangeError> {
        self.rest
            .get_savings_balance(currency.map(Currency::as_str))
            .await
    }

    pub async fn savings_purchase_redempt(
        &self,
        request: &OkxSavingsRequest,
    ) -> Result<OkxSavingsResponse, ExchangeError> {
        self.rest.savings_purchase_redempt(request).await
    }

    /// Redeem `amount` of `currency` from savings back to the funding account
    pub async fn redeem(
        &self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<OkxSavingsResponse, ExchangeError> {
        self.savings_purchase_redempt(&OkxSavingsRequest {
            ccy: currency.clone(),
            amt: amount.to_string(),
            side: OkxSavingsSide::Redempt,
            rate: None,
        })
        .await
    }

    /// Lend `amount` of `currency` at a minimum annual `rate`
    pub async fn purchase(
        &self,
        currency: &Currency,
        amount: Decimal,
        rate: Decimal,
    ) -> Result<OkxSavingsResponse, ExchangeError> {
        self.savings_purchase_redempt(&OkxSavingsRequest {
            ccy: currency.clone(),
            amt: amount.to_string(),
            side: OkxSavingsSide::Purchase,
            rate: Some(rate.normalize().to_string()),
        })
        .await
    }
}
