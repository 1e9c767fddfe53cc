use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::{Currency, SymbolNormalizer};
use crate::core::traits::FundingGateway;
use crate::core::types::{
    parse_decimal, AssetBalance, SavingsBalance, TransferReceipt, TransferRequest,
};
use crate::exchanges::okx::types::OkxTransferRequest;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub mod account;
pub mod finance;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use finance::Finance;
pub use market_data::{CandleFetchError, MarketData, RetryPolicy};
pub use trading::Trading;

/// OKX connector that composes all sub-component implementations
///
/// Built once with credentials and shared freely; every part holds only
/// immutable state.
#[derive(Debug, Clone)]
pub struct OkxConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
    pub finance: Finance<R>,
    normalizer: SymbolNormalizer,
}

impl<R: RestClient + Clone> OkxConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest),
            account: Account::new(&rest),
            finance: Finance::new(&rest),
            normalizer: SymbolNormalizer::okx(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.market = self.market.with_retry_policy(retry);
        self
    }
}

impl<R: RestClient> OkxConnector<R> {
    pub fn normalizer(&self) -> &SymbolNormalizer {
        &self.normalizer
    }

    /// Last traded price for a display ticker
    pub async fn ticker_last(&self, ticker: &str) -> Result<Decimal, ExchangeError> {
        self.market.ticker_last(ticker).await
    }

    /// Trading-account available balance of a display ticker's base currency
    pub async fn available_balance(&self, ticker: &str) -> Result<Decimal, ExchangeError> {
        let currency = self.normalizer.to_base_currency(ticker)?;
        self.account.available_balance(&currency).await
    }
}

#[async_trait]
impl<R: RestClient> FundingGateway for OkxConnector<R> {
    async fn asset_balances(
        &self,
        currency: &Currency,
    ) -> Result<Vec<AssetBalance>, ExchangeError> {
        self.finance
            .get_asset_balances(Some(currency))
            .await?
            .into_iter()
            .filter(|balance| balance.ccy.eq_ignore_ascii_case(currency.as_str()))
            .map(|balance| -> Result<AssetBalance, ExchangeError> {
                Ok(AssetBalance {
                    available: parse_decimal("availBal", &balance.avail_bal)?,
                    currency: balance.ccy,
                })
            })
            .collect()
    }

    async fn savings_balances(
        &self,
        currency: &Currency,
    ) -> Result<Vec<SavingsBalance>, ExchangeError> {
        self.finance
            .get_savings_balance(Some(currency))
            .await?
            .into_iter()
            .filter(|holding| holding.ccy.eq_ignore_ascii_case(currency.as_str()))
            .map(|holding| -> Result<SavingsBalance, ExchangeError> {
                Ok(SavingsBalance {
                    amount: parse_decimal("amt", &holding.amt)?,
                    currency: holding.ccy,
                })
            })
            .collect()
    }

    async fn redeem_savings(
        &self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), ExchangeError> {
        self.finance.redeem(currency, amount).await.map(|_| ())
    }

    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt, ExchangeError> {
        let okx_request =
            OkxTransferRequest::new(request.currency, request.amount, request.from, request.to);

        let receipt = self.finance.transfer(&okx_request).await?;
        Ok(TransferReceipt {
            transfer_id: receipt.trans_id,
            currency: okx_request.ccy.to_string(),
            amount: okx_request.amt,
        })
    }
}
