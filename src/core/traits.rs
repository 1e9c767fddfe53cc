use crate::core::{
    errors::ExchangeError,
    symbol::Currency,
    types::{AssetBalance, NotifyStatus, SavingsBalance, TransferReceipt, TransferRequest},
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Funding operations needed to move money out of savings and into trading.
///
/// Implementations report what the exchange returned; an absent currency is
/// an empty vector, not an error.
#[async_trait]
pub trait FundingGateway: Send + Sync {
    /// Funding (asset) account balances for `currency`
    async fn asset_balances(&self, currency: &Currency) -> Result<Vec<AssetBalance>, ExchangeError>;

    /// Savings product holdings for `currency`
    async fn savings_balances(
        &self,
        currency: &Currency,
    ) -> Result<Vec<SavingsBalance>, ExchangeError>;

    /// Request redemption of `amount` from savings into the funding account
    async fn redeem_savings(&self, currency: &Currency, amount: Decimal)
        -> Result<(), ExchangeError>;

    /// Move funds between sub-accounts
    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt, ExchangeError>;
}

/// Push-message sender.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        title: &str,
        content: &str,
        status: NotifyStatus,
    ) -> Result<(), ExchangeError>;
}
