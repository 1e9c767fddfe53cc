//! Move a currency's savings and funding balance into the trading account.
//!
//! The run reads both balances, redeems any savings, waits for the
//! redemption to land in the funding account and then transfers the whole
//! funding balance to trading. Waiting is bounded: when the balance does
//! not rise within the polling budget the transfer goes ahead with the last
//! known snapshot.

use crate::core::{
    errors::ExchangeError,
    symbol::{round_for_currency, Currency, SymbolNormalizer},
    traits::{FundingGateway, Notifier},
    types::{AccountKind, AssetBalance, NotifyStatus, SavingsBalance, TransferReceipt, TransferRequest},
};
use crate::notify::notify_best_effort;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const NOTIFY_TITLE: &str = "Savings reconciliation";

#[derive(Debug, Clone)]
pub struct ReconciliationConfig {
    /// Balance queries after a successful redemption
    pub max_attempts: u32,
    /// Sleep before each balance query
    pub poll_interval: Duration,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStage {
    NotStarted,
    /// No savings to redeem
    RedemptionSkipped,
    RedemptionRequested,
    /// The exchange refused the redemption; polling is skipped
    RedemptionRejected,
    BalanceConfirmed,
    /// Polling budget spent (or cancelled) without seeing the balance rise
    BalanceTimedOut,
    Transferred,
    TransferFailed,
}

/// Snapshot carried through one run
#[derive(Debug, Clone)]
pub struct ReconciliationState {
    pub currency: Currency,
    pub asset_balance: Decimal,
    pub savings_balance: Decimal,
    pub stage: ReconciliationStage,
    history: Vec<ReconciliationStage>,
}

impl ReconciliationState {
    fn new(currency: Currency, asset_balance: Decimal, savings_balance: Decimal) -> Self {
        Self {
            currency,
            asset_balance,
            savings_balance,
            stage: ReconciliationStage::NotStarted,
            history: vec![ReconciliationStage::NotStarted],
        }
    }

    fn advance(&mut self, stage: ReconciliationStage) {
        info!(
            currency = %self.currency,
            from = ?self.stage,
            to = ?stage,
            asset_balance = %self.asset_balance,
            "reconciliation stage"
        );
        self.stage = stage;
        self.history.push(stage);
    }

    /// Every stage visited, starting with `NotStarted`
    pub fn history(&self) -> &[ReconciliationStage] {
        &self.history
    }
}

#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    pub currency: Currency,
    /// Amount submitted to the transfer, already rounded
    pub transferred: Decimal,
    pub stage: ReconciliationStage,
    /// Set when the redemption was rejected and the run carried on
    pub redemption_error: Option<String>,
    pub receipt: TransferReceipt,
    pub history: Vec<ReconciliationStage>,
}

pub struct RedemptionWorkflow<G: FundingGateway> {
    gateway: G,
    normalizer: SymbolNormalizer,
    config: ReconciliationConfig,
    cancel: CancellationToken,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<G: FundingGateway> RedemptionWorkflow<G> {
    /// Workflow over `gateway` reading OKX-style tickers
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            normalizer: SymbolNormalizer::okx(),
            config: ReconciliationConfig::default(),
            cancel: CancellationToken::new(),
            notifier: None,
        }
    }

    pub fn with_config(mut self, config: ReconciliationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_normalizer(mut self, normalizer: SymbolNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Cancelling stops the polling phase; the transfer still runs
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[instrument(skip(self))]
    pub async fn run(&self, ticker: &str) -> Result<ReconciliationReport, ExchangeError> {
        let currency = self.normalizer.to_base_currency(ticker)?;

        let asset_balance = available_of(&self.gateway.asset_balances(&currency).await?, &currency);
        let savings_balance =
            amount_of(&self.gateway.savings_balances(&currency).await?, &currency);
        let mut state = ReconciliationState::new(currency, asset_balance, savings_balance);

        let redemption_error = self.redeem(&mut state).await;

        let amount = round_for_currency(state.currency.as_str(), state.asset_balance);
        let request = TransferRequest {
            currency: state.currency.clone(),
            amount,
            from: AccountKind::Funding,
            to: AccountKind::Trading,
        };

        match self.gateway.transfer(request).await {
            Ok(receipt) => {
                state.advance(ReconciliationStage::Transferred);
                self.notify(
                    &format!("moved {} {} to trading", amount, state.currency),
                    NotifyStatus::Success,
                )
                .await;
                Ok(ReconciliationReport {
                    currency: state.currency.clone(),
                    transferred: amount,
                    stage: state.stage,
                    redemption_error,
                    receipt,
                    history: state.history,
                })
            }
            Err(e) => {
                state.advance(ReconciliationStage::TransferFailed);
                self.notify(
                    &format!("transfer of {} {} failed: {}", amount, state.currency, e),
                    NotifyStatus::Failure,
                )
                .await;
                Err(e)
            }
        }
    }

    /// Redeem savings and wait for the funding balance to reflect it.
    /// Returns the rejection message when the exchange refused.
    async fn redeem(&self, state: &mut ReconciliationState) -> Option<String> {
        if state.savings_balance <= Decimal::ZERO {
            state.advance(ReconciliationStage::RedemptionSkipped);
            return None;
        }

        let amount = round_for_currency(state.currency.as_str(), state.savings_balance);
        state.advance(ReconciliationStage::RedemptionRequested);

        if let Err(e) = self.gateway.redeem_savings(&state.currency, amount).await {
            warn!(currency = %state.currency, %amount, error = %e, "redemption rejected");
            state.advance(ReconciliationStage::RedemptionRejected);
            return Some(e.to_string());
        }

        let stage = self.await_settlement(state).await;
        state.advance(stage);
        None
    }

    async fn await_settlement(&self, state: &mut ReconciliationState) -> ReconciliationStage {
        let baseline = state.asset_balance;

        for attempt in 1..=self.config.max_attempts {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    info!(currency = %state.currency, attempt, "balance polling cancelled");
                    return ReconciliationStage::BalanceTimedOut;
                }
                () = tokio::time::sleep(self.config.poll_interval) => {}
            }

            match self.gateway.asset_balances(&state.currency).await {
                Ok(balances) => {
                    let current = available_of(&balances, &state.currency);
                    debug!(currency = %state.currency, attempt, %current, %baseline, "funding balance");
                    if current > baseline {
                        state.asset_balance = current;
                        return ReconciliationStage::BalanceConfirmed;
                    }
                }
                Err(e) => {
                    warn!(currency = %state.currency, attempt, error = %e, "funding balance query failed");
                }
            }
        }

        ReconciliationStage::BalanceTimedOut
    }

    async fn notify(&self, content: &str, status: NotifyStatus) {
        if let Some(notifier) = &self.notifier {
            notify_best_effort(notifier.as_ref(), NOTIFY_TITLE, content, status).await;
        }
    }
}

fn available_of(balances: &[AssetBalance], currency: &Currency) -> Decimal {
    balances
        .iter()
        .find(|b| b.currency.eq_ignore_ascii_case(currency.as_str()))
        .map_or(Decimal::ZERO, |b| b.available)
}

fn amount_of(balances: &[SavingsBalance], currency: &Currency) -> Decimal {
    balances
        .iter()
        .find(|b| b.currency.eq_ignore_ascii_case(currency.as_str()))
        .map_or(Decimal::ZERO, |b| b.amount)
}
