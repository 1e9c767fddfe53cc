use anyhow::Context;
use fundgate::core::config::ExchangeConfig;
use fundgate::exchanges::okx::build_connector;
use fundgate::notify::{BarkNotifier, Notifier};
use fundgate::{Exchange, RedemptionWorkflow};
use std::sync::Arc;
use tracing::{info, warn};

/// `fundgate [TICKER] [--reconcile]`
///
/// Prints the last price of TICKER. With `--reconcile` and OKX credentials
/// in the environment, also redeems the base currency's savings and moves
/// the funding balance to the trading account.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ticker = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map_or("OKX:BTCUSDT.P", String::as_str);
    let reconcile = args.iter().any(|a| a == "--reconcile");

    let config = ExchangeConfig::from_env(Exchange::Okx.display_name()).unwrap_or_else(|e| {
        warn!(error = %e, "no OKX credentials, running read-only");
        ExchangeConfig::read_only()
    });
    let okx = build_connector(config).context("building OKX connector")?;

    let last = okx
        .ticker_last(ticker)
        .await
        .with_context(|| format!("fetching last price of {}", ticker))?;
    info!(ticker, %last, "last price");

    if reconcile {
        let mut workflow = RedemptionWorkflow::new(okx);
        if let Ok(key) = std::env::var("BARK_DEVICE_KEY") {
            let bark: Arc<dyn Notifier> = Arc::new(BarkNotifier::new(key)?);
            workflow = workflow.with_notifier(bark);
        }

        let report = workflow
            .run(ticker)
            .await
            .with_context(|| format!("reconciling {}", ticker))?;
        info!(
            currency = %report.currency,
            transferred = %report.transferred,
            transfer_id = %report.receipt.transfer_id,
            "reconciliation finished"
        );
    }

    Ok(())
}
