mod common;

use common::{okx_ok, Reply, ScriptedTransport};
use fundgate::{
    core::symbol::InstrumentId,
    exchanges::okx::{OkxConnector, RetryPolicy},
    ExchangeError, KlineInterval, ReconciliationStage, RedemptionWorkflow,
};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const ASSET_BALANCES: &str = "/api/v5/asset/balances";
const SAVINGS_BALANCE: &str = "/api/v5/finance/savings/balance";
const REDEEM: &str = "/api/v5/finance/savings/purchase-redempt";
const TRANSFER: &str = "/api/v5/asset/transfer";
const CANDLES: &str = "/api/v5/market/history-candles";

fn eth_balance(avail: &str) -> serde_json::Value {
    okx_ok(json!([{"ccy": "ETH", "bal": avail, "frozenBal": "0", "availBal": avail}]))
}

fn transfer_ok() -> serde_json::Value {
    okx_ok(json!([{"transId": "754147", "ccy": "ETH", "clientId": "", "from": "6", "amt": "2.5", "to": "18"}]))
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_envelope_error_on_success_status() {
        let transport = ScriptedTransport::new().ok(
            "/api/v5/market/ticker",
            json!({"code": "51001", "msg": "Instrument ID does not exist", "data": []}),
        );
        let okx = OkxConnector::new(transport);

        let err = okx.ticker_last("OKX:FOOUSDT").await.unwrap_err();
        match err {
            ExchangeError::ApiError { code, message } => {
                assert_eq!(code, "51001");
                assert_eq!(message, "Instrument ID does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_ticker_data_is_not_found() {
        let transport = ScriptedTransport::new().ok("/api/v5/market/ticker", okx_ok(json!([])));
        let okx = OkxConnector::new(transport);

        let err = okx.ticker_last("BTC-USDT").await.unwrap_err();
        assert!(matches!(err, ExchangeError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciliation_moves_redeemed_savings_to_trading() {
        let transport = ScriptedTransport::new()
            .ok(ASSET_BALANCES, okx_ok(json!([])))
            .ok(
                SAVINGS_BALANCE,
                okx_ok(json!([{"ccy": "ETH", "amt": "2.5", "earnings": "0.0001", "rate": "0.01"}])),
            )
            .ok(
                REDEEM,
                okx_ok(json!([{"ccy": "ETH", "amt": "2.5000", "side": "redempt", "rate": ""}])),
            )
            .ok(ASSET_BALANCES, eth_balance("0"))
            .ok(ASSET_BALANCES, eth_balance("0"))
            .ok(ASSET_BALANCES, eth_balance("2.5"))
            .ok(TRANSFER, transfer_ok());
        let workflow = RedemptionWorkflow::new(OkxConnector::new(transport.clone()));

        let start = Instant::now();
        let report = workflow.run("OKX:ETHUSDT.P").await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(1500));
        assert_eq!(report.stage, ReconciliationStage::Transferred);
        assert_eq!(report.receipt.transfer_id, "754147");

        let redeem = &transport.sent_to(REDEEM)[0];
        assert_eq!(redeem.method, Method::POST);
        assert_eq!(
            redeem.body.clone().unwrap(),
            json!({"ccy": "ETH", "amt": "2.5000", "side": "redempt"})
        );

        let transfer = &transport.sent_to(TRANSFER)[0];
        assert!(transfer.authenticated);
        assert_eq!(
            transfer.body.clone().unwrap(),
            json!({"ccy": "ETH", "amt": "2.5000", "from": "6", "to": "18"})
        );
        assert_eq!(transport.sent_to(ASSET_BALANCES).len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_redemption_still_transfers_snapshot() {
        let transport = ScriptedTransport::new()
            .ok(ASSET_BALANCES, okx_ok(json!([])))
            .ok(
                SAVINGS_BALANCE,
                okx_ok(json!([{"ccy": "ETH", "amt": "0.7"}])),
            )
            .ok(
                REDEEM,
                json!({"code": "51000", "msg": "Parameter amt error", "data": []}),
            )
            .ok(TRANSFER, transfer_ok());
        let workflow = RedemptionWorkflow::new(OkxConnector::new(transport.clone()));

        let report = workflow.run("ETH-USDT").await.unwrap();

        assert_eq!(report.redemption_error.as_deref().map(|m| m.contains("Parameter amt error")), Some(true));
        assert_eq!(transport.sent_to(ASSET_BALANCES).len(), 1);
        assert_eq!(
            transport.sent_to(TRANSFER)[0].body.clone().unwrap()["amt"],
            json!("0.0000")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_candles_back_off_one_second_each() {
        let too_many = || {
            Reply::Status(
                429,
                json!({"code": "50011", "msg": "Too Many Requests"}).to_string(),
            )
        };
        let transport = ScriptedTransport::new()
            .reply(CANDLES, too_many())
            .reply(CANDLES, too_many())
            .reply(CANDLES, too_many())
            .ok(
                CANDLES,
                okx_ok(json!([
                    ["1704067260000", "42010.1", "42050", "42000", "42040.5", "12.3", "517000", "517000", "1"],
                    ["1704067200000", "42000", "42020", "41990", "42010.1", "8.1", "340000", "340000", "0"]
                ])),
            );
        let okx = OkxConnector::new(transport.clone()).with_retry_policy(RetryPolicy::default());

        let start = Instant::now();
        let candles = okx
            .market
            .fetch_candles(
                &InstrumentId::from_canonical("BTC-USDT").unwrap(),
                KlineInterval::Minutes1,
                Some(1_704_067_200_000),
                Some(1_704_067_320_000),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(candles.len(), 2);
        assert!(candles[0].confirmed);
        assert!(!candles[1].confirmed);
        assert_eq!(transport.sent_to(CANDLES).len(), 4);
        println!("✅ OKX candles after {} retries", 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_surfaces_last_error() {
        let transport = ScriptedTransport::new()
            .reply(CANDLES, Reply::Status(503, "unavailable".to_string()))
            .reply(CANDLES, Reply::Status(503, "unavailable".to_string()));
        let okx = OkxConnector::new(transport).with_retry_policy(RetryPolicy {
            backoff: Duration::from_millis(200),
            max_attempts: Some(2),
        });

        let err = okx
            .market
            .fetch_candles(
                &InstrumentId::from_canonical("ETH-USDT").unwrap(),
                KlineInterval::Hours6,
                None,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::HttpStatus { status: 503, .. }));
    }
}
