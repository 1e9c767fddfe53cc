use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::symbol::{InstrumentId, SymbolNormalizer};
use crate::core::types::{parse_decimal, Candle, KlineInterval};
use crate::exchanges::okx::{
    rest::OkxRest,
    types::{OkxCandleRow, OkxInstrument, OkxTicker},
};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

const HISTORY_CANDLES_ENDPOINT: &str = "/api/v5/market/history-candles";
const CANDLE_PAGE_LIMIT: &str = "100";

/// Retry schedule for candle polling
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Fixed wait between attempts
    pub backoff: Duration,
    /// Total attempts including the first; `None` retries until cancelled
    pub max_attempts: Option<usize>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// Outcome of one candle request that did not return rows
#[derive(Debug)]
pub enum CandleFetchError {
    /// Throttling, transport failure or an error status; worth repeating
    Retryable(ExchangeError),
    /// Undecodable payload or an exchange rejection; repeating won't help
    Fatal(ExchangeError),
}

impl CandleFetchError {
    fn classify(error: ExchangeError) -> Self {
        if error.is_transient() {
            Self::Retryable(error)
        } else {
            Self::Fatal(error)
        }
    }

    const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    fn into_inner(self) -> ExchangeError {
        match self {
            Self::Retryable(e) | Self::Fatal(e) => e,
        }
    }
}

/// OKX market data
#[derive(Debug, Clone)]
pub struct MarketData<R: RestClient> {
    rest: OkxRest<R>,
    normalizer: SymbolNormalizer,
    retry: RetryPolicy,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
            normalizer: SymbolNormalizer::okx(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<R: RestClient> MarketData<R> {
    pub async fn get_ticker(&self, inst_id: &InstrumentId) -> Result<OkxTicker, ExchangeError> {
        self.rest.get_ticker(inst_id.as_str()).await
    }

    /// Last traded price for a display ticker such as `OKX:BTCUSDT.P`
    pub async fn ticker_last(&self, ticker: &str) -> Result<Decimal, ExchangeError> {
        let inst_id = self.normalizer.to_instrument_id(ticker)?;
        let okx_ticker = self.get_ticker(&inst_id).await?;
        parse_decimal("last", &okx_ticker.last)
    }

    pub async fn get_instruments(
        &self,
        inst_type: &str,
        inst_id: Option<&InstrumentId>,
    ) -> Result<Vec<OkxInstrument>, ExchangeError> {
        self.rest
            .get_instruments(inst_type, inst_id.map(InstrumentId::as_str))
            .await
    }

    /// Contract face value (`ctVal`) of a derivative instrument
    pub async fn contract_value(
        &self,
        inst_type: &str,
        inst_id: &InstrumentId,
    ) -> Result<Decimal, ExchangeError> {
        let instrument = self
            .get_instruments(inst_type, Some(inst_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::NotFound(format!("instrument {}", inst_id)))?;
        parse_decimal("ctVal", &instrument.ct_val)
    }

    /// Candles between `start` and `end` (epoch ms, exclusive), newest first.
    /// Without bounds the latest page is returned.
    ///
    /// Throttling and transport failures are retried on a fixed interval
    /// until rows arrive, the retry budget runs out or `cancel` fires.
    #[instrument(skip(self, cancel), fields(exchange = "okx", inst_id = %inst_id))]
    pub async fn fetch_candles(
        &self,
        inst_id: &InstrumentId,
        interval: KlineInterval,
        start: Option<i64>,
        end: Option<i64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candle>, ExchangeError> {
        let before = start.map(|ts| ts.to_string());
        let after = end.map(|ts| ts.to_string());

        let mut query = vec![("instId", inst_id.as_str()), ("bar", interval.to_okx_bar())];
        if let Some(before) = &before {
            query.push(("before", before.as_str()));
        }
        if let Some(after) = &after {
            query.push(("after", after.as_str()));
        }
        query.push(("limit", CANDLE_PAGE_LIMIT));

        let schedule = FixedInterval::new(self.retry.backoff);
        let schedule: Box<dyn Iterator<Item = Duration> + Send> = match self.retry.max_attempts {
            Some(attempts) => Box::new(schedule.take(attempts.saturating_sub(1))),
            None => Box::new(schedule),
        };

        let mut attempt = 0_usize;
        let action = || {
            attempt += 1;
            let attempt = attempt;
            let query = query.as_slice();
            async move {
                let result = self.fetch_candle_window(query).await;
                if let Err(CandleFetchError::Retryable(e)) = &result {
                    warn!(attempt, error = %e, "candle request failed, retrying");
                }
                result
            }
        };

        tokio::select! {
            () = cancel.cancelled() => Err(ExchangeError::Cancelled),
            result = RetryIf::start(schedule, action, CandleFetchError::is_retryable) => {
                result.map_err(CandleFetchError::into_inner)
            }
        }
    }

    async fn fetch_candle_window(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<Candle>, CandleFetchError> {
        let response = self
            .rest
            .rest_client()
            .get(HISTORY_CANDLES_ENDPOINT, query, false)
            .await
            .map_err(CandleFetchError::classify)?;

        let rows: Vec<OkxCandleRow> =
            OkxRest::<R>::decode_envelope(&response).map_err(CandleFetchError::classify)?;

        rows.iter()
            .map(|row| parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CandleFetchError::Fatal)
    }
}

fn parse_candle_row(row: &[String]) -> Result<Candle, ExchangeError> {
    if row.len() < 6 {
        return Err(ExchangeError::DeserializationError(format!(
            "Candle row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0].parse::<i64>().map_err(|e| {
        ExchangeError::DeserializationError(format!("Invalid candle timestamp '{}': {}", row[0], e))
    })?;

    Ok(Candle {
        open_time,
        open: parse_decimal("open", &row[1])?,
        high: parse_decimal("high", &row[2])?,
        low: parse_decimal("low", &row[3])?,
        close: parse_decimal("close", &row[4])?,
        volume: parse_decimal("vol", &row[5])?,
        quote_volume: match row.get(7) {
            Some(raw) => parse_decimal("volCcyQuote", raw)?,
            None => Decimal::ZERO,
        },
        confirmed: row.get(8).map_or(true, |flag| flag == "1"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::testing::{Reply, ScriptedRest};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio::time::Instant;

    fn candles_body() -> serde_json::Value {
        json!({
            "code": "0",
            "msg": "",
            "data": [
                ["1704164400000", "42000.1", "42100", "41950.5", "42050", "12.5", "525000", "525000", "1"],
                ["1704160800000", "41900", "42010", "41880", "42000.1", "8.25", "346000", "346000", "1"]
            ]
        })
    }

    fn inst() -> InstrumentId {
        InstrumentId::from_canonical("BTC-USDT").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_each_429_with_fixed_backoff() {
        let scripted = ScriptedRest::new()
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, "Too Many Requests".into()))
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, "Too Many Requests".into()))
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, "Too Many Requests".into()))
            .ok(HISTORY_CANDLES_ENDPOINT, candles_body());
        let market = MarketData::new(&scripted);

        let started = Instant::now();
        let candles = market
            .fetch_candles(
                &inst(),
                KlineInterval::Hours1,
                Some(1_704_150_000_000),
                Some(1_704_170_000_000),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(scripted.requests().len(), 4);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 1_704_164_400_000);
        assert_eq!(candles[0].close, dec!(42050));
        assert!(candles[0].confirmed);
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let scripted = ScriptedRest::new().ok(HISTORY_CANDLES_ENDPOINT, candles_body());
        let market = MarketData::new(&scripted);

        market
            .fetch_candles(&inst(), KlineInterval::Days1, Some(100), Some(200), &CancellationToken::new())
            .await
            .unwrap();

        let request = &scripted.requests()[0];
        assert!(!request.authenticated);
        assert_eq!(request.param("instId"), Some("BTC-USDT"));
        assert_eq!(request.param("bar"), Some("1Dutc"));
        assert_eq!(request.param("before"), Some("100"));
        assert_eq!(request.param("after"), Some("200"));
        assert_eq!(request.param("limit"), Some("100"));
    }

    #[tokio::test]
    async fn test_unbounded_request_asks_for_latest_page() {
        let scripted = ScriptedRest::new().ok(HISTORY_CANDLES_ENDPOINT, candles_body());
        let market = MarketData::new(&scripted);

        market
            .fetch_candles(&inst(), KlineInterval::Minutes5, None, None, &CancellationToken::new())
            .await
            .unwrap();

        let requests = scripted.requests_to(HISTORY_CANDLES_ENDPOINT);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("bar"), Some("5m"));
        assert_eq!(requests[0].param("before"), None);
        assert_eq!(requests[0].param("after"), None);
        assert_eq!(requests[0].param("limit"), Some("100"));
    }

    #[tokio::test]
    async fn test_open_ended_range_sends_only_given_bound() {
        let scripted = ScriptedRest::new().ok(HISTORY_CANDLES_ENDPOINT, candles_body());
        let market = MarketData::new(&scripted);

        market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(1_704_150_000_000), None, &CancellationToken::new())
            .await
            .unwrap();

        let request = &scripted.requests_to(HISTORY_CANDLES_ENDPOINT)[0];
        assert_eq!(request.param("before"), Some("1704150000000"));
        assert_eq!(request.param("after"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_code_and_server_errors_are_retried() {
        let scripted = ScriptedRest::new()
            .ok(HISTORY_CANDLES_ENDPOINT, json!({"code": "50011", "msg": "Too Many Requests", "data": []}))
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(503, String::new()))
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Network)
            .ok(HISTORY_CANDLES_ENDPOINT, candles_body());
        let market = MarketData::new(&scripted);

        let started = Instant::now();
        let candles = market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(0), Some(1), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_decode_failure_is_fatal_not_silent() {
        let scripted = ScriptedRest::new()
            .ok(HISTORY_CANDLES_ENDPOINT, json!({"code": "0", "msg": "", "data": [["not-a-ts", "1", "1", "1", "1", "1"]]}));
        let market = MarketData::new(&scripted);

        let err = market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(0), Some(1), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
        assert_eq!(scripted.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_application_error_is_fatal() {
        let scripted = ScriptedRest::new().ok(
            HISTORY_CANDLES_ENDPOINT,
            json!({"code": "51001", "msg": "Instrument ID does not exist", "data": []}),
        );
        let market = MarketData::new(&scripted);

        let err = market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(0), Some(1), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.exchange_message(), Some("Instrument ID does not exist"));
        assert_eq!(scripted.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_exhausted_returns_last_error() {
        let scripted = ScriptedRest::new()
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, String::new()))
            .on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, String::new()));
        let market = MarketData::new(&scripted).with_retry_policy(RetryPolicy {
            backoff: Duration::from_millis(250),
            max_attempts: Some(2),
        });

        let err = market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(0), Some(1), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(scripted.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_retry_loop() {
        let mut scripted = ScriptedRest::new();
        for _ in 0..10 {
            scripted = scripted.on(HISTORY_CANDLES_ENDPOINT, Reply::Status(429, String::new()));
        }
        let market = MarketData::new(&scripted);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            canceller.cancel();
        });

        let err = market
            .fetch_candles(&inst(), KlineInterval::Hours1, Some(0), Some(1), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Cancelled));
        assert_eq!(scripted.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_ticker_last_normalizes_display_ticker() {
        let scripted = ScriptedRest::new().ok(
            "/api/v5/market/ticker",
            json!({"code": "0", "msg": "", "data": [{"instId": "BTC-USDT", "last": "42000.5"}]}),
        );
        let market = MarketData::new(&scripted);

        assert_eq!(market.ticker_last("OKX:BTCUSDT.P").await.unwrap(), dec!(42000.5));
        assert_eq!(scripted.requests()[0].param("instId"), Some("BTC-USDT"));

        let err = market.ticker_last("BTCEUR").await.unwrap_err();
        assert!(matches!(err, ExchangeError::UnrecognizedPairFormat(_)));
        assert_eq!(scripted.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_contract_value() {
        let scripted = ScriptedRest::new()
            .ok(
                "/api/v5/public/instruments",
                json!({"code": "0", "msg": "", "data": [{"instType": "SWAP", "instId": "ETH-USDT-SWAP", "ctVal": "0.1"}]}),
            )
            .ok("/api/v5/public/instruments", json!({"code": "0", "msg": "", "data": []}));
        let market = MarketData::new(&scripted);
        let inst_id = InstrumentId::from_canonical("ETH-USDT-SWAP").unwrap();

        assert_eq!(market.contract_value("SWAP", &inst_id).await.unwrap(), dec!(0.1));
        assert!(matches!(
            market.contract_value("SWAP", &inst_id).await,
            Err(ExchangeError::NotFound(_))
        ));
    }
}
