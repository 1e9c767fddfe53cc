//! Display-ticker normalization.
//!
//! Charting tools hand us tickers such as `OKX:BTCUSDT.P`; exchanges want
//! `BTC-USDT` (OKX) or `BTC_USDT` (GateIO), and the funding endpoints want
//! the bare base currency `BTC`. Everything here is pure.

use crate::core::errors::ExchangeError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// Exchange prefixes stripped from display tickers (matched case-insensitively).
const EXCHANGE_PREFIXES: &[&str] = &["OKX:", "GATEIO:", "GATE:"];

/// Perpetual-contract marker appended by charting tools.
const PERPETUAL_SUFFIX: &str = ".P";

/// Quote currencies recognised when splitting a pair.
pub const DEFAULT_QUOTE_CURRENCIES: &[&str] = &["USDT", "USDC", "USD"];

/// Canonical instrument id, e.g. `BTC-USDT` or `BTC_USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// Accept an id that is already in exchange form (`BASE-QUOTE`,
    /// `BASE_QUOTE`, or a derivative id such as `BTC-USDT-SWAP`).
    pub fn from_canonical(raw: &str) -> Result<Self, ExchangeError> {
        let trimmed = raw.trim();
        let valid = trimmed
            .split(['-', '_'])
            .filter(|part| !part.is_empty())
            .count()
            >= 2
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(ExchangeError::UnrecognizedPairFormat(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bare currency code, e.g. `ETH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Accept a bare currency code such as `usdt` or `BTC`.
    pub fn new(code: &str) -> Result<Self, ExchangeError> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExchangeError::UnrecognizedPairFormat(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps display tickers to one exchange's canonical identifiers.
#[derive(Debug, Clone)]
pub struct SymbolNormalizer {
    separator: char,
    quotes: Vec<String>,
}

impl SymbolNormalizer {
    /// Build a normalizer. Quote codes are probed longest first whatever
    /// order they are given in, so `USD` never shadows `USDT`.
    pub fn new(separator: char, quotes: &[&str]) -> Self {
        let mut quotes: Vec<String> = quotes.iter().map(|q| q.to_ascii_uppercase()).collect();
        quotes.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { separator, quotes }
    }

    pub fn okx() -> Self {
        Self::new('-', DEFAULT_QUOTE_CURRENCIES)
    }

    pub fn gateio() -> Self {
        Self::new('_', DEFAULT_QUOTE_CURRENCIES)
    }

    /// `OKX:BTCUSDT.P` -> `BTC-USDT`
    pub fn to_instrument_id(&self, ticker: &str) -> Result<InstrumentId, ExchangeError> {
        let (base, quote) = self.split(ticker)?;
        Ok(InstrumentId(format!("{}{}{}", base, self.separator, quote)))
    }

    /// `OKX:ETHUSDC` -> `ETH`
    pub fn to_base_currency(&self, ticker: &str) -> Result<Currency, ExchangeError> {
        let (base, _) = self.split(ticker)?;
        Ok(Currency(base))
    }

    fn split(&self, ticker: &str) -> Result<(String, String), ExchangeError> {
        let pair = strip_decorations(ticker);

        for quote in &self.quotes {
            if let Some(base) = pair.strip_suffix(quote.as_str()) {
                let base: String = base.chars().filter(|c| *c != '-' && *c != '_').collect();
                if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
                    break;
                }
                return Ok((base, quote.clone()));
            }
        }

        Err(ExchangeError::UnrecognizedPairFormat(ticker.to_string()))
    }
}

fn strip_decorations(ticker: &str) -> String {
    let mut pair = ticker.trim().to_ascii_uppercase();

    if let Some(prefix) = EXCHANGE_PREFIXES.iter().find(|p| pair.starts_with(**p)) {
        pair = pair[prefix.len()..].to_string();
    }
    if let Some(stripped) = pair.strip_suffix(PERPETUAL_SUFFIX) {
        pair = stripped.to_string();
    }

    pair
}

/// Decimal places used when requesting an amount of `currency`.
pub fn currency_precision(currency: &str) -> u32 {
    match currency.to_ascii_uppercase().as_str() {
        "BTC" | "ETH" | "OKB" => 4,
        _ => 2,
    }
}

/// Truncate toward zero at the currency's precision so a request never
/// exceeds what is available. The result always carries exactly that many
/// decimal places.
pub fn round_for_currency(currency: &str, amount: Decimal) -> Decimal {
    let dp = currency_precision(currency);
    let mut rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::ToZero);
    rounded.rescale(dp);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_instrument_id_strips_prefix_and_suffix() {
        let okx = SymbolNormalizer::okx();
        assert_eq!(okx.to_instrument_id("OKX:BTCUSDT.P").unwrap().as_str(), "BTC-USDT");
        assert_eq!(okx.to_instrument_id("okx:ethusdc").unwrap().as_str(), "ETH-USDC");

        let gate = SymbolNormalizer::gateio();
        assert_eq!(gate.to_instrument_id("OKX:BTCUSDT.P").unwrap().as_str(), "BTC_USDT");
        assert_eq!(gate.to_instrument_id("GATEIO:SOLUSDT").unwrap().as_str(), "SOL_USDT");
    }

    #[test]
    fn test_to_base_currency() {
        let okx = SymbolNormalizer::okx();
        assert_eq!(okx.to_base_currency("ETHUSDC").unwrap().as_str(), "ETH");
        assert_eq!(okx.to_base_currency("OKX:BTC-USDT.P").unwrap().as_str(), "BTC");
    }

    #[test]
    fn test_longer_quote_wins_regardless_of_order() {
        let normalizer = SymbolNormalizer::new('-', &["USD", "USDT"]);
        assert_eq!(normalizer.to_instrument_id("XUSDT").unwrap().as_str(), "X-USDT");
        assert_eq!(normalizer.to_instrument_id("XUSD").unwrap().as_str(), "X-USD");
    }

    #[test]
    fn test_unrecognized_pairs_fail() {
        let okx = SymbolNormalizer::okx();
        for ticker in [
            "BTCEUR",
            "",
            "OKX:",
            "USDT",
            "OKX:BTC.P",
            "OKX:ETH/USDT",
            "BTC USDT",
        ] {
            assert!(
                matches!(
                    okx.to_instrument_id(ticker),
                    Err(ExchangeError::UnrecognizedPairFormat(_))
                ),
                "{ticker} should be rejected"
            );
            assert!(matches!(
                okx.to_base_currency(ticker),
                Err(ExchangeError::UnrecognizedPairFormat(_))
            ));
        }
    }

    #[test]
    fn test_from_canonical() {
        assert_eq!(
            InstrumentId::from_canonical("btc-usdt-swap").unwrap().as_str(),
            "BTC-USDT-SWAP"
        );
        assert!(InstrumentId::from_canonical("BTCUSDT").is_err());
        assert!(InstrumentId::from_canonical("BTC-").is_err());
        assert!(InstrumentId::from_canonical("BTC/USDT").is_err());
    }

    #[test]
    fn test_currency_validation() {
        assert_eq!(Currency::new(" usdt ").unwrap().as_str(), "USDT");
        assert!(Currency::new("").is_err());
        assert!(Currency::new("BTC-USDT").is_err());
    }

    #[test]
    fn test_round_for_currency_truncates() {
        assert_eq!(round_for_currency("USDT", dec!(12.3456)), dec!(12.34));
        assert_eq!(round_for_currency("BTC", dec!(0.123456)), dec!(0.1234));
        assert_eq!(round_for_currency("USDT", dec!(12.999)), dec!(12.99));
        assert_eq!(round_for_currency("DOGE", dec!(7.129)), dec!(7.12));
        assert_eq!(round_for_currency("OKB", dec!(3.99999)), dec!(3.9999));
    }

    #[test]
    fn test_round_for_currency_fixed_scale() {
        assert_eq!(round_for_currency("ETH", dec!(2.5)).to_string(), "2.5000");
        assert_eq!(round_for_currency("USDC", dec!(0)).to_string(), "0.00");
        assert_eq!(round_for_currency("USDT", dec!(100)).to_string(), "100.00");
    }
}
