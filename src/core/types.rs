use crate::core::symbol::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Okx,
    #[serde(rename = "GATEIO")]
    Gateio,
}

impl Exchange {
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Okx => "OKX",
            Self::Gateio => "GATEIO",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Candle interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes1,
    Minutes3,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours2,
    Hours4,
    Hours6,
    Hours12,
    Days1,
    Days2,
    Days3,
    Weeks1,
    Months1,
    Months3,
}

impl KlineInterval {
    /// Bar label used by the OKX candle endpoints. Intervals of six hours
    /// and longer are requested UTC-aligned.
    pub const fn to_okx_bar(self) -> &'static str {
        match self {
            Self::Minutes1 => "1m",
            Self::Minutes3 => "3m",
            Self::Minutes5 => "5m",
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Hours1 => "1H",
            Self::Hours2 => "2H",
            Self::Hours4 => "4H",
            Self::Hours6 => "6Hutc",
            Self::Hours12 => "12Hutc",
            Self::Days1 => "1Dutc",
            Self::Days2 => "2Dutc",
            Self::Days3 => "3Dutc",
            Self::Weeks1 => "1Wutc",
            Self::Months1 => "1Mutc",
            Self::Months3 => "3Mutc",
        }
    }
}

/// One OHLCV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub confirmed: bool,
}

/// Available balance of one currency in the funding (asset) account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBalance {
    pub currency: String,
    pub available: Decimal,
}

/// Amount of one currency held in the savings (yield) product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsBalance {
    pub currency: String,
    pub amount: Decimal,
}

/// Sub-accounts that funds can be moved between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Funding,
    Trading,
}

/// Internal transfer between two sub-accounts of the same user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub currency: Currency,
    pub amount: Decimal,
    pub from: AccountKind,
    pub to: AccountKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transfer_id: String,
    pub currency: String,
    pub amount: String,
}

/// Outcome flavour attached to a push notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStatus {
    Success,
    Failure,
}

impl NotifyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Parse a numeric string from an exchange payload; blanks count as zero.
pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, crate::core::errors::ExchangeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse::<Decimal>().map_err(|e| {
        crate::core::errors::ExchangeError::DeserializationError(format!(
            "Invalid {} '{}': {}",
            field, raw, e
        ))
    })
}
