use crate::core::symbol::InstrumentId;
use serde::{Deserialize, Serialize};

/// Error body returned by Gate.io on rejected requests
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GateioErrorBody {
    pub label: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioTicker {
    pub currency_pair: String,
    pub last: String,
    pub lowest_ask: String,
    pub highest_bid: String,
    pub change_percentage: String,
    pub base_volume: String,
    pub quote_volume: String,
    pub high_24h: String,
    pub low_24h: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioSpotAccount {
    pub currency: String,
    pub available: String,
    pub locked: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct GateioSpotOrderRequest {
    pub currency_pair: InstrumentId,
    pub side: String, // buy, sell
    #[serde(rename = "type")]
    pub order_type: String, // limit, market
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>, // gtc, ioc, poc, fok
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>, // spot, margin, cross_margin, unified
    /// Client order id; must start with `t-`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioSpotOrder {
    pub id: String,
    pub text: String,
    pub currency_pair: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub amount: String,
    pub price: String,
    pub time_in_force: String,
    pub left: String,
    pub filled_total: String,
    pub avg_deal_price: String,
    pub status: String, // open, closed, cancelled
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct GateioFuturesOrderRequest {
    pub contract: InstrumentId,
    /// Contracts; positive buys, negative sells, zero with `close` closes
    pub size: i64,
    /// `"0"` with `tif = ioc` is a market order
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioFuturesOrder {
    pub id: i64,
    pub text: String,
    pub contract: String,
    pub size: i64,
    pub left: i64,
    pub price: String,
    pub fill_price: String,
    pub tif: String,
    pub status: String, // open, finished
    pub finish_as: String,
    pub is_reduce_only: bool,
    pub is_close: bool,
    pub create_time: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioPosition {
    pub contract: String,
    pub size: i64,
    /// `"0"` means cross margin
    pub leverage: String,
    pub leverage_max: String,
    pub margin: String,
    pub entry_price: String,
    pub liq_price: String,
    pub mark_price: String,
    pub unrealised_pnl: String,
    pub mode: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GateioContract {
    pub name: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    /// Base currency per contract
    pub quanto_multiplier: String,
    pub leverage_min: String,
    pub leverage_max: String,
    pub mark_price: String,
    pub order_size_min: i64,
    pub order_size_max: i64,
}
