use crate::core::symbol::{Currency, InstrumentId};
use crate::core::types::AccountKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OKX API standard response wrapper
#[derive(Debug, Deserialize, Serialize)]
pub struct OkxResponse<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: T,
}

/// Account type codes used by `/api/v5/asset/transfer`
pub const OKX_FUNDING_ACCOUNT: &str = "6";
pub const OKX_TRADING_ACCOUNT: &str = "18";

pub const fn okx_account_code(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Funding => OKX_FUNDING_ACCOUNT,
        AccountKind::Trading => OKX_TRADING_ACCOUNT,
    }
}

/// OKX instrument information
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxInstrument {
    pub inst_type: String, // SPOT, MARGIN, SWAP, FUTURES, OPTION
    pub inst_id: String,
    pub uly: String,
    pub inst_family: String,
    pub base_ccy: String,
    pub quote_ccy: String,
    pub settle_ccy: String,
    pub ct_val: String, // Contract value
    pub ct_mult: String,
    pub ct_val_ccy: String,
    pub lever: String, // Max leverage
    pub tick_sz: String,
    pub lot_sz: String,
    pub min_sz: String,
    pub state: String, // live, suspend, preopen, test
}

/// OKX Ticker data
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxTicker {
    pub inst_type: String,
    pub inst_id: String,
    pub last: String,
    pub last_sz: String,
    pub ask_px: String,
    pub ask_sz: String,
    pub bid_px: String,
    pub bid_sz: String,
    pub open_24h: String,
    pub high_24h: String,
    pub low_24h: String,
    pub vol_ccy_24h: String,
    pub vol_24h: String,
    pub ts: String,
    pub sod_utc0: String,
    pub sod_utc8: String,
}

/// Trading account balance for one currency
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxBalance {
    pub ccy: String,
    pub eq: String,
    pub cash_bal: String,
    pub avail_eq: String,
    pub dis_eq: String,
    pub avail_bal: String,
    pub frozen_bal: String,
    pub eq_usd: String,
    pub upl: String,
}

/// Trading account summary
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxAccountInfo {
    pub total_eq: String,
    pub iso_eq: String,
    pub adj_eq: String,
    pub u_time: String,
    pub details: Vec<OkxBalance>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxPosition {
    pub inst_type: String,
    pub inst_id: String,
    pub pos_id: String,
    pub mgn_mode: String,
    pub pos_side: String,
    pub pos: String,
    pub avail_pos: String,
    pub avg_px: String,
    pub mark_px: String,
    pub liq_px: String,
    pub upl: String,
    pub upl_ratio: String,
    pub lever: String,
    pub margin: String,
    pub notional_usd: String,
    pub c_time: String,
    pub u_time: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxLeverageInfo {
    pub ccy: String,
    pub inst_id: String,
    pub mgn_mode: String,
    pub pos_side: String,
    pub lever: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxSetLeverageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inst_id: Option<InstrumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccy: Option<Currency>,
    pub lever: String,
    pub mgn_mode: String, // cross, isolated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>, // long, short (isolated long/short mode only)
}

/// Take-profit leg attached to a regular order
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OkxAttachedAlgo {
    pub tp_trigger_px: String,
    pub tp_ord_px: String,
}

/// OKX Order request
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxOrderRequest {
    pub inst_id: InstrumentId,
    pub td_mode: String, // cash, cross, isolated
    pub side: String,    // buy, sell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
    pub ord_type: String, // market, limit, post_only, fok, ioc
    pub sz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tgt_ccy: Option<String>, // base_ccy, quote_ccy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attach_algo_ords: Vec<OkxAttachedAlgo>,
}

/// Per-item acknowledgement for order placement and cancellation
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxOrderResponse {
    pub ord_id: String,
    pub cl_ord_id: String,
    pub tag: String,
    pub s_code: String,
    pub s_msg: String,
}

/// OKX Order details
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxOrder {
    pub inst_type: String,
    pub inst_id: String,
    pub ord_id: String,
    pub cl_ord_id: String,
    pub px: String,
    pub sz: String,
    pub ord_type: String,
    pub side: String,
    pub pos_side: String,
    pub td_mode: String,
    pub acc_fill_sz: String,
    pub fill_px: String,
    pub avg_px: String,
    pub state: String, // live, partially_filled, filled, canceled
    pub lever: String,
    pub fee_ccy: String,
    pub fee: String,
    pub pnl: String,
    pub category: String,
    pub u_time: String,
    pub c_time: String,
}

/// Stand-alone take-profit / stop-loss order
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxAlgoOrderRequest {
    pub inst_id: InstrumentId,
    pub td_mode: String,
    pub side: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
    pub ord_type: String, // conditional, oco, trigger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_fraction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_trigger_px: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_trigger_px_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_ord_px: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_px: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_px_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_ord_px: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algo_cl_ord_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxAlgoOrderResponse {
    pub algo_id: String,
    pub algo_cl_ord_id: String,
    pub s_code: String,
    pub s_msg: String,
}

/// Pending algo order as listed by `orders-algo-pending`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxAlgoOrder {
    pub algo_id: String,
    pub algo_cl_ord_id: String,
    pub inst_type: String,
    pub inst_id: String,
    pub ord_type: String,
    pub side: String,
    pub pos_side: String,
    pub sz: String,
    pub state: String,
    pub tp_trigger_px: String,
    pub tp_ord_px: String,
    pub sl_trigger_px: String,
    pub sl_ord_px: String,
    pub c_time: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxCancelAlgoOrderRequest {
    pub algo_id: String,
    pub inst_id: InstrumentId,
}

/// Filters for `/api/v5/trade/orders-history-archive`; `inst_type` is required.
#[derive(Debug, Clone, Default)]
pub struct OkxOrdersHistoryQuery {
    pub inst_type: String,
    pub inst_family: Option<String>,
    pub inst_id: Option<String>,
    pub ord_type: Option<String>,
    pub state: Option<String>,
    pub category: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub limit: Option<u32>,
}

impl OkxOrdersHistoryQuery {
    pub fn new(inst_type: impl Into<String>) -> Self {
        Self {
            inst_type: inst_type.into(),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("instType", self.inst_type.clone())];
        let optional = [
            ("instFamily", &self.inst_family),
            ("instId", &self.inst_id),
            ("ordType", &self.ord_type),
            ("state", &self.state),
            ("category", &self.category),
            ("after", &self.after),
            ("before", &self.before),
            ("begin", &self.begin),
            ("end", &self.end),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.push((key, value.clone()));
            }
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Funding account balance
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxAssetBalance {
    pub ccy: String,
    pub bal: String,
    pub frozen_bal: String,
    pub avail_bal: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxTransferRequest {
    /// 0: within account, 1: master to sub, 2: sub to master
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transfer_type: Option<String>,
    pub ccy: Currency,
    pub amt: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_acct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_trans: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_pos_risk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl OkxTransferRequest {
    /// Transfer within the same account between two account codes
    pub fn new(ccy: Currency, amount: Decimal, from: AccountKind, to: AccountKind) -> Self {
        Self {
            transfer_type: None,
            ccy,
            amt: amount.to_string(),
            from: okx_account_code(from).to_string(),
            to: okx_account_code(to).to_string(),
            sub_acct: None,
            loan_trans: None,
            omit_pos_risk: None,
            client_id: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxTransferResponse {
    pub trans_id: String,
    pub ccy: String,
    pub client_id: String,
    pub from: String,
    pub amt: String,
    pub to: String,
}

/// Simple-earn savings holding
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxSavingsBalance {
    pub ccy: String,
    pub amt: String,
    pub earnings: String,
    pub rate: String,
    pub loan_amt: String,
    pub pending_amt: String,
    pub redempt_amt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OkxSavingsSide {
    Purchase,
    Redempt,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxSavingsRequest {
    pub ccy: Currency,
    pub amt: String,
    pub side: OkxSavingsSide,
    /// Lending rate; purchase only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxSavingsResponse {
    pub ccy: String,
    pub amt: String,
    pub side: String,
    pub rate: String,
}

/// Candle row: `[ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]`
pub type OkxCandleRow = Vec<String>;
