pub mod core;
pub mod exchanges;
pub mod notify;
pub mod workflows;

pub use core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    symbol::{Currency, InstrumentId, SymbolNormalizer},
    traits::{FundingGateway, Notifier},
    types::*,
};
pub use exchanges::gateio::GateioConnector;
pub use exchanges::okx::OkxConnector;
pub use workflows::{ReconciliationConfig, ReconciliationReport, ReconciliationStage, RedemptionWorkflow};
