//! Multi-step account workflows built on the exchange gateways.

pub mod reconcile;

pub use reconcile::{
    ReconciliationConfig, ReconciliationReport, ReconciliationStage, ReconciliationState,
    RedemptionWorkflow,
};
