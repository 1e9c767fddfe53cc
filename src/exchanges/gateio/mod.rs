pub mod builder;
pub mod connector;
pub mod rest;
pub mod signer;
pub mod types;

pub use builder::{build_connector, GateioBuilder, GATEIO_BASE_URL, GATEIO_TESTNET_URL};
pub use connector::GateioConnector;
pub use rest::GateioRest;
pub use signer::{gateio_signature, GateioSigner};
pub use types::{
    GateioContract, GateioFuturesOrder, GateioFuturesOrderRequest, GateioPosition,
    GateioSpotAccount, GateioSpotOrder, GateioSpotOrderRequest, GateioTicker,
};
