pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, OkxBuilder, OKX_BASE_URL};
pub use connector::{
    Account, CandleFetchError, Finance, MarketData, OkxConnector, RetryPolicy, Trading,
};
pub use rest::OkxRest;
pub use signer::{okx_signature, OkxSigner};
pub use types::{
    OkxAccountInfo, OkxAlgoOrder, OkxAlgoOrderRequest, OkxAlgoOrderResponse, OkxAssetBalance,
    OkxBalance, OkxCancelAlgoOrderRequest, OkxInstrument, OkxLeverageInfo, OkxOrder,
    OkxOrderRequest, OkxOrderResponse, OkxOrdersHistoryQuery, OkxPosition, OkxResponse,
    OkxSavingsBalance, OkxSavingsRequest, OkxSavingsResponse, OkxSavingsSide,
    OkxSetLeverageRequest, OkxTicker, OkxTransferRequest, OkxTransferResponse,
};
