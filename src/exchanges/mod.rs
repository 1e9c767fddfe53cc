pub mod gateio;
pub mod okx;
