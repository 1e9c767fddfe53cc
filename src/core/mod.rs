pub mod config;
pub mod errors;
pub mod kernel;
pub mod symbol;
pub mod traits;
pub mod types;
