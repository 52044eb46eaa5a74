pub mod bootstrap;
pub mod config;
pub mod error;
pub mod runtime;

pub use runtime::{AggregatorConfig, ContractAddresses};
