pub mod client;
pub mod error;

pub use client::{ChainClient, ChainConnector, ClientKind, RpcConnector, connect_chain, query_chain_id};
pub use error::{ChainError, Result};
