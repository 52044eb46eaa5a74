use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Endpoint is malformed, uses an unsupported transport, or did not answer.
    #[error("cannot connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    /// The endpoint was reachable but an RPC call failed afterwards.
    #[error("chain query failed: {0}")]
    ChainQuery(String),
}

impl ChainError {
    pub(crate) fn connection(endpoint: &str, reason: impl ToString) -> Self {
        ChainError::Connection {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}
