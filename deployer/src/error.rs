use std::path::PathBuf;

use alloy::primitives::B256;
use thiserror::Error;

use crate::orchestrator::Phase;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("failed to sign or send transaction: {0}")]
    Transport(String),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("deployment transaction {0} produced no contract address")]
    NoContractAddress(B256),
}

impl From<alloy::transports::TransportError> for TxError {
    fn from(e: alloy::transports::TransportError) -> Self {
        TxError::Transport(e.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for TxError {
    fn from(e: alloy::providers::PendingTransactionError) -> Self {
        TxError::Transport(e.to_string())
    }
}

/// Problems with the plan itself, detected before any transaction is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("name {0} is declared more than once")]
    DuplicateName(String),

    #[error("{owner} references unknown address {dependency}")]
    UnknownDependency { owner: String, dependency: String },

    #[error("initialization order of {owner} names {dependency}, which is not an upgradeable component")]
    NotAComponent { owner: String, dependency: String },

    #[error("initialization order contains a cycle through {0}")]
    InitializationCycle(String),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {name} has invalid bytecode: {reason}")]
    InvalidBytecode { name: String, reason: String },

    #[error("no artifact loaded for {0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// A transaction failed. Earlier phases stay deployed on-chain; recovery
    /// is a fresh run.
    #[error("phase {phase} failed at {component}: {source}")]
    PhaseFailure {
        phase: Phase,
        component: String,
        #[source]
        source: TxError,
    },
}
