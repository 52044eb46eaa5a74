use std::path::PathBuf;

use blockchain::ChainError;
use crypto::IdentityError;
use manifest::ManifestError;
use thiserror::Error;

/// Every way bootstrap can refuse to produce a configuration. All of them
/// are fatal: the service must not start with a partially validated set.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("invalid address for {field}: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("required contract addresses are unset: {}", .0.join(", "))]
    MissingRequiredAddresses(Vec<&'static str>),

    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("query client reports chain {query} but subscription client reports chain {subscription}")]
    ClientChainMismatch { query: u64, subscription: u64 },
}
