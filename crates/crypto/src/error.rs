use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The secret is not a valid secp256k1 scalar encoding. The reason never
    /// contains key material.
    #[error("invalid private key format: {0}")]
    InvalidKeyFormat(&'static str),

    #[error("signer is bound to chain {signer} but the network reports chain {network}")]
    ChainIdMismatch { signer: u64, network: u64 },
}
