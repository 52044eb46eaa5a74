//! Signing identity for the aggregator and the deployer.
//! Secret key material stays inside dedicated types and is never formatted.

pub mod error;
pub mod hex;
pub mod identity;

pub use error::IdentityError;
pub use identity::{Identity, SigningKey, derive_identity};
