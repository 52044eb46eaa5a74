//! Boundary check that admits externally produced proofs into the
//! aggregator. The gate owns buffer sizing, length validation and result
//! interpretation; the verification itself belongs to a [`ProofVerifier`].

pub mod buffer;
pub mod error;
pub mod gate;
#[cfg(feature = "sp1")]
pub mod sp1;

pub use buffer::{MAX_PROOF_SIZE, ProofBuffer};
pub use error::{ProofGateError, VerifierFault};
pub use gate::{ProofGate, ProofVerifier, Verdict};
