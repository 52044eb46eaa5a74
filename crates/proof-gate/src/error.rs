use thiserror::Error;

/// The verifier could not produce a clean yes/no answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("verifier fault: {0}")]
pub struct VerifierFault(pub String);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofGateError {
    /// Caller bug: the declared length is zero or exceeds the buffer.
    #[error("proof length {length} out of bounds (must be 1..={capacity})")]
    LengthOutOfBounds { length: usize, capacity: usize },

    /// The verifier malfunctioned. Must not be treated as an invalid proof.
    #[error(transparent)]
    VerifierFault(#[from] VerifierFault),
}
