use crate::ProofGateError;

/// Largest proof accepted by the gate (1 MiB).
pub const MAX_PROOF_SIZE: usize = 1024 * 1024;

/// Fixed-capacity proof buffer with a declared logical length.
///
/// Storage lives on the heap; a 1 MiB array is too large for most thread
/// stacks.
pub struct ProofBuffer<const CAP: usize = MAX_PROOF_SIZE> {
    bytes: Box<[u8; CAP]>,
    length: usize,
}

impl<const CAP: usize> ProofBuffer<CAP> {
    pub const CAPACITY: usize = CAP;

    /// Empty buffer; its declared length is zero and it is not yet eligible
    /// for verification.
    pub fn new() -> Self {
        Self {
            bytes: zeroed(),
            length: 0,
        }
    }

    /// Copies `proof` into a fresh buffer. Fails if it does not fit.
    pub fn from_proof(proof: &[u8]) -> Result<Self, ProofGateError> {
        if proof.len() > CAP {
            return Err(ProofGateError::LengthOutOfBounds {
                length: proof.len(),
                capacity: CAP,
            });
        }
        let mut buffer = Self::new();
        buffer.bytes[..proof.len()].copy_from_slice(proof);
        buffer.length = proof.len();
        Ok(buffer)
    }

    /// Wraps raw storage with a caller-declared length, as received across
    /// the verifier boundary. The length is not validated here; the gate
    /// rejects out-of-range values before touching the bytes.
    pub fn with_declared_length(bytes: Box<[u8; CAP]>, length: usize) -> Self {
        Self { bytes, length }
    }

    pub fn declared_len(&self) -> usize {
        self.length
    }

    pub fn as_array(&self) -> &[u8; CAP] {
        &self.bytes
    }
}

impl<const CAP: usize> Default for ProofBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

fn zeroed<const CAP: usize>() -> Box<[u8; CAP]> {
    let slice = vec![0u8; CAP].into_boxed_slice();
    match slice.try_into() {
        Ok(array) => array,
        Err(_) => unreachable!("boxed slice has exactly CAP elements"),
    }
}
