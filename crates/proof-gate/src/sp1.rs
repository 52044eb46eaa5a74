//! SP1 verifier linked from the prebuilt `libsp1_verifier.a`.

use crate::{ProofVerifier, VerifierFault};

unsafe extern "C" {
    fn verify_sp1_proof_ffi(proof_buffer: *const u8, proof_len: u32) -> bool;
}

/// Verifies SP1 proofs against the verification key compiled into the
/// static library.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sp1Verifier;

impl ProofVerifier for Sp1Verifier {
    fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault> {
        let len = u32::try_from(proof.len())
            .map_err(|_| VerifierFault(format!("proof length {} exceeds u32", proof.len())))?;
        // SAFETY: the pointer is valid for `len` bytes for the duration of
        // the call and the library does not retain it.
        Ok(unsafe { verify_sp1_proof_ffi(proof.as_ptr(), len) })
    }
}
