use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, warn};

use crate::{ProofBuffer, ProofGateError, VerifierFault};

/// Capability that checks proof bytes against statically embedded
/// verification parameters.
///
/// `Ok(false)` is a clean rejection; `Err` means the verifier could not
/// decide. Implementations must not keep mutable state across calls.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault>;
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for &V {
    fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault> {
        (**self).verify(proof)
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for Box<V> {
    fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault> {
        (**self).verify(proof)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    /// The verifier ran and rejected the proof. An expected outcome.
    VerificationFailed,
}

impl Verdict {
    pub fn is_verified(self) -> bool {
        matches!(self, Verdict::Verified)
    }
}

pub struct ProofGate<V> {
    verifier: V,
}

impl<V: ProofVerifier> ProofGate<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Validates `0 < length <= CAP`, then hands exactly `length` bytes to the
    /// verifier. Out-of-range lengths never reach the verifier.
    pub fn admit<const CAP: usize>(
        &self,
        buffer: &[u8; CAP],
        length: usize,
    ) -> Result<Verdict, ProofGateError> {
        if length == 0 || length > CAP {
            return Err(ProofGateError::LengthOutOfBounds {
                length,
                capacity: CAP,
            });
        }

        let proof = &buffer[..length];
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.verifier.verify(proof)))
            .map_err(|_| VerifierFault("verifier panicked".to_owned()))?;

        match outcome? {
            true => {
                debug!("Proof of {length} bytes verified");
                Ok(Verdict::Verified)
            }
            false => {
                debug!("Proof of {length} bytes rejected by verifier");
                Ok(Verdict::VerificationFailed)
            }
        }
    }

    pub fn admit_buffer<const CAP: usize>(
        &self,
        buffer: &ProofBuffer<CAP>,
    ) -> Result<Verdict, ProofGateError> {
        self.admit(buffer.as_array(), buffer.declared_len())
    }

    /// Boolean boundary: `true` only for a verified proof. Length violations
    /// and verifier faults are logged and collapse to `false`; callers that
    /// must tell them apart use [`ProofGate::admit`].
    pub fn verify_proof<const CAP: usize>(&self, buffer: &[u8; CAP], length: usize) -> bool {
        match self.admit(buffer, length) {
            Ok(verdict) => verdict.is_verified(),
            Err(err @ ProofGateError::LengthOutOfBounds { .. }) => {
                warn!("Rejected proof submission: {err}");
                false
            }
            Err(err @ ProofGateError::VerifierFault(_)) => {
                error!("Proof verifier malfunctioned: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PROOF_SIZE;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use test_log::test;

    /// Records every call and answers with a fixed result.
    struct SpyVerifier {
        answer: Result<bool, VerifierFault>,
        calls: AtomicUsize,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl SpyVerifier {
        fn answering(answer: Result<bool, VerifierFault>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProofVerifier for SpyVerifier {
        fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(proof.to_vec());
            self.answer.clone()
        }
    }

    struct PanickingVerifier;

    impl ProofVerifier for PanickingVerifier {
        fn verify(&self, _proof: &[u8]) -> Result<bool, VerifierFault> {
            panic!("verifier exploded")
        }
    }

    /// Accepts proofs whose first byte equals their length modulo 256.
    struct LengthTagVerifier;

    impl ProofVerifier for LengthTagVerifier {
        fn verify(&self, proof: &[u8]) -> Result<bool, VerifierFault> {
            Ok(proof.first() == Some(&(proof.len() as u8)))
        }
    }

    #[test]
    fn zero_length_never_reaches_verifier() {
        let spy = SpyVerifier::answering(Ok(true));
        let gate = ProofGate::new(&spy);
        let buffer: ProofBuffer = ProofBuffer::new();

        assert!(!gate.verify_proof(buffer.as_array(), 0));
        assert_eq!(
            gate.admit(buffer.as_array(), 0),
            Err(ProofGateError::LengthOutOfBounds {
                length: 0,
                capacity: MAX_PROOF_SIZE
            })
        );
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn oversized_length_never_reaches_verifier() {
        let spy = SpyVerifier::answering(Ok(true));
        let gate = ProofGate::new(&spy);
        let buffer = [7u8; 16];

        assert!(!gate.verify_proof(&buffer, 17));
        assert!(!gate.verify_proof(&buffer, usize::MAX));
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn forwards_exactly_declared_bytes() {
        let spy = SpyVerifier::answering(Ok(true));
        let gate = ProofGate::new(&spy);
        let mut buffer = [0u8; 16];
        buffer[..5].copy_from_slice(&[9, 8, 7, 6, 5]);

        assert!(gate.verify_proof(&buffer, 3));
        assert!(gate.verify_proof(&buffer, 16));
        assert_eq!(spy.calls(), 2);

        let seen = spy.seen.lock().unwrap();
        assert_eq!(seen[0], vec![9, 8, 7]);
        assert_eq!(seen[1].len(), 16);
    }

    #[test]
    fn returns_verifier_answer_unchanged() {
        let buffer = [1u8; 4];

        let accepting = SpyVerifier::answering(Ok(true));
        assert_eq!(
            ProofGate::new(&accepting).admit(&buffer, 4),
            Ok(Verdict::Verified)
        );

        let rejecting = SpyVerifier::answering(Ok(false));
        let gate = ProofGate::new(&rejecting);
        assert_eq!(gate.admit(&buffer, 4), Ok(Verdict::VerificationFailed));
        assert!(!gate.verify_proof(&buffer, 4));
    }

    #[test]
    fn verifier_fault_is_not_an_invalid_proof() {
        let faulty = SpyVerifier::answering(Err(VerifierFault("indeterminate".into())));
        let gate = ProofGate::new(&faulty);
        let err = gate.admit(&[1u8; 4], 4).unwrap_err();
        assert!(matches!(err, ProofGateError::VerifierFault(_)));
    }

    #[test]
    fn panicking_verifier_is_reported_as_fault() {
        let gate = ProofGate::new(PanickingVerifier);
        let err = gate.admit(&[1u8; 4], 2).unwrap_err();
        assert_eq!(
            err,
            ProofGateError::VerifierFault(VerifierFault("verifier panicked".into()))
        );
    }

    #[test]
    fn admits_full_capacity_buffer() {
        let spy = SpyVerifier::answering(Ok(true));
        let gate = ProofGate::new(&spy);
        let proof = vec![0xab; MAX_PROOF_SIZE];
        let buffer: ProofBuffer = ProofBuffer::from_proof(&proof).unwrap();

        assert_eq!(gate.admit_buffer(&buffer), Ok(Verdict::Verified));
        assert_eq!(spy.seen.lock().unwrap()[0].len(), MAX_PROOF_SIZE);
    }

    #[test]
    fn concurrent_callers_with_own_buffers() {
        let gate = Arc::new(ProofGate::new(LengthTagVerifier));

        let handles = (1..=8u8)
            .map(|len| {
                let gate = gate.clone();
                std::thread::spawn(move || {
                    let mut proof = vec![0u8; len as usize];
                    proof[0] = len;
                    let buffer = ProofBuffer::<64>::from_proof(&proof).unwrap();
                    gate.admit_buffer(&buffer)
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Verdict::Verified));
        }
    }
}
