use std::fmt;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    signers::{Signer, local::PrivateKeySigner},
};
use secrecy::zeroize::Zeroizing;

use crate::{IdentityError, hex::strip_0x};

const SCALAR_HEX_LEN: usize = 64;

/// A validated secp256k1 scalar that is not yet bound to a network.
///
/// Parsing is purely local, so a malformed key is rejected before any RPC
/// endpoint is contacted.
pub struct SigningKey(PrivateKeySigner);

impl SigningKey {
    /// Accepts 64 hex characters with an optional `0x` prefix. Zero and
    /// values at or above the curve order are rejected.
    pub fn parse(secret_hex: &str) -> Result<Self, IdentityError> {
        let stripped = strip_0x(secret_hex);
        if stripped.is_empty() {
            return Err(IdentityError::InvalidKeyFormat("empty key"));
        }
        if stripped.len() != SCALAR_HEX_LEN {
            return Err(IdentityError::InvalidKeyFormat(
                "expected 32 bytes (64 hex characters)",
            ));
        }

        let bytes = Zeroizing::new(
            hex::decode(stripped)
                .map_err(|_| IdentityError::InvalidKeyFormat("key is not valid hex"))?,
        );
        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|_| IdentityError::InvalidKeyFormat("scalar out of range for secp256k1"))?;

        Ok(Self(signer))
    }

    pub fn address(&self) -> Address {
        self.0.address()
    }

    /// Binds the key to `chain_id`, producing the signer used for transactions.
    pub fn bind(self, chain_id: u64) -> Identity {
        let signer = self.0.with_chain_id(Some(chain_id));
        Identity {
            address: signer.address(),
            chain_id,
            signer,
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Process-lifetime signing identity: key, derived address and the chain the
/// signer is bound to.
#[derive(Clone)]
pub struct Identity {
    signer: PrivateKeySigner,
    address: Address,
    chain_id: u64,
}

impl Identity {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::new(self.signer.clone())
    }

    /// Fails unless the signer's chain equals the chain observed on the network.
    pub fn ensure_chain(&self, network_chain_id: u64) -> Result<(), IdentityError> {
        if self.chain_id != network_chain_id {
            return Err(IdentityError::ChainIdMismatch {
                signer: self.chain_id,
                network: network_chain_id,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

pub fn derive_identity(secret_hex: &str, chain_id: u64) -> Result<Identity, IdentityError> {
    Ok(SigningKey::parse(secret_hex)?.bind(chain_id))
}
