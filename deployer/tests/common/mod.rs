#![allow(dead_code)]

use std::sync::Mutex;

use alloy::primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use avs_deployer::{Artifacts, ContractArtifact, DeployChain, TxError};

/// Every artifact gets a one-byte bytecode, so constructor args start at
/// offset 1 of the recorded creation code.
pub const BYTECODE_MARKER: u8 = 0xfe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    Deploy {
        label: String,
        code: Bytes,
        address: Address,
    },
    Send {
        label: String,
        to: Address,
        calldata: Bytes,
    },
}

impl ChainCall {
    pub fn label(&self) -> &str {
        match self {
            ChainCall::Deploy { label, .. } | ChainCall::Send { label, .. } => label,
        }
    }
}

/// Records every transaction and hands out sequential addresses.
#[derive(Default)]
pub struct MockChain {
    calls: Mutex<Vec<ChainCall>>,
    fail_on: Option<String>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reverts the transaction with this label.
    pub fn failing_on(label: &str) -> Self {
        Self {
            calls: Mutex::default(),
            fail_on: Some(label.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.label().to_string()).collect()
    }

    pub fn position(&self, label: &str) -> usize {
        self.labels()
            .iter()
            .position(|l| l == label)
            .unwrap_or_else(|| panic!("no transaction labelled {label}"))
    }

    pub fn deployed(&self, label: &str) -> (Address, Bytes) {
        self.calls()
            .into_iter()
            .find_map(|c| match c {
                ChainCall::Deploy {
                    label: l,
                    code,
                    address,
                } if l == label => Some((address, code)),
                _ => None,
            })
            .unwrap_or_else(|| panic!("nothing deployed as {label}"))
    }

    pub fn sent(&self, label: &str) -> (Address, Bytes) {
        self.calls()
            .into_iter()
            .find_map(|c| match c {
                ChainCall::Send {
                    label: l,
                    to,
                    calldata,
                } if l == label => Some((to, calldata)),
                _ => None,
            })
            .unwrap_or_else(|| panic!("nothing sent as {label}"))
    }

    fn check(&self, label: &str) -> Result<(), TxError> {
        if self.fail_on.as_deref() == Some(label) {
            return Err(TxError::Reverted(B256::repeat_byte(0xee)));
        }
        Ok(())
    }
}

#[async_trait]
impl DeployChain for MockChain {
    async fn deploy(&self, label: &str, creation_code: Bytes) -> Result<Address, TxError> {
        self.check(label)?;
        let mut calls = self.calls.lock().unwrap();
        let mut raw = [0u8; 20];
        raw[12..].copy_from_slice(&(0x1000 + calls.len() as u64).to_be_bytes());
        let address = Address::from(raw);
        calls.push(ChainCall::Deploy {
            label: label.to_string(),
            code: creation_code,
            address,
        });
        Ok(address)
    }

    async fn send(&self, label: &str, to: Address, calldata: Bytes) -> Result<B256, TxError> {
        self.check(label)?;
        let mut calls = self.calls.lock().unwrap();
        calls.push(ChainCall::Send {
            label: label.to_string(),
            to,
            calldata,
        });
        Ok(B256::with_last_byte(calls.len() as u8))
    }
}

pub fn artifacts<I, S>(names: I) -> Artifacts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| ContractArtifact::new(name.as_ref(), Bytes::from(vec![BYTECODE_MARKER])))
        .collect()
}

/// Constructor arguments of a recorded deployment.
pub fn constructor_args(code: &Bytes) -> &[u8] {
    &code[1..]
}

/// Reads the `index`-th static word of ABI data as an address.
pub fn word_address(data: &[u8], index: usize) -> Address {
    Address::from_slice(&data[index * 32 + 12..index * 32 + 32])
}
