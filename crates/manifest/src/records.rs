use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

pub const SERVICE_MANAGER_KEY: &str = "alignedLayerServiceManager";
pub const OPERATOR_STATE_RETRIEVER_KEY: &str = "blsOperatorStateRetriever";

pub const STRATEGY_MANAGER_KEY: &str = "strategyManager";
pub const DELEGATION_MANAGER_KEY: &str = "delegation";
pub const SLASHER_KEY: &str = "slasher";
pub const AVS_DIRECTORY_KEY: &str = "avsDirectory";
pub const EIGENLAYER_PAUSER_REGISTRY_KEY: &str = "eigenLayerPauserReg";

/// On-disk form of the service deployment output: every named component
/// and its final address, nested under `addresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeploymentManifest {
    pub addresses: BTreeMap<String, Address>,
}

/// On-disk form of the shared AVS contracts output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedContractsManifest {
    #[serde(rename = "blsOperatorStateRetriever")]
    pub operator_state_retriever: Address,
}

/// Raw readers keep every value as a string so that empty values can be
/// reported per field instead of as a generic parse error.
#[derive(Debug, Deserialize)]
pub(crate) struct AddressesRaw {
    #[serde(default)]
    pub addresses: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SharedContractsRaw {
    #[serde(rename = "blsOperatorStateRetriever", default)]
    pub operator_state_retriever: String,
}

/// Validated view of the service deployment manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeployment {
    pub service_manager: Address,
    /// Remaining entries that are set; empty and zero entries are dropped.
    pub components: BTreeMap<String, Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedContracts {
    pub operator_state_retriever: Address,
}

/// Pre-existing restaking core contracts the AVS plugs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EigenLayerCoreContracts {
    pub strategy_manager: Address,
    pub delegation_manager: Address,
    pub slasher: Address,
    pub avs_directory: Address,
    pub pauser_registry: Address,
}
