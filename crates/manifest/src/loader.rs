use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use alloy::primitives::Address;
use log::{debug, info};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::ManifestError,
    records::{
        AVS_DIRECTORY_KEY, AddressesRaw, DELEGATION_MANAGER_KEY, EIGENLAYER_PAUSER_REGISTRY_KEY,
        EigenLayerCoreContracts, OPERATOR_STATE_RETRIEVER_KEY, SERVICE_MANAGER_KEY, SLASHER_KEY,
        STRATEGY_MANAGER_KEY, ServiceDeployment, SharedContracts, SharedContractsRaw,
    },
};

pub fn load_service_deployment(path: impl AsRef<Path>) -> Result<ServiceDeployment, ManifestError> {
    let raw: AddressesRaw = read_json(path.as_ref())?;

    let value = raw
        .addresses
        .get(SERVICE_MANAGER_KEY)
        .ok_or_else(|| ManifestError::invalid_address(SERVICE_MANAGER_KEY, "missing"))?;
    let service_manager = require_address(SERVICE_MANAGER_KEY, value)?;

    let mut components = BTreeMap::new();
    for (name, value) in raw.addresses.iter().filter(|(k, _)| *k != SERVICE_MANAGER_KEY) {
        match optional_address(name, value)? {
            Some(address) => {
                components.insert(name.clone(), address);
            }
            None => debug!("Service deployment entry {name} is unset"),
        }
    }

    info!("Loaded service deployment: {SERVICE_MANAGER_KEY}={service_manager}");
    Ok(ServiceDeployment {
        service_manager,
        components,
    })
}

pub fn load_shared_contracts(path: impl AsRef<Path>) -> Result<SharedContracts, ManifestError> {
    let raw: SharedContractsRaw = read_json(path.as_ref())?;
    let operator_state_retriever =
        require_address(OPERATOR_STATE_RETRIEVER_KEY, &raw.operator_state_retriever)?;

    info!("Loaded shared contracts: {OPERATOR_STATE_RETRIEVER_KEY}={operator_state_retriever}");
    Ok(SharedContracts {
        operator_state_retriever,
    })
}

pub fn load_eigenlayer_core(
    path: impl AsRef<Path>,
) -> Result<EigenLayerCoreContracts, ManifestError> {
    let raw: AddressesRaw = read_json(path.as_ref())?;
    let field = |key: &str| {
        let value = raw
            .addresses
            .get(key)
            .ok_or_else(|| ManifestError::invalid_address(key, "missing"))?;
        require_address(key, value)
    };

    Ok(EigenLayerCoreContracts {
        strategy_manager: field(STRATEGY_MANAGER_KEY)?,
        delegation_manager: field(DELEGATION_MANAGER_KEY)?,
        slasher: field(SLASHER_KEY)?,
        avs_directory: field(AVS_DIRECTORY_KEY)?,
        pauser_registry: field(EIGENLAYER_PAUSER_REGISTRY_KEY)?,
    })
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_manifest<T: Serialize>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), ManifestError> {
    let path = path.as_ref();
    let io_err = |source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| ManifestError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)?;

    info!("Wrote manifest {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::MissingManifestFile {
            path: path.to_path_buf(),
        });
    }
    debug!("Reading manifest {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ManifestError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a required address; empty, malformed and zero values are rejected.
pub fn require_address(field: &str, value: &str) -> Result<Address, ManifestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ManifestError::invalid_address(field, "empty"));
    }
    let address =
        Address::from_str(trimmed).map_err(|e| ManifestError::invalid_address(field, e))?;
    if address.is_zero() {
        return Err(ManifestError::invalid_address(field, "zero address"));
    }
    Ok(address)
}

/// Parses an optional address; empty and zero values mean "unset",
/// malformed ones are still rejected.
pub fn optional_address(field: &str, value: &str) -> Result<Option<Address>, ManifestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let address =
        Address::from_str(trimmed).map_err(|e| ManifestError::invalid_address(field, e))?;
    Ok((!address.is_zero()).then_some(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ServiceDeploymentManifest, SharedContractsManifest};
    use alloy::primitives::address;
    use tempfile::TempDir;

    const SERVICE_MANAGER: Address = address!("0xc5a5C42992dECbae36851359345FE25997F5C42d");
    const RETRIEVER: Address = address!("0x9d4454B023096f34B160D6B654540c56A1F81688");

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = load_shared_contracts(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ManifestError::MissingManifestFile { .. }));

        let err = load_service_deployment(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ManifestError::MissingManifestFile { .. }));
    }

    #[test]
    fn loads_service_deployment() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "aligned.json",
            r#"{"addresses": {
                "alignedLayerServiceManager": "0xc5a5C42992dECbae36851359345FE25997F5C42d",
                "registryCoordinator": "0x9E545E3C0baAB3E08CdfD552C960A1050f373042"
            }}"#,
        );
        let deployment = load_service_deployment(&path).unwrap();
        assert_eq!(deployment.service_manager, SERVICE_MANAGER);
        assert_eq!(deployment.components.len(), 1);
        assert!(deployment.components.contains_key("registryCoordinator"));
    }

    #[test]
    fn unset_optional_entries_do_not_block_loading() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "aligned.json",
            r#"{"addresses": {
                "alignedLayerServiceManager": "0xc5a5C42992dECbae36851359345FE25997F5C42d",
                "slasher": "0x0000000000000000000000000000000000000000",
                "blsPublicKeyCompendium": "",
                "registryCoordinator": "0x9E545E3C0baAB3E08CdfD552C960A1050f373042"
            }}"#,
        );
        let deployment = load_service_deployment(&path).unwrap();
        assert_eq!(deployment.service_manager, SERVICE_MANAGER);
        assert!(!deployment.components.contains_key("slasher"));
        assert!(!deployment.components.contains_key("blsPublicKeyCompendium"));
        assert!(deployment.components.contains_key("registryCoordinator"));

        let malformed = write(
            &dir,
            "malformed.json",
            r#"{"addresses": {
                "alignedLayerServiceManager": "0xc5a5C42992dECbae36851359345FE25997F5C42d",
                "slasher": "0x1234"
            }}"#,
        );
        assert!(matches!(
            load_service_deployment(&malformed).unwrap_err(),
            ManifestError::InvalidAddress { ref field, .. } if field == "slasher"
        ));
    }

    #[test]
    fn empty_or_zero_address_is_rejected() {
        let dir = TempDir::new().unwrap();

        let empty = write(&dir, "empty.json", r#"{"blsOperatorStateRetriever": ""}"#);
        let err = load_shared_contracts(&empty).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidAddress { ref field, .. } if field == "blsOperatorStateRetriever"));

        let absent = write(&dir, "absent_key.json", r#"{}"#);
        assert!(matches!(
            load_shared_contracts(&absent).unwrap_err(),
            ManifestError::InvalidAddress { .. }
        ));

        let zero = write(
            &dir,
            "zero.json",
            r#"{"addresses": {"alignedLayerServiceManager": "0x0000000000000000000000000000000000000000"}}"#,
        );
        let err = load_service_deployment(&zero).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidAddress { ref reason, .. } if reason == "zero address"));

        let missing = write(&dir, "missing.json", r#"{"addresses": {}}"#);
        let err = load_service_deployment(&missing).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidAddress { ref field, .. } if field == SERVICE_MANAGER_KEY));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", "{ not json");
        assert!(matches!(
            load_shared_contracts(&path).unwrap_err(),
            ManifestError::Malformed { .. }
        ));
    }

    #[test]
    fn eigenlayer_core_requires_every_contract() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "core.json",
            r#"{"addresses": {
                "strategyManager": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
                "delegation": "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9",
                "slasher": "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9",
                "avsDirectory": "0x5FC8d32690cc91D4c39d9d3abcBD16989F875707",
                "eigenLayerPauserReg": "0x0165878A594ca255338adfa4d48449f69242Eb8F"
            }}"#,
        );
        let core = load_eigenlayer_core(&path).unwrap();
        assert_eq!(
            core.delegation_manager,
            address!("0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9")
        );

        let partial = write(
            &dir,
            "partial.json",
            r#"{"addresses": {"strategyManager": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"}}"#,
        );
        let err = load_eigenlayer_core(&partial).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidAddress { ref field, .. } if field == "delegation"));
    }

    #[test]
    fn written_manifests_load_back() {
        let dir = TempDir::new().unwrap();
        let service_path = dir.path().join("output/aligned_layer_avs_deployment_output.json");
        let shared_path = dir.path().join("output/shared_avs_contracts_deployment_output.json");

        let mut addresses = BTreeMap::new();
        addresses.insert(SERVICE_MANAGER_KEY.to_string(), SERVICE_MANAGER);
        write_manifest(&service_path, &ServiceDeploymentManifest { addresses }).unwrap();
        write_manifest(
            &shared_path,
            &SharedContractsManifest {
                operator_state_retriever: RETRIEVER,
            },
        )
        .unwrap();

        assert_eq!(
            load_service_deployment(&service_path).unwrap().service_manager,
            SERVICE_MANAGER
        );
        assert_eq!(
            load_shared_contracts(&shared_path)
                .unwrap()
                .operator_state_retriever,
            RETRIEVER
        );
    }
}
