//! Deployment manifests shared by the provisioning run (writer) and the
//! aggregator bootstrap (reader).

pub mod error;
pub mod loader;
pub mod records;

pub use error::ManifestError;
pub use loader::{
    load_eigenlayer_core, load_service_deployment, load_shared_contracts, optional_address,
    require_address, write_manifest,
};
pub use records::{
    EigenLayerCoreContracts, ServiceDeployment, ServiceDeploymentManifest, SharedContracts,
    SharedContractsManifest,
};
