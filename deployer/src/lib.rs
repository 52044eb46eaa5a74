//! Provisioning of the AVS contracts with the two-phase proxy pattern:
//! stable proxy addresses first, logic bound later.

pub mod artifacts;
pub mod avs;
pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod orchestrator;
pub mod plan;

pub use artifacts::{Artifacts, ContractArtifact};
pub use chain::{DeployChain, ProviderChain};
pub use error::{ArtifactError, PlanError, ProvisioningError, TxError};
pub use orchestrator::{
    Orchestrator, Phase, ProvisionedSystem, ProxyReservation, ReadyComponent,
};
pub use plan::{AddressBook, AuxStep, ComponentSpec, ProvisioningPlan};
