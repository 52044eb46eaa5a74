use std::fmt;

use alloy::{
    primitives::{Address, Bytes},
    sol_types::{SolCall, SolConstructor},
};
use log::info;
use manifest::ServiceDeploymentManifest;

use crate::{
    artifacts::Artifacts,
    chain::DeployChain,
    contracts::{ProxyAdmin, TransparentUpgradeableProxy},
    error::{PlanError, ProvisioningError},
    plan::{
        AddressBook, AuxStep, EMPTY_CONTRACT, EMPTY_CONTRACT_ARTIFACT, PROXY_ADMIN,
        PROXY_ADMIN_ARTIFACT, PROXY_ARTIFACT, ProvisioningPlan, implementation_name,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ProxyShells,
    Auxiliary,
    Implementations,
    UpgradeAndInitialize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ProxyShells => "A (proxy shells)",
            Phase::Auxiliary => "B (auxiliary resources)",
            Phase::Implementations => "C (implementations)",
            Phase::UpgradeAndInitialize => "D (upgrade and initialize)",
        };
        f.write_str(name)
    }
}

/// A proxy whose address is fixed but which still points at the empty
/// contract. It hands out its address and nothing else.
#[derive(Debug)]
pub struct ProxyReservation {
    name: String,
    proxy: Address,
}

impl ProxyReservation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reserved_address(&self) -> Address {
        self.proxy
    }

    fn bind(self, implementation: Address) -> ReadyComponent {
        ReadyComponent {
            name: self.name,
            proxy: self.proxy,
            implementation,
        }
    }
}

/// A proxy that has been upgraded (and initialized, if the component has
/// an initializer). Only obtainable by completing phase D.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyComponent {
    name: String,
    proxy: Address,
    implementation: Address,
}

impl ReadyComponent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.proxy
    }

    pub fn implementation(&self) -> Address {
        self.implementation
    }
}

#[derive(Debug, Clone)]
pub struct ProvisionedSystem {
    proxy_admin: Address,
    empty_contract: Address,
    /// In the order they became ready.
    components: Vec<ReadyComponent>,
    auxiliary: AddressBook,
}

impl ProvisionedSystem {
    pub fn proxy_admin(&self) -> Address {
        self.proxy_admin
    }

    pub fn empty_contract(&self) -> Address {
        self.empty_contract
    }

    pub fn components(&self) -> &[ReadyComponent] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&ReadyComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Proxy address of a component or address of an auxiliary deployment.
    pub fn address(&self, name: &str) -> Option<Address> {
        self.component(name)
            .map(ReadyComponent::address)
            .or_else(|| self.auxiliary.get(name))
    }

    /// Everything this run deployed, keyed by name.
    pub fn to_service_manifest(&self) -> ServiceDeploymentManifest {
        let mut manifest = ServiceDeploymentManifest::default();
        manifest
            .addresses
            .insert(PROXY_ADMIN.to_string(), self.proxy_admin);
        manifest
            .addresses
            .insert(EMPTY_CONTRACT.to_string(), self.empty_contract);
        for component in &self.components {
            manifest
                .addresses
                .insert(component.name.clone(), component.proxy);
            manifest
                .addresses
                .insert(implementation_name(&component.name), component.implementation);
        }
        for (name, address) in self.auxiliary.iter() {
            manifest.addresses.insert(name.to_string(), address);
        }
        manifest
    }
}

pub struct Orchestrator<'a, C: ?Sized> {
    chain: &'a C,
    artifacts: &'a Artifacts,
}

impl<'a, C: DeployChain + ?Sized> Orchestrator<'a, C> {
    pub fn new(chain: &'a C, artifacts: &'a Artifacts) -> Self {
        Self { chain, artifacts }
    }

    /// Runs phases A to D. Nothing is sent unless the plan validates and
    /// every artifact it needs is loaded. Each phase completes fully before
    /// the next begins.
    pub async fn run(
        &self,
        plan: &ProvisioningPlan,
        external: AddressBook,
    ) -> Result<ProvisionedSystem, ProvisioningError> {
        let init_order = plan.validate(&external)?;
        for name in plan.artifact_names() {
            self.artifacts.get(&name)?;
        }

        let mut book = external;
        let mut auxiliary = AddressBook::new();

        info!("[Provisioning] Phase {}", Phase::ProxyShells);
        let proxy_admin = self
            .deploy(
                Phase::ProxyShells,
                (PROXY_ADMIN, PROXY_ADMIN),
                PROXY_ADMIN_ARTIFACT,
                Bytes::new(),
            )
            .await?;
        let empty_contract = self
            .deploy(
                Phase::ProxyShells,
                (EMPTY_CONTRACT, EMPTY_CONTRACT),
                EMPTY_CONTRACT_ARTIFACT,
                Bytes::new(),
            )
            .await?;
        book.insert(PROXY_ADMIN, proxy_admin);
        book.insert(EMPTY_CONTRACT, empty_contract);

        let mut reservations = Vec::with_capacity(plan.components.len());
        for component in &plan.components {
            let reservation = self
                .reserve(&component.name, proxy_admin, empty_contract)
                .await?;
            book.insert(component.name.clone(), reservation.reserved_address());
            reservations.push(Some(reservation));
        }

        info!("[Provisioning] Phase {}", Phase::Auxiliary);
        for step in &plan.auxiliary {
            self.auxiliary_step(step, proxy_admin, &mut book, &mut auxiliary)
                .await?;
        }

        info!("[Provisioning] Phase {}", Phase::Implementations);
        let mut implementations = Vec::with_capacity(plan.components.len());
        for component in &plan.components {
            let args = book.resolve(&component.name, &component.constructor.args)?;
            let implementation = self
                .deploy(
                    Phase::Implementations,
                    (&component.name, &format!("{} implementation", component.name)),
                    &component.artifact,
                    component.constructor.encode(&args),
                )
                .await?;
            implementations.push(implementation);
        }

        info!("[Provisioning] Phase {}", Phase::UpgradeAndInitialize);
        let mut components = Vec::with_capacity(plan.components.len());
        for index in init_order {
            let component = &plan.components[index];
            let Some(reservation) = reservations[index].take() else {
                continue;
            };
            let implementation = implementations[index];
            let proxy = reservation.reserved_address();

            let calldata = match &component.initializer {
                Some(init) => {
                    let args = book.resolve(&component.name, &init.args)?;
                    ProxyAdmin::upgradeAndCallCall {
                        proxy,
                        implementation,
                        data: init.encode(&args),
                    }
                    .abi_encode()
                }
                None => ProxyAdmin::upgradeCall {
                    proxy,
                    implementation,
                }
                .abi_encode(),
            };
            self.send(
                Phase::UpgradeAndInitialize,
                (&component.name, &format!("{} upgrade", component.name)),
                proxy_admin,
                calldata.into(),
            )
            .await?;
            components.push(reservation.bind(implementation));
        }

        info!(
            "[Provisioning] Completed: {} components ready, proxy admin {proxy_admin}",
            components.len()
        );
        Ok(ProvisionedSystem {
            proxy_admin,
            empty_contract,
            components,
            auxiliary,
        })
    }

    async fn reserve(
        &self,
        name: &str,
        proxy_admin: Address,
        empty_contract: Address,
    ) -> Result<ProxyReservation, ProvisioningError> {
        let args = TransparentUpgradeableProxy::constructorCall {
            logic: empty_contract,
            admin: proxy_admin,
            data: Bytes::new(),
        }
        .abi_encode();
        let proxy = self
            .deploy(
                Phase::ProxyShells,
                (name, &format!("{name} proxy")),
                PROXY_ARTIFACT,
                args.into(),
            )
            .await?;
        Ok(ProxyReservation {
            name: name.to_string(),
            proxy,
        })
    }

    async fn auxiliary_step(
        &self,
        step: &AuxStep,
        proxy_admin: Address,
        book: &mut AddressBook,
        auxiliary: &mut AddressBook,
    ) -> Result<(), ProvisioningError> {
        match step {
            AuxStep::Deploy {
                name,
                artifact,
                constructor,
            } => {
                let args = book.resolve(name, &constructor.args)?;
                let address = self
                    .deploy(
                        Phase::Auxiliary,
                        (name, name),
                        artifact,
                        constructor.encode(&args),
                    )
                    .await?;
                book.insert(name.clone(), address);
                auxiliary.insert(name.clone(), address);
            }
            AuxStep::DeployBehindProxy {
                name,
                artifact,
                constructor,
                initializer,
            } => {
                let args = book.resolve(name, &constructor.args)?;
                let implementation = self
                    .deploy(
                        Phase::Auxiliary,
                        (name, &format!("{name} implementation")),
                        artifact,
                        constructor.encode(&args),
                    )
                    .await?;
                book.insert(implementation_name(name), implementation);
                auxiliary.insert(implementation_name(name), implementation);

                let init_args = book.resolve(name, &initializer.args)?;
                let proxy_args = TransparentUpgradeableProxy::constructorCall {
                    logic: implementation,
                    admin: proxy_admin,
                    data: initializer.encode(&init_args),
                }
                .abi_encode();
                let proxy = self
                    .deploy(
                        Phase::Auxiliary,
                        (name, &format!("{name} proxy")),
                        PROXY_ARTIFACT,
                        proxy_args.into(),
                    )
                    .await?;
                book.insert(name.clone(), proxy);
                auxiliary.insert(name.clone(), proxy);
            }
            AuxStep::Call {
                label,
                target,
                call,
            } => {
                let to = book
                    .get(target)
                    .ok_or_else(|| PlanError::UnknownDependency {
                        owner: label.clone(),
                        dependency: target.clone(),
                    })?;
                let args = book.resolve(label, &call.args)?;
                self.send(Phase::Auxiliary, (label, label), to, call.encode(&args))
                    .await?;
            }
        }
        Ok(())
    }

    async fn deploy(
        &self,
        phase: Phase,
        (component, label): (&str, &str),
        artifact: &str,
        constructor_args: Bytes,
    ) -> Result<Address, ProvisioningError> {
        let code = self.artifacts.get(artifact)?.creation_code(&constructor_args);
        let address = self
            .chain
            .deploy(label, code)
            .await
            .map_err(|source| ProvisioningError::PhaseFailure {
                phase,
                component: component.to_string(),
                source,
            })?;
        info!("[Provisioning] {label} deployed at {address}");
        Ok(address)
    }

    async fn send(
        &self,
        phase: Phase,
        (component, label): (&str, &str),
        to: Address,
        calldata: Bytes,
    ) -> Result<(), ProvisioningError> {
        self.chain
            .send(label, to, calldata)
            .await
            .map_err(|source| ProvisioningError::PhaseFailure {
                phase,
                component: component.to_string(),
                source,
            })?;
        Ok(())
    }
}
