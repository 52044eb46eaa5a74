//! The Aligned Layer AVS deployment: which components exist, how they are
//! wired to each other and to the restaking core, and what gets written out.
use std::path::{Path, PathBuf};

use alloy::{
    primitives::{Address, Bytes, U256, aliases::U96},
    sol_types::{SolCall, SolConstructor},
};
use manifest::{
    EigenLayerCoreContracts, ManifestError, ServiceDeploymentManifest, SharedContractsManifest,
    records::{
        AVS_DIRECTORY_KEY, DELEGATION_MANAGER_KEY, EIGENLAYER_PAUSER_REGISTRY_KEY,
        OPERATOR_STATE_RETRIEVER_KEY, SERVICE_MANAGER_KEY, SLASHER_KEY, STRATEGY_MANAGER_KEY,
    },
    write_manifest,
};

use crate::{
    config::{DeployerParams, QuorumParams, ResolvedRoles},
    contracts::{
        AlignedLayerServiceManager, AlignedLayerTaskManager, BLSApkRegistry, IndexRegistry,
        PauserRegistry, RegistryCoordinator, StakeRegistry, StrategyBaseTVLLimits,
        StrategyManager,
    },
    orchestrator::ProvisionedSystem,
    plan::{AddressBook, AuxStep, ComponentSpec, ProvisioningPlan},
};

pub const SERVICE_MANAGER: &str = SERVICE_MANAGER_KEY;
pub const REGISTRY_COORDINATOR: &str = "registryCoordinator";
pub const BLS_APK_REGISTRY: &str = "blsApkRegistry";
pub const INDEX_REGISTRY: &str = "indexRegistry";
pub const STAKE_REGISTRY: &str = "stakeRegistry";
pub const TASK_MANAGER: &str = "alignedLayerTaskManager";

pub const AVS_PAUSER_REGISTRY: &str = "avsPauserReg";
pub const MOCK_TOKEN: &str = "erc20Mock";
pub const MOCK_STRATEGY: &str = "erc20MockStrategy";
pub const OPERATOR_STATE_RETRIEVER: &str = OPERATOR_STATE_RETRIEVER_KEY;
pub const WHITELIST_STRATEGY: &str = "whitelistErc20MockStrategy";

pub const OWNER: &str = "owner";
pub const CHURN_APPROVER: &str = "churnApprover";
pub const EJECTOR: &str = "ejector";
pub const AGGREGATOR: &str = "aggregator";
pub const TASK_GENERATOR: &str = "taskGenerator";
pub const PAUSER: &str = "pauser";
pub const UNPAUSER: &str = "unpauser";

pub const SERVICE_OUTPUT_FILE: &str = "aligned_layer_avs_deployment_output.json";
pub const SHARED_OUTPUT_FILE: &str = "shared_avs_contracts_deployment_output.json";

/// Restaking core contracts and role accounts, by the names the plan uses.
pub fn external_addresses(core: &EigenLayerCoreContracts, roles: &ResolvedRoles) -> AddressBook {
    let mut book = AddressBook::new();
    book.insert(STRATEGY_MANAGER_KEY, core.strategy_manager);
    book.insert(DELEGATION_MANAGER_KEY, core.delegation_manager);
    book.insert(SLASHER_KEY, core.slasher);
    book.insert(AVS_DIRECTORY_KEY, core.avs_directory);
    book.insert(EIGENLAYER_PAUSER_REGISTRY_KEY, core.pauser_registry);

    book.insert(OWNER, roles.owner);
    book.insert(CHURN_APPROVER, roles.churn_approver);
    book.insert(EJECTOR, roles.ejector);
    book.insert(AGGREGATOR, roles.aggregator);
    book.insert(TASK_GENERATOR, roles.task_generator);
    book.insert(PAUSER, roles.pauser);
    book.insert(UNPAUSER, roles.unpauser);
    book
}

pub fn aligned_layer_plan(params: &DeployerParams) -> ProvisioningPlan {
    let strategy = params.strategy.clone();
    let quorum = params.quorum.clone();
    let paused_status = params.initial_paused_status;
    let window = params.task_response_window_block;

    ProvisioningPlan::new()
        .auxiliary(AuxStep::deploy(
            AVS_PAUSER_REGISTRY,
            "PauserRegistry",
            &[PAUSER, UNPAUSER],
            |a| {
                PauserRegistry::constructorCall {
                    pausers: vec![a[0]],
                    unpauser: a[1],
                }
                .abi_encode()
                .into()
            },
        ))
        .auxiliary(AuxStep::deploy_plain(MOCK_TOKEN, "ERC20Mock"))
        .auxiliary(AuxStep::deploy_behind_proxy(
            MOCK_STRATEGY,
            "StrategyBaseTVLLimits",
            &[STRATEGY_MANAGER_KEY],
            |a| {
                StrategyBaseTVLLimits::constructorCall {
                    strategyManager: a[0],
                }
                .abi_encode()
                .into()
            },
            &[MOCK_TOKEN, EIGENLAYER_PAUSER_REGISTRY_KEY],
            move |a| {
                StrategyBaseTVLLimits::initializeCall {
                    maxPerDeposit: U256::from(strategy.max_per_deposit),
                    maxTotalDeposits: U256::from(strategy.max_total_deposits),
                    underlyingToken: a[0],
                    pauserRegistry: a[1],
                }
                .abi_encode()
                .into()
            },
        ))
        .auxiliary(AuxStep::call(
            WHITELIST_STRATEGY,
            STRATEGY_MANAGER_KEY,
            &[MOCK_STRATEGY],
            |a| {
                StrategyManager::addStrategiesToDepositWhitelistCall {
                    strategiesToWhitelist: vec![a[0]],
                    thirdPartyTransfersForbiddenValues: vec![false],
                }
                .abi_encode()
                .into()
            },
        ))
        .auxiliary(AuxStep::deploy_plain(
            OPERATOR_STATE_RETRIEVER,
            "OperatorStateRetriever",
        ))
        .component(
            ComponentSpec::new(SERVICE_MANAGER, "AlignedLayerServiceManager")
                .constructor(
                    &[AVS_DIRECTORY_KEY, REGISTRY_COORDINATOR, STAKE_REGISTRY, TASK_MANAGER],
                    |a| {
                        AlignedLayerServiceManager::constructorCall {
                            avsDirectory: a[0],
                            registryCoordinator: a[1],
                            stakeRegistry: a[2],
                            taskManager: a[3],
                        }
                        .abi_encode()
                        .into()
                    },
                )
                .initializer(&[OWNER], |a| {
                    AlignedLayerServiceManager::initializeCall { initialOwner: a[0] }
                        .abi_encode()
                        .into()
                }),
        )
        .component(
            ComponentSpec::new(REGISTRY_COORDINATOR, "RegistryCoordinator")
                .constructor(
                    &[SERVICE_MANAGER, STAKE_REGISTRY, BLS_APK_REGISTRY, INDEX_REGISTRY],
                    |a| {
                        RegistryCoordinator::constructorCall {
                            serviceManager: a[0],
                            stakeRegistry: a[1],
                            blsApkRegistry: a[2],
                            indexRegistry: a[3],
                        }
                        .abi_encode()
                        .into()
                    },
                )
                .initializer(
                    &[OWNER, CHURN_APPROVER, EJECTOR, AVS_PAUSER_REGISTRY, MOCK_STRATEGY],
                    move |a| registry_coordinator_initialize(a, &quorum, paused_status),
                )
                .after(&[STAKE_REGISTRY, BLS_APK_REGISTRY, INDEX_REGISTRY]),
        )
        .component(
            ComponentSpec::new(BLS_APK_REGISTRY, "BLSApkRegistry").constructor(
                &[REGISTRY_COORDINATOR],
                |a| {
                    BLSApkRegistry::constructorCall {
                        registryCoordinator: a[0],
                    }
                    .abi_encode()
                    .into()
                },
            ),
        )
        .component(
            ComponentSpec::new(INDEX_REGISTRY, "IndexRegistry").constructor(
                &[REGISTRY_COORDINATOR],
                |a| {
                    IndexRegistry::constructorCall {
                        registryCoordinator: a[0],
                    }
                    .abi_encode()
                    .into()
                },
            ),
        )
        .component(
            ComponentSpec::new(STAKE_REGISTRY, "StakeRegistry").constructor(
                &[REGISTRY_COORDINATOR, DELEGATION_MANAGER_KEY],
                |a| {
                    StakeRegistry::constructorCall {
                        registryCoordinator: a[0],
                        delegationManager: a[1],
                    }
                    .abi_encode()
                    .into()
                },
            ),
        )
        .component(
            ComponentSpec::new(TASK_MANAGER, "AlignedLayerTaskManager")
                .constructor(&[REGISTRY_COORDINATOR], move |a| {
                    AlignedLayerTaskManager::constructorCall {
                        registryCoordinator: a[0],
                        taskResponseWindowBlock: window,
                    }
                    .abi_encode()
                    .into()
                })
                .initializer(
                    &[AVS_PAUSER_REGISTRY, OWNER, AGGREGATOR, TASK_GENERATOR],
                    |a| {
                        AlignedLayerTaskManager::initializeCall {
                            pauserRegistry: a[0],
                            initialOwner: a[1],
                            aggregator: a[2],
                            generator: a[3],
                        }
                        .abi_encode()
                        .into()
                    },
                )
                .after(&[REGISTRY_COORDINATOR]),
        )
}

/// Single quorum, weighted by the mock strategy.
fn registry_coordinator_initialize(
    a: &[Address],
    quorum: &QuorumParams,
    paused_status: u64,
) -> Bytes {
    RegistryCoordinator::initializeCall {
        initialOwner: a[0],
        churnApprover: a[1],
        ejector: a[2],
        pauserRegistry: a[3],
        initialPausedStatus: U256::from(paused_status),
        operatorSetParams: vec![RegistryCoordinator::OperatorSetParam {
            maxOperatorCount: quorum.max_operator_count,
            kickBIPsOfOperatorStake: quorum.kick_bips_of_operator_stake,
            kickBIPsOfTotalStake: quorum.kick_bips_of_total_stake,
        }],
        minimumStakes: vec![U96::saturating_from(quorum.minimum_stake)],
        strategyParams: vec![vec![RegistryCoordinator::StrategyParams {
            strategy: a[4],
            multiplier: U96::saturating_from(quorum.strategy_multiplier),
        }]],
    }
    .abi_encode()
    .into()
}

/// Manifest the aggregator reads as its service deployment: everything
/// deployed here plus the slasher it keeps a reference to.
pub fn service_manifest(
    system: &ProvisionedSystem,
    core: &EigenLayerCoreContracts,
) -> ServiceDeploymentManifest {
    let mut manifest = system.to_service_manifest();
    manifest
        .addresses
        .insert(SLASHER_KEY.to_string(), core.slasher);
    manifest
}

pub fn shared_manifest(system: &ProvisionedSystem) -> Option<SharedContractsManifest> {
    system
        .address(OPERATOR_STATE_RETRIEVER)
        .map(|operator_state_retriever| SharedContractsManifest {
            operator_state_retriever,
        })
}

/// Writes both manifests into `dir` and returns their paths. Nothing is
/// written unless the system includes an operator state retriever.
pub fn write_outputs(
    dir: &Path,
    system: &ProvisionedSystem,
    core: &EigenLayerCoreContracts,
) -> Result<(PathBuf, PathBuf), ManifestError> {
    let shared = shared_manifest(system).ok_or_else(|| ManifestError::InvalidAddress {
        field: OPERATOR_STATE_RETRIEVER.to_string(),
        reason: "not provisioned".to_string(),
    })?;

    let service_path = dir.join(SERVICE_OUTPUT_FILE);
    write_manifest(&service_path, &service_manifest(system, core))?;

    let shared_path = dir.join(SHARED_OUTPUT_FILE);
    write_manifest(&shared_path, &shared)?;
    Ok((service_path, shared_path))
}
