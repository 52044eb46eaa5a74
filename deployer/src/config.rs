use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use anyhow::{Context, bail};
use crypto::hex::SecretHex;
use envconfig::Envconfig;
use serde::Deserialize;

#[derive(Debug, Envconfig)]
pub struct DeployerEnv {
    #[envconfig(from = "DEPLOYER_RPC_URL")]
    pub rpc_url: String,

    #[envconfig(from = "DEPLOYER_PRIVATE_KEY")]
    pub private_key: SecretHex,

    #[envconfig(from = "DEPLOYER_CONFIG_FILE")]
    pub params_file: PathBuf,

    #[envconfig(from = "EIGENLAYER_DEPLOYMENT_FILE")]
    pub eigenlayer_deployment: PathBuf,

    #[envconfig(from = "CONTRACT_ARTIFACTS_DIR", default = "contracts/out")]
    pub artifacts_dir: PathBuf,

    #[envconfig(from = "DEPLOYMENT_OUTPUT_DIR", default = "contracts/script/output")]
    pub output_dir: PathBuf,

    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: log::Level,
}

/// Accounts granted roles in the deployed contracts. Any role left out is
/// given to the deploying account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roles {
    pub owner: Option<Address>,
    pub churn_approver: Option<Address>,
    pub ejector: Option<Address>,
    pub aggregator: Option<Address>,
    pub task_generator: Option<Address>,
    pub pauser: Option<Address>,
    pub unpauser: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub owner: Address,
    pub churn_approver: Address,
    pub ejector: Address,
    pub aggregator: Address,
    pub task_generator: Address,
    pub pauser: Address,
    pub unpauser: Address,
}

impl Roles {
    pub fn resolve(&self, deployer: Address) -> ResolvedRoles {
        let or_deployer = |role: Option<Address>| role.unwrap_or(deployer);
        ResolvedRoles {
            owner: or_deployer(self.owner),
            churn_approver: or_deployer(self.churn_approver),
            ejector: or_deployer(self.ejector),
            aggregator: or_deployer(self.aggregator),
            task_generator: or_deployer(self.task_generator),
            pauser: or_deployer(self.pauser),
            unpauser: or_deployer(self.unpauser),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct QuorumParams {
    pub max_operator_count: u32,
    pub kick_bips_of_operator_stake: u16,
    pub kick_bips_of_total_stake: u16,
    pub minimum_stake: u128,
    pub strategy_multiplier: u128,
}

impl Default for QuorumParams {
    fn default() -> Self {
        Self {
            max_operator_count: 10_000,
            kick_bips_of_operator_stake: 15_000,
            kick_bips_of_total_stake: 100,
            minimum_stake: 0,
            strategy_multiplier: 1_000_000_000_000_000_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StrategyLimits {
    pub max_per_deposit: u128,
    pub max_total_deposits: u128,
}

impl Default for StrategyLimits {
    fn default() -> Self {
        Self {
            max_per_deposit: u128::MAX,
            max_total_deposits: u128::MAX,
        }
    }
}

fn default_task_response_window_block() -> u32 {
    100
}

/// Deployment parameters file (YAML).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployerParams {
    #[serde(default)]
    pub roles: Roles,
    #[serde(default)]
    pub quorum: QuorumParams,
    #[serde(default)]
    pub strategy: StrategyLimits,
    #[serde(default = "default_task_response_window_block")]
    pub task_response_window_block: u32,
    #[serde(default)]
    pub initial_paused_status: u64,
}

impl Default for DeployerParams {
    fn default() -> Self {
        Self {
            roles: Roles::default(),
            quorum: QuorumParams::default(),
            strategy: StrategyLimits::default(),
            task_response_window_block: default_task_response_window_block(),
            initial_paused_status: 0,
        }
    }
}

const UINT96_MAX: u128 = (1 << 96) - 1;

impl DeployerParams {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployer params {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid deployer params {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let params: Self = serde_yaml::from_str(contents)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.quorum.minimum_stake > UINT96_MAX {
            bail!("quorum.minimum_stake does not fit in uint96");
        }
        if self.quorum.strategy_multiplier == 0 || self.quorum.strategy_multiplier > UINT96_MAX {
            bail!("quorum.strategy_multiplier must be in 1..=2^96-1");
        }
        if self.quorum.max_operator_count == 0 {
            bail!("quorum.max_operator_count must be positive");
        }
        if self.task_response_window_block == 0 {
            bail!("task_response_window_block must be positive");
        }
        Ok(())
    }
}
