use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use crypto::hex::SecretHex;
use envconfig::Envconfig;
use serde::Deserialize;

use crate::error::BootstrapError;

/// Locations of the documents the aggregator is assembled from.
#[derive(Debug, Clone, Envconfig)]
pub struct LaunchConfig {
    #[envconfig(from = "AGGREGATOR_CONFIG_FILE")]
    pub config_file: PathBuf,

    #[envconfig(from = "ALIGNED_LAYER_DEPLOYMENT_FILE")]
    pub aligned_layer_deployment: PathBuf,

    #[envconfig(from = "SHARED_AVS_CONTRACTS_DEPLOYMENT_FILE")]
    pub shared_avs_contracts_deployment: PathBuf,
}

#[derive(Debug, Envconfig)]
pub struct Secrets {
    #[envconfig(from = "ECDSA_PRIVATE_KEY")]
    pub ecdsa_private_key: SecretHex,
}

#[derive(Debug)]
pub struct AppConfig {
    pub launch: LaunchConfig,
    pub secrets: Secrets,
}

impl AppConfig {
    pub fn fetch() -> anyhow::Result<Self> {
        let launch = LaunchConfig::init_from_env().context("Failed to load launch config")?;
        let secrets = Secrets::init_from_env().context("Failed to load secrets")?;

        Ok(Self { launch, secrets })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn log_level(self) -> log::Level {
        match self {
            Environment::Development => log::Level::Debug,
            Environment::Production => log::Level::Info,
        }
    }
}

fn default_metrics_address() -> String {
    "localhost:9090".to_string()
}

/// Aggregator configuration file, as written by operators.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRaw {
    #[serde(default)]
    pub environment: Environment,
    pub eth_rpc_url: String,
    pub eth_ws_url: String,
    pub aggregator_server_ip_port_address: String,
    #[serde(default)]
    pub register_operator_on_startup: bool,
    #[serde(default)]
    pub bls_public_key_compendium_address: String,
    #[serde(default)]
    pub avs_service_manager_address: String,
    #[serde(default)]
    pub enable_metrics: bool,
    #[serde(default = "default_metrics_address")]
    pub eigen_metrics_ip_port_address: String,
}

impl ConfigRaw {
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        let contents = fs::read_to_string(path).map_err(|source| BootstrapError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    pub fn parse(contents: &str, path: &Path) -> Result<Self, BootstrapError> {
        serde_yaml::from_str(contents).map_err(|source| BootstrapError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
