#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use aggregator_core::config::{ConfigRaw, LaunchConfig, Secrets};
use alloy::{
    primitives::U64,
    providers::{Provider, ProviderBuilder},
    transports::mock::Asserter,
};
use async_trait::async_trait;
use blockchain::{ChainClient, ChainConnector, ChainError, ClientKind};
use tempfile::TempDir;
use url::Url;

// A key of the form 0xabc... used by the end-to-end scenarios.
pub const SCENARIO_KEY: &str = "0xabc1111111111111111111111111111111111111111111111111111111111111";
pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const SERVICE_MANAGER: &str = "0xc5a5C42992dECbae36851359345FE25997F5C42d";
pub const OPERATOR_STATE_RETRIEVER: &str = "0x9d4454B023096f34B160D6B654540c56A1F81688";
pub const SLASHER: &str = "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9";

pub const RPC_URL: &str = "http://localhost:8545";
pub const WS_URL: &str = "ws://localhost:8545";

/// Hands out mocked clients answering `eth_chainId` with a per-endpoint
/// value, and counts how often it was asked to connect.
pub struct FakeConnector {
    chain_ids: HashMap<String, u64>,
    unreachable: Vec<String>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new(chain_id: u64) -> Self {
        Self::with_chain_ids(chain_id, chain_id)
    }

    pub fn with_chain_ids(query: u64, subscription: u64) -> Self {
        let chain_ids = HashMap::from([
            (RPC_URL.to_string(), query),
            (WS_URL.to_string(), subscription),
        ]);
        Self {
            chain_ids,
            unreachable: Vec::new(),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainConnector for FakeConnector {
    async fn connect(&self, rpc_url: &str) -> Result<ChainClient, ChainError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.iter().any(|u| u == rpc_url) {
            return Err(ChainError::Connection {
                endpoint: rpc_url.to_string(),
                reason: "connection refused".into(),
            });
        }

        let chain_id = self.chain_ids.get(rpc_url).copied().unwrap_or_default();
        let asserter = Asserter::new();
        asserter.push_success(&U64::from(chain_id));

        let endpoint = Url::parse(rpc_url).unwrap();
        let kind = match endpoint.scheme() {
            "ws" | "wss" => ClientKind::Subscription,
            _ => ClientKind::Query,
        };
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter)
            .erased();
        Ok(ChainClient::new(provider, endpoint, kind))
    }
}

/// On-disk inputs for one bootstrap run.
pub struct Fixture {
    pub dir: TempDir,
    pub launch: LaunchConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let launch = LaunchConfig {
            config_file: dir.path().join("aggregator.yaml"),
            aligned_layer_deployment: dir.path().join("aligned_layer_avs_deployment_output.json"),
            shared_avs_contracts_deployment: dir
                .path()
                .join("shared_avs_contracts_deployment_output.json"),
        };
        let fixture = Self { dir, launch };
        fixture.write_config(&config_yaml("", ""));
        fixture.write_service_manifest(SERVICE_MANAGER);
        fixture.write_shared_manifest(OPERATOR_STATE_RETRIEVER);
        fixture
    }

    pub fn write_config(&self, yaml: &str) {
        std::fs::write(&self.launch.config_file, yaml).unwrap();
    }

    pub fn write_service_manifest(&self, service_manager: &str) {
        self.write_service_manifest_with_slasher(service_manager, SLASHER);
    }

    pub fn write_service_manifest_with_slasher(&self, service_manager: &str, slasher: &str) {
        let body = format!(
            r#"{{"addresses": {{"alignedLayerServiceManager": "{service_manager}", "slasher": "{slasher}"}}}}"#
        );
        std::fs::write(&self.launch.aligned_layer_deployment, body).unwrap();
    }

    pub fn write_shared_manifest(&self, retriever: &str) {
        let body = format!(r#"{{"blsOperatorStateRetriever": "{retriever}"}}"#);
        std::fs::write(&self.launch.shared_avs_contracts_deployment, body).unwrap();
    }

    pub fn remove(&self, path: &PathBuf) {
        std::fs::remove_file(path).unwrap();
    }

    pub fn raw(&self) -> ConfigRaw {
        ConfigRaw::load(&self.launch.config_file).unwrap()
    }
}

pub fn config_yaml(compendium: &str, avs_service_manager: &str) -> String {
    format!(
        r#"
environment: development
eth_rpc_url: {RPC_URL}
eth_ws_url: {WS_URL}
aggregator_server_ip_port_address: localhost:8090
register_operator_on_startup: true
bls_public_key_compendium_address: "{compendium}"
avs_service_manager_address: "{avs_service_manager}"
enable_metrics: false
"#
    )
}

pub fn secrets(key: &str) -> Secrets {
    Secrets {
        ecdsa_private_key: key.into(),
    }
}
