use std::str::FromStr;

use alloy::primitives::Address;
use blockchain::{ChainClient, ChainConnector, ClientKind, query_chain_id};
use crypto::{Identity, SigningKey};
use log::{info, warn};
use manifest::records::SLASHER_KEY;

use crate::{
    config::{ConfigRaw, Environment, LaunchConfig, Secrets},
    error::BootstrapError,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    pub operator_state_retriever: Address,
    pub service_manager: Address,
    pub bls_public_key_compendium: Address,
    pub slasher: Address,
    pub avs_service_manager: Address,
}

impl ContractAddresses {
    fn fields(&self) -> [(&'static str, Address, bool); 5] {
        [
            ("operator_state_retriever", self.operator_state_retriever, true),
            ("service_manager", self.service_manager, true),
            ("bls_public_key_compendium", self.bls_public_key_compendium, false),
            ("slasher", self.slasher, false),
            ("avs_service_manager", self.avs_service_manager, false),
        ]
    }

    /// All-or-nothing: every required address must be non-zero. Reports
    /// every violated field at once.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        let missing: Vec<_> = self
            .fields()
            .into_iter()
            .filter(|(_, address, required)| *required && address.is_zero())
            .map(|(name, _, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BootstrapError::MissingRequiredAddresses(missing))
        }
    }
}

/// Validated, immutable runtime configuration of the aggregator. Built once
/// per process by [`AggregatorConfig::assemble`].
#[derive(Debug)]
pub struct AggregatorConfig {
    environment: Environment,
    identity: Identity,
    query_client: ChainClient,
    subscription_client: ChainClient,
    contracts: ContractAddresses,
    server_address: String,
    register_operator_on_startup: bool,
    enable_metrics: bool,
    metrics_address: String,
}

impl AggregatorConfig {
    /// Composes identity, chain clients and manifests into one configuration.
    ///
    /// Everything that can be checked locally (manifests, addresses, key
    /// format) is checked before any endpoint is contacted.
    pub async fn assemble<C>(
        raw: ConfigRaw,
        launch: &LaunchConfig,
        secrets: &Secrets,
        connector: &C,
    ) -> Result<Self, BootstrapError>
    where
        C: ChainConnector + ?Sized,
    {
        let deployment = manifest::load_service_deployment(&launch.aligned_layer_deployment)?;
        let shared = manifest::load_shared_contracts(&launch.shared_avs_contracts_deployment)?;

        let contracts = ContractAddresses {
            operator_state_retriever: shared.operator_state_retriever,
            service_manager: deployment.service_manager,
            bls_public_key_compendium: optional_address(
                "bls_public_key_compendium_address",
                &raw.bls_public_key_compendium_address,
            )?,
            slasher: deployment
                .components
                .get(SLASHER_KEY)
                .copied()
                .unwrap_or(Address::ZERO),
            avs_service_manager: optional_address(
                "avs_service_manager_address",
                &raw.avs_service_manager_address,
            )?,
        };
        contracts.validate()?;

        require_setting(
            "aggregator_server_ip_port_address",
            &raw.aggregator_server_ip_port_address,
        )?;
        if raw.enable_metrics {
            require_setting(
                "eigen_metrics_ip_port_address",
                &raw.eigen_metrics_ip_port_address,
            )?;
        }

        let key = SigningKey::parse(secrets.ecdsa_private_key.expose())?;

        let (query_client, subscription_client) = tokio::try_join!(
            connector.connect(&raw.eth_rpc_url),
            connector.connect(&raw.eth_ws_url)
        )?;
        if subscription_client.kind() != ClientKind::Subscription {
            warn!("eth_ws_url does not use a websocket transport; event subscriptions will fail");
        }

        let (chain_id, subscription_chain_id) = tokio::try_join!(
            query_chain_id(&query_client),
            query_chain_id(&subscription_client)
        )?;
        if chain_id != subscription_chain_id {
            return Err(BootstrapError::ClientChainMismatch {
                query: chain_id,
                subscription: subscription_chain_id,
            });
        }

        let identity = key.bind(chain_id);

        info!(
            "Aggregator identity {} bound to chain {chain_id}",
            identity.address()
        );
        info!(
            "Contracts: operator_state_retriever={} service_manager={} compendium={} avs_service_manager={}",
            contracts.operator_state_retriever,
            contracts.service_manager,
            contracts.bls_public_key_compendium,
            contracts.avs_service_manager
        );

        Ok(Self {
            environment: raw.environment,
            identity,
            query_client,
            subscription_client,
            contracts,
            server_address: raw.aggregator_server_ip_port_address,
            register_operator_on_startup: raw.register_operator_on_startup,
            enable_metrics: raw.enable_metrics,
            metrics_address: raw.eigen_metrics_ip_port_address,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn query_client(&self) -> &ChainClient {
        &self.query_client
    }

    pub fn subscription_client(&self) -> &ChainClient {
        &self.subscription_client
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    pub fn register_operator_on_startup(&self) -> bool {
        self.register_operator_on_startup
    }

    pub fn enable_metrics(&self) -> bool {
        self.enable_metrics
    }

    pub fn metrics_address(&self) -> &str {
        &self.metrics_address
    }
}

/// Empty means "not configured" and maps to the zero sentinel; anything
/// else must parse.
fn optional_address(field: &'static str, value: &str) -> Result<Address, BootstrapError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Address::ZERO);
    }
    Address::from_str(trimmed).map_err(|e| BootstrapError::InvalidAddress {
        field,
        reason: e.to_string(),
    })
}

fn require_setting(field: &'static str, value: &str) -> Result<(), BootstrapError> {
    if value.trim().is_empty() {
        return Err(BootstrapError::InvalidSetting {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const SET: Address = address!("0x9d4454B023096f34B160D6B654540c56A1F81688");

    fn with_fields(mask: u8) -> ContractAddresses {
        let pick = |bit: u8| if mask & (1 << bit) != 0 { SET } else { Address::ZERO };
        ContractAddresses {
            operator_state_retriever: pick(0),
            service_manager: pick(1),
            bls_public_key_compendium: pick(2),
            slasher: pick(3),
            avs_service_manager: pick(4),
        }
    }

    #[test]
    fn rejects_zero_required_addresses() {
        let err = ContractAddresses::default().validate().unwrap_err();
        match err {
            BootstrapError::MissingRequiredAddresses(fields) => {
                assert_eq!(fields, vec!["operator_state_retriever", "service_manager"])
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = with_fields(0b00001).validate().unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::MissingRequiredAddresses(ref fields) if fields == &["service_manager"]
        ));
    }

    #[test]
    fn optional_addresses_may_be_zero() {
        with_fields(0b00011).validate().unwrap();
    }

    #[test]
    fn validation_is_monotonic() {
        for mask in 0u8..32 {
            if with_fields(mask).validate().is_err() {
                continue;
            }
            for bit in 0..5 {
                assert!(
                    with_fields(mask | (1 << bit)).validate().is_ok(),
                    "setting field {bit} invalidated mask {mask:#07b}"
                );
            }
        }
    }

    #[test]
    fn optional_address_parsing() {
        assert_eq!(optional_address("f", "").unwrap(), Address::ZERO);
        assert_eq!(optional_address("f", "  ").unwrap(), Address::ZERO);
        assert_eq!(
            optional_address("f", "0x9d4454B023096f34B160D6B654540c56A1F81688").unwrap(),
            SET
        );
        assert!(matches!(
            optional_address("f", "0x1234"),
            Err(BootstrapError::InvalidAddress { field: "f", .. })
        ));
    }
}
