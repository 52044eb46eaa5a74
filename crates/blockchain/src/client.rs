use std::fmt;

use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::error::{ChainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Request/response transport used for queries and transactions.
    Query,
    /// Websocket transport able to stream subscriptions.
    Subscription,
}

impl ClientKind {
    fn for_url(url: &Url) -> Option<Self> {
        match url.scheme() {
            "http" | "https" => Some(ClientKind::Query),
            "ws" | "wss" => Some(ClientKind::Subscription),
            _ => None,
        }
    }
}

/// A connected RPC handle together with the endpoint it talks to.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    endpoint: Url,
    kind: ClientKind,
}

impl ChainClient {
    pub fn new(provider: DynProvider, endpoint: Url, kind: ClientKind) -> Self {
        Self {
            provider,
            endpoint,
            kind,
        }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }
}

impl fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Establishes a client for `rpc_url`. The transport follows the URL scheme:
/// `http(s)` yields a query client, `ws(s)` a subscription client.
///
/// HTTP transports are lazy, so the endpoint is probed once to make an
/// unreachable node fail here rather than on first use.
pub async fn connect_chain(rpc_url: &str) -> Result<ChainClient> {
    let endpoint = Url::parse(rpc_url.trim()).map_err(|e| ChainError::connection(rpc_url, e))?;
    let kind = ClientKind::for_url(&endpoint).ok_or_else(|| {
        ChainError::connection(
            rpc_url,
            format!("unsupported scheme \"{}\"", endpoint.scheme()),
        )
    })?;

    let provider = match kind {
        ClientKind::Query => {
            let provider = ProviderBuilder::new()
                .connect_http(endpoint.clone())
                .erased();
            provider
                .get_block_number()
                .await
                .map_err(|e| ChainError::connection(rpc_url, e))?;
            provider
        }
        ClientKind::Subscription => ProviderBuilder::new()
            .connect_ws(WsConnect::new(endpoint.as_str()))
            .await
            .map_err(|e| ChainError::connection(rpc_url, e))?
            .erased(),
    };

    info!("Connected {kind:?} client to {}", redact(&endpoint));
    Ok(ChainClient::new(provider, endpoint, kind))
}

/// Retrieves the chain identifier reported by the network behind `client`.
pub async fn query_chain_id(client: &ChainClient) -> Result<u64> {
    let chain_id = client
        .provider
        .get_chain_id()
        .await
        .map_err(|e| ChainError::ChainQuery(e.to_string()))?;
    debug!("{} reports chain id {chain_id}", redact(&client.endpoint));
    Ok(chain_id)
}

/// Endpoint URLs often carry API keys in the path or query; only the origin
/// goes to the log.
fn redact(endpoint: &Url) -> String {
    endpoint.origin().ascii_serialization()
}

/// Seam between configuration assembly and the transport layer.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, rpc_url: &str) -> Result<ChainClient>;
}

/// Connector backed by real RPC transports.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcConnector;

#[async_trait]
impl ChainConnector for RpcConnector {
    async fn connect(&self, rpc_url: &str) -> Result<ChainClient> {
        connect_chain(rpc_url).await
    }
}
