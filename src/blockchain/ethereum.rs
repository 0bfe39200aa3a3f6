use async_trait::async_trait;
use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider},
    types::{Address, NameOrAddress, U256},
};
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, info};

use super::traits::{NetworkIdentity, NodeClient, NodeConnector};
use crate::core::errors::DashboardError;

/// Conventional network name for a chain id, `unknown` otherwise.
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        5 => "goerli",
        11155111 => "sepolia",
        17000 => "holesky",
        10 => "optimism",
        11155420 => "optimism-sepolia",
        42161 => "arbitrum",
        421614 => "arbitrum-sepolia",
        137 => "matic",
        80002 => "matic-amoy",
        56 => "bnb",
        97 => "bnbt",
        8453 => "base",
        84532 => "base-sepolia",
        59144 => "linea",
        _ => "unknown",
    }
}

/// Narrows a reported chain id. The endpoint is user-supplied and may answer
/// with any quantity.
pub fn chain_id_from(value: U256) -> Result<u64, DashboardError> {
    if value > U256::from(u64::MAX) {
        return Err(DashboardError::upstream(format!("chain id {} out of range", value)));
    }
    Ok(value.as_u64())
}

/// Turns user text into an ethers target: a hex address, or an ENS name when
/// it contains a dot. Anything else is rejected the way the client library
/// would reject it.
pub fn parse_target(text: &str) -> Result<NameOrAddress, DashboardError> {
    match Address::from_str(text) {
        Ok(address) => Ok(NameOrAddress::Address(address)),
        Err(_) if text.contains('.') => Ok(NameOrAddress::Name(text.to_string())),
        Err(e) => Err(DashboardError::UpstreamRejected(format!(
            "invalid address \"{}\": {}",
            text, e
        ))),
    }
}

/// JSON-RPC client for one endpoint.
#[derive(Clone, Debug)]
pub struct EthereumNode<P: JsonRpcClient + Clone = Http> {
    provider: Provider<P>,
}

impl EthereumNode<Http> {
    /// Builds a client for `rpc_url`. No request is made until the first read.
    pub fn new(rpc_url: &str, timeout: Option<Duration>) -> Result<Self, DashboardError> {
        let parsed_url = reqwest::Url::parse(rpc_url.trim()).map_err(|e| {
            DashboardError::UpstreamRejected(format!("invalid RPC URL \"{}\": {}", rpc_url, e))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DashboardError::upstream(format!("failed to build HTTP client: {}", e)))?;

        info!("Opening JSON-RPC client for {}", parsed_url.host_str().unwrap_or("<no host>"));
        Ok(Self { provider: Provider::new(Http::new_with_client(parsed_url, client)) })
    }
}

impl<P: JsonRpcClient + Clone> EthereumNode<P> {
    /// Wraps an existing provider; used with `MockProvider` in tests.
    pub fn with_provider(provider: Provider<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> NodeClient for EthereumNode<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    async fn get_network(&self) -> Result<NetworkIdentity, DashboardError> {
        let chain_id = chain_id_from(self.provider.get_chainid().await?)?;
        let network = NetworkIdentity { name: network_name(chain_id).to_string(), chain_id };
        debug!(chain_id, name = %network.name, "network identity");
        Ok(network)
    }

    async fn get_block_number(&self) -> Result<u64, DashboardError> {
        let block_number = self.provider.get_block_number().await?;
        debug!("latest block: {}", block_number);
        Ok(block_number.as_u64())
    }

    async fn get_balance(&self, address: &str) -> Result<U256, DashboardError> {
        debug!("Getting balance for address: {}", address);
        let target = parse_target(address)?;
        Ok(self.provider.get_balance(target, None).await?)
    }
}

/// Opens HTTP JSON-RPC clients.
#[derive(Clone, Debug, Default)]
pub struct HttpNodeConnector {
    timeout: Option<Duration>,
}

impl HttpNodeConnector {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl NodeConnector for HttpNodeConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn NodeClient>, DashboardError> {
        Ok(Arc::new(EthereumNode::new(rpc_url, self.timeout)?))
    }
}
