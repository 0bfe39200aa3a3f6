//! Remote Node View: read network identity, block height and balances from a
//! user-supplied JSON-RPC endpoint.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::cell::{Gated, StateCell};
use crate::blockchain::traits::{NetworkIdentity, NodeClient, NodeConnector};
use crate::core::errors::DashboardError;
use crate::core::units;
use crate::i18n::{MessageKey, Messages};

#[derive(Clone, Default)]
pub struct NodeState {
    pub rpc_url: String,
    pub address: String,
    pub connection: Option<Arc<dyn NodeClient>>,
    pub network: Option<NetworkIdentity>,
    pub latest_block: Option<u64>,
    /// Formatted result, e.g. `"0.0 ETH"`
    pub balance: Option<String>,
    pub status: String,
    pub busy: bool,
}

impl Gated for NodeState {
    fn busy_mut(&mut self) -> &mut bool {
        &mut self.busy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub rpc_url: String,
    pub address: String,
    pub connected: bool,
    pub network: Option<NetworkIdentity>,
    /// `"{name} · Chain ID {id}"`
    pub network_label: Option<String>,
    pub latest_block: Option<u64>,
    pub balance: Option<String>,
    pub status: String,
    pub busy: bool,
}

pub struct RemoteNodeView {
    connector: Arc<dyn NodeConnector>,
    messages: Arc<Messages>,
    state: StateCell<NodeState>,
}

impl RemoteNodeView {
    pub fn new(
        connector: Arc<dyn NodeConnector>,
        messages: Arc<Messages>,
        default_rpc_url: impl Into<String>,
    ) -> Self {
        let state = NodeState {
            rpc_url: default_rpc_url.into(),
            status: messages.text(MessageKey::NodeStatusInitial),
            ..NodeState::default()
        };
        Self { connector, messages, state: StateCell::new(state) }
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        self.state.read(|s| NodeSnapshot {
            rpc_url: s.rpc_url.clone(),
            address: s.address.clone(),
            connected: s.connection.is_some(),
            network: s.network.clone(),
            network_label: s.network.as_ref().map(NetworkIdentity::label),
            latest_block: s.latest_block,
            balance: s.balance.clone(),
            status: s.status.clone(),
            busy: s.busy,
        })
    }

    fn set_status(&self, key: MessageKey) {
        let text = self.messages.text(key);
        self.state.update(|s| s.status = text);
    }

    fn fail(&self, err: DashboardError, fallback: MessageKey) -> DashboardError {
        error!("node view: {}", err);
        let text = err.message_or(&self.messages.text(fallback));
        self.state.update(|s| s.status = text);
        err
    }

    /// Opens a client for the endpoint and reads network identity and the
    /// latest block concurrently. `rpc_url` replaces the stored URL first;
    /// `None` keeps it. Both reads must succeed, otherwise nothing but the
    /// status changes.
    pub async fn connect(
        &self,
        rpc_url: Option<String>,
    ) -> Result<NetworkIdentity, DashboardError> {
        let (_busy, rpc_url) = self.state.try_begin_with(
            || self.messages.text(MessageKey::Busy),
            |s| {
                if let Some(rpc_url) = rpc_url {
                    s.rpc_url = rpc_url;
                }
                s.rpc_url.clone()
            },
        )?;
        self.set_status(MessageKey::NodeStatusConnecting);

        match self.open(&rpc_url).await {
            Ok((client, network, latest_block)) => {
                info!(network = %network.label(), latest_block, "remote node connected");
                let text = self.messages.text(MessageKey::NodeStatusConnected);
                let result = network.clone();
                self.state.update(|s| {
                    s.connection = Some(client);
                    s.network = Some(network);
                    s.latest_block = Some(latest_block);
                    s.balance = None;
                    s.status = text;
                });
                Ok(result)
            }
            Err(e) => Err(self.fail(e, MessageKey::NodeStatusConnectFailed)),
        }
    }

    async fn open(
        &self,
        rpc_url: &str,
    ) -> Result<(Arc<dyn NodeClient>, NetworkIdentity, u64), DashboardError> {
        let client = self.connector.connect(rpc_url)?;
        let (network, latest_block) =
            tokio::try_join!(client.get_network(), client.get_block_number())?;
        Ok((client, network, latest_block))
    }

    /// Queries the balance of an address. `address` replaces the stored
    /// query field first; `None` keeps it. Returns the formatted result,
    /// e.g. `"0.0 ETH"`.
    pub async fn read_balance(&self, address: Option<String>) -> Result<String, DashboardError> {
        let (_busy, (client, address)) = self.state.try_begin_with(
            || self.messages.text(MessageKey::Busy),
            |s| {
                if let Some(address) = address {
                    s.address = address;
                }
                (s.connection.clone(), s.address.clone())
            },
        )?;

        let Some(client) = client else {
            self.set_status(MessageKey::NodeStatusConnectFirst);
            return Err(DashboardError::precondition(
                self.messages.text(MessageKey::NodeStatusConnectFirst),
            ));
        };
        if address.is_empty() {
            self.set_status(MessageKey::NodeStatusEnterAddress);
            return Err(DashboardError::precondition(
                self.messages.text(MessageKey::NodeStatusEnterAddress),
            ));
        }

        self.set_status(MessageKey::NodeStatusReading);
        match client.get_balance(&address).await {
            Ok(wei) => {
                let balance = units::format_balance(wei);
                let text = self.messages.text(MessageKey::NodeStatusReadDone);
                let result = balance.clone();
                self.state.update(|s| {
                    s.balance = Some(balance);
                    s.status = text;
                });
                Ok(result)
            }
            Err(e) => Err(self.fail(e, MessageKey::NodeStatusReadFailed)),
        }
    }
}
