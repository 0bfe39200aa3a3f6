use async_trait::async_trait;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::errors::DashboardError;

/// Network identity reported by a JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub name: String,
    pub chain_id: u64,
}

impl NetworkIdentity {
    /// Display label, e.g. `mainnet · Chain ID 1`.
    pub fn label(&self) -> String {
        format!("{} · Chain ID {}", self.name, self.chain_id)
    }
}

/// Read-only client bound to one JSON-RPC endpoint.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Retrieves the network name and chain id.
    async fn get_network(&self) -> Result<NetworkIdentity, DashboardError>;

    /// Gets the latest block number.
    async fn get_block_number(&self) -> Result<u64, DashboardError>;

    /// Retrieves the balance (in wei) of an address. The address text is
    /// handed to the client unvalidated.
    async fn get_balance(&self, address: &str) -> Result<U256, DashboardError>;
}

/// Opens [`NodeClient`]s for user-supplied endpoint URLs.
pub trait NodeConnector: Send + Sync {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn NodeClient>, DashboardError>;
}

/// A native-currency transfer submitted through a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: String,
    pub value: U256,
}

/// EIP-1193 style wallet capability.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`. May suspend until the account holder approves,
    /// and fails with the wallet's own message when they decline.
    async fn request_accounts(&self) -> Result<Vec<String>, DashboardError>;

    /// Obtains a signer bound to an authorized address.
    async fn get_signer(&self, address: &str) -> Result<Arc<dyn WalletSigner>, DashboardError>;

    /// Retrieves the balance (in wei) of an address.
    async fn get_balance(&self, address: &str) -> Result<U256, DashboardError>;
}

/// Signs and broadcasts transactions for one account.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn address(&self) -> String;

    /// Signs and broadcasts the transfer; returns the 0x-prefixed transaction hash.
    async fn send_transaction(&self, request: TransferRequest) -> Result<String, DashboardError>;

    /// Suspends until the transaction is confirmed on chain.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), DashboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_label() {
        let network = NetworkIdentity { name: "mainnet".to_string(), chain_id: 1 };
        assert_eq!(network.label(), "mainnet · Chain ID 1");
    }
}
