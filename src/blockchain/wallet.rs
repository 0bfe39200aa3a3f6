//! Injected wallet capability backed by a locally held signing key.
//!
//! 浏览器中的 EIP-1193 钱包在服务端的对应物：签名密钥从环境变量读取，
//! 交易通过配置的 RPC 节点广播。没有密钥或 RPC 地址时能力视为缺失。

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, JsonRpcClient, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Eip1559TransactionRequest, H256, U256, U64},
    utils::to_checksum,
};
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::ethereum::{chain_id_from, parse_target};
use super::traits::{TransferRequest, WalletProvider, WalletSigner};
use crate::core::config::WalletConfig;
use crate::core::errors::DashboardError;

/// Decodes a hex private key (with or without `0x`) into a wallet.
pub fn wallet_from_hex(key_hex: &str) -> anyhow::Result<LocalWallet> {
    let trimmed = key_hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = Zeroizing::new(
        hex::decode(digits).map_err(|e| anyhow::anyhow!("Invalid signing key hex: {}", e))?,
    );
    if bytes.len() != 32 {
        anyhow::bail!("Signing key must be 32 bytes");
    }
    LocalWallet::from_bytes(&bytes).map_err(|e| anyhow::anyhow!("Invalid signing key: {}", e))
}

/// Wallet capability: one signing key attached to a JSON-RPC provider.
#[derive(Clone, Debug)]
pub struct KeyedWallet<P: JsonRpcClient + Clone = Http> {
    provider: Provider<P>,
    wallet: LocalWallet,
    confirmations: usize,
    poll_interval: Duration,
}

impl KeyedWallet<Http> {
    /// Builds the capability from config. Returns `Ok(None)` when the RPC URL
    /// or the signing key is not configured.
    pub fn from_config(config: &WalletConfig) -> anyhow::Result<Option<Self>> {
        let Some(rpc_url) = config.rpc_url.as_deref() else {
            info!("No wallet RPC URL configured; wallet capability absent");
            return Ok(None);
        };
        let key_hex = match std::env::var(&config.key_env) {
            Ok(v) if !v.trim().is_empty() => Zeroizing::new(v),
            _ => {
                info!("{} not set; wallet capability absent", config.key_env);
                return Ok(None);
            }
        };

        let wallet = wallet_from_hex(&key_hex)?;
        let provider = Provider::<Http>::try_from(rpc_url.trim())
            .map_err(|e| anyhow::anyhow!("Invalid wallet RPC URL '{}': {}", rpc_url, e))?
            .interval(config.poll_interval());

        info!(address = %to_checksum(&wallet.address(), None), "Wallet capability ready");
        Ok(Some(Self {
            provider,
            wallet,
            confirmations: config.confirmations.max(1),
            poll_interval: config.poll_interval(),
        }))
    }
}

impl<P: JsonRpcClient + Clone> KeyedWallet<P> {
    /// Creates a wallet with a given provider. Useful with `MockProvider`.
    pub fn with_provider(provider: Provider<P>, wallet: LocalWallet) -> Self {
        Self { provider, wallet, confirmations: 1, poll_interval: Duration::from_millis(10) }
    }

    pub fn address(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }
}

#[async_trait]
impl<P> WalletProvider for KeyedWallet<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    async fn request_accounts(&self) -> Result<Vec<String>, DashboardError> {
        Ok(vec![self.address()])
    }

    async fn get_signer(&self, address: &str) -> Result<Arc<dyn WalletSigner>, DashboardError> {
        if !address.eq_ignore_ascii_case(&self.address()) {
            return Err(DashboardError::UpstreamRejected(format!(
                "unknown account {}",
                address
            )));
        }

        let chain_id = chain_id_from(self.provider.get_chainid().await?)?;
        debug!(chain_id, "binding signer");
        let wallet = self.wallet.clone().with_chain_id(chain_id);

        Ok(Arc::new(KeyedSigner {
            client: SignerMiddleware::new(self.provider.clone(), wallet),
            confirmations: self.confirmations,
            poll_interval: self.poll_interval,
        }))
    }

    async fn get_balance(&self, address: &str) -> Result<U256, DashboardError> {
        let target = parse_target(address)?;
        Ok(self.provider.get_balance(target, None).await?)
    }
}

/// Signer bound to the wallet's account and the provider's chain id.
#[derive(Debug)]
pub struct KeyedSigner<P: JsonRpcClient + Clone = Http> {
    client: SignerMiddleware<Provider<P>, LocalWallet>,
    confirmations: usize,
    poll_interval: Duration,
}

#[async_trait]
impl<P> WalletSigner for KeyedSigner<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    fn address(&self) -> String {
        to_checksum(&self.client.address(), None)
    }

    async fn send_transaction(&self, request: TransferRequest) -> Result<String, DashboardError> {
        info!("Sending {} wei to {}", request.value, request.to);
        let to = parse_target(&request.to)?;

        // Nonce, gas and fees are left to the signer middleware.
        let tx = Eip1559TransactionRequest::new().to(to).value(request.value);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(DashboardError::upstream)?;

        let tx_hash = format!("0x{}", hex::encode(pending.tx_hash().as_bytes()));
        info!(tx_hash = %tx_hash, "Transaction sent");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), DashboardError> {
        let hash = H256::from_str(tx_hash).map_err(|e| {
            DashboardError::UpstreamRejected(format!("invalid transaction hash: {}", e))
        })?;

        let receipt = PendingTransaction::new(hash, self.client.provider())
            .interval(self.poll_interval)
            .confirmations(self.confirmations)
            .await?;

        match receipt {
            Some(receipt) if receipt.status == Some(U64::from(0)) => {
                warn!(tx_hash, "Transaction reverted");
                Err(DashboardError::UpstreamRejected("transaction execution reverted".to_string()))
            }
            Some(receipt) => {
                info!(tx_hash, block = ?receipt.block_number, "Transaction confirmed");
                Ok(())
            }
            None => {
                warn!(tx_hash, "Transaction dropped");
                Err(DashboardError::UpstreamRejected(
                    "transaction was dropped from the mempool".to_string(),
                ))
            }
        }
    }
}
