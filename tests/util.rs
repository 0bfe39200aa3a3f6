// tests/util.rs
// Shared test doubles for the wallet capability and remote nodes

#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::U256;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use web3_dashboard::blockchain::traits::{
    NetworkIdentity, NodeClient, NodeConnector, TransferRequest, WalletProvider, WalletSigner,
};
use web3_dashboard::core::errors::DashboardError;
use web3_dashboard::i18n::Messages;

pub const ACCOUNT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const RECIPIENT: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";

pub fn zh() -> Arc<Messages> {
    Arc::new(Messages::bundled("zh").unwrap())
}

pub fn ether(amount: &str) -> U256 {
    ethers::utils::parse_ether(amount).unwrap()
}

/// Polls `condition` until it holds; panics after about two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

async fn pass_gate(gate: &Mutex<Option<Arc<Notify>>>) {
    let gate = gate.lock().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

/// Wallet capability backed by an in-memory ledger.
pub struct FakeWallet {
    pub accounts: Mutex<Result<Vec<String>, DashboardError>>,
    pub balance: Arc<Mutex<U256>>,
    pub signer: Arc<FakeSigner>,
    pub approval_gate: Mutex<Option<Arc<Notify>>>,
    pub account_requests: AtomicUsize,
    pub balance_reads: AtomicUsize,
}

impl FakeWallet {
    pub fn new(address: &str, balance: U256) -> Arc<Self> {
        let ledger = Arc::new(Mutex::new(balance));
        Arc::new(Self {
            accounts: Mutex::new(Ok(vec![address.to_string()])),
            balance: ledger.clone(),
            signer: Arc::new(FakeSigner::new(address, ledger)),
            approval_gate: Mutex::new(None),
            account_requests: AtomicUsize::new(0),
            balance_reads: AtomicUsize::new(0),
        })
    }

    pub fn reject_accounts(&self, err: DashboardError) {
        *self.accounts.lock() = Err(err);
    }

    pub fn hold_approval(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.approval_gate.lock() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, DashboardError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.approval_gate).await;
        self.accounts.lock().clone()
    }

    async fn get_signer(&self, address: &str) -> Result<Arc<dyn WalletSigner>, DashboardError> {
        if !address.eq_ignore_ascii_case(&self.signer.address) {
            return Err(DashboardError::upstream(format!("unknown account {}", address)));
        }
        Ok(self.signer.clone())
    }

    async fn get_balance(&self, _address: &str) -> Result<U256, DashboardError> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balance.lock())
    }
}

/// Signer that records submissions and debits the shared ledger.
pub struct FakeSigner {
    pub address: String,
    pub ledger: Arc<Mutex<U256>>,
    pub sent: Mutex<Vec<TransferRequest>>,
    pub send_error: Mutex<Option<DashboardError>>,
    pub confirm_error: Mutex<Option<DashboardError>>,
    pub confirmation_gate: Mutex<Option<Arc<Notify>>>,
    pub confirmations: AtomicUsize,
}

impl FakeSigner {
    fn new(address: &str, ledger: Arc<Mutex<U256>>) -> Self {
        Self {
            address: address.to_string(),
            ledger,
            sent: Mutex::new(Vec::new()),
            send_error: Mutex::new(None),
            confirm_error: Mutex::new(None),
            confirmation_gate: Mutex::new(None),
            confirmations: AtomicUsize::new(0),
        }
    }

    pub fn hold_confirmation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.confirmation_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl WalletSigner for FakeSigner {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn send_transaction(&self, request: TransferRequest) -> Result<String, DashboardError> {
        if let Some(err) = self.send_error.lock().clone() {
            return Err(err);
        }
        let mut sent = self.sent.lock();
        sent.push(request);
        Ok(format!("0x{:064x}", sent.len()))
    }

    async fn wait_for_confirmation(&self, _tx_hash: &str) -> Result<(), DashboardError> {
        pass_gate(&self.confirmation_gate).await;
        if let Some(err) = self.confirm_error.lock().clone() {
            return Err(err);
        }
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        if let Some(last) = self.sent.lock().last() {
            let mut ledger = self.ledger.lock();
            *ledger = ledger.saturating_sub(last.value);
        }
        Ok(())
    }
}

/// Remote node with scripted responses.
pub struct FakeNode {
    pub network: Mutex<Result<NetworkIdentity, DashboardError>>,
    pub block: Mutex<Result<u64, DashboardError>>,
    pub balances: Mutex<HashMap<String, U256>>,
    pub balance_error: Mutex<Option<DashboardError>>,
    pub block_gate: Mutex<Option<Arc<Notify>>>,
    pub balance_calls: AtomicUsize,
}

impl FakeNode {
    pub fn new(chain_id: u64, name: &str, block: u64) -> Arc<Self> {
        Arc::new(Self {
            network: Mutex::new(Ok(NetworkIdentity { name: name.to_string(), chain_id })),
            block: Mutex::new(Ok(block)),
            balances: Mutex::new(HashMap::new()),
            balance_error: Mutex::new(None),
            block_gate: Mutex::new(None),
            balance_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_balance(&self, address: &str, wei: U256) {
        self.balances.lock().insert(address.to_lowercase(), wei);
    }

    pub fn hold_block(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.block_gate.lock() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl NodeClient for FakeNode {
    async fn get_network(&self) -> Result<NetworkIdentity, DashboardError> {
        self.network.lock().clone()
    }

    async fn get_block_number(&self) -> Result<u64, DashboardError> {
        pass_gate(&self.block_gate).await;
        self.block.lock().clone()
    }

    async fn get_balance(&self, address: &str) -> Result<U256, DashboardError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.balance_error.lock().clone() {
            return Err(err);
        }
        Ok(self.balances.lock().get(&address.to_lowercase()).copied().unwrap_or_default())
    }
}

/// Connector handing out one shared [`FakeNode`].
pub struct FakeConnector {
    pub node: Arc<FakeNode>,
    pub connect_error: Mutex<Option<DashboardError>>,
    pub urls: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new(node: Arc<FakeNode>) -> Arc<Self> {
        Arc::new(Self { node, connect_error: Mutex::new(None), urls: Mutex::new(Vec::new()) })
    }

    pub fn connect_count(&self) -> usize {
        self.urls.lock().len()
    }
}

impl NodeConnector for FakeConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn NodeClient>, DashboardError> {
        self.urls.lock().push(rpc_url.to_string());
        if let Some(err) = self.connect_error.lock().clone() {
            return Err(err);
        }
        Ok(self.node.clone())
    }
}
