//! Wallet Transfer View: connect an injected wallet, show its balance, send
//! a native-currency transfer.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::cell::{Gated, StateCell};
use crate::blockchain::traits::{TransferRequest, WalletProvider, WalletSigner};
use crate::core::errors::DashboardError;
use crate::core::units;
use crate::i18n::{MessageKey, Messages};

/// Live channel to the injected wallet.
#[derive(Clone)]
pub struct WalletConnection {
    pub provider: Arc<dyn WalletProvider>,
    pub signer: Arc<dyn WalletSigner>,
}

/// The active signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountContext {
    pub address: String,
    /// Ether amount, e.g. `"1.5"`
    pub balance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferForm {
    pub to_address: String,
    pub amount: String,
}

#[derive(Clone, Default)]
pub struct TransferState {
    pub connection: Option<WalletConnection>,
    pub account: Option<AccountContext>,
    pub form: TransferForm,
    pub status: String,
    pub busy: bool,
}

impl Gated for TransferState {
    fn busy_mut(&mut self) -> &mut bool {
        &mut self.busy
    }
}

impl TransferState {
    pub fn is_ready(&self) -> bool {
        self.connection.is_some() && self.account.is_some()
    }
}

/// Serializable copy of the view state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferSnapshot {
    pub account: Option<AccountContext>,
    pub form: TransferForm,
    pub status: String,
    pub busy: bool,
    pub ready: bool,
}

impl TransferSnapshot {
    pub fn can_send(&self) -> bool {
        self.ready && !self.busy
    }
}

pub struct WalletTransferView {
    capability: Option<Arc<dyn WalletProvider>>,
    messages: Arc<Messages>,
    state: StateCell<TransferState>,
}

impl WalletTransferView {
    /// `capability` is the injected wallet, `None` when no wallet is present.
    pub fn new(capability: Option<Arc<dyn WalletProvider>>, messages: Arc<Messages>) -> Self {
        let state = TransferState {
            status: messages.text(MessageKey::WalletStatusIdle),
            ..TransferState::default()
        };
        Self { capability, messages, state: StateCell::new(state) }
    }

    pub fn snapshot(&self) -> TransferSnapshot {
        self.state.read(|s| TransferSnapshot {
            account: s.account.clone(),
            form: s.form.clone(),
            status: s.status.clone(),
            busy: s.busy,
            ready: s.is_ready(),
        })
    }

    fn set_status(&self, key: MessageKey) {
        let text = self.messages.text(key);
        self.state.update(|s| s.status = text);
    }

    fn fail(&self, err: DashboardError, fallback: MessageKey) -> DashboardError {
        error!("wallet view: {}", err);
        let text = err.message_or(&self.messages.text(fallback));
        self.state.update(|s| s.status = text);
        err
    }

    fn busy_text(&self) -> String {
        self.messages.text(MessageKey::Busy)
    }

    /// Requests account authorization from the injected wallet and loads the
    /// account. The previous connection stays in place if anything fails.
    pub async fn connect(&self) -> Result<(), DashboardError> {
        let _busy = self.state.try_begin(|| self.busy_text())?;
        self.set_status(MessageKey::WalletStatusRequesting);

        let Some(provider) = self.capability.clone() else {
            self.set_status(MessageKey::WalletStatusAbsent);
            return Err(DashboardError::CapabilityAbsent);
        };

        match Self::authorize(provider).await {
            Ok((connection, account)) => {
                info!(address = %account.address, "wallet connected");
                let text = self.messages.text(MessageKey::WalletStatusConnected);
                self.state.update(|s| {
                    s.connection = Some(connection);
                    s.account = Some(account);
                    s.status = text;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(e, MessageKey::WalletStatusConnectFailed)),
        }
    }

    async fn authorize(
        provider: Arc<dyn WalletProvider>,
    ) -> Result<(WalletConnection, AccountContext), DashboardError> {
        let accounts = provider.request_accounts().await?;
        let requested = accounts.into_iter().next().ok_or_else(|| {
            DashboardError::UpstreamRejected("wallet returned no authorized accounts".to_string())
        })?;
        let signer = provider.get_signer(&requested).await?;
        let address = signer.address();
        let balance = provider.get_balance(&address).await?;

        Ok((
            WalletConnection { provider, signer },
            AccountContext { address, balance: units::format_ether_compact(balance) },
        ))
    }

    /// Re-reads the balance of the connected account. Silently does nothing
    /// when there is no connection.
    pub async fn refresh_balance(&self) -> Result<(), DashboardError> {
        let current = self.state.read(|s| {
            match (s.connection.as_ref(), s.account.as_ref()) {
                (Some(c), Some(a)) => Some((c.provider.clone(), a.address.clone())),
                _ => None,
            }
        });
        let Some((provider, address)) = current else {
            return Ok(());
        };

        let balance = units::format_ether_compact(provider.get_balance(&address).await?);
        self.state.update(|s| {
            if let Some(account) = s.account.as_mut().filter(|a| a.address == address) {
                account.balance = balance;
            }
        });
        Ok(())
    }

    /// Stores the form fields as typed, then sends the transfer and waits for
    /// confirmation. Returns the transaction hash. While another operation is
    /// outstanding the call is rejected and the form is left as it was.
    pub async fn send_transfer(
        &self,
        to_address: impl Into<String>,
        amount: impl Into<String>,
    ) -> Result<String, DashboardError> {
        let form = TransferForm { to_address: to_address.into(), amount: amount.into() };
        let (_busy, signer) = self.state.try_begin_with(
            || self.busy_text(),
            |s| {
                s.form = form.clone();
                s.connection.as_ref().map(|c| c.signer.clone())
            },
        )?;

        let Some(signer) = signer else {
            self.set_status(MessageKey::WalletStatusConnectFirst);
            return Err(DashboardError::precondition(
                self.messages.text(MessageKey::WalletStatusConnectFirst),
            ));
        };
        if form.to_address.is_empty() || form.amount.is_empty() {
            self.set_status(MessageKey::WalletStatusFillFields);
            return Err(DashboardError::precondition(
                self.messages.text(MessageKey::WalletStatusFillFields),
            ));
        }

        self.set_status(MessageKey::WalletStatusSubmitting);
        match self.submit(signer, form).await {
            Ok(tx_hash) => Ok(tx_hash),
            Err(e) => Err(self.fail(e, MessageKey::WalletStatusTransferFailed)),
        }
    }

    async fn submit(
        &self,
        signer: Arc<dyn WalletSigner>,
        form: TransferForm,
    ) -> Result<String, DashboardError> {
        let value = units::parse_amount(&form.amount)?;
        let tx_hash =
            signer.send_transaction(TransferRequest { to: form.to_address, value }).await?;

        let sent = self.messages.text_with(MessageKey::WalletStatusSent, &[("hash", &tx_hash)]);
        self.state.update(|s| s.status = sent);

        signer.wait_for_confirmation(&tx_hash).await?;
        self.refresh_balance().await?;

        let confirmed = self.messages.text(MessageKey::WalletStatusConfirmed);
        self.state.update(|s| {
            s.status = confirmed;
            s.form.amount.clear();
        });
        info!(tx_hash = %tx_hash, "transfer confirmed");
        Ok(tx_hash)
    }
}
