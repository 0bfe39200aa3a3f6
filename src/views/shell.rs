//! Navigation shell: maps paths to the two views. Carries no state.

use serde::Serialize;

use crate::i18n::{MessageKey, Messages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    WalletTransfer,
    RemoteNode,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::WalletTransfer, Route::RemoteNode];

    pub fn path(&self) -> &'static str {
        match self {
            Route::WalletTransfer => "/",
            Route::RemoteNode => "/provider",
        }
    }

    pub fn label(&self) -> MessageKey {
        match self {
            Route::WalletTransfer => MessageKey::NavWallet,
            Route::RemoteNode => MessageKey::NavProvider,
        }
    }

    /// `/` only matches exactly; other routes also match their sub-paths.
    pub fn is_active(&self, current_path: &str) -> bool {
        match self {
            Route::WalletTransfer => current_path == "/" || current_path.is_empty(),
            other => {
                let base = other.path();
                current_path == base
                    || current_path
                        .strip_prefix(base)
                        .map(|rest| rest.starts_with('/'))
                        .unwrap_or(false)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub path: &'static str,
    pub active: bool,
}

pub fn nav_links(messages: &Messages, current_path: &str) -> Vec<NavLink> {
    Route::ALL
        .iter()
        .map(|route| NavLink {
            label: messages.text(route.label()),
            path: route.path(),
            active: route.is_active(current_path),
        })
        .collect()
}
