// src/views/mod.rs

pub mod cell;
pub mod node;
pub mod shell;
pub mod transfer;

pub use node::{NodeSnapshot, RemoteNodeView};
pub use shell::Route;
pub use transfer::{TransferSnapshot, WalletTransferView};
