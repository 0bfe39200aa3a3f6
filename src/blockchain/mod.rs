pub mod ethereum;
pub mod traits;
pub mod wallet;

pub use ethereum::{EthereumNode, HttpNodeConnector};
pub use traits::{NodeClient, NodeConnector, WalletProvider, WalletSigner};
pub use wallet::KeyedWallet;
