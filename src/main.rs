// src/main.rs
//! Web3 Dashboard entry point
//! Starts the dashboard server, or probes a remote node from the terminal.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use web3_dashboard::api::DashboardServer;
use web3_dashboard::blockchain::traits::WalletProvider;
use web3_dashboard::blockchain::{HttpNodeConnector, KeyedWallet};
use web3_dashboard::core::config::DashboardConfig;
use web3_dashboard::i18n::{init_languages, Messages};
use web3_dashboard::views::RemoteNodeView;

#[derive(Parser)]
#[command(name = "web3-dashboard")]
#[command(about = "Ethereum wallet and remote node dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to the TOML config file (defaults to $CONFIG_PATH or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve {
        /// Address to bind the server to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind the server to
        #[arg(long)]
        port: Option<u16>,
    },
    /// Connect to a JSON-RPC endpoint and print what the node view shows
    Probe {
        /// Endpoint URL (defaults to the configured one)
        #[arg(long)]
        rpc_url: Option<String>,
        /// Also read the balance of this address
        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging()?;

    info!("Starting Web3 Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let mut config = DashboardConfig::load_or_default(args.config.as_deref());
    let messages = Arc::new(load_messages(&config)?);

    match args.command {
        Some(Commands::Probe { rpc_url, address }) => {
            probe(&config, messages, rpc_url, address).await
        }
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, messages).await
        }
        None => {
            info!(
                "No command specified, starting server on {}:{}",
                config.server.host, config.server.port
            );
            serve(config, messages).await
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_messages(config: &DashboardConfig) -> Result<Messages> {
    let language = config.i18n.language.as_str();
    let manager = init_languages(language, config.i18n.resources_dir.as_deref())
        .context("Failed to load localized messages")?;
    Ok(Messages::new(manager, language))
}

async fn serve(config: DashboardConfig, messages: Arc<Messages>) -> Result<()> {
    let wallet: Option<Arc<dyn WalletProvider>> = match KeyedWallet::from_config(&config.wallet)? {
        Some(wallet) => {
            info!("Injected wallet available for {}", wallet.address());
            Some(Arc::new(wallet) as Arc<dyn WalletProvider>)
        }
        None => None,
    };
    let connector = Arc::new(HttpNodeConnector::new(config.node.request_timeout()));

    DashboardServer::new(config, messages, wallet, connector).start().await
}

async fn probe(
    config: &DashboardConfig,
    messages: Arc<Messages>,
    rpc_url: Option<String>,
    address: Option<String>,
) -> Result<()> {
    let connector = Arc::new(HttpNodeConnector::new(config.node.request_timeout()));
    let view = RemoteNodeView::new(
        connector,
        messages,
        rpc_url.unwrap_or_else(|| config.node.default_rpc_url.clone()),
    );

    let outcome = view.connect(None).await;
    let snapshot = view.snapshot();
    println!("{}", snapshot.status);
    let network = outcome?;
    println!("{}", network.label());
    if let Some(block) = snapshot.latest_block {
        println!("latest block: {}", block);
    }

    if let Some(address) = address {
        let outcome = view.read_balance(Some(address)).await;
        println!("{}", view.snapshot().status);
        println!("{}", outcome?);
    }
    Ok(())
}
