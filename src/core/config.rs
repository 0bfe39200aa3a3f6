use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Placeholder endpoint shown in the remote node form; not a credentialed URL.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/YOUR_KEY";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String { "127.0.0.1".to_string() }
    fn default_port() -> u16 { 8888 }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: Self::default_host(), port: Self::default_port() }
    }
}

/// Remote node view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Initial value of the endpoint field on a fresh page
    #[serde(default = "NodeConfig::default_rpc_url")]
    pub default_rpc_url: String,
    /// Transport-level timeout; unset means the HTTP client default (none)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl NodeConfig {
    fn default_rpc_url() -> String { DEFAULT_RPC_URL.to_string() }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { default_rpc_url: Self::default_rpc_url(), request_timeout_secs: None }
    }
}

/// Injected wallet configuration.
///
/// The wallet capability exists only when both `rpc_url` is set and the
/// environment variable named by `key_env` holds a hex signing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default = "WalletConfig::default_key_env")]
    pub key_env: String,
    #[serde(default = "WalletConfig::default_confirmations")]
    pub confirmations: usize,
    #[serde(default = "WalletConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl WalletConfig {
    fn default_key_env() -> String { "DASHBOARD_WALLET_KEY".to_string() }
    fn default_confirmations() -> usize { 1 }
    fn default_poll_interval_ms() -> u64 { 2_000 }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            key_env: Self::default_key_env(),
            confirmations: Self::default_confirmations(),
            poll_interval_ms: Self::default_poll_interval_ms(),
        }
    }
}

/// 本地化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "I18nConfig::default_language")]
    pub language: String,
    /// Directory holding `<lang>.ftl` overrides
    #[serde(default)]
    pub resources_dir: Option<PathBuf>,
}

impl I18nConfig {
    fn default_language() -> String { "zh".to_string() }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self { language: Self::default_language(), resources_dir: None }
    }
}

/// Page session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "SessionConfig::default_max_sessions")]
    pub max_sessions: usize,
}

impl SessionConfig {
    fn default_idle_ttl_secs() -> u64 { 1800 }
    fn default_max_sessions() -> usize { 1024 }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: Self::default_idle_ttl_secs(),
            max_sessions: Self::default_max_sessions(),
        }
    }
}

/// 面板配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl DashboardConfig {
    /// Parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `CONFIG_PATH` (or `config.toml`), falling back to defaults, then
    /// applies environment overrides.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = explicit.map(Path::to_path_buf).unwrap_or_else(|| {
            let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
            PathBuf::from(path)
        });

        let mut config = Self::load(&path).unwrap_or_else(|e| {
            warn!("{:#}. Using default configuration", e);
            Self::default()
        });
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("DASHBOARD_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DASHBOARD_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(e) => warn!("Ignoring DASHBOARD_PORT={}: {}", port, e),
            }
        }
        if let Ok(url) = std::env::var("DASHBOARD_RPC_URL") {
            self.node.default_rpc_url = url;
        }
        if let Ok(url) = std::env::var("DASHBOARD_WALLET_RPC_URL") {
            self.wallet.rpc_url = Some(url);
        }
        if let Ok(lang) = std::env::var("DASHBOARD_LANG") {
            self.i18n.language = lang;
        }
    }
}
