use anyhow::Result;
use fluent::FluentResource;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentArgs;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

const BUNDLED: [(&str, &str); 2] = [
    ("zh", include_str!("../../resources/i18n/zh.ftl")),
    ("en", include_str!("../../resources/i18n/en.ftl")),
];

pub struct I18nManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl I18nManager {
    pub fn new(default_language: String) -> Self {
        info!("Initializing internationalization manager (default: {})", default_language);

        Self { bundles: HashMap::new(), default_language }
    }

    pub fn load_language(&mut self, language: &str, content: &str) -> Result<()> {
        debug!("Loading language: {}", language);

        let resource = FluentResource::try_new(content.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to parse Fluent resource: {:?}", e))?;

        let mut bundle = FluentBundle::new_concurrent(vec![language
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid language code: {}", e))?]);
        bundle.set_use_isolating(false);

        bundle
            .add_resource(resource)
            .map_err(|e| anyhow::anyhow!("Failed to add resource to bundle: {:?}", e))?;

        self.bundles.insert(language.to_string(), bundle);

        info!("Loaded language: {}", language);
        Ok(())
    }

    pub fn get_text(&self, language: &str, key: &str, args: Option<&FluentArgs>) -> String {
        let bundle =
            self.bundles.get(language).or_else(|| self.bundles.get(&self.default_language));

        let Some(bundle) = bundle else {
            warn!("Language '{}' not loaded, fallback to key", language);
            return key.to_string();
        };
        let Some(pattern) = bundle.get_message(key).and_then(|m| m.value()) else {
            warn!("Message '{}' not found in language '{}'", key, language);
            return key.to_string();
        };

        let mut errors = vec![];
        let result = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting message '{}': {:?}", key, errors);
        }
        result.to_string()
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }
}

/// Loads the bundled languages, then lets `<dir>/<lang>.ftl` files replace them.
pub fn init_languages(default_language: &str, resources_dir: Option<&Path>) -> Result<I18nManager> {
    let mut manager = I18nManager::new(default_language.to_string());

    for (language, content) in BUNDLED {
        let override_content = resources_dir
            .map(|dir| dir.join(format!("{}.ftl", language)))
            .and_then(|path| match std::fs::read_to_string(&path) {
                Ok(s) => Some(s),
                Err(e) => {
                    debug!("No override at {}: {}", path.display(), e);
                    None
                }
            });
        manager.load_language(language, override_content.as_deref().unwrap_or(content))?;
    }

    if !manager.is_language_supported(default_language) {
        warn!("Language '{}' is not bundled; messages fall back to keys", default_language);
    }
    Ok(manager)
}

/// Every user-visible text the pages and views produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AppBadge,
    AppTitle,
    AppDesc,
    AppStatNetworkLabel,
    AppStatNetwork,
    AppStatModeLabel,
    AppStatMode,
    NavWallet,
    NavProvider,

    WalletPanelLabel,
    WalletPanelTitle,
    WalletPanelDesc,
    WalletConnect,
    WalletReconnect,
    WalletOverview,
    WalletAddress,
    WalletBalance,
    WalletLinkState,
    WalletConnected,
    WalletDisconnected,
    WalletTransferTitle,
    WalletToAddress,
    WalletAmount,
    WalletSend,
    WalletSending,
    WalletStatusIdle,
    WalletStatusRequesting,
    WalletStatusAbsent,
    WalletStatusConnected,
    WalletStatusConnectFailed,
    WalletStatusConnectFirst,
    WalletStatusFillFields,
    WalletStatusSubmitting,
    WalletStatusSent,
    WalletStatusConfirmed,
    WalletStatusTransferFailed,

    NodePanelLabel,
    NodePanelTitle,
    NodePanelDesc,
    NodeConnection,
    NodeRpcUrl,
    NodeConnect,
    NodeConnecting,
    NodeDetails,
    NodeNetwork,
    NodeLatestBlock,
    NodeBalanceResult,
    NodeReadTitle,
    NodeAddress,
    NodeRead,
    NodeReading,
    NodeStatusInitial,
    NodeStatusConnecting,
    NodeStatusConnected,
    NodeStatusConnectFailed,
    NodeStatusConnectFirst,
    NodeStatusEnterAddress,
    NodeStatusReading,
    NodeStatusReadDone,
    NodeStatusReadFailed,

    Busy,
}

impl MessageKey {
    pub fn id(self) -> &'static str {
        use MessageKey::*;
        match self {
            AppBadge => "app-badge",
            AppTitle => "app-title",
            AppDesc => "app-desc",
            AppStatNetworkLabel => "app-stat-network-label",
            AppStatNetwork => "app-stat-network",
            AppStatModeLabel => "app-stat-mode-label",
            AppStatMode => "app-stat-mode",
            NavWallet => "nav-wallet",
            NavProvider => "nav-provider",

            WalletPanelLabel => "wallet-panel-label",
            WalletPanelTitle => "wallet-panel-title",
            WalletPanelDesc => "wallet-panel-desc",
            WalletConnect => "wallet-connect",
            WalletReconnect => "wallet-reconnect",
            WalletOverview => "wallet-overview",
            WalletAddress => "wallet-address",
            WalletBalance => "wallet-balance",
            WalletLinkState => "wallet-link-state",
            WalletConnected => "wallet-connected",
            WalletDisconnected => "wallet-disconnected",
            WalletTransferTitle => "wallet-transfer-title",
            WalletToAddress => "wallet-to-address",
            WalletAmount => "wallet-amount",
            WalletSend => "wallet-send",
            WalletSending => "wallet-sending",
            WalletStatusIdle => "wallet-status-idle",
            WalletStatusRequesting => "wallet-status-requesting",
            WalletStatusAbsent => "wallet-status-absent",
            WalletStatusConnected => "wallet-status-connected",
            WalletStatusConnectFailed => "wallet-status-connect-failed",
            WalletStatusConnectFirst => "wallet-status-connect-first",
            WalletStatusFillFields => "wallet-status-fill-fields",
            WalletStatusSubmitting => "wallet-status-submitting",
            WalletStatusSent => "wallet-status-sent",
            WalletStatusConfirmed => "wallet-status-confirmed",
            WalletStatusTransferFailed => "wallet-status-transfer-failed",

            NodePanelLabel => "node-panel-label",
            NodePanelTitle => "node-panel-title",
            NodePanelDesc => "node-panel-desc",
            NodeConnection => "node-connection",
            NodeRpcUrl => "node-rpc-url",
            NodeConnect => "node-connect",
            NodeConnecting => "node-connecting",
            NodeDetails => "node-details",
            NodeNetwork => "node-network",
            NodeLatestBlock => "node-latest-block",
            NodeBalanceResult => "node-balance-result",
            NodeReadTitle => "node-read-title",
            NodeAddress => "node-address",
            NodeRead => "node-read",
            NodeReading => "node-reading",
            NodeStatusInitial => "node-status-initial",
            NodeStatusConnecting => "node-status-connecting",
            NodeStatusConnected => "node-status-connected",
            NodeStatusConnectFailed => "node-status-connect-failed",
            NodeStatusConnectFirst => "node-status-connect-first",
            NodeStatusEnterAddress => "node-status-enter-address",
            NodeStatusReading => "node-status-reading",
            NodeStatusReadDone => "node-status-read-done",
            NodeStatusReadFailed => "node-status-read-failed",

            Busy => "busy",
        }
    }
}

/// Localized texts for one configured language.
pub struct Messages {
    manager: I18nManager,
    language: String,
}

impl Messages {
    pub fn new(manager: I18nManager, language: impl Into<String>) -> Self {
        Self { manager, language: language.into() }
    }

    /// Bundled messages only; what tests and the CLI use.
    pub fn bundled(language: &str) -> Result<Self> {
        Ok(Self::new(init_languages(language, None)?, language))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self, key: MessageKey) -> String {
        self.manager.get_text(&self.language, key.id(), None)
    }

    pub fn text_with(&self, key: MessageKey, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, value.to_string());
        }
        self.manager.get_text(&self.language, key.id(), Some(&fluent_args))
    }
}
