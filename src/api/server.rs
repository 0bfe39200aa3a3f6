use crate::api::server_config::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::api::session_store::ViewStore;
use crate::blockchain::traits::{NodeConnector, WalletProvider};
use crate::core::config::DashboardConfig;
use crate::i18n::Messages;
use crate::views::{RemoteNodeView, WalletTransferView};

#[derive(Clone)]
pub struct DashboardServer {
    pub host: String,
    pub port: u16,
    pub config: DashboardConfig,
    pub messages: Arc<Messages>,
    /// 注入的钱包能力；`None` 表示未检测到钱包
    pub wallet: Option<Arc<dyn WalletProvider>>,
    pub connector: Arc<dyn NodeConnector>,
    pub wallet_sessions: Arc<ViewStore<WalletTransferView>>,
    pub node_sessions: Arc<ViewStore<RemoteNodeView>>,
}

impl DashboardServer {
    pub fn new(
        config: DashboardConfig,
        messages: Arc<Messages>,
        wallet: Option<Arc<dyn WalletProvider>>,
        connector: Arc<dyn NodeConnector>,
    ) -> Self {
        let ttl = config.session.idle_ttl();
        let capacity = config.session.max_sessions;
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            messages,
            wallet,
            connector,
            wallet_sessions: Arc::new(ViewStore::new(ttl, capacity)),
            node_sessions: Arc::new(ViewStore::new(ttl, capacity)),
            config,
        }
    }

    /// Fresh wallet transfer view for a new page session.
    pub fn new_wallet_view(&self) -> WalletTransferView {
        WalletTransferView::new(self.wallet.clone(), self.messages.clone())
    }

    /// Fresh remote node view for a new page session.
    pub fn new_node_view(&self) -> RemoteNodeView {
        RemoteNodeView::new(
            self.connector.clone(),
            self.messages.clone(),
            self.config.node.default_rpc_url.clone(),
        )
    }

    pub fn create_router(self) -> Router {
        let state = Arc::new(self);

        let pages = Router::new()
            .route("/", get(handlers::wallet_page))
            .route("/provider", get(handlers::node_page))
            .route("/wallet/:session/connect", post(handlers::wallet_connect_form))
            .route("/wallet/:session/transfer", post(handlers::wallet_transfer_form))
            .route("/provider/:session/connect", post(handlers::node_connect_form))
            .route("/provider/:session/balance", post(handlers::node_balance_form));

        let api = Router::new()
            .route("/api/health", get(handlers::health_check))
            .route("/api/wallet/sessions", post(handlers::create_wallet_session))
            .route("/api/wallet/:session", get(handlers::get_wallet_session))
            .route("/api/wallet/:session/connect", post(handlers::connect_wallet))
            .route("/api/wallet/:session/transfer", post(handlers::send_transfer))
            .route("/api/provider/sessions", post(handlers::create_node_session))
            .route("/api/provider/:session", get(handlers::get_node_session))
            .route("/api/provider/:session/connect", post(handlers::connect_node))
            .route("/api/provider/:session/balance", post(handlers::read_node_balance));

        // No per-request timeout: wallet approval and confirmation may take
        // arbitrarily long.
        pages.merge(api).with_state(state).layer(
            ServiceBuilder::new()
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                .layer(TraceLayer::new_for_http()),
        )
    }

    /// Periodically drops idle page sessions.
    fn spawn_session_cleanup(&self) {
        let wallet_sessions = self.wallet_sessions.clone();
        let node_sessions = self.node_sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                wallet_sessions.cleanup_expired().await;
                node_sessions.cleanup_expired().await;
            }
        });
    }

    pub async fn start(self) -> Result<(), anyhow::Error> {
        self.spawn_session_cleanup();
        if self.wallet.is_none() {
            tracing::warn!(
                "no injected wallet configured; wallet connect will report it as absent"
            );
        }

        let addr = format!("{}:{}", self.host, self.port);
        let app = self.create_router();
        tracing::info!("Dashboard listening on {}", addr);
        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
