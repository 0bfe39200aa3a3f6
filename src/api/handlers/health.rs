//! 健康检查

use axum::extract::State;
use serde_json::json;
use std::sync::Arc;

use crate::api::server::DashboardServer;

/// 健康检查
pub async fn health_check(
    State(state): State<Arc<DashboardServer>>,
) -> axum::response::Json<serde_json::Value> {
    axum::response::Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "wallet_available": state.wallet.is_some(),
        "sessions": {
            "wallet": state.wallet_sessions.len().await,
            "provider": state.node_sessions.len().await,
        }
    }))
}
