//! API Handlers 模块
//!
//! 按功能拆分的HTTP请求处理器

pub mod health;
pub mod pages;
pub mod provider;
pub mod wallet;

use axum::{http::StatusCode, response::Json};
use std::future::Future;
use tracing::error;
use uuid::Uuid;

use crate::api::types::ErrorResponse;
use crate::core::errors::DashboardError;

// 重新导出常用handlers
pub use health::health_check;
pub use pages::{
    node_balance_form, node_connect_form, node_page, wallet_connect_form, wallet_page,
    wallet_transfer_form,
};
pub use provider::{
    connect_node, create_node_session, get_node_session, read_node_balance,
};
pub use wallet::{connect_wallet, create_wallet_session, get_wallet_session, send_transfer};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for each error kind.
pub fn error_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::CapabilityAbsent => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
        DashboardError::UpstreamRejected(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn api_error(err: &DashboardError, status: Option<String>) -> ApiError {
    (
        error_status(err),
        Json(ErrorResponse {
            error: err.message_or(&err.to_string()),
            code: err.code().to_string(),
            status,
        }),
    )
}

pub fn session_not_found(id: &Uuid) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("page session {} not found", id),
            code: "SESSION_NOT_FOUND".to_string(),
            status: None,
        }),
    )
}

/// Runs a view operation on its own task so a dropped request cannot cut it
/// short, then waits for the outcome.
pub(crate) async fn run_to_completion<T, F>(op: F) -> Result<Result<T, DashboardError>, ApiError>
where
    F: Future<Output = Result<T, DashboardError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(op).await.map_err(|e| {
        error!("view operation task failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "operation task failed".to_string(),
                code: "TASK_FAILED".to_string(),
                status: None,
            }),
        )
    })
}
