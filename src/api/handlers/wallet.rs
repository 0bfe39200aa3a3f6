//! 钱包转账视图 JSON handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::{api_error, run_to_completion, session_not_found, ApiError};
use crate::api::server::DashboardServer;
use crate::api::types::{SessionResponse, TransferFormBody, TransferResponse};
use crate::views::{TransferSnapshot, WalletTransferView};

async fn find_view(
    state: &DashboardServer,
    id: &Uuid,
) -> Result<Arc<WalletTransferView>, ApiError> {
    state.wallet_sessions.get(id).await.ok_or_else(|| session_not_found(id))
}

pub async fn create_wallet_session(
    State(state): State<Arc<DashboardServer>>,
) -> (StatusCode, Json<SessionResponse<TransferSnapshot>>) {
    let (session_id, view) = state.wallet_sessions.open(None, || state.new_wallet_view()).await;
    (StatusCode::CREATED, Json(SessionResponse { session_id, state: view.snapshot() }))
}

pub async fn get_wallet_session(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferSnapshot>, ApiError> {
    let view = find_view(&state, &id).await?;
    Ok(Json(view.snapshot()))
}

pub async fn connect_wallet(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferSnapshot>, ApiError> {
    let view = find_view(&state, &id).await?;

    let task_view = view.clone();
    match run_to_completion(async move { task_view.connect().await }).await? {
        Ok(()) => Ok(Json(view.snapshot())),
        Err(e) => {
            debug!("wallet connect rejected for session {}: {}", id, e);
            Err(api_error(&e, Some(view.snapshot().status)))
        }
    }
}

/// Stores the form fields, then sends and waits for confirmation. A busy
/// rejection leaves the stored form alone.
pub async fn send_transfer(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Json(body): Json<TransferFormBody>,
) -> Result<Json<TransferResponse<TransferSnapshot>>, ApiError> {
    let view = find_view(&state, &id).await?;

    let task_view = view.clone();
    let send = async move { task_view.send_transfer(body.to_address, body.amount).await };
    match run_to_completion(send).await? {
        Ok(tx_hash) => Ok(Json(TransferResponse { tx_hash, state: view.snapshot() })),
        Err(e) => {
            debug!("transfer rejected for session {}: {}", id, e);
            Err(api_error(&e, Some(view.snapshot().status)))
        }
    }
}
