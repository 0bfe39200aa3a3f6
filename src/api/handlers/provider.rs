//! 节点服务视图 JSON handlers

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
use crate::api::types::{AddressBody, BalanceResponse, RpcUrlBody, SessionResponse};
use crate::views::{NodeSnapshot, RemoteNodeView};

async fn find_view(state: &DashboardServer, id: &Uuid) -> Result<Arc<RemoteNodeView>, ApiError> {
    state.node_sessions.get(id).await.ok_or_else(|| session_not_found(id))
}

pub async fn create_node_session(
    State(state): State<Arc<DashboardServer>>,
) -> (StatusCode, Json<SessionResponse<NodeSnapshot>>) {
    let (session_id, view) = state.node_sessions.open(None, || state.new_node_view()).await;
    (StatusCode::CREATED, Json(SessionResponse { session_id, state: view.snapshot() }))
}

pub async fn get_node_session(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<NodeSnapshot>, ApiError> {
    let view = find_view(&state, &id).await?;
    Ok(Json(view.snapshot()))
}

pub async fn connect_node(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RpcUrlBody>,
) -> Result<Json<NodeSnapshot>, ApiError> {
    let view = find_view(&state, &id).await?;

    let task_view = view.clone();
    match run_to_completion(async move { task_view.connect(body.rpc_url).await }).await? {
        Ok(_) => Ok(Json(view.snapshot())),
        Err(e) => {
            debug!("node connect rejected for session {}: {}", id, e);
            Err(api_error(&e, Some(view.snapshot().status)))
        }
    }
}

pub async fn read_node_balance(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddressBody>,
) -> Result<Json<BalanceResponse<NodeSnapshot>>, ApiError> {
    let view = find_view(&state, &id).await?;

    let task_view = view.clone();
    match run_to_completion(async move { task_view.read_balance(body.address).await }).await? {
        Ok(balance) => Ok(Json(BalanceResponse { balance, state: view.snapshot() })),
        Err(e) => {
            debug!("balance read rejected for session {}: {}", id, e);
            Err(api_error(&e, Some(view.snapshot().status)))
        }
    }
}
