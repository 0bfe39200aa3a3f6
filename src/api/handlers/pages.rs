//! 页面与表单 handlers
//!
//! Form posts start the operation in the background and redirect back to the
//! page; the page refreshes itself until the view is no longer busy.

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::api::html;
use crate::api::server::DashboardServer;
use crate::api::server_config::PAGE_SETTLE_WINDOW;
use crate::api::types::{AddressBody, PageQuery, RpcUrlBody, TransferFormBody};
use crate::core::errors::DashboardError;
use crate::views::Route;

fn page_url(route: Route, id: Uuid) -> String {
    format!("{}?session={}", route.path(), id)
}

/// Gives the operation a short window to finish so quick outcomes show up on
/// the next render; anything slower keeps running detached.
async fn settle<F>(op: F)
where
    F: Future<Output = Result<(), DashboardError>> + Send + 'static,
{
    let mut handle = tokio::spawn(op);
    match tokio::time::timeout(PAGE_SETTLE_WINDOW, &mut handle).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => debug!("page operation ended with: {}", e),
        Ok(Err(e)) => error!("page operation task failed: {}", e),
        Err(_) => debug!("page operation still running"),
    }
}

pub async fn wallet_page(
    State(state): State<Arc<DashboardServer>>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let (id, view) =
        state.wallet_sessions.open(query.session_id(), || state.new_wallet_view()).await;
    Html(html::render_wallet_page(&state.messages, id, &view.snapshot()))
}

pub async fn node_page(
    State(state): State<Arc<DashboardServer>>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let (id, view) = state.node_sessions.open(query.session_id(), || state.new_node_view()).await;
    Html(html::render_node_page(&state.messages, id, &view.snapshot()))
}

pub async fn wallet_connect_form(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
) -> Redirect {
    let Some(view) = state.wallet_sessions.get(&id).await else {
        return Redirect::to(Route::WalletTransfer.path());
    };
    settle(async move { view.connect().await }).await;
    Redirect::to(&page_url(Route::WalletTransfer, id))
}

pub async fn wallet_transfer_form(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Form(body): Form<TransferFormBody>,
) -> Redirect {
    let Some(view) = state.wallet_sessions.get(&id).await else {
        return Redirect::to(Route::WalletTransfer.path());
    };
    settle(async move { view.send_transfer(body.to_address, body.amount).await.map(|_| ()) })
        .await;
    Redirect::to(&page_url(Route::WalletTransfer, id))
}

pub async fn node_connect_form(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Form(body): Form<RpcUrlBody>,
) -> Redirect {
    let Some(view) = state.node_sessions.get(&id).await else {
        return Redirect::to(Route::RemoteNode.path());
    };
    settle(async move { view.connect(body.rpc_url).await.map(|_| ()) }).await;
    Redirect::to(&page_url(Route::RemoteNode, id))
}

pub async fn node_balance_form(
    State(state): State<Arc<DashboardServer>>,
    Path(id): Path<Uuid>,
    Form(body): Form<AddressBody>,
) -> Redirect {
    let Some(view) = state.node_sessions.get(&id).await else {
        return Redirect::to(Route::RemoteNode.path());
    };
    settle(async move { view.read_balance(body.address).await.map(|_| ()) }).await;
    Redirect::to(&page_url(Route::RemoteNode, id))
}
