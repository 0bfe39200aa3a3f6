//! Wallet transfer view: connect, send, confirm and the busy gate.

mod util;

use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use test_case::test_case;

use util::{ether, wait_until, zh, FakeWallet, ACCOUNT, RECIPIENT};
use web3_dashboard::blockchain::traits::WalletProvider;
use web3_dashboard::core::errors::DashboardError;
use web3_dashboard::views::WalletTransferView;

fn view_with(wallet: &Arc<FakeWallet>) -> Arc<WalletTransferView> {
    let capability: Arc<dyn WalletProvider> = wallet.clone();
    Arc::new(WalletTransferView::new(Some(capability), zh()))
}

#[tokio::test]
async fn test_initial_state() {
    let view = WalletTransferView::new(None, zh());
    let state = view.snapshot();
    assert_eq!(state.status, "等待操作中");
    assert!(state.account.is_none());
    assert!(!state.ready);
    assert!(!state.can_send());
}

#[tokio::test]
async fn test_connect_without_wallet_reports_absent() {
    let view = WalletTransferView::new(None, zh());

    let err = view.connect().await.unwrap_err();

    assert_eq!(err, DashboardError::CapabilityAbsent);
    let state = view.snapshot();
    assert_eq!(state.status, "未检测到浏览器钱包，请安装 MetaMask 或其他 EIP-1193 钱包扩展。");
    assert!(state.account.is_none());
    assert!(!state.ready);
    assert!(!state.busy);
}

#[tokio::test]
async fn test_connect_loads_account_and_balance() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1.5"));
    let view = view_with(&wallet);

    view.connect().await.unwrap();

    let state = view.snapshot();
    let account = state.account.clone().unwrap();
    assert_eq!(account.address, ACCOUNT);
    assert_eq!(account.balance, "1.5");
    assert_eq!(state.status, "钱包连接成功，可以发起转账。");
    assert!(state.ready);
    assert!(state.can_send());
}

#[tokio::test]
async fn test_rejected_reconnect_keeps_previous_connection() {
    let wallet = FakeWallet::new(ACCOUNT, ether("2"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();

    wallet.reject_accounts(DashboardError::upstream("User rejected the request."));
    let err = view.connect().await.unwrap_err();

    assert!(matches!(err, DashboardError::UpstreamRejected(_)));
    let state = view.snapshot();
    assert_eq!(state.status, "User rejected the request.");
    assert_eq!(state.account.unwrap().address, ACCOUNT);
    assert!(state.ready);
}

#[tokio::test]
async fn test_connect_failure_without_message_uses_generic_text() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    wallet.reject_accounts(DashboardError::UpstreamRejected(String::new()));
    let view = view_with(&wallet);

    assert!(view.connect().await.is_err());
    assert_eq!(view.snapshot().status, "钱包连接失败");
    assert!(view.snapshot().account.is_none());
}

#[tokio::test]
async fn test_connect_with_no_authorized_accounts_fails() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    *wallet.accounts.lock() = Ok(vec![]);
    let view = view_with(&wallet);

    assert!(view.connect().await.is_err());
    assert!(!view.snapshot().ready);
}

#[tokio::test]
async fn test_send_before_connect_touches_nothing() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);

    let err = view.send_transfer(RECIPIENT, "0.01").await.unwrap_err();

    assert!(matches!(err, DashboardError::PreconditionFailed(_)));
    assert_eq!(view.snapshot().status, "请先连接钱包");
    assert_eq!(wallet.signer.sent_count(), 0);
    assert_eq!(wallet.account_requests.load(Ordering::SeqCst), 0);
    assert_eq!(wallet.balance_reads.load(Ordering::SeqCst), 0);
}

#[test_case("", "0.01" ; "empty destination")]
#[test_case(RECIPIENT, "" ; "empty amount")]
#[test_case("", "" ; "both empty")]
#[tokio::test]
async fn test_send_with_missing_fields_is_rejected(to: &str, amount: &str) {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();

    let err = view.send_transfer(to, amount).await.unwrap_err();

    assert!(matches!(err, DashboardError::PreconditionFailed(_)));
    let state = view.snapshot();
    assert_eq!(state.status, "请填写完整的收款地址和金额");
    assert_eq!(state.form.amount, amount);
    assert_eq!(wallet.signer.sent_count(), 0);
}

#[tokio::test]
async fn test_successful_transfer_clears_amount_and_refreshes_balance() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();
    let reads_after_connect = wallet.balance_reads.load(Ordering::SeqCst);

    let tx_hash = view.send_transfer(RECIPIENT, "0.25").await.unwrap();

    assert!(tx_hash.starts_with("0x"));
    let sent = wallet.signer.sent.lock().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, RECIPIENT);
    assert_eq!(sent[0].value, ether("0.25"));

    let state = view.snapshot();
    assert_eq!(state.status, "✅ 交易已确认，余额已更新");
    assert_eq!(state.form.amount, "");
    assert_eq!(state.form.to_address, RECIPIENT);
    assert_eq!(state.account.unwrap().balance, "0.75");
    assert!(!state.busy);
    assert_eq!(wallet.balance_reads.load(Ordering::SeqCst), reads_after_connect + 1);
}

#[tokio::test]
async fn test_pending_transfer_holds_busy_flag_and_shows_hash() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();
    let gate = wallet.signer.hold_confirmation();

    let task = {
        let view = view.clone();
        tokio::spawn(async move { view.send_transfer(RECIPIENT, "0.1").await })
    };
    wait_until(|| view.snapshot().status.starts_with("交易已发送，等待上链，哈希：0x")).await;

    let pending = view.snapshot();
    assert!(pending.busy);
    assert!(!pending.can_send());

    // A second submission while the first is outstanding is turned away
    let err = view.send_transfer(RECIPIENT, "0.1").await.unwrap_err();
    assert_eq!(err, DashboardError::PreconditionFailed("操作进行中，请稍候".to_string()));
    assert_eq!(view.snapshot().status, pending.status);
    assert_eq!(wallet.signer.sent_count(), 1);

    gate.notify_one();
    let tx_hash = task.await.unwrap().unwrap();
    assert!(pending.status.ends_with(&tx_hash));
    assert!(!view.snapshot().busy);
}

#[tokio::test]
async fn test_rejected_submission_leaves_in_flight_form_alone() {
    const OTHER: &str = "0x0000000000000000000000000000000000000002";
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();
    let gate = wallet.signer.hold_confirmation();

    let task = {
        let view = view.clone();
        tokio::spawn(async move { view.send_transfer(RECIPIENT, "0.1").await })
    };
    wait_until(|| wallet.signer.sent_count() == 1).await;

    assert!(view.send_transfer(OTHER, "0.7").await.is_err());
    let in_flight = view.snapshot().form;
    assert_eq!(in_flight.to_address, RECIPIENT);
    assert_eq!(in_flight.amount, "0.1");

    // 空字段的提交同样被挡在门外，不写入表单
    assert!(view.send_transfer("", "").await.is_err());
    assert_eq!(view.snapshot().form, in_flight);

    gate.notify_one();
    task.await.unwrap().unwrap();
    let form = view.snapshot().form;
    assert_eq!(form.to_address, RECIPIENT);
    assert_eq!(form.amount, "");
    assert_eq!(wallet.signer.sent_count(), 1);
}

#[tokio::test]
async fn test_connect_is_gated_while_authorization_is_pending() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let gate = wallet.hold_approval();
    let view = view_with(&wallet);

    let task = {
        let view = view.clone();
        tokio::spawn(async move { view.connect().await })
    };
    wait_until(|| view.snapshot().busy).await;
    assert_eq!(view.snapshot().status, "正在请求钱包授权...");

    assert!(matches!(view.connect().await, Err(DashboardError::PreconditionFailed(_))));
    assert_eq!(wallet.account_requests.load(Ordering::SeqCst), 1);

    gate.notify_one();
    task.await.unwrap().unwrap();
    assert!(view.snapshot().ready);
}

#[tokio::test]
async fn test_failed_confirmation_keeps_amount() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();
    *wallet.signer.confirm_error.lock() =
        Some(DashboardError::upstream("transaction execution reverted"));

    assert!(view.send_transfer(RECIPIENT, "0.5").await.is_err());

    let state = view.snapshot();
    assert_eq!(state.status, "transaction execution reverted");
    assert_eq!(state.form.amount, "0.5");
    assert_eq!(state.account.unwrap().balance, "1.0");
    assert!(!state.busy);
}

#[tokio::test]
async fn test_signer_rejection_without_message_uses_generic_text() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();
    *wallet.signer.send_error.lock() = Some(DashboardError::UpstreamRejected(String::new()));

    assert!(view.send_transfer(RECIPIENT, "0.5").await.is_err());
    assert_eq!(view.snapshot().status, "交易失败，请检查输入");
}

#[tokio::test]
async fn test_malformed_amount_is_rejected_before_signing() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();

    let err = view.send_transfer(RECIPIENT, "abc").await.unwrap_err();

    assert!(matches!(err, DashboardError::UpstreamRejected(_)));
    let state = view.snapshot();
    assert_ne!(state.status, "交易提交中，请在钱包里确认...");
    assert!(!state.status.is_empty());
    assert_eq!(wallet.signer.sent_count(), 0);
}

#[tokio::test]
async fn test_refresh_balance_without_connection_is_a_noop() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);

    view.refresh_balance().await.unwrap();

    assert_eq!(wallet.balance_reads.load(Ordering::SeqCst), 0);
    assert_eq!(view.snapshot().status, "等待操作中");
}

#[tokio::test]
async fn test_refresh_balance_picks_up_external_changes() {
    let wallet = FakeWallet::new(ACCOUNT, ether("1"));
    let view = view_with(&wallet);
    view.connect().await.unwrap();

    *wallet.balance.lock() = ether("3.2");
    view.refresh_balance().await.unwrap();

    assert_eq!(view.snapshot().account.unwrap().balance, "3.2");
}
