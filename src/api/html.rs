//! HTML rendering for the navigation shell and the two pages.
//!
//! Pages are plain server-rendered forms. While a view is busy the page
//! refreshes itself so the status line follows the operation.

use std::fmt::Write as _;
use uuid::Uuid;

use crate::api::server_config::BUSY_REFRESH_SECS;
use crate::core::units;
use crate::i18n::{MessageKey, Messages};
use crate::views::shell::{nav_links, Route};
use crate::views::{NodeSnapshot, TransferSnapshot};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f5f7fb;color:#1b1f29}\
.app-shell{max-width:960px;margin:0 auto;padding:24px}\
.hero{display:flex;justify-content:space-between;gap:24px;flex-wrap:wrap}\
.hero-badge{color:#3c5ccf;font-weight:600}.hero-stats{display:flex;gap:24px}\
.main-nav{display:flex;gap:12px;margin:16px 0}.nav-link{padding:6px 14px;border-radius:16px;text-decoration:none;color:#1b1f29}\
.nav-link.active{background:#3c5ccf;color:#fff}\
.panel,.card{background:#fff;border-radius:12px;padding:16px;margin-bottom:16px}\
.grid.two{display:grid;grid-template-columns:repeat(auto-fit,minmax(280px,1fr));gap:16px}\
.input{display:block;width:100%;margin:6px 0 12px;padding:8px;box-sizing:border-box}\
.info-list{list-style:none;padding:0}.info-list li{display:flex;justify-content:space-between;padding:4px 0}\
.status-bar{padding:10px;background:#eef1fa;border-radius:8px;word-break:break-all}";

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

fn page_url(route: Route, session: Uuid) -> String {
    format!("{}?session={}", route.path(), session)
}

fn shell(messages: &Messages, route: Route, session: Uuid, busy: bool, body: &str) -> String {
    let t = |key| escape_html(&messages.text(key));

    let refresh = if busy {
        format!(
            "<meta http-equiv=\"refresh\" content=\"{};url={}\">",
            BUSY_REFRESH_SECS,
            page_url(route, session)
        )
    } else {
        String::new()
    };

    let mut nav = String::new();
    for link in nav_links(messages, route.path()) {
        let class = if link.active { "nav-link active" } else { "nav-link" };
        let _ = write!(
            nav,
            "<a class=\"{}\" href=\"{}\">{}</a>",
            class,
            link.path,
            escape_html(&link.label)
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">{refresh}\
<title>{title}</title><style>{style}</style></head><body><div class=\"app-shell\">\
<header class=\"hero\"><div><p class=\"hero-badge\">{badge}</p><h1>{title}</h1>\
<p class=\"hero-desc\">{desc}</p></div><div class=\"hero-stats\">\
<div><span class=\"label\">{net_label}</span><p>{net}</p></div>\
<div><span class=\"label\">{mode_label}</span><p>{mode}</p></div></div></header>\
<nav class=\"main-nav\">{nav}</nav><main class=\"page-container\">{body}</main></div></body></html>",
        lang = escape_html(messages.language()),
        refresh = refresh,
        title = t(MessageKey::AppTitle),
        style = STYLE,
        badge = t(MessageKey::AppBadge),
        desc = t(MessageKey::AppDesc),
        net_label = t(MessageKey::AppStatNetworkLabel),
        net = t(MessageKey::AppStatNetwork),
        mode_label = t(MessageKey::AppStatModeLabel),
        mode = t(MessageKey::AppStatMode),
        nav = nav,
        body = body,
    )
}

/// 渲染钱包转账页
pub fn render_wallet_page(messages: &Messages, session: Uuid, state: &TransferSnapshot) -> String {
    let t = |key| escape_html(&messages.text(key));

    let address = units::short_address(state.account.as_ref().map(|a| a.address.as_str()));
    let balance = state
        .account
        .as_ref()
        .filter(|a| !a.balance.is_empty())
        .map(|a| units::format_fixed4(&a.balance))
        .unwrap_or_else(|| units::PLACEHOLDER.to_string());
    let (link_state, connect_label) = if state.ready {
        (MessageKey::WalletConnected, MessageKey::WalletReconnect)
    } else {
        (MessageKey::WalletDisconnected, MessageKey::WalletConnect)
    };
    let send_label = if state.busy { MessageKey::WalletSending } else { MessageKey::WalletSend };
    let status = if state.status.is_empty() {
        messages.text(MessageKey::WalletStatusIdle)
    } else {
        state.status.clone()
    };

    let body = format!(
        "<section class=\"panel\"><div class=\"panel-header\"><div>\
<p class=\"panel-label\">{panel_label}</p><h2>{panel_title}</h2><p class=\"panel-desc\">{panel_desc}</p></div>\
<form method=\"post\" action=\"/wallet/{session}/connect\">\
<button class=\"primary-btn\" type=\"submit\">{connect_label}</button></form></div>\
<div class=\"grid two\"><div class=\"card\"><h3>{overview}</h3><ul class=\"info-list\">\
<li><span>{address_label}</span><strong id=\"wallet-address\">{address}</strong></li>\
<li><span>{balance_label}</span><strong id=\"wallet-balance\">{balance}</strong></li>\
<li><span>{link_label}</span><strong>{link_state}</strong></li></ul></div>\
<form class=\"card\" method=\"post\" action=\"/wallet/{session}/transfer\"><h3>{transfer_title}</h3>\
<label>{to_label}<input class=\"input\" name=\"to_address\" placeholder=\"0x...\" value=\"{to_address}\"></label>\
<label>{amount_label}<input class=\"input\" name=\"amount\" placeholder=\"0.01\" value=\"{amount}\"></label>\
<button class=\"primary-btn\" type=\"submit\"{send_disabled}>{send_label}</button></form></div>\
<div class=\"status-bar\" id=\"status\">{status}</div></section>",
        panel_label = t(MessageKey::WalletPanelLabel),
        panel_title = t(MessageKey::WalletPanelTitle),
        panel_desc = t(MessageKey::WalletPanelDesc),
        session = session,
        connect_label = t(connect_label),
        overview = t(MessageKey::WalletOverview),
        address_label = t(MessageKey::WalletAddress),
        address = escape_html(&address),
        balance_label = t(MessageKey::WalletBalance),
        balance = escape_html(&balance),
        link_label = t(MessageKey::WalletLinkState),
        link_state = t(link_state),
        transfer_title = t(MessageKey::WalletTransferTitle),
        to_label = t(MessageKey::WalletToAddress),
        to_address = escape_html(&state.form.to_address),
        amount_label = t(MessageKey::WalletAmount),
        amount = escape_html(&state.form.amount),
        send_disabled = disabled(!state.can_send()),
        send_label = t(send_label),
        status = escape_html(&status),
    );

    shell(messages, Route::WalletTransfer, session, state.busy, &body)
}

/// 渲染节点服务页
pub fn render_node_page(messages: &Messages, session: Uuid, state: &NodeSnapshot) -> String {
    let t = |key| escape_html(&messages.text(key));
    let or_placeholder = |value: Option<String>| {
        value.filter(|v| !v.is_empty()).unwrap_or_else(|| units::PLACEHOLDER.to_string())
    };

    let (connect_label, read_label) = if state.busy {
        (MessageKey::NodeConnecting, MessageKey::NodeReading)
    } else {
        (MessageKey::NodeConnect, MessageKey::NodeRead)
    };

    let body = format!(
        "<section class=\"panel\"><div class=\"panel-header\"><div>\
<p class=\"panel-label\">{panel_label}</p><h2>{panel_title}</h2><p class=\"panel-desc\">{panel_desc}</p></div></div>\
<form class=\"card\" method=\"post\" action=\"/provider/{session}/connect\"><h3>{connection}</h3>\
<label>{rpc_label}<input class=\"input\" name=\"rpc_url\" value=\"{rpc_url}\"></label>\
<button class=\"primary-btn\" type=\"submit\"{busy_disabled}>{connect_label}</button></form>\
<div class=\"grid two\"><div class=\"card\"><h3>{details}</h3><ul class=\"info-list\">\
<li><span>{network_label}</span><strong id=\"node-network\">{network}</strong></li>\
<li><span>{block_label}</span><strong id=\"node-block\">{block}</strong></li>\
<li><span>{balance_label}</span><strong id=\"node-balance\">{balance}</strong></li></ul></div>\
<form class=\"card\" method=\"post\" action=\"/provider/{session}/balance\"><h3>{read_title}</h3>\
<label>{address_label}<input class=\"input\" name=\"address\" placeholder=\"0x...\" value=\"{address}\"></label>\
<button class=\"secondary-btn\" type=\"submit\"{busy_disabled}>{read_label}</button></form></div>\
<div class=\"status-bar\" id=\"status\">{status}</div></section>",
        panel_label = t(MessageKey::NodePanelLabel),
        panel_title = t(MessageKey::NodePanelTitle),
        panel_desc = t(MessageKey::NodePanelDesc),
        session = session,
        connection = t(MessageKey::NodeConnection),
        rpc_label = t(MessageKey::NodeRpcUrl),
        rpc_url = escape_html(&state.rpc_url),
        busy_disabled = disabled(state.busy),
        connect_label = t(connect_label),
        details = t(MessageKey::NodeDetails),
        network_label = t(MessageKey::NodeNetwork),
        network = escape_html(&or_placeholder(state.network_label.clone())),
        block_label = t(MessageKey::NodeLatestBlock),
        block = escape_html(&or_placeholder(state.latest_block.map(|b| b.to_string()))),
        balance_label = t(MessageKey::NodeBalanceResult),
        balance = escape_html(&or_placeholder(state.balance.clone())),
        read_title = t(MessageKey::NodeReadTitle),
        address_label = t(MessageKey::NodeAddress),
        address = escape_html(&state.address),
        read_label = t(read_label),
        status = escape_html(&state.status),
    );

    shell(messages, Route::RemoteNode, session, state.busy, &body)
}
