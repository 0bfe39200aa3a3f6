//! Conversions between wei and human-readable ether amounts.

use ethers::types::U256;
use ethers::utils::{format_ether, parse_ether};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::core::errors::DashboardError;

/// Symbol of the native currency appended to displayed balances.
pub const NATIVE_SYMBOL: &str = "ETH";

/// Shown wherever a value has not been loaded yet.
pub const PLACEHOLDER: &str = "--";

/// Parses a decimal ether amount ("0.01") into wei.
///
/// The text is passed as-is; malformed input is rejected by the conversion
/// and surfaces as an upstream error.
pub fn parse_amount(amount: &str) -> Result<U256, DashboardError> {
    Ok(parse_ether(amount)?)
}

/// Formats wei as ether with trailing zeros removed but at least one
/// decimal digit kept: `0` -> `"0.0"`, `10^16` -> `"0.01"`.
pub fn format_ether_compact(wei: U256) -> String {
    let raw = format_ether(wei);
    match raw.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", int)
            } else {
                format!("{}.{}", int, frac)
            }
        }
        None => format!("{}.0", raw),
    }
}

/// Formats an ether amount with the currency suffix, e.g. `"0.0 ETH"`.
pub fn format_balance(wei: U256) -> String {
    format!("{} {}", format_ether_compact(wei), NATIVE_SYMBOL)
}

/// Rounds a decimal ether string to four places for the wallet overview.
pub fn format_fixed4(balance: &str) -> String {
    match Decimal::from_str(balance) {
        Ok(value) => {
            let rounded = value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.4} {}", rounded, NATIVE_SYMBOL)
        }
        Err(_) => format!("{} {}", balance, NATIVE_SYMBOL),
    }
}

/// Shortens an address to `0x1234...abcd`.
pub fn short_address(address: Option<&str>) -> String {
    let Some(addr) = address.filter(|a| !a.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let chars: Vec<char> = addr.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
