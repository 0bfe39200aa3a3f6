use thiserror::Error;

/// Error kinds surfaced by the dashboard views.
///
/// Every upstream failure (wallet, signer, RPC transport) is normalized into
/// `UpstreamRejected` at the boundary, carrying the upstream message text so
/// the view can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// 未检测到注入的钱包能力
    #[error("injected wallet capability is not available")]
    CapabilityAbsent,

    /// 操作前置条件不满足（未连接、字段为空、操作进行中）
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// 钱包、签名器或 RPC 传输层返回的错误
    #[error("{0}")]
    UpstreamRejected(String),
}

impl DashboardError {
    /// Wraps any upstream error, keeping its display text as the payload.
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::UpstreamRejected(err.to_string())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Stable machine-readable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::CapabilityAbsent => "CAPABILITY_ABSENT",
            DashboardError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            DashboardError::UpstreamRejected(_) => "UPSTREAM_REJECTED",
        }
    }

    /// The upstream message, or `fallback` when upstream gave none.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            DashboardError::UpstreamRejected(msg) | DashboardError::PreconditionFailed(msg)
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

impl From<ethers::providers::ProviderError> for DashboardError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        DashboardError::upstream(err)
    }
}

impl From<ethers::utils::ConversionError> for DashboardError {
    fn from(err: ethers::utils::ConversionError) -> Self {
        DashboardError::upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_kept_verbatim() {
        let err = DashboardError::upstream("user rejected the request");
        assert_eq!(err.to_string(), "user rejected the request");
        assert_eq!(err.message_or("钱包连接失败"), "user rejected the request");
    }

    #[test]
    fn test_empty_upstream_message_falls_back() {
        let err = DashboardError::UpstreamRejected("  ".to_string());
        assert_eq!(err.message_or("交易失败，请检查输入"), "交易失败，请检查输入");
    }

    #[test]
    fn test_capability_absent_uses_fallback() {
        let err = DashboardError::CapabilityAbsent;
        assert_eq!(err.message_or("absent"), "absent");
        assert_eq!(err.code(), "CAPABILITY_ABSENT");
    }

    #[test]
    fn test_conversion_error_becomes_upstream() {
        let err: DashboardError = ethers::utils::parse_ether("abc").unwrap_err().into();
        assert!(matches!(err, DashboardError::UpstreamRejected(_)));
    }
}
