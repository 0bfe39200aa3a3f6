use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 页面查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 复用已有页面会话；缺省或无法解析时创建新会话
    pub session: Option<String>,
}

impl PageQuery {
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_deref().and_then(|s| Uuid::parse_str(s.trim()).ok())
    }
}

/// 转账表单
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransferFormBody {
    #[serde(default)]
    pub to_address: String,
    #[serde(default)]
    pub amount: String,
}

/// 节点连接表单；缺省时沿用当前 RPC 地址
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RpcUrlBody {
    #[serde(default)]
    pub rpc_url: Option<String>,
}

/// 余额查询表单；缺省时沿用当前地址
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AddressBody {
    #[serde(default)]
    pub address: Option<String>,
}

/// 新建会话响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse<T> {
    pub session_id: Uuid,
    pub state: T,
}

/// 转账结果
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse<T> {
    pub tx_hash: String,
    pub state: T,
}

/// 余额查询结果
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse<T> {
    pub balance: String,
    pub state: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// The view's status line after the failed operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
