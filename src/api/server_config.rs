//! 服务器配置常量

use std::time::Duration;

/// 并发连接限制
pub const MAX_CONCURRENCY: usize = 256;

/// 请求体大小限制
pub const MAX_BODY_SIZE: usize = 64 * 1024; // 64KB

/// 过期页面会话的清理周期
pub const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// 表单提交后等待操作结束的时长，超过后直接重定向，操作在后台继续
pub const PAGE_SETTLE_WINDOW: Duration = Duration::from_millis(300);

/// 页面在操作进行中的自动刷新间隔（秒）
pub const BUSY_REFRESH_SECS: u64 = 2;
