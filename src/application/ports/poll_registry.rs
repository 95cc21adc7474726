//! Poll Registry Port - 活跃轮询会话登记
//!
//! 每个 TaskHandle 同一时刻至多一个轮询会话

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::task::TaskHandle;

/// 轮询登记错误
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task is already being polled: {0}")]
    AlreadyPolling(String),
}

/// 登记凭据，注销时用于确认仍是同一次登记
pub type PollTicket = u64;

/// Poll Registry Port
pub trait PollRegistryPort: Send + Sync {
    /// 登记一个轮询会话
    fn register(&self, handle: &TaskHandle, token: CancellationToken) -> Result<PollTicket, TaskError>;

    /// 会话结束后注销（ticket 不匹配时不做任何事）
    fn remove(&self, handle: &TaskHandle, ticket: PollTicket);

    /// 取消指定会话，返回是否存在
    fn cancel(&self, handle: &TaskHandle) -> bool;

    /// 取消所有会话，返回取消数量
    fn cancel_all(&self) -> usize;

    /// 是否存在活跃会话
    fn is_active(&self, handle: &TaskHandle) -> bool;

    /// 活跃会话数量
    fn active_count(&self) -> usize;
}
