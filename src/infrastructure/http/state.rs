//! Application State
//!
//! 网关无业务状态，只持有共享的转发器

use crate::infrastructure::gateway::HttpForwarder;

/// 应用状态
pub struct AppState {
    pub forwarder: HttpForwarder,
    /// 入站请求体上限（字节）
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(forwarder: HttpForwarder, max_body_bytes: usize) -> Self {
        Self {
            forwarder,
            max_body_bytes,
        }
    }
}
