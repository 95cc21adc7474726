//! Task Queries

use crate::domain::task::TaskHandle;

/// 查询任务状态
#[derive(Debug, Clone)]
pub struct GetTaskStatus {
    pub handle: TaskHandle,
}
