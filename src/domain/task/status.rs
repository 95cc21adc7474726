//! Task Context - Task Status
//!
//! 后端状态接口返回的三态联合，以及提交接口的确认响应。

use serde::{Deserialize, Serialize};

use crate::domain::podcast::PodcastId;

/// 任务成功时携带的产物信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuccess {
    pub podcast_id: PodcastId,
    pub title: String,
    pub transcript_entries: u32,
}

/// 任务状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// 处理中，可能带有阶段标签（如 PENDING / STARTED）
    Processing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
    /// 成功
    Success(TaskSuccess),
    /// 失败
    Error { error: String },
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Processing { .. } => "processing",
            TaskStatus::Success(_) => "success",
            TaskStatus::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Processing { .. })
    }
}

/// 提交生成任务后的确认响应: `{status: "processing", task_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub status: String,
    pub task_id: String,
}
