//! Task Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::PodcastBackendPort;
use crate::application::queries::GetTaskStatus;
use crate::domain::task::TaskStatus;

/// GetTaskStatus Handler - 单次状态查询
pub struct GetTaskStatusHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl GetTaskStatusHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, query: GetTaskStatus) -> Result<TaskStatus, ApplicationError> {
        let status = self.backend.task_status(&query.handle).await?;
        tracing::debug!(task_id = %query.handle, status = status.as_str(), "Task status fetched");
        Ok(status)
    }
}
