//! Podcast Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeletePodcast, GeneratePodcast};
use crate::application::error::ApplicationError;
use crate::application::ports::PodcastBackendPort;
use crate::domain::task::TaskHandle;

/// 提交确认中唯一合法的状态
const ACK_STATUS_PROCESSING: &str = "processing";

/// GeneratePodcast Handler - 校验并提交生成任务
pub struct GeneratePodcastHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl GeneratePodcastHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    /// 校验失败时不会发出任何网络请求；提交失败不会自动重试
    pub async fn handle(&self, cmd: GeneratePodcast) -> Result<TaskHandle, ApplicationError> {
        let validated = cmd.request.validate().map_err(|violations| {
            tracing::warn!(
                fields = ?violations.iter().map(|v| v.field).collect::<Vec<_>>(),
                "Generation request rejected by validation"
            );
            ApplicationError::validation(violations)
        })?;

        tracing::info!(
            search_space_id = %validated.search_space_id,
            source_type = validated.source.source_type().as_str(),
            tts_provider = %validated.tts_provider,
            "Submitting podcast generation"
        );

        let ack = self.backend.generate(validated).await?;

        if ack.status != ACK_STATUS_PROCESSING {
            return Err(ApplicationError::contract(format!(
                "expected status \"{}\", got \"{}\"",
                ACK_STATUS_PROCESSING, ack.status
            )));
        }
        let handle = TaskHandle::new(ack.task_id).map_err(ApplicationError::contract)?;

        tracing::info!(task_id = %handle, "Podcast generation accepted");
        Ok(handle)
    }
}

/// DeletePodcast Handler
pub struct DeletePodcastHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl DeletePodcastHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, cmd: DeletePodcast) -> Result<String, ApplicationError> {
        let message = self.backend.delete_podcast(cmd.podcast_id).await?;
        tracing::info!(podcast_id = %cmd.podcast_id, "Podcast deleted");
        Ok(message)
    }
}
