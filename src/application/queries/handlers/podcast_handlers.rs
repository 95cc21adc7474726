//! Podcast Query Handlers

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::application::error::ApplicationError;
use crate::application::ports::{PodcastBackendPort, PodcastListFilter};
use crate::application::queries::{DownloadPodcastAudio, GetPodcast, ListPodcasts};
use crate::domain::podcast::PodcastSummary;

/// ListPodcasts Handler
pub struct ListPodcastsHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl ListPodcastsHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, query: ListPodcasts) -> Result<Vec<PodcastSummary>, ApplicationError> {
        let filter = PodcastListFilter {
            search_space_id: query.search_space_id,
            skip: query.skip,
            limit: query.limit,
        };
        let podcasts = self.backend.list_podcasts(&filter).await?;
        tracing::debug!(count = podcasts.len(), "Podcasts listed");
        Ok(podcasts)
    }
}

/// GetPodcast Handler
pub struct GetPodcastHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl GetPodcastHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, query: GetPodcast) -> Result<PodcastSummary, ApplicationError> {
        Ok(self.backend.get_podcast(query.podcast_id).await?)
    }
}

/// DownloadPodcastAudio Handler - 将音频流逐块写入文件
pub struct DownloadPodcastAudioHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl DownloadPodcastAudioHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    /// 返回写入的字节数；失败时删除不完整的文件
    pub async fn handle(&self, query: DownloadPodcastAudio) -> Result<u64, ApplicationError> {
        let mut stream = self.backend.podcast_audio(query.podcast_id).await?;

        if let Some(parent) = query.destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApplicationError::internal(format!("Failed to create directory: {}", e)))?;
        }
        let mut file = tokio::fs::File::create(&query.destination)
            .await
            .map_err(|e| ApplicationError::internal(format!("Failed to create file: {}", e)))?;

        let mut written: u64 = 0;
        let result: Result<(), ApplicationError> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| ApplicationError::internal(format!("Failed to write audio: {}", e)))?;
                written += chunk.len() as u64;
            }
            file.flush()
                .await
                .map_err(|e| ApplicationError::internal(format!("Failed to flush audio: {}", e)))?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            let _ = tokio::fs::remove_file(&query.destination).await;
            tracing::error!(podcast_id = %query.podcast_id, error = %e, "Audio download failed");
            return Err(e);
        }

        tracing::info!(
            podcast_id = %query.podcast_id,
            path = %query.destination.display(),
            bytes = written,
            "Podcast audio downloaded"
        );
        Ok(written)
    }
}
