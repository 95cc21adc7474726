//! Task Client - 提交生成任务并轮询到终态
//!
//! 组合应用层 handler、轮询器与登记表，对外提供一个完整的客户端入口

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    ApplicationError, DeletePodcast, DeletePodcastHandler, DownloadPodcastAudio,
    DownloadPodcastAudioHandler, GeneratePodcast, GeneratePodcastHandler, GetPodcast,
    GetPodcastHandler, GetTaskStatusHandler, GetTtsVoices, GetTtsVoicesHandler, ListPodcasts,
    ListPodcastsHandler, PodcastBackendPort, TaskError,
};
use crate::config::{ClientConfig, TtsConfig};
use crate::domain::podcast::{GenerationRequest, PodcastId, PodcastSummary};
use crate::domain::task::TaskHandle;
use crate::domain::voice::{SpeakerVoices, TtsProviderOption, TtsVoices};
use crate::infrastructure::adapters::{HttpPodcastBackend, HttpPodcastBackendConfig};
use crate::infrastructure::memory::InMemoryPollRegistry;
use crate::infrastructure::worker::{PollOutcome, PollSession, TaskPoller, TaskPollerConfig};

/// 任务客户端
pub struct TaskClient {
    generate_handler: GeneratePodcastHandler,
    delete_handler: DeletePodcastHandler,
    list_handler: ListPodcastsHandler,
    get_handler: GetPodcastHandler,
    download_handler: DownloadPodcastAudioHandler,
    voices_handler: GetTtsVoicesHandler,
    poller: TaskPoller,
    providers: Vec<TtsProviderOption>,
}

impl TaskClient {
    /// 经由网关访问后端
    pub fn from_config(client: &ClientConfig, tts: &TtsConfig) -> Result<Self, ApplicationError> {
        let mut backend_config = HttpPodcastBackendConfig::new(client.base_url.clone())
            .with_timeout(client.timeout_secs);
        backend_config.api_prefix = client.api_prefix.clone();
        if let Some(token) = &client.bearer_token {
            backend_config = backend_config.with_bearer_token(token.clone());
        }

        let backend = HttpPodcastBackend::new(backend_config)?;
        let poller_config = TaskPollerConfig {
            interval: Duration::from_secs(client.poll_interval_secs),
        };

        Ok(Self::with_backend(
            Arc::new(backend),
            poller_config,
            tts.providers.clone(),
        ))
    }

    /// 使用任意后端实现
    pub fn with_backend(
        backend: Arc<dyn PodcastBackendPort>,
        poller_config: TaskPollerConfig,
        providers: Vec<TtsProviderOption>,
    ) -> Self {
        let status_handler = Arc::new(GetTaskStatusHandler::new(backend.clone()));
        let registry = Arc::new(InMemoryPollRegistry::new());

        Self {
            generate_handler: GeneratePodcastHandler::new(backend.clone()),
            delete_handler: DeletePodcastHandler::new(backend.clone()),
            list_handler: ListPodcastsHandler::new(backend.clone()),
            get_handler: GetPodcastHandler::new(backend.clone()),
            download_handler: DownloadPodcastAudioHandler::new(backend.clone()),
            voices_handler: GetTtsVoicesHandler::new(backend),
            poller: TaskPoller::new(poller_config, status_handler, registry),
            providers,
        }
    }

    /// 可选的 TTS provider
    pub fn providers(&self) -> &[TtsProviderOption] {
        &self.providers
    }

    /// 提交生成任务，返回任务句柄
    pub async fn submit(&self, request: GenerationRequest) -> Result<TaskHandle, ApplicationError> {
        self.generate_handler.handle(GeneratePodcast { request }).await
    }

    /// 开始轮询句柄
    pub fn watch(&self, handle: TaskHandle) -> Result<PollSession, TaskError> {
        self.poller.watch(handle)
    }

    /// 提交并等待终态
    pub async fn generate_and_wait(
        &self,
        request: GenerationRequest,
    ) -> Result<PollOutcome, ApplicationError> {
        let handle = self.submit(request).await?;
        let session = self.watch(handle)?;
        Ok(session.wait().await)
    }

    /// 获取 provider 的音色目录
    pub async fn voices(&self, provider: &str) -> Result<TtsVoices, ApplicationError> {
        self.voices_handler
            .handle(GetTtsVoices {
                provider: provider.to_string(),
            })
            .await
    }

    /// 用目录中的前两个音色补全未选择的说话人
    pub async fn default_speakers(
        &self,
        provider: &str,
        current: SpeakerVoices,
    ) -> Result<SpeakerVoices, ApplicationError> {
        if current.is_complete() {
            return Ok(current);
        }
        let catalog = self.voices(provider).await?;
        let mut speakers = current;
        speakers.fill_defaults(&catalog);
        Ok(speakers)
    }

    pub async fn list_podcasts(
        &self,
        query: ListPodcasts,
    ) -> Result<Vec<PodcastSummary>, ApplicationError> {
        self.list_handler.handle(query).await
    }

    pub async fn get_podcast(&self, podcast_id: PodcastId) -> Result<PodcastSummary, ApplicationError> {
        self.get_handler.handle(GetPodcast { podcast_id }).await
    }

    /// 删除播客，返回后端消息
    pub async fn delete_podcast(&self, podcast_id: PodcastId) -> Result<String, ApplicationError> {
        self.delete_handler.handle(DeletePodcast { podcast_id }).await
    }

    /// 下载音频到目录，文件名取自播客标题
    pub async fn download_audio(
        &self,
        podcast_id: PodcastId,
        directory: &Path,
    ) -> Result<(PathBuf, u64), ApplicationError> {
        let podcast = self.get_podcast(podcast_id).await?;
        let destination = directory.join(podcast.download_file_name());

        let written = self
            .download_handler
            .handle(DownloadPodcastAudio {
                podcast_id,
                destination: destination.clone(),
            })
            .await?;
        Ok((destination, written))
    }

    /// 停止所有轮询，返回停止的会话数
    pub fn shutdown(&self) -> usize {
        let cancelled = self.poller.cancel_all();
        tracing::info!(cancelled, "Task client shut down");
        cancelled
    }
}
