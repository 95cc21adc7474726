//! Fake Podcast Backend - 用于测试的后端
//!
//! 不发起网络请求；状态查询按脚本依次返回，脚本耗尽后一直返回 processing

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{AudioStream, BackendError, PodcastBackendPort, PodcastListFilter};
use crate::domain::podcast::{PodcastId, PodcastSummary, ValidatedGeneration};
use crate::domain::task::{SubmitAck, TaskHandle, TaskStatus, TaskSuccess};
use crate::domain::voice::{TtsVoices, VoiceCatalogEntry};

/// 脚本化的状态查询回复
#[derive(Debug, Clone)]
pub enum FakeStatusReply {
    Processing(Option<String>),
    Success(TaskSuccess),
    Error(String),
    /// 模拟连接失败
    NetworkFailure,
    /// 模拟不符合约定的响应体
    Malformed,
}

impl FakeStatusReply {
    fn into_result(self) -> Result<TaskStatus, BackendError> {
        match self {
            Self::Processing(state) => Ok(TaskStatus::Processing { state }),
            Self::Success(success) => Ok(TaskStatus::Success(success)),
            Self::Error(error) => Ok(TaskStatus::Error { error }),
            Self::NetworkFailure => Err(BackendError::Network("connection refused".to_string())),
            Self::Malformed => Err(BackendError::InvalidResponse(
                "unknown variant `queued`".to_string(),
            )),
        }
    }
}

/// Fake Podcast Backend
pub struct FakePodcastBackend {
    ack: SubmitAck,
    statuses: Mutex<VecDeque<FakeStatusReply>>,
    voices: HashMap<String, Vec<VoiceCatalogEntry>>,
    podcasts: Vec<PodcastSummary>,
    audio: Vec<Vec<u8>>,
    generate_calls: AtomicUsize,
    status_calls: AtomicUsize,
    last_generation: Mutex<Option<ValidatedGeneration>>,
    last_list_filter: Mutex<Option<PodcastListFilter>>,
}

impl Default for FakePodcastBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePodcastBackend {
    pub fn new() -> Self {
        Self {
            ack: SubmitAck {
                status: "processing".to_string(),
                task_id: "fake-task".to_string(),
            },
            statuses: Mutex::new(VecDeque::new()),
            voices: HashMap::new(),
            podcasts: Vec::new(),
            audio: Vec::new(),
            generate_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            last_generation: Mutex::new(None),
            last_list_filter: Mutex::new(None),
        }
    }

    pub fn with_task_id(mut self, task_id: &str) -> Self {
        self.ack.task_id = task_id.to_string();
        self
    }

    pub fn with_ack(mut self, ack: SubmitAck) -> Self {
        self.ack = ack;
        self
    }

    pub fn with_statuses(self, replies: Vec<FakeStatusReply>) -> Self {
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.extend(replies);
        }
        self
    }

    pub fn with_voices(mut self, provider: &str, voices: Vec<VoiceCatalogEntry>) -> Self {
        self.voices.insert(provider.to_string(), voices);
        self
    }

    pub fn with_podcasts(mut self, podcasts: Vec<PodcastSummary>) -> Self {
        self.podcasts = podcasts;
        self
    }

    pub fn with_audio(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.audio = chunks;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn last_generation(&self) -> Option<ValidatedGeneration> {
        self.last_generation.lock().ok().and_then(|g| g.clone())
    }

    pub fn last_list_filter(&self) -> Option<PodcastListFilter> {
        self.last_list_filter.lock().ok().and_then(|f| f.clone())
    }
}

#[async_trait]
impl PodcastBackendPort for FakePodcastBackend {
    async fn generate(&self, request: ValidatedGeneration) -> Result<SubmitAck, BackendError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_generation.lock() {
            *last = Some(request);
        }
        Ok(self.ack.clone())
    }

    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskStatus, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .statuses
            .lock()
            .ok()
            .and_then(|mut statuses| statuses.pop_front())
            .unwrap_or(FakeStatusReply::Processing(None));
        tracing::debug!(task_id = %handle, reply = ?reply, "FakePodcastBackend: status reply");
        reply.into_result()
    }

    async fn tts_voices(&self, provider: &str) -> Result<TtsVoices, BackendError> {
        match self.voices.get(provider) {
            Some(voices) => Ok(TtsVoices {
                provider: provider.to_string(),
                voices: voices.clone(),
            }),
            None => Err(BackendError::Http {
                status: 404,
                detail: format!("Unknown TTS provider: {}", provider),
            }),
        }
    }

    async fn list_podcasts(
        &self,
        filter: &PodcastListFilter,
    ) -> Result<Vec<PodcastSummary>, BackendError> {
        if let Ok(mut last) = self.last_list_filter.lock() {
            *last = Some(filter.clone());
        }
        Ok(self
            .podcasts
            .iter()
            .filter(|p| filter.search_space_id.map_or(true, |id| p.search_space_id == id))
            .cloned()
            .collect())
    }

    async fn get_podcast(&self, id: PodcastId) -> Result<PodcastSummary, BackendError> {
        self.podcasts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(BackendError::Http {
                status: 404,
                detail: "Podcast not found".to_string(),
            })
    }

    async fn delete_podcast(&self, _id: PodcastId) -> Result<String, BackendError> {
        Ok("Podcast deleted successfully".to_string())
    }

    async fn podcast_audio(&self, _id: PodcastId) -> Result<AudioStream, BackendError> {
        let chunks: Vec<Result<Bytes, BackendError>> =
            self.audio.iter().cloned().map(|c| Ok(Bytes::from(c))).collect();
        Ok(futures_util::stream::iter(chunks).boxed())
    }
}
