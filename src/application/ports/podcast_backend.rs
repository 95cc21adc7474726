//! Podcast Backend Port - 播客后端服务抽象
//!
//! 后端任务处理器只以 "提交任务 → 得到 task id" 和 "查询 task id → 得到状态"
//! 的形式被使用；具体实现（经由网关的 HTTP 调用）在 infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::podcast::{PodcastId, PodcastSummary, SearchSpaceId, ValidatedGeneration};
use crate::domain::task::{SubmitAck, TaskHandle, TaskStatus};
use crate::domain::voice::TtsVoices;

/// 后端调用错误
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    /// 非 2xx 响应，detail 为可直接展示给用户的消息
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// 响应结构不符合约定
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 请求无法构造（例如文档 MIME 类型非法）
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// 是否可能是暂时性故障（轮询时可在下一个周期重试）
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            BackendError::InvalidResponse(_) | BackendError::InvalidRequest(_)
        )
    }
}

/// 音频数据流
pub type AudioStream = BoxStream<'static, Result<Bytes, BackendError>>;

/// 播客列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastListFilter {
    pub search_space_id: Option<SearchSpaceId>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// Podcast Backend Port
#[async_trait]
pub trait PodcastBackendPort: Send + Sync {
    /// 提交生成任务（恰好一次 POST）
    async fn generate(&self, request: ValidatedGeneration) -> Result<SubmitAck, BackendError>;

    /// 查询任务状态
    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskStatus, BackendError>;

    /// 获取 provider 的音色目录
    async fn tts_voices(&self, provider: &str) -> Result<TtsVoices, BackendError>;

    /// 列出播客
    async fn list_podcasts(
        &self,
        filter: &PodcastListFilter,
    ) -> Result<Vec<PodcastSummary>, BackendError>;

    /// 获取单个播客
    async fn get_podcast(&self, id: PodcastId) -> Result<PodcastSummary, BackendError>;

    /// 删除播客，返回后端消息
    async fn delete_podcast(&self, id: PodcastId) -> Result<String, BackendError>;

    /// 获取播客音频流
    async fn podcast_audio(&self, id: PodcastId) -> Result<AudioStream, BackendError>;
}
