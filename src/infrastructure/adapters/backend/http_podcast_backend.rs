//! HTTP Podcast Backend - 经由网关调用播客后端
//!
//! 实现 PodcastBackendPort trait，所有请求都发往网关地址 + API 前缀
//!
//! 后端 API:
//! - POST   {prefix}/podcasts/generate                  multipart → {status, task_id}
//! - GET    {prefix}/podcasts/task/{task_id}/status     → TaskStatus
//! - GET    {prefix}/podcasts/tts-voices/{provider}     → {provider, voices}
//! - GET    {prefix}/podcasts?search_space_id&skip&limit → [PodcastSummary]
//! - GET    {prefix}/podcasts/{id}                      → PodcastSummary
//! - DELETE {prefix}/podcasts/{id}                      → {message}
//! - GET    {prefix}/podcasts/{id}/audio                → audio/mpeg stream

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{AudioStream, BackendError, PodcastBackendPort, PodcastListFilter};
use crate::domain::podcast::{PodcastId, PodcastSource, PodcastSummary, ValidatedGeneration};
use crate::domain::task::{SubmitAck, TaskHandle, TaskStatus};
use crate::domain::voice::TtsVoices;

/// HTTP 后端客户端配置
#[derive(Debug, Clone)]
pub struct HttpPodcastBackendConfig {
    /// 网关基础 URL
    pub base_url: String,
    /// API 前缀
    pub api_prefix: String,
    /// 请求超时时间（秒），0 表示使用传输层默认值
    pub timeout_secs: u64,
    /// 可选的 Bearer token
    pub bearer_token: Option<String>,
}

impl Default for HttpPodcastBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_prefix: "/api/v1".to_string(),
            timeout_secs: 0,
            bearer_token: None,
        }
    }
}

impl HttpPodcastBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    message: String,
}

/// HTTP 播客后端客户端
///
/// 启用 cookie store，网关转发的 `set-cookie` 会在后续请求中自动带上
pub struct HttpPodcastBackend {
    client: Client,
    config: HttpPodcastBackendConfig,
}

impl HttpPodcastBackend {
    /// 创建新的客户端
    pub fn new(config: HttpPodcastBackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder().cookie_store(true);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_prefix.trim_end_matches('/'),
            path
        )
    }

    fn generate_url(&self) -> String {
        self.api_url("/podcasts/generate")
    }

    fn status_url(&self, handle: &TaskHandle) -> String {
        self.api_url(&format!(
            "/podcasts/task/{}/status",
            urlencoding::encode(handle.as_str())
        ))
    }

    /// provider 可能包含 `/`，必须编码为单个路径段
    fn voices_url(&self, provider: &str) -> String {
        self.api_url(&format!("/podcasts/tts-voices/{}", urlencoding::encode(provider)))
    }

    fn podcasts_url(&self) -> String {
        self.api_url("/podcasts")
    }

    fn podcast_url(&self, id: PodcastId) -> String {
        self.api_url(&format!("/podcasts/{}", id))
    }

    fn audio_url(&self, id: PodcastId) -> String {
        self.api_url(&format!("/podcasts/{}/audio", id))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = error_detail(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), detail = %detail, "Backend returned error status");
        Err(BackendError::Http {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// 构造生成请求的 multipart 表单
///
/// 可选字段缺省时不发送，由后端应用默认值
pub(crate) fn build_generation_form(request: ValidatedGeneration) -> Result<Form, BackendError> {
    let mut form = Form::new()
        .text("search_space_id", request.search_space_id.to_string())
        .text("podcast_title", request.podcast_title)
        .text("source_type", request.source.source_type().as_str());

    if let Some(prompt) = request.user_prompt {
        form = form.text("user_prompt", prompt);
    }
    form = form
        .text("tts_provider", request.tts_provider)
        .text("speaker_0_voice", request.speaker_0_voice)
        .text("speaker_1_voice", request.speaker_1_voice);

    form = match request.source {
        PodcastSource::Text(text) => form.text("text_content", text),
        PodcastSource::Document(file) => {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = file.mime_type {
                part = part.mime_str(&mime).map_err(|e| {
                    BackendError::InvalidRequest(format!("invalid document mime type {}: {}", mime, e))
                })?;
            }
            form.part("document_file", part)
        }
    };

    Ok(form)
}

/// 从非 2xx 响应体中提取可读消息
///
/// 优先使用 JSON 的 `detail`（后端）或 `error`（网关）字段，否则退回到状态码
pub(crate) fn error_detail(status: u16, body: &[u8]) -> String {
    let fallback = || format!("HTTP {}", status);

    let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) else {
        return fallback();
    };

    match map.get("detail").or_else(|| map.get("error")) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Null) | None => fallback(),
        Some(other) => other.to_string(),
    }
}

fn map_transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Network(format!("Cannot connect to backend: {}", e))
    } else {
        BackendError::Network(e.to_string())
    }
}

#[async_trait]
impl PodcastBackendPort for HttpPodcastBackend {
    async fn generate(&self, request: ValidatedGeneration) -> Result<SubmitAck, BackendError> {
        tracing::debug!(url = %self.generate_url(), "Sending generation request");
        let form = build_generation_form(request)?;
        self.send_json(self.client.post(self.generate_url()).multipart(form))
            .await
    }

    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskStatus, BackendError> {
        self.send_json(self.client.get(self.status_url(handle))).await
    }

    async fn tts_voices(&self, provider: &str) -> Result<TtsVoices, BackendError> {
        self.send_json(self.client.get(self.voices_url(provider))).await
    }

    async fn list_podcasts(
        &self,
        filter: &PodcastListFilter,
    ) -> Result<Vec<PodcastSummary>, BackendError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(id) = filter.search_space_id {
            query.push(("search_space_id", id.to_string()));
        }
        if let Some(skip) = filter.skip {
            query.push(("skip", skip.to_string()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }

        self.send_json(self.client.get(self.podcasts_url()).query(&query))
            .await
    }

    async fn get_podcast(&self, id: PodcastId) -> Result<PodcastSummary, BackendError> {
        self.send_json(self.client.get(self.podcast_url(id))).await
    }

    async fn delete_podcast(&self, id: PodcastId) -> Result<String, BackendError> {
        let response: DeleteResponse = self
            .send_json(self.client.delete(self.podcast_url(id)))
            .await?;
        Ok(response.message)
    }

    async fn podcast_audio(&self, id: PodcastId) -> Result<AudioStream, BackendError> {
        let response = self.send(self.client.get(self.audio_url(id))).await?;
        Ok(response
            .bytes_stream()
            .map_err(map_transport_error)
            .boxed())
    }
}
