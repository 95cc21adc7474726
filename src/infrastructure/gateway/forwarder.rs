//! HTTP Forwarder - 出站请求执行
//!
//! 不跟随重定向、不保存 cookie：3xx 与 set-cookie 原样交还给调用方

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use http::header::{CONNECTION, TRANSFER_ENCODING};
use http::{HeaderMap, StatusCode};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;

use super::request::{ProxyBody, ProxyRequest};

/// 网关错误
///
/// 在 HTTP 边界统一转换为固定的 502 响应，原因只写日志
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid target URL {url}: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Failed to read request body: {0}")]
    BodyRead(String),
}

/// 转发器配置
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// 后端基础 URL（不带末尾 `/`）
    pub backend_url: String,
    /// 出站请求超时（秒），0 表示不设置
    pub timeout_secs: u64,
}

impl ForwarderConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            timeout_secs: 0,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 后端响应，只存活一次调用，不缓存
pub struct ProxyResponse {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Result<Bytes, reqwest::Error>>,
}

impl std::fmt::Debug for ProxyResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// HTTP 转发器
///
/// 无状态，可被并发调用
pub struct HttpForwarder {
    client: Client,
    backend_url: String,
}

impl HttpForwarder {
    pub fn new(config: ForwarderConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().redirect(Policy::none());
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// 出站 URL = 后端基础地址 + 入站路径 + 查询串
    pub fn target_url(&self, request: &ProxyRequest) -> String {
        format!("{}{}", self.backend_url, request.path_and_query())
    }

    /// 转发一次请求
    pub async fn forward(&self, request: ProxyRequest) -> Result<ProxyResponse, GatewayError> {
        let target = self.target_url(&request);
        let url = Url::parse(&target).map_err(|e| GatewayError::InvalidTarget {
            url: target.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(method = %request.method, url = %url, "Forwarding request");

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        builder = match request.body {
            ProxyBody::Empty => builder,
            ProxyBody::Text(text) => builder.body(text),
            ProxyBody::Bytes(bytes) => builder.body(bytes),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let mut headers = HeaderMap::with_capacity(response.headers().len());
        for (name, value) in response.headers().iter() {
            if name == CONNECTION || name == TRANSFER_ENCODING {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        tracing::debug!(
            status = status.as_u16(),
            set_cookies = headers.get_all(http::header::SET_COOKIE).iter().count(),
            "Backend responded"
        );

        Ok(ProxyResponse {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: response.bytes_stream().boxed(),
        })
    }
}
