//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::domain::voice::{default_providers, TtsProviderOption};

/// 未配置任何候选时使用的后端地址
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// 后端地址候选环境变量，按优先级排列
pub const BACKEND_URL_CANDIDATES: &[&str] = &[
    "BACKEND_URL",
    "NEXT_PUBLIC_FASTAPI_BACKEND_URL",
    "FASTAPI_BACKEND_URL",
];

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 网关监听配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 后端地址配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 转发配置
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// 任务客户端配置
    #[serde(default)]
    pub client: ClientConfig,

    /// TTS provider 选项
    #[serde(default)]
    pub tts: TtsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 是否附加宽松的 CORS 头（前端与网关不同源时使用）
    #[serde(default)]
    pub permissive_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 后端配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// 显式的后端基础 URL，优先于候选环境变量
    #[serde(default)]
    pub url: Option<String>,

    /// 出站请求超时（秒），0 表示使用传输层默认值
    #[serde(default)]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// 解析后端基础 URL
    ///
    /// 顺序：`backend.url` → 候选环境变量 → 本地默认地址。空值跳过，去掉末尾 `/`
    pub fn resolve_url<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = self.url.clone();
        let candidates = BACKEND_URL_CANDIDATES.iter().map(|name| lookup(name));

        std::iter::once(explicit)
            .chain(candidates)
            .flatten()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// 使用进程环境变量解析
    pub fn resolved_url(&self) -> String {
        self.resolve_url(|name| std::env::var(name).ok())
    }
}

/// 转发配置
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// 转发的路径前缀
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// 入站请求体上限（字节），默认 50MB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_prefixes() -> Vec<String> {
    vec!["/api/v1".to_string()]
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// 任务客户端配置
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// 网关地址
    #[serde(default = "default_client_base_url")]
    pub base_url: String,

    /// API 前缀
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// 状态轮询间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 单次请求超时（秒），0 表示使用传输层默认值
    #[serde(default)]
    pub timeout_secs: u64,

    /// 可选的 Bearer token
    #[serde(default)]
    pub bearer_token: Option<String>,
}

fn default_client_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            api_prefix: default_api_prefix(),
            poll_interval_secs: default_poll_interval(),
            timeout_secs: 0,
            bearer_token: None,
        }
    }
}

/// TTS 配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 可选的 provider 列表
    #[serde(default = "default_providers")]
    pub providers: Vec<TtsProviderOption>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:3000");
        assert_eq!(config.gateway.prefixes, vec!["/api/v1"]);
        assert_eq!(config.client.poll_interval_secs, 5);
        assert_eq!(config.tts.providers.len(), 4);
    }

    #[test]
    fn test_backend_url_defaults_to_loopback() {
        let backend = BackendConfig::default();
        assert_eq!(backend.resolve_url(env(&[])), "http://localhost:8000");
    }

    #[test]
    fn test_backend_url_candidate_order() {
        let backend = BackendConfig::default();
        let lookup = env(&[
            ("FASTAPI_BACKEND_URL", "http://third:8000"),
            ("NEXT_PUBLIC_FASTAPI_BACKEND_URL", "http://second:8000/"),
        ]);
        assert_eq!(backend.resolve_url(lookup), "http://second:8000");
    }

    #[test]
    fn test_empty_candidates_are_skipped() {
        let backend = BackendConfig {
            url: Some("  ".to_string()),
            timeout_secs: 0,
        };
        let lookup = env(&[("BACKEND_URL", ""), ("FASTAPI_BACKEND_URL", "http://api:9000")]);
        assert_eq!(backend.resolve_url(lookup), "http://api:9000");
    }

    #[test]
    fn test_explicit_url_wins() {
        let backend = BackendConfig {
            url: Some("http://configured:8000/".to_string()),
            timeout_secs: 0,
        };
        let lookup = env(&[("BACKEND_URL", "http://env:8000")]);
        assert_eq!(backend.resolve_url(lookup), "http://configured:8000");
    }
}
