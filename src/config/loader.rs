//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "PODGATE";

/// 加载应用配置
///
/// # 环境变量示例
/// - `PODGATE_SERVER__PORT=8080`
/// - `PODGATE_BACKEND__URL=http://backend:8000`
/// - `PODGATE_GATEWAY__PREFIXES=/api/v1,/auth,/users`
/// - `PODGATE_CLIENT__POLL_INTERVAL_SECS=2`
///
/// 后端地址还会回退到 `BACKEND_URL` 等候选变量，见 [`super::BackendConfig::resolve_url`]
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(config_path, None)
}

/// `env` 为 None 时读取进程环境变量
fn load_with_env(
    config_path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.permissive_cors", false)?
        .set_default("backend.timeout_secs", 0)?
        .set_default("gateway.prefixes", vec!["/api/v1"])?
        .set_default("gateway.max_body_bytes", 50 * 1024 * 1024)?
        .set_default("client.base_url", "http://localhost:3000")?
        .set_default("client.api_prefix", "/api/v1")?
        .set_default("client.poll_interval_secs", 5)?
        .set_default("client.timeout_secs", 0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），gateway.prefixes 以逗号分隔
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("gateway.prefixes")
            .try_parsing(true)
            .source(env),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    app_config.gateway.prefixes = normalize_prefixes(&app_config.gateway.prefixes)?;
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 规范化转发前缀：去空白与末尾 `/`，去重
fn normalize_prefixes(prefixes: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut normalized: Vec<String> = Vec::with_capacity(prefixes.len());

    for raw in prefixes {
        let prefix = raw.trim().trim_end_matches('/');
        if !raw.trim().starts_with('/') || prefix.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Gateway prefix must start with '/' and not be the root: {:?}",
                raw
            )));
        }
        if prefix.contains('*') || prefix.contains(':') {
            return Err(ConfigError::ValidationError(format!(
                "Gateway prefix must be a literal path: {:?}",
                raw
            )));
        }
        if !normalized.iter().any(|p| p == prefix) {
            normalized.push(prefix.to_string());
        }
    }

    Ok(normalized)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.gateway.prefixes.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one gateway prefix is required".to_string(),
        ));
    }

    if config.gateway.prefixes.iter().any(|p| p == "/api/ping") {
        return Err(ConfigError::ValidationError(
            "Gateway prefix cannot shadow /api/ping".to_string(),
        ));
    }

    if config.client.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Client base URL cannot be empty".to_string(),
        ));
    }

    if config.client.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Poll interval cannot be 0".to_string(),
        ));
    }

    if config.tts.providers.iter().any(|p| p.value.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "TTS provider value cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Gateway Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Backend URL: {}", config.backend.resolved_url());
    if config.backend.timeout_secs > 0 {
        tracing::info!("Backend Timeout: {}s", config.backend.timeout_secs);
    }
    tracing::info!("Prefixes: {}", config.gateway.prefixes.join(", "));
    tracing::info!("Max Body: {} bytes", config.gateway.max_body_bytes);
    tracing::info!("CORS: {}", if config.server.permissive_cors { "permissive" } else { "off" });
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=============================");
}
