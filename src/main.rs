//! Podgate - 播客生成网关
//!
//! 加载配置、初始化日志，启动反向代理并在 ctrl-c 时优雅关闭

use podgate::config::{load_config, print_config};
use podgate::infrastructure::gateway::{ForwarderConfig, HttpForwarder};
use podgate::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},podgate={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Podgate - 播客生成网关");
    print_config(&config);

    // 创建转发器
    let forwarder_config = ForwarderConfig::new(config.backend.resolved_url())
        .with_timeout(config.backend.timeout_secs);
    let forwarder = HttpForwarder::new(forwarder_config)?;

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_prefixes(config.gateway.prefixes.clone());
    server_config.permissive_cors = config.server.permissive_cors;
    let state = AppState::new(forwarder, config.gateway.max_body_bytes);

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
