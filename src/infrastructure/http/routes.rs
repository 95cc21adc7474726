//! HTTP Routes
//!
//! - /api/ping            GET  网关健康检查
//! - {prefix}             ANY  透明转发
//! - {prefix}/*path       ANY  透明转发（路径后缀与查询串保持不变）

use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
///
/// 每个前缀都注册精确路径与通配路径；前缀需已规范化（以 `/` 开头、无末尾 `/`、无重复）
pub fn create_routes(prefixes: &[String]) -> Router<Arc<AppState>> {
    let mut router = Router::new().route("/api/ping", get(handlers::ping));

    for prefix in prefixes {
        router = router
            .route(prefix, any(handlers::proxy))
            .route(&format!("{}/*path", prefix), any(handlers::proxy));
    }

    router
}
