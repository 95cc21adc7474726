//! HTTP Server
//!
//! Axum Gateway 服务器启动和配置

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 转发的路径前缀
    pub prefixes: Vec<String>,
    /// 是否附加宽松的 CORS 头
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            prefixes: vec!["/api/v1".to_string()],
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        let mut router = create_routes(&self.config.prefixes)
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http());

        if self.config.permissive_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .expose_headers(Any)
                .max_age(std::time::Duration::from_secs(3600));
            router = router.layer(cors);
        }

        router.with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(
            prefixes = ?self.config.prefixes,
            backend = %self.state.forwarder.backend_url(),
            "Starting gateway on {} (with graceful shutdown)",
            addr
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::gateway::{ForwarderConfig, HttpForwarder};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router_for(backend_url: &str, prefixes: &[&str]) -> Router {
        let forwarder = HttpForwarder::new(ForwarderConfig::new(backend_url)).unwrap();
        let config = ServerConfig::default()
            .with_prefixes(prefixes.iter().map(|p| p.to_string()).collect());
        HttpServer::new(config, AppState::new(forwarder, 1024 * 1024)).build_router()
    }

    async fn body_of(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_ping_is_served_locally() {
        let app = router_for("http://127.0.0.1:1", &["/api/v1"]);
        let response = app
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unreachable_backend_returns_fixed_502_for_every_method() {
        for m in ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"] {
            let app = router_for("http://127.0.0.1:1", &["/api/v1"]);
            let response = app
                .oneshot(
                    Request::builder()
                        .method(m)
                        .uri("/api/v1/podcasts")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY, "method {}", m);
            assert_eq!(
                body_of(response).await,
                br#"{"error":"Failed to proxy request to backend"}"#.to_vec()
            );
        }
    }

    #[tokio::test]
    async fn test_request_is_forwarded_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/podcasts/generate"))
            .and(query_param("dry", "1"))
            .and(header("cookie", "session=abc"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(
                ResponseTemplate::new(201)
                    .append_header("set-cookie", "a=1")
                    .append_header("set-cookie", "b=2")
                    .set_body_string(r#"{"status":"processing","task_id":"abc123"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = router_for(&server.uri(), &["/api/v1"]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/podcasts/generate?dry=1")
                    .header("host", "gateway.local")
                    .header("cookie", "session=abc")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"a":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(
            body_of(response).await,
            br#"{"status":"processing","task_id":"abc123"}"#.to_vec()
        );

        let received = server.received_requests().await.unwrap();
        assert_ne!(received[0].headers.get("host").unwrap(), "gateway.local");
    }

    #[tokio::test]
    async fn test_encoded_segment_reaches_backend_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/podcasts/tts-voices/openai%2Ftts-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"provider":"openai/tts-1","voices":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let app = router_for(&server.uri(), &["/api/v1"]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/podcasts/tts-voices/openai%2Ftts-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_configured_prefix_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"detail":"Unauthorized"}"#))
            .mount(&server)
            .await;

        let app = router_for(&server.uri(), &["/api/v1", "/auth"]);
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(Request::builder().uri("/other/x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
