//! HTTP Error Handling
//!
//! 网关失败对外只暴露固定的 502 消息，原因记录在日志中

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::infrastructure::gateway::GatewayError;

/// 网关失败时返回给调用方的固定消息
pub const PROXY_FAILURE_MESSAGE: &str = "Failed to proxy request to backend";

/// 错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadGateway(GatewayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadGateway(cause) => {
                tracing::error!(error = %cause, "Proxy request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse::new(PROXY_FAILURE_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        ApiError::BadGateway(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_gateway_hides_cause() {
        let response =
            ApiError::from(GatewayError::Transport("dns error: no such host".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            body.as_ref(),
            br#"{"error":"Failed to proxy request to backend"}"#
        );
    }
}
