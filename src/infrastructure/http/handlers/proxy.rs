//! Proxy Handler
//!
//! 任意方法的通配转发；任何失败都返回固定 502

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{OriginalUri, Request, State},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::infrastructure::gateway::{GatewayError, ProxyRequest, ProxyResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 转发入站请求到后端
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    request: Request,
) -> Response {
    match forward(&state, uri, request).await {
        Ok(response) => relay(response),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn forward(
    state: &AppState,
    uri: http::Uri,
    request: Request,
) -> Result<ProxyResponse, GatewayError> {
    let (parts, body) = request.into_parts();

    let body = if ProxyRequest::is_bodiless(&parts.method) {
        Bytes::new()
    } else {
        axum::body::to_bytes(body, state.max_body_bytes)
            .await
            .map_err(|e| GatewayError::BodyRead(e.to_string()))?
    };

    let proxy_request = ProxyRequest::from_parts(parts.method, &uri, &parts.headers, body);
    state.forwarder.forward(proxy_request).await
}

/// 把后端响应原样交还，响应体以流的形式透传
fn relay(proxied: ProxyResponse) -> Response {
    let mut response = Response::new(Body::from_stream(proxied.body));
    *response.status_mut() = proxied.status;
    *response.headers_mut() = proxied.headers;
    response
}
