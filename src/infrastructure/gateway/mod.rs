//! Gateway - 透明反向代理
//!
//! 把入站请求原样转发到后端：方法、路径后缀、查询串、头部与请求体保持不变，
//! 响应的状态码、头部（包括多个 set-cookie）与响应体原样返回。

mod forwarder;
mod request;

pub use forwarder::{ForwarderConfig, GatewayError, HttpForwarder, ProxyResponse};
pub use request::{ProxyBody, ProxyRequest};
