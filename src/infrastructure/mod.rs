//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod client;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod worker;

pub use client::TaskClient;
pub use gateway::{HttpForwarder, ProxyRequest, ProxyResponse};
pub use memory::InMemoryPollRegistry;
pub use worker::{PollOutcome, PollSession, TaskPoller, TaskPollerConfig};
