//! Podgate - 播客生成网关与任务客户端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Podcast Context: 生成请求、校验与播客产物
//! - Task Context: 任务句柄、状态联合与轮询状态机
//! - Voice Context: 音色目录、provider 选项
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PodcastBackend, PollRegistry）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Gateway: 透明反向代理
//! - HTTP: Axum 网关服务器
//! - Adapters: 经由网关的后端客户端
//! - Memory: 活跃轮询登记表
//! - Worker: 可取消的状态轮询
//! - Client: TaskClient 入口

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
pub use infrastructure::TaskClient;
