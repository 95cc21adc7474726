//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod podcast_backend;
mod poll_registry;

pub use podcast_backend::{AudioStream, BackendError, PodcastBackendPort, PodcastListFilter};
pub use poll_registry::{PollRegistryPort, PollTicket, TaskError};
