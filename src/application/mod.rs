//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（PodcastBackend, PollRegistry）
//! - commands: CQRS 命令及处理器（提交生成、删除）
//! - queries: CQRS 查询及处理器（任务状态、音色目录、播客列表、音频下载）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    DeletePodcast,
    GeneratePodcast,
    // Handlers
    handlers::{DeletePodcastHandler, GeneratePodcastHandler},
};

pub use error::ApplicationError;

pub use ports::{
    AudioStream, BackendError, PodcastBackendPort, PodcastListFilter, PollRegistryPort, PollTicket,
    TaskError,
};

pub use queries::{
    DownloadPodcastAudio,
    GetPodcast,
    GetTaskStatus,
    GetTtsVoices,
    ListPodcasts,
    // Handlers
    handlers::{
        DownloadPodcastAudioHandler, GetPodcastHandler, GetTaskStatusHandler,
        GetTtsVoicesHandler, ListPodcastsHandler,
    },
};
