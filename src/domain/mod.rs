//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Podcast Context: 播客生成请求与产物
//! - Task Context: 后台任务句柄、状态与轮询状态机
//! - Voice Context: TTS 音色目录

pub mod podcast;
pub mod task;
pub mod voice;
