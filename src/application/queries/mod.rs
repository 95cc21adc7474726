//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：任务状态、音色目录、播客列表与音频

mod podcast_queries;
mod task_queries;
mod voice_queries;

pub mod handlers;

pub use podcast_queries::*;
pub use task_queries::*;
pub use voice_queries::*;
