//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：提交生成任务、删除播客

mod podcast_commands;

pub mod handlers;

pub use podcast_commands::*;
