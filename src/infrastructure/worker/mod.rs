//! Worker Layer - Background Task Processing
//!
//! 实现 TaskPoller，按固定间隔轮询后端任务状态直到终态

mod task_poller;

pub use task_poller::{PollOutcome, PollSession, TaskPoller, TaskPollerConfig};
