//! Memory Layer - In-Memory State Management
//!
//! 活跃轮询会话的内存登记表

mod poll_registry;

pub use poll_registry::InMemoryPollRegistry;
