//! Query Handlers 实现

mod podcast_handlers;
mod task_handlers;
mod voice_handlers;

pub use podcast_handlers::*;
pub use task_handlers::*;
pub use voice_handlers::*;
