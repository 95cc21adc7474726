//! Task Context - 后台任务限界上下文
//!
//! 职责:
//! - 任务句柄（提交后由后端返回的不透明标识）
//! - 任务状态（processing / success / error 三态联合）
//! - 客户端轮询状态机

mod handle;
mod state;
mod status;

pub use handle::TaskHandle;
pub use state::{PollState, Transition};
pub use status::{SubmitAck, TaskStatus, TaskSuccess};
