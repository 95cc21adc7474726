//! Backend Adapter - 播客后端客户端实现

mod fake_backend;
mod http_podcast_backend;

pub use fake_backend::{FakePodcastBackend, FakeStatusReply};
pub use http_podcast_backend::*;
