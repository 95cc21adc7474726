//! Podcast Context - 播客限界上下文
//!
//! 职责:
//! - 生成请求的构造与本地校验
//! - 后端产物（播客摘要、逐字稿）的只读表示

mod entities;
mod errors;
mod generation;
mod value_objects;

pub use entities::{PodcastSummary, TranscriptEntry};
pub use errors::FieldViolation;
pub use generation::{GenerationRequest, PodcastSource, ValidatedGeneration, DEFAULT_PODCAST_TITLE};
pub use value_objects::{DocumentFile, PodcastId, SearchSpaceId, SourceType};
