//! Voice Context - TTS 音色限界上下文
//!
//! 职责:
//! - 每个 TTS provider 的音色目录（由后端提供，只读）
//! - provider 选项与展示名称
//! - 默认说话人音色分配

mod catalog;
mod provider;

pub use catalog::{SpeakerVoices, TtsVoices, VoiceCatalogEntry};
pub use provider::{default_providers, provider_label, TtsProviderOption};
