//! Voice Queries

/// 获取 provider 的音色目录
#[derive(Debug, Clone)]
pub struct GetTtsVoices {
    /// provider 标识，可能包含 `/`
    pub provider: String,
}
