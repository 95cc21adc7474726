//! Voice Context - Provider
//!
//! provider 标识形如 `<vendor>/<model>`，例如 `openai/tts-1`。

use serde::{Deserialize, Serialize};

/// 可选的 TTS provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsProviderOption {
    /// provider 标识
    pub value: String,
    /// 展示名称
    pub label: String,
}

impl TtsProviderOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// 未配置 provider 列表时的默认选项
pub fn default_providers() -> Vec<TtsProviderOption> {
    vec![
        TtsProviderOption::new("openai/tts-1", "OpenAI TTS"),
        TtsProviderOption::new("vertex_ai/test", "Google Vertex AI"),
        TtsProviderOption::new("local/kokoro", "Kokoro (Local)"),
        TtsProviderOption::new("azure/tts-1", "Azure TTS"),
    ]
}

const PROVIDER_LABELS: &[(&str, &str)] = &[
    ("openai", "OpenAI"),
    ("vertex", "Vertex AI"),
    ("kokoro", "Kokoro"),
    ("azure", "Azure"),
];

/// 播客列表中展示的 provider 名称
pub fn provider_label(provider: Option<&str>) -> String {
    let Some(provider) = provider.filter(|p| !p.is_empty()) else {
        return "Default".to_string();
    };

    PROVIDER_LABELS
        .iter()
        .find(|(needle, _)| provider.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| provider.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_label() {
        assert_eq!(provider_label(None), "Default");
        assert_eq!(provider_label(Some("")), "Default");
        assert_eq!(provider_label(Some("openai/tts-1")), "OpenAI");
        assert_eq!(provider_label(Some("vertex_ai/test")), "Vertex AI");
        assert_eq!(provider_label(Some("local/kokoro")), "Kokoro");
        assert_eq!(provider_label(Some("azure/tts-1")), "Azure");
        assert_eq!(provider_label(Some("elevenlabs/v2")), "elevenlabs/v2");
    }

    #[test]
    fn test_default_providers() {
        let providers = default_providers();
        assert_eq!(providers.len(), 4);
        assert_eq!(providers[0].value, "openai/tts-1");
    }
}
