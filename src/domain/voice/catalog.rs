//! Voice Context - Catalog

use serde::{Deserialize, Serialize};

/// 音色目录条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// 某个 provider 的音色目录: `{provider, voices}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsVoices {
    pub provider: String,
    pub voices: Vec<VoiceCatalogEntry>,
}

impl TtsVoices {
    pub fn empty(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            voices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn find(&self, voice_id: &str) -> Option<&VoiceCatalogEntry> {
        self.voices.iter().find(|v| v.id == voice_id)
    }
}

/// 两位说话人的音色选择
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerVoices {
    pub speaker_0: Option<String>,
    pub speaker_1: Option<String>,
}

impl SpeakerVoices {
    pub fn new(speaker_0: impl Into<String>, speaker_1: impl Into<String>) -> Self {
        Self {
            speaker_0: Some(speaker_0.into()),
            speaker_1: Some(speaker_1.into()),
        }
    }

    /// 未选择的说话人使用目录中的前两个音色
    ///
    /// 目录只有一个条目时，speaker_1 保持未选择。
    pub fn fill_defaults(&mut self, catalog: &TtsVoices) {
        if self.speaker_0.is_none() {
            self.speaker_0 = catalog.voices.first().map(|v| v.id.clone());
        }
        if self.speaker_1.is_none() {
            self.speaker_1 = catalog.voices.get(1).map(|v| v.id.clone());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.speaker_0.is_some() && self.speaker_1.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> VoiceCatalogEntry {
        VoiceCatalogEntry {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
        }
    }

    fn catalog(ids: &[&str]) -> TtsVoices {
        TtsVoices {
            provider: "openai/tts-1".to_string(),
            voices: ids.iter().map(|id| entry(id)).collect(),
        }
    }

    #[test]
    fn test_fill_defaults_uses_first_two_entries() {
        let mut voices = SpeakerVoices::default();
        voices.fill_defaults(&catalog(&["alloy", "echo", "fable"]));
        assert_eq!(voices, SpeakerVoices::new("alloy", "echo"));
        assert!(voices.is_complete());
    }

    #[test]
    fn test_fill_defaults_keeps_existing_choice() {
        let mut voices = SpeakerVoices {
            speaker_0: Some("nova".to_string()),
            speaker_1: None,
        };
        voices.fill_defaults(&catalog(&["alloy", "echo"]));
        assert_eq!(voices, SpeakerVoices::new("nova", "echo"));
    }

    #[test]
    fn test_fill_defaults_with_short_catalog() {
        let mut voices = SpeakerVoices::default();
        voices.fill_defaults(&catalog(&["alloy"]));
        assert_eq!(voices.speaker_0.as_deref(), Some("alloy"));
        assert!(voices.speaker_1.is_none());

        let mut voices = SpeakerVoices::default();
        voices.fill_defaults(&TtsVoices::empty(""));
        assert_eq!(voices, SpeakerVoices::default());
    }
}
