//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BackendError, PodcastBackendPort};
use crate::application::queries::GetTtsVoices;
use crate::domain::voice::TtsVoices;

/// GetTtsVoices Handler - 音色目录只读查询
pub struct GetTtsVoicesHandler {
    backend: Arc<dyn PodcastBackendPort>,
}

impl GetTtsVoicesHandler {
    pub fn new(backend: Arc<dyn PodcastBackendPort>) -> Self {
        Self { backend }
    }

    /// 空 provider 或后端不认识的 provider 返回空目录
    pub async fn handle(&self, query: GetTtsVoices) -> Result<TtsVoices, ApplicationError> {
        let provider = query.provider.trim();
        if provider.is_empty() {
            return Ok(TtsVoices::empty(""));
        }

        match self.backend.tts_voices(provider).await {
            Ok(voices) => {
                tracing::debug!(provider = %provider, count = voices.voices.len(), "Voice catalog loaded");
                Ok(voices)
            }
            Err(BackendError::Http { status: 404, .. }) => {
                tracing::debug!(provider = %provider, "Unknown TTS provider");
                Ok(TtsVoices::empty(provider))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::VoiceCatalogEntry;
    use crate::infrastructure::adapters::FakePodcastBackend;

    #[tokio::test]
    async fn test_empty_provider_returns_empty_catalog() {
        let handler = GetTtsVoicesHandler::new(Arc::new(FakePodcastBackend::new()));
        let voices = handler
            .handle(GetTtsVoices {
                provider: "  ".to_string(),
            })
            .await
            .unwrap();
        assert!(voices.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_provider_returns_empty_catalog() {
        let handler = GetTtsVoicesHandler::new(Arc::new(FakePodcastBackend::new()));
        let voices = handler
            .handle(GetTtsVoices {
                provider: "nobody/none".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(voices.provider, "nobody/none");
        assert!(voices.is_empty());
    }

    #[tokio::test]
    async fn test_known_provider_returns_catalog() {
        let backend = FakePodcastBackend::new().with_voices(
            "openai/tts-1",
            vec![VoiceCatalogEntry {
                id: "alloy".to_string(),
                name: "Alloy".to_string(),
                description: "Neutral, balanced voice".to_string(),
            }],
        );
        let handler = GetTtsVoicesHandler::new(Arc::new(backend));
        let voices = handler
            .handle(GetTtsVoices {
                provider: "openai/tts-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(voices.find("alloy").map(|v| v.name.as_str()), Some("Alloy"));
    }
}
