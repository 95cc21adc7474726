//! Podcast Context - Generation Request
//!
//! 生成请求在发出任何网络调用前完成本地校验。
//! 校验通过后得到 `ValidatedGeneration`，其来源负载由类型保证与来源类型一致。

use super::errors::FieldViolation;
use super::value_objects::{DocumentFile, SearchSpaceId, SourceType};

/// 后端对空标题使用的默认标题
pub const DEFAULT_PODCAST_TITLE: &str = "SurfSense Podcast";

/// 播客生成请求（未校验）
///
/// 字段与后端 `POST /podcasts/generate` 的表单字段一一对应。
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub search_space_id: SearchSpaceId,
    pub podcast_title: String,
    pub user_prompt: Option<String>,
    pub tts_provider: String,
    pub speaker_0_voice: String,
    pub speaker_1_voice: String,
    pub source_type: SourceType,
    pub text_content: Option<String>,
    pub document_file: Option<DocumentFile>,
}

impl GenerationRequest {
    /// 以内联文本为来源构造请求
    pub fn from_text(
        search_space_id: SearchSpaceId,
        podcast_title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            search_space_id,
            podcast_title: podcast_title.into(),
            user_prompt: None,
            tts_provider: String::new(),
            speaker_0_voice: String::new(),
            speaker_1_voice: String::new(),
            source_type: SourceType::Text,
            text_content: Some(text.into()),
            document_file: None,
        }
    }

    /// 以上传文档为来源构造请求
    pub fn from_document(
        search_space_id: SearchSpaceId,
        podcast_title: impl Into<String>,
        document: DocumentFile,
    ) -> Self {
        Self {
            search_space_id,
            podcast_title: podcast_title.into(),
            user_prompt: None,
            tts_provider: String::new(),
            speaker_0_voice: String::new(),
            speaker_1_voice: String::new(),
            source_type: SourceType::Document,
            text_content: None,
            document_file: Some(document),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.tts_provider = provider.into();
        self
    }

    pub fn with_voices(mut self, speaker_0: impl Into<String>, speaker_1: impl Into<String>) -> Self {
        self.speaker_0_voice = speaker_0.into();
        self.speaker_1_voice = speaker_1.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    /// 校验请求
    ///
    /// 返回所有违反的字段，而不是遇到第一个就停止。
    pub fn validate(self) -> Result<ValidatedGeneration, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let source = match self.source_type {
            SourceType::Text => {
                if self.document_file.is_some() {
                    violations.push(FieldViolation::new(
                        "document_file",
                        "must not be set when source_type is 'text'",
                    ));
                }
                match self.text_content {
                    Some(text) if !text.trim().is_empty() => Some(PodcastSource::Text(text)),
                    _ => {
                        violations.push(FieldViolation::new(
                            "text_content",
                            "is required when source_type is 'text'",
                        ));
                        None
                    }
                }
            }
            SourceType::Document => {
                if self.text_content.is_some() {
                    violations.push(FieldViolation::new(
                        "text_content",
                        "must not be set when source_type is 'document'",
                    ));
                }
                match self.document_file {
                    Some(file) if !file.is_empty() => Some(PodcastSource::Document(file)),
                    _ => {
                        violations.push(FieldViolation::new(
                            "document_file",
                            "is required when source_type is 'document'",
                        ));
                        None
                    }
                }
            }
        };

        if self.tts_provider.trim().is_empty() {
            violations.push(FieldViolation::new("tts_provider", "must not be empty"));
        }
        if self.speaker_0_voice.trim().is_empty() {
            violations.push(FieldViolation::new("speaker_0_voice", "must not be empty"));
        }
        if self.speaker_1_voice.trim().is_empty() {
            violations.push(FieldViolation::new("speaker_1_voice", "must not be empty"));
        }

        match source {
            Some(source) if violations.is_empty() => {
                let podcast_title = if self.podcast_title.trim().is_empty() {
                    DEFAULT_PODCAST_TITLE.to_string()
                } else {
                    self.podcast_title
                };

                Ok(ValidatedGeneration {
                    search_space_id: self.search_space_id,
                    podcast_title,
                    user_prompt: self.user_prompt.filter(|p| !p.trim().is_empty()),
                    tts_provider: self.tts_provider,
                    speaker_0_voice: self.speaker_0_voice,
                    speaker_1_voice: self.speaker_1_voice,
                    source,
                })
            }
            _ => Err(violations),
        }
    }
}

/// 来源负载，与来源类型一一对应
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodcastSource {
    Text(String),
    Document(DocumentFile),
}

impl PodcastSource {
    pub fn source_type(&self) -> SourceType {
        match self {
            PodcastSource::Text(_) => SourceType::Text,
            PodcastSource::Document(_) => SourceType::Document,
        }
    }
}

/// 校验通过的生成请求
#[derive(Debug, Clone)]
pub struct ValidatedGeneration {
    pub search_space_id: SearchSpaceId,
    pub podcast_title: String,
    /// 为 None 时不发送该字段，由后端使用默认值
    pub user_prompt: Option<String>,
    pub tts_provider: String,
    pub speaker_0_voice: String,
    pub speaker_1_voice: String,
    pub source: PodcastSource,
}
