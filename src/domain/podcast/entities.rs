//! Podcast Context - Entities
//!
//! 由外部任务处理器生成的播客产物，本模块只负责读取。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::value_objects::{PodcastId, SearchSpaceId};

/// 逐字稿条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 说话人序号（0 = 主持人，1 = 嘉宾）
    pub speaker_id: u32,
    pub dialog: String,
}

/// 播客摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastSummary {
    pub id: PodcastId,
    pub title: String,
    pub podcast_transcript: Option<Vec<TranscriptEntry>>,
    pub file_location: Option<String>,
    pub search_space_id: SearchSpaceId,
    #[serde(default)]
    pub tts_provider: Option<String>,
    #[serde(default)]
    pub tts_voices: Option<HashMap<String, String>>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PodcastSummary {
    /// 逐字稿条目数
    pub fn transcript_len(&self) -> usize {
        self.podcast_transcript.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// 下载时使用的文件名
    pub fn download_file_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        let stem = stem.trim();
        if stem.is_empty() {
            format!("podcast-{}.mp3", self.id)
        } else {
            format!("{}.mp3", stem)
        }
    }
}

/// 解析时间戳：RFC 3339，或不带时区的 ISO-8601（按 UTC 处理）
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        None => Ok(None),
    }
}
