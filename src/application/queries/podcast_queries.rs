//! Podcast Queries

use std::path::PathBuf;

use crate::domain::podcast::{PodcastId, SearchSpaceId};

/// 列出播客
#[derive(Debug, Clone, Default)]
pub struct ListPodcasts {
    pub search_space_id: Option<SearchSpaceId>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// 获取单个播客
#[derive(Debug, Clone)]
pub struct GetPodcast {
    pub podcast_id: PodcastId,
}

/// 下载播客音频到本地文件
#[derive(Debug, Clone)]
pub struct DownloadPodcastAudio {
    pub podcast_id: PodcastId,
    pub destination: PathBuf,
}
