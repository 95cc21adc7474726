//! Podcast Commands - 播客相关命令

use crate::domain::podcast::{GenerationRequest, PodcastId};

/// 提交播客生成任务命令
#[derive(Debug, Clone)]
pub struct GeneratePodcast {
    pub request: GenerationRequest,
}

/// 删除播客命令
#[derive(Debug, Clone)]
pub struct DeletePodcast {
    pub podcast_id: PodcastId,
}
