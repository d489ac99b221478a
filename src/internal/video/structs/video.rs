use std::sync::Arc;

use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::video::downloader::structs::VideoDownloader;

use super::video_metadata::VideoMetadata;

/// 已查询到元数据的视频，可由它创建专属下载器
#[derive(Debug, Clone)]
pub struct Video {
    pub data: Arc<VideoMetadata>,
    pub api: ApiClient,
}

impl Video {
    pub fn new(data: VideoMetadata, api: ApiClient) -> Self {
        Self {
            data: Arc::new(data),
            api,
        }
    }

    /// 创建专属于本视频的下载器；链式配置后调用 [`VideoDownloader::send`] 执行下载。
    pub fn build_downloader(&self) -> VideoDownloader {
        VideoDownloader::new(Arc::clone(&self.data), self.api.clone())
    }
}
