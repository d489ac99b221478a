//! 视频下载器
//!
//! 从远程服务以流的方式拉取视频，边写边把字节进度交给 [`TransferTracker`]，
//! 由追踪器折算成平滑的百分比供界面显示。
//!
//! ## 功能特性
//!
//! - **格式选择**：最高画质 / 最低画质 / 仅音频
//! - **灵活输出**：保存到本地文件（可给目录，按标题生成文件名）或输出字节数组
//! - **平滑进度**：`tracker()` 返回可监听的 [`TransferState`](crate::progress::TransferState)，
//!   响应没有 Content-Length 时同样能持续前进
//! - **钩子机制**：开始前、每块数据、原始进度、完成后、失败后
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use video_grab::video::Video;
//! # use video_grab::api::FormatSelector;
//! # async fn example(video: Video) -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = video
//!     .build_downloader()
//!     .format(FormatSelector::AudioOnly)
//!     .save_to("./downloads/");
//!
//! let mut watcher = downloader.tracker().watch();
//! tokio::spawn(async move {
//!     while let Ok(state) = watcher.changed().await {
//!         println!("{} {}%", state.phase, state.percent());
//!     }
//! });
//!
//! let result = downloader.send().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 失败处理
//!
//! 传输开始后的任何错误都只上报一次：追踪器进入 `Failed`、进度归零，
//! 已写了一半的文件会被删除，不做重试也不做续传。

mod stream_download;

use std::path::Path;
use std::sync::Arc;

use crate::internal::api::enums::FormatSelector;
use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::errors::TransferError;
use crate::internal::progress::structs::{EstimatorConfig, TransferTracker};
use crate::internal::video::downloader::traits::download::{DownloadHook, HookAbort};
use crate::internal::video::structs::video_metadata::VideoMetadata;

use super::download_config::DownloadConfig;
use super::download_hooks_container::DownloadHooksContainer;
use super::download_result::DownloadResult;
use super::hook_adapters::{
    AfterCompleteHookAdapter, BeforeStartHookAdapter, OnChunkHookAdapter, OnFailedHookAdapter,
    OnProgressHookAdapter,
};
use stream_download::run_stream_download;

/// 视频下载器，一次 `send` 对应一次传输，不实现 Clone。
#[derive(Debug)]
pub struct VideoDownloader {
    pub(crate) api: ApiClient,
    pub(crate) video: Arc<VideoMetadata>,
    pub(crate) config: DownloadConfig,
    pub(crate) hooks: DownloadHooksContainer,
    pub(crate) tracker: TransferTracker,
}

impl VideoDownloader {
    pub fn new(video: Arc<VideoMetadata>, api: ApiClient) -> Self {
        Self {
            api,
            video,
            config: DownloadConfig::default(),
            hooks: DownloadHooksContainer::default(),
            tracker: TransferTracker::default(),
        }
    }

    pub fn format(mut self, format: FormatSelector) -> Self {
        self.config.format = format;
        self
    }

    /// 设置保存路径；传已存在的目录或以分隔符结尾的路径（如 `"./downloads/"`）时，
    /// 文件名由视频标题生成。传空路径表示不保存到文件。
    pub fn save_to(mut self, path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        self.config.save_path = if p.as_os_str().is_empty() {
            None
        } else {
            Some(p.to_path_buf())
        };
        self
    }

    /// 保存到系统的下载目录；取不到时保持原配置，`send` 会因无输出目标而报错。
    pub fn save_to_download_dir(mut self) -> Self {
        if let Some(dir) = dirs::download_dir() {
            self.config.save_path = Some(dir);
        }
        self
    }

    /// 设置为输出字节数组，默认不输出。
    pub fn output_bytes(mut self) -> Self {
        self.config.is_output_bytes = true;
        self
    }

    /// 使用自定义调参创建新的追踪器；之前通过 `tracker()` 拿到的句柄不再更新。
    pub fn estimator_config(mut self, config: EstimatorConfig) -> Self {
        self.tracker = TransferTracker::new(config);
        self
    }

    /// 使用外部的追踪器，例如界面上已经绑定好的那一个。
    pub fn with_tracker(mut self, tracker: TransferTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// 注册「开始前」钩子；闭包返回 `Err(HookAbort)` 会中止本次下载。
    pub fn with_before_start_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.hooks.add(BeforeStartHookAdapter(f));
        self
    }

    pub fn with_on_chunk_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[u8]) + Send + Sync + 'static,
    {
        self.hooks.add(OnChunkHookAdapter(f));
        self
    }

    /// 注册「进度」钩子；参数为已下载字节数、总大小（可能未知为 `None`）。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.hooks.add(OnProgressHookAdapter(f));
        self
    }

    pub fn with_after_complete_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.hooks.add(AfterCompleteHookAdapter(f));
        self
    }

    /// 注册「失败后」钩子；参数是给用户看的提示，与追踪器 `failure` 字段一致。
    pub fn with_on_failed_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + Send + Sync + 'static,
    {
        self.hooks.add(OnFailedHookAdapter(f));
        self
    }

    /// 添加完整钩子，可链式多次调用。
    pub fn with_hook(mut self, hook: impl DownloadHook + 'static) -> Self {
        self.hooks.add(hook);
        self
    }

    /// 本次下载的进度追踪器（共享句柄）。
    pub fn tracker(&self) -> TransferTracker {
        self.tracker.clone()
    }

    pub fn video(&self) -> &VideoMetadata {
        &self.video
    }

    /// 执行下载。成功时在 100% 保持期结束后才返回结果。
    pub async fn send(self) -> Result<DownloadResult, TransferError> {
        run_stream_download(self).await
    }
}
