pub mod download_config;
pub mod download_hooks_container;
pub mod download_result;
pub(crate) mod hook_adapters;
pub mod video_downloader;

pub use download_config::DownloadConfig;
pub use download_hooks_container::DownloadHooksContainer;
pub use download_result::DownloadResult;
pub use video_downloader::VideoDownloader;
