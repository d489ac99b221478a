//! 下载器领域模块：专属于某个视频的下载器，由 [`Video`](crate::video::Video) 创建并执行下载。
//!
//! 使用方式：`video.build_downloader().format(fmt).save_to(path).with_hook(hook).send().await`
//! 对外导出以 [`crate::video`] 为准，此处仅做模块划分。

pub mod structs;
pub mod traits;
