//! 视频领域模块：远程返回的元数据，以及由视频创建的下载器。

pub mod downloader;
pub mod structs;
