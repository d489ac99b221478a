use std::path::PathBuf;

use crate::internal::api::enums::FormatSelector;

/// 本次下载的配置。
#[derive(Debug, Clone, Default)]
pub struct DownloadConfig {
    pub format: FormatSelector,
    /// 文件或目录；目录时按视频标题生成文件名
    pub save_path: Option<PathBuf>,
    /// 是否输出字节数组
    pub is_output_bytes: bool,
}
