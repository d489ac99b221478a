use std::path::PathBuf;

use bytes::Bytes;

/// 单次下载的结果。
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadResult {
    /// 已保存到本地文件（最终路径）
    Saved(PathBuf),
    /// 开启 output_bytes 时得到的完整字节
    Bytes(Bytes),
}
