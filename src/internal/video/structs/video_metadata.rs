use serde::{Deserialize, Serialize};

use crate::internal::api::enums::FormatSelector;

/// 标题清洗后为空时使用的文件名
const FALLBACK_FILE_STEM: &str = "video";

/// 远程服务返回的视频信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    /// 已格式化的时长，如 "3:45"
    #[serde(rename = "duration")]
    pub duration_label: String,
    #[serde(rename = "author")]
    pub author_name: String,
    /// 规范化后的视频地址，下载时原样传回服务端
    #[serde(rename = "url")]
    pub source_url: String,
}

impl VideoMetadata {
    /// 保存用的文件名：标题只保留 ASCII 字母数字、下划线、空白和 `-`，再加上格式对应的扩展名。
    pub fn file_name(&self, format: FormatSelector) -> String {
        let cleaned: String = self
            .title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .collect();
        let stem = match cleaned.trim() {
            "" => FALLBACK_FILE_STEM,
            stem => stem,
        };
        format!("{}.{}", stem, format.extension())
    }
}
