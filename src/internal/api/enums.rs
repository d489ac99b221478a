use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 下载格式选择，服务端据此决定输出的容器与编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatSelector {
    /// 最高画质（1080p）
    #[default]
    #[serde(rename = "highest")]
    HighestQuality,
    /// 最低画质（480p）
    #[serde(rename = "lowest")]
    LowestQuality,
    /// 仅音频（MP3）
    #[serde(rename = "audio")]
    AudioOnly,
}

impl FormatSelector {
    pub const ALL: [FormatSelector; 3] = [
        FormatSelector::HighestQuality,
        FormatSelector::LowestQuality,
        FormatSelector::AudioOnly,
    ];

    /// 查询参数 `format` 的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatSelector::HighestQuality => "highest",
            FormatSelector::LowestQuality => "lowest",
            FormatSelector::AudioOnly => "audio",
        }
    }

    /// 保存文件时使用的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            FormatSelector::AudioOnly => "mp3",
            _ => "mp4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormatSelector::HighestQuality => "HD Quality (1080p)",
            FormatSelector::LowestQuality => "SD Quality (480p)",
            FormatSelector::AudioOnly => "Audio Only (MP3)",
        }
    }
}

impl std::fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest" | "highest-quality" => Ok(FormatSelector::HighestQuality),
            "lowest" | "lowest-quality" => Ok(FormatSelector::LowestQuality),
            "audio" | "audio-only" => Ok(FormatSelector::AudioOnly),
            other => Err(format!("未知的下载格式: {other}")),
        }
    }
}

/// 远程服务暴露的接口
pub enum ApiEndpoint {
    VideoInfo,
    Download,
}

impl ApiEndpoint {
    /// 相对 base_url 的路径，不以 "/" 开头
    pub fn path(&self) -> &'static str {
        match self {
            ApiEndpoint::VideoInfo => "api/video-info",
            ApiEndpoint::Download => "api/download",
        }
    }
}
