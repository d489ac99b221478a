use log::debug;
use url::Url;

use crate::internal::api::functions::fetch_video_metadata::fetch_video_metadata;
use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::errors::{InputValidationError, VideoError};
use crate::internal::video::structs::video::Video;

/// 校验用户输入的视频链接：去掉首尾空白后不能为空，且必须是 http/https 地址。
///
/// 返回去掉空白后的链接，原样交给服务端（不做规范化）。
pub fn validate_video_url(input: &str) -> Result<&str, InputValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputValidationError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed)?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(InputValidationError::UnsupportedScheme(other.to_string())),
    }
}

/// 本库主入口：提交视频链接，查询远程元数据，转换成可下载的 [`Video`]。
///
/// example:
/// ```rust,no_run
/// use video_grab::api::ApiClient;
/// use video_grab::submit_video_url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = ApiClient::from_base_url("http://localhost:5000/")?;
/// let video = submit_video_url(&api, "https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
/// println!("{} - {}", video.data.title, video.data.author_name);
/// # Ok(())
/// # }
/// ```
pub async fn submit_video_url(api: &ApiClient, input: &str) -> Result<Video, VideoError> {
    let video_url = validate_video_url(input)?;
    debug!("查询视频信息: {video_url}");

    let metadata = fetch_video_metadata(api, video_url).await?;
    Ok(Video::new(metadata, api.clone()))
}
