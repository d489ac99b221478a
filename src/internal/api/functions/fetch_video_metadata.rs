use log::warn;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::internal::api::enums::ApiEndpoint;
use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::errors::MetadataFetchError;
use crate::internal::video::structs::video_metadata::VideoMetadata;

#[derive(Serialize)]
struct VideoInfoRequest<'a> {
    url: &'a str,
}

/// 服务端出错时的响应体，只关心 `message`
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// 查询视频信息：`POST {base}api/video-info`，请求体 `{"url": ...}`
pub(crate) async fn fetch_video_metadata(
    api: &ApiClient,
    video_url: &str,
) -> Result<VideoMetadata, MetadataFetchError> {
    let endpoint = api
        .endpoint(ApiEndpoint::VideoInfo)
        .map_err(MetadataFetchError::Endpoint)?;

    let mut request = api
        .client
        .post(endpoint)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .json(&VideoInfoRequest { url: video_url });
    if let Some(timeout) = api.config.metadata_timeout {
        request = request.timeout(timeout);
    }

    let res = request.send().await.map_err(MetadataFetchError::Request)?;
    let status = res.status();

    if !status.is_success() {
        // 响应体不是 JSON 也没关系，只是拿不到原因
        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        warn!("查询视频信息失败 {status}: {message:?}");
        return Err(MetadataFetchError::Rejected { status, message });
    }

    res.json::<VideoMetadata>()
        .await
        .map_err(MetadataFetchError::Decode)
}
