use reqwest::Response;
use reqwest::header::{CACHE_CONTROL, HeaderValue};

use crate::internal::api::enums::{ApiEndpoint, FormatSelector};
use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::errors::TransferError;

/// 请求二进制下载：`GET {base}api/download?url=..&format=..`
///
/// 只等到响应头，返回的 [`Response`] 由调用方以流的方式读取；
/// 下载可能很大，这里不设整体超时。
pub(crate) async fn open_download_stream(
    api: &ApiClient,
    source_url: &str,
    format: FormatSelector,
) -> Result<Response, TransferError> {
    let mut endpoint = api
        .endpoint(ApiEndpoint::Download)
        .map_err(TransferError::Endpoint)?;
    endpoint
        .query_pairs_mut()
        .append_pair("url", source_url)
        .append_pair("format", format.as_str());

    let res = api
        .client
        .get(endpoint)
        .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
        .send()
        .await
        .map_err(TransferError::Request)?;

    let status = res.status();
    if !status.is_success() {
        return Err(TransferError::Status(status));
    }

    Ok(res)
}
