//! 流式下载：整段 GET，边收边写，并把字节进度喂给追踪器。

use std::path::{Path, PathBuf};

use bytes::BytesMut;
use futures_util::StreamExt;
use log::{info, warn};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::internal::api::enums::FormatSelector;
use crate::internal::api::functions::open_download_stream::open_download_stream;
use crate::internal::api::structs::api_client::ApiClient;
use crate::internal::errors::TransferError;
use crate::internal::progress::structs::TransferTracker;
use crate::internal::video::downloader::structs::{
    DownloadConfig, DownloadHooksContainer, DownloadResult,
};
use crate::internal::video::structs::video_metadata::VideoMetadata;

use super::VideoDownloader;

/// 预分配内存的上限，防止服务端报出离谱的 Content-Length
const MAX_PREALLOCATE_BYTES: u64 = 64 * 1024 * 1024;

pub(super) async fn run_stream_download(
    downloader: VideoDownloader,
) -> Result<DownloadResult, TransferError> {
    let VideoDownloader {
        api,
        video,
        config,
        mut hooks,
        tracker,
    } = downloader;

    if config.save_path.is_none() && !config.is_output_bytes {
        return Err(TransferError::NoDestination);
    }

    if let Err(abort) = hooks.run_before_start().await {
        let err = TransferError::from(abort);
        let message = err.user_message();
        tracker.fail(message.as_str());
        hooks.run_on_failed(&message);
        return Err(err);
    }

    info!("开始下载「{}」（{}）", video.title, config.format);
    tracker.start();

    // 已创建的文件路径，失败时删除
    let mut partial: Option<PathBuf> = None;
    let outcome = transfer(&api, &video, &config, &mut hooks, &tracker, &mut partial).await;

    match outcome {
        Ok(result) => {
            hooks.run_after_complete().await;
            tracker.finish().await;
            info!("下载完成「{}」", video.title);
            Ok(result)
        }
        Err(err) => {
            let message = err.user_message();
            warn!("下载「{}」失败: {}", video.title, err);
            tracker.fail(message.as_str());
            hooks.run_on_failed(&message);

            if let Some(path) = partial {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    warn!("删除未完成文件 {} 失败: {}", path.display(), e);
                }
            }
            Err(err)
        }
    }
}

async fn transfer(
    api: &ApiClient,
    video: &VideoMetadata,
    config: &DownloadConfig,
    hooks: &mut DownloadHooksContainer,
    tracker: &TransferTracker,
    partial: &mut Option<PathBuf>,
) -> Result<DownloadResult, TransferError> {
    let resp = open_download_stream(api, &video.source_url, config.format).await?;
    let total = resp.content_length();

    let mut file = match config.save_path.as_deref() {
        Some(p) => {
            let path = resolve_save_path(p, video, config.format).await?;
            let f = File::create(&path)
                .await
                .map_err(TransferError::CreateFile)?;
            *partial = Some(path.clone());
            Some((f, path))
        }
        None => None,
    };

    let mut out_bytes = config.is_output_bytes.then(|| {
        let capacity = total.unwrap_or(0).min(MAX_PREALLOCATE_BYTES) as usize;
        BytesMut::with_capacity(capacity)
    });

    let mut stream = resp.bytes_stream();
    let mut bytes_done: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(TransferError::Stream)?;
        bytes_done += chunk.len() as u64;

        if let Some((f, _)) = file.as_mut() {
            f.write_all(&chunk).await.map_err(TransferError::WriteFile)?;
        }
        if let Some(buf) = out_bytes.as_mut() {
            buf.extend_from_slice(&chunk);
        }

        hooks.run_on_chunk(&chunk);
        hooks.run_on_progress(bytes_done, total);
        tracker.progress(bytes_done, total);
    }

    let saved_path = match file {
        Some((mut f, path)) => {
            f.flush().await.map_err(TransferError::WriteFile)?;
            Some(path)
        }
        None => None,
    };

    match (out_bytes, saved_path) {
        (Some(buf), _) => Ok(DownloadResult::Bytes(buf.freeze())),
        (None, Some(path)) => Ok(DownloadResult::Saved(path)),
        (None, None) => Err(TransferError::NoDestination),
    }
}

/// 已存在的目录、或以分隔符结尾的路径，拼上由标题生成的文件名；缺失的父目录会被创建。
async fn resolve_save_path(
    path: &Path,
    video: &VideoMetadata,
    format: FormatSelector,
) -> Result<PathBuf, TransferError> {
    let names_dir = path
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);
    let is_dir = names_dir
        || tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

    let target = if is_dir {
        path.join(video.file_name(format))
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(TransferError::CreateFile)?;
        }
    }

    Ok(target)
}
