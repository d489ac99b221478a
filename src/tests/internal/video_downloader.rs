//! 下载器测试：本地夹具服务 + 缩短的保持期，走真实时钟。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::{DEFAULT_TRANSFER_FAILURE_MESSAGE, TransferError};
use crate::progress::{TransferPhase, TransferState, TransferTracker};
use crate::tests::{
    FixtureResponse, FixtureServer, fast_estimator_config, init_logger, sample_metadata,
    unique_temp_dir,
};
use crate::video::{DownloadHook, DownloadResult, HookAbort, Video};
use crate::api::FormatSelector;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

async fn video_for(server: &FixtureServer, title: &str) -> Video {
    Video::new(sample_metadata(title), server.api_client())
}

#[tokio::test]
async fn sized_body_to_bytes() {
    init_logger();
    let body = payload(10_000);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body.clone()))]).await;
    let video = video_for(&server, "Sized").await;

    let progress = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&progress);
    let downloader = video
        .build_downloader()
        .format(FormatSelector::AudioOnly)
        .output_bytes()
        .estimator_config(fast_estimator_config())
        .with_on_progress_hook(move |done, total| recorded.lock().unwrap().push((done, total)));
    let tracker = downloader.tracker();

    let result = downloader.send().await.unwrap();
    match result {
        DownloadResult::Bytes(bytes) => assert_eq!(bytes.as_ref(), body.as_slice()),
        other => panic!("应输出字节数组，实际: {other:?}"),
    }

    // send 在完成保持期开始时返回
    let state = tracker.snapshot();
    assert_eq!(state.phase, TransferPhase::Complete);
    assert_eq!(state.percent(), 100);

    let progress = progress.lock().unwrap();
    assert_eq!(progress.last(), Some(&(10_000, Some(10_000))));
    assert!(progress.windows(2).all(|w| w[0].0 < w[1].0));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.path(), "/api/download");
    assert_eq!(request.header("cache-control"), Some("no-cache"));
    let query = request.query();
    assert!(query.contains(&(
        "url".to_string(),
        "https://www.youtube.com/watch?v=abc123".to_string()
    )));
    assert!(query.contains(&("format".to_string(), "audio".to_string())));
}

#[tokio::test]
async fn chunked_body_without_length_still_advances() {
    init_logger();
    let chunks: Vec<Vec<u8>> = (0..8).map(|_| payload(2048)).collect();
    let expected: Vec<u8> = chunks.concat();
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Chunked(chunks))]).await;
    let video = video_for(&server, "Chunked").await;

    let tracker = TransferTracker::new(fast_estimator_config());
    let observed = Arc::new(Mutex::new(Vec::<(Option<u64>, TransferState)>::new()));
    let sink = Arc::clone(&observed);
    let probe = tracker.clone();

    let result = video
        .build_downloader()
        .output_bytes()
        .with_tracker(tracker.clone())
        .with_on_progress_hook(move |_, total| sink.lock().unwrap().push((total, probe.snapshot())))
        .send()
        .await
        .unwrap();

    let DownloadResult::Bytes(bytes) = result else {
        panic!("应输出字节数组");
    };
    assert_eq!(bytes.as_ref(), expected.as_slice());

    let observed = observed.lock().unwrap();
    assert!(!observed.is_empty());
    for (total, state) in observed.iter() {
        assert_eq!(*total, None);
        assert!(state.reported_progress <= 90.0);
    }
    // 第一块之后的观测都处于传输中且没有长度信息
    for (_, state) in observed.iter().skip(1) {
        assert_eq!(state.phase, TransferPhase::Transferring);
        assert!(!state.has_length_info);
    }
    let series: Vec<f64> = observed.iter().map(|(_, s)| s.reported_progress).collect();
    assert!(series.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(tracker.snapshot().phase, TransferPhase::Complete);
}

#[tokio::test]
async fn save_into_directory_uses_title_as_file_name() {
    let body = payload(4096);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body.clone()))]).await;
    let video = video_for(&server, "Hello, World!").await;

    let dir = unique_temp_dir("save_dir");
    tokio::fs::create_dir_all(&dir).await.unwrap();

    let result = video
        .build_downloader()
        .format(FormatSelector::AudioOnly)
        .save_to(&dir)
        .estimator_config(fast_estimator_config())
        .send()
        .await
        .unwrap();

    let expected_path = dir.join("Hello World.mp3");
    assert_eq!(result, DownloadResult::Saved(expected_path.clone()));
    assert_eq!(tokio::fs::read(&expected_path).await.unwrap(), body);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn save_to_file_creates_missing_parents() {
    let body = payload(1500);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body.clone()))]).await;
    let video = video_for(&server, "Nested").await;

    let dir = unique_temp_dir("nested");
    let target = dir.join("a").join("b").join("clip.mp4");

    let result = video
        .build_downloader()
        .save_to(&target)
        .output_bytes()
        .estimator_config(fast_estimator_config())
        .send()
        .await
        .unwrap();

    // 同时开启时返回字节数组，文件也照样写入
    assert_eq!(result, DownloadResult::Bytes(bytes::Bytes::from(body.clone())));
    assert_eq!(tokio::fs::read(&target).await.unwrap(), body);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn truncated_stream_fails_and_removes_partial_file() {
    init_logger();
    let server = FixtureServer::start(vec![(
        "/api/download",
        FixtureResponse::Truncated {
            declared: 50_000,
            sent: payload(1000),
        },
    )])
    .await;
    let video = video_for(&server, "Broken").await;

    let dir = unique_temp_dir("truncated");
    let target = dir.join("broken.mp4");
    let failures = Arc::new(Mutex::new(Vec::new()));

    let downloader = video
        .build_downloader()
        .save_to(&target)
        .estimator_config(fast_estimator_config())
        .with_hook(FailureRecorder(Arc::clone(&failures)));
    let tracker = downloader.tracker();

    let err = downloader.send().await.unwrap_err();
    assert!(matches!(err, TransferError::Stream(_)), "实际错误: {err:?}");

    let state = tracker.snapshot();
    assert_eq!(state.phase, TransferPhase::Failed);
    assert_eq!(state.reported_progress, 0.0);
    assert_eq!(state.failure.as_deref(), Some(DEFAULT_TRANSFER_FAILURE_MESSAGE));
    assert_eq!(
        *failures.lock().unwrap(),
        vec![DEFAULT_TRANSFER_FAILURE_MESSAGE.to_string()]
    );
    assert!(!target.exists());

    // 失败是终态，不会被任何定时器改写
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(tracker.snapshot(), state);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn error_status_is_reported_once() {
    let server = FixtureServer::start(vec![("/api/download", FixtureResponse::Status(500))]).await;
    let video = video_for(&server, "Server Error").await;

    let downloader = video
        .build_downloader()
        .output_bytes()
        .estimator_config(fast_estimator_config());
    let tracker = downloader.tracker();

    let err = downloader.send().await.unwrap_err();
    match err {
        TransferError::Status(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("应为状态码错误，实际: {other:?}"),
    }
    assert_eq!(err_message_of(&tracker), Some(DEFAULT_TRANSFER_FAILURE_MESSAGE.to_string()));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn missing_destination_fails_before_any_request() {
    let server = FixtureServer::start(vec![]).await;
    let video = video_for(&server, "Nowhere").await;

    let downloader = video.build_downloader().save_to("");
    let tracker = downloader.tracker();

    let err = downloader.send().await.unwrap_err();
    assert!(matches!(err, TransferError::NoDestination));
    assert_eq!(tracker.snapshot(), TransferState::idle());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn before_start_abort_skips_the_request() {
    let server = FixtureServer::start(vec![(
        "/api/download",
        FixtureResponse::Sized(payload(100)),
    )])
    .await;
    let video = video_for(&server, "Aborted").await;

    let downloader = video
        .build_downloader()
        .output_bytes()
        .estimator_config(fast_estimator_config())
        .with_before_start_hook(|| async { Err(HookAbort::new("磁盘空间不足")) });
    let tracker = downloader.tracker();

    let err = downloader.send().await.unwrap_err();
    assert!(matches!(err, TransferError::HookAbort(_)));
    assert!(err.to_string().contains("磁盘空间不足"));

    let state = tracker.snapshot();
    assert_eq!(state.phase, TransferPhase::Failed);
    assert_eq!(state.failure, Some(err.to_string()));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn hooks_run_in_order_around_the_transfer() {
    let body = payload(8192);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body))]).await;
    let video = video_for(&server, "Ordered").await;

    let tracker = TransferTracker::new(fast_estimator_config());
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorder = EventRecorder {
        events: Arc::clone(&events),
        tracker: tracker.clone(),
    };

    video
        .build_downloader()
        .output_bytes()
        .with_tracker(tracker.clone())
        .with_hook(recorder)
        .send()
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("before_start:idle"));
    // after_complete 在 100% 保持期之前执行
    assert_eq!(
        events.last().map(String::as_str),
        Some("after_complete:transferring")
    );
    assert!(events.iter().any(|e| e == "chunk"));
    assert!(events.iter().any(|e| e.starts_with("progress:")));
    assert!(!events.iter().any(|e| e.starts_with("failed")));
}

#[tokio::test]
async fn closure_hooks_see_chunks_then_completion() {
    let body = payload(12_000);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body.clone()))]).await;
    let video = video_for(&server, "Closures").await;

    let tracker = TransferTracker::new(fast_estimator_config());
    let events = Arc::new(Mutex::new(Vec::<String>::new()));
    let received = Arc::new(Mutex::new(Vec::<u8>::new()));

    let chunk_sink = Arc::clone(&received);
    let chunk_events = Arc::clone(&events);
    let complete_events = Arc::clone(&events);
    let probe = tracker.clone();

    let downloader = video
        .build_downloader()
        .output_bytes()
        .with_tracker(tracker.clone())
        .with_on_chunk_hook(move |chunk| {
            chunk_sink.lock().unwrap().extend_from_slice(chunk);
            chunk_events.lock().unwrap().push("chunk".to_string());
        })
        .with_after_complete_hook(move || {
            let events = Arc::clone(&complete_events);
            let phase = probe.snapshot().phase;
            async move {
                events.lock().unwrap().push(format!("after_complete:{phase}"));
            }
        })
        .with_on_failed_hook(|message| panic!("不应失败: {message}"));
    assert_eq!(downloader.video().title, "Closures");

    downloader.send().await.unwrap();

    assert_eq!(*received.lock().unwrap(), body);
    let events = events.lock().unwrap();
    assert!(events.len() >= 2);
    assert!(events[..events.len() - 1].iter().all(|e| e == "chunk"));
    assert_eq!(
        events.last().map(String::as_str),
        Some("after_complete:transferring")
    );
    assert_eq!(tracker.snapshot().phase, TransferPhase::Complete);
}

#[tokio::test]
async fn failed_closure_hook_receives_user_message() {
    let server = FixtureServer::start(vec![("/api/download", FixtureResponse::Status(502))]).await;
    let video = video_for(&server, "Gateway").await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let completed = Arc::new(Mutex::new(false));
    let completed_flag = Arc::clone(&completed);

    let downloader = video
        .build_downloader()
        .output_bytes()
        .estimator_config(fast_estimator_config())
        .with_on_failed_hook(move |message| sink.lock().unwrap().push(message.to_string()))
        .with_after_complete_hook(move || {
            let flag = Arc::clone(&completed_flag);
            async move { *flag.lock().unwrap() = true }
        });
    let tracker = downloader.tracker();

    downloader.send().await.unwrap_err();

    assert_eq!(
        *messages.lock().unwrap(),
        vec![DEFAULT_TRANSFER_FAILURE_MESSAGE.to_string()]
    );
    assert!(!*completed.lock().unwrap());
    assert_eq!(
        tracker.snapshot().failure.as_deref(),
        Some(DEFAULT_TRANSFER_FAILURE_MESSAGE)
    );
}

#[tokio::test]
async fn trailing_separator_names_a_directory_to_create() {
    let body = payload(2048);
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(body.clone()))]).await;
    let video = video_for(&server, "Fresh Dir").await;

    let dir = unique_temp_dir("trailing");
    let missing = dir.join("downloads");
    let target = format!("{}{}", missing.display(), std::path::MAIN_SEPARATOR);
    assert!(!missing.exists());

    let result = video
        .build_downloader()
        .save_to(&target)
        .estimator_config(fast_estimator_config())
        .send()
        .await
        .unwrap();

    let expected = missing.join("Fresh Dir.mp4");
    assert_eq!(result, DownloadResult::Saved(expected.clone()));
    assert!(missing.is_dir());
    assert_eq!(tokio::fs::read(&expected).await.unwrap(), body);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn returns_to_idle_after_complete_hold() {
    let server =
        FixtureServer::start(vec![("/api/download", FixtureResponse::Sized(payload(512)))]).await;
    let video = video_for(&server, "Idle Again").await;

    let downloader = video
        .build_downloader()
        .output_bytes()
        .estimator_config(fast_estimator_config());
    let tracker = downloader.tracker();

    downloader.send().await.unwrap();
    assert_eq!(tracker.snapshot().phase, TransferPhase::Complete);

    let mut watcher = tracker.watch();
    let state = tokio::time::timeout(
        Duration::from_secs(2),
        watcher.wait_until(|s| s.phase == TransferPhase::Idle),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(state, TransferState::idle());
}

fn err_message_of(tracker: &TransferTracker) -> Option<String> {
    let state = tracker.snapshot();
    assert_eq!(state.phase, TransferPhase::Failed);
    state.failure
}

struct FailureRecorder(Arc<Mutex<Vec<String>>>);

#[async_trait]
impl DownloadHook for FailureRecorder {
    fn on_failed(&mut self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

struct EventRecorder {
    events: Arc<Mutex<Vec<String>>>,
    tracker: TransferTracker,
}

impl EventRecorder {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl DownloadHook for EventRecorder {
    async fn before_start(&mut self) -> Result<(), HookAbort> {
        self.push(format!("before_start:{}", self.tracker.snapshot().phase));
        Ok(())
    }

    fn on_chunk(&mut self, _chunk: &[u8]) {
        self.push("chunk".to_string());
    }

    fn on_progress(&mut self, bytes_done: u64, total: Option<u64>) {
        self.push(format!("progress:{bytes_done}/{total:?}"));
    }

    async fn after_complete(&mut self) {
        self.push(format!("after_complete:{}", self.tracker.snapshot().phase));
    }

    fn on_failed(&mut self, message: &str) {
        self.push(format!("failed:{message}"));
    }
}
