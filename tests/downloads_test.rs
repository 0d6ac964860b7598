//! Integration tests for the download coordinator using mock dependencies.
//!
//! These drive `handle_selection` end-to-end: status message, progress
//! edits, delivery, cleanup; everything except the real Telegram API and
//! the real yt-dlp binary.

mod mocks;

use std::sync::Arc;
use teloxide::types::ChatId;
use tempfile::TempDir;
use url::Url;

use mocks::{MockEngine, RecordingNotifier, SinkEvent};
use vidgrab::core::features::FeatureAvailability;
use vidgrab::download::engine::ProgressSample;
use vidgrab::download::options::DownloadProfile;
use vidgrab::telegram::downloads::{handle_selection, COMPLETED_MESSAGE, STARTING_MESSAGE};
use vidgrab::telegram::HandlerDeps;

fn test_url() -> Url {
    Url::parse("https://example.com/watch?v=abc").unwrap()
}

fn deps_with(engine: Arc<MockEngine>, notifier: Arc<RecordingNotifier>, ffmpeg: bool, dir: &TempDir) -> HandlerDeps {
    HandlerDeps::new(
        engine,
        notifier,
        FeatureAvailability::with_ffmpeg(ffmpeg),
        dir.path().to_path_buf(),
    )
}

#[tokio::test]
async fn test_video_download_delivers_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(
        MockEngine::new("my-title", dir.path()).with_samples(vec![
            ProgressSample::downloading(42.5, Some("1.24MiB/s".to_string()), Some("00:35".to_string())),
            ProgressSample::finished(),
        ]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    handle_selection(deps, ChatId(1), DownloadProfile::VideoLow, test_url()).await;

    assert_eq!(engine.call_count(), 1);

    let events = notifier.events();
    assert_eq!(
        events.first(),
        Some(&SinkEvent::Message {
            chat: 1,
            text: STARTING_MESSAGE.to_string()
        })
    );

    let expected_path = dir.path().join("my-title.mp4");
    assert!(events.contains(&SinkEvent::Video {
        chat: 1,
        path: expected_path.clone()
    }));

    let edits = notifier.edits(1);
    assert!(
        edits.iter().any(|t| t.contains("Скачивание:") && t.contains("42.5%")),
        "expected a progress edit, got {:?}",
        edits
    );
    assert_eq!(edits.last().map(String::as_str), Some(COMPLETED_MESSAGE));

    // The artifact never outlives the request.
    assert!(!expected_path.exists());
}

#[tokio::test]
async fn test_audio_download_delivers_mp3() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()));
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    handle_selection(deps, ChatId(2), DownloadProfile::AudioOnly, test_url()).await;

    let expected_path = dir.path().join("my-title.mp3");
    assert!(notifier.events().contains(&SinkEvent::Audio {
        chat: 2,
        path: expected_path.clone()
    }));
    assert!(!expected_path.exists());
}

#[tokio::test]
async fn test_audio_without_ffmpeg_never_reaches_engine() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()));
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), false, &dir);

    handle_selection(deps, ChatId(3), DownloadProfile::AudioOnly, test_url()).await;

    assert_eq!(engine.call_count(), 0);

    let error_edits: Vec<_> = notifier
        .edits(3)
        .into_iter()
        .filter(|t| t.contains("Произошла ошибка при скачивании"))
        .collect();
    assert_eq!(error_edits.len(), 1, "exactly one error message");

    let events = notifier.events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, SinkEvent::Video { .. } | SinkEvent::Audio { .. })));
}

#[tokio::test]
async fn test_missing_artifact_reports_error_without_delivery() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()).without_artifact());
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    handle_selection(deps, ChatId(4), DownloadProfile::VideoHigh, test_url()).await;

    let edits = notifier.edits(4);
    assert!(edits.iter().any(|t| t.contains("Произошла ошибка при скачивании")));

    let events = notifier.events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, SinkEvent::Video { .. } | SinkEvent::Audio { .. })));
}

#[tokio::test]
async fn test_empty_artifact_is_removed_and_reported() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()).with_artifact(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    handle_selection(deps, ChatId(5), DownloadProfile::VideoHigh, test_url()).await;

    let edits = notifier.edits(5);
    assert!(edits.iter().any(|t| t.contains("Произошла ошибка при скачивании")));
    assert!(!dir.path().join("my-title.mp4").exists());
}

#[tokio::test]
async fn test_failed_delivery_reports_error_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()));
    let notifier = Arc::new(RecordingNotifier::failing_delivery());
    let deps = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    handle_selection(deps, ChatId(6), DownloadProfile::VideoHigh, test_url()).await;

    let edits = notifier.edits(6);
    assert!(edits.iter().any(|t| t.contains("Произошла ошибка при скачивании")));
    assert!(!edits.iter().any(|t| t == COMPLETED_MESSAGE));

    // Cleanup happens even when delivery fails.
    assert!(!dir.path().join("my-title.mp4").exists());
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(MockEngine::new("my-title", dir.path()));
    let notifier = Arc::new(RecordingNotifier::new());

    let deps_a = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);
    let deps_b = deps_with(Arc::clone(&engine), Arc::clone(&notifier), true, &dir);

    // Different profiles from different chats, same source.
    tokio::join!(
        handle_selection(deps_a, ChatId(10), DownloadProfile::VideoLow, test_url()),
        handle_selection(deps_b, ChatId(11), DownloadProfile::AudioOnly, test_url()),
    );

    assert_eq!(engine.call_count(), 2);

    let events = notifier.events();
    assert!(events.contains(&SinkEvent::Video {
        chat: 10,
        path: dir.path().join("my-title.mp4")
    }));
    assert!(events.contains(&SinkEvent::Audio {
        chat: 11,
        path: dir.path().join("my-title.mp3")
    }));

    assert_eq!(notifier.edits(10).last().map(String::as_str), Some(COMPLETED_MESSAGE));
    assert_eq!(notifier.edits(11).last().map(String::as_str), Some(COMPLETED_MESSAGE));

    assert!(!dir.path().join("my-title.mp4").exists());
    assert!(!dir.path().join("my-title.mp3").exists());
}
