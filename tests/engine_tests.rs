//! Clip extractor behavior against a scripted transcoder

mod common;

use std::sync::Arc;

use clipper_batch::adapters::FsLocalAdapter;
use clipper_batch::app::CancelFlag;
use clipper_batch::domain::model::*;
use clipper_batch::engine::{ClipExtractor, EngineConfig};
use clipper_batch::output::OverwritePolicy;
use clipper_batch::ports::ToolRun;
use clipper_batch::DomainError;
use tempfile::TempDir;

use common::*;

fn extractor(transcoder: Arc<FakeTranscoder>, config: EngineConfig) -> ClipExtractor {
    ClipExtractor::new(transcoder, Arc::new(FsLocalAdapter::new()), config)
}

fn source() -> ResolvedSource {
    ResolvedSource::resolved("https://youtu.be/abc", vec!["https://cdn.example/v.mp4".to_string()])
        .unwrap()
}

#[tokio::test]
async fn test_stream_copy_success_stops_chain() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("intro.mp4");
    let transcoder = Arc::new(FakeTranscoder::succeeding());
    let request = ClipRequest::new(1, "00:01:30", Some("intro")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), EngineConfig::default())
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::Success);
    assert_eq!(outcome.strategy_used, Some(ExtractionStrategy::StreamCopy));
    assert_eq!(outcome.attempts.len(), 1);

    let calls = transcoder.calls();
    assert_eq!(calls.len(), 1);
    assert!(is_stream_copy(&calls[0]));
    assert_eq!(arg_after(&calls[0], "-ss"), Some("90"));
    assert_eq!(arg_after(&calls[0], "-t"), Some("10"));
    assert_eq!(arg_after(&calls[0], "-i"), Some("https://cdn.example/v.mp4"));
    assert!(calls[0].contains(&"-y".to_string()));
}

#[tokio::test]
async fn test_falls_back_to_reencode() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("intro.mp4");
    let transcoder = Arc::new(FakeTranscoder::copy_fails());
    let request = ClipRequest::new(1, "45", Some("intro")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), EngineConfig::default())
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::Success);
    assert_eq!(outcome.strategy_used, Some(ExtractionStrategy::ReEncode));
    assert_eq!(outcome.attempts.len(), 2);
    assert!(!outcome.attempts[0].success);
    assert!(outcome.attempts[0].diagnostics.contains("Non-monotonous"));

    let calls = transcoder.calls();
    assert_eq!(arg_after(&calls[1], "-c:v"), Some("libx264"));
    assert_eq!(arg_after(&calls[1], "-c:a"), Some("aac"));
    assert!(output.exists());
}

#[tokio::test]
async fn test_both_strategies_fail_removes_partial_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("broken.mp4");
    let transcoder = Arc::new(FakeTranscoder::new(|_| ToolRun::failed(1, "Invalid data found")));
    let request = ClipRequest::new(3, "10", Some("broken")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), EngineConfig::default())
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::ExtractionFailed);
    assert_eq!(outcome.strategy_used, None);
    assert_eq!(outcome.attempts.len(), 2);
    assert!(outcome.note.unwrap().contains("re-encode"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_transcoder_is_error() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("x.mp4");
    let request = ClipRequest::new(1, "10", None).unwrap();

    let result = extractor(Arc::new(FakeTranscoder::missing()), EngineConfig::default())
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await;

    assert!(matches!(result, Err(DomainError::ToolUnavailable { .. })));
}

#[tokio::test]
async fn test_overwrite_never_keeps_existing_file() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("kept.mp4");
    std::fs::write(&output, b"original").unwrap();
    let transcoder = Arc::new(FakeTranscoder::succeeding());
    let config = EngineConfig {
        overwrite: OverwritePolicy::Never,
        ..EngineConfig::default()
    };
    let request = ClipRequest::new(1, "10", Some("kept")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), config)
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::ExtractionFailed);
    assert!(outcome.note.unwrap().contains("already exists"));
    assert!(transcoder.calls().is_empty());
    assert_eq!(std::fs::read(&output).unwrap(), b"original");
}

#[tokio::test]
async fn test_overwrite_never_passes_no_clobber_flag() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("fresh.mp4");
    let transcoder = Arc::new(FakeTranscoder::succeeding());
    let config = EngineConfig {
        overwrite: OverwritePolicy::Never,
        clip_duration: 25,
        ..EngineConfig::default()
    };
    let request = ClipRequest::new(1, "10", Some("fresh")).unwrap();

    extractor(Arc::clone(&transcoder), config)
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    let calls = transcoder.calls();
    assert!(calls[0].contains(&"-n".to_string()));
    assert_eq!(arg_after(&calls[0], "-t"), Some("25"));
}

#[tokio::test]
async fn test_no_clobber_fallback_replaces_partial_copy_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("intro.mp4");
    let transcoder = Arc::new(FakeTranscoder::copy_fails().refusing_existing_output());
    let config = EngineConfig {
        overwrite: OverwritePolicy::Never,
        ..EngineConfig::default()
    };
    let request = ClipRequest::new(1, "10", Some("intro")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), config)
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::Success);
    assert_eq!(outcome.strategy_used, Some(ExtractionStrategy::ReEncode));
    let calls = transcoder.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].contains(&"-n".to_string()));
    assert!(output.exists());
}

#[tokio::test]
async fn test_cancel_skips_fallback_attempt() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("intro.mp4");
    let cancel = CancelFlag::new();
    let trigger = cancel.clone();
    let transcoder = Arc::new(FakeTranscoder::new(move |_| {
        // Interrupted tool exits non-zero
        trigger.cancel();
        ToolRun::failed(255, "Exiting normally, received signal 2.")
    }));
    let request = ClipRequest::new(1, "10", Some("intro")).unwrap();

    let outcome = extractor(Arc::clone(&transcoder), EngineConfig::default())
        .extract(&request, &output, &source(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, ClipStatus::ExtractionFailed);
    assert_eq!(outcome.attempts.len(), 1);
    assert!(outcome.note.unwrap().contains("cancelled"));
    assert_eq!(transcoder.calls().len(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_transcoder_lost_mid_fallback_removes_partial_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("intro.mp4");
    let transcoder = Arc::new(FakeTranscoder::fallible(|args| {
        if is_stream_copy(args) {
            Ok(ToolRun::failed(1, "copy not possible"))
        } else {
            Err(DomainError::tool_unavailable("ffmpeg", "not found on PATH"))
        }
    }));
    let request = ClipRequest::new(1, "10", Some("intro")).unwrap();

    let result = extractor(Arc::clone(&transcoder), EngineConfig::default())
        .extract(&request, &output, &source(), &CancelFlag::new())
        .await;

    assert!(matches!(result, Err(DomainError::ToolUnavailable { .. })));
    assert_eq!(transcoder.calls().len(), 2);
    assert!(!output.exists());
}
