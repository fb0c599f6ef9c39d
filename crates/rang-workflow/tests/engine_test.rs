//! End-to-end tests for the workflow engine against a scripted backend.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use helpers::*;

use rang_core::models::{EphemeralResponse, ImageRef, UploadCandidate};
use rang_core::{AppError, NoSession};
use rang_workflow::{ColorizeWorkflow, Phase, Stage};

fn workflow(
    backend: Arc<ScriptedBackend>,
    notifier: Arc<RecordingNotifier>,
) -> ColorizeWorkflow {
    ColorizeWorkflow::new(backend, Arc::new(NoSession), notifier, &fast_config())
}

#[tokio::test]
async fn synchronous_result_reaches_complete_with_progress_100() {
    // 2 MB JPEG resolved inline from a base64 payload.
    let payload = base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xe0jpeg-bytes");
    let inline = EphemeralResponse {
        colorized_base64: payload,
    }
    .decode()
    .unwrap();

    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Inline(inline)));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(2 * 1024 * 1024))
        .await
        .unwrap();

    let snapshot = wf.snapshot();
    assert_eq!(snapshot.phase, Phase::Complete);
    assert_eq!(snapshot.stage, Stage::Complete);
    assert_eq!(snapshot.progress, 100);
    assert!(snapshot.original_image.is_some());
    assert!(matches!(
        snapshot.colorized_image,
        Some(ImageRef::Inline { .. })
    ));
    assert_eq!(notifier.successes(), 1);
    assert_eq!(notifier.failures(), 0);
}

#[tokio::test]
async fn oversize_file_is_rejected_before_any_backend_call() {
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Queued("r1".into())));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    let candidate = UploadCandidate::new(vec![0u8; 15 * 1024 * 1024], "big.png", "image/png");
    let err = wf.submit_candidate(candidate).await.unwrap_err();

    assert!(matches!(err, AppError::PayloadTooLarge(_)));
    assert!(err.to_string().contains("10 MB"));
    assert_eq!(wf.snapshot().phase, Phase::Upload);
    assert_eq!(backend.submit_count(), 0);
    assert_eq!(notifier.notices().len(), 0);
}

#[tokio::test]
async fn wrong_media_type_is_rejected_before_any_backend_call() {
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Queued("r1".into())));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    // A text file renamed with an image extension but declared text/plain.
    let candidate = UploadCandidate::new(vec![0u8; 64], "notes.jpg", "text/plain");
    let err = wf.submit_candidate(candidate).await.unwrap_err();

    assert!(err.to_string().contains("Invalid file type"));
    assert_eq!(wf.snapshot().phase, Phase::Upload);
    assert_eq!(backend.submit_count(), 0);
}

#[tokio::test]
async fn queued_submission_polls_until_complete_then_stops() {
    let backend = Arc::new(
        ScriptedBackend::new(SubmitScript::Queued("req-7".into())).with_statuses(vec![
            processing_response("req-7"),
            processing_response("req-7"),
            complete_response("req-7", "https://cdn.example.com/colorized.jpg"),
        ]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(1024)).await.unwrap();
    let snapshot = wf.wait_until_settled(Duration::from_millis(5)).await;

    assert_eq!(snapshot.phase, Phase::Complete);
    assert_eq!(snapshot.progress, 100);
    assert_eq!(
        snapshot.colorized_image,
        Some(ImageRef::Remote(
            "https://cdn.example.com/colorized.jpg".to_string()
        ))
    );
    assert_eq!(backend.poll_count(), 3);
    assert_eq!(notifier.successes(), 1);

    // The polling timer must be cancelled at terminal status: no further
    // calls even after several more interval periods.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(backend.poll_count(), 3);
}

#[tokio::test]
async fn failed_poll_surfaces_message_and_returns_to_upload() {
    let backend = Arc::new(
        ScriptedBackend::new(SubmitScript::Queued("req-9".into()))
            .with_statuses(vec![failed_response("req-9", "could not detect a photo")]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(1024)).await.unwrap();
    let snapshot = wf.wait_until_settled(Duration::from_millis(5)).await;

    assert_eq!(snapshot.phase, Phase::Upload);
    assert!(snapshot.original_image.is_none());
    assert!(snapshot.colorized_image.is_none());
    assert_eq!(notifier.failures(), 1);
    match &notifier.notices()[0] {
        rang_workflow::Notice::Failure { detail, .. } => {
            assert_eq!(detail, "could not detect a photo");
        }
        other => panic!("expected failure notice, got {:?}", other),
    }
}

#[tokio::test]
async fn submission_network_error_notifies_exactly_once() {
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::NetworkError));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    let err = wf
        .submit_candidate(jpeg_candidate(1024))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(wf.snapshot().phase, Phase::Upload);
    assert_eq!(notifier.failures(), 1);
    assert_eq!(notifier.successes(), 0);
}

#[tokio::test]
async fn reset_cancels_polling_and_clears_state() {
    // No terminal status scripted: polling would continue forever.
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Queued("req-3".into())));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(1024)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(backend.poll_count() >= 2);

    wf.reset();
    let after_reset = backend.poll_count();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.poll_count(), after_reset);

    let snapshot = wf.snapshot();
    assert_eq!(snapshot.phase, Phase::Upload);
    assert_eq!(snapshot.stage, Stage::Analyzing);
    assert_eq!(snapshot.progress, 0);
    assert!(snapshot.original_image.is_none());
    assert!(snapshot.colorized_image.is_none());
}

#[tokio::test]
async fn second_submission_is_rejected_while_processing() {
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Queued("req-5".into())));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(1024)).await.unwrap();
    let err = wf
        .submit_candidate(jpeg_candidate(1024))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already being processed"));
    assert_eq!(backend.submit_count(), 1);

    wf.reset();
}

#[tokio::test]
async fn progress_is_monotonic_and_capped_while_waiting() {
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::Queued("req-4".into())));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = workflow(backend.clone(), notifier.clone());

    wf.submit_candidate(jpeg_candidate(1024)).await.unwrap();

    let mut last = 0;
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let snapshot = wf.snapshot();
        assert!(snapshot.progress >= last, "progress went backwards");
        assert!(snapshot.progress <= 95, "simulated progress passed the cap");
        assert!(snapshot.elapsed_secs.is_some());
        last = snapshot.progress;
    }

    wf.reset();
}

#[tokio::test]
async fn late_result_after_reset_is_ignored() {
    let inline = ImageRef::Remote("https://cdn.example.com/late.jpg".to_string());
    let backend = Arc::new(ScriptedBackend::new(SubmitScript::DelayedInline(
        Duration::from_millis(100),
        inline,
    )));
    let notifier = Arc::new(RecordingNotifier::new());
    let wf = Arc::new(workflow(backend.clone(), notifier.clone()));

    let submitting = {
        let wf = wf.clone();
        tokio::spawn(async move { wf.submit_candidate(jpeg_candidate(1024)).await })
    };

    // Reset while the submission response is still in flight.
    tokio::time::sleep(Duration::from_millis(30)).await;
    wf.reset();

    submitting.await.unwrap().unwrap();

    let snapshot = wf.snapshot();
    assert_eq!(snapshot.phase, Phase::Upload);
    assert!(snapshot.colorized_image.is_none());
    assert_eq!(notifier.successes(), 0);
}
