// =============================================================================
// INTEGRATION TESTS - SINGLE POLL
// Fetch → validate → format → notify, one tick at a time
// =============================================================================

use serde_json::json;
use std::sync::Arc;

use crate::common::{approved_message, homework_body, RecordingNotifier, ScriptedSource};
use review_status_bot::modules::homework::{HomeworkStatus, LookupError, ValidationError};
use review_status_bot::services::monitor::{MonitorEngine, PollError, PollOutcome};
use review_status_bot::services::practicum::TransportError;

#[tokio::test]
async fn test_empty_list_sends_nothing() {
    let source = ScriptedSource::new(vec![Ok(json!({"homeworks": [], "current_date": 1700}))]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source.clone(), notifier.clone(), 0);

    let outcome = engine.poll_once().await.unwrap();

    assert_eq!(outcome, PollOutcome::NoHomeworks);
    assert!(notifier.sent().is_empty());
    assert_eq!(engine.state().cursor, 1700);
    assert_eq!(engine.state().last_status, None);
}

#[tokio::test]
async fn test_same_status_twice_notifies_once() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "approved", 100)),
        Ok(homework_body("hw1", "approved", 200)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source.clone(), notifier.clone(), 0);

    let first = engine.poll_once().await.unwrap();
    let second = engine.poll_once().await.unwrap();

    assert!(matches!(first, PollOutcome::Notified(ref hw) if hw.name == "hw1"));
    assert_eq!(second, PollOutcome::Unchanged(HomeworkStatus::Approved));
    assert_eq!(notifier.sent(), vec![approved_message("hw1")]);
    assert_eq!(source.cursors(), vec![0, 100]);
}

#[tokio::test]
async fn test_each_transition_notifies() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "reviewing", 100)),
        Ok(homework_body("hw1", "rejected", 200)),
        Ok(homework_body("hw1", "approved", 300)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source, notifier.clone(), 0);

    for _ in 0..3 {
        engine.poll_once().await.unwrap();
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].ends_with("Работа взята на проверку ревьюером."));
    assert!(sent[1].ends_with("Работа проверена: у ревьюера есть замечания."));
    assert_eq!(sent[2], approved_message("hw1"));
    assert_eq!(engine.state().last_status, Some(HomeworkStatus::Approved));
    assert_eq!(engine.state().poll_count, 3);
}

#[tokio::test]
async fn test_homeworks_as_string_is_shape_error() {
    let source = ScriptedSource::new(vec![Ok(json!({"homeworks": "hw1", "current_date": 5}))]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source, notifier.clone(), 0);

    let err = engine.poll_once().await.unwrap_err();

    assert!(matches!(err, PollError::Validation(ValidationError::HomeworksNotAList)));
    assert!(notifier.sent().is_empty());
    assert_eq!(engine.state().cursor, 0);
}

#[tokio::test]
async fn test_unknown_status_fails_without_state_change() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "on_hold", 100)),
        Ok(homework_body("hw1", "approved", 200)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source.clone(), notifier.clone(), 0);

    let err = engine.poll_once().await.unwrap_err();
    assert!(matches!(
        err,
        PollError::Lookup(LookupError::UnknownStatus(ref code)) if code == "on_hold"
    ));
    assert_eq!(engine.state().cursor, 0);

    // Next poll proceeds normally
    let outcome = engine.poll_once().await.unwrap();
    assert!(matches!(outcome, PollOutcome::Notified(_)));
    assert_eq!(source.cursors(), vec![0, 0]);
}

#[tokio::test]
async fn test_transport_error_reuses_cursor() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "reviewing", 100)),
        Err(TransportError::UnexpectedStatus {
            endpoint: "http://practicum.test/".to_string(),
            status: 503,
        }),
        Ok(homework_body("hw1", "reviewing", 200)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source.clone(), notifier.clone(), 0);

    engine.poll_once().await.unwrap();
    let before = engine.state().clone();

    let err = engine.poll_once().await.unwrap_err();
    assert!(matches!(err, PollError::Transport(TransportError::UnexpectedStatus { status: 503, .. })));
    assert_eq!(engine.state().cursor, before.cursor);
    assert_eq!(engine.state().last_status, before.last_status);
    assert_eq!(engine.state().poll_count, before.poll_count);

    engine.poll_once().await.unwrap();
    assert_eq!(source.cursors(), vec![0, 100, 100]);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_missing_name_fails_loudly() {
    let source = ScriptedSource::new(vec![Ok(json!({
        "homeworks": [{"status": "approved"}],
        "current_date": 100
    }))]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source, notifier.clone(), 0);

    let err = engine.poll_once().await.unwrap_err();

    assert!(matches!(err, PollError::Lookup(LookupError::MissingName)));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_failed_delivery_is_retried_next_poll() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "approved", 100)),
        Ok(homework_body("hw1", "approved", 200)),
    ]);
    let notifier = RecordingNotifier::failing(1);
    let mut engine = MonitorEngine::new(source.clone(), notifier.clone(), 0);

    let first = engine.poll_once().await.unwrap();
    assert!(matches!(first, PollOutcome::DeliveryFailed(_)));
    assert_eq!(engine.state().last_status, None);
    assert_eq!(engine.state().cursor, 0);

    let second = engine.poll_once().await.unwrap();
    assert!(matches!(second, PollOutcome::Notified(_)));
    assert_eq!(notifier.sent(), vec![approved_message("hw1")]);
    assert_eq!(source.cursors(), vec![0, 0]);
}

#[tokio::test]
async fn test_only_latest_homework_is_tracked() {
    let source = ScriptedSource::new(vec![Ok(json!({
        "homeworks": [
            {"homework_name": "hw2", "status": "reviewing"},
            {"homework_name": "hw1", "status": "approved"}
        ],
        "current_date": 100
    }))]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source, notifier.clone(), 0);

    engine.poll_once().await.unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("\"hw2\""));
    assert_eq!(engine.state().last_status, Some(HomeworkStatus::Reviewing));
}

#[tokio::test]
async fn test_start_cursor_is_used() {
    let source = ScriptedSource::new(vec![]);
    let notifier: Arc<RecordingNotifier> = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source.clone(), notifier, 1_549_962_000);

    engine.poll_once().await.unwrap();

    assert_eq!(source.cursors(), vec![1_549_962_000]);
}

#[tokio::test]
async fn test_last_polled_at_set_only_by_successful_polls() {
    let source = ScriptedSource::new(vec![
        Err(TransportError::Network("connection refused".to_string())),
        Ok(homework_body("hw1", "reviewing", 100)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut engine = MonitorEngine::new(source, notifier, 0);

    engine.poll_once().await.unwrap_err();
    assert!(engine.state().last_polled_at.is_none());

    let before = chrono::Utc::now();
    engine.poll_once().await.unwrap();
    let polled_at = engine.state().last_polled_at.expect("poll time recorded");
    assert!(polled_at >= before);
}
