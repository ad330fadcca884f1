//! End-to-end publish runs against the in-memory transport.

use pubsub_producer::testing::MemoryTransport;
use pubsub_producer::{PublishError, Publisher};
use pubsub_publisher::{execute, run, Cli, PublishMode, Settings};
use serde_json::json;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn cli() -> Cli {
    Cli {
        project_id: Some("my-project".to_string()),
        topic: Some("dev-events".to_string()),
        message: None,
        count: 1,
        delay: Duration::from_millis(100),
        file: None,
        event_type: "test".to_string(),
        verbose: false,
        strict: false,
    }
}

fn settings(cli: &Cli) -> Settings {
    Settings::from_cli(cli).unwrap()
}

fn messages_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ============================================================================
// Validation and mode selection
// ============================================================================

#[test]
fn test_missing_project_id() {
    let cli = Cli {
        project_id: None,
        ..cli()
    };
    let err = Settings::from_cli(&cli).unwrap_err();

    assert!(matches!(err, PublishError::Validation(_)));
    assert!(err.to_string().contains("GOOGLE_CLOUD_PROJECT"));
}

#[test]
fn test_blank_topic() {
    let cli = Cli {
        topic: Some("   ".to_string()),
        ..cli()
    };
    let err = Settings::from_cli(&cli).unwrap_err();

    assert!(err.to_string().contains("PUBSUB_TOPIC"));
}

#[test]
fn test_file_takes_precedence_over_message() {
    let cli = Cli {
        file: Some(PathBuf::from("messages.json")),
        message: Some("{}".to_string()),
        ..cli()
    };
    assert_eq!(
        PublishMode::select(&cli),
        PublishMode::File(PathBuf::from("messages.json"))
    );
}

#[test]
fn test_message_takes_precedence_over_generate() {
    let cli = Cli {
        message: Some("{}".to_string()),
        count: 7,
        ..cli()
    };
    assert_eq!(PublishMode::select(&cli), PublishMode::Single("{}".to_string()));
}

#[test]
fn test_empty_message_and_file_count_as_absent() {
    let cli = Cli {
        message: Some(String::new()),
        file: Some(PathBuf::new()),
        count: 2,
        ..cli()
    };
    assert!(matches!(
        PublishMode::select(&cli),
        PublishMode::Generate { count: 2, .. }
    ));
}

#[test]
fn test_generate_is_default_mode() {
    let cli = Cli {
        count: 4,
        event_type: "error".to_string(),
        ..cli()
    };
    assert_eq!(
        PublishMode::select(&cli),
        PublishMode::Generate {
            count: 4,
            delay: Duration::from_millis(100),
            event_type: "error".to_string(),
        }
    );
}

// ============================================================================
// Pre-flight topic checks
// ============================================================================

#[tokio::test]
async fn test_topic_not_found_publishes_nothing() {
    let publisher = Publisher::new(MemoryTransport::new().without_topic());
    let cli = Cli { count: 5, ..cli() };

    let err = run(&settings(&cli), &publisher).await.unwrap_err();

    assert!(matches!(err, PublishError::TopicNotFound(_)));
    assert!(err.to_string().starts_with("Topic not found"));
    assert_eq!(publisher.transport().attempts(), 0);
}

#[tokio::test]
async fn test_permission_denied_publishes_nothing() {
    let publisher = Publisher::new(MemoryTransport::new().deny_access());

    let err = execute(&settings(&cli()), &publisher).await.unwrap_err();

    assert!(err.to_string().contains("Permission denied"));
    assert_eq!(publisher.transport().attempts(), 0);
    assert!(publisher.transport().is_shut_down());
}

// ============================================================================
// Generate mode
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_generated_batch() {
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli {
        count: 5,
        event_type: "order".to_string(),
        ..cli()
    };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();
    assert_eq!(summary.message_ids.len(), 5);
    assert_eq!(summary.failed, 0);

    let transport = publisher.transport();
    assert_eq!(transport.existence_checks(), 1);
    assert!(transport.is_shut_down());

    let sent = transport.published();
    let event_ids: HashSet<&str> = sent
        .iter()
        .filter_map(|m| m.body["event_id"].as_str())
        .collect();
    assert_eq!(event_ids.len(), 5);

    for (i, message) in sent.iter().enumerate() {
        assert_eq!(message.topic, "projects/my-project/topics/dev-events");
        assert_eq!(message.body["event_type"], json!("order"));
        assert_eq!(message.body["data"]["sequence"], json!(i + 1));
        assert_eq!(message.body["data"]["total"], json!(5));
        assert_eq!(message.attributes["publisher"], "test-publisher");
        assert!(message.attributes.contains_key("published_at"));
    }
}

#[tokio::test]
async fn test_generated_timestamps_follow_pacing() {
    let publisher = Publisher::new(MemoryTransport::new());
    let delay = Duration::from_millis(150);
    let cli = Cli {
        count: 3,
        delay,
        ..cli()
    };

    execute(&settings(&cli), &publisher).await.unwrap();

    let parse = |text: &str| chrono::DateTime::parse_from_rfc3339(text).unwrap();
    let sent = publisher.transport().published();
    let stamps: Vec<_> = sent
        .iter()
        .map(|m| parse(m.body["timestamp"].as_str().unwrap()))
        .collect();

    assert!(stamps[2] - stamps[0] >= chrono::Duration::milliseconds(300));
    for (message, stamp) in sent.iter().zip(&stamps) {
        let published_at = parse(&message.attributes["published_at"]);
        assert!(published_at - *stamp < chrono::Duration::milliseconds(150));
    }
}

#[tokio::test]
async fn test_zero_count() {
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli { count: 0, ..cli() };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();

    assert!(summary.message_ids.is_empty());
    assert_eq!(publisher.transport().attempts(), 0);
}

#[tokio::test]
async fn test_partial_failure_still_succeeds() {
    let publisher = Publisher::new(MemoryTransport::new().fail_on(2));
    let cli = Cli {
        count: 5,
        delay: Duration::ZERO,
        ..cli()
    };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();

    assert_eq!(summary.message_ids, vec!["msg-1", "msg-3", "msg-4", "msg-5"]);
    assert_eq!(summary.failed, 1);
    assert_eq!(publisher.transport().attempts(), 5);
}

#[tokio::test]
async fn test_strict_fails_on_partial_failure() {
    let publisher = Publisher::new(MemoryTransport::new().fail_on(2));
    let cli = Cli {
        count: 5,
        delay: Duration::ZERO,
        strict: true,
        ..cli()
    };

    let err = execute(&settings(&cli), &publisher).await.unwrap_err();

    assert_eq!(err.to_string(), "1 of 5 message(s) failed to publish");
    assert_eq!(publisher.transport().attempts(), 5);
}

#[tokio::test]
async fn test_all_failed_without_strict_succeeds() {
    let publisher = Publisher::new(MemoryTransport::new().fail_on(1).fail_on(2));
    let cli = Cli {
        count: 2,
        delay: Duration::ZERO,
        ..cli()
    };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();

    assert!(summary.message_ids.is_empty());
    assert_eq!(summary.failed, 2);
}

// ============================================================================
// Single message mode
// ============================================================================

#[tokio::test]
async fn test_single_message_keeps_event_id() {
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli {
        message: Some(r#"{"event_id": "evt-42", "event_type": "order", "data": {"id": 123}}"#.to_string()),
        ..cli()
    };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();
    assert_eq!(summary.message_ids, vec!["msg-1"]);

    let sent = publisher.transport().published();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body["event_id"], json!("evt-42"));
    assert_eq!(sent[0].body["data"], json!({"id": 123}));
    assert!(sent[0].body["timestamp"].is_string());
}

#[tokio::test]
async fn test_single_message_invalid_json() {
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli {
        message: Some("{bad json".to_string()),
        ..cli()
    };

    let err = run(&settings(&cli), &publisher).await.unwrap_err();

    assert!(matches!(err, PublishError::Parse { .. }));
    assert_eq!(publisher.transport().attempts(), 0);
}

#[tokio::test]
async fn test_single_message_transport_failure_is_fatal() {
    let publisher = Publisher::new(MemoryTransport::new().fail_on(1));
    let cli = Cli {
        message: Some(r#"{"a": 1}"#.to_string()),
        ..cli()
    };

    let err = run(&settings(&cli), &publisher).await.unwrap_err();

    assert!(matches!(err, PublishError::Transport(_)));
}

// ============================================================================
// File mode
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_file_mode_ignores_delay() {
    let file = messages_file(r#"[{"a": 1}, {"a": 2}]"#);
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli {
        file: Some(file.path().to_path_buf()),
        delay: Duration::from_secs(10),
        ..cli()
    };

    let start = tokio::time::Instant::now();
    let summary = execute(&settings(&cli), &publisher).await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(summary.message_ids, vec!["msg-1", "msg-2"]);

    let sent = publisher.transport().published();
    for (i, message) in sent.iter().enumerate() {
        assert_eq!(message.body["a"], json!(i + 1));
        assert!(message.body["event_id"].is_string());
        assert!(message.body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_file_mode_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let publisher = Publisher::new(MemoryTransport::new());
    let cli = Cli {
        file: Some(dir.path().join("absent.json")),
        ..cli()
    };

    let err = run(&settings(&cli), &publisher).await.unwrap_err();

    assert!(matches!(err, PublishError::Parse { .. }));
    assert_eq!(publisher.transport().attempts(), 0);
}

#[tokio::test]
async fn test_file_mode_partial_failure() {
    let file = messages_file(r#"[{"n": 1}, {"n": 2}, {"n": 3}]"#);
    let publisher = Publisher::new(MemoryTransport::new().fail_on(3));
    let cli = Cli {
        file: Some(file.path().to_path_buf()),
        ..cli()
    };

    let summary = execute(&settings(&cli), &publisher).await.unwrap();

    assert_eq!(summary.message_ids, vec!["msg-1", "msg-2"]);
    assert_eq!(summary.failed, 1);
}
