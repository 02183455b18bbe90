use std::io::Write;
use std::sync::Arc;

use referral_live::{FeedStatus, MockErrorSink, NoOpErrorSink, SubscriptionError};
use referral_replay::config::Config;
use referral_replay::replay;
use tempfile::NamedTempFile;
use tokio::io::BufReader;

const CAPTURE: &str = r#"
{"collection":"messages","changes":[{"type":"added","id":"m2","data":{"username":"bo","message":"second","room":"general-Chat","timestamp":2000}},{"type":"added","id":"m1","data":{"username":"ana","message":"first","room":"general-Chat","timestamp":"1970-01-01T00:00:01Z"}}]}
{"collection":"jobOpenings","changes":[{"type":"added","id":"o1","data":{"userFullName":"Ana","title":"Backend","company":"Acme","techStack":"rust, sql","createdAt":1000}}]}
{"collection":"jobOpenings","changes":[{"type":"added","id":"o2","data":{"userFullName":"Bo","title":"Frontend","company":"Initech","status":"CLOSED","createdAt":2000}}]}
{"collection":"notifications","changes":[{"type":"added","id":"n1","data":{"userId":"u1","message":"Approved","type":"ACCOUNT_APPROVED","createdAt":{"seconds":5,"nanoseconds":0}}}]}
{"collection":"messages","error":{"kind":"unavailable","message":"client is offline"}}
{"collection":"messages","changes":[{"type":"removed","id":"m1"}]}
this is not json
{"collection":"applications","changes":[]}
"#;

fn small_windows() -> Config {
    Config {
        chat_window: 10,
        listing_window: 10,
        notification_window: 10,
        ..Config::default()
    }
}

#[tokio::test]
async fn replays_capture_into_final_views() {
    let sink = MockErrorSink::new();
    let summary = replay(&small_windows(), CAPTURE.as_bytes(), Arc::new(sink.clone()))
        .await
        .unwrap();

    let chat: Vec<&str> = summary
        .messages
        .entries
        .iter()
        .map(|m| m.message.as_str())
        .collect();
    assert_eq!(chat, vec!["second"]);
    assert_eq!(summary.messages.status, FeedStatus::Closed);

    let openings: Vec<&str> = summary
        .job_openings
        .entries
        .iter()
        .map(|o| o.id.as_str())
        .collect();
    assert_eq!(openings, vec!["o2", "o1"]);
    assert_eq!(summary.job_openings.entries[1].skills, vec!["rust", "sql"]);
    assert_eq!(summary.open_job_openings, 1);

    assert_eq!(summary.unread_notifications, 1);
    assert!(summary.job_requests.entries.is_empty());

    assert_eq!(summary.lines_dispatched, 6);
    assert_eq!(summary.lines_skipped, 2);
    assert_eq!(
        sink.reports(),
        vec![(
            "messages".to_string(),
            SubscriptionError::Unavailable("client is offline".to_string())
        )]
    );
}

#[tokio::test]
async fn terminal_error_freezes_collection() {
    let capture = r#"{"collection":"notifications","changes":[{"type":"added","id":"n1","data":{"type":"JOIN_REQUEST","createdAt":1000}}]}
{"collection":"notifications","error":{"kind":"permission_denied","message":"signed out"}}
"#;
    let summary = replay(&small_windows(), capture.as_bytes(), Arc::new(NoOpErrorSink))
        .await
        .unwrap();

    assert_eq!(summary.notifications.entries.len(), 1);
    assert!(matches!(summary.notifications.status, FeedStatus::Failed(_)));
    assert_eq!(summary.messages.status, FeedStatus::Closed);
}

#[tokio::test]
async fn lines_after_terminal_error_are_skipped() {
    let capture = r#"{"collection":"notifications","changes":[{"type":"added","id":"n1","data":{"type":"JOIN_REQUEST","createdAt":1000}}]}
{"collection":"notifications","error":{"kind":"permission_denied","message":"signed out"}}
{"collection":"notifications","changes":[{"type":"added","id":"n2","data":{"type":"JOB_OPENING","createdAt":2000}}]}
{"collection":"notifications","changes":[{"type":"added","id":"n3","data":{"type":"JOB_REQUEST","createdAt":3000}}]}
{"collection":"messages","changes":[{"type":"added","id":"m1","data":{"message":"still here","timestamp":1000}}]}
"#;
    let summary = replay(&small_windows(), capture.as_bytes(), Arc::new(NoOpErrorSink))
        .await
        .unwrap();

    assert_eq!(summary.lines_dispatched, 3);
    assert_eq!(summary.lines_skipped, 2);

    let ids: Vec<&str> = summary
        .notifications
        .entries
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["n1"]);
    assert!(matches!(summary.notifications.status, FeedStatus::Failed(_)));
    assert_eq!(summary.messages.entries.len(), 1);
}

#[tokio::test]
async fn chat_window_keeps_newest_messages() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..5 {
        writeln!(
            file,
            r#"{{"collection":"messages","changes":[{{"type":"added","id":"m{i}","data":{{"message":"msg {i}","timestamp":{}}}}}]}}"#,
            i * 1000
        )
        .unwrap();
    }

    let config = Config {
        chat_window: 3,
        ..small_windows()
    };
    let reader = BufReader::new(tokio::fs::File::open(file.path()).await.unwrap());
    let summary = replay(&config, reader, Arc::new(NoOpErrorSink)).await.unwrap();

    let ids: Vec<&str> = summary
        .messages
        .entries
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec!["m2", "m3", "m4"]);
}

#[tokio::test]
async fn zero_window_is_rejected() {
    let config = Config {
        listing_window: 0,
        ..Config::default()
    };
    let result = replay(&config, "".as_bytes(), Arc::new(NoOpErrorSink)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn summary_serializes_as_json() {
    let summary = replay(&small_windows(), CAPTURE.as_bytes(), Arc::new(NoOpErrorSink))
        .await
        .unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["messages"]["status"]["state"], "closed");
    assert_eq!(json["jobOpenings"]["entries"][0]["id"], "o2");
    assert_eq!(json["unreadNotifications"], 1);
}
