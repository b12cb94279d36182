//! Integration tests for the coach REST API.
//!
//! Each test spins up an Axum server on a random port and drives a
//! session over HTTP with reqwest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use just_in_case::coach::{Checklist, CoachSessions, coach_routes};
use just_in_case::config::CoachConfig;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start an Axum server on a random port, return (port, sessions).
async fn start_server() -> (u16, Arc<CoachSessions>) {
    let sessions = CoachSessions::new(
        Arc::new(Checklist::preparedness()),
        CoachConfig::immediate(),
    );
    let app = coach_routes(Arc::clone(&sessions));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, sessions)
}

async fn create_session(client: &reqwest::Client, port: u16) -> (String, Value) {
    let resp = client
        .post(format!("http://127.0.0.1:{port}/api/coach/sessions"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    (body["id"].as_str().unwrap().to_string(), body)
}

async fn say(client: &reqwest::Client, port: u16, id: &str, text: &str) -> Value {
    let resp = client
        .post(format!(
            "http://127.0.0.1:{port}/api/coach/sessions/{id}/messages"
        ))
        .json(&json!({"text": text}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

fn bot_texts(events: &Value) -> Vec<String> {
    events
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["type"] == "message" && e["role"] == "bot")
        .map(|e| e["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_ok() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server().await;
        let resp = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn checklist_lists_ten_topics() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server().await;
        let body: Value = reqwest::get(format!("http://127.0.0.1:{port}/api/coach/checklist"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let topics = body["topics"].as_array().unwrap();
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0]["key"], "musterPoint");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn create_session_greets() {
    timeout(TEST_TIMEOUT, async {
        let (port, sessions) = start_server().await;
        let client = reqwest::Client::new();
        let (_, body) = create_session(&client, port).await;

        assert_eq!(body["status"]["phase"], "not_started");
        assert_eq!(body["status"]["cursor"], 0);
        let texts = bot_texts(&body["events"]);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("emergency preparedness coach"));
        assert_eq!(sessions.len().await, 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn full_assessment_over_http() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server().await;
        let client = reqwest::Client::new();
        let (id, _) = create_session(&client, port).await;

        let body = say(&client, port, &id, "Yes, let's start!").await;
        assert_eq!(body["status"]["phase"], "asking");
        assert_eq!(body["status"]["cursor"], 1);

        // An unclassifiable answer changes nothing.
        let body = say(&client, port, &id, "purple").await;
        assert_eq!(body["status"]["cursor"], 1);
        assert_eq!(body["status"]["ledger"], json!({}));

        let answers = ["yes", "yes", "yes", "yes", "no", "no", "no", "no", "maybe", "yes"];
        let mut last = Value::Null;
        for answer in answers {
            last = say(&client, port, &id, answer).await;
        }

        let status = &last["status"];
        assert_eq!(status["phase"], "summary");
        assert_eq!(status["cursor"], 11);
        assert_eq!(status["progress_percent"], 100);
        assert_eq!(status["ledger"]["musterPoint"], true);
        assert_eq!(status["ledger"]["flashlights"], false);
        assert_eq!(status["ledger"]["plan"], "unsure");
        assert_eq!(status["summary"]["prepared"], 5);
        assert_eq!(status["summary"]["total"], 10);
        assert_eq!(status["summary"]["percentage"], 50);
        assert_eq!(status["summary"]["tier"], "encouragement");

        let summary_events: Vec<&Value> = last["events"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["type"] == "summary")
            .collect();
        assert_eq!(summary_events.len(), 1);
        assert!(
            bot_texts(&last["events"])
                .iter()
                .any(|t| t.starts_with("You're 50% prepared!"))
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn start_over_and_search_after_summary() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server().await;
        let client = reqwest::Client::new();
        let (id, _) = create_session(&client, port).await;

        say(&client, port, &id, "start").await;
        for _ in 0..10 {
            say(&client, port, &id, "no").await;
        }

        let body = say(&client, port, &id, "Go to search").await;
        let events = body["events"].as_array().unwrap();
        assert!(events.iter().any(|e| e["type"] == "navigate_to_search"));

        let body = say(&client, port, &id, "Start over").await;
        assert_eq!(body["status"]["phase"], "not_started");
        assert_eq!(body["status"]["ledger"], json!({}));
        assert!(body["status"].get("summary").is_none());
        let events = body["events"].as_array().unwrap();
        assert!(events.iter().any(|e| e["type"] == "clear"));

        let body = say(&client, port, &id, "yes").await;
        assert_eq!(body["status"]["phase"], "asking");
        assert_eq!(body["status"]["cursor"], 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn get_and_delete_session() {
    timeout(TEST_TIMEOUT, async {
        let (port, sessions) = start_server().await;
        let client = reqwest::Client::new();
        let (id, _) = create_session(&client, port).await;

        let resp = client
            .get(format!("http://127.0.0.1:{port}/api/coach/sessions/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["id"], id.as_str());

        let resp = client
            .delete(format!("http://127.0.0.1:{port}/api/coach/sessions/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(sessions.is_empty().await);

        let resp = client
            .get(format!("http://127.0.0.1:{port}/api/coach/sessions/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn bad_ids_are_rejected() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!(
                "http://127.0.0.1:{port}/api/coach/sessions/not-a-uuid/messages"
            ))
            .json(&json!({"text": "yes"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Invalid session ID");

        let resp = client
            .post(format!(
                "http://127.0.0.1:{port}/api/coach/sessions/{}/messages",
                uuid::Uuid::new_v4()
            ))
            .json(&json!({"text": "yes"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_message_body_is_json_400() {
    timeout(TEST_TIMEOUT, async {
        let (port, sessions) = start_server().await;
        let client = reqwest::Client::new();
        let (id, _) = create_session(&client, port).await;
        let url = format!("http://127.0.0.1:{port}/api/coach/sessions/{id}/messages");

        let resp = client
            .post(&url)
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid message body")
        );

        // Well-formed JSON missing `text`.
        let resp = client
            .post(&url)
            .json(&json!({"message": "yes"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].is_string());

        // The session is untouched.
        let status = sessions.status(id.parse().unwrap()).await.unwrap();
        assert_eq!(status.cursor, 0);
    })
    .await
    .expect("test timed out");
}
