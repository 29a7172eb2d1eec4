// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end delivery against a mock HTTP server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

use std::path::PathBuf;

use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI off the async runtime so the mock server keeps serving.
async fn run_cli(dir: PathBuf, args: &[&str]) -> std::process::Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        outbox()
            .args(&args)
            .current_dir(dir)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn drain_delivers_in_order_and_empties_queue() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/a"))
        .and(body_string(r#"{"n":1}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let dir = temp.path().to_path_buf();
    run_cli(dir.clone(), &["enqueue", "POST", "/api/a", "-d", r#"{"n": 1}"#]).await;
    run_cli(dir.clone(), &["enqueue", "DELETE", "/api/b"]).await;

    let output = run_cli(dir.clone(), &["drain", "-o", "json"]).await;
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        summary,
        serde_json::json!({"processed": 2, "remaining": 0, "error": 0, "online": true})
    );

    let posts: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() != "HEAD")
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(posts, vec!["/api/a", "/api/b"]);
    assert!(list_json(&temp).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn drain_halts_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let dir = temp.path().to_path_buf();
    run_cli(dir.clone(), &["enqueue", "POST", "/api/a"]).await;
    run_cli(dir.clone(), &["enqueue", "POST", "/api/b"]).await;

    let output = run_cli(dir.clone(), &["drain"]).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Delivered 0, 2 remaining (1 failed)"));

    let items = list_json(&temp);
    assert_eq!(items[0]["attempts"], 1);
    assert_eq!(items[0]["lastError"], "status:503");
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(items[1]["attempts"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_item_is_skipped_then_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/a"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let dir = temp.path().to_path_buf();
    run_cli(dir.clone(), &["enqueue", "POST", "/api/a"]).await;
    run_cli(dir.clone(), &["enqueue", "POST", "/api/b"]).await;

    let output = run_cli(dir.clone(), &["drain"]).await;
    assert!(stdout(&output).contains("Delivered 1, 1 remaining (1 failed)"));
    let items = list_json(&temp);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["url"], "/api/a");
    assert_eq!(items[0]["status"], "error");
    assert_eq!(items[0]["attempts"], 0);

    // A plain drain leaves failed items alone.
    let output = run_cli(dir.clone(), &["drain"]).await;
    assert!(stdout(&output).contains("Delivered 0, 1 remaining"));

    let output = run_cli(dir.clone(), &["retry-failed"]).await;
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Reset 1 failed item(s)"));
    assert!(text.contains("Delivered 1, 0 remaining"));
    assert!(list_json(&temp).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn send_delivers_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/orders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let output = run_cli(
        temp.path().to_path_buf(),
        &["send", "PATCH", "/api/orders/1", "-d", r#"{"qty": 2}"#],
    )
    .await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Delivered: HTTP 200"));
    assert!(text.contains(r#"{"ok":true}"#));
    assert!(list_json(&temp).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn send_rejection_is_not_queued() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let output = run_cli(temp.path().to_path_buf(), &["send", "POST", "/api/x"]).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("HTTP 422"));
    assert!(list_json(&temp).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn send_server_error_is_queued() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = init_temp_with(&server.uri());
    let output = run_cli(
        temp.path().to_path_buf(),
        &["send", "POST", "/api/x", "-o", "json"],
    )
    .await;

    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["ok"], false);
    assert_eq!(result["queued"], true);
    assert_eq!(result["response"]["status"], 500);

    let items = list_json(&temp);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["lastError"], "status:500");
}
