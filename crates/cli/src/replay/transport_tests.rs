// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::replay::test_helpers::{MockTransport, Reply};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(base_url: Option<&str>) -> HttpTransport {
    HttpTransport::new(base_url.map(String::from), Duration::from_secs(5)).unwrap()
}

#[test]
fn test_resolve_relative_against_base() {
    let t = transport(Some("https://api.example.com/"));
    assert_eq!(
        t.resolve("/api/x").unwrap(),
        "https://api.example.com/api/x"
    );
    assert_eq!(t.resolve("api/x").unwrap(), "https://api.example.com/api/x");
}

#[test]
fn test_resolve_absolute_unchanged() {
    let t = transport(Some("https://api.example.com"));
    assert_eq!(
        t.resolve("http://other.example.com/y").unwrap(),
        "http://other.example.com/y"
    );
}

#[test]
fn test_resolve_relative_without_base_fails() {
    let t = transport(None);
    assert!(matches!(
        t.resolve("/api/x"),
        Err(TransportError::InvalidRequest(_))
    ));
}

#[test]
fn test_response_ok() {
    assert!(Response::new(204, "").ok());
    assert!(!Response::new(404, "").ok());
    assert!(!Response::new(503, "").ok());
}

#[test]
fn test_outcome_of() {
    assert_eq!(
        outcome_of(&Ok(Response::new(201, ""))),
        Outcome::Status(201)
    );
    let err: TransportResult<Response> = Err(TransportError::ConnectionFailed("reset".into()));
    assert_eq!(
        outcome_of(&err),
        Outcome::Network("connection failed: reset".into())
    );
}

#[test]
fn test_request_from_mutation_applies_default_headers() {
    let m = Mutation::new(Method::Post, "/api/x").with_body(serde_json::json!({"a": 1}));
    let req = Request::from_mutation(&m).unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(
        req.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_http_transport_sends_method_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"a":1}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let t = transport(Some(&server.uri()));
    let m = Mutation::new(Method::Post, "/api/x").with_body(serde_json::json!({"a": 1}));
    let response = t.deliver(Request::from_mutation(&m).unwrap()).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.body, "created");
}

#[tokio::test]
async fn test_http_transport_returns_error_statuses_as_responses() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let t = transport(Some(&server.uri()));
    let m = Mutation::new(Method::Delete, "/api/x/1");
    let response = t.deliver(Request::from_mutation(&m).unwrap()).await.unwrap();
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn test_http_transport_connection_refused_is_error() {
    let t = transport(Some("http://127.0.0.1:9"));
    let m = Mutation::new(Method::Post, "/api/x");
    let result = t.deliver(Request::from_mutation(&m).unwrap()).await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_http_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let t = HttpTransport::new(Some(server.uri()), Duration::from_millis(200)).unwrap();
    let m = Mutation::new(Method::Post, "/slow");
    let result = t.deliver(Request::from_mutation(&m).unwrap()).await;
    assert!(matches!(result, Err(TransportError::Timeout(_))));
}

#[tokio::test]
async fn test_mock_transport_scripts_per_url() {
    let t = MockTransport::new();
    t.script("/a", &[Reply::Status(500), Reply::Network("reset")]);

    let req = |url: &str| Request::from_mutation(&Mutation::new(Method::Post, url)).unwrap();

    assert_eq!(t.deliver(req("/a")).await.unwrap().status, 500);
    assert!(t.deliver(req("/a")).await.is_err());
    assert_eq!(t.deliver(req("/a")).await.unwrap().status, 200);
    assert_eq!(t.deliver(req("/b")).await.unwrap().status, 200);
    assert_eq!(t.delivered_urls(), vec!["/a", "/a", "/a", "/b"]);
}

#[tokio::test]
async fn test_http_transport_caps_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(MAX_BODY_BYTES + 4096)))
        .mount(&server)
        .await;

    let t = transport(Some(&server.uri()));
    let m = Mutation::new(Method::Post, "/big");
    let response = t.deliver(Request::from_mutation(&m).unwrap()).await.unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(response.body.len(), MAX_BODY_BYTES);
}

#[tokio::test]
async fn test_http_transport_keeps_small_body_whole() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("qty must be positive"))
        .mount(&server)
        .await;

    let t = transport(Some(&server.uri()));
    let m = Mutation::new(Method::Post, "/small");
    let response = t.deliver(Request::from_mutation(&m).unwrap()).await.unwrap();
    assert_eq!(response.body, "qty must be positive");
}
