//! HTTP client integration tests against mock servers

use super::*;
use crate::{
    inspector::{ExchangeStore, HeaderLoggingInterceptor},
    logging::{LogSink, LoggerFactory},
    types::ExchangeStatus,
};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_exists, method, path},
};

const COLORS_PATH: &str = "/Nerdy-Things/04-android-network-inspector/master/colors.json";
const COLORS_BODY: &str = r#"{"red":[255,0,0],"green":[0,255,0],"blue":[0,0,255]}"#;

/// Mock HTTP server for controlled testing scenarios
struct MockColorsServer {
    server: MockServer,
}

impl MockColorsServer {
    async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    fn colors_url(&self) -> String {
        format!("{}{}", self.server.uri(), COLORS_PATH)
    }

    async fn mock(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(COLORS_PATH))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }
}

fn profiled_client(timeout: Duration) -> (NetworkClient, ExchangeStore) {
    let store = ExchangeStore::new(16);
    let inspector = Inspector::disabled().with_profiler(store.clone());
    (NetworkClient::with_timeout(inspector, timeout).unwrap(), store)
}

#[tokio::test]
async fn test_fetch_colors_decodes_table() {
    let server = MockColorsServer::new().await;
    server.mock(ResponseTemplate::new(200).set_body_raw(COLORS_BODY, "application/json")).await;

    let (client, store) = profiled_client(Duration::from_secs(5));
    let colors = client.fetch_colors(&server.colors_url()).await.unwrap();

    assert_eq!(colors.len(), 3);
    assert_eq!(colors["green"], vec![0, 255, 0]);

    let records = store.recent();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, "GET");
    assert_eq!(records[0].url, server.colors_url());
    assert_eq!(records[0].status_code, Some(200));
    assert_eq!(records[0].body_size, Some(COLORS_BODY.len()));
}

#[tokio::test]
async fn test_request_sends_user_agent() {
    let server = MockColorsServer::new().await;
    Mock::given(method("GET"))
        .and(path(COLORS_PATH))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server.server)
        .await;

    let client = NetworkClient::new(Inspector::disabled()).unwrap();
    let colors = client.fetch_colors(&server.colors_url()).await.unwrap();
    assert!(colors.is_empty());
}

#[tokio::test]
async fn test_error_status_is_http_error_but_still_profiled() {
    let server = MockColorsServer::new().await;
    server.mock(ResponseTemplate::new(404).set_body_string("Not Found")).await;

    let (client, store) = profiled_client(Duration::from_secs(5));
    let result = client.fetch_colors(&server.colors_url()).await;

    match result {
        Err(AppError::HttpRequest(msg)) => assert!(msg.contains("404")),
        other => panic!("expected HTTP error, got {:?}", other),
    }

    let records = store.recent();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ExchangeStatus::Completed);
    assert_eq!(records[0].status_code, Some(404));
}

#[tokio::test]
async fn test_wrong_shape_is_parse_error() {
    let server = MockColorsServer::new().await;
    server.mock(ResponseTemplate::new(200).set_body_string(r#"{"red":"ff0000"}"#)).await;

    let client = NetworkClient::new(Inspector::disabled()).unwrap();
    let result = client.fetch_colors(&server.colors_url()).await;

    assert!(matches!(result, Err(AppError::Parse(_))));
}

#[tokio::test]
async fn test_timeout_is_reported_as_failure() {
    let server = MockColorsServer::new().await;
    server.mock(
        ResponseTemplate::new(200)
            .set_body_string(COLORS_BODY)
            .set_delay(Duration::from_secs(3)),
    ).await;

    let (client, store) = profiled_client(Duration::from_millis(200));
    let result = client.fetch_colors(&server.colors_url()).await;

    assert!(matches!(result, Err(AppError::Timeout(_))));

    let records = store.recent();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ExchangeStatus::Failed);
    assert!(records[0].error.is_some());
}

#[tokio::test]
async fn test_header_logging_interceptor_sees_exchange() {
    let server = MockColorsServer::new().await;
    server.mock(
        ResponseTemplate::new(200)
            .set_body_raw(COLORS_BODY, "application/json")
            .insert_header("x-served-by", "mock"),
    ).await;

    let (sink, lines) = LogSink::buffer();
    let loggers = LoggerFactory::new(Config { enable_color: false, ..Default::default() }, sink);
    let inspector = Inspector::disabled()
        .with_interceptor(Arc::new(HeaderLoggingInterceptor::new(loggers.create_network_logger())));

    let client = NetworkClient::new(inspector).unwrap();
    client.fetch_colors(&server.colors_url()).await.unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(&format!("--> GET {}", server.colors_url())));
    assert!(lines[0].contains("user-agent"));
    assert!(lines[1].contains(&format!("<-- 200 {}", server.colors_url())));
    assert!(lines[1].contains("x-served-by"));
}

#[tokio::test]
async fn test_disabled_inspector_records_nothing() {
    let server = MockColorsServer::new().await;
    server.mock(ResponseTemplate::new(200).set_body_string(COLORS_BODY)).await;

    let client = NetworkClient::new(Inspector::disabled()).unwrap();
    client.fetch_colors(&server.colors_url()).await.unwrap();

    assert!(client.inspector().store().is_none());
}
