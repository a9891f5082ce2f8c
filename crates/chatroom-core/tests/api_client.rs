//! Integration tests for the backend HTTP client.

use chatroom_core::api::ApiError;
use chatroom_core::{ApiClient, Config};
use chatroom_types::DeletedKey;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: server.uri(),
        ..Default::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "sessions": ["alpha", "beta"] })),
        )
        .mount(&server)
        .await;

    let sessions = client_for(&server).list_sessions().await.unwrap();
    assert_eq!(sessions, vec!["alpha".to_string(), "beta".to_string()]);
}

#[tokio::test]
async fn test_create_and_delete_session_encode_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions/team%20room"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "msg": "Session created successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/team%20room"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "msg": "Session deleted successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.create_session("team room").await.unwrap();
    api.delete_session("team room").await.unwrap();
}

#[tokio::test]
async fn test_delete_unknown_session_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Session not found" })))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_session("ghost").await.unwrap_err();
    let api_error = err.downcast_ref::<ApiError>().expect("api error in chain");
    assert_eq!(api_error.status, 404);
    let rendered = format!("{err:#}");
    assert!(rendered.contains("delete session 'ghost'"), "{rendered}");
    assert!(rendered.contains("Session not found"), "{rendered}");
}

#[tokio::test]
async fn test_deleted_history_parses_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages/deleted_history/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleted_messages": [
                { "content": "first", "ts": 10, "deleted_at": 100, "sender": "me", "session_id": "alpha" },
                { "content": "second", "ts": 20, "deleted_at": 100 }
            ]
        })))
        .mount(&server)
        .await;

    let entries = client_for(&server).deleted_history("alpha").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sender.as_deref(), Some("me"));
    assert_eq!(entries[1].key(), DeletedKey { ts: 20, deleted_at: 100 });
}

#[tokio::test]
async fn test_batch_delete_sends_ts_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/batch_delete"))
        .and(body_json(json!({ "session_id": "alpha", "ts_list": [10, 20] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "msg": "Deleted 2 messages" })))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client_for(&server)
        .batch_delete("alpha", &[10, 20])
        .await
        .unwrap();
    assert_eq!(msg, "Deleted 2 messages");
}

#[tokio::test]
async fn test_restore_sends_composite_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/restore"))
        .and(body_json(json!({
            "session_id": "alpha",
            "ts_to_restore": 1_764_060_332_607_i64,
            "deleted_at": 1_764_064_879_i64
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "msg": "Message restored successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .restore(
            "alpha",
            DeletedKey {
                ts: 1_764_060_332_607,
                deleted_at: 1_764_064_879,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_passes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search_messages"))
        .and(query_param("query", "hello world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_ids": ["beta"] })))
        .mount(&server)
        .await;

    let ids = client_for(&server).search("hello world").await.unwrap();
    assert_eq!(ids, vec!["beta".to_string()]);
}

#[tokio::test]
async fn test_hourly_trend_is_sorted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aggregation/hourly_trend/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly_trend": [
                { "time_slot": "2025-01-02 10:00:00", "count": 3 },
                { "time_slot": "2025-01-01 23:00:00", "count": 1 }
            ]
        })))
        .mount(&server)
        .await;

    let trend = client_for(&server).hourly_trend("alpha").await.unwrap();
    let slots: Vec<&str> = trend
        .hourly_trend
        .iter()
        .map(|t| t.time_slot.as_str())
        .collect();
    assert_eq!(slots, ["2025-01-01 23:00:00", "2025-01-02 10:00:00"]);
    assert_eq!(trend.message, None);
}

#[tokio::test]
async fn test_hourly_trend_keeps_no_data_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aggregation/hourly_trend/quiet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly_trend": [],
            "message": "No data"
        })))
        .mount(&server)
        .await;

    let trend = client_for(&server).hourly_trend("quiet").await.unwrap();
    assert!(trend.hourly_trend.is_empty());
    assert_eq!(trend.message.as_deref(), Some("No data"));
}

#[tokio::test]
async fn test_undecodable_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_sessions().await.unwrap_err();
    assert!(format!("{err:#}").contains("decode response body"));
}
