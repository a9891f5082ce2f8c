//! Effect handlers for the client runtime.
//!
//! Handlers are pure async functions that call the backend and return a
//! `UiEvent`. The runtime spawns them and sends the result to the inbox.
//! Errors are flattened to strings here; the reducer never sees `anyhow`.

use chatroom_core::ApiClient;
use chatroom_types::{DeletedKey, SessionId};
use tracing::{debug, warn};

use crate::events::{AnalyticsUiEvent, MessageUiEvent, SessionUiEvent, UiEvent};

fn flatten<T>(result: anyhow::Result<T>) -> Result<T, String> {
    result.map_err(|e| format!("{e:#}"))
}

pub async fn load_sessions(api: ApiClient) -> UiEvent {
    let result = api.list_sessions().await;
    if let Err(error) = &result {
        warn!(error = %format!("{error:#}"), "session list load failed");
    }
    UiEvent::Session(SessionUiEvent::ListLoaded {
        result: flatten(result),
    })
}

pub async fn create_session(api: ApiClient, session: SessionId) -> UiEvent {
    let result = flatten(api.create_session(&session).await);
    UiEvent::Session(SessionUiEvent::Created { session, result })
}

pub async fn delete_session(api: ApiClient, session: SessionId) -> UiEvent {
    let result = flatten(api.delete_session(&session).await);
    UiEvent::Session(SessionUiEvent::Deleted { session, result })
}

pub async fn load_deleted_history(api: ApiClient, session: SessionId) -> UiEvent {
    let result = api.deleted_history(&session).await;
    if let Err(error) = &result {
        warn!(session = %session, error = %format!("{error:#}"), "deleted history load failed");
    }
    UiEvent::Messages(MessageUiEvent::DeletedHistoryLoaded {
        session,
        result: flatten(result),
    })
}

pub async fn batch_delete(api: ApiClient, session: SessionId, ts_list: Vec<i64>) -> UiEvent {
    let result = flatten(api.batch_delete(&session, &ts_list).await);
    if let Ok(msg) = &result {
        debug!(session = %session, count = ts_list.len(), msg = %msg, "batch delete done");
    }
    UiEvent::Messages(MessageUiEvent::BatchDeleted {
        session,
        ts_list,
        result,
    })
}

pub async fn restore(api: ApiClient, session: SessionId, entry: DeletedKey) -> UiEvent {
    let result = flatten(api.restore(&session, entry).await);
    UiEvent::Messages(MessageUiEvent::Restored {
        session,
        entry,
        result,
    })
}

/// Restores `entries` one request at a time, in order.
///
/// A failed entry is logged and skipped; the rest still run.
pub async fn restore_batch(api: ApiClient, session: SessionId, entries: Vec<DeletedKey>) -> UiEvent {
    let mut restored = Vec::with_capacity(entries.len());
    let mut failed = Vec::new();
    for entry in entries {
        match api.restore(&session, entry).await {
            Ok(()) => restored.push(entry),
            Err(error) => {
                let error = format!("{error:#}");
                warn!(session = %session, entry = %entry, error = %error, "restore failed, continuing");
                failed.push((entry, error));
            }
        }
    }
    UiEvent::Messages(MessageUiEvent::RestoreBatchFinished {
        session,
        restored,
        failed,
    })
}

pub async fn search(api: ApiClient, query: String) -> UiEvent {
    let result = api.search(&query).await;
    if let Err(error) = &result {
        warn!(query = %query, error = %format!("{error:#}"), "search failed");
    }
    UiEvent::Session(SessionUiEvent::SearchLoaded {
        query,
        result: flatten(result),
    })
}

pub async fn load_hourly_trend(api: ApiClient, session: SessionId) -> UiEvent {
    let result = api.hourly_trend(&session).await;
    if let Err(error) = &result {
        warn!(session = %session, error = %format!("{error:#}"), "hourly trend load failed");
    }
    UiEvent::Analytics(AnalyticsUiEvent::TrendLoaded {
        session,
        result: flatten(result),
    })
}

#[cfg(test)]
mod tests {
    use chatroom_core::Config;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ApiClient {
        let config = Config {
            api_base_url: server.uri(),
            ..Default::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn key(ts: i64) -> DeletedKey {
        DeletedKey { ts, deleted_at: 500 }
    }

    /// Fails the restore of one timestamp, accepts the rest.
    struct RejectTs(i64);

    impl Respond for RejectTs {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            if body["ts_to_restore"] == json!(self.0) {
                ResponseTemplate::new(404).set_body_json(json!({ "detail": "Message not found" }))
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "msg": "Message restored successfully" }))
            }
        }
    }

    #[tokio::test]
    async fn test_restore_batch_runs_in_order_and_continues_past_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages/restore"))
            .respond_with(RejectTs(20))
            .expect(3)
            .mount(&server)
            .await;

        let event = restore_batch(
            client_for(&server),
            "alpha".to_string(),
            vec![key(10), key(20), key(30)],
        )
        .await;

        let requests = server.received_requests().await.unwrap();
        let order: Vec<i64> = requests
            .iter()
            .map(|r| {
                let body: Value = serde_json::from_slice(&r.body).unwrap();
                body["ts_to_restore"].as_i64().unwrap()
            })
            .collect();
        assert_eq!(order, [10, 20, 30]);

        let UiEvent::Messages(MessageUiEvent::RestoreBatchFinished {
            session,
            restored,
            failed,
        }) = event
        else {
            panic!("unexpected event");
        };
        assert_eq!(session, "alpha");
        assert_eq!(restored, [key(10), key(30)]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, key(20));
        assert!(failed[0].1.contains("Message not found"), "{}", failed[0].1);
    }

    #[tokio::test]
    async fn test_search_failure_is_flattened() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search_messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let event = search(client_for(&server), "hi".to_string()).await;
        let UiEvent::Session(SessionUiEvent::SearchLoaded { query, result }) = event else {
            panic!("unexpected event");
        };
        assert_eq!(query, "hi");
        assert!(result.unwrap_err().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_batch_delete_keeps_request_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages/batch_delete"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "msg": "Deleted 2 messages" })),
            )
            .mount(&server)
            .await;

        let event = batch_delete(client_for(&server), "alpha".to_string(), vec![1, 2]).await;
        let UiEvent::Messages(MessageUiEvent::BatchDeleted {
            session,
            ts_list,
            result,
        }) = event
        else {
            panic!("unexpected event");
        };
        assert_eq!(session, "alpha");
        assert_eq!(ts_list, [1, 2]);
        assert_eq!(result.as_deref(), Ok("Deleted 2 messages"));
    }
}
