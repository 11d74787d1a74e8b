//! End-to-end tests against a mock HTTP server: real `HttpTransport`,
//! real dispatcher and watchdog, wiremock on the other side of the wire.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xjcp_client::{Client, ClientConfig, ClientError, Event, EventHandler, TransportError};

/// A keep-alive long enough that no ping interferes with the exchange
/// under test.
fn quiet_config(host: String) -> ClientConfig {
    ClientConfig::new(host).keep_alive_interval(Duration::from_secs(60))
}

/// Decode the `msg` form field back into the JSON envelope.
fn envelope_of(body: &[u8]) -> Value {
    let body = std::str::from_utf8(body).expect("utf-8 form body");
    let encoded = body
        .strip_prefix("msg=")
        .expect("single form field named msg")
        .replace('+', " ");
    let json = percent_decode_str(&encoded)
        .decode_utf8()
        .expect("percent-decoded utf-8");
    serde_json::from_str(&json).expect("valid envelope JSON")
}

#[tokio::test]
async fn login_then_message_with_pushed_events() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("%22user%22"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id": "abc", "events": [{"type": "welcome"}, {"type": "unread", "conversation": "c1"}]}"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("%22message%22"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"onMessage": "delivered"}"#),
        )
        .mount(&server)
        .await;

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_in_handler = Arc::clone(&seen);
    let handler: Arc<dyn EventHandler> = Arc::new(move |event: &Event| {
        seen_in_handler.lock().push(event.kind.clone());
    });

    let client = Client::with_handler(quiet_config(server.uri()), handler).unwrap();

    let logged_in = client.login("alice", "secret").wait().await.unwrap();
    assert!(logged_in);
    assert_eq!(*seen.lock(), vec!["welcome".to_string(), "unread".to_string()]);

    let receipt = client.send_message("c1", "hello").wait().await.unwrap();
    assert_eq!(receipt, "delivered");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let login_envelope = envelope_of(&requests[0].body);
    assert_eq!(login_envelope["user"], "alice");
    assert!(login_envelope.get("id").is_none());

    let message_envelope = envelope_of(&requests[1].body);
    assert_eq!(message_envelope["id"], "abc");
    assert_eq!(message_envelope["message"]["conversation"], "c1");
    assert_eq!(message_envelope["message"]["message"], "hello");

    client.shutdown().await;
}

#[tokio::test]
async fn failed_login_leaves_the_session_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = Client::new(quiet_config(server.uri())).unwrap();

    let logged_in = client.login("alice", "wrong").wait().await.unwrap();
    assert!(!logged_in);

    // The next envelope still goes out without a session id.
    let chats = client.request_chats().wait().await.unwrap();
    assert!(chats.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(envelope_of(&requests[1].body).get("id").is_none());

    client.shutdown().await;
}

#[tokio::test]
async fn conversation_list_decodes_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"onGetChats": [{"id": "a", "name": "First"}, {"id": "b", "name": "Second"}]}"#,
        ))
        .mount(&server)
        .await;

    let client = Client::new(quiet_config(server.uri())).unwrap();
    let chats = client.request_chats().wait().await.unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].name, "First");
    assert_eq!(chats[1].name, "Second");

    client.shutdown().await;
}

#[tokio::test]
async fn server_error_status_fails_the_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::new(quiet_config(server.uri())).unwrap();
    let outcome = client.send_message("c1", "hello").wait().await;
    assert_matches!(
        outcome,
        Err(ClientError::Transport(TransportError::Status { status: 500 }))
    );

    client.shutdown().await;
}

#[tokio::test]
async fn shutdown_rejects_later_submissions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = Client::new(quiet_config(server.uri())).unwrap();
    client.shutdown().await;

    let outcome = client.request_contacts().wait().await;
    assert_matches!(outcome, Err(ClientError::Closed));
}

#[tokio::test]
async fn keep_alive_pings_an_idle_authenticated_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("%22user%22"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id": "abc"}"#))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).keep_alive_interval(Duration::from_millis(50));
    let client = Client::new(config).unwrap();

    assert!(client.login("alice", "secret").wait().await.unwrap());

    // Idle past several intervals; the watchdog should ping on its own.
    tokio::time::sleep(Duration::from_millis(400)).await;

    let requests = server.received_requests().await.unwrap();
    let pings = requests
        .iter()
        .skip(1)
        .filter(|r| {
            let envelope = envelope_of(&r.body);
            envelope["id"] == "abc" && envelope.as_object().is_some_and(|o| o.len() == 1)
        })
        .count();
    assert!(pings >= 1, "expected at least one keep-alive ping");

    client.shutdown().await;
}
