//! End-to-end tests of the blocking HTTP transport against a mock server.
//!
//! The mock server runs on its own tokio runtime; the blocking client is
//! driven from the test thread, outside any async context.

use codeauth_client::{
    CodeAuth, ErrorCode, HttpTransport, HttpTransportConfig, InvalidateType, JsonObject,
    SdkConfig, Transport, TransportError,
};
use serde_json::json;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::thread;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn transport() -> HttpTransport {
    HttpTransport::new(HttpTransportConfig::new().with_scheme("http")).unwrap()
}

fn endpoint(server: &MockServer) -> String {
    server.address().to_string()
}

#[test]
fn test_status_200_stamps_no_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/signin/email"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"project_id": "proj1", "email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server),
    );

    let mut body = JsonObject::new();
    body.insert("project_id".to_string(), json!("proj1"));
    body.insert("email".to_string(), json!("a@b.com"));

    let response = transport()
        .post(&endpoint(&server), "/signin/email", &body)
        .unwrap();
    assert_eq!(response["error"], "no_error");

    rt.block_on(server.verify());
}

#[test]
fn test_status_200_overwrites_error_field() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/signin/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "stale"})))
            .mount(&server),
    );

    let response = transport()
        .post(&endpoint(&server), "/signin/email", &JsonObject::new())
        .unwrap();
    assert_eq!(response["error"], "no_error");
}

#[test]
fn test_error_status_keeps_body() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/signin/emailverify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad_code"})))
            .mount(&server),
    );

    let response = transport()
        .post(&endpoint(&server), "/signin/emailverify", &JsonObject::new())
        .unwrap();
    assert_eq!(response["error"], "bad_code");
}

#[test]
fn test_non_json_body_is_transport_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server),
    );

    let err = transport()
        .post(&endpoint(&server), "/session/info", &JsonObject::new())
        .unwrap_err();
    assert!(matches!(err, TransportError::Json(_)));
}

#[test]
fn test_non_object_body_is_transport_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
            .mount(&server),
    );

    let err = transport()
        .post(&endpoint(&server), "/session/info", &JsonObject::new())
        .unwrap_err();
    assert!(matches!(err, TransportError::UnexpectedBody(_)));
}

/// Read one HTTP request (headers plus `Content-Length` body) off a raw socket.
fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return;
            }
        }
    }
}

#[test]
fn test_truncated_body_is_body_error() {
    // Promises 64 bytes of body, sends 10, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"session_",
            )
            .unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut rest = Vec::new();
        let _ = stream.read_to_end(&mut rest);
    });

    let err = transport()
        .post(&address, "/session/info", &JsonObject::new())
        .unwrap_err();
    assert!(matches!(err, TransportError::Body(_)), "got {err:?}");
    assert_eq!(err.code(), ErrorCode::ConnectionError);

    server.join().unwrap();
}

#[test]
fn test_full_session_lifecycle_over_http() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/signin/emailverify"))
            .and(body_json(json!({
                "project_id": "proj1",
                "email": "a@b.com",
                "code": "123456"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_token": "tok1",
                "email": "a@b.com",
                "expiration": 1700000000,
                "refresh_left": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Served from cache, never requested
        Mock::given(method("POST"))
            .and(path("/session/info"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/session/refresh"))
            .and(body_json(json!({"project_id": "proj1", "session_token": "tok1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_token": "tok2",
                "email": "a@b.com",
                "expiration": 1700003600,
                "refresh_left": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/session/invalidate"))
            .and(body_json(json!({
                "project_id": "proj1",
                "session_token": "tok2",
                "invalidate_type": "all"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
    });

    let auth = CodeAuth::with_http_config(HttpTransportConfig::new().with_scheme("http")).unwrap();
    auth.initialize(SdkConfig::new(endpoint(&server), "proj1").with_cache_secs(30))
        .unwrap();

    let record = auth.sign_in_email_verify("a@b.com", "123456").unwrap();
    assert_eq!(record.session_token, "tok1");

    let info = auth.session_info("tok1").unwrap();
    assert_eq!(info, record);

    let refreshed = auth.session_refresh("tok1").unwrap();
    assert_eq!(refreshed.session_token, "tok2");
    assert_eq!(refreshed.refresh_left, 4);

    let cache = auth.cache().unwrap();
    assert!(cache.contains("tok2"));
    assert!(!cache.contains("tok1"));

    auth.session_invalidate("tok2", InvalidateType::All).unwrap();
    assert!(!cache.contains("tok2"));

    rt.block_on(server.verify());
}

#[test]
fn test_remote_error_over_http() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/session/info"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "bad_session_token"})),
            )
            .expect(2)
            .mount(&server),
    );

    let auth = CodeAuth::initialized(
        transport(),
        SdkConfig::new(endpoint(&server), "proj1").with_cache_secs(30),
    );

    for _ in 0..2 {
        let err = auth.session_info("tok1").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::BadSessionToken));
    }
    assert!(auth.cache().unwrap().is_empty());

    rt.block_on(server.verify());
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let auth = CodeAuth::initialized(
        transport(),
        SdkConfig::new("127.0.0.1:1", "proj1").with_cache_secs(30),
    );

    let err = auth.sign_in_email("a@b.com").unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(err.code(), Some(ErrorCode::ConnectionError));
}
