//! HTTP client against a loopback fake backend.
//!
//! Exercises: fetch_current_target, fetch_session_info, submit_label and the
//! mapping of transport failures and non-2xx statuses onto ApiError.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crlabel_core::client::{AnnotationApi, HttpClient};
use crlabel_core::error::ApiError;
use crlabel_core::types::{Label, Side};

type Responder = dyn Fn(&str, &str) -> (u16, String) + Send + Sync;

/// Serves every connection with `respond(method, path_and_query)` and records
/// the decoded request lines.
fn fake_backend(respond: Box<Responder>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // Drain headers; none of these requests carry a body.
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }

            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_owned();
            let target = parts
                .next()
                .unwrap_or_default()
                .replace("%20", " ")
                .replace('+', " ");
            log.lock().unwrap().push(format!("{method} {target}"));

            let (status, body) = respond(&method, &target);
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{addr}"), seen)
}

fn client(base: &str) -> HttpClient {
    HttpClient::new(base, Duration::from_secs(5))
}

const TARGET_JSON: &str = r#"{"id":"abc_123","url":"https://review.example.org/c/1/2/a.py@10","startLine":2,"endLine":3,"content":"rename this","side":"REVISION","oldCode":"x = 1\n","newCode":"y = 1\nz = 2\nw = 3\n"}"#;

#[test]
fn fetches_target_and_info() {
    let (base, seen) = fake_backend(Box::new(|_, path| match path {
        "/api/target" => (200, TARGET_JSON.to_owned()),
        "/api/info" => (
            200,
            r#"{"currentAnnotatorEmail":"me@example.org","kirpendorffAlpha":0.4216,"totalReadyCount":17,"annotatedByCurrentCount":5}"#
                .to_owned(),
        ),
        _ => (404, String::new()),
    }));
    let api = client(&format!("{base}/"));

    let target = api.fetch_current_target().unwrap();
    assert_eq!(target.identifier.as_deref(), Some("abc_123"));
    assert_eq!(target.side, Side::Revision);
    assert_eq!(target.comment_range(), (2, 3));

    let info = api.fetch_session_info().unwrap();
    assert_eq!(info.annotator_identity, "me@example.org");
    assert_eq!(info.total_ready_count, 17);
    assert_eq!(info.stat_lines()[0], "Kirpendorff's alpha: 0.422");

    assert_eq!(*seen.lock().unwrap(), ["GET /api/target", "GET /api/info"]);
}

#[test]
fn submits_wire_literal_as_query_parameter() {
    let (base, seen) = fake_backend(Box::new(|method, _| match method {
        "PUT" => (200, String::new()),
        _ => (405, String::new()),
    }));
    let api = client(&base);

    api.submit_label(Label::FalsePositive).unwrap();
    api.submit_label(Label::Skip).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        ["PUT /api/target?label=FALSE POSITIVE", "PUT /api/target?label=SKIP"]
    );
}

#[test]
fn non_success_status_is_server_error() {
    let (base, _) = fake_backend(Box::new(|_, _| (503, "busy".to_owned())));
    let api = client(&base);

    let err = api.fetch_current_target().unwrap_err();
    assert_eq!(err, ApiError::Server { status: 503, body: "busy".into() });
    assert!(err.is_transient());

    let (base, _) = fake_backend(Box::new(|_, _| (400, String::new())));
    let err = client(&base).submit_label(Label::Discuss).unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 400, .. }));
    assert!(!err.is_transient());
}

#[test]
fn undecodable_body_is_invalid_response() {
    let (base, _) = fake_backend(Box::new(|_, _| (200, "{\"nope\":".to_owned())));
    let err = client(&base).fetch_session_info().unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)), "{err:?}");
}

#[test]
fn refused_connection_is_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = client(&format!("http://127.0.0.1:{port}"))
        .fetch_current_target()
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    assert!(err.is_transient());
}
