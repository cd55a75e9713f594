//! Minimal HTTP/1.1 stub of the backend billing API for integration tests.
//!
//! Serves canned `{data, meta}` envelopes for the five billing routes and can
//! be told to fail the first N requests with HTTP 500 to exercise retries.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Handle to a running stub server.
pub struct ApiServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ApiServer {
    /// Number of requests the server has answered (including failures).
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a stub answering every route successfully.
pub fn start() -> ApiServer {
    start_failing_first(0)
}

/// Like `start`, but the first `fail_first` requests return HTTP 500.
pub fn start_failing_first(fail_first: usize) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handle = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                let n = hits.fetch_add(1, Ordering::SeqCst);
                handle(stream, n < fail_first);
            });
        }
    });
    ApiServer {
        base_url: format!("http://127.0.0.1:{port}"),
        hits: hits_handle,
    }
}

fn handle(mut stream: std::net::TcpStream, fail: bool) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, target) = parse_request_line(&request);
    let path = target.split('?').next().unwrap_or("");

    let (status, body) = if fail {
        ("500 Internal Server Error", r#"{"error":"injected failure"}"#.to_string())
    } else {
        route(&method, path)
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn route(method: &str, path: &str) -> (&'static str, String) {
    let ok = "200 OK";
    match (method, path) {
        ("GET", "/api/v1/billing/subscription") => (
            ok,
            envelope(
                r#"{"customerId":"cus_123","subscriptionId":"sub_456","planId":"pro","status":"active"}"#,
            ),
        ),
        ("GET", "/api/v1/billing/plans") => (
            ok,
            envelope(
                r#"[{"id":"pro","name":"Pro","priceId":"price_pro","amountCents":2990,"currency":"BRL","interval":"month"}]"#,
            ),
        ),
        ("GET", "/api/v1/billing/payment-history") => (
            ok,
            envelope(
                r#"{"payments":[{"id":"pay_1","amountCents":2990,"currency":"BRL","status":"succeeded","createdAt":"2026-08-01T12:00:00Z"}],"total":1}"#,
            ),
        ),
        ("POST", "/api/v1/billing/checkout") => (
            ok,
            envelope(r#"{"checkoutUrl":"https://pay.example/session/abc"}"#),
        ),
        ("POST", "/api/v1/billing/portal") => (
            ok,
            envelope(r#"{"portalUrl":"https://pay.example/portal/xyz"}"#),
        ),
        _ => ("404 Not Found", r#"{"error":"not found"}"#.to_string()),
    }
}

fn envelope(data: &str) -> String {
    format!(r#"{{"data":{data},"meta":{{"requestId":"req-stub"}}}}"#)
}

/// Reads the request head plus any Content-Length body; returns the head.
fn read_request(stream: &mut std::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let body_len = content_length(&head);
    let mut have = buf.len() - (head_end + 4);
    while have < body_len {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        have += n;
    }
    Some(head)
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn parse_request_line(head: &str) -> (String, String) {
    let line = head.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();
    (method, target)
}
