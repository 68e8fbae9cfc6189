//! HTTP response sanitization and truncation tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use iym::providers::{check_http_response, sanitize_http_error_body, ProviderError};

async fn serve_once(status_line: &str, body: &str) -> String {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut read_buf = [0_u8; 2048];
            let _ = socket.read(&mut read_buf).await;

            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}/")
}

async fn fetch_checked(status_line: &str, body: &str) -> Result<String, ProviderError> {
    let url = serve_once(status_line, body).await;
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    check_http_response(response).await
}

#[tokio::test]
async fn check_http_response_redacts_provider_keys() {
    let raw_token = "gsk_abcdefghijklmnopqrstuvwxyz1234";
    let body = format!("invalid api key {raw_token}");

    match fetch_checked("401 Unauthorized", &body).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_token));
            assert!(body.contains("[REDACTED]"));
        }
        Err(other) => panic!("expected http status error, got: {other}"),
        Ok(_) => panic!("response should fail on non-success status"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let body = "x".repeat(400);

    match fetch_checked("500 Internal Server Error", &body).await {
        Err(ProviderError::HttpStatus { body, .. }) => {
            assert!(body.ends_with("...[truncated]"));
            assert_eq!(body.chars().filter(|c| *c == 'x').count(), 256);
        }
        Err(other) => panic!("expected http status error, got: {other}"),
        Ok(_) => panic!("response should fail on non-success status"),
    }
}

#[tokio::test]
async fn check_http_response_returns_body_on_success() {
    match fetch_checked("200 OK", "{\"ok\":true}").await {
        Ok(body) => assert_eq!(body, "{\"ok\":true}"),
        Err(err) => panic!("success status should pass: {err}"),
    }
}

#[test]
fn sanitize_collapses_whitespace_and_redacts_bearer() {
    let cleaned = sanitize_http_error_body("bad\n\n  header   Bearer fw_abcdefghijklmnop1234");
    assert!(cleaned.starts_with("bad header"));
    assert!(!cleaned.contains("fw_abcdefghijklmnop1234"));
}
