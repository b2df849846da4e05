//! End-to-end tests for the API and Web listeners over real sockets.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use twin_listeners::handlers::{API_METHOD_NOT_ALLOWED, REQUEST_COMPLETED};
use twin_listeners::{ListenerConfig, Listeners, RunningListeners, ServerError};

async fn start() -> RunningListeners {
    Listeners::new(&ListenerConfig::ephemeral())
        .unwrap()
        .start()
        .await
        .unwrap()
}

async fn send(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    method: Method,
    path: &str,
) -> (StatusCode, String, String) {
    let response = client
        .request(method, format!("http://{}{}", addr, path))
        .send()
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    (status, content_type, response.text().await.unwrap())
}

#[tokio::test]
async fn test_api_post_completes() {
    let listeners = start().await;
    let client = reqwest::Client::new();

    let (status, content_type, body) = send(&client, listeners.api_addr(), Method::POST, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, REQUEST_COMPLETED);

    listeners.stop().await.unwrap();
}

#[tokio::test]
async fn test_api_rejects_non_post() {
    let listeners = start().await;
    let client = reqwest::Client::new();

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, content_type, body) =
            send(&client, listeners.api_addr(), method.clone(), "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(content_type, "text/html");
        assert_eq!(body, API_METHOD_NOT_ALLOWED);
    }

    listeners.stop().await.unwrap();
}

#[tokio::test]
async fn test_web_accepts_get_post_put_and_queries() {
    let listeners = start().await;
    let client = reqwest::Client::new();

    let cases = [
        (Method::GET, "/"),
        (Method::POST, "/"),
        (Method::PUT, "/"),
        (Method::GET, "/test?param=value"),
        (Method::DELETE, "/some/other/path?a=1&b=2"),
    ];
    for (method, path) in cases {
        let (status, content_type, body) = send(&client, listeners.web_addr(), method, path).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(content_type, "text/html");
        assert_eq!(body, REQUEST_COMPLETED);
    }

    listeners.stop().await.unwrap();
}

#[tokio::test]
async fn test_listeners_use_distinct_ports() {
    let listeners = start().await;
    assert_ne!(listeners.api_addr().port(), 0);
    assert_ne!(listeners.web_addr().port(), 0);
    assert_ne!(listeners.api_addr(), listeners.web_addr());
    listeners.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_drains_idle_keep_alive_connections() {
    let listeners = start().await;
    let client = reqwest::Client::new();
    let api_addr = listeners.api_addr();

    // Leaves a pooled keep-alive connection open on the API listener.
    let (status, _, _) = send(&client, api_addr, Method::POST, "/").await;
    assert_eq!(status, StatusCode::OK);

    timeout(Duration::from_secs(5), listeners.stop())
        .await
        .expect("shutdown should not hang on idle connections")
        .unwrap();

    assert!(TcpStream::connect(api_addr).await.is_err());
}

#[tokio::test]
async fn test_stop_lets_in_flight_request_complete() {
    let listeners = start().await;
    let mut stream = TcpStream::connect(listeners.api_addr()).await.unwrap();

    stream
        .write_all(b"POST / HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stopping = tokio::spawn(listeners.stop());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!stopping.is_finished());

    stream.write_all(b"Content-Length: 0\r\n\r\n").await.unwrap();
    let mut response = String::new();
    timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
        .await
        .expect("response should arrive during drain")
        .unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{}", response);
    assert!(response.contains("content-type: text/html\r\n"));
    assert!(response.ends_with(REQUEST_COMPLETED));

    timeout(Duration::from_secs(5), stopping)
        .await
        .expect("stop should resolve once the request is served")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_start_fails_when_port_taken() {
    let first = start().await;
    let config = ListenerConfig {
        api_port: first.api_addr().port(),
        ..ListenerConfig::ephemeral()
    };

    let err = Listeners::new(&config).unwrap().start().await.unwrap_err();
    assert!(matches!(err, ServerError::Bind { addr, .. } if addr.port() == config.api_port));

    first.stop().await.unwrap();
}

#[tokio::test]
async fn test_construction_does_not_bind() {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();

    // Port is held by `probe`; constructing must still succeed.
    let config = ListenerConfig {
        api_port: port,
        web_port: port,
        ..Default::default()
    };
    let listeners = Listeners::new(&config).unwrap();
    assert_eq!(listeners.api().addr().port(), port);
    assert_eq!(listeners.web().addr().port(), port);
    drop(probe);
}
