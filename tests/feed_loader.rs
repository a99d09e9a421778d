use devlog::error::DevlogError;
use devlog::infrastructure::{FeedClient, FeedSource};
use reqwest::Client;
use std::io::Write;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

/// Answers a single HTTP request and hands back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_lowercase()
    });

    (format!("http://{addr}/data/devlogs.json"), handle)
}

#[tokio::test]
async fn remote_feed_is_fetched_without_cache() {
    let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"games":[]}"#).await;
    let feed = FeedClient::new(client(), FeedSource::parse(&url).unwrap());

    let payload = feed.load().await.unwrap();
    assert_eq!(payload["games"], serde_json::json!([]));

    let request = server.await.unwrap();
    assert!(request.starts_with("get /data/devlogs.json"));
    assert!(request.contains("cache-control: no-cache, no-store"));
    assert!(request.contains("pragma: no-cache"));
}

#[tokio::test]
async fn unsuccessful_status_is_a_load_failure() {
    let (url, server) = serve_once("HTTP/1.1 404 Not Found", "{}").await;
    let feed = FeedClient::new(client(), FeedSource::parse(&url).unwrap());

    let err = feed.load().await.unwrap_err();
    assert!(matches!(err, DevlogError::Status(status) if status.as_u16() == 404));
    assert!(err.is_load_failure());
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_a_load_failure() {
    let (url, server) = serve_once("HTTP/1.1 200 OK", "<html>not json</html>").await;
    let feed = FeedClient::new(client(), FeedSource::parse(&url).unwrap());

    let err = feed.load().await.unwrap_err();
    assert!(matches!(err, DevlogError::Serialization(_)));
    assert!(err.is_load_failure());
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_host_is_a_load_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/devlogs.json");
    let feed = FeedClient::new(client(), FeedSource::parse(&url).unwrap());
    let err = feed.load().await.unwrap_err();
    assert!(matches!(err, DevlogError::Network(_)));
}

#[tokio::test]
async fn local_feed_is_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"posts":[{{"id":"p1","title":"T","summary":"S","tag":"Tag"}}]}}"#).unwrap();

    let source = FeedSource::parse(file.path().to_str().unwrap()).unwrap();
    let payload = FeedClient::new(client(), source).load().await.unwrap();
    assert_eq!(payload["posts"][0]["id"], "p1");
}

#[tokio::test]
async fn missing_local_feed_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devlogs.json");
    let feed = FeedClient::new(client(), FeedSource::Local(path));

    let err = feed.load().await.unwrap_err();
    assert!(matches!(err, DevlogError::Io(_)));
    assert!(err.is_load_failure());
}
