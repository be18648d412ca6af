use profilematch::domain::error::EmbeddingError;
use profilematch::domain::ports::embedding_port::EmbeddingProvider;
use profilematch::infrastructure::embeddings::remote::RemoteProvider;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Handle;

/// Serve `body` with `status` to every connection; returns the base URL.
async fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

/// Read headers and a `Content-Length` body so the client sees its request consumed.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(n) = socket.read(&mut chunk).await else { return };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

fn provider(url: String, dimension: usize) -> Arc<RemoteProvider> {
    Arc::new(RemoteProvider::new(Handle::current(), String::new(), None, Some(url), dimension))
}

async fn encode_off_runtime(p: Arc<RemoteProvider>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let text = text.to_string();
    tokio::task::spawn_blocking(move || p.encode(&text)).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_encode_parses_embedding() {
    let url = serve("200 OK", r#"{"data":[{"embedding":[0.25,0.5,1.0]}]}"#).await;
    let p = provider(url, 3);
    p.load().unwrap();
    let v = encode_off_runtime(p, "fintech expert").await.unwrap();
    assert_eq!(v, vec![0.25, 0.5, 1.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_requires_load() {
    let url = serve("200 OK", r#"{"data":[{"embedding":[0.25,0.5,1.0]}]}"#).await;
    let p = provider(url, 3);
    assert_eq!(encode_off_runtime(p, "x").await, Err(EmbeddingError::ModelNotLoaded));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrong_dimension_is_rejected() {
    let url = serve("200 OK", r#"{"data":[{"embedding":[0.25,0.5]}]}"#).await;
    let p = provider(url, 3);
    p.load().unwrap();
    assert_eq!(
        encode_off_runtime(p, "x").await,
        Err(EmbeddingError::DimensionMismatch { expected: 3, actual: 2 })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_error_is_encoding_failure() {
    let url = serve("500 Internal Server Error", r#"{"error":"overloaded"}"#).await;
    let p = provider(url, 3);
    p.load().unwrap();
    let err = encode_off_runtime(p, "x").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::EncodingFailure(msg) if msg.contains("500")));
}
