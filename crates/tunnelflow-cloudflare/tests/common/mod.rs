use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned-response HTTP server standing in for the Cloudflare API.
///
/// Routes are keyed by `"METHOD /path?query"`. Unrouted requests get the
/// Cloudflare "No route for that URI" error envelope. Every request line is
/// appended to the shared log so tests can assert on the exact write calls
/// a workflow performed.
pub struct MockApi {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    pub async fn serve(routes: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: HashMap<String, String> = routes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    handle(stream, routes, log).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Request lines seen so far, e.g. `"PUT /zones/z1/dns_records/r1"`.
    pub fn seen(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.seen().iter().filter(|r| r.starts_with(prefix)).count()
    }
}

async fn handle(
    mut stream: tokio::net::TcpStream,
    routes: HashMap<String, String>,
    log: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    loop {
        match stream.read(&mut buf[read..]).await {
            Ok(0) => break,
            Ok(n) => {
                read += n;
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
                if read == buf.len() {
                    break;
                }
            }
            Err(_) => return,
        }
    }

    let request = String::from_utf8_lossy(&buf[..read]).into_owned();
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let key = format!("{} {}", method, target);
    log.lock().unwrap().push(key.clone());

    let body = routes.get(&key).cloned().unwrap_or_else(|| {
        r#"{"success": false, "result": null, "errors": [{"code": 7000, "message": "No route for that URI"}]}"#
            .to_string()
    });
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
