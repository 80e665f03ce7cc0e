//! Canned HTTP server for exercising the API clients in tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers.lines().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line[prefix.len()..].trim().to_string())
        })
    }
}

/// Serve one canned response per connection, in order, then stop listening.
///
/// Returns the base URL (with an `/api` prefix) and a handle resolving to the
/// captured requests.
pub async fn spawn_server(
    responses: Vec<(&'static str, String)>,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let address = listener.local_addr().expect("local address");

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status_line, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            captured.push(read_request(&mut socket).await);
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        captured
    });

    (format!("http://{address}/api"), handle)
}

pub async fn spawn_one_shot_server(
    status_line: &'static str,
    body: &str,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    spawn_server(vec![(status_line, body.to_string())]).await
}

/// Reads past the headers until `Content-Length` body bytes arrive, so tests can assert on bodies.
async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut raw = Vec::new();
    let mut buffer = [0_u8; 1024];

    let header_end = loop {
        let read = socket.read(&mut buffer).await.unwrap_or(0);
        if read == 0 {
            break raw.len();
        }
        raw.extend_from_slice(&buffer[..read]);
        if let Some(position) = raw.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let lower = line.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|value| value.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let read = socket.read(&mut buffer).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&buffer[..read]);
    }

    let mut head_lines = head.lines();
    let request_line = head_lines.next().unwrap_or_default().to_string();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let headers = head_lines.collect::<Vec<_>>().join("\n");
    let body = String::from_utf8_lossy(&raw[header_end..]).to_string();

    CapturedRequest {
        method,
        path,
        headers,
        body,
    }
}
