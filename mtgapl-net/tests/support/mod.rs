//! Minimal in-process HTTP/1.1 server serving canned responses.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone, Debug)]
pub struct Canned {
    pub status: u16,
    pub body: Vec<u8>,
    pub send_length: bool,
}

impl Canned {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            send_length: true,
        }
    }

    /// Close-delimited body, so the client sees no content length.
    pub fn ok_unsized(body: impl Into<Vec<u8>>) -> Self {
        Self {
            send_length: false,
            ..Self::ok(body)
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"stub error".to_vec(),
            send_length: true,
        }
    }
}

pub struct StubServer {
    listener: TcpListener,
    pub base_url: String,
}

impl StubServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self {
            listener,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Serves `routes` (keyed by request path) until the test runtime shuts down.
    pub fn serve(self, routes: HashMap<String, Canned>) {
        let routes = Arc::new(routes);
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = self.listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                tokio::spawn(handle(socket, routes));
            }
        });
    }
}

async fn handle(mut socket: TcpStream, routes: Arc<HashMap<String, Canned>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let canned = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Canned::status(404));

    let mut response = format!("HTTP/1.1 {} Stub\r\nConnection: close\r\n", canned.status);
    if canned.send_length {
        response.push_str(&format!("Content-Length: {}\r\n", canned.body.len()));
    }
    response.push_str("\r\n");

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.write_all(&canned.body).await;
    let _ = socket.shutdown().await;
}
