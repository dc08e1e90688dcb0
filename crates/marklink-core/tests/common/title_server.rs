//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by request path and records each request's path and
//! headers so tests can assert on what the client sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One canned response.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Extra header lines, e.g. `Location: /elsewhere`.
    pub headers: Vec<String>,
    /// Sleep before answering (for timeout tests).
    pub delay: Option<Duration>,
}

impl Route {
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/html; charset=utf-8",
            body: body.into(),
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: "application/json",
            ..Self::html(body)
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            ..Self::html("")
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            headers: vec![format!("Location: {location}")],
            ..Self::status("302 Found")
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Path including query string.
    pub target: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
}

pub struct TitleServer {
    base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl TitleServer {
    /// Starts a server in a background thread. Unknown paths get 404. The server
    /// runs until the process exits.
    pub fn start(routes: Vec<(&'static str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || handle(stream, &routes, &recorded));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    /// `http://127.0.0.1:<port>`, no trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for `path` (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<&'static str, Route>, recorded: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&data);
    let Some(request) = parse_request(&request) else {
        return;
    };
    let route = routes
        .get(request.target.split('?').next().unwrap_or(""))
        .cloned()
        .unwrap_or_else(|| Route::status("404 Not Found"));
    recorded.lock().unwrap().push(request);

    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    for header in &route.headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}

fn parse_request(request: &str) -> Option<Recorded> {
    let mut lines = request.lines();
    let target = lines.next()?.split_whitespace().nth(1)?.to_string();
    let mut headers = HashMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    Some(Recorded { target, headers })
}
