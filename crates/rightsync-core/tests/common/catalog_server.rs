//! Minimal HTTP/1.1 catalog server for integration tests.
//!
//! Serves fixed bodies by path. The login path checks the `Authorization`
//! header and sets a session cookie; every other path requires that cookie.
//! Each response closes the connection. Hits are counted per path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const SESSION_COOKIE: &str = "_session_id=integration";

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u32,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }
}

pub struct CatalogServer {
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl CatalogServer {
    /// Number of requests seen for `path` (query string excluded).
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Starts the server in a background thread. `login_path` accepts only
/// `expected_auth` as its `Authorization` value. The server runs until the
/// process exits.
pub fn start(
    login_path: &str,
    expected_auth: &str,
    routes: HashMap<String, Route>,
) -> CatalogServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let state = Arc::new((login_path.to_string(), expected_auth.to_string(), routes));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || {
                let (login_path, expected_auth, routes) = &*state;
                handle(stream, login_path, expected_auth, routes, &hits)
            });
        }
    });
    CatalogServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    login_path: &str,
    expected_auth: &str,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_head(&mut stream) else {
        return;
    };
    let (path, headers) = parse_request(&request);
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    if path == login_path {
        if headers.get("authorization").map(String::as_str) != Some(expected_auth) {
            respond(&mut stream, 401, "text/plain", b"unauthorized", None);
            return;
        }
        respond(&mut stream, 204, "text/plain", b"", Some(SESSION_COOKIE));
        return;
    }

    let has_session = headers
        .get("cookie")
        .map(|c| c.contains(SESSION_COOKIE))
        .unwrap_or(false);
    if !has_session {
        respond(&mut stream, 401, "text/plain", b"login required", None);
        return;
    }
    match routes.get(&path) {
        Some(route) => {
            respond(&mut stream, route.status, route.content_type, &route.body, None)
        }
        None => respond(&mut stream, 404, "text/plain", b"not found", None),
    }
}

/// Reads until the blank line ending the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

/// Returns the request path without query and lower-cased header names.
fn parse_request(request: &str) -> (String, HashMap<String, String>) {
    let mut lines = request.lines();
    let target = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target).to_string();
    let headers = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    (path, headers)
}

fn respond(
    stream: &mut TcpStream,
    status: u32,
    content_type: &str,
    body: &[u8],
    cookie: Option<&str>,
) {
    let reason = match status {
        200 => "OK",
        204 => "No Content",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Status",
    };
    let set_cookie = cookie
        .map(|c| format!("Set-Cookie: {}; Path=/\r\n", c))
        .unwrap_or_default();
    let length = if status == 204 {
        String::new()
    } else {
        format!("Content-Length: {}\r\n", body.len())
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n{}{}Connection: close\r\n\r\n",
        status, reason, content_type, length, set_cookie
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
