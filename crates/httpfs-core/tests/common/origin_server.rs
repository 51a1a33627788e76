//! Minimal HTTP/1.1 origin for integration tests.
//!
//! Serves a fixed set of routes for HEAD and GET and answers 404 for anything
//! else. Every response carries `Content-Length` and `Connection: close`;
//! `/truncated.txt` deliberately declares a longer body than it sends.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const CONTENT: &str = "Hello World!";
pub const MIME_TYPE: &str = "text/plain";
pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";
pub const LAST_MODIFIED_TS: i64 = 1_445_412_480;
pub const LARGE_LEN: usize = 256 * 1024;

struct Route {
    status: &'static str,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

pub struct OriginServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl OriginServer {
    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn large_body() -> Vec<u8> {
    (0u8..=250).cycle().take(LARGE_LEN).collect()
}

fn routes() -> HashMap<&'static str, Route> {
    let mut routes = HashMap::new();
    routes.insert(
        "/file.txt",
        Route {
            status: "200 OK",
            headers: vec![
                ("Content-Type", MIME_TYPE.to_string()),
                ("Last-Modified", LAST_MODIFIED.to_string()),
            ],
            body: CONTENT.as_bytes().to_vec(),
        },
    );
    routes.insert(
        "/shouty.html",
        Route {
            status: "200 OK",
            headers: vec![
                ("CONTENT-TYPE", "text/html; charset=ASCII".to_string()),
                ("X-Blank", " ".to_string()),
                ("last-MODIFIED", "1445412480".to_string()),
            ],
            body: b"<p>hi</p>".to_vec(),
        },
    );
    routes.insert(
        "/report:2023.txt",
        Route {
            status: "200 OK",
            headers: vec![("Content-Type", MIME_TYPE.to_string())],
            body: b"q4 numbers".to_vec(),
        },
    );
    // Declares more bytes than it sends, then hangs up.
    routes.insert(
        "/truncated.txt",
        Route {
            status: "200 OK",
            headers: vec![
                ("Content-Type", MIME_TYPE.to_string()),
                ("Content-Length", "100".to_string()),
            ],
            body: b"Hello".to_vec(),
        },
    );
    routes.insert(
        "/old.txt",
        Route {
            status: "301 Moved Permanently",
            headers: vec![("Location", "/file.txt".to_string())],
            body: Vec::new(),
        },
    );
    routes.insert(
        "/broken.txt",
        Route {
            status: "500 Internal Server Error",
            headers: Vec::new(),
            body: b"boom".to_vec(),
        },
    );
    routes.insert(
        "/large.bin",
        Route {
            status: "200 OK",
            headers: vec![("Content-Type", "application/octet-stream".to_string())],
            body: large_body(),
        },
    );
    routes
}

/// Starts the server on a background thread. It runs until the process exits.
pub fn start() -> OriginServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes());
    let hits = Arc::new(AtomicUsize::new(0));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    OriginServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<&'static str, Route>, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, target) = match parse_request_line(&request) {
        Some(parts) => parts,
        None => return,
    };
    hits.fetch_add(1, Ordering::SeqCst);

    let not_found = Route {
        status: "404 Not Found",
        headers: vec![("Content-Type", "text/plain".to_string())],
        body: b"Not Found".to_vec(),
    };
    let route = routes.get(target.as_str()).unwrap_or(&not_found);

    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", route.status);
    let declares_length = route
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("Content-Length"));
    if !declares_length {
        head.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
    }
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");

    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(&route.body);
    }
    let _ = stream.flush();
}

/// Reads until the blank line that ends the request head.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
        if data.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(data).ok().filter(|s| !s.is_empty())
}

/// Returns (method, path without query).
fn parse_request_line(request: &str) -> Option<(String, String)> {
    let mut parts = request.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let path = target.split('?').next().unwrap_or(target).to_string();
    Some((method, path))
}
