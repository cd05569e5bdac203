//! Loopback HTTP platform shared by the integration tests.
//!
//! Each scripted response is served on its own connection; the parsed
//! requests are handed back when the server thread is joined.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// One request as it arrived on the wire.
#[derive(Debug, Clone)]
pub struct Captured {
    /// `"POST /v3/jobs/submit HTTP/1.1"`
    pub line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    /// First header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A running loopback server.
pub struct Loopback {
    pub base: String,
    handle: JoinHandle<Vec<Captured>>,
}

impl Loopback {
    /// Wait for every scripted response to be served.
    pub fn requests(self) -> Vec<Captured> {
        self.handle.join().expect("server thread")
    }

    /// Wait for the single scripted response to be served.
    pub fn request(self) -> Captured {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request: {requests:?}");
        requests.remove(0)
    }
}

/// Serve `responses` in order, one connection each.
pub fn serve(responses: Vec<Vec<u8>>) -> Loopback {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let handle = std::thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            seen.push(read_request(&mut stream));
            let _ = stream.write_all(&response);
        }
        seen
    });
    Loopback {
        base: format!("http://127.0.0.1:{port}"),
        handle,
    }
}

/// Serve each body as a `200 OK` JSON response.
pub fn serve_json(bodies: &[&str]) -> Loopback {
    serve(
        bodies
            .iter()
            .map(|body| {
                http_response(
                    200,
                    "OK",
                    "Content-Type: application/json\r\n",
                    body.as_bytes(),
                )
            })
            .collect(),
    )
}

/// A complete HTTP/1.1 response. `extra` holds additional header lines,
/// each ending in `\r\n`.
pub fn http_response(code: u16, reason: &str, extra: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 {code} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n{extra}\r\n",
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

/// Read one request: the head, then as many body bytes as it announces.
fn read_request(stream: &mut impl Read) -> Captured {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let mut head_end = None;
    let mut length = 0;
    loop {
        if let Some(end) = head_end
            && data.len() >= end + 4 + length
        {
            break;
        }
        let Ok(n) = stream.read(&mut buf) else {
            break;
        };
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if head_end.is_none()
            && let Some(end) = find_head_end(&data)
        {
            head_end = Some(end);
            length = content_length(&String::from_utf8_lossy(&data[..end]));
        }
    }

    let end = head_end.unwrap_or(data.len());
    let head = String::from_utf8_lossy(&data[..end]).into_owned();
    let mut lines = head.split("\r\n");
    let line = lines.next().unwrap_or_default().to_string();
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();
    let body = data.get(end + 4..).unwrap_or_default().to_vec();
    Captured {
        line,
        headers,
        body,
    }
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0)
}
