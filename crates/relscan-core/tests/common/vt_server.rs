//! Minimal HTTP/1.1 stand-in for the VirusTotal v3 files/analyses endpoints.
//!
//! `POST /api/v3/files` accepts a multipart upload and answers with a self-link
//! to `/api/v3/analyses/test-analysis`; `GET` on that link returns a report whose
//! `meta.file_info.sha256` is the SHA-256 of the uploaded part.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use relscan_core::digest::digest_bytes;

const ANALYSIS_PATH: &str = "/api/v3/analyses/test-analysis";

#[derive(Debug, Clone)]
pub struct VtServerOptions {
    /// Requests whose `x-apikey` differs get 401.
    pub api_key: String,
    /// Status for an authorized upload (200 = normal flow).
    pub upload_status: u16,
    /// Status for an authorized report fetch.
    pub report_status: u16,
    /// Replaces the generated report body when set.
    pub report_body: Option<String>,
}

impl Default for VtServerOptions {
    fn default() -> Self {
        Self {
            api_key: "test-key".to_string(),
            upload_status: 200,
            report_status: 200,
            report_body: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct State {
    requests: Vec<RecordedRequest>,
    uploaded: Option<Vec<u8>>,
}

pub struct VtServer {
    /// API root to hand to the client, e.g. `http://127.0.0.1:12345/api/v3`.
    pub api_base_url: String,
    state: Arc<Mutex<State>>,
}

impl VtServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(opts: VtServerOptions) -> VtServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let origin = format!("http://127.0.0.1:{}", port);
    let state = Arc::new(Mutex::new(State::default()));
    let state_srv = Arc::clone(&state);
    let origin_srv = origin.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &opts, &origin_srv, &state_srv);
        }
    });
    VtServer {
        api_base_url: format!("{}/api/v3", origin),
        state,
    }
}

fn handle(mut stream: TcpStream, opts: &VtServerOptions, origin: &str, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let authorized = req.header("x-apikey") == Some(opts.api_key.as_str());
    let (status, body) = if !authorized {
        (
            401,
            r#"{"error": {"code": "WrongCredentialsError", "message": "Wrong API key"}}"#
                .to_string(),
        )
    } else if req.method == "POST" && req.path == "/api/v3/files" {
        if opts.upload_status != 200 {
            (opts.upload_status, r#"{"error": {"code": "Upload"}}"#.to_string())
        } else {
            let file = multipart_file(&req).unwrap_or_default();
            state.lock().unwrap().uploaded = Some(file);
            (
                200,
                format!(
                    r#"{{"data": {{"type": "analysis", "id": "test-analysis", "links": {{"self": "{}{}"}}}}}}"#,
                    origin, ANALYSIS_PATH
                ),
            )
        }
    } else if req.method == "GET" && req.path == ANALYSIS_PATH {
        if opts.report_status != 200 {
            (opts.report_status, r#"{"error": {"code": "Report"}}"#.to_string())
        } else if let Some(body) = &opts.report_body {
            (200, body.clone())
        } else {
            let uploaded = state.lock().unwrap().uploaded.clone().unwrap_or_default();
            let d = digest_bytes(&uploaded);
            (
                200,
                format!(
                    r#"{{"meta": {{"file_info": {{"sha256": "{}", "md5": "{}", "size": {}}}}},
                        "data": {{"type": "analysis", "attributes": {{"status": "queued",
                        "stats": {{"malicious": 0, "suspicious": 0, "undetected": 0, "harmless": 0}}}}}}}}"#,
                    d.sha256,
                    d.md5,
                    uploaded.len()
                ),
            )
        }
    } else {
        (404, r#"{"error": {"code": "NotFoundError"}}"#.to_string())
    };

    state.lock().unwrap().requests.push(req);
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos;
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = data[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Content of the `file` part of a multipart/form-data body.
pub fn multipart_file(req: &RecordedRequest) -> Option<Vec<u8>> {
    let content_type = req.header("content-type")?;
    let boundary = content_type.split("boundary=").nth(1)?.trim_matches('"');
    let delimiter = format!("\r\n--{}", boundary);
    let marker = find(&req.body, b"name=\"file\"")?;
    let start = marker + find(&req.body[marker..], b"\r\n\r\n")? + 4;
    let len = find(&req.body[start..], delimiter.as_bytes())?;
    Some(req.body[start..start + len].to_vec())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
