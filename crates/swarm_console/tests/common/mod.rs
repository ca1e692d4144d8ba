use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: "{\"error\":\"stub\"}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Serves `connections` requests, answering each by path; unknown paths get 404.
pub struct StubServer {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start<F>(connections: usize, route: F) -> Self
    where
        F: Fn(&str, &str) -> StubResponse + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let handle = thread::spawn(move || {
            for incoming in listener.incoming().take(connections) {
                let stream = match incoming {
                    Ok(stream) => stream,
                    Err(_) => break,
                };
                let Some(request) = read_request(&stream) else {
                    continue;
                };
                let response = route(&request.method, &request.path);
                seen_clone.lock().expect("seen lock").push(request);
                write_response(stream, &response);
            }
        });

        Self {
            addr,
            seen,
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn join(mut self) -> Vec<SeenRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("server thread");
        }
        self.seen()
    }
}

fn read_request(stream: &TcpStream) -> Option<SeenRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(SeenRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn write_response(mut stream: TcpStream, response: &StubResponse) {
    let reason = if response.status < 400 { "OK" } else { "ERROR" };
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(payload.as_bytes());
    let _ = stream.flush();
}

pub fn game_state_body(status: &str) -> String {
    format!(
        r#"{{
            "system_status": "{status}",
            "daily_budget": {{"max": 10.0, "spent": 12.5, "unit": "USD"}},
            "party": [
                {{"id": "coder-1", "name": "Coder", "class": "Warrior", "level": 2,
                  "stats": {{"hp": 120, "mana": 10, "success_rate": "88%"}},
                  "current_action": "Writing tests", "location": "synapse"}},
                {{"id": "pm-1", "name": "PM", "class": "Bard", "level": 1,
                  "stats": {{"hp": 70, "mana": 70, "success_rate": "97%"}},
                  "current_action": "Standby", "location": "synapse"}}
            ],
            "active_quests": [{{"id": "q1", "status": "in_progress", "title": "Harden gateway"}}],
            "fog_map": {{}},
            "repositories": [{{"id": "synapse", "name": "Synapse", "swarm": ["coder-1", "pm-1"]}}]
        }}"#
    )
}

pub fn graph_body() -> String {
    r#"{"elements": {
        "nodes": [
            {"data": {"id": "gateway", "label": "Gateway", "type": "service", "active": true,
                      "triples": [{"subject": "Gateway", "predicate": "routes", "object": "Missions"}]}},
            {"data": {"id": "memory", "label": "Memory", "type": "store"}}
        ],
        "edges": [
            {"data": {"id": "e1", "source": "gateway", "target": "memory", "label": "writes"}},
            {"data": {"id": "e2", "source": "gateway", "target": "nowhere"}}
        ]
    }}"#
    .to_string()
}
