#![allow(dead_code)]

use resonix_core::{open_store, SiteConfig};
use resonix_http::{build_router, AppState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        header_values(&self.head, name).into_iter().next()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        header_values(&self.head, "set-cookie")
    }

    /// `name=value` for a cookie set by this response.
    pub fn cookie_pair(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim().to_string();
            pair.starts_with(&prefix).then_some(pair)
        })
    }
}

fn header_values(head: &str, name: &str) -> Vec<String> {
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
        .collect()
}

pub fn seed_data(dir: &Path) {
    let write = |name: &str, value: Value| {
        std::fs::write(
            dir.join(name),
            serde_json::to_string_pretty(&value).expect("encode fixture"),
        )
        .expect("write fixture");
    };
    write(
        "events.json",
        json!([
            {"id": 1, "title": "Arduino Basics", "date": "2025-03-01", "type": "workshop", "location": "Lab 1"},
            {"id": 2, "title": "Signal Talk", "date": "2025-03-05", "type": "seminar"},
            {"id": 3, "title": "PCB Design", "date": "2099-03-09", "type": "workshop"}
        ]),
    );
    write(
        "projects.json",
        json!([
            {"id": 1, "title": "Smart Home", "category": "iot", "description": "d", "status": "published"},
            {"id": 2, "title": "Rover", "category": "robotics", "description": "d", "status": "pending"}
        ]),
    );
    write(
        "team.json",
        json!([
            {"id": 1, "name": "Jane", "role": "President", "email": "jane@uni.edu"},
            {"id": 2, "name": "Raj", "role": "Treasurer", "status": "inactive"}
        ]),
    );
    write(
        "news.json",
        json!([
            {"id": 1, "title": "Older", "date": "2024-12-01", "type": "announcement"},
            {"id": 2, "title": "Newer", "date": "2025-02-01", "type": "achievement"}
        ]),
    );
    write(
        "blog.json",
        json!([
            {"id": 1, "title": "Op-amps", "date": "2025-01-01", "category": "analog", "author": "Jane", "views": 10},
            {"id": 2, "title": "FPGAs", "date": "2025-02-01", "category": "digital", "author": "Raj", "views": 90}
        ]),
    );
    write(
        "gallery.json",
        json!([
            {"id": 1, "type": "photo", "category": "workshops"},
            {"id": 2, "type": "video", "category": "events"}
        ]),
    );
    write("settings.json", json!({"site_title": "Resonix"}));
}

/// Serves a seeded data directory on an ephemeral port.
pub async fn spawn_app(config: SiteConfig) -> (TempDir, SocketAddr) {
    let dir = TempDir::new().expect("tempdir");
    seed_data(dir.path());
    let store = Arc::new(open_store(dir.path()).expect("open store"));
    let app = build_router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (dir, addr)
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    RawResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

pub async fn get(addr: SocketAddr, path: &str) -> RawResponse {
    send_raw(addr, "GET", path, &[], None).await
}

pub async fn post_admin(addr: SocketAddr, body: Value, cookie: Option<&str>) -> RawResponse {
    let encoded = body.to_string();
    let headers: Vec<(&str, &str)> = cookie.map(|c| ("Cookie", c)).into_iter().collect();
    send_raw(addr, "POST", "/admin", &headers, Some(&encoded)).await
}
