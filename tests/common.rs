//! Common test utilities for building requests, listings and HAR files.
use chrono::{FixedOffset, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracesmith::ast::Program;
use tracesmith::codegen::render;
use tracesmith::scenario::{Entry, Group, Listing, Trace, WeightDeclaration};
use tracesmith::session::{HttpMethod, Request};
use url::Url;

/// A request recorded `second` seconds into 2018.
#[allow(dead_code)]
pub fn request(method: HttpMethod, url: &str, second: u32) -> Request {
    let ts = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2018, 1, 1, 0, 0, second)
        .unwrap();
    Request::new(ts, method, Url::parse(url).unwrap())
}

/// A trace of GET requests to `urls`, in that order.
#[allow(dead_code)]
pub fn trace(path: &str, urls: &[&str]) -> Entry {
    Entry::Trace(Trace {
        path: PathBuf::from(path),
        requests: urls
            .iter()
            .enumerate()
            .map(|(i, url)| request(HttpMethod::Get, url, i as u32))
            .collect(),
    })
}

#[allow(dead_code)]
pub fn group(path: &str, entries: Vec<Entry>, weights: Vec<WeightDeclaration>) -> Entry {
    Entry::Group(Group {
        path: PathBuf::from(path),
        entries,
        weights,
    })
}

#[allow(dead_code)]
pub fn weight(path: &str, content: &str) -> WeightDeclaration {
    WeightDeclaration::new(path, content)
}

#[allow(dead_code)]
pub fn listing(entries: Vec<Entry>) -> Listing {
    Listing {
        entries,
        weights: Vec::new(),
    }
}

/// The usual test tree: group `root` holding `s1.har` (weight 1) and
/// `s2.har` (weight 3), one GET request each.
#[allow(dead_code)]
pub fn weighted_listing() -> Listing {
    listing(vec![group(
        "root",
        vec![
            trace("root/s1.har", &["https://example.com/a"]),
            trace("root/s2.har", &["https://example.com/b"]),
        ],
        vec![weight("root/s2.weight", "3\n")],
    )])
}

/// HAR document recording GET requests to `urls`, one second apart.
#[allow(dead_code)]
pub fn har_json(urls: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            serde_json::json!({
                "startedDateTime": format!("2018-01-01T00:00:{:02}.000Z", i),
                "request": {
                    "method": "GET",
                    "url": url,
                    "headers": [
                        {"name": ":authority", "value": "example.com"},
                        {"name": "Accept", "value": "*/*"},
                        {"name": "Cookie", "value": "session=1"}
                    ],
                    "queryString": []
                }
            })
        })
        .collect();
    serde_json::json!({ "log": { "entries": entries } }).to_string()
}

#[allow(dead_code)]
pub fn write_har(dir: &Path, name: &str, urls: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, har_json(urls)).unwrap();
    path
}

/// Renders a program into one string, lines joined by `\n`.
#[allow(dead_code)]
pub fn render_text(program: Program) -> String {
    render(program).expect("program should render").join("\n")
}
