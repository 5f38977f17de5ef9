use crate::naming::{adler32, to_identifier};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// HTTP methods a recorded request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Options,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method never carry a payload.
    pub fn is_bodyless(&self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Options | HttpMethod::Delete
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "OPTIONS" => Ok(HttpMethod::Options),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(other.to_string()),
        }
    }
}

/// An HTTP header as recorded in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One `name=value` pair of a URL query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryPair {
    pub name: String,
    pub value: String,
}

/// A recorded request payload, kept as loose as HAR generators produce it.
///
/// Validation happens when the request is rendered, not when it is read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostData {
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    pub text: Option<String>,
    pub params: Option<serde_json::Value>,
}

/// An HTTP request read from a session trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub timestamp: DateTime<FixedOffset>,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<Header>,
    pub post_data: Option<PostData>,
    pub query: Vec<QueryPair>,
    /// Overrides the statistics name reported by the load-test client.
    pub name: Option<String>,
}

impl Request {
    pub fn new(timestamp: DateTime<FixedOffset>, method: HttpMethod, url: Url) -> Self {
        Self {
            timestamp,
            method,
            url,
            headers: Vec::new(),
            post_data: None,
            query: Vec::new(),
            name: None,
        }
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_post_data(mut self, post_data: PostData) -> Self {
        self.post_data = Some(post_data);
        self
    }

    pub fn with_query(mut self, query: Vec<QueryPair>) -> Self {
        self.query = query;
        self
    }

    /// The full target URL, as matched by denylists and rendered in programs.
    pub fn target(&self) -> &str {
        self.url.as_str()
    }

    /// A deterministic checksum of everything that identifies this request.
    pub fn fingerprint(&self) -> u32 {
        let mut identity = format!(
            "{}|{}|{}",
            self.timestamp.to_rfc3339(),
            self.method,
            self.url
        );
        for h in &self.headers {
            identity.push_str(&format!("|h:{}={}", h.name, h.value));
        }
        if let Some(pd) = &self.post_data {
            identity.push_str(&format!("|b:{:?}", pd));
        }
        for q in &self.query {
            identity.push_str(&format!("|q:{}={}", q.name, q.value));
        }
        adler32(identity.as_bytes())
    }

    /// A readable, unique name for the task performing this request.
    pub fn task_name(&self) -> String {
        [
            self.method.as_str().to_string(),
            self.url.scheme().to_string(),
            to_identifier(self.url.host_str().unwrap_or_default()),
            to_identifier(self.url.path()),
            self.fingerprint().to_string(),
        ]
        .join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(url: &str) -> Request {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2018, 1, 1, 0, 0, 0)
            .unwrap();
        Request::new(ts, HttpMethod::Get, Url::parse(url).unwrap())
    }

    #[test]
    fn method_parses_only_supported_names() {
        assert_eq!("PUT".parse::<HttpMethod>(), Ok(HttpMethod::Put));
        assert!("PATCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn task_name_is_stable_and_readable() {
        let r = request("https://www.example.com/a/b");
        let name = r.task_name();
        assert!(name.starts_with("GET_https_www_example_com_"));
        assert_eq!(name, r.clone().task_name());
    }

    #[test]
    fn task_name_changes_with_headers() {
        let plain = request("https://example.com/");
        let with_header = plain.clone().with_headers(vec![Header::new("a", "b")]);
        assert_ne!(plain.task_name(), with_header.task_name());
    }
}
