use super::request::{Header, HttpMethod, PostData, QueryPair, Request};
use crate::error::HarError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use url::Url;

/// A trait for recorded session formats that can be turned into requests.
///
/// HAR is the format read by the scanner, but any recording that knows how
/// to produce [`Request`] values can feed the scenario builder.
pub trait IntoRequests {
    /// Consumes the recording and returns its requests in recorded order.
    fn into_requests(self) -> Result<Vec<Request>, HarError>;
}

/// Top-level HAR document. Only the fields the converter needs are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarEntry {
    #[serde(rename = "startedDateTime")]
    pub started_date_time: String,
    pub request: HarRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarNameValue>,
    #[serde(default, rename = "queryString")]
    pub query_string: Vec<HarNameValue>,
    #[serde(default, rename = "postData")]
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarNameValue {
    pub name: String,
    pub value: String,
}

impl Har {
    pub fn from_json(content: &str) -> Result<Self, HarError> {
        serde_json::from_str(content).map_err(|e| HarError::JsonParseError(e.to_string()))
    }
}

impl IntoRequests for Har {
    fn into_requests(self) -> Result<Vec<Request>, HarError> {
        self.log
            .entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_request(i))
            .collect()
    }
}

impl HarEntry {
    fn into_request(self, entry_index: usize) -> Result<Request, HarError> {
        let req = self.request;
        let method = req
            .method
            .parse::<HttpMethod>()
            .map_err(|method| HarError::UnsupportedMethod {
                entry_index,
                method,
            })?;
        let url = Url::parse(&req.url).map_err(|e| HarError::InvalidUrl {
            entry_index,
            url: req.url.clone(),
            message: e.to_string(),
        })?;
        let timestamp = parse_timestamp(&self.started_date_time).ok_or_else(|| {
            HarError::InvalidTimestamp {
                entry_index,
                value: self.started_date_time.clone(),
            }
        })?;

        let mut request = Request::new(timestamp, method, url)
            .with_headers(
                req.headers
                    .into_iter()
                    .map(|h| Header::new(h.name, h.value))
                    .collect(),
            )
            .with_query(
                req.query_string
                    .into_iter()
                    .map(|q| QueryPair {
                        name: q.name,
                        value: q.value,
                    })
                    .collect(),
            );
        request.post_data = req.post_data;
        Ok(request)
    }
}

/// Parses an ISO-8601 timestamp, accepting the truncated forms some HAR
/// generators write (no offset, or date only). Offset-less values are UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    let utc = |naive: NaiveDateTime| naive.and_utc().fixed_offset();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(utc(naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(utc)
}

impl Request {
    /// Decodes a HAR document and returns all of its requests.
    pub fn all_from_har(content: &str) -> Result<Vec<Request>, HarError> {
        Har::from_json(content)?.into_requests()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc3339_and_truncated_timestamps() {
        assert!(parse_timestamp("2019-02-11T10:01:02.123+01:00").is_some());
        assert!(parse_timestamp("2019-02-11T10:01:02.123").is_some());
        assert!(parse_timestamp("2018-01-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn unsupported_method_reports_entry_index() {
        let har = r#"{"log":{"entries":[
            {"startedDateTime":"2018-01-01","request":{"method":"GET","url":"https://a.test"}},
            {"startedDateTime":"2018-01-01","request":{"method":"PATCH","url":"https://a.test"}}
        ]}}"#;
        assert_eq!(
            Request::all_from_har(har),
            Err(HarError::UnsupportedMethod {
                entry_index: 1,
                method: "PATCH".to_string()
            })
        );
    }
}
