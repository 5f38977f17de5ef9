//! The Locust vocabulary: how requests, tasks and scenarios are spelled in a
//! locustfile.

use crate::ast::{Class, DomainObject, Expression, FunctionCall, Import, Literal, Statement};
use crate::error::RenderError;
use crate::session::{Header, HttpMethod, PostData, QueryPair, Request};

pub const TIMEOUT_SECONDS: i64 = 30;
pub const JSON_MIME_TYPE: &str = "application/json";
/// Bounds, in seconds, of the pause simulated users take between tasks.
pub const WAIT_TIME: (i64, i64) = (0, 10);
pub const LOCUST_IMPORTS: &[&str] = &["HttpUser", "SequentialTaskSet", "TaskSet", "between", "task"];

/// Converter for placeholders wrapping a [`Request`]: renders the call the
/// Locust client makes to replay it.
///
/// ```text
/// self.client.post(url='https://x.test/', name='https://x.test/', timeout=30,
///     allow_redirects=False, headers={...}, json={...})
/// ```
pub fn request_to_expr(object: &DomainObject) -> Result<Expression, RenderError> {
    let request = object.as_request().ok_or(RenderError::WrongObjectKind {
        name: "request".to_string(),
        found: object.kind(),
    })?;
    let url = Expression::str(request.target());
    let name = match &request.name {
        Some(name) => Expression::str(name.as_str()),
        None => url.clone(),
    };
    let mut call = FunctionCall::new(format!(
        "self.client.{}",
        request.method.as_str().to_lowercase()
    ))
    .named("url", url)
    .named("name", name)
    .named("timeout", Expression::int(TIMEOUT_SECONDS))
    .named("allow_redirects", Expression::bool(false));

    let headers = headers_dict(&request.headers);
    if !headers.is_empty() {
        call = call.named("headers", Literal::Dict(headers).into());
    }

    if let Some(post_data) = request.post_data.as_ref().filter(|_| !request.method.is_bodyless()) {
        for (key, value) in post_data_kwargs(request, post_data)? {
            call = call.named(key, value);
        }
    }

    if request.method == HttpMethod::Put {
        let mut params = match call.named_arg("params") {
            Some(Expression::Literal(Literal::List(items))) => items.clone(),
            _ => Vec::new(),
        };
        params.extend(request.query.iter().map(query_pair_tuple));
        call = call.named("params", Literal::List(params).into());
    }
    Ok(call.into())
}

/// Collapses header pairs into dict entries: the last value of a repeated
/// name wins, at the position of its first occurrence.
fn headers_dict(headers: &[Header]) -> Vec<(Expression, Expression)> {
    let mut entries: Vec<(&str, &str)> = Vec::new();
    for h in headers {
        match entries.iter_mut().find(|(name, _)| *name == h.name) {
            Some(entry) => entry.1 = h.value.as_str(),
            None => entries.push((h.name.as_str(), h.value.as_str())),
        }
    }
    entries
        .into_iter()
        .map(|(k, v)| (Expression::str(k), Expression::str(v)))
        .collect()
}

fn query_pair_tuple(q: &QueryPair) -> Expression {
    bytes_pair(q.name.as_bytes(), q.value.as_bytes())
}

fn bytes_pair(name: &[u8], value: &[u8]) -> Expression {
    Literal::Tuple(vec![
        Literal::Bytes(name.to_vec()).into(),
        Literal::Bytes(value.to_vec()).into(),
    ])
    .into()
}

/// Keyword arguments carrying a HAR `postData` payload: `data`, `params`,
/// `json`, in that order, each only when present.
fn post_data_kwargs(
    request: &Request,
    post_data: &PostData,
) -> Result<Vec<(&'static str, Expression)>, RenderError> {
    let invalid = |message: &str| RenderError::InvalidPostData {
        url: request.target().to_string(),
        message: message.to_string(),
    };
    let mime = post_data
        .mime_type
        .as_deref()
        .ok_or_else(|| invalid("missing 'mimeType' field"))?;
    if post_data.text.is_none() && post_data.params.is_none() {
        return Err(invalid("should contain 'text' or 'params'"));
    }

    let mut data = None;
    let mut json = None;
    if mime == JSON_MIME_TYPE {
        let text = post_data
            .text
            .as_deref()
            .ok_or_else(|| invalid("missing 'text' field for application/json content"))?;
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|_| invalid("unreadable JSON from field 'text'"))?;
        json = Some(Expression::from(Literal::from_json(&value)));
    } else if let Some(text) = &post_data.text {
        data = Some(Expression::from(Literal::Bytes(text.as_bytes().to_vec())));
    }

    let params = match &post_data.params {
        None => None,
        Some(serde_json::Value::Array(items)) => {
            let pairs = items
                .iter()
                .map(|item| {
                    let field = |key: &str| item.get(key).and_then(serde_json::Value::as_str);
                    match (field("name"), field("value")) {
                        (Some(name), Some(value)) => {
                            Ok(bytes_pair(name.as_bytes(), value.as_bytes()))
                        }
                        _ => Err(invalid("unreadable params field")),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(Expression::from(Literal::List(pairs)))
        }
        Some(_) => return Err(invalid("the 'params' field should be a list")),
    };

    Ok([("data", data), ("params", params), ("json", json)]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}

/// The comment opening every generated program.
pub fn header() -> Statement {
    Statement::Comment(vec![format!(
        "File automatically generated by tracesmith v{}.",
        env!("CARGO_PKG_VERSION")
    )])
}

pub fn imports() -> Statement {
    Statement::Import(Import::from("locust", LOCUST_IMPORTS))
}

/// `@task` or `@task(<weight>)`.
pub fn task_decorator(weight: Option<u32>) -> String {
    match weight {
        Some(w) => format!("task({})", w),
        None => "task".to_string(),
    }
}

/// The `HttpUser` running one top-level scenario.
pub fn user_class(scenario: &str, weight: u32) -> Statement {
    Statement::Class(Class {
        name: format!("UserFor{}", scenario),
        superclasses: vec!["HttpUser".to_string()],
        statements: vec![
            Statement::assign(
                "tasks",
                Literal::List(vec![Expression::symbol(scenario)]).into(),
            ),
            Statement::assign("weight", Expression::int(i64::from(weight))),
            Statement::assign(
                "wait_time",
                FunctionCall::new("between")
                    .arg(Expression::int(WAIT_TIME.0))
                    .arg(Expression::int(WAIT_TIME.1))
                    .into(),
            ),
        ],
    })
}
