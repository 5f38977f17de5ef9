//! Header clean-up applied to every task by default.

use crate::error::BoxError;
use crate::session::Header;
use crate::task::Task;

/// Lower-cases header names, drops the pseudo-headers some browsers record
/// (`:authority`, `:path`...) and drops `cookie`, which the load-test
/// client's session manages itself. When a name appears more than once the
/// last value wins, at the position of the first occurrence.
pub fn plugin(tasks: Vec<Task>) -> Result<Vec<Task>, BoxError> {
    Ok(tasks
        .into_iter()
        .map(|task| {
            let mut request = task.request().clone();
            request.headers = sanitize(&request.headers);
            task.with_request(request)
        })
        .collect())
}

fn sanitize(headers: &[Header]) -> Vec<Header> {
    let mut sanitized: Vec<Header> = Vec::with_capacity(headers.len());
    for header in headers {
        if header.name.starts_with(':') {
            continue;
        }
        let name = header.name.to_lowercase();
        if name == "cookie" {
            continue;
        }
        match sanitized.iter_mut().find(|h| h.name == name) {
            Some(existing) => existing.value = header.value.clone(),
            None => sanitized.push(Header::new(name, header.value.clone())),
        }
    }
    sanitized
}
