use crate::ast::Statement;
use crate::session::{Denylist, Request};
use itertools::Itertools;
use tracing::debug;

/// One HTTP request plus the code that runs before and after it, in a
/// one-to-one relationship with the task functions of the generated program.
///
/// Tasks have no weight or grouping; those come with scenarios. Plugins
/// "modify" a task by building a new one through the `with_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    name: String,
    request: Request,
    pre_steps: Vec<Statement>,
    post_steps: Vec<Statement>,
}

impl Task {
    /// Creates a task named after its request, with no extra steps.
    pub fn new(request: Request) -> Self {
        Self {
            name: request.task_name(),
            request,
            pre_steps: Vec::new(),
            post_steps: Vec::new(),
        }
    }

    /// Turns requests into tasks, ordered by increasing timestamp.
    /// Requests whose target is on the denylist are dropped.
    pub fn from_requests<I>(requests: I, denylist: &Denylist) -> Vec<Task>
    where
        I: IntoIterator<Item = Request>,
    {
        requests
            .into_iter()
            .sorted_by_key(|r| r.timestamp)
            .filter(|r| {
                let denied = denylist.is_denied(r.target());
                if denied {
                    debug!(url = r.target(), "Dropping denylisted request");
                }
                !denied
            })
            .map(Task::new)
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Code run before the request is sent.
    pub fn pre_steps(&self) -> &[Statement] {
        &self.pre_steps
    }

    /// Code run after the request; it can refer to the `response` variable.
    pub fn post_steps(&self) -> &[Statement] {
        &self.post_steps
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_request(self, request: Request) -> Self {
        Self { request, ..self }
    }

    pub fn with_pre_steps(self, pre_steps: Vec<Statement>) -> Self {
        Self { pre_steps, ..self }
    }

    pub fn with_post_steps(self, post_steps: Vec<Statement>) -> Self {
        Self { post_steps, ..self }
    }

    /// Consumes the task, returning `(name, request, pre_steps, post_steps)`.
    pub fn into_parts(self) -> (String, Request, Vec<Statement>, Vec<Statement>) {
        (self.name, self.request, self.pre_steps, self.post_steps)
    }
}
