use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type plugins return from their own logic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while decoding a session trace (HAR) into requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarError {
    #[error("Failed to parse HAR JSON: {0}")]
    JsonParseError(String),

    #[error("Entry {entry_index} uses unsupported HTTP method '{method}'")]
    UnsupportedMethod { entry_index: usize, method: String },

    #[error("Entry {entry_index} has an invalid URL '{url}': {message}")]
    InvalidUrl {
        entry_index: usize,
        url: String,
        message: String,
    },

    #[error("Entry {entry_index} has an unreadable startedDateTime '{value}'")]
    InvalidTimestamp { entry_index: usize, value: String },
}

/// A scenario that could not be created, or that ended up with nothing in it.
///
/// This is advisory: the caller decides whether to warn, skip, or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippableScenario {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for SkippableScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Errors raised while building the weighted scenario tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("'{}' contains scenarios with colliding names: {}", path.display(), groups.join("; "))]
    Collision { path: PathBuf, groups: Vec<String> },

    #[error(
        "'{}' contains weight declarations that don't correspond to any scenario: {}",
        path.display(),
        names.join(", ")
    )]
    DanglingWeight { path: PathBuf, names: Vec<String> },

    #[error("Invalid weight for '{}': weights must be positive integers, got {value:?}", path.display())]
    WeightValue { path: PathBuf, value: String },

    #[error("Skipping scenario {0}")]
    Skippable(SkippableScenario),

    #[error("'{}' is not a usable session trace: {source}", path.display())]
    Trace { path: PathBuf, source: HarError },
}

/// Errors raised when a plugin is registered or resolved.
///
/// These are reported before any conversion starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Plugin '{plugin}' has an invalid contract: {reason}")]
    InvalidContract { plugin: String, reason: String },

    /// A requested name that resolves to no contract at all. Kept apart from
    /// `InvalidContract` so callers can tell a typo from a broken plugin; both
    /// map to the same exit code.
    #[error("No plugin named '{0}' is registered")]
    UnknownPlugin(String),
}

/// Errors raised when a placeholder cannot render the object it wraps.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid HAR postData for '{url}': {message}")]
    InvalidPostData { url: String, message: String },

    #[error("Placeholder '{name}' cannot render a {found}")]
    WrongObjectKind { name: String, found: &'static str },

    #[error("Placeholder '{name}' points to missing object #{id}")]
    DanglingObject { name: String, id: usize },
}

/// Any failure of a full conversion run. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Plugin '{plugin}' failed while processing {subject}: {source}")]
    Plugin {
        plugin: String,
        subject: String,
        #[source]
        source: BoxError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
