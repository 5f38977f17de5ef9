use crate::session::Request;
use std::path::{Path, PathBuf};

/// Extension marking a weight declaration file (`X.weight` weighs `X`).
pub const WEIGHT_FILE_EXTENSION: &str = "weight";

/// Everything the scenario builder consumes, already read from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Top-level scenarios, named after their full path.
    pub entries: Vec<Entry>,
    /// Weight declarations for top-level scenarios.
    pub weights: Vec<WeightDeclaration>,
}

/// A scenario source: a single trace, or a group of sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Trace(Trace),
    Group(Group),
}

/// One recorded session.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub path: PathBuf,
    pub requests: Vec<Request>,
}

/// A directory-like collection of traces and sub-groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub path: PathBuf,
    pub entries: Vec<Entry>,
    pub weights: Vec<WeightDeclaration>,
}

/// The unparsed content of a weight declaration for the sibling named `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightDeclaration {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Trace(t) => &t.path,
            Entry::Group(g) => &g.path,
        }
    }

    /// File name without its extension; what weight declarations refer to.
    pub fn stem(&self) -> String {
        stem(self.path())
    }
}

impl WeightDeclaration {
    /// Declaration read from `path`, weighing the sibling with the same stem.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: stem(&path),
            path,
            content: content.into(),
        }
    }
}

pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
