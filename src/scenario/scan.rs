use super::listing::{Entry, Group, Listing, Trace, WEIGHT_FILE_EXTENSION, WeightDeclaration};
use crate::error::{HarError, ScenarioError, SkippableScenario};
use crate::session::Request;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A listing read from disk and the paths that were skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct ScannedListing {
    pub listing: Listing,
    pub skipped: Vec<SkippableScenario>,
}

/// Reads scenario sources from the file system.
///
/// A directory is a group; inside it, `X.weight` declares the weight of the
/// sibling `X` and every other file is read as a HAR trace. Children that
/// cannot be read are skipped with a warning, but a top-level path that
/// cannot be read aborts the scan. Directory entries are visited in name
/// order so that the same input always gives the same listing.
pub fn scan<P: AsRef<Path>>(paths: &[P]) -> Result<ScannedListing, ScenarioError> {
    let mut scanned = ScannedListing::default();
    for path in paths {
        let path = path.as_ref();
        let entry = entry_from_path(path, &mut scanned.skipped)?;
        scanned.listing.entries.push(entry);

        let weight_path = path.with_extension(WEIGHT_FILE_EXTENSION);
        if weight_path.is_file() {
            let content = fs::read_to_string(&weight_path).map_err(|e| {
                ScenarioError::WeightValue {
                    path: weight_path.clone(),
                    value: e.to_string(),
                }
            })?;
            scanned
                .listing
                .weights
                .push(WeightDeclaration::new(weight_path, content));
        }
    }
    Ok(scanned)
}

fn entry_from_path(path: &Path, skipped: &mut Vec<SkippableScenario>) -> Result<Entry, ScenarioError> {
    if path.is_dir() {
        group_from_dir(path, skipped).map(Entry::Group)
    } else {
        trace_from_file(path).map(Entry::Trace)
    }
}

fn group_from_dir(path: &Path, skipped: &mut Vec<SkippableScenario>) -> Result<Group, ScenarioError> {
    let mut children: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| skippable(path, e.to_string()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    children.sort();

    let mut group = Group {
        path: path.to_path_buf(),
        entries: Vec::new(),
        weights: Vec::new(),
    };
    for child in children {
        if child.extension().is_some_and(|ext| ext == WEIGHT_FILE_EXTENSION) {
            let content = fs::read_to_string(&child).map_err(|e| ScenarioError::WeightValue {
                path: child.clone(),
                value: e.to_string(),
            })?;
            group.weights.push(WeightDeclaration::new(child, content));
            continue;
        }
        match entry_from_path(&child, skipped) {
            Ok(entry) => group.entries.push(entry),
            Err(ScenarioError::Skippable(skip)) => {
                warn!(
                    path = %skip.path.display(),
                    reason = %skip.reason,
                    "While searching for HAR files, skipping"
                );
                skipped.push(skip);
            }
            Err(e) => return Err(e),
        }
    }

    if group.entries.is_empty() {
        return Err(skippable(path, "no scenarios inside the directory"));
    }
    debug!(path = %path.display(), entries = group.entries.len(), "Scanned directory");
    Ok(group)
}

/// Reads a HAR file. Files that are not JSON are skippable; a JSON file with
/// unusable entries is an error, since it was clearly meant as a trace.
fn trace_from_file(path: &Path) -> Result<Trace, ScenarioError> {
    let content = fs::read_to_string(path).map_err(|e| skippable(path, e.to_string()))?;
    let requests = Request::all_from_har(&content).map_err(|e| match e {
        HarError::JsonParseError(message) => skippable(path, message),
        source => ScenarioError::Trace {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(Trace {
        path: path.to_path_buf(),
        requests,
    })
}

fn skippable(path: &Path, reason: impl Into<String>) -> ScenarioError {
    ScenarioError::Skippable(SkippableScenario {
        path: path.to_path_buf(),
        reason: reason.into(),
    })
}
