use super::listing::{Entry, Group, Listing, Trace, WeightDeclaration};
use super::tree::{DEFAULT_WEIGHT, NodeId, ScenarioNode, ScenarioTree};
use crate::error::{ScenarioError, SkippableScenario};
use crate::naming::to_identifier;
use crate::session::Denylist;
use crate::task::Task;
use ahash::AHashMap;
use itertools::Itertools;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A validated scenario tree and the advisories raised while building it.
#[derive(Debug, Clone)]
pub struct BuiltScenarios {
    pub tree: ScenarioTree,
    pub skipped: Vec<SkippableScenario>,
}

/// Turns a [`Listing`] into a weighted [`ScenarioTree`].
///
/// Sibling names must be unique, every weight declaration must name a
/// sibling, and weights must be positive integers. Requests matching the
/// denylist are dropped; a leaf left without tasks is kept and reported.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    denylist: Denylist,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn build(&self, listing: Listing) -> Result<BuiltScenarios, ScenarioError> {
        let mut run = BuildRun {
            denylist: &self.denylist,
            tree: ScenarioTree::new(),
            skipped: Vec::new(),
        };
        let root = run.tree.root();
        let children = run.build_children(Path::new(""), listing.entries, listing.weights, true)?;
        for child in children {
            run.tree.attach(root, child);
        }
        Ok(BuiltScenarios {
            tree: run.tree,
            skipped: run.skipped,
        })
    }
}

struct BuildRun<'a> {
    denylist: &'a Denylist,
    tree: ScenarioTree,
    skipped: Vec<SkippableScenario>,
}

impl BuildRun<'_> {
    fn build_children(
        &mut self,
        parent: &Path,
        entries: Vec<Entry>,
        weights: Vec<WeightDeclaration>,
        top_level: bool,
    ) -> Result<Vec<NodeId>, ScenarioError> {
        let mut built: Vec<(PathBuf, PathBuf, NodeId)> = Vec::new();
        for entry in entries {
            let key = weight_key(entry.path(), top_level);
            let path = entry.path().to_path_buf();
            match self.build_entry(entry, top_level) {
                Ok(id) => built.push((key, path, id)),
                Err(ScenarioError::Skippable(skip)) if !top_level => {
                    warn!(path = %skip.path.display(), reason = %skip.reason, "Skipping scenario");
                    self.skipped.push(skip);
                }
                Err(e) => return Err(e),
            }
        }

        self.check_collisions(parent, &built)?;
        let weights = resolve_weights(parent, &built, weights, top_level)?;
        for (key, path, id) in &built {
            let weight = match weights.get(key) {
                Some(&w) => w,
                None => {
                    info!(
                        path = %path.display(),
                        "No weight declaration, assigning default weight {}", DEFAULT_WEIGHT
                    );
                    DEFAULT_WEIGHT
                }
            };
            if let Some(node) = self.tree.get_mut(*id) {
                node.weight = Some(weight);
            }
        }
        Ok(built.into_iter().map(|(_, _, id)| id).collect())
    }

    fn build_entry(&mut self, entry: Entry, top_level: bool) -> Result<NodeId, ScenarioError> {
        let name = scenario_name(entry.path(), top_level);
        match entry {
            Entry::Trace(trace) => Ok(self.build_leaf(name, trace)),
            Entry::Group(group) => self.build_group(name, group),
        }
    }

    fn build_leaf(&mut self, name: String, trace: Trace) -> NodeId {
        let recorded = trace.requests.len();
        let tasks = Task::from_requests(trace.requests, self.denylist);
        debug!(scenario = %name, tasks = tasks.len(), "Built leaf scenario");
        if tasks.is_empty() {
            let reason = if recorded == 0 {
                "the trace contains no requests".to_string()
            } else {
                format!("all {} requests are denylisted", recorded)
            };
            warn!(path = %trace.path.display(), %reason, "Keeping empty scenario");
            self.skipped.push(SkippableScenario {
                path: trace.path.clone(),
                reason,
            });
        }
        self.tree
            .add(ScenarioNode::leaf(name, tasks).with_origin(trace.path))
    }

    fn build_group(&mut self, name: String, group: Group) -> Result<NodeId, ScenarioError> {
        let children = self.build_children(&group.path, group.entries, group.weights, false)?;
        if children.is_empty() {
            return Err(ScenarioError::Skippable(SkippableScenario {
                path: group.path,
                reason: "no scenarios inside the group".to_string(),
            }));
        }
        debug!(scenario = %name, children = children.len(), "Built group scenario");
        Ok(self
            .tree
            .add(ScenarioNode::group(name, children).with_origin(group.path)))
    }

    fn check_collisions(
        &self,
        parent: &Path,
        built: &[(PathBuf, PathBuf, NodeId)],
    ) -> Result<(), ScenarioError> {
        let mut by_name: AHashMap<&str, Vec<&Path>> = AHashMap::new();
        let mut order = Vec::new();
        for (_, path, id) in built {
            let Some(node) = self.tree.get(*id) else { continue };
            let paths = by_name.entry(node.name.as_str()).or_default();
            if paths.is_empty() {
                order.push(node.name.as_str());
            }
            paths.push(path);
        }
        let groups: Vec<String> = order
            .into_iter()
            .filter_map(|name| by_name.get(name).filter(|paths| paths.len() > 1))
            .map(|paths| paths.iter().map(|p| format!("{:?}", p.display().to_string())).join(" vs "))
            .collect();
        if groups.is_empty() {
            return Ok(());
        }
        error!(
            path = %parent.display(),
            "Scenarios with colliding names: {}",
            groups.join("; ")
        );
        Err(ScenarioError::Collision {
            path: parent.to_path_buf(),
            groups,
        })
    }
}

/// What a weight declaration and the scenario it weighs have in common.
///
/// Siblings inside a group share a directory, so the stem is enough there.
/// Top-level inputs can come from anywhere: `x/a.weight` weighs `x/a.har`
/// and never `y/a.har`.
fn weight_key(path: &Path, top_level: bool) -> PathBuf {
    if top_level {
        path.with_extension("")
    } else {
        PathBuf::from(super::listing::stem(path))
    }
}

/// Matches weight declarations to the built siblings.
fn resolve_weights(
    parent: &Path,
    built: &[(PathBuf, PathBuf, NodeId)],
    weights: Vec<WeightDeclaration>,
    top_level: bool,
) -> Result<AHashMap<PathBuf, u32>, ScenarioError> {
    let dangling: Vec<String> = weights
        .iter()
        .filter(|w| {
            let key = weight_key(&w.path, top_level);
            !built.iter().any(|(k, _, _)| *k == key)
        })
        .map(|w| w.path.display().to_string())
        .sorted()
        .collect();
    if !dangling.is_empty() {
        error!(
            path = %parent.display(),
            "Weight declarations without a matching scenario: {}",
            dangling.join(", ")
        );
        info!("A weight declaration X.weight needs a sibling trace X.har or a group X");
        return Err(ScenarioError::DanglingWeight {
            path: parent.to_path_buf(),
            names: dangling,
        });
    }

    let mut resolved = AHashMap::new();
    for decl in weights {
        let weight = parse_weight(&decl.path, &decl.content)?;
        resolved.insert(weight_key(&decl.path, top_level), weight);
    }
    Ok(resolved)
}

/// Parses weight content: surrounding whitespace is ignored, the rest must be
/// a positive decimal integer.
pub fn parse_weight(path: &Path, content: &str) -> Result<u32, ScenarioError> {
    let trimmed = content.trim();
    let parsed = if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed.parse::<u32>().ok().filter(|&w| w > 0)
    } else {
        None
    };
    parsed.ok_or_else(|| {
        error!(
            path = %path.display(),
            "Invalid weight: weights must be positive integers, got {:?}", trimmed
        );
        ScenarioError::WeightValue {
            path: path.to_path_buf(),
            value: trimmed.to_string(),
        }
    })
}

/// Top-level scenarios are named after their full path so that they stay
/// unique across the program; nested ones only need their stem.
fn scenario_name(path: &Path, top_level: bool) -> String {
    if top_level {
        to_identifier(&path.display().to_string())
    } else {
        to_identifier(&super::listing::stem(path))
    }
}
