use crate::error::BoxError;
use crate::scenario::{NodeId, ScenarioTree};
use tracing::info;

/// Logs the first request of each scenario. Mostly useful to check that
/// plugins are picked up.
pub fn plugin(tree: &mut ScenarioTree, node: NodeId) -> Result<(), BoxError> {
    match tree.subtree_tasks(node).next() {
        Some(task) => info!("The first request was {}", task.request().target()),
        None => info!("The scenario has no requests"),
    }
    Ok(())
}
