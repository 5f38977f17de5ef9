use super::contract::Stage;
use super::registry::Plugin;
use crate::ast::Program;
use crate::error::ConversionError;
use crate::scenario::{NodeId, ScenarioTree};
use tracing::{debug, trace};

/// Runs resolved plugins at each stage, in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    plugins: Vec<Plugin>,
}

impl Dispatcher {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Plugins taking part in `stage`, in registration order.
    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &Plugin> {
        self.plugins
            .iter()
            .filter(move |p| p.contract().contains(stage))
    }

    /// Threads the tasks of every leaf through each task plugin.
    pub fn apply_task_stage(&self, tree: &mut ScenarioTree) -> Result<(), ConversionError> {
        if self.for_stage(Stage::Task).next().is_none() {
            return Ok(());
        }
        let leaves: Vec<NodeId> = tree
            .post_order(tree.root())
            .into_iter()
            .filter(|&id| tree.get(id).is_some_and(|n| n.is_leaf()))
            .collect();
        for id in leaves {
            let Some(mut tasks) = tree.replace_tasks(id, Vec::new()) else {
                continue;
            };
            for plugin in self.for_stage(Stage::Task) {
                let Some(hook) = plugin.hooks().on_task else { continue };
                let before = tasks.len();
                tasks = hook(tasks).map_err(|source| plugin_error(plugin, subject(tree, id), source))?;
                trace!(plugin = plugin.name(), before, after = tasks.len(), "Applied task plugin");
            }
            tree.replace_tasks(id, tasks);
        }
        Ok(())
    }

    /// Gives every scenario node, children before parents, to each scenario
    /// plugin.
    ///
    /// A node is visited at most once, even if a plugin moves it under a node
    /// that has not been visited yet or links nodes into a cycle. Nodes
    /// created during this stage are not visited. The synthetic root is never
    /// visited.
    pub fn apply_scenario_stage(&self, tree: &mut ScenarioTree) -> Result<(), ConversionError> {
        if self.for_stage(Stage::Scenario).next().is_none() {
            return Ok(());
        }
        let known = tree.len();
        let mut visited = vec![false; known];
        // A plugin may wire nodes into a cycle; each node is expanded once.
        let mut expanded = vec![false; known];
        let mut stack: Vec<(NodeId, bool)> =
            tree.top_level().iter().rev().map(|&id| (id, false)).collect();

        while let Some((id, children_done)) = stack.pop() {
            if id.index() >= known || visited[id.index()] {
                continue;
            }
            if !children_done {
                if expanded[id.index()] {
                    continue;
                }
                expanded[id.index()] = true;
                stack.push((id, true));
                if let Some(node) = tree.get(id) {
                    stack.extend(node.children().iter().rev().map(|&c| (c, false)));
                }
                continue;
            }
            visited[id.index()] = true;
            for plugin in self.for_stage(Stage::Scenario) {
                let Some(hook) = plugin.hooks().on_scenario else { continue };
                hook(tree, id).map_err(|source| plugin_error(plugin, subject(tree, id), source))?;
                trace!(plugin = plugin.name(), node = id.index(), "Applied scenario plugin");
            }
        }
        debug!(visited = visited.iter().filter(|v| **v).count(), "Scenario stage done");
        Ok(())
    }

    /// Folds the program through each program plugin: `Pn(...P2(P1(program)))`.
    pub fn apply_program_stage(&self, program: Program) -> Result<Program, ConversionError> {
        self.for_stage(Stage::Program)
            .try_fold(program, |program, plugin| match plugin.hooks().on_program {
                Some(hook) => {
                    trace!(plugin = plugin.name(), "Applying program plugin");
                    hook(program)
                        .map_err(|source| plugin_error(plugin, "the program".to_string(), source))
                }
                None => Ok(program),
            })
    }
}

fn subject(tree: &ScenarioTree, id: NodeId) -> String {
    match tree.get(id) {
        Some(node) => format!("scenario '{}'", node.name),
        None => format!("scenario #{}", id.index()),
    }
}

fn plugin_error(plugin: &Plugin, subject: String, source: crate::error::BoxError) -> ConversionError {
    ConversionError::Plugin {
        plugin: plugin.name().to_string(),
        subject,
        source,
    }
}
