use super::locust;
use crate::ast::{Class, DomainObject, Function, Program, Statement};
use crate::scenario::{DEFAULT_WEIGHT, NodeId, NodeKind, ScenarioTree};
use crate::task::Task;
use tracing::{debug, warn};

/// Translates a fully transformed scenario tree into a locustfile program.
///
/// Each top-level scenario becomes a task set class followed by the
/// `HttpUser` class that runs it. Weights are carried over unchanged.
pub fn lower(mut tree: ScenarioTree) -> Program {
    let mut program = Program::new();
    program.push(locust::header());
    program.push(locust::imports());

    let mut lowered = vec![false; tree.len()];
    for id in tree.top_level().to_vec() {
        let Some((name, weight)) = tree
            .get(id)
            .map(|n| (n.name.clone(), n.weight.unwrap_or(DEFAULT_WEIGHT)))
        else {
            continue;
        };
        if let Some(class) = lower_node(&mut tree, id, &mut lowered, &mut program) {
            program.push(class);
            program.push(locust::user_class(&name, weight));
        }
    }
    program
}

fn lower_node(
    tree: &mut ScenarioTree,
    id: NodeId,
    lowered: &mut Vec<bool>,
    program: &mut Program,
) -> Option<Statement> {
    if id.index() >= lowered.len() {
        lowered.resize(id.index() + 1, false);
    }
    if lowered[id.index()] {
        warn!(node = id.index(), "Scenario appears twice in the tree, ignoring the repeat");
        return None;
    }
    lowered[id.index()] = true;

    let node = tree.get(id)?;
    let name = node.name.clone();
    match &node.kind {
        NodeKind::Group(children) => {
            let children = children.clone();
            let mut statements = Vec::with_capacity(children.len());
            for child in children {
                let weight = tree.get(child).and_then(|n| n.weight).unwrap_or(DEFAULT_WEIGHT);
                if let Some(class) = lower_node(tree, child, lowered, program) {
                    statements.push(Statement::decorated(
                        locust::task_decorator(Some(weight)),
                        class,
                    ));
                }
            }
            debug!(scenario = %name, children = statements.len(), "Lowered group scenario");
            Some(Statement::Class(Class {
                name,
                superclasses: vec!["TaskSet".to_string()],
                statements,
            }))
        }
        NodeKind::Leaf(_) => {
            let tasks = tree.replace_tasks(id, Vec::new()).unwrap_or_default();
            let statements = tasks
                .into_iter()
                .map(|task| Statement::decorated(locust::task_decorator(None), lower_task(task, program)))
                .collect();
            Some(Statement::Class(Class {
                name,
                superclasses: vec!["SequentialTaskSet".to_string()],
                statements,
            }))
        }
    }
}

/// `def <task>(self):` with the pre-steps, `response = <request>`, then the
/// post-steps.
fn lower_task(task: Task, program: &mut Program) -> Statement {
    let (name, request, pre_steps, post_steps) = task.into_parts();
    let call = program.placeholder(
        DomainObject::Request(request),
        locust::request_to_expr,
        format!("request of task {}", name),
    );
    let mut statements = pre_steps;
    statements.push(Statement::assign("response", call));
    statements.extend(post_steps);
    Statement::Function(Function {
        name,
        params: vec!["self".to_string()],
        statements,
    })
}
