use crate::task::Task;
use std::path::PathBuf;

/// Weight given to a scenario without a weight declaration.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Index of a node in a [`ScenarioTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a scenario contains: either sub-scenarios or tasks, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group(Vec<NodeId>),
    Leaf(Vec<Task>),
}

/// A named node of the scenario tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioNode {
    pub name: String,
    /// File or directory the scenario was read from.
    pub origin: Option<PathBuf>,
    /// Relative to the weights of sibling scenarios. `None` only for the root.
    pub weight: Option<u32>,
    pub kind: NodeKind,
}

impl ScenarioNode {
    pub fn group(name: impl Into<String>, children: Vec<NodeId>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            weight: Some(DEFAULT_WEIGHT),
            kind: NodeKind::Group(children),
        }
    }

    pub fn leaf(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            weight: Some(DEFAULT_WEIGHT),
            kind: NodeKind::Leaf(tasks),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn tasks(&self) -> &[Task] {
        match &self.kind {
            NodeKind::Group(_) => &[],
            NodeKind::Leaf(tasks) => tasks,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// An arena of scenario nodes hanging from a synthetic, weightless root.
///
/// Nodes are never removed: rewriting a subtree means pushing new nodes and
/// swapping ids in the parent, which keeps every id handed out valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioTree {
    nodes: Vec<ScenarioNode>,
    root: NodeId,
}

impl Default for ScenarioTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioTree {
    /// Creates a tree containing only its root.
    pub fn new() -> Self {
        let root = ScenarioNode {
            name: String::new(),
            origin: None,
            weight: None,
            kind: NodeKind::Group(Vec::new()),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Scenarios directly under the root.
    pub fn top_level(&self) -> &[NodeId] {
        self.nodes[self.root.0].children()
    }

    /// Adds a detached node and returns its id. Attach it with
    /// [`ScenarioTree::attach`] or by listing it in a group's children.
    pub fn add(&mut self, node: ScenarioNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Appends `child` to the children of the group `parent`.
    /// Returns `false` when `parent` is missing or a leaf.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(parent.0).map(|n| &mut n.kind) {
            Some(NodeKind::Group(children)) => {
                children.push(child);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ScenarioNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ScenarioNode> {
        self.nodes.get_mut(id.0)
    }

    /// Replaces the node stored at `id`, returning the previous one.
    pub fn replace(&mut self, id: NodeId, node: ScenarioNode) -> Option<ScenarioNode> {
        self.nodes
            .get_mut(id.0)
            .map(|slot| std::mem::replace(slot, node))
    }

    /// Replaces the tasks of leaf `id`, returning the previous ones.
    pub fn replace_tasks(&mut self, id: NodeId, tasks: Vec<Task>) -> Option<Vec<Task>> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(old)) => Some(std::mem::replace(old, tasks)),
            _ => None,
        }
    }

    /// Number of nodes in the arena, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }

    /// Ids reachable from `from`, children before their parent.
    pub fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut expanded = vec![false; self.nodes.len()];
        let mut stack = vec![(from, false)];
        while let Some((id, children_done)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if children_done {
                order.push(id);
                continue;
            }
            if expanded[id.index()] {
                continue;
            }
            expanded[id.index()] = true;
            stack.push((id, true));
            for &child in node.children().iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// Tasks of the subtree rooted at `from`, in depth-first order.
    pub fn subtree_tasks(&self, from: NodeId) -> impl Iterator<Item = &Task> {
        self.post_order(from)
            .into_iter()
            .filter_map(move |id| self.get(id))
            .flat_map(|node| node.tasks().iter())
    }
}
