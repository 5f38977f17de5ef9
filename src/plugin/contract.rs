use std::collections::BTreeSet;
use std::fmt;

/// A pipeline stage at which plugins can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Receives the tasks of one leaf scenario.
    Task,
    /// Receives one scenario node and may rewrite its subtree.
    Scenario,
    /// Receives the whole program, after lowering.
    Program,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Task, Stage::Scenario, Stage::Program];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Task => "task",
            Stage::Scenario => "scenario",
            Stage::Program => "program",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of stages a plugin declares it runs at.
///
/// Composite contracts are unions: `Contract::of(Stage::Task).with(Stage::Program)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Contract(BTreeSet<Stage>);

impl Contract {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(stage: Stage) -> Self {
        Self::empty().with(stage)
    }

    pub fn with(mut self, stage: Stage) -> Self {
        self.0.insert(stage);
        self
    }

    pub fn union(&self, other: &Contract) -> Contract {
        Contract(self.0.union(&other.0).copied().collect())
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.0.contains(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stages in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.0.iter().copied()
    }
}

impl From<Stage> for Contract {
    fn from(stage: Stage) -> Self {
        Contract::of(stage)
    }
}

impl FromIterator<Stage> for Contract {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Contract(iter.into_iter().collect())
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.stages().map(|s| s.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_merges_stages_in_pipeline_order() {
        let c = Contract::of(Stage::Program).union(&Contract::of(Stage::Task));
        assert_eq!(c.stages().collect::<Vec<_>>(), vec![Stage::Task, Stage::Program]);
        assert_eq!(c.to_string(), "{task, program}");
        assert!(!c.contains(Stage::Scenario));
    }
}
