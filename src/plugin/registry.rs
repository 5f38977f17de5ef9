use super::contract::{Contract, Stage};
use super::{dummy, sanitize_headers};
use crate::ast::Program;
use crate::error::{BoxError, ContractError};
use crate::scenario::{NodeId, ScenarioTree};
use crate::task::Task;
use ahash::AHashMap;
use itertools::Itertools;
use tracing::debug;

/// Transforms the ordered tasks of one leaf scenario.
pub type TaskHook = fn(Vec<Task>) -> Result<Vec<Task>, BoxError>;
/// Inspects or rewrites the subtree rooted at the given node.
pub type ScenarioHook = fn(&mut ScenarioTree, NodeId) -> Result<(), BoxError>;
/// Replaces the whole program.
pub type ProgramHook = fn(Program) -> Result<Program, BoxError>;

/// Plugins applied unless the caller opts out.
pub const DEFAULT_PLUGINS: &[&str] = &["sanitize_headers"];

/// The functions a plugin provides, one per stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hooks {
    pub on_task: Option<TaskHook>,
    pub on_scenario: Option<ScenarioHook>,
    pub on_program: Option<ProgramHook>,
}

impl Hooks {
    fn provides(&self, stage: Stage) -> bool {
        match stage {
            Stage::Task => self.on_task.is_some(),
            Stage::Scenario => self.on_scenario.is_some(),
            Stage::Program => self.on_program.is_some(),
        }
    }
}

/// A named transformation whose hooks match its declared contract.
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    contract: Contract,
    hooks: Hooks,
}

impl Plugin {
    /// Checks that `hooks` provides exactly the stages `contract` declares.
    pub fn new(
        name: impl Into<String>,
        contract: Contract,
        hooks: Hooks,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let invalid = |reason: String| ContractError::InvalidContract {
            plugin: name.clone(),
            reason,
        };
        if contract.is_empty() {
            return Err(invalid("it declares no stage".to_string()));
        }
        if let Some(stage) = contract.stages().find(|&s| !hooks.provides(s)) {
            return Err(invalid(format!(
                "it declares the {} stage but has no {} hook",
                stage, stage
            )));
        }
        if let Some(stage) = Stage::ALL
            .into_iter()
            .find(|&s| hooks.provides(s) && !contract.contains(s))
        {
            return Err(invalid(format!(
                "it has a {} hook but does not declare the {} stage",
                stage, stage
            )));
        }
        Ok(Self {
            name,
            contract,
            hooks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }
}

/// Master macro declaring the built-in plugins and their registration.
macro_rules! define_builtin_plugins {
    ( $( ($name:expr, [$($stage:ident),+], { $($hook:ident : $f:expr),+ $(,)? }) ),* $(,)? ) => {
        /// Names of the plugins every registry starts with.
        pub const BUILTIN_PLUGINS: &[&str] = &[$($name),*];

        fn register_builtin_plugins(registry: &mut PluginRegistry) -> Result<(), ContractError> {
            $(
                registry.register(
                    $name,
                    [$(Stage::$stage),+].into_iter().collect(),
                    Hooks { $($hook: Some($f),)+ ..Hooks::default() },
                )?;
            )*
            Ok(())
        }
    };
}

define_builtin_plugins! {
    ("sanitize_headers", [Task], { on_task: sanitize_headers::plugin }),
    ("dummy", [Scenario], { on_scenario: dummy::plugin }),
}

/// Maps stable plugin names to validated plugins.
///
/// Populated once at startup; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: AHashMap<String, Plugin>,
}

impl PluginRegistry {
    /// An empty registry, without even the built-in plugins.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in plugins.
    pub fn with_builtins() -> Result<Self, ContractError> {
        let mut registry = Self::empty();
        register_builtin_plugins(&mut registry)?;
        Ok(registry)
    }

    /// Validates and registers a plugin, replacing any plugin of the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        contract: Contract,
        hooks: Hooks,
    ) -> Result<(), ContractError> {
        let plugin = Plugin::new(name, contract, hooks)?;
        debug!(plugin = plugin.name(), contract = %plugin.contract(), "Registered plugin");
        self.plugins.insert(plugin.name.clone(), plugin);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).sorted().collect()
    }

    /// Looks plugins up by name, keeping the order the names were given in.
    pub fn resolve<I, S>(&self, names: I) -> Result<Vec<Plugin>, ContractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| ContractError::UnknownPlugin(name.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_tasks(tasks: Vec<Task>) -> Result<Vec<Task>, BoxError> {
        Ok(tasks)
    }

    #[test]
    fn builtins_are_registered() {
        let registry = PluginRegistry::with_builtins().unwrap();
        assert_eq!(registry.names(), vec!["dummy", "sanitize_headers"]);
        assert_eq!(BUILTIN_PLUGINS, &["sanitize_headers", "dummy"]);
    }

    #[test]
    fn missing_hook_is_rejected() {
        let err = Plugin::new("p", Contract::of(Stage::Program), Hooks::default()).unwrap_err();
        assert!(matches!(err, ContractError::InvalidContract { .. }));
    }

    #[test]
    fn undeclared_hook_is_rejected() {
        let hooks = Hooks {
            on_task: Some(noop_tasks),
            ..Hooks::default()
        };
        let err = Plugin::new("p", Contract::of(Stage::Scenario), hooks).unwrap_err();
        assert!(matches!(err, ContractError::InvalidContract { .. }));
    }

    #[test]
    fn resolve_keeps_order_and_reports_unknown_names() {
        let registry = PluginRegistry::with_builtins().unwrap();
        let plugins = registry.resolve(["dummy", "sanitize_headers"]).unwrap();
        let names: Vec<&str> = plugins.iter().map(Plugin::name).collect();
        assert_eq!(names, vec!["dummy", "sanitize_headers"]);
        assert_eq!(
            registry.resolve(["nope"]).unwrap_err(),
            ContractError::UnknownPlugin("nope".to_string())
        );
    }
}
