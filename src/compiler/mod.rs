use crate::ast::Program;
use crate::error::{ContractError, ConversionError, SkippableScenario};
use crate::plugin::{DEFAULT_PLUGINS, Dispatcher, PluginRegistry};
use crate::scenario::{Listing, ScenarioBuilder};
use crate::session::Denylist;
use tracing::{debug, info};

pub mod locust;
mod lower;

pub use lower::lower;

/// The result of a conversion: the final program and the scenarios that were
/// skipped or left empty on the way.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub program: Program,
    pub skipped: Vec<SkippableScenario>,
}

/// Runs the conversion pipeline on a listing: scenario tree, task plugins,
/// scenario plugins, lowering, program plugins.
pub struct Compiler {
    listing: Listing,
    scenarios: ScenarioBuilder,
    dispatcher: Dispatcher,
}

pub struct CompilerBuilder {
    listing: Listing,
    denylist: Denylist,
    registry: Option<PluginRegistry>,
    plugins: Vec<String>,
    with_default_plugins: bool,
}

impl CompilerBuilder {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            denylist: Denylist::empty(),
            registry: None,
            plugins: Vec::new(),
            with_default_plugins: true,
        }
    }

    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    /// Resolves plugin names against `registry` instead of the built-in one.
    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Adds a plugin by name. Same-stage plugins run in the order added.
    pub fn with_plugin(mut self, name: impl Into<String>) -> Self {
        self.plugins.push(name.into());
        self
    }

    pub fn with_plugins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether to append the default plugins after the requested ones.
    pub fn with_default_plugins(mut self, enabled: bool) -> Self {
        self.with_default_plugins = enabled;
        self
    }

    /// Resolves every plugin. Unknown names and invalid contracts are
    /// reported here, before any conversion work.
    pub fn build(self) -> Result<Compiler, ContractError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => PluginRegistry::with_builtins()?,
        };
        let mut names = self.plugins;
        if self.with_default_plugins {
            for default in DEFAULT_PLUGINS {
                if !names.iter().any(|n| n == default) {
                    names.push(default.to_string());
                }
            }
        }
        let plugins = registry.resolve(&names)?;
        debug!(plugins = ?names, "Resolved plugins");
        Ok(Compiler {
            listing: self.listing,
            scenarios: ScenarioBuilder::new().with_denylist(self.denylist),
            dispatcher: Dispatcher::new(plugins),
        })
    }
}

impl Compiler {
    pub fn builder(listing: Listing) -> CompilerBuilder {
        CompilerBuilder::new(listing)
    }

    /// Swaps the listing to convert, keeping the resolved plugins.
    pub fn with_listing(mut self, listing: Listing) -> Self {
        self.listing = listing;
        self
    }

    pub fn compile(self) -> Result<Compilation, ConversionError> {
        let built = self.scenarios.build(self.listing)?;
        let mut tree = built.tree;
        info!(scenarios = tree.top_level().len(), "Built scenario tree");

        self.dispatcher.apply_task_stage(&mut tree)?;
        self.dispatcher.apply_scenario_stage(&mut tree)?;
        let program = lower(tree);
        let program = self.dispatcher.apply_program_stage(program)?;

        Ok(Compilation {
            program,
            skipped: built.skipped,
        })
    }
}
