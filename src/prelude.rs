//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! tracesmith crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use tracesmith::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let locustfile = dumps(&["scenarios/"], &["dummy"], true)?;
//! std::fs::write("locustfile.py", locustfile)?;
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::codegen::{Lines, dump, dumps};
pub use crate::compiler::{Compilation, Compiler};
pub use crate::config::Config;
pub use crate::scenario::{Listing, ScenarioTree, scan};

// Domain types
pub use crate::ast::{Expression, Program, Statement};
pub use crate::session::{Denylist, Request};
pub use crate::task::Task;

// Plugins
pub use crate::plugin::{Contract, Hooks, PluginRegistry, Stage};

// Error types
pub use crate::error::{ContractError, ConversionError, RenderError, ScenarioError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
