//! # Tracesmith - Session Trace to Load-Test Converter
//!
//! **Tracesmith** turns recorded browser sessions (HAR files) into a
//! [Locust](https://locust.io) load-test program. Traces are grouped into a
//! weighted scenario tree, transformed by plugins, lowered into a small
//! syntax tree, and serialized line by line into a locustfile.
//!
//! ## Core Workflow
//!
//! 1.  **List Your Scenarios**: Point [`scenario::scan`] at HAR files and
//!     directories of HAR files, or build a [`scenario::Listing`] yourself
//!     from any recording that implements [`session::IntoRequests`].
//!     `X.weight` files next to a trace or directory `X` set its relative weight.
//! 2.  **Compile**: Use `Compiler::builder` to choose plugins and a denylist,
//!     then `compile()` the listing into a [`ast::Program`]. Plugins run at
//!     three stages: on the tasks of each scenario, on each scenario node,
//!     and on the whole program.
//! 3.  **Emit**: Stream the program with [`ast::Program::into_lines`], or use
//!     [`dumps`] / [`dump`] to run everything in one call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tracesmith::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Read traces and weight files from disk.
//!     let scanned = scan(&["scenarios/"])?;
//!
//!     // Resolve plugins up front: unknown names fail here, before any work.
//!     let compiler = Compiler::builder(scanned.listing)
//!         .with_plugin("dummy")
//!         .with_denylist(Denylist::from_patterns(["google-analytics"]))
//!         .build()?;
//!
//!     let compilation = compiler.compile()?;
//!     for skipped in &compilation.skipped {
//!         eprintln!("warning: {}", skipped);
//!     }
//!
//!     // Lines are rendered lazily, one top-level statement at a time.
//!     for line in compilation.program.into_lines() {
//!         println!("{}", line?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Writing Plugins
//!
//! A plugin is a set of plain functions, one per stage it declares in its
//! [`plugin::Contract`]. Registration checks that the two match:
//!
//! ```rust
//! use tracesmith::plugin::{Contract, Hooks, PluginRegistry, Stage};
//! use tracesmith::error::BoxError;
//! use tracesmith::task::Task;
//!
//! fn drop_options(tasks: Vec<Task>) -> Result<Vec<Task>, BoxError> {
//!     Ok(tasks
//!         .into_iter()
//!         .filter(|t| t.request().method != tracesmith::session::HttpMethod::Options)
//!         .collect())
//! }
//!
//! let mut registry = PluginRegistry::with_builtins().unwrap();
//! registry
//!     .register(
//!         "drop_options",
//!         Contract::of(Stage::Task),
//!         Hooks { on_task: Some(drop_options), ..Hooks::default() },
//!     )
//!     .unwrap();
//! assert!(registry.get("drop_options").is_some());
//! ```

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod naming;
pub mod plugin;
pub mod prelude;
pub mod scenario;
pub mod session;
pub mod task;

pub use codegen::{dump, dumps};
