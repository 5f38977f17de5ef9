use crate::codegen::convert_with_denylist;
use crate::compiler::Compilation;
use crate::error::ConversionError;
use crate::session::{DEFAULT_DENYLIST_FILE, Denylist};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Comma-separated input paths, used when none are given on the command line.
pub const INPUT_PATHS_ENV: &str = "TRACESMITH_INPUT_PATHS";
/// Comma-separated plugin names, merged with those given on the command line.
pub const PLUGINS_ENV: &str = "TRACESMITH_PLUGINS";

/// Options as given on the command line, before merging with the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub input_paths: Vec<PathBuf>,
    pub plugins: Vec<String>,
    pub no_default_plugins: bool,
    pub denylist: Option<PathBuf>,
}

/// Everything a conversion run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_paths: Vec<PathBuf>,
    pub plugins: Vec<String>,
    pub with_default_plugins: bool,
    pub denylist_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_paths: Vec::new(),
            plugins: Vec::new(),
            with_default_plugins: true,
            denylist_path: PathBuf::from(DEFAULT_DENYLIST_FILE),
        }
    }
}

impl Config {
    /// Merges command-line options with the process environment.
    pub fn from_command_line(cli: CommandLine) -> Self {
        Self::merge(cli, |key| std::env::var(key).ok())
    }

    /// Merges command-line options with the variables `env` returns.
    ///
    /// Input paths from the command line replace those from the environment;
    /// plugins from both are kept, environment first.
    pub fn merge(cli: CommandLine, env: impl Fn(&str) -> Option<String>) -> Self {
        let env_paths: Vec<PathBuf> = env(INPUT_PATHS_ENV)
            .map(|v| split_list(&v).map(PathBuf::from).collect())
            .unwrap_or_default();
        let input_paths = if cli.input_paths.is_empty() {
            env_paths
        } else {
            if !env_paths.is_empty() {
                warn!(
                    "Input paths given on the command line override those in {}",
                    INPUT_PATHS_ENV
                );
            }
            cli.input_paths
        };

        let mut plugins: Vec<String> = env(PLUGINS_ENV)
            .map(|v| split_list(&v).map(str::to_string).collect())
            .unwrap_or_default();
        if !plugins.is_empty() && !cli.plugins.is_empty() {
            warn!(
                "Using plugins from both {} and the command line",
                PLUGINS_ENV
            );
        }
        plugins.extend(cli.plugins);

        Self {
            input_paths,
            plugins,
            with_default_plugins: !cli.no_default_plugins,
            denylist_path: cli
                .denylist
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DENYLIST_FILE)),
        }
    }

    pub fn denylist(&self) -> Denylist {
        Denylist::from_file(&self.denylist_path)
    }

    /// Runs the whole conversion described by this configuration.
    pub fn convert(&self) -> Result<Compilation, ConversionError> {
        convert_with_denylist(
            &self.input_paths,
            &self.plugins,
            self.with_default_plugins,
            self.denylist(),
        )
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn command_line_paths_override_environment() {
        let cli = CommandLine {
            input_paths: vec!["a.har".into()],
            ..CommandLine::default()
        };
        let config = Config::merge(cli, env(&[(INPUT_PATHS_ENV, "b.har, c")]));
        assert_eq!(config.input_paths, vec![PathBuf::from("a.har")]);

        let config = Config::merge(CommandLine::default(), env(&[(INPUT_PATHS_ENV, "b.har, c")]));
        assert_eq!(config.input_paths, vec![PathBuf::from("b.har"), PathBuf::from("c")]);
    }

    #[test]
    fn plugins_are_merged_environment_first() {
        let cli = CommandLine {
            plugins: vec!["dummy".to_string()],
            no_default_plugins: true,
            ..CommandLine::default()
        };
        let config = Config::merge(cli, env(&[(PLUGINS_ENV, "sanitize_headers,")]));
        assert_eq!(config.plugins, vec!["sanitize_headers", "dummy"]);
        assert!(!config.with_default_plugins);
        assert_eq!(config.denylist_path, PathBuf::from(".urlignore"));
    }
}
