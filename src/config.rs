//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/matrix-tree/matrix-tree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `MATRIX_TREE__*` (nesting separator `__`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::VisualSettings;

/// How `render` prints the scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree of row labels
    #[default]
    Tree,
    /// Full scene graph as JSON
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Print reconciliation counters after each update
    pub stats: bool,
}

/// Unified configuration for matrix-tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Defaults for the visual settings objects; host objects override them per update
    pub visual: VisualSettings,
    pub output: OutputSettings,
}

/// Get the XDG config directory for matrix-tree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "matrix-tree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("matrix-tree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file; it must exist when given
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Self::default();
        let defaults_toml = toml::to_string(&defaults).map_err(|e| ApplicationError::Config {
            message: format!("serialize defaults: {e}"),
        })?;

        // 1. Start with defaults
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults_toml, FileFormat::Toml));

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // 3. Local config
        if let Some(local) = local {
            if !local.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local.display()),
                });
            }
            builder = builder.add_source(File::from(local.to_path_buf()).required(true));
        }

        // 4. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("MATRIX_TREE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# matrix-tree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/matrix-tree/matrix-tree.toml
#   Local:  file given with --config
#   Env:    MATRIX_TREE__<SECTION>__<KEY>, e.g. MATRIX_TREE__OUTPUT__FORMAT=json
#
# [visual.*] values are defaults; settings objects delivered with a snapshot
# (dataViews[0].metadata.objects) override them for that update.

[visual.layout]
# Indentation per level, in px
# indent_step = 20

[visual.labels]
# "replace" rewrites labels of reused rows, "append" accumulates them
# mode = "replace"
# measures_marker = "Measures:"
# separator = "|"
# show_measures = true

[output]
# "tree" or "json"
# format = "tree"
# stats = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
