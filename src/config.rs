//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/astviz/astviz.toml`
//! 3. Local config: `<dir>/.astviz.toml` (usually the working directory)
//! 4. Environment variables: `ASTVIZ_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Palette;

/// Node fill colors (Graphviz color names or `#rrggbb`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorsConfig {
    /// Fill for nodes whose label also occurs in the original tree
    pub unchanged: String,
    /// Fill for nodes whose label is new in the optimized tree
    pub changed: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            unchanged: palette.unchanged,
            changed: palette.changed,
        }
    }
}

impl From<&ColorsConfig> for Palette {
    fn from(colors: &ColorsConfig) -> Self {
        Palette {
            unchanged: colors.unchanged.clone(),
            changed: colors.changed.clone(),
        }
    }
}

/// Raw colors for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawColorsConfig {
    pub unchanged: Option<String>,
    pub changed: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output_dir: Option<PathBuf>,
    pub dot_program: Option<String>,
    pub fixed_names: Option<bool>,
    pub keep_dot: Option<bool>,
    pub indent_unit: Option<String>,
    #[serde(default)]
    pub colors: RawColorsConfig,
}

/// Unified configuration for astviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory receiving the rendered images (default: ".")
    pub output_dir: PathBuf,
    /// Graphviz layout program (default: "dot")
    pub dot_program: String,
    /// Write `original_ast.png` etc. without a per-run suffix
    pub fixed_names: bool,
    /// Keep the generated DOT sources next to the images
    pub keep_dot: bool,
    /// Indentation unit for re-serialized trees
    pub indent_unit: String,
    /// Node fill colors
    pub colors: ColorsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            dot_program: "dot".into(),
            fixed_names: false,
            keep_dot: false,
            indent_unit: "  ".into(),
            colors: ColorsConfig::default(),
        }
    }
}

/// Get the XDG config directory for astviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "astviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("astviz.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".astviz.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on lookup failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Color palette for rendering.
    pub fn palette(&self) -> Palette {
        Palette::from(&self.colors)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output_dir.to_string_lossy().as_ref());
        self.output_dir = PathBuf::from(expanded);

        // may be a path like ~/opt/graphviz/bin/dot
        self.dot_program = expand_env_vars(&self.dot_program);
    }

    /// Overlay config onto self: every field the overlay specifies wins.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            dot_program: overlay
                .dot_program
                .clone()
                .unwrap_or_else(|| self.dot_program.clone()),
            fixed_names: overlay.fixed_names.unwrap_or(self.fixed_names),
            keep_dot: overlay.keep_dot.unwrap_or(self.keep_dot),
            indent_unit: overlay
                .indent_unit
                .clone()
                .unwrap_or_else(|| self.indent_unit.clone()),
            colors: ColorsConfig {
                unchanged: overlay
                    .colors
                    .unchanged
                    .clone()
                    .unwrap_or_else(|| self.colors.unchanged.clone()),
                changed: overlay
                    .colors
                    .changed
                    .clone()
                    .unwrap_or_else(|| self.colors.changed.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.astviz.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/astviz/astviz.toml`
    /// 3. Local config: `<local_dir>/.astviz.toml`
    /// 4. Environment variables: `ASTVIZ_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current, None)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ASTVIZ_* environment variables as explicit overrides.
    ///
    /// `source` stands in for the process environment when given.
    /// A variable that is set but does not parse is a config error.
    fn apply_env_overrides(
        mut settings: Self,
        source: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ASTVIZ")
                    .prefix_separator("_")
                    .separator("__")
                    .source(source),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("output_dir"))? {
            settings.output_dir = PathBuf::from(val);
        }
        if let Some(val) = env_value(config.get_string("dot_program"))? {
            settings.dot_program = val;
        }
        if let Some(val) = env_value(config.get_bool("fixed_names"))? {
            settings.fixed_names = val;
        }
        if let Some(val) = env_value(config.get_bool("keep_dot"))? {
            settings.keep_dot = val;
        }
        if let Some(val) = env_value(config.get_string("indent_unit"))? {
            settings.indent_unit = val;
        }
        if let Some(val) = env_value(config.get_string("colors.unchanged"))? {
            settings.colors.unchanged = val;
        }
        if let Some(val) = env_value(config.get_string("colors.changed"))? {
            settings.colors.changed = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# astviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/astviz/astviz.toml
#   Local:  ./.astviz.toml
#   Env:    ASTVIZ_* environment variables (ASTVIZ_COLORS__CHANGED=...)

# Directory receiving the rendered images
# output_dir = "."

# Graphviz layout program
# dot_program = "dot"

# Write original_ast.png, optimized_ast_highlighted.png and ast_comparison.png
# without a per-run suffix. Concurrent runs into one directory then overwrite
# each other.
# fixed_names = false

# Keep the generated .dot sources next to the images
# keep_dot = false

# Indentation unit used by `astviz tree --plain`
# indent_unit = "  "

[colors]
# unchanged = "lightgray"
# changed = "lightgreen"
"#
        .to_string()
    }
}

/// Unset keys are `None`; present but invalid values are errors.
fn env_value<T>(found: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match found {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
