//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::{TreePolicy, DIRECTOR_LABEL};

/// How node ids are generated for a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// 1, 2, 3, ... starting at `first_id`
    #[default]
    Sequential,
    /// Random v4 UUIDs
    Uuid,
}

impl FromStr for IdScheme {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdScheme::Sequential),
            "uuid" => Ok(IdScheme::Uuid),
            other => Err(ApplicationError::Config {
                message: format!("unknown id_scheme '{other}' (expected sequential or uuid)"),
            }),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::Sequential => f.write_str("sequential"),
            IdScheme::Uuid => f.write_str("uuid"),
        }
    }
}

/// Raw policy for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPolicy {
    pub allow_nested_branch_members: Option<bool>,
    pub allow_nested_subordinates: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub director_label: Option<String>,
    pub id_scheme: Option<IdScheme>,
    pub first_id: Option<u64>,
    pub policy: RawPolicy,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Label of the root node (default: "Director")
    pub director_label: String,
    /// Id generation scheme (default: sequential)
    pub id_scheme: IdScheme,
    /// First id handed out by the sequential scheme; the Director gets it
    pub first_id: u64,
    /// Insertion rules
    pub policy: TreePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            director_label: DIRECTOR_LABEL.to_string(),
            id_scheme: IdScheme::default(),
            first_id: 1,
            policy: TreePolicy::default(),
        }
    }
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
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

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            director_label: overlay
                .director_label
                .clone()
                .unwrap_or_else(|| self.director_label.clone()),
            id_scheme: overlay.id_scheme.unwrap_or(self.id_scheme),
            first_id: overlay.first_id.unwrap_or(self.first_id),
            policy: TreePolicy {
                allow_nested_branch_members: overlay
                    .policy
                    .allow_nested_branch_members
                    .unwrap_or(self.policy.allow_nested_branch_members),
                allow_nested_subordinates: overlay
                    .policy
                    .allow_nested_subordinates
                    .unwrap_or(self.policy.allow_nested_subordinates),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), config_file)?.with_env_overrides(None)
    }

    /// File layers only: defaults, then `global` if it exists, then `config_file`.
    #[instrument(level = "debug")]
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current.validate()?;
        Ok(current)
    }

    /// Apply `ORGTREE_*` environment variables as explicit overrides.
    ///
    /// `vars` replaces the process environment when given. Nested keys use `__`,
    /// e.g. `ORGTREE_POLICY__ALLOW_NESTED_BRANCH_MEMBERS=true`.
    pub fn with_env_overrides(
        mut self,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let env = Environment::with_prefix("ORGTREE")
            .prefix_separator("_")
            .separator("__")
            .source(vars);
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "director_label")? {
            self.director_label = val;
        }
        if let Some(val) = env_value(&config, "id_scheme")? {
            self.id_scheme = val.parse()?;
        }
        if let Some(val) = env_value(&config, "first_id")? {
            self.first_id = val.trim().parse().map_err(|_| ApplicationError::Config {
                message: format!("first_id must be a non-negative integer: {val}"),
            })?;
        }
        if let Some(val) = env_value(&config, "policy.allow_nested_branch_members")? {
            self.policy.allow_nested_branch_members =
                parse_bool("policy.allow_nested_branch_members", &val)?;
        }
        if let Some(val) = env_value(&config, "policy.allow_nested_subordinates")? {
            self.policy.allow_nested_subordinates =
                parse_bool("policy.allow_nested_subordinates", &val)?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.director_label.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "director_label must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/orgtree/orgtree.toml
#   Explicit: orgtree --config <file>
#   Env:      ORGTREE_* environment variables (nested keys use "__")

# Label of the root node
# director_label = "Director"

# Id generation: "sequential" (1, 2, 3, ...) or "uuid"
# id_scheme = "sequential"

# First id of the sequential scheme (the director receives it)
# first_id = 1

[policy]
# Allow branch members under branch members ("Branch member 2/1" as target)
# allow_nested_branch_members = false

# Offer "add subordinate" on subordinates and branch members, not only the director
# allow_nested_subordinates = true
"#
        .to_string()
    }
}

/// Raw string for `key`, `None` when the variable is not set.
fn env_value(config: &Config, key: &str) -> Result<Option<String>, ApplicationError> {
    match config.get_string(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn parse_bool(key: &str, val: &str) -> Result<bool, ApplicationError> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApplicationError::Config {
            message: format!("{key} must be true or false: {val}"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
