//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sarf/sarf.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `SARF_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Placeholders;

/// Default cap on roots x schemes for a single `analyze` call.
pub const DEFAULT_MAX_SEARCH_SPACE: usize = 1_000_000;

/// Unified configuration for sarf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for sarf data (default: ~/.sarf)
    pub data_dir: PathBuf,
    /// Snapshot file holding roots, derivations and schemes (default: <data_dir>/state.toml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Roots file used to seed an engine that has no snapshot yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots_file: Option<PathBuf>,
    /// The three placeholder symbols, in order (default: فعل)
    pub placeholders: String,
    /// Print words right-to-left reversed for terminals without bidi support
    pub rtl: bool,
    /// Refuse `analyze` when roots x schemes exceeds this
    pub max_search_space: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data_dir(),
            state_file: None,
            roots_file: None,
            placeholders: Placeholders::default().to_string(),
            rtl: false,
            max_search_space: DEFAULT_MAX_SEARCH_SPACE,
        }
    }
}

/// Get the default data directory (~/.sarf).
fn dirs_default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".sarf"))
        .unwrap_or_else(|| PathBuf::from("~/.sarf"))
}

/// Get the XDG config directory for sarf.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sarf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sarf.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Snapshot file, falling back to `<data_dir>/state.toml`.
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("state.toml"))
    }

    /// Parsed placeholder symbols.
    pub fn placeholders(&self) -> Result<Placeholders, ApplicationError> {
        self.placeholders
            .parse()
            .map_err(|e: crate::domain::DomainError| ApplicationError::Config {
                message: format!("placeholders: {}", e),
            })
    }

    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.state_file = self.state_file.as_deref().map(expand_path);
        self.roots_file = self.roots_file.as_deref().map(expand_path);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), config_file, true)
    }

    /// Load from explicit sources only.
    ///
    /// `global` is optional, `local` must exist if given. Environment
    /// overrides are applied when `with_env` is set.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        with_env: bool,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("placeholders", defaults.placeholders.clone())
            .map_err(config_err)?
            .set_default("rtl", defaults.rtl)
            .map_err(config_err)?
            .set_default("max_search_space", defaults.max_search_space as u64)
            .map_err(config_err)?;

        if let Some(path) = global {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(path) = local {
            builder = builder.add_source(File::from(path).required(true));
        }
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("SARF")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Validate early so a bad value fails at startup, not mid-command
        settings.placeholders()?;

        settings.expand_paths();
        Ok(settings)
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
