//! eventide configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventideError, EventideResult};
use crate::expand::{DEFAULT_MAX_INSTANCES, ExpansionOptions};

static DEFAULT_TEMPLATES_DIR: &str = "~/eventide/templates";
static DEFAULT_WINDOW: &str = "12weeks";

fn default_templates_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

fn default_window() -> String {
    DEFAULT_WINDOW.to_string()
}

fn default_max_instances() -> usize {
    DEFAULT_MAX_INSTANCES
}

/// Configuration at ~/.config/eventide/config.toml, overridable with
/// `EVENTIDE_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventideConfig {
    /// Directory holding one template document per file
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// How far past the window start to expand when no end is given ("12weeks", "90days")
    #[serde(default = "default_window")]
    pub window: String,

    #[serde(default = "default_max_instances")]
    pub max_instances: usize,
}

impl Default for EventideConfig {
    fn default() -> Self {
        EventideConfig {
            templates_dir: default_templates_dir(),
            window: default_window(),
            max_instances: default_max_instances(),
        }
    }
}

impl EventideConfig {
    pub fn config_path() -> EventideResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventideError::Config("Could not determine config directory".into()))?
            .join("eventide");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented-out config there first if missing.
    pub fn load() -> EventideResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered under the environment.
    pub fn load_from(path: &Path) -> EventideResult<Self> {
        let config: EventideConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("EVENTIDE").try_parsing(true))
            .build()
            .map_err(|e| EventideError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventideError::Config(e.to_string()))?;

        // Fail at load time rather than on first use
        config.window_days()?;

        Ok(config)
    }

    /// Templates directory with `~` expanded.
    pub fn templates_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.templates_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The default window span in whole days (at least one).
    pub fn window_days(&self) -> EventideResult<i64> {
        let span = humantime::parse_duration(&self.window)
            .map_err(|e| EventideError::Config(format!("Invalid window '{}': {e}", self.window)))?;

        Ok(((span.as_secs() / 86_400) as i64).max(1))
    }

    pub fn expansion_options(&self) -> ExpansionOptions {
        ExpansionOptions::default().with_max_instances(self.max_instances)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventideResult<()> {
        let contents = format!(
            "\
# eventide configuration

# Where template documents live (one .toml or .json file per template):
# templates_dir = \"{}\"

# Default expansion span when no end date is given:
# window = \"{}\"

# Upper bound on instances produced by one expansion:
# max_instances = {}
",
            DEFAULT_TEMPLATES_DIR, DEFAULT_WINDOW, DEFAULT_MAX_INSTANCES
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventideError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventideError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
