//! Configuration for global rule defaults
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (osom.toml)
//! - Environment variables (OSOM__*)
//!
//! ## Example config file (osom.toml):
//! ```toml
//! [rules]
//! casting = true
//! required = true
//! required_message = "this field is mandatory"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::schema::{Required, RuleDescriptor};

/// Main configuration for the normalizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Rule defaults merged under every field
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Data-only subset of the global rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Cast input values to the declared type
    #[serde(default = "default_true")]
    pub casting: bool,

    /// Fail when a field has no value
    #[serde(default)]
    pub required: bool,

    /// Replaces the generic message when a required field is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
}

/// File name searched for in the working directory and the user config dir
pub const CONFIG_FILE: &str = "osom.toml";

/// Prefix of environment overrides, e.g. `OSOM__RULES__CASTING=false`
pub const ENV_PREFIX: &str = "OSOM";

/// Candidate config files in increasing precedence; the user config dir
/// entry is only included when the file exists.
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![
        PathBuf::from(CONFIG_FILE),
        PathBuf::from(format!(".{CONFIG_FILE}")),
        Path::new("config").join(CONFIG_FILE),
    ];

    if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "osom") {
        let user_config = dirs.config_dir().join(CONFIG_FILE);
        if user_config.exists() {
            locations.push(user_config);
        }
    }
    locations
}

fn default_true() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            casting: true,
            required: false,
            required_message: None,
        }
    }
}

impl NormalizerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file at `config_path`.
    ///
    /// Later sources override earlier ones: default locations, then the
    /// explicit file, then `OSOM__*` environment variables.
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let optional = default_locations()
            .into_iter()
            .map(|path| File::from(path).required(false));
        let explicit = config_path.map(|path| File::with_name(path).required(true));

        Config::builder()
            .add_source(optional.chain(explicit).collect::<Vec<_>>())
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Global rules to pass to [`compile`](crate::compile)
    pub fn global_rules(&self) -> RuleDescriptor {
        let required = match &self.rules.required_message {
            Some(message) => Required::WithMessage(self.rules.required, Some(message.clone())),
            None => Required::Flag(self.rules.required),
        };
        RuleDescriptor::new()
            .casting(self.rules.casting)
            .required(required)
    }
}
