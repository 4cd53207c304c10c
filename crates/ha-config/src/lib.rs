//! YAML configuration loading
//!
//! Loads `configuration.yaml` style documents and resolves the tags used to
//! keep credentials out of the main file:
//!
//! - `!secret key` - Substitute from `secrets.yaml` next to the config
//! - `!env_var VAR` - Substitute an environment variable
//!
//! # Example
//!
//! ```ignore
//! use ha_config::load_yaml;
//!
//! // remote:
//! //   - platform: unified_remote
//! //     host: 192.168.1.50
//! //     password: !secret unified_remote_password
//! let config = load_yaml("/config", "configuration.yaml")?;
//! ```

mod error;
mod loader;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, load_yaml_string, YamlLoader, CONFIG_FILE};
pub use secrets::{Secrets, SECRETS_FILE};

// Re-export serde_yaml::Value for convenience
pub use serde_yaml::Value;
