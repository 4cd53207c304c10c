//! Platform configuration for `remote: - platform: unified_remote`

use super::{PlatformError, DOMAIN};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use std::time::Duration;
use tracing::error;
use unified_remote_client::{Target, DEFAULT_PORT};

/// Display name used when none is configured
pub const DEFAULT_NAME: &str = "UnifiedRemote";

/// Upper bound for one full trigger handshake, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// One `unified_remote` platform entry
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemotePlatformConfig {
    #[serde(default = "default_platform")]
    pub platform: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Timeout for the whole handshake, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_platform() -> String {
    DOMAIN.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RemotePlatformConfig {
    /// Configuration with defaults for everything but the host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            platform: default_platform(),
            host: host.into(),
            port: DEFAULT_PORT,
            name: default_name(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, username: Option<&str>, password: &str) -> Self {
        self.username = username.map(String::from);
        self.password = Some(password.to_string());
        self
    }

    /// Parse and validate one platform entry
    pub fn from_yaml(value: &Value) -> Result<Self, PlatformError> {
        let config: Self = serde_yaml::from_value(value.clone())
            .map_err(|e| PlatformError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PlatformError> {
        if self.platform != DOMAIN {
            return Err(PlatformError::InvalidConfig(format!(
                "platform must be '{}', got '{}'",
                DOMAIN, self.platform
            )));
        }
        if self.host.trim().is_empty() {
            return Err(PlatformError::InvalidConfig("host cannot be empty".into()));
        }
        if self.port == 0 {
            return Err(PlatformError::InvalidConfig("port must be 1-65535".into()));
        }
        if self.name.trim().is_empty() {
            return Err(PlatformError::InvalidConfig("name cannot be empty".into()));
        }
        if self.timeout == 0 {
            return Err(PlatformError::InvalidConfig("timeout must be positive".into()));
        }
        Ok(())
    }

    /// The server this entry points at
    pub fn target(&self) -> Target {
        let mut target = Target::from_parts(self.host.trim(), self.port);
        if let Some(username) = &self.username {
            target = target.with_username(username.clone());
        }
        if let Some(password) = &self.password {
            target = target.with_password(password.clone());
        }
        target
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl fmt::Debug for RemotePlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePlatformConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Collect the `unified_remote` entries of the `remote:` section
///
/// `remote:` may be a single mapping or a list. Entries for other
/// platforms are ignored; invalid entries are logged and skipped.
pub fn load_platforms(config: &Value) -> Vec<RemotePlatformConfig> {
    let entries: Vec<&Value> = match config.get("remote") {
        Some(Value::Sequence(seq)) => seq.iter().collect(),
        Some(entry @ Value::Mapping(_)) => vec![entry],
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter(|entry| entry.get("platform").and_then(Value::as_str) == Some(DOMAIN))
        .filter_map(|entry| match RemotePlatformConfig::from_yaml(entry) {
            Ok(config) => Some(config),
            Err(e) => {
                error!("{}", e);
                None
            }
        })
        .collect()
}
