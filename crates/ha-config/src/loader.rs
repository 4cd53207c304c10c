//! YAML configuration loader with `!secret` and `!env_var` support

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Default name of the main configuration file
pub const CONFIG_FILE: &str = "configuration.yaml";

/// YAML loader bound to a configuration directory
#[derive(Debug)]
pub struct YamlLoader {
    /// Base directory for resolving relative paths
    config_dir: PathBuf,
    secrets: Secrets,
}

impl YamlLoader {
    /// Create a loader, reading `secrets.yaml` from the config directory
    pub fn new(config_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_dir = config_dir.into();
        let secrets = Secrets::load(&config_dir)?;
        Ok(Self {
            config_dir,
            secrets,
        })
    }

    /// Create a loader with pre-loaded secrets
    pub fn with_secrets(config_dir: impl Into<PathBuf>, secrets: Secrets) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets,
        }
    }

    /// Load and resolve a YAML file relative to the config directory
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = self.resolve_path(path.as_ref());
        debug!("Loading YAML file: {:?}", path);

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        self.load_string(&content, &path)
    }

    /// Load and resolve YAML from a string
    pub fn load_string(&self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        self.resolve(value)
    }

    fn resolve(&self, value: Value) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.resolve_tagged(*tagged),
            Value::Mapping(map) => {
                let mut result = serde_yaml::Mapping::with_capacity(map.len());
                for (k, v) in map {
                    result.insert(self.resolve(k)?, self.resolve(v)?);
                }
                Ok(Value::Mapping(result))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.resolve(v))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            _ => Ok(value),
        }
    }

    fn resolve_tagged(&self, tagged: TaggedValue) -> ConfigResult<Value> {
        let tag = tagged.tag.to_string();
        trace!("Resolving tag '{}'", tag);

        match tag.as_str() {
            "!secret" => {
                let key = tag_argument(&tag, tagged.value)?;
                let secret = self.secrets.get(&key)?;
                debug!("Substituted secret: {}", key);
                Ok(Value::String(secret.to_string()))
            }
            "!env_var" => {
                let var = tag_argument(&tag, tagged.value)?;
                let value = std::env::var(&var)
                    .map_err(|_| ConfigError::EnvVarNotFound { var: var.clone() })?;
                debug!("Substituted env var: {}", var);
                Ok(Value::String(value))
            }
            _ => Err(ConfigError::UnsupportedTag { tag }),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn tag_argument(tag: &str, value: Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigError::InvalidValue {
            key: tag.to_string(),
            reason: "tag argument must be a string".to_string(),
        }),
    }
}

/// Load a YAML file with tag resolution
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_file(file)
}

/// Load a YAML string with tag resolution
pub fn load_yaml_string(
    config_dir: impl Into<PathBuf>,
    content: &str,
    source_name: &str,
) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_string(content, Path::new(source_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
        path.iter().try_fold(value, |v, key| v.get(*key))
    }

    #[test]
    fn test_load_plain_yaml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "remote:\n  - platform: unified_remote\n    host: 192.168.1.50\n",
        )
        .unwrap();

        let value = load_yaml(dir.path(), CONFIG_FILE).unwrap();
        let remotes = value.get("remote").unwrap().as_sequence().unwrap();
        assert_eq!(remotes.len(), 1);
        assert_eq!(
            remotes[0].get("host").and_then(Value::as_str),
            Some("192.168.1.50")
        );
    }

    #[test]
    fn test_secret_substitution() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("secrets.yaml"), "ur_password: hunter2\n").unwrap();

        let value = load_yaml_string(
            dir.path(),
            "remote:\n  password: !secret ur_password\n",
            "inline.yaml",
        )
        .unwrap();
        assert_eq!(
            lookup(&value, &["remote", "password"]).and_then(Value::as_str),
            Some("hunter2")
        );
    }

    #[test]
    fn test_missing_secret() {
        let loader = YamlLoader::with_secrets("/config", Secrets::default());
        let result = loader.load_string("password: !secret nope\n", Path::new("x.yaml"));
        assert!(matches!(result, Err(ConfigError::SecretNotFound { key }) if key == "nope"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HA_CONFIG_TEST_UR_HOST", "10.0.0.7");
        let loader = YamlLoader::with_secrets("/config", Secrets::default());

        let value = loader
            .load_string("host: !env_var HA_CONFIG_TEST_UR_HOST\n", Path::new("x.yaml"))
            .unwrap();
        assert_eq!(value.get("host").and_then(Value::as_str), Some("10.0.0.7"));

        let result = loader.load_string(
            "host: !env_var HA_CONFIG_TEST_UNSET_VARIABLE\n",
            Path::new("x.yaml"),
        );
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound { .. })));
    }

    #[test]
    fn test_unsupported_tag() {
        let loader = YamlLoader::with_secrets("/config", Secrets::default());
        let result = loader.load_string("remote: !include remotes.yaml\n", Path::new("x.yaml"));
        assert!(matches!(result, Err(ConfigError::UnsupportedTag { tag }) if tag == "!include"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let loader = YamlLoader::with_secrets("/config", Secrets::default());
        let err = loader
            .load_string("remote: [unclosed\n", Path::new("broken.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_yaml(dir.path(), CONFIG_FILE),
            Err(ConfigError::ReadFile { .. })
        ));
    }
}
