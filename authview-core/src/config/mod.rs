mod loader;
pub mod secrets;
pub mod typed;
pub mod validation;
pub mod value;

use std::collections::HashMap;
use std::ops::Deref;
use std::path::Path;

pub use secrets::{DefaultSecretResolver, SecretResolver};
pub use typed::{ConfigProperties, PropertyMeta};
pub use validation::{validate_section, MissingKeyError};
pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
    /// The value was read but is not acceptable (e.g. an empty client id).
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Environment variable that selects the active profile.
pub const PROFILE_ENV: &str = "AUTHVIEW_PROFILE";

/// Application configuration loaded from YAML files, `.env` files, and environment variables.
///
/// `AuthviewConfig` (= `AuthviewConfig<()>`) provides raw key-value access only.
/// `AuthviewConfig<T>` adds typed access to a section via `Deref<Target = T>`.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into process environment)
/// 4. `.env.{profile}` file (loaded into process environment)
/// 5. Environment variables (`AUTHVIEW_AUTH_AUTHORITY` overrides `authview.auth.authority`,
///    `AUTHVIEW_LOGIN_SCOPES_0` overrides the first entry of `authview.login.scopes`)
///
/// `.env` files never overwrite already-set environment variables.
///
/// Profile is determined by: `AUTHVIEW_PROFILE` env var > argument.
#[derive(Debug, Clone)]
pub struct AuthviewConfig<T = ()> {
    values: HashMap<String, ConfigValue>,
    profile: String,
    typed: T,
}

impl AuthviewConfig {
    /// Load configuration for the given profile from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile, &DefaultSecretResolver)
    }

    /// Load configuration for the given profile, looking for files in `dir`.
    ///
    /// `${...}` placeholders in string values are resolved with `resolver`
    /// before environment variables are overlaid.
    pub fn load_from_dir(
        dir: &Path,
        profile: &str,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(
            &dir.join(format!("application-{active_profile}.yaml")),
            &mut values,
        )?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        resolve_string_values(&mut values, resolver)?;

        // `authview.auth.authority` <-> `AUTHVIEW_AUTH_AUTHORITY`
        for (env_key, env_val) in std::env::vars() {
            if !env_key.starts_with("AUTHVIEW_") || env_key == PROFILE_ENV {
                continue;
            }
            let config_key = env_key.to_lowercase().replace('_', ".");
            values.insert(config_key, ConfigValue::String(env_val));
        }
        merge_indexed_entries(&mut values);

        tracing::debug!(profile = %active_profile, keys = values.len(), "Configuration loaded");

        Ok(AuthviewConfig {
            values,
            profile: active_profile,
            typed: (),
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(AuthviewConfig {
            values,
            profile: profile.to_string(),
            typed: (),
        })
    }

    /// Create an empty config (useful for testing).
    pub fn empty() -> Self {
        AuthviewConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
            typed: (),
        }
    }

    /// Set a value programmatically.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Upgrade to a typed config by constructing `C` from the raw values.
    ///
    /// ```ignore
    /// let config = AuthviewConfig::load("dev")?.with_typed::<LoginConfig>()?;
    /// config.client_id  // typed field access via Deref
    /// ```
    pub fn with_typed<C: ConfigProperties>(self) -> Result<AuthviewConfig<C>, ConfigError> {
        let typed = C::from_config(&self)?;
        Ok(AuthviewConfig {
            values: self.values,
            profile: self.profile,
            typed,
        })
    }
}

impl<T> AuthviewConfig<T> {
    /// Get a typed value for the given dot-separated key.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning a default if the key is missing.
    ///
    /// A present value of the wrong type is still an error.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> Result<V, ConfigError> {
        match self.get(key) {
            Err(ConfigError::NotFound(_)) => Ok(default),
            other => other,
        }
    }

    /// Check whether a key exists in the config.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Get a reference to the typed config layer.
    pub fn typed(&self) -> &T {
        &self.typed
    }

    /// Environment variables cannot tell `client_id` from `client.id`, so a key
    /// containing underscores is also looked up in its dotted spelling. The
    /// dotted spelling wins since it can only come from the environment.
    fn lookup(&self, key: &str) -> Option<&ConfigValue> {
        if key.contains('_') {
            if let Some(value) = self.values.get(&key.replace('_', ".")) {
                return Some(value);
            }
        }
        self.values.get(key)
    }
}

impl<T> Deref for AuthviewConfig<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.typed
    }
}

/// Write `key.0`, `key.1`, ... back into the list stored under `key`, so an
/// override of a single entry is seen by readers of the whole list.
fn merge_indexed_entries(values: &mut HashMap<String, ConfigValue>) {
    let list_keys: Vec<String> = values
        .iter()
        .filter(|(_, v)| matches!(v, ConfigValue::List(_)))
        .map(|(k, _)| k.clone())
        .collect();
    for key in list_keys {
        let Some(ConfigValue::List(items)) = values.get(&key) else {
            continue;
        };
        let merged: Vec<ConfigValue> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                values
                    .get(&format!("{key}.{i}"))
                    .cloned()
                    .unwrap_or_else(|| item.clone())
            })
            .collect();
        values.insert(key, ConfigValue::List(merged));
    }
}

fn resolve_string_values(
    values: &mut HashMap<String, ConfigValue>,
    resolver: &dyn SecretResolver,
) -> Result<(), ConfigError> {
    for value in values.values_mut() {
        match value {
            ConfigValue::String(s) if s.contains("${") => {
                *s = secrets::resolve_placeholders(s, resolver)?;
            }
            ConfigValue::List(items) => {
                for item in items.iter_mut() {
                    if let ConfigValue::String(s) = item {
                        if s.contains("${") {
                            *s = secrets::resolve_placeholders(s, resolver)?;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
