use super::typed::ConfigProperties;
use super::{AuthviewConfig, ConfigError};

/// A config key that is missing or unusable.
#[derive(Debug)]
pub struct MissingKeyError {
    /// Section prefix that requires this key.
    pub source: String,
    pub key: String,
    pub expected_type: String,
    /// Environment variable that would provide the key.
    pub env_hint: String,
    pub description: Option<String>,
}

impl std::fmt::Display for MissingKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  - `{}`: key '{}' ({}) - set env var `{}`",
            self.source, self.key, self.expected_type, self.env_hint
        )?;
        if let Some(desc) = &self.description {
            write!(f, " -- {desc}")?;
        }
        Ok(())
    }
}

/// Check a `ConfigProperties` section against an `AuthviewConfig`.
///
/// Reports every required key that is absent. When nothing is absent, the
/// section is constructed once to surface type mismatches and invalid values.
pub fn validate_section<C: ConfigProperties>(config: &AuthviewConfig) -> Vec<MissingKeyError> {
    let prefix = C::prefix();

    let mut errors: Vec<MissingKeyError> = C::properties_metadata()
        .into_iter()
        .filter(|prop| prop.required && !config.contains_key(prop.full_key))
        .map(|prop| MissingKeyError {
            source: prefix.to_string(),
            key: prop.full_key.to_string(),
            expected_type: prop.type_name.to_string(),
            env_hint: prop.env_var(),
            description: Some(prop.description.to_string()),
        })
        .collect();

    if errors.is_empty() {
        if let Err(e) = C::from_config(config) {
            let (key, expected_type, description) = match e {
                ConfigError::TypeMismatch { key, expected } => {
                    (key, expected.to_string(), Some(format!("type mismatch: expected {expected}")))
                }
                ConfigError::Invalid { key, message } => (key, "valid".to_string(), Some(message)),
                ConfigError::NotFound(key) => (key, "unknown".to_string(), None),
                ConfigError::Load(message) => (prefix.to_string(), "loadable".to_string(), Some(message)),
            };
            errors.push(MissingKeyError {
                source: prefix.to_string(),
                env_hint: key.to_uppercase().replace('.', "_"),
                key,
                expected_type,
                description,
            });
        }
    }

    errors
}
