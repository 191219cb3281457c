use super::{AuthviewConfig, ConfigError};

/// Metadata about a single configuration property.
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    /// Absolute key (e.g., `"authview.auth.client_id"`).
    pub full_key: &'static str,
    /// Rust type name (e.g., `"String"`).
    pub type_name: &'static str,
    /// Whether the property is required (no default and not `Option`).
    pub required: bool,
    /// Default value as a string, if any.
    pub default_value: Option<&'static str>,
    pub description: &'static str,
}

impl PropertyMeta {
    /// Environment variable that overrides this property.
    pub fn env_var(&self) -> String {
        self.full_key.to_uppercase().replace('.', "_")
    }
}

/// Strongly-typed configuration section read from an [`AuthviewConfig`].
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g., `"authview"`).
    fn prefix() -> &'static str;

    /// Metadata about all expected properties.
    fn properties_metadata() -> Vec<PropertyMeta>;

    /// Construct from an `AuthviewConfig` instance.
    fn from_config(config: &AuthviewConfig) -> Result<Self, ConfigError>;
}
