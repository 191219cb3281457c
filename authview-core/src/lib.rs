//! Core of authview: layered login configuration and tracing setup.

pub mod config;
pub mod logging;
pub mod login;

pub use config::{
    validate_section, AuthviewConfig, ConfigError, ConfigProperties, ConfigValue,
    DefaultSecretResolver, FromConfigValue, MissingKeyError, PropertyMeta, SecretResolver,
};
pub use logging::{default_directive, init_tracing, LogFormat};
pub use login::{CacheLocation, InteractionType, LogLevel, LoginConfig, DEFAULT_AUTHORITY};

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::{AuthviewConfig, ConfigError, InteractionType, LoginConfig};
}
