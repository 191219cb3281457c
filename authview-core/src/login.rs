use serde::{Deserialize, Serialize};

use crate::config::{AuthviewConfig, ConfigError, ConfigProperties, ConfigValue, FromConfigValue, PropertyMeta};

/// Default authority: the multi-tenant Microsoft identity platform endpoint.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common";

/// Where the identity library keeps its token cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheLocation {
    /// Shared by every tab of the origin. Enables single sign-on across tabs.
    LocalStorage,
    /// Scoped to one tab; cleared when the tab closes.
    #[default]
    SessionStorage,
}

impl CacheLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLocation::LocalStorage => "localStorage",
            CacheLocation::SessionStorage => "sessionStorage",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "localstorage" | "local" => Some(CacheLocation::LocalStorage),
            "sessionstorage" | "session" => Some(CacheLocation::SessionStorage),
            _ => None,
        }
    }
}

/// Verbosity of the identity library logger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    #[default]
    Info,
    Verbose,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Trace => "trace",
        }
    }

    /// The equivalent `tracing` level.
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Verbose => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warning" | "warn" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "verbose" | "debug" => Some(LogLevel::Verbose),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// How interactive flows (sign-in, sign-up, sign-out) are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    /// A popup window; the call resolves with the result.
    Popup,
    /// A full-page redirect; the call has no result in this page.
    #[default]
    Redirect,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Popup => "popup",
            InteractionType::Redirect => "redirect",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popup" => Some(InteractionType::Popup),
            "redirect" => Some(InteractionType::Redirect),
            _ => None,
        }
    }
}

macro_rules! impl_from_config_enum {
    ($($ty:ty => $expected:literal),+ $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
                    let raw = String::from_config_value(value, key)?;
                    <$ty>::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                        key: key.to_string(),
                        message: format!("'{raw}' is not one of {}", $expected),
                    })
                }
            }
        )+
    };
}

impl_from_config_enum!(
    CacheLocation => "localStorage, sessionStorage",
    LogLevel => "error, warning, info, verbose, trace",
    InteractionType => "popup, redirect",
);

/// Identity client configuration, constructed once at startup and never mutated.
///
/// ```yaml
/// authview:
///   auth:
///     client_id: "675bdfbe-4b0b-480d-802d-d3d6405dda47"
///     authority: "https://login.microsoftonline.com/<tenant-id>"
///     redirect_uri: "/"
///     post_logout_redirect_uri: "/"
///   cache:
///     location: localStorage
///   system:
///     log_level: verbose
///     pii_logging_enabled: false
///   login:
///     scopes:
///       - "api://675bdfbe-4b0b-480d-802d-d3d6405dda47/.default"
///   guard:
///     interaction_type: redirect
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Application (client) id registered with the identity provider. Required.
    pub client_id: String,
    pub authority: String,
    /// Where the provider sends the user back after sign-in.
    pub redirect_uri: String,
    pub post_logout_redirect_uri: String,
    pub cache_location: CacheLocation,
    pub log_level: LogLevel,
    /// Whether personal data (usernames, token contents) may appear in logs.
    pub pii_logging_enabled: bool,
    /// Scopes requested on sign-in and silent token acquisition, in order.
    pub scopes: Vec<String>,
    pub interaction_type: InteractionType,
}

const KEY_CLIENT_ID: &str = "authview.auth.client_id";
const KEY_AUTHORITY: &str = "authview.auth.authority";
const KEY_REDIRECT_URI: &str = "authview.auth.redirect_uri";
const KEY_POST_LOGOUT_REDIRECT_URI: &str = "authview.auth.post_logout_redirect_uri";
const KEY_CACHE_LOCATION: &str = "authview.cache.location";
const KEY_LOG_LEVEL: &str = "authview.system.log_level";
const KEY_PII_LOGGING: &str = "authview.system.pii_logging_enabled";
const KEY_SCOPES: &str = "authview.login.scopes";
const KEY_INTERACTION_TYPE: &str = "authview.guard.interaction_type";

impl LoginConfig {
    /// Create a config with the given client id and defaults for everything else.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authority: DEFAULT_AUTHORITY.to_string(),
            redirect_uri: "/".to_string(),
            post_logout_redirect_uri: "/".to_string(),
            cache_location: CacheLocation::default(),
            log_level: LogLevel::default(),
            pii_logging_enabled: false,
            scopes: Vec::new(),
            interaction_type: InteractionType::default(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    pub fn with_post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uri = uri.into();
        self
    }

    pub fn with_cache_location(mut self, location: CacheLocation) -> Self {
        self.cache_location = location;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_pii_logging(mut self, enabled: bool) -> Self {
        self.pii_logging_enabled = enabled;
        self
    }

    /// Set the requested scopes. Order is preserved.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interaction_type(mut self, interaction_type: InteractionType) -> Self {
        self.interaction_type = interaction_type;
        self
    }

    /// Check the values that the identity library would reject at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: KEY_CLIENT_ID.into(),
                message: "client id must not be empty".into(),
            });
        }
        let authority = url::Url::parse(&self.authority).map_err(|e| ConfigError::Invalid {
            key: KEY_AUTHORITY.into(),
            message: format!("not a valid URL: {e}"),
        })?;
        if !matches!(authority.scheme(), "https" | "http") {
            return Err(ConfigError::Invalid {
                key: KEY_AUTHORITY.into(),
                message: format!("unsupported scheme '{}'", authority.scheme()),
            });
        }
        if let Some(blank) = self.scopes.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: format!("{KEY_SCOPES}[{blank}]"),
                message: "scope must not be blank".into(),
            });
        }
        Ok(())
    }
}

impl ConfigProperties for LoginConfig {
    fn prefix() -> &'static str {
        "authview"
    }

    fn properties_metadata() -> Vec<PropertyMeta> {
        vec![
            PropertyMeta {
                full_key: KEY_CLIENT_ID,
                type_name: "String",
                required: true,
                default_value: None,
                description: "Application (client) id registered with the identity provider",
            },
            PropertyMeta {
                full_key: KEY_AUTHORITY,
                type_name: "String",
                required: false,
                default_value: Some(DEFAULT_AUTHORITY),
                description: "Authority URL of the identity provider",
            },
            PropertyMeta {
                full_key: KEY_REDIRECT_URI,
                type_name: "String",
                required: false,
                default_value: Some("/"),
                description: "Redirect URI after sign-in",
            },
            PropertyMeta {
                full_key: KEY_POST_LOGOUT_REDIRECT_URI,
                type_name: "String",
                required: false,
                default_value: Some("/"),
                description: "Redirect URI after sign-out",
            },
            PropertyMeta {
                full_key: KEY_CACHE_LOCATION,
                type_name: "CacheLocation",
                required: false,
                default_value: Some("sessionStorage"),
                description: "Token cache location: localStorage or sessionStorage",
            },
            PropertyMeta {
                full_key: KEY_LOG_LEVEL,
                type_name: "LogLevel",
                required: false,
                default_value: Some("info"),
                description: "Log verbosity: error, warning, info, verbose or trace",
            },
            PropertyMeta {
                full_key: KEY_PII_LOGGING,
                type_name: "bool",
                required: false,
                default_value: Some("false"),
                description: "Allow personal data in log output",
            },
            PropertyMeta {
                full_key: KEY_SCOPES,
                type_name: "Vec<String>",
                required: false,
                default_value: Some("[]"),
                description: "Scopes requested on sign-in and silent token acquisition",
            },
            PropertyMeta {
                full_key: KEY_INTERACTION_TYPE,
                type_name: "InteractionType",
                required: false,
                default_value: Some("redirect"),
                description: "Interactive flow style: popup or redirect",
            },
        ]
    }

    fn from_config(config: &AuthviewConfig) -> Result<Self, ConfigError> {
        let defaults = LoginConfig::new(String::new());
        let login = LoginConfig {
            client_id: config.get(KEY_CLIENT_ID)?,
            authority: config.get_or(KEY_AUTHORITY, defaults.authority)?,
            redirect_uri: config.get_or(KEY_REDIRECT_URI, defaults.redirect_uri)?,
            post_logout_redirect_uri: config
                .get_or(KEY_POST_LOGOUT_REDIRECT_URI, defaults.post_logout_redirect_uri)?,
            cache_location: config.get_or(KEY_CACHE_LOCATION, defaults.cache_location)?,
            log_level: config.get_or(KEY_LOG_LEVEL, defaults.log_level)?,
            pii_logging_enabled: config.get_or(KEY_PII_LOGGING, defaults.pii_logging_enabled)?,
            scopes: config.get_or(KEY_SCOPES, defaults.scopes)?,
            interaction_type: config.get_or(KEY_INTERACTION_TYPE, defaults.interaction_type)?,
        };
        login.validate()?;
        Ok(login)
    }
}
