use authview_claims::Claims;
use serde::{Deserialize, Serialize};

/// What the identity library is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionStatus {
    /// The library is initializing.
    Startup,
    Login,
    Logout,
    AcquireToken,
    SsoSilent,
    /// The library is processing the response of a redirect.
    HandleRedirect,
    /// No interaction is in progress.
    Idle,
}

impl InteractionStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionStatus::Idle)
    }
}

/// A signed-in account as cached by the identity library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Identifier of the account across tenants (`<oid>.<tid>` for Entra ID).
    pub home_account_id: String,
    /// Host of the authority that issued the account's tokens.
    pub environment: String,
    pub tenant_id: String,
    pub username: String,
    pub local_account_id: String,
    pub name: Option<String>,
    /// Claims of the ID token this account was signed in with.
    pub id_token_claims: Option<Claims>,
}

/// Result of a successful token acquisition or popup login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub id_token: String,
    /// Scopes the access token was actually granted for.
    pub scopes: Vec<String>,
    pub account: Option<AccountInfo>,
    /// Expiry of the access token, in seconds since the Unix epoch.
    pub expires_on: Option<u64>,
}

/// Prompt hint passed to an interactive login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// Force the user to enter credentials.
    Login,
    Consent,
    SelectAccount,
    /// Show the account creation experience.
    Create,
}

impl Prompt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prompt::Login => "login",
            Prompt::Consent => "consent",
            Prompt::SelectAccount => "select_account",
            Prompt::Create => "create",
        }
    }
}

/// Parameters of an interactive login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub scopes: Vec<String>,
    pub prompt: Option<Prompt>,
}

/// Parameters of a silent token acquisition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SilentRequest {
    pub scopes: Vec<String>,
    pub account: AccountInfo,
}

/// Parameters of an interactive logout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Account to sign out; `None` signs out every cached account.
    pub account: Option<AccountInfo>,
    pub post_logout_redirect_uri: Option<String>,
}
