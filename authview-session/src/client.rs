use std::future::Future;

use tokio::sync::broadcast;

use crate::error::ClientError;
use crate::types::{
    AccountInfo, AuthenticationResult, InteractionStatus, LoginRequest, LogoutRequest,
    SilentRequest,
};

/// The identity library the session controller depends on.
///
/// The library owns the OAuth2/OIDC flow, the token cache, redirect handling
/// and the active account. This crate only reads from it and asks it to act.
/// Implement this trait over the real library; use
/// `authview_test::FakeIdentityClient` in tests.
pub trait IdentityClient: Send + Sync + 'static {
    /// Subscribe to interaction status changes.
    ///
    /// Statuses sent after this call returns are delivered to the receiver.
    fn subscribe_status(&self) -> broadcast::Receiver<InteractionStatus>;

    /// The current interaction status.
    fn interaction_status(&self) -> InteractionStatus;

    /// Every account in the library's cache.
    fn all_accounts(&self) -> Vec<AccountInfo>;

    /// The account tokens are acquired for by default, if one is set.
    fn active_account(&self) -> Option<AccountInfo>;

    fn set_active_account(&self, account: Option<AccountInfo>);

    /// Acquire an access token from the cache or a refresh, without prompting.
    fn acquire_token_silent(
        &self,
        request: SilentRequest,
    ) -> impl Future<Output = Result<AuthenticationResult, ClientError>> + Send;

    /// Run an interactive login in a popup and return its result.
    fn login_popup(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<AuthenticationResult, ClientError>> + Send;

    /// Start an interactive login by redirecting away from the page.
    fn login_redirect(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn logout_popup(
        &self,
        request: LogoutRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn logout_redirect(
        &self,
        request: LogoutRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
