use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use authview_claims::Claims;
use authview_session::{
    AccountInfo, AuthenticationResult, ClientError, IdentityClient, InteractionStatus,
    LoginRequest, LogoutRequest, SilentRequest,
};
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::jwt::id_token_claims;

struct Scripted {
    delay: Option<Duration>,
    result: Result<AuthenticationResult, ClientError>,
}

/// Build a cached account for `username` with the given ID token claims.
pub fn fake_account(username: &str, id_token_claims: Option<Claims>) -> AccountInfo {
    AccountInfo {
        home_account_id: format!("{username}.tenant"),
        environment: "login.example.com".to_string(),
        tenant_id: "tenant".to_string(),
        username: username.to_string(),
        local_account_id: format!("local-{username}"),
        name: Some(username.split('@').next().unwrap_or(username).to_string()),
        id_token_claims,
    }
}

/// A token result carrying `access_token`, issued to `account`.
pub fn token_result(access_token: impl Into<String>, account: Option<AccountInfo>) -> AuthenticationResult {
    AuthenticationResult {
        access_token: access_token.into(),
        id_token: String::new(),
        scopes: Vec::new(),
        account,
        expires_on: Some(1_700_003_600),
    }
}

/// In-memory, scriptable identity library for tests and demos.
///
/// Silent and popup results are queued with `push_*`; when a queue is empty
/// silent acquisition fails with `InteractionRequired` and popups fail with
/// `UserCancelled`. Every request is recorded for assertions.
pub struct FakeIdentityClient {
    accounts: DashMap<String, AccountInfo>,
    active: Mutex<Option<AccountInfo>>,
    status: Mutex<InteractionStatus>,
    status_tx: broadcast::Sender<InteractionStatus>,
    accounts_read_delay: Mutex<Option<Duration>>,
    silent_results: Mutex<VecDeque<Scripted>>,
    popup_results: Mutex<VecDeque<Result<AuthenticationResult, ClientError>>>,
    silent_requests: Mutex<Vec<SilentRequest>>,
    popup_logins: Mutex<Vec<LoginRequest>>,
    redirect_logins: Mutex<Vec<LoginRequest>>,
    logouts: Mutex<Vec<LogoutRequest>>,
}

impl FakeIdentityClient {
    /// An empty client whose status is `Startup`.
    pub fn new() -> Self {
        let (status_tx, _) = broadcast::channel(64);
        Self {
            accounts: DashMap::new(),
            active: Mutex::new(None),
            status: Mutex::new(InteractionStatus::Startup),
            status_tx,
            accounts_read_delay: Mutex::new(None),
            silent_results: Mutex::new(VecDeque::new()),
            popup_results: Mutex::new(VecDeque::new()),
            silent_requests: Mutex::new(Vec::new()),
            popup_logins: Mutex::new(Vec::new()),
            redirect_logins: Mutex::new(Vec::new()),
            logouts: Mutex::new(Vec::new()),
        }
    }

    /// A client with one cached, active account for `username`.
    pub fn signed_in(username: &str) -> Self {
        let client = Self::new();
        let account = fake_account(username, Some(id_token_claims(username)));
        client.add_account(account.clone());
        client.set_active_account(Some(account));
        client
    }

    pub fn add_account(&self, account: AccountInfo) {
        self.accounts.insert(account.home_account_id.clone(), account);
    }

    /// Clear the cache and the active account, as after a sign-out.
    pub fn clear_accounts(&self) {
        self.accounts.clear();
        *self.active.lock().unwrap() = None;
    }

    /// Set the current status and broadcast it to subscribers.
    pub fn emit_status(&self, status: InteractionStatus) {
        *self.status.lock().unwrap() = status;
        let _ = self.status_tx.send(status);
    }

    /// Make the next `all_accounts` call block its thread for `delay` after
    /// taking its snapshot, as a slow cache read would.
    pub fn delay_next_accounts_read(&self, delay: Duration) {
        *self.accounts_read_delay.lock().unwrap() = Some(delay);
    }

    pub fn push_silent_result(&self, result: Result<AuthenticationResult, ClientError>) {
        self.silent_results
            .lock()
            .unwrap()
            .push_back(Scripted { delay: None, result });
    }

    /// Queue a silent result that resolves only after `delay`.
    pub fn push_silent_result_after(
        &self,
        delay: Duration,
        result: Result<AuthenticationResult, ClientError>,
    ) {
        self.silent_results.lock().unwrap().push_back(Scripted {
            delay: Some(delay),
            result,
        });
    }

    pub fn push_popup_result(&self, result: Result<AuthenticationResult, ClientError>) {
        self.popup_results.lock().unwrap().push_back(result);
    }

    pub fn silent_requests(&self) -> Vec<SilentRequest> {
        self.silent_requests.lock().unwrap().clone()
    }

    pub fn popup_logins(&self) -> Vec<LoginRequest> {
        self.popup_logins.lock().unwrap().clone()
    }

    pub fn redirect_logins(&self) -> Vec<LoginRequest> {
        self.redirect_logins.lock().unwrap().clone()
    }

    pub fn logouts(&self) -> Vec<LogoutRequest> {
        self.logouts.lock().unwrap().clone()
    }

    /// Number of subscribers currently listening to the status stream.
    pub fn status_subscribers(&self) -> usize {
        self.status_tx.receiver_count()
    }
}

impl Default for FakeIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityClient for FakeIdentityClient {
    fn subscribe_status(&self) -> broadcast::Receiver<InteractionStatus> {
        self.status_tx.subscribe()
    }

    fn interaction_status(&self) -> InteractionStatus {
        *self.status.lock().unwrap()
    }

    fn all_accounts(&self) -> Vec<AccountInfo> {
        let mut accounts: Vec<AccountInfo> =
            self.accounts.iter().map(|entry| entry.value().clone()).collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        let delay = self.accounts_read_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        accounts
    }

    fn active_account(&self) -> Option<AccountInfo> {
        self.active.lock().unwrap().clone()
    }

    fn set_active_account(&self, account: Option<AccountInfo>) {
        *self.active.lock().unwrap() = account;
    }

    fn acquire_token_silent(
        &self,
        request: SilentRequest,
    ) -> impl Future<Output = Result<AuthenticationResult, ClientError>> + Send {
        self.silent_requests.lock().unwrap().push(request);
        let scripted = self.silent_results.lock().unwrap().pop_front().unwrap_or(Scripted {
            delay: None,
            result: Err(ClientError::InteractionRequired("no cached token".into())),
        });
        async move {
            if let Some(delay) = scripted.delay {
                tokio::time::sleep(delay).await;
            }
            scripted.result
        }
    }

    fn login_popup(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<AuthenticationResult, ClientError>> + Send {
        self.popup_logins.lock().unwrap().push(request);
        let result = self
            .popup_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::UserCancelled));
        if let Ok(AuthenticationResult {
            account: Some(account),
            ..
        }) = &result
        {
            self.add_account(account.clone());
        }
        std::future::ready(result)
    }

    fn login_redirect(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        self.redirect_logins.lock().unwrap().push(request);
        std::future::ready(Ok(()))
    }

    fn logout_popup(
        &self,
        request: LogoutRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        self.sign_out(request);
        std::future::ready(Ok(()))
    }

    fn logout_redirect(
        &self,
        request: LogoutRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        self.sign_out(request);
        std::future::ready(Ok(()))
    }
}

impl FakeIdentityClient {
    fn sign_out(&self, request: LogoutRequest) {
        match &request.account {
            Some(account) => {
                self.accounts.remove(&account.home_account_id);
                let mut active = self.active.lock().unwrap();
                if active.as_ref().map(|a| &a.home_account_id) == Some(&account.home_account_id) {
                    *active = None;
                }
            }
            None => self.clear_accounts(),
        }
        tracing::debug!(remaining = self.accounts.len(), "Fake logout");
        self.logouts.lock().unwrap().push(request);
    }
}
