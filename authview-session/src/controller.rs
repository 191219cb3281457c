use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use authview_claims::{create_claims_table, create_claims_table_opt, decode_unverified};
use authview_core::{InteractionType, LoginConfig};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::client::IdentityClient;
use crate::display::SessionDisplay;
use crate::error::ClientError;
use crate::types::{AccountInfo, LoginRequest, LogoutRequest, Prompt, SilentRequest};

/// Bridges identity library events to [`SessionDisplay`] state.
///
/// Every time the library reports that no interaction is in progress, the
/// controller rebuilds the display: whether anyone is signed in, the claims of
/// the active account's ID token, and, when signed in, the claims of an access
/// token acquired silently.
///
/// Refreshes triggered by consecutive idle events run concurrently. Each one
/// takes a generation number when it starts, and publishes its account state
/// and its access token only if no newer refresh has started since.
///
/// # Example
///
/// ```ignore
/// let controller = Arc::new(SessionController::new(client, &login_config));
/// let handle = controller.activate();
/// let mut display = controller.subscribe();
/// while display.changed().await.is_ok() {
///     render(&display.borrow());
/// }
/// handle.deactivate().await;
/// ```
pub struct SessionController<C: IdentityClient> {
    client: Arc<C>,
    scopes: Vec<String>,
    interaction_type: InteractionType,
    post_logout_redirect_uri: String,
    pii_logging: bool,
    display: watch::Sender<SessionDisplay>,
    generation: AtomicU64,
}

impl<C: IdentityClient> SessionController<C> {
    /// Create a controller over `client`, requesting the scopes in `config`.
    pub fn new(client: Arc<C>, config: &LoginConfig) -> Self {
        let (display, _) = watch::channel(SessionDisplay::default());
        Self {
            client,
            scopes: config.scopes.clone(),
            interaction_type: config.interaction_type,
            post_logout_redirect_uri: config.post_logout_redirect_uri.clone(),
            pii_logging: config.pii_logging_enabled,
            display,
            generation: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// A snapshot of the current display state.
    pub fn display(&self) -> SessionDisplay {
        self.display.borrow().clone()
    }

    /// Watch the display state; the receiver is notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionDisplay> {
        self.display.subscribe()
    }

    /// Start reacting to the identity library's interaction status.
    ///
    /// If the library is already idle, one refresh runs right away. The
    /// subscription and any refresh still running are released when the
    /// returned handle is deactivated or dropped.
    pub fn activate(self: &Arc<Self>) -> SessionHandle {
        let cancel = CancellationToken::new();
        let mut statuses = self.client.subscribe_status();
        let initial = self.client.interaction_status();

        let controller = Arc::clone(self);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            debug!(status = ?initial, "Session controller activated");
            if initial.is_idle() {
                controller.spawn_refresh(&token);
            }
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    received = statuses.recv() => match received {
                        Ok(status) if status.is_idle() => controller.spawn_refresh(&token),
                        Ok(status) => trace!(?status, "Interaction in progress"),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Interaction status stream lagged");
                            if controller.client.interaction_status().is_idle() {
                                controller.spawn_refresh(&token);
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Interaction status stream closed");
                            break;
                        }
                    },
                }
            }
            debug!("Session controller deactivated");
        });

        SessionHandle {
            cancel,
            task: Some(task),
        }
    }

    fn spawn_refresh(self: &Arc<Self>, cancel: &CancellationToken) {
        let controller = Arc::clone(self);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = controller.refresh() => {}
            }
        });
    }

    /// Rebuild the display from the identity library's current state.
    ///
    /// Resolves once the silent token acquisition (if any) has settled.
    /// Never fails: an access token that cannot be acquired is logged and
    /// left out of the display.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let is_signed_in = !self.client.all_accounts().is_empty();
        let active = self.client.active_account();
        let id_token_claims =
            create_claims_table_opt(active.as_ref().and_then(|a| a.id_token_claims.as_ref()));

        debug!(
            generation,
            is_signed_in,
            has_active_account = active.is_some(),
            id_claims = id_token_claims.len(),
            "Refreshing session display"
        );

        let published = self.display.send_if_modified(|display| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *display = SessionDisplay {
                is_signed_in,
                id_token_claims,
                access_token: None,
                access_token_claims: Vec::new(),
            };
            true
        });
        if !published {
            debug!(generation, "Discarding display from a superseded refresh");
            return;
        }

        if is_signed_in {
            self.load_access_token(generation, active).await;
        }
    }

    async fn load_access_token(&self, generation: u64, account: Option<AccountInfo>) {
        let Some(account) = account else {
            debug!(generation, "No active account, skipping silent token acquisition");
            return;
        };
        if self.pii_logging {
            debug!(generation, username = %account.username, "Acquiring access token silently");
        }

        let request = SilentRequest {
            scopes: self.scopes.clone(),
            account,
        };
        let result = match self.client.acquire_token_silent(request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(generation, error = %err, "Failed to acquire access token silently");
                return;
            }
        };
        if result.access_token.is_empty() {
            debug!(generation, "Silent acquisition returned no access token");
            return;
        }

        // Unverified: the claims are only displayed, never trusted.
        let rows = create_claims_table(&decode_unverified(&result.access_token));
        let claim_count = rows.len();
        let applied = self.display.send_if_modified(|display| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            display.access_token = Some(result.access_token);
            display.access_token_claims = rows;
            true
        });

        if applied {
            debug!(generation, access_claims = claim_count, "Access token displayed");
        } else {
            debug!(generation, "Discarding access token from a superseded refresh");
        }
    }

    /// Start an interactive login that offers account creation.
    ///
    /// With popups, the returned account becomes the active account. Errors
    /// from the identity library are returned unchanged.
    pub async fn sign_up(&self) -> Result<(), ClientError> {
        self.login(Some(Prompt::Create)).await
    }

    /// Start an interactive login.
    pub async fn sign_in(&self) -> Result<(), ClientError> {
        self.login(None).await
    }

    async fn login(&self, prompt: Option<Prompt>) -> Result<(), ClientError> {
        let request = LoginRequest {
            scopes: self.scopes.clone(),
            prompt,
        };
        debug!(
            interaction = self.interaction_type.as_str(),
            prompt = prompt.map(|p| p.as_str()),
            "Starting interactive login"
        );
        match self.interaction_type {
            InteractionType::Popup => {
                let result = self.client.login_popup(request).await?;
                self.client.set_active_account(result.account);
            }
            InteractionType::Redirect => self.client.login_redirect(request).await?,
        }
        Ok(())
    }

    /// Sign the active account out, returning to the post-logout redirect URI.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let request = LogoutRequest {
            account: self.client.active_account(),
            post_logout_redirect_uri: Some(self.post_logout_redirect_uri.clone()),
        };
        debug!(interaction = self.interaction_type.as_str(), "Starting logout");
        match self.interaction_type {
            InteractionType::Popup => self.client.logout_popup(request).await,
            InteractionType::Redirect => self.client.logout_redirect(request).await,
        }
    }
}

/// Keeps a [`SessionController`] subscribed to the identity library.
///
/// Dropping the handle stops the subscription; [`deactivate`](Self::deactivate)
/// also waits for the subscription task to finish.
pub struct SessionHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop the subscription and wait until it is released.
    pub async fn deactivate(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
