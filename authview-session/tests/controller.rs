use std::sync::Arc;
use std::time::Duration;

use authview_claims::{ClaimRow, Claims};
use authview_core::{InteractionType, LoginConfig};
use authview_session::{
    ClientError, DisplayPhase, IdentityClient, InteractionStatus, Prompt, SessionController,
    SessionDisplay,
};
use authview_test::{fake_account, token_result, FakeIdentityClient, TestJwt};
use serde_json::{json, Value};
use tokio::sync::watch;

const SCOPE: &str = "api://675bdfbe-4b0b-480d-802d-d3d6405dda47/.default";

fn config() -> LoginConfig {
    LoginConfig::new("675bdfbe-4b0b-480d-802d-d3d6405dda47").with_scopes([SCOPE])
}

fn controller(client: FakeIdentityClient, config: &LoginConfig) -> Arc<SessionController<FakeIdentityClient>> {
    Arc::new(SessionController::new(Arc::new(client), config))
}

fn claims(value: Value) -> Claims {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn names(rows: &[ClaimRow]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

async fn wait_for(
    rx: &mut watch::Receiver<SessionDisplay>,
    pred: impl FnMut(&SessionDisplay) -> bool,
) -> SessionDisplay {
    let display = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("timed out waiting for display")
        .expect("display channel closed");
    (*display).clone()
}

// ── refresh ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_accounts_is_signed_out() {
    let ctrl = controller(FakeIdentityClient::new(), &config());

    ctrl.refresh().await;

    let display = ctrl.display();
    assert!(!display.is_signed_in);
    assert!(display.id_token_claims.is_empty());
    assert!(display.access_token_claims.is_empty());
    assert_eq!(display.phase(), DisplayPhase::SignedOut);
    assert!(ctrl.client().silent_requests().is_empty());
}

#[tokio::test]
async fn test_silent_failure_keeps_id_claims() {
    let client = FakeIdentityClient::new();
    let account = fake_account(
        "jane@example.com",
        Some(claims(json!({
            "sub": "abc123",
            "name": "Jane Doe",
            "roles": ["admin", "user"],
        }))),
    );
    client.add_account(account.clone());
    client.set_active_account(Some(account));
    client.push_silent_result(Err(ClientError::InteractionRequired("consent".into())));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    let display = ctrl.display();
    assert!(display.is_signed_in);
    assert_eq!(display.phase(), DisplayPhase::SignedIn);
    assert_eq!(
        display
            .id_token_claims
            .iter()
            .map(|r| (r.name.as_str(), r.value.as_str(), r.sensitive))
            .collect::<Vec<_>>(),
        vec![
            ("sub", "abc123", true),
            ("name", "Jane Doe", false),
            ("roles", "[ admin, user ]", false),
        ]
    );
    assert!(display.access_token.is_none());
    assert!(display.access_token_claims.is_empty());
    assert_eq!(ctrl.client().silent_requests().len(), 1);
}

#[tokio::test]
async fn test_silent_success_shows_access_claims() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let token = TestJwt::access_token("api://675bdfbe", &["User.Read", "Files.Read"]).sign();
    client.push_silent_result(Ok(token_result(token.clone(), None)));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    let display = ctrl.display();
    assert_eq!(display.phase(), DisplayPhase::SignedInWithToken);
    assert_eq!(display.access_token.as_deref(), Some(token.as_str()));
    assert_eq!(names(&display.access_token_claims), vec!["aud", "iss", "iat", "exp", "scp"]);
    assert_eq!(display.access_token_claims[4].value, "User.Read Files.Read");
}

#[tokio::test]
async fn test_silent_request_uses_scopes_and_active_account() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let active = client.active_account();
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    let requests = ctrl.client().silent_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].scopes, vec![SCOPE.to_string()]);
    assert_eq!(Some(requests[0].account.clone()), active);
}

#[tokio::test]
async fn test_cached_account_without_active_account() {
    let client = FakeIdentityClient::new();
    client.add_account(fake_account("jane@example.com", None));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    let display = ctrl.display();
    assert!(display.is_signed_in);
    assert!(display.id_token_claims.is_empty());
    assert!(ctrl.client().silent_requests().is_empty());
}

#[tokio::test]
async fn test_empty_access_token_is_ignored() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    client.push_silent_result(Ok(token_result("", None)));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    assert_eq!(ctrl.display().phase(), DisplayPhase::SignedIn);
}

#[tokio::test]
async fn test_undecodable_access_token_has_no_claims() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    client.push_silent_result(Ok(token_result("opaque-token", None)));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;

    let display = ctrl.display();
    assert_eq!(display.access_token.as_deref(), Some("opaque-token"));
    assert!(display.access_token_claims.is_empty());
}

#[tokio::test]
async fn test_refresh_reverts_to_signed_out() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    client.push_silent_result(Ok(token_result(TestJwt::new().claim("scp", "read").sign(), None)));
    let ctrl = controller(client, &config());

    ctrl.refresh().await;
    assert_eq!(ctrl.display().phase(), DisplayPhase::SignedInWithToken);

    ctrl.client().clear_accounts();
    ctrl.refresh().await;

    assert_eq!(ctrl.display(), SessionDisplay::default());
}

#[tokio::test(start_paused = true)]
async fn test_stale_access_token_is_discarded() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let slow = TestJwt::new().claim("scp", "old").sign();
    let fast = TestJwt::new().claim("scp", "new").sign();
    client.push_silent_result_after(Duration::from_millis(100), Ok(token_result(slow, None)));
    client.push_silent_result(Ok(token_result(fast.clone(), None)));
    let ctrl = controller(client, &config());

    tokio::join!(ctrl.refresh(), ctrl.refresh());

    let display = ctrl.display();
    assert_eq!(display.access_token.as_deref(), Some(fast.as_str()));
    assert_eq!(display.access_token_claims[0].value, "new");
    assert_eq!(ctrl.client().silent_requests().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stale_refresh_does_not_overwrite_newer_display() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    client.delay_next_accounts_read(Duration::from_millis(300));
    let ctrl = controller(client, &config());

    let stale = {
        let ctrl = Arc::clone(&ctrl);
        tokio::spawn(async move { ctrl.refresh().await })
    };
    // Let the first refresh take its snapshot of the signed-in cache.
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctrl.client().clear_accounts();
    ctrl.refresh().await;
    assert_eq!(ctrl.display().phase(), DisplayPhase::SignedOut);

    stale.await.unwrap();
    assert_eq!(ctrl.display(), SessionDisplay::default());
    assert!(ctrl.client().silent_requests().is_empty());
}

// ── activate / deactivate ───────────────────────────────────────────────

#[tokio::test]
async fn test_activate_when_idle_refreshes_immediately() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    client.emit_status(InteractionStatus::Idle);
    let ctrl = controller(client, &config());
    let mut rx = ctrl.subscribe();

    let handle = ctrl.activate();
    let display = wait_for(&mut rx, |d| d.is_signed_in).await;

    assert_eq!(names(&display.id_token_claims)[..2], ["aud", "iss"]);
    handle.deactivate().await;
}

#[tokio::test]
async fn test_idle_event_triggers_refresh() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let token = TestJwt::new().claim("scp", "read").sign();
    client.push_silent_result(Ok(token_result(token, None)));
    let ctrl = controller(client, &config());
    let mut rx = ctrl.subscribe();

    let handle = ctrl.activate();
    ctrl.client().emit_status(InteractionStatus::HandleRedirect);
    ctrl.client().emit_status(InteractionStatus::Idle);

    let display = wait_for(&mut rx, |d| d.phase() == DisplayPhase::SignedInWithToken).await;
    assert_eq!(display.access_token_claims.len(), 1);
    handle.deactivate().await;
}

#[tokio::test]
async fn test_non_idle_events_are_ignored() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let ctrl = controller(client, &config());

    let handle = ctrl.activate();
    for status in [
        InteractionStatus::Startup,
        InteractionStatus::Login,
        InteractionStatus::AcquireToken,
        InteractionStatus::SsoSilent,
    ] {
        ctrl.client().emit_status(status);
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(ctrl.client().silent_requests().is_empty());
    assert_eq!(ctrl.display(), SessionDisplay::default());
    handle.deactivate().await;
}

#[tokio::test]
async fn test_deactivate_stops_refreshes() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let ctrl = controller(client, &config());
    let mut rx = ctrl.subscribe();

    let handle = ctrl.activate();
    assert!(handle.is_active());
    ctrl.client().emit_status(InteractionStatus::Idle);
    wait_for(&mut rx, |d| d.is_signed_in).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = ctrl.client().silent_requests().len();

    handle.deactivate().await;
    assert_eq!(ctrl.client().status_subscribers(), 0);

    ctrl.client().emit_status(InteractionStatus::Idle);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ctrl.client().silent_requests().len(), calls);
}

#[tokio::test]
async fn test_dropping_handle_releases_subscription() {
    let ctrl = controller(FakeIdentityClient::new(), &config());

    let handle = ctrl.activate();
    assert_eq!(ctrl.client().status_subscribers(), 1);
    drop(handle);

    tokio::time::timeout(Duration::from_secs(5), async {
        while ctrl.client().status_subscribers() > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscription was not released");
}

// ── interactive flows ───────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_up_popup_sets_active_account() {
    let client = FakeIdentityClient::new();
    let account = fake_account("new@example.com", Some(claims(json!({"name": "New User"}))));
    client.push_popup_result(Ok(token_result("", Some(account.clone()))));
    let ctrl = controller(client, &config().with_interaction_type(InteractionType::Popup));

    ctrl.sign_up().await.unwrap();

    let logins = ctrl.client().popup_logins();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].prompt, Some(Prompt::Create));
    assert_eq!(logins[0].scopes, vec![SCOPE.to_string()]);
    assert_eq!(ctrl.client().active_account(), Some(account));

    ctrl.refresh().await;
    let display = ctrl.display();
    assert!(display.is_signed_in);
    assert_eq!(display.id_token_claims[0].value, "New User");
}

#[tokio::test]
async fn test_sign_in_popup_has_no_prompt() {
    let client = FakeIdentityClient::new();
    client.push_popup_result(Ok(token_result("", Some(fake_account("a@example.com", None)))));
    let ctrl = controller(client, &config().with_interaction_type(InteractionType::Popup));

    ctrl.sign_in().await.unwrap();

    assert_eq!(ctrl.client().popup_logins()[0].prompt, None);
}

#[tokio::test]
async fn test_sign_up_redirect() {
    let ctrl = controller(FakeIdentityClient::new(), &config());

    ctrl.sign_up().await.unwrap();

    let logins = ctrl.client().redirect_logins();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].prompt, Some(Prompt::Create));
    assert!(ctrl.client().popup_logins().is_empty());
    assert!(ctrl.client().active_account().is_none());
}

#[tokio::test]
async fn test_sign_up_error_propagates() {
    let client = FakeIdentityClient::new();
    client.push_popup_result(Err(ClientError::InteractionInProgress));
    let ctrl = controller(client, &config().with_interaction_type(InteractionType::Popup));

    let err = ctrl.sign_up().await.unwrap_err();

    assert_eq!(err, ClientError::InteractionInProgress);
    assert!(ctrl.client().active_account().is_none());
}

#[tokio::test]
async fn test_sign_out_signs_out_active_account() {
    let client = FakeIdentityClient::signed_in("jane@example.com");
    let active = client.active_account();
    let config = config()
        .with_interaction_type(InteractionType::Popup)
        .with_post_logout_redirect_uri("/goodbye");
    let ctrl = controller(client, &config);

    ctrl.sign_out().await.unwrap();

    let logouts = ctrl.client().logouts();
    assert_eq!(logouts.len(), 1);
    assert_eq!(logouts[0].account, active);
    assert_eq!(logouts[0].post_logout_redirect_uri.as_deref(), Some("/goodbye"));

    ctrl.refresh().await;
    assert_eq!(ctrl.display().phase(), DisplayPhase::SignedOut);
}
