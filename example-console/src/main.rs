use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use authview::prelude::*;
use authview::{init_tracing, DefaultSecretResolver, LogFormat};
use authview_test::{fake_account, id_token_claims, token_result, FakeIdentityClient, TestJwt};

/// Sensitive claim values stay masked unless `--reveal` is passed.
const REVEAL_FLAG: &str = "--reveal";

fn format_row(row: &ClaimRow, reveal: bool) -> String {
    format!(
        "    {:<20} {:<48} {}",
        row.name,
        row.display_value(reveal),
        row.description.unwrap_or("")
    )
}

fn print_rows(title: &str, rows: &[ClaimRow], reveal: bool) {
    println!("  {title}:");
    if rows.is_empty() {
        println!("    (none)");
    }
    for row in rows {
        println!("{}", format_row(row, reveal));
    }
}

fn print_display(display: &SessionDisplay, reveal: bool) {
    println!("=== {:?} ===", display.phase());
    print_rows("ID token claims", &display.id_token_claims, reveal);
    print_rows("Access token claims", &display.access_token_claims, reveal);
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- Configuration ---
    let config = AuthviewConfig::load_from_dir(
        Path::new(env!("CARGO_MANIFEST_DIR")),
        "dev",
        &DefaultSecretResolver,
    )?
    .with_typed::<LoginConfig>()?;

    init_tracing(&config, LogFormat::Pretty);
    tracing::info!(
        profile = config.profile(),
        client_id = %config.client_id,
        interaction = config.interaction_type.as_str(),
        "Starting authview console demo"
    );

    // --- Identity library (in-memory stand-in) ---
    let client = Arc::new(FakeIdentityClient::new());
    let username = "jane@contoso.com";
    let account = fake_account(username, Some(id_token_claims(username)));
    client.push_popup_result(Ok(token_result("", Some(account))));
    let access_token = TestJwt::access_token(
        "api://675bdfbe-4b0b-480d-802d-d3d6405dda47",
        &["access_as_user"],
    )
    .claim("upn", username)
    .claim("roles", serde_json::json!(["Reader", "Writer"]))
    .sign();
    client.push_silent_result(Ok(token_result(access_token, None)));

    // --- Controller ---
    let controller = Arc::new(SessionController::new(client.clone(), &config));
    let reveal = std::env::args().skip(1).any(|arg| arg == REVEAL_FLAG);
    let mut display = controller.subscribe();
    let printer = tokio::spawn(async move {
        while display.changed().await.is_ok() {
            let snapshot = display.borrow_and_update().clone();
            print_display(&snapshot, reveal);
        }
    });

    let handle = controller.activate();
    client.emit_status(InteractionStatus::Startup);
    client.emit_status(InteractionStatus::Idle);
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.emit_status(InteractionStatus::Login);
    controller.sign_in().await?;
    client.emit_status(InteractionStatus::Idle);
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.emit_status(InteractionStatus::Logout);
    controller.sign_out().await?;
    client.emit_status(InteractionStatus::Idle);
    tokio::time::sleep(Duration::from_millis(50)).await;

    handle.deactivate().await;
    drop(controller);
    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use authview::authview_claims::MASK;
    use serde_json::json;

    #[test]
    fn sensitive_values_are_masked_by_default() {
        let row = ClaimRow::new("sub", &json!("abc123"));
        let line = format_row(&row, false);
        assert!(line.contains(MASK));
        assert!(!line.contains("abc123"));
        assert!(format_row(&row, true).contains("abc123"));
    }

    #[test]
    fn plain_values_are_always_shown() {
        let row = ClaimRow::new("name", &json!("Jane Doe"));
        assert!(format_row(&row, false).contains("Jane Doe"));
    }
}
