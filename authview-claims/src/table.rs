use serde::Serialize;
use serde_json::{Map, Value};

use crate::describe::describe_claim;

/// Claim names whose values are personal or session-identifying and should be
/// masked by default when rendered.
pub const SENSITIVE_CLAIMS: [&str; 6] = ["ipaddr", "upn", "sub", "oid", "sid", "nonce"];

/// Placeholder shown instead of a sensitive value.
pub const MASK: &str = "••••••••";

/// One display row of a claims table.
///
/// Rows are rebuilt from scratch whenever the underlying claims change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimRow {
    pub name: String,
    /// The claim value rendered as text; arrays render as `[ a, b ]`.
    pub value: String,
    pub sensitive: bool,
    /// Explanation of a well-known claim, if there is one.
    pub description: Option<&'static str>,
}

impl ClaimRow {
    /// Build a row for a single claim.
    pub fn new(name: impl Into<String>, value: &Value) -> Self {
        let name = name.into();
        Self {
            value: format_value(value),
            sensitive: is_sensitive(&name),
            description: describe_claim(&name),
            name,
        }
    }

    /// The value to show, masked for sensitive rows unless `reveal` is set.
    pub fn display_value(&self, reveal: bool) -> &str {
        if self.sensitive && !reveal {
            MASK
        } else {
            &self.value
        }
    }
}

/// Whether `name` is one of the [`SENSITIVE_CLAIMS`].
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_CLAIMS.contains(&name)
}

/// Render a claim value as display text.
///
/// Strings render without quotes, arrays as `[ v1, v2, ... ]` with each
/// element rendered the same way, objects as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[ {} ]", items.join(", "))
        }
        Value::Object(_) => value.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

/// Turn a claims mapping into display rows, one per entry, in mapping order.
pub fn create_claims_table(claims: &Map<String, Value>) -> Vec<ClaimRow> {
    claims
        .iter()
        .map(|(name, value)| ClaimRow::new(name.as_str(), value))
        .collect()
}

/// Like [`create_claims_table`], but an absent mapping yields no rows.
pub fn create_claims_table_opt(claims: Option<&Map<String, Value>>) -> Vec<ClaimRow> {
    claims.map(create_claims_table).unwrap_or_default()
}
