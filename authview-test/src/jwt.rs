use authview_claims::Claims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// HMAC secret used to sign test tokens. Nothing verifies it.
pub const TEST_SECRET: &[u8] = b"authview-test-secret-do-not-use-in-production";

/// Builds signed JWTs for tests.
///
/// Claims keep the order they were added in.
///
/// ```ignore
/// let token = TestJwt::new()
///     .claim("sub", "abc123")
///     .claim("roles", json!(["admin", "user"]))
///     .sign();
/// ```
#[derive(Clone, Debug, Default)]
pub struct TestJwt {
    claims: Claims,
}

impl TestJwt {
    pub fn new() -> Self {
        Self::default()
    }

    /// A typical access token for `audience` granting `scopes`.
    pub fn access_token(audience: &str, scopes: &[&str]) -> Self {
        Self::new()
            .claim("aud", audience)
            .claim("iss", "https://login.example.com/tenant/v2.0")
            .claim("iat", 1_700_000_000u64)
            .claim("exp", 1_700_003_600u64)
            .claim("scp", scopes.join(" "))
    }

    /// Add or replace a claim. A replaced claim keeps its original position.
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Add every entry of a JSON object.
    pub fn with_claims(mut self, claims: Value) -> Self {
        if let Value::Object(map) = claims {
            self.claims.extend(map);
        }
        self
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Encode and sign the token with HS256 and [`TEST_SECRET`].
    pub fn sign(&self) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &self.claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .expect("failed to encode test JWT")
    }
}

/// Tokens that cannot be decoded, one per failure mode.
pub fn malformed_tokens() -> Vec<String> {
    vec![
        String::new(),
        "no-dots-at-all".to_string(),
        "header.!!not-base64!!.signature".to_string(),
        // "not json" in base64url
        "header.bm90IGpzb24.signature".to_string(),
        // "[1,2]" in base64url
        "header.WzEsMl0.signature".to_string(),
    ]
}

/// ID token claims for a test account named `username`.
pub fn id_token_claims(username: &str) -> Claims {
    let claims = json!({
        "aud": "00000000-0000-0000-0000-00000000c11e",
        "iss": "https://login.example.com/tenant/v2.0",
        "name": username.split('@').next().unwrap_or(username),
        "preferred_username": username,
        "oid": format!("oid-{username}"),
        "sub": format!("sub-{username}"),
        "tid": "tenant",
    });
    match claims {
        Value::Object(map) => map,
        _ => Claims::new(),
    }
}
