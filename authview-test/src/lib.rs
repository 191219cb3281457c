//! Test utilities for authview.
//!
//! [`FakeIdentityClient`] stands in for the identity library behind
//! `authview_session::IdentityClient`; [`TestJwt`] builds tokens whose claims
//! the controller can decode for display.

mod client;
mod jwt;

pub use client::{fake_account, token_result, FakeIdentityClient};
pub use jwt::{id_token_claims, malformed_tokens, TestJwt, TEST_SECRET};
