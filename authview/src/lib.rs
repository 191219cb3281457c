//! authview: sign-in state and claim tables for OIDC front-ends.
//!
//! This facade crate re-exports the authview sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use authview::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate              |
//! |-----------|---------|--------------------|
//! | `session` | **yes** | `authview-session` |
//!
//! `authview-core` and `authview-claims` are always included.

pub use authview_claims;
pub use authview_core;

// Core types at the top level for convenience.
pub use authview_core::*;

pub use authview_claims::{
    create_claims_table, create_claims_table_opt, decode_unverified, describe_claim,
    try_decode_unverified, ClaimRow, Claims, DecodeError,
};

#[cfg(feature = "session")]
pub use authview_session;

#[cfg(feature = "session")]
pub use authview_session::{
    ClientError, DisplayPhase, IdentityClient, InteractionStatus, SessionController,
    SessionDisplay, SessionHandle,
};

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use authview_claims::prelude::*;
    pub use authview_core::prelude::*;

    #[cfg(feature = "session")]
    pub use authview_session::prelude::*;
}
