//! Session view controller.
//!
//! [`SessionController`] listens to an [`IdentityClient`]'s interaction
//! status and keeps a [`SessionDisplay`] up to date for a rendering layer.
//! The OAuth2/OIDC flow itself belongs to the identity library behind the
//! trait.

pub mod client;
pub mod controller;
pub mod display;
pub mod error;
pub mod types;

pub use client::IdentityClient;
pub use controller::{SessionController, SessionHandle};
pub use display::{DisplayPhase, SessionDisplay};
pub use error::ClientError;
pub use types::{
    AccountInfo, AuthenticationResult, InteractionStatus, LoginRequest, LogoutRequest, Prompt,
    SilentRequest,
};

pub mod prelude {
    //! Re-exports of the most commonly used session types.
    pub use crate::{
        AccountInfo, DisplayPhase, IdentityClient, InteractionStatus, SessionController,
        SessionDisplay, SessionHandle,
    };
}
