/// Errors reported by the identity library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request cannot complete without user interaction (consent, MFA, expired session).
    InteractionRequired(String),
    /// The user closed the popup or cancelled the flow.
    UserCancelled,
    /// Another interactive flow is already in progress.
    InteractionInProgress,
    /// The identity provider could not be reached.
    Network(String),
    /// Any other failure, with the library's error code.
    Library { code: String, message: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::InteractionRequired(msg) => write!(f, "Interaction required: {msg}"),
            ClientError::UserCancelled => write!(f, "User cancelled the flow"),
            ClientError::InteractionInProgress => write!(f, "An interaction is already in progress"),
            ClientError::Network(msg) => write!(f, "Network error: {msg}"),
            ClientError::Library { code, message } => write!(f, "{code}: {message}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl ClientError {
    /// Whether an interactive flow could resolve this error.
    pub fn requires_interaction(&self) -> bool {
        matches!(self, ClientError::InteractionRequired(_))
    }
}
