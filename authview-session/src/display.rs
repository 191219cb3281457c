use authview_claims::ClaimRow;
use serde::Serialize;

/// Where the display currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DisplayPhase {
    SignedOut,
    SignedIn,
    SignedInWithToken,
}

/// Everything the rendering layer shows about the current session.
///
/// Rebuilt from scratch on every idle refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionDisplay {
    /// The identity library has at least one cached account.
    pub is_signed_in: bool,
    pub id_token_claims: Vec<ClaimRow>,
    pub access_token: Option<String>,
    pub access_token_claims: Vec<ClaimRow>,
}

impl SessionDisplay {
    pub fn phase(&self) -> DisplayPhase {
        match (self.is_signed_in, &self.access_token) {
            (false, _) => DisplayPhase::SignedOut,
            (true, None) => DisplayPhase::SignedIn,
            (true, Some(_)) => DisplayPhase::SignedInWithToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_signed_out() {
        assert_eq!(SessionDisplay::default().phase(), DisplayPhase::SignedOut);
    }

    #[test]
    fn phase_follows_token_presence() {
        let mut display = SessionDisplay {
            is_signed_in: true,
            ..Default::default()
        };
        assert_eq!(display.phase(), DisplayPhase::SignedIn);

        display.access_token = Some("token".into());
        assert_eq!(display.phase(), DisplayPhase::SignedInWithToken);

        display.is_signed_in = false;
        assert_eq!(display.phase(), DisplayPhase::SignedOut);
    }
}
