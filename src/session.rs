//! Request authorization context
//!
//! The bearer token used for API calls lives in a [`Session`] that is
//! created once per app and handed to every client that needs it.

use std::fmt;
use std::sync::RwLock;

use zeroize::Zeroizing;

/// Session holding the bearer token for the signed-in user.
#[derive(Default)]
pub struct Session {
    token: RwLock<Option<Zeroizing<String>>>,
}

impl Session {
    /// Create a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session already holding `token`.
    pub fn with_token<S: Into<String>>(token: S) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// Replace the current token. Blank tokens sign the session out.
    pub fn set_token<S: Into<String>>(&self, token: S) {
        let token = token.into();
        let mut slot = self.token.write().unwrap_or_else(|p| p.into_inner());
        *slot = if token.trim().is_empty() {
            None
        } else {
            Some(Zeroizing::new(token))
        };
    }

    /// Sign out, wiping the token from memory.
    pub fn clear(&self) {
        let mut slot = self.token.write().unwrap_or_else(|p| p.into_inner());
        *slot = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }

    /// `Authorization` header value for the current token.
    pub fn authorization_header(&self) -> Option<Zeroizing<String>> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .map(|token| Zeroizing::new(format!("Bearer {}", token.as_str())))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
