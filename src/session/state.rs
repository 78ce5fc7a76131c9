//! Process-wide session state with an explicit lifecycle.
//!
//! A session is created exactly once per successful login and cleared on
//! logout or disconnect. The handle is cloneable and thread-safe; only the
//! login handshake writes it, everything else reads. Passing the handle
//! around (instead of a hidden static) keeps the write path auditable.

use std::sync::{Arc, RwLock};

use crate::error::{constants, ProtocolError, Result};

/// The authenticated context attached to all post-login messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account name the user logged in with.
    pub account_name: String,
    /// Server-issued session token, kept verbatim as issued.
    pub session_id: String,
}

/// Shared, read-mostly view of the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// A handle with no session established.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly authenticated session. Called by the handshake on
    /// its transition into `Authenticated`; overwrites any stale session.
    pub fn establish(&self, session: Session) -> Result<()> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_SESSION_WRITE_LOCK.into()))?;
        *slot = Some(session);
        Ok(())
    }

    /// Drop the current session (logout / disconnect).
    pub fn clear(&self) -> Result<()> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_SESSION_WRITE_LOCK.into()))?;
        *slot = None;
        Ok(())
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Result<Option<Session>> {
        let slot = self
            .inner
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_SESSION_READ_LOCK.into()))?;
        Ok(slot.clone())
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.current(), Ok(Some(_)))
    }

    /// The session id to stamp into outgoing packet headers.
    ///
    /// The server issues the token as text; when it is numeric it rides in
    /// the header's `session_id` field directly. Unauthenticated (or a
    /// non-numeric token) stamps the 0 sentinel.
    pub fn wire_id(&self) -> i32 {
        self.current()
            .ok()
            .flatten()
            .and_then(|s| s.session_id.parse().ok())
            .unwrap_or(0)
    }
}
