//! Login handshake: credentials in, session out.
//!
//! State machine: `Idle -> Submitting -> {Authenticated, Rejected,
//! TransportFailed}`. The two failure states are recoverable — the next
//! `submit_login` passes back through `Idle`. `Authenticated` is sticky:
//! a second login while a session is live is a usage error, which keeps the
//! session record free of concurrent writers.
//!
//! One suspension point (the transport round-trip), one outcome value per
//! submission; `&mut self` rules out overlapping submissions on the same
//! client at compile time.
//!
//! Credentials travel verbatim in the form body, exactly as the server
//! expects them. Over a plain-HTTP endpoint that means plaintext on the
//! wire; deployments that care must set `use_encryption` and supply a
//! TLS-capable [`LoginTransport`].

use tracing::{debug, info, instrument, warn};

use crate::config::LoginConfig;
use crate::error::{constants, ProtocolError, Result};
use crate::session::state::{Session, SessionHandle};
use crate::session::transport::LoginTransport;

/// Where the handshake currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Idle,
    Submitting,
    Authenticated,
    Rejected,
    TransportFailed,
}

/// The single terminal signal of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session established; `next_scene` is the configured scene-transition
    /// request for the UI collaborator.
    Authenticated {
        account_name: String,
        session_id: String,
        next_scene: String,
    },
    /// Structurally valid response with no session token: bad credentials.
    Rejected,
    /// The exchange itself failed (connect, DNS, timeout, malformed reply).
    TransportFailed { reason: String },
}

/// Client half of the login handshake.
pub struct LoginClient<T: LoginTransport> {
    transport: T,
    config: LoginConfig,
    session: SessionHandle,
    state: LoginState,
}

impl<T: LoginTransport> LoginClient<T> {
    pub fn new(transport: T, config: LoginConfig, session: SessionHandle) -> Self {
        Self {
            transport,
            config,
            session,
            state: LoginState::Idle,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// The login URL this client will post to: caller-supplied address when
    /// one is configured, otherwise the default, under the configured
    /// scheme.
    ///
    /// # Errors
    /// `HandshakeError` when both addresses are empty.
    pub fn resolve_endpoint(&self) -> Result<String> {
        let address = if self.config.address.is_empty() {
            &self.config.default_address
        } else {
            &self.config.address
        };
        if address.is_empty() {
            return Err(ProtocolError::HandshakeError(
                constants::ERR_EMPTY_ENDPOINT.into(),
            ));
        }
        let scheme = if self.config.use_encryption {
            "https"
        } else {
            "http"
        };
        Ok(format!("{scheme}://{address}/login"))
    }

    /// Submit credentials and suspend until the terminal outcome.
    ///
    /// Exactly one [`LoginOutcome`] is returned per call. On
    /// `Authenticated` the shared session state is populated before the
    /// outcome is handed back, so a caller reacting to the outcome already
    /// observes the session.
    ///
    /// # Errors
    /// `HandshakeError` when a session is already established; failures of
    /// the attempt itself are outcomes, not errors.
    #[instrument(skip(self, password), fields(state = ?self.state))]
    pub async fn submit_login(&mut self, username: &str, password: &str) -> Result<LoginOutcome> {
        if self.state == LoginState::Authenticated {
            return Err(ProtocolError::HandshakeError(
                constants::ERR_ALREADY_AUTHENTICATED.into(),
            ));
        }
        // Rejected / TransportFailed retry passes back through Idle.
        self.state = LoginState::Idle;

        let url = self.resolve_endpoint()?;
        self.state = LoginState::Submitting;
        debug!(%url, "submitting login form");

        let fields = [("login_username", username), ("login_password", password)];
        let response = match self.transport.post_form(&url, &fields).await {
            Ok(response) => response,
            Err(e) => {
                self.state = LoginState::TransportFailed;
                let reason = e.to_string();
                warn!(%reason, "login transport failed");
                return Ok(LoginOutcome::TransportFailed { reason });
            }
        };

        match response.header("SET-COOKIE").and_then(extract_session_token) {
            Some(token) => {
                let session = Session {
                    account_name: username.to_owned(),
                    session_id: token.to_owned(),
                };
                self.session.establish(session)?;
                self.state = LoginState::Authenticated;
                info!(account = username, "login accepted");
                Ok(LoginOutcome::Authenticated {
                    account_name: username.to_owned(),
                    session_id: token.to_owned(),
                    next_scene: self.config.post_login_scene.clone(),
                })
            }
            None => {
                self.state = LoginState::Rejected;
                debug!(account = username, "login rejected: no session cookie");
                Ok(LoginOutcome::Rejected)
            }
        }
    }

    /// Clear the session and return to `Idle`.
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear()?;
        self.state = LoginState::Idle;
        Ok(())
    }

    /// The shared session handle this client writes into.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}

/// Pull the session token out of a cookie header value: whatever follows
/// `session_id=` up to, but not including, the next `;` or end of value.
pub fn extract_session_token(cookie: &str) -> Option<&str> {
    let start = cookie.find("session_id=")? + "session_id=".len();
    cookie[start..].split(';').next()
}
