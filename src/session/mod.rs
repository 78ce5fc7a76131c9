//! # Session Layer
//!
//! Credential login and the session state it establishes.
//!
//! The handshake posts credentials to the login endpoint, pulls the session
//! token out of the response cookie, and publishes it through a shared
//! [`state::SessionHandle`]. Message builders read that handle to stamp the
//! session id into every outgoing header.
//!
//! ## Components
//! - **State**: The process-wide session record and its shared handle
//! - **Transport**: The HTTP request/response seam the handshake posts through
//! - **Handshake**: The login state machine and token extraction

pub mod handshake;
pub mod state;
pub mod transport;
