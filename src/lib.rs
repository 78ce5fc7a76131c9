//! # Game Protocol
//!
//! Client-side network protocol core for a multiplayer game.
//!
//! Two components, the second depending on the first:
//!
//! - **Packet Codec** ([`core`], [`protocol`]): a closed message taxonomy
//!   with one fixed-size positional binary layout per kind, plus a tokio
//!   framing codec for whoever owns the socket. Encode and decode are
//!   lossless and deterministic; two conforming peers produce byte-identical
//!   frames for identical messages.
//! - **Session Handshake** ([`session`]): posts credentials to the login
//!   endpoint, extracts the session token from the response cookie, and
//!   publishes the session state that message builders stamp into every
//!   outgoing header.
//!
//! ## Example
//! ```no_run
//! use game_protocol::config::LoginConfig;
//! use game_protocol::protocol::builder::MessageBuilder;
//! use game_protocol::session::handshake::{LoginClient, LoginOutcome};
//! use game_protocol::session::state::SessionHandle;
//! use game_protocol::session::transport::HttpLoginTransport;
//!
//! # async fn run() -> game_protocol::error::Result<()> {
//! let session = SessionHandle::new();
//! let mut login = LoginClient::new(
//!     HttpLoginTransport,
//!     LoginConfig::default(),
//!     session.clone(),
//! );
//!
//! match login.submit_login("alice", "secret").await? {
//!     LoginOutcome::Authenticated { next_scene, .. } => {
//!         // Hand next_scene to the UI; headers now carry the session id.
//!         let builder = MessageBuilder::new(session);
//!         let frame = builder.client_event([1, 0, 0, 0, 0]).encode()?;
//!         let _ = frame;
//!         let _ = next_scene;
//!     }
//!     LoginOutcome::Rejected => { /* show login failure */ }
//!     LoginOutcome::TransportFailed { reason } => { let _ = reason; }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod session;

pub use crate::core::codec::MessageCodec;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::message::{Body, Decoded, Header, Message, MessageKind};
pub use crate::session::handshake::{LoginClient, LoginOutcome, LoginState};
pub use crate::session::state::{Session, SessionHandle};
