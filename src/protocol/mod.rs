//! # Protocol Layer
//!
//! The message taxonomy and per-kind wire layouts.
//!
//! Each [`message::MessageKind`] owns exactly one fixed-size positional
//! layout. The kind tag leads every frame, so a receiver dispatches decoding
//! on the first four bytes alone. Both directions share a single layout
//! declaration per kind; there is no second table to drift out of sync.
//!
//! ## Components
//! - **Message**: Header, kinds, payload variants, encode/decode
//! - **Builder**: Session-aware factory that stamps outgoing headers

pub mod builder;
pub mod message;
