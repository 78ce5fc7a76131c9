//! # Core Codec Components
//!
//! Low-level wire primitives and stream framing.
//!
//! This module provides the foundation the message layer builds on:
//! bounds-checked fixed-capacity field encoding and a tokio codec for
//! framing fixed-size messages over byte streams.
//!
//! ## Components
//! - **Wire**: Fixed-width field primitives (zero-padded text, LE integers)
//! - **Codec**: Tokio codec for framing messages over byte streams
//!
//! ## Wire Format
//! ```text
//! [Kind(4)] [PacketId(4)] [SessionId(4)] [Payload fields, fixed widths]
//! ```
//!
//! Every layout is positional: field order and width are fixed per message
//! kind, and the total frame size is a function of the kind tag alone.

pub mod codec;
pub mod wire;
