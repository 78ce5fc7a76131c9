//! Session-aware message factory.
//!
//! Stamps every outgoing header with a monotonic packet id and whatever
//! session id the shared [`SessionHandle`] currently holds, so call sites
//! build payloads without touching sequencing or authentication state.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::protocol::message::{Body, Header, Message};
use crate::session::state::SessionHandle;

/// Builds outgoing messages with stamped headers.
///
/// Packet ids are monotonic per builder, i.e. per connection. The builder
/// only ever reads the session handle; the login handshake is the sole
/// writer.
#[derive(Debug)]
pub struct MessageBuilder {
    session: SessionHandle,
    next_packet_id: AtomicI32,
}

impl MessageBuilder {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            next_packet_id: AtomicI32::new(1),
        }
    }

    /// Wrap any payload in a freshly stamped header.
    pub fn build(&self, body: Body) -> Message {
        Message {
            header: Header {
                packet_id: self.next_packet_id.fetch_add(1, Ordering::Relaxed),
                session_id: self.session.wire_id(),
            },
            body,
        }
    }

    pub fn connect(&self) -> Message {
        self.build(Body::Connect)
    }

    pub fn disconnect(&self) -> Message {
        self.build(Body::Disconnect)
    }

    pub fn select_character(&self, character: impl Into<String>) -> Message {
        self.build(Body::SelectCharacter {
            character: character.into(),
        })
    }

    pub fn player_command(&self, command: impl Into<String>) -> Message {
        self.build(Body::SendPlayerCommand {
            command: command.into(),
        })
    }

    /// Generic client-originated event; field meaning is caller-defined.
    pub fn client_event(&self, data: [i32; 5]) -> Message {
        self.build(Body::ClientEvent { data })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::state::Session;

    #[test]
    fn packet_ids_are_monotonic() {
        let builder = MessageBuilder::new(SessionHandle::new());
        let a = builder.connect();
        let b = builder.client_event([0; 5]);
        let c = builder.disconnect();
        assert_eq!(a.header.packet_id, 1);
        assert_eq!(b.header.packet_id, 2);
        assert_eq!(c.header.packet_id, 3);
    }

    #[test]
    fn headers_pick_up_session_transitions() {
        let session = SessionHandle::new();
        let builder = MessageBuilder::new(session.clone());

        assert_eq!(builder.connect().header.session_id, 0);

        session
            .establish(Session {
                account_name: "alice".into(),
                session_id: "4242".into(),
            })
            .unwrap();
        assert_eq!(builder.client_event([1; 5]).header.session_id, 4242);

        session.clear().unwrap();
        assert_eq!(builder.disconnect().header.session_id, 0);
    }
}
