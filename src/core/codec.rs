//! Tokio codec for framing messages over a byte stream.
//!
//! Layouts are fixed-size, so framing needs no length prefix: the decoder
//! peeks the 4-byte kind tag, looks the frame size up in
//! [`MessageKind::wire_len`], and waits until the whole frame has arrived.
//! Wrap any `AsyncRead + AsyncWrite` in `Framed::new(stream, MessageCodec)`
//! to speak the protocol over it.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::protocol::message::{Decoded, Message, MessageKind};

/// Stateless frame codec over the fixed per-kind layouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageCodec;

impl Decoder for MessageCodec {
    type Item = Decoded;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Decoded>, ProtocolError> {
        if src.len() < 4 {
            return Ok(None);
        }
        let tag = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        let kind = MessageKind::from_wire(tag)?;
        let needed = kind.wire_len();
        if src.len() < needed {
            src.reserve(needed - src.len());
            return Ok(None);
        }
        let frame = src.split_to(needed);
        Message::decode(&frame[..]).map(Some)
    }
}

impl Encoder<Message> for MessageCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let bytes = item.encode()?;
        dst.reserve(bytes.len());
        dst.put(bytes);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::message::{Body, Header};

    fn sample(packet_id: i32) -> Message {
        Message {
            header: Header {
                packet_id,
                session_id: 42,
            },
            body: Body::ClientEvent {
                data: [packet_id; 5],
            },
        }
    }

    #[test]
    fn partial_frame_waits_for_more() {
        let mut codec = MessageCodec;
        let encoded = sample(1).encode().unwrap();

        let mut src = BytesMut::from(&encoded[..3]);
        assert!(codec.decode(&mut src).unwrap().is_none());

        let mut src = BytesMut::from(&encoded[..encoded.len() - 1]);
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn concatenated_frames_decode_in_sequence() {
        let mut codec = MessageCodec;
        let mut src = BytesMut::new();
        codec.encode(sample(1), &mut src).unwrap();
        codec.encode(sample(2), &mut src).unwrap();

        let first = codec.decode(&mut src).unwrap().unwrap();
        let second = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(first.message, sample(1));
        assert_eq!(second.message, sample(2));
        assert!(src.is_empty());
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn unknown_tag_is_a_hard_error() {
        let mut codec = MessageCodec;
        let mut src = BytesMut::from(&99i32.to_le_bytes()[..]);
        assert!(matches!(
            codec.decode(&mut src),
            Err(ProtocolError::UnknownKind(99))
        ));
    }
}
