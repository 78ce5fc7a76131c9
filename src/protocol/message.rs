//! Message taxonomy and fixed binary layouts.
//!
//! Every frame starts with the same 12-byte header:
//!
//! ```text
//! [kind: i32 LE] [packet_id: i32 LE] [session_id: i32 LE]
//! ```
//!
//! followed by the payload fields of that kind in declared order. All
//! integers are little-endian signed 32-bit; `direction` is an IEEE-754
//! single. Text fields occupy their full declared capacity, zero-padded
//! (see [`crate::core::wire`]). Frame size is therefore a function of the
//! kind tag alone — [`MessageKind::wire_len`] is the one size table shared
//! by `decode` and the stream framing codec.
//!
//! Adding a kind touches only its own variant, `wire_len` arm, and
//! encode/decode arms; the shared header path never changes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::core::wire::{get_fixed_str, put_fixed_str, FieldWarning};
use crate::error::{ProtocolError, Result};

/// Wire capacity of an account name.
pub const ACCOUNT_LEN: usize = 30;
/// Wire capacity of a hex-encoded 512-bit salt or derived key:
/// 64 bytes -> 128 hex chars + terminator.
pub const HEX_KEY_LEN: usize = 129;
/// Wire capacity of a character name or identity field.
pub const NAME_LEN: usize = 25;
/// Wire capacity of a command string.
pub const COMMAND_LEN: usize = 500;
/// Character-name slots in a `ListCharacters` payload.
pub const CHARACTER_SLOTS: usize = 10;
/// Size of the uniform message header.
pub const HEADER_LEN: usize = 12;

/// Tag identifying a message's purpose and payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MessageKind {
    Generic = 0,
    Ack = 1,
    Connect = 2,
    Disconnect = 3,
    GetSalt = 4,
    CreateAccount = 5,
    Login = 6,
    ListCharacters = 7,
    SelectCharacter = 8,
    DeleteCharacter = 9,
    CreateCharacter = 10,
    InitializeGame = 11,
    UpdatePlayerCharacter = 12,
    UpdateNonPlayerCharacter = 13,
    SendPlayerCommand = 14,
    SendServerCommand = 15,
    SendPlayerAction = 16,
    SendServerAction = 17,
    ClientEvent = 18,
}

impl MessageKind {
    /// Map a wire tag back to a kind.
    ///
    /// # Errors
    /// `UnknownKind` when the tag has no registered layout.
    pub fn from_wire(tag: i32) -> Result<Self> {
        Ok(match tag {
            0 => Self::Generic,
            1 => Self::Ack,
            2 => Self::Connect,
            3 => Self::Disconnect,
            4 => Self::GetSalt,
            5 => Self::CreateAccount,
            6 => Self::Login,
            7 => Self::ListCharacters,
            8 => Self::SelectCharacter,
            9 => Self::DeleteCharacter,
            10 => Self::CreateCharacter,
            11 => Self::InitializeGame,
            12 => Self::UpdatePlayerCharacter,
            13 => Self::UpdateNonPlayerCharacter,
            14 => Self::SendPlayerCommand,
            15 => Self::SendServerCommand,
            16 => Self::SendPlayerAction,
            17 => Self::SendServerAction,
            18 => Self::ClientEvent,
            other => return Err(ProtocolError::UnknownKind(other)),
        })
    }

    /// The tag written to the wire for this kind.
    pub fn wire_tag(self) -> i32 {
        self as i32
    }

    /// Total frame size (header included) for this kind's layout.
    pub fn wire_len(self) -> usize {
        let payload = match self {
            Self::Generic
            | Self::Ack
            | Self::Connect
            | Self::Disconnect
            | Self::InitializeGame
            | Self::UpdateNonPlayerCharacter
            | Self::SendPlayerAction
            | Self::SendServerAction => 0,
            Self::GetSalt | Self::Login => ACCOUNT_LEN + HEX_KEY_LEN,
            Self::CreateAccount => ACCOUNT_LEN + 2 * HEX_KEY_LEN,
            Self::ListCharacters => CHARACTER_SLOTS * NAME_LEN,
            Self::SelectCharacter | Self::DeleteCharacter => NAME_LEN,
            Self::CreateCharacter => CharacterIdentity::WIRE_LEN + 4 * CharacterSheet::FIELD_COUNT,
            Self::UpdatePlayerCharacter => {
                CharacterIdentity::WIRE_LEN + 4 * (Vitals::FIELD_COUNT + Position::FIELD_COUNT) + 4
            }
            Self::SendPlayerCommand | Self::SendServerCommand => COMMAND_LEN,
            Self::ClientEvent => 4 * 5,
        };
        HEADER_LEN + payload
    }
}

/// The sequencing fields every message carries after its kind tag.
///
/// `packet_id` is a sender-assigned monotonic sequence number used for
/// ordering and ack correlation. `session_id` is 0 until the login
/// handshake establishes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub packet_id: i32,
    pub session_id: i32,
}

/// Declares a record of consecutive `i32` wire fields.
///
/// One declaration drives the struct definition, encode order, decode
/// order, and the field count used for layout sizes, so the three can
/// never drift apart.
macro_rules! i32_record {
    ($(#[$meta:meta])* $vis:vis struct $name:ident { $($field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $name {
            $(pub $field: i32,)*
        }

        impl $name {
            /// Number of `i32` fields in this record.
            pub const FIELD_COUNT: usize = [$(stringify!($field)),*].len();

            fn put(&self, buf: &mut impl BufMut) {
                $(buf.put_i32_le(self.$field);)*
            }

            fn get(buf: &mut impl Buf) -> Self {
                Self {
                    $($field: buf.get_i32_le(),)*
                }
            }
        }
    };
}

i32_record! {
    /// Attribute and skill levels of a newly created character, in wire order:
    /// four base attributes, then weapon, magic, crafting, general, and
    /// language skills.
    pub struct CharacterSheet {
        strength, constitution, intelligence, dexterity,
        axe, dagger, unarmed, hammer, polearm, spear, staff, sword,
        archery, crossbow, sling, thrown,
        armor, dual_weapon, shield,
        bardic, conjuring, druidic, illusion, necromancy, sorcery,
        shamanic, spellcraft, summoning, focus,
        armorsmithing, tailoring, fletching, weaponsmithing, alchemy,
        lapidary, calligraphy, enchanting,
        herbalism, hunting, mining, bargaining, camping, first_aid,
        lore, pick_locks, scouting, search, stealth, traps,
        aeolandis, hieroform, high_gundis, old_praxic, praxic, runic,
    }
}

i32_record! {
    /// Live numeric state of a player character.
    pub struct Vitals {
        level, hp, bp, mp, ep,
    }
}

i32_record! {
    /// Integer world position.
    pub struct Position {
        x, y, z,
    }
}

/// The five fixed-capacity text fields naming a character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterIdentity {
    pub first_name: String,
    pub last_name: String,
    pub race: String,
    pub gender: String,
    pub profession: String,
}

impl CharacterIdentity {
    /// Wire size of the five identity slots.
    pub const WIRE_LEN: usize = 5 * NAME_LEN;

    fn put(&self, buf: &mut impl BufMut) -> Result<()> {
        put_fixed_str(buf, "first_name", NAME_LEN, &self.first_name)?;
        put_fixed_str(buf, "last_name", NAME_LEN, &self.last_name)?;
        put_fixed_str(buf, "race", NAME_LEN, &self.race)?;
        put_fixed_str(buf, "gender", NAME_LEN, &self.gender)?;
        put_fixed_str(buf, "profession", NAME_LEN, &self.profession)?;
        Ok(())
    }

    fn get(buf: &mut impl Buf, warnings: &mut Vec<FieldWarning>) -> Self {
        Self {
            first_name: get_fixed_str(buf, "first_name", NAME_LEN, warnings),
            last_name: get_fixed_str(buf, "last_name", NAME_LEN, warnings),
            race: get_fixed_str(buf, "race", NAME_LEN, warnings),
            gender: get_fixed_str(buf, "gender", NAME_LEN, warnings),
            profession: get_fixed_str(buf, "profession", NAME_LEN, warnings),
        }
    }
}

/// Per-kind payload. Variant order mirrors the kind tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Generic,
    Ack,
    Connect,
    Disconnect,
    GetSalt {
        account: String,
        salt_hex: String,
    },
    CreateAccount {
        account: String,
        salt_hex: String,
        key_hex: String,
    },
    Login {
        account: String,
        key_hex: String,
    },
    ListCharacters {
        characters: [String; CHARACTER_SLOTS],
    },
    SelectCharacter {
        character: String,
    },
    DeleteCharacter {
        character: String,
    },
    CreateCharacter {
        identity: CharacterIdentity,
        sheet: CharacterSheet,
    },
    InitializeGame,
    UpdatePlayerCharacter {
        identity: CharacterIdentity,
        vitals: Vitals,
        position: Position,
        direction: f32,
    },
    UpdateNonPlayerCharacter,
    SendPlayerCommand {
        command: String,
    },
    SendServerCommand {
        command: String,
    },
    SendPlayerAction,
    SendServerAction,
    /// Generic envelope for client-originated events that do not warrant a
    /// dedicated layout; the five fields carry caller-defined meaning.
    ClientEvent {
        data: [i32; 5],
    },
}

impl Body {
    /// The kind tag this payload travels under.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Generic => MessageKind::Generic,
            Self::Ack => MessageKind::Ack,
            Self::Connect => MessageKind::Connect,
            Self::Disconnect => MessageKind::Disconnect,
            Self::GetSalt { .. } => MessageKind::GetSalt,
            Self::CreateAccount { .. } => MessageKind::CreateAccount,
            Self::Login { .. } => MessageKind::Login,
            Self::ListCharacters { .. } => MessageKind::ListCharacters,
            Self::SelectCharacter { .. } => MessageKind::SelectCharacter,
            Self::DeleteCharacter { .. } => MessageKind::DeleteCharacter,
            Self::CreateCharacter { .. } => MessageKind::CreateCharacter,
            Self::InitializeGame => MessageKind::InitializeGame,
            Self::UpdatePlayerCharacter { .. } => MessageKind::UpdatePlayerCharacter,
            Self::UpdateNonPlayerCharacter => MessageKind::UpdateNonPlayerCharacter,
            Self::SendPlayerCommand { .. } => MessageKind::SendPlayerCommand,
            Self::SendServerCommand { .. } => MessageKind::SendServerCommand,
            Self::SendPlayerAction => MessageKind::SendPlayerAction,
            Self::SendServerAction => MessageKind::SendServerAction,
            Self::ClientEvent { .. } => MessageKind::ClientEvent,
        }
    }

    fn put(&self, buf: &mut impl BufMut) -> Result<()> {
        match self {
            Self::Generic
            | Self::Ack
            | Self::Connect
            | Self::Disconnect
            | Self::InitializeGame
            | Self::UpdateNonPlayerCharacter
            | Self::SendPlayerAction
            | Self::SendServerAction => {}
            Self::GetSalt { account, salt_hex } => {
                put_fixed_str(buf, "account", ACCOUNT_LEN, account)?;
                put_fixed_str(buf, "salt_hex", HEX_KEY_LEN, salt_hex)?;
            }
            Self::CreateAccount {
                account,
                salt_hex,
                key_hex,
            } => {
                put_fixed_str(buf, "account", ACCOUNT_LEN, account)?;
                put_fixed_str(buf, "salt_hex", HEX_KEY_LEN, salt_hex)?;
                put_fixed_str(buf, "key_hex", HEX_KEY_LEN, key_hex)?;
            }
            Self::Login { account, key_hex } => {
                put_fixed_str(buf, "account", ACCOUNT_LEN, account)?;
                put_fixed_str(buf, "key_hex", HEX_KEY_LEN, key_hex)?;
            }
            Self::ListCharacters { characters } => {
                for character in characters {
                    put_fixed_str(buf, "characters", NAME_LEN, character)?;
                }
            }
            Self::SelectCharacter { character } | Self::DeleteCharacter { character } => {
                put_fixed_str(buf, "character", NAME_LEN, character)?;
            }
            Self::CreateCharacter { identity, sheet } => {
                identity.put(buf)?;
                sheet.put(buf);
            }
            Self::UpdatePlayerCharacter {
                identity,
                vitals,
                position,
                direction,
            } => {
                identity.put(buf)?;
                vitals.put(buf);
                position.put(buf);
                buf.put_f32_le(*direction);
            }
            Self::SendPlayerCommand { command } | Self::SendServerCommand { command } => {
                put_fixed_str(buf, "command", COMMAND_LEN, command)?;
            }
            Self::ClientEvent { data } => {
                for value in data {
                    buf.put_i32_le(*value);
                }
            }
        }
        Ok(())
    }

    fn get(kind: MessageKind, buf: &mut impl Buf, warnings: &mut Vec<FieldWarning>) -> Self {
        match kind {
            MessageKind::Generic => Self::Generic,
            MessageKind::Ack => Self::Ack,
            MessageKind::Connect => Self::Connect,
            MessageKind::Disconnect => Self::Disconnect,
            MessageKind::GetSalt => Self::GetSalt {
                account: get_fixed_str(buf, "account", ACCOUNT_LEN, warnings),
                salt_hex: get_fixed_str(buf, "salt_hex", HEX_KEY_LEN, warnings),
            },
            MessageKind::CreateAccount => Self::CreateAccount {
                account: get_fixed_str(buf, "account", ACCOUNT_LEN, warnings),
                salt_hex: get_fixed_str(buf, "salt_hex", HEX_KEY_LEN, warnings),
                key_hex: get_fixed_str(buf, "key_hex", HEX_KEY_LEN, warnings),
            },
            MessageKind::Login => Self::Login {
                account: get_fixed_str(buf, "account", ACCOUNT_LEN, warnings),
                key_hex: get_fixed_str(buf, "key_hex", HEX_KEY_LEN, warnings),
            },
            MessageKind::ListCharacters => Self::ListCharacters {
                characters: std::array::from_fn(|_| {
                    get_fixed_str(buf, "characters", NAME_LEN, warnings)
                }),
            },
            MessageKind::SelectCharacter => Self::SelectCharacter {
                character: get_fixed_str(buf, "character", NAME_LEN, warnings),
            },
            MessageKind::DeleteCharacter => Self::DeleteCharacter {
                character: get_fixed_str(buf, "character", NAME_LEN, warnings),
            },
            MessageKind::CreateCharacter => Self::CreateCharacter {
                identity: CharacterIdentity::get(buf, warnings),
                sheet: CharacterSheet::get(buf),
            },
            MessageKind::InitializeGame => Self::InitializeGame,
            MessageKind::UpdatePlayerCharacter => Self::UpdatePlayerCharacter {
                identity: CharacterIdentity::get(buf, warnings),
                vitals: Vitals::get(buf),
                position: Position::get(buf),
                direction: buf.get_f32_le(),
            },
            MessageKind::UpdateNonPlayerCharacter => Self::UpdateNonPlayerCharacter,
            MessageKind::SendPlayerCommand => Self::SendPlayerCommand {
                command: get_fixed_str(buf, "command", COMMAND_LEN, warnings),
            },
            MessageKind::SendServerCommand => Self::SendServerCommand {
                command: get_fixed_str(buf, "command", COMMAND_LEN, warnings),
            },
            MessageKind::SendPlayerAction => Self::SendPlayerAction,
            MessageKind::SendServerAction => Self::SendServerAction,
            MessageKind::ClientEvent => Self::ClientEvent {
                data: std::array::from_fn(|_| buf.get_i32_le()),
            },
        }
    }
}

/// A typed message: uniform header plus per-kind payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub header: Header,
    pub body: Body,
}

impl Message {
    /// Build a message with a zeroed header. Builders stamp the header
    /// before the message leaves the client.
    pub fn new(body: Body) -> Self {
        Self {
            header: Header::default(),
            body,
        }
    }

    /// The kind tag this message travels under.
    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    /// Encode into the fixed wire layout for this message's kind.
    ///
    /// # Errors
    /// `FieldTooLong` when a text value exceeds its declared capacity;
    /// no buffer is produced on failure.
    pub fn encode(&self) -> Result<Bytes> {
        let kind = self.kind();
        let mut buf = BytesMut::with_capacity(kind.wire_len());
        buf.put_i32_le(kind.wire_tag());
        buf.put_i32_le(self.header.packet_id);
        buf.put_i32_le(self.header.session_id);
        self.body.put(&mut buf)?;
        debug_assert_eq!(buf.len(), kind.wire_len());
        Ok(buf.freeze())
    }

    /// Decode a frame. Bytes beyond the kind's fixed length are ignored.
    ///
    /// # Errors
    /// `TruncatedInput` when `input` is shorter than the layout requires,
    /// `UnknownKind` when the kind tag has no registered layout. Malformed
    /// text fields are recovered as empty strings and reported in
    /// [`Decoded::warnings`].
    pub fn decode(input: &[u8]) -> Result<Decoded> {
        if input.len() < HEADER_LEN {
            return Err(ProtocolError::TruncatedInput {
                needed: HEADER_LEN,
                got: input.len(),
            });
        }
        let mut buf = input;
        let kind = MessageKind::from_wire(buf.get_i32_le())?;
        let needed = kind.wire_len();
        if input.len() < needed {
            return Err(ProtocolError::TruncatedInput {
                needed,
                got: input.len(),
            });
        }
        let header = Header {
            packet_id: buf.get_i32_le(),
            session_id: buf.get_i32_le(),
        };
        let mut warnings = Vec::new();
        let body = Body::get(kind, &mut buf, &mut warnings);
        if !warnings.is_empty() {
            warn!(
                kind = ?kind,
                fields = warnings.len(),
                "recovered malformed text fields as empty strings"
            );
        }
        Ok(Decoded {
            message: Message { header, body },
            warnings,
        })
    }
}

/// Result of a successful decode: the message plus any recovered-field
/// warnings. A clean frame decodes with an empty warning list.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub message: Message,
    pub warnings: Vec<FieldWarning>,
}

impl Decoded {
    /// Treat any recovered field as a hard error.
    ///
    /// # Errors
    /// `MalformedField` for the first reported warning.
    pub fn strict(self) -> Result<Message> {
        match self.warnings.into_iter().next() {
            Some(warning) => Err(warning.into_error()),
            None => Ok(self.message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip() {
        for tag in 0..=18 {
            let kind = MessageKind::from_wire(tag).unwrap();
            assert_eq!(kind.wire_tag(), tag);
        }
        assert!(matches!(
            MessageKind::from_wire(19),
            Err(ProtocolError::UnknownKind(19))
        ));
        assert!(matches!(
            MessageKind::from_wire(-1),
            Err(ProtocolError::UnknownKind(-1))
        ));
    }

    #[test]
    fn wire_len_matches_encoded_len() {
        let samples = [
            Body::Generic,
            Body::Connect,
            Body::GetSalt {
                account: "a".into(),
                salt_hex: String::new(),
            },
            Body::CreateAccount {
                account: "a".into(),
                salt_hex: String::new(),
                key_hex: String::new(),
            },
            Body::Login {
                account: "a".into(),
                key_hex: String::new(),
            },
            Body::ListCharacters {
                characters: Default::default(),
            },
            Body::SelectCharacter {
                character: "Ada".into(),
            },
            Body::DeleteCharacter {
                character: "Ada".into(),
            },
            Body::CreateCharacter {
                identity: CharacterIdentity::default(),
                sheet: CharacterSheet::default(),
            },
            Body::InitializeGame,
            Body::UpdatePlayerCharacter {
                identity: CharacterIdentity::default(),
                vitals: Vitals::default(),
                position: Position::default(),
                direction: 0.0,
            },
            Body::UpdateNonPlayerCharacter,
            Body::SendPlayerCommand {
                command: "/wave".into(),
            },
            Body::SendServerCommand {
                command: "/who".into(),
            },
            Body::SendPlayerAction,
            Body::SendServerAction,
            Body::ClientEvent { data: [0; 5] },
        ];
        for body in samples {
            let kind = body.kind();
            let bytes = Message::new(body).encode().unwrap();
            assert_eq!(bytes.len(), kind.wire_len(), "kind {kind:?}");
        }
    }

    #[test]
    fn fixed_layout_sizes() {
        assert_eq!(MessageKind::Ack.wire_len(), 12);
        assert_eq!(MessageKind::GetSalt.wire_len(), 171);
        assert_eq!(MessageKind::CreateAccount.wire_len(), 300);
        assert_eq!(MessageKind::Login.wire_len(), 171);
        assert_eq!(MessageKind::ListCharacters.wire_len(), 262);
        assert_eq!(MessageKind::SelectCharacter.wire_len(), 37);
        assert_eq!(MessageKind::CreateCharacter.wire_len(), 357);
        assert_eq!(MessageKind::UpdatePlayerCharacter.wire_len(), 173);
        assert_eq!(MessageKind::SendPlayerCommand.wire_len(), 512);
        assert_eq!(MessageKind::ClientEvent.wire_len(), 32);
    }

    #[test]
    fn client_event_golden_bytes() {
        let message = Message {
            header: Header {
                packet_id: 7,
                session_id: 0x0102_0304,
            },
            body: Body::ClientEvent {
                data: [1, -1, 0, 2, 258],
            },
        };
        let bytes = message.encode().unwrap();
        let expected: Vec<u8> = [
            18i32.to_le_bytes(),
            7i32.to_le_bytes(),
            0x0102_0304i32.to_le_bytes(),
            1i32.to_le_bytes(),
            (-1i32).to_le_bytes(),
            0i32.to_le_bytes(),
            2i32.to_le_bytes(),
            258i32.to_le_bytes(),
        ]
        .concat();
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn sheet_field_count_matches_layout() {
        assert_eq!(CharacterSheet::FIELD_COUNT, 55);
        assert_eq!(Vitals::FIELD_COUNT, 5);
        assert_eq!(Position::FIELD_COUNT, 3);
    }
}
