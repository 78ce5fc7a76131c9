//! Fixed-capacity field primitives.
//!
//! Every text field on the wire occupies its full declared capacity: the
//! value is written left-aligned and the remainder is zero-filled. A value
//! longer than the capacity is a hard encode error, never a truncation.
//! Decoding reads the bytes up to the first zero; anything unexpected after
//! that point (or invalid UTF-8) downgrades the field to an empty string and
//! is reported to the caller as a [`FieldWarning`].

use bytes::{Buf, BufMut};

use crate::error::{ProtocolError, Result};

/// A recoverable decode anomaly on a single fixed text field.
///
/// The field decodes as an empty string; the warning tells the caller the
/// buffer was not fully valid so it is never mistaken for clean input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    /// Name of the offending field in its layout declaration.
    pub field: &'static str,
    /// What was wrong with the bytes.
    pub reason: &'static str,
}

impl FieldWarning {
    /// Promote this warning to a hard error for strict callers.
    pub fn into_error(self) -> ProtocolError {
        ProtocolError::MalformedField {
            field: self.field,
            reason: self.reason,
        }
    }
}

/// Write `value` into a fixed `capacity`-byte slot, zero-padded.
///
/// # Errors
/// `FieldTooLong` when the UTF-8 byte length of `value` exceeds `capacity`.
pub fn put_fixed_str(
    buf: &mut impl BufMut,
    field: &'static str,
    capacity: usize,
    value: &str,
) -> Result<()> {
    let bytes = value.as_bytes();
    if bytes.len() > capacity {
        return Err(ProtocolError::FieldTooLong {
            field,
            len: bytes.len(),
            capacity,
        });
    }
    buf.put_slice(bytes);
    buf.put_bytes(0, capacity - bytes.len());
    Ok(())
}

/// Read a fixed `capacity`-byte text slot.
///
/// The caller must have verified that `buf` holds at least `capacity`
/// bytes; layouts check the full frame length before any field is read.
/// Malformed slots (non-zero bytes after the terminator, invalid UTF-8)
/// yield an empty string and push a [`FieldWarning`].
pub fn get_fixed_str(
    buf: &mut impl Buf,
    field: &'static str,
    capacity: usize,
    warnings: &mut Vec<FieldWarning>,
) -> String {
    let mut raw = vec![0u8; capacity];
    buf.copy_to_slice(&mut raw);

    let end = raw.iter().position(|&b| b == 0).unwrap_or(capacity);
    if raw[end..].iter().any(|&b| b != 0) {
        warnings.push(FieldWarning {
            field,
            reason: "non-zero bytes after terminator",
        });
        return String::new();
    }
    match std::str::from_utf8(&raw[..end]) {
        Ok(s) => s.to_owned(),
        Err(_) => {
            warnings.push(FieldWarning {
                field,
                reason: "invalid UTF-8 in text field",
            });
            String::new()
        }
    }
}
