//! Validation and fixed-width slot handling for the short ASCII names used across Aurora formats.

use crate::error::{Error, Result};

/// Maximum length in bytes of a resref or a GFF label
pub const MAX_NAME_LEN: usize = 16;

/// Checks that `name` fits in `max` bytes and contains only non-NUL ASCII characters.
pub fn validate_name(name: &str, max: usize) -> Result<()> {
    if name.len() > max {
        return Err(Error::TooLong {
            name: name.to_owned(),
            len: name.len(),
            max,
        });
    }

    if !name.bytes().all(|b| b.is_ascii() && b != 0) {
        return Err(Error::InvalidCharacter {
            name: name.to_owned(),
        });
    }

    Ok(())
}

/// Returns the part of a fixed-width, NUL padded slot that precedes the padding.
pub fn trim_padding(slot: &[u8]) -> &[u8] {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    &slot[..end]
}

/// Reads a name out of a NUL padded slot, validating it on the way.
pub fn name_from_slot(slot: &[u8]) -> Result<String> {
    let raw = trim_padding(slot);
    if !raw.is_ascii() {
        return Err(Error::InvalidCharacter {
            name: String::from_utf8_lossy(raw).into_owned(),
        });
    }

    // ASCII is always valid UTF-8
    let name = String::from_utf8_lossy(raw).into_owned();
    validate_name(&name, slot.len())?;
    Ok(name)
}

/// Writes an already validated name into a NUL padded slot of `N` bytes.
///
/// Bytes past `N` are dropped; callers validate the length first.
pub fn name_to_slot<const N: usize>(name: &str) -> [u8; N] {
    let mut slot = [0u8; N];
    let bytes = name.as_bytes();
    let len = bytes.len().min(N);
    slot[..len].copy_from_slice(&bytes[..len]);
    slot
}
