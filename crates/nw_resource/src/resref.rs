//! Resource references: the short, case-insensitive names resources are looked up by.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use derive_more::derive::{AsRef, Display};

use crate::error::{Error, Result};
use crate::name::{name_from_slot, name_to_slot, validate_name, MAX_NAME_LEN};

/// Name of a game resource, at most 16 ASCII characters
///
/// The spelling given at construction is kept for display and for writing back to disk, but
/// equality, hashing and ordering ignore ASCII case: `"Foo"` and `"FOO"` name the same resource.
#[derive(Clone, Default, Debug, Display, AsRef)]
#[as_ref(forward)]
pub struct ResRef(String);

/// Resrefs become file names on extraction, so they can't carry path syntax
fn check_file_name(name: &str) -> Result<()> {
    let forbidden = |b: u8| b.is_ascii_control() || matches!(b, b'/' | b'\\' | b':');
    if name.bytes().any(forbidden) {
        return Err(Error::InvalidCharacter {
            name: name.to_owned(),
        });
    }
    Ok(())
}

impl ResRef {
    /// Create a resref, failing with an encoding error if the name is too long, not ASCII or
    /// contains a path separator, `:` or a control character
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name, MAX_NAME_LEN)?;
        check_file_name(&name)?;
        Ok(ResRef(name))
    }

    /// Read a resref from a 16 byte NUL padded slot
    pub fn from_slot(slot: &[u8]) -> Result<Self> {
        if slot.len() > MAX_NAME_LEN {
            return Err(Error::TooLong {
                name: String::from_utf8_lossy(slot).into_owned(),
                len: slot.len(),
                max: MAX_NAME_LEN,
            });
        }
        let name = name_from_slot(slot)?;
        check_file_name(&name)?;
        Ok(ResRef(name))
    }

    /// The 16 byte NUL padded on-disk form
    pub fn to_slot(&self) -> [u8; MAX_NAME_LEN] {
        name_to_slot(&self.0)
    }

    /// The name as given at construction
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the name in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the name is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The canonical lower-case spelling used for comparisons
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for ResRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ResRef {}

impl Hash for ResRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xFF);
    }
}

impl PartialOrd for ResRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl FromStr for ResRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ResRef::new(s)
    }
}

impl TryFrom<&str> for ResRef {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        ResRef::new(value)
    }
}

impl TryFrom<String> for ResRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ResRef::new(value)
    }
}
