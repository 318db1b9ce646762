//! Four character tags identifying file kinds and format versions.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A four byte ASCII tag such as `"UTC "`, `"V3.2"` or `"ERF "`
///
/// Shorter tags are padded with spaces, which is how the engine writes them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Build a tag from up to four printable ASCII characters, padding with spaces
    pub fn new(text: &str) -> Result<Self> {
        if text.is_empty() || text.len() > 4 {
            return Err(Error::InvalidTag(text.to_owned()));
        }

        let mut bytes = [b' '; 4];
        bytes[..text.len()].copy_from_slice(text.as_bytes());
        Self::from_bytes(bytes)
    }

    /// Interpret four raw bytes read from a file
    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            Ok(Tag(bytes))
        } else {
            Err(Error::InvalidTag(String::from_utf8_lossy(&bytes).into_owned()))
        }
    }

    /// Const constructor for tags known to be valid
    pub const fn from_static(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }

    /// The raw on-disk bytes, padding included
    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// The tag text without trailing padding
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0)
            .unwrap_or_default()
            .trim_end_matches(' ')
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::tag::Tag;

    #[test]
    fn pads_short_tags() {
        let tag = Tag::new("UTC").unwrap();
        assert_eq!(tag.to_bytes(), *b"UTC ");
        assert_eq!(tag.as_str(), "UTC");
        assert_eq!(tag.to_string(), "UTC");
    }

    #[test]
    fn rejects_bad_tags() {
        assert!(Tag::new("").is_err());
        assert!(Tag::new("TOOLONG").is_err());
        assert!(Tag::from_bytes([0, 0, 0, 0]).is_err());
    }
}
