//! Field labels.

use std::borrow::Borrow;
use std::str::FromStr;

use derive_more::derive::{AsRef, Display};
use nw_resource::name::{name_from_slot, name_to_slot, validate_name, MAX_NAME_LEN};

use crate::error::{Error, Result};

/// Name of a field inside a struct
///
/// Labels are at most 16 ASCII characters without NUL. Unlike resrefs they compare by exact text:
/// `"Tag"` and `"TAG"` are two different labels.
#[derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[as_ref(forward)]
pub struct Label(String);

impl Label {
    /// Create a label, failing with an encoding error when it can't be stored
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        validate_name(&text, MAX_NAME_LEN)?;
        Ok(Label(text))
    }

    /// Read a label from its 16 byte slot in the label array
    pub fn from_slot(slot: &[u8]) -> Result<Self> {
        Ok(Label(name_from_slot(slot)?))
    }

    /// The NUL padded on-disk form
    pub fn to_slot(&self) -> [u8; MAX_NAME_LEN] {
        name_to_slot(&self.0)
    }

    /// The label text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Label::new(s)
    }
}

impl TryFrom<&str> for Label {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Label::new(value)
    }
}
