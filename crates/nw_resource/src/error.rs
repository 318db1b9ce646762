//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification shared by the error types of every format crate in the workspace
///
/// Callers that only need to know *what kind* of failure happened (a malformed file, a file cut short,
/// a name that can't be stored, or a failing storage medium) can match on this instead of on the
/// individual variants of each crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad magic, unsupported version or an invalid offset/index inside the file
    Format,

    /// Fewer bytes are available than a section of the file declares
    Truncation,

    /// A label, resref or tag can't be represented in the on-disk format
    Encoding,

    /// The underlying reader or writer failed
    Io,
}

/// Error type for library
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// name {name:?} is {len} bytes long, at most {max} are allowed
    #[error("name {name:?} is {len} bytes long, at most {max} are allowed")]
    TooLong {
        /// The rejected name
        name: String,
        /// Length of the rejected name in bytes
        len: usize,
        /// Maximum length for this kind of name
        max: usize,
    },

    /// name {name:?} contains a character that is not allowed in it
    #[error("name {name:?} contains a character that is not allowed in it")]
    #[diagnostic(help("names are ASCII; resrefs also exclude path separators and control characters"))]
    InvalidCharacter {
        /// The rejected name, with invalid bytes replaced
        name: String,
    },

    /// {0:?} is not a valid four character tag
    #[error("{0:?} is not a valid four character tag")]
    InvalidTag(String),
}

impl Error {
    /// Every error of this crate is an encoding problem
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Encoding
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
