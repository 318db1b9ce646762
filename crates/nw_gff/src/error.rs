//! Error types that can be emitted from this library

use miette::Diagnostic;
use nw_resource::ErrorKind;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for label and resref validation errors
    #[error(transparent)]
    Name(#[from] nw_resource::error::Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// JSON document is malformed: {0}
    #[cfg(feature = "serde")]
    #[error("JSON document is malformed: {0}")]
    InvalidJson(&'static str),

    /// field {label:?} doesn't hold a valid {kind} value
    #[cfg(feature = "serde")]
    #[error("field {label:?} doesn't hold a valid {kind} value")]
    InvalidJsonField {
        /// Label of the field
        label: String,
        /// Kind named by the field's `type`, or `"unknown"`
        kind: &'static str,
    },

    /// {0:?} is not a GFF file type
    #[error("{0:?} is not a GFF file type")]
    #[diagnostic(help("expected a GFF resource type such as \"UTC \", \"IFO \" or \"GFF \""))]
    InvalidFileType(String),

    /// unsupported GFF version {0:?}, expected "V3.2"
    #[error("unsupported GFF version {0:?}, expected \"V3.2\"")]
    UnsupportedVersion(String),

    /// {section} section needs {needed} bytes but only {available} are available
    #[error("{section} section needs {needed} bytes but only {available} are available")]
    Truncated {
        /// Section being read
        section: &'static str,
        /// Bytes the section declares (offset included)
        needed: u64,
        /// Size of the buffer
        available: u64,
    },

    /// offset {offset} points outside the {section} section
    #[error("offset {offset} points outside the {section} section")]
    InvalidOffset {
        /// Section the offset refers to
        section: &'static str,
        /// The offending offset or index
        offset: u64,
    },

    /// unknown field kind {0}
    #[error("unknown field kind {0}")]
    UnknownFieldKind(u32),

    /// struct {0} doesn't exist
    #[error("struct {0} doesn't exist")]
    InvalidStructIndex(u32),

    /// field {0} doesn't exist
    #[error("field {0} doesn't exist")]
    InvalidFieldIndex(u32),

    /// label {0} doesn't exist
    #[error("label {0} doesn't exist")]
    InvalidLabelIndex(u32),

    /// label {label:?} appears twice in struct {struct_index}
    #[error("label {label:?} appears twice in struct {struct_index}")]
    DuplicateLabel {
        /// The repeated label
        label: String,
        /// Struct holding the duplicate
        struct_index: u32,
    },

    /// struct {0} is its own ancestor
    #[error("struct {0} is its own ancestor")]
    CyclicStructure(u32),

    /// document has no root struct
    #[error("document has no root struct")]
    MissingRoot,

    /// {0} doesn't fit in a GFF file
    #[error("{0} doesn't fit in a GFF file")]
    TooLarge(&'static str),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IOError(_) => ErrorKind::Io,
            Error::BinRWError(binrw::Error::Io(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                ErrorKind::Truncation
            }
            Error::BinRWError(binrw::Error::Io(_)) => ErrorKind::Io,
            Error::Name(e) => e.kind(),
            Error::Truncated { .. } => ErrorKind::Truncation,
            _ => ErrorKind::Format,
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
