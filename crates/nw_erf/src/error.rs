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

    /// Transparent wrapper for resref validation errors
    #[error(transparent)]
    Name(#[from] nw_resource::error::Error),

    /// {0:?} is not an ERF file type
    #[error("{0:?} is not an ERF file type")]
    #[diagnostic(help("expected one of \"ERF \", \"MOD \", \"HAK \", \"SAV \" or \"NWM \""))]
    InvalidFileType(String),

    /// unsupported ERF version {0:?}
    #[error("unsupported ERF version {0:?}")]
    #[diagnostic(help("expected \"V1.0\" or \"E1.0\""))]
    UnsupportedVersion(String),

    /// {section} needs {needed} bytes but only {available} are available
    #[error("{section} needs {needed} bytes but only {available} are available")]
    Truncated {
        /// Section being read
        section: &'static str,
        /// Bytes the section declares (offset included)
        needed: u64,
        /// Size of the buffer
        available: u64,
    },

    /// {0} doesn't fit in an ERF file
    #[error("{0} doesn't fit in an ERF file")]
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
