//! This library handles reading from and creating **ERF** archives used by *Neverwinter Nights*.
//!
//! # ERF Format Documentation
//!
//! ERF ("Encapsulated Resource File") is a flat archive of named resources. Modules (`.mod`), hak
//! packs (`.hak`), saved games (`.sav`) and plain `.erf` files all share it; only the file type tag
//! differs.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File type              | 4 bytes: "ERF ", "MOD ", "HAK ", "SAV " or "NWM "          |
//! | 0x0004         | Version                | 4 bytes: "V1.0" or "E1.0"                                  |
//! | 0x0008         | Language count         | 4 bytes: number of localized description strings           |
//! | 0x000C         | Localized string size  | 4 bytes: size of the localized string block                |
//! | 0x0010         | Entry count            | 4 bytes: number of resources                               |
//! | 0x0014         | Localized strings      | 4 bytes: offset to the localized string block              |
//! | 0x0018         | Keys                   | 4 bytes: offset to the key list                            |
//! | 0x001C         | Resources              | 4 bytes: offset to the resource list                       |
//! | 0x0020         | Build year             | 4 bytes: years since 1900                                  |
//! | 0x0024         | Build day              | 4 bytes: day of the year, starting at 1                    |
//! | 0x0028         | Description            | 4 bytes: talk table reference                              |
//! | 0x002C         | Reserved               | 116 bytes for "V1.0", 92 bytes for "E1.0"                  |
//!
//! ### Localized Strings
//!
//! `Language count` records of a `u32` language id, a `u32` length and the text.
//!
//! ### Keys
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | ResRef                 | 16 bytes: NUL padded name                                  |
//! | 0x0010         | Resource id            | 4 bytes: index of the record                               |
//! | 0x0014         | Resource type          | 2 bytes: see [`nw_resource::restype`]                      |
//! | 0x0016         | Unused                 | 2 bytes                                                    |
//!
//! ### Resources
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Offset                 | 4 bytes: offset from the start of the file                 |
//! | 0x0004         | Size                   | 4 bytes: size of the resource data                         |
//!
//! The n-th resource record holds the data of the n-th key.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Names**: resource names compare case-insensitively, so `"Foo"` and `"foo"` of the same type
//!   are one resource
//!

pub mod archive;
pub mod date;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use archive::{Archive, ArchiveEntry};
pub use read::decode_erf;
pub use types::ErfVersion;
pub use write::{encode_erf, encode_erf_with};
