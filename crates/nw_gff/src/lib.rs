//! This library handles reading from and creating **GFF** files used by *Neverwinter Nights*.
//!
//! # GFF Format Documentation
//!
//! GFF ("Generic File Format") is the hierarchical key/value container the Aurora engine uses for
//! almost every game object: creatures (`.utc`), items (`.uti`), areas (`.are`), module info (`.ifo`),
//! dialogs (`.dlg`) and many more. The file type tag tells them apart; the layout is always the same.
//!
//! ## File Structure
//!
//! A GFF file consists of a header followed by six sections. The header gives an offset and a count
//! for each of them.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File type              | 4 bytes: e.g. "UTC ", "IFO ", "GFF "                       |
//! | 0x0004         | Version                | 4 bytes: "V3.2"                                            |
//! | 0x0008         | Struct offset / count  | 8 bytes: 12 byte records                                   |
//! | 0x0010         | Field offset / count   | 8 bytes: 12 byte records                                   |
//! | 0x0018         | Label offset / count   | 8 bytes: 16 byte slots                                     |
//! | 0x0020         | Field data offset/size | 8 bytes: byte array                                        |
//! | 0x0028         | Field indices off/size | 8 bytes: byte array                                        |
//! | 0x0030         | List indices off/size  | 8 bytes: byte array                                        |
//!
//! ### Structs
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Type                   | 4 bytes: programmer defined, `0xFFFFFFFF` for the root     |
//! | 0x0004         | Data or offset         | 4 bytes: field index, or byte offset into field indices    |
//! | 0x0008         | Field count            | 4 bytes: number of fields                                  |
//!
//! A struct with exactly one field stores that field's index directly. A struct with more fields
//! stores a byte offset into the field indices array, where `field count` `u32` indices follow.
//! Struct 0 is the root.
//!
//! ### Fields
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Kind                   | 4 bytes: see [`FieldKind`]                                 |
//! | 0x0004         | Label index            | 4 bytes: index into the label array                        |
//! | 0x0008         | Data or offset         | 4 bytes: depends on the kind                               |
//!
//! - **Byte, Char, Word, Short, Dword, Int, Float**: the value itself, in the low bytes.
//! - **Dword64, Int64, Double**: offset into the field data, 8 bytes.
//! - **CExoString, Void**: offset into the field data, `u32` length then the bytes.
//! - **ResRef**: offset into the field data, `u8` length then the bytes.
//! - **CExoLocString**: offset into the field data: `u32` total size, `u32` string ref, `u32` count,
//!   then per string a `u32` language id, `u32` length and the text.
//! - **Struct**: index of the struct.
//! - **List**: byte offset into the list indices, where a `u32` count and that many struct indices follow.
//!
//! ### Labels
//!
//! Labels are stored once each in 16 byte NUL padded slots. Label text is compared exactly, so
//! `"Tag"` and `"TAG"` are two labels.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Text**: strings are decoded as UTF-8, invalid sequences are replaced
//!

pub mod error;
pub mod label;
pub mod read;
#[cfg(feature = "serde")]
pub mod serde;
pub mod tree;
pub mod types;
pub mod value;
pub mod write;

pub use label::Label;
pub use read::decode_gff;
pub use tree::{Document, Struct, StructId, UNTYPED_TAG};
pub use value::{FieldKind, FieldValue, LocString};
pub use write::encode_gff;
