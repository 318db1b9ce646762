//! Shared building blocks for the Aurora engine file formats used by *Neverwinter Nights*.
//!
//! Both the GFF and the ERF crates name resources and tag their files the same way. This crate holds
//! those pieces so the format crates don't have to depend on each other:
//!
//! | Type / module           | Purpose                                                          |
//! |-------------------------|------------------------------------------------------------------|
//! | [`ResRef`]              | Resource name, at most 16 ASCII characters, case-insensitive      |
//! | [`ResourceId`]          | A [`ResRef`] plus its numeric resource type                       |
//! | [`Tag`]                 | Four character file type / version tag (`"UTC "`, `"V3.2"`)       |
//! | [`restype`]             | Extension ⇄ type code registry (`txt` ⇄ 10, `gff` ⇄ 2037, ...)    |
//! | [`name`]                | Validation of the fixed-width names stored on disk                |
//! | [`error::ErrorKind`]    | Error classification shared by all format crates                  |
//!
//! ## Names
//!
//! Resrefs and GFF labels share the same on-disk constraints: at most 16 bytes, ASCII only, no
//! embedded NUL (NUL is the padding byte of the 16 byte slots they're stored in). Anything else is
//! rejected with an [`error::Error`], which is always an [`error::ErrorKind::Encoding`] error.
//!
//! ```
//! use nw_resource::{restype, ResourceId};
//!
//! let id = ResourceId::from_filename("nw_it_torch.uti").unwrap();
//! assert_eq!(id.res_type, restype::lookup_type("uti"));
//! assert_eq!(id.to_string(), "nw_it_torch.uti");
//! ```

pub mod error;
pub mod id;
pub mod name;
pub mod resref;
pub mod restype;
pub mod tag;

pub use error::ErrorKind;
pub use id::ResourceId;
pub use resref::ResRef;
pub use tag::Tag;
