//! Base types for structure of ERF file.

use std::fmt;

use binrw::{BinRead, BinWrite};
use nw_resource::Tag;

use crate::error::{Error, Result};

/// File types stored in the first four bytes of an ERF archive
pub const FILE_TYPES: [Tag; 5] = [
    Tag::from_static(b"ERF "),
    Tag::from_static(b"MOD "),
    Tag::from_static(b"HAK "),
    Tag::from_static(b"SAV "),
    Tag::from_static(b"NWM "),
];

/// Check that `file_type` is one of [`FILE_TYPES`]
pub fn check_file_type(file_type: Tag) -> Result<Tag> {
    if FILE_TYPES.contains(&file_type) {
        Ok(file_type)
    } else {
        Err(Error::InvalidFileType(file_type.to_string()))
    }
}

/// Version of the archive layout
///
/// Both versions share the same records; they differ in the size of the reserved block that ends the
/// header.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ErfVersion {
    /// `"V1.0"`, the original format
    #[default]
    V1_0,

    /// `"E1.0"`, written by the Enhanced Edition toolset
    E1_0,
}

impl ErfVersion {
    /// Parse the four version bytes of the header
    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self> {
        match &bytes {
            b"V1.0" => Ok(ErfVersion::V1_0),
            b"E1.0" => Ok(ErfVersion::E1_0),
            _ => Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
        }
    }

    /// The four version bytes as written in the header
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ErfVersion::V1_0 => *b"V1.0",
            ErfVersion::E1_0 => *b"E1.0",
        }
    }

    /// Zero bytes following the fixed header fields
    pub fn reserved_len(self) -> u32 {
        match self {
            ErfVersion::V1_0 => 116,
            ErfVersion::E1_0 => 92,
        }
    }

    /// Total size of the header, reserved block included
    pub fn header_size(self) -> u32 {
        ErfHeader::SIZE + self.reserved_len()
    }
}

impl fmt::Display for ErfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErfVersion::V1_0 => "V1.0",
            ErfVersion::E1_0 => "E1.0",
        })
    }
}

/// ERF file header, without the reserved block
///
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ErfHeader {
    /// `"ERF "`, `"MOD "`, `"HAK "`, ...
    pub file_type: [u8; 4],

    /// `"V1.0"` or `"E1.0"`
    pub version: [u8; 4],

    /// Number of localized description strings
    pub language_count: u32,

    /// Size in bytes of the localized string block
    pub localized_string_size: u32,

    /// Number of resources
    pub entry_count: u32,

    /// Offset from the start of the file to the localized strings
    pub offset_to_localized_strings: u32,

    /// Offset from the start of the file to the key list
    pub offset_to_keys: u32,

    /// Offset from the start of the file to the resource list
    pub offset_to_resources: u32,

    /// Build year, counted from 1900
    pub build_year: u32,

    /// Build day, day of the year starting at 1
    pub build_day: u32,

    /// Talk table reference of the description
    pub description_str_ref: u32,
}

impl ErfHeader {
    /// Size of the fixed part of the header on disk
    pub const SIZE: u32 = 44;
}

impl Default for ErfHeader {
    fn default() -> Self {
        let header_size = ErfVersion::V1_0.header_size();
        Self {
            file_type: *b"ERF ",
            version: ErfVersion::V1_0.to_bytes(),
            language_count: 0,
            localized_string_size: 0,
            entry_count: 0,
            offset_to_localized_strings: header_size,
            offset_to_keys: header_size,
            offset_to_resources: header_size,
            build_year: 0,
            build_day: 0,
            description_str_ref: 0,
        }
    }
}

/// Key list record: which resource sits at an index
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct KeyEntry {
    /// NUL padded resource name
    pub resref: [u8; 16],

    /// Index of the resource, the same as the record's position
    pub res_id: u32,

    /// Resource type code
    pub res_type: u16,

    /// Always zero
    pub unused: u16,
}

impl KeyEntry {
    /// Size of the record on disk
    pub const SIZE: u32 = 24;
}

/// Resource list record: where the data of a resource lives
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ResourceEntry {
    /// Offset from the start of the file
    pub offset: u32,

    /// Size of the data in bytes
    pub size: u32,
}

impl ResourceEntry {
    /// Size of the record on disk
    pub const SIZE: u32 = 8;
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{ErfHeader, ErfVersion, KeyEntry, ResourceEntry};

    #[test]
    fn header_sizes() {
        assert_eq!(ErfVersion::V1_0.header_size(), 160);
        assert_eq!(ErfVersion::E1_0.header_size(), 136);
    }

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x4D, 0x4F, 0x44, 0x20, 0x56, 0x31, 0x2E, 0x30,
            0x01, 0x00, 0x00, 0x00,
            0x0D, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xAD, 0x00, 0x00, 0x00,
            0xDD, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00,
            0x2A, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,
        ]);

        let expected = ErfHeader {
            file_type: *b"MOD ",
            language_count: 1,
            localized_string_size: 13,
            entry_count: 2,
            offset_to_localized_strings: 160,
            offset_to_keys: 173,
            offset_to_resources: 221,
            build_year: 124,
            build_day: 42,
            description_str_ref: u32::MAX,
            ..Default::default()
        };

        assert_eq!(ErfHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_key() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x69, 0x74, 0x65, 0x6D, 0x30, 0x30, 0x31, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x00, 0x00,
        ];

        let key = KeyEntry {
            resref: *b"item001\0\0\0\0\0\0\0\0\0",
            res_id: 3,
            res_type: 2017,
            unused: 0,
        };

        let mut actual = Vec::new();
        key.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);
        assert_eq!(actual.len(), KeyEntry::SIZE as usize);

        Ok(())
    }

    #[test]
    fn read_resource() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0xE5, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x00, 0x00,
        ]);

        let expected = ResourceEntry {
            offset: 229,
            size: 10,
        };

        assert_eq!(ResourceEntry::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn unknown_version() {
        assert!(ErfVersion::from_bytes(*b"V2.0").is_err());
        assert_eq!(ErfVersion::from_bytes(*b"E1.0").unwrap(), ErfVersion::E1_0);
    }
}
