//! Base types for structure of GFF file.

use binrw::{BinRead, BinWrite};
use nw_resource::Tag;

use crate::error::{Error, Result};

/// Version tag every supported GFF file carries
pub const GFF_VERSION: [u8; 4] = *b"V3.2";

/// File types of the resources stored as GFF
pub const GFF_FILE_TYPES: &[Tag] = &[
    Tag::from_static(b"ARE "),
    Tag::from_static(b"BIC "),
    Tag::from_static(b"BTC "),
    Tag::from_static(b"BTD "),
    Tag::from_static(b"BTE "),
    Tag::from_static(b"BTG "),
    Tag::from_static(b"BTI "),
    Tag::from_static(b"BTM "),
    Tag::from_static(b"BTP "),
    Tag::from_static(b"BTS "),
    Tag::from_static(b"BTT "),
    Tag::from_static(b"BTW "),
    Tag::from_static(b"CAM "),
    Tag::from_static(b"DLG "),
    Tag::from_static(b"FAC "),
    Tag::from_static(b"GFF "),
    Tag::from_static(b"GIC "),
    Tag::from_static(b"GIT "),
    Tag::from_static(b"GUI "),
    Tag::from_static(b"IFO "),
    Tag::from_static(b"ITP "),
    Tag::from_static(b"JRL "),
    Tag::from_static(b"PTM "),
    Tag::from_static(b"PTT "),
    Tag::from_static(b"UTC "),
    Tag::from_static(b"UTD "),
    Tag::from_static(b"UTE "),
    Tag::from_static(b"UTG "),
    Tag::from_static(b"UTI "),
    Tag::from_static(b"UTM "),
    Tag::from_static(b"UTP "),
    Tag::from_static(b"UTS "),
    Tag::from_static(b"UTT "),
    Tag::from_static(b"UTW "),
];

/// Check that `file_type` is one of [`GFF_FILE_TYPES`]
pub fn check_file_type(file_type: Tag) -> Result<Tag> {
    if GFF_FILE_TYPES.contains(&file_type) {
        Ok(file_type)
    } else {
        Err(Error::InvalidFileType(file_type.to_string()))
    }
}

/// A region of the file, as described in the header
///
/// For the struct, field and label arrays `count` is a number of records; for the three byte arrays
/// (field data, field indices, list indices) it is a size in bytes.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct Section {
    /// Offset from the start of the file
    pub offset: u32,

    /// Number of records, or bytes for the byte arrays
    pub count: u32,
}

impl Section {
    /// Byte length of the section given the size of one record
    pub fn byte_len(&self, record_size: u32) -> u64 {
        self.count as u64 * record_size as u64
    }

    /// Offset one past the last byte of the section
    pub fn end(&self, record_size: u32) -> u64 {
        self.offset as u64 + self.byte_len(record_size)
    }
}

/// GFF file header
///
/// Starts with the file type (`"UTC "`, `"IFO "`, ...) and the version, followed by the six sections.
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffHeader {
    /// Four character file type
    pub file_type: [u8; 4],

    /// Four character version, always `"V3.2"`
    pub file_version: [u8; 4],

    /// Struct records, 12 bytes each
    pub structs: Section,

    /// Field records, 12 bytes each
    pub fields: Section,

    /// Label slots, 16 bytes each
    pub labels: Section,

    /// Payloads of complex fields
    pub field_data: Section,

    /// Field index arrays of structs with more than one field
    pub field_indices: Section,

    /// Struct index arrays of list fields
    pub list_indices: Section,
}

impl GffHeader {
    /// Size of the header on disk
    pub const SIZE: u32 = 56;
}

impl Default for GffHeader {
    fn default() -> Self {
        Self {
            file_type: *b"GFF ",
            file_version: GFF_VERSION,
            structs: Section {
                offset: Self::SIZE,
                count: 0,
            },
            fields: Section {
                offset: Self::SIZE,
                count: 0,
            },
            labels: Section {
                offset: Self::SIZE,
                count: 0,
            },
            field_data: Section {
                offset: Self::SIZE,
                count: 0,
            },
            field_indices: Section {
                offset: Self::SIZE,
                count: 0,
            },
            list_indices: Section {
                offset: Self::SIZE,
                count: 0,
            },
        }
    }
}

/// GFF struct record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct StructEntry {
    /// Programmer defined struct type, `0xFFFFFFFF` for the root
    pub tag: u32,

    /// Field index when the struct has one field, byte offset into the field indices otherwise
    pub data_or_offset: u32,

    /// Number of fields in the struct
    pub field_count: u32,
}

impl StructEntry {
    /// Size of the record on disk
    pub const SIZE: u32 = 12;
}

/// GFF field record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct FieldEntry {
    /// Raw [`crate::value::FieldKind`]
    pub kind: u32,

    /// Index into the label array
    pub label_index: u32,

    /// Inline value, offset into the field data, struct index or list offset depending on `kind`
    pub data_or_offset: u32,
}

impl FieldEntry {
    /// Size of the record on disk
    pub const SIZE: u32 = 12;
}

/// Size of one label slot on disk
pub const LABEL_SIZE: u32 = 16;

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{FieldEntry, GffHeader, Section, StructEntry};

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x55, 0x54, 0x43, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x5C, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00,
            0x81, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,
            0x89, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);

        let expected = GffHeader {
            file_type: *b"UTC ",
            structs: Section { offset: 56, count: 1 },
            fields: Section { offset: 68, count: 2 },
            labels: Section { offset: 92, count: 2 },
            field_data: Section { offset: 124, count: 5 },
            field_indices: Section { offset: 129, count: 8 },
            list_indices: Section { offset: 137, count: 0 },
            ..Default::default()
        };

        assert_eq!(GffHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_empty_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x47, 0x46, 0x46, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let mut actual = Vec::new();
        GffHeader::default().write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);
        assert_eq!(actual.len(), GffHeader::SIZE as usize);

        Ok(())
    }

    #[test]
    fn read_struct_entry() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0xFF, 0xFF, 0xFF, 0xFF,
            0x08, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
        ]);

        let expected = StructEntry {
            tag: u32::MAX,
            data_or_offset: 8,
            field_count: 3,
        };

        assert_eq!(StructEntry::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_field_entry() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x05, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xD6, 0xFF, 0xFF, 0xFF,
        ];

        let field = FieldEntry {
            kind: 5,
            label_index: 1,
            data_or_offset: -42i32 as u32,
        };

        let mut actual = Vec::new();
        field.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }
}
