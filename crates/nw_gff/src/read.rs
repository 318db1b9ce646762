//! Decoding GFF files
//!

use std::io::{Cursor, Read};

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use nw_resource::{ResRef, Tag};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::label::Label;
use crate::tree::{Document, Struct, StructId};
use crate::types::{
    check_file_type, FieldEntry, GffHeader, Section, StructEntry, GFF_VERSION, LABEL_SIZE,
};
use crate::value::{FieldKind, FieldValue, LocString};

/// A byte array section with bounds checked little endian access
#[derive(Clone, Copy)]
struct Block<'a> {
    name: &'static str,
    bytes: &'a [u8],
}

impl<'a> Block<'a> {
    fn take(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(Error::InvalidOffset {
                section: self.name,
                offset: offset as u64,
            })
    }

    fn u8_at(&self, offset: usize) -> Result<u8> {
        Ok(self.take(offset, 1)?[0])
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(offset, 4)?))
    }

    fn u64_at(&self, offset: usize) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(offset, 8)?))
    }

    /// `u32` length followed by that many bytes
    fn blob_at(&self, offset: usize) -> Result<&'a [u8]> {
        let len = self.u32_at(offset)? as usize;
        self.take(offset + 4, len)
    }
}

/// Raw tables of a GFF file, before the tree is assembled
struct RawGff<'a> {
    structs: Vec<StructEntry>,
    fields: Vec<FieldEntry>,
    labels: Vec<Label>,
    field_data: Block<'a>,
    field_indices: Block<'a>,
    list_indices: Block<'a>,
}

fn check_tags(bytes: &[u8]) -> Result<(Tag, Tag)> {
    let available = bytes.len() as u64;
    let truncated = || Error::Truncated {
        section: "header",
        needed: GffHeader::SIZE as u64,
        available,
    };

    let file_type: [u8; 4] = bytes
        .get(0..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(truncated)?;
    let file_type = Tag::from_bytes(file_type)
        .map_err(|_| Error::InvalidFileType(String::from_utf8_lossy(&file_type).into_owned()))
        .and_then(check_file_type)?;

    let version: [u8; 4] = bytes
        .get(4..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(truncated)?;
    if version != GFF_VERSION {
        return Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(&version).into_owned(),
        ));
    }

    if bytes.len() < GffHeader::SIZE as usize {
        return Err(truncated());
    }

    Ok((file_type, Tag::from_static(&GFF_VERSION)))
}

fn section<'a>(
    bytes: &'a [u8],
    name: &'static str,
    section: Section,
    record_size: u32,
) -> Result<&'a [u8]> {
    let end = section.end(record_size);
    if end > bytes.len() as u64 {
        return Err(Error::Truncated {
            section: name,
            needed: end,
            available: bytes.len() as u64,
        });
    }
    Ok(&bytes[section.offset as usize..end as usize])
}

fn read_records<T>(data: &[u8], count: u32) -> Result<Vec<T>>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut cursor = Cursor::new(data);
    (0..count)
        .map(|_| T::read_le(&mut cursor).map_err(Error::from))
        .collect()
}

impl<'a> RawGff<'a> {
    fn parse(bytes: &'a [u8], header: &GffHeader) -> Result<Self> {
        let structs = section(bytes, "struct", header.structs, StructEntry::SIZE)?;
        let fields = section(bytes, "field", header.fields, FieldEntry::SIZE)?;
        let labels = section(bytes, "label", header.labels, LABEL_SIZE)?;
        let field_data = section(bytes, "field data", header.field_data, 1)?;
        let field_indices = section(bytes, "field indices", header.field_indices, 1)?;
        let list_indices = section(bytes, "list indices", header.list_indices, 1)?;

        Ok(RawGff {
            structs: read_records(structs, header.structs.count)?,
            fields: read_records(fields, header.fields.count)?,
            labels: labels
                .chunks_exact(LABEL_SIZE as usize)
                .map(Label::from_slot)
                .collect::<Result<_>>()?,
            field_data: Block {
                name: "field data",
                bytes: field_data,
            },
            field_indices: Block {
                name: "field indices",
                bytes: field_indices,
            },
            list_indices: Block {
                name: "list indices",
                bytes: list_indices,
            },
        })
    }

    fn struct_id(&self, index: u32) -> Result<StructId> {
        if (index as usize) < self.structs.len() {
            Ok(StructId(index))
        } else {
            Err(Error::InvalidStructIndex(index))
        }
    }

    fn field_indices_of(&self, entry: &StructEntry) -> Result<Vec<u32>> {
        match entry.field_count {
            0 => Ok(Vec::new()),
            1 => Ok(vec![entry.data_or_offset]),
            count => {
                let base = entry.data_or_offset as usize;
                (0..count as usize)
                    .map(|i| self.field_indices.u32_at(base + i * 4))
                    .collect()
            }
        }
    }

    fn value(&self, kind: FieldKind, data: u32) -> Result<FieldValue> {
        let inline = data.to_le_bytes();
        let offset = data as usize;

        Ok(match kind {
            FieldKind::Byte => FieldValue::Byte(inline[0]),
            FieldKind::Char => FieldValue::Char(inline[0] as i8),
            FieldKind::Word => FieldValue::Word(u16::from_le_bytes([inline[0], inline[1]])),
            FieldKind::Short => FieldValue::Short(i16::from_le_bytes([inline[0], inline[1]])),
            FieldKind::Dword => FieldValue::Dword(data),
            FieldKind::Int => FieldValue::Int(data as i32),
            FieldKind::Float => FieldValue::Float(f32::from_bits(data)),
            FieldKind::Dword64 => FieldValue::Dword64(self.field_data.u64_at(offset)?),
            FieldKind::Int64 => FieldValue::Int64(self.field_data.u64_at(offset)? as i64),
            FieldKind::Double => FieldValue::Double(f64::from_bits(self.field_data.u64_at(offset)?)),
            FieldKind::String => FieldValue::String(
                String::from_utf8_lossy(self.field_data.blob_at(offset)?).into_owned(),
            ),
            FieldKind::ResRef => {
                let len = self.field_data.u8_at(offset)? as usize;
                FieldValue::ResRef(ResRef::from_slot(self.field_data.take(offset + 1, len)?)?)
            }
            FieldKind::LocString => FieldValue::LocString(self.loc_string(offset)?),
            FieldKind::Void => FieldValue::Void(self.field_data.blob_at(offset)?.to_vec()),
            FieldKind::Struct => FieldValue::Struct(self.struct_id(data)?),
            FieldKind::List => {
                let count = self.list_indices.u32_at(offset)? as usize;
                let ids = (0..count)
                    .map(|i| {
                        let index = self.list_indices.u32_at(offset + 4 + i * 4)?;
                        self.struct_id(index)
                    })
                    .collect::<Result<_>>()?;
                FieldValue::List(ids)
            }
        })
    }

    fn loc_string(&self, offset: usize) -> Result<LocString> {
        let body = Block {
            name: "field data",
            bytes: self.field_data.blob_at(offset)?,
        };

        let mut loc = LocString::with_str_ref(body.u32_at(0)?);
        let count = body.u32_at(4)?;

        let mut cursor = 8;
        for _ in 0..count {
            let language = body.u32_at(cursor)?;
            let text = body.blob_at(cursor + 4)?;
            loc.insert(language, String::from_utf8_lossy(text));
            cursor += 8 + text.len();
        }

        Ok(loc)
    }

    fn build_struct(&self, index: u32, entry: &StructEntry) -> Result<Struct> {
        let mut node = Struct::new(entry.tag);

        for field_index in self.field_indices_of(entry)? {
            let field = self
                .fields
                .get(field_index as usize)
                .ok_or(Error::InvalidFieldIndex(field_index))?;
            let label = self
                .labels
                .get(field.label_index as usize)
                .ok_or(Error::InvalidLabelIndex(field.label_index))?;
            let kind = FieldKind::try_from(field.kind)?;

            if node.contains(label.as_str()) {
                return Err(Error::DuplicateLabel {
                    label: label.to_string(),
                    struct_index: index,
                });
            }
            node.insert(label.clone(), self.value(kind, field.data_or_offset)?);
        }

        Ok(node)
    }
}

/// Decode a complete GFF file
///
/// Either the whole document is returned or an error; nothing is decoded lazily.
///
/// ```
/// use nw_gff::{decode_gff, encode_gff, Document, FieldValue};
/// use nw_resource::Tag;
///
/// let mut doc = Document::new(Tag::new("UTC").unwrap());
/// doc.root_mut().set("Tag", FieldValue::from("guard")).unwrap();
///
/// let bytes = encode_gff(&doc).unwrap();
/// assert_eq!(decode_gff(&bytes).unwrap(), doc);
/// ```
#[instrument(skip_all, err, fields(len = bytes.len()))]
pub fn decode_gff(bytes: &[u8]) -> Result<Document> {
    let (file_type, file_version) = check_tags(bytes)?;
    let header = GffHeader::read(&mut Cursor::new(bytes))?;
    debug!(
        %file_type,
        structs = header.structs.count,
        fields = header.fields.count,
        labels = header.labels.count,
        "read header"
    );

    let raw = RawGff::parse(bytes, &header)?;
    if raw.structs.is_empty() {
        return Err(Error::MissingRoot);
    }

    let structs = raw
        .structs
        .iter()
        .enumerate()
        .map(|(i, entry)| raw.build_struct(i as u32, entry))
        .collect::<Result<Vec<_>>>()?;

    let document = Document::from_parts(file_type, file_version, structs);
    document.check_acyclic_from((0..raw.structs.len() as u32).map(StructId))?;

    Ok(document)
}

impl Document {
    /// Read a whole GFF file from `reader`
    pub fn read<R: Read>(mut reader: R) -> Result<Document> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode_gff(&bytes)
    }
}
