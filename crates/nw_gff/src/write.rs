//! Encoding GFF files
//!

use std::io::{Cursor, Write};

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::label::Label;
use crate::tree::{Document, StructId};
use crate::types::{
    check_file_type, FieldEntry, GffHeader, Section, StructEntry, GFF_VERSION, LABEL_SIZE,
};
use crate::value::{FieldValue, LocString};

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(what))
}

/// Tables of the file being built, in the order they're written
#[derive(Default)]
struct GffBuilder {
    structs: Vec<StructEntry>,
    fields: Vec<FieldEntry>,
    labels: IndexSet<Label>,
    field_data: Vec<u8>,
    field_indices: Vec<u8>,
    list_indices: Vec<u8>,
    /// New index of every arena slot that is written
    remap: Vec<Option<u32>>,
}

impl GffBuilder {
    fn new(doc: &Document, order: &[StructId]) -> Self {
        let mut remap = vec![None; doc.struct_count()];
        for (new_index, id) in order.iter().enumerate() {
            remap[id.index()] = Some(new_index as u32);
        }

        Self {
            remap,
            ..Default::default()
        }
    }

    fn struct_index(&self, id: StructId) -> Result<u32> {
        self.remap
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(Error::InvalidStructIndex(id.index() as u32))
    }

    fn data_offset(&self) -> Result<u32> {
        to_u32(self.field_data.len(), "field data")
    }

    fn push_blob(&mut self, bytes: &[u8]) -> Result<u32> {
        let offset = self.data_offset()?;
        self.field_data
            .write_u32::<LittleEndian>(to_u32(bytes.len(), "field data")?)?;
        self.field_data.write_all(bytes)?;
        Ok(offset)
    }

    fn push_loc_string(&mut self, loc: &LocString) -> Result<u32> {
        let offset = self.data_offset()?;
        let body_len: usize = 8 + loc.iter().map(|(_, text)| 8 + text.len()).sum::<usize>();

        let data = &mut self.field_data;
        data.write_u32::<LittleEndian>(to_u32(body_len, "localized string")?)?;
        data.write_u32::<LittleEndian>(loc.str_ref)?;
        data.write_u32::<LittleEndian>(to_u32(loc.len(), "localized string")?)?;
        for (language, text) in loc.iter() {
            data.write_u32::<LittleEndian>(language)?;
            data.write_u32::<LittleEndian>(text.len() as u32)?;
            data.write_all(text.as_bytes())?;
        }

        Ok(offset)
    }

    fn push_list(&mut self, ids: &[StructId]) -> Result<u32> {
        let offset = to_u32(self.list_indices.len(), "list indices")?;
        self.list_indices
            .write_u32::<LittleEndian>(to_u32(ids.len(), "list")?)?;
        for id in ids {
            let index = self.struct_index(*id)?;
            self.list_indices.write_u32::<LittleEndian>(index)?;
        }
        Ok(offset)
    }

    /// Inline value or offset stored in the field record
    fn encode_value(&mut self, value: &FieldValue) -> Result<u32> {
        Ok(match value {
            FieldValue::Byte(v) => *v as u32,
            FieldValue::Char(v) => *v as u8 as u32,
            FieldValue::Word(v) => *v as u32,
            FieldValue::Short(v) => *v as u16 as u32,
            FieldValue::Dword(v) => *v,
            FieldValue::Int(v) => *v as u32,
            FieldValue::Float(v) => v.to_bits(),
            FieldValue::Dword64(v) => {
                let offset = self.data_offset()?;
                self.field_data.write_u64::<LittleEndian>(*v)?;
                offset
            }
            FieldValue::Int64(v) => {
                let offset = self.data_offset()?;
                self.field_data.write_i64::<LittleEndian>(*v)?;
                offset
            }
            FieldValue::Double(v) => {
                let offset = self.data_offset()?;
                self.field_data.write_f64::<LittleEndian>(*v)?;
                offset
            }
            FieldValue::String(s) => self.push_blob(s.as_bytes())?,
            FieldValue::ResRef(r) => {
                let offset = self.data_offset()?;
                self.field_data.write_u8(r.len() as u8)?;
                self.field_data.write_all(r.as_str().as_bytes())?;
                offset
            }
            FieldValue::LocString(loc) => self.push_loc_string(loc)?,
            FieldValue::Void(bytes) => self.push_blob(bytes)?,
            FieldValue::Struct(id) => self.struct_index(*id)?,
            FieldValue::List(ids) => self.push_list(ids)?,
        })
    }

    fn add_struct(&mut self, doc: &Document, id: StructId) -> Result<()> {
        let node = &doc[id];
        let first_field = to_u32(self.fields.len(), "fields")?;

        for (label, value) in node.iter() {
            let (label_index, _) = self.labels.insert_full(label.clone());
            let data_or_offset = self.encode_value(value)?;
            self.fields.push(FieldEntry {
                kind: value.kind() as u32,
                label_index: to_u32(label_index, "labels")?,
                data_or_offset,
            });
        }

        let field_count = to_u32(node.len(), "fields")?;
        let data_or_offset = match field_count {
            1 => first_field,
            _ => {
                let offset = to_u32(self.field_indices.len(), "field indices")?;
                for index in first_field..first_field + field_count {
                    self.field_indices.write_u32::<LittleEndian>(index)?;
                }
                offset
            }
        };

        self.structs.push(StructEntry {
            tag: node.tag(),
            data_or_offset,
            field_count,
        });

        Ok(())
    }

    fn header(&self, doc: &Document) -> Result<GffHeader> {
        let mut offset = GffHeader::SIZE;
        let mut next = |count: usize, record_size: u32, what: &'static str| -> Result<Section> {
            let count = to_u32(count, what)?;
            let section = Section { offset, count };
            offset = count
                .checked_mul(record_size)
                .and_then(|len| offset.checked_add(len))
                .ok_or(Error::TooLarge(what))?;
            Ok(section)
        };

        Ok(GffHeader {
            file_type: doc.file_type.to_bytes(),
            file_version: GFF_VERSION,
            structs: next(self.structs.len(), StructEntry::SIZE, "structs")?,
            fields: next(self.fields.len(), FieldEntry::SIZE, "fields")?,
            labels: next(self.labels.len(), LABEL_SIZE, "labels")?,
            field_data: next(self.field_data.len(), 1, "field data")?,
            field_indices: next(self.field_indices.len(), 1, "field indices")?,
            list_indices: next(self.list_indices.len(), 1, "list indices")?,
        })
    }

    fn finish(self, header: &GffHeader) -> Result<Vec<u8>> {
        let total = header.list_indices.end(1) as usize;
        let mut out = Cursor::new(Vec::with_capacity(total));

        header.write(&mut out)?;
        for entry in &self.structs {
            entry.write(&mut out)?;
        }
        for entry in &self.fields {
            entry.write(&mut out)?;
        }
        for label in &self.labels {
            out.write_all(&label.to_slot())?;
        }
        out.write_all(&self.field_data)?;
        out.write_all(&self.field_indices)?;
        out.write_all(&self.list_indices)?;

        Ok(out.into_inner())
    }
}

/// Encode a document into a new GFF file
///
/// Only structs reachable from the root are written, in pre-order, so the root is always struct 0.
/// A struct referenced from several fields is written once. The output only depends on the
/// document: encoding the same document twice gives the same bytes.
#[instrument(skip_all, err, fields(file_type = %doc.file_type))]
pub fn encode_gff(doc: &Document) -> Result<Vec<u8>> {
    check_file_type(doc.file_type)?;
    if doc.file_version.to_bytes() != GFF_VERSION {
        return Err(Error::UnsupportedVersion(doc.file_version.to_string()));
    }

    doc.check_acyclic()?;
    let order = doc.preorder()?;

    let mut builder = GffBuilder::new(doc, &order);
    for id in order {
        builder.add_struct(doc, id)?;
    }

    let header = builder.header(doc)?;
    debug!(
        structs = header.structs.count,
        fields = header.fields.count,
        labels = header.labels.count,
        field_data = header.field_data.count,
        "writing file"
    );

    builder.finish(&header)
}

impl Document {
    /// Encode the document and write it to `writer`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&encode_gff(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use nw_resource::{ErrorKind, ResRef, Tag};

    use crate::error::{Error, Result};
    use crate::read::decode_gff;
    use crate::tree::{Document, StructId};
    use crate::value::{FieldValue, LocString};
    use crate::write::encode_gff;

    #[traced_test]
    #[test]
    fn write_empty_document() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header
            0x47, 0x46, 0x46, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Root struct
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let doc = Document::new(Tag::new("GFF")?);
        assert_eq!(encode_gff(&doc)?, expected);
        assert!(logs_contain("writing file"));

        Ok(())
    }

    #[test]
    fn write_two_fields() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header (56)
            0x55, 0x54, 0x43, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x5C, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00,
            0x85, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,
            0x8D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Structs (12)
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            // Fields (24)
            0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFF, 0xFF, 0xFF,
            0x0A, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Labels (32)
            0x48, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x54, 0x61, 0x67, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Field data (9)
            0x05, 0x00, 0x00, 0x00, 0x67, 0x75, 0x61, 0x72, 0x64,
            // Field indices (8)
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        ];

        let mut doc = Document::new(Tag::new("UTC")?);
        doc.root_mut().set("HP", FieldValue::Int(-5))?;
        doc.root_mut().set("Tag", "guard")?;

        assert_eq!(encode_gff(&doc)?, expected);

        Ok(())
    }

    #[test]
    fn labels_are_shared_between_structs() -> Result<()> {
        let mut doc = Document::new(Tag::new("GFF")?);
        let a = doc.add_struct(0);
        let b = doc.add_struct(0);
        doc[a].set("Value", FieldValue::Byte(1))?;
        doc[b].set("Value", FieldValue::Byte(2))?;
        doc[b].set("value", FieldValue::Byte(3))?;
        doc.root_mut().set("Items", vec![a, b])?;

        let bytes = encode_gff(&doc)?;
        // "Items", "Value", "value"
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 3);

        Ok(())
    }

    #[test]
    fn shared_struct_is_written_once() -> Result<()> {
        let mut doc = Document::new(Tag::new("GFF")?);
        let shared = doc.add_struct(3);
        doc[shared].set("X", FieldValue::Float(1.5))?;
        doc.root_mut().set("A", shared)?;
        doc.root_mut().set("B", shared)?;

        let bytes = encode_gff(&doc)?;
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 2);

        let decoded = decode_gff(&bytes)?;
        assert_eq!(decoded.root().get("A"), decoded.root().get("B"));
        assert_eq!(decoded, doc);

        Ok(())
    }

    #[test]
    fn unreachable_structs_are_dropped() -> Result<()> {
        let mut doc = Document::new(Tag::new("GFF")?);
        let orphan = doc.add_struct(0);
        doc[orphan].set("Lost", FieldValue::Byte(1))?;

        let decoded = decode_gff(&encode_gff(&doc)?)?;
        assert_eq!(decoded.struct_count(), 1);
        assert_eq!(decoded, doc);

        Ok(())
    }

    #[test]
    fn rejects_cycles() {
        let mut doc = Document::new(Tag::new("GFF").unwrap());
        let child = doc.add_struct(0);
        doc.root_mut().set("Child", child).unwrap();
        doc[child].set("Parent", StructId::ROOT).unwrap();

        assert!(matches!(
            encode_gff(&doc),
            Err(Error::CyclicStructure(_))
        ));
    }

    #[test]
    fn rejects_unknown_file_type() {
        let doc = Document::new(Tag::new("XXXX").unwrap());

        let err = encode_gff(&doc).unwrap_err();
        assert!(matches!(err, Error::InvalidFileType(_)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn every_kind_survives() -> Result<()> {
        let mut doc = Document::new(Tag::new("UTI")?);
        let child = doc.add_struct(7);
        doc[child].set("Inner", FieldValue::Short(-2))?;

        let mut loc = LocString::with_str_ref(1234);
        loc.insert(0, "Torch");
        loc.insert(2, "Torche");

        let root = doc.root_mut();
        root.set("Byte", FieldValue::Byte(200))?;
        root.set("Char", FieldValue::Char(-7))?;
        root.set("Word", FieldValue::Word(60_000))?;
        root.set("Short", FieldValue::Short(-30_000))?;
        root.set("Dword", FieldValue::Dword(4_000_000_000))?;
        root.set("Int", FieldValue::Int(-2_000_000_000))?;
        root.set("Dword64", FieldValue::Dword64(u64::MAX))?;
        root.set("Int64", FieldValue::Int64(i64::MIN))?;
        root.set("Float", FieldValue::Float(0.25))?;
        root.set("Double", FieldValue::Double(-1e100))?;
        root.set("String", FieldValue::String("héllo".into()))?;
        root.set("ResRef", FieldValue::ResRef(ResRef::new("nw_it_torch")?))?;
        root.set("LocString", FieldValue::LocString(loc))?;
        root.set("Void", FieldValue::Void(vec![0, 1, 2, 255]))?;
        root.set("Struct", child)?;
        root.set("EmptyList", FieldValue::List(Vec::new()))?;

        let decoded = decode_gff(&encode_gff(&doc)?)?;
        assert_eq!(decoded, doc);

        Ok(())
    }
}
