//! JSON view of a document.
//!
//! Every field becomes `{"type": <kind>, "value": <value>}` and every struct carries its tag under
//! `__struct_id`. [`Document::from_json`] reads the same shape back, so a document can be edited as
//! text and rebuilt.

use nw_resource::{ResRef, Tag};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::Error;
use crate::tree::{Document, StructId, UNTYPED_TAG};
use crate::types::{check_file_type, GFF_VERSION};
use crate::value::{FieldKind, FieldValue, LocString};

const STRUCT_ID: &str = "__struct_id";

struct StructView<'a> {
    doc: &'a Document,
    id: StructId,
}

struct FieldView<'a> {
    doc: &'a Document,
    value: &'a FieldValue,
}

struct ValueView<'a> {
    doc: &'a Document,
    value: &'a FieldValue,
}

struct ListView<'a> {
    doc: &'a Document,
    ids: &'a [StructId],
}

impl Serialize for StructView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let node = self
            .doc
            .get(self.id)
            .ok_or_else(|| S::Error::custom(format!("struct {} doesn't exist", self.id)))?;

        let mut map = serializer.serialize_map(Some(node.len() + 1))?;
        map.serialize_entry(STRUCT_ID, &node.tag())?;
        for (label, value) in node.iter() {
            map.serialize_entry(
                label.as_str(),
                &FieldView {
                    doc: self.doc,
                    value,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for FieldView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.value.kind().name())?;
        map.serialize_entry(
            "value",
            &ValueView {
                doc: self.doc,
                value: self.value,
            },
        )?;
        map.end()
    }
}

impl Serialize for ValueView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            FieldValue::Byte(v) => serializer.serialize_u8(*v),
            FieldValue::Char(v) => serializer.serialize_i8(*v),
            FieldValue::Word(v) => serializer.serialize_u16(*v),
            FieldValue::Short(v) => serializer.serialize_i16(*v),
            FieldValue::Dword(v) => serializer.serialize_u32(*v),
            FieldValue::Int(v) => serializer.serialize_i32(*v),
            FieldValue::Dword64(v) => serializer.serialize_u64(*v),
            FieldValue::Int64(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f32(*v),
            FieldValue::Double(v) => serializer.serialize_f64(*v),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::ResRef(r) => serializer.serialize_str(r.as_str()),
            FieldValue::LocString(loc) => loc.serialize(serializer),
            FieldValue::Void(bytes) => {
                let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                for b in bytes {
                    seq.serialize_element(b)?;
                }
                seq.end()
            }
            FieldValue::Struct(id) => StructView {
                doc: self.doc,
                id: *id,
            }
            .serialize(serializer),
            FieldValue::List(ids) => ListView {
                doc: self.doc,
                ids,
            }
            .serialize(serializer),
        }
    }
}

impl Serialize for ListView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.ids.len()))?;
        for id in self.ids {
            seq.serialize_element(&StructView {
                doc: self.doc,
                id: *id,
            })?;
        }
        seq.end()
    }
}

impl Serialize for LocString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("str_ref", &self.str_ref)?;
        map.serialize_entry("strings", &self.strings)?;
        map.end()
    }
}

#[cfg(feature = "serde")]
impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.check_acyclic().map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("file_type", self.file_type.as_str())?;
        map.serialize_entry("file_version", self.file_version.as_str())?;
        map.serialize_entry(
            "root",
            &StructView {
                doc: self,
                id: StructId::ROOT,
            },
        )?;
        map.end()
    }
}

fn member<'a>(object: &'a Map<String, Value>, key: &'static str) -> crate::error::Result<&'a Value> {
    object.get(key).ok_or(Error::InvalidJson(key))
}

fn text_member<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
) -> crate::error::Result<&'a str> {
    member(object, key)?
        .as_str()
        .ok_or(Error::InvalidJson(key))
}

fn struct_tag(object: &Map<String, Value>) -> crate::error::Result<u32> {
    match object.get(STRUCT_ID) {
        None => Ok(UNTYPED_TAG),
        Some(tag) => tag
            .as_u64()
            .and_then(|tag| u32::try_from(tag).ok())
            .ok_or(Error::InvalidJson(STRUCT_ID)),
    }
}

fn loc_string(value: &Value) -> Option<LocString> {
    let object = value.as_object()?;
    let str_ref = u32::try_from(object.get("str_ref")?.as_u64()?).ok()?;

    let mut loc = LocString::with_str_ref(str_ref);
    for (language, text) in object.get("strings")?.as_object()? {
        loc.insert(language.parse().ok()?, text.as_str()?);
    }
    Some(loc)
}

fn void(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

/// Decode one `{"type", "value"}` pair
///
/// Struct and list children get an empty struct in `doc` and are queued on `pending` to be filled
/// in later.
fn field_value<'a>(
    doc: &mut Document,
    pending: &mut Vec<(StructId, &'a Value)>,
    label: &str,
    field: &'a Value,
) -> crate::error::Result<FieldValue> {
    let invalid = |kind: &'static str| Error::InvalidJsonField {
        label: label.to_owned(),
        kind,
    };

    let object = field.as_object().ok_or_else(|| invalid("unknown"))?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(FieldKind::from_name)
        .ok_or_else(|| invalid("unknown"))?;
    let value = object.get("value").ok_or_else(|| invalid(kind.name()))?;

    let parsed = match kind {
        FieldKind::Byte => value
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .map(FieldValue::Byte),
        FieldKind::Char => value
            .as_i64()
            .and_then(|v| i8::try_from(v).ok())
            .map(FieldValue::Char),
        FieldKind::Word => value
            .as_u64()
            .and_then(|v| u16::try_from(v).ok())
            .map(FieldValue::Word),
        FieldKind::Short => value
            .as_i64()
            .and_then(|v| i16::try_from(v).ok())
            .map(FieldValue::Short),
        FieldKind::Dword => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(FieldValue::Dword),
        FieldKind::Int => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(FieldValue::Int),
        FieldKind::Dword64 => value.as_u64().map(FieldValue::Dword64),
        FieldKind::Int64 => value.as_i64().map(FieldValue::Int64),
        FieldKind::Float => value.as_f64().map(|v| FieldValue::Float(v as f32)),
        FieldKind::Double => value.as_f64().map(FieldValue::Double),
        FieldKind::String => value.as_str().map(|v| FieldValue::String(v.to_owned())),
        FieldKind::ResRef => match value.as_str() {
            Some(name) => Some(FieldValue::ResRef(ResRef::new(name)?)),
            None => None,
        },
        FieldKind::LocString => loc_string(value).map(FieldValue::LocString),
        FieldKind::Void => void(value).map(FieldValue::Void),
        FieldKind::Struct => match value.as_object() {
            Some(child) => {
                let id = doc.add_struct(struct_tag(child)?);
                pending.push((id, value));
                Some(FieldValue::Struct(id))
            }
            None => None,
        },
        FieldKind::List => match value.as_array() {
            Some(elements) => {
                let mut ids = Vec::with_capacity(elements.len());
                for element in elements {
                    let child = element.as_object().ok_or_else(|| invalid(kind.name()))?;
                    let id = doc.add_struct(struct_tag(child)?);
                    pending.push((id, element));
                    ids.push(id);
                }
                Some(FieldValue::List(ids))
            }
            None => None,
        },
    };

    parsed.ok_or_else(|| invalid(kind.name()))
}

impl Document {
    /// Pretty printed JSON view of the document
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a document from its JSON view
    ///
    /// Nesting is resolved with an explicit work list, so deep input can't exhaust the stack. Field
    /// order inside each struct follows the JSON text.
    ///
    /// ```
    /// # fn doit() -> nw_gff::error::Result<()> {
    /// use nw_gff::tree::Document;
    /// use nw_gff::value::FieldValue;
    ///
    /// let doc = Document::from_json(
    ///     r#"{"file_type": "UTI", "file_version": "V3.2",
    ///         "root": {"StackSize": {"type": "word", "value": 10}}}"#,
    /// )?;
    ///
    /// assert_eq!(doc.root().get("StackSize"), Some(&FieldValue::Word(10)));
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    #[instrument(skip_all, err)]
    pub fn from_json(text: &str) -> crate::error::Result<Document> {
        let top: Value = serde_json::from_str(text)?;
        let top = top.as_object().ok_or(Error::InvalidJson("document"))?;

        let file_type = check_file_type(Tag::new(text_member(top, "file_type")?)?)?;
        let version = text_member(top, "file_version")?;
        if version.as_bytes() != GFF_VERSION {
            return Err(Error::UnsupportedVersion(version.to_owned()));
        }

        let root = member(top, "root")?;
        let root_tag = struct_tag(root.as_object().ok_or(Error::InvalidJson("root"))?)?;

        let mut doc = Document::new(file_type);
        doc.root_mut().set_tag(root_tag);

        let mut pending = vec![(StructId::ROOT, root)];
        while let Some((id, node)) = pending.pop() {
            let object = node.as_object().ok_or(Error::InvalidJson("struct"))?;
            for (label, field) in object {
                if label == STRUCT_ID {
                    continue;
                }
                let value = field_value(&mut doc, &mut pending, label, field)?;
                doc[id].set(label, value)?;
            }
        }

        debug!(%file_type, structs = doc.struct_count(), "read JSON");
        Ok(doc)
    }
}
