//! In-memory GFF documents.
//!
//! A [`Document`] owns every [`Struct`] in an arena; struct and list fields refer to their children
//! by [`StructId`]. The root always lives at [`StructId::ROOT`].

use std::collections::HashSet;
use std::fmt;
use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use nw_resource::Tag;

use crate::error::{Error, Result};
use crate::label::Label;
use crate::types::GFF_VERSION;
use crate::value::FieldValue;

/// Struct tag of the root and of structs without a programmer defined type
pub const UNTYPED_TAG: u32 = u32::MAX;

/// Handle of a struct inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(pub(crate) u32);

impl StructId {
    /// The root struct of every document
    pub const ROOT: StructId = StructId(0);

    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered set of labelled fields
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    tag: u32,
    fields: IndexMap<Label, FieldValue>,
}

impl Struct {
    /// An empty struct with the given type tag
    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            fields: IndexMap::new(),
        }
    }

    /// Programmer defined type of the struct
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Change the type tag
    pub fn set_tag(&mut self, tag: u32) {
        self.tag = tag;
    }

    /// Value of the field with exactly this label
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields.get(label)
    }

    /// Mutable value of the field with exactly this label
    pub fn get_mut(&mut self, label: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(label)
    }

    /// Set a field, validating the label
    ///
    /// Replacing a field keeps its position. Returns the previous value.
    pub fn set(
        &mut self,
        label: impl AsRef<str>,
        value: impl Into<FieldValue>,
    ) -> Result<Option<FieldValue>> {
        let label = label.as_ref();
        if let Some(slot) = self.fields.get_mut(label) {
            return Ok(Some(std::mem::replace(slot, value.into())));
        }
        Ok(self.insert(Label::new(label)?, value))
    }

    /// Set a field with an already validated label
    pub fn insert(&mut self, label: Label, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(label, value.into())
    }

    /// Remove a field, keeping the order of the others
    pub fn remove(&mut self, label: &str) -> Option<FieldValue> {
        self.fields.shift_remove(label)
    }

    /// Whether a field with exactly this label exists
    pub fn contains(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the struct has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Structs referenced by struct and list fields, in field order
    pub fn children(&self) -> impl Iterator<Item = StructId> + '_ {
        self.fields.values().flat_map(|value| {
            let ids: &[StructId] = match value {
                FieldValue::Struct(id) => std::slice::from_ref(id),
                FieldValue::List(ids) => ids,
                _ => &[],
            };
            ids.iter().copied()
        })
    }
}

impl Default for Struct {
    fn default() -> Self {
        Self::new(UNTYPED_TAG)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    New,
    Active,
    Done,
}

/// A GFF document: file type, version and the struct arena
///
/// ```
/// use nw_gff::{Document, FieldValue};
/// use nw_resource::Tag;
///
/// let mut doc = Document::new(Tag::new("UTI").unwrap());
/// doc.root_mut().set("Cost", FieldValue::Dword(12)).unwrap();
///
/// let property = doc.add_struct(0);
/// doc[property].set("PropertyName", FieldValue::Word(6)).unwrap();
/// doc.root_mut().set("PropertiesList", vec![property]).unwrap();
///
/// assert_eq!(doc.root().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// File type, such as `"UTC "` or `"IFO "`
    pub file_type: Tag,

    /// Format version, `"V3.2"`
    pub file_version: Tag,

    structs: Vec<Struct>,
}

impl Document {
    /// A document holding an empty, untyped root
    pub fn new(file_type: Tag) -> Self {
        Self {
            file_type,
            file_version: Tag::from_static(&GFF_VERSION),
            structs: vec![Struct::default()],
        }
    }

    pub(crate) fn from_parts(file_type: Tag, file_version: Tag, structs: Vec<Struct>) -> Self {
        Self {
            file_type,
            file_version,
            structs,
        }
    }

    /// The root struct
    pub fn root(&self) -> &Struct {
        &self[StructId::ROOT]
    }

    /// The root struct, mutably
    pub fn root_mut(&mut self) -> &mut Struct {
        &mut self[StructId::ROOT]
    }

    /// A struct by id
    pub fn get(&self, id: StructId) -> Option<&Struct> {
        self.structs.get(id.index())
    }

    /// A struct by id, mutably
    pub fn get_mut(&mut self, id: StructId) -> Option<&mut Struct> {
        self.structs.get_mut(id.index())
    }

    /// Allocate a new empty struct
    ///
    /// The struct is part of the file only once a struct or list field refers to it.
    pub fn add_struct(&mut self, tag: u32) -> StructId {
        let id = StructId(self.structs.len() as u32);
        self.structs.push(Struct::new(tag));
        id
    }

    /// Number of structs in the arena, unreferenced ones included
    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    /// Every struct in the arena with its id
    pub fn structs(&self) -> impl Iterator<Item = (StructId, &Struct)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(i, s)| (StructId(i as u32), s))
    }

    fn child_ids(&self, id: StructId) -> Result<Vec<StructId>> {
        let node = self.get(id).ok_or(Error::InvalidStructIndex(id.0))?;
        Ok(node.children().collect())
    }

    /// Check that every struct reachable from `starts` exists and none is its own ancestor
    pub(crate) fn check_acyclic_from(
        &self,
        starts: impl IntoIterator<Item = StructId>,
    ) -> Result<()> {
        let mut marks = vec![Mark::New; self.structs.len()];
        let mut stack: Vec<(StructId, std::vec::IntoIter<StructId>)> = Vec::new();

        for start in starts {
            match marks.get(start.index()).copied() {
                None => return Err(Error::InvalidStructIndex(start.0)),
                Some(Mark::New) => {}
                Some(_) => continue,
            }

            marks[start.index()] = Mark::Active;
            stack.push((start, self.child_ids(start)?.into_iter()));

            while let Some((id, children)) = stack.last_mut() {
                let id = *id;
                match children.next() {
                    Some(child) => match marks.get(child.index()).copied() {
                        None => return Err(Error::InvalidStructIndex(child.0)),
                        Some(Mark::Active) => return Err(Error::CyclicStructure(child.0)),
                        Some(Mark::Done) => {}
                        Some(Mark::New) => {
                            marks[child.index()] = Mark::Active;
                            stack.push((child, self.child_ids(child)?.into_iter()));
                        }
                    },
                    None => {
                        marks[id.index()] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }

        Ok(())
    }

    /// Check that the structs reachable from the root form a tree or a DAG
    ///
    /// Fails on references to structs outside the arena and on cycles.
    pub fn check_acyclic(&self) -> Result<()> {
        if self.structs.is_empty() {
            return Err(Error::MissingRoot);
        }
        self.check_acyclic_from([StructId::ROOT])
    }

    /// Structs reachable from the root in pre-order, each listed once
    ///
    /// The document must be acyclic.
    pub(crate) fn preorder(&self) -> Result<Vec<StructId>> {
        let mut seen = vec![false; self.structs.len()];
        let mut order = Vec::new();
        let mut stack = vec![StructId::ROOT];

        while let Some(id) = stack.pop() {
            let node = self.get(id).ok_or(Error::InvalidStructIndex(id.0))?;
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            order.push(id);

            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(order)
    }

    fn structurally_equal(&self, other: &Document) -> bool {
        let (Some(_), Some(_)) = (self.get(StructId::ROOT), other.get(StructId::ROOT)) else {
            return self.structs.is_empty() && other.structs.is_empty();
        };

        let mut visited = HashSet::new();
        let mut pending = vec![(StructId::ROOT, StructId::ROOT)];

        while let Some((a, b)) = pending.pop() {
            if !visited.insert((a, b)) {
                continue;
            }

            let (Some(left), Some(right)) = (self.get(a), other.get(b)) else {
                return false;
            };
            if left.tag != right.tag || left.len() != right.len() {
                return false;
            }

            for (label, value) in left.iter() {
                let Some(theirs) = right.get(label.as_str()) else {
                    return false;
                };

                match (value, theirs) {
                    (FieldValue::Struct(x), FieldValue::Struct(y)) => pending.push((*x, *y)),
                    (FieldValue::List(xs), FieldValue::List(ys)) => {
                        if xs.len() != ys.len() {
                            return false;
                        }
                        pending.extend(xs.iter().copied().zip(ys.iter().copied()));
                    }
                    (FieldValue::Struct(_) | FieldValue::List(_), _)
                    | (_, FieldValue::Struct(_) | FieldValue::List(_)) => return false,
                    (x, y) if x != y => return false,
                    _ => {}
                }
            }
        }

        true
    }
}

/// Documents are equal when their headers match and the trees hanging off their roots have the same
/// labels, values and nesting, whatever the struct ids
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.file_type == other.file_type
            && self.file_version == other.file_version
            && self.structurally_equal(other)
    }
}

impl Index<StructId> for Document {
    type Output = Struct;

    fn index(&self, id: StructId) -> &Struct {
        &self.structs[id.index()]
    }
}

impl IndexMut<StructId> for Document {
    fn index_mut(&mut self, id: StructId) -> &mut Struct {
        &mut self.structs[id.index()]
    }
}
