//! In-memory archive of named resources.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use nw_resource::{ResourceId, Tag};

use crate::date::BuildDate;
use crate::types::ErfVersion;

/// A single resource stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name and type of the resource
    pub id: ResourceId,

    /// Raw payload, stored as is
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Pair an id with its payload
    pub fn new(id: ResourceId, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }

    /// Size of the payload in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// ERF archive held in memory
///
/// Entries are keyed by [`ResourceId`], whose name compares case-insensitively: adding
/// `"Foo.uti"` after `"foo.uti"` replaces the first entry.
///
/// ```
/// # fn doit() -> nw_erf::error::Result<()> {
/// use nw_erf::{Archive, ArchiveEntry};
/// use nw_resource::ResourceId;
///
/// let mut archive = Archive::default();
/// archive.add(ArchiveEntry::new(ResourceId::new("item001", 2017)?, b"data".to_vec()));
///
/// assert!(archive.contains(&ResourceId::new("ITEM001", 2017)?));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// `"ERF "`, `"MOD "`, `"HAK "`, `"SAV "` or `"NWM "`
    pub file_type: Tag,

    /// Header layout, which decides the size of the reserved block
    pub version: ErfVersion,

    entries: IndexMap<ResourceId, ArchiveEntry>,

    /// Description text per language id
    pub localized_description: BTreeMap<u32, String>,

    /// Talk table reference of the description
    pub description_str_ref: u32,

    /// Build date read from the header, `None` for archives built in memory
    pub build_date: Option<BuildDate>,
}

impl Archive {
    /// An empty archive with no description and no build date
    pub fn new(file_type: Tag, version: ErfVersion) -> Self {
        Self {
            file_type,
            version,
            entries: IndexMap::new(),
            localized_description: BTreeMap::new(),
            description_str_ref: 0,
            build_date: None,
        }
    }

    /// Add an entry, returning the one it replaced
    ///
    /// A replaced entry keeps its position in the iteration order.
    pub fn add(&mut self, entry: ArchiveEntry) -> Option<ArchiveEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// The entry stored under `id`, ignoring the case of its name
    pub fn get(&self, id: &ResourceId) -> Option<&ArchiveEntry> {
        self.entries.get(id)
    }

    /// Mutable access to the entry stored under `id`
    pub fn get_mut(&mut self, id: &ResourceId) -> Option<&mut ArchiveEntry> {
        self.entries.get_mut(id)
    }

    /// Remove an entry, returning whether it was present
    pub fn remove(&mut self, id: &ResourceId) -> bool {
        self.entries.shift_remove(id).is_some()
    }

    /// Whether an entry is stored under `id`
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in insertion order
    ///
    /// The encoder sorts them, so this is not the order they take on disk.
    pub fn list(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Same as [`Archive::list`]
    pub fn iter(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.list()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.list().map(|entry| &entry.id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new(Tag::from_static(b"ERF "), ErfVersion::V1_0)
    }
}

impl Extend<ArchiveEntry> for Archive {
    fn extend<T: IntoIterator<Item = ArchiveEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.add(entry);
        }
    }
}

#[cfg(test)]
mod test {
    use nw_resource::ResourceId;
    use pretty_assertions::assert_eq;

    use crate::archive::{Archive, ArchiveEntry};

    fn id(name: &str, res_type: u16) -> ResourceId {
        ResourceId::new(name, res_type).unwrap()
    }

    #[test]
    fn add_replaces_in_place() {
        let mut archive = Archive::default();
        archive.add(ArchiveEntry::new(id("a", 1), vec![1]));
        archive.add(ArchiveEntry::new(id("b", 1), vec![2]));

        let replaced = archive.add(ArchiveEntry::new(id("A", 1), vec![3]));

        assert_eq!(replaced.map(|e| e.data), Some(vec![1]));
        assert_eq!(archive.len(), 2);

        let order: Vec<_> = archive.iter().map(|e| e.data[0]).collect();
        assert_eq!(order, vec![3, 2]);
    }

    #[test]
    fn same_name_different_type() {
        let mut archive = Archive::default();
        archive.add(ArchiveEntry::new(id("module", 2014), vec![]));
        archive.add(ArchiveEntry::new(id("module", 2012), vec![]));

        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn remove() {
        let mut archive = Archive::default();
        archive.add(ArchiveEntry::new(id("a", 1), vec![]));
        archive.add(ArchiveEntry::new(id("b", 1), vec![]));
        archive.add(ArchiveEntry::new(id("c", 1), vec![]));

        assert!(archive.remove(&id("B", 1)));
        assert!(!archive.remove(&id("b", 1)));

        let names: Vec<_> = archive.ids().map(|id| id.resref.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn list_yields_entries_in_insertion_order() {
        let mut archive = Archive::default();
        archive.add(ArchiveEntry::new(id("zeta", 1), vec![1]));
        archive.add(ArchiveEntry::new(id("alpha", 1), vec![2, 2]));

        let listed: Vec<_> = archive
            .list()
            .map(|e| (e.id.resref.as_str(), e.size()))
            .collect();
        assert_eq!(listed, vec![("zeta", 1), ("alpha", 2)]);
    }

    #[test]
    fn get_mut_edits_payload() {
        let mut archive = Archive::default();
        archive.add(ArchiveEntry::new(id("a", 1), vec![]));

        if let Some(entry) = archive.get_mut(&id("a", 1)) {
            entry.data.extend_from_slice(b"xyz");
        }

        assert_eq!(archive.get(&id("a", 1)).map(ArchiveEntry::size), Some(3));
    }
}
