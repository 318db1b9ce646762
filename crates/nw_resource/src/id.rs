//! Resource identifiers: a resref paired with its type code.

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;
use crate::resref::ResRef;
use crate::restype::{lookup_extension, lookup_type};

/// Identity of a resource inside a container: name plus type code
///
/// Two ids are equal when their type codes match and their names match ignoring ASCII case.
/// Ordering is by name first, then by type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    /// Name of the resource
    pub resref: ResRef,

    /// Numeric resource type, see [`crate::restype`]
    pub res_type: u16,
}

impl ResourceId {
    /// Create an id, validating the name
    pub fn new(name: impl Into<String>, res_type: u16) -> Result<Self> {
        Ok(ResourceId {
            resref: ResRef::new(name)?,
            res_type,
        })
    }

    /// Derive an id from a file name such as `nw_it_torch.uti`
    ///
    /// The part after the last `.` is mapped through the type registry, so the `res<code>` names
    /// [`ResourceId::filename`] gives unregistered types come back with their code. A name
    /// without an extension gets the registry default.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let (stem, extension) = filename.rsplit_once('.').unwrap_or((filename, ""));
        Self::new(stem, lookup_type(extension))
    }

    /// The extension registered for this id's type
    pub fn extension(&self) -> Cow<'static, str> {
        lookup_extension(self.res_type)
    }

    /// The file name this resource is stored under when extracted
    pub fn filename(&self) -> String {
        format!("{}.{}", self.resref, self.extension())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resref, self.extension())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::id::ResourceId;
    use crate::restype::DEFAULT_RES_TYPE;

    #[test]
    fn from_filename_maps_extension() {
        let id = ResourceId::from_filename("nw_it_torch.uti").unwrap();
        assert_eq!(id.resref.as_str(), "nw_it_torch");
        assert_eq!(id.res_type, 2021);
        assert_eq!(id.to_string(), "nw_it_torch.uti");
    }

    #[test]
    fn from_filename_without_extension() {
        let id = ResourceId::from_filename("readme").unwrap();
        assert_eq!(id.res_type, DEFAULT_RES_TYPE);
    }

    #[test]
    fn case_collisions_are_equal() {
        let a = ResourceId::from_filename("Foo.txt").unwrap();
        let b = ResourceId::from_filename("foo.TXT").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_types_differ() {
        let a = ResourceId::new("module", 2014).unwrap();
        let b = ResourceId::new("module", 2012).unwrap();
        assert_ne!(a, b);
        assert!(b < a);
    }

    #[test]
    fn unknown_type_display() {
        let id = ResourceId::new("blob", 4242).unwrap();
        assert_eq!(id.filename(), "blob.res4242");
    }

    #[test]
    fn unknown_type_survives_filename() {
        let id = ResourceId::new("blob", 4242).unwrap();
        let back = ResourceId::from_filename(&id.filename()).unwrap();
        assert_eq!(back.res_type, 4242);
        assert_eq!(back, id);
    }
}
