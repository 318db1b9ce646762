//! Field values and the kinds they are stored as.

use std::collections::BTreeMap;
use std::fmt;

use nw_resource::ResRef;

use crate::error::Error;
use crate::tree::StructId;

/// Storage kind of a field, as written in the field record
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum FieldKind {
    /// Unsigned 8 bit integer
    Byte = 0,
    /// Signed 8 bit integer
    Char = 1,
    /// Unsigned 16 bit integer
    Word = 2,
    /// Signed 16 bit integer
    Short = 3,
    /// Unsigned 32 bit integer
    Dword = 4,
    /// Signed 32 bit integer
    Int = 5,
    /// Unsigned 64 bit integer
    Dword64 = 6,
    /// Signed 64 bit integer
    Int64 = 7,
    /// 32 bit float
    Float = 8,
    /// 64 bit float
    Double = 9,
    /// Length prefixed string (`CExoString`)
    String = 10,
    /// Resource name
    ResRef = 11,
    /// Localized string (`CExoLocString`)
    LocString = 12,
    /// Opaque bytes
    Void = 13,
    /// Nested struct
    Struct = 14,
    /// Ordered list of structs
    List = 15,
}

impl FieldKind {
    /// Whether the value lives in the field data block rather than in the field record
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            FieldKind::Dword64
                | FieldKind::Int64
                | FieldKind::Double
                | FieldKind::String
                | FieldKind::ResRef
                | FieldKind::LocString
                | FieldKind::Void
        )
    }

    /// Name used in listings and the JSON view
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Byte => "byte",
            FieldKind::Char => "char",
            FieldKind::Word => "word",
            FieldKind::Short => "short",
            FieldKind::Dword => "dword",
            FieldKind::Int => "int",
            FieldKind::Dword64 => "dword64",
            FieldKind::Int64 => "int64",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "cexostring",
            FieldKind::ResRef => "resref",
            FieldKind::LocString => "cexolocstring",
            FieldKind::Void => "void",
            FieldKind::Struct => "struct",
            FieldKind::List => "list",
        }
    }
}

impl FieldKind {
    /// The kind whose [`FieldKind::name`] is `name`
    pub fn from_name(name: &str) -> Option<FieldKind> {
        (0..16)
            .filter_map(|code| FieldKind::try_from(code).ok())
            .find(|kind| kind.name() == name)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for FieldKind {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => FieldKind::Byte,
            1 => FieldKind::Char,
            2 => FieldKind::Word,
            3 => FieldKind::Short,
            4 => FieldKind::Dword,
            5 => FieldKind::Int,
            6 => FieldKind::Dword64,
            7 => FieldKind::Int64,
            8 => FieldKind::Float,
            9 => FieldKind::Double,
            10 => FieldKind::String,
            11 => FieldKind::ResRef,
            12 => FieldKind::LocString,
            13 => FieldKind::Void,
            14 => FieldKind::Struct,
            15 => FieldKind::List,
            other => return Err(Error::UnknownFieldKind(other)),
        })
    }
}

/// A string with one translation per language
///
/// `str_ref` points into the game's talk table; [`LocString::NO_STR_REF`] means none. The
/// translations are keyed by language id, which keeps equality independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocString {
    /// Talk table reference
    pub str_ref: u32,

    /// Language id to text
    pub strings: BTreeMap<u32, String>,
}

impl LocString {
    /// Marker for a string without a talk table reference
    pub const NO_STR_REF: u32 = u32::MAX;

    /// An empty string without a talk table reference
    pub fn new() -> Self {
        Self {
            str_ref: Self::NO_STR_REF,
            strings: BTreeMap::new(),
        }
    }

    /// An empty string pointing into the talk table
    pub fn with_str_ref(str_ref: u32) -> Self {
        Self {
            str_ref,
            strings: BTreeMap::new(),
        }
    }

    /// Set the text for a language, returning the previous text
    pub fn insert(&mut self, language: u32, text: impl Into<String>) -> Option<String> {
        self.strings.insert(language, text.into())
    }

    /// Text for a language
    pub fn get(&self, language: u32) -> Option<&str> {
        self.strings.get(&language).map(String::as_str)
    }

    /// Translations in language order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of translations
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether there are no translations
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for LocString {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for LocString {
    fn from_iter<T: IntoIterator<Item = (u32, S)>>(iter: T) -> Self {
        Self {
            str_ref: Self::NO_STR_REF,
            strings: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

/// Value of a single field
///
/// The variant decides the storage width, there is no implicit conversion between them. Use
/// [`FieldValue::from_integer`] to pick the narrowest integer kind for a number.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Unsigned 8 bit integer
    Byte(u8),
    /// Signed 8 bit integer
    Char(i8),
    /// Unsigned 16 bit integer
    Word(u16),
    /// Signed 16 bit integer
    Short(i16),
    /// Unsigned 32 bit integer
    Dword(u32),
    /// Signed 32 bit integer
    Int(i32),
    /// Unsigned 64 bit integer
    Dword64(u64),
    /// Signed 64 bit integer
    Int64(i64),
    /// 32 bit float
    Float(f32),
    /// 64 bit float
    Double(f64),
    /// Text
    String(String),
    /// Resource name
    ResRef(ResRef),
    /// Localized text
    LocString(LocString),
    /// Opaque bytes
    Void(Vec<u8>),
    /// Nested struct
    Struct(StructId),
    /// Ordered structs
    List(Vec<StructId>),
}

impl FieldValue {
    /// The kind this value is stored as
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Byte(_) => FieldKind::Byte,
            FieldValue::Char(_) => FieldKind::Char,
            FieldValue::Word(_) => FieldKind::Word,
            FieldValue::Short(_) => FieldKind::Short,
            FieldValue::Dword(_) => FieldKind::Dword,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Dword64(_) => FieldKind::Dword64,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Double(_) => FieldKind::Double,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::ResRef(_) => FieldKind::ResRef,
            FieldValue::LocString(_) => FieldKind::LocString,
            FieldValue::Void(_) => FieldKind::Void,
            FieldValue::Struct(_) => FieldKind::Struct,
            FieldValue::List(_) => FieldKind::List,
        }
    }

    /// The narrowest integer kind able to hold `value`
    ///
    /// Kinds are tried in the order `Char`, `Byte`, `Short`, `Word`, `Int`, `Dword`, `Int64`, so
    /// signed kinds win whenever both would fit.
    pub fn from_integer(value: i64) -> FieldValue {
        if let Ok(v) = i8::try_from(value) {
            FieldValue::Char(v)
        } else if let Ok(v) = u8::try_from(value) {
            FieldValue::Byte(v)
        } else if let Ok(v) = i16::try_from(value) {
            FieldValue::Short(v)
        } else if let Ok(v) = u16::try_from(value) {
            FieldValue::Word(v)
        } else if let Ok(v) = i32::try_from(value) {
            FieldValue::Int(v)
        } else if let Ok(v) = u32::try_from(value) {
            FieldValue::Dword(v)
        } else {
            FieldValue::Int64(value)
        }
    }

    /// The value as a signed integer, for every integer kind that fits
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Byte(v) => Some(v.into()),
            FieldValue::Char(v) => Some(v.into()),
            FieldValue::Word(v) => Some(v.into()),
            FieldValue::Short(v) => Some(v.into()),
            FieldValue::Dword(v) => Some(v.into()),
            FieldValue::Int(v) => Some(v.into()),
            FieldValue::Dword64(v) => i64::try_from(v).ok(),
            FieldValue::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// The text of a `String` or `ResRef` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            FieldValue::ResRef(r) => Some(r.as_str()),
            _ => None,
        }
    }

    /// The struct a `Struct` value points at
    pub fn as_struct(&self) -> Option<StructId> {
        match self {
            FieldValue::Struct(id) => Some(*id),
            _ => None,
        }
    }

    /// The structs of a `List` value
    pub fn as_list(&self) -> Option<&[StructId]> {
        match self {
            FieldValue::List(ids) => Some(ids),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    u8 => Byte,
    i8 => Char,
    u16 => Word,
    i16 => Short,
    u32 => Dword,
    i32 => Int,
    u64 => Dword64,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    String => String,
    ResRef => ResRef,
    LocString => LocString,
    Vec<u8> => Void,
    StructId => Struct,
    Vec<StructId> => List,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::value::{FieldKind, FieldValue, LocString};

    #[test]
    fn kind_names_map_back() {
        for code in 0..16 {
            let kind = FieldKind::try_from(code).unwrap();
            assert_eq!(FieldKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FieldKind::from_name("CExoString"), None);
    }

    #[test]
    fn integer_inference_thresholds() {
        assert_eq!(FieldValue::from_integer(-128), FieldValue::Char(-128));
        assert_eq!(FieldValue::from_integer(127), FieldValue::Char(127));
        assert_eq!(FieldValue::from_integer(128), FieldValue::Byte(128));
        assert_eq!(FieldValue::from_integer(255), FieldValue::Byte(255));
        assert_eq!(FieldValue::from_integer(256), FieldValue::Short(256));
        assert_eq!(FieldValue::from_integer(-129), FieldValue::Short(-129));
        assert_eq!(FieldValue::from_integer(40_000), FieldValue::Word(40_000));
        assert_eq!(FieldValue::from_integer(-40_000), FieldValue::Int(-40_000));
        assert_eq!(FieldValue::from_integer(70_000), FieldValue::Int(70_000));
        assert_eq!(
            FieldValue::from_integer(3_000_000_000),
            FieldValue::Dword(3_000_000_000)
        );
        assert_eq!(
            FieldValue::from_integer(-3_000_000_000),
            FieldValue::Int64(-3_000_000_000)
        );
    }

    #[test]
    fn kind_codes() {
        for code in 0..16u32 {
            let kind = FieldKind::try_from(code).unwrap();
            assert_eq!(kind as u32, code);
        }
        assert!(FieldKind::try_from(16).is_err());
    }

    #[test]
    fn complex_kinds() {
        assert!(FieldKind::Double.is_complex());
        assert!(FieldKind::LocString.is_complex());
        assert!(!FieldKind::Float.is_complex());
        assert!(!FieldKind::Struct.is_complex());
        assert!(!FieldKind::List.is_complex());
    }

    #[test]
    fn locstring_equality_ignores_insertion_order() {
        let mut a = LocString::new();
        a.insert(1, "Bonjour");
        a.insert(0, "Hello");

        let b: LocString = [(0, "Hello"), (1, "Bonjour")].into_iter().collect();

        assert_eq!(a, b);
        assert_eq!(a.get(1), Some("Bonjour"));
        assert_eq!(a.str_ref, LocString::NO_STR_REF);
    }
}
