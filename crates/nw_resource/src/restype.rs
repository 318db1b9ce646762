//! Mapping between file extensions and the numeric resource type codes stored in archives.

use std::borrow::Cow;

/// Type code used for extensions the registry doesn't know: generic structured (GFF) data
pub const DEFAULT_RES_TYPE: u16 = 2037;

const RESOURCE_TYPES: &[(&str, u16)] = &[
    ("bmp", 1),
    ("tga", 3),
    ("wav", 4),
    ("plt", 6),
    ("ini", 7),
    ("txt", 10),
    ("mdl", 2002),
    ("nss", 2009),
    ("ncs", 2010),
    ("are", 2012),
    ("set", 2013),
    ("ifo", 2014),
    ("bic", 2015),
    ("wok", 2016),
    ("utc", 2017),
    ("utd", 2018),
    ("ute", 2019),
    ("utg", 2020),
    ("uti", 2021),
    ("utm", 2022),
    ("utp", 2023),
    ("uts", 2024),
    ("utt", 2025),
    ("utw", 2026),
    ("git", 2027),
    ("gic", 2028),
    ("dlg", 2029),
    ("itp", 2030),
    ("bak", 2031),
    ("dat", 2032),
    ("shd", 2033),
    ("xbc", 2034),
    ("wbm", 2035),
    ("mtr", 2036),
    ("gff", 2037),
    ("fac", 2038),
    ("ktx", 2040),
    ("ttf", 2041),
    ("sql", 2042),
    ("tml", 2043),
    ("sq3", 2044),
    ("lod", 2045),
    ("gif", 2046),
    ("png", 2047),
    ("jpg", 2048),
    ("caf", 2049),
    ("jui", 9996),
    ("gui", 9997),
    ("css", 9998),
    ("ccs", 9999),
    ("xml", 10000),
    ("htm", 10001),
    ("ltr", 10002),
    ("json", 10004),
];

fn registered_type(extension: &str) -> Option<u16> {
    RESOURCE_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, code)| *code)
}

/// Parses the `res<code>` form [`lookup_extension`] produces for unregistered codes
fn synthetic_type(extension: &str) -> Option<u16> {
    let prefix = extension.get(..3)?;
    let digits = &extension[3..];
    if !prefix.eq_ignore_ascii_case("res")
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// Type code for a file extension
///
/// The lookup ignores ASCII case and a leading `.`. A synthetic `res<code>` extension maps back to
/// its code. Anything else unknown maps to [`DEFAULT_RES_TYPE`].
pub fn lookup_type(extension: &str) -> u16 {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    registered_type(extension)
        .or_else(|| synthetic_type(extension))
        .unwrap_or(DEFAULT_RES_TYPE)
}

/// File extension for a type code, or a synthetic `res<code>` for unknown codes
pub fn lookup_extension(res_type: u16) -> Cow<'static, str> {
    RESOURCE_TYPES
        .iter()
        .find(|(_, code)| *code == res_type)
        .map(|(ext, _)| Cow::Borrowed(*ext))
        .unwrap_or_else(|| Cow::Owned(format!("res{res_type}")))
}

/// Whether [`lookup_type`] resolves the extension to a definite code instead of the default
pub fn is_known_extension(extension: &str) -> bool {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    registered_type(extension).is_some() || synthetic_type(extension).is_some()
}

/// Every registered `(extension, type code)` pair
pub fn known_types() -> impl Iterator<Item = (&'static str, u16)> {
    RESOURCE_TYPES.iter().copied()
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use crate::restype::{
        is_known_extension, known_types, lookup_extension, lookup_type, DEFAULT_RES_TYPE,
    };

    #[test]
    fn known_pairs() {
        assert_eq!(lookup_type("txt"), 10);
        assert_eq!(lookup_type("nss"), 2009);
        assert_eq!(lookup_type("ncs"), 2010);
        assert_eq!(lookup_type("gff"), 2037);

        assert_eq!(lookup_extension(10), "txt");
        assert_eq!(lookup_extension(2010), "ncs");
    }

    #[test]
    fn extension_lookup_is_forgiving() {
        assert_eq!(lookup_type(".UTI"), 2021);
        assert_eq!(lookup_type("Json"), 10004);
    }

    #[test]
    fn unknown_values_fall_back() {
        assert_eq!(lookup_type("zzz"), DEFAULT_RES_TYPE);
        assert_eq!(lookup_extension(4242), "res4242");
    }

    #[test]
    fn synthetic_extensions_map_back() {
        assert_eq!(lookup_type("res4242"), 4242);
        assert_eq!(lookup_type(".RES7"), 7);
        assert!(is_known_extension("res4242"));

        assert_eq!(lookup_type("res"), DEFAULT_RES_TYPE);
        assert_eq!(lookup_type("res99999"), DEFAULT_RES_TYPE);
        assert_eq!(lookup_type("res-1"), DEFAULT_RES_TYPE);
        assert!(!is_known_extension("resx"));
    }

    #[test]
    fn table_is_bijective() {
        let exts: HashSet<_> = known_types().map(|(e, _)| e).collect();
        let codes: HashSet<_> = known_types().map(|(_, c)| c).collect();
        assert_eq!(exts.len(), known_types().count());
        assert_eq!(codes.len(), known_types().count());

        for (ext, code) in known_types() {
            assert_eq!(lookup_type(ext), code);
            assert_eq!(lookup_extension(code), ext);
        }
    }
}
