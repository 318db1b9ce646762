//! Decoding ERF archives
//!

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use nw_resource::{ResRef, ResourceId, Tag};
use tracing::{debug, instrument, warn};

use crate::archive::{Archive, ArchiveEntry};
use crate::date::BuildDate;
use crate::error::{Error, Result};
use crate::types::{check_file_type, ErfHeader, ErfVersion, KeyEntry, ResourceEntry};

/// Slice `len` bytes at `offset`, or report how far past the end the region reaches
fn region<'a>(bytes: &'a [u8], section: &'static str, offset: u64, len: u64) -> Result<&'a [u8]> {
    let end = offset + len;
    if end > bytes.len() as u64 {
        return Err(Error::Truncated {
            section,
            needed: end,
            available: bytes.len() as u64,
        });
    }
    Ok(&bytes[offset as usize..end as usize])
}

fn check_tags(bytes: &[u8]) -> Result<(Tag, ErfVersion)> {
    let available = bytes.len() as u64;
    let truncated = |needed: u32| Error::Truncated {
        section: "header",
        needed: needed as u64,
        available,
    };

    let file_type: [u8; 4] = bytes
        .get(0..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| truncated(ErfHeader::SIZE))?;
    let file_type = Tag::from_bytes(file_type)
        .map_err(|_| Error::InvalidFileType(String::from_utf8_lossy(&file_type).into_owned()))
        .and_then(check_file_type)?;

    let version: [u8; 4] = bytes
        .get(4..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| truncated(ErfHeader::SIZE))?;
    let version = ErfVersion::from_bytes(version)?;

    if bytes.len() < version.header_size() as usize {
        return Err(truncated(version.header_size()));
    }

    Ok((file_type, version))
}

fn read_localized_strings(block: &[u8], count: u32) -> Result<BTreeMap<u32, String>> {
    let mut strings = BTreeMap::new();
    let mut offset = 0u64;

    for _ in 0..count {
        let head = region(block, "localized string", offset, 8)?;
        let language = LittleEndian::read_u32(&head[0..4]);
        let len = LittleEndian::read_u32(&head[4..8]) as u64;

        let text = region(block, "localized string", offset + 8, len)?;
        strings.insert(language, String::from_utf8_lossy(text).into_owned());

        offset += 8 + len;
    }

    Ok(strings)
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

/// Decode an ERF archive from memory
///
/// Nothing is returned unless the whole archive decodes: an unknown file type or version is a
/// format error, any region running past the end of `bytes` is a truncation error and an invalid
/// resource name is an encoding error.
#[instrument(skip_all, err, fields(len = bytes.len()))]
pub fn decode_erf(bytes: &[u8]) -> Result<Archive> {
    let (file_type, version) = check_tags(bytes)?;
    let header = ErfHeader::read_le(&mut Cursor::new(bytes))?;

    debug!(
        %file_type,
        %version,
        entries = header.entry_count,
        languages = header.language_count,
        "read header"
    );

    let strings = region(
        bytes,
        "localized strings",
        header.offset_to_localized_strings as u64,
        header.localized_string_size as u64,
    )?;
    let keys = region(
        bytes,
        "key list",
        header.offset_to_keys as u64,
        header.entry_count as u64 * KeyEntry::SIZE as u64,
    )?;
    let resources = region(
        bytes,
        "resource list",
        header.offset_to_resources as u64,
        header.entry_count as u64 * ResourceEntry::SIZE as u64,
    )?;

    let mut archive = Archive::new(file_type, version);
    archive.localized_description = read_localized_strings(strings, header.language_count)?;
    archive.description_str_ref = header.description_str_ref;
    archive.build_date = Some(BuildDate::new(header.build_year, header.build_day));

    let keys: Vec<KeyEntry> = read_records(keys, header.entry_count)?;
    let resources: Vec<ResourceEntry> = read_records(resources, header.entry_count)?;

    for (key, resource) in keys.iter().zip(&resources) {
        let id = ResourceId {
            resref: ResRef::from_slot(&key.resref)?,
            res_type: key.res_type,
        };
        let data = region(
            bytes,
            "resource data",
            resource.offset as u64,
            resource.size as u64,
        )?;

        if let Some(previous) = archive.add(ArchiveEntry::new(id, data)) {
            warn!(id = %previous.id, "duplicate resource, keeping the last one");
        }
    }

    Ok(archive)
}

impl Archive {
    /// Read a whole archive from `reader`
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode_erf(&bytes)
    }
}

#[cfg(test)]
mod test {
    use nw_resource::{ErrorKind, ResourceId};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::date::BuildDate;
    use crate::read::decode_erf;
    use crate::types::ErfVersion;

    /// A "MOD " archive with an english description and one "item001.uti" resource
    fn one_entry_file() -> Vec<u8> {
        let mut bytes = Vec::new();

        #[rustfmt::skip]
        bytes.extend_from_slice(&[
            0x4D, 0x4F, 0x44, 0x20, 0x56, 0x31, 0x2E, 0x30,
            0x01, 0x00, 0x00, 0x00,
            0x0D, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xAD, 0x00, 0x00, 0x00,
            0xC5, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00,
            0x2A, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,
        ]);
        bytes.resize(160, 0);

        #[rustfmt::skip]
        bytes.extend_from_slice(&[
            // localized strings
            0x00, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
            0x48, 0x65, 0x6C, 0x6C, 0x6F,
            // keys
            0x69, 0x74, 0x65, 0x6D, 0x30, 0x30, 0x31, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x00, 0x00,
            // resources
            0xCD, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            // data
            0x61, 0x62, 0x63,
        ]);

        bytes
    }

    #[test]
    fn one_entry() {
        let archive = decode_erf(&one_entry_file()).unwrap();

        assert_eq!(archive.file_type.as_str(), "MOD");
        assert_eq!(archive.version, ErfVersion::V1_0);
        assert_eq!(archive.build_date, Some(BuildDate::new(124, 42)));
        assert_eq!(archive.description_str_ref, u32::MAX);
        assert_eq!(
            archive.localized_description.get(&0).map(String::as_str),
            Some("Hello")
        );

        let id = ResourceId::new("item001", 2017).unwrap();
        assert_eq!(archive.get(&id).map(|e| e.data.as_slice()), Some(&b"abc"[..]));
    }

    #[test]
    fn invalid_file_type() {
        let mut bytes = one_entry_file();
        bytes[..4].copy_from_slice(b"XXXX");

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn invalid_version() {
        let mut bytes = one_entry_file();
        bytes[4..8].copy_from_slice(b"V1.1");

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn short_header() {
        let err = decode_erf(b"ERF V1.0\0\0\0\0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn payload_past_end() {
        let mut bytes = one_entry_file();
        bytes.pop();

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn localized_string_past_block() {
        let mut bytes = one_entry_file();
        // claim a 6 byte string inside the 13 byte block
        bytes[164] = 0x06;

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn non_ascii_name() {
        let mut bytes = one_entry_file();
        bytes[173] = 0xE9;

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn path_in_name() {
        let mut bytes = one_entry_file();
        bytes[173..183].copy_from_slice(b"../escaped");

        let err = decode_erf(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[traced_test]
    #[test]
    fn duplicate_keys_keep_last() {
        let mut bytes = Vec::new();

        #[rustfmt::skip]
        bytes.extend_from_slice(&[
            0x45, 0x52, 0x46, 0x20, 0x56, 0x31, 0x2E, 0x30,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xD0, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);
        bytes.resize(160, 0);

        #[rustfmt::skip]
        bytes.extend_from_slice(&[
            // keys: "item001" then "ITEM001", both uti
            0x69, 0x74, 0x65, 0x6D, 0x30, 0x30, 0x31, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x00, 0x00,
            0x49, 0x54, 0x45, 0x4D, 0x30, 0x30, 0x31, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x00, 0x00,
            // resources
            0xE0, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xE2, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            // data
            0x61, 0x62, 0x63,
        ]);

        let archive = decode_erf(&bytes).unwrap();
        let id = ResourceId::new("item001", 2017).unwrap();

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get(&id).map(|e| e.data.as_slice()), Some(&b"c"[..]));
        assert!(logs_contain("duplicate resource"));
    }
}
