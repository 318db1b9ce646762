//! Encoding ERF archives
//!

use std::io::{Cursor, Write};

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, instrument};

use crate::archive::{Archive, ArchiveEntry};
use crate::date::BuildDate;
use crate::error::{Error, Result};
use crate::types::{check_file_type, ErfHeader, KeyEntry, ResourceEntry};

/// Options for how the ERF file should be written
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ErfWriterOptions {
    /// Date stored in the header, today when unset
    pub build_date: Option<BuildDate>,
}

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(what))
}

fn localized_strings(archive: &Archive) -> Result<Vec<u8>> {
    let mut block = Vec::new();
    for (language, text) in &archive.localized_description {
        block.write_u32::<LittleEndian>(*language)?;
        block.write_u32::<LittleEndian>(to_u32(text.len(), "localized string")?)?;
        block.write_all(text.as_bytes())?;
    }
    Ok(block)
}

/// Encode `archive` with the current date in the header
pub fn encode_erf(archive: &Archive) -> Result<Vec<u8>> {
    encode_erf_with(archive, ErfWriterOptions::default())
}

/// Encode `archive` into a fresh buffer
///
/// Entries are written sorted by lower-cased name, then type, so the output does not depend on
/// insertion order. With a fixed [`ErfWriterOptions::build_date`] the output is byte for byte
/// deterministic.
///
/// ```
/// # fn doit() -> nw_erf::error::Result<()> {
/// use nw_erf::date::BuildDate;
/// use nw_erf::write::ErfWriterOptions;
/// use nw_erf::{encode_erf_with, Archive};
///
/// let options = ErfWriterOptions::builder()
///     .build_date(BuildDate::new(124, 1))
///     .build();
///
/// let bytes = encode_erf_with(&Archive::default(), options)?;
/// assert_eq!(bytes.len(), 160);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[instrument(skip_all, err, fields(entries = archive.len()))]
pub fn encode_erf_with(archive: &Archive, options: ErfWriterOptions) -> Result<Vec<u8>> {
    let file_type = check_file_type(archive.file_type)?;
    let build_date = options.build_date.unwrap_or_else(BuildDate::now);

    let mut entries: Vec<&ArchiveEntry> = archive.iter().collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    let strings = localized_strings(archive)?;
    let entry_count = to_u32(entries.len(), "entry count")?;

    let header_size = archive.version.header_size();
    let offset_to_keys = header_size
        .checked_add(to_u32(strings.len(), "localized strings")?)
        .ok_or(Error::TooLarge("localized strings"))?;
    let offset_to_resources = entry_count
        .checked_mul(KeyEntry::SIZE)
        .and_then(|len| offset_to_keys.checked_add(len))
        .ok_or(Error::TooLarge("key list"))?;
    let data_start = entry_count
        .checked_mul(ResourceEntry::SIZE)
        .and_then(|len| offset_to_resources.checked_add(len))
        .ok_or(Error::TooLarge("resource list"))?;

    let header = ErfHeader {
        file_type: file_type.to_bytes(),
        version: archive.version.to_bytes(),
        language_count: to_u32(archive.localized_description.len(), "language count")?,
        localized_string_size: to_u32(strings.len(), "localized strings")?,
        entry_count,
        offset_to_localized_strings: header_size,
        offset_to_keys,
        offset_to_resources,
        build_year: build_date.years_since_1900,
        build_day: build_date.day_of_year,
        description_str_ref: archive.description_str_ref,
    };

    debug!(
        %file_type,
        version = %archive.version,
        entries = entry_count,
        "writing file"
    );

    let mut keys = Cursor::new(Vec::new());
    let mut resources = Cursor::new(Vec::new());
    let mut offset = data_start;

    for (index, entry) in entries.iter().enumerate() {
        let size = to_u32(entry.size(), "resource")?;

        KeyEntry {
            resref: entry.id.resref.to_slot(),
            res_id: index as u32,
            res_type: entry.id.res_type,
            unused: 0,
        }
        .write_le(&mut keys)?;

        ResourceEntry { offset, size }.write_le(&mut resources)?;

        offset = offset
            .checked_add(size)
            .ok_or(Error::TooLarge("resource data"))?;
    }

    let mut out = Cursor::new(Vec::with_capacity(offset as usize));
    header.write_le(&mut out)?;
    out.write_all(&vec![0u8; archive.version.reserved_len() as usize])?;
    out.write_all(&strings)?;
    out.write_all(keys.get_ref())?;
    out.write_all(resources.get_ref())?;
    for entry in &entries {
        out.write_all(&entry.data)?;
    }

    Ok(out.into_inner())
}

impl Archive {
    /// Encode the archive and write it to `writer`
    pub fn write<W: Write>(&self, mut writer: W, options: ErfWriterOptions) -> Result<()> {
        writer.write_all(&encode_erf_with(self, options)?)?;
        Ok(())
    }
}
