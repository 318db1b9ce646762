//! Property tests: archive contents survive encoding, whatever the insertion order.

use nw_erf::date::BuildDate;
use nw_erf::write::ErfWriterOptions;
use nw_erf::{decode_erf, encode_erf_with, Archive, ArchiveEntry};
use nw_resource::ResourceId;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

fn frozen() -> ErfWriterOptions {
    ErfWriterOptions::builder()
        .build_date(BuildDate::new(126, 100))
        .build()
}

/// Entries with distinct lower-case names, in a random order
fn entries() -> impl Strategy<Value = Vec<ArchiveEntry>> {
    btree_map(
        ("[a-z0-9_]{1,16}", any::<u16>()),
        vec(any::<u8>(), 0..64),
        0..24,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|((name, res_type), data)| {
                ArchiveEntry::new(ResourceId::new(name, res_type).unwrap(), data)
            })
            .collect::<Vec<_>>()
    })
    .prop_shuffle()
}

fn archive(entries: &[ArchiveEntry]) -> Archive {
    let mut archive = Archive::default();
    archive.localized_description.insert(0, "Generated".to_owned());
    archive.extend(entries.iter().cloned());
    archive
}

fn sorted(archive: &Archive) -> Vec<ArchiveEntry> {
    let mut entries: Vec<_> = archive.list().cloned().collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_inverts_encode(entries in entries()) {
        let archive = archive(&entries);

        let decoded = decode_erf(&encode_erf_with(&archive, frozen()).unwrap()).unwrap();

        prop_assert_eq!(decoded.len(), entries.len());
        prop_assert_eq!(&decoded.localized_description, &archive.localized_description);
        prop_assert_eq!(sorted(&decoded), sorted(&archive));
    }

    #[test]
    fn insertion_order_is_irrelevant(entries in entries()) {
        let mut reversed = entries.clone();
        reversed.reverse();

        let forward = encode_erf_with(&archive(&entries), frozen()).unwrap();
        let backward = encode_erf_with(&archive(&reversed), frozen()).unwrap();

        prop_assert_eq!(forward, backward);
    }
}
