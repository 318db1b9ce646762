use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn sample_archive(entries: usize) -> nw_erf::Archive {
    use nw_erf::{Archive, ArchiveEntry};
    use nw_resource::ResourceId;

    let mut archive = Archive::default();
    for i in 0..entries {
        let id = ResourceId::new(format!("res_{i:06}"), 2017).unwrap();
        archive.add(ArchiveEntry::new(id, vec![i as u8; 256]));
    }
    archive
}

fn options() -> nw_erf::write::ErfWriterOptions {
    nw_erf::write::ErfWriterOptions::builder()
        .build_date(nw_erf::date::BuildDate::new(124, 1))
        .build()
}

pub mod encode {
    use divan::Bencher;

    #[divan::bench(args = [10, 1000])]
    fn encode(bencher: Bencher, entries: usize) {
        let archive = super::sample_archive(entries);
        bencher.bench_local(|| {
            divan::black_box(nw_erf::encode_erf_with(&archive, super::options()).unwrap());
        });
    }
}

pub mod decode {
    use divan::Bencher;

    #[divan::bench(args = [10, 1000])]
    fn decode(bencher: Bencher, entries: usize) {
        let bytes = nw_erf::encode_erf_with(&super::sample_archive(entries), super::options()).unwrap();
        bencher.bench_local(|| {
            divan::black_box(nw_erf::decode_erf(&bytes).unwrap());
        });
    }
}
