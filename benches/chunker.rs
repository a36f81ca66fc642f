//! Splitter throughput over prose and separator-free text.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docingest::models::ProcessorConfig;
use docingest::services::TextSplitter;
use std::hint::black_box;

fn prose(chars: usize) -> String {
    let paragraph = "Retrieval pipelines split long documents into overlapping chunks. \
                     Each chunk is embedded separately and stored with its provenance.\n\n";
    paragraph.chars().cycle().take(chars).collect()
}

fn bench_split_text(c: &mut Criterion) {
    let splitter = TextSplitter::new(&ProcessorConfig {
        chunk_size: 1000,
        chunk_overlap: 200,
        ..Default::default()
    })
    .expect("valid splitter config");

    let mut group = c.benchmark_group("split_text");
    for size in &[10_000usize, 100_000, 1_000_000] {
        let text = prose(*size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("prose", size), &text, |b, text| {
            b.iter(|| splitter.split_text(black_box(text)));
        });
    }

    let unbroken: String = ('a'..='z').cycle().take(100_000).collect();
    group.throughput(Throughput::Bytes(unbroken.len() as u64));
    group.bench_function("char_fallback_100000", |b| {
        b.iter(|| splitter.split_text(black_box(&unbroken)));
    });
    group.finish();
}

criterion_group!(benches, bench_split_text);
criterion_main!(benches);
