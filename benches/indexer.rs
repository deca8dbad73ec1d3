use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trie_indexer::{
    IndexBuilder, KeywordRecord, Segmenter, SegmenterConfig, TrieSnapshot, build_index,
    expand_query, load_index,
};

fn sample_keywords(count: usize) -> Vec<KeywordRecord> {
    let stems = [
        "apple", "application", "apply", "banana", "band", "bandwidth", "prefix", "preview",
        "search", "segment",
    ];
    (0..count)
        .map(|i| KeywordRecord::keyword(format!("{}{}", stems[i % stems.len()], i / stems.len())))
        .collect()
}

fn sample_texts() -> Vec<&'static str> {
    vec![
        "Prefix tries turn a handful of typed letters into every matching keyword.",
        "中华人民共和国的首都是北京，搜索引擎需要中文分词。",
        "すしが好きです。東京で食べました。",
        "Mixed input: 你好世界 and local-first search over a shared vocabulary.",
    ]
}

fn bench_index_build(c: &mut Criterion) {
    let keywords = sample_keywords(10_000);
    let mut group = c.benchmark_group("trie_build");

    for &count in &[1_000usize, 10_000usize] {
        let keywords = keywords[..count].to_vec();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::from_parameter(count), move |b| {
            b.iter_batched(
                || keywords.clone(),
                |keywords| black_box(build_index(keywords)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_prefix_search(c: &mut Criterion) {
    let index = load_index(build_index(sample_keywords(10_000))).expect("load bench index");
    let mut group = c.benchmark_group("trie_search");

    group.bench_function("prefix_unbounded", |b| {
        b.iter(|| black_box(index.prefix_search("app", None).len()))
    });
    group.bench_function("prefix_limit_10", |b| {
        b.iter(|| black_box(index.prefix_search("ban", Some(10)).len()))
    });
    group.bench_function("expand_query", |b| {
        b.iter(|| black_box(expand_query(&index, &["pre", "seg", "zzz"]).len()))
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let snapshot = build_index(sample_keywords(10_000));
    let bytes = snapshot.to_bytes().expect("serialize snapshot");

    let mut group = c.benchmark_group("trie_snapshot");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    let to_encode = snapshot.clone();
    group.bench_function("serialize_json", move |b| {
        b.iter(|| black_box(to_encode.to_bytes().expect("serialize snapshot").len()))
    });
    group.bench_function("decode_and_load", move |b| {
        b.iter(|| {
            let snapshot = TrieSnapshot::from_bytes(&bytes).expect("decode snapshot");
            black_box(load_index(snapshot).expect("load snapshot").len())
        })
    });

    group.finish();
}

fn bench_segmentation(c: &mut Criterion) {
    let segmenter = Segmenter::new(&SegmenterConfig::default());
    let texts = sample_texts();
    let mut group = c.benchmark_group("segmenter");

    group.bench_function("segment_mixed", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(segmenter.segment(text).expect("segment").len());
            }
        })
    });
    group.bench_function("insert_text", |b| {
        b.iter_batched(
            IndexBuilder::new,
            |mut builder| {
                for text in &texts {
                    builder.insert_text(&segmenter, text).expect("insert text");
                }
                black_box(builder.finish())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_index_build,
    bench_prefix_search,
    bench_snapshot,
    bench_segmentation
);
criterion_main!(benches);
