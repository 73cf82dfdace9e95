//! Latency benchmarks for the request path outside the forward pass
//!
//! Run with: cargo bench -p textclf-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use textclf_classifiers::tokenizer::{encode, load_tokenizer};
use textclf_classifiers::{argmax, ModelFamily};

const VOCAB: &str = "[PAD]\n[UNK]\n[CLS]\n[SEP]\nthe\nquick\nbrown\nfox\njumps\nover\nlazy\ndog";

/// Benchmark truncating encode at the default 512-token budget
fn benchmark_tokenization(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("vocab.txt"), VOCAB).expect("Failed to write vocab");
    let tokenizer =
        load_tokenizer(dir.path(), ModelFamily::Bert, 512).expect("Failed to build tokenizer");

    let sentence = "The quick brown fox jumps over the lazy dog. ";
    let test_cases = vec![
        ("short", sentence.to_string()),
        ("medium", sentence.repeat(10)),
        ("overlong", sentence.repeat(200)),
    ];

    let mut group = c.benchmark_group("Tokenization");
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("encode", name), &text, |b, text| {
            b.iter(|| encode(&tokenizer, black_box(text)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark argmax over typical label counts
fn benchmark_argmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("Argmax");

    for num_labels in [2usize, 6, 128] {
        let logits: Vec<f32> = (0..num_labels).map(|i| ((i * 7) % 11) as f32).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(num_labels),
            &logits,
            |b, logits| b.iter(|| argmax(black_box(logits))),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_tokenization, benchmark_argmax);
criterion_main!(benches);
