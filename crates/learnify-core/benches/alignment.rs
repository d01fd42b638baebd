//! Benchmarks for transcript alignment recompute.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use learnify_core::aligner::WordAligner;

fn bench_apply_transcript(c: &mut Criterion) {
    let sentence = "The quick brown fox jumps over the lazy dog near the quiet pond today";
    let transcript = "the quick brown fox jumped over the lazy dog near a quiet pond";

    c.bench_function("apply_full_transcript", |b| {
        let mut aligner = WordAligner::new(sentence);
        b.iter(|| black_box(aligner.apply_transcript(black_box(transcript))))
    });

    c.bench_function("apply_growing_transcript", |b| {
        let words: Vec<&str> = transcript.split_whitespace().collect();
        b.iter(|| {
            let mut aligner = WordAligner::new(sentence);
            for end in 1..=words.len() {
                let partial = words[..end].join(" ");
                black_box(aligner.apply_transcript(&partial));
            }
        })
    });
}

criterion_group!(benches, bench_apply_transcript);
criterion_main!(benches);
