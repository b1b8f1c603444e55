//! Codec throughput benchmark.
//!
//! Measures encode/decode latency for plain and encrypted payloads
//! using Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use waypoint_codec::messages::MessageLocation;
use waypoint_codec::{Codec, Message, SecretBoxProvider};

fn location(i: i64) -> Message {
    MessageLocation::new(52.52, 13.405, 1_700_000_000 + i)
        .with_accuracy(10)
        .with_tracker_id("bn")
        .into()
}

fn codecs() -> [(&'static str, Codec); 2] {
    [
        ("plain", Codec::unencrypted()),
        ("secretbox", Codec::new(Arc::new(SecretBoxProvider::new("bench")))),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let message = location(0);
    let mut group = c.benchmark_group("encode");
    for (name, codec) in codecs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &message, |b, m| {
            b.iter(|| codec.encode(black_box(m)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode_batch(c: &mut Criterion) {
    let batch_sizes: &[i64] = &[1, 16, 256];

    let mut group = c.benchmark_group("decode_sequence");
    for (name, codec) in codecs() {
        for &size in batch_sizes {
            let batch: Vec<Message> = (0..size).map(location).collect();
            // Pre-build the wire payload
            let wire = if codec.is_encryption_enabled() {
                codec.encrypt_batch(&batch).unwrap()
            } else {
                serde_json::to_string(&batch).unwrap()
            };
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &wire,
                |b, w| b.iter(|| codec.decode_sequence(black_box(w)).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode_batch);
criterion_main!(benches);
