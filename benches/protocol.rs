//! Protocol Benchmark for BoltLink
//!
//! Measures the cost of encoding requests and decoding reply frames,
//! independent of any network.

use boltlink::protocol::{Command, Reply, ReplyParser};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Benchmark command encoding
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode_ping", |b| {
        b.iter(|| black_box(Command::new("PING").encode()));
    });

    group.bench_function("encode_set_small", |b| {
        b.iter(|| black_box(Command::new("SET").arg("key:1").arg("small_value").encode()));
    });

    group.bench_function("encode_set_large", |b| {
        let value = "x".repeat(64 * 1024); // 64KB value
        b.iter(|| {
            black_box(
                Command::new("SET")
                    .arg("key:1")
                    .arg(value.clone())
                    .encode(),
            )
        });
    });

    group.finish();
}

/// Benchmark reply decoding
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_status", |b| {
        let mut parser = ReplyParser::new();
        b.iter(|| black_box(parser.parse(b"+OK\r\n").unwrap()));
    });

    group.bench_function("parse_integer", |b| {
        let mut parser = ReplyParser::new();
        b.iter(|| black_box(parser.parse(b":1000\r\n").unwrap()));
    });

    group.bench_function("parse_bulk_small", |b| {
        let frame = Reply::bulk("small_value").serialize();
        let mut parser = ReplyParser::new();
        b.iter(|| black_box(parser.parse(&frame).unwrap()));
    });

    group.bench_function("parse_bulk_large", |b| {
        let frame = Reply::bulk("x".repeat(64 * 1024)).serialize(); // 64KB
        let mut parser = ReplyParser::new();
        b.iter(|| black_box(parser.parse(&frame).unwrap()));
    });

    group.bench_function("parse_multi_bulk_100", |b| {
        let elements = (0..100).map(|i| Reply::bulk(format!("value:{}", i))).collect();
        let frame = Reply::multi_bulk(elements).serialize();
        let mut parser = ReplyParser::new();
        b.iter(|| black_box(parser.parse(&frame).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_parse);
criterion_main!(benches);
