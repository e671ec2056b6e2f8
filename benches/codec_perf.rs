use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use vellum_cbor::{EncodeOptions, Fills, Gap, Value, decode, encode, encode_with, tags};

/// A representative query-result row: record id, strings, numbers, a blob.
fn record() -> Value {
    let mut row = indexmap::IndexMap::new();
    row.insert("id".to_owned(), tags::record_id("user", Value::from("alice")));
    row.insert("name".to_owned(), Value::from("Alice Liddell"));
    row.insert("age".to_owned(), Value::from(30i64));
    row.insert("balance".to_owned(), Value::Float(1024.75));
    row.insert("created".to_owned(), tags::datetime(1700000000, 123456789));
    row.insert(
        "roles".to_owned(),
        Value::Array(vec![Value::from("admin"), Value::from("editor")]),
    );
    row.insert("avatar".to_owned(), Value::Bytes(vec![0x5a; 256]));
    Value::Object(row)
}

fn bench_encode(c: &mut Criterion) {
    let value = record();
    c.bench_function("encode_record", |b| {
        b.iter(|| encode(black_box(&value)).unwrap())
    });

    let blob = Value::Bytes(vec![0x5a; 65536]);
    c.bench_function("encode_64k_bytes", |b| {
        b.iter(|| encode(black_box(&blob)).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&record()).unwrap();
    c.bench_function("decode_record", |b| {
        b.iter(|| decode(black_box(&bytes)).unwrap())
    });
}

/// Template re-finalization versus a full encode per invocation: the point
/// of partial encoding is that `build` replays flat segments.
fn bench_template_build(c: &mut Criterion) {
    let limit = Gap::new();
    let query = Value::Array(vec![
        Value::from("SELECT * FROM user LIMIT $limit"),
        record(),
        Value::Gap(limit.clone()),
    ]);
    let opts = EncodeOptions {
        partial: true,
        ..Default::default()
    };
    let template = encode_with(&query, &opts).unwrap().into_partial().unwrap();

    let mut fills = Fills::new();
    fills.insert(limit, Value::from(100i64));
    c.bench_function("build_template", |b| {
        b.iter(|| template.build(black_box(&fills), true).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_template_build);
criterion_main!(benches);
