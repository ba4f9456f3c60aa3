//! Performance benchmarks for Lizeur
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lizeur::pdf::encode_pdf;
use lizeur::OcrRequest;
use std::io::Write;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

/// Write a synthetic PDF of roughly `size` bytes
fn synthetic_pdf(size: usize) -> tempfile::NamedTempFile {
    let mut data = b"%PDF-1.7\n".to_vec();
    data.extend((0..size).map(|i| (i % 251) as u8));
    data.extend_from_slice(b"\n%%EOF\n");

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(&data).expect("Failed to write temp file");
    file
}

/// Benchmark validation plus base64 encoding at several file sizes
fn bench_encode_pdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_pdf");

    let fixture = fixture_path("hello.pdf");
    group.bench_function("hello_fixture", |b| {
        b.iter(|| encode_pdf(black_box(&fixture)).unwrap());
    });

    for size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024] {
        let file = synthetic_pdf(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &file, |b, file| {
            b.iter(|| encode_pdf(black_box(file.path())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark building and serializing the OCR request body
fn bench_request_body(c: &mut Criterion) {
    let file = synthetic_pdf(1024 * 1024);
    let encoded = encode_pdf(file.path()).unwrap();

    let mut group = c.benchmark_group("ocr_request");
    group.throughput(Throughput::Bytes(encoded.as_str().len() as u64));
    group.bench_function("serialize_1mb", |b| {
        b.iter(|| {
            let request = OcrRequest::for_pdf(black_box(&encoded));
            serde_json::to_vec(&request).unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_encode_pdf, bench_request_body);
criterion_main!(benches);
