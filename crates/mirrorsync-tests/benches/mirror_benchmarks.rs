//! Benchmarks for counting and mirroring trees
//!
//! Measures the counting pass, a first mirror into an empty destination and
//! a no-op rerun where every file is compared but none is copied.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mirrorsync_engine::{count_files, files_identical, MirrorEngine, NoProgress, SyncRequest};
use mirrorsync_tests::test_utils::{generate_test_data, write_file, MirrorFixture};
use std::fs;
use std::hint::black_box;
use std::time::Duration;

/// Populate the fixture source with `files` files of `size` bytes
fn populate(fixture: &MirrorFixture, files: usize, size: usize) {
    let data = generate_test_data(size);
    for i in 0..files {
        write_file(
            &fixture.source,
            &format!("dir{}/sub{}/file{}.dat", i % 8, i % 3, i),
            &data,
        );
    }
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_files");

    for files in [100, 1000] {
        let fixture = MirrorFixture::new();
        populate(&fixture, files, 16);

        group.throughput(Throughput::Elements(files as u64));
        group.bench_with_input(BenchmarkId::from_parameter(files), &fixture, |b, fixture| {
            b.iter(|| black_box(count_files(&fixture.source)));
        });
    }

    group.finish();
}

fn bench_mirror(c: &mut Criterion) {
    let mut group = c.benchmark_group("mirror");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("100x4KB", 100, 4 * 1024), ("10x1MB", 10, 1024 * 1024)];

    for (name, files, size) in cases {
        let fixture = MirrorFixture::new();
        populate(&fixture, files, size);
        group.throughput(Throughput::Bytes((files * size) as u64));

        group.bench_function(BenchmarkId::new("initial", name), |b| {
            b.iter(|| {
                let _ = fs::remove_dir_all(&fixture.destination);
                let request = SyncRequest::new(&fixture.source, &fixture.destination);
                black_box(MirrorEngine::new().sync(&request, &mut NoProgress).unwrap())
            });
        });

        let request = SyncRequest::new(&fixture.source, &fixture.destination);
        MirrorEngine::new().sync(&request, &mut NoProgress).unwrap();

        group.bench_function(BenchmarkId::new("unchanged", name), |b| {
            b.iter(|| black_box(MirrorEngine::new().sync(&request, &mut NoProgress).unwrap()));
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("files_identical");
    let fixture = MirrorFixture::new();
    let size = 8 * 1024 * 1024;
    let data = generate_test_data(size);
    let left = write_file(&fixture.source, "left.dat", &data);
    let right = write_file(&fixture.source, "right.dat", &data);

    group.throughput(Throughput::Bytes(size as u64));
    for buffer in [4 * 1024, 64 * 1024, 1024 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(buffer), &buffer, |b, &buffer| {
            b.iter(|| black_box(files_identical(&left, &right, buffer).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_count, bench_mirror, bench_compare);
criterion_main!(benches);
