//! Benchmarks for lineio.
//!
//! Run with:
//!     cargo bench

use std::io::Cursor;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use lineio::{BufferConfig, File};

/// Deterministic text with records of `line_len` bytes each.
fn make_lines(total: usize, line_len: usize) -> Vec<u8> {
    (0..total)
        .map(|i| {
            if i % line_len == line_len - 1 {
                b'\n'
            } else {
                b'a' + (i * 7 % 26) as u8
            }
        })
        .collect()
}

fn count_lines(data: &[u8], config: BufferConfig) -> usize {
    let mut file = File::from_stream(Cursor::new(data.to_vec()), None, config);
    let mut count = 0;
    file.for_each_line(|line| {
        black_box(line);
        count += 1;
    })
    .unwrap();
    count
}

fn bench_line_lengths(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_line");
    let size = 1024 * 1024; // 1 MB

    for line_len in [16, 80, 1024, 64 * 1024] {
        let data = make_lines(size, line_len);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(format!("lines_{}b", line_len), &data, |b, data| {
            b.iter(|| black_box(count_lines(black_box(data), BufferConfig::default())));
        });
    }

    group.finish();
}

fn bench_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("configs");
    let size = 1024 * 1024;
    // 4 KiB records: forces growth in the small config
    let data = make_lines(size, 4096);
    group.throughput(Throughput::Bytes(size as u64));

    // Grows from 64 bytes up to the record size
    group.bench_function("growing", |b| {
        let config = BufferConfig::new(64, 8 * 1024).unwrap();
        b.iter(|| black_box(count_lines(black_box(&data), config)));
    });

    // Never fits a record; every line is accumulated
    group.bench_function("accumulating", |b| {
        let config = BufferConfig::new(256, 256).unwrap();
        b.iter(|| black_box(count_lines(black_box(&data), config)));
    });

    // Default capacity
    group.bench_function("default", |b| {
        let config = BufferConfig::default();
        b.iter(|| black_box(count_lines(black_box(&data), config)));
    });

    group.finish();
}

fn bench_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("for_each_chunk");
    let size = 1024 * 1024;
    let data = make_lines(size, 80);
    group.throughput(Throughput::Bytes(size as u64));

    for chunk in [512, 8 * 1024] {
        group.bench_with_input(format!("chunk_{}", chunk), &data, |b, data| {
            b.iter(|| {
                let mut file =
                    File::from_stream(Cursor::new(data.clone()), None, BufferConfig::default());
                let mut total = 0;
                file.for_each_chunk(chunk, |bytes| total += bytes.len())
                    .unwrap();
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_line_lengths, bench_configs, bench_chunks);
criterion_main!(benches);
