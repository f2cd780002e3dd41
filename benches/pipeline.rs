//! Streaming pipeline throughput over in-memory CSV input

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use csv_h3_processor::diagnostics::TracingDiagnostics;
use csv_h3_processor::h3::{H3IndexGenerator, IndexGenerator};
use csv_h3_processor::processor::reader::{ReaderOptions, RecordReader};
use csv_h3_processor::processor::streaming::StreamingProcessor;
use csv_h3_processor::processor::writer::{RecordWriter, WriterOptions};
use csv_h3_processor::validator::GeographicBounds;
use std::hint::black_box;

/// Header plus `rows` records spread over the globe, every 50th one invalid
fn generate_csv(rows: usize) -> String {
    let mut content = String::from("id,name,latitude,longitude\n");
    for i in 0..rows {
        let latitude = if i % 50 == 0 {
            120.0
        } else {
            -80.0 + (i % 1600) as f64 * 0.1
        };
        let longitude = -179.0 + (i % 3580) as f64 * 0.1;
        content.push_str(&format!("{},site-{},{:.5},{:.5}\n", i, i, latitude, longitude));
    }
    content
}

fn reader_options() -> ReaderOptions {
    ReaderOptions {
        has_headers: true,
        delimiter: b',',
        latitude_column: "latitude".to_string(),
        longitude_column: "longitude".to_string(),
    }
}

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_to_memory");

    for rows in [1_000usize, 10_000] {
        let input = generate_csv(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let mut reader = RecordReader::from_reader(input.as_bytes(), &reader_options())
                    .expect("reader");
                let mut writer = RecordWriter::from_writer(
                    Vec::with_capacity(input.len() * 2),
                    reader.headers(),
                    &WriterOptions {
                        has_headers: true,
                        delimiter: b',',
                        overwrite: false,
                    },
                )
                .expect("writer");
                let mut processor = StreamingProcessor::new(
                    GeographicBounds,
                    H3IndexGenerator,
                    TracingDiagnostics::default(),
                    8,
                )
                .expect("processor");

                let tally = processor
                    .process_stream(&mut reader, |record| writer.write_record(record))
                    .expect("stream");
                black_box((tally, writer.finish().expect("finish")))
            });
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let generator = H3IndexGenerator;
    let mut group = c.benchmark_group("generate");

    for resolution in [0u8, 8, 15] {
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| generator.generate(black_box(40.7128), black_box(-74.0060), resolution))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_stream, bench_generate);
criterion_main!(benches);
