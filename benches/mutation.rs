use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use arrow::array::{ArrayRef, FixedSizeListArray, Float32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use lasframe::prelude::*;

/// Format-1 dataset with `n` points and no user fields
fn create_dataset(n: usize) -> Dataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("z", DataType::Float64, false),
        Field::new("gps_time", DataType::Float64, false),
    ]));
    let values: ArrayRef = Arc::new(Float64Array::from_iter_values((0..n).map(|i| i as f64)));
    let points = RecordBatch::try_new(
        schema,
        vec![values.clone(), values.clone(), values.clone(), values],
    )
    .unwrap();
    let header = HeaderModel::new(Version::new(1, 2), PointFormat::new(1).unwrap())
        .unwrap()
        .with_point_count(n as u64);
    Dataset::new(header, points).unwrap()
}

fn normals(n: usize) -> ArrayRef {
    let item = Arc::new(Field::new("item", DataType::Float32, false));
    let values = Float32Array::from_iter_values((0..n * 3).map(|i| (i % 3) as f32));
    Arc::new(FixedSizeListArray::try_new(item, 3, Arc::new(values), None).unwrap())
}

fn bench_add_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_column");

    for n in [1_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        let dataset = create_dataset(n);
        let scalar: ArrayRef = Arc::new(Float64Array::from(vec![0.5; n]));
        let vector = normals(n);

        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, _| {
            b.iter(|| {
                let mut ds = dataset.clone();
                ds.add_column("reflectance", scalar.clone()).unwrap();
                black_box(ds.header().record_length())
            });
        });

        group.bench_with_input(BenchmarkId::new("vector3", n), &n, |b, _| {
            b.iter(|| {
                let mut ds = dataset.clone();
                ds.add_column("normal", vector.clone()).unwrap();
                black_box(ds.header().record_length())
            });
        });
    }

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");
    let dataset = create_dataset(10_000);

    for count in [1, 16, 128] {
        group.bench_with_input(BenchmarkId::new("add_remove", count), &count, |b, &count| {
            b.iter(|| {
                let mut ds = dataset.clone();
                let keys: Vec<_> = (0..count)
                    .map(|i| {
                        let payload = RecordPayload::Opaque(vec![0; 256]);
                        ds.add_record(MetadataRecord::new("bench", i as u16, "", payload)).unwrap()
                    })
                    .collect();
                for key in keys {
                    ds.remove_record(key).unwrap();
                }
                black_box(ds.header().payload_offset())
            });
        });
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut dataset = create_dataset(100_000);
    for name in ["a", "b", "c", "d"] {
        dataset.add_column(name, normals(100_000)).unwrap();
    }

    c.bench_function("reconcile_consistent", |b| {
        b.iter(|| {
            dataset.reconcile().unwrap();
            black_box(dataset.header().record_length())
        });
    });

    c.bench_function("check_invariants", |b| {
        b.iter(|| black_box(dataset.check_invariants().is_ok()));
    });
}

criterion_group!(benches, bench_add_column, bench_records, bench_reconcile);
criterion_main!(benches);
