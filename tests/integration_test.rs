//! Integration tests for lasframe
//!
//! These tests drive the public API end to end: configuration, construction,
//! column and record edits, and the derived header layout.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, FixedSizeListArray, Float32Array, Float64Array, Int16Array, UInt16Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use lasframe::prelude::*;
use lasframe::schema::{EXTRA_BYTES_ENTRY_SIZE, ORDINARY_RECORD_HEADER_SIZE};
use tempfile::NamedTempFile;

fn xyz_table(n: usize, extra: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let coords: ArrayRef = Arc::new(Float64Array::from_iter_values((0..n).map(|i| i as f64)));
    let mut columns: Vec<(&str, ArrayRef)> = vec![
        ("x", coords.clone()),
        ("y", coords.clone()),
        ("z", coords),
    ];
    columns.extend(extra);

    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, a)| Field::new(*name, a.data_type().clone(), false))
        .collect();
    let arrays = columns.into_iter().map(|(_, a)| a).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn normals(n: usize) -> ArrayRef {
    let item = Arc::new(Field::new("item", DataType::Float32, false));
    let values = Float32Array::from_iter_values((0..n).flat_map(|_| [0.0f32, 0.0, 1.0]));
    Arc::new(FixedSizeListArray::try_new(item, 3, Arc::new(values), None).unwrap())
}

/// Configure, build and edit a dataset, checking the layout after each step
#[test]
fn test_configured_dataset_lifecycle() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[dataset]\nformat_version = \"1.2\"\npoint_format = 3\nunit_scale = [0.01, 0.01, 0.01]"
    )
    .unwrap();
    let config = DatasetConfig::from_file(file.path()).unwrap();

    let n = 50;
    let header = config.header().unwrap().with_point_count(n as u64);
    let rgb: ArrayRef = Arc::new(UInt16Array::from_iter_values((0..n).map(|i| i as u16)));
    let table = xyz_table(n, vec![("red", rgb.clone()), ("green", rgb.clone()), ("blue", rgb)]);

    let mut dataset = Dataset::new(header, table).unwrap();
    assert_eq!(dataset.header().record_length(), 34);
    assert_eq!(dataset.header().payload_offset(), 227);
    assert_eq!(dataset.unit_scale(), [0.01, 0.01, 0.01]);

    dataset.add_column("normal", normals(n)).unwrap();
    dataset
        .add_column("confidence", Arc::new(UInt8Array::from_iter_values((0..n).map(|i| i as u8))))
        .unwrap();
    let registry = dataset.extra_fields().unwrap();
    assert_eq!(registry.len(), 4);
    assert_eq!(dataset.header().record_length(), 34 + 12 + 1);
    assert_eq!(
        dataset.header().payload_offset(),
        227 + ORDINARY_RECORD_HEADER_SIZE + 4 * EXTRA_BYTES_ENTRY_SIZE
    );

    let wkt = MetadataRecord::new("LASF_Projection", 2112, "OGC WKT", RecordPayload::Text("LOCAL_CS[]".into()));
    dataset.add_record(wkt).unwrap();
    assert_eq!(dataset.header().ordinary_record_count(), 2);
    let expected_offset = 227 + 54 + 4 * 192 + 54 + 11;
    assert_eq!(dataset.header().payload_offset(), expected_offset);

    let trailer = dataset
        .add_record(MetadataRecord::extended("acme", 7, "waveform", RecordPayload::Opaque(vec![0; 1000])))
        .unwrap();
    let header = dataset.header();
    assert_eq!(header.version(), Version::new(1, 4));
    assert_eq!(header.payload_offset(), expected_offset - 227 + 375);
    assert_eq!(
        header.extended_section_offset(),
        header.payload_offset() + u64::from(header.record_length()) * n as u64
    );

    dataset.remove_record(trailer).unwrap();
    dataset.remove_column("normal").unwrap();
    dataset.remove_column("confidence").unwrap();
    let header = dataset.header();
    assert_eq!(header.record_length(), 34);
    assert_eq!(header.ordinary_record_count(), 1);
    assert_eq!(header.extended_section_offset(), 0);
    assert_eq!(header.payload_offset(), 375 + 54 + 11);
    dataset.check_invariants().unwrap();
}

/// A registry encoded by one dataset is understood by another
#[test]
fn test_registry_travels_as_opaque_bytes() {
    let n = 4;
    let mut source = Dataset::new(
        HeaderModel::new(Version::new(1, 4), PointFormat::new(6).unwrap())
            .unwrap()
            .with_point_count(n as u64),
        xyz_table(n, vec![]),
    )
    .unwrap();
    source.add_column("normal", normals(n)).unwrap();
    source
        .add_column("height", Arc::new(Int16Array::from(vec![1i16, -2, 3, -4])))
        .unwrap();

    let registry_key = source.find_record("LASF_Spec", 4).unwrap();
    let bytes = source.record(registry_key).unwrap().payload_bytes().unwrap();
    assert_eq!(bytes.len() as u64, 4 * EXTRA_BYTES_ENTRY_SIZE);

    let user = source.user_fields().unwrap();
    let extra: Vec<(&str, ArrayRef)> = vec![
        ("normal", user.column_by_name("normal").unwrap().clone()),
        ("height", user.column_by_name("height").unwrap().clone()),
    ];

    let copy = Dataset::builder(
        source.header().clone().with_record_counts(1, 0),
        xyz_table(n, extra),
    )
    .ordinary_records(vec![MetadataRecord::new("LASF_Spec", 4, "Extra Bytes", RecordPayload::Opaque(bytes))])
    .build()
    .unwrap();

    assert_eq!(copy.extra_fields(), source.extra_fields());
    assert_eq!(copy.header().record_length(), source.header().record_length());
    assert_eq!(copy, source);
}

/// Mutations that fail leave no trace
#[test]
fn test_failed_mutations_are_atomic() {
    let n = 3;
    let mut dataset = Dataset::new(
        HeaderModel::new(Version::new(1, 2), PointFormat::new(1).unwrap())
            .unwrap()
            .with_point_count(n as u64),
        xyz_table(n, vec![]),
    )
    .unwrap();
    dataset.add_column("reflectance", Arc::new(Float64Array::from(vec![0.1, 0.2, 0.3]))).unwrap();
    let snapshot = dataset.clone();

    let too_short: ArrayRef = Arc::new(Float64Array::from(vec![0.1]));
    assert!(matches!(
        dataset.add_column("other", too_short),
        Err(DatasetError::SizeMismatch { .. })
    ));
    assert!(matches!(
        dataset.add_record(MetadataRecord::extra_bytes(ExtraFieldsRegistry::new())),
        Err(DatasetError::DuplicateRegistrySingleton(_))
    ));
    assert!(matches!(
        dataset.add_record(MetadataRecord::new("LASF_Spec", 4, "Extra Bytes", RecordPayload::Opaque(vec![1, 2, 3]))),
        Err(DatasetError::RecordError(_))
    ));
    assert!(matches!(dataset.remove_column("nothing"), Err(DatasetError::NotFound(_))));

    assert_eq!(dataset, snapshot);
    assert_eq!(dataset.header(), snapshot.header());
    dataset.check_invariants().unwrap();
}

/// Standard columns are only written through merge_column
#[test]
fn test_standard_columns_merge_without_layout_change() {
    let n = 2;
    let mut dataset = Dataset::new(
        HeaderModel::new(Version::new(1, 4), PointFormat::new(6).unwrap())
            .unwrap()
            .with_point_count(n as u64),
        xyz_table(n, vec![]),
    )
    .unwrap();
    let header = dataset.header().clone();

    dataset
        .merge_column("gps_time", Arc::new(Float64Array::from(vec![10.5, 11.5])))
        .unwrap();
    dataset
        .merge_column("scanner_channel", Arc::new(UInt16Array::from(vec![1u16, 2])))
        .unwrap();
    assert_eq!(dataset.header(), &header);
    assert!(dataset.user_fields().is_none());
    assert_eq!(dataset.column("gps_time").unwrap().len(), 2);

    assert!(matches!(
        dataset.add_column("gps_time", Arc::new(Float64Array::from(vec![0.0, 0.0]))),
        Err(DatasetError::SchemaMismatch(_))
    ));
}

#[test]
fn test_stats_serialize_to_json() {
    let n = 10;
    let mut dataset = Dataset::new(
        HeaderModel::new(Version::new(1, 2), PointFormat::new(0).unwrap())
            .unwrap()
            .with_point_count(n as u64),
        xyz_table(n, vec![]),
    )
    .unwrap();
    dataset.add_column("normal", normals(n)).unwrap();

    let json = serde_json::to_value(dataset.stats()).unwrap();
    assert_eq!(json["point_count"], 10);
    assert_eq!(json["record_length"], 32);
    assert_eq!(json["extra_field_entries"], 3);
    assert_eq!(json["payload_bytes"], 320);

    let header = serde_json::to_value(dataset.header()).unwrap();
    assert_eq!(header["payload_offset"], 227 + 54 + 3 * 192);
}
