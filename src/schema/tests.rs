use super::*;
use arrow::datatypes::{DataType, Field};
use std::sync::Arc;

#[test]
fn test_record_lengths_match_las_format() {
    let expected = [20u16, 28, 26, 34, 57, 63, 30, 36, 38, 59, 67];
    for (id, length) in expected.iter().enumerate() {
        let format = PointFormat::new(id as u8).unwrap();
        assert_eq!(format.record_length(), *length, "point format {}", id);
    }
}

#[test]
fn test_point_format_bounds() {
    assert!(PointFormat::new(10).is_some());
    assert!(PointFormat::new(11).is_none());
    assert_eq!(PointFormat::all().count(), 11);
}

#[test]
fn test_format_fields() {
    let f0 = PointFormat::new(0).unwrap();
    assert!(f0.contains(columns::X));
    assert!(f0.contains(columns::INTENSITY));
    assert!(!f0.contains(columns::GPS_TIME));
    assert!(!f0.contains(columns::ID));

    let f8 = PointFormat::new(8).unwrap();
    assert!(f8.contains(columns::NIR));
    assert!(f8.contains(columns::OVERLAP));
    assert_eq!(
        f8.field(columns::SCAN_ANGLE).unwrap().data_type,
        DataType::Int16
    );
    assert_eq!(
        f0.field(columns::SCAN_ANGLE).unwrap().data_type,
        DataType::Int8
    );
}

#[test]
fn test_format_id_for() {
    let cols = ["x", "y", "z", "intensity"];
    assert_eq!(format_id_for(cols), PointFormat::new(0));

    let cols = ["x", "y", "z", "gps_time", "reflectance"];
    assert_eq!(format_id_for(cols), PointFormat::new(1));

    let cols = ["x", "red", "gps_time"];
    assert_eq!(format_id_for(cols), PointFormat::new(3));

    // overlap exists only in 6+, waveform only in 4/5/9/10
    let cols = ["overlap", "wave_dx"];
    assert_eq!(format_id_for(cols), PointFormat::new(9));
}

#[test]
fn test_is_standard_field() {
    assert!(is_standard_field("nir"));
    assert!(is_standard_field("scanner_channel"));
    assert!(!is_standard_field("reflectance"));
    assert!(!is_standard_field(columns::ID));
}

#[test]
fn test_min_version() {
    assert_eq!(PointFormat::new(1).unwrap().min_version().minor, 0);
    assert_eq!(PointFormat::new(3).unwrap().min_version().minor, 2);
    assert_eq!(PointFormat::new(5).unwrap().min_version().minor, 3);
    assert_eq!(PointFormat::new(7).unwrap().min_version().minor, 4);
}

#[test]
fn test_element_kind_codes() {
    for code in 1..=10u8 {
        let kind = ElementKind::from_type_code(code).unwrap();
        assert_eq!(kind.type_code(), code);
    }
    assert!(ElementKind::from_type_code(0).is_none());
    assert!(ElementKind::from_type_code(11).is_none());
    assert_eq!(ElementKind::F64.byte_size(), 8);
    assert_eq!(ElementKind::I16.byte_size(), 2);

    assert_eq!(ElementKind::Bool.type_code(), 1);
    assert_eq!(ElementKind::Bool.byte_size(), 1);
    assert!(ElementKind::Bool.same_storage(ElementKind::U8));
    assert!(!ElementKind::Bool.same_storage(ElementKind::I8));
    assert_eq!(ElementKind::Bool.to_arrow(), DataType::Boolean);
}

#[test]
fn test_field_type_from_arrow() {
    assert_eq!(
        FieldType::from_arrow(&DataType::Float32),
        Some(FieldType::scalar(ElementKind::F32))
    );

    let normal = DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float64, false)), 3);
    let ft = FieldType::from_arrow(&normal).unwrap();
    assert_eq!(ft, FieldType::vector(ElementKind::F64, 3));
    assert_eq!(ft.byte_size(), 24);

    assert_eq!(
        FieldType::from_arrow(&DataType::Boolean),
        Some(FieldType::scalar(ElementKind::Bool))
    );
    let flags = DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Boolean, false)), 4);
    assert_eq!(FieldType::from_arrow(&flags).unwrap().byte_size(), 4);

    assert!(FieldType::from_arrow(&DataType::Utf8).is_none());
    let strings = DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Utf8, false)), 2);
    assert!(FieldType::from_arrow(&strings).is_none());
}

#[test]
fn test_split_field_names() {
    let names = split_field_names("normal", 3);
    assert_eq!(names, vec!["normal [0]", "normal [1]", "normal [2]"]);

    let scalar = FieldType::scalar(ElementKind::U8);
    assert_eq!(scalar.entry_names("flag"), vec!["flag"]);
}

#[test]
fn test_arrow_schema() {
    let schema = PointFormat::new(1).unwrap().arrow_schema();
    assert!(schema.field_with_name(columns::GPS_TIME).is_ok());
    assert_eq!(schema.fields().len(), 16);
}
