use super::*;

fn format(id: u8) -> PointFormat {
    PointFormat::new(id).unwrap()
}

#[test]
fn test_new_header_defaults() {
    let header = HeaderModel::new(Version::new(1, 2), format(0)).unwrap();
    assert_eq!(header.record_length(), 20);
    assert_eq!(header.payload_offset(), 227);
    assert_eq!(header.extended_section_offset(), 0);
    assert_eq!(header.point_count(), 0);
    assert_eq!(header.unit_scale(), IDENTITY_UNIT_SCALE);
    assert!(header.generating_software().starts_with("lasframe"));
}

#[test]
fn test_header_sizes() {
    assert_eq!(Version::new(1, 0).header_size(), 227);
    assert_eq!(Version::new(1, 3).header_size(), 235);
    assert_eq!(Version::new(1, 4).header_size(), 375);
    assert!(!Version::new(1, 3).supports_extended_records());
    assert!(Version::new(1, 4).supports_extended_records());
}

#[test]
fn test_point_format_requires_version() {
    let err = HeaderModel::new(Version::new(1, 2), format(6)).unwrap_err();
    assert!(matches!(err, HeaderError::UnsupportedPointFormat { .. }));

    assert!(HeaderModel::new(Version::new(1, 4), format(6)).is_ok());
    assert!(matches!(
        HeaderModel::new(Version::new(2, 0), format(0)),
        Err(HeaderError::UnsupportedVersion(_))
    ));
}

#[test]
fn test_unit_scale_validation() {
    let header = HeaderModel::new(Version::default(), format(1)).unwrap();
    assert!(header.clone().with_unit_scale([0.3048, 0.3048, 1.0]).is_ok());
    assert!(header.clone().with_unit_scale([1.0, 0.0, 1.0]).is_err());
    assert!(header.clone().with_unit_scale([1.0, 1.0, -2.0]).is_err());
    assert!(header.with_unit_scale([f64::NAN, 1.0, 1.0]).is_err());
}

#[test]
fn test_recompute_extended_offset() {
    let mut header = HeaderModel::new(Version::default(), format(0))
        .unwrap()
        .with_point_count(10)
        .with_record_counts(0, 1);
    header.recompute_extended_offset();
    assert_eq!(header.extended_section_offset(), 375 + 20 * 10);

    header.set_extended_record_count(0);
    header.recompute_extended_offset();
    assert_eq!(header.extended_section_offset(), 0);
}

#[test]
fn test_header_json_summary() {
    let header = HeaderModel::new(Version::default(), format(3))
        .unwrap()
        .with_system_identifier("test scanner");
    let json = serde_json::to_value(&header).unwrap();
    assert_eq!(json["point_format"], 3);
    assert_eq!(json["record_length"], 34);
    assert_eq!(json["system_identifier"], "test scanner");

    let restored: HeaderModel = serde_json::from_value(json).unwrap();
    assert_eq!(restored, header);
}

#[test]
fn test_version_from_str() {
    assert_eq!("1.2".parse::<Version>().unwrap(), Version::new(1, 2));
    assert_eq!(" 1.4 ".parse::<Version>().unwrap(), Version::new(1, 4));
    assert!(matches!("14".parse::<Version>(), Err(HeaderError::MalformedVersion(_))));
    assert!(matches!("1.x".parse::<Version>(), Err(HeaderError::MalformedVersion(_))));
}
