use std::fmt;

use serde::Serialize;

use super::Dataset;

/// Size summary of a dataset as it would be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Number of points
    pub point_count: u64,

    /// Number of user-defined columns (vector columns count once)
    pub user_fields: usize,

    /// Number of extra-bytes descriptors
    pub extra_field_entries: usize,

    /// Number of ordinary records
    pub ordinary_records: u32,

    /// Number of extended records
    pub extended_records: u32,

    /// Bytes per point record
    pub record_length: u16,

    /// Bytes of point data
    pub payload_bytes: u64,

    /// Total file size in bytes
    pub total_size_bytes: u64,
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset: {} points x {} bytes, {} user fields ({} descriptors), {} records, {} extended records, {} bytes",
            self.point_count,
            self.record_length,
            self.user_fields,
            self.extra_field_entries,
            self.ordinary_records,
            self.extended_records,
            self.total_size_bytes
        )
    }
}

impl Dataset {
    /// Summarizes counts and sizes
    pub fn stats(&self) -> DatasetStats {
        let header = self.header();
        let extended_bytes: u64 = self
            .extended_records()
            .map(|(_, record)| record.serialized_size())
            .sum();

        DatasetStats {
            point_count: header.point_count(),
            user_fields: self.user_fields().map_or(0, |table| table.num_columns()),
            extra_field_entries: self.extra_fields().map_or(0, |registry| registry.len()),
            ordinary_records: header.ordinary_record_count(),
            extended_records: header.extended_record_count(),
            record_length: header.record_length(),
            payload_bytes: header.payload_len(),
            total_size_bytes: header.payload_offset() + header.payload_len() + extended_bytes,
        }
    }
}
