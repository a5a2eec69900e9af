//! # Public Header Block
//!
//! [`HeaderModel`] holds the scalar metadata of a LAS dataset: version,
//! point format, per-point record length, counts and the two derived byte
//! offsets that locate the point payload and the extended record section.
//!
//! Offsets are derived quantities:
//!
//! ```text
//! payload_offset          = header_size(version) + leading bytes + Σ ordinary record sizes
//! extended_section_offset = payload_offset + record_length * point_count   (0 without extended records)
//! ```
//!
//! Only [`crate::dataset::Dataset`] mutates a header after construction.

mod error;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{PointFormat, GENERATING_SOFTWARE};

pub use error::HeaderError;

/// Unit scale that leaves coordinates untouched
pub const IDENTITY_UNIT_SCALE: [f64; 3] = [1.0, 1.0, 1.0];

/// LAS format version (`major.minor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    /// Major version, always 1
    pub major: u8,
    /// Minor version, 0 through 4
    pub minor: u8,
}

impl Version {
    /// First version that supports extended variable-length records
    pub const EXTENDED_RECORDS: Version = Version::new(1, 4);

    /// Creates a version
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether this crate understands the version
    pub fn is_supported(self) -> bool {
        self.major == 1 && self.minor <= 4
    }

    /// Size of the public header block written for this version
    pub fn header_size(self) -> u64 {
        match self.minor {
            0..=2 => 227,
            3 => 235,
            _ => 375,
        }
    }

    /// Whether extended records may be stored
    pub fn supports_extended_records(self) -> bool {
        self >= Self::EXTENDED_RECORDS
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = HeaderError;

    /// Parses `"major.minor"`, e.g. `"1.4"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HeaderError::MalformedVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;
        let major = major.parse().map_err(|_| malformed())?;
        let minor = minor.parse().map_err(|_| malformed())?;
        Ok(Self::new(major, minor))
    }
}

/// Checks that every unit scale component is finite and strictly positive
pub fn validate_unit_scale(scale: [f64; 3]) -> Result<(), HeaderError> {
    if scale.iter().all(|c| c.is_finite() && *c > 0.0) {
        Ok(())
    } else {
        Err(HeaderError::InvalidUnitScale(scale))
    }
}

/// Scalar header block of a LAS dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderModel {
    version: Version,
    point_format: PointFormat,
    record_length: u16,
    point_count: u64,
    ordinary_record_count: u32,
    extended_record_count: u32,
    payload_offset: u64,
    extended_section_offset: u64,
    unit_scale: [f64; 3],
    system_identifier: String,
    generating_software: String,
    creation_date: NaiveDate,
}

impl HeaderModel {
    /// Creates an empty header for `point_format` at `version`.
    ///
    /// The record length is that of the standard fields alone and the payload
    /// starts right after the header block. The creation date is today in UTC;
    /// use [`HeaderModel::with_creation_date`] for reproducible headers.
    pub fn new(version: Version, point_format: PointFormat) -> Result<Self, HeaderError> {
        if !version.is_supported() {
            return Err(HeaderError::UnsupportedVersion(version));
        }
        let required = point_format.min_version();
        if version < required {
            return Err(HeaderError::UnsupportedPointFormat {
                format: point_format,
                version,
                required,
            });
        }

        Ok(Self {
            version,
            point_format,
            record_length: point_format.record_length(),
            point_count: 0,
            ordinary_record_count: 0,
            extended_record_count: 0,
            payload_offset: version.header_size(),
            extended_section_offset: 0,
            unit_scale: IDENTITY_UNIT_SCALE,
            system_identifier: String::new(),
            generating_software: GENERATING_SOFTWARE.to_string(),
            creation_date: Utc::now().date_naive(),
        })
    }

    /// Sets the declared number of point records
    pub fn with_point_count(mut self, count: u64) -> Self {
        self.point_count = count;
        self
    }

    /// Sets the declared ordinary and extended record counts
    pub fn with_record_counts(mut self, ordinary: u32, extended: u32) -> Self {
        self.ordinary_record_count = ordinary;
        self.extended_record_count = extended;
        self
    }

    /// Sets the unit scale applied to x, y and z
    pub fn with_unit_scale(mut self, scale: [f64; 3]) -> Result<Self, HeaderError> {
        validate_unit_scale(scale)?;
        self.unit_scale = scale;
        Ok(self)
    }

    /// Sets the system identifier
    pub fn with_system_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.system_identifier = identifier.into();
        self
    }

    /// Sets the generating software
    pub fn with_generating_software(mut self, software: impl Into<String>) -> Self {
        self.generating_software = software.into();
        self
    }

    /// Sets the file creation date
    pub fn with_creation_date(mut self, date: NaiveDate) -> Self {
        self.creation_date = date;
        self
    }

    /// Format version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Point data record format
    pub fn point_format(&self) -> PointFormat {
        self.point_format
    }

    /// Bytes per point record, standard and user fields together
    pub fn record_length(&self) -> u16 {
        self.record_length
    }

    /// Number of point records
    pub fn point_count(&self) -> u64 {
        self.point_count
    }

    /// Number of ordinary variable-length records
    pub fn ordinary_record_count(&self) -> u32 {
        self.ordinary_record_count
    }

    /// Number of extended variable-length records
    pub fn extended_record_count(&self) -> u32 {
        self.extended_record_count
    }

    /// Byte offset of the first point record
    pub fn payload_offset(&self) -> u64 {
        self.payload_offset
    }

    /// Byte offset of the first extended record, 0 when there are none
    pub fn extended_section_offset(&self) -> u64 {
        self.extended_section_offset
    }

    /// Unit scale applied to x, y and z
    pub fn unit_scale(&self) -> [f64; 3] {
        self.unit_scale
    }

    /// System identifier
    pub fn system_identifier(&self) -> &str {
        &self.system_identifier
    }

    /// Generating software
    pub fn generating_software(&self) -> &str {
        &self.generating_software
    }

    /// File creation date
    pub fn creation_date(&self) -> NaiveDate {
        self.creation_date
    }

    /// Size of the fixed header block for the current version
    pub fn header_size(&self) -> u64 {
        self.version.header_size()
    }

    /// Byte length of the point payload
    pub fn payload_len(&self) -> u64 {
        u64::from(self.record_length) * self.point_count
    }

    /// Re-derives the extended section offset from the payload geometry
    pub fn recompute_extended_offset(&mut self) {
        self.extended_section_offset = if self.extended_record_count > 0 {
            self.payload_offset + self.payload_len()
        } else {
            0
        };
    }

    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub(crate) fn set_record_length(&mut self, length: u16) {
        self.record_length = length;
    }

    pub(crate) fn set_point_count(&mut self, count: u64) {
        self.point_count = count;
    }

    pub(crate) fn set_ordinary_record_count(&mut self, count: u32) {
        self.ordinary_record_count = count;
    }

    pub(crate) fn set_extended_record_count(&mut self, count: u32) {
        self.extended_record_count = count;
    }

    pub(crate) fn set_payload_offset(&mut self, offset: u64) {
        self.payload_offset = offset;
    }

    pub(crate) fn set_unit_scale(&mut self, scale: [f64; 3]) {
        self.unit_scale = scale;
    }
}

impl fmt::Display for HeaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LAS {} format {}: {} points x {} bytes, {} records, {} extended records, payload @ {}, extended @ {}",
            self.version,
            self.point_format,
            self.point_count,
            self.record_length,
            self.ordinary_record_count,
            self.extended_record_count,
            self.payload_offset,
            self.extended_section_offset
        )
    }
}
