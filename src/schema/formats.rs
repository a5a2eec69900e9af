use std::collections::HashSet;
use std::fmt;

use arrow::datatypes::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use super::columns;
use crate::header::Version;

/// Highest point data record format id defined for LAS 1.4
pub const MAX_POINT_FORMAT: u8 = 10;

/// A standard point field as defined by a point data record format.
///
/// LAS packs several flags into shared bytes, so sizes are tracked in bits;
/// every format sums to a whole number of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardField {
    /// Column name in the point table
    pub name: &'static str,
    /// In-memory Arrow type of the column
    pub data_type: DataType,
    /// Width of the field inside the point record
    pub bits: u16,
}

impl StandardField {
    fn new(name: &'static str, data_type: DataType, bits: u16) -> Self {
        Self {
            name,
            data_type,
            bits,
        }
    }

    /// Arrow field for this column
    pub fn to_arrow_field(&self) -> Field {
        Field::new(self.name, self.data_type.clone(), false)
    }
}

/// Point data record format identifier (0..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PointFormat(u8);

impl PointFormat {
    /// Creates a point format, returning `None` for ids above 10
    pub fn new(id: u8) -> Option<Self> {
        (id <= MAX_POINT_FORMAT).then_some(Self(id))
    }

    /// Every defined point format, in id order
    pub fn all() -> impl Iterator<Item = PointFormat> {
        (0..=MAX_POINT_FORMAT).map(Self)
    }

    /// Numeric format id
    pub fn id(self) -> u8 {
        self.0
    }

    /// Formats 6-10 use the 1.4 layout with wider return fields
    pub fn is_extended_layout(self) -> bool {
        self.0 >= 6
    }

    /// Whether the format carries GPS time
    pub fn has_gps_time(self) -> bool {
        self.0 != 0 && self.0 != 2
    }

    /// Whether the format carries RGB colour
    pub fn has_rgb(self) -> bool {
        matches!(self.0, 2 | 3 | 5 | 7 | 8 | 10)
    }

    /// Whether the format carries a near-infrared channel
    pub fn has_nir(self) -> bool {
        matches!(self.0, 8 | 10)
    }

    /// Whether the format carries waveform packet fields
    pub fn has_waveform(self) -> bool {
        matches!(self.0, 4 | 5 | 9 | 10)
    }

    /// Oldest format version that defines this point format
    pub fn min_version(self) -> Version {
        match self.0 {
            0 | 1 => Version::new(1, 0),
            2 | 3 => Version::new(1, 2),
            4 | 5 => Version::new(1, 3),
            _ => Version::new(1, 4),
        }
    }

    /// Ordered standard fields of this format
    pub fn fields(self) -> Vec<StandardField> {
        let mut fields = vec![
            StandardField::new(columns::X, DataType::Float64, 32),
            StandardField::new(columns::Y, DataType::Float64, 32),
            StandardField::new(columns::Z, DataType::Float64, 32),
            StandardField::new(columns::INTENSITY, DataType::UInt16, 16),
        ];

        if self.is_extended_layout() {
            fields.extend([
                StandardField::new(columns::RETURN_NUMBER, DataType::UInt8, 4),
                StandardField::new(columns::NUMBER_OF_RETURNS, DataType::UInt8, 4),
                StandardField::new(columns::SYNTHETIC, DataType::Boolean, 1),
                StandardField::new(columns::KEY_POINT, DataType::Boolean, 1),
                StandardField::new(columns::WITHHELD, DataType::Boolean, 1),
                StandardField::new(columns::OVERLAP, DataType::Boolean, 1),
                StandardField::new(columns::SCANNER_CHANNEL, DataType::UInt8, 2),
                StandardField::new(columns::SCAN_DIRECTION, DataType::Boolean, 1),
                StandardField::new(columns::EDGE_OF_FLIGHT_LINE, DataType::Boolean, 1),
                StandardField::new(columns::CLASSIFICATION, DataType::UInt8, 8),
                StandardField::new(columns::USER_DATA, DataType::UInt8, 8),
                StandardField::new(columns::SCAN_ANGLE, DataType::Int16, 16),
                StandardField::new(columns::POINT_SOURCE_ID, DataType::UInt16, 16),
            ]);
        } else {
            fields.extend([
                StandardField::new(columns::RETURN_NUMBER, DataType::UInt8, 3),
                StandardField::new(columns::NUMBER_OF_RETURNS, DataType::UInt8, 3),
                StandardField::new(columns::SCAN_DIRECTION, DataType::Boolean, 1),
                StandardField::new(columns::EDGE_OF_FLIGHT_LINE, DataType::Boolean, 1),
                StandardField::new(columns::CLASSIFICATION, DataType::UInt8, 5),
                StandardField::new(columns::SYNTHETIC, DataType::Boolean, 1),
                StandardField::new(columns::KEY_POINT, DataType::Boolean, 1),
                StandardField::new(columns::WITHHELD, DataType::Boolean, 1),
                StandardField::new(columns::SCAN_ANGLE, DataType::Int8, 8),
                StandardField::new(columns::USER_DATA, DataType::UInt8, 8),
                StandardField::new(columns::POINT_SOURCE_ID, DataType::UInt16, 16),
            ]);
        }

        if self.has_gps_time() {
            fields.push(StandardField::new(columns::GPS_TIME, DataType::Float64, 64));
        }

        if self.has_rgb() {
            fields.extend([
                StandardField::new(columns::RED, DataType::UInt16, 16),
                StandardField::new(columns::GREEN, DataType::UInt16, 16),
                StandardField::new(columns::BLUE, DataType::UInt16, 16),
            ]);
        }

        if self.has_nir() {
            fields.push(StandardField::new(columns::NIR, DataType::UInt16, 16));
        }

        if self.has_waveform() {
            fields.extend([
                StandardField::new(columns::WAVE_PACKET_DESCRIPTOR_INDEX, DataType::UInt8, 8),
                StandardField::new(columns::WAVE_DATA_OFFSET, DataType::UInt64, 64),
                StandardField::new(columns::WAVE_PACKET_SIZE, DataType::UInt32, 32),
                StandardField::new(columns::RETURN_POINT_LOCATION, DataType::Float32, 32),
                StandardField::new(columns::WAVE_DX, DataType::Float32, 32),
                StandardField::new(columns::WAVE_DY, DataType::Float32, 32),
                StandardField::new(columns::WAVE_DZ, DataType::Float32, 32),
            ]);
        }

        fields
    }

    /// Looks up a standard field of this format by name
    pub fn field(self, name: &str) -> Option<StandardField> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Whether `name` is one of this format's standard fields
    pub fn contains(self, name: &str) -> bool {
        self.fields().iter().any(|f| f.name == name)
    }

    /// Bytes used by the standard fields of one point record
    pub fn record_length(self) -> u16 {
        let bits: u16 = self.fields().iter().map(|f| f.bits).sum();
        bits / 8
    }

    /// Arrow schema holding every standard field of this format
    pub fn arrow_schema(self) -> Schema {
        Schema::new(
            self.fields()
                .iter()
                .map(StandardField::to_arrow_field)
                .collect::<Vec<_>>(),
        )
    }
}

impl TryFrom<u8> for PointFormat {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| format!("point format {} is not defined", id))
    }
}

impl From<PointFormat> for u8 {
    fn from(format: PointFormat) -> Self {
        format.0
    }
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `name` is a standard field of any point format
pub fn is_standard_field(name: &str) -> bool {
    PointFormat::all().any(|format| format.contains(name))
}

/// Smallest point format that holds every standard column in `columns`.
///
/// Names that are not standard in any format are ignored. Returns `None` when
/// no single format defines all the standard columns present.
pub fn format_id_for<'a, I>(columns: I) -> Option<PointFormat>
where
    I: IntoIterator<Item = &'a str>,
{
    let standard: HashSet<&str> = columns
        .into_iter()
        .filter(|name| is_standard_field(name))
        .collect();

    PointFormat::all().find(|format| {
        let names: HashSet<&str> = format.fields().iter().map(|f| f.name).collect();
        standard.is_subset(&names)
    })
}
