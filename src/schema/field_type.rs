use std::fmt;

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// Scalar element kinds that an extra-bytes descriptor can document.
///
/// Each kind maps onto a LAS data type code. Code 0 ("undocumented") has no
/// variant: undocumented bytes live in the reserved `undocumented_bytes`
/// column instead of the registry. Booleans have no code of their own and
/// are stored as unsigned chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// unsigned char holding 0 or 1
    Bool,
    /// unsigned char
    U8,
    /// char
    I8,
    /// unsigned short
    U16,
    /// short
    I16,
    /// unsigned long
    U32,
    /// long
    I32,
    /// unsigned long long
    U64,
    /// long long
    I64,
    /// float
    F32,
    /// double
    F64,
}

impl ElementKind {
    /// LAS data type code of this kind
    pub fn type_code(self) -> u8 {
        match self {
            Self::Bool | Self::U8 => 1,
            Self::I8 => 2,
            Self::U16 => 3,
            Self::I16 => 4,
            Self::U32 => 5,
            Self::I32 => 6,
            Self::U64 => 7,
            Self::I64 => 8,
            Self::F32 => 9,
            Self::F64 => 10,
        }
    }

    /// Inverse of [`ElementKind::type_code`]. Code 1 always decodes as `U8`.
    pub fn from_type_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::U8,
            2 => Self::I8,
            3 => Self::U16,
            4 => Self::I16,
            5 => Self::U32,
            6 => Self::I32,
            7 => Self::U64,
            8 => Self::I64,
            9 => Self::F32,
            10 => Self::F64,
            _ => return None,
        })
    }

    /// Whether both kinds share the same on-disk representation
    pub fn same_storage(self, other: Self) -> bool {
        self.type_code() == other.type_code()
    }

    /// Size of one element in bytes
    pub fn byte_size(self) -> u16 {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Whether values are stored as floating point
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether values are stored as signed integers
    pub fn is_signed_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Maps a primitive Arrow type onto an element kind
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        Some(match data_type {
            DataType::Boolean => Self::Bool,
            DataType::UInt8 => Self::U8,
            DataType::Int8 => Self::I8,
            DataType::UInt16 => Self::U16,
            DataType::Int16 => Self::I16,
            DataType::UInt32 => Self::U32,
            DataType::Int32 => Self::I32,
            DataType::UInt64 => Self::U64,
            DataType::Int64 => Self::I64,
            DataType::Float32 => Self::F32,
            DataType::Float64 => Self::F64,
            _ => return None,
        })
    }

    /// Arrow type used for columns of this kind
    pub fn to_arrow(self) -> DataType {
        match self {
            Self::Bool => DataType::Boolean,
            Self::U8 => DataType::UInt8,
            Self::I8 => DataType::Int8,
            Self::U16 => DataType::UInt16,
            Self::I16 => DataType::Int16,
            Self::U32 => DataType::UInt32,
            Self::I32 => DataType::Int32,
            Self::U64 => DataType::UInt64,
            Self::I64 => DataType::Int64,
            Self::F32 => DataType::Float32,
            Self::F64 => DataType::Float64,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Type of a user-defined point field: a scalar kind or a fixed-size vector of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// Element kind shared by every component
    pub kind: ElementKind,
    /// Number of components (1 for scalars)
    pub dimension: u16,
}

impl FieldType {
    /// A scalar field of the given kind
    pub fn scalar(kind: ElementKind) -> Self {
        Self { kind, dimension: 1 }
    }

    /// A vector field of `dimension` components
    pub fn vector(kind: ElementKind, dimension: u16) -> Self {
        Self { kind, dimension }
    }

    /// Whether this type expands into several registry entries
    pub fn is_vector(&self) -> bool {
        self.dimension > 1
    }

    /// Total bytes one point spends on this field
    pub fn byte_size(&self) -> u64 {
        u64::from(self.kind.byte_size()) * u64::from(self.dimension)
    }

    /// Resolves the field type of an Arrow column.
    ///
    /// Primitive numeric and boolean columns are scalars; `FixedSizeList` of
    /// one of those is a vector. Anything else returns `None`.
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::FixedSizeList(item, size) => {
                let kind = ElementKind::from_arrow(item.data_type())?;
                let dimension = u16::try_from(*size).ok().filter(|d| *d > 0)?;
                Some(Self::vector(kind, dimension))
            }
            other => ElementKind::from_arrow(other).map(Self::scalar),
        }
    }

    /// Registry entry names for a field called `name`.
    pub fn entry_names(&self, name: &str) -> Vec<String> {
        if self.is_vector() {
            split_field_names(name, self.dimension)
        } else {
            vec![name.to_string()]
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_vector() {
            write!(f, "[{}; {}]", self.kind, self.dimension)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Splits a vector field name into its per-component names: `"normal [0]"`, `"normal [1]"`, ...
pub fn split_field_names(name: &str, dimension: u16) -> Vec<String> {
    (0..dimension).map(|i| format!("{} [{}]", name, i)).collect()
}
