use crate::header::HeaderError;
use crate::records::RecordError;

/// Errors that can occur during dataset operations.
///
/// Every variant is raised before anything is committed: a failed call
/// leaves the dataset exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Table columns do not fit the header's point format
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Declared counts disagree with the supplied collections
    #[error("Count mismatch for {what}: header declares {declared}, found {actual}")]
    CountMismatch {
        /// Which count disagrees
        what: &'static str,
        /// Value declared in the header
        declared: u64,
        /// Length of the supplied collection
        actual: u64,
    },

    /// A unit scale component is not strictly positive
    #[error("Invalid unit scale {0:?}: every component must be strictly positive")]
    InvalidUnitScale([f64; 3]),

    /// A user column's element type cannot be documented as extra bytes
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedFieldType {
        /// Offending column
        column: String,
        /// Arrow type of the column
        data_type: String,
    },

    /// More than one extra-bytes record is present
    #[error("Found {0} extra-bytes records, at most one is allowed")]
    DuplicateRegistrySingleton(usize),

    /// A record or column is not part of the dataset
    #[error("Not found: {0}")]
    NotFound(String),

    /// Column length differs from the point count
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    SizeMismatch {
        /// Offending column
        column: String,
        /// Number of points in the dataset
        expected: u64,
        /// Number of values supplied
        actual: u64,
    },

    /// A derived quantity would break a documented invariant
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error building the header
    #[error("Header error: {0}")]
    HeaderError(#[from] HeaderError),

    /// Error decoding a record payload
    #[error("Record error: {0}")]
    RecordError(#[from] RecordError),

    /// Error from the Arrow library during column operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),
}
