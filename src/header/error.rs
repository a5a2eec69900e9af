use super::Version;
use crate::schema::PointFormat;

/// Errors that can occur while building a header
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeaderError {
    /// The format version predates the requested point format
    #[error("Point format {format} requires LAS {required} or newer, header declares {version}")]
    UnsupportedPointFormat {
        /// Requested point format
        format: PointFormat,
        /// Declared format version
        version: Version,
        /// Oldest version defining the point format
        required: Version,
    },

    /// Version outside the LAS 1.0 - 1.4 range
    #[error("Unsupported LAS version: {0}")]
    UnsupportedVersion(Version),

    /// A version string that is not `major.minor`
    #[error("Malformed LAS version '{0}', expected major.minor")]
    MalformedVersion(String),

    /// A unit scale component is zero, negative or not finite
    #[error("Invalid unit scale {0:?}: every component must be strictly positive")]
    InvalidUnitScale([f64; 3]),
}
