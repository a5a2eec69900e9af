//! # lasframe - In-Memory LAS Point Clouds That Stay Consistent
//!
//! `lasframe` holds a LAS point cloud in memory as Apache Arrow tables and keeps
//! the public header block consistent with the data while the dataset is edited:
//! adding a user column grows the per-point record length and documents the
//! column in the extra-bytes record; adding a record shifts the point payload;
//! the first extended record upgrades the file to LAS 1.4.
//!
//! ## Key Features
//!
//! - **Columnar points**: standard point-format fields and user fields live in
//!   Arrow `RecordBatch`es, so they can be handed to any Arrow consumer.
//!
//! - **Self-describing user fields**: every user column is documented in the
//!   extra-bytes registry; fixed-size vector columns are split per component.
//!
//! - **Derived layout**: record length, record counts and both byte offsets are
//!   recomputed from scratch by a single idempotent reconciliation routine.
//!
//! - **Atomic edits**: a failed mutation leaves the dataset exactly as it was.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use lasframe::prelude::*;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("x", DataType::Float64, false),
//!     Field::new("y", DataType::Float64, false),
//!     Field::new("z", DataType::Float64, false),
//! ]));
//! let xyz: ArrayRef = Arc::new(Float64Array::from(vec![1.0, 2.0]));
//! let points = RecordBatch::try_new(schema, vec![xyz.clone(), xyz.clone(), xyz])?;
//!
//! let header = HeaderModel::new(Version::new(1, 2), PointFormat::new(0).unwrap())?
//!     .with_point_count(2);
//! let mut dataset = Dataset::new(header, points)?;
//!
//! dataset.add_column("reflectance", Arc::new(Float64Array::from(vec![0.5, 0.9])))?;
//! assert_eq!(dataset.header().record_length(), 20 + 8);
//! assert_eq!(dataset.header().ordinary_record_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: point formats, standard fields and extra-field element kinds
//! - [`header`]: the public header block and its derived offsets
//! - [`records`]: variable-length records and the extra-bytes registry
//! - [`dataset`]: the orchestrator that owns all of the above
//! - [`config`]: TOML settings for new datasets

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dataset;
pub mod header;
pub mod records;
pub mod schema;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigError, DatasetConfig};
    pub use crate::dataset::{Dataset, DatasetBuilder, DatasetError, DatasetStats, RecordKey};
    pub use crate::header::{HeaderError, HeaderModel, Version};
    pub use crate::records::{
        ExtraFieldEntry, ExtraFieldsRegistry, MetadataRecord, RecordError, RecordPayload,
    };
    pub use crate::schema::{ElementKind, FieldType, PointFormat};
}
