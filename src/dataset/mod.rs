//! # LAS Dataset Module
//!
//! [`Dataset`] owns everything a LAS file is made of and keeps the
//! interdependent quantities consistent while the dataset is edited:
//!
//! ```text
//! ┌──────────────────────┐  header_size(version)
//! │ public header        │
//! ├──────────────────────┤  + leading bytes
//! │ unstructured bytes   │
//! ├──────────────────────┤  + Σ ordinary record sizes
//! │ ordinary records     │  (one may be the extra-bytes record)
//! ├──────────────────────┤  = payload_offset
//! │ point records        │  record_length * point_count
//! ├──────────────────────┤  = extended_section_offset (0 when empty)
//! │ extended records     │
//! └──────────────────────┘
//! ```
//!
//! Points are split over two Arrow tables: standard fields of the point format
//! (plus the `id` bookkeeping column) and user-defined fields. Each user field
//! is documented in the extra-bytes registry; vector fields are documented
//! per component.
//!
//! Every mutation stages its change on a copy, runs the shared reconciliation
//! routine, and commits only on success, so a failed call never leaves a
//! partially updated dataset behind.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut dataset = Dataset::new(header, points)?;
//! dataset.add_column("reflectance", Arc::new(Float64Array::from(vec![0.5, 0.9])))?;
//! let key = dataset.add_record(MetadataRecord::extended("user", 1, "notes", payload))?;
//! dataset.remove_record(key)?;
//! ```

mod builder;
mod equality;
mod error;
mod mutation;
mod reconcile;
mod stats;
mod table;


use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use slotmap::{new_key_type, SlotMap};

use crate::header::HeaderModel;
use crate::records::{ExtraFieldsRegistry, MetadataRecord};
use crate::schema::{FieldType, EXTRA_BYTES_NAME_LEN, UNDOCUMENTED_BYTES, X, Y, Z};

pub use builder::DatasetBuilder;
pub use error::DatasetError;
pub use stats::DatasetStats;

new_key_type! {
    /// Stable handle to a record owned by a [`Dataset`].
    ///
    /// Handles stay valid until the record is removed and are never reused
    /// for a different record.
    pub struct RecordKey;
}

/// An in-memory LAS dataset whose header always matches its contents
#[derive(Debug, Clone)]
pub struct Dataset {
    header: HeaderModel,
    points: RecordBatch,
    user_fields: Option<RecordBatch>,
    records: SlotMap<RecordKey, MetadataRecord>,
    ordinary: Vec<RecordKey>,
    extended: Vec<RecordKey>,
    leading_bytes: Vec<u8>,
}

impl Dataset {
    /// Builds a dataset without records or leading bytes. See [`DatasetBuilder`].
    pub fn new(header: HeaderModel, points: RecordBatch) -> Result<Self, DatasetError> {
        DatasetBuilder::new(header, points).build()
    }

    /// Starts a [`DatasetBuilder`]
    pub fn builder(header: HeaderModel, points: RecordBatch) -> DatasetBuilder {
        DatasetBuilder::new(header, points)
    }

    /// The reconciled header
    pub fn header(&self) -> &HeaderModel {
        &self.header
    }

    /// Standard point fields plus `id`
    pub fn points(&self) -> &RecordBatch {
        &self.points
    }

    /// User-defined point fields, if any exist
    pub fn user_fields(&self) -> Option<&RecordBatch> {
        self.user_fields.as_ref()
    }

    /// Number of points
    pub fn point_count(&self) -> u64 {
        self.header.point_count()
    }

    /// Unit scale applied to x, y and z
    pub fn unit_scale(&self) -> [f64; 3] {
        self.header.unit_scale()
    }

    /// Unstructured bytes between the header and the first record
    pub fn leading_bytes(&self) -> &[u8] {
        &self.leading_bytes
    }

    /// Column called `name` from either table
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.points
            .column_by_name(name)
            .or_else(|| self.user_fields.as_ref()?.column_by_name(name))
    }

    /// Names of all columns, standard ones first
    pub fn column_names(&self) -> Vec<String> {
        let mut names = table::column_names(&self.points);
        if let Some(user) = &self.user_fields {
            names.extend(table::column_names(user));
        }
        names
    }

    /// Record behind `key`
    pub fn record(&self, key: RecordKey) -> Option<&MetadataRecord> {
        self.records.get(key)
    }

    /// Ordinary records in file order
    pub fn ordinary_records(&self) -> impl Iterator<Item = (RecordKey, &MetadataRecord)> + '_ {
        self.ordinary.iter().map(move |key| (*key, &self.records[*key]))
    }

    /// Extended records in file order
    pub fn extended_records(&self) -> impl Iterator<Item = (RecordKey, &MetadataRecord)> + '_ {
        self.extended.iter().map(move |key| (*key, &self.records[*key]))
    }

    /// First record with the given namespace and id, ordinary records first
    pub fn find_record(&self, user_id: &str, record_id: u16) -> Option<RecordKey> {
        self.ordinary
            .iter()
            .chain(&self.extended)
            .copied()
            .find(|key| {
                let record = &self.records[*key];
                record.user_id() == user_id && record.record_id() == record_id
            })
    }

    /// The extra-bytes registry documenting the user fields
    pub fn extra_fields(&self) -> Option<&ExtraFieldsRegistry> {
        self.ordinary
            .iter()
            .find_map(|key| self.records[*key].extra_fields())
    }

    /// Scaled coordinates of every point: `(x, y, z) * unit_scale`
    pub fn positions(&self) -> Result<Vec<[f64; 3]>, DatasetError> {
        let mut axes = Vec::with_capacity(3);
        for name in [X, Y, Z] {
            let column = self
                .points
                .column_by_name(name)
                .and_then(|array| array.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| DatasetError::NotFound(format!("coordinate column '{}'", name)))?;
            axes.push(column);
        }

        let [sx, sy, sz] = self.unit_scale();
        Ok((0..self.points.num_rows())
            .map(|i| [axes[0].value(i) * sx, axes[1].value(i) * sy, axes[2].value(i) * sz])
            .collect())
    }

    /// User columns that the registry documents, with their field types
    pub(crate) fn documented_fields(&self) -> Result<Vec<(String, FieldType)>, DatasetError> {
        let Some(user) = &self.user_fields else {
            return Ok(Vec::new());
        };
        table::columns_of(user)
            .into_iter()
            .filter(|(name, _)| name != UNDOCUMENTED_BYTES)
            .map(|(name, array)| {
                let field_type = FieldType::from_arrow(array.data_type())
                    .ok_or_else(|| unsupported(&name, array.data_type()))?;
                Ok((name, field_type))
            })
            .collect()
    }
}

/// Checks that a user column can be stored: a documentable numeric or boolean
/// type, or fixed-size binary for the reserved `undocumented_bytes` column.
///
/// Documented columns must also have descriptor names that fit the
/// 32-byte name slot of an extra-bytes entry.
pub(crate) fn validate_user_type(name: &str, values: &ArrayRef) -> Result<(), DatasetError> {
    let data_type = values.data_type();
    if name == UNDOCUMENTED_BYTES {
        return match data_type {
            DataType::FixedSizeBinary(width) if *width > 0 => Ok(()),
            _ => Err(unsupported(name, data_type)),
        };
    }

    let field_type = FieldType::from_arrow(data_type).ok_or_else(|| unsupported(name, data_type))?;
    if let Some(long) = field_type
        .entry_names(name)
        .into_iter()
        .find(|entry_name| entry_name.len() > EXTRA_BYTES_NAME_LEN)
    {
        return Err(DatasetError::SchemaMismatch(format!(
            "extra field name '{}' is longer than {} bytes",
            long, EXTRA_BYTES_NAME_LEN
        )));
    }
    Ok(())
}

fn unsupported(name: &str, data_type: &DataType) -> DatasetError {
    DatasetError::UnsupportedFieldType {
        column: name.to_string(),
        data_type: data_type.to_string(),
    }
}
