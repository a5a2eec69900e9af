use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::info;
use slotmap::SlotMap;

use super::table::{build_table, cast_to, column_names, columns_of, id_column};
use super::{validate_user_type, Dataset, DatasetError};
use crate::header::{validate_unit_scale, HeaderModel, Version};
use crate::records::MetadataRecord;
use crate::schema::{format_id_for, is_standard_field, ID};

/// Assembles a [`Dataset`] from a header, a point table and its records.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Float64Array, UInt16Array};
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use lasframe::dataset::DatasetBuilder;
/// use lasframe::header::{HeaderModel, Version};
/// use lasframe::schema::PointFormat;
///
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("x", DataType::Float64, false),
///     Field::new("y", DataType::Float64, false),
///     Field::new("z", DataType::Float64, false),
///     Field::new("intensity", DataType::UInt16, false),
/// ]));
/// let xyz: ArrayRef = Arc::new(Float64Array::from(vec![1.0, 2.0]));
/// let intensity: ArrayRef = Arc::new(UInt16Array::from(vec![10, 20]));
/// let points = RecordBatch::try_new(schema, vec![xyz.clone(), xyz.clone(), xyz, intensity])?;
///
/// let header = HeaderModel::new(Version::new(1, 2), PointFormat::new(0).unwrap())?
///     .with_point_count(2);
/// let dataset = DatasetBuilder::new(header, points).build()?;
///
/// assert_eq!(dataset.point_count(), 2);
/// assert!(dataset.column("id").is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    header: HeaderModel,
    points: RecordBatch,
    ordinary: Vec<MetadataRecord>,
    extended: Vec<MetadataRecord>,
    leading_bytes: Vec<u8>,
    unit_scale: Option<[f64; 3]>,
}

impl DatasetBuilder {
    /// Starts a dataset from a header and the point table
    pub fn new(header: HeaderModel, points: RecordBatch) -> Self {
        Self {
            header,
            points,
            ordinary: Vec::new(),
            extended: Vec::new(),
            leading_bytes: Vec::new(),
            unit_scale: None,
        }
    }

    /// Ordinary records, in file order
    pub fn ordinary_records(mut self, records: Vec<MetadataRecord>) -> Self {
        self.ordinary = records;
        self
    }

    /// Extended records, in file order
    pub fn extended_records(mut self, records: Vec<MetadataRecord>) -> Self {
        self.extended = records;
        self
    }

    /// Unstructured bytes between the header and the first record
    pub fn leading_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.leading_bytes = bytes;
        self
    }

    /// Unit scale overriding the one in the header
    pub fn unit_scale(mut self, scale: [f64; 3]) -> Self {
        self.unit_scale = Some(scale);
        self
    }

    /// Validates the inputs and reconciles them into a consistent dataset.
    ///
    /// Checks, in order: the table's standard columns belong to the header's
    /// point format, the row count matches the declared point count, the record
    /// lists match the declared counts, and the unit scale is positive. Then an
    /// `id` column is synthesized if missing, columns are split into standard
    /// and user fields, and the extra-bytes registry and header are reconciled.
    pub fn build(self) -> Result<Dataset, DatasetError> {
        let Self {
            mut header,
            points,
            mut ordinary,
            extended,
            leading_bytes,
            unit_scale,
        } = self;
        let format = header.point_format();
        let names = column_names(&points);

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(DatasetError::SchemaMismatch(format!(
                "column '{}' appears more than once",
                duplicate
            )));
        }

        let foreign: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|name| is_standard_field(name) && !format.contains(name))
            .collect();
        if !foreign.is_empty() {
            let implied = format_id_for(names.iter().map(String::as_str))
                .map_or_else(|| "none".to_string(), |f| f.to_string());
            return Err(DatasetError::SchemaMismatch(format!(
                "point format {} does not define {:?} (table implies point format {})",
                format, foreign, implied
            )));
        }

        let rows = points.num_rows();
        check_count("points", header.point_count(), rows)?;
        check_count("ordinary records", u64::from(header.ordinary_record_count()), ordinary.len())?;
        check_count("extended records", u64::from(header.extended_record_count()), extended.len())?;

        let scale = unit_scale.unwrap_or_else(|| header.unit_scale());
        validate_unit_scale(scale).map_err(|_| DatasetError::InvalidUnitScale(scale))?;

        if ordinary.iter().any(MetadataRecord::is_extended)
            || extended.iter().any(|r| !r.is_extended())
        {
            return Err(DatasetError::InvariantViolation(
                "record placed in the wrong list".to_string(),
            ));
        }
        for record in &mut ordinary {
            record.decode_known_payload()?;
        }

        let mut id = None;
        let mut standard = Vec::new();
        let mut user = Vec::new();
        for (name, array) in columns_of(&points) {
            if name == ID {
                id = Some(cast_to(&array, &DataType::UInt64)?);
            } else if let Some(field) = format.field(&name) {
                standard.push((name, cast_to(&array, &field.data_type)?));
            } else {
                validate_user_type(&name, &array)?;
                user.push((name, array));
            }
        }
        standard.insert(0, (ID.to_string(), id.unwrap_or_else(|| id_column(rows))));

        if !extended.is_empty() && !header.version().supports_extended_records() {
            info!(
                "Upgrading LAS {} to {} to hold extended records",
                header.version(),
                Version::EXTENDED_RECORDS
            );
            header.set_version(Version::EXTENDED_RECORDS);
        }
        header.set_unit_scale(scale);

        let mut records = SlotMap::with_key();
        let ordinary = ordinary.into_iter().map(|r| records.insert(r)).collect();
        let extended = extended.into_iter().map(|r| records.insert(r)).collect();

        let user_fields = if user.is_empty() {
            None
        } else {
            Some(build_table(user, rows)?)
        };

        let mut dataset = Dataset {
            header,
            points: build_table(standard, rows)?,
            user_fields,
            records,
            ordinary,
            extended,
            leading_bytes,
        };
        dataset.reconcile_in_place()?;

        info!("Built dataset: {}", dataset.header);
        Ok(dataset)
    }
}

fn check_count(what: &'static str, declared: u64, actual: usize) -> Result<(), DatasetError> {
    if declared == actual as u64 {
        Ok(())
    } else {
        Err(DatasetError::CountMismatch {
            what,
            declared,
            actual: actual as u64,
        })
    }
}
