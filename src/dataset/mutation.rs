use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;
use log::{debug, info};

use super::table::{build_table, cast_to, with_column, without_column};
use super::{validate_user_type, Dataset, DatasetError, RecordKey};
use crate::header::Version;
use crate::records::MetadataRecord;
use crate::schema::{is_standard_field, ID};

impl Dataset {
    /// Appends a record to the ordinary or extended list, according to its kind.
    ///
    /// The first extended record upgrades a pre-1.4 dataset to LAS 1.4, which
    /// also grows the header block and shifts the payload. An opaque payload
    /// under the extra-bytes namespace/id is decoded into a registry; adding a
    /// second registry fails with [`DatasetError::DuplicateRegistrySingleton`].
    pub fn add_record(&mut self, record: MetadataRecord) -> Result<RecordKey, DatasetError> {
        self.commit(|ds| {
            let mut record = record;
            let key = if record.is_extended() {
                if ds.extended.is_empty() && !ds.header.version().supports_extended_records() {
                    info!(
                        "Upgrading LAS {} to {} to hold extended records",
                        ds.header.version(),
                        Version::EXTENDED_RECORDS
                    );
                    ds.header.set_version(Version::EXTENDED_RECORDS);
                }
                let key = ds.records.insert(record);
                ds.extended.push(key);
                key
            } else {
                record.decode_known_payload()?;
                if record.extra_fields().is_some() && ds.extra_fields_key()?.is_some() {
                    return Err(DatasetError::DuplicateRegistrySingleton(2));
                }
                let key = ds.records.insert(record);
                ds.ordinary.push(key);
                key
            };
            debug!("Added record {:?}", key);
            Ok(key)
        })
    }

    /// Removes a record and returns it.
    ///
    /// The extra-bytes record cannot be removed while user fields still
    /// depend on it.
    pub fn remove_record(&mut self, key: RecordKey) -> Result<MetadataRecord, DatasetError> {
        self.commit(|ds| {
            let record = ds
                .records
                .get(key)
                .ok_or_else(|| DatasetError::NotFound(format!("record {:?}", key)))?;
            if record.extra_fields().is_some() && !ds.documented_fields()?.is_empty() {
                return Err(DatasetError::InvariantViolation(
                    "the extra-bytes record still documents user fields".to_string(),
                ));
            }

            ds.ordinary.retain(|k| *k != key);
            ds.extended.retain(|k| *k != key);
            let removed = ds
                .records
                .remove(key)
                .ok_or_else(|| DatasetError::NotFound(format!("record {:?}", key)))?;
            debug!("Removed record {:?} ({} bytes)", key, removed.serialized_size());
            Ok(removed)
        })
    }

    /// Flags a record as superseded. Offsets are unaffected.
    pub fn mark_superseded(&mut self, key: RecordKey) -> Result<(), DatasetError> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| DatasetError::NotFound(format!("record {:?}", key)))?;
        record.mark_superseded();
        Ok(())
    }

    /// Adds or replaces a user-defined column.
    ///
    /// The values must have one entry per point and a numeric (or fixed-size
    /// vector of numeric) type. Replacing a column with a different type
    /// releases the old descriptors' bytes before the new ones are counted.
    pub fn add_column(&mut self, name: &str, values: ArrayRef) -> Result<(), DatasetError> {
        if name == ID || is_standard_field(name) {
            return Err(DatasetError::SchemaMismatch(format!(
                "'{}' is a standard field, use merge_column",
                name
            )));
        }
        self.check_len(name, &values)?;
        validate_user_type(name, &values)?;

        self.commit(|ds| {
            let rows = ds.points.num_rows();
            let table = match &ds.user_fields {
                Some(table) => with_column(table, name, values)?,
                None => build_table(vec![(name.to_string(), values)], rows)?,
            };
            ds.user_fields = Some(table);
            Ok(())
        })?;

        debug!(
            "Added column '{}': record length {}, payload @ {}",
            name,
            self.header.record_length(),
            self.header.payload_offset()
        );
        Ok(())
    }

    /// Writes a column: standard fields (and `id`) are overwritten in the point
    /// table without header effects, anything else behaves like [`Dataset::add_column`].
    pub fn merge_column(&mut self, name: &str, values: ArrayRef) -> Result<(), DatasetError> {
        let data_type = if name == ID {
            Some(DataType::UInt64)
        } else {
            self.header.point_format().field(name).map(|f| f.data_type)
        };

        let Some(data_type) = data_type else {
            return self.add_column(name, values);
        };

        self.check_len(name, &values)?;
        let values = cast_to(&values, &data_type)?;
        self.commit(|ds| {
            ds.points = with_column(&ds.points, name, values)?;
            Ok(())
        })?;
        debug!("Merged standard column '{}'", name);
        Ok(())
    }

    /// Drops a user-defined column together with its extra-bytes descriptors.
    ///
    /// The extra-bytes record is removed once it documents nothing.
    pub fn remove_column(&mut self, name: &str) -> Result<(), DatasetError> {
        if name == ID || is_standard_field(name) {
            return Err(DatasetError::SchemaMismatch(format!(
                "standard column '{}' cannot be removed",
                name
            )));
        }

        self.commit(|ds| {
            let table = ds
                .user_fields
                .as_ref()
                .filter(|table| table.column_by_name(name).is_some())
                .ok_or_else(|| DatasetError::NotFound(format!("column '{}'", name)))?;
            ds.user_fields = without_column(table, name)?;

            if ds.documented_fields()?.is_empty() {
                if let Some(key) = ds.extra_fields_key()? {
                    ds.ordinary.retain(|k| *k != key);
                    ds.records.remove(key);
                    debug!("Removed empty extra-bytes record");
                }
            }
            Ok(())
        })?;

        debug!("Removed column '{}': record length {}", name, self.header.record_length());
        Ok(())
    }

    /// Replaces the unstructured bytes that follow the header block
    pub fn set_leading_bytes(&mut self, bytes: Vec<u8>) -> Result<(), DatasetError> {
        self.commit(|ds| {
            ds.leading_bytes = bytes;
            Ok(())
        })
    }

    fn check_len(&self, name: &str, values: &ArrayRef) -> Result<(), DatasetError> {
        let expected = self.header.point_count();
        let actual = values.len() as u64;
        if expected != actual {
            return Err(DatasetError::SizeMismatch {
                column: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}
