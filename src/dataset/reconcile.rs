//! The single invariant-restoring routine shared by construction and every mutation.
//!
//! Reconciliation runs in two phases:
//!
//! 1. **Extra-fields sync**: the extra-bytes registry is brought into a
//!    bijection with the documented user columns. Missing descriptors are
//!    added, descriptors whose name matches but whose storage differs are
//!    replaced, and descriptors without a column are dropped. The registry
//!    record is created on demand. Two columns expanding to the same entry
//!    name are rejected before anything changes.
//! 2. **Layout derivation**: record length, record counts, point count and both
//!    offsets are derived from scratch, so running it on a consistent dataset
//!    changes nothing.

use std::collections::{HashMap, HashSet};

use arrow::array::Array;
use arrow::datatypes::DataType;
use log::{debug, warn};

use super::{Dataset, DatasetError, RecordKey};
use crate::header::validate_unit_scale;
use crate::records::{ExtraFieldEntry, ExtraFieldsRegistry, MetadataRecord};
use crate::schema::{FieldType, MAX_RECORD_LENGTH, UNDOCUMENTED_BYTES};

impl Dataset {
    /// Re-runs header reconciliation.
    ///
    /// Idempotent: on a dataset that already satisfies its invariants (which
    /// every public operation guarantees) this leaves all header fields unchanged.
    pub fn reconcile(&mut self) -> Result<(), DatasetError> {
        self.commit(|_| Ok(()))
    }

    /// Applies `op` to a copy of the dataset, reconciles the copy and only
    /// then replaces `self`. Any error leaves `self` untouched.
    pub(crate) fn commit<T, F>(&mut self, op: F) -> Result<T, DatasetError>
    where
        F: FnOnce(&mut Dataset) -> Result<T, DatasetError>,
    {
        let mut staged = self.clone();
        let out = op(&mut staged)?;
        staged.reconcile_in_place()?;
        *self = staged;
        Ok(out)
    }

    pub(crate) fn reconcile_in_place(&mut self) -> Result<(), DatasetError> {
        self.sync_extra_fields()?;
        self.derive_layout()
    }

    /// Keys of ordinary records carrying an extra-fields registry
    fn registry_keys(&self) -> Vec<RecordKey> {
        self.ordinary
            .iter()
            .copied()
            .filter(|key| self.records[*key].extra_fields().is_some())
            .collect()
    }

    pub(crate) fn extra_fields_key(&self) -> Result<Option<RecordKey>, DatasetError> {
        let keys = self.registry_keys();
        if keys.len() > 1 {
            return Err(DatasetError::DuplicateRegistrySingleton(keys.len()));
        }
        Ok(keys.first().copied())
    }

    fn sync_extra_fields(&mut self) -> Result<(), DatasetError> {
        let documented = self.documented_fields()?;
        check_entry_names(&documented)?;

        let key = match self.extra_fields_key()? {
            Some(key) => key,
            None if documented.is_empty() => return Ok(()),
            None => {
                let key = self
                    .records
                    .insert(MetadataRecord::extra_bytes(ExtraFieldsRegistry::new()));
                self.ordinary.push(key);
                debug!("Created extra-bytes record for {} user fields", documented.len());
                key
            }
        };

        let registry = self.records[key].extra_fields_mut().ok_or_else(|| {
            DatasetError::InvariantViolation("extra-bytes record lost its registry".to_string())
        })?;

        for (name, field_type) in &documented {
            for entry_name in field_type.entry_names(name) {
                if let Some(entry) = registry.find_mut(&entry_name) {
                    // a decoded u8 descriptor documents a boolean column as is
                    if entry.kind.same_storage(field_type.kind) {
                        entry.kind = field_type.kind;
                        continue;
                    }
                    warn!(
                        "Extra field '{}' changes type from {} to {}",
                        entry_name, entry.kind, field_type.kind
                    );
                    registry.remove_field(&entry_name);
                }
                registry.push(ExtraFieldEntry::new(entry_name, field_type.kind));
            }
        }

        let expected: HashSet<String> = documented
            .iter()
            .flat_map(|(name, field_type)| field_type.entry_names(name))
            .collect();
        let mut seen = HashSet::new();
        let dropped = registry.retain(|e| expected.contains(&e.name) && seen.insert(e.name.clone()));
        for entry in dropped {
            debug!("Dropped extra-bytes descriptor '{}' without a matching column", entry.name);
        }

        Ok(())
    }

    fn derive_layout(&mut self) -> Result<(), DatasetError> {
        let registry_bytes = match self.extra_fields_key()? {
            Some(key) => self.records[key]
                .extra_fields()
                .map_or(0, ExtraFieldsRegistry::byte_size),
            None => 0,
        };

        let record_length = self.expected_record_length(registry_bytes);
        let record_length = u16::try_from(record_length).map_err(|_| {
            DatasetError::InvariantViolation(format!(
                "record length {} exceeds {} bytes",
                record_length, MAX_RECORD_LENGTH
            ))
        })?;
        let ordinary_count = count_u32(self.ordinary.len(), "ordinary records")?;
        let extended_count = count_u32(self.extended.len(), "extended records")?;
        let payload_offset = self.expected_payload_offset();

        let header = &mut self.header;
        header.set_point_count(self.points.num_rows() as u64);
        header.set_record_length(record_length);
        header.set_ordinary_record_count(ordinary_count);
        header.set_extended_record_count(extended_count);
        header.set_payload_offset(payload_offset);
        header.recompute_extended_offset();

        debug!("Reconciled header: {}", self.header);
        Ok(())
    }

    fn expected_record_length(&self, registry_bytes: u64) -> u64 {
        u64::from(self.header.point_format().record_length())
            + registry_bytes
            + self.undocumented_width()
    }

    fn expected_payload_offset(&self) -> u64 {
        let records: u64 = self
            .ordinary
            .iter()
            .map(|key| self.records[*key].serialized_size())
            .sum();
        self.header.header_size() + self.leading_bytes.len() as u64 + records
    }

    /// Width of the opaque `undocumented_bytes` column, 0 when absent
    pub(crate) fn undocumented_width(&self) -> u64 {
        self.user_fields
            .as_ref()
            .and_then(|table| table.column_by_name(UNDOCUMENTED_BYTES))
            .and_then(|array| match array.data_type() {
                DataType::FixedSizeBinary(width) => u64::try_from(*width).ok(),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Verifies every dataset invariant from first principles.
    ///
    /// Returns the first violation found. Public operations keep these
    /// invariants, so a failure here indicates a bug.
    pub fn check_invariants(&self) -> Result<(), DatasetError> {
        let violation = |msg: String| Err(DatasetError::InvariantViolation(msg));
        let header = &self.header;
        let rows = self.points.num_rows() as u64;

        if header.point_count() != rows {
            return violation(format!("point count {} but {} rows", header.point_count(), rows));
        }
        if let Some(user) = &self.user_fields {
            if user.num_rows() as u64 != rows {
                return violation(format!("user table has {} rows, expected {}", user.num_rows(), rows));
            }
        }
        if header.ordinary_record_count() as usize != self.ordinary.len()
            || header.extended_record_count() as usize != self.extended.len()
        {
            return violation("record counts disagree with record lists".to_string());
        }

        let registry = match self.extra_fields_key()? {
            Some(key) => self.records[key].extra_fields(),
            None => None,
        };
        let registry_bytes = registry.map_or(0, ExtraFieldsRegistry::byte_size);
        if u64::from(header.record_length()) != self.expected_record_length(registry_bytes) {
            return violation(format!("record length {} is stale", header.record_length()));
        }

        if header.payload_offset() != self.expected_payload_offset() {
            return violation(format!("payload offset {} is stale", header.payload_offset()));
        }
        let extended_offset = if self.extended.is_empty() {
            0
        } else {
            header.payload_offset() + header.payload_len()
        };
        if header.extended_section_offset() != extended_offset {
            return violation(format!(
                "extended section offset {} should be {}",
                header.extended_section_offset(),
                extended_offset
            ));
        }

        let documented = self.documented_fields()?;
        let expected_entries: usize = documented.iter().map(|(_, t)| usize::from(t.dimension)).sum();
        let found_entries = registry.map_or(0, ExtraFieldsRegistry::len);
        if expected_entries != found_entries {
            return violation(format!(
                "{} user field components but {} extra-bytes descriptors",
                expected_entries, found_entries
            ));
        }
        for (name, field_type) in &documented {
            for entry_name in field_type.entry_names(name) {
                if registry.and_then(|r| r.find_typed(&entry_name, field_type.kind)).is_none() {
                    return violation(format!("user field '{}' is not documented", entry_name));
                }
            }
        }

        if validate_unit_scale(header.unit_scale()).is_err() {
            return violation(format!("unit scale {:?}", header.unit_scale()));
        }

        Ok(())
    }
}

/// Every registry entry name must belong to exactly one user column.
fn check_entry_names(documented: &[(String, FieldType)]) -> Result<(), DatasetError> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for (name, field_type) in documented {
        for entry_name in field_type.entry_names(name) {
            if let Some(owner) = owners.insert(entry_name.clone(), name) {
                return Err(DatasetError::SchemaMismatch(format!(
                    "extra field '{}' of column '{}' collides with column '{}'",
                    entry_name, name, owner
                )));
            }
        }
    }
    Ok(())
}

fn count_u32(len: usize, what: &str) -> Result<u32, DatasetError> {
    u32::try_from(len)
        .map_err(|_| DatasetError::InvariantViolation(format!("too many {}: {}", what, len)))
}
