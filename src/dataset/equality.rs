use std::collections::HashSet;

use arrow::record_batch::RecordBatch;

use super::table::{approx_equal, column_names};
use super::Dataset;
use crate::records::MetadataRecord;

/// Absolute tolerance for comparing column values
const VALUE_TOLERANCE: f64 = 1e-6;

impl PartialEq for Dataset {
    /// Headers and leading bytes compare exactly; tables by column-name set and
    /// approximate values; record lists as unordered collections.
    ///
    /// The header comparison includes the creation date, so datasets built
    /// from fresh [`HeaderModel::new`](crate::header::HeaderModel::new)
    /// headers on different days are not equal.
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.leading_bytes == other.leading_bytes
            && tables_match(&self.points, &other.points)
            && match (&self.user_fields, &other.user_fields) {
                (Some(a), Some(b)) => tables_match(a, b),
                (None, None) => true,
                _ => false,
            }
            && records_match(
                self.ordinary_records().map(|(_, r)| r).collect(),
                other.ordinary_records().map(|(_, r)| r).collect(),
            )
            && records_match(
                self.extended_records().map(|(_, r)| r).collect(),
                other.extended_records().map(|(_, r)| r).collect(),
            )
    }
}

fn tables_match(a: &RecordBatch, b: &RecordBatch) -> bool {
    let names: HashSet<String> = column_names(a).into_iter().collect();
    if names != column_names(b).into_iter().collect::<HashSet<_>>() {
        return false;
    }

    let rows = a.num_rows().min(b.num_rows());
    names.iter().all(|name| {
        match (a.column_by_name(name), b.column_by_name(name)) {
            (Some(left), Some(right)) => approx_equal(left, right, rows, VALUE_TOLERANCE),
            _ => false,
        }
    })
}

fn records_match(a: Vec<&MetadataRecord>, b: Vec<&MetadataRecord>) -> bool {
    a.iter().all(|r| b.contains(r)) && b.iter().all(|r| a.contains(r))
}
