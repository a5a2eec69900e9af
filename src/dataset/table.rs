//! Arrow helpers for the point and user-field tables.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, FixedSizeListArray, Float64Array, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

/// Builds a table from named columns. Fields are nullable so any array fits.
pub(crate) fn build_table(
    columns: Vec<(String, ArrayRef)>,
    num_rows: usize,
) -> Result<RecordBatch, ArrowError> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
        .collect();
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
}

/// Named columns of a table, in order
pub(crate) fn columns_of(batch: &RecordBatch) -> Vec<(String, ArrayRef)> {
    batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, array)| (field.name().clone(), Arc::clone(array)))
        .collect()
}

pub(crate) fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect()
}

/// Replaces the column called `name` in place, or appends it
pub(crate) fn with_column(
    batch: &RecordBatch,
    name: &str,
    array: ArrayRef,
) -> Result<RecordBatch, ArrowError> {
    let mut columns = columns_of(batch);
    match columns.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = array,
        None => columns.push((name.to_string(), array)),
    }
    build_table(columns, batch.num_rows())
}

/// Drops the column called `name`; `None` when no column is left
pub(crate) fn without_column(
    batch: &RecordBatch,
    name: &str,
) -> Result<Option<RecordBatch>, ArrowError> {
    let columns: Vec<_> = columns_of(batch)
        .into_iter()
        .filter(|(n, _)| n != name)
        .collect();
    if columns.is_empty() {
        return Ok(None);
    }
    build_table(columns, batch.num_rows()).map(Some)
}

/// Sequential 1-based point ids
pub(crate) fn id_column(num_rows: usize) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(1..=num_rows as u64))
}

/// Casts `array` to `data_type` unless it already has that type
pub(crate) fn cast_to(array: &ArrayRef, data_type: &DataType) -> Result<ArrayRef, ArrowError> {
    if array.data_type() == data_type {
        Ok(Arc::clone(array))
    } else {
        cast(array, data_type)
    }
}

/// Flattens a numeric (or boolean, or fixed-size list of those) column into doubles
pub(crate) fn numeric_values(array: &ArrayRef) -> Option<Vec<Option<f64>>> {
    match array.data_type() {
        DataType::FixedSizeList(_, _) => {
            let list = array.as_any().downcast_ref::<FixedSizeListArray>()?;
            let mut values = Vec::new();
            for i in 0..list.len() {
                values.extend(numeric_values(&list.value(i))?);
            }
            Some(values)
        }
        dt if dt.is_numeric() || *dt == DataType::Boolean => {
            let floats = cast(array, &DataType::Float64).ok()?;
            let floats = floats.as_any().downcast_ref::<Float64Array>()?;
            Some(floats.iter().collect())
        }
        _ => None,
    }
}

/// Compares the first `rows` values of two columns, numerics within `tolerance`
pub(crate) fn approx_equal(a: &ArrayRef, b: &ArrayRef, rows: usize, tolerance: f64) -> bool {
    let a = a.slice(0, rows.min(a.len()));
    let b = b.slice(0, rows.min(b.len()));

    match (numeric_values(&a), numeric_values(&b)) {
        (Some(left), Some(right)) => {
            left.len() == right.len()
                && left.iter().zip(&right).all(|pair| match pair {
                    (Some(l), Some(r)) => (l - r).abs() <= tolerance || l == r,
                    (None, None) => true,
                    _ => false,
                })
        }
        _ => a.to_data() == b.to_data(),
    }
}
