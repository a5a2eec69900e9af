//! # Point Format Schema Registry
//!
//! This module maps LAS point data record formats onto their standard fields
//! and describes the element types user-defined ("extra bytes") fields may take.
//!
//! ## Point Formats
//!
//! | Format | Record bytes | Adds |
//! |--------|--------------|------|
//! | 0 | 20 | core fields |
//! | 1 | 28 | gps_time |
//! | 2 | 26 | red, green, blue |
//! | 3 | 34 | gps_time, RGB |
//! | 4 | 57 | gps_time, waveform |
//! | 5 | 63 | gps_time, RGB, waveform |
//! | 6 | 30 | 1.4 core fields, gps_time |
//! | 7 | 36 | 6 + RGB |
//! | 8 | 38 | 7 + nir |
//! | 9 | 59 | 6 + waveform |
//! | 10 | 67 | 8 + waveform |
//!
//! Coordinates are held as scaled `Float64` values in memory regardless of
//! their on-disk integer encoding; the sizes above are on-disk sizes.
//!
//! ## Extra Fields
//!
//! User fields are limited to the ten numeric LAS element kinds plus booleans
//! stored as unsigned chars ([`ElementKind`]), or fixed-size vectors of one
//! ([`FieldType`]). A vector
//! field named `normal` of dimension 3 is documented as `normal [0]`,
//! `normal [1]` and `normal [2]`.

/// Point table column name constants.
pub mod columns;
mod constants;
mod field_type;
mod formats;

#[cfg(test)]
mod tests;

pub use columns::*;
pub use constants::*;
pub use field_type::{split_field_names, ElementKind, FieldType};
pub use formats::{format_id_for, is_standard_field, PointFormat, StandardField, MAX_POINT_FORMAT};
