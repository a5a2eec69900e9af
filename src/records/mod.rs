//! # Variable-Length Records
//!
//! [`MetadataRecord`] models the variable-length records that sit between the
//! public header and the point payload (ordinary records) or after the payload
//! (extended records). Payloads are a closed set of variants ([`RecordPayload`]);
//! the extra-bytes record carries an [`ExtraFieldsRegistry`] describing every
//! user-defined point field.
//!
//! ## Sizes
//!
//! ```text
//! ordinary record  = 54-byte header + payload
//! extended record  = 60-byte header + payload
//! extra-bytes      = 192 bytes per descriptor
//! ```

mod error;
mod extra_fields;
mod record;


pub use error::RecordError;
pub use extra_fields::{ExtraFieldEntry, ExtraFieldsRegistry};
pub use record::{MetadataRecord, RecordPayload};
