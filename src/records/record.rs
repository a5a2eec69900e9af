use serde::{Deserialize, Serialize};

use super::{ExtraFieldsRegistry, RecordError};
use crate::schema::{
    EXTENDED_RECORD_HEADER_SIZE, EXTRA_BYTES_DESCRIPTION, EXTRA_BYTES_RECORD_ID,
    LASF_SPEC_USER_ID, ORDINARY_RECORD_HEADER_SIZE,
};

/// Typed payload of a variable-length record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordPayload {
    /// Bytes this crate does not interpret
    Opaque(Vec<u8>),
    /// Extra-bytes descriptors documenting the user fields
    ExtraFields(ExtraFieldsRegistry),
    /// Null-terminated ASCII text (WKT, text area descriptions)
    Text(String),
}

impl RecordPayload {
    /// Serialized payload length in bytes
    pub fn len(&self) -> u64 {
        match self {
            Self::Opaque(bytes) => bytes.len() as u64,
            Self::ExtraFields(registry) => registry.payload_size(),
            Self::Text(text) => text.len() as u64 + 1,
        }
    }

    /// Whether the payload serializes to zero bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized payload bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        match self {
            Self::Opaque(bytes) => Ok(bytes.clone()),
            Self::ExtraFields(registry) => registry.encode(),
            Self::Text(text) => {
                let mut bytes = Vec::with_capacity(text.len() + 1);
                bytes.extend_from_slice(text.as_bytes());
                bytes.push(0);
                Ok(bytes)
            }
        }
    }
}

/// A variable-length record stored before (ordinary) or after (extended) the point payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    user_id: String,
    record_id: u16,
    description: String,
    is_extended: bool,
    superseded: bool,
    payload: RecordPayload,
}

impl MetadataRecord {
    /// Creates an ordinary record
    pub fn new(
        user_id: impl Into<String>,
        record_id: u16,
        description: impl Into<String>,
        payload: RecordPayload,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            record_id,
            description: description.into(),
            is_extended: false,
            superseded: false,
            payload,
        }
    }

    /// Creates an extended record
    pub fn extended(
        user_id: impl Into<String>,
        record_id: u16,
        description: impl Into<String>,
        payload: RecordPayload,
    ) -> Self {
        Self {
            is_extended: true,
            ..Self::new(user_id, record_id, description, payload)
        }
    }

    /// Creates the extra-bytes record hosting `registry`
    pub fn extra_bytes(registry: ExtraFieldsRegistry) -> Self {
        Self::new(
            LASF_SPEC_USER_ID,
            EXTRA_BYTES_RECORD_ID,
            EXTRA_BYTES_DESCRIPTION,
            RecordPayload::ExtraFields(registry),
        )
    }

    /// Namespace of the record
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Numeric id within the namespace
    pub fn record_id(&self) -> u16 {
        self.record_id
    }

    /// Description text
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this is an extended record
    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// Whether the record has been superseded
    pub fn is_superseded(&self) -> bool {
        self.superseded
    }

    /// Flags the record as superseded; serialization decides what that means
    pub fn mark_superseded(&mut self) {
        self.superseded = true;
    }

    /// Record payload
    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }

    /// Extra-fields registry carried by an ordinary extra-bytes record
    pub fn extra_fields(&self) -> Option<&ExtraFieldsRegistry> {
        match (&self.payload, self.is_extended) {
            (RecordPayload::ExtraFields(registry), false) => Some(registry),
            _ => None,
        }
    }

    pub(crate) fn extra_fields_mut(&mut self) -> Option<&mut ExtraFieldsRegistry> {
        match (&mut self.payload, self.is_extended) {
            (RecordPayload::ExtraFields(registry), false) => Some(registry),
            _ => None,
        }
    }

    /// Whether the namespace/id pair is the one reserved for extra bytes
    pub fn has_extra_bytes_id(&self) -> bool {
        self.user_id == LASF_SPEC_USER_ID && self.record_id == EXTRA_BYTES_RECORD_ID
    }

    /// Turns an opaque extra-bytes payload into a typed registry.
    ///
    /// Records outside the reserved namespace/id pair are left untouched.
    pub fn decode_known_payload(&mut self) -> Result<(), RecordError> {
        if self.is_extended || !self.has_extra_bytes_id() {
            return Ok(());
        }
        if let RecordPayload::Opaque(bytes) = &self.payload {
            self.payload = RecordPayload::ExtraFields(ExtraFieldsRegistry::decode(bytes)?);
        }
        Ok(())
    }

    /// Size of the fixed record header
    pub fn header_size(&self) -> u64 {
        if self.is_extended {
            EXTENDED_RECORD_HEADER_SIZE
        } else {
            ORDINARY_RECORD_HEADER_SIZE
        }
    }

    /// Serialized payload length
    pub fn payload_size(&self) -> u64 {
        self.payload.len()
    }

    /// Bytes the record occupies in the file, header included
    pub fn serialized_size(&self) -> u64 {
        self.header_size() + self.payload_size()
    }

    /// Serialized payload bytes
    pub fn payload_bytes(&self) -> Result<Vec<u8>, RecordError> {
        self.payload.to_bytes()
    }
}
