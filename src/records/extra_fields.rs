use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::warn;
use serde::{Deserialize, Serialize};

use super::RecordError;
use crate::schema::{ElementKind, FieldType, EXTRA_BYTES_ENTRY_SIZE, EXTRA_BYTES_NAME_LEN};

const OPTION_NO_DATA: u8 = 1 << 0;
const OPTION_MIN: u8 = 1 << 1;
const OPTION_MAX: u8 = 1 << 2;
const OPTION_SCALE: u8 = 1 << 3;
const OPTION_OFFSET: u8 = 1 << 4;

/// One extra-bytes descriptor documenting a scalar user field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFieldEntry {
    /// Field name (at most 32 bytes are serialized)
    pub name: String,
    /// Element kind of the field
    pub kind: ElementKind,
    /// Free-form description (at most 32 bytes are serialized)
    pub description: String,
    /// Value marking missing data
    pub no_data: Option<f64>,
    /// Smallest value present
    pub min: Option<f64>,
    /// Largest value present
    pub max: Option<f64>,
    /// Scale applied to raw values
    pub scale: Option<f64>,
    /// Offset applied to raw values
    pub offset: Option<f64>,
}

impl ExtraFieldEntry {
    /// Creates an undecorated descriptor
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            no_data: None,
            min: None,
            max: None,
            scale: None,
            offset: None,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the scale and offset applied to raw values
    pub fn with_scale_offset(mut self, scale: f64, offset: f64) -> Self {
        self.scale = Some(scale);
        self.offset = Some(offset);
        self
    }

    /// Bytes this field occupies in each point record
    pub fn byte_size(&self) -> u64 {
        u64::from(self.kind.byte_size())
    }

    fn options(&self) -> u8 {
        let mut options = 0;
        if self.no_data.is_some() {
            options |= OPTION_NO_DATA;
        }
        if self.min.is_some() {
            options |= OPTION_MIN;
        }
        if self.max.is_some() {
            options |= OPTION_MAX;
        }
        if self.scale.is_some() {
            options |= OPTION_SCALE;
        }
        if self.offset.is_some() {
            options |= OPTION_OFFSET;
        }
        options
    }

    /// Encodes the 192-byte descriptor.
    ///
    /// no_data/min/max are stored in the representation of the element kind;
    /// scale and offset are always doubles. Only the first of the three
    /// legacy array slots is used.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), RecordError> {
        w.write_all(&[0u8; 2])?;
        w.write_u8(self.kind.type_code())?;
        w.write_u8(self.options())?;
        write_fixed_str(w, &self.name)?;
        w.write_all(&[0u8; 4])?;
        for value in [self.no_data, self.min, self.max] {
            self.write_typed_slot(w, value)?;
        }
        for value in [self.scale, self.offset] {
            w.write_f64::<LittleEndian>(value.unwrap_or(0.0))?;
            w.write_all(&[0u8; 16])?;
        }
        write_fixed_str(w, &self.description)?;
        Ok(())
    }

    /// Decodes one descriptor
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, RecordError> {
        let mut reserved = [0u8; 2];
        r.read_exact(&mut reserved)?;
        let code = r.read_u8()?;
        let options = r.read_u8()?;
        let name = read_fixed_str(r)?;
        let mut unused = [0u8; 4];
        r.read_exact(&mut unused)?;

        let kind = ElementKind::from_type_code(code)
            .ok_or_else(|| RecordError::UnsupportedTypeCode {
                name: name.clone(),
                code,
            })?;

        let no_data = read_typed_slot(r, kind)?;
        let min = read_typed_slot(r, kind)?;
        let max = read_typed_slot(r, kind)?;
        let scale = read_double_slot(r)?;
        let offset = read_double_slot(r)?;
        let description = read_fixed_str(r)?;

        let flag = |bit: u8, value: f64| (options & bit != 0).then_some(value);
        Ok(Self {
            name,
            kind,
            description,
            no_data: flag(OPTION_NO_DATA, no_data),
            min: flag(OPTION_MIN, min),
            max: flag(OPTION_MAX, max),
            scale: flag(OPTION_SCALE, scale),
            offset: flag(OPTION_OFFSET, offset),
        })
    }

    fn write_typed_slot<W: Write>(&self, w: &mut W, value: Option<f64>) -> Result<(), RecordError> {
        let value = value.unwrap_or(0.0);
        if self.kind.is_float() {
            w.write_f64::<LittleEndian>(value)?;
        } else if self.kind.is_signed_int() {
            w.write_i64::<LittleEndian>(value as i64)?;
        } else {
            w.write_u64::<LittleEndian>(value as u64)?;
        }
        w.write_all(&[0u8; 16])?;
        Ok(())
    }
}

fn read_typed_slot<R: Read>(r: &mut R, kind: ElementKind) -> Result<f64, RecordError> {
    let value = if kind.is_float() {
        r.read_f64::<LittleEndian>()?
    } else if kind.is_signed_int() {
        r.read_i64::<LittleEndian>()? as f64
    } else {
        r.read_u64::<LittleEndian>()? as f64
    };
    let mut rest = [0u8; 16];
    r.read_exact(&mut rest)?;
    Ok(value)
}

fn read_double_slot<R: Read>(r: &mut R) -> Result<f64, RecordError> {
    let value = r.read_f64::<LittleEndian>()?;
    let mut rest = [0u8; 16];
    r.read_exact(&mut rest)?;
    Ok(value)
}

fn write_fixed_str<W: Write>(w: &mut W, s: &str) -> Result<(), RecordError> {
    let mut buf = [0u8; EXTRA_BYTES_NAME_LEN];
    let bytes = s.as_bytes();
    if bytes.len() > EXTRA_BYTES_NAME_LEN {
        warn!("Truncating extra-bytes string '{}' to {} bytes", s, EXTRA_BYTES_NAME_LEN);
    }
    let n = bytes.len().min(EXTRA_BYTES_NAME_LEN);
    buf[..n].copy_from_slice(&bytes[..n]);
    w.write_all(&buf)?;
    Ok(())
}

fn read_fixed_str<R: Read>(r: &mut R) -> Result<String, RecordError> {
    let mut buf = [0u8; EXTRA_BYTES_NAME_LEN];
    r.read_exact(&mut buf)?;
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

/// Ordered catalog of the user-defined point fields.
///
/// Every scalar user column has exactly one entry; a vector column of
/// dimension `d` has `d` entries named `"<field> [i]"`. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraFieldsRegistry {
    entries: Vec<ExtraFieldEntry>,
}

impl ExtraFieldsRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents a user field, splitting vectors into per-component entries.
    ///
    /// Returns the number of point-record bytes the new entries describe.
    pub fn add_field(&mut self, name: &str, field_type: FieldType) -> u64 {
        for entry_name in field_type.entry_names(name) {
            self.entries.push(ExtraFieldEntry::new(entry_name, field_type.kind));
        }
        field_type.byte_size()
    }

    /// Appends a prepared descriptor
    pub fn push(&mut self, entry: ExtraFieldEntry) {
        self.entries.push(entry);
    }

    /// Removes every entry called `name`, returning the bytes they described
    pub fn remove_field(&mut self, name: &str) -> u64 {
        self.remove_where(|e| e.name == name)
    }

    /// Removes the entry called `name` only when it has element kind `kind`
    pub fn remove_field_typed(&mut self, name: &str, kind: ElementKind) -> u64 {
        self.remove_where(|e| e.name == name && e.kind == kind)
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&ExtraFieldEntry) -> bool) -> Vec<ExtraFieldEntry> {
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| keep(e));
        self.entries = kept;
        removed
    }

    fn remove_where(&mut self, matches: impl Fn(&ExtraFieldEntry) -> bool) -> u64 {
        self.retain(|e| !matches(e))
            .iter()
            .map(ExtraFieldEntry::byte_size)
            .sum()
    }

    /// Entry called `name`
    pub fn find(&self, name: &str) -> Option<&ExtraFieldEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut ExtraFieldEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Entry called `name` with element kind `kind`
    pub fn find_typed(&self, name: &str, kind: ElementKind) -> Option<&ExtraFieldEntry> {
        self.entries.iter().find(|e| e.name == name && e.kind == kind)
    }

    /// All entries in order
    pub fn entries(&self) -> &[ExtraFieldEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry documents nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point-record bytes described by all entries
    pub fn byte_size(&self) -> u64 {
        self.entries.iter().map(ExtraFieldEntry::byte_size).sum()
    }

    /// Serialized payload size
    pub fn payload_size(&self) -> u64 {
        self.entries.len() as u64 * EXTRA_BYTES_ENTRY_SIZE
    }

    /// Encodes every descriptor back to back
    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        let mut buf = Vec::with_capacity(self.payload_size() as usize);
        for entry in &self.entries {
            entry.write_to(&mut buf)?;
        }
        Ok(buf)
    }

    /// Decodes an extra-bytes payload
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let entry_size = EXTRA_BYTES_ENTRY_SIZE as usize;
        if bytes.len() % entry_size != 0 {
            return Err(RecordError::InvalidPayloadLength(bytes.len()));
        }

        let mut cursor = Cursor::new(bytes);
        let mut entries = Vec::with_capacity(bytes.len() / entry_size);
        for _ in 0..bytes.len() / entry_size {
            entries.push(ExtraFieldEntry::read_from(&mut cursor)?);
        }
        Ok(Self { entries })
    }
}
