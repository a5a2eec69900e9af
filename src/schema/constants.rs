/// Size of the variable-length record header preceding each ordinary record payload
pub const ORDINARY_RECORD_HEADER_SIZE: u64 = 54;

/// Size of the extended variable-length record header
pub const EXTENDED_RECORD_HEADER_SIZE: u64 = 60;

/// Size of one extra-bytes descriptor inside the extra-bytes record payload
pub const EXTRA_BYTES_ENTRY_SIZE: u64 = 192;

/// Namespace (user ID) reserved by the LAS specification
pub const LASF_SPEC_USER_ID: &str = "LASF_Spec";

/// Record ID of the extra-bytes record within the `LASF_Spec` namespace
pub const EXTRA_BYTES_RECORD_ID: u16 = 4;

/// Description written into newly created extra-bytes records
pub const EXTRA_BYTES_DESCRIPTION: &str = "Extra Bytes";

/// Maximum byte length of a record namespace (user ID) field
pub const USER_ID_LEN: usize = 16;

/// Maximum byte length of a record description field
pub const RECORD_DESCRIPTION_LEN: usize = 32;

/// Byte length of the name and description fields of an extra-bytes descriptor
pub const EXTRA_BYTES_NAME_LEN: usize = 32;

/// Largest point record length representable in the header (bytes)
pub const MAX_RECORD_LENGTH: u64 = u16::MAX as u64;

/// Generating software written to headers built by this crate
pub const GENERATING_SOFTWARE: &str = concat!("lasframe v", env!("CARGO_PKG_VERSION"));
