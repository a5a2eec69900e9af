/// Errors that can occur while encoding or decoding record payloads
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// I/O error while reading or writing payload bytes
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Extra-bytes payload is not a whole number of descriptors
    #[error("Extra-bytes payload of {0} bytes is not a multiple of the descriptor size")]
    InvalidPayloadLength(usize),

    /// Descriptor uses a type code without a supported element kind
    #[error("Extra-bytes descriptor '{name}' has unsupported data type code {code}")]
    UnsupportedTypeCode {
        /// Descriptor name
        name: String,
        /// Raw LAS data type code
        code: u8,
    },
}
