//! Error types for the version record store.
//!
//! Absence of a record is not an error: it is reported through `Option`,
//! [`Presence`](crate::record::Presence) or a `bool`. Everything here is either
//! a caller mistake (an oversized field, a store too small for the reserved
//! region) or a failure of the host-side layers (image files, configuration).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for version record operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// Text does not fit into a fixed-capacity record field.
    #[error("{field} is {len} bytes long, but the field holds at most {capacity}")]
    OversizedField {
        /// Name of the record field.
        field: &'static str,
        /// Maximum number of bytes the field holds (terminator excluded).
        capacity: usize,
        /// Length of the rejected input in bytes.
        len: usize,
    },

    /// The byte store cannot hold the reserved region.
    #[error("store holds {capacity} bytes, but the reserved region needs {required}")]
    StoreTooSmall {
        /// Capacity of the byte store.
        capacity: usize,
        /// Bytes required by the reserved region.
        required: usize,
    },

    /// Record serialization or deserialization failed.
    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),

    // === Image Errors ===
    /// Reading or writing an EEPROM image file failed.
    #[error("failed to access image {path}: {source}")]
    Io {
        /// Path to the image file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An Intel HEX image is malformed.
    #[error("Intel HEX line {line}: {message}")]
    HexParse {
        /// One-based line number.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for version record operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an I/O error bound to an image path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an Intel HEX parse error.
    #[must_use]
    pub fn hex_parse(line: usize, message: impl Into<String>) -> Self {
        Self::HexParse {
            line,
            message: message.into(),
        }
    }

    /// Check if this error is a rejected oversized field.
    #[must_use]
    pub fn is_oversized_field(&self) -> bool {
        matches!(self, Self::OversizedField { .. })
    }
}
