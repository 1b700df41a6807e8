//! Error types for featurizer operations.
//!
//! Every fallible operation in the workspace returns [`FeaturizerError`].
//! Archive decoding failures are described in detail by [`FormatError`] and
//! chain into `FeaturizerError::Format` via `thiserror`.

use thiserror::Error;

/// Result type alias used throughout the featurizer crates.
pub type Result<T> = core::result::Result<T, FeaturizerError>;

/// Errors raised by values, archives, estimators, and transformers.
#[derive(Debug, Error)]
pub enum FeaturizerError {
    /// The operation is not valid in the current lifecycle phase.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A documented precondition was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Data required by the algorithm is absent (empty stream, null unwrap).
    #[error("Data error: {0}")]
    Data(String),

    /// Archive bytes could not be decoded.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The conversion is deliberately unsupported for this type.
    #[error("{0}")]
    NotImplemented(&'static str),
}

impl FeaturizerError {
    /// Create an invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a data error.
    #[must_use]
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Error returned by `from_text` on composite types.
    #[must_use]
    pub fn not_implemented() -> Self {
        Self::NotImplemented("Not Implemented Yet")
    }
}

/// Errors that can occur while decoding archive bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes remain than the next value needs.
    #[error("Insufficient data: need {needed} bytes, {remaining} remaining")]
    InsufficientData {
        /// Bytes needed by the read.
        needed: usize,
        /// Bytes left in the archive.
        remaining: usize,
    },

    /// The archive was written with a major version this reader does not know.
    #[error("Unsupported archive version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version found in the archive.
        major: u16,
        /// Minor version found in the archive.
        minor: u16,
    },

    /// Bytes were left over after the top-level value was decoded.
    #[error("Archive has {remaining} unconsumed trailing bytes")]
    TrailingBytes {
        /// Bytes not consumed.
        remaining: usize,
    },

    /// A string payload was not valid UTF-8.
    #[error("Invalid UTF-8 string data")]
    InvalidUtf8,

    /// A boolean byte was neither 0 nor 1.
    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    /// An enum discriminant byte did not name a known variant.
    #[error("Invalid {kind} tag: {tag}")]
    InvalidTag {
        /// Enum being decoded.
        kind: &'static str,
        /// Byte found in the archive.
        tag: u8,
    },

    /// A timestamp payload was outside the representable range.
    #[error("Invalid timestamp: {seconds}s + {nanos}ns")]
    InvalidTimestamp {
        /// Seconds since the Unix epoch.
        seconds: i64,
        /// Sub-second nanoseconds.
        nanos: u32,
    },

    /// A length does not fit in the 32-bit length prefix.
    #[error("Length {0} exceeds the archive length prefix")]
    LengthOverflow(usize),

    /// Decoded matrix dimensions do not match the element data.
    #[error("Matrix shape mismatch: {rows}x{cols}")]
    ShapeMismatch {
        /// Rows read from the archive.
        rows: usize,
        /// Columns read from the archive.
        cols: usize,
    },
}
