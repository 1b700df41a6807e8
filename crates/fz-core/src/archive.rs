//! Versioned binary archive.
//!
//! An [`Archive`] is either a write archive (append-only, finished with
//! [`Archive::commit`]) or a read archive (sequential consume over a byte
//! buffer). Values are encoded through [`Traits::serialize`] and decoded
//! through [`Traits::deserialize`]; scalars are fixed-width little-endian and
//! variable-length data carries a `u32` length prefix.
//!
//! # Example
//!
//! ```rust
//! use fz_core::archive::Archive;
//!
//! let mut out = Archive::new();
//! out.serialize(&vec![1i32, 2, 3]).unwrap();
//! out.serialize(&String::from("grain")).unwrap();
//!
//! let mut input = Archive::from_bytes(out.commit().unwrap());
//! assert_eq!(input.deserialize::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
//! assert_eq!(input.deserialize::<String>().unwrap(), "grain");
//! assert!(input.at_end());
//! ```

use byteorder::{ByteOrder, LittleEndian};
use tracing::{trace, warn};

use crate::error::{FeaturizerError, FormatError, Result};
use crate::traits::Traits;

/// `(major, minor)` version stamped at the start of persisted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveVersion {
    /// Incompatible layout changes bump the major version.
    pub major: u16,
    /// Compatible additions bump the minor version.
    pub minor: u16,
}

impl ArchiveVersion {
    /// Create a version pair.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl core::fmt::Display for ArchiveVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Serializing,
    Deserializing,
}

/// Byte-oriented serialization container with a write or a read cursor.
#[derive(Clone, Debug)]
pub struct Archive {
    mode: Mode,
    buffer: Vec<u8>,
    position: usize,
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! fixed_width_io {
    ($($write:ident, $read:ident, $ty:ty, $width:expr, $encode:expr, $decode:expr;)*) => {
        $(
            #[doc = concat!("Append a little-endian `", stringify!($ty), "`.")]
            pub fn $write(&mut self, value: $ty) -> Result<()> {
                let mut bytes = [0u8; $width];
                $encode(&mut bytes[..], value);
                self.write_bytes(&bytes)
            }

            #[doc = concat!("Consume a little-endian `", stringify!($ty), "`.")]
            pub fn $read(&mut self) -> Result<$ty> {
                let bytes = self.read_bytes($width)?;
                Ok($decode(bytes))
            }
        )*
    };
}

impl Archive {
    /// Create an empty write archive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: Mode::Serializing,
            buffer: Vec::new(),
            position: 0,
        }
    }

    /// Create a read archive that owns `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            mode: Mode::Deserializing,
            buffer: bytes,
            position: 0,
        }
    }

    /// Create a read archive over a copy of `bytes`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes.to_vec())
    }

    /// Returns `true` for a write archive.
    #[must_use]
    pub fn is_serializing(&self) -> bool {
        self.mode == Mode::Serializing
    }

    /// Returns `true` for a read archive.
    #[must_use]
    pub fn is_deserializing(&self) -> bool {
        self.mode == Mode::Deserializing
    }

    /// Encode `value` at the end of a write archive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on a read archive, or an encoding error from the
    /// value's [`Traits::serialize`].
    pub fn serialize<T: Traits>(&mut self, value: &T) -> Result<()> {
        self.ensure_mode(Mode::Serializing)?;
        value.serialize(self)
    }

    /// Decode the next value from a read archive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on a write archive, or a [`FormatError`] when the
    /// remaining bytes do not hold a valid `T`.
    pub fn deserialize<T: Traits>(&mut self) -> Result<T> {
        self.ensure_mode(Mode::Deserializing)?;
        T::deserialize(self)
    }

    /// Finish a write archive and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when called on a read archive.
    pub fn commit(self) -> Result<Vec<u8>> {
        self.ensure_mode(Mode::Serializing)?;
        Ok(self.buffer)
    }

    /// Returns `true` once every byte of a read archive has been consumed.
    ///
    /// Callers must check this after a top-level decode to detect trailing
    /// garbage. A write archive is never at end.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.is_deserializing() && self.position == self.buffer.len()
    }

    /// Number of unread bytes in a read archive.
    #[must_use]
    pub fn remaining(&self) -> usize {
        match self.mode {
            Mode::Deserializing => self.buffer.len() - self.position,
            Mode::Serializing => 0,
        }
    }

    /// Number of bytes written so far (or total size of a read archive).
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the archive holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Fail with [`FormatError::TrailingBytes`] unless the archive is fully read.
    ///
    /// # Errors
    ///
    /// Returns a format error if unread bytes remain.
    pub fn ensure_at_end(&self) -> Result<()> {
        self.ensure_mode(Mode::Deserializing)?;
        if self.at_end() {
            Ok(())
        } else {
            Err(FormatError::TrailingBytes {
                remaining: self.remaining(),
            }
            .into())
        }
    }

    /// Write a `(major, minor)` version header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on a read archive.
    pub fn write_version(&mut self, version: ArchiveVersion) -> Result<()> {
        self.write_u16(version.major)?;
        self.write_u16(version.minor)
    }

    /// Read a version header and check its major version.
    ///
    /// Any minor version is accepted for a supported major version.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnsupportedVersion`] when the major version is
    /// not `supported_major`.
    pub fn read_version(&mut self, supported_major: u16) -> Result<ArchiveVersion> {
        let major = self.read_u16()?;
        let minor = self.read_u16()?;

        if major != supported_major {
            warn!(major, minor, supported_major, "rejecting archive with unsupported version");
            return Err(FormatError::UnsupportedVersion { major, minor }.into());
        }

        trace!(major, minor, "read archive version");
        Ok(ArchiveVersion { major, minor })
    }

    /// Append raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on a read archive.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_mode(Mode::Serializing)?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Consume `count` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InsufficientData`] if fewer bytes remain. The
    /// cursor does not move on failure.
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        self.ensure_mode(Mode::Deserializing)?;

        let remaining = self.remaining();
        if count > remaining {
            return Err(FormatError::InsufficientData {
                needed: count,
                remaining,
            }
            .into());
        }

        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    /// Write a `u32` length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::LengthOverflow`] for lengths above `u32::MAX`.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| FormatError::LengthOverflow(len))?;
        self.write_u32(len)
    }

    /// Read a `u32` length prefix.
    ///
    /// # Errors
    ///
    /// Returns a format error if the prefix cannot be read.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Write a boolean as a single `0`/`1` byte.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on a read archive.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Read a boolean byte.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidBool`] for bytes other than `0` or `1`.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::InvalidBool(other).into()),
        }
    }

    fixed_width_io! {
        write_u8, read_u8, u8, 1, |b: &mut [u8], v: u8| b[0] = v, |b: &[u8]| b[0];
        write_i8, read_i8, i8, 1, |b: &mut [u8], v: i8| b[0] = v as u8, |b: &[u8]| b[0] as i8;
        write_u16, read_u16, u16, 2, LittleEndian::write_u16, LittleEndian::read_u16;
        write_i16, read_i16, i16, 2, LittleEndian::write_i16, LittleEndian::read_i16;
        write_u32, read_u32, u32, 4, LittleEndian::write_u32, LittleEndian::read_u32;
        write_i32, read_i32, i32, 4, LittleEndian::write_i32, LittleEndian::read_i32;
        write_u64, read_u64, u64, 8, LittleEndian::write_u64, LittleEndian::read_u64;
        write_i64, read_i64, i64, 8, LittleEndian::write_i64, LittleEndian::read_i64;
        write_f32, read_f32, f32, 4, LittleEndian::write_f32, LittleEndian::read_f32;
        write_f64, read_f64, f64, 8, LittleEndian::write_f64, LittleEndian::read_f64;
    }

    fn ensure_mode(&self, expected: Mode) -> Result<()> {
        if self.mode == expected {
            return Ok(());
        }

        Err(FeaturizerError::invalid_state(match expected {
            Mode::Serializing => "archive is not in serialization mode",
            Mode::Deserializing => "archive is not in deserialization mode",
        }))
    }
}
