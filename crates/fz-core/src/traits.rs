//! Per-type value traits.
//!
//! [`Traits`] gives every supported value type a single, compile-time choice
//! of nullable representation together with its text form, key equality,
//! archive encoding, and key hash. Floating-point types use NaN as their
//! native null; every other type is wrapped in `Option`.
//!
//! Scalar implementations live here. Containers, tuples, and matrices are in
//! [`containers`](crate::containers).
//!
//! # Example
//!
//! ```rust
//! use fz_core::Traits;
//!
//! let null = <f64 as Traits>::create_null_value();
//! assert!(<f64 as Traits>::is_null(&null));
//!
//! let value = 7i32.into_nullable();
//! assert_eq!(<i32 as Traits>::get_nullable_value(&value).unwrap(), 7);
//! assert_eq!(3.5f64.to_text(), "3.500000");
//! ```

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use core::num::IntErrorKind;

use crate::archive::Archive;
use crate::error::{FeaturizerError, FormatError, Result};
use crate::hash::murmur3_32;

/// Behaviour shared by every value type that flows through a featurizer.
pub trait Traits: Sized + Clone + PartialEq {
    /// Representation of "value or absence" for this type.
    type Nullable: Clone;

    /// Type produced by unwrapping a non-null [`Traits::Nullable`].
    type Value;

    /// True for integer and floating-point scalars only.
    const IS_INT_OR_NUMERIC: bool = false;

    /// True when the type carries its own null sentinel.
    const IS_NATIVE_NULLABLE: bool = false;

    /// Create the null value of the nullable representation.
    fn create_null_value() -> Self::Nullable;

    /// Returns `true` if `value` is null.
    fn is_null(value: &Self::Nullable) -> bool;

    /// Unwrap a nullable value.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::Data`] when `value` is null.
    fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value>;

    /// Lift a value into the nullable representation.
    fn into_nullable(self) -> Self::Nullable;

    /// Canonical text form, with no whitespace between elements.
    fn to_text(&self) -> String;

    /// Parse the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for unparsable or out-of-range text and
    /// `NotImplemented` for composite types.
    fn from_text(text: &str) -> Result<Self>;

    /// Equality used for hashing and grouping.
    #[must_use]
    fn key_equal(a: &Self, b: &Self) -> bool {
        a == b
    }

    /// Append the binary encoding of `self` to a write archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is not writable or a length overflows.
    fn serialize(&self, archive: &mut Archive) -> Result<()>;

    /// Decode a value from a read archive.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when the bytes do not hold a valid value.
    fn deserialize(archive: &mut Archive) -> Result<Self>;

    /// MurmurHash3 (x86, 32-bit) of the value, consistent with
    /// [`Traits::key_equal`].
    #[must_use]
    fn hash_key(&self, seed: u32) -> u32;
}

fn invalid_conversion() -> FeaturizerError {
    FeaturizerError::invalid_argument("Invalid conversion")
}

/// `-` followed by decimal digits, which no unsigned type can hold.
fn is_negative_integer(text: &str) -> bool {
    text.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

const TIMESTAMP_FORMAT_ERROR: &str = "Date time string is not in valid ISO 8601 form!";

/// Parse `YYYY-MM-DDTHH:MM:SS[.fff]` followed by `Z` or `±HH:MM`.
///
/// Separators and the zone designator are matched exactly, so a space
/// separator, lowercase `t`/`z`, a missing zone or `±HHMM` are rejected.
/// Leap seconds are rejected as well.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    const DIGITS: [usize; 14] = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];

    let bytes = text.as_bytes();
    if !text.is_ascii() || bytes.len() < 20 {
        return None;
    }
    let separators_ok = bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'T'
        && bytes[13] == b':'
        && bytes[16] == b':';
    if !separators_ok || !DIGITS.iter().all(|&i| bytes[i].is_ascii_digit()) {
        return None;
    }

    let rest = &text[19..];
    let zone = match rest.strip_prefix('.') {
        Some(fraction) => {
            let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            &fraction[digits..]
        }
        None => rest,
    };
    let zone = zone.as_bytes();
    let zone_ok = zone == b"Z"
        || (zone.len() == 6
            && matches!(zone[0], b'+' | b'-')
            && zone[3] == b':'
            && [1, 2, 4, 5].iter().all(|&i| zone[i].is_ascii_digit()));
    if !zone_ok {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(text).ok()?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(parsed.with_timezone(&Utc))
}

// ============================================================================
// Integers
// ============================================================================

macro_rules! impl_traits_for_int {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Traits for $ty {
                type Nullable = Option<$ty>;
                type Value = $ty;

                const IS_INT_OR_NUMERIC: bool = true;

                fn create_null_value() -> Self::Nullable {
                    None
                }

                fn is_null(value: &Self::Nullable) -> bool {
                    value.is_none()
                }

                fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
                    value.ok_or_else(null_optional)
                }

                fn into_nullable(self) -> Self::Nullable {
                    Some(self)
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn from_text(text: &str) -> Result<Self> {
                    text.parse::<$ty>().map_err(|err| match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => invalid_conversion(),
                        IntErrorKind::InvalidDigit if <$ty>::MIN == 0 && is_negative_integer(text) => {
                            invalid_conversion()
                        }
                        _ => FeaturizerError::invalid_argument(format!(
                            "'{text}' is not a valid {}",
                            stringify!($ty)
                        )),
                    })
                }

                fn serialize(&self, archive: &mut Archive) -> Result<()> {
                    archive.$write(*self)
                }

                fn deserialize(archive: &mut Archive) -> Result<Self> {
                    archive.$read()
                }

                fn hash_key(&self, seed: u32) -> u32 {
                    murmur3_32(&self.to_le_bytes(), seed)
                }
            }
        )*
    };
}

impl_traits_for_int! {
    i8 => write_i8, read_i8;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
}

pub(crate) fn null_optional() -> FeaturizerError {
    FeaturizerError::data("GetNullableValue attempt on a null optional type.")
}

// ============================================================================
// Floats
// ============================================================================

macro_rules! impl_traits_for_float {
    ($($ty:ty => $write:ident, $read:ident, $label:literal);* $(;)?) => {
        $(
            impl Traits for $ty {
                type Nullable = $ty;
                type Value = $ty;

                const IS_INT_OR_NUMERIC: bool = true;
                const IS_NATIVE_NULLABLE: bool = true;

                fn create_null_value() -> Self::Nullable {
                    <$ty>::NAN
                }

                fn is_null(value: &Self::Nullable) -> bool {
                    value.is_nan()
                }

                fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
                    if value.is_nan() {
                        Err(FeaturizerError::data(concat!(
                            "GetNullableValue attempt on a ",
                            $label,
                            " NaN."
                        )))
                    } else {
                        Ok(*value)
                    }
                }

                fn into_nullable(self) -> Self::Nullable {
                    self
                }

                fn to_text(&self) -> String {
                    if self.is_nan() {
                        String::from("NaN")
                    } else {
                        format!("{:.6}", self)
                    }
                }

                fn from_text(text: &str) -> Result<Self> {
                    let value = text.parse::<$ty>().map_err(|_| {
                        FeaturizerError::invalid_argument(format!(
                            "'{text}' is not a valid {}",
                            stringify!($ty)
                        ))
                    })?;
                    // Finite literals that overflow parse to infinity.
                    if value.is_infinite() && !is_infinity_literal(text) {
                        return Err(invalid_conversion());
                    }
                    Ok(value)
                }

                fn key_equal(a: &Self, b: &Self) -> bool {
                    a == b || (a.is_nan() && b.is_nan())
                }

                fn serialize(&self, archive: &mut Archive) -> Result<()> {
                    archive.$write(*self)
                }

                fn deserialize(archive: &mut Archive) -> Result<Self> {
                    archive.$read()
                }

                fn hash_key(&self, seed: u32) -> u32 {
                    // Values that compare key-equal must hash equally.
                    let canonical = if self.is_nan() {
                        <$ty>::NAN
                    } else if *self == 0.0 {
                        0.0
                    } else {
                        *self
                    };
                    murmur3_32(&canonical.to_le_bytes(), seed)
                }
            }
        )*
    };
}

impl_traits_for_float! {
    f32 => write_f32, read_f32, "float_t";
    f64 => write_f64, read_f64, "double_t";
}

// ============================================================================
// bool / String
// ============================================================================

impl Traits for bool {
    type Nullable = Option<bool>;
    type Value = bool;

    fn create_null_value() -> Self::Nullable {
        None
    }

    fn is_null(value: &Self::Nullable) -> bool {
        value.is_none()
    }

    fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
        value.ok_or_else(null_optional)
    }

    fn into_nullable(self) -> Self::Nullable {
        Some(self)
    }

    fn to_text(&self) -> String {
        String::from(if *self { "True" } else { "False" })
    }

    fn from_text(text: &str) -> Result<Self> {
        match text {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            _ => Err(FeaturizerError::invalid_argument(format!(
                "'{text}' is not a valid bool"
            ))),
        }
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_bool(*self)
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        archive.read_bool()
    }

    fn hash_key(&self, seed: u32) -> u32 {
        murmur3_32(&[u8::from(*self)], seed)
    }
}

impl Traits for String {
    type Nullable = Option<String>;
    type Value = String;

    fn create_null_value() -> Self::Nullable {
        None
    }

    fn is_null(value: &Self::Nullable) -> bool {
        value.is_none()
    }

    fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
        value.clone().ok_or_else(null_optional)
    }

    fn into_nullable(self) -> Self::Nullable {
        Some(self)
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_owned())
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_len(self.len())?;
        archive.write_bytes(self.as_bytes())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        let len = archive.read_len()?;
        let bytes = archive.read_bytes(len)?;
        core::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| FormatError::InvalidUtf8.into())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        // Hash covers a trailing NUL byte.
        let mut bytes = Vec::with_capacity(self.len() + 1);
        bytes.extend_from_slice(self.as_bytes());
        bytes.push(0);
        murmur3_32(&bytes, seed)
    }
}

// ============================================================================
// Option<T>
// ============================================================================

impl<T: Traits> Traits for Option<T> {
    type Nullable = Option<T>;
    type Value = T;

    fn create_null_value() -> Self::Nullable {
        None
    }

    fn is_null(value: &Self::Nullable) -> bool {
        value.is_none()
    }

    fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
        value.clone().ok_or_else(null_optional)
    }

    fn into_nullable(self) -> Self::Nullable {
        self
    }

    fn to_text(&self) -> String {
        match self {
            Some(value) => value.to_text(),
            None => String::from("NULL"),
        }
    }

    fn from_text(_text: &str) -> Result<Self> {
        Err(FeaturizerError::not_implemented())
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => T::key_equal(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_bool(self.is_some())?;
        match self {
            Some(value) => value.serialize(archive),
            None => Ok(()),
        }
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        if archive.read_bool()? {
            Ok(Some(T::deserialize(archive)?))
        } else {
            Ok(None)
        }
    }

    fn hash_key(&self, seed: u32) -> u32 {
        match self {
            Some(value) => value.hash_key(seed),
            None => murmur3_32(&[], seed),
        }
    }
}

// ============================================================================
// Timestamps
// ============================================================================

impl Traits for DateTime<Utc> {
    type Nullable = Option<DateTime<Utc>>;
    type Value = DateTime<Utc>;

    fn create_null_value() -> Self::Nullable {
        None
    }

    fn is_null(value: &Self::Nullable) -> bool {
        value.is_none()
    }

    fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
        value.ok_or_else(null_optional)
    }

    fn into_nullable(self) -> Self::Nullable {
        Some(self)
    }

    fn to_text(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn from_text(text: &str) -> Result<Self> {
        parse_timestamp(text).ok_or_else(|| FeaturizerError::invalid_argument(TIMESTAMP_FORMAT_ERROR))
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_i64(self.timestamp())?;
        archive.write_u32(self.timestamp_subsec_nanos())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        let seconds = archive.read_i64()?;
        let nanos = archive.read_u32()?;
        DateTime::<Utc>::from_timestamp(seconds, nanos)
            .ok_or_else(|| FormatError::InvalidTimestamp { seconds, nanos }.into())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        let mut bytes = [0u8; 12];
        bytes[..8].copy_from_slice(&self.timestamp().to_le_bytes());
        bytes[8..].copy_from_slice(&self.timestamp_subsec_nanos().to_le_bytes());
        murmur3_32(&bytes, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn roundtrip<T: Traits + core::fmt::Debug>(value: T) {
        let mut out = Archive::new();
        out.serialize(&value).unwrap();
        let mut input = Archive::from_bytes(out.commit().unwrap());
        let other: T = input.deserialize().unwrap();
        assert!(input.at_end());
        assert!(T::key_equal(&value, &other), "{value:?} != {other:?}");
    }

    #[test]
    fn test_nullable_representations() {
        assert!(<f32 as Traits>::IS_NATIVE_NULLABLE);
        assert!(<f64 as Traits>::IS_NATIVE_NULLABLE);
        assert!(!<i32 as Traits>::IS_NATIVE_NULLABLE);
        assert!(!<String as Traits>::IS_NATIVE_NULLABLE);

        assert!(<i8 as Traits>::is_null(&<i8 as Traits>::create_null_value()));
        assert!(<f32 as Traits>::is_null(&<f32 as Traits>::create_null_value()));
        assert!(<bool as Traits>::is_null(&<bool as Traits>::create_null_value()));
        assert!(<Option<i32> as Traits>::is_null(&<Option<i32> as Traits>::create_null_value()));
        assert!(<DateTime<Utc> as Traits>::is_null(&<DateTime<Utc> as Traits>::create_null_value()));
    }

    #[test]
    fn test_is_int_or_numeric() {
        assert!(<i8 as Traits>::IS_INT_OR_NUMERIC);
        assert!(<u64 as Traits>::IS_INT_OR_NUMERIC);
        assert!(<f64 as Traits>::IS_INT_OR_NUMERIC);
        assert!(!<bool as Traits>::IS_INT_OR_NUMERIC);
        assert!(!<String as Traits>::IS_INT_OR_NUMERIC);
        assert!(!<Option<i32> as Traits>::IS_INT_OR_NUMERIC);
    }

    #[test]
    fn test_get_nullable_value() {
        assert_eq!(<Option<i64> as Traits>::get_nullable_value(&Some(-7799)).unwrap(), -7799);
        assert_eq!(
            <f32 as Traits>::get_nullable_value(&123.0).unwrap().to_text(),
            "123.000000"
        );
        assert_eq!(
            <f64 as Traits>::get_nullable_value(&123.45).unwrap().to_text(),
            "123.450000"
        );

        let err = <Option<i8> as Traits>::get_nullable_value(&None).unwrap_err();
        assert!(err.to_string().contains("GetNullableValue attempt on a null optional type."));

        let err = <f32 as Traits>::get_nullable_value(&f32::NAN).unwrap_err();
        assert!(err.to_string().contains("GetNullableValue attempt on a float_t NaN."));

        let err = <f64 as Traits>::get_nullable_value(&f64::NAN).unwrap_err();
        assert!(matches!(err, FeaturizerError::Data(_)));
        assert!(err.to_string().contains("GetNullableValue attempt on a double_t NaN."));
    }

    #[test]
    fn test_scalar_to_text() {
        assert_eq!(true.to_text(), "True");
        assert_eq!(false.to_text(), "False");
        assert_eq!((-100i8).to_text(), "-100");
        assert_eq!(300u16.to_text(), "300");
        assert_eq!(0.12345f64.to_text(), "0.123450");
        assert_eq!(f32::NAN.to_text(), "NaN");
        assert_eq!(String::from("grain").to_text(), "grain");
        assert_eq!(Some(5u8).to_text(), "5");
        assert_eq!(None::<u8>.to_text(), "NULL");
    }

    #[test]
    fn test_integer_from_text() {
        assert_eq!(i8::from_text("100").unwrap(), 100);
        assert_eq!(i8::from_text("-100").unwrap(), -100);
        assert_eq!(u64::from_text("100").unwrap(), 100);
        assert!(i32::from_text("this is not valid").is_err());
        assert!(u8::from_text("this is not valid").is_err());

        for err in [
            i8::from_text("1000").unwrap_err(),
            i8::from_text("-1000").unwrap_err(),
            i16::from_text("100000").unwrap_err(),
            u8::from_text("2000").unwrap_err(),
            u16::from_text("200000").unwrap_err(),
            u8::from_text("-1").unwrap_err(),
            u32::from_text("-42").unwrap_err(),
        ] {
            assert!(matches!(err, FeaturizerError::InvalidArgument(_)));
            assert!(err.to_string().contains("Invalid conversion"));
        }
    }

    #[test]
    fn test_float_and_bool_from_text() {
        assert_eq!(f32::from_text("0.12345").unwrap(), 0.12345f32);
        assert_eq!(f64::from_text("0.12345").unwrap(), 0.12345);
        assert!(f32::from_text("NaN").unwrap().is_nan());
        assert!(f64::from_text("NaN").unwrap().is_nan());
        assert!(f64::from_text("this is not valid").is_err());
        assert_eq!(f64::from_text("inf").unwrap(), f64::INFINITY);
        assert_eq!(f32::from_text("-Infinity").unwrap(), f32::NEG_INFINITY);

        for err in [f32::from_text("1e40").unwrap_err(), f64::from_text("1e400").unwrap_err()] {
            assert!(matches!(err, FeaturizerError::InvalidArgument(_)));
            assert!(err.to_string().contains("Invalid conversion"));
        }

        assert!(bool::from_text("True").unwrap());
        assert!(!bool::from_text("false").unwrap());
        assert!(bool::from_text("yes").is_err());
    }

    #[test]
    fn test_option_from_text_not_implemented() {
        let err = <Option<i32> as Traits>::from_text("5").unwrap_err();
        assert_eq!(err.to_string(), "Not Implemented Yet");
    }

    #[test]
    fn test_float_key_equal() {
        assert!(f64::key_equal(&f64::NAN, &f64::NAN));
        assert!(!f64::key_equal(&f64::NAN, &1.0));
        assert!(!f32::key_equal(&1.0, &f32::NAN));
        assert!(f32::key_equal(&2.5, &2.5));
        assert!(<Option<f64> as Traits>::key_equal(&Some(f64::NAN), &Some(f64::NAN)));
        assert!(!<Option<f64> as Traits>::key_equal(&None, &Some(1.0)));
    }

    #[test]
    fn test_float_hash_matches_key_equal() {
        assert_eq!(f64::NAN.hash_key(1), (-f64::NAN).hash_key(1));
        assert_eq!(0.0f64.hash_key(1), (-0.0f64).hash_key(1));
        assert_eq!(0.0f32.hash_key(7), (-0.0f32).hash_key(7));
    }

    #[test]
    fn test_murmur_values() {
        assert_eq!(true.hash_key(1), 0x295d_376d);
        assert_eq!(10i32.hash_key(1), 0x12ec_2126);
        assert_eq!(2.5f32.hash_key(1), 0x5edb_c123);
        assert_eq!(2.5f64.hash_key(1), 0x5426_3515);
        assert_eq!(String::from("abcd").hash_key(1), 0x353b_7271);
    }

    #[test]
    fn test_scalar_roundtrips() {
        roundtrip(true);
        roundtrip(-12i8);
        roundtrip(i16::MIN);
        roundtrip(i32::MAX);
        roundtrip(-7799i64);
        roundtrip(u8::MAX);
        roundtrip(65_000u16);
        roundtrip(4_000_000_000u32);
        roundtrip(u64::MAX);
        roundtrip(1.5f32);
        roundtrip(f64::NAN);
        roundtrip(String::from("héllo"));
        roundtrip(Some(3i32));
        roundtrip(None::<String>);
        roundtrip(Some(Some(1u8)));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut input = Archive::from_slice(&[2, 0, 0, 0, 0xff, 0xfe]);
        let err = input.deserialize::<String>().unwrap_err();
        assert!(matches!(err, FeaturizerError::Format(FormatError::InvalidUtf8)));
    }

    #[test]
    fn test_timestamp_without_offset() {
        let text = "1975-02-28T12:02:15Z";
        let tp = DateTime::<Utc>::from_text(text).unwrap();
        assert_eq!(tp.to_text(), text);
        assert_eq!((tp.year(), tp.month(), tp.day()), (1975, 2, 28));
        assert_eq!((tp.hour(), tp.minute(), tp.second()), (12, 2, 15));
    }

    #[test]
    fn test_timestamp_with_offset() {
        let tp = DateTime::<Utc>::from_text("1975-02-28T12:02:15-03:00").unwrap();
        assert_eq!((tp.year(), tp.month(), tp.day()), (1975, 2, 28));
        assert_eq!((tp.hour(), tp.minute(), tp.second()), (15, 2, 15));

        let tp = DateTime::<Utc>::from_text("1975-12-31T20:50:15-07:45").unwrap();
        assert_eq!((tp.year(), tp.month(), tp.day()), (1976, 1, 1));
        assert_eq!((tp.hour(), tp.minute(), tp.second()), (4, 35, 15));
    }

    #[test]
    fn test_invalid_timestamps() {
        for text in [
            "1975-02-29T12:02:15Z",
            "1975-13-29T12:02:15Z",
            "1975-04-31T12:02:15Z",
            "1975-04-30T27:02:15Z",
            "1975-04-30T12:61:15Z",
            "1975-04-30T12:02:79Z",
            "1975-0428T12:02:15Z",
            "1975-04-28T1202:15Z",
            "1975-04-28S12:02:15Z",
            "1975-04-28T12:02:15",
            "1975-04-28T12:02:15-0700Z",
            "1975-04-28T12:02:15-0700",
            "1975-04-28 12:02:15Z",
            "1975-04-28t12:02:15Z",
            "1975-04-28T12:02:15z",
            "1975-04-30T12:02:60Z",
            "1975-04-30T12:02:15.Z",
        ] {
            let err = DateTime::<Utc>::from_text(text).unwrap_err();
            assert!(
                err.to_string().contains("Date time string is not in valid ISO 8601 form!"),
                "{text}"
            );
        }
    }

    #[test]
    fn test_timestamp_fraction_and_positive_offset() {
        let tp = DateTime::<Utc>::from_text("1975-02-28T12:02:15.500+01:30").unwrap();
        assert_eq!((tp.hour(), tp.minute(), tp.second()), (10, 32, 15));
        assert_eq!(tp.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let tp = DateTime::<Utc>::from_text("2019-06-01T08:30:00.250Z").unwrap();
        roundtrip(tp);
    }
}
