//! Public entry points for binary doubles and decimal64 values

use crate::binary::{from_f64, to_f64};
use crate::decimal64::Decimal64;
use crate::decoder::decode;
use crate::encoder::{encode as encode_value, encoded_size as value_encoded_size};
use crate::error::{DecodeResult, EncodeResult};
use crate::significand::precision;

/// Number of bytes [`binary_encode`] writes for `value`
#[must_use]
pub fn binary_encoded_size(value: f64) -> usize {
    value_encoded_size(&from_f64(value), None)
}

/// Encode a binary double, going through its nearest 16-digit decimal.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`](crate::EncodeError::BufferTooSmall)
/// if `dst` is too short; nothing is written in that case.
pub fn binary_encode(value: f64, dst: &mut [u8]) -> EncodeResult<usize> {
    encode_value(&from_f64(value), None, dst)
}

/// Decode a binary double, returning it with the number of bytes read.
///
/// # Errors
///
/// Returns [`DecodeError`](crate::DecodeError) if `src` is empty, truncated
/// or malformed.
pub fn binary_decode(src: &[u8]) -> DecodeResult<(f64, usize)> {
    let (value, len) = decode(src)?;
    Ok((to_f64(&value), len))
}

/// Number of bytes [`decimal_encode`] writes for `value`
#[must_use]
pub fn decimal_encoded_size(value: Decimal64) -> usize {
    value_encoded_size(&value.to_value(), None)
}

/// Encode a decimal64 exactly.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`](crate::EncodeError::BufferTooSmall)
/// if `dst` is too short; nothing is written in that case.
pub fn decimal_encode(value: Decimal64, dst: &mut [u8]) -> EncodeResult<usize> {
    encode_value(&value.to_value(), None, dst)
}

/// Decode a decimal64, returning it with the number of bytes read.
///
/// The result is the shortest member of its cohort that decimal64 can hold
/// (no trailing zeros unless the exponent would otherwise be too large).
///
/// # Errors
///
/// Returns [`DecodeError`](crate::DecodeError) if `src` is empty, truncated,
/// malformed, or holds a value outside the decimal64 range.
pub fn decimal_decode(src: &[u8]) -> DecodeResult<(Decimal64, usize)> {
    let (value, len) = decode(src)?;
    Ok((Decimal64::try_from(value)?, len))
}

/// Number of bytes [`encode`] writes for `value` rounded to
/// `significant_digits`
#[must_use]
pub fn encoded_size(value: Decimal64, significant_digits: i32) -> usize {
    value_encoded_size(&value.to_value(), precision(significant_digits))
}

/// Encode a decimal64 rounded half to even to `significant_digits`.
///
/// `significant_digits <= 0` or `>= 16` keeps every digit.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`](crate::EncodeError::BufferTooSmall)
/// if `dst` is too short; nothing is written in that case.
pub fn encode(value: Decimal64, significant_digits: i32, dst: &mut [u8]) -> EncodeResult<usize> {
    encode_value(&value.to_value(), precision(significant_digits), dst)
}

/// Library version as a semantic version (e.g. "1.0.0")
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
