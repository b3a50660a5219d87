//! Encoding logic for the compact float format
//!
//! Every value starts with a right-VLQ exponent field:
//!
//! ```text
//! bit 0      significand sign
//! bit 1      exponent sign
//! bits 2..   |exponent|
//! ```
//!
//! Finite values follow it with the significand as a second right-VLQ.
//! Zero reuses the otherwise impossible "negative zero exponent" (`0x02`,
//! `0x03`) and has no significand. Infinities and NaNs put the extension
//! marker in front of a small selector instead.

use crate::decimal::{DecimalKind, DecimalValue};
use crate::decimal64::MAX_NORMALIZED_EXPONENT;
use crate::error::{EncodeError, EncodeResult};
use crate::significand::normalize;
use crate::vlq::{rvlq_encode, rvlq_encoded_size, EXTENDED_MARKER};
use tracing::trace;

/// Exponent field of a zero (exponent sign set, magnitude 0)
pub const ZERO_FIELD: u8 = 0x02;

/// Selectors that follow [`EXTENDED_MARKER`]
pub const SPECIAL_QUIET_NAN: u8 = 0x00;
pub const SPECIAL_SIGNALING_NAN: u8 = 0x01;
pub const SPECIAL_INFINITY: u8 = 0x02;

/// Largest encoding any decimal64 or f64 can produce
pub const MAX_ENCODED_SIZE: usize = 10;

/// Pack sign, exponent sign and exponent magnitude into one field
#[must_use]
pub fn exponent_field(negative: bool, exponent: i32) -> u64 {
    let exponent_sign = u64::from(exponent < 0);
    u64::from(negative) | (exponent_sign << 1) | (u64::from(exponent.unsigned_abs()) << 2)
}

/// What a value looks like on the wire
enum WireForm {
    /// A lone exponent field, or the extension marker and a selector
    Short([u8; 2], usize),
    /// Exponent field followed by the significand
    Finite { exponent: u64, significand: u64 },
}

impl WireForm {
    fn len(&self) -> usize {
        match *self {
            Self::Short(_, len) => len,
            Self::Finite {
                exponent,
                significand,
            } => rvlq_encoded_size(exponent) + rvlq_encoded_size(significand),
        }
    }
}

fn infinity_form(negative: bool) -> WireForm {
    WireForm::Short([EXTENDED_MARKER, SPECIAL_INFINITY | u8::from(negative)], 2)
}

/// Normalize `value` and pick its wire form.
///
/// A finite value whose rounding carries past the largest decimal64 becomes
/// an infinity of the same sign.
fn wire_form(value: &DecimalValue, significant_digits: Option<u32>) -> WireForm {
    match value.kind {
        DecimalKind::Zero => WireForm::Short([ZERO_FIELD | u8::from(value.sign), 0], 1),
        DecimalKind::Infinity => infinity_form(value.sign),
        DecimalKind::QuietNaN => WireForm::Short([EXTENDED_MARKER, SPECIAL_QUIET_NAN], 2),
        DecimalKind::SignalingNaN => WireForm::Short([EXTENDED_MARKER, SPECIAL_SIGNALING_NAN], 2),
        DecimalKind::Finite => {
            let (significand, exponent) =
                normalize(value.significand, value.exponent, significant_digits);
            if exponent > MAX_NORMALIZED_EXPONENT {
                trace!(exponent, "rounding overflowed to infinity");
                return infinity_form(value.sign);
            }
            WireForm::Finite {
                exponent: exponent_field(value.sign, exponent),
                significand,
            }
        }
    }
}

/// Number of bytes [`encode`] writes for `value`
#[must_use]
pub fn encoded_size(value: &DecimalValue, significant_digits: Option<u32>) -> usize {
    wire_form(value, significant_digits).len()
}

/// Encode `value` into `dst`, returning the number of bytes written.
///
/// With `significant_digits` of `Some(d)` (`0 < d < 16`) the significand is
/// first rounded half to even to `d` digits; otherwise the value is encoded
/// exactly.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] if `dst` cannot hold the whole
/// encoding. Nothing is written in that case.
pub fn encode(
    value: &DecimalValue,
    significant_digits: Option<u32>,
    dst: &mut [u8],
) -> EncodeResult<usize> {
    let form = wire_form(value, significant_digits);
    let needed = form.len();
    if dst.len() < needed {
        trace!(needed, available = dst.len(), kind = ?value.kind, "destination too small");
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: dst.len(),
        });
    }

    match form {
        WireForm::Short(bytes, len) => {
            dst[..len].copy_from_slice(&bytes[..len]);
            Ok(len)
        }
        WireForm::Finite {
            exponent,
            significand,
        } => {
            let exponent_len = rvlq_encode(exponent, dst)?;
            let significand_len = rvlq_encode(significand, &mut dst[exponent_len..])?;
            Ok(exponent_len + significand_len)
        }
    }
}

/// Encode `value` into a freshly allocated buffer
#[cfg(test)]
pub(crate) fn encode_to_vec(value: &DecimalValue, significant_digits: Option<u32>) -> Vec<u8> {
    let mut bytes = vec![0u8; encoded_size(value, significant_digits)];
    // The buffer is sized exactly, so encoding cannot run out of room
    let written = encode(value, significant_digits, &mut bytes).unwrap_or(0);
    bytes.truncate(written);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_exponent_field_packing() {
        assert_eq!(exponent_field(false, 0), 0b000);
        assert_eq!(exponent_field(true, 0), 0b001);
        assert_eq!(exponent_field(false, -1), 0b110);
        assert_eq!(exponent_field(true, -1), 0b111);
        assert_eq!(exponent_field(false, 7), 7 << 2);
        assert_eq!(exponent_field(false, -7), 0x1e);
        assert_eq!(exponent_field(false, i32::MIN), (1u64 << 33) | 0b10);
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode_to_vec(&DecimalValue::zero(false), None), [0x02]);
        assert_eq!(encode_to_vec(&DecimalValue::zero(true), None), [0x03]);
    }

    #[test]
    fn test_encode_specials() {
        assert_eq!(encode_to_vec(&DecimalValue::infinity(false), None), [0x80, 0x02]);
        assert_eq!(encode_to_vec(&DecimalValue::infinity(true), None), [0x80, 0x03]);
        assert_eq!(encode_to_vec(&DecimalValue::nan(), None), [0x80, 0x00]);
        assert_eq!(encode_to_vec(&DecimalValue::signaling_nan(), None), [0x80, 0x01]);
    }

    #[test]
    fn test_encode_finite() {
        let e = encode_to_vec(&DecimalValue::finite(false, -7, 88_419_305), None);
        println!("8.8419305: {}", format_hex(&e));
        assert_eq!(e, [0x1e, 0xaa, 0x94, 0xd7, 0x69]);

        // Trailing zeros are moved into the exponent first
        let e = encode_to_vec(&DecimalValue::finite(false, -2, 150), None);
        assert_eq!(e, [0x06, 0x0f]);

        let e = encode_to_vec(&DecimalValue::finite(true, 0, 1), None);
        assert_eq!(e, [0x01, 0x01]);
    }

    #[test]
    fn test_encode_rounded() {
        let value = DecimalValue::finite(false, -7, 5_935_555);
        let e = encode_to_vec(&value, Some(4));
        println!("0.5935555 @ 4 digits: {}", format_hex(&e));
        assert_eq!(e, [0x12, 0xae, 0x30]);
        assert_eq!(encoded_size(&value, Some(4)), 3);
    }

    #[test]
    fn test_rounding_overflow_becomes_infinity() {
        let largest = DecimalValue::finite(false, 369, 9_999_999_999_999_999);
        assert_eq!(encode_to_vec(&largest, None).len(), 10);
        assert_eq!(encode_to_vec(&largest, Some(15)), [0x80, 0x02]);
        assert_eq!(encoded_size(&largest, Some(15)), 2);

        let negative = DecimalValue { sign: true, ..largest };
        assert_eq!(encode_to_vec(&negative, Some(1)), [0x80, 0x03]);
    }

    #[test]
    fn test_size_matches_written() {
        let values = [
            DecimalValue::zero(true),
            DecimalValue::nan(),
            DecimalValue::infinity(true),
            DecimalValue::finite(false, -398, 9_999_999_999_999_999),
            DecimalValue::finite(true, 369, 1),
            DecimalValue::finite(false, 0, u64::MAX),
        ];
        for value in &values {
            for digits in [None, Some(1), Some(4), Some(15)] {
                let mut buf = [0u8; 32];
                let written = encode(value, digits, &mut buf).unwrap();
                assert_eq!(written, encoded_size(value, digits), "{value:?} {digits:?}");
            }
        }
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let values = [
            DecimalValue::zero(false),
            DecimalValue::infinity(false),
            DecimalValue::finite(false, -7, 88_419_305),
        ];
        for value in &values {
            let size = encoded_size(value, None);
            let mut buf = vec![0xeeu8; size - 1];
            assert_eq!(
                encode(value, None, &mut buf),
                Err(EncodeError::BufferTooSmall {
                    needed: size,
                    available: size - 1
                })
            );
            assert!(buf.iter().all(|&b| b == 0xee));

            let mut empty: [u8; 0] = [];
            assert!(encode(value, None, &mut empty).is_err());
        }
    }
}
