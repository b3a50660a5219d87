//! Decoding logic for the compact float format

use crate::decimal::DecimalValue;
use crate::decimal64::{pad_exponent, MAX_NORMALIZED_EXPONENT, MIN_EXPONENT};
use crate::encoder::{SPECIAL_INFINITY, SPECIAL_QUIET_NAN, SPECIAL_SIGNALING_NAN, ZERO_FIELD};
use crate::error::{DecodeError, DecodeResult};
use crate::significand::MAX_SIGNIFICAND;
use crate::vlq::{is_extended, rvlq_decode};
use tracing::debug;

/// Exponent field split back into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentField {
    pub negative: bool,
    pub exponent_negative: bool,
    pub magnitude: u64,
}

impl ExponentField {
    #[must_use]
    pub const fn unpack(field: u64) -> Self {
        Self {
            negative: field & 1 != 0,
            exponent_negative: field & 2 != 0,
            magnitude: field >> 2,
        }
    }

    /// Signed exponent, or `None` if it is outside `[MIN_EXPONENT, MAX_NORMALIZED_EXPONENT]`
    fn exponent(self) -> Option<i32> {
        let magnitude = i64::try_from(self.magnitude).ok()?;
        let exponent = if self.exponent_negative {
            -magnitude
        } else {
            magnitude
        };
        if exponent < i64::from(MIN_EXPONENT) || exponent > i64::from(MAX_NORMALIZED_EXPONENT) {
            return None;
        }
        i32::try_from(exponent).ok()
    }

    fn signed_magnitude(self) -> i64 {
        let magnitude = i64::try_from(self.magnitude).unwrap_or(i64::MAX);
        if self.exponent_negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Encoded length of every special value: marker plus selector byte
const SPECIAL_LEN: usize = 2;

/// Decode the selector byte that follows the extension marker.
///
/// A selector with its continuation bit set is rejected like any other
/// unknown selector.
fn decode_special(selector: u8) -> DecodeResult<DecimalValue> {
    const SPECIAL_NEG_INFINITY: u8 = SPECIAL_INFINITY | 1;

    match selector {
        SPECIAL_QUIET_NAN => Ok(DecimalValue::nan()),
        SPECIAL_SIGNALING_NAN => Ok(DecimalValue::signaling_nan()),
        SPECIAL_INFINITY => Ok(DecimalValue::infinity(false)),
        SPECIAL_NEG_INFINITY => Ok(DecimalValue::infinity(true)),
        _ => {
            debug!(selector, "unknown special value selector");
            Err(DecodeError::InvalidSpecialValue(u64::from(selector)))
        }
    }
}

/// Decode one compact float from the start of `src`.
///
/// Returns the value and the number of bytes consumed. Bytes after the
/// encoded value are ignored. Finite results are always normalized (no
/// trailing zeros in the significand).
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedEndOfInput`] for empty or truncated
/// input, [`DecodeError::InvalidSpecialValue`] for an unknown escaped
/// selector, and a range error if the value has no decimal64
/// representation. A normalized exponent above 369 is accepted only when
/// padding the significand with zeros brings it back to 369 within 16
/// digits.
pub fn decode(src: &[u8]) -> DecodeResult<(DecimalValue, usize)> {
    let Some(&first) = src.first() else {
        debug!("empty input");
        return Err(DecodeError::UnexpectedEndOfInput);
    };

    if is_extended(first) {
        let Some(&selector) = src.get(1) else {
            debug!("special value without a selector");
            return Err(DecodeError::UnexpectedEndOfInput);
        };
        return decode_special(selector).map(|value| (value, SPECIAL_LEN));
    }

    let (field, exponent_len) = rvlq_decode(src)?;

    if field | 1 == u64::from(ZERO_FIELD | 1) {
        return Ok((DecimalValue::zero(field & 1 != 0), exponent_len));
    }

    let (significand, significand_len) = rvlq_decode(&src[exponent_len..]).map_err(|e| {
        debug!(offset = exponent_len, error = %e, "bad significand field");
        e
    })?;

    if significand > MAX_SIGNIFICAND {
        debug!(significand, "significand exceeds 16 digits");
        return Err(DecodeError::SignificandOutOfRange(significand));
    }
    if significand == 0 {
        debug!("zero significand in finite encoding");
        return Err(DecodeError::ZeroSignificand);
    }

    let parts = ExponentField::unpack(field);
    let Some(exponent) = parts.exponent() else {
        debug!(magnitude = parts.magnitude, "exponent out of range");
        return Err(DecodeError::ExponentOutOfRange(parts.signed_magnitude()));
    };

    // Decoded values are reported in their shortest form even if the sender
    // left trailing zeros in the significand
    let value = DecimalValue::finite(parts.negative, exponent, significand).normalized(None);
    if pad_exponent(value.significand, value.exponent).is_none() {
        debug!(
            exponent = value.exponent,
            significand = value.significand,
            "value does not fit a decimal64"
        );
        return Err(DecodeError::ExponentOutOfRange(i64::from(value.exponent)));
    }

    Ok((value, exponent_len + significand_len))
}
