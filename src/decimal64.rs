//! IEEE-754-2008 decimal64 interchange format, binary integer significand
//! (BID) encoding.
//!
//! ```text
//! normal form    s | eeeeeeeeee (10) | ccc...c (53)
//! extended form  s | 11 | eeeeeeeeee (10) | ccc...c (51)   significand = 100ccc...c
//! infinity       s | 11110 | ...
//! NaN            s | 11111 | q/s | ...
//! ```
//!
//! Only field extraction and construction live here; no decimal arithmetic
//! is performed.

use crate::decimal::{DecimalKind, DecimalValue};
use crate::error::DecodeError;
use crate::significand::{MAX_DIGITS, MAX_SIGNIFICAND};
use std::fmt;

/// Bias between the stored and the actual decimal exponent
pub const EXPONENT_BIAS: i32 = 398;

/// Largest stored (biased) exponent
pub const MAX_BIASED_EXPONENT: i32 = 0x2ff;

/// Smallest actual exponent
pub const MIN_EXPONENT: i32 = -EXPONENT_BIAS;

/// Largest actual exponent
pub const MAX_EXPONENT: i32 = MAX_BIASED_EXPONENT - EXPONENT_BIAS;

/// Largest exponent of a decimal64 once trailing zeros are stripped
/// (`1 × 10^384` is stored as `10^15 × 10^369`)
pub const MAX_NORMALIZED_EXPONENT: i32 = MAX_EXPONENT + MAX_DIGITS as i32 - 1;

const SIGN_SHIFT: u32 = 63;
const SIGN_MASK: u64 = 1 << SIGN_SHIFT;

const COMBINATION_SHIFT: u32 = 58;
const COMBINATION_MASK: u64 = 0x1f;
const COMBINATION_INFINITY: u64 = 0x1e;
const COMBINATION_NAN: u64 = 0x1f;
const SIGNALING_BIT: u64 = 1 << 57;

/// Top two bits of the combination field, set for the extended form
const EXTENDED_FORM_MASK: u64 = 0b11 << 61;

const EXPONENT_MASK: u64 = 0x3ff;
const NORMAL_EXPONENT_SHIFT: u32 = 53;
const EXTENDED_EXPONENT_SHIFT: u32 = 51;

const NORMAL_SIGNIFICAND_MASK: u64 = (1 << 53) - 1;
const EXTENDED_SIGNIFICAND_MASK: u64 = (1 << 51) - 1;

/// Implicit `100` prefix of an extended-form significand
const EXTENDED_SIGNIFICAND_PREFIX: u64 = 1 << 53;

/// A decimal64 value held as its raw interchange bits.
///
/// Equality is bitwise: two members of the same cohort (`1.5` stored as
/// `15 × 10^-1` and as `150 × 10^-2`) are different `Decimal64`s. Use
/// [`same_value`](Self::same_value) to compare numerically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal64(u64);

impl Decimal64 {
    pub const ZERO: Self = Self(0x31c0_0000_0000_0000);
    pub const NEG_ZERO: Self = Self(SIGN_MASK | 0x31c0_0000_0000_0000);
    pub const INFINITY: Self = Self(COMBINATION_INFINITY << COMBINATION_SHIFT);
    pub const NEG_INFINITY: Self = Self(SIGN_MASK | COMBINATION_INFINITY << COMBINATION_SHIFT);
    pub const NAN: Self = Self(COMBINATION_NAN << COMBINATION_SHIFT);
    pub const SIGNALING_NAN: Self = Self(COMBINATION_NAN << COMBINATION_SHIFT | SIGNALING_BIT);

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Build a finite decimal64 from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::SignificandOutOfRange`] or
    /// [`DecodeError::ExponentOutOfRange`] if the value has no decimal64
    /// representation.
    pub fn from_parts(negative: bool, exponent: i32, significand: u64) -> Result<Self, DecodeError> {
        Self::try_from(DecimalValue::finite(negative, exponent, significand))
    }

    /// Split into sign, exponent and significand
    #[must_use]
    pub const fn to_value(self) -> DecimalValue {
        extract(self.0)
    }

    /// Numeric equality across cohort members.
    ///
    /// `15 × 10^-1` and `150 × 10^-2` are the same value even though their
    /// bits differ. Zeros and infinities compare by sign, NaNs by kind.
    #[must_use]
    pub fn same_value(self, other: Self) -> bool {
        self.to_value().normalized(None) == other.to_value().normalized(None)
    }

    #[must_use]
    pub const fn is_nan(self) -> bool {
        (self.0 >> COMBINATION_SHIFT) & COMBINATION_MASK == COMBINATION_NAN
    }

    #[must_use]
    pub const fn is_infinite(self) -> bool {
        (self.0 >> COMBINATION_SHIFT) & COMBINATION_MASK == COMBINATION_INFINITY
    }

    #[must_use]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }
}

impl fmt::Debug for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal64({:#018x} = {})", self.0, self.to_value())
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

impl From<Decimal64> for DecimalValue {
    fn from(value: Decimal64) -> Self {
        value.to_value()
    }
}

impl TryFrom<DecimalValue> for Decimal64 {
    type Error = DecodeError;

    /// Checked construction.
    ///
    /// Exponents above [`MAX_EXPONENT`] are pulled back into range by padding
    /// the significand with trailing zeros, which is how a normalized value
    /// such as `1 × 10^384` finds its way back to `10^15 × 10^369`.
    fn try_from(value: DecimalValue) -> Result<Self, Self::Error> {
        if value.kind != DecimalKind::Finite {
            return Ok(Self(construct(&value)));
        }

        if value.significand > MAX_SIGNIFICAND {
            return Err(DecodeError::SignificandOutOfRange(value.significand));
        }
        if value.exponent < MIN_EXPONENT {
            return Err(DecodeError::ExponentOutOfRange(i64::from(value.exponent)));
        }
        let Some((significand, exponent)) = pad_exponent(value.significand, value.exponent)
        else {
            return Err(DecodeError::ExponentOutOfRange(i64::from(value.exponent)));
        };

        Ok(Self(construct(&DecimalValue::finite(
            value.sign,
            exponent,
            significand,
        ))))
    }
}

/// Bring an exponent above [`MAX_EXPONENT`] back into range by padding the
/// significand with trailing zeros.
///
/// Returns `None` when the padded significand would need more than 16
/// digits. Exponents already in range come back unchanged.
pub(crate) fn pad_exponent(mut significand: u64, mut exponent: i32) -> Option<(u64, i32)> {
    while exponent > MAX_EXPONENT {
        significand = significand
            .checked_mul(10)
            .filter(|&padded| padded <= MAX_SIGNIFICAND)?;
        exponent -= 1;
    }
    Some((significand, exponent))
}

/// Take a decimal64 bit pattern apart.
///
/// Non-canonical significands (above 16 nines) read as zero, as IEEE-754-2008
/// requires. NaN payloads and NaN signs are dropped.
#[must_use]
pub const fn extract(bits: u64) -> DecimalValue {
    let negative = bits & SIGN_MASK != 0;
    let combination = (bits >> COMBINATION_SHIFT) & COMBINATION_MASK;

    if combination == COMBINATION_INFINITY {
        return DecimalValue::infinity(negative);
    }
    if combination == COMBINATION_NAN {
        return if bits & SIGNALING_BIT != 0 {
            DecimalValue::signaling_nan()
        } else {
            DecimalValue::nan()
        };
    }

    let (biased, significand) = if bits & EXTENDED_FORM_MASK == EXTENDED_FORM_MASK {
        (
            (bits >> EXTENDED_EXPONENT_SHIFT) & EXPONENT_MASK,
            (bits & EXTENDED_SIGNIFICAND_MASK) | EXTENDED_SIGNIFICAND_PREFIX,
        )
    } else {
        (
            (bits >> NORMAL_EXPONENT_SHIFT) & EXPONENT_MASK,
            bits & NORMAL_SIGNIFICAND_MASK,
        )
    };

    if significand > MAX_SIGNIFICAND {
        return DecimalValue::zero(negative);
    }

    #[allow(clippy::cast_possible_truncation)]
    let exponent = biased as i32 - EXPONENT_BIAS;
    DecimalValue::finite(negative, exponent, significand)
}

/// Put a decimal64 bit pattern together.
///
/// The value must already be in range (see `TryFrom<DecimalValue>` for the
/// checked version); out-of-range exponents are masked to 10 bits.
#[must_use]
pub const fn construct(value: &DecimalValue) -> u64 {
    let sign = if value.sign { SIGN_MASK } else { 0 };

    match value.kind {
        DecimalKind::Infinity => sign | COMBINATION_INFINITY << COMBINATION_SHIFT,
        DecimalKind::QuietNaN => COMBINATION_NAN << COMBINATION_SHIFT,
        DecimalKind::SignalingNaN => COMBINATION_NAN << COMBINATION_SHIFT | SIGNALING_BIT,
        DecimalKind::Zero => sign | (EXPONENT_BIAS as u64) << NORMAL_EXPONENT_SHIFT,
        DecimalKind::Finite => {
            #[allow(clippy::cast_sign_loss)]
            let biased = (value.exponent + EXPONENT_BIAS) as u64 & EXPONENT_MASK;
            let significand = value.significand;
            if significand & EXTENDED_SIGNIFICAND_PREFIX != 0 {
                sign | EXTENDED_FORM_MASK
                    | biased << EXTENDED_EXPONENT_SHIFT
                    | (significand & EXTENDED_SIGNIFICAND_MASK)
            } else {
                sign | biased << NORMAL_EXPONENT_SHIFT | significand
            }
        }
    }
}
