//! Conversion between IEEE-754 binary64 doubles and the decimal model.
//!
//! Finite doubles go through their nearest 16-significant-digit decimal,
//! which is also how a decimal64 conversion behaves. Every double whose
//! shortest representation has at most 16 digits therefore comes back
//! bit-for-bit, subnormals included.

use crate::decimal::{DecimalKind, DecimalValue};
use crate::significand::{strip_trailing_zeros, MAX_DIGITS};
use std::fmt::{self, Write as _};

const BIN_WIDTH_SIGNIFICAND: u32 = 52;
const BIN_WIDTH_EXPONENT: u32 = 11;
const BIN_SHIFT_SIGN: u32 = BIN_WIDTH_SIGNIFICAND + BIN_WIDTH_EXPONENT;
const BIN_MASK_EXPONENT: u64 = (1 << BIN_WIDTH_EXPONENT) - 1;
const BIN_MASK_SIGNIFICAND: u64 = (1 << BIN_WIDTH_SIGNIFICAND) - 1;
const BIN_EXPONENT_NAN_OR_INFINITY: u64 = BIN_MASK_EXPONENT;

/// Most significant stored significand bit; set for quiet NaNs
const BIN_QUIET_BIT: u64 = 1 << (BIN_WIDTH_SIGNIFICAND - 1);

/// Bit pattern used when decoding a signaling NaN
pub const SIGNALING_NAN_BITS: u64 = (BIN_EXPONENT_NAN_OR_INFINITY << BIN_WIDTH_SIGNIFICAND) | 1;

/// Fixed-capacity stack buffer that implements `fmt::Write`.
///
/// Large enough for `{:.15e}` of any `f64` (sign, 16 digits, point, `e`,
/// exponent sign, 3 exponent digits) and for `{sig}e{exp}` of any decimal
/// the codec accepts.
struct StackBuf {
    buf: [u8; 40],
    len: usize,
}

impl StackBuf {
    const fn new() -> Self {
        Self {
            buf: [0; 40],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        // Safety: fmt::Write for str only writes valid UTF-8
        unsafe { std::str::from_utf8_unchecked(&self.buf[..self.len]) }
    }
}

impl fmt::Write for StackBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let new_len = self.len + bytes.len();
        if new_len > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..new_len].copy_from_slice(bytes);
        self.len = new_len;
        Ok(())
    }
}

/// Split the output of `{:.15e}` (`d.ddddddddddddddde[-]x`) into an integer
/// significand and an exponent
fn parse_scientific(text: &str) -> Option<(u64, i32)> {
    let (mantissa, exp) = text.split_once('e')?;
    let mut significand = 0u64;
    let mut fraction_digits = 0i32;
    let mut seen_point = false;

    for b in mantissa.bytes() {
        match b {
            b'.' => seen_point = true,
            b'0'..=b'9' => {
                significand = significand * 10 + u64::from(b - b'0');
                if seen_point {
                    fraction_digits += 1;
                }
            }
            _ => return None,
        }
    }

    let exponent: i32 = exp.parse().ok()?;
    Some((significand, exponent - fraction_digits))
}

/// Classify a double and convert it to the decimal model.
///
/// NaN payloads and the sign of a NaN are dropped; only the quiet bit is
/// kept. Finite values are rounded half to even to 16 significant digits.
#[must_use]
pub fn from_f64(value: f64) -> DecimalValue {
    let bits = value.to_bits();
    let negative = bits >> BIN_SHIFT_SIGN != 0;
    let exponent = (bits >> BIN_WIDTH_SIGNIFICAND) & BIN_MASK_EXPONENT;
    let significand = bits & BIN_MASK_SIGNIFICAND;

    if exponent == BIN_EXPONENT_NAN_OR_INFINITY {
        return match (significand, significand & BIN_QUIET_BIT) {
            (0, _) => DecimalValue::infinity(negative),
            (_, 0) => DecimalValue::signaling_nan(),
            _ => DecimalValue::nan(),
        };
    }
    if value == 0.0 {
        return DecimalValue::zero(negative);
    }

    let mut buf = StackBuf::new();
    // Exact, correctly rounded formatting with MAX_DIGITS significant digits
    write!(buf, "{:.*e}", MAX_DIGITS as usize - 1, value.abs())
        .expect("f64 scientific formatting should fit in 40 bytes");
    let (digits, exponent) = parse_scientific(buf.as_str())
        .expect("f64 scientific formatting should always be well formed");

    let (digits, exponent) = strip_trailing_zeros(digits, exponent);
    DecimalValue::finite(negative, exponent, digits)
}

/// Convert a decimal value to the nearest double.
///
/// Values beyond the binary64 range become infinities and values below its
/// smallest subnormal become signed zeros.
#[must_use]
pub fn to_f64(value: &DecimalValue) -> f64 {
    let magnitude = match value.kind {
        DecimalKind::QuietNaN => return f64::NAN,
        DecimalKind::SignalingNaN => return f64::from_bits(SIGNALING_NAN_BITS),
        DecimalKind::Zero => 0.0,
        DecimalKind::Infinity => f64::INFINITY,
        DecimalKind::Finite => {
            let mut buf = StackBuf::new();
            write!(buf, "{}e{}", value.significand, value.exponent)
                .expect("decimal scientific formatting should fit in 40 bytes");
            // Rust's float parser is correctly rounded
            buf.as_str()
                .parse::<f64>()
                .expect("decimal scientific formatting should always parse")
        }
    };

    if value.sign {
        -magnitude
    } else {
        magnitude
    }
}
