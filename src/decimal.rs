use crate::error::ParseError;
use crate::significand::{digit_count, normalize, pow10, strip_trailing_zeros, MAX_DIGITS};
use std::fmt;
use std::str::FromStr;

/// Classification of a [`DecimalValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecimalKind {
    Zero,
    Infinity,
    QuietNaN,
    SignalingNaN,
    Finite,
}

/// A decimal floating-point value: `(-1)^sign × significand × 10^exponent`
///
/// This is the model the codec works on. Both [`Decimal64`](crate::Decimal64)
/// bit patterns and [`f64`] values are converted to it before encoding, and the
/// decoder produces it before converting back.
///
/// `exponent` and `significand` are only meaningful for
/// [`DecimalKind::Finite`]; every constructor zeroes them for the other kinds.
/// NaNs carry no sign. Equality is structural, so `15 × 10^-1` and
/// `150 × 10^-2` compare unequal until both are [`normalized`](Self::normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    pub sign: bool,
    pub kind: DecimalKind,
    pub exponent: i32,
    pub significand: u64,
}

impl DecimalValue {
    /// Signed zero (`negative` selects -0)
    #[must_use]
    pub const fn zero(negative: bool) -> Self {
        Self {
            sign: negative,
            kind: DecimalKind::Zero,
            exponent: 0,
            significand: 0,
        }
    }

    /// Signed infinity
    #[must_use]
    pub const fn infinity(negative: bool) -> Self {
        Self {
            sign: negative,
            kind: DecimalKind::Infinity,
            exponent: 0,
            significand: 0,
        }
    }

    /// Quiet NaN
    #[must_use]
    pub const fn nan() -> Self {
        Self {
            sign: false,
            kind: DecimalKind::QuietNaN,
            exponent: 0,
            significand: 0,
        }
    }

    /// Signaling NaN
    #[must_use]
    pub const fn signaling_nan() -> Self {
        Self {
            sign: false,
            kind: DecimalKind::SignalingNaN,
            exponent: 0,
            significand: 0,
        }
    }

    /// A finite value. A zero significand yields a signed [`zero`](Self::zero).
    #[must_use]
    pub const fn finite(negative: bool, exponent: i32, significand: u64) -> Self {
        if significand == 0 {
            return Self::zero(negative);
        }
        Self {
            sign: negative,
            kind: DecimalKind::Finite,
            exponent,
            significand,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self.kind, DecimalKind::Zero)
    }

    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        matches!(self.kind, DecimalKind::Infinity)
    }

    #[must_use]
    pub const fn is_nan(&self) -> bool {
        matches!(self.kind, DecimalKind::QuietNaN | DecimalKind::SignalingNaN)
    }

    /// True for zero and finite values
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        matches!(self.kind, DecimalKind::Zero | DecimalKind::Finite)
    }

    /// Copy with the significand reduced to its shortest form.
    ///
    /// With `significant_digits` set, the significand is also rounded half
    /// to even (see [`normalize`](crate::significand::normalize)).
    #[must_use]
    pub fn normalized(self, significant_digits: Option<u32>) -> Self {
        if self.kind != DecimalKind::Finite {
            return self;
        }
        let (significand, exponent) =
            normalize(self.significand, self.exponent, significant_digits);
        Self::finite(self.sign, exponent, significand)
    }

    /// Parse a decimal string into its parts (internal helper)
    #[allow(clippy::too_many_lines)]
    fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();

        // Handle special values (case-insensitive without allocation)
        let (negative, body) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = s.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, s)
        };

        if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
            return Ok(Self::infinity(negative));
        }
        if body.eq_ignore_ascii_case("nan") {
            return Ok(Self::nan());
        }
        if body.eq_ignore_ascii_case("snan") {
            return Ok(Self::signaling_nan());
        }

        // Split off the exponent
        let (mantissa, exp_part) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        // Reject empty or digit-free inputs (e.g. "", ".", "+", "-", "e5")
        if !mantissa.bytes().any(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(
                "input contains no digits".to_string(),
            ));
        }

        let (integer_part, fractional_part) = match mantissa.find('.') {
            Some(pos) => {
                let (int, rest) = mantissa.split_at(pos);
                if rest[1..].contains('.') {
                    return Err(ParseError::InvalidFormat(
                        "multiple decimal points".to_string(),
                    ));
                }
                (int, &rest[1..])
            }
            None => (mantissa, ""),
        };

        let mut exponent: i64 = match exp_part {
            Some(e) => e
                .parse::<i32>()
                .map(i64::from)
                .map_err(|_| ParseError::InvalidFormat(format!("invalid exponent: {e}")))?,
            None => 0,
        };

        // Accumulate the significand, keeping the first 17 significant digits
        // exactly and remembering whether anything non-zero was dropped after
        // them. That is enough to round correctly to 16 digits.
        let mut significand = 0u64;
        let mut kept = 0u32;
        let mut sticky = false;
        let keep_limit = MAX_DIGITS + 1;

        let digits = integer_part
            .bytes()
            .map(|b| (b, false))
            .chain(fractional_part.bytes().map(|b| (b, true)));

        for (b, fractional) in digits {
            if !b.is_ascii_digit() {
                return Err(ParseError::InvalidFormat(format!(
                    "invalid digit: {}",
                    b as char
                )));
            }
            let digit = u64::from(b - b'0');

            if significand == 0 && digit == 0 {
                // Leading zero: only shifts the point
                if fractional {
                    exponent -= 1;
                }
                continue;
            }

            if kept < keep_limit {
                significand = significand * 10 + digit;
                kept += 1;
                if fractional {
                    exponent -= 1;
                }
            } else {
                sticky |= digit != 0;
                if !fractional {
                    exponent += 1;
                }
            }
        }

        if significand == 0 {
            return Ok(Self::zero(negative));
        }

        // Round the 17th digit away. A non-zero tail beyond it turns a 5
        // into more than half.
        if kept == keep_limit {
            let last = significand % 10;
            significand /= 10;
            exponent += 1;
            if last > 5 || (last == 5 && (sticky || significand % 2 == 1)) {
                significand += 1;
            }
        }

        let exponent = i32::try_from(exponent)
            .map_err(|_| ParseError::ExponentOverflow(s.to_string()))?;
        let (significand, exponent) = strip_trailing_zeros(significand, exponent);

        Ok(Self::finite(negative, exponent, significand))
    }
}

impl FromStr for DecimalValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DecimalKind::QuietNaN => return f.write_str("NaN"),
            DecimalKind::SignalingNaN => return f.write_str("sNaN"),
            _ => {}
        }

        if self.sign {
            f.write_str("-")?;
        }

        match self.kind {
            DecimalKind::Zero => f.write_str("0"),
            DecimalKind::Infinity => f.write_str("inf"),
            _ => {
                let sig = self.significand;
                #[allow(clippy::cast_possible_wrap)]
                let digits = digit_count(sig) as i32;
                let exp = self.exponent;

                if (0..=6).contains(&exp) {
                    write!(f, "{sig}")?;
                    for _ in 0..exp {
                        f.write_str("0")?;
                    }
                    Ok(())
                } else if exp < 0 && exp > -(digits + 7) {
                    let width = exp.unsigned_abs() as usize;
                    let (int, frac) = match pow10(exp.unsigned_abs()) {
                        Some(p) => (sig / p, sig % p),
                        None => (0, sig),
                    };
                    write!(f, "{int}.{frac:0width$}")
                } else {
                    write!(f, "{sig}e{exp}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        let d: DecimalValue = "123.456".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -3, 123_456));
    }

    #[test]
    fn test_parse_negative() {
        let d: DecimalValue = "-103.2".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(true, -1, 1_032));
    }

    #[test]
    fn test_parse_small() {
        let d: DecimalValue = "0.0405".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -4, 405));
    }

    #[test]
    fn test_parse_keeps_trailing_zeros() {
        // Cohort members stay distinct until normalized
        let d: DecimalValue = "1.50".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -2, 150));
        assert_eq!(d.normalized(None), DecimalValue::finite(false, -1, 15));
    }

    #[test]
    fn test_parse_exponent() {
        let d: DecimalValue = "1.5e10".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, 9, 15));
        let d: DecimalValue = "25E-3".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -3, 25));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!("0".parse::<DecimalValue>().unwrap(), DecimalValue::zero(false));
        assert_eq!("-0.000".parse::<DecimalValue>().unwrap(), DecimalValue::zero(true));
    }

    #[test]
    fn test_parse_special_values_case_insensitive() {
        assert!("INF".parse::<DecimalValue>().unwrap().is_infinite());
        assert!("+Infinity".parse::<DecimalValue>().unwrap().is_infinite());
        let neg: DecimalValue = "-inf".parse().unwrap();
        assert!(neg.is_infinite() && neg.sign);
        assert_eq!("NaN".parse::<DecimalValue>().unwrap(), DecimalValue::nan());
        assert_eq!(
            "sNaN".parse::<DecimalValue>().unwrap(),
            DecimalValue::signaling_nan()
        );
    }

    #[test]
    fn test_parse_rounds_to_16_digits() {
        // 17 digits, exact tie, kept digit even
        let d: DecimalValue = "1.2345678901234565".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -15, 1_234_567_890_123_456));
        // Same tie broken by a far-away non-zero digit
        let d: DecimalValue = "1.23456789012345650000001".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, -15, 1_234_567_890_123_457));
        // Long integer
        let d: DecimalValue = "123456789012345678901234".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, 8, 1_234_567_890_123_457));
        // Carry into a 17th digit
        let d: DecimalValue = "99999999999999995".parse().unwrap();
        assert_eq!(d, DecimalValue::finite(false, 17, 1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<DecimalValue>().is_err());
        assert!("+".parse::<DecimalValue>().is_err());
        assert!(".".parse::<DecimalValue>().is_err());
        assert!("1.2.3".parse::<DecimalValue>().is_err());
        assert!("12a".parse::<DecimalValue>().is_err());
        assert!("1e".parse::<DecimalValue>().is_err());
        assert!("1e99999999999".parse::<DecimalValue>().is_err());
    }

    #[test]
    fn test_display() {
        let cases = [
            (DecimalValue::finite(false, -1, 15), "1.5"),
            (DecimalValue::finite(true, -7, 88_419_305), "-8.8419305"),
            (DecimalValue::finite(false, -4, 5936), "0.5936"),
            (DecimalValue::finite(false, -6, 5), "0.000005"),
            (DecimalValue::finite(false, 3, 12), "12000"),
            (DecimalValue::finite(false, 20, 1), "1e20"),
            (DecimalValue::finite(false, -398, 1), "1e-398"),
            (DecimalValue::zero(true), "-0"),
            (DecimalValue::infinity(false), "inf"),
            (DecimalValue::nan(), "NaN"),
            (DecimalValue::signaling_nan(), "sNaN"),
        ];
        for (value, expected) in cases {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn test_display_parses_back() {
        for value in [
            DecimalValue::finite(false, -1, 15),
            DecimalValue::finite(true, -12, 123),
            DecimalValue::finite(false, 384, 1),
            DecimalValue::finite(true, -398, 9_999_999_999_999_999),
            DecimalValue::infinity(true),
        ] {
            let text = value.to_string();
            assert_eq!(text.parse::<DecimalValue>().unwrap(), value, "{text}");
        }
    }

    #[test]
    fn test_finite_zero_significand_is_zero() {
        assert_eq!(DecimalValue::finite(true, 7, 0), DecimalValue::zero(true));
    }
}
