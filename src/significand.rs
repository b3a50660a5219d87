//! Significand normalization: trailing-zero stripping and significant-digit
//! rounding.
//!
//! Stripping trailing zeros moves them into the exponent, which never loses
//! information and only ever shortens the encoded significand. Rounding to a
//! number of significant digits is the one lossy step of the whole codec and
//! only happens when the caller asks for it.

/// Most decimal digits a decimal64 significand can hold
pub const MAX_DIGITS: u32 = 16;

/// Largest decimal64 significand (16 nines)
pub const MAX_SIGNIFICAND: u64 = 9_999_999_999_999_999;

/// Powers of ten that fit in a `u64`
const POW10: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Number of decimal digits in `value` (zero has one digit)
#[must_use]
pub fn digit_count(value: u64) -> u32 {
    // POW10 is sorted, so the insertion point is the digit count
    #[allow(clippy::cast_possible_truncation)]
    let count = POW10.partition_point(|&p| p <= value) as u32;
    count.max(1)
}

/// `10^exp`, or `None` if it does not fit in a `u64`
#[must_use]
pub fn pow10(exp: u32) -> Option<u64> {
    POW10.get(exp as usize).copied()
}

/// Map the public `significant_digits` argument to a rounding target.
///
/// Anything outside `1..16` means "keep every digit".
#[must_use]
pub fn precision(significant_digits: i32) -> Option<u32> {
    u32::try_from(significant_digits)
        .ok()
        .filter(|&d| d > 0 && d < MAX_DIGITS)
}

/// Remove trailing decimal zeros, moving them into the exponent
#[must_use]
pub fn strip_trailing_zeros(mut significand: u64, mut exponent: i32) -> (u64, i32) {
    if significand == 0 {
        return (0, exponent);
    }
    while significand % 10 == 0 {
        significand /= 10;
        exponent = exponent.saturating_add(1);
    }
    (significand, exponent)
}

/// Drop the lowest digit until `significand` has at most `digits` of them.
///
/// Each drop rounds half to even on the dropped digit alone: above 5 rounds
/// up, below 5 truncates, and exactly 5 rounds up only when the retained
/// value is odd. The exponent goes up by one per drop. A carry that adds a
/// digit (`9995 -> 1000`) is handled by the next pass of the loop.
#[must_use]
pub fn round_to_digits(mut significand: u64, mut exponent: i32, digits: u32) -> (u64, i32) {
    let digits = digits.max(1);
    while digit_count(significand) > digits {
        let remainder = significand % 10;
        significand /= 10;
        if remainder > 5 || (remainder == 5 && significand % 2 == 1) {
            significand += 1;
        }
        exponent = exponent.saturating_add(1);
    }
    (significand, exponent)
}

/// Reduce a significand/exponent pair to its shortest form.
///
/// Trailing zeros are always stripped. When `significant_digits` is
/// `Some(d)` with `0 < d < 16`, the significand is also rounded half to even
/// down to `d` digits and stripped again.
#[must_use]
pub fn normalize(significand: u64, exponent: i32, significant_digits: Option<u32>) -> (u64, i32) {
    let (significand, exponent) = strip_trailing_zeros(significand, exponent);

    match significant_digits {
        Some(d) if d > 0 && d < MAX_DIGITS => {
            let (rounded, exponent) = round_to_digits(significand, exponent, d);
            strip_trailing_zeros(rounded, exponent)
        }
        _ => (significand, exponent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(MAX_SIGNIFICAND), 16);
        assert_eq!(digit_count(MAX_SIGNIFICAND + 1), 17);
        assert_eq!(digit_count(u64::MAX), 20);
    }

    #[test]
    fn test_precision_mapping() {
        assert_eq!(precision(0), None);
        assert_eq!(precision(-3), None);
        assert_eq!(precision(16), None);
        assert_eq!(precision(1), Some(1));
        assert_eq!(precision(15), Some(15));
    }

    #[test]
    fn test_strip_trailing_zeros() {
        assert_eq!(strip_trailing_zeros(1_500, -3), (15, -1));
        assert_eq!(strip_trailing_zeros(1_000_000_000_000_000, 369), (1, 384));
        assert_eq!(strip_trailing_zeros(7, 2), (7, 2));
        assert_eq!(strip_trailing_zeros(0, 5), (0, 5));
    }

    #[test]
    fn test_round_from_reference_example() {
        // 0.5935555 to 4 digits -> 0.5936
        assert_eq!(normalize(5_935_555, -7, Some(4)), (5936, -4));
    }

    #[test]
    fn test_round_half_to_even() {
        // Ties go to the even neighbour
        assert_eq!(normalize(1_245, -3, Some(3)), (124, -2));
        assert_eq!(normalize(1_235, -3, Some(3)), (124, -2));
        // Above 5 rounds up, below 5 truncates
        assert_eq!(normalize(1_246, -3, Some(3)), (125, -2));
        assert_eq!(normalize(1_254, -3, Some(3)), (125, -2));
    }

    #[test]
    fn test_round_one_digit_at_a_time() {
        // 1.2451 -> 1.245 (1 truncates) -> 1.24 (tie, 4 is even)
        assert_eq!(normalize(12_451, -4, Some(3)), (124, -2));
        // 124.501 -> 124.50 -> 124.5 -> 124 (tie, 4 is even)
        assert_eq!(normalize(124_501, -3, Some(3)), (124, 0));
        // 124.499 -> 124.50 -> 124.5 -> 124
        assert_eq!(normalize(124_499, -3, Some(3)), (124, 0));
        // 1.2459 -> 1.246 -> 1.25
        assert_eq!(normalize(12_459, -4, Some(3)), (125, -2));
        // 1.2351 -> 1.235 -> 1.24 (tie, 3 is odd)
        assert_eq!(normalize(12_351, -4, Some(3)), (124, -2));
    }

    #[test]
    fn test_round_carry_adds_digit() {
        // 9995 -> 1000 -> stripped to 1 x 10^4
        assert_eq!(normalize(9_995, 1, Some(3)), (1, 5));
        // 1996 -> 200 -> stripped to 2 x 10^2
        assert_eq!(normalize(1_996, 0, Some(3)), (2, 3));
    }

    #[test]
    fn test_no_rounding_without_target() {
        assert_eq!(normalize(5_935_555, -7, None), (5_935_555, -7));
        assert_eq!(normalize(5_935_555, -7, Some(16)), (5_935_555, -7));
        assert_eq!(normalize(5_935_555, -7, Some(7)), (5_935_555, -7));
    }

    #[test]
    fn test_normalize_idempotent() {
        for &(s, e, d) in &[
            (5_935_555u64, -7i32, Some(4u32)),
            (1_500, -3, None),
            (9_995, 1, Some(3)),
            (MAX_SIGNIFICAND, 0, Some(1)),
        ] {
            let (s1, e1) = normalize(s, e, d);
            assert_eq!(normalize(s1, e1, d), (s1, e1));
            assert_eq!(normalize(s1, e1, None), (s1, e1));
        }
    }

    #[test]
    fn test_round_to_one_digit_of_max() {
        // 9999999999999999 -> 10 x 10^15 -> 1 x 10^16
        assert_eq!(normalize(MAX_SIGNIFICAND, 0, Some(1)), (1, 16));
    }
}
