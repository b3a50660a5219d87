//! Variable-length quantity codecs for unsigned 64-bit integers.
//!
//! Both directions split a value into 7-bit groups and set bit 7 on every byte
//! except the last one:
//!
//! - **right VLQ** (`rvlq_*`) writes the most significant group first,
//! - **left VLQ** (`lvlq_*`) writes the least significant group first.
//!
//! ```text
//! 88419305 = 0101010 0010100 1010111 1101001
//! rvlq:      0xaa    0x94    0xd7    0x69
//! lvlq:      0xe9    0xd7    0x94    0x2a
//! ```
//!
//! A right-VLQ encoder never produces a leading `0x80` byte (an empty group
//! with the continuation bit set), so that byte is free to act as an
//! out-of-band [`EXTENDED_MARKER`]. Decoding reads the marker as a zero group,
//! which means `0x80 0x02` decodes to `2`; callers check [`is_extended`] on
//! the first byte to tell the two apart.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};

/// Continuation bit carried by every byte of a VLQ except the last
const CONTINUATION: u8 = 0x80;

/// Payload bits carried by each byte
const GROUP_MASK: u8 = 0x7f;

/// Bits of payload per byte
const GROUP_BITS: u32 = 7;

/// Longest encoding of a `u64` (ceil(64 / 7))
pub const MAX_VLQ_SIZE: usize = 10;

/// Right-VLQ escape byte announcing an out-of-band value
pub const EXTENDED_MARKER: u8 = 0x80;

/// Check whether a right-VLQ field starting with `first_byte` is extended
#[must_use]
pub const fn is_extended(first_byte: u8) -> bool {
    first_byte == EXTENDED_MARKER
}

/// Number of bytes either VLQ direction needs for `value`
#[must_use]
pub const fn vlq_encoded_size(value: u64) -> usize {
    let bits = if value == 0 {
        1
    } else {
        64 - value.leading_zeros()
    };
    bits.div_ceil(GROUP_BITS) as usize
}

/// Number of bytes [`rvlq_encode`] writes for `value`
#[must_use]
pub const fn rvlq_encoded_size(value: u64) -> usize {
    vlq_encoded_size(value)
}

/// Number of bytes [`lvlq_encode`] writes for `value`
#[must_use]
pub const fn lvlq_encoded_size(value: u64) -> usize {
    vlq_encoded_size(value)
}

fn check_capacity(needed: usize, dst: &[u8]) -> EncodeResult<()> {
    if dst.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: dst.len(),
        });
    }
    Ok(())
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn group(value: u64, index: usize) -> u8 {
    (value >> (index as u32 * GROUP_BITS)) as u8 & GROUP_MASK
}

/// Encode `value` most-significant group first.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] without touching `dst` if it
/// cannot hold the whole encoding.
pub fn rvlq_encode(value: u64, dst: &mut [u8]) -> EncodeResult<usize> {
    let size = rvlq_encoded_size(value);
    check_capacity(size, dst)?;

    for (i, byte) in dst[..size].iter_mut().enumerate() {
        let remaining = size - 1 - i;
        *byte = group(value, remaining);
        if remaining > 0 {
            *byte |= CONTINUATION;
        }
    }

    Ok(size)
}

/// Decode a most-significant-group-first VLQ from the start of `src`.
///
/// Returns the value and the number of bytes consumed. A leading
/// [`EXTENDED_MARKER`] is consumed as an empty group.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedEndOfInput`] if `src` ends before the
/// final group, or [`DecodeError::VlqOverflow`] if the value needs more than
/// 64 bits.
pub fn rvlq_decode(src: &[u8]) -> DecodeResult<(u64, usize)> {
    let mut value = 0u64;

    for (i, &byte) in src.iter().enumerate() {
        if value > u64::MAX >> GROUP_BITS {
            return Err(DecodeError::VlqOverflow);
        }
        value = (value << GROUP_BITS) | u64::from(byte & GROUP_MASK);
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeError::UnexpectedEndOfInput)
}

/// Encode `value` least-significant group first.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] without touching `dst` if it
/// cannot hold the whole encoding.
pub fn lvlq_encode(value: u64, dst: &mut [u8]) -> EncodeResult<usize> {
    let size = lvlq_encoded_size(value);
    check_capacity(size, dst)?;

    for (i, byte) in dst[..size].iter_mut().enumerate() {
        *byte = group(value, i);
        if i + 1 < size {
            *byte |= CONTINUATION;
        }
    }

    Ok(size)
}

/// Decode a least-significant-group-first VLQ from the start of `src`.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedEndOfInput`] if `src` ends before the
/// final group, or [`DecodeError::VlqOverflow`] if the value needs more than
/// 64 bits.
pub fn lvlq_decode(src: &[u8]) -> DecodeResult<(u64, usize)> {
    let mut value = 0u64;

    for (i, &byte) in src.iter().enumerate() {
        let payload = u64::from(byte & GROUP_MASK);
        #[allow(clippy::cast_possible_truncation)]
        let shift = i as u32 * GROUP_BITS;
        if shift >= 64 || (shift > 0 && payload >> (64 - shift) != 0) {
            return Err(DecodeError::VlqOverflow);
        }
        value |= payload << shift;
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeError::UnexpectedEndOfInput)
}
