//! # compact-float
//!
//! A compact, self-delimiting byte encoding for IEEE-754 binary64 doubles and
//! decimal64 values.
//!
//! Typical values shrink from 8 bytes to 2-5, the encoding carries its own
//! length, and every decimal64 round-trips exactly. Binary doubles are carried
//! through their nearest 16-significant-digit decimal, so every double whose
//! shortest representation fits in 16 digits comes back bit-for-bit.
//!
//! ## Examples
//!
//! ```rust
//! use compact_float::{binary_decode, binary_encode, decimal_decode, decimal_encode};
//! use compact_float::{Decimal64, MAX_ENCODED_SIZE};
//!
//! let mut buf = [0u8; MAX_ENCODED_SIZE];
//!
//! // 1.5 as a decimal64 (15 x 10^-1) takes two bytes
//! let value = Decimal64::from_parts(false, -1, 15).unwrap();
//! let len = decimal_encode(value, &mut buf).unwrap();
//! assert_eq!(&buf[..len], &[0x06, 0x0f]);
//! assert_eq!(decimal_decode(&buf[..len]).unwrap(), (value, len));
//!
//! // Binary doubles use the same wire format
//! let len = binary_encode(1.5, &mut buf).unwrap();
//! assert_eq!(&buf[..len], &[0x06, 0x0f]);
//! assert_eq!(binary_decode(&buf[..len]).unwrap(), (1.5, len));
//! ```
//!
//! Lossy encoding keeps only a number of significant digits, rounding half to
//! even:
//!
//! ```rust
//! use compact_float::{encode, Decimal64, MAX_ENCODED_SIZE};
//!
//! let value: Decimal64 = "0.5935555".parse::<compact_float::DecimalValue>()
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! let mut buf = [0u8; MAX_ENCODED_SIZE];
//! let len = encode(value, 4, &mut buf).unwrap();
//! assert_eq!(&buf[..len], &[0x12, 0xae, 0x30]); // 0.5936
//! ```
//!
//! ## Format Overview
//!
//! Each value is one or two right-VLQ fields (7-bit groups, most significant
//! first, bit 7 set on every byte but the last):
//!
//! - **Exponent field**: `sign | exponent_sign << 1 | |exponent| << 2`
//! - **Significand**: the decimal significand with trailing zeros moved into
//!   the exponent
//!
//! Zero is the single byte `0x02` (`0x03` when negative). Infinities and NaNs
//! are the extension marker `0x80` followed by a selector: `0` quiet NaN,
//! `1` signaling NaN, `2` +infinity, `3` -infinity.

pub(crate) mod binary;
pub(crate) mod codec;
pub(crate) mod decimal;
pub(crate) mod decimal64;
pub(crate) mod decoder;
pub(crate) mod encoder;
pub(crate) mod error;
pub(crate) mod significand;
pub mod vlq;

// Re-export main types and functions
pub use codec::{
    binary_decode, binary_encode, binary_encoded_size, decimal_decode, decimal_encode,
    decimal_encoded_size, encode, encoded_size, version,
};
pub use decimal::{DecimalKind, DecimalValue};
pub use decimal64::{construct, extract, Decimal64, MAX_EXPONENT, MIN_EXPONENT};
pub use encoder::MAX_ENCODED_SIZE;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, ParseError};
pub use significand::{MAX_DIGITS, MAX_SIGNIFICAND};
