use thiserror::Error;

/// Errors that can occur while decoding a compact float
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of input while decoding")]
    UnexpectedEndOfInput,

    #[error("Invalid VLQ field: value does not fit in 64 bits")]
    VlqOverflow,

    #[error("Invalid special value selector {0}: expected 0, 1, 2 or 3 after the extension marker")]
    InvalidSpecialValue(u64),

    #[error("Invalid significand: {0} exceeds 16 decimal digits")]
    SignificandOutOfRange(u64),

    #[error("Invalid exponent: 10^{0} is outside the decimal64 range")]
    ExponentOutOfRange(i64),

    #[error("Invalid encoding: zero significand (zero has its own one-byte form)")]
    ZeroSignificand,
}

/// Errors that can occur during encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Buffer too small: need {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors that can occur while parsing a decimal from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid decimal format: {0}")]
    InvalidFormat(String),

    #[error("Exponent out of range: {0}")]
    ExponentOverflow(String),
}

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encoding operations
pub type EncodeResult<T> = Result<T, EncodeError>;
