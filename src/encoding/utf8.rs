/*!
Strict UTF-8.

Decoding rejects overlong forms, encoded surrogate halves, and anything above `U+10FFFF`, which makes a validated `Utf8View` exactly as strict as a Rust `str`.

The byte-shape rules (lead byte patterns, continuation bytes, overlong forms, the upper bound) are shared with `wtf8`, which differs only in what it allows a three-byte sequence to decode to.
*/
use std::fmt;
use std::str;

use crate::encoding::classify::{self, Utf8SeqLen, MAX_CODEPOINT};
use crate::encoding::{ConvError, Encoding, OutOfBuffer, Utf8};

/**
Errors produced by the UTF-8 codec.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Utf8Error {
    /// The input ended in the middle of a sequence, or was empty.
    #[error("invalid bytes")]
    InvalidBytes,
    #[error("invalid start byte")]
    InvalidStartByte,
    #[error("code point too large")]
    TooLargeCodepoint,
    #[error("encodes a surrogate half")]
    EncodesSurrogateHalf,
    #[error("expected continuation byte")]
    ExpectedContinuation,
    #[error("overlong encoding")]
    OverlongEncoding,
}

/*
Violations of the byte-shape rules, before either codec has given them a name.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShapeError {
    InvalidStartByte,
    Truncated,
    ExpectedContinuation,
    OverlongEncoding,
    TooLargeCodepoint,
}

impl From<ShapeError> for Utf8Error {
    fn from(v: ShapeError) -> Self {
        match v {
            ShapeError::InvalidStartByte => Utf8Error::InvalidStartByte,
            ShapeError::Truncated => Utf8Error::InvalidBytes,
            ShapeError::ExpectedContinuation => Utf8Error::ExpectedContinuation,
            ShapeError::OverlongEncoding => Utf8Error::OverlongEncoding,
            ShapeError::TooLargeCodepoint => Utf8Error::TooLargeCodepoint,
        }
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

#[inline]
fn payload(byte: u8) -> u32 {
    (byte & 0b0011_1111) as u32
}

#[inline]
fn continuation(bits: u32) -> u8 {
    0b1000_0000 | (bits & 0b0011_1111) as u8
}

pub(crate) fn decode2_shape(bytes: &[u8; 2]) -> Result<u32, ShapeError> {
    if bytes[0] & 0b1110_0000 != 0b1100_0000 {
        return Err(ShapeError::InvalidStartByte);
    }
    if !is_continuation(bytes[1]) {
        return Err(ShapeError::ExpectedContinuation);
    }
    let val = ((bytes[0] & 0b0001_1111) as u32) << 6 | payload(bytes[1]);
    if val < 0x80 {
        return Err(ShapeError::OverlongEncoding);
    }
    Ok(val)
}

pub(crate) fn decode3_shape(bytes: &[u8; 3]) -> Result<u32, ShapeError> {
    if bytes[0] & 0b1111_0000 != 0b1110_0000 {
        return Err(ShapeError::InvalidStartByte);
    }
    let mut val = (bytes[0] & 0b0000_1111) as u32;
    for &byte in &bytes[1..] {
        if !is_continuation(byte) {
            return Err(ShapeError::ExpectedContinuation);
        }
        val = (val << 6) | payload(byte);
    }
    if val < 0x800 {
        return Err(ShapeError::OverlongEncoding);
    }
    Ok(val)
}

pub(crate) fn decode4_shape(bytes: &[u8; 4]) -> Result<u32, ShapeError> {
    if bytes[0] & 0b1111_1000 != 0b1111_0000 {
        return Err(ShapeError::InvalidStartByte);
    }
    let mut val = (bytes[0] & 0b0000_0111) as u32;
    for &byte in &bytes[1..] {
        if !is_continuation(byte) {
            return Err(ShapeError::ExpectedContinuation);
        }
        val = (val << 6) | payload(byte);
    }
    if val < 0x10000 {
        return Err(ShapeError::OverlongEncoding);
    }
    if val > MAX_CODEPOINT {
        return Err(ShapeError::TooLargeCodepoint);
    }
    Ok(val)
}

/**
Decodes one sequence by shape alone; a three-byte sequence may yield a surrogate.
*/
pub(crate) fn decode_shape(bytes: &[u8]) -> Result<(u32, Utf8SeqLen), ShapeError> {
    let first = *bytes.first().ok_or(ShapeError::Truncated)?;
    let len = classify::byte_seq_len(first).map_err(|_| ShapeError::InvalidStartByte)?;
    if bytes.len() < len.len() {
        return Err(ShapeError::Truncated);
    }

    let cp = match len {
        Utf8SeqLen::One => first as u32,
        Utf8SeqLen::Two => decode2_shape(&[bytes[0], bytes[1]])?,
        Utf8SeqLen::Three => decode3_shape(&[bytes[0], bytes[1], bytes[2]])?,
        Utf8SeqLen::Four => decode4_shape(&[bytes[0], bytes[1], bytes[2], bytes[3]])?,
    };
    Ok((cp, len))
}

/**
Assembles the payload bits of a sequence already known to be well-formed.

`bytes` must be non-empty.  Nothing is checked: garbage in, garbage out.
*/
pub(crate) fn decode_assume_valid(bytes: &[u8]) -> u32 {
    let lead = bytes[0];
    let mut val = match bytes.len() {
        1 => return lead as u32,
        2 => lead & 0b0001_1111,
        3 => lead & 0b0000_1111,
        _ => lead & 0b0000_0111,
    } as u32;
    for &byte in &bytes[1..] {
        val = (val << 6) | payload(byte);
    }
    val
}

/**
Writes `cp` as a `len`-byte sequence at the start of `out`, without checking whether `cp` belongs in one.
*/
pub(crate) fn write_seq(cp: u32, len: Utf8SeqLen, out: &mut [u8]) -> &mut [u8] {
    let out = &mut out[..len.len()];
    match len {
        Utf8SeqLen::One => {
            out[0] = cp as u8;
        },
        Utf8SeqLen::Two => {
            out[0] = 0b1100_0000 | (cp >> 6) as u8;
            out[1] = continuation(cp);
        },
        Utf8SeqLen::Three => {
            out[0] = 0b1110_0000 | (cp >> 12) as u8;
            out[1] = continuation(cp >> 6);
            out[2] = continuation(cp);
        },
        Utf8SeqLen::Four => {
            out[0] = 0b1111_0000 | (cp >> 18) as u8;
            out[1] = continuation(cp >> 12);
            out[2] = continuation(cp >> 6);
            out[3] = continuation(cp);
        },
    }
    out
}

/**
Returns `true` if `cp` is a Unicode scalar value: at most `U+10FFFF`, and not a surrogate.
*/
pub fn is_valid_codepoint(cp: u32) -> bool {
    cp <= MAX_CODEPOINT && !classify::is_surrogate(cp)
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

# Failure

Fails with `ConvError::Invalid` if `cp` is not a scalar value, and with `ConvError::Memory` if `out` is too short to hold it.
*/
pub fn encode(cp: u32, out: &mut [u8]) -> Result<&mut [u8], ConvError<Utf8Error, OutOfBuffer>> {
    let len = classify::codepoint_seq_len(cp).map_err(ConvError::Invalid)?;
    OutOfBuffer::check(len.len(), out.len()).map_err(ConvError::Memory)?;
    encode_within(cp, out).map_err(ConvError::Invalid)
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

# Panics

Panics if `out` is shorter than the encoded sequence.  Use `classify::codepoint_seq_len` to size it, or call `encode` instead.
*/
pub fn encode_within(cp: u32, out: &mut [u8]) -> Result<&mut [u8], Utf8Error> {
    let len = classify::codepoint_seq_len(cp)?;
    if classify::is_surrogate(cp) {
        return Err(Utf8Error::EncodesSurrogateHalf);
    }
    Ok(write_seq(cp, len, out))
}

/**
Decodes the sequence at the start of `bytes`.  Trailing bytes past the first sequence are ignored.
*/
pub fn decode(bytes: &[u8]) -> Result<u32, Utf8Error> {
    let (cp, _) = decode_shape(bytes)?;
    if classify::is_surrogate(cp) {
        return Err(Utf8Error::EncodesSurrogateHalf);
    }
    Ok(cp)
}

/**
Decodes a two-byte sequence.
*/
pub fn decode2(bytes: [u8; 2]) -> Result<u32, Utf8Error> {
    Ok(decode2_shape(&bytes)?)
}

/**
Decodes a three-byte sequence.  Surrogate halves are rejected.
*/
pub fn decode3(bytes: [u8; 3]) -> Result<u32, Utf8Error> {
    let cp = decode3_shape(&bytes)?;
    if classify::is_surrogate(cp) {
        return Err(Utf8Error::EncodesSurrogateHalf);
    }
    Ok(cp)
}

/**
Decodes a four-byte sequence.
*/
pub fn decode4(bytes: [u8; 4]) -> Result<u32, Utf8Error> {
    Ok(decode4_shape(&bytes)?)
}

/**
Checks that all of `bytes` is valid UTF-8, returning the first error found.
*/
pub fn validate(bytes: &[u8]) -> Result<(), Utf8Error> {
    Utf8::validate(bytes)
}

/**
Counts the scalars in `bytes`.

# Failure

Fails on malformed input, with the same error `validate` would report.
*/
pub fn count(bytes: &[u8]) -> Result<usize, Utf8Error> {
    let mut count = 0;
    let mut at = 0;
    while at < bytes.len() {
        let cp = decode(&bytes[at..])?;
        at += Utf8::units_for(cp);
        count += 1;
    }
    Ok(count)
}

/**
A borrowed run of bytes known to be valid UTF-8.
*/
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf8View<'a> {
    bytes: &'a [u8],
}

impl<'a> Utf8View<'a> {
    /**
    Validates `bytes` and wraps them.
    */
    pub fn new(bytes: &'a [u8]) -> Result<Self, Utf8Error> {
        validate(bytes)?;
        Ok(Utf8View { bytes: bytes })
    }

    /**
    Wraps `bytes` without validating them.

    # Safety

    `bytes` must be valid UTF-8.  `as_str` hands the bytes to code that assumes as much.
    */
    pub unsafe fn new_unchecked(bytes: &'a [u8]) -> Self {
        Utf8View { bytes: bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn as_str(&self) -> &'a str {
        unsafe { str::from_utf8_unchecked(self.bytes) }
    }

    /**
    Length in bytes.
    */
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn iter(&self) -> Utf8Iter<'a> {
        Utf8Iter::new(*self)
    }
}

impl<'a> From<&'a str> for Utf8View<'a> {
    fn from(s: &'a str) -> Self {
        Utf8View { bytes: s.as_bytes() }
    }
}

impl<'a> fmt::Display for Utf8View<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), fmt)
    }
}

impl<'a> fmt::Debug for Utf8View<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}{:?}", Utf8::debug_prefix(), self.as_str())
    }
}

/**
Iterates over the scalars of a `Utf8View`.
*/
#[derive(Clone, Debug)]
pub struct Utf8Iter<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Utf8Iter<'a> {
    pub fn new(view: Utf8View<'a>) -> Self {
        Utf8Iter {
            bytes: view.as_bytes(),
            at: 0,
        }
    }
}

byte_iter_impl! { Utf8Iter }
