/*!
Sequence-length classification.

These are the only places that know the numeric breakpoints of the two encoding families; every codec goes through them.  Each function looks at exactly one scalar, byte, or unit.
*/
use crate::encoding::utf16::Utf16Error;
use crate::encoding::utf8::Utf8Error;

/// The largest Unicode code point.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// U+FFFD REPLACEMENT CHARACTER.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

pub const SURROGATE_MIN: u32 = 0xD800;
pub const SURROGATE_MAX: u32 = 0xDFFF;
pub const HIGH_SURROGATE_MAX: u32 = 0xDBFF;
pub const LOW_SURROGATE_MIN: u32 = 0xDC00;

/**
Length of a UTF-8 (or WTF-8) sequence, in bytes.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Utf8SeqLen {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Utf8SeqLen {
    #[inline]
    pub fn len(self) -> usize {
        self as usize
    }
}

/**
Length of a UTF-16 (or WTF-16) sequence, in units.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Utf16SeqLen {
    One = 1,
    Two = 2,
}

impl Utf16SeqLen {
    #[inline]
    pub fn len(self) -> usize {
        self as usize
    }
}

#[inline]
pub fn is_surrogate(cp: u32) -> bool {
    SURROGATE_MIN <= cp && cp <= SURROGATE_MAX
}

#[inline]
pub fn is_high_surrogate(cp: u32) -> bool {
    SURROGATE_MIN <= cp && cp <= HIGH_SURROGATE_MAX
}

#[inline]
pub fn is_low_surrogate(cp: u32) -> bool {
    LOW_SURROGATE_MIN <= cp && cp <= SURROGATE_MAX
}

/**
Number of bytes needed to encode `cp` in UTF-8.

Surrogates are *not* rejected here; whether they are encodable depends on the codec.

# Failure

Fails with `TooLargeCodepoint` if `cp` exceeds `MAX_CODEPOINT`.
*/
pub fn codepoint_seq_len(cp: u32) -> Result<Utf8SeqLen, Utf8Error> {
    match cp {
        0x00_0000..=0x00_007F => Ok(Utf8SeqLen::One),
        0x00_0080..=0x00_07FF => Ok(Utf8SeqLen::Two),
        0x00_0800..=0x00_FFFF => Ok(Utf8SeqLen::Three),
        0x01_0000..=MAX_CODEPOINT => Ok(Utf8SeqLen::Four),
        _ => Err(Utf8Error::TooLargeCodepoint),
    }
}

/**
Number of 16-bit units needed to encode `cp`.

# Failure

Fails with `CodepointTooLarge` if `cp` exceeds `MAX_CODEPOINT`.
*/
pub fn codepoint_unit_len(cp: u32) -> Result<Utf16SeqLen, Utf16Error> {
    match cp {
        0x00_0000..=0x00_FFFF => Ok(Utf16SeqLen::One),
        0x01_0000..=MAX_CODEPOINT => Ok(Utf16SeqLen::Two),
        _ => Err(Utf16Error::CodepointTooLarge),
    }
}

/**
Length of the sequence introduced by `first`, judged from its leading bits alone.

The patterns `0xxxxxxx`, `110xxxxx`, `1110xxxx`, and `11110xxx` are tried in that order.  Note that this accepts lead bytes that can only start an invalid sequence (`0xC0`, `0xC1`, `0xF5`..`0xF7`); those are rejected when the full sequence is decoded.
*/
pub fn byte_seq_len(first: u8) -> Result<Utf8SeqLen, Utf8Error> {
    if first & 0b1000_0000 == 0 {
        Ok(Utf8SeqLen::One)
    } else if first & 0b1110_0000 == 0b1100_0000 {
        Ok(Utf8SeqLen::Two)
    } else if first & 0b1111_0000 == 0b1110_0000 {
        Ok(Utf8SeqLen::Three)
    } else if first & 0b1111_1000 == 0b1111_0000 {
        Ok(Utf8SeqLen::Four)
    } else {
        Err(Utf8Error::InvalidStartByte)
    }
}

/**
Length of the sequence introduced by `first`.

A high surrogate introduces a pair; anything else but a low surrogate stands alone.

# Failure

Fails with `InvalidStartCodeUnit` if `first` is a low surrogate.
*/
pub fn codeunit_seq_len(first: u16) -> Result<Utf16SeqLen, Utf16Error> {
    let first = first as u32;
    if is_high_surrogate(first) {
        Ok(Utf16SeqLen::Two)
    } else if is_low_surrogate(first) {
        Err(Utf16Error::InvalidStartCodeUnit)
    } else {
        Ok(Utf16SeqLen::One)
    }
}
