/*!
WTF-8: UTF-8 extended with encoded surrogate halves.

This uses exactly the byte shapes of UTF-8; the only difference is that a three-byte sequence may decode to a code point in `U+D800`..`U+DFFF`.  No attempt is made to reject a high surrogate followed by a low one: any such pair is accepted as two separate code points.
*/
use std::fmt;

use crate::encoding::classify::{self, MAX_CODEPOINT};
use crate::encoding::utf8::{self, ShapeError};
use crate::encoding::{ConvError, Encoding, OutOfBuffer, Wtf8};

/**
Errors produced by the WTF-8 codec.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Wtf8Error {
    #[error("invalid start byte")]
    InvalidStartByte,
    /// Also reported when the input ends in the middle of a sequence.
    #[error("expected continuation byte")]
    ExpectedContinuation,
    #[error("overlong encoding")]
    OverlongEncoding,
    #[error("code point too large")]
    CodepointTooLarge,
}

impl From<ShapeError> for Wtf8Error {
    fn from(v: ShapeError) -> Self {
        match v {
            ShapeError::InvalidStartByte => Wtf8Error::InvalidStartByte,
            ShapeError::Truncated => Wtf8Error::ExpectedContinuation,
            ShapeError::ExpectedContinuation => Wtf8Error::ExpectedContinuation,
            ShapeError::OverlongEncoding => Wtf8Error::OverlongEncoding,
            ShapeError::TooLargeCodepoint => Wtf8Error::CodepointTooLarge,
        }
    }
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.  Surrogate code points are encoded like any other.

# Failure

Fails with `ConvError::Invalid` if `cp` exceeds `U+10FFFF`, and with `ConvError::Memory` if `out` is too short to hold it.
*/
pub fn encode(cp: u32, out: &mut [u8]) -> Result<&mut [u8], ConvError<Wtf8Error, OutOfBuffer>> {
    if cp > MAX_CODEPOINT {
        return Err(ConvError::Invalid(Wtf8Error::CodepointTooLarge));
    }
    OutOfBuffer::check(Wtf8::units_for(cp), out.len()).map_err(ConvError::Memory)?;
    encode_within(cp, out).map_err(ConvError::Invalid)
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

# Panics

Panics if `out` is shorter than the encoded sequence.
*/
pub fn encode_within(cp: u32, out: &mut [u8]) -> Result<&mut [u8], Wtf8Error> {
    let len = classify::codepoint_seq_len(cp).map_err(|_| Wtf8Error::CodepointTooLarge)?;
    Ok(utf8::write_seq(cp, len, out))
}

/**
Decodes the sequence at the start of `bytes`.  Trailing bytes past the first sequence are ignored.
*/
pub fn decode(bytes: &[u8]) -> Result<u32, Wtf8Error> {
    if bytes.is_empty() {
        return Err(Wtf8Error::ExpectedContinuation);
    }
    let (cp, _) = utf8::decode_shape(bytes)?;
    Ok(cp)
}

/**
Decodes a three-byte sequence, which may be a surrogate half.
*/
pub fn decode3(bytes: [u8; 3]) -> Result<u32, Wtf8Error> {
    Ok(utf8::decode3_shape(&bytes)?)
}

/**
Checks that all of `bytes` is well-formed WTF-8, returning the first error found.
*/
pub fn validate(bytes: &[u8]) -> Result<(), Wtf8Error> {
    Wtf8::validate(bytes)
}

/**
Counts the code points in `bytes`, surrogates included.

# Failure

Fails on malformed input, with the same error `validate` would report.
*/
pub fn count(bytes: &[u8]) -> Result<usize, Wtf8Error> {
    let mut count = 0;
    let mut at = 0;
    while at < bytes.len() {
        let (_, len) = utf8::decode_shape(&bytes[at..])?;
        at += len.len();
        count += 1;
    }
    Ok(count)
}

/**
A borrowed run of bytes known to be well-formed WTF-8.
*/
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Wtf8View<'a> {
    bytes: &'a [u8],
}

impl<'a> Wtf8View<'a> {
    /**
    Validates `bytes` and wraps them.
    */
    pub fn new(bytes: &'a [u8]) -> Result<Self, Wtf8Error> {
        validate(bytes)?;
        Ok(Wtf8View { bytes: bytes })
    }

    /**
    Wraps `bytes` without validating them.

    # Safety

    This method is not memory-unsafe; here, `unsafe` marks that the caller vouches for the contents.  Iterating over a view of malformed bytes yields meaningless code points.
    */
    pub unsafe fn new_unchecked(bytes: &'a [u8]) -> Self {
        Wtf8View { bytes: bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
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

    pub fn iter(&self) -> Wtf8Iter<'a> {
        Wtf8Iter::new(*self)
    }
}

/**
Formats like a string literal, with surrogate halves escaped as `\u{D800}`.
*/
impl<'a> fmt::Debug for Wtf8View<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}\"", Wtf8::debug_prefix())?;
        for cp in self.iter() {
            match ::std::char::from_u32(cp) {
                Some(c) => {
                    for e in c.escape_debug() {
                        write!(fmt, "{}", e)?;
                    }
                },
                None => write!(fmt, "\\u{{{:X}}}", cp)?,
            }
        }
        write!(fmt, "\"")
    }
}

/**
Iterates over the code points of a `Wtf8View`, surrogates included.
*/
#[derive(Clone, Debug)]
pub struct Wtf8Iter<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Wtf8Iter<'a> {
    pub fn new(view: Wtf8View<'a>) -> Self {
        Wtf8Iter {
            bytes: view.as_bytes(),
            at: 0,
        }
    }
}

byte_iter_impl! { Wtf8Iter }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_accepts_surrogates() {
        assert_eq!(decode(b"\xed\xa0\x80"), Ok(0xD800));
        assert_eq!(decode(b"\xed\xb0\x80"), Ok(0xDC00));
        assert_eq!(decode(b"\xed\xbf\xbf"), Ok(0xDFFF));
        assert_eq!(decode3([0xED, 0xA0, 0xBD]), Ok(0xD83D));
    }

    #[test]
    fn test_decode_shares_utf8_shapes() {
        assert_eq!(decode(b"a"), Ok(0x61));
        assert_eq!(decode(b"\xc3\xa7"), Ok(0xE7));
        assert_eq!(decode(b"\xf0\x9f\x98\x80"), Ok(0x1F600));
        assert_eq!(decode(b""), Err(Wtf8Error::ExpectedContinuation));
        assert_eq!(decode(b"\x80"), Err(Wtf8Error::InvalidStartByte));
        assert_eq!(decode(b"\xf8\x80\x80\x80"), Err(Wtf8Error::InvalidStartByte));
        assert_eq!(decode(b"\xc0\x80"), Err(Wtf8Error::OverlongEncoding));
        assert_eq!(decode(b"\xe0\x9f\xbf"), Err(Wtf8Error::OverlongEncoding));
        assert_eq!(decode(b"\xf4\x90\x80\x80"), Err(Wtf8Error::CodepointTooLarge));
        assert_eq!(decode(b"\xed\xa0a"), Err(Wtf8Error::ExpectedContinuation));
        assert_eq!(decode(b"\xed\xa0"), Err(Wtf8Error::ExpectedContinuation));
    }

    #[test]
    fn test_encode() {
        let mut buf = [0; 4];
        assert_eq!(encode(0xD800, &mut buf).map(|b| b.to_vec()), Ok(vec![0xED, 0xA0, 0x80]));
        assert_eq!(encode(0xDFFF, &mut buf).map(|b| b.to_vec()), Ok(vec![0xED, 0xBF, 0xBF]));
        assert_eq!(encode(0x1F600, &mut buf).map(|b| b.to_vec()), Ok(vec![0xF0, 0x9F, 0x98, 0x80]));
        assert_eq!(encode(0x110000, &mut buf), Err(ConvError::Invalid(Wtf8Error::CodepointTooLarge)));

        let mut buf = [0; 2];
        assert_eq!(
            encode(0xD800, &mut buf),
            Err(ConvError::Memory(OutOfBuffer { required: 3, available: 2 }))
        );
    }

    #[test]
    fn test_validate_and_count() {
        assert_eq!(validate(b"a\xed\xa0\x80b"), Ok(()));
        assert_eq!(count(b"a\xed\xa0\x80b"), Ok(3));
        // A high and a low half are two code points, not one.
        assert_eq!(count(b"\xed\xa0\xbd\xed\xb8\x80"), Ok(2));
        assert_eq!(validate(b"a\xed\xa0"), Err(Wtf8Error::ExpectedContinuation));
        assert_eq!(count(b"\xc1\x81"), Err(Wtf8Error::OverlongEncoding));
    }

    #[test]
    fn test_view_and_iter() {
        let view = Wtf8View::new(b"a\xed\xa0\x80\xe2\x82\xac").unwrap();
        assert_eq!(view.len(), 7);
        let mut it = view.iter();
        assert_eq!(it.peek_at(1), Some(0xD800));
        assert_eq!(it.next(), Some(0x61));
        assert_eq!(it.next_bytes(), Some(&b"\xed\xa0\x80"[..]));
        assert_eq!(it.next(), Some(0x20AC));
        assert_eq!(it.next(), None);
        assert_eq!(Wtf8View::new(b"\xed"), Err(Wtf8Error::ExpectedContinuation));
    }

    #[test]
    fn test_debug_escapes_surrogates() {
        let view = Wtf8View::new(b"a\xed\xa0\x80\"").unwrap();
        assert_eq!(format!("{:?}", view), "Wtf8\"a\\u{D800}\\\"\"");
    }
}
