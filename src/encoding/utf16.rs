/*!
Strict UTF-16.

Units are native-endian `u16`s.  A well-formed sequence never contains an unpaired surrogate half; see `wtf16` for sequences that might.
*/
use crate::encoding::classify::{self, Utf16SeqLen, MAX_CODEPOINT};
use crate::encoding::{ConvError, Encoding, OutOfBuffer, Utf16};
use crate::util::TrapErrExt;

/**
Errors produced by the UTF-16 codec.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Utf16Error {
    #[error("invalid start code unit")]
    InvalidStartCodeUnit,
    #[error("expected second surrogate half")]
    ExpectedSecondSurrogateHalf,
    #[error("dangling surrogate half")]
    DanglingSurrogateHalf,
    #[error("unexpected second surrogate half")]
    UnexpectedSecondSurrogateHalf,
    #[error("code point too large")]
    CodepointTooLarge,
}

/**
Combines a surrogate pair into the scalar it encodes.

# Failure

Fails with `UnexpectedSecondSurrogateHalf` if `high` is a low surrogate, `InvalidStartCodeUnit` if it is no surrogate at all, and `ExpectedSecondSurrogateHalf` if `low` is not a low surrogate.
*/
pub fn decode_surrogate_pair(high: u16, low: u16) -> Result<u32, Utf16Error> {
    let (high, low) = (high as u32, low as u32);
    if !classify::is_high_surrogate(high) {
        return Err(if classify::is_low_surrogate(high) {
            Utf16Error::UnexpectedSecondSurrogateHalf
        } else {
            Utf16Error::InvalidStartCodeUnit
        });
    }
    if !classify::is_low_surrogate(low) {
        return Err(Utf16Error::ExpectedSecondSurrogateHalf);
    }
    Ok(0x10000 + (((high & 0x3FF) << 10) | (low & 0x3FF)))
}

/**
Splits a supplementary-plane scalar (`U+10000` and above) into its high and low surrogates.
*/
pub(crate) fn split_surrogate_pair(cp: u32) -> [u16; 2] {
    let offset = cp - 0x10000;
    [(0xD800 + (offset >> 10)) as u16, (0xDC00 + (cp & 0x3FF)) as u16]
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

# Failure

Fails with `ConvError::Invalid` if `cp` is not a scalar value, and with `ConvError::Memory` if `out` is too short to hold it.
*/
pub fn encode(cp: u32, out: &mut [u16]) -> Result<&mut [u16], ConvError<Utf16Error, OutOfBuffer>> {
    let len = classify::codepoint_unit_len(cp).map_err(ConvError::Invalid)?;
    OutOfBuffer::check(len.len(), out.len()).map_err(ConvError::Memory)?;
    encode_within(cp, out).map_err(ConvError::Invalid)
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

Surrogate code points are not scalar values, and are refused with `CodepointTooLarge` just like values past `U+10FFFF`.

# Panics

Panics if `out` is shorter than the encoded sequence.
*/
pub fn encode_within(cp: u32, out: &mut [u16]) -> Result<&mut [u16], Utf16Error> {
    if cp > MAX_CODEPOINT || classify::is_surrogate(cp) {
        return Err(Utf16Error::CodepointTooLarge);
    }
    Ok(write_seq(cp, out))
}

/*
Shared with `wtf16`, which lets surrogate code points through.
*/
pub(crate) fn write_seq(cp: u32, out: &mut [u16]) -> &mut [u16] {
    if cp < 0x10000 {
        out[0] = cp as u16;
        &mut out[..1]
    } else {
        let pair = split_surrogate_pair(cp);
        let out = &mut out[..2];
        out.copy_from_slice(&pair);
        out
    }
}

/**
Decodes the scalar at the start of `units`.  Units past the first sequence are ignored.
*/
pub fn decode(units: &[u16]) -> Result<u32, Utf16Error> {
    let first = match units.first() {
        Some(&first) => first,
        None => return Err(Utf16Error::InvalidStartCodeUnit),
    };
    if classify::is_low_surrogate(first as u32) {
        return Err(Utf16Error::UnexpectedSecondSurrogateHalf);
    }
    match classify::codeunit_seq_len(first)? {
        Utf16SeqLen::One => Ok(first as u32),
        Utf16SeqLen::Two => match units.get(1) {
            Some(&second) => decode_surrogate_pair(first, second),
            None => Err(Utf16Error::DanglingSurrogateHalf),
        },
    }
}

/**
Checks that all of `units` is well-formed UTF-16, returning the first error found.
*/
pub fn validate(units: &[u16]) -> Result<(), Utf16Error> {
    Utf16::validate(units)
}

/**
Counts the scalars in `units`.

# Failure

Fails on malformed input, with the same error `validate` would report.
*/
pub fn count(units: &[u16]) -> Result<usize, Utf16Error> {
    let mut trap = Ok(());
    let count = Utf16Iter::new(units).trap_err(&mut trap).count();
    trap.map(|()| count)
}

/**
Iterates over the scalars of a UTF-16 sequence.

Unlike the byte iterators, this operates on unvalidated input, so every step can fail.  After yielding an error, the iterator is exhausted.
*/
#[derive(Clone, Debug)]
pub struct Utf16Iter<'a> {
    units: &'a [u16],
    at: usize,
}

impl<'a> Utf16Iter<'a> {
    pub fn new(units: &'a [u16]) -> Self {
        Utf16Iter {
            units: units,
            at: 0,
        }
    }

    /**
    Returns the next result without advancing.
    */
    pub fn peek(&self) -> Option<Result<u32, Utf16Error>> {
        self.clone().next()
    }

    /**
    Returns the result `n` elements ahead of the cursor without advancing.  An error short of that point is returned instead.
    */
    pub fn peek_at(&self, n: usize) -> Option<Result<u32, Utf16Error>> {
        let mut temp = self.clone();
        for _ in 0..n {
            if let Err(err) = temp.next()? {
                return Some(Err(err));
            }
        }
        temp.next()
    }

    /**
    Offset of the cursor, in units.
    */
    pub fn offset(&self) -> usize {
        self.at
    }
}

impl<'a> Iterator for Utf16Iter<'a> {
    type Item = Result<u32, Utf16Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at >= self.units.len() {
            return None;
        }

        match decode(&self.units[self.at..]) {
            Ok(cp) => {
                self.at += Utf16::units_for(cp);
                Some(Ok(cp))
            },
            Err(err) => {
                self.at = self.units.len();
                Some(Err(err))
            },
        }
    }
}

impl<'a> ::std::iter::FusedIterator for Utf16Iter<'a> {}
