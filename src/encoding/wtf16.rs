/*!
WTF-16: arbitrary sequences of 16-bit units.

There is no such thing as malformed WTF-16.  Well-formed surrogate pairs decode to the supplementary-plane scalar they encode; every other surrogate half decodes to a code point equal to its own value.
*/
use crate::encoding::classify::{self, MAX_CODEPOINT};
use crate::encoding::utf16::{self, Utf16Error};
use crate::encoding::{ConvError, OutOfBuffer};

/**
Encodes `cp` at the start of `out`, and returns the written subslice.  A surrogate code point is written as a single unit.

# Failure

Fails with `ConvError::Invalid` if `cp` exceeds `U+10FFFF`, and with `ConvError::Memory` if `out` is too short to hold it.
*/
pub fn encode(cp: u32, out: &mut [u16]) -> Result<&mut [u16], ConvError<Utf16Error, OutOfBuffer>> {
    let len = classify::codepoint_unit_len(cp).map_err(ConvError::Invalid)?;
    OutOfBuffer::check(len.len(), out.len()).map_err(ConvError::Memory)?;
    encode_within(cp, out).map_err(ConvError::Invalid)
}

/**
Encodes `cp` at the start of `out`, and returns the written subslice.

# Panics

Panics if `out` is shorter than the encoded sequence.
*/
pub fn encode_within(cp: u32, out: &mut [u16]) -> Result<&mut [u16], Utf16Error> {
    if cp > MAX_CODEPOINT {
        return Err(Utf16Error::CodepointTooLarge);
    }
    Ok(utf16::write_seq(cp, out))
}

/**
Decodes the code point at the start of `units`.  Returns `None` only if `units` is empty.
*/
pub fn decode(units: &[u16]) -> Option<u32> {
    Wtf16Iter::new(units).next()
}

/**
Counts the code points in `units`, counting each unpaired surrogate as one.
*/
pub fn count(units: &[u16]) -> usize {
    Wtf16Iter::new(units).count()
}

/**
Iterates over the code points of a WTF-16 sequence.  Never fails.
*/
#[derive(Clone, Debug)]
pub struct Wtf16Iter<'a> {
    units: &'a [u16],
    at: usize,
}

impl<'a> Wtf16Iter<'a> {
    pub fn new(units: &'a [u16]) -> Self {
        Wtf16Iter {
            units: units,
            at: 0,
        }
    }

    /**
    Returns the next code point without advancing.
    */
    pub fn peek(&self) -> Option<u32> {
        self.clone().next()
    }

    /**
    Returns the code point `n` elements ahead of the cursor without advancing.
    */
    pub fn peek_at(&self, n: usize) -> Option<u32> {
        self.clone().nth(n)
    }

    /**
    Offset of the cursor, in units.
    */
    pub fn offset(&self) -> usize {
        self.at
    }
}

impl<'a> Iterator for Wtf16Iter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let first = *self.units.get(self.at)?;
        self.at += 1;

        if classify::is_high_surrogate(first as u32) {
            if let Some(&second) = self.units.get(self.at) {
                if let Ok(cp) = utf16::decode_surrogate_pair(first, second) {
                    self.at += 1;
                    return Some(cp);
                }
            }
        }
        Some(first as u32)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.units.len() - self.at;
        ((rest + 1) / 2, Some(rest))
    }
}

impl<'a> ::std::iter::FusedIterator for Wtf16Iter<'a> {}
