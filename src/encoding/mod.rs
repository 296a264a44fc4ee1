/*!
Encodings, code units, and the shared codec interface.

Each supported encoding lives in its own module (`utf8`, `utf16`, `wtf8`, `wtf16`) as a set of free functions plus view and iterator types.  The marker types defined here tie those functions together behind the `Encoding` trait, which is what the conversion functions in `conv` are written against.
*/
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

macro_rules! naive_unit_impl {
    ($ty_name:ident) => {
        impl Unit for $ty_name {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    };
}

/*
Both byte-oriented iterators share their cursor logic; they differ only in which view they are built from.  The cursor relies on the view's invariant, and never panics if that invariant was violated through an unchecked constructor; it just yields garbage.
*/
macro_rules! byte_iter_impl {
    ($iter:ident) => {
        impl<'a> $iter<'a> {
            /**
            Returns the raw bytes of the next sequence, and advances past them.
            */
            pub fn next_bytes(&mut self) -> Option<&'a [u8]> {
                if self.at >= self.bytes.len() {
                    return None;
                }

                let rest = &self.bytes[self.at..];
                let len = $crate::encoding::classify::byte_seq_len(rest[0])
                    .map(|len| len.len())
                    .unwrap_or(1)
                    .min(rest.len());
                self.at += len;
                Some(&rest[..len])
            }

            /**
            Returns the next scalar without advancing.
            */
            pub fn peek(&self) -> Option<u32> {
                self.clone().next()
            }

            /**
            Returns the raw bytes of the next sequence without advancing.
            */
            pub fn peek_bytes(&self) -> Option<&'a [u8]> {
                self.clone().next_bytes()
            }

            /**
            Returns the scalar `n` elements ahead of the cursor (`peek_at(0)` is `peek()`) without advancing.
            */
            pub fn peek_at(&self, n: usize) -> Option<u32> {
                self.clone().nth(n)
            }

            /**
            Returns the raw bytes of the sequence `n` elements ahead of the cursor without advancing.
            */
            pub fn peek_at_bytes(&self, n: usize) -> Option<&'a [u8]> {
                let mut temp = self.clone();
                for _ in 0..n {
                    temp.next_bytes()?;
                }
                temp.next_bytes()
            }

            /**
            Byte offset of the cursor from the start of the view.
            */
            pub fn offset(&self) -> usize {
                self.at
            }

            /**
            The bytes not yet consumed.
            */
            pub fn rest(&self) -> &'a [u8] {
                &self.bytes[self.at..]
            }
        }

        impl<'a> Iterator for $iter<'a> {
            type Item = u32;

            fn next(&mut self) -> Option<u32> {
                self.next_bytes().map($crate::encoding::utf8::decode_assume_valid)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let rest = self.bytes.len() - self.at;
                ((rest + 3) / 4, Some(rest))
            }
        }

        impl<'a> ::std::iter::FusedIterator for $iter<'a> {}
    };
}

pub mod classify;
pub mod conv;
pub mod utf16;
pub mod utf8;
pub mod wtf16;
pub mod wtf8;

/**
The interface every codec implements.

In practice, this will be implemented by a marker type (which is not intended to actually be instantiated anywhere) that forwards to the free functions of the corresponding codec module.
*/
pub trait Encoding: Sized {
    /**
    The code unit of this encoding: `u8` for the byte encodings, `u16` for the 16-bit ones.
    */
    type Unit: Unit;

    /**
    Errors raised while decoding.  Encodings whose decoder cannot fail use `Infallible`.
    */
    type DecodeError: StdError + Copy + 'static;

    /**
    Errors raised while encoding a scalar.
    */
    type EncodeError: StdError + Copy + 'static;

    /**
    Returns a short string used to identify this encoding in debug output.
    */
    fn debug_prefix() -> &'static str;

    /**
    The number of units `cp` occupies in this encoding.

    Only the numeric breakpoints are consulted; `cp` is not otherwise checked.  Values above `MAX_CODEPOINT` report the longest sequence length.
    */
    fn units_for(cp: u32) -> usize;

    /**
    Encodes `cp` at the start of `out`, returning the number of units written.

    # Panics

    Panics if `out` is shorter than `units_for(cp)`.
    */
    fn encode_within(cp: u32, out: &mut [Self::Unit]) -> Result<usize, Self::EncodeError>;

    /**
    Decodes the scalar at the start of `units`, returning it along with the number of units it occupied.

    Returns `None` if `units` is empty.
    */
    fn decode_next(units: &[Self::Unit]) -> Option<Result<(u32, usize), Self::DecodeError>>;

    /**
    Checks that `units` decodes completely, returning the first error otherwise.
    */
    fn validate(units: &[Self::Unit]) -> Result<(), Self::DecodeError> {
        Scalars::<Self>::new(units).try_for_each(|cp| cp.map(drop))
    }
}

/**
A single code unit.
*/
pub trait Unit: Copy + fmt::Debug + 'static {
    fn zero() -> Self;
    fn is_zero(&self) -> bool;
}

naive_unit_impl! { u8 }
naive_unit_impl! { u16 }

/**
Strict UTF-8.
*/
pub enum Utf8 {}

impl Encoding for Utf8 {
    type Unit = u8;
    type DecodeError = utf8::Utf8Error;
    type EncodeError = utf8::Utf8Error;

    fn debug_prefix() -> &'static str { "Utf8" }

    fn units_for(cp: u32) -> usize {
        classify::codepoint_seq_len(cp).map_or(4, |len| len.len())
    }

    fn encode_within(cp: u32, out: &mut [u8]) -> Result<usize, utf8::Utf8Error> {
        utf8::encode_within(cp, out).map(|written| written.len())
    }

    fn decode_next(units: &[u8]) -> Option<Result<(u32, usize), utf8::Utf8Error>> {
        if units.is_empty() {
            return None;
        }
        Some(utf8::decode(units).map(|cp| (cp, Self::units_for(cp))))
    }
}

/**
Strict UTF-16, in native byte order.
*/
pub enum Utf16 {}

impl Encoding for Utf16 {
    type Unit = u16;
    type DecodeError = utf16::Utf16Error;
    type EncodeError = utf16::Utf16Error;

    fn debug_prefix() -> &'static str { "Utf16" }

    fn units_for(cp: u32) -> usize {
        classify::codepoint_unit_len(cp).map_or(2, |len| len.len())
    }

    fn encode_within(cp: u32, out: &mut [u16]) -> Result<usize, utf16::Utf16Error> {
        utf16::encode_within(cp, out).map(|written| written.len())
    }

    fn decode_next(units: &[u16]) -> Option<Result<(u32, usize), utf16::Utf16Error>> {
        if units.is_empty() {
            return None;
        }
        Some(utf16::decode(units).map(|cp| (cp, Self::units_for(cp))))
    }
}

/**
WTF-8: UTF-8 that also admits encoded surrogate halves.
*/
pub enum Wtf8 {}

impl Encoding for Wtf8 {
    type Unit = u8;
    type DecodeError = wtf8::Wtf8Error;
    type EncodeError = wtf8::Wtf8Error;

    fn debug_prefix() -> &'static str { "Wtf8" }

    fn units_for(cp: u32) -> usize {
        Utf8::units_for(cp)
    }

    fn encode_within(cp: u32, out: &mut [u8]) -> Result<usize, wtf8::Wtf8Error> {
        wtf8::encode_within(cp, out).map(|written| written.len())
    }

    fn decode_next(units: &[u8]) -> Option<Result<(u32, usize), wtf8::Wtf8Error>> {
        if units.is_empty() {
            return None;
        }
        Some(wtf8::decode(units).map(|cp| (cp, Self::units_for(cp))))
    }
}

/**
WTF-16: any sequence of 16-bit units.  Decoding never fails.
*/
pub enum Wtf16 {}

impl Encoding for Wtf16 {
    type Unit = u16;
    type DecodeError = Infallible;
    type EncodeError = utf16::Utf16Error;

    fn debug_prefix() -> &'static str { "Wtf16" }

    fn units_for(cp: u32) -> usize {
        Utf16::units_for(cp)
    }

    fn encode_within(cp: u32, out: &mut [u16]) -> Result<usize, utf16::Utf16Error> {
        wtf16::encode_within(cp, out).map(|written| written.len())
    }

    fn decode_next(units: &[u16]) -> Option<Result<(u32, usize), Infallible>> {
        let mut iter = wtf16::Wtf16Iter::new(units);
        iter.next().map(|cp| Ok((cp, iter.offset())))
    }
}

/**
Iterates over the scalars of any `Encoding`.

Yields the first decoding error, if any, and is exhausted afterwards.
*/
pub struct Scalars<'a, E> where E: Encoding {
    units: &'a [E::Unit],
    at: usize,
}

impl<'a, E> Scalars<'a, E> where E: Encoding {
    pub fn new(units: &'a [E::Unit]) -> Self {
        Scalars {
            units: units,
            at: 0,
        }
    }

    /**
    Offset of the cursor from the start, in units.
    */
    pub fn offset(&self) -> usize {
        self.at
    }
}

impl<'a, E> Clone for Scalars<'a, E> where E: Encoding {
    fn clone(&self) -> Self {
        Scalars {
            units: self.units,
            at: self.at,
        }
    }
}

impl<'a, E> Iterator for Scalars<'a, E> where E: Encoding {
    type Item = Result<u32, E::DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match E::decode_next(&self.units[self.at..])? {
            Ok((cp, used)) => {
                self.at += used;
                Some(Ok(cp))
            },
            Err(err) => {
                self.at = self.units.len();
                Some(Err(err))
            },
        }
    }
}

/**
Failure of an operation that can go wrong for two unrelated reasons: the input was invalid, or there was not enough memory to hold the output.

`M` is `OutOfBuffer` for functions writing into a caller-supplied buffer, and the allocator's error type for functions that allocate.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConvError<E, M> {
    #[error("invalid input: {0}")]
    Invalid(E),
    #[error("out of memory: {0}")]
    Memory(M),
}

impl<E, M> ConvError<E, M> {
    /**
    Returns the input error, if that is what this is.
    */
    pub fn invalid(self) -> Option<E> {
        match self {
            ConvError::Invalid(err) => Some(err),
            ConvError::Memory(_) => None,
        }
    }

    /**
    Returns the memory error, if that is what this is.
    */
    pub fn memory(self) -> Option<M> {
        match self {
            ConvError::Invalid(_) => None,
            ConvError::Memory(err) => Some(err),
        }
    }
}

/**
A caller-supplied output buffer was too small.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("output buffer too small: {required} units required, {available} available")]
pub struct OutOfBuffer {
    pub required: usize,
    pub available: usize,
}

impl OutOfBuffer {
    pub(crate) fn check(required: usize, available: usize) -> Result<(), OutOfBuffer> {
        if required > available {
            Err(OutOfBuffer {
                required: required,
                available: available,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_stop_after_error() {
        let mut it = Scalars::<Utf8>::new(&b"a\xffb"[..]);
        assert_eq!(it.next(), Some(Ok(0x61)));
        assert_eq!(it.next(), Some(Err(utf8::Utf8Error::InvalidStartByte)));
        assert_eq!(it.next(), None);
        assert_eq!(it.offset(), 3);
    }

    #[test]
    fn test_scalars_track_offset() {
        let units = [0x0041, 0xD83D, 0xDE00, 0xDC00];
        let mut it = Scalars::<Wtf16>::new(&units);
        assert_eq!(it.next(), Some(Ok(0x41)));
        assert_eq!(it.offset(), 1);
        assert_eq!(it.next(), Some(Ok(0x1F600)));
        assert_eq!(it.offset(), 3);
        assert_eq!(it.next(), Some(Ok(0xDC00)));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_validate_through_trait() {
        assert_eq!(Utf8::validate("gªrçon".as_bytes()), Ok(()));
        assert_eq!(Utf8::validate(&b"\xed\xa0\x80"[..]), Err(utf8::Utf8Error::EncodesSurrogateHalf));
        assert_eq!(Wtf8::validate(&b"\xed\xa0\x80"[..]), Ok(()));
        assert_eq!(Utf16::validate(&[0xD800]), Err(utf16::Utf16Error::DanglingSurrogateHalf));
        assert_eq!(Wtf16::validate(&[0xD800]), Ok(()));
    }

    #[test]
    fn test_units_for() {
        assert_eq!(Utf8::units_for(0x7F), 1);
        assert_eq!(Utf8::units_for(0x800), 3);
        assert_eq!(Utf8::units_for(0x10FFFF), 4);
        assert_eq!(Utf16::units_for(0xFFFF), 1);
        assert_eq!(Utf16::units_for(0x10000), 2);
        assert_eq!(Wtf16::units_for(0xD800), 1);
    }

    #[test]
    fn test_out_of_buffer() {
        assert_eq!(OutOfBuffer::check(3, 3), Ok(()));
        assert_eq!(OutOfBuffer::check(4, 3), Err(OutOfBuffer { required: 4, available: 3 }));
        let err: ConvError<utf8::Utf8Error, OutOfBuffer> = ConvError::Memory(OutOfBuffer { required: 4, available: 3 });
        assert_eq!(err.invalid(), None);
        assert_eq!(err.to_string(), "out of memory: output buffer too small: 4 units required, 3 available");
    }
}
