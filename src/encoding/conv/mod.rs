/*!
Encoding conversion support.

Every conversion between two encodings comes in four flavours:

| Suffix    | Output                  | Fails on |
| --------- | ----------------------- | -------- |
| `_len`    | required length, in units of the target | invalid input |
| (none)    | written prefix of a caller-supplied buffer | invalid input, or buffer too small |
| `_within` | written prefix of a caller-supplied buffer | invalid input; *panics* if the buffer is too small |
| `_alloc`  | exactly-sized `AllocBuf` | invalid input, or allocation failure |

All of them scan the source twice: once to validate it and work out how long the output will be, and once to write it.  Nothing is written unless the first scan succeeds, and once it has, the second scan cannot fail on content.
*/
use std::convert::Infallible;

use log::{debug, trace};

use crate::alloc::{AllocBuf, Allocator};
use crate::encoding::classify::{self, REPLACEMENT_CHARACTER};
use crate::encoding::utf16::Utf16Error;
use crate::encoding::utf8::{self, Utf8Error, Utf8View};
use crate::encoding::wtf8::{Wtf8Error, Wtf8View};
use crate::encoding::{ConvError, Encoding, OutOfBuffer, Scalars, Utf16, Utf8, Wtf16, Wtf8};
use crate::util::TrapErrExt;

fn coerce<T>(v: Result<T, Infallible>) -> T {
    match v {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

fn memory_only<M>(err: ConvError<Infallible, M>) -> M {
    match err {
        ConvError::Invalid(never) => match never {},
        ConvError::Memory(err) => err,
    }
}

/**
Length pass: how many units of `D` it takes to hold `src`.
*/
fn transcode_len<S, D>(src: &[S::Unit]) -> Result<usize, S::DecodeError>
where
    S: Encoding,
    D: Encoding,
{
    let mut trap = Ok(());
    let len = Scalars::<S>::new(src).trap_err(&mut trap).map(D::units_for).sum();
    trap.map(|()| len)
}

/**
Fill pass.  `out` must be at least as long as the length pass said.
*/
fn transcode_fill<S, D>(src: &[S::Unit], out: &mut [D::Unit]) -> Result<usize, S::DecodeError>
where
    S: Encoding,
    D: Encoding,
{
    let mut trap = Ok(());
    let mut at = 0;
    for cp in Scalars::<S>::new(src).trap_err(&mut trap) {
        at += match D::encode_within(cp, &mut out[at..]) {
            Ok(written) => written,
            Err(err) => unreachable!(
                "U+{:04X} decoded from {} is not encodable as {}: {}",
                cp, S::debug_prefix(), D::debug_prefix(), err),
        };
    }
    trap.map(|()| at)
}

fn transcode<'o, S, D>(src: &[S::Unit], out: &'o mut [D::Unit])
    -> Result<&'o mut [D::Unit], ConvError<S::DecodeError, OutOfBuffer>>
where
    S: Encoding,
    D: Encoding,
{
    let required = transcode_len::<S, D>(src).map_err(ConvError::Invalid)?;
    OutOfBuffer::check(required, out.len()).map_err(ConvError::Memory)?;
    let written = transcode_fill::<S, D>(src, out).map_err(ConvError::Invalid)?;
    Ok(&mut out[..written])
}

fn transcode_within<'o, S, D>(src: &[S::Unit], out: &'o mut [D::Unit])
    -> Result<&'o mut [D::Unit], S::DecodeError>
where
    S: Encoding,
    D: Encoding,
{
    transcode_len::<S, D>(src)?;
    let written = transcode_fill::<S, D>(src, out)?;
    Ok(&mut out[..written])
}

fn transcode_alloc<S, D, A>(src: &[S::Unit])
    -> Result<AllocBuf<D::Unit, A>, ConvError<S::DecodeError, A::AllocError>>
where
    S: Encoding,
    D: Encoding,
    A: Allocator,
{
    let required = transcode_len::<S, D>(src).map_err(ConvError::Invalid)?;
    trace!("{} -> {}: {} source units need {} units", S::debug_prefix(), D::debug_prefix(), src.len(), required);

    let mut buf = AllocBuf::<D::Unit, A>::zeroed(required).map_err(|err| {
        debug!("{} -> {}: allocating {} units from {} failed: {}",
            S::debug_prefix(), D::debug_prefix(), required, A::debug_prefix(), err);
        ConvError::Memory(err)
    })?;

    let written = transcode_fill::<S, D>(src, &mut buf).map_err(ConvError::Invalid)?;
    debug_assert_eq!(written, required);
    Ok(buf)
}

/*
Strict conversions (UTF-8 <-> UTF-16).
*/

/**
Number of UTF-16 units needed to hold `utf8`.
*/
pub fn utf8_to_utf16_len(utf8: &[u8]) -> Result<usize, Utf8Error> {
    transcode_len::<Utf8, Utf16>(utf8)
}

/**
Converts `utf8` into `out`, returning the written prefix.
*/
pub fn utf8_to_utf16<'o>(utf8: &[u8], out: &'o mut [u16])
    -> Result<&'o mut [u16], ConvError<Utf8Error, OutOfBuffer>>
{
    transcode::<Utf8, Utf16>(utf8, out)
}

/**
Converts `utf8` into `out`, returning the written prefix.

# Panics

Panics if `out` is shorter than `utf8_to_utf16_len(utf8)`.
*/
pub fn utf8_to_utf16_within<'o>(utf8: &[u8], out: &'o mut [u16]) -> Result<&'o mut [u16], Utf8Error> {
    transcode_within::<Utf8, Utf16>(utf8, out)
}

/**
Converts `utf8` into a new buffer obtained from `A`.
*/
pub fn utf8_to_utf16_alloc<A>(utf8: &[u8]) -> Result<AllocBuf<u16, A>, ConvError<Utf8Error, A::AllocError>>
where
    A: Allocator,
{
    transcode_alloc::<Utf8, Utf16, A>(utf8)
}

/**
Number of UTF-8 bytes needed to hold `utf16`.
*/
pub fn utf16_to_utf8_len(utf16: &[u16]) -> Result<usize, Utf16Error> {
    transcode_len::<Utf16, Utf8>(utf16)
}

/**
Converts `utf16` into `out`, returning the written prefix.
*/
pub fn utf16_to_utf8<'o>(utf16: &[u16], out: &'o mut [u8])
    -> Result<&'o mut [u8], ConvError<Utf16Error, OutOfBuffer>>
{
    transcode::<Utf16, Utf8>(utf16, out)
}

/**
Converts `utf16` into `out`, returning the written prefix.

# Panics

Panics if `out` is shorter than `utf16_to_utf8_len(utf16)`.
*/
pub fn utf16_to_utf8_within<'o>(utf16: &[u16], out: &'o mut [u8]) -> Result<&'o mut [u8], Utf16Error> {
    transcode_within::<Utf16, Utf8>(utf16, out)
}

/**
Converts `utf16` into a new buffer obtained from `A`.
*/
pub fn utf16_to_utf8_alloc<A>(utf16: &[u16]) -> Result<AllocBuf<u8, A>, ConvError<Utf16Error, A::AllocError>>
where
    A: Allocator,
{
    transcode_alloc::<Utf16, Utf8, A>(utf16)
}

/*
Permissive conversions (WTF-8 <-> WTF-16).
*/

/**
Number of WTF-16 units needed to hold `wtf8`.  Fails only on malformed byte shapes.
*/
pub fn wtf8_to_wtf16_len(wtf8: &[u8]) -> Result<usize, Wtf8Error> {
    transcode_len::<Wtf8, Wtf16>(wtf8)
}

/**
Converts `wtf8` into `out`, returning the written prefix.  Encoded surrogate halves become single units.
*/
pub fn wtf8_to_wtf16<'o>(wtf8: &[u8], out: &'o mut [u16])
    -> Result<&'o mut [u16], ConvError<Wtf8Error, OutOfBuffer>>
{
    transcode::<Wtf8, Wtf16>(wtf8, out)
}

/**
Converts `wtf8` into `out`, returning the written prefix.

# Panics

Panics if `out` is shorter than `wtf8_to_wtf16_len(wtf8)`.
*/
pub fn wtf8_to_wtf16_within<'o>(wtf8: &[u8], out: &'o mut [u16]) -> Result<&'o mut [u16], Wtf8Error> {
    transcode_within::<Wtf8, Wtf16>(wtf8, out)
}

/**
Converts `wtf8` into a new buffer obtained from `A`.
*/
pub fn wtf8_to_wtf16_alloc<A>(wtf8: &[u8]) -> Result<AllocBuf<u16, A>, ConvError<Wtf8Error, A::AllocError>>
where
    A: Allocator,
{
    transcode_alloc::<Wtf8, Wtf16, A>(wtf8)
}

/**
Number of WTF-8 bytes needed to hold `wtf16`.
*/
pub fn wtf16_to_wtf8_len(wtf16: &[u16]) -> usize {
    coerce(transcode_len::<Wtf16, Wtf8>(wtf16))
}

/**
Converts `wtf16` into `out`, returning the written prefix.  Can only fail if `out` is too short.
*/
pub fn wtf16_to_wtf8<'o>(wtf16: &[u16], out: &'o mut [u8]) -> Result<&'o mut [u8], OutOfBuffer> {
    transcode::<Wtf16, Wtf8>(wtf16, out).map_err(memory_only)
}

/**
Converts `wtf16` into `out`, returning the written prefix.

# Panics

Panics if `out` is shorter than `wtf16_to_wtf8_len(wtf16)`.
*/
pub fn wtf16_to_wtf8_within<'o>(wtf16: &[u16], out: &'o mut [u8]) -> &'o mut [u8] {
    coerce(transcode_within::<Wtf16, Wtf8>(wtf16, out))
}

/**
Converts `wtf16` into a new buffer obtained from `A`.  Can only fail if the allocator does.
*/
pub fn wtf16_to_wtf8_alloc<A>(wtf16: &[u16]) -> Result<AllocBuf<u8, A>, A::AllocError>
where
    A: Allocator,
{
    transcode_alloc::<Wtf16, Wtf8, A>(wtf16).map_err(memory_only)
}

/*
Cross-casting.
*/

/**
Reinterprets UTF-8 as WTF-8.  Free, and cannot fail: every UTF-8 sequence is a WTF-8 sequence.
*/
pub fn utf8_as_wtf8(view: Utf8View) -> Wtf8View {
    unsafe { Wtf8View::new_unchecked(view.as_bytes()) }
}

/**
Reinterprets WTF-8 as UTF-8, if it contains no surrogate halves.  This scans the whole view.
*/
pub fn wtf8_as_utf8(view: Wtf8View) -> Result<Utf8View, Utf8Error> {
    Utf8View::new(view.as_bytes())
}

impl<'a> From<Utf8View<'a>> for Wtf8View<'a> {
    fn from(view: Utf8View<'a>) -> Self {
        utf8_as_wtf8(view)
    }
}

/*
Lossy conversion (WTF-8 -> UTF-8).

The output length is worked out from the length of what each code point is replaced *with*, rather than assumed equal to the input length.  For U+FFFD in place of a surrogate the two happen to coincide.
*/

fn lossy(cp: u32) -> u32 {
    if classify::is_surrogate(cp) {
        REPLACEMENT_CHARACTER
    } else {
        cp
    }
}

/**
Number of UTF-8 bytes needed to hold `wtf8` with its surrogate halves replaced.
*/
pub fn wtf8_to_utf8_lossy_len(wtf8: &[u8]) -> Result<usize, Wtf8Error> {
    let mut trap = Ok(());
    let len = Scalars::<Wtf8>::new(wtf8).trap_err(&mut trap).map(lossy).map(Utf8::units_for).sum();
    trap.map(|()| len)
}

fn wtf8_to_utf8_lossy_fill(wtf8: &[u8], out: &mut [u8]) -> Result<usize, Wtf8Error> {
    let mut trap = Ok(());
    let mut at = 0;
    let mut replaced = 0;
    for cp in Scalars::<Wtf8>::new(wtf8).trap_err(&mut trap) {
        let repl = lossy(cp);
        if repl != cp {
            replaced += 1;
        }
        at += match utf8::encode_within(repl, &mut out[at..]) {
            Ok(written) => written.len(),
            Err(err) => unreachable!("U+{:04X} is not encodable as UTF-8: {}", repl, err),
        };
    }
    if replaced > 0 {
        debug!("replaced {} surrogate half(s) with U+FFFD", replaced);
    }
    trap.map(|()| at)
}

/**
Converts `wtf8` into UTF-8 in `out`, replacing every surrogate half with U+FFFD, and returns the written prefix.

# Failure

Fails if `wtf8` is malformed, or if `out` is too short.
*/
pub fn wtf8_to_utf8_lossy<'o>(wtf8: &[u8], out: &'o mut [u8])
    -> Result<&'o mut [u8], ConvError<Wtf8Error, OutOfBuffer>>
{
    let required = wtf8_to_utf8_lossy_len(wtf8).map_err(ConvError::Invalid)?;
    OutOfBuffer::check(required, out.len()).map_err(ConvError::Memory)?;
    let written = wtf8_to_utf8_lossy_fill(wtf8, out).map_err(ConvError::Invalid)?;
    Ok(&mut out[..written])
}

/**
Converts `wtf8` into UTF-8 in a new buffer obtained from `A`, replacing every surrogate half with U+FFFD.
*/
pub fn wtf8_to_utf8_lossy_alloc<A>(wtf8: &[u8]) -> Result<AllocBuf<u8, A>, ConvError<Wtf8Error, A::AllocError>>
where
    A: Allocator,
{
    let required = wtf8_to_utf8_lossy_len(wtf8).map_err(ConvError::Invalid)?;
    trace!("Wtf8 -> Utf8 (lossy): {} bytes need {} bytes", wtf8.len(), required);

    let mut buf = AllocBuf::<u8, A>::zeroed(required).map_err(|err| {
        debug!("Wtf8 -> Utf8 (lossy): allocating {} bytes from {} failed: {}", required, A::debug_prefix(), err);
        ConvError::Memory(err)
    })?;

    let written = wtf8_to_utf8_lossy_fill(wtf8, &mut buf).map_err(ConvError::Invalid)?;
    debug_assert_eq!(written, required);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Rust;

    #[test]
    fn test_utf8_to_utf16() {
        let mut buf = [0; 8];
        let out = utf8_to_utf16("aç😀".as_bytes(), &mut buf).unwrap();
        assert_eq!(out, &[0x61, 0xE7, 0xD83D, 0xDE00][..]);
        assert_eq!(utf8_to_utf16_len("aç😀".as_bytes()), Ok(4));
    }

    #[test]
    fn test_bounded_reports_sizes() {
        let mut buf = [0; 3];
        assert_eq!(
            utf8_to_utf16("aç😀".as_bytes(), &mut buf),
            Err(ConvError::Memory(OutOfBuffer { required: 4, available: 3 }))
        );
        // Nothing is written when the length pass refuses.
        assert_eq!(buf, [0, 0, 0]);
    }

    #[test]
    fn test_invalid_input_beats_small_buffer() {
        let mut buf = [0; 0];
        assert_eq!(utf8_to_utf16(b"\xc0\x80", &mut buf), Err(ConvError::Invalid(Utf8Error::OverlongEncoding)));
    }

    #[test]
    fn test_wtf16_to_wtf8_within() {
        let mut buf = [0; 3];
        assert_eq!(wtf16_to_wtf8_within(&[0xD800], &mut buf), &[0xED, 0xA0, 0x80][..]);
    }

    #[test]
    #[should_panic]
    fn test_within_panics_on_short_buffer() {
        let mut buf = [0; 2];
        let _ = wtf16_to_wtf8_within(&[0xD800], &mut buf);
    }

    #[test]
    fn test_lossy_len_matches_input_len() {
        let wtf8 = b"a\xed\xa0\x80\xf0\x9f\x98\x80\xed\xbf\xbf";
        assert_eq!(wtf8_to_utf8_lossy_len(wtf8), Ok(wtf8.len()));
    }

    #[test]
    fn test_lossy_alloc() {
        let out = wtf8_to_utf8_lossy_alloc::<Rust>(b"a\xed\xa0\x80b").unwrap();
        assert_eq!(out, &b"a\xef\xbf\xbdb"[..]);
        assert_eq!(wtf8_to_utf8_lossy_alloc::<Rust>(b"a\xed").unwrap_err(), ConvError::Invalid(Wtf8Error::ExpectedContinuation));
    }

    #[test]
    fn test_cross_casts() {
        let view = Utf8View::from("gªrçon");
        let wtf: Wtf8View = view.into();
        assert_eq!(wtf.as_bytes(), view.as_bytes());
        assert_eq!(wtf8_as_utf8(wtf), Ok(view));
    }
}
