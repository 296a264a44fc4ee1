use std::ptr::NonNull;

use wtfcodec::alloc::{AllocError, Allocator};
use wtfcodec::encoding::utf8;
use wtfcodec::{
    ConvError, OutOfBuffer, Rust, Utf16Error, Utf8Error, Utf8View, Wtf8Error, Wtf8View,
    utf16_to_utf8, utf16_to_utf8_alloc, utf16_to_utf8_len,
    utf8_as_wtf8, utf8_to_utf16, utf8_to_utf16_alloc, utf8_to_utf16_within, utf8_to_utf16_len,
    wtf16_to_wtf8, wtf16_to_wtf8_alloc, wtf16_to_wtf8_len,
    wtf8_as_utf8, wtf8_to_utf8_lossy, wtf8_to_utf8_lossy_alloc, wtf8_to_utf8_lossy_len,
    wtf8_to_wtf16, wtf8_to_wtf16_alloc, wtf8_to_wtf16_len, wtf8_to_wtf16_within,
};

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

/**
An allocator that has run out of memory.
*/
enum Exhausted {}

impl Allocator for Exhausted {
    type AllocError = AllocError;

    fn alloc_bytes(_bytes: usize, _align: usize) -> Result<NonNull<u8>, AllocError> {
        Err(AllocError::Failed)
    }

    unsafe fn free(_ptr: NonNull<u8>, _bytes: usize, _align: usize) {
        panic!("nothing was ever allocated");
    }

    fn debug_prefix() -> &'static str { "X" }
}

#[test]
fn test_garcon() {
    const WORD: &'static str = "gªrçon";
    const WORD_16: &'static [u16] = &[0x67, 0xAA, 0x72, 0xE7, 0x6F, 0x6E];

    let utf16 = utf8_to_utf16_alloc::<Rust>(WORD.as_bytes()).expect(here!());
    assert_eq!(utf16, WORD_16);

    let utf8 = utf16_to_utf8_alloc::<Rust>(&utf16).expect(here!());
    assert_eq!(utf8, WORD.as_bytes());

    let view = Utf8View::new(&utf8).expect(here!());
    assert_eq!(view.as_str(), WORD);
}

#[test]
fn test_utf16_to_utf8_supplementary() {
    let units = [0x0041, 0xD83D, 0xDE00];
    assert_eq!(utf16_to_utf8_len(&units), Ok(5));

    let mut buf = [0u8; 5];
    let out = utf16_to_utf8(&units, &mut buf).expect(here!());
    assert_eq!(out, &[0x41, 0xF0, 0x9F, 0x98, 0x80][..]);
}

#[test]
fn test_strict_rejects_surrogates() {
    let mut buf = [0u8; 8];
    assert_eq!(utf16_to_utf8_len(&[0x41, 0xD800]), Err(Utf16Error::DanglingSurrogateHalf));
    assert_eq!(utf16_to_utf8_len(&[0xDC00]), Err(Utf16Error::UnexpectedSecondSurrogateHalf));
    assert_eq!(
        utf16_to_utf8(&[0xD800, 0x41], &mut buf),
        Err(ConvError::Invalid(Utf16Error::ExpectedSecondSurrogateHalf))
    );

    let mut buf = [0u16; 8];
    assert_eq!(utf8_to_utf16_len(b"\xed\xa0\x80"), Err(Utf8Error::EncodesSurrogateHalf));
    assert_eq!(
        utf8_to_utf16(b"ab\xe2\x82", &mut buf),
        Err(ConvError::Invalid(Utf8Error::InvalidBytes))
    );
}

#[test]
fn test_lone_surrogate_round_trip() {
    let units = [0xD800];
    assert_eq!(wtf16_to_wtf8_len(&units), 3);

    let wtf8 = wtf16_to_wtf8_alloc::<Rust>(&units).expect(here!());
    assert_eq!(wtf8, &[0xED, 0xA0, 0x80][..]);

    let view = Wtf8View::new(&wtf8).expect(here!());
    assert_eq!(wtf8_as_utf8(view), Err(Utf8Error::EncodesSurrogateHalf));

    let back = wtf8_to_wtf16_alloc::<Rust>(&wtf8).expect(here!());
    assert_eq!(back, &units[..]);
}

#[test]
fn test_wtf8_halves_stay_separate() {
    // An encoded high half followed by an encoded low half.
    let wtf8 = b"\xed\xa0\xbd\xed\xb8\x80";
    assert_eq!(wtf8_to_wtf16_len(wtf8), Ok(2));

    let mut buf = [0u16; 2];
    let out = wtf8_to_wtf16_within(wtf8, &mut buf).expect(here!());
    assert_eq!(out, &[0xD83D, 0xDE00][..]);

    // Read back as WTF-16, the two units do form a pair.
    assert_eq!(wtf16_to_wtf8_len(&buf), 4);
    let mut back = [0u8; 4];
    assert_eq!(wtf16_to_wtf8(&buf, &mut back).expect(here!()), "😀".as_bytes());
}

#[test]
fn test_wtf8_still_rejects_bad_shapes() {
    assert_eq!(wtf8_to_wtf16_len(b"\xc0\xaf"), Err(Wtf8Error::OverlongEncoding));
    assert_eq!(wtf8_to_wtf16_len(b"a\xed\xa0"), Err(Wtf8Error::ExpectedContinuation));
    assert_eq!(wtf8_to_wtf16_len(b"\x80"), Err(Wtf8Error::InvalidStartByte));
    assert_eq!(
        wtf8_to_wtf16_alloc::<Rust>(b"\xf4\x90\x80\x80").unwrap_err(),
        ConvError::Invalid(Wtf8Error::CodepointTooLarge)
    );
}

#[test]
fn test_bounded_out_of_buffer() {
    let mut buf = [0u16; 1];
    assert_eq!(
        utf8_to_utf16("😀".as_bytes(), &mut buf),
        Err(ConvError::Memory(OutOfBuffer { required: 2, available: 1 }))
    );

    let mut buf = [0u8; 5];
    assert_eq!(
        wtf16_to_wtf8(&[0xD800, 0xDC00, 0xDFFF], &mut buf),
        Err(OutOfBuffer { required: 7, available: 5 })
    );

    let mut buf = [0u16; 0];
    assert_eq!(
        wtf8_to_wtf16(b"x", &mut buf),
        Err(ConvError::Memory(OutOfBuffer { required: 1, available: 0 }))
    );
}

#[test]
fn test_within_with_measured_buffer() {
    let src = "naïve €5".as_bytes();
    let len = utf8_to_utf16_len(src).expect(here!());
    let mut buf = vec![0u16; len];
    let out = utf8_to_utf16_within(src, &mut buf).expect(here!());
    assert_eq!(out.len(), len);
    assert_eq!(String::from_utf16(out).expect(here!()), "naïve €5");
}

#[test]
fn test_empty_input() {
    assert_eq!(utf8_to_utf16_len(b""), Ok(0));
    assert_eq!(wtf16_to_wtf8_len(&[]), 0);
    let out = utf16_to_utf8_alloc::<Rust>(&[]).expect(here!());
    assert!(out.is_empty());
    let mut buf = [0u8; 0];
    assert_eq!(wtf8_to_utf8_lossy(b"", &mut buf).expect(here!()).len(), 0);
}

#[test]
fn test_alloc_failure() {
    assert_eq!(
        utf8_to_utf16_alloc::<Exhausted>(b"abc").unwrap_err(),
        ConvError::Memory(AllocError::Failed)
    );
    assert_eq!(wtf16_to_wtf8_alloc::<Exhausted>(&[0xD800]).unwrap_err(), AllocError::Failed);

    // Invalid input is reported before anything is requested.
    assert_eq!(
        utf8_to_utf16_alloc::<Exhausted>(b"\xff").unwrap_err(),
        ConvError::Invalid(Utf8Error::InvalidStartByte)
    );
}

#[cfg(feature = "malloc")]
#[test]
fn test_malloc() {
    use wtfcodec::Malloc;

    let out = wtf16_to_wtf8_alloc::<Malloc>(&[0x67, 0xDFFF]).expect(here!());
    assert_eq!(out, &b"g\xed\xbf\xbf"[..]);
    assert_eq!(format!("{:?}", out), "C[103, 237, 191, 191]");
}

#[test]
fn test_lossy() {
    let wtf8 = b"a\xed\xa0\x80b\xed\xbf\xbf";
    assert_eq!(wtf8_to_utf8_lossy_len(wtf8), Ok(8));

    let mut buf = [0u8; 8];
    let out = wtf8_to_utf8_lossy(wtf8, &mut buf).expect(here!());
    assert_eq!(out, "a\u{FFFD}b\u{FFFD}".as_bytes());
    assert_eq!(utf8::validate(out), Ok(()));

    let mut buf = [0u8; 7];
    assert_eq!(
        wtf8_to_utf8_lossy(wtf8, &mut buf),
        Err(ConvError::Memory(OutOfBuffer { required: 8, available: 7 }))
    );

    let out = wtf8_to_utf8_lossy_alloc::<Rust>("gªrçon".as_bytes()).expect(here!());
    assert_eq!(out, "gªrçon".as_bytes());
}

#[test]
fn test_cross_casts() {
    let view = Utf8View::from("gªrçon");
    let wtf = utf8_as_wtf8(view);
    assert_eq!(wtf.as_bytes(), view.as_bytes());
    assert_eq!(wtf8_as_utf8(wtf), Ok(view));
    assert_eq!(format!("{:?}", wtf), "Wtf8\"gªrçon\"");
}
