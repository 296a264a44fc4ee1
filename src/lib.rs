/*!
This crate provides strict and permissive Unicode codecs, and conversions between them.

The strict codecs, UTF-8 and UTF-16, accept only well-formed text.  The permissive ones, WTF-8 and WTF-16, additionally carry unpaired surrogate halves, which is what you get from Windows file names, JavaScript strings, and other sources that *say* "UTF-16" without checking.

For more details, see the [additional documentation](doc/index.html).

# Quick Reference

The following table describes which conversion to reach for.  Every conversion comes in four flavours: `_len` (measure only), bounded (write into a caller buffer, checked), `_within` (write into a caller buffer already known to be large enough), and `_alloc` (write into a fresh, exactly-sized `AllocBuf`).

| Have | Want | Use | Can fail on content |
| ---: | --- | --- | --- |
| `&[u8]` UTF-8 | `[u16]` UTF-16 | `utf8_to_utf16` | Yes |
| `&[u16]` UTF-16 | `[u8]` UTF-8 | `utf16_to_utf8` | Yes |
| `&[u8]` WTF-8 | `[u16]` WTF-16 | `wtf8_to_wtf16` | Only if malformed |
| `&[u16]` WTF-16 | `[u8]` WTF-8 | `wtf16_to_wtf8` | No |
| `Utf8View` | `Wtf8View` | `utf8_as_wtf8` | No, and free |
| `Wtf8View` | `Utf8View` | `wtf8_as_utf8` | Yes, if it holds a surrogate |
| `&[u8]` WTF-8 | `[u8]` UTF-8 | `wtf8_to_utf8_lossy` | Only if malformed |

Code points are passed around as plain `u32`s, because a surrogate half is a perfectly good WTF-8 code point, but not a `char`.
*/

pub mod alloc;
#[doc(hidden)] pub mod doc;
pub mod encoding;

mod util;

pub use crate::alloc::{AllocBuf, AllocError, Allocator, Rust};
#[cfg(feature = "malloc")]
pub use crate::alloc::Malloc;
pub use crate::encoding::{ConvError, Encoding, OutOfBuffer, Utf16, Utf8, Wtf16, Wtf8};
pub use crate::encoding::conv::{
    utf8_as_wtf8, wtf8_as_utf8,
    utf8_to_utf16, utf8_to_utf16_alloc, utf8_to_utf16_len, utf8_to_utf16_within,
    utf16_to_utf8, utf16_to_utf8_alloc, utf16_to_utf8_len, utf16_to_utf8_within,
    wtf8_to_wtf16, wtf8_to_wtf16_alloc, wtf8_to_wtf16_len, wtf8_to_wtf16_within,
    wtf16_to_wtf8, wtf16_to_wtf8_alloc, wtf16_to_wtf8_len, wtf16_to_wtf8_within,
    wtf8_to_utf8_lossy, wtf8_to_utf8_lossy_alloc, wtf8_to_utf8_lossy_len,
};
pub use crate::encoding::utf16::{Utf16Error, Utf16Iter};
pub use crate::encoding::utf8::{Utf8Error, Utf8Iter, Utf8View};
pub use crate::encoding::wtf16::Wtf16Iter;
pub use crate::encoding::wtf8::{Wtf8Error, Wtf8Iter, Wtf8View};
