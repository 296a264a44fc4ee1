/*!
Additional documentation.

# Components

These tables summarise the provided codecs and allocators.  Prefixes are used in debug output.

## Encodings

See the `encoding` module.

| Prefix  | Name    | Unit  | Encoding |
| ------- | ------- | ----- | -------- |
| `Utf8`  | `Utf8`  | `u8`  | Well-formed UTF-8.  No surrogates, no overlong forms, nothing above `U+10FFFF`. |
| `Utf16` | `Utf16` | `u16` | Well-formed UTF-16, native byte order.  Surrogates only in high-then-low pairs. |
| `Wtf8`  | `Wtf8`  | `u8`  | UTF-8 byte shapes, but three-byte sequences may encode surrogate halves. |
| `Wtf16` | `Wtf16` | `u16` | Any sequence of 16-bit units.  Cannot be malformed. |

## Errors

| Type          | Raised by |
| ------------- | --------- |
| `Utf8Error`   | The UTF-8 codec, and anything reading UTF-8. |
| `Utf16Error`  | The UTF-16 codec, anything reading UTF-16, and encoders given a code point above `U+10FFFF`. |
| `Wtf8Error`   | The WTF-8 codec, and anything reading WTF-8.  Only byte shapes can be wrong. |
| `OutOfBuffer` | Bounded operations handed a buffer that is too short.  Carries both lengths. |
| `ConvError`   | Operations that can fail on input *or* on memory.  `Invalid` comes first: a malformed input is reported as such even if the buffer was also too short. |

## Allocators

See the `alloc` module.

| Prefix | Name     | Allocator |
| ------ | -------- | --------- |
| `C`    | `Malloc` | C runtime heap allocator (*i.e.* `calloc`/`free`).  Requires the `malloc` feature. |
| `R`    | `Rust`   | Rust global allocator. |

# Common Misconceptions and Mistakes

* *"UTF-16 text from the operating system is valid UTF-16."*  Generally, operating systems *do not* check for validity of strings.  A Windows file name may contain a lone surrogate half, and it is still a perfectly good file name.  That is what WTF-16 is for.

* *"WTF-8 is just UTF-8 with the checks turned off."*  It keeps every check *except* the one rejecting surrogate halves.  Overlong forms, stray continuation bytes, and code points above `U+10FFFF` are still errors.

* *"A WTF-8 high half followed by a WTF-8 low half is a supplementary-plane character."*  Not here.  They decode as two separate code points, and convert to two separate WTF-16 units, which *then* happen to form a pair.

* *"Lossy conversion preserves length."*  It happens to, since U+FFFD and an encoded surrogate half are both three bytes, but the length is still measured rather than assumed.

* *"A `u16` code point is enough."*  Supplementary-plane scalars need 21 bits.  Code points are `u32` throughout.

* *"`_within` is the fast, safe version."*  It is the version that trusts you: it skips the capacity check and *panics* if the buffer is short.  Call the matching `_len` first.
*/
