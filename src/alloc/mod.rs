/*!
Allocation types and traits.

The conversion functions never own memory themselves.  The `*_alloc` variants ask an `Allocator` for exactly as much as the output needs, and hand the result back as an `AllocBuf`, which is the caller's to keep, drop, or release.
*/
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::encoding::Unit;

#[cfg(feature = "malloc")]
pub use self::malloc::Malloc;

/**
Abstracts over different memory allocators.

In practice, this will be implemented by a marker type (which is not intended to actually be instantiated anywhere).
*/
pub trait Allocator {
    /**
    The type of errors that can occur during allocation.
    */
    type AllocError: AllocatorError + Copy + 'static;

    /**
    Allocate the specified number of bytes, with the specified alignment.

    A zero-byte request must succeed with a non-null, suitably aligned pointer.  The memory need not be initialised.
    */
    fn alloc_bytes(bytes: usize, align: usize) -> Result<NonNull<u8>, Self::AllocError>;

    /**
    Free an allocation previously returned by `alloc_bytes` with the same size and alignment.
    */
    unsafe fn free(ptr: NonNull<u8>, bytes: usize, align: usize);

    /**
    Returns a string which can be used to uniquely identify this allocator in debug output.

    This string should *preferably* be short, reasonably evocative, unique, and a single `Camelword`, although nothing will break if this is not done.
    */
    fn debug_prefix() -> &'static str;
}

/**
This trait defines the required interface for allocation errors.
*/
pub trait AllocatorError: ::std::error::Error {
    /**
    Construct an error indicating that an overflow occurred when computing the size of the allocation.
    */
    fn overflow() -> Self;
}

/**
A general allocation error.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AllocError {
    #[error("failed to allocate memory")]
    Failed,
    #[error("cannot satisfy requested alignment")]
    CannotAlign,
    #[error("overflow while computing size")]
    SizeOverflow,
}

impl AllocatorError for AllocError {
    fn overflow() -> Self {
        AllocError::SizeOverflow
    }
}

#[cfg(feature = "malloc")]
mod malloc {
    use std::cmp;
    use std::mem;
    use std::ptr::NonNull;

    use libc::{self, c_void};

    use super::{AllocError, Allocator};

    /**
    Represents the C runtime heap allocator.
    */
    pub enum Malloc {}

    impl Allocator for Malloc {
        type AllocError = AllocError;

        fn alloc_bytes(bytes: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
            // A conservative guess.
            if align > mem::align_of::<usize>() {
                return Err(AllocError::CannotAlign);
            }

            // `calloc(0, _)` may legitimately return null.
            let ptr = unsafe { libc::calloc(cmp::max(bytes, 1), 1) };
            NonNull::new(ptr as *mut u8).ok_or(AllocError::Failed)
        }

        unsafe fn free(ptr: NonNull<u8>, _bytes: usize, _align: usize) {
            libc::free(ptr.as_ptr() as *mut c_void);
        }

        fn debug_prefix() -> &'static str { "C" }
    }
}

/**
Represents the Rust global heap allocator.
*/
pub enum Rust {}

impl Allocator for Rust {
    type AllocError = AllocError;

    fn alloc_bytes(bytes: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        use std::alloc::{alloc_zeroed, Layout};

        let layout = Layout::from_size_align(bytes, align).map_err(|_| AllocError::CannotAlign)?;
        if bytes == 0 {
            return NonNull::new(layout.align() as *mut u8).ok_or(AllocError::Failed);
        }

        let ptr = unsafe { alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(AllocError::Failed)
    }

    unsafe fn free(ptr: NonNull<u8>, bytes: usize, align: usize) {
        use std::alloc::{dealloc, Layout};

        if bytes == 0 {
            return;
        }
        dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(bytes, align));
    }

    fn debug_prefix() -> &'static str { "R" }
}

/**
An owned, exactly-sized buffer of units, obtained from `A`.

The buffer is returned to `A` when dropped.  Use `into_raw` to take over the allocation instead.
*/
pub struct AllocBuf<T, A> where T: Unit, A: Allocator {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<(Box<[T]>, A)>,
}

impl<T, A> AllocBuf<T, A> where T: Unit, A: Allocator {
    /**
    Allocates `len` zero-filled units from `A`.  Exactly one request is made.

    # Failure

    Fails if the size in bytes overflows, or if the allocator fails.
    */
    pub fn zeroed(len: usize) -> Result<Self, A::AllocError> {
        let bytes = len.checked_mul(mem::size_of::<T>()).ok_or_else(<A::AllocError as AllocatorError>::overflow)?;
        let ptr = A::alloc_bytes(bytes, mem::align_of::<T>())?.cast::<T>();
        unsafe {
            for i in 0..len {
                ptr::write(ptr.as_ptr().add(i), T::zero());
            }
        }
        Ok(AllocBuf {
            ptr: ptr,
            len: len,
            _marker: PhantomData,
        })
    }

    /**
    Re-assembles a buffer released by `into_raw`.

    # Safety

    `ptr` and `len` must have come from `AllocBuf::<T, A>::into_raw`, and must not have been re-assembled already.
    */
    pub unsafe fn from_raw(ptr: NonNull<T>, len: usize) -> Self {
        AllocBuf {
            ptr: ptr,
            len: len,
            _marker: PhantomData,
        }
    }

    /**
    Releases the allocation to the caller.  Freeing it, with `A::free` and a size of `len * size_of::<T>()` bytes, becomes the caller's responsibility.
    */
    pub fn into_raw(self) -> (NonNull<T>, usize) {
        let parts = (self.ptr, self.len);
        mem::forget(self);
        parts
    }

    pub fn as_units(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_units_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A> Deref for AllocBuf<T, A> where T: Unit, A: Allocator {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_units()
    }
}

impl<T, A> DerefMut for AllocBuf<T, A> where T: Unit, A: Allocator {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_units_mut()
    }
}

impl<T, A> AsRef<[T]> for AllocBuf<T, A> where T: Unit, A: Allocator {
    fn as_ref(&self) -> &[T] {
        self.as_units()
    }
}

impl<T, A> PartialEq<[T]> for AllocBuf<T, A> where T: Unit + PartialEq, A: Allocator {
    fn eq(&self, other: &[T]) -> bool {
        self.as_units() == other
    }
}

impl<'b, T, A> PartialEq<&'b [T]> for AllocBuf<T, A> where T: Unit + PartialEq, A: Allocator {
    fn eq(&self, other: &&'b [T]) -> bool {
        self.as_units() == *other
    }
}

impl<T, A> fmt::Debug for AllocBuf<T, A> where T: Unit, A: Allocator {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}{:?}", A::debug_prefix(), self.as_units())
    }
}

impl<T, A> Drop for AllocBuf<T, A> where T: Unit, A: Allocator {
    fn drop(&mut self) {
        unsafe {
            A::free(self.ptr.cast::<u8>(), self.len * mem::size_of::<T>(), mem::align_of::<T>());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub enum Exhausted {}

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
    fn test_rust_zeroed() {
        let mut buf = AllocBuf::<u16, Rust>::zeroed(3).unwrap();
        assert_eq!(buf.len(), 3);
        assert!(buf.iter().all(Unit::is_zero));
        buf[1] = 0xD800;
        assert_eq!(&buf[..], &[0, 0xD800, 0][..]);
        assert_eq!(format!("{:?}", buf), "R[0, 55296, 0]");
    }

    #[test]
    fn test_rust_empty() {
        let buf = AllocBuf::<u8, Rust>::zeroed(0).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf, &[0u8; 0][..]);
    }

    #[cfg(feature = "malloc")]
    #[test]
    fn test_malloc_round_trip() {
        let mut buf = AllocBuf::<u8, Malloc>::zeroed(4).unwrap();
        buf.copy_from_slice(b"wtf8");
        assert_eq!(buf, &b"wtf8"[..]);
        let empty = AllocBuf::<u16, Malloc>::zeroed(0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_size_overflow() {
        let err = AllocBuf::<u16, Rust>::zeroed(usize::max_value()).unwrap_err();
        assert_eq!(err, AllocError::SizeOverflow);
    }

    #[test]
    fn test_exhausted() {
        assert_eq!(AllocBuf::<u8, Exhausted>::zeroed(1).unwrap_err(), AllocError::Failed);
    }

    #[test]
    fn test_into_raw_and_back() {
        let buf = AllocBuf::<u8, Rust>::zeroed(2).unwrap();
        let (ptr, len) = buf.into_raw();
        let buf = unsafe { AllocBuf::<u8, Rust>::from_raw(ptr, len) };
        assert_eq!(buf, &[0u8, 0][..]);
    }
}
