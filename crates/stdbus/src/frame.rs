use crate::{Endianness, Signature};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A fixed-size value which maps to a primitive D-Bus wire type.
///
/// Implemented for the integer primitives, `f64` and [`UnixFd`]. Booleans are
/// not a [`Frame`] since their wire form is a `u32` restricted to 0 and 1,
/// which requires a checked conversion on the way in.
pub trait Frame: Copy + self::sealed::Sealed {
    /// The signature of the frame.
    #[doc(hidden)]
    const SIGNATURE: &'static Signature;

    /// The alignment of the frame, equal to its size for every primitive.
    #[doc(hidden)]
    const ALIGNMENT: usize;

    /// The size of the frame on the wire.
    #[doc(hidden)]
    const SIZE: usize;

    /// Append the wire form of the frame to `out`.
    #[doc(hidden)]
    fn put(self, endianness: Endianness, out: &mut Vec<u8>);

    /// Decode a frame from the front of `bytes`.
    ///
    /// The caller guarantees that `bytes` holds at least [`SIZE`] bytes.
    ///
    /// [`SIZE`]: Self::SIZE
    #[doc(hidden)]
    fn get(endianness: Endianness, bytes: &[u8]) -> Self;
}

macro_rules! impl_frame_for_number {
    ($($ty:ty, $signature:ident),* $(,)?) => {
        $(
            impl self::sealed::Sealed for $ty {}

            impl Frame for $ty {
                const SIGNATURE: &'static Signature = Signature::$signature;
                const ALIGNMENT: usize = core::mem::size_of::<$ty>();
                const SIZE: usize = core::mem::size_of::<$ty>();

                #[inline]
                fn put(self, endianness: Endianness, out: &mut Vec<u8>) {
                    match endianness {
                        Endianness::Little => out.extend_from_slice(&self.to_le_bytes()),
                        Endianness::Big => out.extend_from_slice(&self.to_be_bytes()),
                    }
                }

                #[inline]
                fn get(endianness: Endianness, bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..core::mem::size_of::<$ty>()]);

                    match endianness {
                        Endianness::Little => <$ty>::from_le_bytes(raw),
                        Endianness::Big => <$ty>::from_be_bytes(raw),
                    }
                }
            }

            impl_traits_for_frame!($ty);
        )*
    }
}

impl_frame_for_number!(u8, BYTE, f64, DOUBLE);
impl_frame_for_number!(i16, INT16, i32, INT32, i64, INT64);
impl_frame_for_number!(u16, UINT16, u32, UINT32, u64, UINT64);

/// An index into the out-of-band file descriptor array of a message, wire
/// type `h`.
///
/// This library declares the index type but does not itself pass file
/// descriptors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct UnixFd(
    /// The index into the file descriptor array of the message.
    pub u32,
);

impl self::sealed::Sealed for UnixFd {}

impl Frame for UnixFd {
    const SIGNATURE: &'static Signature = Signature::UNIX_FD;
    const ALIGNMENT: usize = 4;
    const SIZE: usize = 4;

    #[inline]
    fn put(self, endianness: Endianness, out: &mut Vec<u8>) {
        self.0.put(endianness, out);
    }

    #[inline]
    fn get(endianness: Endianness, bytes: &[u8]) -> Self {
        Self(u32::get(endianness, bytes))
    }
}

impl_traits_for_frame!(UnixFd);
