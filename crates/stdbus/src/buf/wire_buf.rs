use core::fmt;
use core::marker::PhantomData;

use crate::buf::padding_to;
use crate::{Endianness, Frame};

/// A growable byte buffer which pads writes per D-Bus alignment rules.
///
/// Padding is calculated relative to a base offset so that a buffer holding
/// several messages still pads each message as if it started at offset zero.
pub(crate) struct WireBuf {
    data: Vec<u8>,
    base: usize,
    endianness: Endianness,
}

/// A reserved position in a [`WireBuf`] to backpatch a frame into, typically
/// the byte length of an array.
#[must_use = "Reserved positions must be written to"]
pub(crate) struct Reserved<T> {
    at: usize,
    _marker: PhantomData<T>,
}

impl WireBuf {
    /// Construct a new empty buffer.
    pub(crate) const fn new(endianness: Endianness) -> Self {
        Self {
            data: Vec::new(),
            base: 0,
            endianness,
        }
    }

    /// The endianness frames are written with.
    #[inline]
    pub(crate) fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Change the endianness frames are written with.
    ///
    /// Only sound while the buffer holds no partially written frames, such as
    /// at a message boundary.
    #[inline]
    pub(crate) fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Mark the current write position as the base for padding calculations.
    #[inline]
    pub(crate) fn rebase(&mut self) {
        self.base = self.data.len();
    }

    /// The write position relative to the padding base.
    #[inline]
    pub(crate) fn stream_len(&self) -> usize {
        self.data.len() - self.base
    }

    /// Test if the buffer holds no bytes at all.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The total number of bytes held.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Append zero bytes until the write position is aligned to `align`.
    pub(crate) fn pad_to(&mut self, align: usize) {
        let padding = padding_to(align, self.stream_len());

        for _ in 0..padding {
            self.data.push(0);
        }
    }

    /// Append a frame, aligning the buffer for it first.
    pub(crate) fn store<T>(&mut self, frame: T)
    where
        T: Frame,
    {
        self.pad_to(T::ALIGNMENT);
        frame.put(self.endianness, &mut self.data);
    }

    /// Align for and reserve space to later hold a frame of type `T`.
    pub(crate) fn reserve<T>(&mut self) -> Reserved<T>
    where
        T: Frame,
    {
        self.pad_to(T::ALIGNMENT);
        let at = self.data.len();
        self.data.resize(at + T::SIZE, 0);

        Reserved {
            at,
            _marker: PhantomData,
        }
    }

    /// Write a frame into a position previously [`reserve`]d.
    ///
    /// [`reserve`]: Self::reserve
    pub(crate) fn store_at<T>(&mut self, at: Reserved<T>, frame: T)
    where
        T: Frame,
    {
        let mut patch = Vec::with_capacity(T::SIZE);
        frame.put(self.endianness, &mut patch);
        self.data[at.at..at.at + T::SIZE].copy_from_slice(&patch);
    }

    /// Append raw bytes verbatim.
    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append raw bytes followed by a NUL byte.
    pub(crate) fn extend_from_slice_nul(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.data.push(0);
    }

    /// The bytes written so far.
    #[inline]
    pub(crate) fn get(&self) -> &[u8] {
        &self.data
    }

    /// Clear the buffer.
    pub(crate) fn clear(&mut self) {
        self.data.clear();
        self.base = 0;
    }
}

impl fmt::Debug for WireBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireBuf")
            .field("len", &self.data.len())
            .field("base", &self.base)
            .field("endianness", &self.endianness)
            .finish()
    }
}

impl PartialEq for WireBuf {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for WireBuf {}

impl Clone for WireBuf {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            base: self.base,
            endianness: self.endianness,
        }
    }
}
