pub use self::store_array::StoreArray;
mod store_array;

pub use self::store_dict::StoreDict;
mod store_dict;

pub use self::store_struct::StoreStruct;
mod store_struct;

use core::fmt;

use crate::buf::{Reserved, WireBuf};
use crate::error::Result;
use crate::signature::SignatureBuilder;
use crate::ty;
use crate::{Arguments, Body, Endianness, Frame, Signature, SignatureBuf, Storable};

/// A buffer in which the body of a message is built.
///
/// Every store appends both the encoded value and its signature, so the
/// buffer always holds a `(signature, bytes)` pair ready to be framed into a
/// message.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
///
/// body.store(10u16)?;
/// body.store(10u32)?;
///
/// assert_eq!(body.signature(), "qu");
/// # Ok::<_, stdbus::Error>(())
/// ```
#[derive(Clone)]
pub struct BodyBuf {
    buf: WireBuf,
    signature: SignatureBuilder,
}

impl BodyBuf {
    /// Construct a new empty body buffer in host byte order.
    pub fn new() -> Self {
        Self::with_endianness(Endianness::NATIVE)
    }

    /// Construct a new empty body buffer with the given byte order.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, Endianness};
    ///
    /// let mut body = BodyBuf::with_endianness(Endianness::Big);
    /// body.store(1u32)?;
    ///
    /// assert_eq!(body.get(), &[0, 0, 0, 1]);
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn with_endianness(endianness: Endianness) -> Self {
        Self {
            buf: WireBuf::new(endianness),
            signature: SignatureBuilder::new(),
        }
    }

    /// Construct a body buffer over already encoded bytes.
    ///
    /// The bytes must have been encoded with the given endianness starting at
    /// an 8-aligned stream position, which holds for a message body.
    pub(crate) fn from_parts(bytes: &[u8], endianness: Endianness, signature: SignatureBuf) -> Self {
        let mut buf = WireBuf::new(endianness);
        buf.extend_from_slice(bytes);

        Self {
            buf,
            signature: SignatureBuilder::from_signature_buf(signature),
        }
    }

    /// Clear the buffer and its signature.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.signature.clear();
    }

    /// The signature of the values stored so far.
    pub fn signature(&self) -> &Signature {
        self.signature.to_signature()
    }

    /// Clone the signature into an owned buffer.
    pub fn signature_buf(&self) -> SignatureBuf {
        self.signature.to_signature_buf()
    }

    /// The byte order values are encoded with.
    pub fn endianness(&self) -> Endianness {
        self.buf.endianness()
    }

    /// Test if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The number of bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// The encoded bytes.
    #[inline]
    pub fn get(&self) -> &[u8] {
        self.buf.get()
    }

    /// View the contents as a readable [`Body`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, Endianness};
    ///
    /// let mut buf = BodyBuf::with_endianness(Endianness::Little);
    /// buf.store(42u32)?;
    ///
    /// let mut body = buf.as_body();
    /// assert_eq!(body.load::<u32>()?, 42);
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    #[inline]
    pub fn as_body(&self) -> Body<'_> {
        Body::new(self.buf.get(), self.buf.endianness(), self.signature())
    }

    /// Store a value, appending its signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, ObjectPath};
    ///
    /// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
    ///
    /// let mut body = BodyBuf::new();
    ///
    /// body.store("Hello World!")?;
    /// body.store(PATH)?;
    ///
    /// assert_eq!(body.signature(), "so");
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn store<T>(&mut self, value: T) -> Result<()>
    where
        T: Storable,
    {
        T::write_signature(&mut self.signature)?;
        value.store_to(self);
        Ok(())
    }

    /// Store several values in one call.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::BodyBuf;
    ///
    /// let mut body = BodyBuf::new();
    /// body.arguments(("org.freedesktop.DBus", 0u32))?;
    ///
    /// assert_eq!(body.signature(), "su");
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    #[inline]
    pub fn arguments<T>(&mut self, value: T) -> Result<()>
    where
        T: Arguments,
    {
        value.extend_to(self)
    }

    /// Open a typed array writer with elements of marker `E`.
    ///
    /// See [`ty::Array`] for an example.
    ///
    /// [`ty::Array`]: crate::ty::Array
    pub fn store_array<E>(&mut self) -> Result<StoreArray<'_, E>>
    where
        E: ty::Marker,
    {
        <ty::Array<E> as ty::Marker>::write_signature(&mut self.signature)?;
        Ok(StoreArray::new(self))
    }

    /// Open a typed dict writer with keys of basic marker `K` and values of
    /// marker `V`.
    ///
    /// See [`ty::Dict`] for an example.
    ///
    /// [`ty::Dict`]: crate::ty::Dict
    pub fn store_dict<K, V>(&mut self) -> Result<StoreDict<'_, K, V>>
    where
        K: ty::Basic,
        V: ty::Marker,
    {
        <ty::Dict<K, V> as ty::Marker>::write_signature(&mut self.signature)?;
        Ok(StoreDict::new(self))
    }

    /// Open a typed struct writer with fields described by the tuple `F`.
    ///
    /// The returned writer expects one store per field, in order, and is
    /// consumed by [`StoreStruct::finish`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{ty, BodyBuf, Endianness};
    ///
    /// let mut buf = BodyBuf::with_endianness(Endianness::Little);
    ///
    /// buf.store_struct::<(i32, ty::Str)>()?
    ///     .store(42i32)
    ///     .store("meaning")
    ///     .finish();
    ///
    /// assert_eq!(buf.signature(), "(is)");
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn store_struct<F>(&mut self) -> Result<StoreStruct<'_, F>>
    where
        F: ty::Fields,
    {
        self.signature.open_struct()?;
        F::write_signature(&mut self.signature)?;
        self.signature.close_struct()?;
        Ok(StoreStruct::new(self))
    }

    /// Store a frame without touching the signature.
    #[inline]
    pub(crate) fn store_frame<T>(&mut self, frame: T)
    where
        T: Frame,
    {
        self.buf.store(frame);
    }

    /// Append raw bytes without touching the signature.
    #[inline]
    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append raw bytes and a NUL terminator without touching the signature.
    #[inline]
    pub(crate) fn extend_from_slice_nul(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice_nul(bytes);
    }

    /// Pad the buffer up to `align`.
    #[inline]
    pub(crate) fn pad_to(&mut self, align: usize) {
        self.buf.pad_to(align);
    }

    /// Align for and reserve an array length slot.
    #[inline]
    pub(crate) fn reserve_u32(&mut self) -> Reserved<u32> {
        self.buf.reserve::<u32>()
    }

    /// Backpatch a previously reserved array length slot.
    #[inline]
    pub(crate) fn store_at(&mut self, at: Reserved<u32>, value: u32) {
        self.buf.store_at(at, value);
    }
}

impl Default for BodyBuf {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BodyBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyBuf")
            .field("len", &self.len())
            .field("endianness", &self.endianness())
            .field("signature", &self.signature())
            .finish()
    }
}

impl PartialEq for BodyBuf {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
            && self.endianness() == other.endianness()
            && self.signature() == other.signature()
    }
}

impl Eq for BodyBuf {}
