use crate::{BodyBuf, ObjectPath, Signature};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// An unsized type whose reference can be written directly to a buffer.
///
/// These types are written through [`BodyBuf::store`].
///
/// [`BodyBuf::store`]: crate::BodyBuf::store
pub trait Write: self::sealed::Sealed {
    /// The signature of the type.
    #[doc(hidden)]
    const SIGNATURE: &'static Signature;

    /// Write `self` into `buf`.
    #[doc(hidden)]
    fn write_to(&self, buf: &mut BodyBuf);
}

impl self::sealed::Sealed for [u8] {}

/// Write a byte array to the buffer.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
/// body.store(&b"foo"[..])?;
///
/// assert_eq!(body.signature(), "ay");
/// assert_eq!(body.get(), &[3, 0, 0, 0, 102, 111, 111]);
/// # Ok::<_, stdbus::Error>(())
/// ```
impl Write for [u8] {
    const SIGNATURE: &'static Signature = Signature::new_const(b"ay");

    #[inline]
    fn write_to(&self, buf: &mut BodyBuf) {
        buf.store_frame(self.len() as u32);
        buf.extend_from_slice(self);
    }
}

impl_traits_for_write!([u8]);

impl self::sealed::Sealed for str {}

/// Write a length-prefixed string to the buffer.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
/// body.store("foo")?;
///
/// assert_eq!(body.signature(), "s");
/// assert_eq!(body.get(), &[3, 0, 0, 0, 102, 111, 111, 0]);
/// # Ok::<_, stdbus::Error>(())
/// ```
impl Write for str {
    const SIGNATURE: &'static Signature = Signature::STRING;

    #[inline]
    fn write_to(&self, buf: &mut BodyBuf) {
        buf.store_frame(self.len() as u32);
        buf.extend_from_slice_nul(self.as_bytes());
    }
}

impl_traits_for_write!(str);

impl self::sealed::Sealed for ObjectPath {}

/// Write an object path to the buffer.
///
/// # Examples
///
/// ```
/// use stdbus::{BodyBuf, ObjectPath};
///
/// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
///
/// let mut body = BodyBuf::new();
/// body.store(PATH)?;
///
/// assert_eq!(body.signature(), "o");
/// # Ok::<_, stdbus::Error>(())
/// ```
impl Write for ObjectPath {
    const SIGNATURE: &'static Signature = Signature::OBJECT_PATH;

    #[inline]
    fn write_to(&self, buf: &mut BodyBuf) {
        buf.store_frame(self.len() as u32);
        buf.extend_from_slice_nul(self.as_bytes());
    }
}

impl_traits_for_write!(ObjectPath);

impl self::sealed::Sealed for Signature {}

/// Write a signature to the buffer.
///
/// Signatures carry a single-byte length prefix instead of the four bytes of
/// the other string-like types.
///
/// # Examples
///
/// ```
/// use stdbus::{BodyBuf, Signature};
///
/// let mut body = BodyBuf::new();
/// body.store(Signature::new(b"a{sv}")?)?;
///
/// assert_eq!(body.signature(), "g");
/// assert_eq!(body.get(), &[5, b'a', b'{', b's', b'v', b'}', 0]);
/// # Ok::<_, stdbus::Error>(())
/// ```
impl Write for Signature {
    const SIGNATURE: &'static Signature = Signature::SIGNATURE;

    #[inline]
    fn write_to(&self, buf: &mut BodyBuf) {
        buf.store_frame(self.len() as u8);
        buf.extend_from_slice_nul(self.as_bytes());
    }
}

impl_traits_for_write!(Signature);
