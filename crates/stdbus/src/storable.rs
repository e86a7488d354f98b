use crate::signature::SignatureBuilder;
use crate::{BodyBuf, SignatureError, Write};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A value which can be stored into a [`BodyBuf`] with a `store()` call.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
///
/// body.store(10u16)?;
/// body.store("Hello World")?;
///
/// assert_eq!(body.signature(), "qs");
/// # Ok::<_, stdbus::Error>(())
/// ```
pub trait Storable: self::sealed::Sealed {
    /// Store the value into the buffer without touching its signature.
    #[doc(hidden)]
    fn store_to(self, buf: &mut BodyBuf);

    /// Append the signature of the value.
    #[doc(hidden)]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError>;
}

impl self::sealed::Sealed for bool {}

/// [`Storable`] implementation for [`bool`], stored as a `u32` restricted to
/// 0 or 1.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
/// body.store(true)?;
///
/// assert_eq!(body.signature(), "b");
/// assert_eq!(body.get(), &[1, 0, 0, 0]);
/// # Ok::<_, stdbus::Error>(())
/// ```
impl Storable for bool {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        buf.store_frame(self as u32);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(crate::Signature::BOOLEAN)
    }
}

impl self::sealed::Sealed for String {}

/// [`Storable`] implementation for [`String`].
impl Storable for String {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        self.as_str().store_to(buf);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        <&str as Storable>::write_signature(signature)
    }
}

impl self::sealed::Sealed for &String {}

impl Storable for &String {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        self.as_str().store_to(buf);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        <&str as Storable>::write_signature(signature)
    }
}

impl self::sealed::Sealed for crate::ObjectPathBuf {}

impl Storable for crate::ObjectPathBuf {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        Write::write_to(self.as_object_path(), buf);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(crate::Signature::OBJECT_PATH)
    }
}

impl self::sealed::Sealed for crate::SignatureBuf {}

impl Storable for crate::SignatureBuf {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        Write::write_to(self.as_signature(), buf);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(crate::Signature::SIGNATURE)
    }
}
