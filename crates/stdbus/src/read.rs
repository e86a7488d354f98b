use core::str::from_utf8;

use crate::{Body, Error, ObjectPath, Signature};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// An unsized type whose reference can be read directly out of a body.
///
/// These types are read through [`Body::read`].
///
/// [`Body::read`]: crate::Body::read
pub trait Read: self::sealed::Sealed {
    /// The signature of the type.
    #[doc(hidden)]
    const SIGNATURE: &'static Signature;

    /// Read the type from the given buffer.
    #[doc(hidden)]
    fn read_from<'de>(buf: &mut Body<'de>) -> Result<&'de Self, Error>;
}

impl self::sealed::Sealed for [u8] {}

impl Read for [u8] {
    const SIGNATURE: &'static Signature = Signature::new_const(b"ay");

    #[inline]
    fn read_from<'de>(buf: &mut Body<'de>) -> Result<&'de Self, Error> {
        let len = buf.load_frame::<u32>()? as usize;
        buf.load_slice(len)
    }
}

impl self::sealed::Sealed for str {}

impl Read for str {
    const SIGNATURE: &'static Signature = Signature::STRING;

    #[inline]
    fn read_from<'de>(buf: &mut Body<'de>) -> Result<&'de Self, Error> {
        let len = buf.load_frame::<u32>()? as usize;
        let bytes = buf.load_slice_nul(len)?;
        Ok(from_utf8(bytes)?)
    }
}

impl self::sealed::Sealed for ObjectPath {}

impl Read for ObjectPath {
    const SIGNATURE: &'static Signature = Signature::OBJECT_PATH;

    #[inline]
    fn read_from<'de>(buf: &mut Body<'de>) -> Result<&'de Self, Error> {
        let len = buf.load_frame::<u32>()? as usize;
        let bytes = buf.load_slice_nul(len)?;
        Ok(ObjectPath::new(bytes)?)
    }
}

impl self::sealed::Sealed for Signature {}

impl Read for Signature {
    const SIGNATURE: &'static Signature = Signature::SIGNATURE;

    #[inline]
    fn read_from<'de>(buf: &mut Body<'de>) -> Result<&'de Self, Error> {
        let len = buf.load_frame::<u8>()? as usize;
        let bytes = buf.load_slice_nul(len)?;
        Ok(Signature::new(bytes)?)
    }
}
