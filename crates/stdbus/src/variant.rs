use crate::signature::SignatureBuilder;
use crate::{
    BodyBuf, ObjectPath, ObjectPathBuf, Signature, SignatureBuf, SignatureError, Storable, UnixFd,
    Write,
};

/// A dynamically typed value, carried on the wire as a signature followed by
/// the value it describes.
///
/// Covers the basic types; container values inside variants are not
/// supported and surface as an error when loading.
///
/// # Examples
///
/// ```
/// use stdbus::{BodyBuf, Variant};
///
/// let mut buf = BodyBuf::new();
/// buf.store(Variant::String("Hello"))?;
///
/// assert_eq!(buf.signature(), "v");
/// # Ok::<_, stdbus::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Variant<'a> {
    /// A byte, signature `y`.
    Byte(u8),
    /// A boolean, signature `b`.
    Bool(bool),
    /// A 16-bit signed integer, signature `n`.
    Int16(i16),
    /// A 16-bit unsigned integer, signature `q`.
    Uint16(u16),
    /// A 32-bit signed integer, signature `i`.
    Int32(i32),
    /// A 32-bit unsigned integer, signature `u`.
    Uint32(u32),
    /// A 64-bit signed integer, signature `x`.
    Int64(i64),
    /// A 64-bit unsigned integer, signature `t`.
    Uint64(u64),
    /// A double precision float, signature `d`.
    Double(f64),
    /// A file descriptor index, signature `h`.
    UnixFd(UnixFd),
    /// A string, signature `s`.
    String(&'a str),
    /// An object path, signature `o`.
    ObjectPath(&'a ObjectPath),
    /// A signature, signature `g`.
    Signature(&'a Signature),
}

impl Variant<'_> {
    /// The signature of the contained value.
    pub fn signature(&self) -> &'static Signature {
        match self {
            Variant::Byte(..) => Signature::BYTE,
            Variant::Bool(..) => Signature::BOOLEAN,
            Variant::Int16(..) => Signature::INT16,
            Variant::Uint16(..) => Signature::UINT16,
            Variant::Int32(..) => Signature::INT32,
            Variant::Uint32(..) => Signature::UINT32,
            Variant::Int64(..) => Signature::INT64,
            Variant::Uint64(..) => Signature::UINT64,
            Variant::Double(..) => Signature::DOUBLE,
            Variant::UnixFd(..) => Signature::UNIX_FD,
            Variant::String(..) => Signature::STRING,
            Variant::ObjectPath(..) => Signature::OBJECT_PATH,
            Variant::Signature(..) => Signature::SIGNATURE,
        }
    }

    /// Copy the contained value into an [`OwnedVariant`].
    pub fn to_owned(&self) -> OwnedVariant {
        match *self {
            Variant::Byte(v) => OwnedVariant::Byte(v),
            Variant::Bool(v) => OwnedVariant::Bool(v),
            Variant::Int16(v) => OwnedVariant::Int16(v),
            Variant::Uint16(v) => OwnedVariant::Uint16(v),
            Variant::Int32(v) => OwnedVariant::Int32(v),
            Variant::Uint32(v) => OwnedVariant::Uint32(v),
            Variant::Int64(v) => OwnedVariant::Int64(v),
            Variant::Uint64(v) => OwnedVariant::Uint64(v),
            Variant::Double(v) => OwnedVariant::Double(v),
            Variant::UnixFd(v) => OwnedVariant::UnixFd(v),
            Variant::String(v) => OwnedVariant::String(v.into()),
            Variant::ObjectPath(v) => OwnedVariant::ObjectPath(v.to_owned()),
            Variant::Signature(v) => OwnedVariant::Signature(v.to_owned()),
        }
    }
}

impl crate::storable::sealed::Sealed for Variant<'_> {}

impl Storable for Variant<'_> {
    fn store_to(self, buf: &mut BodyBuf) {
        Write::write_to(self.signature(), buf);

        match self {
            Variant::Byte(v) => buf.store_frame(v),
            Variant::Bool(v) => buf.store_frame(v as u32),
            Variant::Int16(v) => buf.store_frame(v),
            Variant::Uint16(v) => buf.store_frame(v),
            Variant::Int32(v) => buf.store_frame(v),
            Variant::Uint32(v) => buf.store_frame(v),
            Variant::Int64(v) => buf.store_frame(v),
            Variant::Uint64(v) => buf.store_frame(v),
            Variant::Double(v) => buf.store_frame(v),
            Variant::UnixFd(v) => buf.store_frame(v),
            Variant::String(v) => Write::write_to(v, buf),
            Variant::ObjectPath(v) => Write::write_to(v, buf),
            Variant::Signature(v) => Write::write_to(v, buf),
        }
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(Signature::VARIANT)
    }
}

/// An owned [`Variant`].
///
/// # Examples
///
/// ```
/// use stdbus::{OwnedVariant, Variant};
///
/// let owned = Variant::String("Hello").to_owned();
/// assert_eq!(owned, OwnedVariant::String(String::from("Hello")));
/// assert_eq!(owned.as_variant(), Variant::String("Hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OwnedVariant {
    /// A byte, signature `y`.
    Byte(u8),
    /// A boolean, signature `b`.
    Bool(bool),
    /// A 16-bit signed integer, signature `n`.
    Int16(i16),
    /// A 16-bit unsigned integer, signature `q`.
    Uint16(u16),
    /// A 32-bit signed integer, signature `i`.
    Int32(i32),
    /// A 32-bit unsigned integer, signature `u`.
    Uint32(u32),
    /// A 64-bit signed integer, signature `x`.
    Int64(i64),
    /// A 64-bit unsigned integer, signature `t`.
    Uint64(u64),
    /// A double precision float, signature `d`.
    Double(f64),
    /// A file descriptor index, signature `h`.
    UnixFd(UnixFd),
    /// A string, signature `s`.
    String(String),
    /// An object path, signature `o`.
    ObjectPath(ObjectPathBuf),
    /// A signature, signature `g`.
    Signature(SignatureBuf),
}

impl OwnedVariant {
    /// Borrow as a [`Variant`].
    pub fn as_variant(&self) -> Variant<'_> {
        match self {
            OwnedVariant::Byte(v) => Variant::Byte(*v),
            OwnedVariant::Bool(v) => Variant::Bool(*v),
            OwnedVariant::Int16(v) => Variant::Int16(*v),
            OwnedVariant::Uint16(v) => Variant::Uint16(*v),
            OwnedVariant::Int32(v) => Variant::Int32(*v),
            OwnedVariant::Uint32(v) => Variant::Uint32(*v),
            OwnedVariant::Int64(v) => Variant::Int64(*v),
            OwnedVariant::Uint64(v) => Variant::Uint64(*v),
            OwnedVariant::Double(v) => Variant::Double(*v),
            OwnedVariant::UnixFd(v) => Variant::UnixFd(*v),
            OwnedVariant::String(v) => Variant::String(v.as_str()),
            OwnedVariant::ObjectPath(v) => Variant::ObjectPath(v.as_object_path()),
            OwnedVariant::Signature(v) => Variant::Signature(v.as_signature()),
        }
    }

    /// The signature of the contained value.
    #[inline]
    pub fn signature(&self) -> &'static Signature {
        self.as_variant().signature()
    }
}

impl crate::storable::sealed::Sealed for &OwnedVariant {}

impl Storable for &OwnedVariant {
    #[inline]
    fn store_to(self, buf: &mut BodyBuf) {
        self.as_variant().store_to(buf);
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(Signature::VARIANT)
    }
}

impl PartialEq<OwnedVariant> for Variant<'_> {
    #[inline]
    fn eq(&self, other: &OwnedVariant) -> bool {
        *self == other.as_variant()
    }
}

impl PartialEq<Variant<'_>> for OwnedVariant {
    #[inline]
    fn eq(&self, other: &Variant<'_>) -> bool {
        self.as_variant() == *other
    }
}
