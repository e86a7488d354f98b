//! Type markers for the typed reader and writer.
//!
//! A marker names a D-Bus type at the type level without carrying a value.
//! The primitives are their own markers; string-like and container types have
//! dedicated marker structs since their loaded form is a borrow.
//!
//! # Examples
//!
//! ```
//! use stdbus::{ty, BodyBuf, Endianness};
//!
//! let mut buf = BodyBuf::with_endianness(Endianness::Little);
//! buf.store(10u8)?;
//!
//! buf.store_struct::<(u16, u32)>()?
//!     .store(20u16)
//!     .store(30u32)
//!     .finish();
//!
//! assert_eq!(buf.signature(), "y(qu)");
//! assert_eq!(
//!     buf.get(),
//!     &[10, 0, 0, 0, 0, 0, 0, 0, 20, 0, 0, 0, 30, 0, 0, 0]
//! );
//! # Ok::<_, stdbus::Error>(())
//! ```

pub use self::fields::Fields;
pub(crate) mod fields;

pub use self::marker::{Basic, Marker};
pub(crate) mod marker;

pub use self::aligned::Aligned;
pub(crate) mod aligned;

pub use self::compatible::Compatible;
pub(crate) mod compatible;

use core::marker::PhantomData;

use crate::body::{ArrayReader, DictReader};
use crate::signature::SignatureBuilder;
use crate::{Body, Result, SignatureError};

/// The marker for the [`str`] type, signature `s`.
///
/// # Examples
///
/// ```
/// use stdbus::{ty, BodyBuf};
///
/// let mut buf = BodyBuf::new();
///
/// buf.store_struct::<(u8, ty::Str)>()?
///     .store(42u8)
///     .store("Hello World!")
///     .finish();
///
/// assert_eq!(buf.signature(), "(ys)");
///
/// let mut b = buf.as_body();
/// let (n, value) = b.load_struct::<(u8, ty::Str)>()?;
///
/// assert_eq!(n, 42u8);
/// assert_eq!(value, "Hello World!");
/// # Ok::<_, stdbus::Error>(())
/// ```
#[non_exhaustive]
pub struct Str;

impl_unsized_marker!(Str, str, 4);

/// The marker for the [`Signature`] type, signature `g`.
///
/// [`Signature`]: crate::Signature
#[non_exhaustive]
pub struct Signature;

impl_unsized_marker!(Signature, crate::Signature, 1);

/// The marker for the [`ObjectPath`] type, signature `o`.
///
/// [`ObjectPath`]: crate::ObjectPath
#[non_exhaustive]
pub struct ObjectPath;

impl_unsized_marker!(ObjectPath, crate::ObjectPath, 4);

impl self::aligned::sealed::Sealed for bool {}

impl Aligned for bool {
    const ALIGNMENT: usize = 4;
}

impl self::marker::sealed::Sealed for bool {}

impl Basic for bool {}

/// [`bool`] is its own marker; the wire form is a `u32` restricted to 0
/// and 1, and anything else is refused when loading.
impl Marker for bool {
    type Return<'de> = bool;

    #[inline]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
        buf.load_bool_unchecked()
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(crate::Signature::BOOLEAN)
    }
}

/// The marker for an array with elements of marker `T`, signature `aT`.
///
/// # Examples
///
/// ```
/// use stdbus::{ty, BodyBuf, Endianness};
///
/// let mut buf = BodyBuf::with_endianness(Endianness::Little);
///
/// let mut array = buf.store_array::<u32>()?;
/// array.store(10u32);
/// array.store(20u32);
/// array.finish()?;
///
/// assert_eq!(buf.signature(), "au");
///
/// let mut b = buf.as_body();
/// let mut array = b.load_array::<u32>()?;
/// assert_eq!(array.load()?, Some(10));
/// assert_eq!(array.load()?, Some(20));
/// assert_eq!(array.load()?, None);
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Array<T>(PhantomData<T>);

impl<T> self::aligned::sealed::Sealed for Array<T> where T: Aligned {}

impl<T> Aligned for Array<T>
where
    T: Aligned,
{
    const ALIGNMENT: usize = 4;
}

impl<T> self::marker::sealed::Sealed for Array<T> where T: Marker {}

impl<T> Marker for Array<T>
where
    T: Marker,
{
    type Return<'de> = ArrayReader<'de, T>;

    #[inline]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
        buf.array_reader_unchecked::<T>()
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.open_array()?;
        T::write_signature(signature)?;
        signature.close_array();
        Ok(())
    }
}

/// The marker for an array of dict entries keyed by the basic marker `K`,
/// signature `a{KV}`.
///
/// # Examples
///
/// ```
/// use stdbus::{ty, BodyBuf, Endianness};
///
/// let mut buf = BodyBuf::with_endianness(Endianness::Little);
///
/// let mut dict = buf.store_dict::<ty::Str, i32>()?;
/// dict.store("A", 10i32);
/// dict.store("B", 20i32);
/// dict.finish()?;
///
/// assert_eq!(buf.signature(), "a{si}");
///
/// let mut b = buf.as_body();
/// let mut dict = b.load_dict::<ty::Str, i32>()?;
/// assert_eq!(dict.load_entry()?, Some(("A", 10)));
/// assert_eq!(dict.load_entry()?, Some(("B", 20)));
/// assert_eq!(dict.load_entry()?, None);
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Dict<K, V>(PhantomData<(K, V)>);

impl<K, V> self::aligned::sealed::Sealed for Dict<K, V>
where
    K: Aligned,
    V: Aligned,
{
}

impl<K, V> Aligned for Dict<K, V>
where
    K: Aligned,
    V: Aligned,
{
    const ALIGNMENT: usize = 4;
}

impl<K, V> self::marker::sealed::Sealed for Dict<K, V>
where
    K: Basic,
    V: Marker,
{
}

impl<K, V> Marker for Dict<K, V>
where
    K: Basic,
    V: Marker,
{
    type Return<'de> = DictReader<'de, K, V>;

    #[inline]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
        buf.dict_reader_unchecked::<K, V>()
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.open_array()?;
        signature.open_dict()?;
        K::write_signature(signature)?;
        V::write_signature(signature)?;
        signature.close_dict()?;
        signature.close_array();
        Ok(())
    }
}

/// The marker for a struct with fields described by the tuple `F`, signature
/// `(F…)`.
///
/// # Examples
///
/// ```
/// use stdbus::{ty, BodyBuf, Endianness};
///
/// let mut buf = BodyBuf::with_endianness(Endianness::Little);
///
/// let mut array = buf.store_array::<ty::Struct<(u8, u32)>>()?;
/// array.store_struct(|st| st.store(1u8).store(10u32));
/// array.store_struct(|st| st.store(2u8).store(20u32));
/// array.finish()?;
///
/// assert_eq!(buf.signature(), "a(yu)");
///
/// let mut body = buf.as_body();
/// let mut array = body.load_array::<ty::Struct<(u8, u32)>>()?;
///
/// assert_eq!(array.load()?, Some((1, 10)));
/// assert_eq!(array.load()?, Some((2, 20)));
/// assert_eq!(array.load()?, None);
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Struct<F>(PhantomData<F>);

impl<F> self::aligned::sealed::Sealed for Struct<F> where F: Fields {}

impl<F> Aligned for Struct<F>
where
    F: Fields,
{
    const ALIGNMENT: usize = 8;
}

impl<F> self::marker::sealed::Sealed for Struct<F> where F: Fields {}

impl<F> Marker for Struct<F>
where
    F: Fields,
{
    type Return<'de> = F::Return<'de>;

    #[inline]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
        buf.align_to(8)?;
        F::load_fields(buf)
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.open_struct()?;
        F::write_signature(signature)?;
        signature.close_struct()?;
        Ok(())
    }
}

/// The marker for the [`Variant`] type, signature `v`.
///
/// [`Variant`]: crate::Variant
#[non_exhaustive]
pub struct Variant;

impl self::aligned::sealed::Sealed for Variant {}

impl Aligned for Variant {
    const ALIGNMENT: usize = 1;
}

impl self::marker::sealed::Sealed for Variant {}

impl Marker for Variant {
    type Return<'de> = crate::Variant<'de>;

    #[inline]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
        buf.load_variant_unchecked()
    }

    #[inline]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
        signature.extend_from_signature(crate::Signature::VARIANT)
    }
}
