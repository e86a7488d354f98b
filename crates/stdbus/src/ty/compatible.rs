use crate::ty;
use crate::{ObjectPathBuf, OwnedVariant, SignatureBuf, Storable};

pub(crate) mod sealed {
    pub trait Sealed<E: ?Sized> {}
}

/// A value which can be stored where the marker `E` was declared.
///
/// This ties the typed writers to the values they accept: an array opened
/// with element marker [`ty::Str`] only takes string-like values, and so on.
///
/// [`ty::Str`]: crate::ty::Str
pub trait Compatible<E: ?Sized>: Storable + self::sealed::Sealed<E> {}

macro_rules! impl_compatible {
    ($($value:ty => $marker:ty),* $(,)?) => {
        $(
            impl self::sealed::Sealed<$marker> for $value {}

            impl Compatible<$marker> for $value {}
        )*
    }
}

impl_compatible! {
    bool => bool,
    &str => ty::Str,
    String => ty::Str,
    &String => ty::Str,
    &crate::Signature => ty::Signature,
    SignatureBuf => ty::Signature,
    &crate::ObjectPath => ty::ObjectPath,
    ObjectPathBuf => ty::ObjectPath,
    crate::Variant<'_> => ty::Variant,
    &OwnedVariant => ty::Variant,
    &[u8] => ty::Array<u8>,
}
