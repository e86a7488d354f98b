use crate::signature::SignatureBuilder;
use crate::ty::Marker;
use crate::{Body, Result, SignatureError};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A tuple of [`Marker`]s describing the fields of a struct.
///
/// Used with [`BodyBuf::store_struct`] and [`Body::load_struct`].
///
/// [`BodyBuf::store_struct`]: crate::BodyBuf::store_struct
/// [`Body::load_struct`]: crate::Body::load_struct
pub trait Fields: self::sealed::Sealed {
    /// The tuple of values produced when loading the fields.
    #[doc(hidden)]
    type Return<'de>;

    /// Load each field in order, assuming alignment and signature have been
    /// handled by the caller.
    #[doc(hidden)]
    fn load_fields<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>>;

    /// Append the signatures of the fields, without enclosing parentheses.
    #[doc(hidden)]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError>;
}

macro_rules! impl_fields_for_tuple {
    ($($ty:ident),*) => {
        impl<$($ty,)*> self::sealed::Sealed for ($($ty,)*)
        where
            $($ty: Marker,)*
        {
        }

        impl<$($ty,)*> Fields for ($($ty,)*)
        where
            $($ty: Marker,)*
        {
            type Return<'de> = ($($ty::Return<'de>,)*);

            #[inline]
            fn load_fields<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>> {
                Ok(($($ty::load_unchecked(buf)?,)*))
            }

            #[inline]
            fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError> {
                $($ty::write_signature(signature)?;)*
                Ok(())
            }
        }
    }
}

repeat!(impl_fields_for_tuple);
