use crate::error::Result;
use crate::{BodyBuf, Storable};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// One or more values which can be appended to a body in a single call.
///
/// Implemented for every [`Storable`] value and for tuples of them, which is
/// the convenient way to build the body of a call.
///
/// # Examples
///
/// ```
/// use stdbus::BodyBuf;
///
/// let mut body = BodyBuf::new();
/// body.arguments(("Hello World", 10u32))?;
///
/// assert_eq!(body.signature(), "su");
/// # Ok::<_, stdbus::Error>(())
/// ```
pub trait Arguments: self::sealed::Sealed {
    /// Append the arguments to the buffer, extending its signature.
    #[doc(hidden)]
    fn extend_to(self, buf: &mut BodyBuf) -> Result<()>;
}

impl self::sealed::Sealed for () {}

/// The empty tuple appends nothing, which is the empty body.
impl Arguments for () {
    #[inline]
    fn extend_to(self, _: &mut BodyBuf) -> Result<()> {
        Ok(())
    }
}

macro_rules! impl_arguments_for_storable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl self::sealed::Sealed for $ty {}

            impl Arguments for $ty {
                #[inline]
                fn extend_to(self, buf: &mut BodyBuf) -> Result<()> {
                    buf.store(self)
                }
            }
        )*
    }
}

impl_arguments_for_storable! {
    bool,
    String,
    &String,
    crate::ObjectPathBuf,
    crate::SignatureBuf,
    crate::Variant<'_>,
    &crate::OwnedVariant,
}

macro_rules! impl_arguments_for_tuple {
    ($($ty:ident),*) => {
        impl<$($ty,)*> self::sealed::Sealed for ($($ty,)*)
        where
            $($ty: Storable,)*
        {
        }

        impl<$($ty,)*> Arguments for ($($ty,)*)
        where
            $($ty: Storable,)*
        {
            #[inline]
            fn extend_to(self, buf: &mut BodyBuf) -> Result<()> {
                #[allow(non_snake_case)]
                let ($($ty,)*) = self;
                $(buf.store($ty)?;)*
                Ok(())
            }
        }
    }
}

repeat!(impl_arguments_for_tuple);
