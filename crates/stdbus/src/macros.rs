/// Expand a macro once per tuple arity.
macro_rules! repeat {
    ($macro:path) => {
        $macro!(A);
        $macro!(A, B);
        $macro!(A, B, C);
        $macro!(A, B, C, D);
        $macro!(A, B, C, D, E);
        $macro!(A, B, C, D, E, F);
        $macro!(A, B, C, D, E, F, G);
        $macro!(A, B, C, D, E, F, G, H);
        $macro!(A, B, C, D, E, F, G, H, I);
        $macro!(A, B, C, D, E, F, G, H, I, J);
        $macro!(A, B, C, D, E, F, G, H, I, J, K);
        $macro!(A, B, C, D, E, F, G, H, I, J, K, L);
    };
}

/// Implement the marshalling traits shared by every [`Frame`] type.
///
/// [`Frame`]: crate::Frame
macro_rules! impl_traits_for_frame {
    ($ty:ty) => {
        impl $crate::ty::aligned::sealed::Sealed for $ty {}

        impl $crate::ty::Aligned for $ty {
            const ALIGNMENT: usize = <$ty as $crate::Frame>::ALIGNMENT;
        }

        impl $crate::ty::marker::sealed::Sealed for $ty {}

        impl $crate::ty::Basic for $ty {}

        impl $crate::ty::Marker for $ty {
            type Return<'de> = $ty;

            #[inline]
            fn load_unchecked<'de>(buf: &mut $crate::Body<'de>) -> $crate::Result<Self::Return<'de>> {
                buf.load_frame()
            }

            #[inline]
            fn write_signature(
                signature: &mut $crate::signature::SignatureBuilder,
            ) -> Result<(), $crate::SignatureError> {
                signature.extend_from_signature(<$ty as $crate::Frame>::SIGNATURE)
            }
        }

        impl $crate::storable::sealed::Sealed for $ty {}

        impl $crate::Storable for $ty {
            #[inline]
            fn store_to(self, buf: &mut $crate::BodyBuf) {
                buf.store_frame(self);
            }

            #[inline]
            fn write_signature(
                signature: &mut $crate::signature::SignatureBuilder,
            ) -> Result<(), $crate::SignatureError> {
                signature.extend_from_signature(<$ty as $crate::Frame>::SIGNATURE)
            }
        }

        impl $crate::ty::compatible::sealed::Sealed<$ty> for $ty {}

        impl $crate::ty::Compatible<$ty> for $ty {}

        impl $crate::arguments::sealed::Sealed for $ty {}

        impl $crate::Arguments for $ty {
            #[inline]
            fn extend_to(self, buf: &mut $crate::BodyBuf) -> $crate::Result<()> {
                buf.store(self)
            }
        }
    };
}

/// Implement [`Storable`] and [`Arguments`] for a reference to a [`Write`]
/// type.
///
/// [`Storable`]: crate::Storable
/// [`Write`]: crate::Write
macro_rules! impl_traits_for_write {
    ($ty:ty) => {
        impl $crate::storable::sealed::Sealed for &$ty {}

        impl $crate::Storable for &$ty {
            #[inline]
            fn store_to(self, buf: &mut $crate::BodyBuf) {
                $crate::Write::write_to(self, buf);
            }

            #[inline]
            fn write_signature(
                signature: &mut $crate::signature::SignatureBuilder,
            ) -> Result<(), $crate::SignatureError> {
                signature.extend_from_signature(<$ty as $crate::Write>::SIGNATURE)
            }
        }

        impl $crate::arguments::sealed::Sealed for &$ty {}

        impl $crate::Arguments for &$ty {
            #[inline]
            fn extend_to(self, buf: &mut $crate::BodyBuf) -> $crate::Result<()> {
                buf.store(self)
            }
        }
    };
}

/// Implement the marker traits for an unsized read target.
macro_rules! impl_unsized_marker {
    ($marker:ty, $target:ty, $align:expr) => {
        impl $crate::ty::aligned::sealed::Sealed for $marker {}

        impl $crate::ty::Aligned for $marker {
            const ALIGNMENT: usize = $align;
        }

        impl $crate::ty::marker::sealed::Sealed for $marker {}

        impl $crate::ty::Basic for $marker {}

        impl $crate::ty::Marker for $marker {
            type Return<'de> = &'de $target;

            #[inline]
            fn load_unchecked<'de>(buf: &mut $crate::Body<'de>) -> $crate::Result<Self::Return<'de>> {
                buf.read_unchecked()
            }

            #[inline]
            fn write_signature(
                signature: &mut $crate::signature::SignatureBuilder,
            ) -> Result<(), $crate::SignatureError> {
                signature.extend_from_signature(<$target as $crate::Read>::SIGNATURE)
            }
        }
    };
}
