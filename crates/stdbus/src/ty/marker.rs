use crate::signature::SignatureBuilder;
use crate::ty::Aligned;
use crate::{Body, Result, SignatureError};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A type-level marker describing a D-Bus type.
///
/// Markers drive the typed reader and writer: they know their signature,
/// their alignment, and how to load their value out of a [`Body`].
pub trait Marker: self::sealed::Sealed + Aligned {
    /// The value produced when loading this marker.
    #[doc(hidden)]
    type Return<'de>;

    /// Load the value, assuming the signature has already been checked.
    #[doc(hidden)]
    fn load_unchecked<'de>(buf: &mut Body<'de>) -> Result<Self::Return<'de>>;

    /// Append the signature of this marker.
    #[doc(hidden)]
    fn write_signature(signature: &mut SignatureBuilder) -> Result<(), SignatureError>;
}

/// A marker naming a basic (non-container) type.
///
/// Basic types are the only kinds permitted as dict-entry keys.
pub trait Basic: Marker {}
