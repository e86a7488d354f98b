use core::borrow::Borrow;
use core::fmt;
use core::ops::Deref;

use super::{validate, Signature, SignatureError, MAX_SIGNATURE};

/// An owned, inline-allocated D-Bus signature.
///
/// Dereferences to [`Signature`]. Since signatures are capped at 255 bytes
/// the storage is a fixed array rather than a heap allocation.
///
/// # Examples
///
/// ```
/// use stdbus_core::signature::{Signature, SignatureBuf};
///
/// let owned = SignatureBuf::new(b"a{sv}")?;
/// assert_eq!(&*owned, Signature::new(b"a{sv}")?);
/// # Ok::<_, stdbus_core::signature::SignatureError>(())
/// ```
#[derive(Clone)]
pub struct SignatureBuf {
    data: [u8; MAX_SIGNATURE],
    len: usize,
}

impl SignatureBuf {
    /// Construct an empty signature.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            data: [0; MAX_SIGNATURE],
            len: 0,
        }
    }

    /// Construct a new signature with validation.
    #[inline]
    pub fn new(signature: &[u8]) -> Result<Self, SignatureError> {
        validate(signature)?;
        // SAFETY: Just validated above.
        Ok(unsafe { Self::from_slice_unchecked(signature) })
    }

    /// Construct a signature from a slice without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the slice is a valid signature, which
    /// implies it is no longer than 255 bytes.
    #[inline]
    pub unsafe fn from_slice_unchecked(bytes: &[u8]) -> Self {
        let mut data = [0; MAX_SIGNATURE];
        data[..bytes.len()].copy_from_slice(bytes);

        Self {
            data,
            len: bytes.len(),
        }
    }

    /// Borrow as a [`Signature`].
    #[inline]
    pub fn as_signature(&self) -> &Signature {
        // SAFETY: Construction ensures the contents are valid.
        unsafe { Signature::new_unchecked(&self.data[..self.len]) }
    }

    /// Append raw bytes, capped at the maximum signature length.
    ///
    /// Returns `false` without modifying the buffer if the bytes do not fit.
    /// The caller is responsible for keeping the contents well-formed.
    #[inline]
    pub(super) fn push_slice(&mut self, bytes: &[u8]) -> bool {
        if self.len + bytes.len() > MAX_SIGNATURE {
            return false;
        }

        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        true
    }

    #[inline]
    pub(super) fn clear(&mut self) {
        self.len = 0;
    }
}

impl Deref for SignatureBuf {
    type Target = Signature;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_signature()
    }
}

impl Borrow<Signature> for SignatureBuf {
    #[inline]
    fn borrow(&self) -> &Signature {
        self.as_signature()
    }
}

impl AsRef<Signature> for SignatureBuf {
    #[inline]
    fn as_ref(&self) -> &Signature {
        self.as_signature()
    }
}

impl fmt::Debug for SignatureBuf {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_signature().fmt(f)
    }
}

impl fmt::Display for SignatureBuf {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SignatureBuf {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for SignatureBuf {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_signature() == other.as_signature()
    }
}

impl Eq for SignatureBuf {}

impl PartialEq<Signature> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &Signature) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&Signature> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &&Signature) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<str> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl From<&Signature> for SignatureBuf {
    #[inline]
    fn from(signature: &Signature) -> Self {
        signature.to_owned()
    }
}
