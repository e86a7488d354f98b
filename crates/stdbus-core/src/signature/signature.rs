use core::fmt;
use core::str::from_utf8_unchecked;

use super::{validate, Iter, SignatureBuf, SignatureError};

/// A validated D-Bus signature, borrowed like `str`.
///
/// # Examples
///
/// ```
/// use stdbus_core::signature::Signature;
///
/// const SIG: &Signature = Signature::new_const(b"a{sv}");
///
/// assert!(Signature::new(b"a(ii)").is_ok());
/// assert!(Signature::new(b"a").is_err());
/// ```
#[derive(Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct Signature([u8]);

impl Signature {
    /// The empty signature.
    pub const EMPTY: &'static Signature = Signature::new_const(b"");

    /// A single byte, code `y`.
    pub const BYTE: &'static Signature = Signature::new_const(b"y");

    /// A boolean, code `b`.
    pub const BOOLEAN: &'static Signature = Signature::new_const(b"b");

    /// Signed 16-bit integer, code `n`.
    pub const INT16: &'static Signature = Signature::new_const(b"n");

    /// Unsigned 16-bit integer, code `q`.
    pub const UINT16: &'static Signature = Signature::new_const(b"q");

    /// Signed 32-bit integer, code `i`.
    pub const INT32: &'static Signature = Signature::new_const(b"i");

    /// Unsigned 32-bit integer, code `u`.
    pub const UINT32: &'static Signature = Signature::new_const(b"u");

    /// Signed 64-bit integer, code `x`.
    pub const INT64: &'static Signature = Signature::new_const(b"x");

    /// Unsigned 64-bit integer, code `t`.
    pub const UINT64: &'static Signature = Signature::new_const(b"t");

    /// Double precision floating point, code `d`.
    pub const DOUBLE: &'static Signature = Signature::new_const(b"d");

    /// A string, code `s`.
    pub const STRING: &'static Signature = Signature::new_const(b"s");

    /// An object path, code `o`.
    pub const OBJECT_PATH: &'static Signature = Signature::new_const(b"o");

    /// A signature, code `g`.
    pub const SIGNATURE: &'static Signature = Signature::new_const(b"g");

    /// A variant value, code `v`.
    pub const VARIANT: &'static Signature = Signature::new_const(b"v");

    /// An index into the out-of-band file descriptor array, code `h`.
    pub const UNIX_FD: &'static Signature = Signature::new_const(b"h");

    /// Construct a signature in a constant context, panicking on invalid
    /// input.
    ///
    /// ```compile_fail
    /// use stdbus_core::signature::Signature;
    ///
    /// const BAD: &Signature = Signature::new_const(b"(a)");
    /// ```
    #[inline]
    #[track_caller]
    pub const fn new_const(signature: &[u8]) -> &Signature {
        if validate(signature).is_err() {
            panic!("Invalid D-Bus signature");
        }

        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Self::new_unchecked(signature) }
    }

    /// Construct a new signature with validation.
    #[inline]
    pub fn new<S>(signature: &S) -> Result<&Signature, SignatureError>
    where
        S: ?Sized + AsRef<[u8]>,
    {
        let signature = signature.as_ref();
        validate(signature)?;
        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Ok(Self::new_unchecked(signature)) }
    }

    /// Construct a signature without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the bytes form a valid signature.
    #[inline]
    pub const unsafe fn new_unchecked(signature: &[u8]) -> &Self {
        &*(signature as *const _ as *const Signature)
    }

    /// Test if the signature is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The length of the signature in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the single complete types of this signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus_core::signature::Signature;
    ///
    /// let sig = Signature::new(b"ia{sv}(ss)")?;
    /// let types = sig.iter().map(|s| s.as_str()).collect::<Vec<_>>();
    /// assert_eq!(types, ["i", "a{sv}", "(ss)"]);
    /// # Ok::<_, stdbus_core::signature::SignatureError>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// The signature as a string.
    pub fn as_str(&self) -> &str {
        // SAFETY: Validation only accepts a subset of ASCII.
        unsafe { from_utf8_unchecked(&self.0) }
    }

    /// The signature as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<Signature> for Signature {
    #[inline]
    fn as_ref(&self) -> &Signature {
        self
    }
}

impl ToOwned for Signature {
    type Owned = SignatureBuf;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        // SAFETY: Self is always valid.
        unsafe { SignatureBuf::from_slice_unchecked(&self.0) }
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Signature;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq<SignatureBuf> for Signature {
    #[inline]
    fn eq(&self, other: &SignatureBuf) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl PartialEq<SignatureBuf> for &Signature {
    #[inline]
    fn eq(&self, other: &SignatureBuf) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl PartialEq<[u8]> for Signature {
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Signature {
    #[inline]
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0 == other[..]
    }
}

impl<const N: usize> PartialEq<[u8; N]> for &Signature {
    #[inline]
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0 == other[..]
    }
}

impl PartialEq<str> for Signature {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl PartialEq<&str> for Signature {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl PartialEq<str> for &Signature {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl From<&Signature> for Box<Signature> {
    #[inline]
    fn from(signature: &Signature) -> Self {
        // SAFETY: Signature is repr(transparent) over [u8].
        unsafe { Box::from_raw(Box::into_raw(Box::<[u8]>::from(&signature.0)) as *mut Signature) }
    }
}

impl Clone for Box<Signature> {
    #[inline]
    fn clone(&self) -> Self {
        Box::<Signature>::from(&**self)
    }
}
