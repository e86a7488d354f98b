use core::ops::Deref;

use super::{
    Signature, SignatureBuf, SignatureError, SignatureErrorKind, MAX_CONTAINER_DEPTH, MAX_DEPTH,
};

/// An incremental builder of D-Bus signatures.
///
/// Enforces the maximum length and nesting limits while types are appended,
/// so that the contents are always a valid signature at every complete-type
/// boundary.
#[derive(Clone)]
pub struct SignatureBuilder {
    buf: SignatureBuf,
    arrays: usize,
    structs: usize,
    dicts: usize,
}

impl SignatureBuilder {
    /// Construct a new empty builder.
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: SignatureBuf::empty(),
            arrays: 0,
            structs: 0,
            dicts: 0,
        }
    }

    /// Construct a builder over an existing signature.
    #[inline]
    pub fn from_signature_buf(buf: SignatureBuf) -> Self {
        Self {
            buf,
            arrays: 0,
            structs: 0,
            dicts: 0,
        }
    }

    /// Borrow the current contents as a signature.
    #[inline]
    pub fn to_signature(&self) -> &Signature {
        self.buf.as_signature()
    }

    /// Clone the current contents into an owned signature.
    #[inline]
    pub fn to_signature_buf(&self) -> SignatureBuf {
        self.buf.clone()
    }

    /// Clear the builder.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
        self.arrays = 0;
        self.structs = 0;
        self.dicts = 0;
    }

    /// Append an `a` marker, opening an array.
    pub fn open_array(&mut self) -> Result<(), SignatureError> {
        if self.arrays == MAX_CONTAINER_DEPTH || self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumArrayRecursion,
            ));
        }

        if !self.buf.push_slice(b"a") {
            return Err(SignatureError::too_long());
        }

        self.arrays += 1;
        Ok(())
    }

    /// Close an array previously opened with [`open_array`].
    ///
    /// [`open_array`]: Self::open_array
    pub fn close_array(&mut self) {
        self.arrays -= 1;
    }

    /// Append a `(` marker, opening a struct.
    pub fn open_struct(&mut self) -> Result<(), SignatureError> {
        if self.structs == MAX_CONTAINER_DEPTH || self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumStructRecursion,
            ));
        }

        if !self.buf.push_slice(b"(") {
            return Err(SignatureError::too_long());
        }

        self.structs += 1;
        Ok(())
    }

    /// Append a `)` marker, closing a struct.
    pub fn close_struct(&mut self) -> Result<(), SignatureError> {
        if !self.buf.push_slice(b")") {
            return Err(SignatureError::too_long());
        }

        self.structs -= 1;
        Ok(())
    }

    /// Append a `{` marker, opening a dict entry.
    pub fn open_dict(&mut self) -> Result<(), SignatureError> {
        if self.dicts == MAX_CONTAINER_DEPTH || self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumDictRecursion,
            ));
        }

        if !self.buf.push_slice(b"{") {
            return Err(SignatureError::too_long());
        }

        self.dicts += 1;
        Ok(())
    }

    /// Append a `}` marker, closing a dict entry.
    pub fn close_dict(&mut self) -> Result<(), SignatureError> {
        if !self.buf.push_slice(b"}") {
            return Err(SignatureError::too_long());
        }

        self.dicts -= 1;
        Ok(())
    }

    /// Append a complete signature.
    pub fn extend_from_signature<S>(&mut self, other: S) -> Result<(), SignatureError>
    where
        S: AsRef<Signature>,
    {
        if !self.buf.push_slice(other.as_ref().as_bytes()) {
            return Err(SignatureError::too_long());
        }

        Ok(())
    }

    #[inline]
    fn depth(&self) -> usize {
        self.arrays + self.structs + self.dicts
    }
}

impl Default for SignatureBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SignatureBuilder {
    type Target = Signature;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.to_signature()
    }
}
