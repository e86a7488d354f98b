pub use self::array_reader::ArrayReader;
mod array_reader;

pub use self::dict_reader::DictReader;
mod dict_reader;

#[cfg(test)]
mod tests;

use core::fmt;

use crate::buf::{padding_to, MAX_ARRAY_LENGTH};
use crate::error::{Error, ErrorKind, Result};
use crate::signature::SignatureBuilder;
use crate::ty;
use crate::{Endianness, Frame, Read, Signature, Variant};

/// A read-only view over an encoded body, with a read cursor, an endianness
/// and a signature cursor.
///
/// Every typed read checks that the next single complete type in the
/// signature matches the requested type before decoding, so a [`Body`] can
/// never be misinterpreted past its declared shape.
///
/// # Examples
///
/// ```
/// use stdbus::{Body, BodyBuf, Endianness};
///
/// let mut buf = BodyBuf::with_endianness(Endianness::Little);
/// buf.store(10u16)?;
/// buf.store("foo")?;
///
/// let mut body: Body<'_> = buf.as_body();
///
/// assert_eq!(body.load::<u16>()?, 10);
/// assert_eq!(body.read::<str>()?, "foo");
/// assert!(body.is_empty());
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Body<'a> {
    data: &'a [u8],
    cursor: usize,
    end: usize,
    endianness: Endianness,
    signature: &'a Signature,
    sig_at: usize,
}

impl<'a> Body<'a> {
    /// Construct a body over raw encoded bytes.
    ///
    /// The bytes must start at the alignment base, which for a message body
    /// is its first byte since message headers are padded to 8.
    pub fn new(data: &'a [u8], endianness: Endianness, signature: &'a Signature) -> Self {
        Self {
            data,
            cursor: 0,
            end: data.len(),
            endianness,
            signature,
            sig_at: 0,
        }
    }

    /// Construct an empty body.
    pub(crate) const fn empty() -> Self {
        Self {
            data: &[],
            cursor: 0,
            end: 0,
            endianness: Endianness::NATIVE,
            signature: Signature::EMPTY,
            sig_at: 0,
        }
    }

    /// Construct a body with explicit cursor bounds into `data`.
    ///
    /// Alignment is calculated from the start of `data`, which allows header
    /// fields and the message body to be parsed out of one message buffer
    /// with stream-relative alignment.
    pub(crate) fn from_raw_parts(
        data: &'a [u8],
        cursor: usize,
        end: usize,
        endianness: Endianness,
        signature: &'a Signature,
    ) -> Self {
        Self {
            data,
            cursor,
            end,
            endianness,
            signature,
            sig_at: 0,
        }
    }

    /// The endianness values are decoded with.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The signature of the body.
    pub fn signature(&self) -> &'a Signature {
        self.signature
    }

    /// The portion of the signature which has not been consumed yet.
    pub fn remaining_signature(&self) -> &'a Signature {
        // SAFETY: The signature cursor only rests at complete type
        // boundaries, and any tail at such a boundary is itself valid.
        unsafe { Signature::new_unchecked(&self.signature.as_bytes()[self.sig_at..]) }
    }

    /// The bytes which have not been read yet.
    pub fn get(&self) -> &'a [u8] {
        &self.data[self.cursor..self.end]
    }

    /// Test if the body has been fully read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == self.end
    }

    /// The number of bytes left to read.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.cursor
    }

    /// Load a primitive value, checking it against the signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, Endianness};
    ///
    /// let mut buf = BodyBuf::with_endianness(Endianness::Little);
    /// buf.store(42u32)?;
    ///
    /// let mut body = buf.as_body();
    /// assert_eq!(body.load::<u32>()?, 42);
    /// assert!(body.load::<u32>().is_err());
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn load<T>(&mut self) -> Result<T>
    where
        T: Frame,
    {
        self.expect(T::SIGNATURE)?;
        self.load_frame()
    }

    /// Load a boolean, checking it against the signature.
    ///
    /// Wire values other than 0 and 1 are refused.
    pub fn load_bool(&mut self) -> Result<bool> {
        self.expect(Signature::BOOLEAN)?;
        self.load_bool_unchecked()
    }

    /// Read a string-like or byte-array value, checking it against the
    /// signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, ObjectPath};
    ///
    /// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
    ///
    /// let mut buf = BodyBuf::new();
    /// buf.store(PATH)?;
    ///
    /// let mut body = buf.as_body();
    /// assert_eq!(body.read::<ObjectPath>()?, PATH);
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn read<T>(&mut self) -> Result<&'a T>
    where
        T: ?Sized + Read,
    {
        self.expect(T::SIGNATURE)?;
        T::read_from(self)
    }

    /// Read an array, checking it against the signature.
    ///
    /// See [`ty::Array`] for an example.
    ///
    /// [`ty::Array`]: crate::ty::Array
    pub fn load_array<E>(&mut self) -> Result<ArrayReader<'a, E>>
    where
        E: ty::Marker,
    {
        let mut expected = SignatureBuilder::new();
        <ty::Array<E> as ty::Marker>::write_signature(&mut expected)?;
        self.expect(expected.to_signature())?;
        self.array_reader_unchecked::<E>()
    }

    /// Read an array of dict entries, checking it against the signature.
    ///
    /// See [`ty::Dict`] for an example.
    ///
    /// [`ty::Dict`]: crate::ty::Dict
    pub fn load_dict<K, V>(&mut self) -> Result<DictReader<'a, K, V>>
    where
        K: ty::Basic,
        V: ty::Marker,
    {
        let mut expected = SignatureBuilder::new();
        <ty::Dict<K, V> as ty::Marker>::write_signature(&mut expected)?;
        self.expect(expected.to_signature())?;
        self.dict_reader_unchecked::<K, V>()
    }

    /// Read a struct, checking it against the signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{ty, BodyBuf, Endianness};
    ///
    /// let mut buf = BodyBuf::with_endianness(Endianness::Little);
    ///
    /// buf.store_struct::<(u16, ty::Str)>()?
    ///     .store(20u16)
    ///     .store("Hello")
    ///     .finish();
    ///
    /// assert_eq!(buf.signature(), "(qs)");
    ///
    /// let mut body = buf.as_body();
    /// let (a, b) = body.load_struct::<(u16, ty::Str)>()?;
    ///
    /// assert_eq!(a, 20);
    /// assert_eq!(b, "Hello");
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn load_struct<F>(&mut self) -> Result<F::Return<'a>>
    where
        F: ty::Fields,
    {
        let mut expected = SignatureBuilder::new();
        expected.open_struct()?;
        F::write_signature(&mut expected)?;
        expected.close_struct()?;
        self.expect(expected.to_signature())?;

        self.align_to(8)?;
        F::load_fields(self)
    }

    /// Read a variant, checking it against the signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, Variant};
    ///
    /// let mut buf = BodyBuf::new();
    /// buf.store(Variant::Uint32(7))?;
    ///
    /// let mut body = buf.as_body();
    /// assert_eq!(body.load_variant()?, Variant::Uint32(7));
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn load_variant(&mut self) -> Result<Variant<'a>> {
        self.expect(Signature::VARIANT)?;
        self.load_variant_unchecked()
    }

    /// Check that the next single complete type equals `expected` and
    /// consume it.
    pub(crate) fn expect(&mut self, expected: &Signature) -> Result<()> {
        let rest = &self.signature.as_bytes()[self.sig_at..];

        if rest.is_empty() {
            return Err(Error::new(ErrorKind::SignatureEnd(expected.to_owned())));
        }

        // A valid signature decomposes uniquely into single complete types,
        // so a prefix match on a complete type is an exact match of the next
        // one.
        if !rest.starts_with(expected.as_bytes()) {
            let actual = self
                .remaining_signature()
                .iter()
                .next()
                .unwrap_or(Signature::EMPTY);

            return Err(Error::new(ErrorKind::SignatureMismatch {
                expected: expected.to_owned(),
                actual: actual.to_owned(),
            }));
        }

        self.sig_at += expected.len();
        Ok(())
    }

    /// Advance the read cursor by `n`.
    pub(crate) fn advance(&mut self, n: usize) -> Result<()> {
        if self.end - self.cursor < n {
            return Err(Error::new(ErrorKind::EndOfBody));
        }

        self.cursor += n;
        Ok(())
    }

    /// Advance the read cursor up to the given alignment.
    pub(crate) fn align_to(&mut self, align: usize) -> Result<()> {
        self.advance(padding_to(align, self.cursor))
    }

    /// Load a primitive without consuming signature.
    pub(crate) fn load_frame<T>(&mut self) -> Result<T>
    where
        T: Frame,
    {
        self.align_to(T::ALIGNMENT)?;

        if self.end - self.cursor < T::SIZE {
            return Err(Error::new(ErrorKind::EndOfBody));
        }

        let frame = T::get(self.endianness, &self.data[self.cursor..self.cursor + T::SIZE]);
        self.cursor += T::SIZE;
        Ok(frame)
    }

    pub(crate) fn load_bool_unchecked(&mut self) -> Result<bool> {
        match self.load_frame::<u32>()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::new(ErrorKind::InvalidBool(other))),
        }
    }

    pub(crate) fn read_unchecked<T>(&mut self) -> Result<&'a T>
    where
        T: ?Sized + Read,
    {
        T::read_from(self)
    }

    /// Load `len` raw bytes.
    pub(crate) fn load_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.end - self.cursor < len {
            return Err(Error::new(ErrorKind::EndOfBody));
        }

        let bytes = &self.data[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(bytes)
    }

    /// Load `len` raw bytes which must be followed by a NUL byte, consuming
    /// both.
    pub(crate) fn load_slice_nul(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.end - self.cursor < len + 1 {
            return Err(Error::new(ErrorKind::EndOfBody));
        }

        if self.data[self.cursor + len] != 0 {
            return Err(Error::new(ErrorKind::NotNullTerminated));
        }

        let bytes = &self.data[self.cursor..self.cursor + len];
        self.cursor += len + 1;
        Ok(bytes)
    }

    /// Split off a window of `len` bytes sharing this body's alignment base.
    ///
    /// The window carries no signature; reads into it go through the
    /// unchecked entry points of the type markers.
    pub(crate) fn window(&mut self, len: usize) -> Result<Body<'a>> {
        if self.end - self.cursor < len {
            return Err(Error::new(ErrorKind::EndOfBody));
        }

        let window = Body {
            data: self.data,
            cursor: self.cursor,
            end: self.cursor + len,
            endianness: self.endianness,
            signature: Signature::EMPTY,
            sig_at: 0,
        };

        self.cursor += len;
        Ok(window)
    }

    pub(crate) fn array_reader_unchecked<E>(&mut self) -> Result<ArrayReader<'a, E>>
    where
        E: ty::Marker,
    {
        let len = self.load_frame::<u32>()? as usize;

        if len as u64 > MAX_ARRAY_LENGTH {
            return Err(Error::new(ErrorKind::ArrayTooLong(len as u64)));
        }

        self.align_to(E::ALIGNMENT)?;
        Ok(ArrayReader::new(self.window(len)?))
    }

    pub(crate) fn dict_reader_unchecked<K, V>(&mut self) -> Result<DictReader<'a, K, V>>
    where
        K: ty::Basic,
        V: ty::Marker,
    {
        let len = self.load_frame::<u32>()? as usize;

        if len as u64 > MAX_ARRAY_LENGTH {
            return Err(Error::new(ErrorKind::ArrayTooLong(len as u64)));
        }

        // Dict entries are 8-aligned, also in front of an empty payload.
        self.align_to(8)?;
        Ok(DictReader::new(self.window(len)?))
    }

    pub(crate) fn load_variant_unchecked(&mut self) -> Result<Variant<'a>> {
        let signature = self.read_unchecked::<Signature>()?;

        let variant = match signature.as_bytes() {
            b"y" => Variant::Byte(self.load_frame()?),
            b"b" => Variant::Bool(self.load_bool_unchecked()?),
            b"n" => Variant::Int16(self.load_frame()?),
            b"q" => Variant::Uint16(self.load_frame()?),
            b"i" => Variant::Int32(self.load_frame()?),
            b"u" => Variant::Uint32(self.load_frame()?),
            b"x" => Variant::Int64(self.load_frame()?),
            b"t" => Variant::Uint64(self.load_frame()?),
            b"d" => Variant::Double(self.load_frame()?),
            b"h" => Variant::UnixFd(self.load_frame()?),
            b"s" => Variant::String(self.read_unchecked::<str>()?),
            b"o" => Variant::ObjectPath(self.read_unchecked()?),
            b"g" => Variant::Signature(self.read_unchecked()?),
            _ => {
                return Err(Error::new(ErrorKind::UnsupportedVariant(signature.into())));
            }
        };

        Ok(variant)
    }

    /// Skip the encoded value described by `signature`, which may be a
    /// concatenation of complete types.
    pub(crate) fn skip_value(&mut self, signature: &Signature) -> Result<()> {
        for sct in signature.iter() {
            self.skip_single(sct)?;
        }

        Ok(())
    }

    fn skip_single(&mut self, sct: &Signature) -> Result<()> {
        let bytes = sct.as_bytes();

        match bytes[0] {
            b'y' => {
                self.load_frame::<u8>()?;
            }
            b'b' => {
                self.load_bool_unchecked()?;
            }
            b'n' | b'q' => {
                self.align_to(2)?;
                self.advance(2)?;
            }
            b'i' | b'u' | b'h' => {
                self.align_to(4)?;
                self.advance(4)?;
            }
            b'x' | b't' | b'd' => {
                self.align_to(8)?;
                self.advance(8)?;
            }
            b's' | b'o' => {
                let len = self.load_frame::<u32>()? as usize;
                self.load_slice_nul(len)?;
            }
            b'g' => {
                let len = self.load_frame::<u8>()? as usize;
                self.load_slice_nul(len)?;
            }
            b'v' => {
                let inner = self.read_unchecked::<Signature>()?;
                self.skip_value(inner)?;
            }
            b'a' => {
                let len = self.load_frame::<u32>()? as usize;

                if len as u64 > MAX_ARRAY_LENGTH {
                    return Err(Error::new(ErrorKind::ArrayTooLong(len as u64)));
                }

                // SAFETY: The tail of a complete array type is the complete
                // element type.
                let element = unsafe { Signature::new_unchecked(&bytes[1..]) };
                self.align_to(alignment_of(element))?;
                self.advance(len)?;
            }
            b'(' | b'{' => {
                self.align_to(8)?;
                // SAFETY: The interior of a complete struct or dict-entry
                // type is a concatenation of complete types.
                let inner = unsafe { Signature::new_unchecked(&bytes[1..bytes.len() - 1]) };
                self.skip_value(inner)?;
            }
            // Validation rules out every other byte.
            _ => unreachable!(),
        }

        Ok(())
    }
}

/// The wire alignment of the type at the front of `signature`.
pub(crate) fn alignment_of(signature: &Signature) -> usize {
    match signature.as_bytes().first() {
        Some(b'n' | b'q') => 2,
        Some(b'b' | b'i' | b'u' | b'h' | b's' | b'o' | b'a') => 4,
        Some(b'x' | b't' | b'd' | b'(' | b'{') => 8,
        _ => 1,
    }
}

impl Clone for Body<'_> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            cursor: self.cursor,
            end: self.end,
            endianness: self.endianness,
            signature: self.signature,
            sig_at: self.sig_at,
        }
    }
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("len", &self.len())
            .field("endianness", &self.endianness)
            .field("signature", &self.signature)
            .finish()
    }
}

impl<'a> PartialEq<Body<'a>> for Body<'_> {
    fn eq(&self, other: &Body<'a>) -> bool {
        self.get() == other.get()
            && self.endianness == other.endianness
            && self.remaining_signature() == other.remaining_signature()
    }
}

impl Eq for Body<'_> {}
