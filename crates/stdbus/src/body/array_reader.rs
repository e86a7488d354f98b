use core::marker::PhantomData;

use crate::error::Result;
use crate::ty;
use crate::Body;

/// A reader over the elements of an encoded array.
///
/// Constructed through [`Body::load_array`].
///
/// [`Body::load_array`]: crate::Body::load_array
///
/// # Examples
///
/// ```
/// use stdbus::{ty, BodyBuf, Endianness};
///
/// let mut buf = BodyBuf::with_endianness(Endianness::Little);
///
/// let mut array = buf.store_array::<ty::Str>()?;
/// array.store("foo");
/// array.store("bar");
/// array.finish()?;
///
/// let mut body = buf.as_body();
/// let mut array = body.load_array::<ty::Str>()?;
///
/// assert_eq!(array.load()?, Some("foo"));
/// assert_eq!(array.load()?, Some("bar"));
/// assert_eq!(array.load()?, None);
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct ArrayReader<'de, E> {
    body: Body<'de>,
    _marker: PhantomData<E>,
}

impl<E> core::fmt::Debug for ArrayReader<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArrayReader")
            .field("body", &self.body)
            .finish()
    }
}

impl<'de, E> ArrayReader<'de, E>
where
    E: ty::Marker,
{
    #[inline]
    pub(crate) fn new(body: Body<'de>) -> Self {
        Self {
            body,
            _marker: PhantomData,
        }
    }

    /// Load the next element, or `None` once the array is exhausted.
    pub fn load(&mut self) -> Result<Option<E::Return<'de>>> {
        if self.body.is_empty() {
            return Ok(None);
        }

        Ok(Some(E::load_unchecked(&mut self.body)?))
    }

    /// Test if the array has been fully read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
