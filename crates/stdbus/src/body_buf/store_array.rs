use core::marker::PhantomData;

use crate::buf::{Reserved, MAX_ARRAY_LENGTH};
use crate::error::{Error, ErrorKind, Result};
use crate::ty;
use crate::{BodyBuf, Storable, StoreStruct};

/// A typed writer over the elements of an array.
///
/// Constructed through [`BodyBuf::store_array`]; must be closed with
/// [`finish`], which backpatches the byte length of the payload.
///
/// [`BodyBuf::store_array`]: crate::BodyBuf::store_array
/// [`finish`]: Self::finish
pub struct StoreArray<'a, E> {
    buf: &'a mut BodyBuf,
    len_at: Reserved<u32>,
    start: usize,
    _marker: PhantomData<E>,
}

impl<'a, E> StoreArray<'a, E>
where
    E: ty::Marker,
{
    pub(crate) fn new(buf: &'a mut BodyBuf) -> Self {
        let len_at = buf.reserve_u32();
        // The payload is aligned for the element type even when it ends up
        // empty, and the padding is not part of the encoded length.
        buf.pad_to(E::ALIGNMENT);
        let start = buf.len();

        Self {
            buf,
            len_at,
            start,
            _marker: PhantomData,
        }
    }

    /// Store the next element.
    pub fn store<V>(&mut self, value: V)
    where
        V: ty::Compatible<E>,
    {
        value.store_to(self.buf);
    }

    /// Close the array, writing the payload length into its length slot.
    ///
    /// Errors if the payload exceeds the 2^26 byte limit on arrays.
    pub fn finish(self) -> Result<()> {
        let len = self.buf.len() - self.start;

        if len as u64 > MAX_ARRAY_LENGTH {
            return Err(Error::new(ErrorKind::ArrayTooLong(len as u64)));
        }

        self.buf.store_at(self.len_at, len as u32);
        Ok(())
    }
}

impl<'a, E> StoreArray<'a, ty::Array<E>>
where
    E: ty::Marker,
{
    /// Store a nested array element.
    pub fn store_array<W>(&mut self, f: W) -> Result<()>
    where
        W: FnOnce(&mut StoreArray<'_, E>),
    {
        let mut array = StoreArray::new(self.buf);
        f(&mut array);
        array.finish()
    }
}

impl<'a, F> StoreArray<'a, ty::Struct<F>>
where
    F: ty::Fields,
{
    /// Store a struct element by filling in each of its fields.
    pub fn store_struct<W>(&mut self, f: W)
    where
        W: for<'w> FnOnce(StoreStruct<'w, F>) -> StoreStruct<'w, ()>,
    {
        f(StoreStruct::new(self.buf)).finish();
    }
}
