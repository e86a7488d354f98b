use core::marker::PhantomData;

use crate::buf::{Reserved, MAX_ARRAY_LENGTH};
use crate::error::{Error, ErrorKind, Result};
use crate::ty;
use crate::{BodyBuf, Storable};

/// A typed writer over the entries of a dict, an array of dict entries.
///
/// Constructed through [`BodyBuf::store_dict`]; must be closed with
/// [`finish`], which backpatches the byte length of the payload.
///
/// [`BodyBuf::store_dict`]: crate::BodyBuf::store_dict
/// [`finish`]: Self::finish
pub struct StoreDict<'a, K, V> {
    buf: &'a mut BodyBuf,
    len_at: Reserved<u32>,
    start: usize,
    _marker: PhantomData<(K, V)>,
}

impl<'a, K, V> StoreDict<'a, K, V>
where
    K: ty::Basic,
    V: ty::Marker,
{
    pub(crate) fn new(buf: &'a mut BodyBuf) -> Self {
        let len_at = buf.reserve_u32();
        // Dict entries are 8-aligned, also in front of an empty payload.
        buf.pad_to(8);
        let start = buf.len();

        Self {
            buf,
            len_at,
            start,
            _marker: PhantomData,
        }
    }

    /// Store the next entry.
    pub fn store<A, B>(&mut self, key: A, value: B)
    where
        A: ty::Compatible<K>,
        B: ty::Compatible<V>,
    {
        self.buf.pad_to(8);
        key.store_to(self.buf);
        value.store_to(self.buf);
    }

    /// Close the dict, writing the payload length into its length slot.
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
