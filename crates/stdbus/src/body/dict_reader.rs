use core::marker::PhantomData;

use crate::error::Result;
use crate::ty;
use crate::Body;

/// A reader over the entries of an encoded dict, an array of dict entries.
///
/// Constructed through [`Body::load_dict`].
///
/// [`Body::load_dict`]: crate::Body::load_dict
pub struct DictReader<'de, K, V> {
    body: Body<'de>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> core::fmt::Debug for DictReader<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DictReader")
            .field("body", &self.body)
            .finish()
    }
}

impl<'de, K, V> DictReader<'de, K, V>
where
    K: ty::Basic,
    V: ty::Marker,
{
    #[inline]
    pub(crate) fn new(body: Body<'de>) -> Self {
        Self {
            body,
            _marker: PhantomData,
        }
    }

    /// Load the next entry, or `None` once the dict is exhausted.
    pub fn load_entry(&mut self) -> Result<Option<(K::Return<'de>, V::Return<'de>)>> {
        if self.body.is_empty() {
            return Ok(None);
        }

        // Each entry is aligned like the struct it is.
        self.body.align_to(8)?;
        let key = K::load_unchecked(&mut self.body)?;
        let value = V::load_unchecked(&mut self.body)?;
        Ok(Some((key, value)))
    }

    /// Test if the dict has been fully read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
