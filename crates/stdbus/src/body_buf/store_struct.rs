use core::marker::PhantomData;

use crate::error::Result;
use crate::ty;
use crate::{BodyBuf, Storable, StoreArray, StoreDict};

/// A typed writer over the fields of a struct.
///
/// Constructed through [`BodyBuf::store_struct`]. Each store consumes the
/// writer and returns one typed for the remaining fields, so a struct cannot
/// be closed until every declared field has been written:
///
/// ```compile_fail
/// use stdbus::BodyBuf;
///
/// let mut buf = BodyBuf::new();
/// let st = buf.store_struct::<(u16, u32)>()?;
/// st.store(10u16).finish();
/// # Ok::<_, stdbus::Error>(())
/// ```
///
/// [`BodyBuf::store_struct`]: crate::BodyBuf::store_struct
#[must_use = "Structs must be written completely and closed with finish()"]
pub struct StoreStruct<'a, F> {
    buf: &'a mut BodyBuf,
    _marker: PhantomData<F>,
}

impl<'a, F> StoreStruct<'a, F>
where
    F: ty::Fields,
{
    pub(crate) fn new(buf: &'a mut BodyBuf) -> Self {
        buf.pad_to(8);

        Self {
            buf,
            _marker: PhantomData,
        }
    }
}

impl StoreStruct<'_, ()> {
    /// Close the struct after every field has been written.
    pub fn finish(self) {}
}

macro_rules! impl_store_struct_step {
    ($head:ident $(, $tail:ident)*) => {
        impl<'a, $head, $($tail),*> StoreStruct<'a, ($head, $($tail,)*)>
        where
            $head: ty::Marker,
            $($tail: ty::Marker,)*
        {
            /// Store the next field.
            pub fn store<V0>(self, value: V0) -> StoreStruct<'a, ($($tail,)*)>
            where
                V0: ty::Compatible<$head>,
            {
                value.store_to(self.buf);

                StoreStruct {
                    buf: self.buf,
                    _marker: PhantomData,
                }
            }
        }

        impl<'a, $head, $($tail),*> StoreStruct<'a, (ty::Array<$head>, $($tail,)*)>
        where
            $head: ty::Marker,
            $($tail: ty::Marker,)*
        {
            /// Store the next field, an array.
            pub fn store_array<W>(self, f: W) -> Result<StoreStruct<'a, ($($tail,)*)>>
            where
                W: FnOnce(&mut StoreArray<'_, $head>),
            {
                let mut array = StoreArray::new(&mut *self.buf);
                f(&mut array);
                array.finish()?;

                Ok(StoreStruct {
                    buf: self.buf,
                    _marker: PhantomData,
                })
            }
        }

        impl<'a, DK, DV, $($tail),*> StoreStruct<'a, (ty::Dict<DK, DV>, $($tail,)*)>
        where
            DK: ty::Basic,
            DV: ty::Marker,
            $($tail: ty::Marker,)*
        {
            /// Store the next field, a dict.
            pub fn store_dict<W>(self, f: W) -> Result<StoreStruct<'a, ($($tail,)*)>>
            where
                W: FnOnce(&mut StoreDict<'_, DK, DV>),
            {
                let mut dict = StoreDict::new(&mut *self.buf);
                f(&mut dict);
                dict.finish()?;

                Ok(StoreStruct {
                    buf: self.buf,
                    _marker: PhantomData,
                })
            }
        }

        impl<'a, SF, $($tail),*> StoreStruct<'a, (ty::Struct<SF>, $($tail,)*)>
        where
            SF: ty::Fields,
            $($tail: ty::Marker,)*
        {
            /// Store the next field, a nested struct.
            pub fn store_struct<W>(self, f: W) -> StoreStruct<'a, ($($tail,)*)>
            where
                W: for<'w> FnOnce(StoreStruct<'w, SF>) -> StoreStruct<'w, ()>,
            {
                f(StoreStruct::new(&mut *self.buf)).finish();

                StoreStruct {
                    buf: self.buf,
                    _marker: PhantomData,
                }
            }
        }
    }
}

repeat!(impl_store_struct_step);
