//! [`Generate`] implementations for standard library types

use crate::constants::DEFAULT_ELEMENT_CAP;
use crate::generator::Traversal;
use crate::types::{Generate, ScalarKind, Shape};
use crate::Result;
use bytes::Bytes;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::{BTreeMap, HashMap};

// Scalars draw straight from the cursor
macro_rules! impl_scalar {
    ($type:ty, $kind:ident, |$cursor:ident| $draw:expr) => {
        impl Generate for $type {
            const SHAPE: Shape = Shape::Scalar(ScalarKind::$kind);

            #[inline]
            fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
                let $cursor = traversal.cursor();
                *self = $draw;
                Ok(())
            }
        }
    };
}

impl Generate for u8 {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::Byte);

    #[inline]
    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        *self = traversal.cursor().byte()?;
        Ok(())
    }
}

impl_scalar!(u16, U16, |c| c.u16()?);
impl_scalar!(u32, U32, |c| c.u32()?);
// Wide unsigned values come from a single seed byte, like u32
impl_scalar!(u64, WideUnsigned, |c| c.int_like()? as u64);
impl_scalar!(u128, WideUnsigned, |c| c.int_like()? as u128);
impl_scalar!(usize, WideUnsigned, |c| c.int_like()? as usize);
impl_scalar!(i8, Signed, |c| c.int_like()? as i8);
impl_scalar!(i16, Signed, |c| c.int_like()? as i16);
impl_scalar!(i32, Signed, |c| c.int_like()? as i32);
impl_scalar!(i64, Signed, |c| c.int_like()?);
impl_scalar!(i128, Signed, |c| i128::from(c.int_like()?));
impl_scalar!(isize, Signed, |c| c.int_like()? as isize);
impl_scalar!(f32, F32, |c| c.f32()?);
impl_scalar!(f64, F64, |c| c.f64()?);
impl_scalar!(bool, Bool, |c| c.bool()?);
impl_scalar!(char, Char, |c| char::from(c.byte()?));

impl Generate for String {
    const SHAPE: Shape = Shape::Text;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        *self = traversal.cursor().string()?;
        Ok(())
    }
}

impl<T: Generate + Default> Generate for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        traversal.sequence(self)
    }
}

// Same element-by-element generation as Vec<u8>
impl Generate for Bytes {
    const SHAPE: Shape = Shape::Sequence;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        let mut raw: Vec<u8> = Vec::new();
        traversal.sequence(&mut raw)?;
        *self = Bytes::from(raw);
        Ok(())
    }
}

impl<T: Generate, const N: usize> Generate for [T; N] {
    const SHAPE: Shape = Shape::FixedArray(N);

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        for item in self.iter_mut() {
            traversal.fill(item)?;
        }
        Ok(())
    }
}

impl<K, V, S> Generate for HashMap<K, V, S>
where
    K: Generate + Default + Eq + Hash,
    V: Generate + Default,
    S: BuildHasher + Default + 'static,
{
    const SHAPE: Shape = Shape::Map;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        *self = traversal.entries::<K, V>()?.into_iter().collect();
        Ok(())
    }
}

impl<K, V> Generate for BTreeMap<K, V>
where
    K: Generate + Default + Ord,
    V: Generate + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        *self = traversal.entries::<K, V>()?.into_iter().collect();
        Ok(())
    }
}

impl<T: Generate + Default> Generate for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn allocate(&mut self) {
        self.get_or_insert_with(T::default);
    }

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        traversal.optional(self)
    }
}

// A box always holds a value; its contents sit one level deeper
impl<T: Generate> Generate for Box<T> {
    const SHAPE: Shape = T::SHAPE;
    // Boxed bytes are not a byte buffer
    const ELEMENT_CAP: u32 = DEFAULT_ELEMENT_CAP;

    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        traversal.fill(self.as_mut())
    }
}

// Tuples are aggregates whose fields are all public
macro_rules! impl_tuple {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: Generate),+> Generate for ($($name,)+) {
            const SHAPE: Shape = Shape::Aggregate;

            fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
                $(traversal.fill(&mut self.$index)?;)+
                Ok(())
            }
        }
    };
}

impl_tuple!(A: 0);
impl_tuple!(A: 0, B: 1);
impl_tuple!(A: 0, B: 1, C: 2);
impl_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

// No structural generation: handled by the unknown-shape strategy
impl Generate for () {}

impl<T: 'static> Generate for PhantomData<T> {}
