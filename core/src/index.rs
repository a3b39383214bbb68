use std::fmt;

/// Integer width used by static storages to record lengths and partition
/// boundaries.
///
/// Picking the narrowest width that holds the configured capacity keeps a
/// static graph's footprint small; a capacity that does not fit is rejected
/// when the storage type is instantiated.
pub trait IndexType: Copy + Ord + fmt::Debug + 'static {
    /// Largest value representable by this width.
    const MAX_INDEX: usize;

    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

macro_rules! impl_index_type {
    ($($t:ty),*) => {
        $(
            impl IndexType for $t {
                const MAX_INDEX: usize = <$t>::MAX as usize;

                #[inline]
                fn from_index(index: usize) -> Self {
                    debug_assert!(index <= Self::MAX_INDEX);
                    index as $t
                }

                #[inline]
                fn index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_index_type!(u8, u16, u32, usize);
