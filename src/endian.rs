use core::fmt::Debug;

/// Little-endian integer as laid out on disk
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Little<T: Copy + Clone + Default + Debug + Eq + PartialEq + Sized>(T);

macro_rules! define {
    ($type:ty) => {
        impl Little<$type> {
            #[inline]
            pub fn to_ne(self) -> $type {
                <$type>::from_le(self.0)
            }
        }

        impl From<$type> for Little<$type> {
            #[inline]
            fn from(t: $type) -> Self {
                Self(<$type>::to_le(t))
            }
        }
    };
}

define!(u16);
define!(u32);
