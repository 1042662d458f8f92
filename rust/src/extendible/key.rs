//! Directory addressing for integer keys.

/// Keys that can address an extendible hash directory.
///
/// The directory slot for a key is its low-order `depth` bits, taken as is:
/// keys that agree on those bits land in the same slot.
pub trait DirectoryKey: Eq {
    /// The low `depth` bits of the key as a directory slot.
    fn low_bits(&self, depth: u32) -> usize;
}

macro_rules! impl_directory_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl DirectoryKey for $t {
                #[inline]
                fn low_bits(&self, depth: u32) -> usize {
                    // Signed keys sign-extend, so -1 has every low bit set.
                    let mask = (1u64 << depth) - 1;
                    ((*self as u64) & mask) as usize
                }
            }
        )*
    };
}

impl_directory_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
