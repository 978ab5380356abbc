use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder every [`HashTable`](crate::HashTable) uses.
        ///
        /// This is foldhash with its fixed default seed, so bucket placement is
        /// reproducible across runs of the same build. It is not guaranteed to
        /// be stable across foldhash releases or target architectures.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder every [`HashTable`](crate::HashTable) uses.
        ///
        /// Unkeyed SipHash-1-3 from the standard library. Reproducible across
        /// runs of the same toolchain, but the algorithm may change between
        /// Rust releases.
        pub type DefaultHashBuilder =
            core::hash::BuildHasherDefault<std::hash::DefaultHasher>;
    } else {
        compile_error!("either the `foldhash` or the `std` feature must be enabled");
    }
}

#[inline(always)]
pub(crate) fn hash_key<K>(hash_builder: &DefaultHashBuilder, key: &K) -> u64
where
    K: Hash + ?Sized,
{
    hash_builder.hash_one(key)
}
