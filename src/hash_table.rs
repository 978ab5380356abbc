use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;

use log::debug;
use log::trace;

use crate::error::Error;
use crate::error::Result;
use crate::hasher::DefaultHashBuilder;
use crate::hasher::hash_key;

/// Number of buckets allocated by [`HashTable::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// Load factor that, once exceeded by inserting a new key, doubles the bucket
/// count.
pub const MAX_LOAD_FACTOR: f64 = 0.8;

type Bucket<K, V> = Vec<(K, V)>;

/// `len / capacity > 0.8`, in integer arithmetic.
#[inline(always)]
fn exceeds_max_load(len: usize, capacity: usize) -> bool {
    len as u128 * 5 > capacity as u128 * 4
}

#[inline(always)]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

fn allocate_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Bucket chain statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Number of buckets holding no entries
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Average chain length over non-empty buckets
    pub mean_chain: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} in {} buckets ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Empty buckets: {}/{} ({:.2}%)",
            self.empty_buckets,
            self.capacity,
            if self.capacity == 0 {
                0.0
            } else {
                (self.empty_buckets as f64 / self.capacity as f64) * 100.0
            }
        );
        println!(
            "Chains: longest {}, mean {:.2}",
            self.longest_chain, self.mean_chain
        );
    }
}

/// A hash table using separate chaining.
///
/// `HashTable<K, V>` maps keys of type `K` to values of type `V`. Every key is
/// hashed with [`DefaultHashBuilder`] and stored in bucket
/// `hash(key) % capacity`, where `capacity` is the number of buckets. Entries
/// sharing a bucket are kept in insertion order.
///
/// Inserting a new key that pushes the load factor above
/// [`MAX_LOAD_FACTOR`] doubles the bucket count and rehashes every entry.
/// The table never shrinks.
///
/// ## Example
///
/// ```rust
/// use chained_hash::HashTable;
///
/// let mut table = HashTable::new();
/// table.insert("apple", 3);
/// table.insert("pear", 5);
/// table.insert("apple", 4);
///
/// assert_eq!(table.get("apple"), Some(&4));
/// assert_eq!(table.len(), 2);
/// assert!(table.remove("pear"));
/// assert!(!table.remove("pear"));
/// ```
#[derive(Clone)]
pub struct HashTable<K, V> {
    buckets: Vec<Bucket<K, V>>,
    populated: usize,
    hash_builder: DefaultHashBuilder,
}

impl<K, V> Debug for HashTable<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Buckets<'a, K, V>(&'a [Bucket<K, V>]);

        impl<K: Debug, V: Debug> Debug for Buckets<'_, K, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_map().entries(self.0.iter().enumerate()).finish()
            }
        }

        f.debug_struct("HashTable")
            .field("buckets", &Buckets(&self.buckets))
            .field("populated", &self.populated)
            .field("capacity", &self.buckets.len())
            .finish()
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty hash table with [`DEFAULT_CAPACITY`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let table: HashTable<u64, String> = HashTable::new();
    /// assert_eq!(table.capacity(), 8);
    /// assert_eq!(table.load_factor(), 0.0);
    /// ```
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_CAPACITY)
    }

    /// Creates an empty hash table with exactly `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::Error;
    /// # use chained_hash::HashTable;
    /// #
    /// let table: HashTable<u64, u64> = HashTable::with_capacity(32).unwrap();
    /// assert_eq!(table.capacity(), 32);
    ///
    /// let err = HashTable::<u64, u64>::with_capacity(0).unwrap_err();
    /// assert_eq!(err, Error::InvalidCapacity { capacity: 0 });
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity { capacity });
        }

        Ok(Self::with_buckets(capacity))
    }

    fn with_buckets(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            buckets: allocate_buckets(capacity),
            populated: 0,
            hash_builder: DefaultHashBuilder::default(),
        }
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets.
    ///
    /// This starts at the construction capacity and doubles on every
    /// expansion.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of stored entries to buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for k in 0..6 {
    ///     table.insert(k, ());
    /// }
    /// assert_eq!(table.load_factor(), 0.75);
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.buckets.len() as f64
    }

    /// Removes all entries from the table, keeping its bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Returns an iterator over all key-value pairs in the table.
    ///
    /// The iteration order is unspecified.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: [].iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields every key-value pair.
    ///
    /// The table is empty once the iterator is dropped, and keeps its bucket
    /// count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table: HashTable<_, _> = [(1, "one"), (2, "two")].into_iter().collect();
    /// let mut drained: Vec<_> = table.drain().collect();
    /// drained.sort();
    ///
    /// assert_eq!(drained, [(1, "one"), (2, "two")]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    /// Returns a read-only view of every bucket, in index order.
    ///
    /// Each item is the bucket index and the entries chained in that bucket,
    /// oldest first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert("key", 1);
    ///
    /// for (index, entries) in table.dump() {
    ///     for (key, _) in entries {
    ///         assert_eq!(table.hash_index(key), index);
    ///     }
    /// }
    /// assert_eq!(table.dump().len(), table.capacity());
    /// ```
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump {
            inner: self.buckets.iter().enumerate(),
        }
    }

    /// Returns the number of buckets per chain length.
    ///
    /// Index `n` of the result holds the number of buckets chaining exactly
    /// `n` entries. The counts sum to [`capacity`](Self::capacity).
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns chain length and utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let empty_buckets = self.buckets.iter().filter(|b| b.is_empty()).count();
        let occupied_buckets = self.buckets.len() - empty_buckets;

        DebugStats {
            populated: self.populated,
            capacity: self.buckets.len(),
            load_factor: self.load_factor(),
            empty_buckets,
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            mean_chain: if occupied_buckets == 0 {
                0.0
            } else {
                self.populated as f64 / occupied_buckets as f64
            },
        }
    }

    /// Pretty-prints the chain length histogram horizontally using stdout.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.populated,
            self.buckets.len()
        );
        for (len, &count) in hist.iter().enumerate() {
            let units = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(units), count);
        }
    }
}

impl<K, V> HashTable<K, V>
where
    K: Hash + Eq,
{
    /// Returns the bucket index `key` maps to under the current capacity.
    ///
    /// The result is always in `0..capacity()` and is the same for equal
    /// keys until the next expansion.
    pub fn hash_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        bucket_index(hash_key(&self.hash_builder, key), self.buckets.len())
    }

    /// Inserts a key-value pair, or updates the value of an existing key.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned; the entry keeps its position in the bucket.
    /// Otherwise the pair is appended to its bucket and `None` is returned.
    ///
    /// If a new key pushes the load factor above [`MAX_LOAD_FACTOR`], the
    /// table [expands](Self::expand) before returning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for k in 0..6 {
    ///     assert_eq!(table.insert(k, k * 10), None);
    /// }
    /// assert_eq!(table.capacity(), 8);
    ///
    /// // Updates never grow the table.
    /// assert_eq!(table.insert(0, 1), Some(0));
    /// assert_eq!(table.capacity(), 8);
    ///
    /// // 7 / 8 > 0.8
    /// table.insert(6, 60);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.hash_index(&key);
        let bucket = &mut self.buckets[index];

        if let Some((_, existing)) = bucket.iter_mut().find(|(k, _)| *k == key) {
            return Some(core::mem::replace(existing, value));
        }

        bucket.push((key, value));
        self.populated += 1;
        trace!(
            "inserted new key into bucket {index} ({} entries, {} buckets)",
            self.populated,
            self.buckets.len()
        );

        if exceeds_max_load(self.populated, self.buckets.len()) {
            self.expand();
        }

        None
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// `None` means the key is absent, and is distinct from any stored value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert("unset".to_string(), None::<i32>);
    ///
    /// assert_eq!(table.get("unset"), Some(&None));
    /// assert_eq!(table.get("missing"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.hash_index(key);
        self.buckets[index]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.hash_index(key);
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the table holds an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes the entry for `key`, returning `true` if it was present.
    ///
    /// Removing an absent key leaves the table untouched. Remaining entries
    /// in the bucket keep their relative order.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes the entry for `key` and returns the stored key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(7, "seven");
    ///
    /// assert_eq!(table.remove_entry(&7), Some((7, "seven")));
    /// assert_eq!(table.remove_entry(&7), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.hash_index(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|(k, _)| k.borrow() == key)?;

        self.populated -= 1;
        trace!(
            "removed key from bucket {index} ({} entries left)",
            self.populated
        );

        Some(bucket.remove(position))
    }

    /// Doubles the bucket count and rehashes every entry.
    ///
    /// Each entry moves to `hash(key) % new_capacity` in a freshly allocated
    /// bucket array, which then replaces the old one. Entries are moved
    /// without duplicate checks, and the move never triggers another
    /// expansion.
    ///
    /// [`insert`](Self::insert) calls this automatically; calling it directly
    /// only trades memory for shorter chains.
    ///
    /// # Panics
    ///
    /// Panics if the doubled bucket count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert("a", 1);
    /// table.expand();
    ///
    /// assert_eq!(table.capacity(), 16);
    /// assert_eq!(table.get("a"), Some(&1));
    /// ```
    pub fn expand(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity.checked_mul(2).expect("capacity overflow");

        let mut buckets = allocate_buckets(new_capacity);
        for (key, value) in self.buckets.drain(..).flatten() {
            let index = bucket_index(hash_key(&self.hash_builder, &key), new_capacity);
            buckets[index].push((key, value));
        }
        self.buckets = buckets;

        debug!(
            "expanded hash table from {old_capacity} to {new_capacity} buckets ({} entries)",
            self.populated
        );
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for HashTable<K, V>
where
    K: Hash + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only view of the buckets of a `HashTable`, in index order.
///
/// This struct is created by [`HashTable::dump`].
pub struct Dump<'a, K, V> {
    inner: core::iter::Enumerate<core::slice::Iter<'a, Bucket<K, V>>>,
}

impl<'a, K, V> Iterator for Dump<'a, K, V> {
    type Item = (usize, &'a [(K, V)]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(index, bucket)| (index, bucket.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Dump<'_, K, V> {}

/// An iterator over the key-value pairs of a `HashTable`.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    chain: core::slice::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, v)) = self.chain.next() {
                self.remaining -= 1;
                return Some((k, v));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashTable`.
///
/// This struct is created by [`HashTable::drain`].
pub struct Drain<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    bucket_index: usize,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(bucket) = self.table.buckets.get_mut(self.bucket_index) {
            if let Some(entry) = bucket.pop() {
                self.table.populated -= 1;
                return Some(entry);
            }
            self.bucket_index += 1;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}
