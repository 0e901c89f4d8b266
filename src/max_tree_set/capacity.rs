use super::MaxTreeSet;
use crate::raw::RawMaxTree;

impl<T> MaxTreeSet<T> {
    /// Creates an empty set with node storage for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set: MaxTreeSet<i32> = MaxTreeSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        MaxTreeSet {
            raw: RawMaxTree::with_capacity(capacity),
        }
    }

    /// Returns how many elements the set can hold before its node storage reallocates.
    ///
    /// Elements and the internal nodes above them share one allocation, so this is
    /// roughly half the number of node slots.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set: MaxTreeSet<i32> = MaxTreeSet::with_capacity(32);
    /// assert!(set.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
