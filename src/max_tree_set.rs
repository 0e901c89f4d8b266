use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::raw::{Handle, RawMaxTree};

mod capacity;
mod cursor;

pub use cursor::Cursor;

/// An ordered set based on a 2-3 tree whose internal nodes route by subtree maxima.
///
/// Besides the usual `BTreeSet`-style methods, the set hands out [`Cursor`]s: positions
/// that can be stepped forward and backward through the elements, with a distinguished
/// end position one past the largest element.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `MaxTreeSet` that observed the logic error and not result in undefined behavior. This could
/// include panics, incorrect results, aborts, memory leaks, and non-termination.
///
/// Iterators returned by [`MaxTreeSet::iter`] and [`MaxTreeSet::into_iter`] produce their items in
/// order, and take worst-case logarithmic and amortized constant time per item returned.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use maxtree::MaxTreeSet;
///
/// let mut books = MaxTreeSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// books.remove("The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `MaxTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use maxtree::MaxTreeSet;
///
/// let set = MaxTreeSet::from([1, 2, 3]);
/// ```
pub struct MaxTreeSet<T> {
    raw: RawMaxTree<T>,
}

/// An iterator over the items of a `MaxTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`MaxTreeSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use maxtree::MaxTreeSet;
///
/// let set = MaxTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: MaxTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: Option<&'a RawMaxTree<T>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the items of a `MaxTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`MaxTreeSet`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use maxtree::MaxTreeSet;
///
/// let set = MaxTreeSet::from([1, 2, 3]);
/// let mut iter = set.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// ```
///
/// [`into_iter`]: MaxTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> MaxTreeSet<T> {
    /// Makes a new, empty `MaxTreeSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::new();
    ///
    /// // entries can now be inserted into the empty set
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> MaxTreeSet<T> {
        MaxTreeSet { raw: RawMaxTree::new() }
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut v = MaxTreeSet::from([1]);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator that visits the elements in the `MaxTreeSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each iteration step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: Some(&self.raw),
            front: self.raw.first_leaf(),
            back: self.raw.last_leaf(),
            remaining: self.raw.len(),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut v = MaxTreeSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut v = MaxTreeSet::new();
    /// assert!(v.is_empty());
    /// v.insert(1);
    /// assert!(!v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first_leaf().map(|leaf| self.raw.value(leaf))
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::new();
    /// assert_eq!(set.last(), None);
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last_leaf().map(|leaf| self.raw.value(leaf))
    }

    /// Returns a cursor at the smallest element, or [`end`](Self::end) if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([20, 10]);
    /// assert_eq!(set.begin().get(), Some(&10));
    ///
    /// let empty: MaxTreeSet<i32> = MaxTreeSet::new();
    /// assert_eq!(empty.begin(), empty.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn begin(&self) -> Cursor<'_, T> {
        match self.raw.first_leaf() {
            Some(leaf) => Cursor::at(&self.raw, leaf),
            None => Cursor::end(&self.raw),
        }
    }

    /// Returns the cursor one past the largest element.
    ///
    /// The end cursor has no element; stepping it backward lands on the largest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2, 3]);
    /// let mut cursor = set.end();
    /// assert_eq!(cursor.get(), None);
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::end(&self.raw)
    }
}

impl<T: Ord> MaxTreeSet<T> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is returned.
    /// - If the set already contained an equal value, `false` is returned, and the entry
    ///   is not updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.raw.insert(value)
    }

    /// If the set contains an element equal to the value, removes it from the set and
    /// drops it. Returns whether such an element was present.
    ///
    /// The value may be any borrowed form of the set's element type, but the ordering on
    /// the borrowed form *must* match the ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value)
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).is_some()
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).map(|leaf| self.raw.value(leaf))
    }

    /// Returns a cursor at the element equal to the value, or [`end`](Self::end) if there
    /// is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 3, 5]);
    /// let mut cursor = set.find(&3);
    /// cursor.move_next();
    /// assert_eq!(cursor.get(), Some(&5));
    ///
    /// assert_eq!(set.find(&4), set.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.raw.search(value) {
            Some(leaf) => Cursor::at(&self.raw, leaf),
            None => self.end(),
        }
    }

    /// Returns a cursor at the smallest element not less than the value, or
    /// [`end`](Self::end) if every element is smaller.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.lower_bound(&20).get(), Some(&20));
    /// assert_eq!(set.lower_bound(&21).get(), Some(&30));
    /// assert_eq!(set.lower_bound(&31), set.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.raw.lower_bound(value) {
            Some(leaf) => Cursor::at(&self.raw, leaf),
            None => self.end(),
        }
    }

    /// Removes the first element from the set and returns it, if any.
    /// The first element is always the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::from([1, 2]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes the last element from the set and returns it, if any.
    /// The last element is always the maximum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let mut set = MaxTreeSet::from([1, 2]);
    /// assert_eq!(set.pop_last(), Some(2));
    /// assert_eq!(set.pop_last(), Some(1));
    /// assert_eq!(set.pop_last(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }
}

impl<T: Hash> Hash for MaxTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for MaxTreeSet<T> {
    fn eq(&self, other: &MaxTreeSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for MaxTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for MaxTreeSet<T> {
    fn partial_cmp(&self, other: &MaxTreeSet<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for MaxTreeSet<T> {
    fn cmp(&self, other: &MaxTreeSet<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone + Ord> Clone for MaxTreeSet<T> {
    /// Copies the set by re-inserting every element in order.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for MaxTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for MaxTreeSet<T> {
    fn default() -> Self {
        MaxTreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for MaxTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = MaxTreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for MaxTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for MaxTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for MaxTreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> IntoIterator for MaxTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `MaxTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a MaxTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let leaf = self.front?;

        self.remaining -= 1;
        self.front = tree.next_leaf(leaf);
        Some(tree.value(leaf))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let leaf = self.back?;

        self.remaining -= 1;
        self.back = tree.prev_leaf(leaf);
        Some(tree.value(leaf))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `max_tree_set::Iter`.
    ///
    /// ```
    /// # use maxtree::max_tree_set;
    /// let iter: max_tree_set::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            tree: None,
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `max_tree_set::IntoIter`.
    ///
    /// ```
    /// # use maxtree::max_tree_set;
    /// let iter: max_tree_set::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iter_meets_in_the_middle() {
        let set: MaxTreeSet<i32> = (0..50).collect();
        let mut iter = set.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        while let Some(&v) = iter.next() {
            front.push(v);
            if let Some(&w) = iter.next_back() {
                back.push(w);
            }
        }
        assert_eq!(front.len() + back.len(), 50);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
        back.reverse();
        front.extend(back);
        assert_eq!(front, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn hash_and_eq_ignore_insertion_order() {
        use core::hash::BuildHasher;
        use std::collections::hash_map::RandomState;

        let a = MaxTreeSet::from([3, 1, 2]);
        let b = MaxTreeSet::from([1, 2, 3]);
        assert_eq!(a, b);

        let state = RandomState::new();
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = MaxTreeSet::from([1, 2]);
        let b = MaxTreeSet::from([1, 3]);
        let c = MaxTreeSet::from([1, 2, 0]);
        assert!(a < b);
        assert!(a > MaxTreeSet::new());
        assert!(c < a);
    }
}
