use core::fmt;

use crate::raw::{Handle, RawMaxTree};

/// A position in a [`MaxTreeSet`](super::MaxTreeSet): either an element or the end
/// position one past the largest element.
///
/// Cursors are obtained from [`begin`], [`end`], [`find`] and [`lower_bound`]. They borrow
/// the set, so the set cannot change while a cursor is alive, and any number of cursors
/// can walk the same set at once. Cursors are `Copy`; copying one before stepping it
/// gives the old position back.
///
/// Stepping walks parent links, climbing only as far as needed to find the next sibling
/// subtree, so a full pass costs amortized O(1) per step.
///
/// # Examples
///
/// ```
/// use maxtree::MaxTreeSet;
///
/// let set = MaxTreeSet::from([1, 2, 3]);
///
/// let mut seen = Vec::new();
/// let mut cursor = set.begin();
/// while cursor != set.end() {
///     seen.push(*cursor.get().unwrap());
///     cursor.move_next();
/// }
/// assert_eq!(seen, [1, 2, 3]);
/// ```
///
/// [`begin`]: super::MaxTreeSet::begin
/// [`end`]: super::MaxTreeSet::end
/// [`find`]: super::MaxTreeSet::find
/// [`lower_bound`]: super::MaxTreeSet::lower_bound
pub struct Cursor<'a, T> {
    tree: &'a RawMaxTree<T>,
    // At the end position this is the largest element's leaf, or `None` when empty.
    leaf: Option<Handle>,
    at_end: bool,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn at(tree: &'a RawMaxTree<T>, leaf: Handle) -> Self {
        Cursor {
            tree,
            leaf: Some(leaf),
            at_end: false,
        }
    }

    pub(crate) fn end(tree: &'a RawMaxTree<T>) -> Self {
        Cursor {
            tree,
            leaf: tree.last_leaf(),
            at_end: true,
        }
    }

    /// Returns the element at this position, or `None` at the end position.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        if self.at_end {
            return None;
        }
        self.leaf.map(|leaf| self.tree.value(leaf))
    }

    /// Returns `true` at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.at_end
    }

    /// Advances to the next larger element, or to the end position after the largest.
    ///
    /// Advancing the end position leaves it where it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2]);
    /// let mut cursor = set.begin();
    /// cursor.move_next();
    /// assert_eq!(cursor.get(), Some(&2));
    /// cursor.move_next();
    /// assert!(cursor.is_end());
    /// ```
    pub fn move_next(&mut self) {
        if self.at_end {
            return;
        }
        let Some(leaf) = self.leaf else {
            return;
        };
        match self.tree.next_leaf(leaf) {
            Some(next) => self.leaf = Some(next),
            None => self.at_end = true,
        }
    }

    /// Steps back to the next smaller element. From the end position this lands on the
    /// largest element.
    ///
    /// Stepping back from the smallest element, or from the end of an empty set, is a
    /// contract violation: it panics in debug builds and leaves the cursor unchanged
    /// otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree::MaxTreeSet;
    ///
    /// let set = MaxTreeSet::from([1, 2]);
    /// let mut cursor = set.end();
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&2));
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&1));
    /// ```
    pub fn move_prev(&mut self) {
        let Some(leaf) = self.leaf else {
            debug_assert!(false, "`Cursor::move_prev()` - the set is empty!");
            return;
        };
        if self.at_end {
            self.at_end = false;
            return;
        }
        match self.tree.prev_leaf(leaf) {
            Some(prev) => self.leaf = Some(prev),
            None => debug_assert!(false, "`Cursor::move_prev()` - already at the first element!"),
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    /// Two cursors are equal when they point into the same set at the same position.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.leaf == other.leaf && self.at_end == other.at_end
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Cursor").field(value).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::MaxTreeSet;

    #[test]
    fn empty_set_begin_is_end() {
        let set: MaxTreeSet<u8> = MaxTreeSet::new();
        let mut begin = set.begin();
        assert!(begin.is_end());
        assert_eq!(begin.get(), None);
        begin.move_next();
        assert_eq!(begin, set.end());
    }

    #[test]
    fn advancing_end_stays_at_end() {
        let set = MaxTreeSet::from([4, 5]);
        let mut cursor = set.end();
        cursor.move_next();
        assert_eq!(cursor, set.end());
    }

    #[test]
    fn stepping_off_the_last_element_reaches_end() {
        let set = MaxTreeSet::from([4, 5]);
        let mut cursor = set.find(&5);
        cursor.move_next();
        assert_eq!(cursor, set.end());
        cursor.move_prev();
        assert_eq!(cursor, set.find(&5));
    }

    #[test]
    fn cursors_of_different_sets_differ() {
        let a = MaxTreeSet::from([1]);
        let b = MaxTreeSet::from([1]);
        assert_ne!(a.begin(), b.begin());
        assert_ne!(a.end(), b.end());
    }

    #[test]
    fn copy_keeps_old_position() {
        let set = MaxTreeSet::from([1, 2, 3]);
        let mut cursor = set.begin();
        let before = cursor;
        cursor.move_next();
        assert_eq!(before.get(), Some(&1));
        assert_eq!(cursor.get(), Some(&2));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "`Cursor::move_prev()` - already at the first element!")]
    fn retreating_from_begin_panics_in_debug() {
        let set = MaxTreeSet::from([1, 2, 3]);
        let mut cursor = set.begin();
        cursor.move_prev();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "`Cursor::move_prev()` - the set is empty!")]
    fn retreating_in_empty_set_panics_in_debug() {
        let set: MaxTreeSet<i32> = MaxTreeSet::new();
        let mut cursor = set.end();
        cursor.move_prev();
    }

    #[test]
    fn debug_shows_element_or_end() {
        let set = MaxTreeSet::from([7]);
        assert_eq!(alloc::format!("{:?}", set.begin()), "Cursor(7)");
        assert_eq!(alloc::format!("{:?}", set.end()), "Cursor(end)");
    }
}
