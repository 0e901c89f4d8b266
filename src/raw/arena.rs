use alloc::vec::Vec;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in an [`Arena`].
///
/// Handles are plain indices, so holding one never keeps a node alive. Parent links are
/// stored as handles for exactly that reason. The `NonZero` representation keeps
/// `Option<Handle>` the same size as `Handle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is never zero and fits because `index <= MAX`.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Slot storage owning every node of a tree.
///
/// Freed slots go on a free list and are handed out again by the next `alloc`, so a
/// handle that outlives its node may later name an unrelated node. Callers drop every
/// reference to a handle before freeing it.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            handle
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Moves the element out and releases its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // The niche keeps parent links and child slots pointer-free and compact.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn handle_out_of_range() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn freed_slot_is_reused_first() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        arena.free(a);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc('c');
        assert_eq!(c, a);
        assert_eq!(*arena.get(c), 'c');
        assert_eq!(*arena.get(b), 'b');
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_free_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u8);
        arena.free(a);
        let _ = arena.get(a);
    }

    #[test]
    fn with_capacity_reserves_slots() {
        let arena: Arena<u64> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert_eq!(arena.len(), 0);
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::from_index(index).to_index(), index);
        }

        #[test]
        fn arena_matches_map_model(ops in prop::collection::vec(op_strategy(), 0..256)) {
            let mut model: BTreeMap<usize, u32> = BTreeMap::new();
            let mut live: alloc::vec::Vec<Handle> = alloc::vec::Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for op in ops {
                match op {
                    Op::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(model.insert(handle.to_index(), value).is_none());
                        live.push(handle);
                    }
                    Op::Set(which, value) if !live.is_empty() => {
                        let handle = live[which % live.len()];
                        *arena.get_mut(handle) = value;
                        model.insert(handle.to_index(), value);
                    }
                    Op::Take(which) if !live.is_empty() => {
                        let handle = live.swap_remove(which % live.len());
                        prop_assert_eq!(Some(arena.take(handle)), model.remove(&handle.to_index()));
                    }
                    Op::Clear => {
                        arena.clear();
                        model.clear();
                        live.clear();
                    }
                    _ => {}
                }

                prop_assert_eq!(arena.len(), model.len());
                for &handle in &live {
                    prop_assert_eq!(Some(arena.get(handle)), model.get(&handle.to_index()));
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Alloc(u32),
        Set(usize, u32),
        Take(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            12 => any::<u32>().prop_map(Op::Alloc),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Op::Set(which, value)),
            8 => any::<usize>().prop_map(Op::Take),
            1 => Just(Op::Clear),
        ]
    }
}
