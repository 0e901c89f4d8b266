use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::smallvec;

use super::arena::{Arena, Handle};
use super::node::{Children, InternalNode, LeafNode, MAX_CHILDREN, MIN_CHILDREN, Node, OVERFLOW_CHILDREN, Summary};

/// The 2-3 tree backing `MaxTreeSet`.
///
/// Elements live in leaves, one per leaf, all at the same depth. Internal nodes hold two
/// or three children and route searches through the cached maxima of their first and
/// second child instead of separator keys.
pub(crate) struct RawMaxTree<T> {
    /// Arena owning every node, leaves and internal nodes alike.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of leaves.
    len: usize,
}

impl<T> RawMaxTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with node storage for `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        // A 2-3 tree over n leaves has fewer than n internal nodes.
        Self {
            nodes: Arena::with_capacity(capacity.saturating_mul(2)),
            root: None,
            len: 0,
        }
    }

    /// Returns how many elements fit without reallocating node storage.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity() / 2
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the element stored in `leaf`.
    #[inline]
    pub(crate) fn value(&self, leaf: Handle) -> &T {
        self.nodes.get(leaf).as_leaf().value()
    }

    #[inline]
    fn key<Q: ?Sized>(&self, leaf: Handle) -> &Q
    where
        T: Borrow<Q>,
    {
        self.value(leaf).borrow()
    }

    fn parent_of(&self, node: Handle) -> Option<Handle> {
        self.nodes.get(node).parent()
    }

    fn child_count(&self, node: Handle) -> usize {
        self.nodes.get(node).child_count()
    }

    /// Returns the leaf holding the maximum of `node`'s subtree.
    fn max_of(&self, node: Handle) -> Handle {
        match self.nodes.get(node) {
            Node::Internal(internal) => internal.max(),
            Node::Leaf(_) => node,
        }
    }

    /// Number of levels, counting the leaf level. Zero when empty.
    #[cfg(any(test, feature = "tracing"))]
    pub(crate) fn height(&self) -> usize {
        let Some(mut node) = self.root else {
            return 0;
        };
        let mut height = 1;
        while let Node::Internal(internal) = self.nodes.get(node) {
            node = internal.first_child();
            height += 1;
        }
        height
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    fn leftmost(&self, mut node: Handle) -> Handle {
        while let Node::Internal(internal) = self.nodes.get(node) {
            node = internal.first_child();
        }
        node
    }

    fn rightmost(&self, mut node: Handle) -> Handle {
        while let Node::Internal(internal) = self.nodes.get(node) {
            node = internal.last_child();
        }
        node
    }

    /// Returns the leaf holding the smallest element.
    pub(crate) fn first_leaf(&self) -> Option<Handle> {
        Some(self.leftmost(self.root?))
    }

    /// Returns the leaf holding the largest element.
    pub(crate) fn last_leaf(&self) -> Option<Handle> {
        Some(self.rightmost(self.root?))
    }

    /// Returns the in-order successor of `leaf`.
    ///
    /// Climbs while the current node is its parent's last child, then descends leftmost
    /// into the next sibling. Amortized O(1) over a full traversal.
    pub(crate) fn next_leaf(&self, leaf: Handle) -> Option<Handle> {
        let mut current = leaf;
        loop {
            let parent = self.parent_of(current)?;
            let internal = self.nodes.get(parent).as_internal();
            let index = internal.position_of(current);
            if index + 1 < internal.child_count() {
                return Some(self.leftmost(internal.child(index + 1)));
            }
            current = parent;
        }
    }

    /// Returns the in-order predecessor of `leaf`.
    pub(crate) fn prev_leaf(&self, leaf: Handle) -> Option<Handle> {
        let mut current = leaf;
        loop {
            let parent = self.parent_of(current)?;
            let internal = self.nodes.get(parent).as_internal();
            let index = internal.position_of(current);
            if index > 0 {
                return Some(self.rightmost(internal.child(index - 1)));
            }
            current = parent;
        }
    }

    // ─── Aggregate maintenance ──────────────────────────────────────────────

    /// Returns true if `a`'s subtree maximum is strictly below `b`'s.
    fn precedes(&self, a: Handle, b: Handle) -> bool
    where
        T: Ord,
    {
        self.value(self.max_of(a)) < self.value(self.max_of(b))
    }

    /// Orders two to four children ascending by subtree maximum.
    ///
    /// Uses fixed compare-and-swap sequences; children with equal maxima are left where
    /// the sequence puts them.
    fn sort_children(&self, children: &mut Children)
    where
        T: Ord,
    {
        let c = children;
        match c.len() {
            2 => {
                if self.precedes(c[1], c[0]) {
                    c.swap(0, 1);
                }
            }
            3 => {
                if self.precedes(c[1], c[0]) && self.precedes(c[1], c[2]) {
                    c.swap(0, 1);
                } else if self.precedes(c[2], c[1]) && self.precedes(c[2], c[0]) {
                    c.swap(0, 2);
                }
                if self.precedes(c[2], c[1]) {
                    c.swap(1, 2);
                }
            }
            4 => {
                for (i, j) in [(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)] {
                    if self.precedes(c[j], c[i]) {
                        c.swap(i, j);
                    }
                }
            }
            _ => {}
        }
    }

    /// Sorts `children` and computes the aggregates of a node holding them.
    fn summarize(&self, children: &mut Children) -> Summary
    where
        T: Ord,
    {
        self.sort_children(children);
        let max_l = self.max_of(children[0]);
        let mut max = max_l;
        for &child in children.iter() {
            let candidate = self.max_of(child);
            if self.value(max) < self.value(candidate) {
                max = candidate;
            }
        }
        let max_mid = (children.len() > 2).then(|| self.max_of(children[1]));
        Summary { max_l, max_mid, max }
    }

    /// Re-sorts `node`'s children, recomputes its aggregates and re-points the
    /// children's parent links at it. No-op on leaves.
    fn update_node(&mut self, node: Handle)
    where
        T: Ord,
    {
        let Node::Internal(internal) = self.nodes.get(node) else {
            return;
        };
        let mut children: Children = internal.children().iter().copied().collect();
        let summary = self.summarize(&mut children);
        for &child in &children {
            self.nodes.get_mut(child).set_parent(Some(node));
        }
        self.nodes.get_mut(node).as_internal_mut().set_children(children, summary);
    }

    /// Applies [`update_node`](Self::update_node) from `node` up to the root.
    fn propagate_to_root(&mut self, node: Handle)
    where
        T: Ord,
    {
        let mut current = Some(node);
        while let Some(node) = current {
            self.update_node(node);
            current = self.parent_of(node);
        }
    }

    /// Allocates a detached internal node over `children` and adopts them.
    fn alloc_internal(&mut self, mut children: Children) -> Handle
    where
        T: Ord,
    {
        let summary = self.summarize(&mut children);
        let node = self.nodes.alloc(Node::Internal(InternalNode::new(children.clone(), summary)));
        for child in children {
            self.nodes.get_mut(child).set_parent(Some(node));
        }
        node
    }

    // ─── Routing ────────────────────────────────────────────────────────────

    /// Returns the leaf that holds `probe` if it is present, or `None` if the tree is
    /// empty.
    ///
    /// Descends into the first child whose subtree maximum is not below `probe`, falling
    /// through to the last child, so the returned leaf is the smallest element not below
    /// `probe` whenever one exists.
    pub(crate) fn locate<Q>(&self, probe: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            let Node::Internal(internal) = self.nodes.get(current) else {
                return Some(current);
            };
            debug_assert!(
                internal.child_count() <= MAX_CHILDREN,
                "`RawMaxTree::locate()` - routed through a node with {} children!",
                internal.child_count()
            );
            let index = match internal.max_mid() {
                Some(max_mid) if self.key::<Q>(max_mid) < probe => 2,
                _ if self.key::<Q>(internal.max_l()) < probe => 1,
                _ => 0,
            };
            current = internal.child(index);
        }
    }

    /// Returns the leaf holding an element equivalent to `probe`.
    pub(crate) fn search<Q>(&self, probe: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf = self.locate(probe)?;
        (self.key::<Q>(leaf).cmp(probe) == Ordering::Equal).then_some(leaf)
    }

    /// Returns the leaf holding the smallest element not below `probe`.
    pub(crate) fn lower_bound<Q>(&self, probe: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf = self.locate(probe)?;
        (self.key::<Q>(leaf) >= probe).then_some(leaf)
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts `value` unless an equivalent element is present.
    /// Returns whether the value was inserted.
    pub(crate) fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let Some(found) = self.locate(&value) else {
            let leaf = self.nodes.alloc(Node::Leaf(LeafNode::new(value)));
            self.root = Some(leaf);
            self.len = 1;
            return true;
        };

        if self.value(found).cmp(&value) == Ordering::Equal {
            return false;
        }

        let leaf = self.nodes.alloc(Node::Leaf(LeafNode::new(value)));
        self.len += 1;

        match self.parent_of(found) {
            None => {
                let root = self.alloc_internal(smallvec![found, leaf]);
                self.root = Some(root);
                debug_log!(height = self.height(), "root grew above a single leaf");
            }
            Some(parent) => {
                self.nodes.get_mut(parent).as_internal_mut().push_child(leaf);
                self.update_node(parent);
                self.go_up(parent);
                // A split may have moved `found` under a new parent.
                if let Some(parent) = self.parent_of(found) {
                    self.propagate_to_root(parent);
                }
            }
        }

        true
    }

    /// Splits a node holding four children into two fresh nodes of two children each,
    /// children 0 and 1 to the left and 2 and 3 to the right. The old node is freed;
    /// the caller links the halves into its place.
    fn split_node(&mut self, node: Handle) -> (Handle, Handle)
    where
        T: Ord,
    {
        debug_assert_eq!(
            self.child_count(node),
            OVERFLOW_CHILDREN,
            "`RawMaxTree::split_node()` - only overflowing nodes are split!"
        );
        self.update_node(node);
        let children = self.nodes.get_mut(node).as_internal_mut().take_children();
        let left = self.alloc_internal(children[..2].iter().copied().collect());
        let right = self.alloc_internal(children[2..].iter().copied().collect());
        self.nodes.free(node);
        trace_log!(?node, ?left, ?right, "split node");
        (left, right)
    }

    /// Splits `node` and puts the halves in its place under `parent`.
    fn split_into_parent(&mut self, node: Handle, parent: Handle)
    where
        T: Ord,
    {
        let (left, right) = self.split_node(node);
        let internal = self.nodes.get_mut(parent).as_internal_mut();
        internal.replace_child(node, left);
        internal.push_child(right);
        self.update_node(parent);
    }

    /// Resolves overflow from `node` upward, growing a new root if it reaches the top.
    fn go_up(&mut self, node: Handle)
    where
        T: Ord,
    {
        let mut current = node;
        while self.child_count(current) == OVERFLOW_CHILDREN {
            if let Some(parent) = self.parent_of(current) {
                self.split_into_parent(current, parent);
                current = parent;
            } else {
                let (left, right) = self.split_node(current);
                let root = self.alloc_internal(smallvec![left, right]);
                self.root = Some(root);
                debug_log!(height = self.height(), "root split");
                break;
            }
        }
    }

    // ─── Removal ────────────────────────────────────────────────────────────

    /// Removes and returns the element equivalent to `probe`.
    pub(crate) fn take<Q>(&mut self, probe: &Q) -> Option<T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let leaf = self.search(probe)?;
        Some(self.remove_leaf(leaf))
    }

    /// Removes and returns the smallest element.
    pub(crate) fn pop_first(&mut self) -> Option<T>
    where
        T: Ord,
    {
        let leaf = self.first_leaf()?;
        Some(self.remove_leaf(leaf))
    }

    /// Removes and returns the largest element.
    pub(crate) fn pop_last(&mut self) -> Option<T>
    where
        T: Ord,
    {
        let leaf = self.last_leaf()?;
        Some(self.remove_leaf(leaf))
    }

    /// Unlinks `leaf`, rebalances, and returns its element.
    fn remove_leaf(&mut self, leaf: Handle) -> T
    where
        T: Ord,
    {
        self.len -= 1;

        let Some(parent) = self.parent_of(leaf) else {
            self.root = None;
            return self.nodes.take(leaf).into_value();
        };

        let internal = self.nodes.get_mut(parent).as_internal_mut();
        internal.remove_child(leaf);
        let remaining = internal.child_count();
        let brother = internal.first_child();
        let value = self.nodes.take(leaf).into_value();

        if remaining >= MIN_CHILDREN {
            self.propagate_to_root(parent);
            return value;
        }

        // `parent` is down to `brother` alone.
        let Some(grandparent) = self.parent_of(parent) else {
            self.nodes.get_mut(brother).set_parent(None);
            self.nodes.free(parent);
            self.root = Some(brother);
            debug_log!("root contracted to a single leaf");
            return value;
        };

        // Hand `brother` to the uncle and drop `parent` from the grandparent.
        let uncle = self.sibling_of(parent, grandparent);
        self.nodes.get_mut(grandparent).as_internal_mut().remove_child(parent);
        self.nodes.free(parent);
        self.nodes.get_mut(uncle).as_internal_mut().push_child(brother);
        self.update_node(uncle);
        if self.child_count(uncle) == OVERFLOW_CHILDREN {
            self.split_into_parent(uncle, grandparent);
        }

        self.erase_up(grandparent);

        if let Some(parent) = self.parent_of(brother) {
            self.propagate_to_root(parent);
        }

        value
    }

    /// Returns the neighbour `node` merges into: the second child of `parent`, or the
    /// first when `node` is the second.
    fn sibling_of(&self, node: Handle, parent: Handle) -> Handle {
        let internal = self.nodes.get(parent).as_internal();
        if internal.child(1) == node {
            internal.child(0)
        } else {
            internal.child(1)
        }
    }

    /// Resolves underflow from `node` upward.
    ///
    /// A node left with one child hands that child to a sibling and is freed. The
    /// sibling splits if that gives it four children. At the root, a single child
    /// becomes the new root.
    fn erase_up(&mut self, node: Handle)
    where
        T: Ord,
    {
        let mut current = node;
        while self.child_count(current) < MIN_CHILDREN {
            let only = self.nodes.get(current).as_internal().first_child();

            let Some(parent) = self.parent_of(current) else {
                self.nodes.get_mut(only).set_parent(None);
                self.nodes.free(current);
                self.root = Some(only);
                debug_log!(height = self.height(), "root contracted");
                return;
            };

            let brother = self.sibling_of(current, parent);
            self.nodes.get_mut(parent).as_internal_mut().remove_child(current);
            self.nodes.free(current);
            self.nodes.get_mut(brother).as_internal_mut().push_child(only);
            self.update_node(brother);
            trace_log!(?current, ?brother, "collapsed underflowing node into sibling");

            if self.child_count(brother) == OVERFLOW_CHILDREN {
                self.split_into_parent(brother, parent);
            }
            current = parent;
        }
    }

    /// Moves every element out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len);
        let mut next = self.first_leaf();
        while let Some(leaf) = next {
            order.push(leaf);
            next = self.next_leaf(leaf);
        }

        let values: Vec<T> = order.into_iter().map(|leaf| self.nodes.take(leaf).into_value()).collect();
        self.clear();
        values
    }
}
