use smallvec::SmallVec;

use super::arena::Handle;

/// Fewest children an internal node keeps between public operations.
pub(crate) const MIN_CHILDREN: usize = 2;
/// Most children an internal node keeps between public operations.
pub(crate) const MAX_CHILDREN: usize = 3;
/// Transient arity reached by an insert or a merge, resolved by a split.
pub(crate) const OVERFLOW_CHILDREN: usize = MAX_CHILDREN + 1;

pub(crate) type Children = SmallVec<[Handle; OVERFLOW_CHILDREN]>;

pub(crate) enum Node<T> {
    Internal(InternalNode),
    Leaf(LeafNode<T>),
}

/// Cached routing data of an internal node.
///
/// Every field is the handle of the leaf holding the value in question, so reading an
/// aggregate costs one arena lookup and the element type never has to be cloned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Summary {
    /// Maximum of the first child's subtree.
    pub(crate) max_l: Handle,
    /// Maximum of the second child's subtree, only with three or more children.
    pub(crate) max_mid: Option<Handle>,
    /// Maximum of the whole subtree.
    pub(crate) max: Handle,
}

pub(crate) struct InternalNode {
    parent: Option<Handle>,
    // Sorted ascending by subtree maximum once `update_node` has run.
    children: Children,
    summary: Summary,
}

pub(crate) struct LeafNode<T> {
    parent: Option<Handle>,
    value: T,
}

impl<T> Node<T> {
    pub(crate) fn parent(&self) -> Option<Handle> {
        match self {
            Node::Internal(internal) => internal.parent,
            Node::Leaf(leaf) => leaf.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        match self {
            Node::Internal(internal) => internal.parent = parent,
            Node::Leaf(leaf) => leaf.parent = parent,
        }
    }

    /// Returns 0 for a leaf.
    pub(crate) fn child_count(&self) -> usize {
        match self {
            Node::Internal(internal) => internal.children.len(),
            Node::Leaf(_) => 0,
        }
    }

    /// Returns the leaf node, panicking if this is not a leaf.
    pub(crate) fn as_leaf(&self) -> &LeafNode<T> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Unwraps the element of a leaf, panicking if this is not a leaf.
    pub(crate) fn into_value(self) -> T {
        match self {
            Node::Leaf(leaf) => leaf.value,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }
}

impl InternalNode {
    /// Creates a detached internal node. `summary` must already describe `children`.
    pub(crate) fn new(children: Children, summary: Summary) -> Self {
        Self {
            parent: None,
            children,
            summary,
        }
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn first_child(&self) -> Handle {
        self.children[0]
    }

    pub(crate) fn last_child(&self) -> Handle {
        self.children[self.children.len() - 1]
    }

    /// Returns where `child` sits in this node.
    pub(crate) fn position_of(&self, child: Handle) -> usize {
        self.children
            .iter()
            .position(|&c| c == child)
            .expect("`InternalNode::position_of()` - `child` is not a child of this node!")
    }

    pub(crate) fn push_child(&mut self, child: Handle) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: Handle) {
        let index = self.position_of(child);
        self.children.remove(index);
    }

    pub(crate) fn replace_child(&mut self, old: Handle, new: Handle) {
        let index = self.position_of(old);
        self.children[index] = new;
    }

    /// Moves the children out, leaving this node childless.
    pub(crate) fn take_children(&mut self) -> Children {
        core::mem::take(&mut self.children)
    }

    pub(crate) fn set_children(&mut self, children: Children, summary: Summary) {
        self.children = children;
        self.summary = summary;
    }

    #[cfg(test)]
    pub(crate) fn summary(&self) -> Summary {
        self.summary
    }

    pub(crate) fn max_l(&self) -> Handle {
        self.summary.max_l
    }

    pub(crate) fn max_mid(&self) -> Option<Handle> {
        self.summary.max_mid
    }

    pub(crate) fn max(&self) -> Handle {
        self.summary.max
    }
}

impl<T> LeafNode<T> {
    pub(crate) fn new(value: T) -> Self {
        Self { parent: None, value }
    }

    pub(crate) fn value(&self) -> &T {
        &self.value
    }
}
