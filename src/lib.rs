//! An ordered set on a 2-3 tree routed by subtree maxima.
//!
//! This crate provides [`MaxTreeSet`], an ordered set with the familiar `BTreeSet`-style
//! API plus C++-style bidirectional [`Cursor`]s (`begin`, `end`, `find`, `lower_bound`).
//!
//! # Example
//!
//! ```
//! use maxtree::MaxTreeSet;
//!
//! let mut set = MaxTreeSet::new();
//! for v in [5, 3, 8, 1, 4] {
//!     set.insert(v);
//! }
//!
//! assert_eq!(set.len(), 5);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);
//!
//! // Cursors step in both directions.
//! let mut cursor = set.lower_bound(&6);
//! assert_eq!(cursor.get(), Some(&8));
//! cursor.move_prev();
//! assert_eq!(cursor.get(), Some(&5));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) insert, remove and lookup** - Every leaf sits at the same depth
//! - **`tracing`** - Optional feature that logs structural changes through the `tracing` crate
//!
//! # Implementation
//!
//! Each element is a leaf. Internal nodes have two or three children and carry the
//! maxima of their first child, second child and whole subtree; searches route on those
//! maxima rather than on separator keys. An insert that gives a node a fourth child splits
//! it in two; a remove that leaves a node one child hands that child to a sibling. All
//! nodes live in an arena, and parent links are arena handles, so there is no shared
//! ownership and no reference cycle.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
mod tracing_helpers;

mod raw;

pub mod max_tree_set;

pub use max_tree_set::{Cursor, MaxTreeSet};
