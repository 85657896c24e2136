//! An in-memory store of intervals over byte-string keys, answering "which
//! stored intervals intersect this range?".
//!
//! Two [augmented interval trees] are provided: [`Llrb`], balanced as a
//! left-leaning red-black tree, and [`BTree`], a B-tree of configurable
//! degree. [`Tree`] wraps either one behind the same operations.
//!
//! Mutations may run in fast mode, which skips maintenance of the cached
//! subtree max ends. The tree is then [`State::Dirty`] and must be repaired
//! with `adjust_ranges` before its overlap queries mean anything.
//!
//! [augmented interval trees]: https://en.wikipedia.org/wiki/Interval_tree#Augmented_tree
#![forbid(unsafe_code)]

pub mod btree;
pub mod config;
mod error;
mod interval;
pub mod llrb;
mod overlap;
mod range;
pub mod tree;

pub use btree::BTree;
pub use config::{BackendKind, Config, OverlapKind};
pub use error::{Error, MAX_DEGREE, MIN_DEGREE};
pub use interval::{Id, Interval};
pub use llrb::Llrb;
pub use overlap::{ExclusiveOverlapper, InclusiveOverlapper, Overlapper};
pub use range::{range, Comparable, Range};
pub use tree::{State, Tree};

#[cfg(test)]
mod tests;
