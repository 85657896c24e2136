//! Backend B: an interval tree on a B-tree.
//!
//! Every node holds between `degree - 1` and `2 * degree - 1` intervals
//! (the root may hold fewer) and caches the largest end found in its
//! subtree. Splits, merges and borrows refresh the cached end of every node
//! whose contents changed, unless the mutation runs in fast mode.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{Error, MAX_DEGREE, MIN_DEGREE};
use crate::interval::{Entry, Interval, Key};
use crate::overlap::Overlapper;
use crate::range::Range;
use crate::tree::State;

mod iterators;
mod node;

pub use iterators::{IntoIter, Iter, Overlapping};
use node::{depth, Insertion, Node};

/// The degree used when none is given.
pub const DEFAULT_DEGREE: usize = 32;

/// An interval tree stored as a B-tree of the given degree.
#[derive(Debug, Clone)]
pub struct BTree<I> {
    pub(crate) root: Option<Box<Node<I>>>,
    overlapper: Arc<dyn Overlapper>,
    degree: usize,
    len: usize,
    state: State,
}

impl<I> BTree<I> {
    /// Construct an empty tree of [`DEFAULT_DEGREE`].
    pub fn new(overlapper: impl Overlapper + 'static) -> Self {
        BTree {
            root: None,
            overlapper: Arc::new(overlapper),
            degree: DEFAULT_DEGREE,
            len: 0,
            state: State::Clean,
        }
    }

    /// Construct an empty tree of the given degree, which must lie within
    /// [`MIN_DEGREE`]`..=`[`MAX_DEGREE`].
    pub fn with_degree(
        overlapper: impl Overlapper + 'static,
        degree: usize,
    ) -> Result<Self, Error> {
        BTree::with_overlapper(Arc::new(overlapper), degree)
    }

    pub fn with_overlapper(overlapper: Arc<dyn Overlapper>, degree: usize) -> Result<Self, Error> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
            return Err(Error::InvalidDegree(degree));
        }
        Ok(BTree {
            root: None,
            overlapper,
            degree,
            len: 0,
            state: State::Clean,
        })
    }

    pub fn overlapper(&self) -> &dyn Overlapper {
        &*self.overlapper
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_clean(&self) -> bool {
        self.state == State::Clean
    }

    /// The number of levels. All leaves sit at the same depth.
    pub fn depth(&self) -> usize {
        depth(&self.root)
    }

    /// Remove every interval, leaving a clean empty tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.state = State::Clean;
    }

    /// Recompute the cached max end of every node, bottom up.
    ///
    /// Must be called after a batch of fast mutations before querying.
    pub fn adjust_ranges(&mut self) {
        if let Some(ref mut root) = self.root {
            root.adjust_all();
        }
        trace!(len = self.len, degree = self.degree, "recomputed b-tree max ends");
        self.state = State::Clean;
    }

    /// An in-order iterator over every stored interval.
    pub fn iter(&self) -> Iter<'_, I> {
        Iter::new(&self.root, self.len)
    }

    /// A lazy in-order iterator over the stored intervals overlapping `range`
    /// according to the tree's overlapper.
    pub fn overlapping<'a, 'q>(&'a self, range: &'q Range) -> Overlapping<'a, 'q, I>
    where
        'a: 'q,
    {
        self.overlapping_with(range, &*self.overlapper)
    }

    /// Like [`overlapping`](BTree::overlapping) with a caller-supplied
    /// overlapper.
    pub fn overlapping_with<'a, 'q>(
        &'a self,
        range: &'q Range,
        overlapper: &'q dyn Overlapper,
    ) -> Overlapping<'a, 'q, I> {
        if self.state == State::Dirty {
            warn!(%range, "querying a b-tree with stale max ends, results are unspecified");
        }
        Overlapping::new(&self.root, range, overlapper)
    }

    /// Every stored interval overlapping `range`, in ascending order.
    pub fn get(&self, range: &Range) -> Vec<&I> {
        self.overlapping(range).collect()
    }

    pub fn get_with_overlapper(&self, range: &Range, overlapper: &dyn Overlapper) -> Vec<&I> {
        self.overlapping_with(range, overlapper).collect()
    }

    /// Every stored interval whose range is exactly `range`, whatever its id,
    /// in ascending id order. Does not consult the cached max ends.
    pub fn lookup(&self, range: &Range) -> Vec<&I> {
        let mut found = Vec::new();
        if let Some(ref root) = self.root {
            root.exact(range, &mut found);
        }
        found
    }

    /// Whether an interval with the range and id of `target` is stored.
    pub fn contains<Q: Interval + ?Sized>(&self, target: &Q) -> bool {
        let key = Key::of(target);
        self.root.as_ref().map_or(false, |root| root.search(&key).is_some())
    }
}

impl<I: Interval> BTree<I> {
    /// Insert `item`, ordered by `(start, end, id)`.
    ///
    /// With `fast` set the cached max ends are left stale and the tree becomes
    /// [`State::Dirty`] until [`adjust_ranges`](BTree::adjust_ranges) runs.
    pub fn insert(&mut self, item: I, fast: bool) -> Result<(), Error> {
        let entry = Entry::new(item);
        if !entry.range.is_valid() {
            return Err(Error::inverted(&entry.range));
        }
        match self.root {
            None => self.root = Some(Box::new(Node::leaf(entry))),
            Some(ref mut root) => match root.insert(entry, self.degree, fast) {
                Insertion::Absorbed => {}
                Insertion::Duplicate(entry) => return Err(Error::duplicate(&entry.range, entry.id)),
                Insertion::Split(median, right) => {
                    let left = self.root.take().expect("b-tree broken: split without a root");
                    self.root = Some(Box::new(Node::root(median, left, right, fast)));
                    trace!(depth = self.depth(), "grew b-tree root");
                }
            },
        }
        self.len += 1;
        if fast {
            self.state = State::Dirty;
        }
        Ok(())
    }

    /// Remove the interval with the range and id of `target`, returning it.
    pub fn delete<Q: Interval + ?Sized>(&mut self, target: &Q, fast: bool) -> Result<I, Error> {
        let key = Key::of(target);
        let root = match self.root {
            Some(ref mut root) => root,
            None => return Err(Error::not_found(target.range(), target.id())),
        };
        let (removed, _) = root
            .remove(&key, self.degree, fast)
            .ok_or_else(|| Error::not_found(target.range(), target.id()))?;
        if root.entries.is_empty() {
            // an empty root has at most one child left
            let child = root.children.pop();
            self.root = child;
        }
        self.len -= 1;
        if fast {
            self.state = State::Dirty;
        }
        Ok(removed.item)
    }
}

impl<I> IntoIterator for BTree<I> {
    type Item = I;
    type IntoIter = IntoIter<I>;

    /// Return an iterator over every interval in order, consuming the tree.
    fn into_iter(self) -> IntoIter<I> {
        IntoIter::new(self.root, self.len)
    }
}

impl<'a, I> IntoIterator for &'a BTree<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Iter<'a, I> {
        self.iter()
    }
}
