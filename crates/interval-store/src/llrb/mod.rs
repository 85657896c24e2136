//! Backend A: an interval tree on a left-leaning red-black tree.
//!
//! Every node holds one interval and caches the largest end found in its
//! subtree. Rotations and color flips follow the bottom-up 2-3 variant of
//! the LLRB; each rotation refreshes the cached end of the two nodes whose
//! children changed, unless the mutation runs in fast mode.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::Error;
use crate::interval::{Entry, Interval, Key};
use crate::overlap::Overlapper;
use crate::range::Range;
use crate::tree::State;

mod iterators;
mod node;

pub use iterators::{IntoIter, Iter, Overlapping};
use node::{height, is_red, Color, Node};

/// An interval tree balanced as a left-leaning red-black tree.
#[derive(Debug, Clone)]
pub struct Llrb<I> {
    pub(crate) root: Option<Box<Node<I>>>,
    overlapper: Arc<dyn Overlapper>,
    len: usize,
    state: State,
}

impl<I> Llrb<I> {
    /// Construct an empty tree which answers queries with `overlapper`.
    pub fn new(overlapper: impl Overlapper + 'static) -> Self {
        Llrb::with_overlapper(Arc::new(overlapper))
    }

    pub fn with_overlapper(overlapper: Arc<dyn Overlapper>) -> Self {
        Llrb {
            root: None,
            overlapper,
            len: 0,
            state: State::Clean,
        }
    }

    pub fn overlapper(&self) -> &dyn Overlapper {
        &*self.overlapper
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

    /// The number of nodes on the longest root-to-leaf path. Walks the whole
    /// tree.
    pub fn height(&self) -> usize {
        height(&self.root)
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
        trace!(len = self.len, "recomputed llrb max ends");
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

    /// Like [`overlapping`](Llrb::overlapping) with a caller-supplied
    /// overlapper.
    pub fn overlapping_with<'a, 'q>(
        &'a self,
        range: &'q Range,
        overlapper: &'q dyn Overlapper,
    ) -> Overlapping<'a, 'q, I> {
        if self.state == State::Dirty {
            warn!(%range, "querying an llrb with stale max ends, results are unspecified");
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

    fn search(&self, key: &Key) -> bool {
        self.root.as_ref().map_or(false, |root| root.search(key).is_some())
    }

    /// Whether an interval with the range and id of `target` is stored.
    pub fn contains<Q: Interval + ?Sized>(&self, target: &Q) -> bool {
        self.search(&Key::of(target))
    }
}

impl<I: Interval> Llrb<I> {
    /// Insert `item`, ordered by `(start, end, id)`.
    ///
    /// With `fast` set the cached max ends are left stale and the tree becomes
    /// [`State::Dirty`] until [`adjust_ranges`](Llrb::adjust_ranges) runs.
    pub fn insert(&mut self, item: I, fast: bool) -> Result<(), Error> {
        let entry = Entry::new(item);
        if !entry.range.is_valid() {
            return Err(Error::inverted(&entry.range));
        }
        if self.search(&entry.key()) {
            return Err(Error::duplicate(&entry.range, entry.id));
        }
        let mut root = Node::insert_in_successor(self.root.take(), entry, fast);
        root.color = Color::Black;
        self.root = Some(root);
        self.len += 1;
        if fast {
            self.state = State::Dirty;
        }
        Ok(())
    }

    /// Remove the interval with the range and id of `target`, returning it.
    pub fn delete<Q: Interval + ?Sized>(&mut self, target: &Q, fast: bool) -> Result<I, Error> {
        let key = Key::of(target);
        // the top-down descent restructures the tree, so bail out before it
        let mut root = match self.root.take() {
            Some(root) if root.search(&key).is_some() => root,
            root => {
                self.root = root;
                return Err(Error::not_found(target.range(), target.id()));
            }
        };
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (rest, removed) = root.delete(&key, fast);
        self.root = rest.map(|mut root| {
            root.color = Color::Black;
            root
        });
        self.len -= 1;
        if fast {
            self.state = State::Dirty;
        }
        Ok(removed.item)
    }
}

impl<I> IntoIterator for Llrb<I> {
    type Item = I;
    type IntoIter = IntoIter<I>;

    /// Return an iterator over every interval in order, consuming the tree.
    fn into_iter(self) -> IntoIter<I> {
        IntoIter::new(self.root, self.len)
    }
}

impl<'a, I> IntoIterator for &'a Llrb<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Iter<'a, I> {
        self.iter()
    }
}
