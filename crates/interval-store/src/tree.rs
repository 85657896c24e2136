use std::sync::Arc;

use tracing::debug;

use crate::btree::{self, BTree};
use crate::config::{BackendKind, Config};
use crate::error::Error;
use crate::interval::Interval;
use crate::llrb::{self, Llrb};
use crate::overlap::Overlapper;
use crate::range::Range;

/// Whether the cached max ends of a tree can be trusted.
///
/// Fast mutations move a tree to `Dirty`; only
/// [`adjust_ranges`](Tree::adjust_ranges) or [`clear`](Tree::clear) bring it
/// back to `Clean`. Overlap queries are only meaningful on a clean tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Clean,
    Dirty,
}

#[derive(Debug, Clone)]
enum Backend<I> {
    Llrb(Llrb<I>),
    BTree(BTree<I>),
}

/// An interval tree over either backend, chosen at construction.
///
/// # Examples
/// ```
/// use interval_store::{range, InclusiveOverlapper, Interval, Range, Tree};
///
/// struct Lock(Range, u64);
///
/// impl Interval for Lock {
///     fn range(&self) -> &Range { &self.0 }
///     fn id(&self) -> u64 { self.1 }
/// }
///
/// let mut t = Tree::btree(InclusiveOverlapper, 4).unwrap();
/// t.insert(Lock(range("a", "c"), 0), false).unwrap();
/// t.insert(Lock(range("d", "f"), 1), false).unwrap();
/// let hits: Vec<u64> = t.get(&range("b", "d")).iter().map(|l| l.id()).collect();
/// assert_eq!(hits, [0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree<I> {
    backend: Backend<I>,
}

impl<I> Tree<I> {
    /// Construct an empty tree on the left-leaning red-black backend.
    pub fn llrb(overlapper: impl Overlapper + 'static) -> Self {
        Tree {
            backend: Backend::Llrb(Llrb::new(overlapper)),
        }
    }

    /// Construct an empty tree on the B-tree backend.
    ///
    /// Fails with [`Error::InvalidDegree`] when `degree` lies outside
    /// [`MIN_DEGREE`](crate::MIN_DEGREE)`..=`[`MAX_DEGREE`](crate::MAX_DEGREE).
    pub fn btree(overlapper: impl Overlapper + 'static, degree: usize) -> Result<Self, Error> {
        Ok(Tree {
            backend: Backend::BTree(BTree::with_degree(overlapper, degree)?),
        })
    }

    /// Construct an empty tree as described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let overlapper: Arc<dyn Overlapper> = config.overlapper.to_overlapper();
        let backend = match config.backend {
            BackendKind::Llrb => Backend::Llrb(Llrb::with_overlapper(overlapper)),
            BackendKind::BTree => {
                Backend::BTree(BTree::with_overlapper(overlapper, config.degree)?)
            }
        };
        debug!(
            backend = ?config.backend,
            degree = config.degree,
            overlapper = ?config.overlapper,
            "constructed interval tree"
        );
        Ok(Tree { backend })
    }

    pub fn backend(&self) -> BackendKind {
        match self.backend {
            Backend::Llrb(_) => BackendKind::Llrb,
            Backend::BTree(_) => BackendKind::BTree,
        }
    }

    pub fn overlapper(&self) -> &dyn Overlapper {
        match self.backend {
            Backend::Llrb(ref t) => t.overlapper(),
            Backend::BTree(ref t) => t.overlapper(),
        }
    }

    /// The number of stored intervals.
    pub fn len(&self) -> usize {
        match self.backend {
            Backend::Llrb(ref t) => t.len(),
            Backend::BTree(ref t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.backend {
            Backend::Llrb(ref t) => t.is_empty(),
            Backend::BTree(ref t) => t.is_empty(),
        }
    }

    pub fn state(&self) -> State {
        match self.backend {
            Backend::Llrb(ref t) => t.state(),
            Backend::BTree(ref t) => t.state(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.state() == State::Clean
    }

    pub fn clear(&mut self) {
        match self.backend {
            Backend::Llrb(ref mut t) => t.clear(),
            Backend::BTree(ref mut t) => t.clear(),
        }
    }

    /// Recompute every cached max end, returning the tree to [`State::Clean`].
    pub fn adjust_ranges(&mut self) {
        match self.backend {
            Backend::Llrb(ref mut t) => t.adjust_ranges(),
            Backend::BTree(ref mut t) => t.adjust_ranges(),
        }
    }

    pub fn iter(&self) -> Iter<'_, I> {
        match self.backend {
            Backend::Llrb(ref t) => Iter::Llrb(t.iter()),
            Backend::BTree(ref t) => Iter::BTree(t.iter()),
        }
    }

    pub fn overlapping<'a, 'q>(&'a self, range: &'q Range) -> Overlapping<'a, 'q, I>
    where
        'a: 'q,
    {
        match self.backend {
            Backend::Llrb(ref t) => Overlapping::Llrb(t.overlapping(range)),
            Backend::BTree(ref t) => Overlapping::BTree(t.overlapping(range)),
        }
    }

    pub fn overlapping_with<'a, 'q>(
        &'a self,
        range: &'q Range,
        overlapper: &'q dyn Overlapper,
    ) -> Overlapping<'a, 'q, I> {
        match self.backend {
            Backend::Llrb(ref t) => Overlapping::Llrb(t.overlapping_with(range, overlapper)),
            Backend::BTree(ref t) => Overlapping::BTree(t.overlapping_with(range, overlapper)),
        }
    }

    /// Every stored interval overlapping `range`, in ascending order.
    ///
    /// The result is unspecified while the tree is [`State::Dirty`].
    pub fn get(&self, range: &Range) -> Vec<&I> {
        match self.backend {
            Backend::Llrb(ref t) => t.get(range),
            Backend::BTree(ref t) => t.get(range),
        }
    }

    pub fn get_with_overlapper(&self, range: &Range, overlapper: &dyn Overlapper) -> Vec<&I> {
        match self.backend {
            Backend::Llrb(ref t) => t.get_with_overlapper(range, overlapper),
            Backend::BTree(ref t) => t.get_with_overlapper(range, overlapper),
        }
    }

    pub fn lookup(&self, range: &Range) -> Vec<&I> {
        match self.backend {
            Backend::Llrb(ref t) => t.lookup(range),
            Backend::BTree(ref t) => t.lookup(range),
        }
    }

    pub fn contains<Q: Interval + ?Sized>(&self, target: &Q) -> bool {
        match self.backend {
            Backend::Llrb(ref t) => t.contains(target),
            Backend::BTree(ref t) => t.contains(target),
        }
    }
}

impl<I: Interval> Tree<I> {
    pub fn insert(&mut self, item: I, fast: bool) -> Result<(), Error> {
        match self.backend {
            Backend::Llrb(ref mut t) => t.insert(item, fast),
            Backend::BTree(ref mut t) => t.insert(item, fast),
        }
    }

    pub fn delete<Q: Interval + ?Sized>(&mut self, target: &Q, fast: bool) -> Result<I, Error> {
        match self.backend {
            Backend::Llrb(ref mut t) => t.delete(target, fast),
            Backend::BTree(ref mut t) => t.delete(target, fast),
        }
    }
}

impl<I> From<Llrb<I>> for Tree<I> {
    fn from(tree: Llrb<I>) -> Self {
        Tree {
            backend: Backend::Llrb(tree),
        }
    }
}

impl<I> From<BTree<I>> for Tree<I> {
    fn from(tree: BTree<I>) -> Self {
        Tree {
            backend: Backend::BTree(tree),
        }
    }
}

impl<I> IntoIterator for Tree<I> {
    type Item = I;
    type IntoIter = IntoIter<I>;

    fn into_iter(self) -> IntoIter<I> {
        match self.backend {
            Backend::Llrb(t) => IntoIter::Llrb(t.into_iter()),
            Backend::BTree(t) => IntoIter::BTree(t.into_iter()),
        }
    }
}

impl<'a, I> IntoIterator for &'a Tree<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Iter<'a, I> {
        self.iter()
    }
}

macro_rules! dispatch_iterator {
    ($name:ident<$($lt:lifetime),*>, $item:ty) => {
        impl<$($lt,)* I> Iterator for $name<$($lt,)* I> {
            type Item = $item;

            fn next(&mut self) -> Option<$item> {
                match self {
                    $name::Llrb(it) => it.next(),
                    $name::BTree(it) => it.next(),
                }
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                match self {
                    $name::Llrb(it) => it.size_hint(),
                    $name::BTree(it) => it.size_hint(),
                }
            }
        }
    };
}

/// An iterator over the members of a [`Tree`] overlapping some range.
#[derive(Debug)]
pub enum Overlapping<'a, 'q, I> {
    Llrb(llrb::Overlapping<'a, 'q, I>),
    BTree(btree::Overlapping<'a, 'q, I>),
}

/// An in-order iterator over every member of a [`Tree`].
#[derive(Debug)]
pub enum Iter<'a, I> {
    Llrb(llrb::Iter<'a, I>),
    BTree(btree::Iter<'a, I>),
}

/// A consuming in-order iterator over a [`Tree`].
#[derive(Debug)]
pub enum IntoIter<I> {
    Llrb(llrb::IntoIter<I>),
    BTree(btree::IntoIter<I>),
}

dispatch_iterator!(Overlapping<'a, 'q>, &'a I);
dispatch_iterator!(Iter<'a>, &'a I);
dispatch_iterator!(IntoIter<>, I);

impl<'a, I> ExactSizeIterator for Iter<'a, I> {}
impl<I> ExactSizeIterator for IntoIter<I> {}

impl<'a, 'q, I> Clone for Overlapping<'a, 'q, I> {
    fn clone(&self) -> Self {
        match self {
            Overlapping::Llrb(it) => Overlapping::Llrb(it.clone()),
            Overlapping::BTree(it) => Overlapping::BTree(it.clone()),
        }
    }
}

impl<'a, I> Clone for Iter<'a, I> {
    fn clone(&self) -> Self {
        match self {
            Iter::Llrb(it) => Iter::Llrb(it.clone()),
            Iter::BTree(it) => Iter::BTree(it.clone()),
        }
    }
}
