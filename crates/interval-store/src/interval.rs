//! The contract stored elements satisfy, and the cached copy the trees keep.

use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::Arc;

use crate::range::{Comparable, Range};

/// Identity distinguishing intervals that share the same range.
pub type Id = u64;

/// An element that can be stored in a tree.
///
/// The pair of [`range`](Interval::range) and [`id`](Interval::id) must be
/// unique within one tree, and must not change while the element is stored.
pub trait Interval {
    fn range(&self) -> &Range;
    fn id(&self) -> Id;
}

impl<T: Interval + ?Sized> Interval for &T {
    fn range(&self) -> &Range {
        (**self).range()
    }
    fn id(&self) -> Id {
        (**self).id()
    }
}

impl<T: Interval + ?Sized> Interval for Box<T> {
    fn range(&self) -> &Range {
        (**self).range()
    }
    fn id(&self) -> Id {
        (**self).id()
    }
}

impl<T: Interval + ?Sized> Interval for Rc<T> {
    fn range(&self) -> &Range {
        (**self).range()
    }
    fn id(&self) -> Id {
        (**self).id()
    }
}

impl<T: Interval + ?Sized> Interval for Arc<T> {
    fn range(&self) -> &Range {
        (**self).range()
    }
    fn id(&self) -> Id {
        (**self).id()
    }
}

/// Sort key of a stored element: `(start, end, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Key<'a> {
    start: &'a Comparable,
    end: &'a Comparable,
    id: Id,
}

impl<'a> Key<'a> {
    pub(crate) fn new(range: &'a Range, id: Id) -> Key<'a> {
        Key {
            start: &range.start,
            end: &range.end,
            id,
        }
    }

    pub(crate) fn of<Q: Interval + ?Sized>(item: &'a Q) -> Key<'a> {
        Key::new(item.range(), item.id())
    }
}

/// A stored element along with the copy of its range and id the tree orders by.
#[derive(Debug, Clone)]
pub(crate) struct Entry<I> {
    pub(crate) range: Range,
    pub(crate) id: Id,
    pub(crate) item: I,
}

impl<I: Interval> Entry<I> {
    pub(crate) fn new(item: I) -> Entry<I> {
        Entry {
            range: item.range().clone(),
            id: item.id(),
            item,
        }
    }
}

impl<I> Entry<I> {
    pub(crate) fn key(&self) -> Key<'_> {
        Key::new(&self.range, self.id)
    }

    pub(crate) fn cmp_key(&self, key: &Key) -> Ordering {
        self.key().cmp(key)
    }
}
