use std::mem;

use tracing::trace;

use crate::interval::{Entry, Key};
use crate::range::{Comparable, Range};

#[derive(Debug, Clone)]
pub(crate) struct Node<I> {
    /// Sorted by `(start, end, id)`.
    pub(crate) entries: Vec<Entry<I>>,
    /// Empty for leaves, otherwise one more than `entries`.
    pub(crate) children: Vec<Box<Node<I>>>,
    /// Largest end among this node's entries and every entry below it.
    pub(crate) max_end: Comparable,
}

/// Outcome of inserting into a subtree.
pub(crate) enum Insertion<I> {
    Absorbed,
    /// The node overflowed and was split; the median must be placed in the
    /// parent with the new right sibling after it.
    Split(Entry<I>, Box<Node<I>>),
    /// The key was already present. Nothing was changed.
    Duplicate(Entry<I>),
}

/// Whether a node dropped below its minimum occupancy.
pub(crate) struct Underflow(pub(crate) bool);

fn raise(max_end: &mut Comparable, candidate: &Comparable) {
    if *candidate > *max_end {
        max_end.clone_from(candidate);
    }
}

impl<I> Node<I> {
    pub(crate) fn leaf(entry: Entry<I>) -> Self {
        Node {
            max_end: entry.range.end.clone(),
            entries: vec![entry],
            children: Vec::new(),
        }
    }

    /// A root holding a single separator between two subtrees.
    pub(crate) fn root(
        median: Entry<I>,
        left: Box<Node<I>>,
        right: Box<Node<I>>,
        fast: bool,
    ) -> Self {
        let mut node = Node {
            max_end: median.range.end.clone(),
            entries: vec![median],
            children: vec![left, right],
        };
        if !fast {
            node.adjust();
        }
        node
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn position(&self, key: &Key) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.cmp_key(key))
    }

    /// Recompute the cached max end of this node. The cached values of the
    /// children must already be up to date.
    pub(crate) fn adjust(&mut self) {
        let max = self
            .entries
            .iter()
            .map(|entry| &entry.range.end)
            .chain(self.children.iter().map(|child| &child.max_end))
            .max();
        if let Some(max) = max {
            self.max_end.clone_from(max);
        }
    }

    /// Recompute the cached max end of every node of this subtree, bottom up.
    pub(crate) fn adjust_all(&mut self) {
        for child in self.children.iter_mut() {
            child.adjust_all();
        }
        self.adjust();
    }

    /// Inserts the entry into this subtree, splitting nodes holding more than
    /// `2 * degree - 1` entries on the way back up.
    pub(crate) fn insert(&mut self, entry: Entry<I>, degree: usize, fast: bool) -> Insertion<I> {
        let position = self.position(&entry.key());
        let idx = match position {
            Ok(_) => return Insertion::Duplicate(entry),
            Err(idx) => idx,
        };

        if self.is_leaf() {
            self.entries.insert(idx, entry);
            if !fast {
                raise(&mut self.max_end, &self.entries[idx].range.end);
            }
        } else {
            match self.children[idx].insert(entry, degree, fast) {
                Insertion::Duplicate(entry) => return Insertion::Duplicate(entry),
                Insertion::Absorbed => {
                    if !fast {
                        raise(&mut self.max_end, &self.children[idx].max_end);
                    }
                }
                Insertion::Split(median, right) => {
                    self.entries.insert(idx, median);
                    self.children.insert(idx + 1, right);
                    if !fast {
                        raise(&mut self.max_end, &self.entries[idx].range.end);
                        raise(&mut self.max_end, &self.children[idx].max_end);
                        raise(&mut self.max_end, &self.children[idx + 1].max_end);
                    }
                }
            }
        }

        if self.entries.len() < 2 * degree {
            return Insertion::Absorbed;
        }

        // 2 * degree entries: keep `degree`, promote one, move `degree - 1`
        let right_entries = self.entries.split_off(degree + 1);
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(degree + 1)
        };
        let median = self.entries.pop().expect("b-tree broken: split of an empty node");
        let mut right = Box::new(Node {
            max_end: median.range.end.clone(),
            entries: right_entries,
            children: right_children,
        });
        if !fast {
            self.adjust();
            right.adjust();
        }
        trace!(degree, "split b-tree node");
        Insertion::Split(median, right)
    }

    /// Returns the entry with exactly `key`, if any.
    pub(crate) fn search(&self, key: &Key) -> Option<&Entry<I>> {
        match self.position(key) {
            Ok(idx) => Some(&self.entries[idx]),
            Err(idx) => self.children.get(idx)?.search(key),
        }
    }

    /// Appends, in order, the item of every entry whose range is exactly
    /// `range`. Only children bordering or between such entries are entered.
    pub(crate) fn exact<'a>(&'a self, range: &Range, out: &mut Vec<&'a I>) {
        let lo = self.entries.partition_point(|entry| entry.range < *range);
        let hi = self.entries.partition_point(|entry| entry.range <= *range);
        for i in lo..=hi {
            if let Some(child) = self.children.get(i) {
                child.exact(range, out);
            }
            if i < hi {
                out.push(&self.entries[i].item);
            }
        }
    }

    /// Removes the entry with `key` from this subtree. Nothing is changed if
    /// the key is absent.
    pub(crate) fn remove(
        &mut self,
        key: &Key,
        degree: usize,
        fast: bool,
    ) -> Option<(Entry<I>, Underflow)> {
        let removed = match self.position(key) {
            Ok(idx) if self.is_leaf() => self.entries.remove(idx),
            Ok(idx) => {
                // swap in the in-order predecessor, pulled up from a leaf
                let (predecessor, underflow) = self.children[idx].pop_last(degree, fast);
                let removed = mem::replace(&mut self.entries[idx], predecessor);
                if underflow.0 {
                    self.rebalance(idx, degree, fast);
                }
                removed
            }
            Err(idx) => {
                let (removed, underflow) = self.children.get_mut(idx)?.remove(key, degree, fast)?;
                if underflow.0 {
                    self.rebalance(idx, degree, fast);
                }
                removed
            }
        };
        if !fast {
            self.adjust();
        }
        Some((removed, Underflow(self.entries.len() < degree - 1)))
    }

    /// Removes the greatest entry of this subtree.
    fn pop_last(&mut self, degree: usize, fast: bool) -> (Entry<I>, Underflow) {
        let last = if self.is_leaf() {
            self.entries.pop().expect("b-tree broken: empty non-root node")
        } else {
            let idx = self.children.len() - 1;
            let (last, underflow) = self.children[idx].pop_last(degree, fast);
            if underflow.0 {
                self.rebalance(idx, degree, fast);
            }
            last
        };
        if !fast {
            self.adjust();
        }
        (last, Underflow(self.entries.len() < degree - 1))
    }

    /// Restore the occupancy of child `idx` by borrowing from a sibling that
    /// can spare an entry, or else by merging with one.
    fn rebalance(&mut self, idx: usize, degree: usize, fast: bool) {
        let spare = |node: &Node<I>| node.entries.len() > degree - 1;
        if idx > 0 && spare(&self.children[idx - 1]) {
            self.rotate_right(idx - 1, fast);
        } else if idx + 1 < self.children.len() && spare(&self.children[idx + 1]) {
            self.rotate_left(idx, fast);
        } else if idx > 0 {
            self.merge(idx - 1, fast);
        } else {
            self.merge(idx, fast);
        }
    }

    /// Move the last entry of child `at` up into the separator slot `at`,
    /// and the old separator down to the front of child `at + 1`.
    fn rotate_right(&mut self, at: usize, fast: bool) {
        let (lo, hi) = self.children.split_at_mut(at + 1);
        let (left, right) = (&mut lo[at], &mut hi[0]);
        let borrowed = left.entries.pop().expect("b-tree broken: borrowing from an empty sibling");
        let separator = mem::replace(&mut self.entries[at], borrowed);
        right.entries.insert(0, separator);
        if let Some(child) = left.children.pop() {
            right.children.insert(0, child);
        }
        if !fast {
            left.adjust();
            right.adjust();
        }
    }

    /// Move the first entry of child `at + 1` up into the separator slot
    /// `at`, and the old separator down to the back of child `at`.
    fn rotate_left(&mut self, at: usize, fast: bool) {
        let (lo, hi) = self.children.split_at_mut(at + 1);
        let (left, right) = (&mut lo[at], &mut hi[0]);
        let borrowed = right.entries.remove(0);
        let separator = mem::replace(&mut self.entries[at], borrowed);
        left.entries.push(separator);
        if !right.children.is_empty() {
            left.children.push(right.children.remove(0));
        }
        if !fast {
            left.adjust();
            right.adjust();
        }
    }

    /// Fold separator `at` and child `at + 1` into child `at`.
    fn merge(&mut self, at: usize, fast: bool) {
        let separator = self.entries.remove(at);
        let right = self.children.remove(at + 1);
        let left = &mut self.children[at];
        left.entries.push(separator);
        let Node { entries, children, .. } = *right;
        left.entries.extend(entries);
        left.children.extend(children);
        if !fast {
            left.adjust();
        }
        trace!(len = left.entries.len(), "merged b-tree nodes");
    }

    /// Move every entry of this subtree, in order, into `out`.
    pub(crate) fn drain_into(self, out: &mut Vec<I>) {
        let mut children = self.children.into_iter();
        for entry in self.entries {
            if let Some(child) = children.next() {
                child.drain_into(out);
            }
            out.push(entry.item);
        }
        if let Some(child) = children.next() {
            child.drain_into(out);
        }
    }
}

pub(crate) fn depth<I>(node: &Option<Box<Node<I>>>) -> usize {
    let mut depth = 0;
    let mut node = node.as_deref();
    while let Some(current) = node {
        depth += 1;
        node = current.children.first().map(|child| &**child);
    }
    depth
}
