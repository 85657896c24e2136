use std::cmp::Ordering;
use std::mem;

use crate::interval::{Entry, Key};
use crate::range::{Comparable, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<I> {
    pub(crate) entry: Entry<I>,
    /// Largest end among this node's interval and every interval below it.
    pub(crate) max_end: Comparable,
    pub(crate) color: Color,
    pub(crate) left: Option<Box<Node<I>>>,
    pub(crate) right: Option<Box<Node<I>>>,
}

pub(crate) fn is_red<I>(link: &Option<Box<Node<I>>>) -> bool {
    link.as_ref().map_or(false, |node| node.color == Color::Red)
}

impl<I> Node<I> {
    pub(crate) fn new(entry: Entry<I>) -> Self {
        Node {
            max_end: entry.range.end.clone(),
            entry,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    fn left_left_is_red(&self) -> bool {
        self.left.as_ref().map_or(false, |left| is_red(&left.left))
    }

    fn right_left_is_red(&self) -> bool {
        self.right.as_ref().map_or(false, |right| is_red(&right.left))
    }

    /// Recompute the cached max end of this node. The cached values of both
    /// children must already be up to date.
    pub(crate) fn adjust(&mut self) {
        self.max_end.clone_from(&self.entry.range.end);
        if let Some(ref left) = self.left {
            if left.max_end > self.max_end {
                self.max_end.clone_from(&left.max_end);
            }
        }
        if let Some(ref right) = self.right {
            if right.max_end > self.max_end {
                self.max_end.clone_from(&right.max_end);
            }
        }
    }

    /// Recompute the cached max end of every node of this subtree, bottom up.
    pub(crate) fn adjust_all(&mut self) {
        if let Some(ref mut left) = self.left {
            left.adjust_all();
        }
        if let Some(ref mut right) = self.right {
            right.adjust_all();
        }
        self.adjust();
    }

    /// Perform a single left rotation on this (sub) tree
    fn rotate_left(mut self: Box<Self>, fast: bool) -> Box<Self> {
        let mut new_root = self.right.take().expect("llrb broken: rotate_left without right child");
        self.right = new_root.left.take();
        new_root.color = self.color;
        self.color = Color::Red;
        if !fast {
            self.adjust();
        }
        new_root.left = Some(self);
        if !fast {
            new_root.adjust();
        }
        new_root
    }

    /// Perform a single right rotation on this (sub) tree
    fn rotate_right(mut self: Box<Self>, fast: bool) -> Box<Self> {
        let mut new_root = self.left.take().expect("llrb broken: rotate_right without left child");
        self.left = new_root.right.take();
        new_root.color = self.color;
        self.color = Color::Red;
        if !fast {
            self.adjust();
        }
        new_root.right = Some(self);
        if !fast {
            new_root.adjust();
        }
        new_root
    }

    fn flip_colors(&mut self) {
        self.color = self.color.flip();
        if let Some(ref mut left) = self.left {
            left.color = left.color.flip();
        }
        if let Some(ref mut right) = self.right {
            right.color = right.color.flip();
        }
    }

    /// Restore the left-leaning invariants on the way back up, then refresh
    /// the augmentation unless running in fast mode.
    fn fix_up(mut self: Box<Self>, fast: bool) -> Box<Self> {
        if is_red(&self.right) && !is_red(&self.left) {
            self = self.rotate_left(fast);
        }
        if is_red(&self.left) && self.left_left_is_red() {
            self = self.rotate_right(fast);
        }
        if is_red(&self.left) && is_red(&self.right) {
            self.flip_colors();
        }
        if !fast {
            self.adjust();
        }
        self
    }

    /// Borrow a red link from the right so the left child is not a 2-node.
    fn move_red_left(mut self: Box<Self>, fast: bool) -> Box<Self> {
        self.flip_colors();
        if self.right_left_is_red() {
            let right = self.right.take().expect("llrb broken: move_red_left without right child");
            self.right = Some(right.rotate_right(fast));
            self = self.rotate_left(fast);
            self.flip_colors();
        }
        self
    }

    /// Borrow a red link from the left so the right child is not a 2-node.
    fn move_red_right(mut self: Box<Self>, fast: bool) -> Box<Self> {
        self.flip_colors();
        if self.left_left_is_red() {
            self = self.rotate_right(fast);
            self.flip_colors();
        }
        self
    }

    /// Inserts the entry into the tree rooted here and returns the new root of
    /// the subtree, which may differ due to rotations. The key of `entry` must
    /// not already be present.
    pub(crate) fn insert(mut self: Box<Self>, entry: Entry<I>, fast: bool) -> Box<Self> {
        let ordering = entry.key().cmp(&self.entry.key());
        match ordering {
            Ordering::Less => {
                self.left = Some(Node::insert_in_successor(self.left.take(), entry, fast))
            }
            Ordering::Equal | Ordering::Greater => {
                self.right = Some(Node::insert_in_successor(self.right.take(), entry, fast))
            }
        }
        self.fix_up(fast)
    }

    pub(crate) fn insert_in_successor(
        succ: Option<Box<Self>>,
        entry: Entry<I>,
        fast: bool,
    ) -> Box<Self> {
        match succ {
            Some(succ) => succ.insert(entry, fast),
            None => Box::new(Node::new(entry)),
        }
    }

    /// Removes the minimal node below (and including) this one, returning the
    /// remaining subtree and the detached node.
    pub(crate) fn delete_min(mut self: Box<Self>, fast: bool) -> (Option<Box<Self>>, Box<Self>) {
        if self.left.is_none() {
            // a left-leaning node without a left child has no right child either
            return (None, self);
        }
        if !is_red(&self.left) && !self.left_left_is_red() {
            self = self.move_red_left(fast);
        }
        let left = self.left.take().expect("llrb broken: delete_min lost left child");
        let (new_left, min) = left.delete_min(fast);
        self.left = new_left;
        (Some(self.fix_up(fast)), min)
    }

    /// Removes the entry with the given key from this subtree. The key must be
    /// present; the caller checks with [`Node::search`] first, because the
    /// descent restructures the tree before the key is reached.
    pub(crate) fn delete(
        mut self: Box<Self>,
        key: &Key,
        fast: bool,
    ) -> (Option<Box<Self>>, Entry<I>) {
        let removed;
        if *key < self.entry.key() {
            if !is_red(&self.left) && !self.left_left_is_red() {
                self = self.move_red_left(fast);
            }
            let left = self.left.take().expect("llrb broken: key missing from left subtree");
            let (new_left, entry) = left.delete(key, fast);
            self.left = new_left;
            removed = entry;
        } else {
            if is_red(&self.left) {
                self = self.rotate_right(fast);
            }
            if *key == self.entry.key() && self.right.is_none() {
                return (None, self.entry);
            }
            if !is_red(&self.right) && !self.right_left_is_red() {
                self = self.move_red_right(fast);
            }
            let right = self.right.take().expect("llrb broken: key missing from right subtree");
            if *key == self.entry.key() {
                let (new_right, min) = right.delete_min(fast);
                self.right = new_right;
                removed = mem::replace(&mut self.entry, min.entry);
            } else {
                let (new_right, entry) = right.delete(key, fast);
                self.right = new_right;
                removed = entry;
            }
        }
        (Some(self.fix_up(fast)), removed)
    }

    /// Appends, in order, the item of every node whose range is exactly
    /// `range`. Only subtrees that can hold such keys are entered.
    pub(crate) fn exact<'a>(&'a self, range: &Range, out: &mut Vec<&'a I>) {
        let ordering = self.entry.range.cmp(range);
        if ordering != Ordering::Less {
            if let Some(ref left) = self.left {
                left.exact(range, out);
            }
        }
        if ordering == Ordering::Equal {
            out.push(&self.entry.item);
        }
        if ordering != Ordering::Greater {
            if let Some(ref right) = self.right {
                right.exact(range, out);
            }
        }
    }

    /// Returns the node holding exactly `key`, if any.
    pub(crate) fn search(&self, key: &Key) -> Option<&Self> {
        match self.entry.cmp_key(key) {
            Ordering::Equal => Some(self),
            Ordering::Less => self.right.as_ref().and_then(|succ| succ.search(key)),
            Ordering::Greater => self.left.as_ref().and_then(|succ| succ.search(key)),
        }
    }
}

pub(crate) fn height<I>(node: &Option<Box<Node<I>>>) -> usize {
    node.as_ref()
        .map_or(0, |succ| 1 + std::cmp::max(height(&succ.left), height(&succ.right)))
}
