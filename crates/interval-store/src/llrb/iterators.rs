use crate::interval::Entry;
use crate::llrb::node::Node;
use crate::overlap::Overlapper;
use crate::range::Range;

#[derive(Debug, Clone, Copy)]
enum Visiting {
    Left,
    Center,
    Right,
}

/// An iterator over those members of an [`Llrb`](crate::Llrb) which overlap
/// some range, in ascending order.
///
/// Subtrees whose cached max end sorts before the query start are never
/// entered, so the results are only complete while the tree is clean.
#[derive(Debug)]
pub struct Overlapping<'a, 'q, I> {
    query: &'q Range,
    overlapper: &'q dyn Overlapper,
    stack: Vec<(&'a Node<I>, Visiting)>,
}

impl<'a, 'q, I> Overlapping<'a, 'q, I> {
    pub(crate) fn new(
        root: &'a Option<Box<Node<I>>>,
        query: &'q Range,
        overlapper: &'q dyn Overlapper,
    ) -> Self {
        let mut iter = Overlapping {
            query,
            overlapper,
            stack: Vec::new(),
        };
        if let Some(ref root) = *root {
            iter.push_if_reachable(root);
        }
        iter
    }

    fn push_if_reachable(&mut self, node: &'a Node<I>) {
        if node.max_end >= self.query.start {
            self.stack.push((node, Visiting::Left));
        }
    }

    fn visit_left(&mut self, node: &'a Node<I>) {
        self.stack.push((node, Visiting::Center));
        if let Some(ref lsucc) = node.left {
            self.push_if_reachable(lsucc);
        }
    }

    fn visit_right(&mut self, node: &'a Node<I>) {
        // everything to the right starts at or after this node
        if node.entry.range.start > self.query.end {
            return;
        }
        if let Some(ref rsucc) = node.right {
            self.push_if_reachable(rsucc);
        }
    }

    pub(crate) fn next_entry(&mut self) -> Option<&'a Entry<I>> {
        while let Some((node, state)) = self.stack.pop() {
            match state {
                Visiting::Left => self.visit_left(node),
                Visiting::Right => self.visit_right(node),
                Visiting::Center => {
                    self.stack.push((node, Visiting::Right));
                    if self.overlapper.overlaps(self.query, &node.entry.range) {
                        return Some(&node.entry);
                    }
                }
            }
        }
        None
    }
}

impl<'a, 'q, I> Iterator for Overlapping<'a, 'q, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<&'a I> {
        self.next_entry().map(|entry| &entry.item)
    }
}

impl<'a, 'q, I> Clone for Overlapping<'a, 'q, I> {
    fn clone(&self) -> Self {
        Overlapping {
            query: self.query,
            overlapper: self.overlapper,
            stack: self.stack.clone(),
        }
    }
}

/// An in-order iterator over every member of an [`Llrb`](crate::Llrb).
#[derive(Debug)]
pub struct Iter<'a, I> {
    stack: Vec<&'a Node<I>>,
    remaining: usize,
}

impl<'a, I> Iter<'a, I> {
    pub(crate) fn new(root: &'a Option<Box<Node<I>>>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: &'a Option<Box<Node<I>>>) {
        while let Some(ref current) = *node {
            self.stack.push(current);
            node = &current.left;
        }
    }
}

impl<'a, I> Iterator for Iter<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<&'a I> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining -= 1;
        Some(&node.entry.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I> ExactSizeIterator for Iter<'a, I> {}

impl<'a, I> Clone for Iter<'a, I> {
    fn clone(&self) -> Self {
        Iter {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// A consuming in-order iterator over an [`Llrb`](crate::Llrb).
#[derive(Debug)]
pub struct IntoIter<I> {
    stack: Vec<Node<I>>,
    remaining: usize,
}

impl<I> IntoIter<I> {
    pub(crate) fn new(root: Option<Box<Node<I>>>, len: usize) -> Self {
        let mut this = IntoIter {
            stack: Vec::new(),
            remaining: len,
        };
        this.push_node(root);
        this
    }

    fn push_node(&mut self, mut node: Option<Box<Node<I>>>) {
        while let Some(mut current) = node {
            node = current.left.take();
            self.stack.push(*current);
        }
    }
}

impl<I> Iterator for IntoIter<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let mut node = self.stack.pop()?;
        self.push_node(node.right.take());
        self.remaining -= 1;
        Some(node.entry.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I> ExactSizeIterator for IntoIter<I> {}
