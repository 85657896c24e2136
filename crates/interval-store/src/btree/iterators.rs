use crate::btree::node::Node;
use crate::interval::Entry;
use crate::overlap::Overlapper;
use crate::range::Range;

#[derive(Debug, Clone, Copy)]
enum Visiting {
    /// Descend into the child at this index, then look at the entry after it.
    Child(usize),
    Entry(usize),
}

/// An iterator over those members of a [`BTree`](crate::BTree) which overlap
/// some range, in ascending order.
///
/// Children whose cached max end sorts before the query start are never
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
            self.stack.push((node, Visiting::Child(0)));
        }
    }

    pub(crate) fn next_entry(&mut self) -> Option<&'a Entry<I>> {
        while let Some((node, state)) = self.stack.pop() {
            match state {
                Visiting::Child(i) => {
                    if i < node.entries.len() {
                        self.stack.push((node, Visiting::Entry(i)));
                    }
                    if let Some(child) = node.children.get(i) {
                        self.push_if_reachable(child);
                    }
                }
                Visiting::Entry(i) => {
                    let entry = &node.entries[i];
                    // the rest of this node starts at or after this entry
                    if entry.range.start > self.query.end {
                        continue;
                    }
                    self.stack.push((node, Visiting::Child(i + 1)));
                    if self.overlapper.overlaps(self.query, &entry.range) {
                        return Some(entry);
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

/// An in-order iterator over every member of a [`BTree`](crate::BTree).
#[derive(Debug)]
pub struct Iter<'a, I> {
    /// Nodes on the current path with the index of their next entry.
    stack: Vec<(&'a Node<I>, usize)>,
    remaining: usize,
}

impl<'a, I> Iter<'a, I> {
    pub(crate) fn new(root: &'a Option<Box<Node<I>>>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(ref root) = *root {
            iter.push_left_spine(root);
        }
        iter
    }

    fn push_left_spine(&mut self, mut node: &'a Node<I>) {
        loop {
            self.stack.push((node, 0));
            match node.children.first() {
                Some(child) => node = &**child,
                None => return,
            }
        }
    }
}

impl<'a, I> Iterator for Iter<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<&'a I> {
        while let Some(top) = self.stack.last_mut() {
            let (node, idx) = *top;
            if idx < node.entries.len() {
                top.1 += 1;
                if let Some(child) = node.children.get(idx + 1) {
                    self.push_left_spine(child);
                }
                self.remaining -= 1;
                return Some(&node.entries[idx].item);
            }
            self.stack.pop();
        }
        None
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

/// A consuming in-order iterator over a [`BTree`](crate::BTree).
#[derive(Debug)]
pub struct IntoIter<I> {
    items: std::vec::IntoIter<I>,
}

impl<I> IntoIter<I> {
    pub(crate) fn new(root: Option<Box<Node<I>>>, len: usize) -> Self {
        let mut items = Vec::with_capacity(len);
        if let Some(root) = root {
            root.drain_into(&mut items);
        }
        IntoIter {
            items: items.into_iter(),
        }
    }
}

impl<I> Iterator for IntoIter<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<I> ExactSizeIterator for IntoIter<I> {}

#[cfg(test)]
mod tests {
    use crate::btree::node::tests::Iv;
    use crate::range::range;
    use crate::{BTree, ExclusiveOverlapper, InclusiveOverlapper};

    fn tree(degree: usize) -> BTree<Iv> {
        let mut tree = BTree::with_degree(InclusiveOverlapper, degree).expect("valid degree");
        for i in 0..40u8 {
            tree.insert(Iv(range([i * 2], [i * 2 + 3]), i as u64), false).expect("fresh");
        }
        tree
    }

    #[test]
    fn test_iterators() {
        for degree in [2, 3, 32] {
            let tree = tree(degree);
            let ids: Vec<u64> = tree.iter().map(|iv| iv.1).collect();
            assert_eq!(ids, (0..40).collect::<Vec<u64>>());
            assert_eq!(tree.iter().len(), 40);

            // [10, 14] meets [8, 11], [10, 13], [12, 15] and [14, 17]
            let query = range([10u8], [14u8]);
            let ids: Vec<u64> = tree.overlapping(&query).map(|iv| iv.1).collect();
            assert_eq!(ids, [4, 5, 6, 7]);

            let ids: Vec<u64> = tree
                .overlapping_with(&query, &ExclusiveOverlapper)
                .map(|iv| iv.1)
                .collect();
            assert_eq!(ids, [4, 5, 6]);

            let query = range([200u8], [255u8]);
            assert!(tree.overlapping(&query).next().is_none());
        }
    }

    #[test]
    fn test_into_iter() {
        let ids: Vec<u64> = tree(2).into_iter().map(|iv| iv.1).collect();
        assert_eq!(ids, (0..40).collect::<Vec<u64>>());
    }
}
