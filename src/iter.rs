//! Iterator types for [`Tree`](crate::Tree).

use std::iter::FusedIterator;

use crate::node::Node;

/// Iterator over references to the elements of a [`Tree`](crate::Tree).
///
/// Depth-first over an explicit stack of nodes, so no elements are
/// collected up front. Order follows hash fragments and is stable for a
/// given tree but otherwise unspecified.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    current: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Self {
            stack: vec![root],
            current: [].iter(),
            remaining: root.count(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.current.next() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.stack.pop()? {
                Node::Branch(branch) => {
                    self.stack.extend(branch.packer.children().rev().map(|child| &**child));
                }
                node => self.current = node.elements().iter(),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

/// The `limit` smallest elements of a tree, in ascending order.
///
/// Selection keeps a bounded max-heap of `limit` references while scanning
/// the tree once, then sorts the heap in place: `O(n log limit)` time,
/// `O(limit)` extra space.
pub struct OrderedIter<'a, T> {
    items: std::vec::IntoIter<&'a T>,
}

impl<'a, T> OrderedIter<'a, T> {
    pub(crate) fn new<F>(source: Iter<'a, T>, less: F, limit: usize) -> Self
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut heap: Vec<&'a T> = Vec::with_capacity(limit.min(source.len()));
        if limit > 0 {
            for item in source {
                if heap.len() < limit {
                    heap.push(item);
                    let last = heap.len() - 1;
                    sift_up(&mut heap, last, &less);
                } else if less(item, heap[0]) {
                    heap[0] = item;
                    let len = heap.len();
                    sift_down(&mut heap, 0, len, &less);
                }
            }
        }

        let mut end = heap.len();
        while end > 1 {
            end -= 1;
            heap.swap(0, end);
            sift_down(&mut heap, 0, end, &less);
        }
        Self {
            items: heap.into_iter(),
        }
    }
}

impl<'a, T> Iterator for OrderedIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<T> DoubleEndedIterator for OrderedIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.items.next_back()
    }
}

impl<T> ExactSizeIterator for OrderedIter<'_, T> {}

impl<T> FusedIterator for OrderedIter<'_, T> {}

// ---------------------------------------------------------------------------
// Max-heap under a caller-supplied `less`
// ---------------------------------------------------------------------------

fn sift_up<T, F: Fn(&T, &T) -> bool>(heap: &mut [&T], mut i: usize, less: &F) {
    while i > 0 {
        let parent = (i - 1) / 2;
        if !less(heap[parent], heap[i]) {
            break;
        }
        heap.swap(parent, i);
        i = parent;
    }
}

fn sift_down<T, F: Fn(&T, &T) -> bool>(heap: &mut [&T], mut i: usize, len: usize, less: &F) {
    loop {
        let left = 2 * i + 1;
        if left >= len {
            break;
        }
        let mut largest = i;
        if less(heap[largest], heap[left]) {
            largest = left;
        }
        let right = left + 1;
        if right < len && less(heap[largest], heap[right]) {
            largest = right;
        }
        if largest == i {
            break;
        }
        heap.swap(i, largest);
        i = largest;
    }
}
