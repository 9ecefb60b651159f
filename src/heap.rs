//! Max-priority structure over the cells of one region.
//!
//! A binomial heap whose nodes live in a vector arena and link to each other
//! through indices. Root lists are kept in ascending degree order; child lists
//! in descending degree order.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// One heap payload: a cell and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbEntry {
    pub prob: u32,
    pub row: usize,
    pub col: usize,
}

impl ProbEntry {
    pub fn new(prob: u32, row: usize, col: usize) -> Self {
        Self { prob, row, col }
    }
}

/// Higher probability first; ties go to the smaller row, then smaller column.
impl Ord for ProbEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prob
            .cmp(&other.prob)
            .then_with(|| other.row.cmp(&self.row))
            .then_with(|| other.col.cmp(&self.col))
    }
}

impl PartialOrd for ProbEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct Node {
    entry: ProbEntry,
    degree: u32,
    child: Option<NodeId>,
    sibling: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RegionHeap {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    len: usize,
}

impl RegionHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RegionHeap {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Drops every entry and recycles the arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.len = 0;
    }

    pub fn insert(&mut self, entry: ProbEntry) {
        let id = self.alloc(entry);
        self.len += 1;
        self.union(Some(id));
    }

    /// Greatest entry, without removing it.
    pub fn peek_max(&self) -> Option<ProbEntry> {
        self.max_root().map(|(id, _)| self.nodes[id].entry)
    }

    /// Removes and returns the greatest entry.
    pub fn extract_max(&mut self) -> Option<ProbEntry> {
        let (max, prev) = self.max_root()?;
        let after = self.nodes[max].sibling;
        match prev {
            Some(p) => self.nodes[p].sibling = after,
            None => self.head = after,
        }

        // children come out highest degree first; flip them into a root list
        let mut child = self.nodes[max].child.take();
        let mut reversed = None;
        while let Some(c) = child {
            child = self.nodes[c].sibling;
            self.nodes[c].sibling = reversed;
            reversed = Some(c);
        }
        self.union(reversed);

        self.len -= 1;
        self.free.push(max);
        Some(self.nodes[max].entry)
    }

    /// Greatest entry that satisfies `live`, discarding stale ones found on top.
    pub fn peek_max_where<F>(&mut self, mut live: F) -> Option<ProbEntry>
    where
        F: FnMut(&ProbEntry) -> bool,
    {
        loop {
            let top = self.peek_max()?;
            if live(&top) {
                return Some(top);
            }
            self.extract_max();
        }
    }

    /// Moves every entry of `other` into this heap.
    pub fn merge(&mut self, other: RegionHeap) {
        if other.is_empty() {
            return;
        }
        let offset = self.nodes.len();
        let shift = |id: Option<NodeId>| id.map(|i| i + offset);
        self.nodes.extend(other.nodes.iter().map(|n| Node {
            child: shift(n.child),
            sibling: shift(n.sibling),
            ..*n
        }));
        self.free.extend(other.free.iter().map(|i| i + offset));
        self.len += other.len;
        self.union(shift(other.head));
    }

    /// Empties the heap, yielding entries greatest first.
    pub fn drain_max(&mut self) -> DrainMax<'_> {
        DrainMax { heap: self }
    }

    fn alloc(&mut self, entry: ProbEntry) -> NodeId {
        let node = Node {
            entry,
            degree: 0,
            child: None,
            sibling: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Root holding the maximum, with the root just before it.
    fn max_root(&self) -> Option<(NodeId, Option<NodeId>)> {
        let mut curr = self.head?;
        let (mut best, mut best_prev) = (curr, None);
        let mut prev = None;
        loop {
            if self.nodes[curr].entry > self.nodes[best].entry {
                best = curr;
                best_prev = prev;
            }
            match self.nodes[curr].sibling {
                Some(next) => {
                    prev = Some(curr);
                    curr = next;
                }
                None => return Some((best, best_prev)),
            }
        }
    }

    /// Interleaves two root lists by ascending degree.
    fn merge_roots(&mut self, mut a: Option<NodeId>, mut b: Option<NodeId>) -> Option<NodeId> {
        let mut head = None;
        let mut tail: Option<NodeId> = None;
        loop {
            let next = match (a, b) {
                (None, None) => break,
                (Some(x), None) => x,
                (None, Some(y)) => y,
                (Some(x), Some(y)) => {
                    if self.nodes[x].degree <= self.nodes[y].degree {
                        x
                    } else {
                        y
                    }
                }
            };
            if a == Some(next) {
                a = self.nodes[next].sibling;
            } else {
                b = self.nodes[next].sibling;
            }
            match tail {
                Some(t) => self.nodes[t].sibling = Some(next),
                None => head = Some(next),
            }
            tail = Some(next);
        }
        if let Some(t) = tail {
            self.nodes[t].sibling = None;
        }
        head
    }

    fn union(&mut self, other: Option<NodeId>) {
        self.head = self.merge_roots(self.head, other);
        let Some(mut curr) = self.head else {
            return;
        };
        let mut prev: Option<NodeId> = None;
        while let Some(next) = self.nodes[curr].sibling {
            let degree = self.nodes[curr].degree;
            let third_matches = self.nodes[next]
                .sibling
                .is_some_and(|n| self.nodes[n].degree == degree);
            if self.nodes[next].degree != degree || third_matches {
                prev = Some(curr);
                curr = next;
            } else if self.nodes[curr].entry >= self.nodes[next].entry {
                self.nodes[curr].sibling = self.nodes[next].sibling;
                self.link(next, curr);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(next),
                    None => self.head = Some(next),
                }
                self.link(curr, next);
                curr = next;
            }
        }
    }

    /// Makes `child` the first child of `parent`.
    fn link(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child].sibling = self.nodes[parent].child;
        self.nodes[parent].child = Some(child);
        self.nodes[parent].degree += 1;
    }
}

impl Extend<ProbEntry> for RegionHeap {
    fn extend<I: IntoIterator<Item = ProbEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl FromIterator<ProbEntry> for RegionHeap {
    fn from_iter<I: IntoIterator<Item = ProbEntry>>(iter: I) -> Self {
        let mut heap = RegionHeap::new();
        heap.extend(iter);
        heap
    }
}

/// Iterator returned by [`RegionHeap::drain_max`].
pub struct DrainMax<'a> {
    heap: &'a mut RegionHeap,
}

impl Iterator for DrainMax<'_> {
    type Item = ProbEntry;

    fn next(&mut self) -> Option<ProbEntry> {
        self.heap.extract_max()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len, Some(self.heap.len))
    }
}
