//! Per-search node arena and frontier ordering.
//!
//! Every node discovered during one search lives in a flat `Vec`; the
//! predecessor link is an index into that `Vec`, so the whole search tree is
//! dropped in one go when the search returns.

use std::cmp::Ordering;

use snakepath_core::{Point, Range};

/// Arena index meaning "no node".
const NONE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
    /// In the frontier, may still be improved.
    Open,
    /// Finalized. Never reopened.
    Closed,
}

/// One discovered cell with its best known cost.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) pos: Point,
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) parent: u32,
    pub(crate) state: NodeState,
}

/// Node pool for a single search, plus the cell → node lookup.
pub(crate) struct NodeArena {
    rng: Range,
    slots: Vec<u32>,
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub(crate) fn new(rng: Range) -> Self {
        Self {
            rng,
            slots: vec![NONE; rng.len()],
            nodes: Vec::new(),
        }
    }

    /// The arena index of the node for `p`, if one was discovered.
    #[inline]
    pub(crate) fn lookup(&self, p: Point) -> Option<u32> {
        let slot = self.slots[self.rng.index_of(p)?];
        (slot != NONE).then_some(slot)
    }

    /// Allocate an open node for `p`. `p` must be in range and not yet
    /// discovered.
    pub(crate) fn insert(&mut self, pos: Point, g: f64, h: f64, parent: Option<u32>) -> u32 {
        let id = self.nodes.len() as u32;
        if let Some(i) = self.rng.index_of(pos) {
            self.slots[i] = id;
        }
        self.nodes.push(SearchNode {
            pos,
            g,
            h,
            parent: parent.unwrap_or(NONE),
            state: NodeState::Open,
        });
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: u32) -> &SearchNode {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: u32) -> &mut SearchNode {
        &mut self.nodes[id as usize]
    }

    /// Number of nodes discovered so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Walk predecessor links from `id` back to the root and return the
    /// cells root-first.
    pub(crate) fn path_to(&self, id: u32) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cur = id;
        while cur != NONE {
            let n = self.get(cur);
            path.push(n.pos);
            cur = n.parent;
        }
        path.reverse();
        path
    }
}

/// A frontier entry. Entries are never removed when a node improves; stale
/// ones are skipped on pop by comparing `g` with the node's current value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierEntry {
    pub(crate) node: u32,
    pub(crate) pos: Point,
    pub(crate) g: f64,
    pub(crate) h: f64,
}

impl FrontierEntry {
    pub(crate) fn of(id: u32, n: &SearchNode) -> Self {
        Self {
            node: id,
            pos: n.pos,
            g: n.g,
            h: n.h,
        }
    }

    /// Estimated total cost `g + h`.
    #[inline]
    pub(crate) fn f(&self) -> f64 {
        self.g + self.h
    }

    /// Priority order: lowest `f`, then lowest `h`, then lowest `x`, then
    /// lowest `y`. `Less` means "pop first".
    fn priority(&self, other: &Self) -> Ordering {
        self.f()
            .total_cmp(&other.f())
            .then(self.h.total_cmp(&other.h))
            .then(self.pos.x.cmp(&other.pos.x))
            .then(self.pos.y.cmp(&other.pos.y))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the best entry first.
        other.priority(self)
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn entry(x: i32, y: i32, g: f64, h: f64) -> FrontierEntry {
        FrontierEntry {
            node: 0,
            pos: Point::new(x, y),
            g,
            h,
        }
    }

    #[test]
    fn heap_pops_lowest_f_then_h_then_x_then_y() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(0, 0, 3.0, 2.0)); // f 5, h 2
        heap.push(entry(5, 5, 1.0, 2.0)); // f 3, h 2
        heap.push(entry(4, 4, 2.0, 1.0)); // f 3, h 1
        heap.push(entry(2, 9, 2.0, 1.0)); // f 3, h 1, lower x
        heap.push(entry(2, 1, 2.0, 1.0)); // f 3, h 1, lower y

        let order: Vec<Point> = std::iter::from_fn(|| heap.pop()).map(|e| e.pos).collect();
        assert_eq!(
            order,
            vec![
                Point::new(2, 1),
                Point::new(2, 9),
                Point::new(4, 4),
                Point::new(5, 5),
                Point::new(0, 0),
            ]
        );
    }

    #[test]
    fn arena_links_parents() {
        let mut arena = NodeArena::new(Range::sized(3, 1));
        let a = arena.insert(Point::new(0, 0), 0.0, 2.0, None);
        let b = arena.insert(Point::new(1, 0), 1.0, 1.0, Some(a));
        let c = arena.insert(Point::new(2, 0), 2.0, 0.0, Some(b));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.lookup(Point::new(1, 0)), Some(b));
        assert_eq!(arena.lookup(Point::new(5, 0)), None);
        assert_eq!(
            arena.path_to(c),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn undiscovered_cells_have_no_node() {
        let arena = NodeArena::new(Range::sized(2, 2));
        assert_eq!(arena.lookup(Point::new(1, 1)), None);
    }
}
