//! Memory of a trail search: an explicit stack of frames with
//! chronological backtracking.
//!
//! Frame `i` records the node the search stood on, the prime it left
//! through, and the primes it has not tried yet at that node. The
//! routes of all frames together form the provisional trail. Primes are
//! guaranteed unique across the stack: the set of used primes is kept
//! alongside the frames and consulted on every step forward.

use std::collections::{HashSet, VecDeque};

use crate::graph::Graph;
use crate::node::NodeId;
use crate::prime::PrimeId;

/// One decision point of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    node: NodeId,
    route: PrimeId,
    options: VecDeque<PrimeId>,
}

impl Frame {
    /// Node the search stood on.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Prime taken out of [`node`](Self::node).
    #[must_use]
    pub const fn route(&self) -> PrimeId {
        self.route
    }

    /// Primes still to be tried at this node, in order.
    pub fn options(&self) -> impl Iterator<Item = PrimeId> + '_ {
        self.options.iter().copied()
    }
}

/// The travelled route of a trail search.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    frames: Vec<Frame>,
    used: HashSet<PrimeId>,
}

/// Connections of `node` that are not in `used`, without repeats.
fn options_at<T, P>(
    graph: &Graph<T, P>,
    node: NodeId,
    used: &HashSet<PrimeId>,
) -> VecDeque<PrimeId> {
    let mut seen = HashSet::new();
    graph
        .node(node)
        .connections()
        .iter()
        .copied()
        .filter(|p| !used.contains(p) && seen.insert(*p))
        .collect()
}

impl Memory {
    /// Start a search at `start`, committing to its first connection.
    ///
    /// Returns `None` if `start` has no connections.
    #[must_use]
    pub fn new<T, P>(graph: &Graph<T, P>, start: NodeId) -> Option<Self> {
        let mut memory = Self::default();
        let mut options = options_at(graph, start, &memory.used);
        let route = options.pop_front()?;
        memory.push(Frame {
            node: start,
            route,
            options,
        });
        Some(memory)
    }

    fn push(&mut self, frame: Frame) {
        self.used.insert(frame.route);
        self.frames.push(frame);
    }

    /// Number of primes travelled.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` once every alternative has been exhausted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Primes travelled, in order.
    pub fn travelled(&self) -> impl Iterator<Item = PrimeId> + '_ {
        self.frames.iter().map(Frame::route)
    }

    /// Whether `prime` is part of the current route.
    #[must_use]
    pub fn contains(&self, prime: PrimeId) -> bool {
        self.used.contains(&prime)
    }

    /// Node at the far end of the latest route.
    #[must_use]
    pub fn head<T, P>(&self, graph: &Graph<T, P>) -> Option<NodeId> {
        let last = self.frames.last()?;
        graph.traverse(last.node, last.route)
    }

    /// Travel to the next node and record the route taken.
    ///
    /// Commits to the first prime at the next node that is not already
    /// on the route. Returns `false` if there is none; the caller must
    /// then [`revert`](Self::revert).
    pub fn onwards<T, P>(&mut self, graph: &Graph<T, P>) -> bool {
        let Some(next) = self.head(graph) else {
            return false;
        };

        let mut options = options_at(graph, next, &self.used);
        let Some(route) = options.pop_front() else {
            return false;
        };

        self.push(Frame {
            node: next,
            route,
            options,
        });
        true
    }

    /// Back up to the nearest frame with an untried option and take it.
    ///
    /// The latest frame is tried first, so a dead end at the head swaps
    /// the last route for its next alternative. Exhausted frames are
    /// popped. Returns `false` if the stack empties, meaning every
    /// trail from the start node has been tried.
    pub fn revert(&mut self) -> bool {
        loop {
            let Some(last) = self.frames.last_mut() else {
                return false;
            };

            if let Some(next) = last.options.pop_front() {
                self.used.remove(&last.route);
                last.route = next;
                self.used.insert(next);
                return true;
            }

            if let Some(dropped) = self.frames.pop() {
                self.used.remove(&dropped.route);
            }
        }
    }
}
