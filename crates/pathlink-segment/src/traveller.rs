//! Drive a [`Memory`] forwards and backwards until a target is reached.
//!
//! The traveller knows nothing about what it is looking for: callers
//! supply a success predicate (stop, the trail is found) and a failure
//! predicate (this branch cannot lead anywhere, back up).

use tracing::trace;

use crate::graph::Graph;
use crate::memory::Memory;
use crate::node::NodeId;
use crate::path::Path;

/// A trail search from one start node.
#[derive(Debug, Clone)]
pub struct PathTraveller<S, F> {
    memory: Memory,
    success: S,
    failure: F,
    steps: usize,
    backtracks: usize,
}

impl<S, F> PathTraveller<S, F> {
    /// Prepare a search from `start`.
    ///
    /// Returns `None` if `start` has no connections to travel along.
    pub fn new<T, P>(graph: &Graph<T, P>, start: NodeId, success: S, failure: F) -> Option<Self>
    where
        S: Fn(&Memory, &Graph<T, P>) -> bool,
        F: Fn(&Memory, &Graph<T, P>) -> bool,
    {
        Some(Self {
            memory: Memory::new(graph, start)?,
            success,
            failure,
            steps: 0,
            backtracks: 0,
        })
    }

    /// Search until the success predicate holds.
    ///
    /// Each round steps forward once, then checks for success. A failed
    /// step, a dead end at the head, or the failure predicate sends the
    /// search back to the latest untried alternative. Returns `false`
    /// when no alternatives are left anywhere.
    pub fn travel_to_target<T, P>(&mut self, graph: &Graph<T, P>) -> bool
    where
        S: Fn(&Memory, &Graph<T, P>) -> bool,
        F: Fn(&Memory, &Graph<T, P>) -> bool,
    {
        loop {
            let forward = self.memory.onwards(graph);
            if forward {
                self.steps += 1;
            }

            if (self.success)(&self.memory, graph) {
                return true;
            }

            let dead_end = self
                .memory
                .head(graph)
                .is_none_or(|head| graph.node(head).is_endpoint());

            if !forward || dead_end || (self.failure)(&self.memory, graph) {
                self.backtracks += 1;
                trace!(depth = self.memory.len(), "backtracking");
                if !self.memory.revert() {
                    return false;
                }
            }
        }
    }

    /// The search state.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Number of successful forward steps taken.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Number of times the search backed up.
    #[must_use]
    pub const fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// The travelled route as an ordered path.
    ///
    /// Each prime is oriented so it is entered from the node the search
    /// stood on, which makes the result [writeable](Path::is_writeable)
    /// whenever the search succeeded.
    pub fn into_path<T, P>(self, graph: &mut Graph<T, P>) -> Path {
        for frame in self.memory.frames() {
            if graph.prime(frame.route()).entry_node() != frame.node() {
                graph.reverse_prime(frame.route());
            }
        }
        Path::new(self.memory.travelled())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::prime::PrimeId;

    /// Lollipop: stick `s` from an endpoint into a hub, and a two-prime
    /// loop `l1`, `l2` hanging off the hub.
    fn lollipop() -> (Graph<char, ()>, [PrimeId; 3], NodeId, NodeId) {
        let mut graph = Graph::new();
        let s = graph.add_prime('s', (), ());
        let l1 = graph.add_prime('1', (), ());
        let l2 = graph.add_prime('2', (), ());
        let hub = graph.prime(s).end_node();
        let l1_start = graph.prime(l1).start_node();
        let l2_end = graph.prime(l2).end_node();
        graph.merge_nodes(hub, l1_start);
        graph.merge_nodes(hub, l2_end);
        let far = graph.prime(l1).end_node();
        let l2_start = graph.prime(l2).start_node();
        graph.merge_nodes(far, l2_start);
        let tip = graph.prime(s).start_node();
        (graph, [s, l1, l2], tip, hub)
    }

    fn reaches(target: NodeId, count: usize) -> impl Fn(&Memory, &Graph<char, ()>) -> bool {
        move |memory: &Memory, graph: &Graph<char, ()>| {
            memory.len() == count && memory.head(graph) == Some(target)
        }
    }

    fn exceeds(count: usize) -> impl Fn(&Memory, &Graph<char, ()>) -> bool {
        move |memory: &Memory, _: &Graph<char, ()>| memory.len() > count
    }

    #[test]
    fn travels_from_tip_through_loop() {
        let (mut graph, [s, l1, l2], tip, hub) = lollipop();
        let mut traveller =
            PathTraveller::new(&graph, tip, reaches(hub, 3), exceeds(3)).unwrap();
        assert!(traveller.travel_to_target(&graph));
        assert_eq!(traveller.steps(), 2);

        let path = traveller.into_path(&mut graph);
        assert_eq!(path.primes(), &[s, l1, l2]);
        assert!(path.is_writeable(&graph));
    }

    #[test]
    fn backtracks_out_of_early_dead_end() {
        let (mut graph, [s, l1, l2], tip, hub) = lollipop();
        // From the hub the stick comes first and dead-ends immediately.
        let mut traveller =
            PathTraveller::new(&graph, hub, reaches(tip, 3), exceeds(3)).unwrap();
        assert!(traveller.travel_to_target(&graph));
        assert!(traveller.backtracks() > 0);

        let path = traveller.into_path(&mut graph);
        assert_eq!(path.len(), 3);
        assert_eq!(path.primes().last(), Some(&s));
        assert!(path.contains(l1) && path.contains(l2));
        assert!(path.is_writeable(&graph));
        assert!(graph.prime(s).is_reversed());
    }

    #[test]
    fn unreachable_target_exhausts() {
        let (graph, _, tip, _) = lollipop();
        let mut traveller =
            PathTraveller::new(&graph, tip, reaches(tip, 3), exceeds(3)).unwrap();
        assert!(!traveller.travel_to_target(&graph));
        assert!(traveller.memory().is_empty());
    }

    #[test]
    fn new_fails_without_connections() {
        let mut graph: Graph<char, ()> = Graph::new();
        let p = graph.add_prime('p', (), ());
        let start = graph.prime(p).start_node();
        let end = graph.prime(p).end_node();
        graph.merge_nodes(end, start);
        assert!(PathTraveller::new(&graph, start, reaches(start, 1), exceeds(1)).is_none());
    }
}
