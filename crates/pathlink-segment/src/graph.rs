//! Arena holding every [`Node`] and [`Prime`] of a segmentation.
//!
//! Nodes and primes refer to each other by index ([`NodeId`],
//! [`PrimeId`]). Merging and severing nodes rewrites those indices
//! instead of moving references around, so a node that has been merged
//! away simply ends up with no connections and is never handed out
//! again.

use std::collections::HashSet;

use crate::node::{Node, NodeId};
use crate::prime::{Prime, PrimeId};

/// Nodes and primes of one segmentation run.
#[derive(Debug, Clone)]
pub struct Graph<T, P> {
    nodes: Vec<Node>,
    primes: Vec<Prime<T, P>>,
}

impl<T, P> Default for Graph<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> Graph<T, P> {
    /// Create an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            primes: Vec::new(),
        }
    }

    /// Create an empty graph with room for `primes` primes and their nodes.
    #[must_use]
    pub fn with_capacity(primes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(primes * 2),
            primes: Vec::with_capacity(primes),
        }
    }

    /// Wrap `value` in a new prime with two fresh single-connection nodes.
    pub fn add_prime(&mut self, value: T, start: P, end: P) -> PrimeId {
        let id = PrimeId(self.primes.len());
        let start_node = self.push_node(Node::new(vec![id]));
        let end_node = self.push_node(Node::new(vec![id]));
        self.primes
            .push(Prime::new(value, start, end, start_node, end_node));
        id
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Number of primes ever added.
    #[must_use]
    pub const fn prime_count(&self) -> usize {
        self.primes.len()
    }

    /// Number of node slots, including merged-away nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Look up a prime.
    #[must_use]
    pub fn prime(&self, id: PrimeId) -> &Prime<T, P> {
        &self.primes[id.0]
    }

    /// All prime handles in creation order.
    pub fn prime_ids(&self) -> impl Iterator<Item = PrimeId> + use<T, P> {
        (0..self.primes.len()).map(PrimeId)
    }

    /// Append `prime` to `node`'s connection list.
    pub fn add_connection(&mut self, node: NodeId, prime: PrimeId) {
        self.nodes[node.0].add_connection(prime);
    }

    /// Merge `other` into `keep`.
    ///
    /// Every connection of `other` moves to `keep` and every prime that
    /// referenced `other` now references `keep`. Returns the surviving
    /// node, which callers must use in place of `other` from now on.
    /// Merging a node with itself changes nothing.
    pub fn merge_nodes(&mut self, keep: NodeId, other: NodeId) -> NodeId {
        if keep == other {
            return keep;
        }

        let moved = std::mem::take(self.nodes[other.0].connections_mut());
        let mut seen = HashSet::with_capacity(moved.len());
        for &prime in &moved {
            if seen.insert(prime) {
                self.primes[prime.0].replace_node(other, keep);
            }
        }
        self.nodes[keep.0].connections_mut().extend(moved);
        keep
    }

    /// Split the connections to `primes` off `node` into a new node.
    ///
    /// The matched primes are rewired to the new node and removed from
    /// `node`. `primes` need not be a subset of the node's connections;
    /// a set with no overlap produces a node with no connections.
    pub fn sever(&mut self, node: NodeId, primes: &[PrimeId]) -> NodeId {
        let targets: HashSet<PrimeId> = primes.iter().copied().collect();

        let (moved, kept): (Vec<PrimeId>, Vec<PrimeId>) = self.nodes[node.0]
            .connections()
            .iter()
            .copied()
            .partition(|prime| targets.contains(prime));
        *self.nodes[node.0].connections_mut() = kept;

        let new_node = self.push_node(Node::default());
        let mut seen = HashSet::with_capacity(moved.len());
        for &prime in &moved {
            if seen.insert(prime) {
                self.primes[prime.0].replace_node(node, new_node);
            }
        }
        *self.nodes[new_node.0].connections_mut() = moved;
        new_node
    }

    /// The node across `prime` from `node`, or `None` if `prime` does
    /// not touch `node`.
    #[must_use]
    pub fn traverse(&self, node: NodeId, prime: PrimeId) -> Option<NodeId> {
        self.node(node)
            .contains(prime)
            .then(|| self.prime(prime).traverse_from(node))
    }

    /// The node across `node`'s `i`th connection.
    #[must_use]
    pub fn traverse_index(&self, node: NodeId, i: usize) -> Option<NodeId> {
        self.node(node)
            .get(i)
            .map(|prime| self.prime(prime).traverse_from(node))
    }

    /// Flip the direction of travel of `prime`.
    pub fn reverse_prime(&mut self, prime: PrimeId) {
        self.primes[prime.0].reverse();
    }

    /// Point `prime`'s references to `old` at `new`.
    ///
    /// Only rewires the prime; connection lists are left alone.
    pub fn replace_node(&mut self, prime: PrimeId, old: NodeId, new: NodeId) {
        self.primes[prime.0].replace_node(old, new);
    }
}
