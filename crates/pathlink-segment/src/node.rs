//! Node: the entrance to or exit from one or more primes.

use crate::prime::PrimeId;

/// Identity handle for a [`Node`] in a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its graph's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A junction or endpoint of the graph.
///
/// Holds one entry per prime endpoint that touches it, so a self-loop
/// prime is listed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    connections: Vec<PrimeId>,
}

impl Node {
    pub(crate) const fn new(connections: Vec<PrimeId>) -> Self {
        Self { connections }
    }

    /// Primes touching this node, in connection order.
    #[must_use]
    pub fn connections(&self) -> &[PrimeId] {
        &self.connections
    }

    /// Number of prime endpoints at this node.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Only one connection, so any trail reaching it must stop.
    #[must_use]
    pub const fn is_endpoint(&self) -> bool {
        self.connections.len() == 1
    }

    /// Odd number of connections, so some trail must stop here.
    ///
    /// Endpoints count as junctions.
    #[must_use]
    pub const fn is_junction(&self) -> bool {
        self.connections.len() % 2 == 1
    }

    /// Whether anything still touches this node. A node merged into
    /// another is left with no connections.
    #[must_use]
    pub const fn has_connections(&self) -> bool {
        !self.connections.is_empty()
    }

    /// The `i`th connection, if any.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<PrimeId> {
        self.connections.get(i).copied()
    }

    /// Whether `prime` touches this node.
    #[must_use]
    pub fn contains(&self, prime: PrimeId) -> bool {
        self.connections.contains(&prime)
    }

    pub(crate) fn add_connection(&mut self, prime: PrimeId) {
        self.connections.push(prime);
    }

    pub(crate) fn connections_mut(&mut self) -> &mut Vec<PrimeId> {
        &mut self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_connection_is_endpoint_and_junction() {
        let node = Node::new(vec![PrimeId(0)]);
        assert_eq!(node.degree(), 1);
        assert!(node.is_endpoint());
        assert!(node.is_junction());
    }

    #[test]
    fn two_connections_pass_through() {
        let node = Node::new(vec![PrimeId(0), PrimeId(1)]);
        assert!(!node.is_endpoint());
        assert!(!node.is_junction());
    }

    #[test]
    fn three_connections_branch() {
        let node = Node::new(vec![PrimeId(0), PrimeId(1), PrimeId(2)]);
        assert!(!node.is_endpoint());
        assert!(node.is_junction());
    }

    #[test]
    fn self_loop_counts_twice() {
        let mut node = Node::default();
        node.add_connection(PrimeId(3));
        node.add_connection(PrimeId(3));
        assert_eq!(node.degree(), 2);
        assert!(!node.is_junction());
        assert!(node.contains(PrimeId(3)));
    }

    #[test]
    fn empty_node_has_no_connections() {
        let node = Node::default();
        assert!(!node.has_connections());
        assert!(!node.is_junction());
        assert_eq!(node.get(0), None);
    }
}
