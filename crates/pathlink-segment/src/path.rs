//! Path: a collection of distinct primes forming one connected subgraph
//! or, once ordered, one trail that is executed front to back.
//!
//! A path only stores [`PrimeId`]s. Every query that needs topology
//! (nodes, junctions, orientation) reads it from the [`Graph`] the
//! primes live in.

use std::collections::{HashMap, HashSet};

use petgraph::unionfind::UnionFind;

use crate::graph::Graph;
use crate::node::NodeId;
use crate::prime::PrimeId;

/// A bag of distinct primes, optionally ordered as a trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    primes: Vec<PrimeId>,
}

impl Path {
    /// Create a path, dropping repeated primes but keeping first-seen order.
    #[must_use]
    pub fn new(primes: impl IntoIterator<Item = PrimeId>) -> Self {
        let mut seen = HashSet::new();
        Self {
            primes: primes.into_iter().filter(|p| seen.insert(*p)).collect(),
        }
    }

    /// The primes, in order.
    #[must_use]
    pub fn primes(&self) -> &[PrimeId] {
        &self.primes
    }

    /// Number of primes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.primes.len()
    }

    /// Returns `true` if the path holds no primes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Whether `prime` belongs to this path.
    #[must_use]
    pub fn contains(&self, prime: PrimeId) -> bool {
        self.primes.contains(&prime)
    }

    /// Distinct nodes touched by the path: start node then end node of
    /// each prime, in prime order.
    #[must_use]
    pub fn nodes<T, P>(&self, graph: &Graph<T, P>) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.primes
            .iter()
            .flat_map(|&p| {
                let prime = graph.prime(p);
                [prime.start_node(), prime.end_node()]
            })
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Nodes with an odd number of connections.
    #[must_use]
    pub fn junctions<T, P>(&self, graph: &Graph<T, P>) -> Vec<NodeId> {
        self.nodes(graph)
            .into_iter()
            .filter(|&n| graph.node(n).is_junction())
            .collect()
    }

    /// Nodes with exactly one connection.
    #[must_use]
    pub fn endpoints<T, P>(&self, graph: &Graph<T, P>) -> Vec<NodeId> {
        self.nodes(graph)
            .into_iter()
            .filter(|&n| graph.node(n).is_endpoint())
            .collect()
    }

    /// No junctions: the path closes on itself.
    #[must_use]
    pub fn is_cyclical<T, P>(&self, graph: &Graph<T, P>) -> bool {
        !self
            .nodes(graph)
            .iter()
            .any(|&n| graph.node(n).is_junction())
    }

    /// Exactly two junctions: the path runs from one to the other.
    #[must_use]
    pub fn is_direct<T, P>(&self, graph: &Graph<T, P>) -> bool {
        self.junctions(graph).len() == 2
    }

    /// Where the path starts in the direction of travel.
    #[must_use]
    pub fn start_point<'g, T, P>(&self, graph: &'g Graph<T, P>) -> Option<&'g P> {
        self.primes.first().map(|&p| graph.prime(p).start_point())
    }

    /// Where the path ends in the direction of travel.
    #[must_use]
    pub fn end_point<'g, T, P>(&self, graph: &'g Graph<T, P>) -> Option<&'g P> {
        self.primes.last().map(|&p| graph.prime(p).end_point())
    }

    /// Join this path to another by merging `node_b` into `node_a` and
    /// taking over `primes`. Returns the surviving node.
    pub fn merge<T, P>(
        &mut self,
        graph: &mut Graph<T, P>,
        node_a: NodeId,
        node_b: NodeId,
        primes: &[PrimeId],
    ) -> NodeId {
        let kept = graph.merge_nodes(node_a, node_b);
        for &p in primes {
            if !self.primes.contains(&p) {
                self.primes.push(p);
            }
        }
        kept
    }

    /// Remove `other`'s primes from this path and sever every node
    /// `other` touches, so `other` becomes a graph of its own and the
    /// remainder keeps only its own connections.
    ///
    /// `other` itself is not modified.
    pub fn subtract<T, P>(&mut self, graph: &mut Graph<T, P>, other: &Self) {
        let removed: HashSet<PrimeId> = other.primes.iter().copied().collect();
        self.primes.retain(|p| !removed.contains(p));

        for node in other.nodes(graph) {
            graph.sever(node, &other.primes);
        }
    }

    /// Rotate an ordered path so that `prime` comes first.
    ///
    /// Only meaningful for cyclical paths. Does nothing if `prime` is
    /// not part of the path.
    pub fn reorder_from(&mut self, prime: PrimeId) -> &mut Self {
        if let Some(index) = self.primes.iter().position(|&p| p == prime) {
            self.primes.rotate_left(index);
        }
        self
    }

    /// Run the path the other way: reverse the order and flip every prime.
    pub fn reverse<T, P>(&mut self, graph: &mut Graph<T, P>) -> &mut Self {
        self.primes.reverse();
        for &p in &self.primes {
            graph.reverse_prime(p);
        }
        self
    }

    /// Check the path is ordered and can be executed front to back.
    ///
    /// A direct path must start and end on junctions, and each prime
    /// must leave through the node the next prime is entered from.
    #[must_use]
    pub fn is_writeable<T, P>(&self, graph: &Graph<T, P>) -> bool {
        if self.is_direct(graph) {
            let starts_on_junction = self
                .primes
                .first()
                .is_some_and(|&p| graph.node(graph.prime(p).entry_node()).is_junction());
            let ends_on_junction = self
                .primes
                .last()
                .is_some_and(|&p| graph.node(graph.prime(p).exit_node()).is_junction());
            if !starts_on_junction || !ends_on_junction {
                return false;
            }
        }

        self.primes.windows(2).all(|pair| {
            let exit = graph.prime(pair[0]).exit_node();
            exit == graph.prime(pair[1]).entry_node() && graph.node(exit).contains(pair[1])
        })
    }

    /// Split the path into its connected pieces.
    ///
    /// Two primes are in the same piece when they share a node. Each
    /// piece keeps this path's prime order; pieces are returned in order
    /// of their first prime.
    #[must_use]
    pub fn components<T, P>(&self, graph: &Graph<T, P>) -> Vec<Self> {
        let local: HashMap<PrimeId, usize> = self
            .primes
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();

        let mut uf = UnionFind::<usize>::new(self.primes.len());
        for node in self.nodes(graph) {
            let mut members = graph
                .node(node)
                .connections()
                .iter()
                .filter_map(|p| local.get(p).copied());
            if let Some(first) = members.next() {
                for other in members {
                    uf.union(first, other);
                }
            }
        }

        let mut order: Vec<usize> = Vec::new();
        let mut groups: HashMap<usize, Vec<PrimeId>> = HashMap::new();
        for (i, &p) in self.primes.iter().enumerate() {
            let root = uf.find_mut(i);
            groups
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    Vec::new()
                })
                .push(p);
        }

        order
            .into_iter()
            .filter_map(|root| groups.remove(&root))
            .map(|primes| Self { primes })
            .collect()
    }
}
