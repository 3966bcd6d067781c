//! Prime: a single, non-divisible unit of a path and the edge of the
//! segmentation graph.
//!
//! A prime wraps one input primitive. Its two endpoints are
//! [`Node`](crate::node::Node)s referenced by [`NodeId`]; reversal is a
//! read-side flag that swaps which native endpoint is reported as the
//! start and which as the end, without touching node identity.

use crate::node::NodeId;

/// Identity handle for a [`Prime`] in a [`Graph`](crate::graph::Graph).
///
/// Two primes wrapping equal values are still distinct: equality is
/// handle equality, never value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimeId(pub(crate) usize);

impl PrimeId {
    /// Position of the prime in its graph's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One directed edge of the graph, wrapping a single primitive.
#[derive(Debug, Clone)]
pub struct Prime<T, P> {
    value: T,
    native_start: P,
    native_end: P,
    start_node: NodeId,
    end_node: NodeId,
    reversed: bool,
}

impl<T, P> Prime<T, P> {
    pub(crate) const fn new(
        value: T,
        native_start: P,
        native_end: P,
        start_node: NodeId,
        end_node: NodeId,
    ) -> Self {
        Self {
            value,
            native_start,
            native_end,
            start_node,
            end_node,
            reversed: false,
        }
    }

    /// The wrapped primitive, in its native orientation.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Node at the primitive's native start.
    #[must_use]
    pub const fn start_node(&self) -> NodeId {
        self.start_node
    }

    /// Node at the primitive's native end.
    #[must_use]
    pub const fn end_node(&self) -> NodeId {
        self.end_node
    }

    /// Whether the prime is read in the opposite direction to its value.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Start position in the direction of travel.
    #[must_use]
    pub const fn start_point(&self) -> &P {
        if self.reversed {
            &self.native_end
        } else {
            &self.native_start
        }
    }

    /// End position in the direction of travel.
    #[must_use]
    pub const fn end_point(&self) -> &P {
        if self.reversed {
            &self.native_start
        } else {
            &self.native_end
        }
    }

    /// Node the prime is entered from in the direction of travel.
    #[must_use]
    pub const fn entry_node(&self) -> NodeId {
        if self.reversed {
            self.end_node
        } else {
            self.start_node
        }
    }

    /// Node the prime is left through in the direction of travel.
    #[must_use]
    pub const fn exit_node(&self) -> NodeId {
        if self.reversed {
            self.start_node
        } else {
            self.end_node
        }
    }

    /// Native position of whichever end of the prime touches `node`.
    ///
    /// Falls back to the native end when `node` is not one of the
    /// prime's endpoints.
    #[must_use]
    pub fn native_point_at(&self, node: NodeId) -> &P {
        if node == self.start_node {
            &self.native_start
        } else {
            &self.native_end
        }
    }

    /// Flip the direction of travel.
    pub const fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Point every endpoint that referenced `old` at `new` instead.
    ///
    /// Both ends are checked so a self-loop is rewired completely.
    pub(crate) fn replace_node(&mut self, old: NodeId, new: NodeId) {
        if self.end_node == old {
            self.end_node = new;
        }
        if self.start_node == old {
            self.start_node = new;
        }
    }

    /// The node on the other side of the prime from `node`.
    #[must_use]
    pub fn traverse_from(&self, node: NodeId) -> NodeId {
        if self.end_node == node {
            self.start_node
        } else {
            self.end_node
        }
    }
}
