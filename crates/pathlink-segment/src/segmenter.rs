//! Build the segmentation graph from raw primitives and decompose it
//! into ordered trails.
//!
//! # Steps
//!
//! 1. Measure every endpoint against every other endpoint
//!    ([`Connectivity`]).
//! 2. Wrap each primitive in a single-prime [`Path`].
//! 3. Merge the nodes of every connected endpoint pair, folding the
//!    paths they belong to into one.
//! 4. Check every connected component has an even junction count.
//! 5. Order each component: cyclical components as one loop, branching
//!    components by peeling trails off until what is left is cyclical
//!    or direct.

use std::collections::VecDeque;
use std::time::Duration;

use petgraph::unionfind::UnionFind;
use tracing::{debug, info};
use web_time::Instant;

use crate::diagnostics::{SegmentDiagnostics, SegmentSummary};
use crate::flatten;
use crate::graph::Graph;
use crate::memory::Memory;
use crate::node::NodeId;
use crate::path::Path;
use crate::prime::PrimeId;
use crate::traveller::PathTraveller;
use crate::types::{
    Jump, Position, Reversible, SegmentError, SegmenterConfig, Step, search_kind,
};

/// Pairwise endpoint distances and the resulting "joined" flags.
///
/// Endpoint `2 * i` is the start of primitive `i` and `2 * i + 1` its
/// end. A primitive's own two endpoints are never joined to each other,
/// so their cost is infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectivity {
    size: usize,
    cost: Vec<f64>,
    connects: Vec<bool>,
}

impl Connectivity {
    /// Measure every pair of endpoints. `ends` holds the native start and
    /// end of each primitive.
    #[must_use]
    pub fn new<P: Position>(ends: &[(P, P)], limit: f64) -> Self {
        let size = ends.len() * 2;
        let mut cost = vec![f64::INFINITY; size * size];
        let mut connects = vec![false; size * size];

        let endpoint = |e: usize| {
            let (start, end) = &ends[e / 2];
            if e % 2 == 0 { start } else { end }
        };

        for a in 0..size {
            for b in (a + 1)..size {
                if a / 2 == b / 2 {
                    continue;
                }
                let distance = endpoint(a).distance(endpoint(b));
                cost[a * size + b] = distance;
                cost[b * size + a] = distance;
                let joined = distance < limit;
                connects[a * size + b] = joined;
                connects[b * size + a] = joined;
            }
        }

        Self {
            size,
            cost,
            connects,
        }
    }

    /// Number of endpoints (twice the number of primitives).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if there were no primitives.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance between endpoints `a` and `b`.
    #[must_use]
    pub fn cost(&self, a: usize, b: usize) -> f64 {
        self.cost[a * self.size + b]
    }

    /// Whether endpoints `a` and `b` are joined.
    #[must_use]
    pub fn connects(&self, a: usize, b: usize) -> bool {
        self.connects[a * self.size + b]
    }

    /// Number of joined endpoint pairs.
    #[must_use]
    pub fn connected_pairs(&self) -> usize {
        self.connects.iter().filter(|&&c| c).count() / 2
    }
}

/// Which end of a primitive an endpoint index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Start,
    End,
}

impl End {
    const fn endpoint(self, primitive: usize) -> usize {
        match self {
            Self::Start => 2 * primitive,
            Self::End => 2 * primitive + 1,
        }
    }

    fn node<T, P>(self, graph: &Graph<T, P>, prime: PrimeId) -> NodeId {
        match self {
            Self::Start => graph.prime(prime).start_node(),
            Self::End => graph.prime(prime).end_node(),
        }
    }
}

/// The four ways two primitives can touch, in the order they are joined.
const COMBINATIONS: [(End, End); 4] = [
    (End::Start, End::Start),
    (End::End, End::Start),
    (End::Start, End::End),
    (End::End, End::End),
];

/// Fail if both ends of one primitive collapse onto a single end of the
/// other.
fn check_degenerate(
    connectivity: &Connectivity,
    i: usize,
    j: usize,
    limit: f64,
) -> Result<(), SegmentError> {
    let collapses = |p: usize, onto: usize| {
        [End::Start, End::End].into_iter().any(|end| {
            let target = end.endpoint(onto);
            connectivity.connects(End::Start.endpoint(p), target)
                && connectivity.connects(End::End.endpoint(p), target)
        })
    };

    if collapses(j, i) {
        return Err(SegmentError::DegenerateConnection {
            limit,
            primitive: j,
            other: i,
        });
    }
    if collapses(i, j) {
        return Err(SegmentError::DegenerateConnection {
            limit,
            primitive: i,
            other: j,
        });
    }
    Ok(())
}

/// Merge the nodes of every joined endpoint pair and collect the
/// connected components.
fn connect_paths<T, P>(
    graph: &mut Graph<T, P>,
    connectivity: &Connectivity,
    primes: &[PrimeId],
    limit: f64,
) -> Result<Vec<Path>, SegmentError> {
    let count = primes.len();
    let mut owners = UnionFind::<usize>::new(count);
    let mut paths: Vec<Option<Path>> = primes.iter().map(|&p| Some(Path::new([p]))).collect();

    for i in 0..count {
        for j in (i + 1)..count {
            check_degenerate(connectivity, i, j, limit)?;

            for (end_i, end_j) in COMBINATIONS {
                if !connectivity.connects(end_i.endpoint(i), end_j.endpoint(j)) {
                    continue;
                }

                let node_a = end_i.node(graph, primes[i]);
                let node_b = end_j.node(graph, primes[j]);
                let root_i = owners.find_mut(i);
                let root_j = owners.find_mut(j);

                let mut kept = paths[root_i].take().unwrap_or_default();
                let absorbed = if root_i == root_j {
                    Path::default()
                } else {
                    paths[root_j].take().unwrap_or_default()
                };
                kept.merge(graph, node_a, node_b, absorbed.primes());

                owners.union(root_i, root_j);
                paths[owners.find_mut(root_i)] = Some(kept);
            }
        }
    }

    Ok(paths.into_iter().flatten().collect())
}

/// Every component must have an even number of junctions.
fn check_parity<T, P>(graph: &Graph<T, P>, components: &[Path]) -> Result<(), SegmentError> {
    for (component, path) in components.iter().enumerate() {
        let junctions = path.junctions(graph).len();
        if junctions % 2 == 1 {
            return Err(SegmentError::OddJunctionCount {
                junctions,
                component,
            });
        }
    }
    Ok(())
}

/// Search effort spent while ordering.
#[derive(Debug, Default)]
struct Tally {
    steps: usize,
    backtracks: usize,
    peeled: usize,
}

/// Run one trail search and turn it into an oriented path.
fn search<T, P, S, F>(
    graph: &mut Graph<T, P>,
    start: NodeId,
    success: S,
    failure: F,
    exhausted: SegmentError,
    tally: &mut Tally,
) -> Result<Path, SegmentError>
where
    S: Fn(&Memory, &Graph<T, P>) -> bool,
    F: Fn(&Memory, &Graph<T, P>) -> bool,
{
    let Some(mut traveller) = PathTraveller::new(graph, start, success, failure) else {
        return Err(exhausted);
    };

    let found = traveller.travel_to_target(graph);
    tally.steps += traveller.steps();
    tally.backtracks += traveller.backtracks();
    if !found {
        return Err(exhausted);
    }
    Ok(traveller.into_path(graph))
}

/// Order a path with no junctions as one closed loop.
fn order_cyclical<T, P>(
    graph: &mut Graph<T, P>,
    path: &Path,
    tally: &mut Tally,
) -> Result<Path, SegmentError> {
    let count = path.len();
    let exhausted = SegmentError::SearchExhausted {
        what: search_kind::CYCLICAL,
        primes: count,
    };
    let Some(&start) = path.nodes(graph).first() else {
        return Err(exhausted);
    };

    search(
        graph,
        start,
        move |memory, graph| memory.len() == count && memory.head(graph) == Some(start),
        move |memory, _| memory.len() > count,
        exhausted,
        tally,
    )
}

/// Order a path with exactly two junctions from one to the other.
fn order_direct<T, P>(
    graph: &mut Graph<T, P>,
    path: &Path,
    tally: &mut Tally,
) -> Result<Path, SegmentError> {
    let junctions = path.junctions(graph);
    let [from, to] = *junctions.as_slice() else {
        return Err(SegmentError::NotDirect {
            junctions: junctions.len(),
        });
    };

    let count = path.len();
    search(
        graph,
        from,
        move |memory, graph| memory.len() == count && memory.head(graph) == Some(to),
        move |memory, _| memory.len() > count,
        SegmentError::SearchExhausted {
            what: search_kind::DIRECT,
            primes: count,
        },
        tally,
    )
}

/// Find one non-branching trail from an endpoint (or, failing that, a
/// junction) to some other junction.
fn peel<T, P>(
    graph: &mut Graph<T, P>,
    path: &Path,
    junctions: &[NodeId],
    tally: &mut Tally,
) -> Result<Path, SegmentError> {
    let count = path.len();
    let exhausted = SegmentError::SearchExhausted {
        what: search_kind::BRANCH,
        primes: count,
    };
    let Some(start) = path
        .endpoints(graph)
        .first()
        .or_else(|| junctions.first())
        .copied()
    else {
        return Err(exhausted);
    };

    search(
        graph,
        start,
        move |memory, graph| {
            memory
                .head(graph)
                .is_some_and(|head| head != start && graph.node(head).is_junction())
        },
        move |memory, _| memory.len() > count,
        exhausted,
        tally,
    )
}

/// Break a component with junctions into ordered trails.
///
/// Trails are peeled off one at a time. Whatever remains is split into
/// its connected pieces, and each piece is ordered as a loop, ordered
/// directly, or peeled again.
fn order_branching<T, P>(
    graph: &mut Graph<T, P>,
    component: Path,
    tally: &mut Tally,
) -> Result<Vec<Path>, SegmentError> {
    let mut ordered = Vec::new();
    let mut pending = VecDeque::from([component]);

    while let Some(mut piece) = pending.pop_front() {
        if piece.is_cyclical(graph) {
            ordered.push(order_cyclical(graph, &piece, tally)?);
            continue;
        }

        let junctions = piece.junctions(graph);
        if junctions.len() == 2 {
            ordered.push(order_direct(graph, &piece, tally)?);
            continue;
        }

        let trail = peel(graph, &piece, &junctions, tally)?;
        piece.subtract(graph, &trail);
        tally.peeled += 1;
        debug!(
            primes = trail.len(),
            remaining = piece.len(),
            junctions = junctions.len(),
            "peeled trail"
        );
        ordered.push(trail);

        for rest in piece.components(graph).into_iter().rev() {
            pending.push_front(rest);
        }
    }

    Ok(ordered)
}

/// Physical positions of `path`'s junctions.
///
/// Each junction is located at the native endpoint of its first
/// connection, so the result depends on the limit used to join nodes.
#[must_use]
pub fn junction_locations<T, P: Clone>(graph: &Graph<T, P>, path: &Path) -> Vec<P> {
    path.junctions(graph)
        .into_iter()
        .filter_map(|node| {
            let prime = graph.node(node).get(0)?;
            Some(graph.prime(prime).native_point_at(node).clone())
        })
        .collect()
}

/// Splits a list of primitives into ordered cyclical and direct paths.
///
/// `start` and `end` read the native endpoints of a primitive. Two
/// endpoints are joined when they are strictly closer than `limit`.
#[derive(Debug, Clone)]
pub struct PathSegmenter<S, E> {
    limit: f64,
    start: S,
    end: E,
}

impl<S, E> PathSegmenter<S, E> {
    /// Create a segmenter.
    #[must_use]
    pub const fn new(limit: f64, start: S, end: E) -> Self {
        Self { limit, start, end }
    }

    /// The joining distance.
    #[must_use]
    pub const fn limit(&self) -> f64 {
        self.limit
    }

    /// Wrap `value` in a fresh prime and return it as a one-prime path.
    pub fn generate_path<T, P>(&self, graph: &mut Graph<T, P>, value: T) -> Path
    where
        S: Fn(&T) -> P,
        E: Fn(&T) -> P,
    {
        let start = (self.start)(&value);
        let end = (self.end)(&value);
        Path::new([graph.add_prime(value, start, end)])
    }

    /// Segment `primitives` into ordered paths.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidLimit`] for a limit that is not
    /// finite and positive, [`SegmentError::DegenerateConnection`] when a
    /// primitive collapses onto another's endpoint,
    /// [`SegmentError::OddJunctionCount`] for a component that cannot be
    /// split into trails, and [`SegmentError::SearchExhausted`] when a
    /// trail search runs out of alternatives.
    pub fn segment<T, P>(
        &self,
        primitives: impl IntoIterator<Item = T>,
    ) -> Result<Segmentation<T, P>, SegmentError>
    where
        S: Fn(&T) -> P,
        E: Fn(&T) -> P,
        P: Position,
    {
        self.segment_with_diagnostics(primitives)
            .map(|(segmentation, _)| segmentation)
    }

    /// Segment `primitives` and report timing and search counts.
    ///
    /// # Errors
    ///
    /// See [`segment`](Self::segment).
    pub fn segment_with_diagnostics<T, P>(
        &self,
        primitives: impl IntoIterator<Item = T>,
    ) -> Result<(Segmentation<T, P>, SegmentDiagnostics), SegmentError>
    where
        S: Fn(&T) -> P,
        E: Fn(&T) -> P,
        P: Position,
    {
        SegmenterConfig { limit: self.limit }.validate()?;
        let total_start = Instant::now();

        // 1-2. Wrap primitives and measure endpoints.
        let start = Instant::now();
        let mut graph = Graph::new();
        let primes: Vec<PrimeId> = primitives
            .into_iter()
            .flat_map(|value| self.generate_path(&mut graph, value).primes().to_vec())
            .collect();
        let ends: Vec<(P, P)> = primes
            .iter()
            .map(|&id| {
                let prime = graph.prime(id);
                (prime.start_point().clone(), prime.end_point().clone())
            })
            .collect();
        let connectivity = Connectivity::new(&ends, self.limit);
        let matrix = start.elapsed();

        // 3. Join connected endpoints.
        let start = Instant::now();
        let components = connect_paths(&mut graph, &connectivity, &primes, self.limit)?;
        let union = start.elapsed();

        // 4-5. Validate and order.
        let start = Instant::now();
        check_parity(&graph, &components)?;

        let component_count = components.len();
        let mut tally = Tally::default();
        let mut cyclical = Vec::new();
        let mut direct = Vec::new();
        for (index, component) in components.into_iter().enumerate() {
            let junctions = component.junctions(&graph).len();
            debug!(
                component = index,
                primes = component.len(),
                junctions,
                "ordering component"
            );
            if junctions == 0 {
                cyclical.push(order_cyclical(&mut graph, &component, &mut tally)?);
            } else {
                direct.extend(order_branching(&mut graph, component, &mut tally)?);
            }
        }
        let decomposition = start.elapsed();

        let segmentation = Segmentation {
            graph,
            connectivity,
            cyclical,
            direct,
            limit: self.limit,
        };

        let summary = SegmentSummary {
            limit: self.limit,
            primitives: primes.len(),
            connected_pairs: segmentation.connectivity.connected_pairs(),
            components: component_count,
            cyclical: segmentation.cyclical.len(),
            direct: segmentation.direct.len(),
            peeled: tally.peeled,
            steps: tally.steps,
            backtracks: tally.backtracks,
            jumps: segmentation.jumps().count(),
        };
        let diagnostics = SegmentDiagnostics {
            matrix,
            union,
            decomposition,
            total_duration: total_start.elapsed(),
            summary,
        };

        info!(
            primitives = diagnostics.summary.primitives,
            components = diagnostics.summary.components,
            cyclical = diagnostics.summary.cyclical,
            direct = diagnostics.summary.direct,
            jumps = diagnostics.summary.jumps,
            elapsed_ms = duration_ms(diagnostics.total_duration),
            "segmented"
        );

        Ok((segmentation, diagnostics))
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// The outcome of one segmentation: the graph the paths live in and the
/// ordered paths themselves.
#[derive(Debug, Clone)]
pub struct Segmentation<T, P> {
    graph: Graph<T, P>,
    connectivity: Connectivity,
    cyclical: Vec<Path>,
    direct: Vec<Path>,
    limit: f64,
}

impl<T, P> Segmentation<T, P> {
    /// The graph every path refers into.
    #[must_use]
    pub const fn graph(&self) -> &Graph<T, P> {
        &self.graph
    }

    /// Endpoint distances the graph was built from.
    #[must_use]
    pub const fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Closed loops.
    #[must_use]
    pub fn cyclical(&self) -> &[Path] {
        &self.cyclical
    }

    /// Trails running between two junctions.
    #[must_use]
    pub fn direct(&self) -> &[Path] {
        &self.direct
    }

    /// All ordered paths: loops first, then direct trails.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.cyclical.iter().chain(&self.direct)
    }

    /// Total number of ordered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cyclical.len() + self.direct.len()
    }

    /// Returns `true` if there are no paths at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The joining distance used.
    #[must_use]
    pub const fn limit(&self) -> f64 {
        self.limit
    }

    /// Physical positions of `path`'s junctions.
    #[must_use]
    pub fn junction_locations(&self, path: &Path) -> Vec<P>
    where
        P: Clone,
    {
        junction_locations(&self.graph, path)
    }

    /// Jumps needed between consecutive paths.
    pub fn jumps(&self) -> impl Iterator<Item = Jump<P>> + '_
    where
        P: Position,
    {
        flatten::jumps(&self.graph, self.paths(), self.limit)
    }

    /// Flatten every path into primitives and jumps.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::NotWriteable`] if a path is not ordered.
    pub fn to_steps(&self) -> Result<Vec<Step<T, P>>, SegmentError>
    where
        T: Reversible + Clone,
        P: Position,
    {
        if let Some(index) = self.paths().position(|path| !path.is_writeable(&self.graph)) {
            return Err(SegmentError::NotWriteable { index });
        }
        Ok(flatten::paths_to_primitives(&self.graph, self.paths(), self.limit).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Line, Point};

    type Seg = Line<Point>;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Seg {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn segmenter() -> PathSegmenter<impl Fn(&Seg) -> Point, impl Fn(&Seg) -> Point> {
        PathSegmenter::new(0.1, |l: &Seg| l.start, |l: &Seg| l.end)
    }

    // --- Connectivity ---

    #[test]
    fn connectivity_is_symmetric_with_infinite_self_cost() {
        let ends = [
            (Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            (Point::new(1.0, 0.0), Point::new(1.0, 3.0)),
        ];
        let c = Connectivity::new(&ends, 0.5);
        assert_eq!(c.len(), 4);
        for a in 0..4 {
            assert!(c.cost(a, a).is_infinite());
            for b in 0..4 {
                assert_eq!(c.cost(a, b).to_bits(), c.cost(b, a).to_bits());
                assert_eq!(c.connects(a, b), c.connects(b, a));
            }
        }
        assert!(c.cost(0, 1).is_infinite());
        assert!(c.cost(2, 3).is_infinite());
        assert!((c.cost(1, 3) - 3.0).abs() < 1e-12);
        assert!(c.connects(1, 2));
        assert!(!c.connects(0, 2));
        assert_eq!(c.connected_pairs(), 1);
    }

    #[test]
    fn connectivity_limit_is_strict() {
        let ends = [
            (Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            (Point::new(1.5, 0.0), Point::new(3.0, 0.0)),
        ];
        assert!(!Connectivity::new(&ends, 0.5).connects(1, 2));
        assert!(Connectivity::new(&ends, 0.51).connects(1, 2));
    }

    // --- Validation ---

    #[test]
    fn degenerate_detected_in_either_order() {
        let short = line(0.0, 0.0, 0.05, 0.0);
        let long = line(0.02, 0.0, 5.0, 0.0);

        for primitives in [vec![short, long], vec![long, short]] {
            let err = segmenter().segment(primitives).unwrap_err();
            assert!(
                matches!(err, SegmentError::DegenerateConnection { .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn degenerate_reports_collapsing_primitive() {
        let long = line(0.02, 0.0, 5.0, 0.0);
        let short = line(0.0, 0.0, 0.05, 0.0);
        let err = segmenter().segment([long, short]).unwrap_err();
        assert_eq!(
            err,
            SegmentError::DegenerateConnection {
                limit: 0.1,
                primitive: 1,
                other: 0,
            }
        );
    }

    #[test]
    fn invalid_limit_rejected() {
        let seg = PathSegmenter::new(0.0, |l: &Seg| l.start, |l: &Seg| l.end);
        assert_eq!(
            seg.segment([line(0.0, 0.0, 1.0, 0.0)]).unwrap_err(),
            SegmentError::InvalidLimit(0.0)
        );
    }

    #[test]
    fn parity_check_flags_odd_component() {
        let mut graph: Graph<(), f64> = Graph::new();
        let a = graph.add_prime((), 0.0, 1.0);
        let b = graph.add_prime((), 1.0, 2.0);
        let a_end = graph.prime(a).end_node();
        let b_start = graph.prime(b).start_node();
        let hub = graph.merge_nodes(a_end, b_start);
        // A dangling extra connection leaves one odd node behind.
        graph.add_connection(hub, a);

        let components = vec![Path::new([a, b])];
        assert_eq!(
            check_parity(&graph, &components),
            Err(SegmentError::OddJunctionCount {
                junctions: 3,
                component: 0,
            })
        );
    }

    #[test]
    fn order_direct_rejects_branching_path() {
        let mut graph: Graph<(), f64> = Graph::new();
        let a = graph.add_prime((), 0.0, 1.0);
        let b = graph.add_prime((), 1.0, 2.0);
        let c = graph.add_prime((), 1.0, 3.0);
        let hub = graph.prime(a).end_node();
        let b_start = graph.prime(b).start_node();
        let c_start = graph.prime(c).start_node();
        graph.merge_nodes(hub, b_start);
        graph.merge_nodes(hub, c_start);

        let err = order_direct(&mut graph, &Path::new([a, b, c]), &mut Tally::default());
        assert_eq!(err, Err(SegmentError::NotDirect { junctions: 4 }));
    }

    // --- Ordering ---

    #[test]
    fn empty_input_is_empty_segmentation() {
        let result = segmenter().segment(Vec::<Seg>::new()).unwrap();
        assert!(result.is_empty());
        assert!(result.connectivity().is_empty());
        assert!(result.to_steps().unwrap().is_empty());
    }

    #[test]
    fn end_to_end_join_reverses_second_line() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(2.0, 0.0, 1.0, 0.0);
        let result = segmenter().segment([a, b]).unwrap();

        assert!(result.cyclical().is_empty());
        assert_eq!(result.direct().len(), 1);
        assert_eq!(result.direct()[0].len(), 2);

        let steps = result.to_steps().unwrap();
        let values: Vec<Seg> = steps.iter().filter_map(|s| s.primitive().copied()).collect();
        assert_eq!(steps.len(), 2);
        let joined = values[0].end.distance(&values[1].start);
        assert!(joined < 0.1, "gap {joined}");
    }

    #[test]
    fn square_is_one_loop() {
        let result = segmenter()
            .segment([
                line(0.0, 0.0, 1.0, 0.0),
                line(1.0, 1.0, 1.0, 0.0),
                line(1.0, 1.0, 0.0, 1.0),
                line(0.0, 0.0, 0.0, 1.0),
            ])
            .unwrap();

        assert_eq!(result.cyclical().len(), 1);
        assert!(result.direct().is_empty());
        let cycle = &result.cyclical()[0];
        assert_eq!(cycle.len(), 4);
        assert!(cycle.is_writeable(result.graph()));
    }

    #[test]
    fn cross_splits_into_two_trails() {
        // Four spokes meeting in the middle: one degree-4 hub, four tips.
        let result = segmenter()
            .segment([
                line(0.0, 0.0, 1.0, 0.0),
                line(0.0, 0.0, 0.0, 1.0),
                line(0.0, 0.0, -1.0, 0.0),
                line(0.0, 0.0, 0.0, -1.0),
            ])
            .unwrap();

        assert!(result.cyclical().is_empty());
        assert_eq!(result.direct().len(), 2);
        assert!(result.paths().all(|p| p.is_writeable(result.graph())));
        assert_eq!(result.paths().map(Path::len).sum::<usize>(), 4);
    }

    #[test]
    fn theta_is_one_direct_trail() {
        // Two triangles sharing one edge: the shared edge's ends have
        // degree 3, every other node degree 2.
        //
        //   (0,1)
        //   /  |  \
        // (-1,0)  | (1,0)
        //   \  |  /
        //   (0,-1)
        let result = segmenter()
            .segment([
                line(0.0, 1.0, 0.0, -1.0),
                line(0.0, 1.0, -1.0, 0.0),
                line(-1.0, 0.0, 0.0, -1.0),
                line(0.0, 1.0, 1.0, 0.0),
                line(1.0, 0.0, 0.0, -1.0),
            ])
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.direct()[0].len(), 5);
        assert!(result.direct()[0].is_writeable(result.graph()));
    }

    #[test]
    fn k4_needs_peeling_without_endpoints() {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let mut edges = Vec::new();
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                edges.push(Line::new(*a, *b));
            }
        }
        let (result, diagnostics) = segmenter().segment_with_diagnostics(edges).unwrap();

        assert_eq!(diagnostics.summary.peeled, 1);
        assert_eq!(result.direct().len(), 2);
        assert_eq!(result.paths().map(Path::len).sum::<usize>(), 6);
        assert!(result.paths().all(|p| p.is_writeable(result.graph())));
    }

    #[test]
    fn junction_locations_of_tee() {
        let result = segmenter()
            .segment([
                line(0.0, 0.0, 1.0, 0.0),
                line(1.0, 0.0, 2.0, 0.0),
                line(1.0, 0.0, 1.0, 1.0),
            ])
            .unwrap();
        let graph = result.graph();
        let everything = Path::new(graph.prime_ids());
        // After ordering the hub is severed, so every node is a tip.
        let locations = result.junction_locations(&everything);
        assert!(locations.contains(&Point::new(0.0, 0.0)));
        assert!(locations.contains(&Point::new(2.0, 0.0)));
        assert!(locations.contains(&Point::new(1.0, 1.0)));
    }

    #[test]
    fn diagnostics_count_components_and_jumps() {
        let (result, diagnostics) = segmenter()
            .segment_with_diagnostics([line(0.0, 0.0, 1.0, 0.0), line(5.0, 5.0, 6.0, 5.0)])
            .unwrap();
        assert_eq!(diagnostics.summary.primitives, 2);
        assert_eq!(diagnostics.summary.components, 2);
        assert_eq!(diagnostics.summary.connected_pairs, 0);
        assert_eq!(diagnostics.summary.jumps, 1);
        assert_eq!(result.jumps().count(), 1);
    }

    #[test]
    fn generate_path_wraps_one_prime() {
        let seg = segmenter();
        let mut graph = Graph::new();
        let path = seg.generate_path(&mut graph, line(0.0, 0.0, 3.0, 4.0));
        assert_eq!(path.len(), 1);
        let prime = graph.prime(path.primes()[0]);
        assert_eq!(*prime.end_point(), Point::new(3.0, 4.0));
        assert_eq!(graph.node(prime.start_node()).degree(), 1);
    }
}
