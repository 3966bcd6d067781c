//! Turn ordered paths back into a flat sequence of primitives.
//!
//! All iterators here are lazy: nothing is cloned or reversed until the
//! consumer pulls the next item.

use crate::graph::Graph;
use crate::path::Path;
use crate::types::{Jump, Position, Reversible, Step};

/// The values of one path, in order, each oriented in the direction of
/// travel.
///
/// The path must already be ordered; see
/// [`Path::is_writeable`](crate::path::Path::is_writeable).
pub fn path_to_primitives<'g, T, P>(
    graph: &'g Graph<T, P>,
    path: &'g Path,
) -> impl Iterator<Item = T> + 'g
where
    T: Reversible + Clone,
{
    path.primes().iter().map(move |&id| {
        let prime = graph.prime(id);
        if prime.is_reversed() {
            prime.value().reversed()
        } else {
            prime.value().clone()
        }
    })
}

/// Pair every path with the jump needed to reach its start.
///
/// The first non-empty path never needs one. An empty path leaves the
/// previous position untouched.
fn with_jumps<'g, T, P, I>(
    graph: &'g Graph<T, P>,
    paths: I,
    limit: f64,
) -> impl Iterator<Item = (Option<Jump<P>>, &'g Path)> + 'g
where
    P: Position + 'g,
    I: IntoIterator<Item = &'g Path>,
    I::IntoIter: 'g,
{
    let mut position: Option<P> = None;
    paths.into_iter().map(move |path| {
        let jump = match (&position, path.start_point(graph)) {
            (Some(from), Some(to)) if from.distance(to) > limit => Some(Jump {
                from: from.clone(),
                to: to.clone(),
            }),
            _ => None,
        };
        if let Some(end) = path.end_point(graph) {
            position = Some(end.clone());
        }
        (jump, path)
    })
}

/// Flatten ordered paths into steps, inserting a [`Jump`] wherever the
/// gap between one path's end and the next path's start exceeds `limit`.
pub fn paths_to_primitives<'g, T, P, I>(
    graph: &'g Graph<T, P>,
    paths: I,
    limit: f64,
) -> impl Iterator<Item = Step<T, P>> + 'g
where
    T: Reversible + Clone + 'g,
    P: Position + 'g,
    I: IntoIterator<Item = &'g Path>,
    I::IntoIter: 'g,
{
    with_jumps(graph, paths, limit).flat_map(move |(jump, path)| {
        jump.map(Step::Jump)
            .into_iter()
            .chain(path_to_primitives(graph, path).map(Step::Primitive))
    })
}

/// Only the jumps [`paths_to_primitives`] would emit.
pub fn jumps<'g, T, P, I>(
    graph: &'g Graph<T, P>,
    paths: I,
    limit: f64,
) -> impl Iterator<Item = Jump<P>> + 'g
where
    P: Position + 'g,
    I: IntoIterator<Item = &'g Path>,
    I::IntoIter: 'g,
{
    with_jumps(graph, paths, limit).filter_map(|(jump, _)| jump)
}
