//! pathlink-segment: Pure trail segmentation (sans-IO).
//!
//! Turns an unordered collection of primitives (anything with a start
//! and an end point) into continuous, correctly oriented travel paths:
//! endpoints closer than a limit are joined -> the joined graph is
//! validated -> each connected component is decomposed into closed
//! loops and open trails -> the trails are flattened back into
//! primitives with explicit jumps between paths that do not touch.
//!
//! The graph is an arena ([`Graph`]) of [`Node`]s and [`Prime`]s that
//! refer to each other by index. Trails are found with an explicit
//! backtracking search ([`Memory`], [`PathTraveller`]).
//!
//! This crate has **no I/O dependencies**. Rendering lives in
//! `pathlink-export`, file handling in `pathlink-bench`.

pub mod diagnostics;
pub mod flatten;
pub mod graph;
pub mod memory;
pub mod node;
pub mod path;
pub mod prime;
pub mod segmenter;
pub mod traveller;
pub mod types;

pub use diagnostics::{SegmentDiagnostics, SegmentSummary};
pub use flatten::{path_to_primitives, paths_to_primitives};
pub use graph::Graph;
pub use memory::Memory;
pub use node::{Node, NodeId};
pub use path::Path;
pub use prime::{Prime, PrimeId};
pub use segmenter::{Connectivity, PathSegmenter, Segmentation, junction_locations};
pub use traveller::PathTraveller;
pub use types::{
    Endpoints, Jump, Line, Point, Polyline, Position, Reversible, SegmentError, SegmenterConfig,
    Step,
};

/// Segment primitives using arbitrary endpoint accessors.
///
/// `start` and `end` read a primitive's native endpoints. Two endpoints
/// are joined when they are strictly closer than `limit`.
///
/// # Errors
///
/// See [`PathSegmenter::segment`].
pub fn segment_by<T, P, S, E>(
    primitives: impl IntoIterator<Item = T>,
    limit: f64,
    start: S,
    end: E,
) -> Result<Segmentation<T, P>, SegmentError>
where
    S: Fn(&T) -> P,
    E: Fn(&T) -> P,
    P: Position,
{
    PathSegmenter::new(limit, start, end).segment(primitives)
}

/// Segment primitives that know their own endpoints.
///
/// # Errors
///
/// See [`PathSegmenter::segment`].
pub fn segment<T: Endpoints>(
    primitives: impl IntoIterator<Item = T>,
    config: &SegmenterConfig,
) -> Result<Segmentation<T, T::Point>, SegmentError> {
    segment_by(primitives, config.limit, T::start_point, T::end_point)
}

/// Like [`segment`], also returning timing and search counts.
///
/// # Errors
///
/// See [`PathSegmenter::segment`].
pub fn segment_with_diagnostics<T: Endpoints>(
    primitives: impl IntoIterator<Item = T>,
    config: &SegmenterConfig,
) -> Result<(Segmentation<T, T::Point>, SegmentDiagnostics), SegmentError> {
    PathSegmenter::new(config.limit, T::start_point, T::end_point)
        .segment_with_diagnostics(primitives)
}
