//! Shared types for trail segmentation: positions, primitives, output
//! steps, configuration, and errors.

use serde::{Deserialize, Serialize};

/// A location in n-dimensional space that can measure Euclidean
/// distance to another location of the same type.
///
/// The segmenter only ever compares endpoint positions, so this is the
/// whole contract a vector type has to satisfy.
pub trait Position: Clone {
    /// Euclidean distance to `other`.
    fn distance(&self, other: &Self) -> f64;
}

/// A primitive with a native start and end position.
pub trait Endpoints {
    /// Position type of the primitive's endpoints.
    type Point: Position;

    /// Native start position.
    fn start_point(&self) -> Self::Point;

    /// Native end position.
    fn end_point(&self) -> Self::Point;
}

/// A primitive that can be produced with its start and end swapped.
pub trait Reversible {
    /// Return a copy of `self` running the opposite direction.
    #[must_use]
    fn reversed(&self) -> Self;
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

impl Position for Point {
    fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(*other).sqrt()
    }
}

impl<const N: usize> Position for [f64; N] {
    fn distance(&self, other: &Self) -> f64 {
        self.iter()
            .zip(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl Position for geo::Coord<f64> {
    fn distance(&self, other: &Self) -> f64 {
        use geo::Euclidean;
        use geo::line_measures::Distance;

        Euclidean.distance(&geo::Point::from(*self), &geo::Point::from(*other))
    }
}

/// A sequence of connected points: the usual primitive for plotters
/// and sand tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// An empty polyline reports the origin for both endpoints.
impl Endpoints for Polyline {
    type Point = Point;

    fn start_point(&self) -> Point {
        self.first().copied().unwrap_or(Point::new(0.0, 0.0))
    }

    fn end_point(&self) -> Point {
        self.last().copied().unwrap_or(Point::new(0.0, 0.0))
    }
}

impl Reversible for Polyline {
    fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }
}

/// A straight segment between two points of any [`Position`] type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line<P> {
    /// Start of the segment.
    pub start: P,
    /// End of the segment.
    pub end: P,
}

impl<P> Line<P> {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(start: P, end: P) -> Self {
        Self { start, end }
    }
}

impl<P: Position> Endpoints for Line<P> {
    type Point = P;

    fn start_point(&self) -> P {
        self.start.clone()
    }

    fn end_point(&self) -> P {
        self.end.clone()
    }
}

impl<P: Clone> Reversible for Line<P> {
    fn reversed(&self) -> Self {
        Self {
            start: self.end.clone(),
            end: self.start.clone(),
        }
    }
}

/// An explicit travel move between two paths that are not contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jump<P> {
    /// Where the previous path ended.
    pub from: P,
    /// Where the next path starts.
    pub to: P,
}

/// One item of flattened output: either a primitive to execute or a
/// jump between disconnected paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step<T, P> {
    /// A primitive, already oriented in the direction of travel.
    Primitive(T),
    /// A move with no primitive attached.
    Jump(Jump<P>),
}

impl<T, P> Step<T, P> {
    /// Returns `true` if this step is a [`Jump`].
    #[must_use]
    pub const fn is_jump(&self) -> bool {
        matches!(self, Self::Jump(_))
    }

    /// Returns the primitive, if this step carries one.
    #[must_use]
    pub const fn primitive(&self) -> Option<&T> {
        match self {
            Self::Primitive(value) => Some(value),
            Self::Jump(_) => None,
        }
    }
}

/// Configuration for segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Two endpoints are joined when their Euclidean distance is
    /// strictly below this value. Also the largest gap between
    /// consecutive output paths that is bridged without a [`Jump`].
    pub limit: f64,
}

impl SegmenterConfig {
    /// Default joining distance.
    pub const DEFAULT_LIMIT: f64 = 1e-3;

    /// Check that the limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidLimit`] if the limit is not a
    /// finite, strictly positive number.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.limit.is_finite() && self.limit > 0.0 {
            Ok(())
        } else {
            Err(SegmentError::InvalidLimit(self.limit))
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Errors raised by segmentation. All are fatal to the current call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    /// Both ends of one primitive join the same end of another.
    #[error(
        "invalid path: under the limit {limit}, primitive {primitive} connects to itself through \
         primitive {other}; make the limit smaller or remove the primitive"
    )]
    DegenerateConnection {
        /// The joining distance in use.
        limit: f64,
        /// Index of the primitive whose ends collapse together.
        primitive: usize,
        /// Index of the primitive both ends collapse onto.
        other: usize,
    },

    /// A connected component has an odd number of junctions.
    #[error("invalid path: component {component} has an odd number of junctions ({junctions})")]
    OddJunctionCount {
        /// Number of odd-degree nodes found.
        junctions: usize,
        /// Index of the offending component.
        component: usize,
    },

    /// The trail search backtracked to an empty stack.
    #[error("{what} path cannot be travelled ({primes} primes)")]
    SearchExhausted {
        /// Which kind of search failed.
        what: &'static str,
        /// Number of primes in the path being searched.
        primes: usize,
    },

    /// A path handed to direct ordering does not have exactly two junctions.
    #[error("path is not direct: expected 2 junctions, found {junctions}")]
    NotDirect {
        /// Number of junctions found.
        junctions: usize,
    },

    /// A path failed the ordering check before flattening.
    #[error("path {index} is not properly ordered for output")]
    NotWriteable {
        /// Position of the path in the flattened sequence.
        index: usize,
    },

    /// The configured limit is not finite and positive.
    #[error("invalid limit: {0} (must be finite and greater than zero)")]
    InvalidLimit(f64),
}

/// Serde-compatible proxy for `SegmentError`.
///
/// `SearchExhausted::what` is a `&'static str`, which cannot be
/// deserialized, so it travels as an owned string and is mapped back
/// onto the known search kinds.
#[derive(Serialize, Deserialize)]
enum SegmentErrorProxy {
    DegenerateConnection {
        limit: f64,
        primitive: usize,
        other: usize,
    },
    OddJunctionCount {
        junctions: usize,
        component: usize,
    },
    SearchExhausted {
        what: String,
        primes: usize,
    },
    NotDirect {
        junctions: usize,
    },
    NotWriteable {
        index: usize,
    },
    InvalidLimit(f64),
}

/// Names used for [`SegmentError::SearchExhausted`].
pub(crate) mod search_kind {
    pub const CYCLICAL: &str = "cyclical";
    pub const DIRECT: &str = "direct";
    pub const BRANCH: &str = "branch";
}

impl Serialize for SegmentError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match *self {
            Self::DegenerateConnection {
                limit,
                primitive,
                other,
            } => SegmentErrorProxy::DegenerateConnection {
                limit,
                primitive,
                other,
            },
            Self::OddJunctionCount {
                junctions,
                component,
            } => SegmentErrorProxy::OddJunctionCount {
                junctions,
                component,
            },
            Self::SearchExhausted { what, primes } => SegmentErrorProxy::SearchExhausted {
                what: what.to_owned(),
                primes,
            },
            Self::NotDirect { junctions } => SegmentErrorProxy::NotDirect { junctions },
            Self::NotWriteable { index } => SegmentErrorProxy::NotWriteable { index },
            Self::InvalidLimit(limit) => SegmentErrorProxy::InvalidLimit(limit),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SegmentError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = SegmentErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            SegmentErrorProxy::DegenerateConnection {
                limit,
                primitive,
                other,
            } => Self::DegenerateConnection {
                limit,
                primitive,
                other,
            },
            SegmentErrorProxy::OddJunctionCount {
                junctions,
                component,
            } => Self::OddJunctionCount {
                junctions,
                component,
            },
            SegmentErrorProxy::SearchExhausted { what, primes } => {
                let what = match what.as_str() {
                    search_kind::CYCLICAL => search_kind::CYCLICAL,
                    search_kind::DIRECT => search_kind::DIRECT,
                    search_kind::BRANCH => search_kind::BRANCH,
                    other => {
                        return Err(serde::de::Error::custom(format!(
                            "unknown search kind: {other}"
                        )));
                    }
                };
                Self::SearchExhausted { what, primes }
            }
            SegmentErrorProxy::NotDirect { junctions } => Self::NotDirect { junctions },
            SegmentErrorProxy::NotWriteable { index } => Self::NotWriteable { index },
            SegmentErrorProxy::InvalidLimit(limit) => Self::InvalidLimit(limit),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Position tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn array_distance_in_three_dimensions() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 4.0];
        assert!((a.distance(&b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn geo_coord_distance() {
        let a = geo::Coord { x: 0.0, y: 0.0 };
        let b = geo::Coord { x: 6.0, y: 8.0 };
        assert!((Position::distance(&a, &b) - 10.0).abs() < 1e-12);
    }

    // --- Primitive tests ---

    #[test]
    fn polyline_endpoints_and_reversal() {
        let pl = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ]);
        assert_eq!(pl.start_point(), Point::new(0.0, 0.0));
        assert_eq!(pl.end_point(), Point::new(2.0, 0.0));

        let rev = pl.reversed();
        assert_eq!(rev.start_point(), Point::new(2.0, 0.0));
        assert_eq!(rev.end_point(), Point::new(0.0, 0.0));
        assert_eq!(rev.points()[1], Point::new(1.0, 1.0));
    }

    #[test]
    fn empty_polyline_reports_origin() {
        let pl = Polyline::new(vec![]);
        assert!(pl.is_empty());
        assert_eq!(pl.start_point(), Point::new(0.0, 0.0));
        assert_eq!(pl.end_point(), Point::new(0.0, 0.0));
    }

    #[test]
    fn line_reversal_swaps_ends() {
        let line = Line::new([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        let rev = line.reversed();
        assert_eq!(rev.start, [1.0, 2.0, 3.0]);
        assert_eq!(rev.end, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn step_accessors() {
        let prim: Step<u8, Point> = Step::Primitive(7);
        let jump: Step<u8, Point> = Step::Jump(Jump {
            from: Point::new(0.0, 0.0),
            to: Point::new(1.0, 0.0),
        });
        assert!(!prim.is_jump());
        assert_eq!(prim.primitive(), Some(&7));
        assert!(jump.is_jump());
        assert_eq!(jump.primitive(), None);
    }

    // --- Config tests ---

    #[test]
    fn config_default_limit() {
        let config = SegmenterConfig::default();
        assert!((config.limit - SegmenterConfig::DEFAULT_LIMIT).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_bad_limits() {
        for limit in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SegmenterConfig { limit };
            assert!(matches!(
                config.validate(),
                Err(SegmentError::InvalidLimit(_))
            ));
        }
    }

    #[test]
    fn config_deserializes_missing_fields_as_default() {
        let config: SegmenterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SegmenterConfig::default());
    }

    // --- Error tests ---

    #[test]
    fn error_degenerate_display_mentions_limit() {
        let err = SegmentError::DegenerateConnection {
            limit: 0.5,
            primitive: 1,
            other: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("0.5"), "{msg}");
        assert!(msg.contains("make the limit smaller"), "{msg}");
    }

    #[test]
    fn error_odd_junction_display() {
        let err = SegmentError::OddJunctionCount {
            junctions: 3,
            component: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid path: component 0 has an odd number of junctions (3)",
        );
    }

    #[test]
    fn error_serde_round_trip() {
        let errors = [
            SegmentError::DegenerateConnection {
                limit: 0.25,
                primitive: 3,
                other: 1,
            },
            SegmentError::OddJunctionCount {
                junctions: 5,
                component: 2,
            },
            SegmentError::SearchExhausted {
                what: search_kind::BRANCH,
                primes: 9,
            },
            SegmentError::NotDirect { junctions: 4 },
            SegmentError::NotWriteable { index: 1 },
            SegmentError::InvalidLimit(-1.0),
        ];
        for err in errors {
            let json = serde_json::to_string(&err).unwrap();
            let back: SegmentError = serde_json::from_str(&json).unwrap();
            assert_eq!(err, back);
        }
    }

    #[test]
    fn error_deserialize_rejects_unknown_search_kind() {
        let json = r#"{"SearchExhausted":{"what":"sideways","primes":1}}"#;
        assert!(serde_json::from_str::<SegmentError>(json).is_err());
    }
}
