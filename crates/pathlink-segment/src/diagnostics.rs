//! Segmentation diagnostics: timing and search counts for one run.
//!
//! Collected by every call to
//! [`segment_with_diagnostics`](crate::segment_with_diagnostics). Timing
//! uses the `web-time` crate, which falls back to `performance.now()` on
//! WASM and `std::time::Instant` elsewhere.
//!
//! Durations are serialized as fractional seconds (`f64`), since
//! `std::time::Duration` does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDiagnostics {
    /// Building the endpoint distance matrix (seconds).
    #[serde(with = "duration_serde")]
    pub matrix: Duration,
    /// Merging connected endpoints into components (seconds).
    #[serde(with = "duration_serde")]
    pub union: Duration,
    /// Validating and ordering every component (seconds).
    #[serde(with = "duration_serde")]
    pub decomposition: Duration,
    /// Wall-clock duration of the whole call (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Counts across all phases.
    pub summary: SegmentSummary,
}

/// Counts for one segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Joining distance in use.
    pub limit: f64,
    /// Number of input primitives.
    pub primitives: usize,
    /// Endpoint pairs closer than the limit.
    pub connected_pairs: usize,
    /// Connected components before ordering.
    pub components: usize,
    /// Closed loops in the result.
    pub cyclical: usize,
    /// Open trails in the result.
    pub direct: usize,
    /// Trails peeled off branching components.
    pub peeled: usize,
    /// Forward steps taken by all trail searches.
    pub steps: usize,
    /// Times a trail search backed up.
    pub backtracks: usize,
    /// Jumps needed between consecutive paths.
    pub jumps: usize,
}

impl SegmentDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let s = &self.summary;
        let mut lines = Vec::new();

        lines.push(format!("Segmentation Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Primitives: {} (limit {})",
            s.primitives, s.limit
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Phase", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let phases = [
            (
                "Connectivity",
                self.matrix,
                format!("{} connected pairs", s.connected_pairs),
            ),
            (
                "Union",
                self.union,
                format!("{} components", s.components),
            ),
            (
                "Decomposition",
                self.decomposition,
                format!(
                    "{} peeled, {} steps, {} backtracks",
                    s.peeled, s.steps, s.backtracks
                ),
            ),
        ];

        for (name, duration, details) in &phases {
            let ms = duration_ms(*duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Cyclical: {}  |  Direct: {}  |  Jumps: {}",
            s.cyclical, s.direct, s.jumps,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
