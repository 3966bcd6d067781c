//! pathlink-bench: CLI tool for segmentation experiments and diagnostics.
//!
//! Reads a drawing as a JSON array of polylines, segments it into travel
//! paths, and prints per-phase diagnostics. Useful for:
//!
//! - Finding a joining limit that neither misses nor collapses contacts
//! - Measuring how much backtracking a drawing needs
//! - Previewing the resulting travel order as SVG
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin pathlink-bench -- [OPTIONS] <INPUT_PATH>
//! ```
//!
//! The input looks like `[[{"x": 0, "y": 0}, {"x": 1, "y": 0}], ...]`.
//! Set `PATHLINK_LOG=pathlink_segment=debug` to see each component.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pathlink_segment::{Polyline, SegmentDiagnostics, SegmenterConfig};
use tracing_subscriber::EnvFilter;

/// Segmentation experiments and diagnostics for pathlink.
///
/// Joins the polylines of a drawing into continuous trails and prints
/// per-phase timing and search counts.
#[derive(Parser)]
#[command(name = "pathlink-bench", version)]
struct Cli {
    /// Path to the input drawing (JSON array of polylines).
    input_path: PathBuf,

    /// Joining distance: endpoints closer than this are connected.
    #[arg(long, default_value_t = SegmenterConfig::DEFAULT_LIMIT)]
    limit: f64,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Leave jumps out of the SVG instead of drawing them dashed.
    #[arg(long)]
    hide_jumps: bool,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full segmenter config as a JSON string.
    ///
    /// When provided, `--limit` is ignored. The JSON must be a valid
    /// `SegmenterConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`SegmenterConfig`] from CLI arguments.
///
/// `--config-json` takes precedence over the individual flags.
fn config_from_cli(cli: &Cli) -> Result<SegmenterConfig, String> {
    let config = match cli.config_json {
        Some(ref json) => serde_json::from_str(json)
            .map_err(|e| format!("Error parsing --config-json: {e}"))?,
        None => SegmenterConfig { limit: cli.limit },
    };
    config.validate().map_err(|e| format!("Invalid config: {e}"))?;
    Ok(config)
}

/// Parse a drawing, dropping polylines too short to have two ends.
fn parse_drawing(json: &str) -> Result<Vec<Polyline>, String> {
    let polylines: Vec<Polyline> =
        serde_json::from_str(json).map_err(|e| format!("Error parsing drawing: {e}"))?;
    let total = polylines.len();
    let kept: Vec<Polyline> = polylines.into_iter().filter(|p| p.len() >= 2).collect();
    if kept.len() < total {
        tracing::warn!(
            dropped = total - kept.len(),
            "skipping polylines with fewer than two points"
        );
    }
    Ok(kept)
}

/// Log to stderr, filtered by `PATHLINK_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PATHLINK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let drawing = match std::fs::read_to_string(&cli.input_path)
        .map_err(|e| format!("Error reading {}: {e}", cli.input_path.display()))
        .and_then(|json| parse_drawing(&json))
    {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Drawing: {} ({} polylines)",
        cli.input_path.display(),
        drawing.len(),
    );
    eprintln!("Config: {config:?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (result, diagnostics) =
            match pathlink_segment::segment_with_diagnostics(drawing.iter().cloned(), &config) {
                Ok(output) => output,
                Err(e) => {
                    eprintln!("Segmentation error: {e}");
                    return ExitCode::FAILURE;
                }
            };

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Write SVG on the first run only.
        if run == 0
            && let Some(ref svg_path) = cli.svg
        {
            let steps = match result.to_steps() {
                Ok(steps) => steps,
                Err(e) => {
                    eprintln!("Segmentation error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let desc = format!("{config:?}");
            let style = pathlink_export::SvgStyle {
                title: Some(title_for(&cli.input_path)),
                description: Some(&desc),
                show_jumps: !cli.hide_jumps,
                ..pathlink_export::SvgStyle::default()
            };
            let svg = pathlink_export::to_svg(&steps, &style);
            match std::fs::write(svg_path, &svg) {
                Ok(()) => {
                    eprintln!(
                        "SVG written to {} ({} bytes)",
                        svg_path.display(),
                        svg.len(),
                    );
                }
                Err(e) => {
                    eprintln!("Error writing SVG to {}: {e}", svg_path.display());
                }
            }
        }

        all_diagnostics.push(diagnostics);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

fn title_for(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("bench")
}

/// Function pointer type for extracting a phase duration from diagnostics.
type PhaseExtractor = fn(&SegmentDiagnostics) -> std::time::Duration;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[SegmentDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Phase", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let phase_extractors: &[(&str, PhaseExtractor)] = &[
        ("Connectivity", |d| d.matrix),
        ("Union", |d| d.union),
        ("Decomposition", |d| d.decomposition),
    ];

    for (name, extractor) in phase_extractors {
        let phase_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<24} {phase_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pathlink-bench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn limit_flag_sets_config() {
        let config = config_from_cli(&cli(&["in.json", "--limit", "0.5"])).unwrap();
        assert!((config.limit - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn default_limit_matches_library() {
        let config = config_from_cli(&cli(&["in.json"])).unwrap();
        assert_eq!(config, SegmenterConfig::default());
    }

    #[test]
    fn config_json_overrides_flags() {
        let config = config_from_cli(&cli(&[
            "in.json",
            "--limit",
            "0.5",
            "--config-json",
            r#"{"limit": 2.0}"#,
        ]))
        .unwrap();
        assert!((config.limit - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_limit_rejected() {
        let err = config_from_cli(&cli(&["in.json", "--limit", "0"])).unwrap_err();
        assert!(err.contains("Invalid config"), "{err}");
    }

    #[test]
    fn bad_config_json_rejected() {
        let err = config_from_cli(&cli(&["in.json", "--config-json", "nope"])).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"), "{err}");
    }

    #[test]
    fn zero_runs_rejected() {
        let args = ["pathlink-bench", "in.json", "--runs", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn drawing_drops_short_polylines() {
        let json = r#"[
            [{"x": 0, "y": 0}, {"x": 1, "y": 0}],
            [{"x": 5, "y": 5}],
            []
        ]"#;
        let drawing = parse_drawing(json).unwrap();
        assert_eq!(drawing.len(), 1);
        assert_eq!(drawing[0].len(), 2);
    }

    #[test]
    fn malformed_drawing_rejected() {
        assert!(parse_drawing(r#"{"x": 0}"#).is_err());
    }

    #[test]
    fn title_uses_file_stem() {
        assert_eq!(title_for(Path::new("/tmp/star.json")), "star");
    }
}
