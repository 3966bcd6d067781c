//! SVG export serializer.
//!
//! Renders flattened segmentation output (a sequence of
//! [`Step`]s) as an SVG document using the [`svg`] crate for document
//! construction, XML escaping, and path data formatting.
//!
//! Every maximal run of primitives between two jumps becomes one
//! `<path>` element built from `M` (move to) and `L` (line to)
//! commands. Jumps are drawn as dashed `<line>` elements grouped under
//! `<g id="jumps">` so the travel moves are easy to tell apart from the
//! drawing itself.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::borrow::Cow;

use svg::Document;
use svg::node::Text;
use svg::node::Value;
use svg::node::element::path::Data;
use svg::node::element::{Description, Group, Line as SvgLine, Path, Title};

use pathlink_segment::{Jump, Line, Point, Polyline, Step};

/// A primitive that can be drawn as a sequence of 2D points.
pub trait Drawable {
    /// The points to draw through, in the direction of travel.
    fn points(&self) -> Cow<'_, [Point]>;
}

impl Drawable for Polyline {
    fn points(&self) -> Cow<'_, [Point]> {
        Cow::Borrowed(Self::points(self))
    }
}

impl Drawable for Line<Point> {
    fn points(&self) -> Cow<'_, [Point]> {
        Cow::Owned(vec![self.start, self.end])
    }
}

/// Presentation options for [`to_svg`].
#[derive(Debug, Clone)]
pub struct SvgStyle<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,
    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,
    /// Stroke width of the drawn paths, in user units.
    pub stroke_width: f64,
    /// Space added around the bounding box, in user units.
    pub margin: f64,
    /// Whether to draw jumps at all.
    pub show_jumps: bool,
}

impl SvgStyle<'_> {
    /// Default stroke width.
    pub const DEFAULT_STROKE_WIDTH: f64 = 0.1;
    /// Default margin around the drawing.
    pub const DEFAULT_MARGIN: f64 = 1.0;
}

impl Default for SvgStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            margin: Self::DEFAULT_MARGIN,
            show_jumps: true,
        }
    }
}

/// Build an SVG path `d` attribute string through `points`.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for fewer than 2 points.
///
/// # Examples
///
/// ```
/// use pathlink_segment::Point;
/// use pathlink_export::build_path_data;
///
/// let d = build_path_data(&[Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Axis-aligned bounds of everything that will be drawn.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    fn include(bounds: Option<Self>, p: Point) -> Option<Self> {
        Some(bounds.map_or(Self { min: p, max: p }, |b| Self {
            min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        }))
    }
}

/// Split steps into drawable runs of points and the jumps between them.
///
/// Consecutive primitives in a run share their joining point, so a
/// point equal to the previous one is dropped.
fn runs<T: Drawable>(steps: &[Step<T, Point>]) -> (Vec<Vec<Point>>, Vec<Jump<Point>>) {
    let mut runs = vec![Vec::new()];
    let mut jumps = Vec::new();

    for step in steps {
        match step {
            Step::Jump(jump) => {
                jumps.push(*jump);
                if runs.last().is_some_and(|run: &Vec<Point>| !run.is_empty()) {
                    runs.push(Vec::new());
                }
            }
            Step::Primitive(value) => {
                if let Some(run) = runs.last_mut() {
                    for &p in value.points().iter() {
                        if run.last() != Some(&p) {
                            run.push(p);
                        }
                    }
                }
            }
        }
    }

    runs.retain(|run| !run.is_empty());
    (runs, jumps)
}

/// Serialize flattened segmentation output into an SVG document string.
///
/// The `viewBox` is the bounding box of every drawn point and jump,
/// grown by [`SvgStyle::margin`] on each side. Runs with fewer than 2
/// points are skipped (a single point cannot form a visible line).
///
/// # Examples
///
/// ```
/// use pathlink_segment::{Jump, Line, Point, Step};
/// use pathlink_export::{SvgStyle, to_svg};
///
/// let steps = vec![
///     Step::Primitive(Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0))),
///     Step::Jump(Jump { from: Point::new(1.0, 0.0), to: Point::new(3.0, 0.0) }),
///     Step::Primitive(Line::new(Point::new(3.0, 0.0), Point::new(4.0, 0.0))),
/// ];
/// let svg = to_svg(&steps, &SvgStyle::default());
/// assert!(svg.contains("M0,0 L1,0"));
/// assert!(svg.contains("M3,0 L4,0"));
/// assert!(svg.contains("stroke-dasharray"));
/// ```
#[must_use]
pub fn to_svg<T: Drawable>(steps: &[Step<T, Point>], style: &SvgStyle<'_>) -> String {
    let (runs, jumps) = runs(steps);

    let bounds = runs
        .iter()
        .flatten()
        .copied()
        .chain(jumps.iter().flat_map(|j| [j.from, j.to]))
        .fold(None, Bounds::include)
        .unwrap_or(Bounds {
            min: Point::new(0.0, 0.0),
            max: Point::new(0.0, 0.0),
        });

    let margin = style.margin;
    let width = 2.0f64.mul_add(margin, bounds.max.x - bounds.min.x);
    let height = 2.0f64.mul_add(margin, bounds.max.y - bounds.min.y);
    let mut doc = Document::new().set(
        "viewBox",
        (
            bounds.min.x - margin,
            bounds.min.y - margin,
            width,
            height,
        ),
    );

    if let Some(title) = style.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = style.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    for run in &runs {
        let d = build_path_data(run);
        if d.is_empty() {
            continue;
        }
        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", style.stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");
        doc = doc.add(path);
    }

    if style.show_jumps && !jumps.is_empty() {
        let dash = style.stroke_width * 4.0;
        let mut group = Group::new()
            .set("id", "jumps")
            .set("stroke", "gray")
            .set("stroke-width", style.stroke_width)
            .set("stroke-dasharray", (dash, dash));
        for jump in &jumps {
            group = group.add(
                SvgLine::new()
                    .set("x1", jump.from.x)
                    .set("y1", jump.from.y)
                    .set("x2", jump.to.x)
                    .set("y2", jump.to.y),
            );
        }
        doc = doc.add(group);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
