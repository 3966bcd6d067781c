//! pathlink-export: Pure format serializers (sans-IO)
//!
//! Converts flattened segmentation output into viewable formats.
//! Currently supports SVG.

pub mod svg;

pub use self::svg::{Drawable, SvgStyle, build_path_data, to_svg};
