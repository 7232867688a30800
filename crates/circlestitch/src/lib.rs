//! Core library for circular string-art stitching templates.
//!
//! A short pattern string such as `"H 16 L 7,1 S 2 ; L 4 C 2"` describes a
//! ring of holes and one or more stitch sequences. This crate parses the
//! pattern, places the holes, walks each sequence and totals the thread
//! needed. Rendering is left to the caller.
//!
//! # Pattern language
//!
//! Globals (any order, each at most once):
//!
//! - `W` - card width and height (default 3.65 in)
//! - `H` - number of holes (default 32)
//! - `OC` - radius of the hole circle (default 0.73 in)
//! - `K` - pointiness, 0 for a circle up to 1 (default 0)
//! - `N` - number of sides of the shape (default 1)
//! - `M` - points per side of the shape (default 0)
//! - `IC` - radius of the punched centre hole (default 0.63 in)
//!
//! Sequences, separated by `;`:
//!
//! - `L a,b,...` - holes to advance per stitch, used cyclically
//! - `S n` - starting hole, 0 on the right counting clockwise (default 0)
//! - `C n` - number of stitches (default: until the pattern repeats)

/// Error types used across the crate.
pub mod error;
/// Hole positions on a circle or deformed polygon.
pub mod geometry;
/// The pattern language parser.
pub mod parser;
/// Parsed pattern configuration and defaults.
pub mod pattern;
/// Stitch plans and complete templates.
pub mod plan;
/// Stitch generation for one sequence.
pub mod sequence;
/// Thread length and hole usage accounting.
pub mod thread;

pub use crate::{
    pattern::{Defaults, PatternConfig, SequenceSpec},
    plan::{StitchPlan, Template},
};

/// Parse `pattern` with inch defaults and build its template.
pub fn template_from_str(pattern: &str) -> error::Result<Template> {
    template_from_str_with(pattern, &Defaults::INCH)
}

/// Parse `pattern` with the given defaults and build its template.
///
/// Range checks run once, in [`Template::build`].
pub fn template_from_str_with(pattern: &str, defaults: &Defaults) -> error::Result<Template> {
    Template::build(parser::parse_unchecked(pattern, defaults)?)
}
