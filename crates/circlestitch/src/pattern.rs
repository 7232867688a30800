//! Pattern configuration: global shape parameters and stitch sequences.
//!
//! A [`PatternConfig`] is produced once per pattern string by the parser and
//! never mutated afterwards. Unspecified globals come from a [`Defaults`]
//! record, which is chosen by the caller according to the unit of length in
//! use.

use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    geometry::Shape,
};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Values used for globals the pattern does not mention.
///
/// All lengths are in the unit the record was built for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defaults {
    /// Width and height of the rendered card (`W`).
    pub image_size: f64,
    /// Number of stitch holes (`H`).
    pub hole_count: u32,
    /// Radius of the hole circle (`OC`).
    pub outer_circle_radius: f64,
    /// Pointiness of the shape (`K`).
    pub pointiness: f64,
    /// Number of sides of the shape (`N`).
    pub side_count: u32,
    /// Points per side of the shape (`M`).
    pub points_per_side: f64,
    /// Radius of the punched centre hole (`IC`).
    pub inner_circle_radius: f64,
}

impl Defaults {
    /// Defaults for patterns measured in inches.
    pub const INCH: Self = Self {
        image_size: 3.65,
        hole_count: 32,
        outer_circle_radius: 0.73,
        pointiness: 0.0,
        side_count: 1,
        points_per_side: 0.0,
        inner_circle_radius: 0.63,
    };

    /// Defaults for patterns measured in millimetres.
    pub const MILLIMETRE: Self = Self {
        image_size: 3.65 * MM_PER_INCH,
        outer_circle_radius: 0.73 * MM_PER_INCH,
        inner_circle_radius: 0.63 * MM_PER_INCH,
        ..Self::INCH
    };
}

/// One independently specified run of stitches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceSpec {
    /// Cyclic list of how many holes to advance between stitches (`L`).
    pub skips: SmallVec<[u32; 8]>,
    /// Hole the sequence starts from (`S`).
    pub start_hole: u32,
    /// Exact number of stitches (`C`); `None` runs until the cycle closes.
    pub stitch_count: Option<u32>,
}

impl SequenceSpec {
    /// Create a sequence starting at hole 0 that runs until its cycle closes.
    pub fn new(skips: impl Into<SmallVec<[u32; 8]>>) -> Self {
        Self {
            skips: skips.into(),
            start_hole: 0,
            stitch_count: None,
        }
    }

    /// Set the starting hole.
    pub fn start_at(mut self, hole: u32) -> Self {
        self.start_hole = hole;
        self
    }

    /// Limit the sequence to exactly `count` stitches.
    pub fn with_count(mut self, count: u32) -> Self {
        self.stitch_count = Some(count);
        self
    }

    /// Check this sequence against a table of `hole_count` holes.
    ///
    /// `sequence` is the 0-based position used in error messages.
    pub fn validate(&self, sequence: usize, hole_count: u32) -> Result<()> {
        let fail = |reason: String| Error::InvalidSequence { sequence, reason };

        if self.skips.is_empty() {
            return Err(fail("skip list is empty".into()));
        }
        if let Some(pos) = self.skips.iter().position(|&s| s == 0) {
            return Err(fail(format!("skip {} is zero; skips must be >= 1", pos + 1)));
        }
        if self.start_hole >= hole_count {
            return Err(fail(format!(
                "start hole {} is outside 0..{hole_count}",
                self.start_hole
            )));
        }
        if self.stitch_count == Some(0) {
            return Err(fail("stitch count must be >= 1".into()));
        }
        Ok(())
    }
}

/// Parsed pattern: global parameters plus the ordered stitch sequences.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternConfig {
    /// Width and height of the rendered card (`W`).
    pub image_size: f64,
    /// Number of stitch holes (`H`).
    pub hole_count: u32,
    /// Radius of the hole circle (`OC`).
    pub outer_circle_radius: f64,
    /// Blend between circle (0) and the N-sided shape (1) (`K`).
    pub pointiness: f64,
    /// Number of sides of the shape (`N`).
    pub side_count: u32,
    /// Points per side of the shape (`M`).
    pub points_per_side: f64,
    /// Radius of the punched centre hole (`IC`). Only the renderer uses it.
    pub inner_circle_radius: f64,
    /// Sequences in stitching order.
    pub sequences: Vec<SequenceSpec>,
}

impl PatternConfig {
    /// A configuration with every global taken from `defaults` and no sequences.
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            image_size: defaults.image_size,
            hole_count: defaults.hole_count,
            outer_circle_radius: defaults.outer_circle_radius,
            pointiness: defaults.pointiness,
            side_count: defaults.side_count,
            points_per_side: defaults.points_per_side,
            inner_circle_radius: defaults.inner_circle_radius,
            sequences: Vec::new(),
        }
    }

    /// The hole shape described by the globals. Not validated.
    pub fn shape(&self) -> Shape {
        Shape {
            hole_count: self.hole_count,
            pointiness: self.pointiness,
            side_count: self.side_count,
            points_per_side: self.points_per_side,
        }
    }

    /// Check numeric ranges of the globals and of every sequence.
    pub fn validate(&self) -> Result<()> {
        self.shape().validate()?;

        if !(self.outer_circle_radius.is_finite() && self.outer_circle_radius > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "outer circle radius must be positive, got {}",
                self.outer_circle_radius
            )));
        }
        if !(self.inner_circle_radius.is_finite() && self.inner_circle_radius >= 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "inner circle radius must be non-negative, got {}",
                self.inner_circle_radius
            )));
        }
        if self.inner_circle_radius >= self.outer_circle_radius {
            return Err(Error::InvalidGeometry(format!(
                "inner circle radius {} must be smaller than outer circle radius {}",
                self.inner_circle_radius, self.outer_circle_radius
            )));
        }
        if !(self.image_size.is_finite() && self.image_size > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "image size must be positive, got {}",
                self.image_size
            )));
        }

        if self.sequences.is_empty() {
            return Err(Error::EmptySequences);
        }
        for (i, seq) in self.sequences.iter().enumerate() {
            seq.validate(i, self.hole_count)?;
        }
        Ok(())
    }
}
