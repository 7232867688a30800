//! Hole placement on a circle deformed towards an N-sided shape.
//!
//! Coordinates use screen orientation: `x` grows to the right and `y` grows
//! downward, so increasing angles run clockwise. Hole 0 sits on the positive
//! x-axis and the shape is centred on the origin.

use std::f64::consts::{PI, TAU};

use log::debug;

use crate::{
    error::{Error, Result},
    pattern::PatternConfig,
};

/// Largest supported hole count.
pub const MAX_HOLES: u32 = 10_000;

/// A 2D position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// The centre of every hole table.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Scale both coordinates by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Outline the holes are placed on, independent of its absolute size.
///
/// The radius at angle `θ` is `R · [(1 - K) + K · f(θ)]` where `f` is the polar
/// form of an N-sided polygon whose sides bow according to `M`, damped by `K`
/// inside the arcsine:
///
/// ```text
/// f(θ) = cos((2·asin(K) + Mπ) / 2N) / cos((2·asin(K·cos Nθ) + Mπ) / 2N)
/// ```
///
/// `f` is 1 at the N lobe peaks and falls towards the middle of each side.
/// It stays within `(0, 1]` as long as `2·asin(K) + Mπ < Nπ`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    /// Number of holes spread evenly by angle.
    pub hole_count: u32,
    /// Blend factor `K` between circle (0) and polygon (1).
    pub pointiness: f64,
    /// Number of lobes `N`.
    pub side_count: u32,
    /// Sub-point control `M`.
    pub points_per_side: f64,
}

impl Shape {
    /// A plain circle with `hole_count` holes.
    pub fn circle(hole_count: u32) -> Result<Self> {
        let shape = Self {
            hole_count,
            pointiness: 0.0,
            side_count: 1,
            points_per_side: 0.0,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Check that the parameters describe a drawable outline.
    pub fn validate(&self) -> Result<()> {
        if self.hole_count == 0 {
            return Err(Error::InvalidGeometry("hole count must be >= 1".into()));
        }
        if self.hole_count > MAX_HOLES {
            return Err(Error::InvalidGeometry(format!(
                "hole count must be <= {MAX_HOLES}, got {}",
                self.hole_count
            )));
        }
        if !(0.0..=1.0).contains(&self.pointiness) {
            return Err(Error::InvalidGeometry(format!(
                "pointiness must be within 0..=1, got {}",
                self.pointiness
            )));
        }
        if self.side_count == 0 {
            return Err(Error::InvalidGeometry("side count must be >= 1".into()));
        }
        if !(self.points_per_side.is_finite() && self.points_per_side >= 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "points per side must be non-negative, got {}",
                self.points_per_side
            )));
        }
        if !self.is_circle() && self.lobe_phase(self.pointiness) >= PI / 2.0 {
            return Err(Error::InvalidGeometry(format!(
                "pointiness {} with {} sides and {} points per side has no finite outline",
                self.pointiness, self.side_count, self.points_per_side
            )));
        }
        Ok(())
    }

    /// Whether the outline degenerates to an exact circle.
    pub fn is_circle(&self) -> bool {
        self.pointiness == 0.0 || (self.side_count == 1 && self.points_per_side == 0.0)
    }

    /// Angle of hole `index` in radians, clockwise from the positive x-axis.
    pub fn angle(&self, index: u32) -> f64 {
        TAU * f64::from(index) / f64::from(self.hole_count)
    }

    /// Angle of hole `index` in degrees.
    pub fn angle_degrees(&self, index: u32) -> f64 {
        f64::from(index) / f64::from(self.hole_count) * 360.0
    }

    /// Argument of the cosines in `f` for an arcsine input of `s`.
    fn lobe_phase(&self, s: f64) -> f64 {
        let n = f64::from(self.side_count);
        (2.0 * s.asin() + self.points_per_side * PI) / (2.0 * n)
    }

    /// The polygon term `f(θ)`, within `(0, 1]`.
    fn lobe(&self, theta: f64) -> f64 {
        let k = self.pointiness;
        let n = f64::from(self.side_count);
        let numerator = self.lobe_phase(k).cos();
        let denominator = self.lobe_phase(k * (n * theta).cos()).cos();
        (numerator / denominator).min(1.0)
    }

    /// Fraction of the nominal radius reached at angle `theta`.
    pub fn radial_factor(&self, theta: f64) -> f64 {
        if self.is_circle() {
            return 1.0;
        }
        (1.0 - self.pointiness) + self.pointiness * self.lobe(theta)
    }

    /// Position of hole `index` on the outline scaled to nominal `radius`.
    ///
    /// Indices wrap modulo the hole count. Larger radii give concentric
    /// copies of the outline, which is how labels are placed outside it.
    pub fn point(&self, index: u32, radius: f64) -> Point {
        let theta = self.angle(index % self.hole_count);
        let r = radius * self.radial_factor(theta);
        Point::new(r * theta.cos(), r * theta.sin())
    }
}

/// Positions of every hole for one pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct HoleTable {
    /// The outline holes sit on.
    shape: Shape,
    /// Nominal outline radius.
    radius: f64,
    /// Hole positions indexed by hole number.
    positions: Vec<Point>,
}

impl HoleTable {
    /// Place `shape.hole_count` holes on the outline with nominal `radius`.
    pub fn new(shape: Shape, radius: f64) -> Result<Self> {
        shape.validate()?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "outer circle radius must be positive, got {radius}"
            )));
        }

        let positions = (0..shape.hole_count)
            .map(|i| shape.point(i, radius))
            .collect();
        debug!(
            "placed {} holes at radius {radius} (K={}, N={}, M={})",
            shape.hole_count, shape.pointiness, shape.side_count, shape.points_per_side
        );

        Ok(Self {
            shape,
            radius,
            positions,
        })
    }

    /// Build the table for a parsed pattern.
    pub fn from_config(config: &PatternConfig) -> Result<Self> {
        Self::new(config.shape(), config.outer_circle_radius)
    }

    /// Number of holes.
    pub fn len(&self) -> u32 {
        self.shape.hole_count
    }

    /// Always false; a table holds at least one hole.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of hole `index`.
    pub fn position(&self, index: u32) -> Result<Point> {
        self.positions
            .get(index as usize)
            .copied()
            .ok_or(Error::HoleIndex {
                index,
                hole_count: self.len(),
            })
    }

    /// All hole positions, indexed by hole number.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// The centre hole, which is always the origin.
    pub fn center(&self) -> Point {
        Point::ORIGIN
    }

    /// The outline the holes were placed on.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Nominal outline radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn shape(k: f64, n: u32, m: f64) -> Shape {
        Shape {
            hole_count: 42,
            pointiness: k,
            side_count: n,
            points_per_side: m,
        }
    }

    #[test]
    fn hole_zero_is_on_the_right_and_numbering_is_clockwise() -> Result<()> {
        let t = HoleTable::new(Shape::circle(4)?, 2.0)?;
        let p = t.positions();
        assert!((p[0].x - 2.0).abs() < EPS && p[0].y.abs() < EPS);
        // Screen coordinates: a quarter turn clockwise points down (+y).
        assert!(p[1].x.abs() < EPS && (p[1].y - 2.0).abs() < EPS);
        assert!((p[2].x + 2.0).abs() < EPS);
        assert!((p[3].y + 2.0).abs() < EPS);
        assert_eq!(t.center(), Point::ORIGIN);
        Ok(())
    }

    #[test]
    fn lobe_peaks_reach_full_radius() {
        let s = shape(0.8, 6, 3.0);
        for lobe in 0..6 {
            let theta = TAU * f64::from(lobe) / 6.0;
            assert!((s.radial_factor(theta) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn deformed_shape_stays_inside_circle() {
        for (k, n, m) in [(0.8, 6, 3.0), (0.9, 5, 2.0), (1.0, 4, 0.0), (0.5, 2, 0.5)] {
            let s = shape(k, n, m);
            let mut min = f64::MAX;
            for i in 0..720 {
                let f = s.radial_factor(TAU * f64::from(i) / 720.0);
                assert!(f > 0.0 && f <= 1.0, "factor {f} out of range for {s:?}");
                min = min.min(f);
            }
            assert!(min < 1.0, "{s:?} should be deformed");
        }
    }

    #[test]
    fn many_points_per_side_stay_bounded() -> Result<()> {
        for (k, n, m) in [(0.5, 3, 2.0), (0.3, 2, 1.0), (0.2, 4, 3.0), (0.6, 3, 2.5)] {
            let s = shape(k, n, m);
            s.validate()?;
            let t = HoleTable::new(s, 1.0)?;
            for p in t.positions() {
                let r = p.distance(&Point::ORIGIN);
                assert!(r > 0.0 && r <= 1.0 + EPS, "radius {r} out of range for {s:?}");
            }
            let min = (0..720)
                .map(|i| s.radial_factor(TAU * f64::from(i) / 720.0))
                .fold(f64::MAX, f64::min);
            assert!(min > 0.0 && min < 1.0, "{s:?} should be deformed, min {min}");
        }
        Ok(())
    }

    #[test]
    fn default_shape_is_circle_even_when_pointy() -> Result<()> {
        let s = shape(0.7, 1, 0.0);
        s.validate()?;
        assert!(s.is_circle());
        let t = HoleTable::new(s, 1.0)?;
        for p in t.positions() {
            assert!((p.distance(&Point::ORIGIN) - 1.0).abs() < EPS);
        }
        Ok(())
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Shape::circle(0).is_err());
        assert!(shape(1.5, 6, 1.0).validate().is_err());
        assert!(shape(0.5, 0, 0.0).validate().is_err());
        // One side with extra points has a pole between the lobes.
        assert!(shape(0.5, 1, 1.0).validate().is_err());
        assert!(shape(1.0, 3, 2.5).validate().is_err());
        assert!(shape(0.5, 2, 2.0).validate().is_err());
        // The pole only matters once the shape is deformed.
        assert!(shape(0.0, 1, 1.0).validate().is_ok());
        assert!(Shape::circle(MAX_HOLES + 1).is_err());
        assert!(Shape::circle(MAX_HOLES).is_ok());
        assert!(HoleTable::new(shape(0.0, 1, 0.0), 0.0).is_err());
    }

    #[test]
    fn out_of_range_hole() -> Result<()> {
        let t = HoleTable::new(Shape::circle(8)?, 1.0)?;
        assert_eq!(
            t.position(8),
            Err(Error::HoleIndex {
                index: 8,
                hole_count: 8
            })
        );
        Ok(())
    }
}
