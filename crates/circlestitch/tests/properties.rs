//! Property-based tests for stitch generation, hole geometry and thread length.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::f64::consts::TAU;

use circlestitch::{
    Defaults, PatternConfig, SequenceSpec, Template,
    geometry::{HoleTable, Shape},
    sequence::{Side, Termination, generate},
};
use proptest::prelude::*;

/// A hole count together with a valid start hole.
fn holes_and_start() -> impl Strategy<Value = (u32, u32)> {
    (1u32..64).prop_flat_map(|h| (Just(h), 0..h))
}

/// Short skip lists with small positive skips.
fn skips() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..100, 1..6)
}

/// A single-sequence pattern over a deformed outline with outer radius `oc`.
fn pointy_config(oc: f64, spec: SequenceSpec, hole_count: u32) -> PatternConfig {
    let mut config = PatternConfig::from_defaults(&Defaults::INCH);
    config.hole_count = hole_count;
    config.outer_circle_radius = oc;
    config.inner_circle_radius = 0.0;
    config.pointiness = 0.8;
    config.side_count = 6;
    config.points_per_side = 3.0;
    config.sequences.push(spec);
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Unbounded sequences always close within `hole_count × len(skips)` stitches.
    #[test]
    fn unbounded_sequences_terminate((h, start) in holes_and_start(), skips in skips()) {
        let spec = SequenceSpec::new(skips.clone()).start_at(start);
        let (stitches, why) = generate(&spec, h).expect("valid spec");
        prop_assert_eq!(why, Termination::CycleClosed);
        prop_assert!(!stitches.is_empty());
        prop_assert!(stitches.len() <= h as usize * skips.len());
    }

    /// Closure lands back on the start hole with the skip list realigned.
    #[test]
    fn closure_returns_to_start((h, start) in holes_and_start(), skips in skips()) {
        let spec = SequenceSpec::new(skips.clone()).start_at(start);
        let (stitches, _) = generate(&spec, h).expect("valid spec");
        prop_assert_eq!(stitches.last().map(|s| s.to), Some(start));
        prop_assert_eq!(stitches.len() % skips.len(), 0);
    }

    /// A stitch count is honoured exactly, repeats or not.
    #[test]
    fn counted_sequences_are_exact(
        (h, start) in holes_and_start(),
        skips in skips(),
        count in 1u32..500,
    ) {
        let spec = SequenceSpec::new(skips).start_at(start).with_count(count);
        let (stitches, why) = generate(&spec, h).expect("valid spec");
        prop_assert_eq!(why, Termination::CountReached);
        prop_assert_eq!(stitches.len(), count as usize);
    }

    /// Stitch `i` is on the front exactly when `i` is even.
    #[test]
    fn sides_alternate((h, start) in holes_and_start(), skips in skips()) {
        let spec = SequenceSpec::new(skips).start_at(start);
        let (stitches, _) = generate(&spec, h).expect("valid spec");
        for (i, s) in stitches.iter().enumerate() {
            prop_assert_eq!(s.side == Side::Front, i % 2 == 0);
        }
    }

    /// With zero pointiness the holes form a regular polygon whatever N and M are.
    #[test]
    fn zero_pointiness_is_a_circle(
        h in 1u32..100,
        n in 1u32..12,
        m in 0.0f64..10.0,
        oc in 0.1f64..5.0,
    ) {
        let shape = Shape { hole_count: h, pointiness: 0.0, side_count: n, points_per_side: m };
        let table = HoleTable::new(shape, oc).expect("valid shape");
        for (i, p) in table.positions().iter().enumerate() {
            let theta = TAU * i as f64 / f64::from(h);
            prop_assert!((p.x - oc * theta.cos()).abs() < 1e-9);
            prop_assert!((p.y - oc * theta.sin()).abs() < 1e-9);
        }
    }

    /// Scaling the outer radius scales the thread length by the same factor.
    #[test]
    fn length_scales_with_radius(
        (h, start) in holes_and_start(),
        skips in skips(),
        oc in 0.1f64..3.0,
        factor in 0.1f64..10.0,
    ) {
        let spec = SequenceSpec::new(skips).start_at(start);
        let base = Template::build(pointy_config(oc, spec.clone(), h)).expect("template");
        let scaled = Template::build(pointy_config(oc * factor, spec, h)).expect("template");
        let expected = base.thread.total_length * factor;
        prop_assert!((scaled.thread.total_length - expected).abs() <= 1e-9 * expected.max(1.0));
    }
}
