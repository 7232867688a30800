//! Stitch plans and complete templates.

use log::debug;

use crate::{
    error::Result,
    geometry::HoleTable,
    pattern::{PatternConfig, SequenceSpec},
    sequence::{self, Stitch, Termination},
    thread::{self, ThreadReport},
};

/// The stitches generated for one sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencePlan {
    /// The sequence as written in the pattern.
    pub spec: SequenceSpec,
    /// Stitches in order, starting on the front.
    pub stitches: Vec<Stitch>,
    /// Why generation stopped.
    pub termination: Termination,
}

impl SequencePlan {
    /// Holes in visiting order: the start hole, then the hole each stitch enters.
    pub fn visit_order(&self) -> impl Iterator<Item = u32> + '_ {
        self.stitches
            .first()
            .map(|s| s.from)
            .into_iter()
            .chain(self.stitches.iter().map(|s| s.to))
    }
}

/// All stitches of a pattern, grouped by sequence in pattern order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StitchPlan {
    /// Per-sequence stitches.
    sequences: Vec<SequencePlan>,
}

impl StitchPlan {
    /// Generate stitches for every sequence of `config`.
    ///
    /// Sequences are independent; each starts fresh from its own start hole.
    pub fn build(config: &PatternConfig) -> Result<Self> {
        let mut sequences = Vec::with_capacity(config.sequences.len());
        for (i, spec) in config.sequences.iter().enumerate() {
            let (stitches, termination) =
                sequence::generate_sequence(i, spec, config.hole_count)?;
            debug!(
                "sequence {i}: {} stitches, {termination:?}",
                stitches.len()
            );
            sequences.push(SequencePlan {
                spec: spec.clone(),
                stitches,
                termination,
            });
        }
        Ok(Self { sequences })
    }

    /// Per-sequence plans.
    pub fn sequences(&self) -> &[SequencePlan] {
        &self.sequences
    }

    /// Every stitch across all sequences, in order.
    pub fn stitches(&self) -> impl Iterator<Item = &Stitch> {
        self.sequences.iter().flat_map(|s| s.stitches.iter())
    }

    /// Total number of stitches.
    pub fn stitch_count(&self) -> usize {
        self.sequences.iter().map(|s| s.stitches.len()).sum()
    }
}

/// Everything a renderer needs: the pattern, hole positions, stitches and
/// thread totals.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    /// The parsed pattern.
    pub config: PatternConfig,
    /// Hole positions.
    pub holes: HoleTable,
    /// Generated stitches.
    pub plan: StitchPlan,
    /// Thread length and hole usage.
    pub thread: ThreadReport,
}

impl Template {
    /// Derive holes, stitches and thread totals from a pattern.
    pub fn build(config: PatternConfig) -> Result<Self> {
        config.validate()?;
        let holes = HoleTable::from_config(&config)?;
        let plan = StitchPlan::build(&config)?;
        let thread = thread::account(&holes, &plan)?;
        Ok(Self {
            config,
            holes,
            plan,
            thread,
        })
    }
}
