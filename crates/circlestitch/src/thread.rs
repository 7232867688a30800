//! Thread accounting: length consumed and how often each hole is used.

use log::debug;

use crate::{
    error::Result,
    geometry::HoleTable,
    plan::StitchPlan,
    sequence::Stitch,
};

/// Totals for one sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceTally {
    /// Thread length, in the unit of the outer circle radius.
    pub length: f64,
    /// Visits per hole: the start hole once, then every hole a stitch enters.
    pub visits: Vec<u32>,
}

impl SequenceTally {
    /// The largest number of visits any single hole received.
    pub fn busiest(&self) -> u32 {
        self.visits.iter().copied().max().unwrap_or(0)
    }
}

/// Totals for a whole plan.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreadReport {
    /// Sum of every sequence's length.
    pub total_length: f64,
    /// Visits per hole across all sequences.
    pub hole_visits: Vec<u32>,
    /// Per-sequence totals, in plan order.
    pub sequences: Vec<SequenceTally>,
}

/// Straight-line length of one stitch.
pub fn stitch_length(holes: &HoleTable, stitch: &Stitch) -> Result<f64> {
    let from = holes.position(stitch.from)?;
    let to = holes.position(stitch.to)?;
    Ok(from.distance(&to))
}

/// Tally the stitches of one sequence.
pub fn tally_sequence(holes: &HoleTable, stitches: &[Stitch]) -> Result<SequenceTally> {
    let mut visits = vec![0u32; holes.len() as usize];
    let mut length = 0.0;

    if let Some(first) = stitches.first() {
        holes.position(first.from)?;
        visits[first.from as usize] += 1;
    }
    for stitch in stitches {
        length += stitch_length(holes, stitch)?;
        visits[stitch.to as usize] += 1;
    }

    Ok(SequenceTally { length, visits })
}

/// Tally every sequence of `plan` over `holes`.
pub fn account(holes: &HoleTable, plan: &StitchPlan) -> Result<ThreadReport> {
    let sequences = plan
        .sequences()
        .iter()
        .map(|seq| tally_sequence(holes, &seq.stitches))
        .collect::<Result<Vec<_>>>()?;

    let mut hole_visits = vec![0u32; holes.len() as usize];
    for tally in &sequences {
        for (total, v) in hole_visits.iter_mut().zip(&tally.visits) {
            *total += v;
        }
    }
    let total_length = sequences.iter().map(|t| t.length).sum();
    debug!(
        "thread: {total_length:.3} over {} stitches in {} sequences",
        plan.stitch_count(),
        sequences.len()
    );

    Ok(ThreadReport {
        total_length,
        hole_visits,
        sequences,
    })
}
