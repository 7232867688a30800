//! Stitch generation for a single sequence.
//!
//! A sequence walks around the holes, advancing by each skip of its skip list
//! in turn. The walker state is the pair `(current hole, skip phase)`. Without
//! an explicit stitch count the walk stops just before it would re-enter a
//! state it has already been in; revisiting a hole at a different skip phase
//! does not end the walk.

use std::collections::HashSet;

use log::{debug, trace};

use crate::{error::Result, pattern::SequenceSpec};

/// Which face of the card a stitch is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The face the pattern is viewed from.
    Front,
    /// The reverse face.
    Back,
}

impl Side {
    /// The opposite face.
    pub fn flip(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Lower-case name, used as a style class by renderers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// A single thread segment between two holes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stitch {
    /// Hole the thread leaves from.
    pub from: u32,
    /// Hole the thread enters.
    pub to: u32,
    /// Face the segment lies on.
    pub side: Side,
}

/// Why a sequence stopped producing stitches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The requested stitch count was reached.
    CountReached,
    /// The next stitch would have repeated an earlier walker state.
    CycleClosed,
}

/// Iterator over the stitches of one sequence.
#[derive(Debug)]
pub struct StitchWalk<'a> {
    /// Cyclic skip list.
    skips: &'a [u32],
    /// Number of holes to wrap around.
    hole_count: u32,
    /// Hole the next stitch leaves from.
    current: u32,
    /// Index into `skips` for the next stitch.
    phase: usize,
    /// Face of the next stitch.
    side: Side,
    /// Stitches emitted so far.
    made: u32,
    /// Requested stitch count, if any.
    limit: Option<u32>,
    /// Walker states already left; only tracked when `limit` is `None`.
    seen: HashSet<(u32, usize)>,
    /// Set once the walk is exhausted.
    termination: Option<Termination>,
}

impl<'a> StitchWalk<'a> {
    /// Start walking a standalone `spec` around `hole_count` holes.
    ///
    /// Errors name it as sequence 0.
    pub fn new(spec: &'a SequenceSpec, hole_count: u32) -> Result<Self> {
        Self::for_sequence(0, spec, hole_count)
    }

    /// Start walking `spec`, the `sequence`th of its pattern.
    pub fn for_sequence(
        sequence: usize,
        spec: &'a SequenceSpec,
        hole_count: u32,
    ) -> Result<Self> {
        spec.validate(sequence, hole_count)?;
        Ok(Self {
            skips: &spec.skips,
            hole_count,
            current: spec.start_hole,
            phase: 0,
            side: Side::Front,
            made: 0,
            limit: spec.stitch_count,
            seen: HashSet::new(),
            termination: None,
        })
    }

    /// Why the walk ended, once it has.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Stitches emitted so far.
    pub fn made(&self) -> u32 {
        self.made
    }

    /// Record that the walk is over.
    fn finish(&mut self, reason: Termination) -> Option<Stitch> {
        if self.termination.is_none() {
            debug!(
                "sequence {:?} ended at hole {} after {} stitches: {reason:?}",
                self.skips, self.current, self.made
            );
            self.termination = Some(reason);
        }
        None
    }
}

impl Iterator for StitchWalk<'_> {
    type Item = Stitch;

    fn next(&mut self) -> Option<Stitch> {
        if self.termination.is_some() {
            return None;
        }
        match self.limit {
            Some(limit) if self.made >= limit => return self.finish(Termination::CountReached),
            Some(_) => {}
            None => {
                if !self.seen.insert((self.current, self.phase)) {
                    return self.finish(Termination::CycleClosed);
                }
            }
        }

        let skip = self.skips[self.phase];
        let next =
            ((u64::from(self.current) + u64::from(skip)) % u64::from(self.hole_count)) as u32;
        let stitch = Stitch {
            from: self.current,
            to: next,
            side: self.side,
        };
        trace!(
            "stitch {}: {} -> {} ({})",
            self.made,
            stitch.from,
            stitch.to,
            stitch.side.name()
        );

        self.current = next;
        self.phase = (self.phase + 1) % self.skips.len();
        self.side = self.side.flip();
        self.made += 1;
        Some(stitch)
    }
}

/// Generate every stitch of `spec` around `hole_count` holes.
///
/// Returns the stitches together with the reason the walk ended.
pub fn generate(spec: &SequenceSpec, hole_count: u32) -> Result<(Vec<Stitch>, Termination)> {
    generate_sequence(0, spec, hole_count)
}

/// Like [`generate`], for the `sequence`th sequence of a pattern.
pub fn generate_sequence(
    sequence: usize,
    spec: &SequenceSpec,
    hole_count: u32,
) -> Result<(Vec<Stitch>, Termination)> {
    let mut walk = StitchWalk::for_sequence(sequence, spec, hole_count)?;
    let stitches: Vec<Stitch> = walk.by_ref().collect();
    let termination = walk.termination().unwrap_or(Termination::CountReached);
    Ok((stitches, termination))
}
