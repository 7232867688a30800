//! Error types for pattern parsing and template construction.

use thiserror::Error;

/// Errors raised while turning a pattern string into a stitching template.
///
/// Every variant is terminal for the current pattern: no partial template is
/// produced once one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed or unrecognised pattern text.
    #[error("syntax error at offset {offset}: expected {expected}, found {found}")]
    Grammar {
        /// 0-based character offset of the failure.
        offset: usize,
        /// What the parser would have accepted at `offset`.
        expected: String,
        /// Description of what was actually there.
        found: String,
    },

    /// A global option appeared more than once.
    #[error("duplicate option '{key}' at offset {offset}")]
    DuplicateOption {
        /// The repeated option keyword.
        key: String,
        /// 0-based character offset of the second occurrence.
        offset: usize,
    },

    /// The pattern contained no stitch sequences.
    #[error("pattern has no sequences; add at least one 'L' option")]
    EmptySequences,

    /// Global shape parameters are out of range or contradictory.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A sequence carries an out-of-range skip, start hole or stitch count.
    #[error("invalid sequence {sequence}: {reason}")]
    InvalidSequence {
        /// 0-based position of the sequence in the pattern.
        sequence: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A stitch referenced a hole outside the hole table.
    #[error("hole index {index} out of range for {hole_count} holes")]
    HoleIndex {
        /// Offending hole index.
        index: u32,
        /// Number of holes in the table.
        hole_count: u32,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
