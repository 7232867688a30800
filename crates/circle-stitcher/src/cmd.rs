//! Command handlers for the `circle-stitcher` CLI.
//!
//! The pattern is parsed and planned completely before anything touches the
//! output path, so a bad pattern never leaves a file behind.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use circlestitch::{Template, template_from_str_with};
use log::info;

use crate::render::{DEFAULT_THEME, Units, document_text, render};

/// Log a per-sequence summary of the template.
fn log_summary(template: &Template, units: Units) {
    for (i, (seq, tally)) in template
        .plan
        .sequences()
        .iter()
        .zip(&template.thread.sequences)
        .enumerate()
    {
        info!(
            "sequence {i}: {} stitches from hole {}, {:?}, thread {}",
            seq.stitches.len(),
            seq.spec.start_hole,
            seq.termination,
            units.format_length(tally.length)
        );
    }
    info!(
        "{} holes, {} stitches, thread {}",
        template.holes.len(),
        template.plan.stitch_count(),
        units.format_length(template.thread.total_length)
    );
}

/// Build the template for `pattern` and write it as SVG to `output`.
pub fn stitch(pattern: &str, units: Units, output: &Path) -> Result<()> {
    let template = template_from_str_with(pattern, units.defaults())
        .with_context(|| format!("invalid pattern '{pattern}'"))?;
    log_summary(&template, units);

    let text = document_text(&render(&template, pattern, units, &DEFAULT_THEME));
    info!("writing {} bytes to {}", text.len(), output.display());
    fs::write(output, text).with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}
