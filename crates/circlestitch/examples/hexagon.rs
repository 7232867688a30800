//! Minimal example: build the hexagon template and print its stitches.

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // snips-start: example
    let template = circlestitch::template_from_str("H 42 OC 1.1 K 0.8 N 6 M 3 IC 0.7 L 16,3")?;
    println!(
        "{} holes, {} stitches, {:.2} in of thread",
        template.holes.len(),
        template.plan.stitch_count(),
        template.thread.total_length
    );

    for stitch in template.plan.stitches().take(6) {
        println!("{:>2} -> {:>2} ({})", stitch.from, stitch.to, stitch.side.name());
    }
    // snips-end: example

    Ok(())
}
