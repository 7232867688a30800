//! Command-line entry point for the `circle-stitcher` tool.
//!
//! Turns a stitching pattern into an SVG template ready to print, glue to
//! card and punch.

use std::{fmt::Display, path::PathBuf, process};

use clap::Parser;
use log::LevelFilter;

/// CLI command implementations.
mod cmd;
/// SVG rendering of templates.
mod render;

use crate::render::Units;

/// Long help: the pattern language and some worked examples.
const LONG_ABOUT: &str = "\
Generate a circular stitching template as SVG.

COMMANDS is a pattern made of optional global settings followed by one or
more sequences separated by ';'.

Globals (any order, each at most once):
  W n       card width and height (default 3.65 in / 92.71 mm)
  H n       number of holes (default 32)
  OC n      radius of the hole circle (default 0.73 in / 18.542 mm)
  K n       pointiness: 0 is a circle, up to 1 (default 0)
  N n       number of sides of the shape (default 1)
  M n       points per side of the shape (default 0)
  IC n      radius of the punched centre hole (default 0.63 in / 16.002 mm)

Sequence:
  L a,b,..  holes to advance for each stitch, used in turn
  S n       starting hole, 0 on the right counting clockwise (default 0)
  C n       number of stitches (default: until the pattern repeats)

Examples:
  circle-stitcher -o simple.svg 'L 10,1'
  circle-stitcher -o complex.svg 'H 16 L 7,1 S 2 ; L 4 C 2'
  circle-stitcher -o hexagon.svg 'H 42 OC 1.1 K 0.8 N 6 M 3 IC 0.7 L 16,3'";

#[derive(Parser)]
#[command(name = "circle-stitcher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate a circular stitching template as SVG", long_about = LONG_ABOUT)]
/// Command-line options.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Interpret lengths as millimetres.
    #[arg(long, overrides_with = "inch", help = "Lengths are in millimetres")]
    mm: bool,

    /// Interpret lengths as inches.
    #[arg(long, overrides_with = "mm", help = "Lengths are in inches (default)")]
    inch: bool,

    /// Output SVG path.
    #[arg(short = 'o', long = "out", value_name = "FILE", help = "Output SVG file")]
    out: PathBuf,

    /// Stitching pattern.
    #[arg(value_name = "COMMANDS", help = "Stitching pattern, e.g. 'H 16 L 7,1 S 2 ; L 4 C 2'")]
    commands: String,
}

impl Cli {
    /// Units selected on the command line; the last of `--mm`/`--inch` wins.
    fn units(&self) -> Units {
        if self.mm {
            Units::Millimetre
        } else {
            Units::Inch
        }
    }
}

/// Map the `-v` count onto a log level.
fn verbosity_filter(v: u8) -> LevelFilter {
    match v {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. `RUST_LOG` takes precedence over `-v`.
fn init_logger(v: u8) {
    env_logger::Builder::new()
        .filter_level(verbosity_filter(v))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Print a success message or exit with an error.
fn report_ok<E: Display>(result: Result<(), E>, ok_msg: &str) {
    match result {
        Ok(()) => println!("{ok_msg}"),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.v);
    report_ok(cmd::stitch(&cli.commands, cli.units(), &cli.out), "OK!");
}
