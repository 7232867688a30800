//! Project automation tasks.
//!
//! Run via `cargo xtask <command>`.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Patterns rendered by `gallery`, with their output file stems.
const GALLERY: &[(&str, &str)] = &[
    ("simple", "L 10,1"),
    ("complex", "H 16 L 7,1 S 2 ; L 4 C 2"),
    ("three-numbers", "L 16,1,10"),
    ("hexagon", "H 42 OC 1.1 K 0.8 N 6 M 3 IC 0.7 L 16,3"),
    ("pentagon", "H 35 OC 1.1 K 0.9 N 5 M 2 IC 0.7 L 15,1"),
    (
        "cross-hatch",
        "L 8,1, 22,31, 12,1, 18,31, 16,1, 14,31, 20,1, 10,31 C 33",
    ),
];

/// Command line interface for the `xtask` helper.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
struct Cli {
    /// Task to run.
    #[command(subcommand)]
    command: CommandName,
}

/// Supported automation commands.
#[derive(Debug, Subcommand)]
enum CommandName {
    /// Format the workspace and run the linter.
    Tidy,
    /// Run tests using cargo nextest.
    Test,
    /// Render the example patterns into `gallery/`.
    Gallery {
        /// Render lengths in millimetres.
        #[arg(long)]
        mm: bool,
    },
}

/// Common repository paths computed relative to the `xtask` crate.
#[derive(Debug, Clone)]
struct RepoPaths {
    /// Repository root directory.
    root: PathBuf,
    /// `gallery/` output directory.
    gallery: PathBuf,
}

impl RepoPaths {
    /// Discover repository paths from `CARGO_MANIFEST_DIR`.
    fn discover() -> Result<Self> {
        let xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = xtask_dir
            .parent()
            .context("xtask crate must live at <repo>/xtask")?
            .to_path_buf();

        Ok(Self {
            gallery: root.join("gallery"),
            root,
        })
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

/// Dispatch the selected `xtask` command.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = RepoPaths::discover()?;

    match cli.command {
        CommandName::Tidy => tidy(&paths),
        CommandName::Test => test(&paths),
        CommandName::Gallery { mm } => gallery(&paths, mm),
    }
}

/// Run `cargo fmt` and the workspace linter.
fn tidy(paths: &RepoPaths) -> Result<()> {
    format_workspace(paths)?;
    lint_workspace(paths)?;
    format_workspace(paths)?;
    Ok(())
}

/// Run tests using cargo nextest.
fn test(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(sh, "cargo nextest run --all").run()?;
    Ok(())
}

/// Format the Rust workspace using rustfmt.
fn format_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;

    let config = paths.root.join("rustfmt-nightly.toml");
    if config.is_file() {
        cmd!(sh, "cargo +nightly fmt --all -- --config-path {config}").run()?;
        return Ok(());
    }

    cmd!(sh, "cargo +nightly fmt --all").run()?;
    Ok(())
}

/// Run clippy across the workspace, applying safe fixes.
fn lint_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(
        sh,
        "cargo clippy -q --fix --all --all-targets --all-features --allow-dirty --tests --examples"
    )
    .run()?;
    Ok(())
}

/// Create a verbose shell rooted at the repository root.
fn repo_shell(paths: &RepoPaths) -> Result<Shell> {
    let sh = Shell::new()?;
    sh.change_dir(&paths.root);
    Ok(sh)
}

/// Render every gallery pattern with the release CLI.
fn gallery(paths: &RepoPaths, mm: bool) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(sh, "cargo build --release --bin circle-stitcher").run()?;
    let bin = paths
        .root
        .join("target")
        .join("release")
        .join("circle-stitcher");

    prepare_dir(&paths.gallery)?;
    let units = if mm { "--mm" } else { "--inch" };
    for (stem, pattern) in GALLERY {
        let out = paths.gallery.join(format!("{stem}.svg"));
        cmd!(sh, "{bin} {units} -o {out} {pattern}").run()?;
    }

    println!();
    println!("Rendered:");
    for path in sorted_files(&paths.gallery)? {
        println!("{}", describe_file(&path)?);
    }
    Ok(())
}

/// Create or clean an output directory.
fn prepare_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        println!("Removing existing {} ...", dir.display());
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove existing dir {}", dir.display()))?;
    }

    fs::create_dir_all(dir).with_context(|| format!("failed to create dir {}", dir.display()))?;
    Ok(())
}

/// Return the files in `dir`, sorted by filename.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read directory entry in {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Describe a file size and basename.
fn describe_file(path: &Path) -> Result<String> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat file {}", path.display()))?;
    let size = human_size(metadata.len());
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    Ok(format!("{size} \t{name}"))
}

/// Render a byte count as a human-friendly string.
fn human_size(bytes: u64) -> String {
    let units = ["B", "KB", "MB"];
    let mut amount = bytes as f64;

    for unit in units {
        if amount < 1024.0 || unit == units[units.len() - 1] {
            return format!("{amount:.1} {unit}");
        }
        amount /= 1024.0;
    }

    format!("{amount:.1} GB")
}
