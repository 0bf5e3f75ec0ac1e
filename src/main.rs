use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rect_patterns::canonical::Canonicalizer;
use rect_patterns::dedup::{DedupReport, Occurrence, deduplicate};
use rect_patterns::grid::Grid;
use rect_patterns::pattern_file::{self, PatternWriter};
use rect_patterns::render;
use rect_patterns::report::{Summary, write_duplicate_pairs};
use rect_patterns::types::{
    CanonicalMode, EnumerationConfig, GridSize, OverlapPolicy, Shape, VisibilityMode,
};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "rect_patterns",
    about = "Enumerate distinct placements of rectangles on a grid"
)]
struct Cli {
    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place every shape in every insertion order and deduplicate the results
    Enumerate(EnumerateArgs),
    /// Deduplicate a saved pattern file by exact cell contents
    Dedupe(DedupeArgs),
}

#[derive(clap::Args)]
struct EnumerateArgs {
    /// Grid dimensions as ROWSxCOLS (e.g. 3x9)
    #[arg(long, value_parser = parse_grid)]
    grid: GridSize,

    /// Shapes as HxW:COLOR, optionally HxW:COLOR:fixed to forbid rotation
    /// (e.g. 3x3:R 2x5:G 1x9:B)
    #[arg(long = "shapes", num_args = 1.., required = true, value_parser = parse_shape)]
    shapes: Vec<Shape>,

    /// Disable rotation for every shape
    #[arg(long)]
    no_rotate: bool,

    /// Overlap policy: forbid or allow
    #[arg(long, default_value = "forbid", value_parser = parse_overlap)]
    overlap: OverlapPolicy,

    /// Visibility filter: none, all, or first
    #[arg(long, default_value = "none", value_parser = parse_visibility)]
    visibility: VisibilityMode,

    /// Canonical key: exact, renamed, or symmetric
    #[arg(long, default_value = "exact", value_parser = parse_canonical)]
    canonical: CanonicalMode,

    /// Expand insertion orders on all cores
    #[arg(long)]
    parallel: bool,

    /// Write unique patterns to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Write every generated pattern, duplicates included, to this file
    #[arg(long)]
    save_raw: Option<PathBuf>,

    /// Write duplicate pairs as CSV to this file
    #[arg(long)]
    duplicates: Option<PathBuf>,

    /// List every generated pattern, marking duplicates with their original
    #[arg(long)]
    all: bool,

    /// Print a boxed drawing of each listed pattern
    #[arg(long)]
    layout: bool,
}

#[derive(clap::Args)]
struct DedupeArgs {
    /// Pattern file to read
    file: PathBuf,

    /// Write duplicate pairs as CSV to this file
    #[arg(long)]
    duplicates: Option<PathBuf>,
}

fn parse_grid(s: &str) -> Result<GridSize, String> {
    let (rows, cols) = parse_dimensions(s)?;
    Ok(GridSize::new(rows, cols))
}

fn parse_dimensions(s: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected HxW", s));
    }
    let height = parts[0]
        .parse::<usize>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    let width = parts[1]
        .parse::<usize>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    if height == 0 || width == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok((height, width))
}

fn parse_shape(s: &str) -> Result<Shape, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let (dims, color, fixed) = match parts.as_slice() {
        [dims, color] => (*dims, *color, false),
        [dims, color, "fixed"] => (*dims, *color, true),
        _ => return Err(format!("invalid shape '{}', expected HxW:COLOR[:fixed]", s)),
    };
    let (height, width) = parse_dimensions(dims)?;
    let mut chars = color.chars();
    let color = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(format!("color must be a single character in '{}'", s)),
    };
    Ok(if fixed {
        Shape::fixed(height, width, color)
    } else {
        Shape::new(height, width, color)
    })
}

fn parse_overlap(s: &str) -> Result<OverlapPolicy, String> {
    match s {
        "forbid" => Ok(OverlapPolicy::OverlapForbidden),
        "allow" => Ok(OverlapPolicy::OverlapAllowed),
        _ => Err(format!("invalid overlap policy '{}', expected: forbid or allow", s)),
    }
}

fn parse_visibility(s: &str) -> Result<VisibilityMode, String> {
    match s {
        "none" => Ok(VisibilityMode::None),
        "all" => Ok(VisibilityMode::AllVisible),
        "first" => Ok(VisibilityMode::FirstOnly),
        _ => Err(format!(
            "invalid visibility mode '{}', expected: none, all, or first",
            s
        )),
    }
}

fn parse_canonical(s: &str) -> Result<CanonicalMode, String> {
    match s {
        "exact" => Ok(CanonicalMode::Exact),
        "renamed" => Ok(CanonicalMode::Renamed),
        "symmetric" => Ok(CanonicalMode::Symmetric),
        _ => Err(format!(
            "invalid canonical mode '{}', expected: exact, renamed, or symmetric",
            s
        )),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn write_duplicates(path: &Path, report: &DedupReport) {
    let file = File::create(path).unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
    write_duplicate_pairs(BufWriter::new(file), &report.duplicates)
        .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
    println!("Duplicate pairs saved to '{}'", path.display());
}

fn print_pattern(title: &str, grid: &Grid, layout: bool) {
    if layout {
        print!("{}:\n{}", title, render::render_pattern(grid));
    } else {
        print!("{}:\n{}", title, grid);
    }
    println!();
}

fn print_occurrence(index: usize, grid: &Grid, occurrence: Occurrence, layout: bool) {
    let title = match occurrence {
        Occurrence::First => format!("Pattern {}", index + 1),
        Occurrence::Duplicate { original, .. } => {
            format!("Pattern {} (duplicate of {})", index + 1, original + 1)
        }
    };
    print_pattern(&title, grid, layout);
}

fn enumerate(args: EnumerateArgs) {
    let shapes: Vec<Shape> = args
        .shapes
        .into_iter()
        .map(|s| Shape {
            allow_rotate: s.allow_rotate && !args.no_rotate,
            ..s
        })
        .collect();
    let config = EnumerationConfig {
        overlap: args.overlap,
        visibility: args.visibility,
        canonical: args.canonical,
    };

    println!("Grid size: {}", args.grid);
    for (i, shape) in shapes.iter().enumerate() {
        let rot = if shape.allow_rotate { "" } else { " [fixed]" };
        println!("Shape {}: {}{}", i + 1, shape, rot);
    }
    println!();

    let mut raw = args.save_raw.as_deref().map(|path| {
        let file =
            File::create(path).unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
        (path, PatternWriter::new(BufWriter::new(file)))
    });
    let mut raw_error = None;

    let report = rect_patterns::run_with(
        args.grid,
        shapes,
        config,
        args.parallel,
        |index, grid, occurrence| {
            if args.all {
                print_occurrence(index, grid, occurrence, args.layout);
            }
            if let Some((_, writer)) = raw.as_mut()
                && raw_error.is_none()
                && let Err(e) = writer.write(grid)
            {
                raw_error = Some(e);
            }
        },
    )
    .unwrap_or_else(|e| fail(e));

    if !args.all {
        for (n, unique) in report.unique.iter().enumerate() {
            print_pattern(&format!("Pattern {}", n + 1), &unique.grid, args.layout);
        }
    }

    if let Some((path, mut writer)) = raw {
        if let Some(e) = raw_error {
            fail(format!("{}: {}", path.display(), e));
        }
        writer
            .flush()
            .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
        println!(
            "Saved {} raw patterns to '{}'",
            writer.written(),
            path.display()
        );
    }
    if let Some(path) = &args.save {
        let file =
            File::create(path).unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
        pattern_file::write_patterns(BufWriter::new(file), report.unique_grids())
            .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
        println!(
            "Saved {} patterns to '{}'",
            report.unique_count(),
            path.display()
        );
    }
    if let Some(path) = &args.duplicates {
        write_duplicates(path, &report);
    }

    println!("{}", Summary::from_report(&report));
}

fn dedupe(args: DedupeArgs) {
    let text = std::fs::read_to_string(&args.file)
        .unwrap_or_else(|e| fail(format!("{}: {}", args.file.display(), e)));
    let grids = pattern_file::parse_patterns(&text).unwrap_or_else(|e| fail(e));

    let report = deduplicate(&Canonicalizer::new(CanonicalMode::Exact, &[]), grids);
    for pair in &report.duplicates {
        println!(
            "Pattern {} duplicates pattern {}",
            pair.duplicate + 1,
            pair.original + 1
        );
    }
    if let Some(path) = &args.duplicates {
        write_duplicates(path, &report);
    }

    println!(
        "Summary: {} total, {} unique, {} duplicates skipped",
        report.raw_total,
        report.unique_count(),
        report.duplicates.len(),
    );
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Command::Enumerate(args) => enumerate(args),
        Command::Dedupe(args) => dedupe(args),
    }
}
