//! CLI entry point for duflat

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process;

use chrono::Utc;
use clap::{ArgAction, Parser, ValueEnum};
use duflat::oracle::DEFAULT_DU_PROGRAM;
use duflat::tree::DEFAULT_MAX_NODES;
use duflat::{
    ChunkFormatter, DuOracle, FlattenConfig, Flattener, FsLister, IgnoreSet, LineProtocolSink,
    OutputConfig, UsageNode, export_chunks, print_json,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_NUM_LINES: NonZeroUsize = match NonZeroUsize::new(DEFAULT_MAX_NODES) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "duflat")]
#[command(about = "Produces a flat summary of disk usage")]
#[command(version)]
struct Args {
    /// Where to scan
    #[arg(value_name = "DIR", conflicts_with = "dir")]
    path: Option<PathBuf>,

    /// Where to scan [default: .]
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// How many lines of output to produce
    #[arg(short = 'n', long = "num-lines", default_value_t = DEFAULT_NUM_LINES)]
    num_lines: NonZeroUsize,

    /// Skip a path (contains '/') or file name pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Do not skip /proc and /sys
    #[arg(long = "no-default-ignores")]
    no_default_ignores: bool,

    /// Print sizes in human-readable units (K, M, G)
    #[arg(short = 'H', long = "human")]
    human: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Export results as line protocol to FILE ('-' for stdout)
    #[arg(long = "export", value_name = "FILE")]
    export: Option<PathBuf>,

    /// Program used to measure directories (called as `PROGRAM -s --bytes DIR`)
    #[arg(long = "du-program", value_name = "PROGRAM", default_value = DEFAULT_DU_PROGRAM)]
    du_program: String,

    /// Log progress to stderr (-v for info, -vv for every scanned directory)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let root = args
        .dir
        .clone()
        .or_else(|| args.path.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    if root.symlink_metadata().is_err() {
        eprintln!(
            "duflat: cannot access '{}': No such file or directory",
            root.display()
        );
        process::exit(1);
    }

    let mut ignore = if args.no_default_ignores {
        IgnoreSet::new()
    } else {
        IgnoreSet::with_defaults()
    };
    for entry in &args.ignore {
        ignore.add(entry);
    }

    let flattener = Flattener::new(
        FlattenConfig {
            max_nodes: args.num_lines.get(),
        },
        DuOracle::new(args.du_program.clone()),
        FsLister::new(ignore),
    );

    let chunks = flattener.flatten(&root).unwrap_or_else(|e| {
        eprintln!("duflat: {}", e);
        process::exit(1);
    });

    if let Some(ref target) = args.export {
        if let Err(e) = export(target, &chunks) {
            eprintln!("duflat: cannot export to '{}': {}", target.display(), e);
            process::exit(1);
        }
        // Line protocol on stdout replaces the normal listing
        if target == Path::new("-") {
            return;
        }
    }

    let result = if args.json {
        print_json(&root, &chunks)
    } else {
        let formatter = ChunkFormatter::new(OutputConfig {
            use_color: should_use_color(args.color),
            human: args.human,
        });
        formatter.print(&chunks)
    };

    if let Err(e) = result {
        eprintln!("duflat: error writing output: {}", e);
        process::exit(1);
    }
}

fn export(target: &Path, chunks: &[UsageNode]) -> io::Result<()> {
    let timestamp = Utc::now();
    if target == Path::new("-") {
        let mut sink = LineProtocolSink::new(io::stdout().lock());
        export_chunks(&mut sink, chunks, timestamp)
    } else {
        let mut sink = LineProtocolSink::new(BufWriter::new(File::create(target)?));
        export_chunks(&mut sink, chunks, timestamp)
    }
}
