// Command-line interface for packdelta.
//
// Three subcommands mapping onto the library surface: `diff` encodes,
// `apply` reconstructs, `inspect` prints the header and opcode breakdown of
// an existing delta. `config` reports build details.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::encoder::diff;
use crate::format::apply::{apply, read_header, DeltaIter};
use crate::format::opcode::DeltaOp;
use crate::io::{apply_file, diff_file};

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024u64),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1u64),
    };
    let num: u64 = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Binary delta encoder/applier (Git packfile delta format).
#[derive(Parser, Debug)]
#[command(
    name = "packdelta",
    version,
    about = "Binary delta encoder/applier",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compute the delta that rebuilds TARGET from REFERENCE.
    Diff(DiffArgs),
    /// Apply a delta to REFERENCE, reconstructing the target.
    Apply(ApplyArgs),
    /// Print header and opcode breakdown of a delta.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Reference file (the old version).
    #[arg(value_hint = ValueHint::FilePath)]
    reference: PathBuf,

    /// Target file (the new version).
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,

    /// Delta output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    delta: Option<PathBuf>,

    /// Fail if the delta would exceed this many bytes (supports K/M/G suffix).
    #[arg(long = "max-size", value_parser = parse_byte_size)]
    max_size: Option<u64>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Reference file the delta was made against.
    #[arg(value_hint = ValueHint::FilePath)]
    reference: PathBuf,

    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,

    /// Reconstructed output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn refuse_overwrite(path: &Path, force: bool) -> bool {
    if !force && path.exists() {
        eprintln!(
            "packdelta: {}: already exists (use --force to overwrite)",
            path.display()
        );
        return true;
    }
    false
}

fn write_stdout(data: &[u8]) -> i32 {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(data).and_then(|()| stdout.flush()) {
        eprintln!("packdelta: stdout: {e}");
        return 1;
    }
    0
}

fn cmd_diff(cli: &Cli, args: &DiffArgs) -> i32 {
    let limit = args.max_size.map(|m| m as usize);

    match &args.delta {
        Some(delta_path) => {
            if refuse_overwrite(delta_path, cli.force) {
                return 1;
            }
            match diff_file(&args.reference, &args.target, delta_path, limit) {
                Ok(stats) => {
                    if !cli.quiet && cli.verbose > 0 {
                        eprintln!(
                            "packdelta: reference {} target {} delta {} ({:.1}%)",
                            stats.reference_size,
                            stats.target_size,
                            stats.delta_size,
                            stats.ratio() * 100.0
                        );
                    }
                    0
                }
                Err(e) => {
                    eprintln!("packdelta: {e}");
                    1
                }
            }
        }
        None => {
            let (reference, target) = match (fs::read(&args.reference), fs::read(&args.target)) {
                (Ok(r), Ok(t)) => (r, t),
                (Err(e), _) => {
                    eprintln!("packdelta: {}: {e}", args.reference.display());
                    return 1;
                }
                (_, Err(e)) => {
                    eprintln!("packdelta: {}: {e}", args.target.display());
                    return 1;
                }
            };
            match diff(&reference, &target, limit) {
                Ok(delta) => write_stdout(&delta),
                Err(e) => {
                    eprintln!("packdelta: {e}");
                    1
                }
            }
        }
    }
}

fn cmd_apply(cli: &Cli, args: &ApplyArgs) -> i32 {
    match &args.output {
        Some(output_path) => {
            if refuse_overwrite(output_path, cli.force) {
                return 1;
            }
            match apply_file(&args.reference, &args.delta, output_path) {
                Ok(stats) => {
                    if !cli.quiet && cli.verbose > 0 {
                        eprintln!(
                            "packdelta: delta {} output {}",
                            stats.delta_size, stats.output_size
                        );
                    }
                    0
                }
                Err(e) => {
                    eprintln!("packdelta: {e}");
                    1
                }
            }
        }
        None => {
            let (reference, delta) = match (fs::read(&args.reference), fs::read(&args.delta)) {
                (Ok(r), Ok(d)) => (r, d),
                (Err(e), _) => {
                    eprintln!("packdelta: {}: {e}", args.reference.display());
                    return 1;
                }
                (_, Err(e)) => {
                    eprintln!("packdelta: {}: {e}", args.delta.display());
                    return 1;
                }
            };
            match apply(&reference, &delta) {
                Ok(output) => write_stdout(&output),
                Err(e) => {
                    eprintln!("packdelta: {e}");
                    1
                }
            }
        }
    }
}

fn cmd_inspect(cli: &Cli, args: &InspectArgs) -> i32 {
    let delta = match fs::read(&args.delta) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("packdelta: {}: {e}", args.delta.display());
            return 1;
        }
    };

    let (reference_size, target_size, header_len) = match read_header(&delta) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("packdelta: invalid delta header: {e}");
            return 1;
        }
    };

    println!("reference size: {reference_size}");
    println!("target size:    {target_size}");

    let mut copies: u64 = 0;
    let mut inserts: u64 = 0;
    let mut copied_bytes: u64 = 0;
    let mut inserted_bytes: u64 = 0;
    for op in DeltaIter::new(&delta[header_len..]) {
        match op {
            Ok(DeltaOp::Copy { offset, len }) => {
                copies += 1;
                copied_bytes += len as u64;
                if cli.verbose > 0 {
                    println!("  copy   offset={offset} len={len}");
                }
            }
            Ok(DeltaOp::Insert(literal)) => {
                inserts += 1;
                inserted_bytes += literal.len() as u64;
                if cli.verbose > 0 {
                    println!("  insert len={}", literal.len());
                }
            }
            Err(e) => {
                eprintln!("packdelta: opcode decode: {e}");
                return 1;
            }
        }
    }

    println!("opcodes:        {} ({copies} copy, {inserts} insert)", copies + inserts);
    println!("copied bytes:   {copied_bytes}");
    println!("inserted bytes: {inserted_bytes}");
    0
}

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("packdelta version {version} (Rust), Copyright (C) packdelta contributors");
    let simd = cfg!(feature = "simd") as u8;
    let file_io = cfg!(feature = "file-io") as u8;
    eprintln!("SIMD={simd}");
    eprintln!("FILE_IO={file_io}");
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Diff(args) => cmd_diff(&cli, args),
        Cmd::Apply(args) => cmd_apply(&cli, args),
        Cmd::Inspect(args) => cmd_inspect(&cli, args),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
