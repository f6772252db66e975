//! yolo-verify: integrity checks for YOLO object-detection datasets.
//!
//! A dataset root holds `images/{train,val}`, `labels/{train,val}` and a
//! `data.yaml` descriptor. Verification checks that the layout is complete,
//! that every image has a label file, and that every label line is a
//! well-formed, normalized record with an allowed class id.
//!
//! # Modules
//!
//! - [`layout`]: Dataset root paths and splits
//! - [`discover`]: Image enumeration per split
//! - [`label`]: Label line parsing and per-file validation
//! - [`verify`]: Aggregation, verdict and report
//! - [`error`]: Error types for yolo-verify operations

pub mod discover;
pub mod error;
pub mod label;
pub mod layout;
pub mod verify;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use error::VerifyError;
pub use verify::{verify_dataset, Verdict, VerifyOptions, VerifyReport};

/// The yolo-verify CLI application.
#[derive(Parser)]
#[command(name = "yolo-verify")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Verify a dataset directory for structural and label errors.
    Verify(VerifyArgs),
}

/// Arguments for the verify subcommand.
#[derive(clap::Args)]
struct VerifyArgs {
    /// Dataset root containing images/, labels/ and data.yaml.
    #[arg(default_value = "dataset", env = "YOLO_VERIFY_DATASET")]
    dataset_dir: PathBuf,

    /// Allowed class ids, comma-separated.
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    classes: Vec<u32>,

    /// Treat warnings as failures (exit non-zero if any split is empty).
    #[arg(long)]
    strict: bool,

    /// Worker threads for label checks (1 = sequential).
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// In text output, list every issue with its file and line.
    #[arg(long)]
    details: bool,
}

/// Run the yolo-verify CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VerifyError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Verify(args)) => run_verify(args),
        None => {
            println!("yolo-verify {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Integrity checks for YOLO object-detection datasets.");
            println!();
            println!("Run 'yolo-verify --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Execute the verify subcommand.
fn run_verify(args: VerifyArgs) -> Result<(), VerifyError> {
    let json = match args.output.as_str() {
        "text" => false,
        "json" => true,
        other => {
            return Err(VerifyError::UnsupportedOutput(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    };

    let opts = VerifyOptions {
        allowed_classes: label::ClassSet::new(args.classes)?,
        strict: args.strict,
        jobs: args.jobs,
    };

    let root = std::path::absolute(&args.dataset_dir).unwrap_or(args.dataset_dir);
    let report = verify_dataset(&root, &opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
        if args.details {
            println!();
            print!("{}", report.details());
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(VerifyError::VerificationFailed {
            verdict: report.verdict,
            report: Box::new(report),
        })
    }
}
