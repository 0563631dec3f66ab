//! treekit CLI
//!
//! Entry point for the `treekit` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use treekit::{
    deep_equal, generate_random, generate_uuid, load_value, logging, shallow_equal, to_json,
    DocumentError, LayeredDocument, MergeMode,
};

#[derive(Parser)]
#[command(name = "treekit")]
#[command(about = "Merge and compare JSON/TOML value trees", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge files in order (first is the base, last wins) and print JSON
    Merge {
        /// Replace top-level keys instead of merging nested objects
        #[arg(long)]
        shallow: bool,

        /// Print RFC 8785 canonical JSON instead of pretty JSON
        #[arg(long)]
        canonical: bool,

        /// Include layer provenance (paths, digests) in the output
        #[arg(long)]
        provenance: bool,

        /// Override a value after all files, e.g. --set cache.mode=on
        #[arg(long = "set", value_name = "PATH=VALUE")]
        overrides: Vec<String>,

        /// JSON or TOML files to merge
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare two files structurally; exits 0 when equal, 1 otherwise
    Equal {
        /// Compare top-level values by identity only
        #[arg(long)]
        shallow: bool,

        left: PathBuf,

        right: PathBuf,
    },

    /// Print a random identifier
    Random {
        /// Number of characters
        #[arg(long, short = 'n', default_value_t = 8)]
        length: usize,

        /// Print a v4 UUID instead
        #[arg(long)]
        uuid: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Merge {
            shallow,
            canonical,
            provenance,
            overrides,
            files,
        } => {
            let mode = if shallow { MergeMode::Shallow } else { MergeMode::Deep };
            match run_merge(mode, canonical, provenance, &overrides, &files) {
                Ok(output) => println!("{}", output),
                Err(e) => fail(&e),
            }
        }
        Commands::Equal {
            shallow,
            left,
            right,
        } => match run_equal(shallow, &left, &right) {
            Ok(equal) => {
                println!("{}", equal);
                process::exit(if equal { 0 } else { 1 });
            }
            Err(e) => fail(&e),
        },
        Commands::Random { length, uuid } => {
            if uuid {
                println!("{}", generate_uuid());
            } else {
                println!("{}", generate_random(length));
            }
        }
    }
}

fn fail(error: &DocumentError) -> ! {
    eprintln!("Error: {}", error);
    process::exit(2);
}

fn run_merge(
    mode: MergeMode,
    canonical: bool,
    provenance: bool,
    overrides: &[String],
    files: &[PathBuf],
) -> Result<String, DocumentError> {
    let mut builder = LayeredDocument::builder().mode(mode);
    for file in files {
        builder = builder.file(file)?;
    }
    for assignment in overrides {
        builder = builder.set(assignment)?;
    }
    let document = builder.build();
    tracing::info!(files = files.len(), overrides = overrides.len(), "merged");

    let json = if provenance {
        document.to_json_value()?
    } else {
        to_json(&document.value)?
    };

    if canonical {
        let bytes = serde_json_canonicalizer::to_vec(&json)
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DocumentError::Serialize(e.to_string()))
    } else {
        serde_json::to_string_pretty(&json).map_err(|e| DocumentError::Serialize(e.to_string()))
    }
}

fn run_equal(shallow: bool, left: &Path, right: &Path) -> Result<bool, DocumentError> {
    let (a, b) = (load_value(left)?, load_value(right)?);
    let equal = if shallow {
        shallow_equal(&a, &b)
    } else {
        deep_equal(&a, &b)
    };
    tracing::debug!(shallow, equal, "compared");
    Ok(equal)
}
