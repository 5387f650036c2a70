//! gzsalvage CLI
//!
//! Compress, decompress, verify and salvage truncated GZIP files.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use commands::{
    cmd_completions, cmd_compress, cmd_decompress, cmd_info, cmd_recover, cmd_repair,
    cmd_restore, cmd_verify,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gzsalvage")]
#[command(
    author,
    version,
    about = "Compress, decompress and salvage truncated GZIP files"
)]
#[command(long_about = "
gzsalvage reads and writes GZIP files and recovers the readable part of
GZIP files whose writer died before finishing them.

Exit codes:
  0  success
  1  failure
  3  partial recovery (the source was truncated, the prefix was salvaged)

Examples:
  gzsalvage compress events.log
  gzsalvage decompress events.log.gz
  gzsalvage recover events.log.gz -o events.partial.log
  gzsalvage repair events.log.gz events.repaired.gz
  gzsalvage verify *.gz
  gzsalvage restore /var/spool/pipeline --pattern 'ls.s3.*.gz'
  gzsalvage info events.log.gz
  gzsalvage completions bash > /etc/bash_completion.d/gzsalvage
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output as JSON (machine-readable)
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into GZIP
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (default: input with .gz appended)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decompress a GZIP file; any damage is an error
    #[command(alias = "d")]
    Decompress {
        /// GZIP file to decompress
        input: PathBuf,

        /// Output file (default: input without its .gz suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decompress a GZIP file, keeping everything before a truncation
    #[command(alias = "r")]
    Recover {
        /// GZIP file to recover
        input: PathBuf,

        /// Output file (default: input without its .gz suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a truncated GZIP file as a complete one
    Repair {
        /// Truncated GZIP file
        input: PathBuf,

        /// Repaired GZIP file to write
        output: PathBuf,
    },

    /// Check GZIP files without writing anything
    #[command(alias = "t")]
    Verify {
        /// GZIP files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Repair every truncated GZIP file in a directory in place
    Restore {
        /// Directory to scan (not recursive)
        dir: PathBuf,

        /// File name pattern (glob syntax)
        #[arg(short, long, default_value = gzsalvage::DEFAULT_PATTERN)]
        pattern: String,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Show the GZIP header and health of a file
    #[command(alias = "i")]
    Info {
        /// GZIP file to inspect
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("gzsalvage {}", env!("CARGO_PKG_VERSION"));

    let json = cli.json;
    let result = match cli.command {
        Commands::Compress { input, output } => cmd_compress(&input, output, json),
        Commands::Decompress { input, output } => cmd_decompress(&input, output, json),
        Commands::Recover { input, output } => cmd_recover(&input, output, json),
        Commands::Repair { input, output } => cmd_repair(&input, &output, json),
        Commands::Verify { files } => cmd_verify(&files, json),
        Commands::Restore {
            dir,
            pattern,
            progress,
        } => cmd_restore(&dir, &pattern, progress && !json, json),
        Commands::Info { file } => cmd_info(&file, json),
        Commands::Completions { shell } => cmd_completions(shell),
    };

    match result {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
