mod convert;
mod glob_util;
mod verify;

use crate::config::DEFAULT_DUMP_FILE;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reurb-seed")]
#[command(version)]
#[command(
    about = "Convert Supabase dumps into SQLite seed batches and verify REURB seed integrity",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite a Postgres/Supabase dump into SQLite upsert batch files
    Convert {
        /// Input dump file or glob pattern (e.g., dumps/*.sql)
        /// Supports .gz, .bz2, .xz, .zst compression
        #[arg(default_value = DEFAULT_DUMP_FILE)]
        file: PathBuf,

        /// Output directory for batch files (one subdirectory per input for globs)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Rows per batch file
        #[arg(long)]
        batch_size: Option<usize>,

        /// Batch file name prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Target table in the emitted INSERT OR REPLACE header
        #[arg(long)]
        table: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Prepend a comment block to each batch file
        #[arg(long)]
        annotate: bool,

        /// Fail before writing if any row has the wrong value count or trails extra SQL
        #[arg(long)]
        strict: bool,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Show progress while reading the dump
        #[arg(short, long)]
        progress: bool,

        /// Print substitution and row statistics
        #[arg(short, long)]
        verbose: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Check project → quadra → property references in the seed files
    Verify {
        /// Directory holding the seed files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Seed file with projects and quadras (relative to --dir)
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Seed file with properties (relative to --dir)
        #[arg(long)]
        properties: Option<PathBuf>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Write a Markdown integrity report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Show a spinner while checking
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Convert {
            file,
            output,
            batch_size,
            prefix,
            table,
            config,
            annotate,
            strict,
            dry_run,
            progress,
            verbose,
            fail_fast,
        } => convert::run(
            file, output, batch_size, prefix, table, config, annotate, strict, dry_run, progress,
            verbose, fail_fast,
        ),
        Commands::Verify {
            dir,
            seed,
            properties,
            config,
            json,
            report,
            progress,
        } => verify::run(dir, seed, properties, config, json, report, progress),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "reurb-seed", &mut io::stdout());
            Ok(())
        }
    }
}
