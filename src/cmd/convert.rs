//! Convert command CLI handler.

use crate::config::{RewriteProfile, ToolConfig};
use crate::convert::{self, ConvertConfig};
use std::path::{Path, PathBuf};

use super::glob_util::{expand_input_pattern, MultiFileResult};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: PathBuf,
    batch_size: Option<usize>,
    prefix: Option<String>,
    table: Option<String>,
    config: Option<PathBuf>,
    annotate: bool,
    strict: bool,
    dry_run: bool,
    progress: bool,
    verbose: bool,
    fail_fast: bool,
) -> anyhow::Result<()> {
    let tool_config = ToolConfig::load_or_default(config.as_deref())?;
    let profile = resolve_profile(tool_config.convert, batch_size, prefix, table)?;

    let expanded = expand_input_pattern(&file)?;

    let options = RunOptions {
        profile,
        annotate,
        strict,
        dry_run,
        progress,
        verbose,
    };

    if expanded.from_glob {
        run_multi(expanded.files, output, &options, fail_fast)
    } else {
        let file = expanded
            .files
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no input file"))?;
        run_single(file, output, &options)
    }
}

struct RunOptions {
    profile: RewriteProfile,
    annotate: bool,
    strict: bool,
    dry_run: bool,
    progress: bool,
    verbose: bool,
}

impl RunOptions {
    fn config_for(&self, input: PathBuf, output_dir: PathBuf, progress: bool) -> ConvertConfig {
        ConvertConfig {
            input,
            output_dir,
            profile: self.profile.clone(),
            dry_run: self.dry_run,
            progress,
            strict: self.strict,
            annotate: self.annotate,
        }
    }
}

/// Command-line flags win over the config file.
fn resolve_profile(
    mut profile: RewriteProfile,
    batch_size: Option<usize>,
    prefix: Option<String>,
    table: Option<String>,
) -> anyhow::Result<RewriteProfile> {
    if let Some(n) = batch_size {
        if n == 0 {
            anyhow::bail!("--batch-size must be at least 1");
        }
        profile.batch_size = n;
    }
    if let Some(p) = prefix {
        profile.file_prefix = p;
    }
    if let Some(t) = table {
        if t.trim().is_empty() {
            anyhow::bail!("--table must not be empty");
        }
        profile.target.table = t;
    }
    Ok(profile)
}

fn run_single(file: PathBuf, output: PathBuf, options: &RunOptions) -> anyhow::Result<()> {
    let file_size = std::fs::metadata(&file)?.len();
    let file_size_mb = file_size as f64 / (1024.0 * 1024.0);

    eprintln!(
        "Converting dump: {} ({:.2} MB) [batch size: {}]",
        file.display(),
        file_size_mb,
        options.profile.batch_size
    );

    let config = options.config_for(file, output, options.progress);
    let stats = convert::run(config)?;

    for batch in &stats.files {
        eprintln!("  ✓ {} ({} rows)", batch.path.display(), batch.rows);
    }
    eprintln!();
    eprintln!(
        "{} rows in {} file(s)",
        stats.rows_written(),
        stats.files.len()
    );

    print_stats(&stats, options.dry_run, options.verbose);

    Ok(())
}

fn run_multi(
    files: Vec<PathBuf>,
    output_root: PathBuf,
    options: &RunOptions,
    fail_fast: bool,
) -> anyhow::Result<()> {
    let total = files.len();
    let mut result = MultiFileResult::new();
    result.total_files = total;

    eprintln!("Converting {} dumps...\n", total);

    for (idx, file) in files.iter().enumerate() {
        eprintln!("[{}/{}] Converting: {}", idx + 1, total, file.display());

        let output_dir = output_root.join(stem_dir_name(file, idx));
        let config = options.config_for(file.clone(), output_dir.clone(), false);

        match convert::run(config) {
            Ok(stats) => {
                let warning_str = if stats.total_warnings() == 0 {
                    String::new()
                } else {
                    format!(" ({} warnings)", stats.total_warnings())
                };

                eprintln!(
                    "  {} rows → {} file(s){}",
                    stats.rows_written(),
                    stats.files.len(),
                    warning_str
                );
                if !options.dry_run {
                    eprintln!("  → {}", output_dir.display());
                }
                if options.verbose {
                    print_stats(&stats, options.dry_run, true);
                }
                eprintln!();
                result.record_success();
            }
            Err(e) => {
                eprintln!("  Error: {}\n", e);
                result.record_failure(file.clone(), e.to_string());
                if fail_fast {
                    break;
                }
            }
        }
    }

    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("Conversion Summary:");
    eprintln!("  Total files: {}", total);
    eprintln!("  Succeeded: {}", result.succeeded);
    eprintln!("  Failed: {}", result.failed);

    if result.has_failures() {
        eprintln!();
        eprintln!("Failed files:");
        for (path, error) in &result.errors {
            eprintln!("  - {}: {}", path.display(), error);
        }
        std::process::exit(1);
    }

    if options.dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }

    Ok(())
}

/// Per-input subdirectory name; compression suffixes are dropped too.
fn stem_dir_name(file: &Path, idx: usize) -> String {
    let name = file
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("dump_{}", idx + 1));

    let mut stem = name.as_str();
    for ext in [".gz", ".gzip", ".bz2", ".bzip2", ".xz", ".zst", ".zstd"] {
        if let Some(s) = stem.strip_suffix(ext) {
            stem = s;
            break;
        }
    }
    stem.strip_suffix(".sql").unwrap_or(stem).to_string()
}

fn print_stats(stats: &convert::ConvertStats, dry_run: bool, verbose: bool) {
    if verbose {
        let s = &stats.substitutions;
        eprintln!();
        eprintln!("Conversion Statistics:");
        eprintln!("  Rows extracted: {}", stats.rows_extracted);
        eprintln!("  Rows written: {}", stats.rows_written());
        eprintln!("  Batch files: {}", stats.files.len());
        eprintln!("  Schema prefixes stripped: {}", s.schema_prefixes);
        eprintln!("  INSERT → INSERT OR REPLACE: {}", s.upserts);
        eprintln!("  ARRAY literals rewritten: {}", s.arrays);
        eprintln!("  Boolean literals rewritten: {}", s.booleans);
    }

    if !stats.warnings.is_empty() {
        eprintln!();
        eprintln!("Warnings ({}):", stats.total_warnings());
        for warning in &stats.warnings {
            eprintln!("  ⚠ {}", warning);
        }
        if stats.warnings_suppressed > 0 {
            eprintln!("  ... and {} more", stats.warnings_suppressed);
        }
    }

    if dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }
}
