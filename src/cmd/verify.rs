//! Verify command CLI handler.

use crate::config::ToolConfig;
use crate::verify::{self, render_markdown, render_text, VerifyOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[allow(clippy::too_many_arguments)]
pub fn run(
    dir: PathBuf,
    seed: Option<PathBuf>,
    properties: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
    report: Option<PathBuf>,
    progress: bool,
) -> anyhow::Result<()> {
    let tool_config = ToolConfig::load_or_default(config.as_deref())?;
    let profile = tool_config.verify;

    let seed_path = dir.join(seed.unwrap_or_else(|| profile.seed_file.clone()));
    let properties_path = dir.join(properties.unwrap_or_else(|| profile.properties_file.clone()));

    if !json {
        eprintln!(
            "Verifying: {} + {}",
            seed_path.display(),
            properties_path.display()
        );
        eprintln!();
    }

    let start_time = Instant::now();

    let pb = if progress && !json {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Checking relationships...");
        Some(pb)
    } else {
        None
    };

    let options = VerifyOptions {
        seed_path,
        properties_path,
        profile,
    };

    let result = verify::run(&options);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let integrity = result?;

    let elapsed = start_time.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&integrity)?);
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        render_text(&integrity, &mut out)?;
        eprintln!();
        eprintln!("  Time: {:.3?}", elapsed);
    }

    if let Some(path) = report {
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        write_report(&path, |w| render_markdown(&integrity, &generated_at, w))
            .map_err(|e| anyhow::anyhow!("cannot write report {}: {}", path.display(), e))?;
        if !json {
            eprintln!("  Report: {}", path.display());
        }
    }

    if !integrity.passed {
        std::process::exit(integrity.exit_code());
    }

    Ok(())
}

fn write_report(
    path: &Path,
    render: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    render(&mut writer)?;
    writer.flush()
}
