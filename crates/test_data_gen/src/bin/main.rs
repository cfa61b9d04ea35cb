//! CLI for generating REURB fixtures.
//!
//! Usage:
//!   # Supabase dump for `reurb-seed convert`
//!   gen-fixtures dump --scale medium > reurb_properties_rows.sql
//!
//!   # seed.sql + seed-properties.sql for `reurb-seed verify`
//!   gen-fixtures seeds --output-dir fixtures/ --orphan-properties 3

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use test_data_gen::{Generator, OrphanConfig, RenderConfig, Renderer, Scale};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// Postgres/Supabase dump of reurb_properties
    Dump,
    /// seed.sql and seed-properties.sql
    Seeds,
}

#[derive(Parser, Debug)]
#[command(name = "gen-fixtures")]
#[command(about = "Generate REURB SQL fixtures for reurb-seed", long_about = None)]
struct Args {
    /// What to generate
    #[arg(value_enum)]
    kind: Kind,

    /// Scale preset: small, medium, large
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output file for `dump` (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for `seeds`
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Quadras pointing at a missing project
    #[arg(long, default_value = "0")]
    orphan_quadras: usize,

    /// Properties pointing at a missing quadra
    #[arg(long, default_value = "0")]
    orphan_properties: usize,

    /// Rows per INSERT statement in the seed files
    #[arg(long, default_value = "50")]
    rows_per_insert: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut gen = Generator::new(args.seed, scale);
    let data = gen.generate_with_orphans(OrphanConfig {
        quadras: args.orphan_quadras,
        properties: args.orphan_properties,
    });

    let renderer = Renderer::new(RenderConfig {
        rows_per_insert: args.rows_per_insert,
        header: true,
    });

    match args.kind {
        Kind::Dump => {
            if let Some(ref path) = args.output {
                let mut w = BufWriter::new(File::create(path)?);
                renderer.render_supabase_dump(&data, &mut w)?;
                w.flush()?;
                eprintln!(
                    "Generated {} property rows to {}",
                    data.properties.len(),
                    path.display()
                );
            } else {
                let stdout = io::stdout();
                let mut w = stdout.lock();
                renderer.render_supabase_dump(&data, &mut w)?;
            }
        }
        Kind::Seeds => {
            std::fs::create_dir_all(&args.output_dir)?;

            let seed_path = args.output_dir.join("seed.sql");
            let mut w = BufWriter::new(File::create(&seed_path)?);
            renderer.render_seed(&data, &mut w)?;
            w.flush()?;

            let props_path = args.output_dir.join("seed-properties.sql");
            let mut w = BufWriter::new(File::create(&props_path)?);
            renderer.render_seed_properties(&data, &mut w)?;
            w.flush()?;

            eprintln!(
                "Generated {} projects, {} quadras, {} properties in {}",
                data.projects.len(),
                data.quadras.len(),
                data.properties.len(),
                args.output_dir.display()
            );
        }
    }

    Ok(())
}
