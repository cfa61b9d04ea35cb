//! Convert command: rewrite a Supabase/PostgreSQL row export into SQLite
//! upsert batches.
//!
//! The pipeline is a fixed sequence of whole-document text substitutions
//! followed by extraction and re-batching:
//! - Schema qualifier stripping (`"public".reurb_properties` → `reurb_properties`)
//! - Insert verb to upsert (`INSERT INTO` → `INSERT OR REPLACE INTO`)
//! - Array literals to JSON strings (`ARRAY['a','b']` → `'["a","b"]'`)
//! - Quoted booleans to integers (`'true'` → `1`, `'false'` → `0`)
//! - Tuple list extraction and batching into `{prefix}{k}.sql` files

mod batch;
mod warnings;

pub use batch::{batch_file_name, plan_batches, render_batch, Annotation, Batch};
pub use warnings::{ConvertWarning, WarningCollector};

use crate::config::RewriteProfile;
use crate::parser::{values_block, RowSplitter, SplitRows};
use crate::progress::byte_bar;
use crate::writer::BatchWriter;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

static UPSERT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bINSERT\s+INTO\b").unwrap());

static ARRAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"ARRAY\[(.*?)\]").unwrap());

const UPSERT_VERB: &str = "INSERT OR REPLACE INTO";

/// Configuration for the convert command
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Input dump file
    pub input: PathBuf,
    /// Directory receiving the batch files
    pub output_dir: PathBuf,
    pub profile: RewriteProfile,
    /// Plan and report batches without writing
    pub dry_run: bool,
    /// Show a byte progress bar while loading the dump
    pub progress: bool,
    /// Fail before writing when any row looks malformed
    pub strict: bool,
    /// Prepend a comment block to each batch file
    pub annotate: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(crate::config::DEFAULT_DUMP_FILE),
            output_dir: PathBuf::from("."),
            profile: RewriteProfile::default(),
            dry_run: false,
            progress: false,
            strict: false,
            annotate: false,
        }
    }
}

/// How many times each substitution fired
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionCounts {
    pub schema_prefixes: usize,
    pub upserts: usize,
    pub arrays: usize,
    pub booleans: usize,
}

/// One emitted (or, in dry-run mode, planned) batch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Statistics from a convert run
#[derive(Debug, Default)]
pub struct ConvertStats {
    pub rows_extracted: usize,
    pub files: Vec<BatchFile>,
    pub substitutions: SubstitutionCounts,
    pub warnings: Vec<ConvertWarning>,
    /// Warnings beyond the collector limit
    pub warnings_suppressed: usize,
}

impl ConvertStats {
    pub fn rows_written(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.warnings.len() + self.warnings_suppressed
    }
}

/// Rewritten document plus substitution counts
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub text: String,
    pub counts: SubstitutionCounts,
}

/// Applies the dialect substitutions in their required order
pub struct Rewriter {
    quoted_schema_re: Option<Regex>,
    bare_schema_re: Option<Regex>,
}

impl Rewriter {
    pub fn new(schema_prefixes: &[String]) -> anyhow::Result<Self> {
        let names: Vec<String> = schema_prefixes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();

        if names.is_empty() {
            return Ok(Self {
                quoted_schema_re: None,
                bare_schema_re: None,
            });
        }

        let alternation = names.join("|");
        // "public".x anywhere; bare public.x only right after INTO/TABLE so
        // text such as e-mail addresses inside literals is left alone
        let quoted = Regex::new(&format!(r#""(?:{})"\s*\.\s*"#, alternation))?;
        let bare = Regex::new(&format!(r"(?i)\b(INTO|TABLE)\s+(?:{})\.", alternation))?;

        Ok(Self {
            quoted_schema_re: Some(quoted),
            bare_schema_re: Some(bare),
        })
    }

    pub fn from_profile(profile: &RewriteProfile) -> anyhow::Result<Self> {
        Self::new(&profile.schema_prefixes)
    }

    /// Run every substitution in order over the whole document.
    pub fn rewrite(&self, sql: &str) -> Rewritten {
        let mut counts = SubstitutionCounts::default();

        counts.schema_prefixes = self.count_schema_prefixes(sql);
        let text = self.strip_schema_prefix(sql);

        counts.upserts = UPSERT_RE.find_iter(&text).count();
        let text = insert_to_upsert(&text);

        counts.arrays = ARRAY_RE.find_iter(&text).count();
        let text = arrays_to_json(&text);

        counts.booleans = text.matches("'false'").count() + text.matches("'true'").count();
        let text = booleans_to_integers(&text);

        Rewritten { text, counts }
    }

    /// Strip schema qualifiers such as `"public".`
    pub fn strip_schema_prefix(&self, sql: &str) -> String {
        let mut result = sql.to_string();
        if let Some(ref re) = self.quoted_schema_re {
            result = re.replace_all(&result, "").to_string();
        }
        if let Some(ref re) = self.bare_schema_re {
            result = re.replace_all(&result, "$1 ").to_string();
        }
        result
    }

    fn count_schema_prefixes(&self, sql: &str) -> usize {
        let quoted = self
            .quoted_schema_re
            .as_ref()
            .map_or(0, |re| re.find_iter(sql).count());
        let bare = self
            .bare_schema_re
            .as_ref()
            .map_or(0, |re| re.find_iter(sql).count());
        quoted + bare
    }
}

/// `INSERT INTO` (any case and spacing) → `INSERT OR REPLACE INTO`
pub fn insert_to_upsert(sql: &str) -> String {
    UPSERT_RE.replace_all(sql, UPSERT_VERB).to_string()
}

/// `ARRAY[...]` → `'[...]'`, single-quoted elements becoming JSON strings
pub fn arrays_to_json(sql: &str) -> String {
    ARRAY_RE
        .replace_all(sql, |caps: &regex::Captures| {
            format!("'[{}]'", array_body_to_json(&caps[1]))
        })
        .to_string()
}

/// Requote an array body so it reads as JSON inside a SQL string literal.
///
/// `'a'` becomes `"a"`; a doubled `''` stays doubled (it is still inside a
/// SQL literal) and a bare `"` inside an element is JSON-escaped.
/// Double-quoted elements are copied as they are.
fn array_body_to_json(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if in_single => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push_str("''");
                } else {
                    in_single = false;
                    out.push('"');
                }
            }
            '\'' if !in_double => {
                in_single = true;
                out.push('"');
            }
            '"' if in_single => out.push_str("\\\""),
            '"' => {
                in_double = !in_double;
                out.push('"');
            }
            _ => out.push(c),
        }
    }

    out
}

/// `'false'` → `0`, `'true'` → `1`; a blind substitution
pub fn booleans_to_integers(sql: &str) -> String {
    sql.replace("'false'", "0").replace("'true'", "1")
}

/// Locate and split the tuple list of the rewritten document.
///
/// Fails when there is no `VALUES ... ;` block or it holds no tuples.
pub fn extract_rows(sql: &str) -> anyhow::Result<SplitRows<'_>> {
    let block = match values_block(sql) {
        Some(b) => b,
        None => anyhow::bail!("no VALUES block found: expected `VALUES (...), (...);`"),
    };

    let split = RowSplitter::new(block).split();
    if split.is_empty() {
        anyhow::bail!("VALUES block contains no row tuples");
    }

    Ok(split)
}

/// Collect warnings for rows that do not fit the target schema.
pub fn inspect_rows(split: &SplitRows<'_>, expected_columns: usize) -> WarningCollector {
    let mut collector = WarningCollector::new();

    for (i, row) in split.rows.iter().enumerate() {
        let found = RowSplitter::count_values(row);
        if found != expected_columns {
            collector.add(ConvertWarning::ColumnCountMismatch {
                row: i + 1,
                expected: expected_columns,
                found,
            });
        }
    }

    if let Some(row) = split.unterminated {
        collector.add(ConvertWarning::UnterminatedTuple { row: row + 1 });
    }

    if let Some(tail) = split.trailing {
        collector.add(ConvertWarning::TrailingClause {
            preview: tail.chars().take(60).collect(),
        });
    }

    collector
}

/// Run the convert command
pub fn run(config: ConvertConfig) -> anyhow::Result<ConvertStats> {
    let profile = &config.profile;
    if profile.batch_size == 0 {
        anyhow::bail!("batch size must be at least 1");
    }

    let content = load_input(&config)?;

    let rewriter = Rewriter::from_profile(profile)?;
    let rewritten = rewriter.rewrite(&content);
    drop(content);

    let split = extract_rows(&rewritten.text)?;
    let collector = inspect_rows(&split, profile.target.columns.len());

    if config.strict && collector.total() > 0 {
        let first = collector
            .warnings()
            .first()
            .map(|w| w.to_string())
            .unwrap_or_default();
        anyhow::bail!(
            "Strict mode: {} problem(s) found, no files written (first: {})",
            collector.total(),
            first
        );
    }

    let mut stats = ConvertStats {
        rows_extracted: split.len(),
        substitutions: rewritten.counts,
        warnings_suppressed: collector.suppressed(),
        ..Default::default()
    };

    let writer = BatchWriter::new(config.output_dir.clone(), profile.file_prefix.clone());
    if !config.dry_run {
        writer.ensure_output_dir()?;
    }

    let header = profile.target.upsert_header();
    let batches = plan_batches(&split.rows, profile.batch_size);
    let source = config.input.display().to_string();
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let annotation = Annotation {
        source: &source,
        total_batches: batches.len(),
        generated_at: &generated_at,
    };

    for batch in &batches {
        let statement = render_batch(&header, batch.rows);
        let path = if config.dry_run {
            writer.path_for(batch.index)
        } else if config.annotate {
            let note = annotation.render(batch);
            writer.write_batch(batch.index, &[note.as_str(), statement.as_str(), "\n"])?
        } else {
            writer.write_batch(batch.index, &[statement.as_str()])?
        };

        stats.files.push(BatchFile {
            path,
            rows: batch.rows.len(),
        });
    }

    stats.warnings = collector.into_warnings();
    Ok(stats)
}

fn load_input(config: &ConvertConfig) -> anyhow::Result<String> {
    if !config.progress {
        return crate::input::read_sql_file(&config.input);
    }

    let size = std::fs::metadata(&config.input).map(|m| m.len()).unwrap_or(0);
    let pb = byte_bar(size, "Reading dump");
    let pb_cb = pb.clone();
    let content =
        crate::input::read_sql_file_with_progress(&config.input, Some(move |n| pb_cb.set_position(n)));
    pb.finish_and_clear();
    content
}
