//! Text-pattern extraction over raw SQL.
//!
//! Nothing here is a real SQL parser. The dumps handled by this tool have
//! one narrow shape (a single multi-row `INSERT` per file, flat literals)
//! and the helpers below only locate and slice that shape:
//!
//! - [`values_block`] finds the tuple list of the bulk insert
//! - [`rows::RowSplitter`] cuts the tuple list into row fragments
//! - [`patterns`] pulls identifiers and `(child, parent, label)` triples

pub mod patterns;
pub mod rows;

pub use patterns::{
    extract_fk_triples, extract_ids, fk_triple_regex, project_id_regex, FkTriple, UUID_FRAGMENT,
};
pub use rows::{RowSplitter, SplitRows};

use once_cell::sync::Lazy;
use regex::Regex;

/// Everything between the `VALUES` of the first `INSERT` statement and the
/// last `;` of the document. The `INSERT` must open a line or follow a `;`,
/// so the word "values" in a `--` comment is not taken for the keyword.
static VALUES_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ism)(?:^|;)[ \t]*INSERT\b[^;]*?\bVALUES\s*(.*);").unwrap()
});

/// Locate the tuple list of the document's bulk insert.
///
/// The match is greedy and spans newlines, so it runs to the final `;`.
/// Returns `None` when the document has no `VALUES ... ;` block.
pub fn values_block(sql: &str) -> Option<&str> {
    VALUES_BLOCK_RE
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
