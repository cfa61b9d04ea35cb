//! Re-chunking extracted rows into bounded, self-contained upserts.

/// A contiguous slice of rows destined for one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'r, 'a> {
    /// 1-based position among all batches
    pub index: usize,
    pub rows: &'r [&'a str],
}

/// Partition `rows` into contiguous groups of at most `batch_size`.
///
/// Every batch but the last holds exactly `batch_size` rows.
pub fn plan_batches<'r, 'a>(rows: &'r [&'a str], batch_size: usize) -> Vec<Batch<'r, 'a>> {
    let size = batch_size.max(1);
    rows.chunks(size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            index: i + 1,
            rows: chunk,
        })
        .collect()
}

/// File name of batch `index`, e.g. `lotes_parte_3.sql`
pub fn batch_file_name(prefix: &str, index: usize) -> String {
    format!("{}{}.sql", prefix, index)
}

/// Render a complete upsert statement: header, then rows joined by `),\n(`.
pub fn render_batch(header: &str, rows: &[&str]) -> String {
    let body_len: usize = rows.iter().map(|r| r.len() + 4).sum();
    let mut out = String::with_capacity(header.len() + body_len + 2);
    out.push_str(header);
    out.push('(');
    out.push_str(&rows.join("),\n("));
    out.push_str(");");
    out
}

/// Comment block prepended to a batch with `--annotate`
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    pub source: &'a str,
    pub total_batches: usize,
    pub generated_at: &'a str,
}

impl Annotation<'_> {
    pub fn render(&self, batch: &Batch<'_, '_>) -> String {
        format!(
            "-- Source: {}\n-- Batch {} of {}\n-- Rows in this file: {}\n-- Generated: {}\n\n",
            self.source,
            batch.index,
            self.total_batches,
            batch.rows.len(),
            self.generated_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("'{}', {}", i, i)).collect()
    }

    #[test]
    fn test_batch_sizes() {
        for (total, size) in [(0, 100), (1, 100), (100, 100), (101, 100), (250, 100), (7, 3)] {
            let owned = rows(total);
            let refs: Vec<&str> = owned.iter().map(|s| s.as_str()).collect();
            let batches = plan_batches(&refs, size);

            assert_eq!(batches.len(), total.div_ceil(size), "total={total}");
            let sum: usize = batches.iter().map(|b| b.rows.len()).sum();
            assert_eq!(sum, total);

            for (i, batch) in batches.iter().enumerate() {
                assert_eq!(batch.index, i + 1);
                if i + 1 < batches.len() {
                    assert_eq!(batch.rows.len(), size);
                }
            }
            if let Some(last) = batches.last() {
                let expected = if total % size == 0 { size } else { total % size };
                assert_eq!(last.rows.len(), expected);
            }
        }
    }

    #[test]
    fn test_render_batch_layout() {
        let out = render_batch("INSERT OR REPLACE INTO t (a, b) VALUES \n", &["1, 'x'", "2, 'y'"]);
        assert_eq!(
            out,
            "INSERT OR REPLACE INTO t (a, b) VALUES \n(1, 'x'),\n(2, 'y');"
        );
    }

    #[test]
    fn test_render_single_row() {
        assert_eq!(render_batch("H ", &["1"]), "H (1);");
    }

    #[test]
    fn test_batch_file_name() {
        assert_eq!(batch_file_name("lotes_parte_", 1), "lotes_parte_1.sql");
        assert_eq!(batch_file_name("seed-properties-parte-", 12), "seed-properties-parte-12.sql");
    }

    #[test]
    fn test_annotation() {
        let refs = ["1", "2"];
        let batches = plan_batches(&refs, 1);
        let note = Annotation {
            source: "dump.sql",
            total_batches: 2,
            generated_at: "2025-01-01 00:00:00",
        };
        let text = note.render(&batches[1]);
        assert!(text.contains("-- Batch 2 of 2"));
        assert!(text.contains("-- Rows in this file: 1"));
        assert!(text.ends_with("\n\n"));
    }
}
