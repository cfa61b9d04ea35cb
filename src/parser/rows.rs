//! Row splitter for a flat tuple list.
//!
//! The input is the text after `VALUES`, e.g. `('a', 1), ('b', 2)`. Each
//! top-level `( ... )` becomes one fragment with exactly its outer
//! parentheses removed. Single-quoted strings (with `''` doubling) and
//! double-quoted identifiers are skipped opaquely, so a `), (` inside a
//! literal never splits a row. Backslash escapes are not recognized; the
//! source dumps use standard-conforming strings.

use memchr::memchr;

/// Result of splitting a tuple list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitRows<'a> {
    /// Row fragments in source order, outer parentheses removed
    pub rows: Vec<&'a str>,
    /// Top-level text after the last tuple that is not a separator
    pub trailing: Option<&'a str>,
    /// Index of a final tuple whose closing parenthesis never came
    pub unterminated: Option<usize>,
}

impl<'a> SplitRows<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splitter over the tuple list following `VALUES`
pub struct RowSplitter<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RowSplitter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    /// Split the whole tuple list.
    pub fn split(mut self) -> SplitRows<'a> {
        let mut out = SplitRows::default();

        loop {
            self.skip_separators();
            if self.pos >= self.bytes.len() {
                break;
            }

            if self.bytes[self.pos] != b'(' {
                let rest = self.text[self.pos..].trim();
                if !rest.is_empty() {
                    out.trailing = Some(rest);
                }
                break;
            }

            let open = self.pos;
            match find_closing_paren(self.bytes, open) {
                Some(close) => {
                    out.rows.push(&self.text[open + 1..close]);
                    self.pos = close + 1;
                }
                None => {
                    out.unterminated = Some(out.rows.len());
                    out.rows.push(self.text[open + 1..].trim_end());
                    break;
                }
            }
        }

        out
    }

    /// Count the top-level comma-separated values of one row fragment.
    ///
    /// An empty or all-whitespace fragment has zero values.
    pub fn count_values(fragment: &str) -> usize {
        if fragment.trim().is_empty() {
            return 0;
        }

        let bytes = fragment.as_bytes();
        let mut depth = 0usize;
        let mut count = 1;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                q @ (b'\'' | b'"') => match skip_quoted(bytes, i, q) {
                    Some(next) => {
                        i = next;
                        continue;
                    }
                    None => break,
                },
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => count += 1,
                _ => {}
            }
            i += 1;
        }

        count
    }

    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b',' | b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }
}

/// Index of the `)` matching the `(` at `open`, skipping quoted text.
fn find_closing_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            q @ (b'\'' | b'"') => {
                i = skip_quoted(bytes, i, q)?;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Position just past the quoted run starting at `start`.
///
/// A doubled quote inside the run is an escaped quote, not the end.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    loop {
        let offset = memchr(quote, &bytes[i..])?;
        let close = i + offset;
        if bytes.get(close + 1) == Some(&quote) {
            i = close + 2;
            continue;
        }
        return Some(close + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_rows() {
        let split = RowSplitter::new("('a', 1), ('b', 2), ('c', 3)").split();
        assert_eq!(split.rows, vec!["'a', 1", "'b', 2", "'c', 3"]);
        assert_eq!(split.trailing, None);
        assert_eq!(split.unterminated, None);
    }

    #[test]
    fn test_separator_inside_string_does_not_split() {
        let split = RowSplitter::new("('x), (y', 1), ('z', 2)").split();
        assert_eq!(split.rows, vec!["'x), (y', 1", "'z', 2"]);
    }

    #[test]
    fn test_doubled_quote_and_nested_parens() {
        let split = RowSplitter::new("('d''agua (lote)', point(1, 2)),\n('ok', NULL)").split();
        assert_eq!(split.rows, vec!["'d''agua (lote)', point(1, 2)", "'ok', NULL"]);
    }

    #[test]
    fn test_trailing_clause_reported() {
        let split = RowSplitter::new("(1), (2) ON CONFLICT DO NOTHING").split();
        assert_eq!(split.rows, vec!["1", "2"]);
        assert_eq!(split.trailing, Some("ON CONFLICT DO NOTHING"));
    }

    #[test]
    fn test_unterminated_tuple_kept() {
        let split = RowSplitter::new("(1, 'a'), (2, 'b'  ").split();
        assert_eq!(split.rows, vec!["1, 'a'", "2, 'b'"]);
        assert_eq!(split.unterminated, Some(1));
    }

    #[test]
    fn test_empty_list() {
        let split = RowSplitter::new("  \n ").split();
        assert!(split.is_empty());
        assert_eq!(split.trailing, None);
    }

    #[test]
    fn test_json_array_literal_is_opaque() {
        let split = RowSplitter::new(r#"('id', '["a), (b","c"]', 1)"#).split();
        assert_eq!(split.len(), 1);
        assert_eq!(RowSplitter::count_values(split.rows[0]), 3);
    }

    #[test]
    fn test_count_values() {
        assert_eq!(RowSplitter::count_values(""), 0);
        assert_eq!(RowSplitter::count_values("1"), 1);
        assert_eq!(RowSplitter::count_values("'a,b', 2, NULL"), 3);
        assert_eq!(RowSplitter::count_values("point(1, 2), 'x'"), 2);
        assert_eq!(RowSplitter::count_values("\"col,name\", 'it''s, ok'"), 2);
    }
}
