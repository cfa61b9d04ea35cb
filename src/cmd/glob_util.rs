//! Input pattern expansion for the convert command.
//!
//! `convert` accepts either one dump path or a glob such as `dumps/*.sql.gz`.

use std::path::{Path, PathBuf};

/// Dump files selected by a path or pattern
#[derive(Debug)]
pub struct ExpandedInputs {
    pub files: Vec<PathBuf>,
    /// True when the argument was a glob, even if it matched one file
    pub from_glob: bool,
}

pub fn is_glob_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Resolve `pattern` to an existing file list, sorted by path.
///
/// A literal path must exist. A glob must be valid and match at least one
/// regular file; directories matched by the glob are skipped.
pub fn expand_input_pattern(pattern: &Path) -> anyhow::Result<ExpandedInputs> {
    let pattern_str = pattern.to_string_lossy();

    if !is_glob_pattern(&pattern_str) {
        if !pattern.exists() {
            anyhow::bail!("input file does not exist: {}", pattern.display());
        }
        return Ok(ExpandedInputs {
            files: vec![pattern.to_path_buf()],
            from_glob: false,
        });
    }

    let paths = glob::glob(&pattern_str)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern_str, e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry
            .map_err(|e| anyhow::anyhow!("cannot read a match of '{}': {}", pattern_str, e))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("no dump files match pattern: {}", pattern_str);
    }
    files.sort();

    Ok(ExpandedInputs {
        files,
        from_glob: true,
    })
}

/// Tally of a multi-dump convert run
#[derive(Debug, Default)]
pub struct MultiFileResult {
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(PathBuf, String)>,
}

impl MultiFileResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, path: PathBuf, error: String) {
        self.failed += 1;
        self.errors.push((path, error));
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_glob_pattern() {
        assert!(!is_glob_pattern("reurb_properties_rows.sql"));
        assert!(is_glob_pattern("dumps/*.sql"));
        assert!(is_glob_pattern("dump_?.sql.gz"));
        assert!(is_glob_pattern("[ab].sql"));
    }

    #[test]
    fn test_missing_literal_path() {
        let err = expand_input_pattern(Path::new("/nonexistent/dump.sql")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_glob_skips_directories_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.sql"), "x").unwrap();
        fs::write(dir.path().join("a.sql"), "x").unwrap();
        fs::create_dir(dir.path().join("c.sql")).unwrap();

        let result = expand_input_pattern(&dir.path().join("*.sql")).unwrap();
        assert!(result.from_glob);
        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].ends_with("a.sql"));
    }

    #[test]
    fn test_glob_without_matches() {
        let dir = TempDir::new().unwrap();
        let err = expand_input_pattern(&dir.path().join("*.sql")).unwrap_err();
        assert!(err.to_string().contains("no dump files match"));
    }

    #[test]
    fn test_multi_file_result() {
        let mut result = MultiFileResult::new();
        result.record_success();
        result.record_failure(PathBuf::from("bad.sql"), "no VALUES block found".to_string());
        assert_eq!(result.succeeded, 1);
        assert!(result.has_failures());
    }
}
