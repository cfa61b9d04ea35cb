//! Warning system for the convert command.
//!
//! Rows are passed through even when they look malformed; these warnings
//! say what looked wrong so the operator can decide, or so `--strict` can
//! refuse to write anything.

/// Warning types that can occur during conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertWarning {
    /// Row does not carry one value per target column
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Text after the last tuple that is not part of the tuple list
    TrailingClause { preview: String },
    /// Last tuple never closed its parenthesis
    UnterminatedTuple { row: usize },
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertWarning::ColumnCountMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} values, expected {} (passed through unchanged)",
                row, found, expected
            ),
            ConvertWarning::TrailingClause { preview } => {
                write!(f, "Ignored text after the last row: {}", preview)
            }
            ConvertWarning::UnterminatedTuple { row } => {
                write!(f, "Row {} is missing its closing parenthesis", row)
            }
        }
    }
}

/// Collects warnings during conversion
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<ConvertWarning>,
    max_warnings: usize,
    suppressed: usize,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: limit,
            suppressed: 0,
        }
    }

    /// Add a warning; identical warnings are kept once
    pub fn add(&mut self, warning: ConvertWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        if self.warnings.len() < self.max_warnings {
            self.warnings.push(warning);
        } else {
            self.suppressed += 1;
        }
    }

    pub fn warnings(&self) -> &[ConvertWarning] {
        &self.warnings
    }

    /// Warnings seen in total, including ones beyond the limit
    pub fn total(&self) -> usize {
        self.warnings.len() + self.suppressed
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<ConvertWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates_identical_warnings() {
        let mut collector = WarningCollector::new();
        collector.add(ConvertWarning::UnterminatedTuple { row: 3 });
        collector.add(ConvertWarning::UnterminatedTuple { row: 3 });
        collector.add(ConvertWarning::UnterminatedTuple { row: 4 });
        assert_eq!(collector.total(), 2);
    }

    #[test]
    fn test_limit_counts_suppressed() {
        let mut collector = WarningCollector::with_limit(2);
        for row in 1..=5 {
            collector.add(ConvertWarning::ColumnCountMismatch {
                row,
                expected: 24,
                found: 23,
            });
        }
        assert_eq!(collector.warnings().len(), 2);
        assert_eq!(collector.suppressed(), 3);
        assert_eq!(collector.total(), 5);
    }

    #[test]
    fn test_display() {
        let w = ConvertWarning::ColumnCountMismatch {
            row: 7,
            expected: 24,
            found: 22,
        };
        assert_eq!(
            w.to_string(),
            "Row 7 has 22 values, expected 24 (passed through unchanged)"
        );
    }
}
