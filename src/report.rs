use std::io::{self, Write};

use serde::Serialize;

use crate::dedup::{DedupReport, DuplicatePair};

/// Counts a caller prints or returns after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub raw_total: usize,
    pub unique_count: usize,
    pub duplicate_pairs: usize,
    pub deleted_key_count: usize,
    pub reconciles: bool,
}

impl Summary {
    pub fn from_report(report: &DedupReport) -> Self {
        Self {
            raw_total: report.raw_total,
            unique_count: report.unique_count(),
            duplicate_pairs: report.duplicates.len(),
            deleted_key_count: report.deleted_key_count,
            reconciles: report.reconciles(),
        }
    }

    pub fn check_line(&self) -> String {
        let verdict = if self.reconciles { "ok" } else { "mismatch" };
        format!(
            "Check: {} - {} = {} ({verdict})",
            self.raw_total,
            self.deleted_key_count,
            self.raw_total - self.deleted_key_count,
        )
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total patterns generated: {}", self.raw_total)?;
        writeln!(f, "Unique patterns: {}", self.unique_count)?;
        writeln!(f, "Duplicate occurrences: {}", self.duplicate_pairs)?;
        writeln!(f, "Duplicated keys: {}", self.deleted_key_count)?;
        write!(f, "{}", self.check_line())
    }
}

/// One CSV row per duplicate occurrence.
pub fn write_duplicate_pairs<W: Write>(mut w: W, pairs: &[DuplicatePair]) -> io::Result<()> {
    writeln!(w, "Duplicate Index,Original Index")?;
    for pair in pairs {
        writeln!(w, "{},{}", pair.duplicate, pair.original)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::Canonicalizer;
    use crate::dedup::deduplicate;
    use crate::generator::Generator;
    use crate::types::{CanonicalMode, GridSize, OverlapPolicy, Shape, VisibilityMode};

    fn two_by_two_report() -> DedupReport {
        let shapes = vec![Shape::new(1, 1, 'R'), Shape::new(1, 1, 'G')];
        let generator = Generator::new(
            GridSize::new(2, 2),
            shapes.clone(),
            OverlapPolicy::OverlapForbidden,
            VisibilityMode::None,
        )
        .unwrap();
        deduplicate(
            &Canonicalizer::new(CanonicalMode::Exact, &shapes),
            generator.generate(),
        )
    }

    #[test]
    fn test_duplicate_csv() {
        let pairs = [
            DuplicatePair {
                duplicate: 5,
                original: 2,
            },
            DuplicatePair {
                duplicate: 6,
                original: 1,
            },
        ];
        let mut buf = Vec::new();
        write_duplicate_pairs(&mut buf, &pairs).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Duplicate Index,Original Index\n5,2\n6,1\n"
        );
    }

    #[test]
    fn test_csv_has_one_row_per_occurrence() {
        let report = two_by_two_report();
        let mut buf = Vec::new();
        write_duplicate_pairs(&mut buf, &report.duplicates).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1 + 12);
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_report(&two_by_two_report());
        assert_eq!(summary.raw_total, 24);
        assert_eq!(summary.unique_count, 12);
        assert!(summary.reconciles);
        assert_eq!(summary.check_line(), "Check: 24 - 12 = 12 (ok)");
        assert!(summary.to_string().starts_with("Total patterns generated: 24\n"));
    }
}
